use std::{
    fmt::Display,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use plotters::prelude::*;
use tracing::info;

use crate::{
    error::{Error, Result},
    stats::LineTiming,
};

pub const CHART_FILE: &str = "chart.svg";
pub const TITLE: &str = "Timings";
const CHART_SIZE: (u32, u32) = (800, 600);

/// One line's durations to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord<N, L> {
    /// label shared by every series
    pub line_number: N,
    /// (label, duration); the label is not drawn
    pub top_durations: Vec<(L, f64)>,
}

impl From<&LineTiming> for ChartRecord<u32, Duration> {
    fn from(timing: &LineTiming) -> Self {
        Self {
            line_number: timing.line_number,
            top_durations: timing.top_durations.clone(),
        }
    }
}

/// Draws one single-point series per duration, all labeled with the line number.
pub fn render_svg<N: Display, L>(record: &ChartRecord<N, L>) -> Result<String> {
    let label = record.line_number.to_string();
    let values: Vec<f64> = record.top_durations.iter().map(|(_, d)| *d).collect();
    let (y_min, y_max) = value_range(&values);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(-1f64..1f64, y_min..y_max)?;

        chart.configure_mesh().disable_x_mesh().x_labels(3).draw()?;

        for (i, value) in values.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            chart
                .draw_series(
                    LineSeries::new(std::iter::once((0., *value)), color.stroke_width(2))
                        .point_size(4),
                )?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        if !values.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        root.present()?;
    }
    Ok(svg)
}

/// Writes the chart to `path`, replacing any existing file.
pub fn render_to<N: Display, L>(record: &ChartRecord<N, L>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let svg = render_svg(record)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(svg.as_bytes())?;
    out.flush()?;
    info!(
        "rendered {} series for line {} to {}",
        record.top_durations.len(),
        record.line_number,
        path.display()
    );
    Ok(())
}

/// Writes `chart.svg` to the current directory.
pub fn render<N: Display, L>(record: &ChartRecord<N, L>) -> Result<PathBuf> {
    let path = PathBuf::from(CHART_FILE);
    render_to(record, &path)?;
    Ok(path)
}

/// Reads every [`LineTiming`] from a JSON log, one document per line or concatenated.
pub fn read_timings(path: impl AsRef<Path>) -> Result<Vec<LineTiming>> {
    let reader = BufReader::new(File::open(path)?);
    let timings = serde_json::Deserializer::from_reader(reader)
        .into_iter::<LineTiming>()
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(timings)
}

/// Charts the last record of a timing log into `out`.
pub fn display_to(log: impl AsRef<Path>, out: impl AsRef<Path>) -> Result<()> {
    let log = log.as_ref();
    let timings = read_timings(log)?;
    let last = timings
        .last()
        .ok_or_else(|| Error::EmptyLog(log.display().to_string()))?;
    info!("charting line {} from {}", last.line_number, log.display());
    render_to(&ChartRecord::from(last), out)
}

/// Charts the last record of a timing log into `chart.svg`.
pub fn display(log: impl AsRef<Path>) -> Result<PathBuf> {
    let path = PathBuf::from(CHART_FILE);
    display_to(log, &path)?;
    Ok(path)
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((0f64, 0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max > min {
        // plotters never finishes laying out an axis with an infinite end
        let padded = max + (max - min) * 0.1;
        (min, if padded.is_finite() { padded } else { max })
    } else {
        (min, min + 1.)
    }
}
