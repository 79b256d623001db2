use std::fs;

use fn_time::{
    chart::{display_to, read_timings, render, render_svg, render_to, ChartRecord, CHART_FILE, TITLE},
    Error, LineTiming,
};

fn record<N>(line_number: N, values: &[f64]) -> ChartRecord<N, String> {
    ChartRecord {
        line_number,
        top_durations: values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("t{}", i), *v))
            .collect(),
    }
}

/// `cy` of every point marker, in drawing order
fn points(svg: &str) -> Vec<f64> {
    let doc = roxmltree::Document::parse(svg).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name("circle"))
        .map(|n| n.attribute("cy").unwrap().parse().unwrap())
        .collect()
}

fn text_count(svg: &str, text: &str) -> usize {
    let doc = roxmltree::Document::parse(svg).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name("text") && n.text().map(str::trim) == Some(text))
        .count()
}

#[test]
fn three_timings_on_line_five() {
    let record = ChartRecord {
        line_number: 5,
        top_durations: vec![("a", 1.), ("b", 2.), ("c", 3.)],
    };
    let svg = render_svg(&record).unwrap();
    let cys = points(&svg);
    assert_eq!(cys.len(), 3);
    assert!(cys[0] > cys[1] && cys[1] > cys[2]);
    assert_eq!(text_count(&svg, "5"), 3);
    assert_eq!(text_count(&svg, TITLE), 1);
}

#[test]
fn one_series_per_duration_sharing_line_label() {
    let svg = render_svg(&record(4242, &[1., 2., 3.])).unwrap();
    let cys = points(&svg);
    assert_eq!(cys.len(), 3);
    // larger values sit higher on the canvas
    assert!(cys[0] > cys[1] && cys[1] > cys[2]);
    assert_eq!(text_count(&svg, "4242"), 3);
    assert_eq!(text_count(&svg, TITLE), 1);
}

#[test]
fn empty_record_is_titled_with_no_series() {
    let svg = render_svg(&record(4242, &[])).unwrap();
    assert!(points(&svg).is_empty());
    assert_eq!(text_count(&svg, "4242"), 0);
    assert_eq!(text_count(&svg, TITLE), 1);
}

#[test]
fn line_number_only_changes_labels() {
    let a = render_svg(&record(4242, &[5., 1., 9.])).unwrap();
    let b = render_svg(&record(31337, &[5., 1., 9.])).unwrap();
    assert_eq!(points(&a), points(&b));
    assert_eq!(text_count(&a, "4242"), 3);
    assert_eq!(text_count(&b, "31337"), 3);
    assert_eq!(text_count(&b, "4242"), 0);
}

#[test]
fn string_line_numbers_are_labels_too() {
    let svg = render_svg(&record("main_loop", &[0.25, 0.75])).unwrap();
    assert_eq!(text_count(&svg, "main_loop"), 2);
}

#[test]
fn large_input_is_well_formed() {
    let values: Vec<f64> = (0..200).map(|v| v as f64 * 1.5).collect();
    let svg = render_svg(&record(4242, &values)).unwrap();
    assert_eq!(points(&svg).len(), 200);
}

#[test]
fn second_render_overwrites_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CHART_FILE);
    render_to(&record(4242, &[1., 2., 3.]), &path).unwrap();
    render_to(&record(31337, &[7.]), &path).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert_eq!(points(&svg).len(), 1);
    assert_eq!(text_count(&svg, "31337"), 1);
    assert_eq!(text_count(&svg, "4242"), 0);
}

#[test]
fn unwritable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join(CHART_FILE);
    let err = render_to(&record(1, &[1.]), &path).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err}");
}

#[test]
fn render_writes_chart_svg_in_working_dir() {
    let path = render(&record(4242, &[2., 4.])).unwrap();
    assert_eq!(path, std::path::PathBuf::from(CHART_FILE));
    let svg = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(points(&svg).len(), 2);
}

fn timing(line_number: u32, percents: &[f64]) -> LineTiming {
    LineTiming {
        line_number,
        top_durations: percents
            .iter()
            .map(|p| (std::time::Duration::from_millis(*p as u64), *p))
            .collect(),
        average_of_line: std::time::Duration::from_millis(1),
    }
}

#[test]
fn display_charts_last_logged_timing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.json");
    let out = dir.path().join(CHART_FILE);
    let mut body = String::new();
    body += &serde_json::to_string(&timing(4242, &[10., 20., 30.])).unwrap();
    body += "\n";
    body += &serde_json::to_string(&timing(31337, &[50., 25.])).unwrap();
    body += "\n";
    fs::write(&log, body).unwrap();

    assert_eq!(read_timings(&log).unwrap().len(), 2);
    display_to(&log, &out).unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert_eq!(points(&svg).len(), 2);
    assert_eq!(text_count(&svg, "31337"), 2);
}

#[test]
fn concatenated_log_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.json");
    let body = serde_json::to_string(&timing(1, &[1.])).unwrap()
        + &serde_json::to_string(&timing(2, &[2.])).unwrap();
    fs::write(&log, body).unwrap();

    let timings = read_timings(&log).unwrap();
    assert_eq!(timings, vec![timing(1, &[1.]), timing(2, &[2.])]);
}

#[test]
fn empty_log_cannot_be_displayed() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.json");
    fs::write(&log, "").unwrap();
    let err = display_to(&log, dir.path().join(CHART_FILE)).unwrap_err();
    assert!(matches!(err, Error::EmptyLog(_)), "{err}");
}
