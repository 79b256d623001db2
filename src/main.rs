use std::{thread, time::Duration};

use fn_time::{capture, chart, config::Config, run_stats, stdout_logger, Collector, FnTime, Output};
use tracing::info;

fn to_time(col: &Collector, fnt: &mut FnTime) {
    capture!(fnt);
    thread::sleep(Duration::from_millis(200));
    capture!(fnt);
    thread::sleep(Duration::from_millis(200));
    capture!(fnt);
    thread::sleep(Duration::from_millis(fastrand::u64(0..400)));
    capture!(fnt);
    thread::sleep(Duration::from_millis(200));
    capture!(fnt);

    col.send(fnt);
}

fn main() -> anyhow::Result<()> {
    stdout_logger()?;
    let config = Config::load_or_default("./config/fn_time.toml")?;
    info!("start: {:?}", config);

    let (col, mut fnt, stats) = fn_time::new(config.num_spots, config.reset_at, config.output())?;
    let stats_handle = run_stats(stats)?;

    let worker = thread::Builder::new()
        .name("timed".to_owned())
        .spawn(move || {
            for _ in 0..5 {
                to_time(&col, &mut fnt);
            }
        })?;
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("timed thread panicked"))?;
    stats_handle.stop()?;

    if let Output::Json(log) = config.output() {
        let out = config.chart.unwrap_or_else(|| chart::CHART_FILE.into());
        chart::display_to(&log, &out)?;
        info!("chart written to {}", out.display());
    }
    Ok(())
}
