use fn_time::{chart, stdout_logger};
use tracing::info;

fn main() -> anyhow::Result<()> {
    stdout_logger()?;
    let log = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./assets/performance.log".to_owned());
    let path = chart::display(&log)?;
    info!("chart written to {}", path.display());
    Ok(())
}
