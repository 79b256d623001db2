use anyhow::Context;
use time::{macros::format_description, OffsetDateTime};
use tracing::Level;
use tracing_subscriber::fmt::{format::FmtSpan, time::FormatTime};
use tracing_subscriber::FmtSubscriber;

use crate::error::Result;

struct Timer;
impl FormatTime for Timer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = local_now()
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", now)
    }
}

/// Local time, or UTC when the local offset can't be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn init_log(file_name: &str) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::never("./logs", format!("{}.log", file_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(non_blocking)
        .with_span_events(FmtSpan::CLOSE)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_timer(Timer)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(guard)
}

/// Logs to `./logs/fn_time_<name>_<timestamp>.log`. Keep the guard alive until exit.
pub fn file_logger(name: &str) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let name = if name.is_empty() {
        "".to_string()
    } else {
        name.to_string() + "_"
    };
    let parse_str = format!("fn_time_{}[year]-[month]-[day]T[hour]:[minute]:[second]", name);
    let format = time::format_description::parse(&parse_str).context("bad log name format")?;
    let log_name = local_now()
        .format(&format)
        .context("formatting log name")?;
    init_log(&log_name)
}

pub fn stdout_logger() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_span_events(FmtSpan::CLOSE)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_timer(Timer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}
