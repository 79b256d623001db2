pub mod chart;
pub mod collector;
pub mod config;
pub mod error;
pub mod stats;
pub mod timing;

pub mod utils;

pub use chart::{display, render, ChartRecord};
pub use collector::{new, Collector};
pub use error::{Error, Result};
pub use stats::{run_stats, LineTiming, Output, Stats, StatsHandle};
pub use timing::{FnTime, LineDurations, Spot};
pub use utils::{file_logger, local_now, stdout_logger};
