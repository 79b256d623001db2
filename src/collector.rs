use std::fs::File;

use crossbeam::channel::{unbounded, Sender};
use tracing::{error, info};

use crate::{
    error::Result,
    stats::{Output, Stats},
    timing::{FnTime, LineDurations},
};

/// Sending half of the profiler. Cloned into every thread that reports timings.
#[derive(Debug, Clone)]
pub struct Collector {
    tx: Sender<LineDurations>,
}

impl Collector {
    pub fn send(&self, fnt: &mut FnTime) {
        let times = fnt.make_durations();
        if let Err(e) = self.tx.send(times) {
            error!("failed to send data from timed function: {}", e);
        }
    }
}

/// Wires a collector to a stats sink. A JSON log file is truncated here.
pub fn new(num_spots: usize, reset_at: u64, output: Output) -> Result<(Collector, FnTime, Stats)> {
    let (tx, rx) = unbounded();
    if let Output::Json(path) = &output {
        File::create(path)?;
        info!("wiped timing log {}", path.display());
    }
    Ok((
        Collector { tx },
        FnTime::new(num_spots),
        Stats::new(rx, reset_at, output),
    ))
}
