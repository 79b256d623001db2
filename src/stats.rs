use std::{
    collections::HashMap,
    fmt,
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
    thread::JoinHandle,
    time::Duration,
};

use crossbeam::channel::{bounded, select, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    timing::LineDurations,
};

/// Longest durations kept per line
pub const TOP_DURATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Print,
    /// newline separated JSON records appended to this file
    Json(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTiming {
    pub line_number: u32,
    /// (top duration, percentage of the function's average run)
    pub top_durations: Vec<(Duration, f64)>,
    pub average_of_line: Duration,
}

impl fmt::Display for LineTiming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line number: {}", self.line_number)?;
        for (top, p) in &self.top_durations {
            writeln!(f, "Duration: {:?}", top)?;
            writeln!(f, "Percentage of top: {:.1}%", p)?;
        }
        write!(f, "Average duration of line: {:?}", self.average_of_line)
    }
}

#[derive(Debug)]
pub struct Stats {
    rx: Receiver<LineDurations>,
    tops: HashMap<u32, Vec<Duration>>,
    totals: HashMap<u32, Duration>,
    visits: u32,
    total_time: Duration,
    count: u64,
    reset_at: u64,
    output: Output,
    json: Option<BufWriter<File>>,
}

impl Stats {
    pub(crate) fn new(rx: Receiver<LineDurations>, reset_at: u64, output: Output) -> Self {
        Self {
            rx,
            tops: HashMap::new(),
            totals: HashMap::new(),
            visits: 0,
            total_time: Duration::ZERO,
            count: 0,
            reset_at,
            output,
            json: None,
        }
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn tops(&self, line: u32) -> Option<&[Duration]> {
        self.tops.get(&line).map(Vec::as_slice)
    }

    /// Prints raw durations until every collector is dropped.
    pub fn print(&mut self) {
        for times in self.rx.iter() {
            for (line, elapsed) in times.iter() {
                println!("id: {} elapsed: {:?}", line, elapsed);
            }
        }
    }

    /// Aggregates and emits timings until every collector is dropped.
    pub fn top(&mut self) -> Result<()> {
        let rx = self.rx.clone();
        for times in rx.iter() {
            self.handle(times)?;
        }
        Ok(())
    }

    /// Folds one run of the timed function into the totals.
    ///
    /// Nothing is returned for the first run, because percentages are taken
    /// against the average of the runs before this one.
    pub fn process(&mut self, times: &LineDurations) -> Vec<LineTiming> {
        let average = self.total_time.checked_div(self.visits);
        self.visits += 1;

        let mut timings = Vec::new();
        for &(line, duration) in times.iter() {
            self.total_time += duration;
            let total_of_line = self.totals.entry(line).or_default();
            *total_of_line += duration;
            let average_of_line = total_of_line
                .checked_div(self.visits)
                .unwrap_or_default();
            let top_durations = self.tops.entry(line).or_default();
            add_duration(top_durations, duration);

            if let Some(av) = average {
                let av = av.as_nanos();
                let top_durations = top_durations
                    .iter()
                    .map(|&top| {
                        if av > 0 {
                            (top, top.as_nanos() as f64 / av as f64 * 100.)
                        } else {
                            (top, 0.)
                        }
                    })
                    .collect();
                timings.push(LineTiming {
                    line_number: line,
                    top_durations,
                    average_of_line,
                });
            }
        }

        self.count += 1;
        if self.count > self.reset_at {
            debug!("resetting top durations after {} runs", self.count);
            self.tops.clear();
            self.count = 0;
        }
        timings
    }

    fn handle(&mut self, times: LineDurations) -> Result<()> {
        for timing in self.process(&times) {
            self.emit(&timing)?;
        }
        Ok(())
    }

    fn emit(&mut self, timing: &LineTiming) -> Result<()> {
        match &self.output {
            Output::Print => println!("{}", timing),
            Output::Json(path) => {
                if self.json.is_none() {
                    let file = OpenOptions::new().append(true).create(true).open(path)?;
                    self.json = Some(BufWriter::new(file));
                }
                if let Some(w) = self.json.as_mut() {
                    serde_json::to_writer(&mut *w, timing)?;
                    w.write_all(b"\n")?;
                    w.flush()?;
                }
            }
        }
        Ok(())
    }
}

/// Inserts `duration` keeping the list sorted longest first and capped at [`TOP_DURATIONS`].
fn add_duration(top_durations: &mut Vec<Duration>, duration: Duration) {
    let pos = top_durations.partition_point(|&d| d >= duration);
    top_durations.insert(pos, duration);
    top_durations.truncate(TOP_DURATIONS);
}

pub struct StatsHandle {
    tx: Sender<()>,
    handle: JoinHandle<Result<()>>,
}

/// Runs [`Stats`] on its own thread until stopped or every collector is dropped.
pub fn run_stats(mut stats: Stats) -> Result<StatsHandle> {
    let (tx, kill_rx) = bounded::<()>(1);
    let rx = stats.rx.clone();
    let handle = std::thread::Builder::new()
        .name("fn_time-stats".to_owned())
        .spawn(move || -> Result<()> {
            loop {
                select! {
                    recv(rx) -> times => match times {
                        Ok(times) => stats.handle(times)?,
                        Err(_) => break,
                    },
                    recv(kill_rx) -> _ => {
                        let pending: Vec<LineDurations> = rx.try_iter().collect();
                        for times in pending {
                            stats.handle(times)?;
                        }
                        break;
                    }
                }
            }
            info!("stats stopped after {} runs", stats.visits);
            Ok(())
        })?;
    Ok(StatsHandle { tx, handle })
}

impl StatsHandle {
    pub fn stop(self) -> Result<()> {
        // the worker may already be gone if all collectors were dropped
        let _ = self.tx.send(());
        self.handle
            .join()
            .map_err(|_| Error::StatsThread("stats thread panicked".to_owned()))?
    }
}
