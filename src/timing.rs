use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use tracing::warn;

/// (line, time since the previous spot) for one run of a timed function
pub type LineDurations = VecDeque<(u32, Duration)>;

/// Records `line!()` into an [`FnTime`].
#[macro_export]
macro_rules! capture {
    ($fnt:expr) => {
        $fnt.capture(line!())
    };
}

#[derive(Debug, Clone, Copy)]
pub struct Spot {
    pub line: u32,
    pub when: Instant,
}

impl Spot {
    pub fn capture(line: u32) -> Self {
        Self {
            line,
            when: Instant::now(),
        }
    }
}

/// Spot slots for one timed function. Filled by `capture`, emptied by `make_durations`.
#[derive(Debug)]
pub struct FnTime {
    spots: Vec<Option<Spot>>,
    current_spot: usize,
}

impl FnTime {
    pub fn new(num_spots: usize) -> Self {
        Self {
            spots: vec![None; num_spots],
            current_spot: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.spots.len()
    }

    pub fn captured(&self) -> usize {
        self.current_spot
    }

    pub fn capture(&mut self, line: u32) {
        match self.spots.get_mut(self.current_spot) {
            Some(slot) => {
                *slot = Some(Spot::capture(line));
                self.current_spot += 1;
            }
            None => warn!(
                "all {} spots used, dropping capture of line {}",
                self.spots.len(),
                line
            ),
        }
    }

    /// The first spot gets a zero duration, every later spot the time since its predecessor.
    pub fn make_durations(&mut self) -> LineDurations {
        let mut times = LineDurations::with_capacity(self.current_spot);
        let mut last: Option<Instant> = None;
        for spot in self.spots.iter_mut().filter_map(Option::take) {
            let duration = last.map_or(Duration::ZERO, |l| spot.when.duration_since(l));
            times.push_back((spot.line, duration));
            last = Some(spot.when);
        }
        self.current_spot = 0;
        times
    }
}
