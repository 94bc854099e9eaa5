use alloc::vec::Vec;
use core::time::Duration;

use log::{debug, info, warn};

use crate::{
    display::DisplaySink,
    error::{Error, Result},
    framebuffer::FrameBuffer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Complete,
    /// The last run was aborted by a sink error, its samples were dropped.
    Failed,
}

/// Aggregate of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchReport {
    pub trials: usize,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub total: Duration,
}

impl BenchReport {
    fn from_samples(samples: &[Duration]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let total: Duration = samples.iter().sum();
        let mean = Duration::from_nanos((total.as_nanos() / samples.len() as u128) as u64);
        Some(BenchReport {
            trials: samples.len(),
            mean,
            min,
            max,
            total,
        })
    }
}

/// Pushes the same frame through a sink over and over and times it.
///
/// Trials run back to back and the frame is never touched in between. A
/// run either completes every trial or reports nothing.
pub struct BlitBenchmark {
    state: State,
    samples: Vec<Duration>,
    discarded: usize,
}

impl Default for BlitBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl BlitBenchmark {
    pub fn new() -> Self {
        BlitBenchmark {
            state: State::Idle,
            samples: Vec::new(),
            discarded: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Per-trial timings in call order. Empty unless the last run completed.
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// How many samples the last failed run threw away.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn mean(&self) -> Option<Duration> {
        self.report().map(|report| report.mean)
    }

    pub fn report(&self) -> Option<BenchReport> {
        match self.state {
            State::Complete => BenchReport::from_samples(&self.samples),
            _ => None,
        }
    }

    pub fn run<S: DisplaySink + ?Sized>(
        &mut self,
        sink: &mut S,
        frame: &FrameBuffer<'_>,
        trials: usize,
    ) -> Result<BenchReport> {
        self.samples.clear();
        self.discarded = 0;
        if trials == 0 {
            self.state = State::Idle;
            return Err(Error::InvalidTrialCount);
        }

        info!("Starting {} trials on {:?}", trials, frame);
        self.state = State::Running;
        self.samples.reserve(trials);
        for trial in 0..trials {
            match sink.show(frame) {
                Ok(elapsed) => {
                    debug!("Trial {}: {:?}", trial, elapsed);
                    self.samples.push(elapsed);
                }
                Err(e) => {
                    warn!("Trial {} failed: {}", trial, e);
                    self.discarded = self.samples.len();
                    self.samples.clear();
                    self.state = State::Failed;
                    return Err(e);
                }
            }
        }

        self.state = State::Complete;
        let report = BenchReport::from_samples(&self.samples).ok_or(Error::InvalidTrialCount)?;
        info!(
            "Average blit time over {} trials: {:?} (min {:?}, max {:?})",
            report.trials, report.mean, report.min, report.max
        );
        Ok(report)
    }
}
