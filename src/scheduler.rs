// Copyright (c) 2026 rezky_nightky

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// What the scheduler drives. `idle` waits for host events until the next
/// frame is due; `frame` renders one frame. An error from either halts the
/// loop.
pub trait FrameDriver {
    type Error;

    fn idle(&mut self, timeout: Duration, stop: &StopHandle) -> Result<(), Self::Error>;
    fn frame(&mut self) -> Result<(), Self::Error>;
}

/// Cloneable switch that ends a running loop after its current frame.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn start(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct FrameScheduler {
    period: Option<Duration>,
    limit: Option<Duration>,
    running: StopHandle,
}

impl FrameScheduler {
    /// `None` runs frames back to back.
    pub fn new(fps: Option<f64>) -> Self {
        let period = fps
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| Duration::from_secs_f64(1.0 / f));
        Self {
            period,
            limit: None,
            running: StopHandle::default(),
        }
    }

    /// Stops the loop once `limit` has elapsed since `run` began.
    pub fn with_limit(mut self, limit: Option<Duration>) -> Self {
        self.limit = limit;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    pub fn stop(&self) {
        self.running.stop();
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Runs frames until stopped, the time limit passes, or the driver fails.
    /// Returns the number of frames rendered.
    pub fn run<D: FrameDriver>(&mut self, driver: &mut D) -> Result<u64, D::Error> {
        self.running.start();
        info!(period = ?self.period, limit = ?self.limit, "frame loop started");
        let result = self.drive(driver);
        self.stop();
        match &result {
            Ok(frames) => info!(frames, "frame loop stopped"),
            Err(_) => debug!("frame loop halted by driver error"),
        }
        result
    }

    fn drive<D: FrameDriver>(&mut self, driver: &mut D) -> Result<u64, D::Error> {
        let started = Instant::now();
        let end = self.limit.map(|l| started + l);
        let mut next_frame = started;
        let mut frames: u64 = 0;

        while self.is_running() {
            let now = Instant::now();
            if end.is_some_and(|end| now >= end) {
                break;
            }

            let mut timeout = next_frame.saturating_duration_since(now);
            if let Some(end) = end {
                timeout = timeout.min(end.saturating_duration_since(now));
            }
            driver.idle(timeout, &self.running)?;

            if !self.is_running() || Instant::now() < next_frame {
                continue;
            }

            driver.frame()?;
            frames += 1;

            let now = Instant::now();
            next_frame = match self.period {
                Some(period) => (next_frame + period).max(now),
                None => now,
            };
        }

        Ok(frames)
    }
}
