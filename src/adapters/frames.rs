use crate::domain::ports::FrameClock;
use std::time::Duration;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

/// Frame clock on a tokio interval. Late frames are skipped, not bunched.
pub struct TokioFrameClock {
    epoch: Instant,
    frames: Interval,
}

impl TokioFrameClock {
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        let mut frames = interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            epoch: Instant::now(),
            frames,
        }
    }

    pub fn period(&self) -> Duration {
        self.frames.period()
    }
}

impl FrameClock for TokioFrameClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    async fn next_frame(&mut self) -> Option<Duration> {
        let tick = self.frames.tick().await;
        Some(tick.duration_since(self.epoch))
    }
}
