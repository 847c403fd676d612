//! Fixed-duration counter animation.
//!
//! A run samples the frame clock once at start, then on every frame maps the
//! elapsed time through a cubic ease-out and reports the floored value. The
//! last reported value is always exactly the target.

use crate::core::easing;
use crate::domain::model::{CounterState, RunOutcome};
use crate::domain::ports::FrameClock;
use crate::utils::error::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedCounter {
    target: u64,
    duration: Duration,
}

impl TimedCounter {
    /// Non-positive durations collapse to zero and complete on the first step.
    pub fn new(target: u64, duration_ms: i64) -> Self {
        let duration = if duration_ms > 0 {
            Duration::from_millis(duration_ms as u64)
        } else {
            Duration::ZERO
        };
        Self { target, duration }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Eased value after `elapsed`, without the final snap to target.
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        easing::eased_value(self.target, easing::progress(elapsed, self.duration))
    }

    /// Drives the run to a terminal state, calling `on_update` once per frame.
    pub async fn run<C, F>(&self, clock: &mut C, mut on_update: F, cancel: &mut CancelToken) -> RunOutcome
    where
        C: FrameClock,
        F: FnMut(u64),
    {
        if cancel.is_cancelled() {
            return RunOutcome::Cancelled { last_value: 0 };
        }

        if self.duration.is_zero() {
            tracing::debug!(counter_target = self.target, "counter has no duration, completing immediately");
            on_update(self.target);
            return RunOutcome::Completed { frames: 0 };
        }

        let started_at = clock.now();
        let mut last_value = 0;
        let mut frames = 0u32;
        tracing::debug!(
            counter_target = self.target,
            duration_ms = self.duration.as_millis() as u64,
            "counter started"
        );

        loop {
            let frame = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(counter_target = self.target, last_value, "counter cancelled");
                    return RunOutcome::Cancelled { last_value };
                }
                frame = clock.next_frame() => frame,
            };

            let Some(timestamp) = frame else {
                tracing::debug!(counter_target = self.target, last_value, "frame source ended, counter stalled");
                return RunOutcome::Stalled { last_value };
            };
            frames = frames.saturating_add(1);

            // 時間戳可能早於起點或倒退
            let elapsed = timestamp.saturating_sub(started_at);
            if easing::progress(elapsed, self.duration) >= 1.0 {
                on_update(self.target);
                tracing::debug!(counter_target = self.target, frames, "counter complete");
                return RunOutcome::Completed { frames };
            }

            let value = self.value_at(elapsed).max(last_value);
            on_update(value);
            last_value = value;
        }
    }

    /// Runs on its own tokio task. Dropping the handle leaves the run going.
    pub fn spawn<C, F>(self, mut clock: C, mut on_update: F) -> CounterHandle
    where
        C: FrameClock + 'static,
        F: FnMut(u64) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(CounterState::Pending);
        let mut cancel = CancelToken { rx: cancel_rx };

        let task = tokio::spawn(async move {
            state_tx.send_replace(CounterState::Running);
            let outcome = self.run(&mut clock, &mut on_update, &mut cancel).await;
            state_tx.send_replace(outcome.state());
            outcome
        });

        CounterHandle {
            cancel_tx,
            state_rx,
            task,
        }
    }
}

/// Read side of a cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Token whose owner already went away, so it never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

pub struct CounterHandle {
    cancel_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<CounterState>,
    task: JoinHandle<RunOutcome>,
}

impl CounterHandle {
    /// Stops future ticks. No further values are reported after this returns
    /// and the run observes it.
    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn state(&self) -> CounterState {
        *self.state_rx.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the run reaches a terminal state.
    pub async fn settled(&self) -> CounterState {
        let mut rx = self.state_rx.clone();
        let settled = rx.wait_for(|state| state.is_terminal()).await.map(|state| *state);
        // 任務異常結束時 sender 已被丟棄
        settled.unwrap_or_else(|_| self.state())
    }

    pub async fn finished(self) -> Result<RunOutcome> {
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedClock {
        now: Duration,
        frames: VecDeque<Duration>,
    }

    impl ScriptedClock {
        fn new(frames_ms: &[u64]) -> Self {
            Self {
                now: Duration::ZERO,
                frames: frames_ms.iter().map(|ms| Duration::from_millis(*ms)).collect(),
            }
        }
    }

    impl FrameClock for ScriptedClock {
        fn now(&self) -> Duration {
            self.now
        }

        async fn next_frame(&mut self) -> Option<Duration> {
            self.frames.pop_front()
        }
    }

    async fn collect(counter: TimedCounter, frames_ms: &[u64]) -> (Vec<u64>, RunOutcome) {
        let mut clock = ScriptedClock::new(frames_ms);
        let mut values = Vec::new();
        let outcome = counter
            .run(&mut clock, |v| values.push(v), &mut CancelToken::never())
            .await;
        (values, outcome)
    }

    #[tokio::test]
    async fn test_midpoint_and_final_value() {
        let (values, outcome) = collect(TimedCounter::new(1000, 2000), &[1000, 2000]).await;
        assert_eq!(values, vec![875, 1000]);
        assert_eq!(outcome, RunOutcome::Completed { frames: 2 });
    }

    #[tokio::test]
    async fn test_final_value_is_exact_target_under_overshoot() {
        let (values, outcome) = collect(TimedCounter::new(12345, 300), &[16, 120, 317]).await;
        assert_eq!(values.last(), Some(&12345));
        assert_eq!(values.iter().filter(|v| **v == 12345).count(), 1);
        assert_eq!(outcome, RunOutcome::Completed { frames: 3 });
    }

    #[tokio::test]
    async fn test_non_positive_duration_completes_immediately() {
        for duration in [0, -50] {
            let (values, outcome) = collect(TimedCounter::new(500, duration), &[]).await;
            assert_eq!(values, vec![500]);
            assert_eq!(outcome, RunOutcome::Completed { frames: 0 });
        }
    }

    #[tokio::test]
    async fn test_jittery_frames_never_decrease() {
        let (values, _) = collect(TimedCounter::new(777, 1000), &[100, 400, 350, 600, 590, 1200]).await;
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "{:?}", values);
        assert_eq!(values.last(), Some(&777));
    }

    #[tokio::test]
    async fn test_frame_before_start_counts_as_zero_elapsed() {
        let mut clock = ScriptedClock::new(&[50, 2000]);
        clock.now = Duration::from_millis(100);
        let mut values = Vec::new();
        let outcome = TimedCounter::new(1000, 2000)
            .run(&mut clock, |v| values.push(v), &mut CancelToken::never())
            .await;
        assert_eq!(values[0], 0);
        assert!(matches!(outcome, RunOutcome::Stalled { .. }));
    }

    #[tokio::test]
    async fn test_stalls_when_frames_stop() {
        let (values, outcome) = collect(TimedCounter::new(1000, 2000), &[1000]).await;
        assert_eq!(values, vec![875]);
        assert_eq!(outcome, RunOutcome::Stalled { last_value: 875 });
    }

    #[tokio::test]
    async fn test_cancelled_token_emits_nothing() {
        let (_tx, rx) = watch::channel(true);
        let mut cancel = CancelToken { rx };
        let mut clock = ScriptedClock::new(&[1000, 2000]);
        let mut values = Vec::new();
        let outcome = TimedCounter::new(1000, 2000)
            .run(&mut clock, |v| values.push(v), &mut cancel)
            .await;
        assert!(values.is_empty());
        assert_eq!(outcome, RunOutcome::Cancelled { last_value: 0 });
    }

    #[tokio::test]
    async fn test_zero_target_stays_zero() {
        let (values, _) = collect(TimedCounter::new(0, 100), &[50, 100]).await;
        assert_eq!(values, vec![0, 0]);
    }
}
