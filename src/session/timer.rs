//! Full-test countdown
//!
//! Two layers:
//! - [`Countdown`]: a tick-driven counter that reports expiry exactly once
//! - [`CountdownTask`]: a tokio task ticking a `Countdown` once per second and
//!   publishing events; cancelled explicitly or on drop

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

// ==================== Countdown ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
    Cancelled,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; seconds left
    Running(u64),
    /// Reached zero on this tick
    Expired,
    /// Not running (idle, already expired or cancelled)
    Inactive,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration_secs: u64,
    remaining_secs: u64,
    state: CountdownState,
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: CountdownState::Idle,
        }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(minutes.saturating_mul(60))
    }

    pub fn start(&mut self) {
        if self.state == CountdownState::Idle {
            self.state = CountdownState::Running;
        }
    }

    /// Advance one second. Expiry fires when a tick starts with one second or less left.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != CountdownState::Running {
            return TickOutcome::Inactive;
        }

        if self.remaining_secs <= 1 {
            self.remaining_secs = 0;
            self.state = CountdownState::Expired;
            return TickOutcome::Expired;
        }

        self.remaining_secs -= 1;
        TickOutcome::Running(self.remaining_secs)
    }

    /// Stop without expiring; later ticks are inert
    pub fn cancel(&mut self) {
        if matches!(self.state, CountdownState::Idle | CountdownState::Running) {
            self.state = CountdownState::Cancelled;
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// `MM:SS`; minutes keep counting past 59
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

// ==================== Scheduled task ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining_secs: u64 },
    Expired,
}

/// Handle to a running countdown task
#[derive(Debug)]
pub struct CountdownTask {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CountdownTask {
    /// Spawn a one-second countdown on the current tokio runtime
    pub fn spawn(duration_secs: u64) -> (Self, mpsc::UnboundedReceiver<CountdownEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            let mut countdown = Countdown::new(duration_secs);
            countdown.start();

            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => {
                        debug!("countdown cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let event = match countdown.tick() {
                            TickOutcome::Running(remaining_secs) => CountdownEvent::Tick { remaining_secs },
                            TickOutcome::Expired => CountdownEvent::Expired,
                            TickOutcome::Inactive => break,
                        };
                        if event_tx.send(event).is_err() || event == CountdownEvent::Expired {
                            break;
                        }
                    }
                }
            }
        });

        (
            Self {
                cancel_tx: Some(cancel_tx),
                handle,
            },
            event_rx,
        )
    }

    /// Stop the task; no events are emitted afterwards
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_expires_exactly_once() {
        let mut countdown = Countdown::new(3600);
        countdown.start();

        let mut expired = 0;
        for _ in 0..3600 {
            if countdown.tick() == TickOutcome::Expired {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(countdown.remaining_secs(), 0);

        for _ in 0..10 {
            assert_eq!(countdown.tick(), TickOutcome::Inactive);
        }
    }

    #[test]
    fn test_countdown_idle_until_started() {
        let mut countdown = Countdown::from_minutes(1);
        assert_eq!(countdown.tick(), TickOutcome::Inactive);
        assert_eq!(countdown.remaining_secs(), 60);
        countdown.start();
        assert_eq!(countdown.tick(), TickOutcome::Running(59));
    }

    #[test]
    fn test_cancelled_countdown_never_expires() {
        let mut countdown = Countdown::new(2);
        countdown.start();
        countdown.cancel();
        assert_eq!(countdown.tick(), TickOutcome::Inactive);
        assert_eq!(countdown.tick(), TickOutcome::Inactive);
        assert_eq!(countdown.state(), CountdownState::Cancelled);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(Countdown::from_minutes(60).format_remaining(), "60:00");
        assert_eq!(Countdown::new(65).format_remaining(), "01:05");
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_emits_ticks_then_expired() {
        let (_task, mut events) = CountdownTask::spawn(3);

        assert_eq!(events.recv().await, Some(CountdownEvent::Tick { remaining_secs: 2 }));
        assert_eq!(events.recv().await, Some(CountdownEvent::Tick { remaining_secs: 1 }));
        assert_eq!(events.recv().await, Some(CountdownEvent::Expired));
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_expires() {
        let (mut task, mut events) = CountdownTask::spawn(5);

        assert_eq!(events.recv().await, Some(CountdownEvent::Tick { remaining_secs: 4 }));
        task.cancel();

        while let Some(event) = events.recv().await {
            assert_ne!(event, CountdownEvent::Expired);
        }
    }
}
