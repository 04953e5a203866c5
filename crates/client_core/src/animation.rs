//! Card exit step: a one-shot completion signal awaited with a fallback
//! timeout, plus the motion description the GUI uses to draw it.

use std::time::Duration;

use shared::domain::Decision;
use tokio::sync::oneshot;
use tracing::warn;

/// Fired by the presentation layer once the exit animation has finished.
#[derive(Debug)]
pub struct ExitSignal(oneshot::Sender<()>);

impl ExitSignal {
    pub fn fire(self) {
        // The waiter may already have given up on the fallback timer.
        let _ = self.0.send(());
    }
}

#[derive(Debug)]
pub struct ExitWaiter(oneshot::Receiver<()>);

pub fn exit_signal() -> (ExitSignal, ExitWaiter) {
    let (tx, rx) = oneshot::channel();
    (ExitSignal(tx), ExitWaiter(rx))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Completed,
    /// The signal was dropped without firing.
    Dropped,
    TimedOut,
}

/// Waits for the exit signal, giving up after `fallback`. Every outcome means
/// the caller should go ahead and advance.
pub async fn await_exit(waiter: ExitWaiter, fallback: Duration) -> ExitOutcome {
    match tokio::time::timeout(fallback, waiter.0).await {
        Ok(Ok(())) => ExitOutcome::Completed,
        Ok(Err(_)) => {
            warn!("exit signal dropped before firing; advancing anyway");
            ExitOutcome::Dropped
        }
        Err(_) => {
            warn!(
                fallback_ms = fallback.as_millis() as u64,
                "exit animation never reported completion; advancing on fallback"
            );
            ExitOutcome::TimedOut
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitMotion {
    /// +1.0 leaves to the right, -1.0 to the left.
    pub direction: f32,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitFrame {
    pub offset_x: f32,
    pub rotation_rad: f32,
    pub opacity: f32,
}

impl ExitMotion {
    pub fn for_decision(decision: Decision) -> Self {
        match decision {
            Decision::Accept => Self {
                direction: 1.0,
                rotation_deg: 30.0,
            },
            Decision::Reject => Self {
                direction: -1.0,
                rotation_deg: -30.0,
            },
        }
    }

    /// Where the card sits at `progress` (0..=1), for a card `width` wide.
    /// At the end it is two card widths away and fully transparent.
    pub fn frame(&self, progress: f32, width: f32) -> ExitFrame {
        let t = progress.clamp(0.0, 1.0);
        ExitFrame {
            offset_x: self.direction * 2.0 * width * t,
            rotation_rad: self.rotation_deg.to_radians() * t,
            opacity: 1.0 - t,
        }
    }
}

/// Eased progress of an animation of length `duration` after `elapsed`.
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let linear = (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0);
    1.0 - (1.0 - linear).powi(3)
}
