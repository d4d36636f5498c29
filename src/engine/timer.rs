// Gameplay timers driven by the fixed update

use log::trace;

/// Slack when comparing elapsed time against a duration, in seconds
///
/// Deltas like 1/60 are not exact in binary, so N steps of `duration / N`
/// may sum to a hair under `duration`.
const FIRE_TOLERANCE: f64 = 1e-6;

/// Handle to a timer scheduled on a [`TimerManager`]
///
/// Handles are never reused, so a stale handle simply stops matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    duration: f64,
    /// Accumulated in f64 so long runs of small steps don't drift
    elapsed: f64,
    looping: bool,
}

impl Timer {
    fn is_due(&self) -> bool {
        self.elapsed + FIRE_TOLERANCE >= self.duration
    }
}

/// Owns every running timer and advances them by the simulation delta
///
/// Timers do not call back into their owners. `tick` returns the handles
/// that fired and the owner matches them against the handles it holds.
#[derive(Debug, Default)]
pub struct TimerManager {
    timers: Vec<Timer>,
    next_handle: u64,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer firing after `duration` seconds
    ///
    /// A non-positive duration schedules nothing and returns `None`.
    pub fn set_timer(&mut self, duration: f32, looping: bool) -> Option<TimerHandle> {
        if duration <= 0.0 || !duration.is_finite() {
            return None;
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            duration: f64::from(duration),
            elapsed: 0.0,
            looping,
        });

        trace!("Timer {:?} set for {:.3}s (looping: {})", handle, duration, looping);
        Some(handle)
    }

    /// Cancel a timer. Returns true if it was still active.
    pub fn clear_timer(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        before != self.timers.len()
    }

    /// Check whether a timer is still pending
    pub fn is_timer_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Seconds left before the timer fires
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.find(handle)
            .map(|t| (t.duration - t.elapsed).max(0.0) as f32)
    }

    /// Seconds since the timer was set (or last fired, for looping timers)
    pub fn elapsed(&self, handle: TimerHandle) -> Option<f32> {
        self.find(handle).map(|t| t.elapsed as f32)
    }

    /// Number of pending timers
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance all timers and return the handles that fired this tick
    ///
    /// A looping timer fires at most once per tick.
    pub fn tick(&mut self, dt: f32) -> Vec<TimerHandle> {
        let mut fired = Vec::new();

        for timer in &mut self.timers {
            timer.elapsed += f64::from(dt);
            if timer.is_due() {
                fired.push(timer.handle);
                if timer.looping {
                    timer.elapsed = (timer.elapsed - timer.duration).max(0.0) % timer.duration;
                }
            }
        }

        self.timers.retain(|t| t.looping || !t.is_due());

        fired
    }

    fn find(&self, handle: TimerHandle) -> Option<&Timer> {
        self.timers.iter().find(|t| t.handle == handle)
    }
}
