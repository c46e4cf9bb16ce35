//! Hold-to-repeat timing for directional buttons.
//!
//! A sustained D-pad press becomes a repeating cursor-move stream: nothing
//! for an initial delay, then one fire per steady interval until release,
//! context change, or global cancellation. Deadlines are plain `Instant`s
//! advanced by [`RepeatManager::tick`], so entries cannot outlive their
//! owner and there are no timer handles to leak.
//!
//! Every tick re-checks that the context captured when the hold started
//! still matches the live one. The context-change handler also cancels all
//! entries; the self-check covers the window where a repeat deadline elapses
//! between throttled context detections.

use crate::protocol::InputContext;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Delay between the initial press-move and the start of repeating.
pub const INITIAL_DELAY: Duration = Duration::from_millis(400);
/// Steady-state interval between repeat fires.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepeatPhase {
    /// Waiting out the initial delay; the deadline elapsing fires nothing.
    Delay,
    /// Repeating; each elapsed deadline fires one move.
    Steady,
}

#[derive(Debug)]
struct RepeatEntry {
    delta: i64,
    captured_context: InputContext,
    next_deadline: Instant,
    phase: RepeatPhase,
}

/// One cursor move produced by an elapsed repeat deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatFire {
    pub button: usize,
    pub delta: i64,
}

/// Tracks at most one active repeat per physical direction button.
#[derive(Debug)]
pub struct RepeatManager {
    entries: HashMap<usize, RepeatEntry>,
    initial_delay: Duration,
    interval: Duration,
}

impl RepeatManager {
    pub fn new() -> Self {
        Self::with_timing(INITIAL_DELAY, REPEAT_INTERVAL)
    }

    /// Custom timing, primarily for tests.
    pub fn with_timing(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            initial_delay,
            interval,
        }
    }

    /// Start a hold for `button`, replacing any active hold for it outright
    /// so there is never a doubled-up timer for one physical button.
    pub fn arm(&mut self, button: usize, delta: i64, context: InputContext, now: Instant) {
        self.entries.insert(
            button,
            RepeatEntry {
                delta,
                captured_context: context,
                next_deadline: now + self.initial_delay,
                phase: RepeatPhase::Delay,
            },
        );
    }

    /// Cancel the hold for one button. Safe to call when none is active.
    pub fn cancel(&mut self, button: usize) {
        self.entries.remove(&button);
    }

    /// Cancel every hold. Idempotent.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_armed(&self, button: usize) -> bool {
        self.entries.contains_key(&button)
    }

    /// Advance all holds to `now`, returning the moves to apply.
    ///
    /// Holds whose captured context no longer matches `current_context`
    /// terminate themselves here without firing.
    pub fn tick(&mut self, now: Instant, current_context: InputContext) -> Vec<RepeatFire> {
        let mut fires = Vec::new();
        self.entries.retain(|&button, entry| {
            if entry.captured_context != current_context {
                return false;
            }
            if now >= entry.next_deadline {
                match entry.phase {
                    RepeatPhase::Delay => {
                        entry.phase = RepeatPhase::Steady;
                        entry.next_deadline = now + self.interval;
                    }
                    RepeatPhase::Steady => {
                        fires.push(RepeatFire {
                            button,
                            delta: entry.delta,
                        });
                        entry.next_deadline = now + self.interval;
                    }
                }
            }
            true
        });
        fires
    }
}

impl Default for RepeatManager {
    fn default() -> Self {
        Self::new()
    }
}
