//! Gamepad polling, edge detection, and context-aware button routing.
//!
//! [`PadPoller`] is advanced by an external fixed-cadence driver calling
//! [`PadPoller::tick`] with the current instant — it never sleeps or
//! schedules on its own, which keeps the whole core deterministic under
//! test. Each tick samples the first connected device, derives press and
//! release edges against the previous sample, and routes press edges through
//! the mapping table of the active input context.

use crate::context::{context_for_phase, pick_slot_count};
use crate::gateway::{actions, GatewayHandle};
use crate::guard::GuardedExecutor;
use crate::pad::repeat::RepeatManager;
use crate::protocol::{InputContext, Notification};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Number of button channels sampled per tick.
pub const BUTTON_CHANNELS: usize = 16;
/// Default poll cadence — one display refresh at 60Hz.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Context detection runs once per this many ticks.
const CONTEXT_DETECT_EVERY: u64 = 10;

/// Snapshot of one device's button channels, pressed = `true`.
pub type PadSample = [bool; BUTTON_CHANNELS];

/// Source of raw controller state. `None` means no device is connected.
pub trait PadSource: Send {
    fn sample(&mut self) -> Option<PadSample>;
}

/// Standard-mapping button channel assignments.
pub mod buttons {
    /// Confirm: buy at cursor in shop, take choice at cursor in pick.
    pub const SOUTH: usize = 0;
    /// Lock the shop.
    pub const EAST: usize = 1;
    /// Remove the unit at the shop cursor.
    pub const WEST: usize = 2;
    /// Reroll the shop.
    pub const NORTH: usize = 3;
    /// Buy a level.
    pub const LEFT_SHOULDER: usize = 4;
    /// End the turn.
    pub const START: usize = 9;
    pub const DPAD_UP: usize = 12;
    pub const DPAD_DOWN: usize = 13;
    pub const DPAD_LEFT: usize = 14;
    pub const DPAD_RIGHT: usize = 15;

    pub const DPAD: [usize; 4] = [DPAD_UP, DPAD_DOWN, DPAD_LEFT, DPAD_RIGHT];
}

/// The gamepad input core.
pub struct PadPoller {
    source: Box<dyn PadSource>,
    gateway: GatewayHandle,
    guard: GuardedExecutor,
    notify: UnboundedSender<Notification>,
    repeat: RepeatManager,
    running: bool,
    enabled: bool,
    tick_count: u64,
    prev: PadSample,
    context: InputContext,
    shop_cursor: usize,
    pick_cursor: usize,
    pick_count: usize,
    max_shop_slots: usize,
}

impl PadPoller {
    pub fn new(
        source: Box<dyn PadSource>,
        gateway: GatewayHandle,
        notify: UnboundedSender<Notification>,
    ) -> Self {
        let guard = GuardedExecutor::new(gateway.clone(), notify.clone());
        Self {
            source,
            gateway,
            guard,
            notify,
            repeat: RepeatManager::new(),
            running: false,
            enabled: true,
            tick_count: 0,
            prev: [false; BUTTON_CHANNELS],
            context: InputContext::Disabled,
            shop_cursor: 0,
            pick_cursor: 0,
            pick_count: 0,
            max_shop_slots: actions::DEFAULT_SHOP_SLOTS,
        }
    }

    /// Override repeat timing, primarily for tests.
    pub fn with_repeat_timing(mut self, initial_delay: Duration, interval: Duration) -> Self {
        self.repeat = RepeatManager::with_timing(initial_delay, interval);
        self
    }

    /// Begin routing ticks. No-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        log::debug!("pad poller started");
        self.running = true;
    }

    /// Stop routing: cancels every repeat hold and clears press-state
    /// history so a reconnect starts edge detection fresh instead of
    /// producing a spurious release edge from stale state.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        log::debug!("pad poller stopped");
        self.running = false;
        self.repeat.cancel_all();
        self.prev = [false; BUTTON_CHANNELS];
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Disabling kills outstanding repeats immediately; ticks keep arriving
    /// so re-enabling is cheap.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.repeat.cancel_all();
        }
        self.enabled = enabled;
    }

    pub fn set_max_shop_slots(&mut self, slots: usize) {
        // A zero slot count would make the wrap arithmetic divide by zero.
        self.max_shop_slots = slots.max(1);
    }

    /// True when the source currently reports a connected device.
    pub fn device_present(&mut self) -> bool {
        self.source.sample().is_some()
    }

    pub fn context(&self) -> InputContext {
        self.context
    }

    pub fn shop_cursor(&self) -> usize {
        self.shop_cursor
    }

    pub fn pick_cursor(&self) -> usize {
        self.pick_cursor
    }

    /// Advance one poll tick.
    pub fn tick(&mut self, now: Instant) {
        if !self.running || !self.enabled {
            return;
        }
        let Some(sample) = self.source.sample() else {
            return;
        };

        self.tick_count += 1;
        if self.tick_count % CONTEXT_DETECT_EVERY == 0 {
            self.detect_context();
        }

        for button in 0..BUTTON_CHANNELS {
            match (self.prev[button], sample[button]) {
                (false, true) => self.on_press(button, now),
                (true, false) => self.on_release(button),
                _ => {}
            }
        }
        self.prev = sample;

        for fire in self.repeat.tick(now, self.context) {
            self.move_cursor(fire.delta);
        }
    }

    /// Sample the phase signal and switch contexts when it moved.
    ///
    /// Re-detecting the current context is a strict no-op, which is what
    /// makes the tick throttle safe.
    fn detect_context(&mut self) {
        let Some(gateway) = self.gateway.as_ref() else {
            return;
        };
        let next = context_for_phase(gateway.phase());
        if next == self.context {
            return;
        }

        log::debug!("input context {:?} -> {:?}", self.context, next);
        // Stale repeats must never fire into the new context.
        self.repeat.cancel_all();
        self.context = next;
        let _ = self
            .notify
            .send(Notification::ContextChanged { context: next });

        match next {
            InputContext::Shop => {
                let _ = self.notify.send(Notification::CursorMoved {
                    context: InputContext::Shop,
                    index: self.shop_cursor,
                });
            }
            InputContext::Pick => {
                self.pick_cursor = 0;
                self.pick_count = pick_slot_count(gateway.mask().as_ref());
                let _ = self.notify.send(Notification::CursorMoved {
                    context: InputContext::Pick,
                    index: 0,
                });
            }
            InputContext::Disabled => {}
        }
    }

    fn on_press(&mut self, button: usize, now: Instant) {
        match self.context {
            InputContext::Disabled => {}
            InputContext::Shop => self.press_shop(button, now),
            InputContext::Pick => self.press_pick(button, now),
        }
    }

    fn press_shop(&mut self, button: usize, now: Instant) {
        match button {
            buttons::DPAD_LEFT => self.press_direction(button, -1, now),
            buttons::DPAD_RIGHT => self.press_direction(button, 1, now),
            buttons::SOUTH => self.guard.execute(actions::BUY_BASE + self.shop_cursor),
            buttons::WEST => self.guard.execute(actions::REMOVE_BASE + self.shop_cursor),
            buttons::NORTH => self.guard.execute(actions::REROLL),
            buttons::EAST => self.guard.execute(actions::LOCK_SHOP),
            buttons::LEFT_SHOULDER => self.guard.execute(actions::LEVEL_UP),
            buttons::START => self.guard.execute(actions::END_TURN),
            _ => {}
        }
    }

    /// During a pick only cursor movement and confirm are honored.
    fn press_pick(&mut self, button: usize, now: Instant) {
        match button {
            buttons::DPAD_LEFT => self.press_direction(button, -1, now),
            buttons::DPAD_RIGHT => self.press_direction(button, 1, now),
            buttons::SOUTH => self.guard.execute(actions::PICK_BASE + self.pick_cursor),
            _ => {}
        }
    }

    fn press_direction(&mut self, button: usize, delta: i64, now: Instant) {
        self.move_cursor(delta);
        self.repeat.arm(button, delta, self.context, now);
    }

    fn on_release(&mut self, button: usize) {
        if buttons::DPAD.contains(&button) {
            self.repeat.cancel(button);
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        match self.context {
            InputContext::Shop => self.move_shop_cursor(delta),
            InputContext::Pick => self.move_pick_cursor(delta),
            InputContext::Disabled => {}
        }
    }

    fn move_shop_cursor(&mut self, delta: i64) {
        let len = self.max_shop_slots as i64;
        self.shop_cursor = (self.shop_cursor as i64 + delta).rem_euclid(len) as usize;
        let _ = self.notify.send(Notification::CursorMoved {
            context: self.context,
            index: self.shop_cursor,
        });
    }

    fn move_pick_cursor(&mut self, delta: i64) {
        // Zero choices means nothing to wrap into; stay put, emit nothing.
        if self.pick_count == 0 {
            return;
        }
        let len = self.pick_count as i64;
        self.pick_cursor = (self.pick_cursor as i64 + delta).rem_euclid(len) as usize;
        let _ = self.notify.send(Notification::CursorMoved {
            context: InputContext::Pick,
            index: self.pick_cursor,
        });
    }
}
