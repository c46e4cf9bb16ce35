//! Scriptable stand-ins for the page capabilities.
//!
//! The real gateway and controller live in the game page; these doubles back
//! the simulation binary and the test suite. Both are shared-handle types so
//! a script can mutate phase, mask, or button state while the poller holds
//! its own reference.

use crate::gateway::{actions, ActionGateway, ActionMask, Phase};
use crate::pad::{PadSample, PadSource, BUTTON_CHANNELS};
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory Action Gateway with scriptable phase and mask.
pub struct SimGateway {
    phase: Mutex<Phase>,
    mask: Mutex<Option<ActionMask>>,
    exec_calls: Mutex<Vec<usize>>,
}

impl SimGateway {
    pub fn new(phase: Phase, mask: Option<ActionMask>) -> Self {
        Self {
            phase: Mutex::new(phase),
            mask: Mutex::new(mask),
            exec_calls: Mutex::new(Vec::new()),
        }
    }

    /// Full-size mask with exactly the given indices legal.
    pub fn legal_at(phase: Phase, indices: &[usize]) -> Self {
        let mut mask = vec![0u8; actions::ACTION_SPACE];
        for &i in indices {
            mask[i] = 1;
        }
        Self::new(phase, Some(mask))
    }

    pub fn set_phase(&self, phase: Phase) {
        *self.phase.lock() = phase;
    }

    pub fn set_mask(&self, mask: Option<ActionMask>) {
        *self.mask.lock() = mask;
    }

    /// Every index fired through `exec`, in call order.
    pub fn exec_calls(&self) -> Vec<usize> {
        self.exec_calls.lock().clone()
    }
}

impl ActionGateway for SimGateway {
    fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    fn mask(&self) -> Option<ActionMask> {
        self.mask.lock().clone()
    }

    fn exec(&self, index: usize) {
        self.exec_calls.lock().push(index);
    }
}

/// Controller whose button state is mutated from outside the poller.
///
/// Cloning shares the underlying state, so a script keeps one handle while
/// the poller owns another.
#[derive(Clone, Default)]
pub struct SharedPad {
    sample: Arc<Mutex<Option<PadSample>>>,
}

impl SharedPad {
    /// No device connected.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Device connected with every button released.
    pub fn connected() -> Self {
        Self {
            sample: Arc::new(Mutex::new(Some([false; BUTTON_CHANNELS]))),
        }
    }

    /// Hold `button` down, connecting the device if necessary.
    pub fn press(&self, button: usize) {
        let mut guard = self.sample.lock();
        let sample = guard.get_or_insert([false; BUTTON_CHANNELS]);
        sample[button] = true;
    }

    pub fn release(&self, button: usize) {
        if let Some(sample) = self.sample.lock().as_mut() {
            sample[button] = false;
        }
    }

    pub fn release_all(&self) {
        if let Some(sample) = self.sample.lock().as_mut() {
            *sample = [false; BUTTON_CHANNELS];
        }
    }

    pub fn disconnect(&self) {
        *self.sample.lock() = None;
    }
}

impl PadSource for SharedPad {
    fn sample(&mut self) -> Option<PadSample> {
        *self.sample.lock()
    }
}
