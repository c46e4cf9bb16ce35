//! Gamepad input core: fixed-cadence polling, edge detection, and
//! hold-to-repeat timing.

pub mod poller;
pub mod repeat;

// Modules outside this crate should prefer importing from `crate::pad`
// rather than reaching into submodules.
pub use poller::{buttons, PadPoller, PadSample, PadSource, BUTTON_CHANNELS, TICK_INTERVAL};
pub use repeat::{RepeatFire, RepeatManager, INITIAL_DELAY, REPEAT_INTERVAL};
