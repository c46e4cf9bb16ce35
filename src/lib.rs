//! # padgate - input routing and gating core
//!
//! Input plumbing for a browser-overlay companion to a web auto-battler:
//! a gamepad poller and a keybind gate translate raw input into cursor
//! movement and game-action requests, every one of which passes through a
//! mask-checked guarded executor before it may touch the game.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`gateway`] - The Action Gateway capability trait and action layout
//! - [`protocol`] - Outbound notifications and inbound control messages
//! - [`context`] - Phase-to-context mapping and pick-slot counting
//! - [`guard`] - Guarded action execution shared by both cores
//! - [`pad`] - Gamepad core: polling, edge detection, hold-to-repeat
//! - [`keys`] - Keybind core: layout canonicalization, bindings, hot path
//! - [`engine`] - Per-page engine and async driver
//! - [`sim`] - Scriptable capability stand-ins for tests and the sim binary

// Core modules
pub mod context;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod protocol;

// Input cores
pub mod keys;
pub mod pad;

// Coordination and tooling
pub mod engine;
pub mod sim;

// Re-export commonly used types for convenience
pub use error::{PadgateError, Result};

// Public API surface for external usage
pub use engine::InputEngine;
pub use gateway::{ActionGateway, GatewayHandle, Phase};
pub use keys::{Binding, BindingTable, KeyDisposition, KeyInput};
pub use pad::{PadPoller, PadSample, PadSource};
pub use protocol::{BlockReason, ControlMessage, InputContext, Notification};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
