//! The Action Gateway capability consumed by both input cores.
//!
//! The game page exposes a single object through which the overlay reads the
//! current phase, reads the action legality mask, and fires actions. This
//! module pins that surface down as the [`ActionGateway`] trait plus the
//! bit-exact action-index layout of the game's action space.
//!
//! The gateway is an optional dependency: the page may not have injected it
//! yet, or the game may have torn it down. Callers hold
//! `Option<Arc<dyn ActionGateway>>` and treat absence as "nothing is legal".

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Game phase as reported by the gateway. Side-effect-free to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unknown,
    Shop,
    Combat,
    PortalSelect,
    PickPokemon,
    PickItem,
    Carousel,
    GameOver,
}

/// Legality mask: entry `i` is 1 iff action `i` is currently legal.
///
/// Fetched fresh on every execution attempt — it may change between frames,
/// so it is never cached across calls.
pub type ActionMask = Vec<u8>;

/// Narrow capability surface of the game page.
///
/// All three operations are synchronous with bounded latency; `exec` is only
/// safe to call when the mask marks the index legal, which is exactly what
/// [`crate::guard::GuardedExecutor`] enforces.
pub trait ActionGateway: Send + Sync {
    /// Current game phase.
    fn phase(&self) -> Phase;

    /// Current legality mask, or `None` when the game cannot provide one.
    fn mask(&self) -> Option<ActionMask>;

    /// Fire the action at `index`. No return contract beyond "fires".
    fn exec(&self, index: usize);
}

/// Shared handle type used throughout the crate.
pub type GatewayHandle = Option<Arc<dyn ActionGateway>>;

/// Action-index layout of the game's action space.
///
/// These offsets are constants of the external game; if the action space is
/// ever versioned, this module is the one place to parameterize.
pub mod actions {
    /// Total size of the action space.
    pub const ACTION_SPACE: usize = 92;

    /// Indices 0..=5: buy the shop slot equal to the index.
    pub const BUY_BASE: usize = 0;
    /// Reroll the shop.
    pub const REROLL: usize = 6;
    /// Buy a level.
    pub const LEVEL_UP: usize = 7;
    /// Lock the shop for next turn.
    pub const LOCK_SHOP: usize = 8;
    /// End the current turn.
    pub const END_TURN: usize = 9;
    /// Indices 74..=79: remove the unit at shop slot `index - REMOVE_BASE`.
    pub const REMOVE_BASE: usize = 74;
    /// Indices 80..=85: take pick choice `index - PICK_BASE`.
    pub const PICK_BASE: usize = 80;

    /// Width of the contiguous pick-choice window starting at [`PICK_BASE`].
    pub const PICK_WINDOW: usize = 6;

    /// Default number of shop slots (and width of the buy/remove windows).
    pub const DEFAULT_SHOP_SLOTS: usize = 6;
}
