//! Protocol definitions shared between the input cores and the overlay UI.
//!
//! Outbound [`Notification`]s are fire-and-forget broadcasts consumed by the
//! widget panels; inbound [`ControlMessage`]s arrive from the settings UI.
//! Both are serde-tagged so the extension bridge can ship them as JSON.

use crate::keys::bindings::BindingTable;
use serde::{Deserialize, Serialize};

/// Which input-mapping table is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputContext {
    Shop,
    Pick,
    Disabled,
}

/// Advisory reason attached to a blocked action.
///
/// This is a heuristic classification, not an authoritative cause — the
/// gateway reports no rejection reason, so the executor infers one from the
/// phase and index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Gateway or mask unavailable.
    NoRoom,
    /// Current phase does not accept this class of action.
    WrongPhase,
    /// Buy-slot index was legal-shaped but masked off.
    CantAfford,
    /// Anything else.
    Invalid,
}

/// Fire-and-forget notifications broadcast to the overlay panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ContextChanged {
        context: InputContext,
    },
    CursorMoved {
        context: InputContext,
        index: usize,
    },
    ActionBlocked {
        index: usize,
        reason: BlockReason,
    },
    ActionExecuted {
        index: usize,
    },
    DeviceConnected,
    DeviceDisconnected,
    /// Emitted instead of executing while binding-capture mode is active.
    ComboCaptured {
        combo: String,
    },
    /// A `ui_action` binding fired; the event name is opaque to this core.
    UiNavigate {
        event: String,
    },
}

/// Inbound control messages from the settings UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    SetEnabled { enabled: bool },
    SetMaxShopSlots { slots: usize },
    /// Wholesale replacement — bindings are never partially merged.
    ReplaceBindings { table: BindingTable },
    SetCaptureMode { active: bool },
    DeviceConnected,
    DeviceDisconnected,
    Shutdown,
}
