//! Guarded action execution.
//!
//! Every game-affecting action from either input core passes through
//! [`GuardedExecutor::execute`]: fetch the legality mask fresh, check the
//! requested index, and only then touch the gateway. Exactly one of
//! `ActionBlocked` or `ActionExecuted` is emitted per call, and the gateway's
//! `exec` is invoked at most once, only on the legal path.

use crate::gateway::{GatewayHandle, Phase};
use crate::protocol::{BlockReason, Notification};
use tokio::sync::mpsc::UnboundedSender;

/// Highest action index reserved for buy-at-shop-slot actions.
const BUY_RANGE_END: usize = 5;

/// Shared choke point for action dispatch. Cheap to clone; both input cores
/// hold one so the mask-check and reason-classification logic exists once.
#[derive(Clone)]
pub struct GuardedExecutor {
    gateway: GatewayHandle,
    notify: UnboundedSender<Notification>,
}

impl GuardedExecutor {
    pub fn new(gateway: GatewayHandle, notify: UnboundedSender<Notification>) -> Self {
        Self { gateway, notify }
    }

    /// Attempt the action at `index` against the live mask.
    pub fn execute(&self, index: usize) {
        let Some(gateway) = self.gateway.as_ref() else {
            self.blocked(index, BlockReason::NoRoom);
            return;
        };

        let Some(mask) = gateway.mask() else {
            self.blocked(index, BlockReason::NoRoom);
            return;
        };

        if mask.get(index).copied() != Some(1) {
            // Phase is fetched fresh here, not cached from an earlier tick.
            self.blocked(index, classify(index, gateway.phase()));
            return;
        }

        gateway.exec(index);
        let _ = self.notify.send(Notification::ActionExecuted { index });
    }

    fn blocked(&self, index: usize, reason: BlockReason) {
        log::debug!("action {index} blocked: {reason:?}");
        let _ = self.notify.send(Notification::ActionBlocked { index, reason });
    }
}

/// Infer why an action was masked off.
///
/// The gateway reports no rejection reason, so this is a heuristic from the
/// current phase and the index range: outside an action-taking phase the
/// answer is the phase itself; a masked-off buy slot during shop is almost
/// always gold.
pub fn classify(index: usize, phase: Phase) -> BlockReason {
    match phase {
        Phase::Combat | Phase::GameOver | Phase::Carousel | Phase::PortalSelect => {
            BlockReason::WrongPhase
        }
        _ if index <= BUY_RANGE_END => BlockReason::CantAfford,
        _ => BlockReason::Invalid,
    }
}
