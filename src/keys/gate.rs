//! The keybind hot path.
//!
//! [`KeyGate::handle`] runs on every keydown in the document, so the cheap
//! modifier gate comes before anything else. Events that resolve to a
//! binding are consumed; everything else passes through so unbound
//! Alt-combos keep their default browser behavior.

use crate::gateway::GatewayHandle;
use crate::guard::GuardedExecutor;
use crate::keys::bindings::{Binding, BindingTable};
use crate::keys::layout::KeyInput;
use crate::protocol::Notification;
use tokio::sync::mpsc::UnboundedSender;

/// What the embedder should do with the keydown after the gate saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Prevent the default browser handling.
    Consumed,
    /// Leave the event to the browser.
    Pass,
}

/// The keybind input core.
pub struct KeyGate {
    guard: GuardedExecutor,
    notify: UnboundedSender<Notification>,
    bindings: BindingTable,
    capture_mode: bool,
    enabled: bool,
}

impl KeyGate {
    pub fn new(
        gateway: GatewayHandle,
        notify: UnboundedSender<Notification>,
        bindings: BindingTable,
    ) -> Self {
        Self {
            guard: GuardedExecutor::new(gateway, notify.clone()),
            notify,
            bindings,
            capture_mode: false,
            enabled: true,
        }
    }

    /// Replace the binding table wholesale.
    pub fn replace_bindings(&mut self, table: BindingTable) {
        log::debug!("binding table replaced, {} entries", table.len());
        self.bindings = table;
    }

    /// While capture mode is on, combos are recorded for the binding
    /// configuration UI instead of being executed.
    pub fn set_capture_mode(&mut self, active: bool) {
        self.capture_mode = active;
    }

    pub fn capture_mode(&self) -> bool {
        self.capture_mode
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Process one keydown.
    pub fn handle(&mut self, event: &KeyInput) -> KeyDisposition {
        // Cheapest rejection first: this runs on every keystroke on the page.
        if !event.alt {
            return KeyDisposition::Pass;
        }
        if !self.enabled {
            return KeyDisposition::Pass;
        }

        let Some(combo) = event.combo() else {
            return KeyDisposition::Pass;
        };

        if self.capture_mode {
            // Always consume while the user is choosing a new binding, even
            // for combos that are not currently bound.
            let _ = self.notify.send(Notification::ComboCaptured { combo });
            return KeyDisposition::Consumed;
        }

        match self.bindings.get(&combo) {
            None => KeyDisposition::Pass,
            Some(Binding::Exec { index }) => {
                self.guard.execute(*index);
                KeyDisposition::Consumed
            }
            Some(Binding::UiAction { event: ui_event }) => {
                let _ = self.notify.send(Notification::UiNavigate {
                    event: ui_event.clone(),
                });
                KeyDisposition::Consumed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{actions, Phase};
    use crate::protocol::BlockReason;
    use crate::sim::SimGateway;
    use std::sync::Arc;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn alt_key(code: &str) -> KeyInput {
        KeyInput {
            code: code.to_string(),
            ctrl: false,
            alt: true,
            shift: false,
            meta: false,
        }
    }

    fn gate_with(
        gateway: &Arc<SimGateway>,
        bindings: BindingTable,
    ) -> (KeyGate, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = KeyGate::new(Some(Arc::clone(gateway) as _), tx, bindings);
        (gate, rx)
    }

    fn exec_table(combo: &str, index: usize) -> BindingTable {
        let mut table = BindingTable::new();
        table.insert(combo, Binding::Exec { index });
        table
    }

    #[test]
    fn keys_without_the_modifier_pass_through_untouched() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let (mut gate, mut rx) = gate_with(&gateway, exec_table("a", 0));

        let mut event = alt_key("KeyA");
        event.alt = false;
        assert_eq!(gate.handle(&event), KeyDisposition::Pass);
        assert!(gateway.exec_calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unbound_combo_is_not_consumed() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let (mut gate, mut rx) = gate_with(&gateway, BindingTable::new());

        assert_eq!(gate.handle(&alt_key("KeyQ")), KeyDisposition::Pass);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unresolvable_physical_key_is_not_consumed() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let (mut gate, _rx) = gate_with(&gateway, BindingTable::new());

        assert_eq!(gate.handle(&alt_key("NumLock")), KeyDisposition::Pass);
    }

    #[test]
    fn exec_binding_runs_the_guarded_path() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[actions::REROLL]));
        let (mut gate, mut rx) = gate_with(&gateway, exec_table("alt+r", actions::REROLL));

        assert_eq!(gate.handle(&alt_key("KeyR")), KeyDisposition::Consumed);
        assert_eq!(gateway.exec_calls(), vec![actions::REROLL]);
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ActionExecuted {
                index: actions::REROLL
            }
        );
    }

    #[test]
    fn blocked_exec_binding_is_still_consumed() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Combat, &[]));
        let (mut gate, mut rx) = gate_with(&gateway, exec_table("alt+l", actions::LEVEL_UP));

        assert_eq!(gate.handle(&alt_key("KeyL")), KeyDisposition::Consumed);
        assert!(gateway.exec_calls().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ActionBlocked {
                index: actions::LEVEL_UP,
                reason: BlockReason::WrongPhase,
            }
        );
    }

    #[test]
    fn ui_action_binding_never_touches_the_gateway() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let mut table = BindingTable::new();
        table.insert(
            "alt+o",
            Binding::UiAction {
                event: "open_settings".to_string(),
            },
        );
        let (mut gate, mut rx) = gate_with(&gateway, table);

        assert_eq!(gate.handle(&alt_key("KeyO")), KeyDisposition::Consumed);
        assert!(gateway.exec_calls().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::UiNavigate {
                event: "open_settings".to_string()
            }
        );
    }

    #[test]
    fn capture_mode_records_instead_of_executing() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[actions::REROLL]));
        let (mut gate, mut rx) = gate_with(&gateway, exec_table("alt+r", actions::REROLL));
        gate.set_capture_mode(true);

        // Bound and unbound combos alike are captured and consumed.
        assert_eq!(gate.handle(&alt_key("KeyR")), KeyDisposition::Consumed);
        assert_eq!(gate.handle(&alt_key("KeyQ")), KeyDisposition::Consumed);

        assert!(gateway.exec_calls().is_empty());
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ComboCaptured {
                combo: "alt+r".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ComboCaptured {
                combo: "alt+q".to_string()
            }
        );
    }

    #[test]
    fn replacing_bindings_is_wholesale() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0, actions::REROLL]));
        let (mut gate, _rx) = gate_with(&gateway, exec_table("alt+1", 0));

        gate.replace_bindings(exec_table("alt+r", actions::REROLL));

        // Old binding gone, new one live.
        assert_eq!(gate.handle(&alt_key("Digit1")), KeyDisposition::Pass);
        assert_eq!(gate.handle(&alt_key("KeyR")), KeyDisposition::Consumed);
        assert_eq!(gateway.exec_calls(), vec![actions::REROLL]);
    }

    #[test]
    fn disabled_gate_passes_everything() {
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let (mut gate, _rx) = gate_with(&gateway, exec_table("alt+1", 0));
        gate.set_enabled(false);

        assert_eq!(gate.handle(&alt_key("Digit1")), KeyDisposition::Pass);
        assert!(gateway.exec_calls().is_empty());
    }
}
