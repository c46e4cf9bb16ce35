//! Engine tying the two input cores together.
//!
//! [`InputEngine`] owns one [`PadPoller`] and one [`KeyGate`] per page
//! injection, applies inbound control messages from the settings UI, and
//! offers an async driver that supplies the fixed-cadence poll ticks.
//!
//! Key events are handled through the synchronous [`InputEngine::handle_key`]
//! because the embedder needs the consumed/pass disposition before the
//! browser default fires; everything else flows through channels.

use crate::gateway::GatewayHandle;
use crate::keys::{BindingTable, KeyDisposition, KeyGate, KeyInput};
use crate::pad::{PadPoller, PadSource, TICK_INTERVAL};
use crate::protocol::{ControlMessage, Notification};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{Receiver, UnboundedSender};

/// One input engine per page-injection lifetime.
pub struct InputEngine {
    pad: PadPoller,
    keys: KeyGate,
    notify: UnboundedSender<Notification>,
}

impl InputEngine {
    /// Wire up both cores. A controller that was already connected before
    /// the page loaded starts the poller immediately.
    pub fn new(
        source: Box<dyn PadSource>,
        gateway: GatewayHandle,
        bindings: BindingTable,
        notify: UnboundedSender<Notification>,
    ) -> Self {
        let mut pad = PadPoller::new(source, gateway.clone(), notify.clone());
        if pad.device_present() {
            log::info!("controller already connected at boot");
            pad.start();
            let _ = notify.send(Notification::DeviceConnected);
        }
        let keys = KeyGate::new(gateway, notify.clone(), bindings);
        Self { pad, keys, notify }
    }

    /// Override repeat timing, primarily for tests.
    pub fn with_repeat_timing(mut self, initial_delay: Duration, interval: Duration) -> Self {
        self.pad = self.pad.with_repeat_timing(initial_delay, interval);
        self
    }

    pub fn pad(&self) -> &PadPoller {
        &self.pad
    }

    /// Advance the gamepad core one poll tick.
    pub fn tick(&mut self, now: Instant) {
        self.pad.tick(now);
    }

    /// Route one keydown through the key gate.
    pub fn handle_key(&mut self, event: &KeyInput) -> KeyDisposition {
        self.keys.handle(event)
    }

    /// Apply one control message. Returns `false` on shutdown.
    pub fn apply(&mut self, msg: ControlMessage) -> bool {
        match msg {
            ControlMessage::SetEnabled { enabled } => {
                log::info!("input cores {}", if enabled { "enabled" } else { "disabled" });
                self.pad.set_enabled(enabled);
                self.keys.set_enabled(enabled);
            }
            ControlMessage::SetMaxShopSlots { slots } => {
                self.pad.set_max_shop_slots(slots);
            }
            ControlMessage::ReplaceBindings { table } => {
                self.keys.replace_bindings(table);
            }
            ControlMessage::SetCaptureMode { active } => {
                self.keys.set_capture_mode(active);
            }
            ControlMessage::DeviceConnected => {
                self.pad.start();
                let _ = self.notify.send(Notification::DeviceConnected);
            }
            ControlMessage::DeviceDisconnected => {
                self.pad.stop();
                let _ = self.notify.send(Notification::DeviceDisconnected);
            }
            ControlMessage::Shutdown => return false,
        }
        true
    }

    /// Drive poll ticks at the default cadence and drain control messages
    /// until shutdown or until the control channel closes.
    pub async fn run(mut self, mut control_rx: Receiver<ControlMessage>) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.pad.tick(Instant::now()),
                msg = control_rx.recv() => match msg {
                    Some(msg) => {
                        if !self.apply(msg) {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        log::info!("input engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Phase;
    use crate::keys::Binding;
    use crate::protocol::InputContext;
    use crate::sim::{SharedPad, SimGateway};
    use std::sync::Arc;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn engine_with_pad(
        pad: &SharedPad,
        gateway: &Arc<SimGateway>,
    ) -> (InputEngine, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = InputEngine::new(
            Box::new(pad.clone()),
            Some(Arc::clone(gateway) as _),
            BindingTable::new(),
            tx,
        );
        (engine, rx)
    }

    #[test]
    fn boots_running_when_a_device_is_already_connected() {
        let pad = SharedPad::connected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (engine, mut rx) = engine_with_pad(&pad, &gateway);

        assert!(engine.pad().is_running());
        assert_eq!(rx.try_recv().unwrap(), Notification::DeviceConnected);
    }

    #[test]
    fn boots_stopped_without_a_device() {
        let pad = SharedPad::disconnected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (engine, mut rx) = engine_with_pad(&pad, &gateway);

        assert!(!engine.pad().is_running());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn connect_and_disconnect_messages_toggle_the_poller() {
        let pad = SharedPad::disconnected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (mut engine, mut rx) = engine_with_pad(&pad, &gateway);

        assert!(engine.apply(ControlMessage::DeviceConnected));
        assert!(engine.pad().is_running());
        assert_eq!(rx.try_recv().unwrap(), Notification::DeviceConnected);

        assert!(engine.apply(ControlMessage::DeviceDisconnected));
        assert!(!engine.pad().is_running());
        assert_eq!(rx.try_recv().unwrap(), Notification::DeviceDisconnected);
    }

    #[test]
    fn shutdown_message_stops_application() {
        let pad = SharedPad::connected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (mut engine, _rx) = engine_with_pad(&pad, &gateway);

        assert!(!engine.apply(ControlMessage::Shutdown));
    }

    #[test]
    fn disable_applies_to_both_cores() {
        let pad = SharedPad::connected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[0]));
        let (mut engine, _rx) = engine_with_pad(&pad, &gateway);

        let mut table = BindingTable::new();
        table.insert("alt+1", Binding::Exec { index: 0 });
        engine.apply(ControlMessage::ReplaceBindings { table });
        engine.apply(ControlMessage::SetEnabled { enabled: false });

        // Key gate passes bound combos through while disabled.
        let event = KeyInput {
            code: "Digit1".to_string(),
            ctrl: false,
            alt: true,
            shift: false,
            meta: false,
        };
        assert_eq!(engine.handle_key(&event), KeyDisposition::Pass);

        // Pad ticks are inert while disabled.
        for _ in 0..20 {
            engine.tick(Instant::now());
        }
        assert_eq!(engine.pad().context(), InputContext::Disabled);
        assert!(gateway.exec_calls().is_empty());
    }

    #[tokio::test]
    async fn run_loop_exits_on_shutdown() {
        let pad = SharedPad::connected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (engine, _rx) = engine_with_pad(&pad, &gateway);

        let (control_tx, control_rx) = mpsc::channel(4);
        let driver = tokio::spawn(engine.run(control_rx));

        control_tx.send(ControlMessage::Shutdown).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), driver)
            .await
            .expect("driver did not shut down")
            .unwrap();
    }

    #[tokio::test]
    async fn run_loop_exits_when_control_channel_closes() {
        let pad = SharedPad::connected();
        let gateway = Arc::new(SimGateway::legal_at(Phase::Shop, &[]));
        let (engine, _rx) = engine_with_pad(&pad, &gateway);

        let (control_tx, control_rx) = mpsc::channel::<ControlMessage>(4);
        let driver = tokio::spawn(engine.run(control_rx));
        drop(control_tx);

        tokio::time::timeout(Duration::from_secs(1), driver)
            .await
            .expect("driver did not shut down")
            .unwrap();
    }
}
