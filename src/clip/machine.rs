//! Clip state machine
//!
//! One machine per on-screen clip element. The machine subscribes to its
//! key on attach and unsubscribes when dropped; in between, it transitions
//! on bus deliveries and on local user actions, and surfaces every change
//! through a watch channel so a frontend can recompute its affordance as a
//! pure function of state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::bus::{ClipBus, ClipKey, ClipUpdate, Subscription};
use crate::gateway::Commands;

use super::state::PlaybackState;

/// Per-clip state machine bound to one bus key
///
/// Dropping the machine drops its bus subscription, so no delivery can
/// reach it after teardown, on any exit path.
pub struct ClipMachine {
    key: ClipKey,
    gateway: Arc<dyn Commands>,
    state_tx: watch::Sender<PlaybackState>,
    _subscription: Subscription,
}

impl ClipMachine {
    /// Register on the bus and start from `initial`
    ///
    /// `initial` comes from the startup snapshot for elements created at
    /// load time, and is `Stopped` for elements created later. A racing
    /// stream event for the same key may re-report the snapshot's
    /// transition; applying it is idempotent.
    pub fn attach(
        bus: &Arc<ClipBus>,
        gateway: Arc<dyn Commands>,
        key: ClipKey,
        initial: PlaybackState,
    ) -> Self {
        let (state_tx, _) = watch::channel(initial);

        let remote = state_tx.clone();
        let subscription = bus.subscribe(
            key.clone(),
            Box::new(move |update: ClipUpdate| {
                remote.send_modify(|state| *state = state.apply(update.transition));
            }),
        );

        tracing::debug!(key = %key, initial = ?initial, "Clip machine attached");

        Self {
            key,
            gateway,
            state_tx,
            _subscription: subscription,
        }
    }

    /// The key this machine is bound to
    pub fn key(&self) -> &ClipKey {
        &self.key
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        *self.state_tx.borrow()
    }

    /// Observe state changes
    ///
    /// The receiver yields the current state immediately and then every
    /// subsequent change.
    pub fn watch(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// User intent: play this clip
    ///
    /// Goes optimistically `Pending` and issues the command without
    /// awaiting it; the confirming `Started` arrives through the stream.
    pub fn play(&self) {
        self.state_tx.send_modify(|state| *state = state.on_play());
        self.gateway.play(&self.key);
    }

    /// User intent: stop this clip
    ///
    /// No-op while stopped; otherwise goes `Pending` and issues the
    /// command.
    pub fn stop(&self) {
        if self.state() == PlaybackState::Stopped {
            return;
        }

        self.state_tx.send_modify(|state| *state = state.on_stop());
        self.gateway.stop(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::bus::CollectionId;

    use super::*;

    /// Records issued commands instead of sending them
    #[derive(Default)]
    pub(crate) struct FakeGateway {
        pub commands: Mutex<Vec<String>>,
    }

    impl Commands for FakeGateway {
        fn play(&self, key: &ClipKey) {
            self.commands.lock().unwrap().push(format!("play {key}"));
        }

        fn stop(&self, key: &ClipKey) {
            self.commands.lock().unwrap().push(format!("stop {key}"));
        }

        fn stop_all(&self) {
            self.commands.lock().unwrap().push("stop_all".to_string());
        }

        fn set_gain(&self, coll: &CollectionId, gain: f64) {
            self.commands
                .lock()
                .unwrap()
                .push(format!("gain {coll} {gain}"));
        }
    }

    fn setup() -> (Arc<ClipBus>, Arc<FakeGateway>) {
        (Arc::new(ClipBus::new()), Arc::new(FakeGateway::default()))
    }

    #[test]
    fn test_bus_delivery_transitions_state() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine =
            ClipMachine::attach(&bus, gateway, key.clone(), PlaybackState::Stopped);
        assert_eq!(machine.state(), PlaybackState::Stopped);

        bus.publish(&key, ClipUpdate::started(Some(4.2)));
        assert_eq!(machine.state(), PlaybackState::Started);

        bus.publish(&key, ClipUpdate::stopped());
        assert_eq!(machine.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_play_goes_pending_and_issues_command() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine = ClipMachine::attach(
            &bus,
            Arc::clone(&gateway) as Arc<dyn Commands>,
            key.clone(),
            PlaybackState::Stopped,
        );

        machine.play();
        assert_eq!(machine.state(), PlaybackState::Pending);
        assert_eq!(*gateway.commands.lock().unwrap(), ["play c1/a"]);

        // Confirmation supersedes the optimistic state.
        bus.publish(&key, ClipUpdate::started(None));
        assert_eq!(machine.state(), PlaybackState::Started);
    }

    #[test]
    fn test_stop_from_stopped_issues_nothing() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine = ClipMachine::attach(
            &bus,
            Arc::clone(&gateway) as Arc<dyn Commands>,
            key,
            PlaybackState::Stopped,
        );

        machine.stop();
        assert_eq!(machine.state(), PlaybackState::Stopped);
        assert!(gateway.commands.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drop_detaches_from_bus() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine = ClipMachine::attach(&bus, gateway, key.clone(), PlaybackState::Stopped);
        assert!(bus.is_registered(&key));

        drop(machine);
        assert!(!bus.is_registered(&key));

        // Dropped, not queued.
        bus.publish(&key, ClipUpdate::started(None));
    }

    #[tokio::test]
    async fn test_watch_observes_every_change() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine = ClipMachine::attach(&bus, gateway, key.clone(), PlaybackState::Stopped);
        let mut rx = machine.watch();
        assert_eq!(*rx.borrow_and_update(), PlaybackState::Stopped);

        machine.play();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PlaybackState::Pending);

        bus.publish(&key, ClipUpdate::started(None));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PlaybackState::Started);
    }

    #[test]
    fn test_pending_without_confirmation_stays_pending() {
        let (bus, gateway) = setup();
        let key = ClipKey::new("c1", "a");

        let machine = ClipMachine::attach(&bus, gateway, key, PlaybackState::Started);
        machine.stop();

        // No confirming event ever arrives; the state is stuck by design.
        assert_eq!(machine.state(), PlaybackState::Pending);
    }
}
