//! Game session: one engine plus the presentation layers watching it.
//!
//! A [`Session`] owns a [`GameState`], applies [`Command`]s to it and publishes a fresh
//! [`GameSnapshot`] to every subscriber whenever a command changed what is visible.
//! Subscribers are notified synchronously, after the command has fully resolved.

use log::{debug, warn};

use tetris_engine_core::{ConfigError, EngineConfig, GameSnapshot, GameState};
use tetris_engine_types::Command;

/// Receives a snapshot after every command that changed the game
pub trait SnapshotObserver {
    fn on_snapshot(&mut self, snapshot: &GameSnapshot);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(&GameSnapshot),
{
    fn on_snapshot(&mut self, snapshot: &GameSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`Session::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

pub struct Session {
    state: GameState,
    current: GameSnapshot,
    observers: Vec<(SubscriptionId, Box<dyn SnapshotObserver>)>,
    next_subscription: usize,
}

impl Session {
    /// Create a session in the menu state.
    ///
    /// Fails when the configured board is outside the supported size range.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        GameState::try_new(config).map(Self::from_state)
    }

    /// Session configured from `TETRIS_*` environment variables.
    ///
    /// Invalid variables are logged and replaced by the defaults.
    pub fn from_env() -> Self {
        let config = EngineConfig::from_env().unwrap_or_else(|err| {
            warn!("ignoring invalid engine configuration: {}", err);
            EngineConfig::default()
        });
        Self::from_state(GameState::new(config))
    }

    fn from_state(state: GameState) -> Self {
        let current = state.snapshot();
        Self {
            state,
            current,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Apply one command and notify subscribers if the visible state changed.
    ///
    /// Returns whether the engine accepted the command.
    pub fn apply(&mut self, command: Command) -> bool {
        let accepted = self.state.apply(command);
        debug!("{} -> {}", command.as_str(), accepted);

        let snapshot = self.state.snapshot();
        if snapshot != self.current {
            self.current = snapshot;
            self.publish();
        }
        accepted
    }

    /// Apply a sequence of commands in order
    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = Command>) -> usize {
        commands
            .into_iter()
            .filter(|&command| self.apply(command))
            .count()
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.current
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Register an observer; it does not receive the current snapshot until the next change
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn publish(&mut self) {
        for (_, observer) in &mut self.observers {
            observer.on_snapshot(&self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use tetris_engine_types::{Difficulty, GameStatus};

    fn session() -> Session {
        Session::new(EngineConfig::new(Difficulty::Normal, 7)).unwrap()
    }

    #[test]
    fn new_session_starts_in_menu() {
        let session = session();
        assert_eq!(session.snapshot().status, GameStatus::Menu);
        assert!(session.snapshot().active.is_none());
    }

    #[test]
    fn rejects_invalid_dimensions() {
        let config = EngineConfig::new(Difficulty::Normal, 7).with_dimensions(3, 20);
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::WidthOutOfRange(3))
        ));
    }

    #[test]
    fn observers_see_changes_only() {
        let mut session = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |snap: &GameSnapshot| sink.borrow_mut().push(snap.status));

        // Rejected in the menu: nothing changes, nothing is published.
        assert!(!session.apply(Command::Pause));
        assert!(seen.borrow().is_empty());

        assert!(session.apply(Command::Start));
        assert!(session.apply(Command::Pause));
        assert!(!session.apply(Command::MoveLeft));
        assert_eq!(*seen.borrow(), vec![GameStatus::Playing, GameStatus::Paused]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut session = session();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = session.subscribe(move |_: &GameSnapshot| *sink.borrow_mut() += 1);

        session.apply(Command::Start);
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.apply(Command::HardDrop);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(session.observer_count(), 0);
    }

    #[test]
    fn snapshot_tracks_engine() {
        let mut session = session();
        let accepted = session.apply_all([Command::Start, Command::HardDrop, Command::Resume]);
        assert_eq!(accepted, 2);
        assert_eq!(session.snapshot(), &session.state().snapshot());
        assert!(session.snapshot().score > 0);
    }
}
