//! Operating mode selection.
//!
//! The node boots undecided. The first button press picks sender or
//! receiver for the rest of the session; later presses do nothing.

use tokio::sync::watch;
use tracing::{debug, info};

/// The role the node plays this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Waiting for the operator to choose.
    #[default]
    Unresolved,
    /// Samples and (optionally) broadcasts.
    Sender,
    /// Listens for the peer and fuses its readings.
    Receiver,
}

impl Mode {
    /// Check if a role has been chosen.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Get a human-readable name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unresolved => "Unresolved",
            Self::Sender => "Sender",
            Self::Receiver => "Receiver",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The two operator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// Selects sender mode.
    A,
    /// Selects receiver mode.
    B,
}

impl Button {
    /// The mode this button selects.
    pub fn target_mode(&self) -> Mode {
        match self {
            Self::A => Mode::Sender,
            Self::B => Mode::Receiver,
        }
    }
}

/// Text shown while waiting for a choice.
pub const MODE_PROMPT: &str = "A=Send B=Recv";

/// Pure transition function: the mode after `button` is pressed in `current`.
pub fn next_mode(current: Mode, button: Button) -> Mode {
    match current {
        Mode::Unresolved => button.target_mode(),
        resolved => resolved,
    }
}

/// Holds the session mode and lets tasks wait for it to be chosen.
#[derive(Debug)]
pub struct ModeSelector {
    tx: watch::Sender<Mode>,
}

impl ModeSelector {
    /// Create a selector in [`Mode::Unresolved`].
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Mode::Unresolved);
        Self { tx }
    }

    /// The current mode.
    pub fn current(&self) -> Mode {
        *self.tx.borrow()
    }

    /// Check if a role has been chosen.
    pub fn is_resolved(&self) -> bool {
        self.current().is_resolved()
    }

    /// Apply a button press.
    ///
    /// Returns the newly selected mode, or `None` if a mode was already set.
    /// Check and update happen under one lock, so concurrent presses resolve
    /// to exactly one mode.
    pub fn press(&self, button: Button) -> Option<Mode> {
        let mut selected = None;

        self.tx.send_if_modified(|mode| {
            let next = next_mode(*mode, button);
            if next == *mode {
                return false;
            }
            *mode = next;
            selected = Some(next);
            true
        });

        match selected {
            Some(mode) => info!("Button {:?} selected {} mode", button, mode),
            None => debug!(
                "Button {:?} ignored, mode already {}",
                button,
                self.current()
            ),
        }

        selected
    }

    /// Wait until a role has been chosen and return it.
    pub async fn wait_resolved(&self) -> Mode {
        let mut rx = self.tx.subscribe();
        let resolved = rx.wait_for(|mode| mode.is_resolved()).await;
        match resolved {
            Ok(mode) => *mode,
            // The sender lives as long as `self`, so the channel cannot close here.
            Err(_) => self.current(),
        }
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_transition_table() {
        assert_eq!(next_mode(Mode::Unresolved, Button::A), Mode::Sender);
        assert_eq!(next_mode(Mode::Unresolved, Button::B), Mode::Receiver);
        assert_eq!(next_mode(Mode::Sender, Button::B), Mode::Sender);
        assert_eq!(next_mode(Mode::Receiver, Button::A), Mode::Receiver);
        assert_eq!(next_mode(Mode::Sender, Button::A), Mode::Sender);
    }

    #[test]
    fn test_mode_is_set_once() {
        for (first, expected) in [(Button::A, Mode::Sender), (Button::B, Mode::Receiver)] {
            let selector = ModeSelector::new();
            assert_eq!(selector.current(), Mode::Unresolved);

            assert_eq!(selector.press(first), Some(expected));
            for button in [Button::A, Button::B, Button::A, Button::B] {
                assert_eq!(selector.press(button), None);
                assert_eq!(selector.current(), expected);
            }
        }
    }

    #[tokio::test]
    async fn test_wait_resolved_unblocks() {
        let selector = Arc::new(ModeSelector::new());
        let waiter = {
            let selector = selector.clone();
            tokio::spawn(async move { selector.wait_resolved().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        selector.press(Button::B);
        assert_eq!(waiter.await.unwrap(), Mode::Receiver);
    }

    #[tokio::test]
    async fn test_wait_resolved_after_the_fact() {
        let selector = ModeSelector::new();
        selector.press(Button::A);
        assert_eq!(selector.wait_resolved().await, Mode::Sender);
    }

    #[test]
    fn test_racing_presses_pick_one_mode() {
        let selector = Arc::new(ModeSelector::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let selector = selector.clone();
                std::thread::spawn(move || {
                    let button = if i % 2 == 0 { Button::A } else { Button::B };
                    selector.press(button)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();
        assert_eq!(winners, 1);
        assert!(selector.is_resolved());
    }
}
