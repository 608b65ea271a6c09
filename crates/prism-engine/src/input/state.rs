use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current keyboard state for the window.
///
/// Queried once per frame during input processing, the way a polling
/// `get_key` call would be.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Keys currently held.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the held state.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = m;
            }

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Release events are not delivered to an unfocused window.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
            } => {
                self.modifiers = modifiers;

                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(&key);
                    }
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}
