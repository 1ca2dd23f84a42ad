use std::collections::HashSet;

use crate::coords::Vec2;

use super::event::{Button, InputEvent, Key, Press};
use super::frame::InputFrame;

/// What is held and where the pointer is, between frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Logical position; `None` while the pointer is outside the window.
    pub pointer: Option<Vec2>,
    pub focused: bool,
    keys: HashSet<Key>,
    buttons: HashSet<Button>,
}

impl InputState {
    /// Folds `event` into the held state and records it in `frame`.
    ///
    /// A down transition for something already held is reported as a repeat,
    /// so a press that straddles a focus change is not counted twice.
    pub fn apply_event(&mut self, frame: &mut InputFrame, event: InputEvent) {
        let event = match event {
            InputEvent::PointerMoved(p) => {
                self.pointer = Some(p);
                event
            }
            InputEvent::PointerLeft => {
                self.pointer = None;
                event
            }
            InputEvent::Focus(focused) => {
                self.focused = focused;
                if !focused {
                    self.keys.clear();
                    self.buttons.clear();
                }
                event
            }
            InputEvent::Key { key, press, repeat } => {
                let fresh = match press {
                    Press::Down => self.keys.insert(key),
                    Press::Up => self.keys.remove(&key),
                };
                InputEvent::Key { key, press, repeat: repeat || !fresh }
            }
            InputEvent::Button { button, press, at } => {
                self.pointer = Some(at);
                match press {
                    Press::Down => {
                        self.buttons.insert(button);
                    }
                    Press::Up => {
                        self.buttons.remove(&button);
                    }
                }
                event
            }
        };
        frame.push(event);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn button_down(&self, button: Button) -> bool {
        self.buttons.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_reports_single_press() {
        let mut st = InputState::default();
        let mut frame = InputFrame::default();

        st.apply_event(&mut frame, InputEvent::key_down(Key::ArrowRight));
        assert!(frame.key_pressed(Key::ArrowRight));
        frame.clear();

        st.apply_event(&mut frame, InputEvent::key_down(Key::ArrowRight));
        assert!(!frame.key_pressed(Key::ArrowRight));
        assert!(st.key_down(Key::ArrowRight));

        st.apply_event(&mut frame, InputEvent::key_up(Key::ArrowRight));
        assert!(!st.key_down(Key::ArrowRight));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut st = InputState::default();
        let mut frame = InputFrame::default();

        st.apply_event(&mut frame, InputEvent::key_down(Key::Escape));
        st.apply_event(&mut frame, InputEvent::primary(Press::Down, Vec2::new(4.0, 4.0)));
        st.apply_event(&mut frame, InputEvent::Focus(false));

        assert!(!st.key_down(Key::Escape));
        assert!(!st.button_down(Button::Primary));
    }

    #[test]
    fn clicks_move_the_pointer() {
        let mut st = InputState::default();
        let mut frame = InputFrame::default();

        st.apply_event(&mut frame, InputEvent::primary(Press::Down, Vec2::new(10.0, 20.0)));
        assert_eq!(st.pointer, Some(Vec2::new(10.0, 20.0)));

        st.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(st.pointer, None);
    }
}
