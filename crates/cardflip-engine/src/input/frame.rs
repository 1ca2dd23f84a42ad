use crate::coords::Vec2;

use super::event::{Button, InputEvent, Key, Press};

/// Input that arrived since the last frame, in arrival order.
///
/// The runtime clears it after every frame callback.
#[derive(Debug, Default)]
pub struct InputFrame {
    events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// A fresh press of `key` this frame. Auto-repeat does not count.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.events.iter().any(|ev| {
            matches!(*ev, InputEvent::Key { key: k, press: Press::Down, repeat: false } if k == key)
        })
    }

    /// Where `button` went down this frame.
    pub fn presses(&self, button: Button) -> impl Iterator<Item = Vec2> + '_ {
        self.events.iter().filter_map(move |ev| match *ev {
            InputEvent::Button { button: b, press: Press::Down, at } if b == button => Some(at),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_not_presses() {
        let mut frame = InputFrame::default();
        frame.push(InputEvent::Key { key: Key::ArrowRight, press: Press::Down, repeat: true });
        assert!(!frame.key_pressed(Key::ArrowRight));

        frame.push(InputEvent::key_down(Key::ArrowRight));
        assert!(frame.key_pressed(Key::ArrowRight));
        assert!(!frame.key_pressed(Key::ArrowLeft));
    }

    #[test]
    fn presses_filter_by_button_and_direction() {
        let mut frame = InputFrame::default();
        frame.push(InputEvent::primary(Press::Down, Vec2::new(1.0, 2.0)));
        frame.push(InputEvent::primary(Press::Up, Vec2::new(1.0, 2.0)));
        frame.push(InputEvent::Button { button: Button::Secondary, press: Press::Down, at: Vec2::ZERO });
        frame.push(InputEvent::primary(Press::Down, Vec2::new(5.0, 6.0)));

        let at: Vec<Vec2> = frame.presses(Button::Primary).collect();
        assert_eq!(at, vec![Vec2::new(1.0, 2.0), Vec2::new(5.0, 6.0)]);
    }
}
