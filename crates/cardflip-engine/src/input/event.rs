use crate::coords::Vec2;

/// Keys with a meaning in a carousel window.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Button {
    Primary,
    Secondary,
    Other,
}

/// Direction of a key or button transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Press {
    Down,
    Up,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved(Vec2),
    PointerLeft,
    /// Carries its own position so a click is hit-tested where it happened.
    Button { button: Button, press: Press, at: Vec2 },
    /// `repeat` marks auto-repeat while a key is held.
    Key { key: Key, press: Press, repeat: bool },
    Focus(bool),
}

impl InputEvent {
    pub fn key_down(key: Key) -> Self {
        Self::Key { key, press: Press::Down, repeat: false }
    }

    pub fn key_up(key: Key) -> Self {
        Self::Key { key, press: Press::Up, repeat: false }
    }

    pub fn primary(press: Press, at: Vec2) -> Self {
        Self::Button { button: Button::Primary, press, at }
    }
}
