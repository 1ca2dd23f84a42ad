use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::coords::Vec2;
use crate::input::{Button, InputEvent, Key, Press};

/// Maps a winit event onto the input model; `None` for everything else.
///
/// `pointer` is the last known pointer position, used for button events
/// since winit does not attach one.
pub(crate) fn translate_window_event(
    window: &Window,
    pointer: Option<Vec2>,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::CursorMoved { position, .. } => {
            let p = position.to_logical::<f32>(window.scale_factor());
            InputEvent::PointerMoved(Vec2::new(p.x, p.y))
        }
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::MouseInput { state, button, .. } => InputEvent::Button {
            button: match button {
                MouseButton::Left => Button::Primary,
                MouseButton::Right => Button::Secondary,
                _ => Button::Other,
            },
            press: press(*state),
            // NaN hits nothing, so an unplaced click only pauses.
            at: pointer.unwrap_or(Vec2::NAN),
        },
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: map_key(event.physical_key),
            press: press(event.state),
            repeat: event.repeat,
        },
        WindowEvent::Focused(focused) => InputEvent::Focus(*focused),
        _ => return None,
    };
    Some(ev)
}

fn press(state: ElementState) -> Press {
    match state {
        ElementState::Pressed => Press::Down,
        ElementState::Released => Press::Up,
    }
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) => Key::ArrowLeft,
        PhysicalKey::Code(KeyCode::ArrowRight) => Key::ArrowRight,
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        _ => Key::Other,
    }
}
