mod bus;
mod event;

use std::collections::{HashMap, HashSet};

pub use bus::{EventBus, Handler};
pub use event::{Event, EventKind, Key, Modifiers, MouseButton};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyState {
    Pressed,
    Released,
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct ScrollState {
    x: f32,
    y: f32,
}

/// Input state accumulated from the events of the current frame.
#[derive(Debug)]
pub struct InputSystem {
    focused: bool,

    keyboard: HashMap<Key, KeyState>,
    buttons: HashSet<MouseButton>,
    cursor: (f64, f64),
    scroll_state: ScrollState,
}

impl Default for InputSystem {
    fn default() -> Self {
        // a window starts out focused until told otherwise
        Self {
            focused: true,
            keyboard: HashMap::new(),
            buttons: HashSet::new(),
            cursor: (0.0, 0.0),
            scroll_state: ScrollState::default(),
        }
    }
}

impl InputSystem {
    pub fn new() -> Self {
        Default::default()
    }

    /// Clears per-frame state. Called once the frame has been rendered.
    pub fn reset(&mut self) {
        self.scroll_state = ScrollState::default();
    }

    pub fn on_event(&mut self, event: &Event) {
        // handle focus state early
        match event {
            Event::WindowGainFocus => {
                self.focused = true;
                return;
            }
            Event::WindowLoseFocus => {
                self.focused = false;
                // when losing focus, reset states
                self.keyboard.clear();
                self.buttons.clear();
                self.scroll_state = ScrollState::default();
                return;
            }
            _ => {}
        }

        // bail out if we are not focused
        if !self.focused {
            return;
        }

        match *event {
            Event::KeyPress { key, .. } | Event::KeyRepeat { key, .. } => {
                self.keyboard.insert(key, KeyState::Pressed);
            }
            Event::KeyRelease { key, .. } => {
                self.keyboard.insert(key, KeyState::Released);
            }
            Event::ButtonPress { button, .. } => {
                self.buttons.insert(button);
            }
            Event::ButtonRelease { button, .. } => {
                self.buttons.remove(&button);
            }
            Event::CursorMove { x, y } => self.cursor = (x, y),
            Event::Scroll { x, y } => {
                if x != 0.0 {
                    self.scroll_state.x = x.signum() as f32;
                }
                if y != 0.0 {
                    self.scroll_state.y = y.signum() as f32;
                }
            }
            _ => {}
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        matches!(self.keyboard.get(&key), Some(KeyState::Pressed))
    }

    pub fn is_key_released(&self, key: Key) -> bool {
        !self.is_key_pressed(key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn mouse_scroll_x(&self) -> f32 {
        self.scroll_state.x
    }

    pub fn mouse_scroll_y(&self) -> f32 {
        self.scroll_state.y
    }
}
