use bitflags::bitflags;

/// Platform key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u32);

impl Key {
    pub const SPACE: Key = Key(32);
    pub const A: Key = Key(65);
    pub const D: Key = Key(68);
    pub const E: Key = Key(69);
    pub const Q: Key = Key(81);
    pub const S: Key = Key(83);
    pub const W: Key = Key(87);
    pub const Z: Key = Key(90);
    pub const ESCAPE: Key = Key(256);
    pub const RIGHT: Key = Key(262);
    pub const LEFT: Key = Key(263);
    pub const DOWN: Key = Key(264);
    pub const UP: Key = Key(265);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseButton(pub u8);

impl MouseButton {
    pub const LEFT: MouseButton = MouseButton(0);
    pub const RIGHT: MouseButton = MouseButton(1);
    pub const MIDDLE: MouseButton = MouseButton(2);
}

bitflags! {
    /// Modifier keys held while an input event happened.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const SUPER = 0b0000_1000;
        const CAPS_LOCK = 0b0001_0000;
        const NUM_LOCK = 0b0010_0000;
    }
}

/// Every event the platform layer can deliver to the application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    KeyPress {
        key: Key,
        scancode: i32,
        modifiers: Modifiers,
    },
    KeyRelease {
        key: Key,
        scancode: i32,
        modifiers: Modifiers,
    },
    KeyRepeat {
        key: Key,
        scancode: i32,
        modifiers: Modifiers,
    },
    ButtonPress {
        button: MouseButton,
        modifiers: Modifiers,
    },
    ButtonRelease {
        button: MouseButton,
        modifiers: Modifiers,
    },
    CursorMove {
        x: f64,
        y: f64,
    },
    CursorEnter,
    CursorLeave,
    Scroll {
        x: f64,
        y: f64,
    },
    WindowClose,
    WindowResize {
        width: u32,
        height: u32,
    },
    WindowMove {
        x: i32,
        y: i32,
    },
    WindowGainFocus,
    WindowLoseFocus,
    WindowIconify,
    WindowRestore,
    WindowMaximize,
    WindowRefresh,
}

/// Tag identifying an [`Event`] variant, used as the subscription key of the
/// event bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    KeyRepeat,
    ButtonPress,
    ButtonRelease,
    CursorMove,
    CursorEnter,
    CursorLeave,
    Scroll,
    WindowClose,
    WindowResize,
    WindowMove,
    WindowGainFocus,
    WindowLoseFocus,
    WindowIconify,
    WindowRestore,
    WindowMaximize,
    WindowRefresh,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::KeyPress { .. } => EventKind::KeyPress,
            Event::KeyRelease { .. } => EventKind::KeyRelease,
            Event::KeyRepeat { .. } => EventKind::KeyRepeat,
            Event::ButtonPress { .. } => EventKind::ButtonPress,
            Event::ButtonRelease { .. } => EventKind::ButtonRelease,
            Event::CursorMove { .. } => EventKind::CursorMove,
            Event::CursorEnter => EventKind::CursorEnter,
            Event::CursorLeave => EventKind::CursorLeave,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::WindowClose => EventKind::WindowClose,
            Event::WindowResize { .. } => EventKind::WindowResize,
            Event::WindowMove { .. } => EventKind::WindowMove,
            Event::WindowGainFocus => EventKind::WindowGainFocus,
            Event::WindowLoseFocus => EventKind::WindowLoseFocus,
            Event::WindowIconify => EventKind::WindowIconify,
            Event::WindowRestore => EventKind::WindowRestore,
            Event::WindowMaximize => EventKind::WindowMaximize,
            Event::WindowRefresh => EventKind::WindowRefresh,
        }
    }

    pub fn key_press(key: Key) -> Self {
        Event::KeyPress {
            key,
            scancode: 0,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn key_release(key: Key) -> Self {
        Event::KeyRelease {
            key,
            scancode: 0,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn is_window_event(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::WindowClose
                | EventKind::WindowResize
                | EventKind::WindowMove
                | EventKind::WindowGainFocus
                | EventKind::WindowLoseFocus
                | EventKind::WindowIconify
                | EventKind::WindowRestore
                | EventKind::WindowMaximize
                | EventKind::WindowRefresh
        )
    }
}
