use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Button::Left => write!(f, "Left"),
            Button::Right => write!(f, "Right"),
            Button::Middle => write!(f, "Middle"),
            Button::Other(code) => write!(f, "Button{}", code),
        }
    }
}

/// Physical key as reported by the OS hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Return,
    Backspace,
    Tab,
    Escape,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    CapsLock,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    BackSlash,
    SemiColon,
    Quote,
    BackQuote,
    Comma,
    Dot,
    Slash,
    ControlLeft,
    ControlRight,
    ShiftLeft,
    ShiftRight,
    Alt,
    AltGr,
    MetaLeft,
    MetaRight,
    Unknown(u32),
}

impl Key {
    /// Keys tracked as held modifiers (AltGr produces characters instead)
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::ControlLeft
                | Key::ControlRight
                | Key::ShiftLeft
                | Key::ShiftRight
                | Key::Alt
                | Key::MetaLeft
                | Key::MetaRight
        )
    }
}

/// Raw input as delivered by the OS hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawInput {
    MouseMove { x: f64, y: f64 },
    ButtonPress { button: Button },
    ButtonRelease { button: Button },
    /// `name` is the text the OS produced for the press, if any
    KeyPress { key: Key, name: Option<String> },
    KeyRelease { key: Key },
}

/// Raw input stamped with its arrival time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedInput {
    /// Milliseconds since the Unix epoch; arrival time when the hook omits it
    #[serde(default = "now_unix_ms")]
    pub timestamp: u64,
    #[serde(flatten)]
    pub input: RawInput,
}

impl TimedInput {
    pub fn new(input: RawInput, timestamp: u64) -> Self {
        Self { timestamp, input }
    }
}

pub fn now_unix_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
