//! Key naming tables
//!
//! Two views of a key: the character it types under a given layout (used
//! when the user is typing text) and its fixed name (used in shortcuts and
//! as a fallback).

use crate::capture::input::types::Key;
use crate::settings::KeyboardLayout;

/// Text a key types, and whether that text already reflects Shift
///
/// Returns `None` for keys without a typed character (arrows, F-keys, ...).
pub fn typed_text(key: Key, shift: bool, layout: KeyboardLayout) -> Option<(&'static str, bool)> {
    if let Some(letter) = letter(key) {
        let text = if shift { letter.0 } else { letter.1 };
        return Some((text, true));
    }

    match key {
        Key::Space => return Some(("Space", false)),
        Key::Return => return Some(("Enter", false)),
        Key::Backspace => return Some(("Backspace", false)),
        Key::Tab => return Some(("Tab", false)),
        Key::Escape => return Some(("Esc", false)),
        _ => {}
    }

    match layout {
        KeyboardLayout::Us => us_symbol(key, shift),
        KeyboardLayout::Jis => jis_symbol(key, shift),
    }
}

/// Fixed name of a key, independent of modifiers and layout
pub fn key_name(key: Key) -> Option<&'static str> {
    if let Some((upper, _)) = letter(key) {
        return Some(upper);
    }

    let name = match key {
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        Key::Space => "Space",
        Key::Return => "Enter",
        Key::Backspace => "Backspace",
        Key::Tab => "Tab",
        Key::Escape => "Esc",
        Key::Delete => "Delete",
        Key::UpArrow => "Up",
        Key::DownArrow => "Down",
        Key::LeftArrow => "Left",
        Key::RightArrow => "Right",
        Key::Minus => "-",
        Key::Equal => "=",
        Key::LeftBracket => "[",
        Key::RightBracket => "]",
        Key::BackSlash => "\\",
        Key::SemiColon => ";",
        Key::Quote => "'",
        Key::BackQuote => "`",
        Key::Comma => ",",
        Key::Dot => ".",
        Key::Slash => "/",
        Key::F1 => "F1",
        Key::F2 => "F2",
        Key::F3 => "F3",
        Key::F4 => "F4",
        Key::F5 => "F5",
        Key::F6 => "F6",
        Key::F7 => "F7",
        Key::F8 => "F8",
        Key::F9 => "F9",
        Key::F10 => "F10",
        Key::F11 => "F11",
        Key::F12 => "F12",
        _ => return None,
    };
    Some(name)
}

/// Name for keys missing from the tables: the debug name minus a `Key` prefix
pub fn fallback_name(key: Key) -> String {
    let debug = format!("{:?}", key);
    match debug.strip_prefix("Key") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => debug,
    }
}

/// (shifted, unshifted) pair for letter keys
fn letter(key: Key) -> Option<(&'static str, &'static str)> {
    let pair = match key {
        Key::KeyA => ("A", "a"),
        Key::KeyB => ("B", "b"),
        Key::KeyC => ("C", "c"),
        Key::KeyD => ("D", "d"),
        Key::KeyE => ("E", "e"),
        Key::KeyF => ("F", "f"),
        Key::KeyG => ("G", "g"),
        Key::KeyH => ("H", "h"),
        Key::KeyI => ("I", "i"),
        Key::KeyJ => ("J", "j"),
        Key::KeyK => ("K", "k"),
        Key::KeyL => ("L", "l"),
        Key::KeyM => ("M", "m"),
        Key::KeyN => ("N", "n"),
        Key::KeyO => ("O", "o"),
        Key::KeyP => ("P", "p"),
        Key::KeyQ => ("Q", "q"),
        Key::KeyR => ("R", "r"),
        Key::KeyS => ("S", "s"),
        Key::KeyT => ("T", "t"),
        Key::KeyU => ("U", "u"),
        Key::KeyV => ("V", "v"),
        Key::KeyW => ("W", "w"),
        Key::KeyX => ("X", "x"),
        Key::KeyY => ("Y", "y"),
        Key::KeyZ => ("Z", "z"),
        _ => return None,
    };
    Some(pair)
}

fn pick(shift: bool, shifted: &'static str, plain: &'static str) -> Option<(&'static str, bool)> {
    Some((if shift { shifted } else { plain }, true))
}

fn us_symbol(key: Key, shift: bool) -> Option<(&'static str, bool)> {
    match key {
        Key::Num1 => pick(shift, "!", "1"),
        Key::Num2 => pick(shift, "@", "2"),
        Key::Num3 => pick(shift, "#", "3"),
        Key::Num4 => pick(shift, "$", "4"),
        Key::Num5 => pick(shift, "%", "5"),
        Key::Num6 => pick(shift, "^", "6"),
        Key::Num7 => pick(shift, "&", "7"),
        Key::Num8 => pick(shift, "*", "8"),
        Key::Num9 => pick(shift, "(", "9"),
        Key::Num0 => pick(shift, ")", "0"),
        Key::BackQuote => pick(shift, "~", "`"),
        Key::Minus => pick(shift, "_", "-"),
        Key::Equal => pick(shift, "+", "="),
        Key::LeftBracket => pick(shift, "{", "["),
        Key::RightBracket => pick(shift, "}", "]"),
        Key::BackSlash => pick(shift, "|", "\\"),
        Key::SemiColon => pick(shift, ":", ";"),
        Key::Quote => pick(shift, "\"", "'"),
        Key::Comma => pick(shift, "<", ","),
        Key::Dot => pick(shift, ">", "."),
        Key::Slash => pick(shift, "?", "/"),
        _ => None,
    }
}

fn jis_symbol(key: Key, shift: bool) -> Option<(&'static str, bool)> {
    match key {
        Key::Num1 => pick(shift, "!", "1"),
        Key::Num2 => pick(shift, "\"", "2"),
        Key::Num3 => pick(shift, "#", "3"),
        Key::Num4 => pick(shift, "$", "4"),
        Key::Num5 => pick(shift, "%", "5"),
        Key::Num6 => pick(shift, "&", "6"),
        Key::Num7 => pick(shift, "'", "7"),
        Key::Num8 => pick(shift, "(", "8"),
        Key::Num9 => pick(shift, ")", "9"),
        // Shift+0 types nothing on JIS, so Shift stays visible
        Key::Num0 => Some(("0", false)),
        Key::BackQuote => pick(shift, "`", "@"),
        Key::LeftBracket => pick(shift, "{", "["),
        Key::RightBracket => pick(shift, "}", "]"),
        Key::BackSlash => pick(shift, "}", "]"),
        Key::Quote => pick(shift, "*", ":"),
        Key::SemiColon => pick(shift, "+", ";"),
        Key::Comma => pick(shift, "<", ","),
        Key::Dot => pick(shift, ">", "."),
        Key::Slash => pick(shift, "?", "/"),
        Key::Minus => pick(shift, "=", "-"),
        Key::Equal => pick(shift, "~", "^"),
        _ => None,
    }
}
