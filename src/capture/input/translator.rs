//! Raw input to overlay event translation
//!
//! Turns the OS hook's raw stream (moves, button and key transitions) into
//! labelled [`InputEvent`]s: synthesizes clicks, double-clicks and drags from
//! button transitions, and renders key presses with their held modifiers.

use crate::capture::input::keymap::{fallback_name, key_name, typed_text};
use crate::capture::input::types::{Button, Key, RawInput, TimedInput};
use crate::overlay::{EventKind, InputEvent};
use crate::settings::{KeyboardLayout, OverlaySettings, DEFAULT_DOUBLE_CLICK_THRESHOLD_MS};
use std::collections::HashSet;

/// Pointer travel (in pixels) while a button is held before it counts as a drag
pub const DRAG_THRESHOLD_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub keyboard_layout: KeyboardLayout,
    pub double_click_threshold_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            keyboard_layout: KeyboardLayout::default(),
            double_click_threshold_ms: DEFAULT_DOUBLE_CLICK_THRESHOLD_MS,
        }
    }
}

impl From<&OverlaySettings> for TranslatorConfig {
    fn from(settings: &OverlaySettings) -> Self {
        Self {
            keyboard_layout: settings.keyboard_layout,
            double_click_threshold_ms: settings.double_click_threshold_ms,
        }
    }
}

#[derive(Debug)]
pub struct InputTranslator {
    config: TranslatorConfig,
    paused: bool,
    modifiers: HashSet<Key>,
    pointer: Option<(f64, f64)>,
    held_button: Option<Button>,
    press_origin: Option<(f64, f64)>,
    dragging: bool,
    last_click: Option<(Button, u64)>,
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

impl InputTranslator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config,
            paused: false,
            modifiers: HashSet::new(),
            pointer: None,
            held_button: None,
            press_origin: None,
            dragging: false,
            last_click: None,
        }
    }

    /// Paused by the Ctrl+Alt+P hotkey
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Translate one raw input into zero or more overlay events.
    pub fn translate(&mut self, timed: TimedInput) -> Vec<InputEvent> {
        let ts = timed.timestamp;
        match timed.input {
            RawInput::MouseMove { x, y } => self.mouse_move(x, y, ts),
            RawInput::ButtonPress { button } => self.button_press(button, ts),
            RawInput::ButtonRelease { button } => self.button_release(button, ts),
            RawInput::KeyPress { key, name } => self.key_press(key, name.as_deref(), ts),
            RawInput::KeyRelease { key } => {
                if key.is_modifier() {
                    self.modifiers.remove(&key);
                }
                Vec::new()
            }
        }
    }

    fn mouse_move(&mut self, x: f64, y: f64, ts: u64) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.pointer = Some((x, y));

        if let Some(button) = self.held_button.filter(|_| !self.dragging) {
            match self.press_origin {
                // Press arrived before any move: the first move marks the origin
                None => self.press_origin = Some((x, y)),
                Some((start_x, start_y)) => {
                    let distance = ((x - start_x).powi(2) + (y - start_y).powi(2)).sqrt();
                    if distance > DRAG_THRESHOLD_PX {
                        self.dragging = true;
                        if !self.paused {
                            events.push(event(EventKind::DragStart, "DragStart", button, ts));
                        }
                    }
                }
            }
        }

        if !self.paused {
            events.push(InputEvent::new(
                EventKind::PointerMove,
                format!("@MouseMove[{:.0}, {:.0}]", x, y),
                ts,
            ));
        }
        events
    }

    fn button_press(&mut self, button: Button, ts: u64) -> Vec<InputEvent> {
        self.held_button = Some(button);
        self.press_origin = self.pointer;
        self.dragging = false;

        if self.paused {
            return Vec::new();
        }
        vec![event(EventKind::PointerDown, "MouseDown", button, ts)]
    }

    fn button_release(&mut self, button: Button, ts: u64) -> Vec<InputEvent> {
        let was_dragging = self.dragging;
        self.held_button = None;
        self.press_origin = None;
        self.dragging = false;

        if self.paused {
            return Vec::new();
        }

        let mut events = vec![event(EventKind::PointerUp, "MouseUp", button, ts)];
        if was_dragging {
            events.push(event(EventKind::Drag, "Drag", button, ts));
            return events;
        }

        events.push(event(EventKind::Click, "Click", button, ts));
        let is_double = matches!(
            self.last_click,
            Some((last_button, last_ts))
                if last_button == button
                    && ts.saturating_sub(last_ts) < self.config.double_click_threshold_ms
        );
        if is_double {
            events.push(event(EventKind::DoubleClick, "DoubleClick", button, ts));
        }
        self.last_click = Some((button, ts));
        events
    }

    fn key_press(&mut self, key: Key, name: Option<&str>, ts: u64) -> Vec<InputEvent> {
        if key.is_modifier() {
            self.modifiers.insert(key);
        }

        let ctrl = self.held(&[Key::ControlLeft, Key::ControlRight]);
        let alt = self.held(&[Key::Alt]);
        let shift = self.held(&[Key::ShiftLeft, Key::ShiftRight]);
        let meta = self.held(&[Key::MetaLeft, Key::MetaRight]);

        if ctrl && alt && key == Key::KeyP {
            self.paused = !self.paused;
            let status = if self.paused { "Paused" } else { "Resumed" };
            tracing::info!("Capture {} via hotkey", status.to_lowercase());
            return vec![InputEvent::new(
                EventKind::System,
                format!("Capture {}", status),
                ts,
            )];
        }

        if self.paused {
            return Vec::new();
        }

        let mut text = None;
        let mut consumes_shift = false;
        if !key.is_modifier() {
            if ctrl || alt || meta {
                // Shortcuts show the key's name, with Shift spelled out
                text = Some(self.key_label(key));
            } else {
                let (typed, consumed) = self.typed(key, name, shift);
                text = Some(typed);
                consumes_shift = consumed;
            }
        }

        let mut parts: Vec<String> = Vec::new();
        if ctrl {
            parts.push("Ctrl".to_string());
        }
        if alt {
            parts.push("Alt".to_string());
        }
        if shift && !consumes_shift {
            parts.push("Shift".to_string());
        }
        if meta {
            parts.push("Meta".to_string());
        }
        parts.extend(text);

        if parts.is_empty() {
            return Vec::new();
        }
        vec![InputEvent::new(
            EventKind::Key,
            format!("@Key[{}]", parts.join("+")),
            ts,
        )]
    }

    /// Text for a key typed without Ctrl/Alt/Meta, and whether it absorbs Shift
    fn typed(&self, key: Key, name: Option<&str>, shift: bool) -> (String, bool) {
        if key == Key::Space {
            return ("Space".to_string(), false);
        }

        // The OS name already reflects layout and Shift
        if let Some(name) = name.filter(|n| !n.is_empty() && !n.chars().any(char::is_control)) {
            return (name.to_string(), true);
        }

        match typed_text(key, shift, self.config.keyboard_layout) {
            Some((text, consumed)) => (text.to_string(), consumed && shift),
            None => (self.key_label(key), false),
        }
    }

    fn key_label(&self, key: Key) -> String {
        key_name(key)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(key))
    }

    fn held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.modifiers.contains(key))
    }
}

fn event(kind: EventKind, tag: &str, button: Button, ts: u64) -> InputEvent {
    InputEvent::new(kind, format!("@{}[{}]", tag, button), ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(events: &[InputEvent]) -> Vec<&str> {
        events.iter().map(|e| e.label.as_str()).collect()
    }

    fn press(t: &mut InputTranslator, key: Key, name: Option<&str>, ts: u64) -> Vec<InputEvent> {
        t.translate(TimedInput::new(
            RawInput::KeyPress {
                key,
                name: name.map(str::to_string),
            },
            ts,
        ))
    }

    fn release(t: &mut InputTranslator, key: Key, ts: u64) -> Vec<InputEvent> {
        t.translate(TimedInput::new(RawInput::KeyRelease { key }, ts))
    }

    fn mouse(t: &mut InputTranslator, input: RawInput, ts: u64) -> Vec<InputEvent> {
        t.translate(TimedInput::new(input, ts))
    }

    #[test]
    fn test_plain_typing_uses_os_name() {
        let mut t = InputTranslator::default();
        let events = press(&mut t, Key::KeyA, Some("a"), 0);
        assert_eq!(labels(&events), vec!["@Key[a]"]);
        assert_eq!(events[0].kind, EventKind::Key);
    }

    #[test]
    fn test_shifted_letter_absorbs_shift() {
        let mut t = InputTranslator::default();
        assert_eq!(labels(&press(&mut t, Key::ShiftLeft, None, 0)), vec!["@Key[Shift]"]);
        assert_eq!(labels(&press(&mut t, Key::KeyA, Some("A"), 5)), vec!["@Key[A]"]);
        // Without an OS name the layout table is used
        assert_eq!(labels(&press(&mut t, Key::KeyB, None, 6)), vec!["@Key[B]"]);
        assert_eq!(labels(&press(&mut t, Key::UpArrow, None, 7)), vec!["@Key[Shift+Up]"]);
        release(&mut t, Key::ShiftLeft, 8);
        assert_eq!(labels(&press(&mut t, Key::KeyB, None, 9)), vec!["@Key[b]"]);
    }

    #[test]
    fn test_control_names_fall_back_to_table() {
        let mut t = InputTranslator::default();
        assert_eq!(labels(&press(&mut t, Key::Escape, Some("\u{1b}"), 0)), vec!["@Key[Esc]"]);
        assert_eq!(labels(&press(&mut t, Key::Return, Some("\r"), 1)), vec!["@Key[Enter]"]);
        assert_eq!(labels(&press(&mut t, Key::Space, Some(" "), 2)), vec!["@Key[Space]"]);
        assert_eq!(labels(&press(&mut t, Key::F5, None, 3)), vec!["@Key[F5]"]);
        assert_eq!(labels(&press(&mut t, Key::PageUp, None, 4)), vec!["@Key[PageUp]"]);
    }

    #[test]
    fn test_shortcut_mode() {
        let mut t = InputTranslator::default();
        assert_eq!(labels(&press(&mut t, Key::ControlLeft, None, 0)), vec!["@Key[Ctrl]"]);
        assert_eq!(
            labels(&press(&mut t, Key::ShiftRight, None, 1)),
            vec!["@Key[Ctrl+Shift]"]
        );
        assert_eq!(
            labels(&press(&mut t, Key::KeyS, Some("\u{13}"), 2)),
            vec!["@Key[Ctrl+Shift+S]"]
        );
        release(&mut t, Key::ShiftRight, 3);
        assert_eq!(labels(&press(&mut t, Key::KeyC, Some("c"), 4)), vec!["@Key[Ctrl+C]"]);
        release(&mut t, Key::ControlLeft, 5);

        press(&mut t, Key::MetaLeft, None, 6);
        press(&mut t, Key::Alt, None, 7);
        assert_eq!(labels(&press(&mut t, Key::Tab, None, 8)), vec!["@Key[Alt+Meta+Tab]"]);
    }

    #[test]
    fn test_layout_symbols() {
        let mut us = InputTranslator::default();
        press(&mut us, Key::ShiftLeft, None, 0);
        assert_eq!(labels(&press(&mut us, Key::Num2, None, 1)), vec!["@Key[@]"]);

        let mut jis = InputTranslator::new(TranslatorConfig {
            keyboard_layout: KeyboardLayout::Jis,
            ..TranslatorConfig::default()
        });
        press(&mut jis, Key::ShiftLeft, None, 0);
        assert_eq!(labels(&press(&mut jis, Key::Num2, None, 1)), vec!["@Key[\"]"]);
        assert_eq!(labels(&press(&mut jis, Key::Num0, None, 2)), vec!["@Key[Shift+0]"]);
    }

    #[test]
    fn test_pause_hotkey_toggles() {
        let mut t = InputTranslator::default();
        press(&mut t, Key::ControlLeft, None, 0);
        press(&mut t, Key::Alt, None, 1);

        let events = press(&mut t, Key::KeyP, None, 2);
        assert_eq!(labels(&events), vec!["Capture Paused"]);
        assert_eq!(events[0].kind, EventKind::System);
        assert!(t.is_paused());

        release(&mut t, Key::ControlLeft, 3);
        release(&mut t, Key::Alt, 4);
        assert!(press(&mut t, Key::KeyA, Some("a"), 5).is_empty());
        assert!(mouse(&mut t, RawInput::MouseMove { x: 1.0, y: 1.0 }, 6).is_empty());
        assert!(mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 7).is_empty());
        assert!(mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 8).is_empty());

        press(&mut t, Key::ControlRight, None, 9);
        press(&mut t, Key::Alt, None, 10);
        assert_eq!(labels(&press(&mut t, Key::KeyP, None, 11)), vec!["Capture Resumed"]);
        assert!(!t.is_paused());
    }

    #[test]
    fn test_click_and_double_click() {
        let mut t = InputTranslator::default();
        mouse(&mut t, RawInput::MouseMove { x: 10.0, y: 10.0 }, 0);

        assert_eq!(
            labels(&mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 10)),
            vec!["@MouseDown[Left]"]
        );
        assert_eq!(
            labels(&mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 50)),
            vec!["@MouseUp[Left]", "@Click[Left]"]
        );

        mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 120);
        let second = mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 160);
        assert_eq!(
            labels(&second),
            vec!["@MouseUp[Left]", "@Click[Left]", "@DoubleClick[Left]"]
        );
        assert_eq!(second[2].kind, EventKind::DoubleClick);

        // Too slow, or a different button: no double-click
        mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 900);
        let slow = mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 940);
        assert_eq!(slow.len(), 2);

        mouse(&mut t, RawInput::ButtonPress { button: Button::Right }, 960);
        let other = mouse(&mut t, RawInput::ButtonRelease { button: Button::Right }, 980);
        assert_eq!(labels(&other), vec!["@MouseUp[Right]", "@Click[Right]"]);
    }

    #[test]
    fn test_drag_detection() {
        let mut t = InputTranslator::default();
        mouse(&mut t, RawInput::MouseMove { x: 100.0, y: 100.0 }, 0);
        mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 10);

        // Within the threshold: plain move
        let small = mouse(&mut t, RawInput::MouseMove { x: 105.0, y: 105.0 }, 20);
        assert_eq!(labels(&small), vec!["@MouseMove[105, 105]"]);

        let far = mouse(&mut t, RawInput::MouseMove { x: 130.0, y: 100.0 }, 30);
        assert_eq!(labels(&far), vec!["@DragStart[Left]", "@MouseMove[130, 100]"]);
        assert_eq!(far[0].kind, EventKind::DragStart);

        // Only one drag start per press
        let more = mouse(&mut t, RawInput::MouseMove { x: 200.0, y: 100.0 }, 40);
        assert_eq!(more.len(), 1);

        let up = mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 50);
        assert_eq!(labels(&up), vec!["@MouseUp[Left]", "@Drag[Left]"]);
    }

    #[test]
    fn test_moves_without_button_never_drag() {
        let mut t = InputTranslator::default();
        mouse(&mut t, RawInput::ButtonPress { button: Button::Left }, 0);
        mouse(&mut t, RawInput::ButtonRelease { button: Button::Left }, 10);

        mouse(&mut t, RawInput::MouseMove { x: 0.0, y: 0.0 }, 20);
        let far = mouse(&mut t, RawInput::MouseMove { x: 500.0, y: 500.0 }, 30);
        assert_eq!(labels(&far), vec!["@MouseMove[500, 500]"]);
    }

    #[test]
    fn test_press_before_first_move_uses_first_move_as_origin() {
        let mut t = InputTranslator::default();
        mouse(&mut t, RawInput::ButtonPress { button: Button::Middle }, 0);
        let first = mouse(&mut t, RawInput::MouseMove { x: 50.0, y: 50.0 }, 10);
        assert_eq!(first.len(), 1);
        let second = mouse(&mut t, RawInput::MouseMove { x: 50.0, y: 70.0 }, 20);
        assert_eq!(labels(&second), vec!["@DragStart[Middle]", "@MouseMove[50, 70]"]);
    }
}
