//! Input written by event handlers and consumed by the frame loop.

use std::collections::VecDeque;

/// DOM `KeyboardEvent.code` names the hero reacts to.
pub mod keys {
    pub const ARROW_UP: &str = "ArrowUp";
    pub const ARROW_DOWN: &str = "ArrowDown";
    pub const ARROW_LEFT: &str = "ArrowLeft";
    pub const ARROW_RIGHT: &str = "ArrowRight";
    pub const SPACE: &str = "Space";
    pub const BRACKET_LEFT: &str = "BracketLeft";
    pub const BRACKET_RIGHT: &str = "BracketRight";

    /// Arrows and Space scroll the page unless the hero claims them.
    pub const NAVIGATION: [&str; 5] = [ARROW_UP, ARROW_DOWN, ARROW_LEFT, ARROW_RIGHT, SPACE];

    /// Keys the emulator consumes while it owns the keyboard.
    pub const EMULATOR: [&str; 20] = [
        "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Space", "ControlLeft", "MetaLeft",
        "AltLeft", "AltRight", "KeyW", "KeyA", "KeyS", "KeyD", "Digit1", "Digit2", "Digit3",
        "Digit4", "Digit5", "Digit6", "Digit7",
    ];
}

/// Buttons in the game control strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Play,
    Pause,
    Reset,
    Close,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    PointerDown,
    PointerUp,
    KeyDown(String),
    KeyUp(String),
    Scroll(f32),
    Resize { width: f32, height: f32 },
    Control(Control),
}

/// FIFO of events since the last frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// `None` while the pointer is parked (off canvas or page scrolled away).
    pub position: Option<(f32, f32)>,
    pub down: bool,
}
