//! Outbox of page-chrome updates. The hero queues these; the browser shell
//! applies them to the DOM after each frame.

use crate::stage::Stage;

/// Visibility of the game control buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub play: bool,
    pub pause: bool,
    pub reset: bool,
    pub help: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiSignal {
    StageChanged(Stage),
    /// Show or hide the game control strip.
    ControlsVisible(bool),
    Buttons(ButtonState),
    /// Current lyric line; `None` blanks the overlay.
    Lyric(Option<String>),
    LyricOverlay(bool),
    BrushSize(f32),
}
