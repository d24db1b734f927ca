//! External collaborators the hero polls: the emulator and video elements.
//!
//! The core never awaits these. A stalled source keeps the last frame on the
//! grid.

use crate::error::Result;

/// Something that can be resampled to exactly `cols`×`rows` RGBA pixels.
pub trait FrameSource {
    /// Row-major RGBA bytes, `cols * rows * 4` long, or `None` if no frame
    /// is available yet.
    fn frame(&mut self, cols: usize, rows: usize) -> Option<Vec<u8>>;
}

/// DOS emulator adapter.
pub trait Emulator: FrameSource {
    fn init(&mut self);
    /// Advance emulation; called once per sample.
    fn update(&mut self);
    fn key_down(&mut self, code: &str);
    fn key_up(&mut self, code: &str);
    fn stop(&mut self);
    /// Sticky failure, e.g. the game payload could not be loaded.
    fn error(&self) -> Option<String>;
}

/// A playable video element.
pub trait MediaSource: FrameSource {
    fn current_time(&self) -> f64;
    fn is_paused(&self) -> bool;
    /// Seek to zero and start playback.
    fn play_from_start(&mut self) -> Result<()>;
    fn pause(&mut self);
}

/// Sources injected into the hero. Missing ones leave their mode inert.
#[derive(Default)]
pub struct Capabilities {
    pub emulator: Option<Box<dyn Emulator>>,
    /// Monochrome clip sampled as a silhouette.
    pub silhouette_video: Option<Box<dyn MediaSource>>,
    /// Colour clip with lyric cues.
    pub color_video: Option<Box<dyn MediaSource>>,
}
