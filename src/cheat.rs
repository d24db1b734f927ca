//! Hidden key sequences.

use crate::stage::GameMode;

pub const KONAMI: &[&str] = &[
    "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
    "ArrowRight", "KeyB", "KeyA",
];
pub const DOOM: &[&str] = &["KeyD", "KeyO", "KeyO", "KeyM"];
pub const APPLE: &[&str] = &["KeyA", "KeyP", "KeyP", "KeyL", "KeyE"];

/// Prefix matcher: any key that does not extend the current prefix drops
/// progress back to zero, including a key that would start a new match.
#[derive(Clone, Debug)]
pub struct SequenceMatcher {
    sequence: &'static [&'static str],
    progress: usize,
}

impl SequenceMatcher {
    pub fn new(sequence: &'static [&'static str]) -> Self {
        Self { sequence, progress: 0 }
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Feed one key code. Returns `true` when the sequence completes.
    pub fn feed(&mut self, code: &str) -> bool {
        if self.sequence.get(self.progress) == Some(&code) {
            self.progress += 1;
            if self.progress == self.sequence.len() {
                self.progress = 0;
                return true;
            }
        } else {
            self.progress = 0;
        }
        false
    }
}

/// All cheat codes and the mode each one opens.
#[derive(Clone, Debug)]
pub struct CheatCodes {
    entries: Vec<(SequenceMatcher, GameMode)>,
}

impl Default for CheatCodes {
    fn default() -> Self {
        Self {
            entries: vec![
                (SequenceMatcher::new(KONAMI), GameMode::Life),
                (SequenceMatcher::new(DOOM), GameMode::Doom),
                (SequenceMatcher::new(APPLE), GameMode::VideoA),
            ],
        }
    }
}

impl CheatCodes {
    /// Feed a key to every matcher; returns the mode of the last completed
    /// sequence, if any.
    pub fn feed(&mut self, code: &str) -> Option<GameMode> {
        let mut hit = None;
        for (matcher, mode) in &mut self.entries {
            if matcher.feed(code) {
                hit = Some(*mode);
            }
        }
        hit
    }
}
