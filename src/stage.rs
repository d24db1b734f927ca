use std::fmt;

use crate::config::HeroConfig;

/// Program running on the grid while in [`Stage::Game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Tetris,
    Life,
    /// DOS emulator frame buffer.
    Doom,
    /// Monochrome silhouette video.
    VideoA,
    /// Full-colour video with lyric cues.
    VideoB,
}

impl GameMode {
    /// Base (unscaled) grid spacing this mode wants.
    pub fn spacing(self, cfg: &HeroConfig) -> f32 {
        match self {
            GameMode::Tetris | GameMode::Life => cfg.spacing,
            GameMode::Doom => cfg.emulator_spacing,
            GameMode::VideoA | GameMode::VideoB => cfg.video_spacing,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Tetris => "tetris",
            GameMode::Life => "life",
            GameMode::Doom => "doom",
            GameMode::VideoA => "video-a",
            GameMode::VideoB => "video-b",
        }
    }
}

/// Top-level phase. The game sub-mode only exists inside `Game`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    FormText,
    Idle,
    Game(GameMode),
}

impl Stage {
    pub fn mode(self) -> Option<GameMode> {
        match self {
            Stage::Game(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn is_game(self) -> bool {
        matches!(self, Stage::Game(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => f.write_str("init"),
            Stage::FormText => f.write_str("form-text"),
            Stage::Idle => f.write_str("idle"),
            Stage::Game(mode) => write!(f, "game/{}", mode.name()),
        }
    }
}
