// Hero tuning knobs.
//
// Everything that changes how the simulation *feels* lives here so a page can
// override it through the canvas `data-config` attribute. Values that are part
// of a rule (automaton neighbour counts, score tables) live with their module.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{HeroError, Result};

/// How a dot is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotShape {
    Circle,
    Square,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: Rgb,
    pub dot: Rgb,
    pub shape: DotShape,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".into(),
            background: Rgb::BLACK,
            dot: Rgb::WHITE,
            shape: DotShape::Circle,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".into(),
            background: Rgb::WHITE,
            dot: Rgb::BLACK,
            shape: DotShape::Circle,
        }
    }

    pub fn lcd() -> Self {
        Self {
            name: "lcd".into(),
            background: Rgb::new(0xba, 0xd2, 0x4c),
            dot: Rgb::new(0x94, 0xab, 0x26),
            shape: DotShape::Square,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "lcd" => Some(Self::lcd()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Standard distance between dot centres, before visual scaling.
    pub spacing: f32,
    /// Spacing used while the emulator owns the grid (coarse).
    pub emulator_spacing: f32,
    /// Spacing used while a video owns the grid (fine).
    pub video_spacing: f32,
    pub base_radius: f32,

    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub theme: String,

    pub init_ms: f64,
    pub form_text_ms: f64,
    /// Upper bound of the per-dot FORM_TEXT start delay.
    pub stagger_ms: f64,

    /// Per-frame walk along the noise field.
    pub noise_step: f32,
    /// Raw noise under this maps to fully dark.
    pub idle_threshold: f32,
    pub idle_ceiling: f32,
    /// Opacity of dead cells while a game owns the grid.
    pub game_floor: f32,

    pub interaction_radius: f32,
    /// Scroll offset (px) past which games close and the pointer is ignored.
    pub scroll_exit_px: f32,

    pub life_tick_ms: f64,
    pub emulator_sample_ms: f64,
    /// Lyric cues fire this far ahead of playback.
    pub lyric_lead_s: f64,
    /// Alive fraction that turns a painted board into the colour video.
    pub fill_trigger: f32,
    pub silhouette_cutoff: f32,
    pub colour_floor: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            spacing: 18.0,
            emulator_spacing: 24.0,
            video_spacing: 10.0,
            base_radius: 3.0,
            text: "MONAD".into(),
            font_size: 400.0,
            font_family: "Space Grotesk, sans-serif".into(),
            theme: "dark".into(),
            init_ms: 1800.0,
            form_text_ms: 1200.0,
            stagger_ms: 1500.0,
            noise_step: 0.005,
            idle_threshold: 0.55,
            idle_ceiling: 0.4,
            game_floor: 0.05,
            interaction_radius: 150.0,
            scroll_exit_px: 100.0,
            life_tick_ms: 100.0,
            emulator_sample_ms: 33.0,
            lyric_lead_s: 0.5,
            fill_trigger: 0.98,
            silhouette_cutoff: 128.0,
            colour_floor: 30.0,
        }
    }
}

impl HeroConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(src: &str) -> Result<Self> {
        let cfg: HeroConfig = serde_json::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let spacings = [
            ("spacing", self.spacing),
            ("emulator_spacing", self.emulator_spacing),
            ("video_spacing", self.video_spacing),
        ];
        for (name, value) in spacings {
            if !(value.is_finite() && value > 0.0) {
                return Err(HeroError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if self.base_radius < 0.0 {
            return Err(HeroError::InvalidConfig("base_radius must not be negative".into()));
        }
        let durations = [
            ("init_ms", self.init_ms),
            ("form_text_ms", self.form_text_ms),
            ("stagger_ms", self.stagger_ms),
            ("life_tick_ms", self.life_tick_ms),
            ("emulator_sample_ms", self.emulator_sample_ms),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(HeroError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }
        if !(0.0..1.0).contains(&self.idle_threshold) {
            return Err(HeroError::InvalidConfig("idle_threshold must be in [0, 1)".into()));
        }
        if Theme::by_name(&self.theme).is_none() {
            return Err(HeroError::InvalidConfig(format!("unknown theme {:?}", self.theme)));
        }
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_else(Theme::dark)
    }
}
