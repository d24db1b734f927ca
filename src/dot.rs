//! Per-cell particle and its per-stage update rules.

use crate::color::Rgb;
use crate::config::{HeroConfig, Theme};
use crate::noise::NoiseField;
use crate::stage::Stage;
use crate::surface::Surface;

/// Dots at or below this opacity are not drawn at all.
pub const OPACITY_FLOOR: f32 = 0.01;

/// Frame length the per-frame easing coefficients were tuned at.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

const INIT_CEILING: f32 = 0.3;
const INIT_FADE_PER_MS: f64 = 0.0005;
/// INIT reveal delay per pixel of vertical position.
const INIT_DELAY_PER_PX: f64 = 2.0;

const AMBIENT_EASE: f32 = 0.08;
const GAME_EASE: f32 = 0.2;
const RELAX_EASE: f32 = 0.1;
const HOVER_EASE: f32 = 0.2;

const HOVER_GAIN: f32 = 4.0;
const HOVER_MULTIPLIER: f32 = 0.8;
const TEXT_HOVER_MULTIPLIER: f32 = 0.3;

const EVAPORATION_SPAN: f32 = 0.6;
const EVAPORATION_POWER: i32 = 4;
const LIFT: f32 = 2.5;
const LIFT_VARIANCE: f32 = 0.8;
const WIGGLE_AMPLITUDE: f32 = 100.0;
const WIGGLE_RATE: f64 = 0.003;
const WIGGLE_PHASE: f32 = 20.0;
const EVAPORATION_FADE: f32 = 0.8;

/// Convert a per-frame approach coefficient tuned at 60 Hz into the
/// coefficient for a frame of `dt_ms`.
#[inline]
pub fn ease_for(k: f32, dt_ms: f64) -> f32 {
    let frames = (dt_ms / REFERENCE_FRAME_MS).max(0.0);
    1.0 - (1.0 - k as f64).powf(frames) as f32
}

/// Bias-to-dark remap of raw idle noise.
#[inline]
pub fn ambient_level(noise: f32, threshold: f32, ceiling: f32) -> f32 {
    if noise < threshold {
        0.0
    } else {
        (noise - threshold) / (1.0 - threshold) * ceiling
    }
}

/// Frame-invariant tuning copied out of [`HeroConfig`].
#[derive(Clone, Copy, Debug)]
pub struct DotTuning {
    pub stagger_ms: f64,
    pub noise_step: f32,
    pub idle_threshold: f32,
    pub idle_ceiling: f32,
    pub game_floor: f32,
}

impl From<&HeroConfig> for DotTuning {
    fn from(cfg: &HeroConfig) -> Self {
        Self {
            stagger_ms: cfg.stagger_ms,
            noise_step: cfg.noise_step,
            idle_threshold: cfg.idle_threshold,
            idle_ceiling: cfg.idle_ceiling,
            game_floor: cfg.game_floor,
        }
    }
}

/// Easing coefficients for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Easing {
    pub ambient: f32,
    pub game: f32,
    pub relax: f32,
    pub hover: f32,
    /// Frames' worth of noise walk this frame.
    pub frames: f32,
}

impl Easing {
    pub fn for_frame(dt_ms: f64) -> Self {
        Self {
            ambient: ease_for(AMBIENT_EASE, dt_ms),
            game: ease_for(GAME_EASE, dt_ms),
            relax: ease_for(RELAX_EASE, dt_ms),
            hover: ease_for(HOVER_EASE, dt_ms),
            frames: (dt_ms / REFERENCE_FRAME_MS) as f32,
        }
    }
}

/// Everything a dot reads during its update. Built once per frame.
pub struct FrameContext<'a> {
    pub stage: Stage,
    pub elapsed_ms: f64,
    pub stage_elapsed_ms: f64,
    pub easing: Easing,
    pub pointer: Option<(f32, f32)>,
    pub interaction_radius: f32,
    pub scroll_y: f32,
    pub viewport_height: f32,
    pub noise: &'a NoiseField,
    pub tuning: DotTuning,
}

impl FrameContext<'_> {
    /// Scroll progress through the evaporation span, clamped to `[0, 1]`.
    pub fn scroll_factor(&self) -> f32 {
        let span = self.viewport_height * EVAPORATION_SPAN;
        if span <= 0.0 {
            return if self.scroll_y > 0.0 { 1.0 } else { 0.0 };
        }
        (self.scroll_y / span).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    origin_x: f32,
    origin_y: f32,
    pub col: usize,
    pub row: usize,

    pub radius: f32,
    pub base_radius: f32,
    pub opacity: f32,
    pub target_opacity: f32,

    pub is_text: bool,
    pub alive: bool,
    pub next_alive: bool,
    /// `None` draws in the theme's dot colour.
    pub color: Option<Rgb>,

    /// Persistent per-dot random in `[0, 1)` for stagger and turbulence.
    pub bias: f32,
    pub noise_offset: f32,
}

impl Dot {
    pub fn new(x: f32, y: f32, col: usize, row: usize, base_radius: f32, bias: f32, noise_offset: f32) -> Self {
        let base_radius = base_radius.max(0.0);
        Self {
            x,
            y,
            origin_x: x,
            origin_y: y,
            col,
            row,
            radius: base_radius,
            base_radius,
            opacity: 0.0,
            target_opacity: 0.0,
            is_text: false,
            alive: false,
            next_alive: false,
            color: None,
            bias,
            noise_offset,
        }
    }

    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_y)
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>) {
        match ctx.stage {
            Stage::Init => {
                self.reveal(ctx);
                return;
            }
            Stage::FormText => {
                // Hold until this dot's staggered start.
                if ctx.stage_elapsed_ms < self.bias as f64 * ctx.tuning.stagger_ms {
                    return;
                }
                self.chase_ambient(ctx);
            }
            Stage::Idle => self.chase_ambient(ctx),
            Stage::Game(_) => {
                self.settle_for_game(ctx);
                return;
            }
        }

        self.hover(ctx);
        self.evaporate(ctx);
        self.radius = self.radius.max(0.0);
        self.opacity = self.opacity.clamp(0.0, 1.0);
    }

    /// Paint this dot. Returns whether a draw call was issued.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, theme: &Theme) -> bool {
        if self.opacity <= OPACITY_FLOOR {
            return false;
        }
        surface.set_alpha(self.opacity);
        surface.fill_dot(
            self.x,
            self.y,
            self.radius.abs(),
            self.color.unwrap_or(theme.dot),
            theme.shape,
        );
        surface.set_alpha(1.0);
        true
    }

    fn reveal(&mut self, ctx: &FrameContext<'_>) {
        let t = ctx.elapsed_ms - self.origin_y as f64 * INIT_DELAY_PER_PX;
        self.opacity = if t > 0.0 {
            (t * INIT_FADE_PER_MS).min(INIT_CEILING as f64) as f32
        } else {
            0.0
        };
    }

    fn chase_ambient(&mut self, ctx: &FrameContext<'_>) {
        let tuning = &ctx.tuning;
        self.target_opacity = if self.is_text {
            1.0
        } else {
            self.noise_offset += tuning.noise_step * ctx.easing.frames;
            let n = ctx.noise.sample(self.noise_offset);
            ambient_level(n, tuning.idle_threshold, tuning.idle_ceiling)
        };
        self.opacity += (self.target_opacity - self.opacity) * ctx.easing.ambient;
    }

    fn settle_for_game(&mut self, ctx: &FrameContext<'_>) {
        self.target_opacity = if self.alive { 1.0 } else { ctx.tuning.game_floor };
        self.opacity += (self.target_opacity - self.opacity) * ctx.easing.game;
        self.opacity = self.opacity.clamp(0.0, 1.0);

        let k = ctx.easing.relax;
        self.x += (self.origin_x - self.x) * k;
        self.y += (self.origin_y - self.y) * k;
        self.radius += (self.base_radius - self.radius) * k;
        self.radius = self.radius.max(0.0);
    }

    fn hover(&mut self, ctx: &FrameContext<'_>) {
        let k = ctx.easing.hover;
        let target = match ctx.pointer {
            Some((px, py)) if ctx.interaction_radius > 0.0 => {
                let dist = ((self.x - px).powi(2) + (self.y - py).powi(2)).sqrt();
                if dist < ctx.interaction_radius {
                    let force = 1.0 - dist / ctx.interaction_radius;
                    let multiplier = if self.is_text { TEXT_HOVER_MULTIPLIER } else { HOVER_MULTIPLIER };
                    self.base_radius * (1.0 + force * HOVER_GAIN * multiplier)
                } else {
                    self.base_radius
                }
            }
            _ => self.base_radius,
        };
        self.radius += (target - self.radius) * k;
    }

    fn evaporate(&mut self, ctx: &FrameContext<'_>) {
        let factor = ctx.scroll_factor();
        if factor <= 0.0 {
            // Exact reset: evaporation leaves no drift behind.
            self.x = self.origin_x;
            self.y = self.origin_y;
            return;
        }

        let ease = factor.powi(EVAPORATION_POWER);
        let variance = 1.0 + self.bias * LIFT_VARIANCE;
        self.y = self.origin_y - ease * ctx.viewport_height * LIFT * variance;

        let phase = (ctx.elapsed_ms * WIGGLE_RATE) as f32 + self.bias * WIGGLE_PHASE;
        self.x = self.origin_x + phase.sin() * ease * WIGGLE_AMPLITUDE;

        self.radius *= (1.0 - factor).max(0.0);
        self.opacity *= (1.0 - factor * EVAPORATION_FADE).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::stage::GameMode;
    use crate::surface::RecordingSurface;

    fn ctx<'a>(noise: &'a NoiseField, stage: Stage) -> FrameContext<'a> {
        FrameContext {
            stage,
            elapsed_ms: 5_000.0,
            stage_elapsed_ms: 5_000.0,
            easing: Easing::for_frame(REFERENCE_FRAME_MS),
            pointer: None,
            interaction_radius: 150.0,
            scroll_y: 0.0,
            viewport_height: 800.0,
            noise,
            tuning: DotTuning::from(&HeroConfig::default()),
        }
    }

    #[test]
    fn ease_matches_reference_at_sixty_hz() {
        assert!((ease_for(0.08, REFERENCE_FRAME_MS) - 0.08).abs() < 1e-6);
        let two_frames = 1.0 - (1.0 - 0.2f32).powi(2);
        assert!((ease_for(0.2, 2.0 * REFERENCE_FRAME_MS) - two_frames).abs() < 1e-5);
        assert_eq!(ease_for(0.2, 0.0), 0.0);
    }

    #[test]
    fn ambient_remap_is_biased_dark() {
        assert_eq!(ambient_level(0.3, 0.55, 0.4), 0.0);
        assert_eq!(ambient_level(0.5499, 0.55, 0.4), 0.0);
        assert!((ambient_level(1.0, 0.55, 0.4) - 0.4).abs() < 1e-6);
        assert!((ambient_level(0.775, 0.55, 0.4) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn init_reveals_top_rows_first() {
        let noise = NoiseField::seeded(1);
        let mut c = ctx(&noise, Stage::Init);
        c.elapsed_ms = 300.0;
        let mut top = Dot::new(10.0, 10.0, 0, 0, 3.0, 0.5, 0.0);
        let mut low = Dot::new(10.0, 400.0, 0, 20, 3.0, 0.5, 0.0);
        top.update(&c);
        low.update(&c);
        assert!(top.opacity > 0.0);
        assert_eq!(low.opacity, 0.0);

        c.elapsed_ms = 100_000.0;
        low.update(&c);
        assert!((low.opacity - INIT_CEILING).abs() < 1e-6);
    }

    #[test]
    fn form_text_holds_until_staggered_trigger() {
        let noise = NoiseField::seeded(1);
        let mut c = ctx(&noise, Stage::FormText);
        let mut dot = Dot::new(10.0, 10.0, 0, 0, 3.0, 0.5, 0.0);
        dot.is_text = true;
        dot.opacity = 0.2;

        c.stage_elapsed_ms = 700.0; // trigger at 0.5 * 1500
        dot.update(&c);
        assert_eq!(dot.opacity, 0.2);

        c.stage_elapsed_ms = 800.0;
        dot.update(&c);
        assert!(dot.opacity > 0.2);
    }

    #[test]
    fn idle_text_dots_approach_full_opacity() {
        let noise = NoiseField::seeded(1);
        let c = ctx(&noise, Stage::Idle);
        let mut dot = Dot::new(10.0, 10.0, 0, 0, 3.0, 0.5, 0.0);
        dot.is_text = true;
        for _ in 0..200 {
            dot.update(&c);
        }
        assert!(dot.opacity > 0.99);
    }

    #[test]
    fn game_mode_relaxes_physics_and_uses_floor() {
        let noise = NoiseField::seeded(1);
        let c = ctx(&noise, Stage::Game(GameMode::Life));
        let mut dot = Dot::new(50.0, 50.0, 0, 0, 3.0, 0.5, 0.0);
        dot.x = 80.0;
        dot.radius = 9.0;
        dot.opacity = 1.0;
        for _ in 0..200 {
            dot.update(&c);
        }
        assert!((dot.x - 50.0).abs() < 1e-3);
        assert!((dot.radius - 3.0).abs() < 1e-3);
        assert!((dot.opacity - 0.05).abs() < 1e-3);
    }

    #[test]
    fn hover_swells_less_for_text() {
        let noise = NoiseField::seeded(1);
        let mut c = ctx(&noise, Stage::Idle);
        c.pointer = Some((0.0, 0.0));
        let mut ambient = Dot::new(0.0, 0.0, 0, 0, 3.0, 0.5, 0.0);
        let mut text = ambient.clone();
        text.is_text = true;
        for _ in 0..200 {
            ambient.update(&c);
            text.update(&c);
        }
        assert!((ambient.radius - 3.0 * (1.0 + 4.0 * 0.8)).abs() < 1e-2);
        assert!((text.radius - 3.0 * (1.0 + 4.0 * 0.3)).abs() < 1e-2);
    }

    #[test]
    fn evaporation_lifts_then_snaps_back() {
        let noise = NoiseField::seeded(1);
        let mut c = ctx(&noise, Stage::Idle);
        let mut dot = Dot::new(40.0, 300.0, 0, 0, 3.0, 0.25, 0.0);

        c.scroll_y = 400.0;
        dot.update(&c);
        assert!(dot.y < 300.0);
        assert!(dot.radius < 3.0);

        c.scroll_y = 0.0;
        dot.update(&c);
        assert_eq!((dot.x, dot.y), dot.origin());
    }

    #[test]
    fn faint_dots_are_skipped_and_alpha_is_restored() {
        let theme = Theme::dark();
        let mut surface = RecordingSurface::new();
        let mut dot = Dot::new(1.0, 1.0, 0, 0, 3.0, 0.0, 0.0);

        dot.opacity = 0.005;
        assert!(!dot.draw(&mut surface, &theme));
        assert!(surface.draws.is_empty());

        dot.opacity = 0.7;
        dot.color = Some(Rgb::RED);
        assert!(dot.draw(&mut surface, &theme));
        assert_eq!(surface.draws[0].alpha, 0.7);
        assert_eq!(surface.draws[0].color, Rgb::RED);
        assert_eq!(surface.alpha(), 1.0);
    }
}
