//! The simulation context: owns the grid, the stage machine and every mode,
//! and runs one frame at a time.
//!
//! Event handlers only push [`InputEvent`]s; everything else happens inside
//! [`Hero::frame`].

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::capability::{Capabilities, MediaSource};
use crate::cheat::CheatCodes;
use crate::color::Rgb;
use crate::config::{HeroConfig, Theme};
use crate::dot::{ease_for, DotTuning, Easing, FrameContext, REFERENCE_FRAME_MS};
use crate::error::Result;
use crate::font;
use crate::grid::{Grid, SpacingStep, SpacingTransition, Viewport, SPACING_EASE};
use crate::input::{keys, Control, InputEvent, InputQueue, PointerState};
use crate::life;
use crate::lyrics::{parse_lrc, LyricTrack};
use crate::noise::NoiseField;
use crate::raster::{self, TextRasterizer, TextStyle};
use crate::sampler;
use crate::schedule::{Throttle, Timeline};
use crate::signal::{ButtonState, UiSignal};
use crate::stage::{GameMode, Stage};
use crate::surface::Surface;
use crate::tetris::Board;

/// Longest frame step fed to easing; covers tab switches and debugger stops.
const MAX_FRAME_MS: f64 = 100.0;
const BRUSH_STEP: f32 = 2.0;
const BRUSH_MIN: f32 = 0.5;
const BRUSH_MAX: f32 = 100.0;
const OVERLAY_OPACITY: f32 = 0.8;

/// Keys that start the block game from the landing view.
const TETRIS_TRIGGERS: [&str; 3] = [keys::ARROW_UP, keys::SPACE, "KeyW"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cue {
    BeginFormText,
    BeginIdle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub dots: usize,
    pub drawn: usize,
}

pub struct Hero {
    config: HeroConfig,
    theme: Theme,
    tuning: DotTuning,
    viewport: Viewport,
    scale: f32,

    rng: SmallRng,
    noise: NoiseField,
    rasterizer: Box<dyn TextRasterizer>,
    caps: Capabilities,

    grid: Grid,
    spacing: SpacingTransition,

    stage: Stage,
    stage_started_ms: f64,
    started_ms: Option<f64>,
    last_ms: Option<f64>,
    elapsed_ms: f64,
    timeline: Timeline<Cue>,

    input: InputQueue,
    pointer: PointerState,
    scroll_y: f32,
    cheats: CheatCodes,
    brush: f32,

    playing: bool,
    buttons: ButtonState,
    tetris: Board,
    gravity: Throttle,
    life_tick: Throttle,
    emulator_tick: Throttle,
    lyric_sheet: Option<String>,
    lyrics: LyricTrack,

    signals: Vec<UiSignal>,
}

impl Hero {
    /// Build the landing grid, classify the text dots and queue the intro.
    pub fn new(
        config: HeroConfig,
        viewport: Viewport,
        rasterizer: Box<dyn TextRasterizer>,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let noise = NoiseField::new(&mut rng);
        let tetris = Board::new(rng.random());

        let mut timeline = Timeline::new();
        timeline.schedule(config.init_ms, Cue::BeginFormText);
        timeline.schedule(config.init_ms + config.form_text_ms, Cue::BeginIdle);

        let mut hero = Self {
            theme: config.theme(),
            tuning: DotTuning::from(&config),
            scale: viewport.visual_scale(),
            viewport,
            rng,
            noise,
            rasterizer,
            caps: Capabilities::default(),
            grid: Grid::default(),
            spacing: SpacingTransition::new(config.spacing),
            stage: Stage::Init,
            stage_started_ms: 0.0,
            started_ms: None,
            last_ms: None,
            elapsed_ms: 0.0,
            timeline,
            input: InputQueue::default(),
            pointer: PointerState::default(),
            scroll_y: 0.0,
            cheats: CheatCodes::default(),
            brush: 1.0,
            playing: false,
            buttons: ButtonState::default(),
            tetris,
            gravity: Throttle::default(),
            life_tick: Throttle::default(),
            emulator_tick: Throttle::default(),
            lyric_sheet: None,
            lyrics: LyricTrack::default(),
            signals: Vec::new(),
            config,
        };
        hero.rebuild_grid();
        hero.map_text()?;
        Ok(hero)
    }

    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// LRC cue sheet for the colour video; parsed on first use.
    pub fn set_lyrics(&mut self, lrc: impl Into<String>) {
        self.lyric_sheet = Some(lrc.into());
        self.lyrics = LyricTrack::default();
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn tetris(&self) -> &Board {
        &self.tetris
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn brush(&self) -> f32 {
        self.brush
    }

    pub fn spacing(&self) -> &SpacingTransition {
        &self.spacing
    }

    pub fn lyric(&self) -> Option<&str> {
        self.lyrics.active().map(|c| c.text.as_str())
    }

    /// UI updates queued since the last call.
    pub fn drain_signals(&mut self) -> Vec<UiSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Whether the page should swallow the browser default for `code`.
    pub fn suppresses_default(&self, code: &str) -> bool {
        let near_top = self.scroll_y < self.config.scroll_exit_px;
        if keys::NAVIGATION.contains(&code) && (self.stage.is_game() || near_top) {
            return true;
        }
        self.stage.mode() == Some(GameMode::Doom) && keys::EMULATOR.contains(&code)
    }

    /// Advance the simulation to `now_ms` and paint the result.
    pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> FrameStats {
        let start = *self.started_ms.get_or_insert(now_ms);
        let dt = self
            .last_ms
            .map_or(REFERENCE_FRAME_MS, |last| (now_ms - last).clamp(0.0, MAX_FRAME_MS));
        self.last_ms = Some(now_ms);
        self.elapsed_ms = now_ms - start;

        while let Some(event) = self.input.pop() {
            self.handle_event(event);
        }

        for cue in self.timeline.advance(self.elapsed_ms) {
            match (cue, self.stage) {
                (Cue::BeginFormText, Stage::Init) => self.set_stage(Stage::FormText),
                (Cue::BeginIdle, Stage::FormText) => self.set_stage(Stage::Idle),
                _ => {}
            }
        }

        self.step_spacing(dt);
        if self.playing {
            self.tick_mode(false);
        }

        surface.clear(self.theme.background, self.viewport.width, self.viewport.height);
        let ctx = FrameContext {
            stage: self.stage,
            elapsed_ms: self.elapsed_ms,
            stage_elapsed_ms: self.elapsed_ms - self.stage_started_ms,
            easing: Easing::for_frame(dt),
            pointer: self.pointer.position,
            interaction_radius: self.config.interaction_radius * self.scale,
            scroll_y: self.scroll_y,
            viewport_height: self.viewport.height,
            noise: &self.noise,
            tuning: self.tuning,
        };
        let mut drawn = 0;
        for dot in self.grid.dots_mut() {
            dot.update(&ctx);
            if dot.draw(surface, &self.theme) {
                drawn += 1;
            }
        }
        FrameStats {
            dots: self.grid.len(),
            drawn,
        }
    }

    fn set_stage(&mut self, stage: Stage) {
        if self.stage == stage {
            return;
        }
        debug!("stage {} -> {}", self.stage, stage);
        self.stage = stage;
        self.stage_started_ms = self.elapsed_ms;
        self.signals.push(UiSignal::StageChanged(stage));
    }

    fn set_buttons(&mut self, buttons: ButtonState) {
        self.buttons = buttons;
        self.signals.push(UiSignal::Buttons(buttons));
    }

    fn rebuild_grid(&mut self) {
        let standard = self.config.spacing;
        let base = self.spacing.current();
        let mut radius = self.config.base_radius * self.scale;
        if base < standard {
            radius *= base / standard;
        }
        self.grid = Grid::build(self.viewport, base * self.scale, radius, &mut self.rng);
    }

    /// Classify dots under the rendered headline as text.
    fn map_text(&mut self) -> Result<usize> {
        let style = TextStyle {
            text: &self.config.text,
            font_px: self.config.font_size * self.scale,
            family: &self.config.font_family,
        };
        let (w, h) = (self.viewport.width.max(0.0) as usize, self.viewport.height.max(0.0) as usize);
        let mask = self.rasterizer.rasterize(&style, w, h)?;
        Ok(raster::apply_mask(&mut self.grid, &mask))
    }

    fn remap_text(&mut self) {
        if let Err(err) = self.map_text() {
            warn!("text mask failed: {err}");
        }
    }

    fn step_spacing(&mut self, dt: f64) {
        let step = self.spacing.step(ease_for(SPACING_EASE, dt));
        if step == SpacingStep::Settled {
            return;
        }
        self.rebuild_grid();
        // Fresh dots are blank; repaint the game at every intermediate size.
        if self.stage.is_game() {
            self.tick_mode(true);
        }
        if step == SpacingStep::Snapped && self.spacing.current() == self.config.spacing && !self.stage.is_game() {
            self.remap_text();
        }
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_moved(x, y),
            InputEvent::PointerDown => self.pointer.down = true,
            InputEvent::PointerUp => self.pointer.down = false,
            InputEvent::KeyDown(code) => self.key_down(&code),
            InputEvent::KeyUp(code) => {
                if self.stage.mode() == Some(GameMode::Doom) {
                    if let Some(emu) = self.caps.emulator.as_mut() {
                        emu.key_up(&code);
                    }
                }
            }
            InputEvent::Scroll(y) => {
                self.scroll_y = y;
                if y > self.config.scroll_exit_px {
                    self.exit_game();
                }
            }
            InputEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
            InputEvent::Control(control) => self.control(control),
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = viewport.visual_scale();
        self.rebuild_grid();
        match self.stage.mode() {
            None => self.remap_text(),
            // Life has no source to repaint from; the headline reseeds it.
            Some(GameMode::Life) => {
                self.remap_text();
                self.grid.revive_text();
            }
            Some(_) => self.tick_mode(true),
        }
    }

    fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.scroll_y > self.config.scroll_exit_px {
            self.pointer.position = None;
            return;
        }
        self.pointer.position = Some((x, y));

        if !self.pointer.down {
            return;
        }
        match self.stage {
            Stage::Idle => self.enter_mode(GameMode::Life),
            Stage::Game(GameMode::Life) => {}
            _ => return,
        }

        let radius = self.config.spacing * self.scale * self.brush;
        life::paint(&mut self.grid, x, y, radius);
        if self.grid.alive_fraction() > self.config.fill_trigger {
            self.enter_mode(GameMode::VideoB);
        }
    }

    fn key_down(&mut self, code: &str) {
        match code {
            keys::BRACKET_LEFT => self.resize_brush(-BRUSH_STEP),
            keys::BRACKET_RIGHT => self.resize_brush(BRUSH_STEP),
            _ => {}
        }

        // Games open from the settled landing view or from another game.
        let settled = matches!(self.stage, Stage::Idle | Stage::Game(_));
        if let Some(mode) = self.cheats.feed(code) {
            if settled {
                self.enter_mode(mode);
            }
        }

        let Some(mode) = self.stage.mode() else {
            if settled && self.scroll_y < self.config.scroll_exit_px && TETRIS_TRIGGERS.contains(&code) {
                self.enter_mode(GameMode::Tetris);
            }
            return;
        };

        match mode {
            GameMode::Life if keys::NAVIGATION.contains(&code) => self.enter_mode(GameMode::Tetris),
            GameMode::Doom => {
                if let Some(emu) = self.caps.emulator.as_mut() {
                    emu.key_down(code);
                }
            }
            GameMode::Tetris if self.playing => {
                let board = &mut self.tetris;
                match code {
                    "ArrowLeft" | "KeyA" => {
                        board.move_by(-1, 0);
                    }
                    "ArrowRight" | "KeyD" => {
                        board.move_by(1, 0);
                    }
                    "ArrowUp" | "KeyW" | "KeyX" => board.rotate_cw(),
                    "KeyZ" | "ControlLeft" | "ControlRight" => board.rotate_ccw(),
                    "ArrowDown" | "KeyS" => board.soft_drop(),
                    "Space" => board.hard_drop(),
                    _ => {}
                }
                board.project(&mut self.grid);
            }
            _ => {}
        }
    }

    fn resize_brush(&mut self, delta: f32) {
        self.brush = (self.brush + delta).clamp(BRUSH_MIN, BRUSH_MAX);
        debug!("brush size {}", self.brush);
        self.signals.push(UiSignal::BrushSize(self.brush));
    }

    fn control(&mut self, control: Control) {
        let Some(mode) = self.stage.mode() else {
            return;
        };
        let tetris = mode == GameMode::Tetris;
        match control {
            Control::Play => {
                self.playing = true;
                if tetris {
                    self.tetris.resume();
                }
                self.set_buttons(ButtonState {
                    play: false,
                    pause: true,
                    ..self.buttons
                });
            }
            Control::Pause => {
                self.playing = false;
                if tetris {
                    self.tetris.pause();
                }
                self.set_buttons(ButtonState {
                    play: true,
                    pause: false,
                    ..self.buttons
                });
            }
            Control::Reset if tetris => {
                self.tetris.start();
                self.gravity.reset();
                self.playing = true;
                self.set_buttons(ButtonState {
                    play: false,
                    pause: true,
                    ..self.buttons
                });
            }
            Control::Reset => {
                for dot in self.grid.dots_mut() {
                    dot.alive = false;
                    dot.next_alive = false;
                    dot.opacity = 0.0;
                }
                self.playing = false;
                self.set_buttons(ButtonState {
                    play: true,
                    pause: false,
                    ..self.buttons
                });
            }
            Control::Close => self.exit_game(),
        }
    }

    fn media_for(&mut self, mode: GameMode) -> Option<&mut Box<dyn MediaSource>> {
        match mode {
            GameMode::VideoA => self.caps.silhouette_video.as_mut(),
            GameMode::VideoB => self.caps.color_video.as_mut(),
            _ => None,
        }
    }

    /// Stop whatever external source `mode` was driving.
    fn release(&mut self, mode: GameMode) {
        match mode {
            GameMode::Doom => {
                if let Some(emu) = self.caps.emulator.as_mut() {
                    emu.stop();
                }
            }
            GameMode::VideoA | GameMode::VideoB => {
                if let Some(media) = self.media_for(mode) {
                    media.pause();
                }
                if mode == GameMode::VideoB {
                    self.signals.push(UiSignal::LyricOverlay(false));
                }
            }
            GameMode::Tetris | GameMode::Life => {}
        }
    }

    /// Switch into `mode`, from the landing stages or from another mode.
    pub fn enter_mode(&mut self, mode: GameMode) {
        if let Some(previous) = self.stage.mode() {
            if previous != mode {
                self.release(previous);
            }
        }
        info!("entering {} mode", mode.name());
        self.set_stage(Stage::Game(mode));
        self.playing = true;
        self.signals.push(UiSignal::ControlsVisible(true));
        let mut buttons = ButtonState {
            help: mode == GameMode::Doom,
            ..ButtonState::default()
        };
        let target = mode.spacing(&self.config);

        match mode {
            GameMode::Tetris => {
                self.spacing.retarget(target);
                self.tetris.start();
                self.gravity.reset();
                buttons.reset = true;
            }
            GameMode::Life => {
                if self.spacing.is_at(target) {
                    self.grid.revive_text();
                } else {
                    self.spacing.snap_to(target);
                    self.rebuild_grid();
                }
                self.life_tick.reset();
                self.playing = false;
                buttons.play = true;
                buttons.reset = true;
            }
            GameMode::Doom => {
                self.spacing.retarget(target);
                self.emulator_tick.reset();
                match self.caps.emulator.as_mut() {
                    Some(emu) => emu.init(),
                    None => warn!("no emulator attached"),
                }
            }
            GameMode::VideoA | GameMode::VideoB => {
                self.spacing.retarget(target);
                match self.media_for(mode) {
                    Some(media) => {
                        if let Err(err) = media.play_from_start() {
                            warn!("playback blocked, waiting for a gesture: {err}");
                        }
                    }
                    None => warn!("no video attached for {}", mode.name()),
                }
                if mode == GameMode::VideoB {
                    if self.lyrics.is_empty() {
                        if let Some(sheet) = &self.lyric_sheet {
                            self.lyrics = LyricTrack::new(parse_lrc(sheet));
                        }
                    }
                    self.lyrics.reset();
                    self.signals.push(UiSignal::LyricOverlay(true));
                    self.signals.push(UiSignal::Lyric(None));
                }
            }
        }
        self.set_buttons(buttons);
    }

    /// Leave the game and go back to the idle landing view.
    pub fn exit_game(&mut self) {
        let Some(mode) = self.stage.mode() else {
            return;
        };
        info!("leaving {} mode", mode.name());
        self.playing = false;
        self.tetris.pause();
        self.release(mode);
        self.set_stage(Stage::Idle);
        self.signals.push(UiSignal::ControlsVisible(false));
        self.set_buttons(ButtonState {
            play: true,
            ..ButtonState::default()
        });

        let standard = self.config.spacing;
        self.spacing.retarget(standard);
        if self.spacing.is_at(standard) {
            self.spacing.snap_to(standard);
            self.rebuild_grid();
            self.remap_text();
        } else {
            // Stay blank until the density transition lands, then remap.
            self.grid.clear_game_state();
        }
    }

    /// Let the active mode write into the grid. `force` bypasses the fixed
    /// tick gates so a freshly rebuilt grid is repainted at once.
    fn tick_mode(&mut self, force: bool) {
        let Some(mode) = self.stage.mode() else {
            return;
        };
        let now = self.elapsed_ms;
        match mode {
            GameMode::Tetris => {
                if !force && self.gravity.ready(now, self.tetris.gravity_interval_ms()) {
                    self.tetris.drop();
                }
                self.tetris.project(&mut self.grid);
            }
            GameMode::Life => {
                if !force && self.life_tick.ready(now, self.config.life_tick_ms) {
                    life::step(&mut self.grid);
                }
            }
            GameMode::Doom => self.tick_emulator(now, force),
            GameMode::VideoA | GameMode::VideoB => self.tick_video(mode),
        }
    }

    fn tick_emulator(&mut self, now: f64, force: bool) {
        let failure = match self.caps.emulator.as_ref() {
            None => Some("no emulator".to_string()),
            Some(emu) => emu.error(),
        };
        if let Some(reason) = failure {
            debug!("emulator unavailable: {reason}");
            self.draw_missing_overlay();
            return;
        }
        let interval = self.config.emulator_sample_ms;
        if !self.emulator_tick.ready(now, interval) && !force {
            return;
        }
        let (cols, rows) = (self.grid.cols(), self.grid.rows());
        if let Some(emu) = self.caps.emulator.as_mut() {
            emu.update();
            if let Some(frame) = emu.frame(cols, rows) {
                sampler::apply_opaque(&mut self.grid, &frame);
            }
        }
    }

    fn draw_missing_overlay(&mut self) {
        let cx = (self.grid.cols() / 2) as i32;
        let cy = (self.grid.rows() / 2) as i32;
        for (text, dx, dy) in [("MISSING", -14, -8), ("DOOM", -8, 0), ("ZIP", -6, 8)] {
            font::draw_text(&mut self.grid, text, cx + dx, cy + dy, Rgb::RED, OVERLAY_OPACITY);
        }
    }

    fn tick_video(&mut self, mode: GameMode) {
        let (cols, rows) = (self.grid.cols(), self.grid.rows());
        let lead = self.config.lyric_lead_s;
        let Some(media) = self.media_for(mode) else {
            return;
        };
        if media.is_paused() {
            return;
        }
        let time = media.current_time();
        let Some(frame) = media.frame(cols, rows) else {
            return;
        };

        if mode == GameMode::VideoB {
            if let Some(line) = self.lyrics.advance(time + lead) {
                self.signals.push(UiSignal::Lyric(line.map(str::to_string)));
            }
            sampler::apply_color(&mut self.grid, &frame, self.config.colour_floor);
        } else {
            sampler::apply_silhouette(&mut self.grid, &frame, self.config.silhouette_cutoff);
        }
    }
}
