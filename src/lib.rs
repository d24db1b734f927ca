//! Animated dot-grid hero background.
//!
//! The simulation core is plain Rust and runs anywhere; the browser shell in
//! `wasm` wires it to a canvas, DOM events and `requestAnimationFrame`.

pub mod capability;
pub mod cheat;
pub mod color;
pub mod config;
pub mod dot;
pub mod error;
pub mod font;
pub mod grid;
pub mod hero;
pub mod input;
pub mod life;
pub mod lyrics;
pub mod noise;
pub mod raster;
pub mod sampler;
pub mod schedule;
pub mod signal;
pub mod stage;
pub mod surface;
pub mod tetris;

pub use color::Rgb;
pub use config::{DotShape, HeroConfig, Theme};
pub use error::{HeroError, Result};
pub use grid::{Grid, Viewport};
pub use hero::{FrameStats, Hero};
pub use input::{Control, InputEvent};
pub use signal::{ButtonState, UiSignal};
pub use stage::{GameMode, Stage};
pub use surface::{RecordingSurface, Surface};

// Only compile the browser shell when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::{info, warn};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::capability::{Capabilities, MediaSource};
    use crate::{Hero, HeroConfig, HeroError};

    mod chrome;
    mod emulator;
    mod events;
    mod media;
    mod render;
    mod text;

    const CANVAS_ID: &str = "dot-canvas";
    const LYRICS_ID: &str = "lyrics-cues";

    impl From<HeroError> for JsValue {
        fn from(err: HeroError) -> Self {
            JsValue::from_str(&err.to_string())
        }
    }

    pub(crate) fn js_error(value: JsValue) -> HeroError {
        HeroError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }

    fn load_config(canvas: &web_sys::Element) -> HeroConfig {
        match canvas.get_attribute("data-config") {
            Some(json) => HeroConfig::from_json(&json).unwrap_or_else(|err| {
                warn!("ignoring data-config: {err}");
                HeroConfig::default()
            }),
            None => HeroConfig::default(),
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| HeroError::MissingElement(CANVAS_ID.into()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let config = load_config(&canvas);
        let viewport = render::fit_canvas(&window, &canvas)?;
        let rasterizer = text::CanvasTextRasterizer::new(&document)?;
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

        let caps = Capabilities {
            emulator: Some(Box::new(emulator::JsEmulator::new(window.clone()))),
            silhouette_video: media::VideoSource::find(&document, "bad-apple-video")?
                .map(|v| Box::new(v) as Box<dyn MediaSource>),
            color_video: media::VideoSource::find(&document, "rick-video")?
                .map(|v| Box::new(v) as Box<dyn MediaSource>),
        };
        let mut hero = Hero::new(config, viewport, Box::new(rasterizer), seed)?.with_capabilities(caps);
        if let Some(cues) = document.get_element_by_id(LYRICS_ID).and_then(|el| el.text_content()) {
            hero.set_lyrics(cues);
        }
        info!("hero ready: {}x{}", hero.grid().cols(), hero.grid().rows());

        let hero = Rc::new(RefCell::new(hero));
        events::install(&window, &document, &canvas, hero.clone())?;
        let chrome = chrome::Chrome::new(&document, &canvas)?;
        render::start(window, canvas, hero, chrome)?;
        Ok(())
    }
}
