use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlVideoElement};

use super::js_error;
use crate::capability::{FrameSource, MediaSource};
use crate::error::{HeroError, Result};

/// A `<video>` element resampled through a grid-sized scratch canvas.
pub struct VideoSource {
    video: HtmlVideoElement,
    scratch: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl VideoSource {
    /// Wrap `#id` if the page has it.
    pub fn find(document: &Document, id: &str) -> Result<Option<Self>> {
        let Some(el) = document.get_element_by_id(id) else {
            return Ok(None);
        };
        let video = el
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| HeroError::MissingElement(format!("{id} (video)")))?;
        let scratch = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HeroError::Context("scratch canvas"))?;
        let ctx = scratch
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(HeroError::Context("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HeroError::Context("2d"))?;
        Ok(Some(Self { video, scratch, ctx }))
    }
}

impl FrameSource for VideoSource {
    fn frame(&mut self, cols: usize, rows: usize) -> Option<Vec<u8>> {
        if cols == 0 || rows == 0 {
            return None;
        }
        if self.scratch.width() != cols as u32 || self.scratch.height() != rows as u32 {
            self.scratch.set_width(cols as u32);
            self.scratch.set_height(rows as u32);
        }
        let (w, h) = (cols as f64, rows as f64);
        self.ctx
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, w, h)
            .ok()?;
        let data = self.ctx.get_image_data(0.0, 0.0, w, h).ok()?.data();
        Some(data.0)
    }
}

impl MediaSource for VideoSource {
    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn play_from_start(&mut self) -> Result<()> {
        self.video.set_current_time(0.0);
        self.video.set_volume(1.0);
        let promise = self.video.play().map_err(js_error)?;
        // Autoplay may be refused until the next user gesture.
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!("video playback refused: {err:?}");
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(err) = self.video.pause() {
            warn!("video pause failed: {err:?}");
        }
    }
}
