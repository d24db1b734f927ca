use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::chrome::Chrome;
use super::js_error;
use crate::color::Rgb;
use crate::config::DotShape;
use crate::error::HeroError;
use crate::grid::Viewport;
use crate::surface::Surface;
use crate::Hero;

/// 2D canvas context as a dot [`Surface`].
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, HeroError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(HeroError::Context("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HeroError::Context("2d"))?;
        Ok(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, background: Rgb, width: f32, height: f32) {
        self.ctx.set_fill_style_str(&background.to_css());
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill_dot(&mut self, x: f32, y: f32, radius: f32, color: Rgb, shape: DotShape) {
        let (x, y, r) = (x as f64, y as f64, radius as f64);
        self.ctx.set_fill_style_str(&color.to_css());
        match shape {
            DotShape::Circle => {
                self.ctx.begin_path();
                if self.ctx.arc(x, y, r, 0.0, TAU).is_ok() {
                    self.ctx.fill();
                }
            }
            DotShape::Square => self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0),
        }
    }
}

/// Size the backing store for the device pixel ratio and return the logical
/// viewport. Resizing resets the context transform, so it is reapplied here.
pub fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    let dpr = window.device_pixel_ratio().max(1.0);

    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    let style = canvas.style();
    style.set_property("width", &format!("{width}px"))?;
    style.set_property("height", &format!("{height}px"))?;

    if let Some(ctx) = canvas
        .get_context("2d")?
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    {
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    }
    Ok(Viewport::new(width as f32, height as f32))
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) {
    if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {err:?}");
    }
}

/// Run the hero once per display refresh and push its UI signals to the page.
pub fn start(window: Window, canvas: HtmlCanvasElement, hero: Rc<RefCell<Hero>>, chrome: Chrome) -> Result<(), JsValue> {
    let mut surface = CanvasSurface::new(&canvas)?;
    let performance = window.performance().ok_or("no performance clock")?;

    // `f` holds the frame closure so it can re-schedule itself; the Option
    // lets the closure be created before it refers to itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_window = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut hero = hero.borrow_mut();
            hero.frame(performance.now(), &mut surface);
            for signal in hero.drain_signals() {
                chrome.apply(&signal);
            }
        }
        if let Some(callback) = f.borrow().as_ref() {
            request_frame(&frame_window, callback);
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        request_frame(&window, callback);
    }
    Ok(())
}
