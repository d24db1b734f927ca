//! Applies [`UiSignal`]s to the page around the canvas.

use log::info;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::signal::{ButtonState, UiSignal};

pub struct Chrome {
    canvas: Element,
    controls: Option<Element>,
    play: Option<HtmlElement>,
    pause: Option<HtmlElement>,
    reset: Option<HtmlElement>,
    help: Option<HtmlElement>,
    help_modal: Option<Element>,
    lyrics: Option<HtmlElement>,
    header: Option<Element>,
}

fn html(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn set_class(el: Option<&Element>, class: &str, on: bool) {
    if let Some(el) = el {
        el.class_list().toggle_with_force(class, on).ok();
    }
}

fn set_shown(el: Option<&HtmlElement>, shown: bool) {
    if let Some(el) = el {
        let display = if shown { "block" } else { "none" };
        el.style().set_property("display", display).ok();
    }
}

impl Chrome {
    pub fn new(document: &Document, canvas: &Element) -> Result<Self, JsValue> {
        let chrome = Self {
            canvas: canvas.clone(),
            controls: document.get_element_by_id("game-controls"),
            play: html(document, "btn-play"),
            pause: html(document, "btn-pause"),
            reset: html(document, "btn-reset"),
            help: html(document, "btn-help"),
            help_modal: document.get_element_by_id("help-modal"),
            lyrics: html(document, "lyrics-container"),
            header: document.get_element_by_id("main-header"),
        };
        chrome.wire_help()?;
        Ok(chrome)
    }

    /// The help modal is pure page chrome; the hero never sees it.
    fn wire_help(&self) -> Result<(), JsValue> {
        let (Some(button), Some(modal)) = (self.help.as_ref(), self.help_modal.as_ref()) else {
            return Ok(());
        };
        let target = modal.clone();
        let open = Closure::<dyn FnMut()>::new(move || set_class(Some(&target), "active", true));
        button.add_event_listener_with_callback("click", open.as_ref().unchecked_ref())?;
        open.forget();

        // Clicks on the backdrop or the close glyph dismiss it.
        let target = modal.clone();
        let close = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
            let Some(clicked) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if clicked == target || clicked.class_list().contains("modal-close") {
                set_class(Some(&target), "active", false);
            }
        });
        modal.add_event_listener_with_callback("click", close.as_ref().unchecked_ref())?;
        close.forget();
        Ok(())
    }

    fn buttons(&self, state: ButtonState) {
        set_shown(self.play.as_ref(), state.play);
        set_shown(self.pause.as_ref(), state.pause);
        set_shown(self.reset.as_ref(), state.reset);
        set_shown(self.help.as_ref(), state.help);
    }

    pub fn apply(&self, signal: &UiSignal) {
        match signal {
            UiSignal::StageChanged(stage) => {
                self.canvas.set_attribute("data-stage", &stage.to_string()).ok();
            }
            UiSignal::ControlsVisible(shown) => {
                set_class(self.controls.as_ref(), "active", *shown);
                if !shown {
                    set_class(self.help_modal.as_ref(), "active", false);
                }
            }
            UiSignal::Buttons(state) => self.buttons(*state),
            UiSignal::Lyric(line) => {
                if let Some(el) = &self.lyrics {
                    el.set_inner_text(line.as_deref().unwrap_or(""));
                }
            }
            UiSignal::LyricOverlay(on) => {
                set_class(self.lyrics.as_deref(), "active", *on);
                set_class(self.header.as_ref(), "lyrics-mode", *on);
            }
            UiSignal::BrushSize(size) => info!("brush size {size}"),
        }
    }
}
