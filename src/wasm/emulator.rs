use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::capability::{Emulator, FrameSource};

const ADAPTER_GLOBAL: &str = "doomAdapter";

#[wasm_bindgen]
extern "C" {
    /// Page-provided emulator bridge living at `window.doomAdapter`.
    pub type DoomAdapter;

    #[wasm_bindgen(method, catch)]
    fn init(this: &DoomAdapter) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update(this: &DoomAdapter) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getFrame)]
    fn get_frame(this: &DoomAdapter, cols: u32, rows: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = handleKeyDown)]
    fn handle_key_down(this: &DoomAdapter, code: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = handleKeyUp)]
    fn handle_key_up(this: &DoomAdapter, code: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &DoomAdapter) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter)]
    fn error(this: &DoomAdapter) -> JsValue;
}

/// Resolves the adapter on every call, since its script may load after us.
pub struct JsEmulator {
    window: Window,
}

impl JsEmulator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn adapter(&self) -> Option<DoomAdapter> {
        let value = js_sys::Reflect::get(&self.window, &JsValue::from_str(ADAPTER_GLOBAL)).ok()?;
        (!value.is_undefined() && !value.is_null()).then(|| value.unchecked_into())
    }

    fn call(&self, what: &str, f: impl FnOnce(&DoomAdapter) -> Result<(), JsValue>) {
        if let Some(adapter) = self.adapter() {
            if let Err(err) = f(&adapter) {
                log::warn!("emulator {what} failed: {err:?}");
            }
        }
    }
}

impl FrameSource for JsEmulator {
    fn frame(&mut self, cols: usize, rows: usize) -> Option<Vec<u8>> {
        let value = self.adapter()?.get_frame(cols as u32, rows as u32).ok()?;
        if value.is_null() || value.is_undefined() {
            return None;
        }
        Some(js_sys::Uint8Array::new(&value).to_vec())
    }
}

impl Emulator for JsEmulator {
    fn init(&mut self) {
        self.call("init", |a| a.init());
    }

    fn update(&mut self) {
        self.call("update", |a| a.update());
    }

    fn key_down(&mut self, code: &str) {
        self.call("keydown", |a| a.handle_key_down(code));
    }

    fn key_up(&mut self, code: &str) {
        self.call("keyup", |a| a.handle_key_up(code));
    }

    fn stop(&mut self) {
        self.call("stop", |a| a.stop());
    }

    fn error(&self) -> Option<String> {
        let Some(adapter) = self.adapter() else {
            return Some("adapter not loaded".into());
        };
        let err = adapter.error();
        if err.is_falsy() {
            None
        } else {
            Some(err.as_string().unwrap_or_else(|| format!("{err:?}")))
        }
    }
}
