//! DOM listeners. Each one only records an [`InputEvent`]; the frame loop
//! acts on it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::render;
use crate::input::{Control, InputEvent};
use crate::Hero;

const BUTTONS: [(&str, Control); 4] = [
    ("btn-play", Control::Play),
    ("btn-pause", Control::Pause),
    ("btn-reset", Control::Reset),
    ("btn-close", Control::Close),
];

/// Attach `handler` for `kind` events of concrete type `E`. The closure lives
/// for the rest of the page.
fn listen<E, F>(target: &EventTarget, kind: &str, mut handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn pusher(hero: &Rc<RefCell<Hero>>) -> impl Fn(InputEvent) + 'static {
    let hero = hero.clone();
    move |event| hero.borrow_mut().push_event(event)
}

pub fn install(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    hero: Rc<RefCell<Hero>>,
) -> Result<(), JsValue> {
    let push = pusher(&hero);
    listen(window, "mousemove", move |e: MouseEvent| {
        push(InputEvent::PointerMove {
            x: e.client_x() as f32,
            y: e.client_y() as f32,
        })
    })?;
    let push = pusher(&hero);
    listen(window, "mousedown", move |_: MouseEvent| push(InputEvent::PointerDown))?;
    let push = pusher(&hero);
    listen(window, "mouseup", move |_: MouseEvent| push(InputEvent::PointerUp))?;

    let keys = hero.clone();
    listen(window, "keydown", move |e: KeyboardEvent| {
        let code = e.code();
        let mut hero = keys.borrow_mut();
        if hero.suppresses_default(&code) {
            e.prevent_default();
        }
        hero.push_event(InputEvent::KeyDown(code));
    })?;
    let push = pusher(&hero);
    listen(window, "keyup", move |e: KeyboardEvent| push(InputEvent::KeyUp(e.code())))?;

    let push = pusher(&hero);
    let w = window.clone();
    listen(window, "scroll", move |_: Event| {
        push(InputEvent::Scroll(w.scroll_y().unwrap_or(0.0) as f32))
    })?;

    let push = pusher(&hero);
    let w = window.clone();
    let canvas = canvas.clone();
    listen(window, "resize", move |_: Event| match render::fit_canvas(&w, &canvas) {
        Ok(vp) => push(InputEvent::Resize {
            width: vp.width,
            height: vp.height,
        }),
        Err(err) => log::warn!("resize failed: {err:?}"),
    })?;

    for (id, control) in BUTTONS {
        let Some(button) = document.get_element_by_id(id) else {
            log::debug!("no #{id} button");
            continue;
        };
        let push = pusher(&hero);
        listen(&button, "click", move |_: Event| push(InputEvent::Control(control)))?;
    }
    Ok(())
}
