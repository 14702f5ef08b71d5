//! Browser entry point: owns the page's [`Controller`] and wires it to the
//! page lifecycle (`DOMContentLoaded`, `pageshow`) and to mutation callbacks.

pub mod dom;
pub mod logging;
pub mod observer;

use std::cell::RefCell;

use dawn_contrast_core::Controller;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Window};

pub use dom::WebDom;

thread_local! {
    static CONTROLLER: RefCell<Option<Controller<WebDom>>> = const { RefCell::new(None) };
}

/// Run `f` against the installed controller. Returns `None` when nothing is
/// installed or the controller is already borrowed further up the stack.
fn with_controller<R>(f: impl FnOnce(&mut Controller<WebDom>) -> R) -> Option<R> {
    CONTROLLER.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

/// Observer callback hook. A busy controller leaves the batch queued; it is
/// picked up by the next drain.
fn drain_pending() {
    with_controller(Controller::process_pending);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();
    install()
}

/// Create the controller for this page and schedule the first evaluation.
///
/// Evaluation waits for `DOMContentLoaded` while the document is still
/// loading. Calling this again after a successful install does nothing.
#[wasm_bindgen]
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let dom = WebDom::new(window.clone(), drain_pending)
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let document = dom.document().clone();

    let fresh = CONTROLLER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) if slot.is_none() => {
            *slot = Some(Controller::new(dom));
            true
        }
        _ => false,
    });
    if !fresh {
        return Ok(());
    }

    if document.ready_state() == "loading" {
        let ready_window = window.clone();
        let on_ready = Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = boot(&ready_window) {
                web_sys::console::error_1(&err);
            }
        });
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
            &options,
        )?;
        on_ready.forget();
        Ok(())
    } else {
        boot(&window)
    }
}

/// First evaluation, then re-evaluate whenever the page is shown again
/// (including restores from the back/forward cache).
fn boot(window: &Window) -> Result<(), JsValue> {
    evaluate();

    let on_pageshow = Closure::<dyn FnMut()>::new(evaluate);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "pageshow",
        on_pageshow.as_ref().unchecked_ref(),
        &options,
    )?;
    on_pageshow.forget();
    Ok(())
}

/// Re-assess the page and switch harsh-mode on or off.
#[wasm_bindgen]
pub fn evaluate() {
    with_controller(Controller::evaluate);
}

/// Switch harsh-mode off and remove every marker.
#[wasm_bindgen]
pub fn teardown() {
    with_controller(Controller::teardown);
}

/// Controller status as JSON: state, whether the watcher runs, last scan report.
#[wasm_bindgen]
pub fn status() -> Result<String, JsError> {
    let status = with_controller(|controller| controller.status())
        .ok_or_else(|| JsError::new("controller not installed"))?;
    serde_json::to_string(&status).map_err(|e| JsError::new(&e.to_string()))
}
