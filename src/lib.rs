#![cfg(target_arch = "wasm32")]
use starpath_core::{ExperienceConfig, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use constants::{CANVAS_ID, CONFIG_URL};

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    let css = dom::sync_canvas_backing_size(canvas);
    session.borrow_mut().resize(css.x, css.y);
    let Some(window) = web::window() else {
        return;
    };
    let canvas_resize = canvas.clone();
    let session = session.clone();
    dom::add_listener(&window, "resize", None, move |_: web::Event| {
        let css = dom::sync_canvas_backing_size(&canvas_resize);
        session.borrow_mut().resize(css.x, css.y);
    });
}

/// `config.json` next to the page overrides the built-in defaults.
async fn load_config() -> ExperienceConfig {
    let Some(text) = assets::fetch_optional_text(CONFIG_URL).await else {
        log::info!("[config] no {CONFIG_URL}; using defaults");
        return ExperienceConfig::default();
    };
    match ExperienceConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[config] ignoring {CONFIG_URL}: {e}");
            ExperienceConfig::default()
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("starpath starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("#{CANVAS_ID} is not a canvas: {e:?}"))?;

    let config = load_config().await;
    let paths = config.assets.clone();
    let session = Rc::new(RefCell::new(Session::new(config)));
    session.borrow_mut().begin_loading();

    wire_canvas_resize(&canvas, &session);
    events::pointer::wire_input_handlers(&canvas, &session);
    events::keyboard::wire_keydown(&document, &session);
    events::ui::wire_controls(&document, &session);

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        session,
        canvas,
        document,
        gpu,
    )));
    frame::start_loop(frame_ctx.clone());

    spawn_local(async move {
        match assets::load_all(&paths).await {
            Ok(loaded) => frame_ctx.borrow_mut().install(loaded),
            Err(e) => frame_ctx.borrow_mut().fail(&e),
        }
    });
    Ok(())
}
