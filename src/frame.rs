use chrono::NaiveDate;
use instant::Instant;
use starpath_core::{ui, LoadError, Session, TextureSlot};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::assets::LoadedAssets;
use crate::constants::{INFO_PANEL_ID, PANEL_MARGIN_PX};
use crate::dom;
use crate::overlay;
use crate::render;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct FrameContext<'a> {
    pub session: Rc<RefCell<Session>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub panel: Option<web::HtmlElement>,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        session: Rc<RefCell<Session>>,
        canvas: web::HtmlCanvasElement,
        document: web::Document,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        let panel = dom::by_id(&document, INFO_PANEL_ID);
        Self {
            session,
            canvas,
            document,
            panel,
            gpu,
            last_instant: Instant::now(),
        }
    }

    /// Hands the loaded assets to the renderer and the engine.
    pub fn install(&mut self, assets: LoadedAssets) {
        if let Some(g) = &mut self.gpu {
            g.upload_texture(TextureSlot::Star, &assets.star);
            g.upload_texture(TextureSlot::BackgroundStar, &assets.background_star);
        }
        self.session
            .borrow_mut()
            .install(assets.dataset, assets.font_family, today());
        self.upload_clouds();
    }

    pub fn fail(&mut self, err: &LoadError) {
        self.session.borrow_mut().fail_load(err);
    }

    fn upload_clouds(&mut self) {
        let clouds = self.session.borrow_mut().take_clouds();
        if let Some(g) = &mut self.gpu {
            for cloud in &clouds {
                g.upload_cloud(cloud);
            }
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let css = dom::sync_canvas_backing_size(&self.canvas);
        {
            let mut session = self.session.borrow_mut();
            session.resize(css.x, css.y);
            session.frame(dt_sec, today());
        }
        let updates = self.session.borrow_mut().drain_ui();
        overlay::apply(&self.document, &updates);
        self.place_panel();

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            let session = self.session.borrow();
            let list = session.draw_list();
            if let Err(e) = g.render(session.camera(), &list) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Keeps the info panel beside the pointer and inside the viewport.
    fn place_panel(&self) {
        let Some(panel) = &self.panel else {
            return;
        };
        let session = self.session.borrow();
        if !session.interaction().panel_visible() {
            return;
        }
        let Some(pointer) = session.pointer() else {
            return;
        };
        let pos = ui::panel_position(
            pointer,
            dom::element_size(panel),
            dom::viewport_size(),
            PANEL_MARGIN_PX,
        );
        dom::set_style(panel, "left", &format!("{}px", pos.x));
        dom::set_style(panel, "top", &format!("{}px", pos.y));
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(tick: &Tick) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(closure) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Tick = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
