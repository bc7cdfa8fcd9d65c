use glam::Vec2;
use starpath_core::{ClickOutcome, Session};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::dom;
use crate::input;

pub fn wire_input_handlers(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    wire_pointermove(canvas, session);
    wire_pointerleave(canvas, session);
    wire_wheel(canvas, session);
    wire_click(canvas, session);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    let canvas_for_move = canvas.clone();
    let session = session.clone();
    dom::add_listener(canvas, "pointermove", None, move |ev: web::PointerEvent| {
        let pos = dom::canvas_point(&canvas_for_move, &ev);
        session.borrow_mut().on_pointer_move(pos);
    });
}

fn wire_pointerleave(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    let session = session.clone();
    dom::add_listener(canvas, "pointerleave", None, move |_: web::PointerEvent| {
        session.borrow_mut().on_pointer_leave();
    });
}

// not passive: a consumed wheel must not also scroll the page
fn wire_wheel(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    let session = session.clone();
    dom::add_listener(canvas, "wheel", Some(false), move |ev: web::WheelEvent| {
        let page = dom::viewport_size().y;
        let dy = input::wheel_delta_px(ev.delta_y(), ev.delta_mode(), page);
        if session.borrow_mut().on_scroll(dy) {
            ev.prevent_default();
        }
    });
}

fn wire_click(canvas: &web::HtmlCanvasElement, session: &Rc<RefCell<Session>>) {
    let canvas_for_click = canvas.clone();
    let session = session.clone();
    dom::add_listener(canvas, "click", None, move |ev: web::MouseEvent| {
        let pos: Vec2 = dom::canvas_point(&canvas_for_click, &ev);
        match session.borrow_mut().on_click(pos) {
            ClickOutcome::SpawnShootingStar => log::debug!("[input] shooting star at {pos}"),
            ClickOutcome::StoryPoint(index) => log::debug!("[input] clicked story point {index}"),
            ClickOutcome::Absorbed | ClickOutcome::Ignored => {}
        }
    });
}
