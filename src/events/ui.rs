use starpath_core::{CarouselNav, Session};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::*;
use crate::dom;
use crate::input;

/// Buttons and hover targets in the page chrome.
pub fn wire_controls(document: &web::Document, session: &Rc<RefCell<Session>>) {
    wire_recall_button(document, session);
    wire_carousel(document, session);
    wire_stats(document, session);
}

fn wire_recall_button(document: &web::Document, session: &Rc<RefCell<Session>>) {
    let session = session.clone();
    dom::add_click_listener(document, RECALL_BUTTON_ID, move |_| {
        session.borrow_mut().dismiss_intro();
    });
}

fn wire_carousel(document: &web::Document, session: &Rc<RefCell<Session>>) {
    for (id, nav) in [
        (INFO_IMAGE_PREV_ID, CarouselNav::Prev),
        (INFO_IMAGE_NEXT_ID, CarouselNav::Next),
    ] {
        let session = session.clone();
        dom::add_click_listener(document, id, move |ev| {
            ev.stop_propagation();
            session.borrow_mut().navigate_carousel(nav);
        });
    }

    // dots are rebuilt per story point, so listen on their container
    let session = session.clone();
    dom::add_click_listener(document, INFO_IMAGE_DOTS_ID, move |ev| {
        ev.stop_propagation();
        let index = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| input::parse_dot_index(el.get_attribute(DOT_INDEX_ATTR).as_deref()));
        if let Some(index) = index {
            session.borrow_mut().navigate_carousel(CarouselNav::Jump(index));
        }
    });
}

fn wire_stats(document: &web::Document, session: &Rc<RefCell<Session>>) {
    let Some(container) = document.get_element_by_id(AGE_CONTAINER_ID) else {
        log::warn!("[dom] missing #{AGE_CONTAINER_ID}");
        return;
    };
    {
        let session = session.clone();
        dom::add_listener(&container, "click", None, move |ev: web::MouseEvent| {
            // a tooltip click is never a background click
            ev.stop_propagation();
            session.borrow_mut().toggle_stats();
        });
    }
    for (event, entering) in [("mouseenter", true), ("mouseleave", false)] {
        let session = session.clone();
        dom::add_listener(&container, event, None, move |_: web::MouseEvent| {
            session.borrow_mut().stats_hover(entering);
        });
    }
}
