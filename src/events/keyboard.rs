use starpath_core::Session;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::dom;

/// `h` toggles the intro overlay; arrow keys page the carousel while the
/// info panel is open.
pub fn wire_keydown(document: &web::Document, session: &Rc<RefCell<Session>>) {
    let session = session.clone();
    dom::add_listener(document, "keydown", None, move |ev: web::KeyboardEvent| {
        let key = ev.key();
        // holding `h` would flicker the overlay
        if ev.repeat() && key.eq_ignore_ascii_case("h") {
            return;
        }
        if session.borrow_mut().on_key(&key) {
            ev.prevent_default();
        }
    });
}
