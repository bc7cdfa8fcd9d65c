use starpath_core::ui::{PathLabel, StatsText, UiUpdate};
use web_sys as web;

use crate::constants::*;
use crate::dom;

/// Applies the engine's presentation updates to the page, in order.
pub fn apply(document: &web::Document, updates: &[UiUpdate]) {
    for update in updates {
        apply_one(document, update);
    }
}

fn apply_one(document: &web::Document, update: &UiUpdate) {
    match update {
        UiUpdate::IntroVisible(visible) => set_intro_visible(document, *visible),
        UiUpdate::IntroText {
            title,
            message,
            show_button,
        } => {
            dom::set_text(document, INTRO_TITLE_ID, title);
            dom::set_text(document, INTRO_MESSAGE_ID, message);
            dom::set_class_by_id(document, RECALL_BUTTON_ID, CLASS_HIDDEN, !show_button);
        }
        UiUpdate::PanelVisible(visible) => {
            dom::set_class_by_id(document, INFO_PANEL_ID, CLASS_VISIBLE, *visible);
        }
        UiUpdate::PanelContent { title, date, note } => {
            dom::set_text(document, INFO_TITLE_ID, title);
            dom::set_text(document, INFO_DATE_ID, date);
            dom::set_text(document, INFO_NOTE_ID, note);
        }
        UiUpdate::CarouselImage { src, alt } => set_image(document, src.as_deref(), alt),
        UiUpdate::CarouselOpacity(opacity) => {
            if let Some(img) = dom::by_id(document, INFO_IMAGE_ID) {
                dom::set_style(&img, "opacity", &opacity.to_string());
            }
        }
        UiUpdate::CarouselNav { visible } => {
            for id in [INFO_IMAGE_PREV_ID, INFO_IMAGE_NEXT_ID, INFO_IMAGE_DOTS_ID] {
                dom::set_class_by_id(document, id, CLASS_HIDDEN, !visible);
            }
        }
        UiUpdate::CarouselDots { count, active } => set_dots(document, *count, *active),
        UiUpdate::AgeText(text) => dom::set_text(document, AGE_TEXT_ID, text),
        UiUpdate::StatsContent(stats) => set_stats(document, stats),
        UiUpdate::StatsVisible(visible) => {
            dom::set_class_by_id(document, STATS_TOOLTIP_ID, CLASS_VISIBLE, *visible);
        }
        UiUpdate::PathLabelsCreated(texts) => create_path_labels(document, texts),
        UiUpdate::PathLabels(labels) => place_path_labels(document, labels),
    }
}

pub fn set_intro_visible(document: &web::Document, visible: bool) {
    dom::set_class_by_id(document, INTRO_OVERLAY_ID, CLASS_HIDDEN, !visible);
}

fn set_image(document: &web::Document, src: Option<&str>, alt: &str) {
    let Some(img) = document
        .get_element_by_id(INFO_IMAGE_ID)
        .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web::HtmlImageElement>(el).ok())
    else {
        return;
    };
    match src {
        Some(src) => {
            img.set_src(src);
            img.set_alt(alt);
            dom::set_class_by_id(document, INFO_IMAGE_CONTAINER_ID, CLASS_HIDDEN, false);
        }
        None => {
            _ = img.remove_attribute("src");
            img.set_alt("");
            dom::set_class_by_id(document, INFO_IMAGE_CONTAINER_ID, CLASS_HIDDEN, true);
        }
    }
}

fn set_dots(document: &web::Document, count: usize, active: usize) {
    let Some(container) = document.get_element_by_id(INFO_IMAGE_DOTS_ID) else {
        return;
    };
    let children = container.children();
    if children.length() as usize != count {
        container.set_inner_html("");
        for i in 0..count {
            let Ok(dot) = document.create_element("span") else {
                continue;
            };
            dom::set_class(&dot, CLASS_DOT, true);
            _ = dot.set_attribute(DOT_INDEX_ATTR, &i.to_string());
            _ = container.append_child(&dot);
        }
    }
    let children = container.children();
    for i in 0..children.length() {
        if let Some(dot) = children.item(i) {
            dom::set_class(&dot, CLASS_ACTIVE, i as usize == active);
        }
    }
}

fn set_stats(document: &web::Document, stats: &StatsText) {
    dom::set_text(document, STAT_HEARTBEATS_ID, &stats.heartbeats);
    dom::set_text(document, STAT_BREATHS_ID, &stats.breaths);
    dom::set_text(document, STAT_MOON_ORBITS_ID, &stats.moon_orbits);
    dom::set_text(document, STAT_CANDLES_ID, &stats.candles);
}

fn create_path_labels(document: &web::Document, texts: &[String]) {
    let Some(layer) = document.get_element_by_id(PATH_LABEL_LAYER_ID) else {
        if !texts.is_empty() {
            log::warn!("[overlay] missing #{PATH_LABEL_LAYER_ID}; path labels not shown");
        }
        return;
    };
    layer.set_inner_html("");
    for text in texts {
        let Ok(label) = document.create_element("div") else {
            continue;
        };
        dom::set_class(&label, CLASS_PATH_LABEL, true);
        label.set_text_content(Some(text));
        _ = label.set_attribute("style", "position:absolute;opacity:0;");
        _ = layer.append_child(&label);
    }
}

fn place_path_labels(document: &web::Document, labels: &[PathLabel]) {
    let Some(layer) = document.get_element_by_id(PATH_LABEL_LAYER_ID) else {
        return;
    };
    let children = layer.children();
    for label in labels {
        let Some(el) = children
            .item(label.index as u32)
            .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web::HtmlElement>(el).ok())
        else {
            continue;
        };
        match label.screen {
            Some(at) if label.opacity > 0.0 => {
                dom::set_style(
                    &el,
                    "transform",
                    &format!("translate(-50%, -50%) translate({:.1}px, {:.1}px)", at.x, at.y),
                );
                dom::set_style(&el, "opacity", &format!("{:.3}", label.opacity));
            }
            _ => dom::set_style(&el, "opacity", "0"),
        }
    }
}
