// Host-side tests for front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn post_processing_values_are_sane() {
    assert!(BLOOM_STRENGTH > 0.0);
    assert!(BLOOM_THRESHOLD > 0.0 && BLOOM_THRESHOLD < 1.0);
    assert!(EXPOSURE > 0.0);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn instance_capacity_is_a_power_of_two() {
    assert!(INITIAL_INSTANCE_CAPACITY.is_power_of_two());
}

#[test]
fn dom_ids_are_unique() {
    let ids = [
        CANVAS_ID,
        INTRO_OVERLAY_ID,
        INTRO_TITLE_ID,
        INTRO_MESSAGE_ID,
        RECALL_BUTTON_ID,
        INFO_PANEL_ID,
        INFO_TITLE_ID,
        INFO_DATE_ID,
        INFO_NOTE_ID,
        INFO_IMAGE_ID,
        INFO_IMAGE_CONTAINER_ID,
        INFO_IMAGE_PREV_ID,
        INFO_IMAGE_NEXT_ID,
        INFO_IMAGE_DOTS_ID,
        AGE_CONTAINER_ID,
        AGE_TEXT_ID,
        STATS_TOOLTIP_ID,
        STAT_HEARTBEATS_ID,
        STAT_BREATHS_ID,
        STAT_MOON_ORBITS_ID,
        STAT_CANDLES_ID,
        PATH_LABEL_LAYER_ID,
    ];
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}
