//! Presentation updates emitted by the engine, plus the text formatting and
//! panel layout helpers the DOM layer needs.

use glam::Vec2;
use serde::Deserialize;

use crate::temporal::{format_count, format_number, Age, LifeStats};

pub const INTRO_AGE_TEXT: &str = "0y 0m 0d";

#[derive(Clone, Debug, PartialEq)]
pub struct StatsText {
    pub heartbeats: String,
    pub breaths: String,
    pub moon_orbits: String,
    pub candles: String,
}

impl From<&LifeStats> for StatsText {
    fn from(stats: &LifeStats) -> Self {
        Self {
            heartbeats: format_count(stats.heartbeats),
            breaths: format_count(stats.breaths),
            moon_orbits: format_number(stats.moon_orbits),
            candles: format_count(stats.candles),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathLabel {
    pub index: usize,
    /// CSS pixels from the top-left of the viewport; `None` when off screen.
    pub screen: Option<Vec2>,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiUpdate {
    IntroVisible(bool),
    IntroText {
        title: String,
        message: String,
        show_button: bool,
    },
    PanelVisible(bool),
    PanelContent {
        title: String,
        date: String,
        note: String,
    },
    CarouselImage {
        src: Option<String>,
        alt: String,
    },
    CarouselOpacity(f32),
    CarouselNav {
        visible: bool,
    },
    CarouselDots {
        count: usize,
        active: usize,
    },
    AgeText(String),
    StatsContent(StatsText),
    StatsVisible(bool),
    PathLabelsCreated(Vec<String>),
    PathLabels(Vec<PathLabel>),
}

/// Copy shown on the intro overlay.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroConfig {
    pub title: String,
    pub message: String,
    pub birthday_title: String,
    pub birthday_message: String,
    pub loading_message: String,
    pub error_title: String,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            title: "A Journey For You".to_string(),
            message: "Let's recall some moments, woven into the stars...".to_string(),
            birthday_title: "Happy Birthday".to_string(),
            birthday_message: "Another trip around the sun. Let's recall some moments, woven into the stars..."
                .to_string(),
            loading_message: "Still gathering the stars, one moment...".to_string(),
            error_title: "Loading Error".to_string(),
        }
    }
}

pub fn format_age(age: &Age) -> String {
    format!(
        "{}y {}m {}d ({} days old)",
        age.years,
        age.months,
        age.days,
        format_count(age.total_days)
    )
}

pub fn image_alt(title: &str, index: usize) -> String {
    format!("{title} - Image {}", index + 1)
}

/// Places a panel of `panel` size next to the pointer, flipping to the other
/// side when it would overflow and clamping to the margin.
pub fn panel_position(pointer: Vec2, panel: Vec2, viewport: Vec2, offset: f32) -> Vec2 {
    let mut x = pointer.x + offset;
    let mut y = pointer.y + offset;
    if x + panel.x > viewport.x - offset {
        x = pointer.x - panel.x - offset;
    }
    if y + panel.y > viewport.y - offset {
        y = pointer.y - panel.y - offset;
    }
    Vec2::new(x.max(offset), y.max(offset))
}
