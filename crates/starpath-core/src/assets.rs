//! Typed readiness for the assets the scene depends on.
//!
//! The web front-end does the fetching; the engine only ever asks whether a
//! given asset is usable yet.

use std::fmt;

use serde::Deserialize;

use crate::constants::{
    BACKGROUND_STAR_TEXTURE_URL, FONT_FAMILY, FONT_URL, STAR_TEXTURE_URL, STORY_DATA_URL,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Font,
    StarTexture,
    BackgroundStarTexture,
    StoryData,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Font => "font",
            AssetKind::StarTexture => "star texture",
            AssetKind::BackgroundStarTexture => "background star texture",
            AssetKind::StoryData => "story data",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AssetState<T> {
    #[default]
    Unloaded,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> AssetState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            AssetState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssetState::Failed(_))
    }

    /// Marks a fetch as in flight. A resolved state is left alone.
    pub fn begin(&mut self) {
        if matches!(self, AssetState::Unloaded) {
            *self = AssetState::Loading;
        }
    }

    pub fn resolve(&mut self, result: Result<T, String>) {
        *self = match result {
            Ok(value) => AssetState::Ready(value),
            Err(reason) => AssetState::Failed(reason),
        };
    }
}

/// Where each asset is fetched from, relative to the page.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetPaths {
    pub font_family: String,
    pub font: String,
    pub star_texture: String,
    pub background_star_texture: String,
    pub story_data: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            font_family: FONT_FAMILY.to_string(),
            font: FONT_URL.to_string(),
            star_texture: STAR_TEXTURE_URL.to_string(),
            background_star_texture: BACKGROUND_STAR_TEXTURE_URL.to_string(),
            story_data: STORY_DATA_URL.to_string(),
        }
    }
}

impl AssetPaths {
    pub fn url(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Font => &self.font,
            AssetKind::StarTexture => &self.star_texture,
            AssetKind::BackgroundStarTexture => &self.background_star_texture,
            AssetKind::StoryData => &self.story_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_transitions() {
        let mut state: AssetState<u32> = AssetState::default();
        assert!(!state.is_ready());
        state.begin();
        assert_eq!(state, AssetState::Loading);
        state.resolve(Ok(7));
        assert_eq!(state.ready(), Some(&7));
        // begin() never clobbers a resolved asset
        state.begin();
        assert!(state.is_ready());
        state.resolve(Err("gone".into()));
        assert!(state.is_failed());
        assert_eq!(state.ready(), None);
    }

    #[test]
    fn paths_map_each_kind() {
        let paths = AssetPaths::default();
        assert_eq!(paths.url(AssetKind::StoryData), "story.json");
        assert_eq!(paths.url(AssetKind::Font), "fonts/orbitron.woff2");
    }
}
