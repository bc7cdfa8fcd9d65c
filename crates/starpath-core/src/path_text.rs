//! Floating labels placed between consecutive events, fading in as the
//! camera approaches.

use glam::Vec3;
use serde::Deserialize;

use crate::constants::{
    PATH_TEXT_FADE_DISTANCE, PATH_TEXT_FULL_DISTANCE, PATH_TEXT_INITIAL_OPACITY, PATH_TEXT_LERP,
    PATH_TEXT_MIN_DELTA, PATH_TEXT_OPACITY_RATE, PATH_TEXT_Y_OFFSET,
};
use crate::story::StoryDataset;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PathTextConfig {
    pub lerp: f32,
    pub y_offset: f32,
    pub full_distance: f32,
    pub fade_distance: f32,
    pub opacity_rate: f32,
    pub initial_opacity: f32,
    pub min_delta: f32,
}

impl Default for PathTextConfig {
    fn default() -> Self {
        Self {
            lerp: PATH_TEXT_LERP,
            y_offset: PATH_TEXT_Y_OFFSET,
            full_distance: PATH_TEXT_FULL_DISTANCE,
            fade_distance: PATH_TEXT_FADE_DISTANCE,
            opacity_rate: PATH_TEXT_OPACITY_RATE,
            initial_opacity: PATH_TEXT_INITIAL_OPACITY,
            min_delta: PATH_TEXT_MIN_DELTA,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathText {
    pub event_index: usize,
    pub text: String,
    pub position: Vec3,
    opacity: f32,
}

impl PathText {
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Eases towards the distance-based target; returns whether the stored
    /// opacity changed.
    pub fn update(&mut self, camera_eye: Vec3, config: &PathTextConfig) -> bool {
        let target = target_opacity(self.position.distance(camera_eye), config);
        let next = self.opacity + (target - self.opacity) * config.opacity_rate;
        if (next - self.opacity).abs() <= config.min_delta {
            return false;
        }
        self.opacity = next.clamp(0.0, 1.0);
        true
    }
}

/// 1 inside `full_distance`, linear down to 0 at `fade_distance`.
pub fn target_opacity(distance: f32, config: &PathTextConfig) -> f32 {
    if distance < config.full_distance {
        1.0
    } else if distance < config.fade_distance {
        1.0 - (distance - config.full_distance) / (config.fade_distance - config.full_distance)
    } else {
        0.0
    }
}

/// One label for every event after the first that carries `text_before`.
pub fn build_path_texts(dataset: &StoryDataset, config: &PathTextConfig) -> Vec<PathText> {
    let events = dataset.events();
    events
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let text = pair[1].text_before.as_deref()?.trim();
            if text.is_empty() {
                return None;
            }
            let position =
                pair[0].position.lerp(pair[1].position, config.lerp) + Vec3::Y * config.y_offset;
            Some(PathText {
                event_index: i + 1,
                text: text.to_string(),
                position,
                opacity: config.initial_opacity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::StoryEvent;

    #[test]
    fn opacity_converges_in_small_steps() {
        let config = PathTextConfig::default();
        let mut label = PathText {
            event_index: 1,
            text: "x".into(),
            position: Vec3::ZERO,
            opacity: 0.8,
        };
        assert!(label.update(Vec3::new(0.0, 0.0, 5.0), &config));
        assert!((label.opacity() - 0.81).abs() < 1e-6);
        for _ in 0..500 {
            label.update(Vec3::new(0.0, 0.0, 5.0), &config);
        }
        // stops writing once the step drops under the threshold
        assert!(label.opacity() > 0.97);
        assert!(!label.update(Vec3::new(0.0, 0.0, 5.0), &config));
    }

    #[test]
    fn first_event_never_gets_a_label() {
        let mut first = StoryEvent::new("a", "", Vec3::ZERO);
        first.text_before = Some("ignored".into());
        let data = StoryDataset::from_events(vec![first]).unwrap();
        assert!(build_path_texts(&data, &PathTextConfig::default()).is_empty());
    }
}
