//! One visual story point per dataset event, with hover transitions,
//! glow pulses and ray picking.

use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::camera::{ray_sphere, Ray};
use crate::constants::*;
use crate::scene::{Billboard, Facing, TextureSlot};
use crate::story::{StoryDataset, StoryEvent};
use crate::tween::{Easing, Pulse, Tween};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub designated_special_id: String,
    pub image_base_path: String,
    pub ordinary_scale: f32,
    pub ordinary_opacity: f32,
    pub ordinary_color: [f32; 3],
    pub special_plane_size: f32,
    pub special_scale: f32,
    pub special_opacity: f32,
    pub special_color: [f32; 3],
    pub special_emissive: [f32; 3],
    pub designated_color: [f32; 3],
    pub designated_emissive: [f32; 3],
    pub special_ambient: f32,
    pub glow_rest: f32,
    pub glow_pulse_low: f32,
    pub glow_pulse_high: f32,
    pub glow_pulse_secs: f32,
    pub glow_pulse_stagger_secs: f32,
    pub hover_scale_factor: f32,
    pub hover_opacity: f32,
    pub hover_transition_secs: f32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            designated_special_id: DESIGNATED_SPECIAL_ID.to_string(),
            image_base_path: IMAGE_BASE_PATH.to_string(),
            ordinary_scale: ORDINARY_SCALE,
            ordinary_opacity: ORDINARY_OPACITY,
            ordinary_color: hex_rgb(ORDINARY_COLOR),
            special_plane_size: SPECIAL_PLANE_SIZE,
            special_scale: SPECIAL_SCALE,
            special_opacity: SPECIAL_OPACITY,
            special_color: hex_rgb(SPECIAL_COLOR),
            special_emissive: hex_rgb(SPECIAL_EMISSIVE),
            designated_color: hex_rgb(DESIGNATED_COLOR),
            designated_emissive: hex_rgb(DESIGNATED_EMISSIVE),
            special_ambient: SPECIAL_AMBIENT,
            glow_rest: GLOW_REST,
            glow_pulse_low: GLOW_PULSE_LOW,
            glow_pulse_high: GLOW_PULSE_HIGH,
            glow_pulse_secs: GLOW_PULSE_SECS,
            glow_pulse_stagger_secs: GLOW_PULSE_STAGGER_SECS,
            hover_scale_factor: HOVER_SCALE_FACTOR,
            hover_opacity: HOVER_OPACITY,
            hover_transition_secs: HOVER_TRANSITION_SECS,
        }
    }
}

#[derive(Clone, Debug)]
pub enum PointKind {
    /// Camera-facing sprite.
    Ordinary { color: [f32; 3] },
    /// Fixed-orientation glowing plane.
    Special {
        base_color: [f32; 3],
        emissive: [f32; 3],
        ambient: f32,
        plane_size: f32,
        rest_glow: f32,
        pulse: Pulse,
    },
}

#[derive(Clone, Debug)]
pub struct StoryPoint {
    pub event_index: usize,
    pub id: String,
    pub position: Vec3,
    kind: PointKind,
    hovered: bool,
    rest_scale: Vec2,
    rest_opacity: f32,
    scale: Tween<Vec2>,
    opacity: Tween<f32>,
    images: Vec<String>,
}

impl StoryPoint {
    fn from_event(
        index: usize,
        event: &StoryEvent,
        special_ordinal: usize,
        config: &RegistryConfig,
    ) -> Self {
        let designated = event.id == config.designated_special_id;
        let (kind, rest_scale, rest_opacity) = if event.special || designated {
            let (base_color, emissive) = if designated {
                (config.designated_color, config.designated_emissive)
            } else {
                (config.special_color, config.special_emissive)
            };
            let pulse = Pulse::new(
                config.glow_pulse_low,
                config.glow_pulse_high,
                config.glow_pulse_secs,
                special_ordinal as f32 * config.glow_pulse_stagger_secs,
                Easing::InOutSine,
            );
            (
                PointKind::Special {
                    base_color,
                    emissive,
                    ambient: config.special_ambient,
                    plane_size: config.special_plane_size,
                    rest_glow: config.glow_rest,
                    pulse,
                },
                Vec2::splat(config.special_scale),
                config.special_opacity,
            )
        } else {
            (
                PointKind::Ordinary {
                    color: config.ordinary_color,
                },
                Vec2::splat(config.ordinary_scale),
                config.ordinary_opacity,
            )
        };
        let images = event
            .images
            .iter()
            .map(|name| format!("{}{}", config.image_base_path, name))
            .collect();
        Self {
            event_index: index,
            id: event.id.clone(),
            position: event.position,
            kind,
            hovered: false,
            rest_scale,
            rest_opacity,
            scale: Tween::settled(rest_scale),
            opacity: Tween::settled(rest_opacity),
            images,
        }
    }

    pub fn kind(&self) -> &PointKind {
        &self.kind
    }

    pub fn is_special(&self) -> bool {
        matches!(self.kind, PointKind::Special { .. })
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn rest_scale(&self) -> Vec2 {
        self.rest_scale
    }

    pub fn rest_opacity(&self) -> f32 {
        self.rest_opacity
    }

    pub fn scale(&self) -> Vec2 {
        self.scale.value()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Glow intensity for special points; `None` for ordinary ones. Rests
    /// until the staggered pulse kicks in.
    pub fn glow(&self) -> Option<f32> {
        match &self.kind {
            PointKind::Special {
                pulse, rest_glow, ..
            } => Some(if pulse.is_started() {
                pulse.value()
            } else {
                *rest_glow
            }),
            PointKind::Ordinary { .. } => None,
        }
    }

    pub fn rest_glow(&self) -> Option<f32> {
        match &self.kind {
            PointKind::Special { rest_glow, .. } => Some(*rest_glow),
            PointKind::Ordinary { .. } => None,
        }
    }

    /// World-space width and height currently drawn.
    pub fn extent(&self) -> Vec2 {
        match &self.kind {
            PointKind::Ordinary { .. } => self.scale(),
            PointKind::Special { plane_size, .. } => self.scale() * *plane_size,
        }
    }

    pub fn pick_radius(&self) -> f32 {
        self.extent().max_element() * 0.5
    }

    pub(crate) fn enter_hover(&mut self, config: &RegistryConfig) {
        self.hovered = true;
        let secs = config.hover_transition_secs;
        self.scale
            .retarget(self.rest_scale * config.hover_scale_factor, secs, Easing::OutQuad);
        self.opacity
            .retarget(config.hover_opacity, secs, Easing::OutQuad);
    }

    pub(crate) fn exit_hover(&mut self, config: &RegistryConfig) {
        self.hovered = false;
        let secs = config.hover_transition_secs;
        self.scale.retarget(self.rest_scale, secs, Easing::OutQuad);
        self.opacity.retarget(self.rest_opacity, secs, Easing::OutQuad);
    }

    fn advance(&mut self, dt: f32) {
        self.scale.advance(dt);
        self.opacity.advance(dt);
        if let PointKind::Special { pulse, .. } = &mut self.kind {
            pulse.advance(dt);
        }
    }

    pub fn billboard(&self) -> Billboard {
        let (color, facing) = match &self.kind {
            PointKind::Ordinary { color } => (*color, Facing::Camera),
            PointKind::Special {
                base_color,
                emissive,
                ambient,
                ..
            } => {
                let glow = self.glow().unwrap_or_default();
                let lit = [0, 1, 2].map(|c| base_color[c] * ambient + emissive[c] * glow);
                (lit, Facing::Fixed)
            }
        };
        Billboard {
            position: self.position,
            size: self.extent(),
            color,
            opacity: self.opacity(),
            rotation: 0.0,
            texture: TextureSlot::Star,
            facing,
            render_order: POINT_RENDER_ORDER,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StoryPointRegistry {
    config: RegistryConfig,
    points: Vec<StoryPoint>,
    by_id: FnvHashMap<String, usize>,
}

impl StoryPointRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            points: Vec::new(),
            by_id: FnvHashMap::default(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Drops every existing point and creates one per event. Returns how many
    /// points were released.
    pub fn rebuild(&mut self, dataset: &StoryDataset) -> usize {
        let released = self.clear();
        let mut specials = 0;
        for (index, event) in dataset.events().iter().enumerate() {
            let point = StoryPoint::from_event(index, event, specials, &self.config);
            if point.is_special() {
                specials += 1;
            }
            self.by_id.entry(point.id.clone()).or_insert(index);
            self.points.push(point);
        }
        log::info!(
            "[scene] {} story points ({} special), released {}",
            self.points.len(),
            specials,
            released
        );
        released
    }

    pub fn clear(&mut self) -> usize {
        let released = self.points.len();
        self.points.clear();
        self.by_id.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StoryPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoryPoint> {
        self.points.iter()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn hovered_count(&self) -> usize {
        self.points.iter().filter(|p| p.hovered).count()
    }

    pub fn set_hovered(&mut self, index: usize, hovered: bool) {
        let config = &self.config;
        if let Some(point) = self.points.get_mut(index) {
            if hovered {
                point.enter_hover(config);
            } else {
                point.exit_hover(config);
            }
        }
    }

    /// Nearest story point along the ray.
    pub fn pick(&self, ray: &Ray) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.points.iter().enumerate() {
            if let Some(t) = ray_sphere(ray.origin, ray.direction, p.position, p.pick_radius()) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((i, t));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn advance(&mut self, dt: f32) {
        for p in &mut self.points {
            p.advance(dt);
        }
    }

    pub fn draw(&self, out: &mut Vec<Billboard>) {
        out.extend(self.points.iter().map(StoryPoint::billboard));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> StoryDataset {
        let mut special = StoryEvent::new("s", "", Vec3::new(0.0, 0.0, -10.0));
        special.special = true;
        let mut ordinary = StoryEvent::new("o", "", Vec3::new(0.0, 0.0, -5.0));
        ordinary.images = vec!["a.jpg".into()];
        StoryDataset::from_events(vec![
            ordinary,
            special,
            StoryEvent::new("mom-star", "", Vec3::new(0.0, 0.0, -20.0)),
        ])
        .unwrap()
    }

    #[test]
    fn classifies_points_and_prefixes_images() {
        let mut reg = StoryPointRegistry::new(RegistryConfig::default());
        reg.rebuild(&dataset());
        let o = reg.get(0).unwrap();
        assert!(!o.is_special());
        assert_eq!(o.images().to_vec(), vec!["images/a.jpg".to_string()]);
        assert_eq!(o.rest_scale(), Vec2::splat(2.0));
        assert_eq!(o.rest_opacity(), 0.5);
        assert_eq!(o.pick_radius(), 1.0);

        let s = reg.get(1).unwrap();
        assert!(s.is_special());
        assert_eq!(s.rest_glow(), Some(0.4));
        assert_eq!(s.pick_radius(), 1.5);

        let designated = reg.get(2).unwrap();
        assert!(designated.is_special());
        match designated.kind() {
            PointKind::Special { base_color, .. } => assert_eq!(*base_color, hex_rgb(0x8888dd)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(reg.index_of("mom-star"), Some(2));
    }

    #[test]
    fn rebuild_replaces_every_point() {
        let mut reg = StoryPointRegistry::new(RegistryConfig::default());
        assert_eq!(reg.rebuild(&dataset()), 0);
        reg.set_hovered(1, true);
        assert_eq!(reg.hovered_count(), 1);

        let smaller = StoryDataset::from_events(vec![
            StoryEvent::new("x", "", Vec3::ZERO),
            StoryEvent::new("y", "", Vec3::new(0.0, 0.0, -5.0)),
        ])
        .unwrap();
        assert_eq!(reg.rebuild(&smaller), 3);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.hovered_count(), 0);
        assert_eq!(reg.index_of("x"), Some(0));
        assert_eq!(reg.index_of("y"), Some(1));
        assert_eq!(reg.index_of("mom-star"), None);
        assert_eq!(reg.index_of("s"), None);

        assert_eq!(reg.rebuild(&smaller), 2);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.iter().filter(|p| p.id == "x").count(), 1);
    }

    #[test]
    fn pick_returns_the_nearest_hit() {
        let mut reg = StoryPointRegistry::new(RegistryConfig::default());
        reg.rebuild(&dataset());
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        assert_eq!(reg.pick(&ray), Some(0));
        let miss = Ray {
            origin: Vec3::new(50.0, 0.0, 0.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(reg.pick(&miss), None);
    }

    #[test]
    fn special_planes_face_a_fixed_direction() {
        let mut reg = StoryPointRegistry::new(RegistryConfig::default());
        reg.rebuild(&dataset());
        let mut out = Vec::new();
        reg.draw(&mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].facing, Facing::Camera);
        assert_eq!(out[1].facing, Facing::Fixed);
        assert_eq!(out[1].size, Vec2::splat(3.0));
    }
}
