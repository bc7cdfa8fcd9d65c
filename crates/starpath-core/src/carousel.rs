//! Image carousel for the hovered story point.
//!
//! Auto-advance and the fade swap are countdowns driven by frame `dt`, so
//! stopping them is a plain state change.

use serde::Deserialize;

use crate::constants::{CAROUSEL_FADE_SECS, CAROUSEL_INTERVAL_SECS};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    pub interval_secs: f32,
    pub fade_secs: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_secs: CAROUSEL_INTERVAL_SECS,
            fade_secs: CAROUSEL_FADE_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarouselNav {
    Next,
    Prev,
    Jump(usize),
}

/// What changed during a [`Carousel::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarouselTick {
    pub advanced: bool,
    pub swapped: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Carousel {
    config: CarouselConfig,
    images: Vec<String>,
    index: usize,
    auto_advance: Option<f32>,
    fade: Option<f32>,
    displayed: Option<usize>,
}

impl Carousel {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replaces the image list, shows the first image and starts cycling.
    pub fn load(&mut self, images: Vec<String>) {
        self.images = images;
        self.index = 0;
        self.displayed = None;
        self.fade = None;
        self.auto_advance = None;
        if !self.images.is_empty() {
            self.begin_swap();
            self.restart_timer();
        }
    }

    /// Empties the carousel and stops every timer.
    pub fn clear(&mut self) {
        self.images.clear();
        self.index = 0;
        self.auto_advance = None;
        self.fade = None;
        self.displayed = None;
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Source actually on screen; lags `current()` during a fade.
    pub fn displayed(&self) -> Option<&str> {
        self.displayed
            .and_then(|i| self.images.get(i))
            .map(String::as_str)
    }

    pub fn displayed_index(&self) -> Option<usize> {
        self.displayed
    }

    pub fn image_opacity(&self) -> f32 {
        if self.fade.is_some() || self.displayed.is_none() {
            0.0
        } else {
            1.0
        }
    }

    pub fn has_navigation(&self) -> bool {
        self.images.len() > 1
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advance.is_some()
    }

    pub fn dot_count(&self) -> usize {
        if self.has_navigation() {
            self.images.len()
        } else {
            0
        }
    }

    /// Manual navigation. Wraps and restarts the countdown; returns whether
    /// the index changed.
    pub fn navigate(&mut self, nav: CarouselNav) -> bool {
        if !self.has_navigation() {
            return false;
        }
        let n = self.images.len();
        let next = match nav {
            CarouselNav::Next => (self.index + 1) % n,
            CarouselNav::Prev => (self.index + n - 1) % n,
            CarouselNav::Jump(i) if i < n => i,
            CarouselNav::Jump(_) => return false,
        };
        self.restart_timer();
        self.set_index(next)
    }

    fn set_index(&mut self, index: usize) -> bool {
        if index == self.index && self.displayed == Some(index) {
            return false;
        }
        self.index = index;
        self.begin_swap();
        true
    }

    fn begin_swap(&mut self) {
        if self.config.fade_secs > 0.0 {
            self.fade = Some(self.config.fade_secs);
        } else {
            self.displayed = Some(self.index);
        }
    }

    fn restart_timer(&mut self) {
        if !self.images.is_empty() {
            self.auto_advance = Some(self.config.interval_secs.max(f32::EPSILON));
        }
    }

    pub fn tick(&mut self, dt: f32) -> CarouselTick {
        let mut out = CarouselTick::default();
        if let Some(remaining) = self.auto_advance.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *remaining += self.config.interval_secs.max(f32::EPSILON);
                if self.images.len() > 1 {
                    let next = (self.index + 1) % self.images.len();
                    out.advanced = self.set_index(next);
                }
            }
        }
        if let Some(remaining) = self.fade.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.fade = None;
                self.displayed = Some(self.index);
                out.swapped = true;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imgs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("images/{i}.jpg")).collect()
    }

    #[test]
    fn fade_swaps_source_after_delay() {
        let mut c = Carousel::new(CarouselConfig::default());
        c.load(imgs(2));
        assert_eq!(c.image_opacity(), 0.0);
        assert_eq!(c.displayed(), None);
        let t = c.tick(0.1);
        assert!(!t.swapped);
        let t = c.tick(0.1);
        assert!(t.swapped);
        assert_eq!(c.displayed(), Some("images/0.jpg"));
        assert_eq!(c.image_opacity(), 1.0);
    }

    #[test]
    fn single_image_never_cycles() {
        let mut c = Carousel::new(CarouselConfig::default());
        c.load(imgs(1));
        assert!(c.is_auto_advancing());
        assert!(!c.has_navigation());
        assert_eq!(c.dot_count(), 0);
        for _ in 0..100 {
            assert!(!c.tick(0.1).advanced);
        }
        assert_eq!(c.index(), 0);
        assert!(!c.navigate(CarouselNav::Next));
    }

    #[test]
    fn out_of_range_jump_is_ignored() {
        let mut c = Carousel::new(CarouselConfig::default());
        c.load(imgs(3));
        assert!(!c.navigate(CarouselNav::Jump(3)));
        assert!(c.navigate(CarouselNav::Jump(2)));
        assert_eq!(c.index(), 2);
    }
}
