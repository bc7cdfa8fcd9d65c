//! Progressive-disclosure interaction: hover -> info panel -> image carousel,
//! plus the stats tooltip lock and background clicks.

use crate::carousel::{Carousel, CarouselConfig, CarouselNav};
use crate::registry::StoryPointRegistry;
use crate::starfield::SpawnTrigger;
use crate::story::StoryDataset;
use crate::ui::{image_alt, UiUpdate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Intro,
    Active,
}

/// Whether a shooting star may be spawned for `trigger` in `mode`: the
/// schedule only runs behind the intro, clicks only count once active.
pub fn spawn_allowed(mode: Mode, trigger: SpawnTrigger) -> bool {
    matches!(
        (mode, trigger),
        (Mode::Intro, SpawnTrigger::Schedule) | (Mode::Active, SpawnTrigger::Click)
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Swallowed by the locked stats tooltip.
    Absorbed,
    Ignored,
    StoryPoint(usize),
    SpawnShootingStar,
}

#[derive(Clone, Debug)]
pub struct InteractionState {
    mode: Mode,
    hovered: Option<usize>,
    hovered_title: String,
    carousel: Carousel,
    panel_visible: bool,
    tooltip_locked: bool,
    tooltip_preview: bool,
}

impl InteractionState {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            mode: Mode::Intro,
            hovered: None,
            hovered_title: String::new(),
            carousel: Carousel::new(config),
            panel_visible: false,
            tooltip_locked: false,
            tooltip_preview: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == Mode::Active
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn tooltip_locked(&self) -> bool {
        self.tooltip_locked
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip_locked || self.tooltip_preview
    }

    /// Switches mode. Leaving `Active` runs a full hover exit first.
    pub fn set_mode(&mut self, mode: Mode, registry: &mut StoryPointRegistry, ui: &mut Vec<UiUpdate>) {
        if mode == Mode::Intro {
            self.clear_hover(registry, ui);
        }
        self.mode = mode;
    }

    /// Applies this frame's pick result. Exit always completes before enter.
    pub fn update_hover(
        &mut self,
        hit: Option<usize>,
        registry: &mut StoryPointRegistry,
        dataset: &StoryDataset,
        ui: &mut Vec<UiUpdate>,
    ) {
        if hit == self.hovered {
            return;
        }
        self.clear_hover(registry, ui);
        if let Some(index) = hit {
            self.enter_hover(index, registry, dataset, ui);
        }
    }

    pub fn clear_hover(&mut self, registry: &mut StoryPointRegistry, ui: &mut Vec<UiUpdate>) {
        let Some(index) = self.hovered.take() else {
            return;
        };
        log::debug!("[hover] exit {index}");
        registry.set_hovered(index, false);
        self.hovered_title.clear();
        self.carousel.clear();
        self.panel_visible = false;
        ui.push(UiUpdate::PanelVisible(false));
        ui.push(UiUpdate::CarouselImage {
            src: None,
            alt: String::new(),
        });
        ui.push(UiUpdate::CarouselNav { visible: false });
        ui.push(UiUpdate::CarouselDots {
            count: 0,
            active: 0,
        });
    }

    fn enter_hover(
        &mut self,
        index: usize,
        registry: &mut StoryPointRegistry,
        dataset: &StoryDataset,
        ui: &mut Vec<UiUpdate>,
    ) {
        let Some(point) = registry.get(index) else {
            return;
        };
        let images = point.images().to_vec();
        let event = dataset.get(point.event_index);
        log::debug!("[hover] enter {index} ({})", point.id);
        registry.set_hovered(index, true);
        self.hovered = Some(index);
        self.hovered_title = event.map(|e| e.title.clone()).unwrap_or_default();

        ui.push(UiUpdate::PanelContent {
            title: self.hovered_title.clone(),
            date: event.map(|e| e.date.clone()).unwrap_or_default(),
            note: event.map(|e| e.note.clone()).unwrap_or_default(),
        });
        self.carousel.load(images);
        if self.carousel.is_empty() {
            ui.push(UiUpdate::CarouselImage {
                src: None,
                alt: String::new(),
            });
        } else {
            ui.push(UiUpdate::CarouselOpacity(self.carousel.image_opacity()));
        }
        ui.push(UiUpdate::CarouselNav {
            visible: self.carousel.has_navigation(),
        });
        self.push_dots(ui);
        self.panel_visible = true;
        ui.push(UiUpdate::PanelVisible(true));
    }

    fn push_dots(&self, ui: &mut Vec<UiUpdate>) {
        ui.push(UiUpdate::CarouselDots {
            count: self.carousel.dot_count(),
            active: self.carousel.index(),
        });
    }

    /// Manual carousel navigation; only while the panel is open.
    pub fn navigate(&mut self, nav: CarouselNav, ui: &mut Vec<UiUpdate>) -> bool {
        if !self.panel_visible || !self.carousel.navigate(nav) {
            return false;
        }
        ui.push(UiUpdate::CarouselOpacity(0.0));
        self.push_dots(ui);
        true
    }

    /// Arrow keys step the carousel. Returns whether the key was used.
    pub fn on_key(&mut self, key: &str, ui: &mut Vec<UiUpdate>) -> bool {
        match key {
            "ArrowLeft" => self.navigate(CarouselNav::Prev, ui),
            "ArrowRight" => self.navigate(CarouselNav::Next, ui),
            _ => false,
        }
    }

    pub fn on_background_click(&self, hit: Option<usize>) -> ClickOutcome {
        if self.tooltip_locked {
            return ClickOutcome::Absorbed;
        }
        match hit {
            Some(index) => ClickOutcome::StoryPoint(index),
            None if spawn_allowed(self.mode, SpawnTrigger::Click) => ClickOutcome::SpawnShootingStar,
            None => ClickOutcome::Ignored,
        }
    }

    /// Click on the age display. Returns the new tooltip visibility.
    pub fn toggle_tooltip(&mut self) -> bool {
        self.tooltip_locked = !self.tooltip_locked;
        self.tooltip_preview = false;
        self.tooltip_visible()
    }

    /// Hover preview; `None` when the lock makes it irrelevant.
    pub fn tooltip_hover(&mut self, entering: bool) -> Option<bool> {
        if self.tooltip_locked {
            return None;
        }
        self.tooltip_preview = entering;
        Some(entering)
    }

    pub fn tick(&mut self, dt: f32, ui: &mut Vec<UiUpdate>) {
        let tick = self.carousel.tick(dt);
        if tick.advanced {
            ui.push(UiUpdate::CarouselOpacity(0.0));
            self.push_dots(ui);
        }
        if tick.swapped {
            if let Some(index) = self.carousel.displayed_index() {
                ui.push(UiUpdate::CarouselImage {
                    src: self.carousel.displayed().map(str::to_string),
                    alt: image_alt(&self.hovered_title, index),
                });
            }
            ui.push(UiUpdate::CarouselOpacity(1.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_gating() {
        assert!(spawn_allowed(Mode::Intro, SpawnTrigger::Schedule));
        assert!(!spawn_allowed(Mode::Active, SpawnTrigger::Schedule));
        assert!(spawn_allowed(Mode::Active, SpawnTrigger::Click));
        assert!(!spawn_allowed(Mode::Intro, SpawnTrigger::Click));
    }

    #[test]
    fn locked_tooltip_absorbs_clicks() {
        let mut state = InteractionState::new(CarouselConfig::default());
        state.mode = Mode::Active;
        assert_eq!(state.on_background_click(None), ClickOutcome::SpawnShootingStar);
        assert!(state.toggle_tooltip());
        assert_eq!(state.on_background_click(None), ClickOutcome::Absorbed);
        assert_eq!(state.on_background_click(Some(0)), ClickOutcome::Absorbed);
        assert_eq!(state.tooltip_hover(false), None);
        assert!(state.tooltip_visible());
        assert!(!state.toggle_tooltip());
        assert_eq!(state.tooltip_hover(true), Some(true));
        assert!(state.tooltip_visible());
    }
}
