// Host-side tests for hover, the info panel and the image carousel.

use glam::Vec3;
use starpath_core::carousel::{Carousel, CarouselConfig, CarouselNav};
use starpath_core::interaction::{InteractionState, Mode};
use starpath_core::registry::{RegistryConfig, StoryPointRegistry};
use starpath_core::story::{StoryDataset, StoryEvent};
use starpath_core::ui::UiUpdate;

fn dataset() -> StoryDataset {
    let mut a = StoryEvent::new("a", "2005", Vec3::new(0.0, 0.0, -5.0));
    a.title = "First".into();
    a.images = vec!["a1.jpg".into(), "a2.jpg".into(), "a3.jpg".into()];
    let mut b = StoryEvent::new("b", "2010", Vec3::new(0.0, 0.0, -15.0));
    b.title = "Second".into();
    b.images = vec!["b1.jpg".into()];
    let c = StoryEvent::new("c", "2015", Vec3::new(0.0, 0.0, -25.0));
    StoryDataset::from_events(vec![a, b, c]).unwrap()
}

fn setup() -> (InteractionState, StoryPointRegistry, StoryDataset) {
    let data = dataset();
    let mut registry = StoryPointRegistry::new(RegistryConfig::default());
    registry.rebuild(&data);
    (InteractionState::new(CarouselConfig::default()), registry, data)
}

fn images(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("images/{i}.jpg")).collect()
}

#[test]
fn at_most_one_point_is_hovered() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    for hit in [Some(0), Some(1), Some(1), Some(2), None, Some(0), Some(2)] {
        state.update_hover(hit, &mut registry, &data, &mut ui);
        assert!(registry.hovered_count() <= 1);
        assert_eq!(state.hovered(), hit);
        if let Some(i) = hit {
            assert!(registry.get(i).unwrap().is_hovered());
        }
    }
}

#[test]
fn switching_hover_exits_before_entering() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    state.update_hover(Some(0), &mut registry, &data, &mut ui);
    ui.clear();
    state.update_hover(Some(1), &mut registry, &data, &mut ui);

    let closed = ui
        .iter()
        .position(|u| *u == UiUpdate::PanelVisible(false))
        .expect("panel closed");
    let content = ui
        .iter()
        .position(|u| matches!(u, UiUpdate::PanelContent { title, .. } if title == "Second"))
        .expect("new content");
    let opened = ui
        .iter()
        .rposition(|u| *u == UiUpdate::PanelVisible(true))
        .expect("panel opened");
    assert!(closed < content && content < opened);

    // carousel now belongs to the new point
    assert_eq!(state.carousel().images(), ["images/b1.jpg".to_string()]);
    assert!(!registry.get(0).unwrap().is_hovered());
}

#[test]
fn exit_clears_carousel_and_panel() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    state.update_hover(Some(0), &mut registry, &data, &mut ui);
    assert!(state.panel_visible());
    assert!(state.carousel().is_auto_advancing());
    state.update_hover(None, &mut registry, &data, &mut ui);
    assert!(!state.panel_visible());
    assert!(state.carousel().is_empty());
    assert!(!state.carousel().is_auto_advancing());
    assert_eq!(registry.hovered_count(), 0);
}

#[test]
fn returning_to_intro_runs_hover_exit() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    state.set_mode(Mode::Active, &mut registry, &mut ui);
    state.update_hover(Some(2), &mut registry, &data, &mut ui);
    state.set_mode(Mode::Intro, &mut registry, &mut ui);
    assert_eq!(state.mode(), Mode::Intro);
    assert_eq!(state.hovered(), None);
    assert_eq!(registry.hovered_count(), 0);
}

#[test]
fn hover_animates_scale_and_opacity() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    state.update_hover(Some(0), &mut registry, &data, &mut ui);
    registry.advance(0.5);
    let point = registry.get(0).unwrap();
    assert!((point.scale().x - 2.5).abs() < 1e-5);
    assert!((point.opacity() - 1.0).abs() < 1e-5);

    state.update_hover(None, &mut registry, &data, &mut ui);
    registry.advance(0.05);
    let mid = registry.get(0).unwrap().scale().x;
    assert!(mid > 2.0 && mid < 2.5);
    registry.advance(0.5);
    assert_eq!(registry.get(0).unwrap().scale().x, 2.0);
}

#[test]
fn carousel_wraps_both_ways() {
    let mut c = Carousel::new(CarouselConfig::default());
    c.load(images(3));
    assert_eq!(c.index(), 0);
    assert!(c.navigate(CarouselNav::Prev));
    assert_eq!(c.index(), 2);
    assert!(c.navigate(CarouselNav::Next));
    assert_eq!(c.index(), 0);
    for _ in 0..10 {
        c.navigate(CarouselNav::Next);
        assert!(c.index() < c.len());
    }
}

#[test]
fn auto_advance_fires_once_per_interval() {
    let mut c = Carousel::new(CarouselConfig::default());
    c.load(images(3));
    let mut advances = 0;
    // 12.5 seconds in 100 ms steps
    for _ in 0..125 {
        if c.tick(0.1).advanced {
            advances += 1;
        }
    }
    assert_eq!(advances, 3);
    assert_eq!(c.index(), 0);
}

#[test]
fn manual_navigation_restarts_the_countdown() {
    let mut c = Carousel::new(CarouselConfig::default());
    c.load(images(2));
    for _ in 0..35 {
        assert!(!c.tick(0.1).advanced);
    }
    c.navigate(CarouselNav::Next);
    // a full interval must pass again before the next auto step
    for _ in 0..35 {
        assert!(!c.tick(0.1).advanced);
    }
    let mut fired = false;
    for _ in 0..10 {
        fired |= c.tick(0.1).advanced;
    }
    assert!(fired);
}

#[test]
fn arrow_keys_only_work_with_the_panel_open() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    assert!(!state.on_key("ArrowRight", &mut ui));
    state.update_hover(Some(0), &mut registry, &data, &mut ui);
    assert!(state.on_key("ArrowRight", &mut ui));
    assert_eq!(state.carousel().index(), 1);
    assert!(state.on_key("ArrowLeft", &mut ui));
    assert!(state.on_key("ArrowLeft", &mut ui));
    assert_eq!(state.carousel().index(), 2);
    assert!(!state.on_key("Enter", &mut ui));

    // a single image has no navigation at all
    state.update_hover(Some(1), &mut registry, &data, &mut ui);
    assert!(!state.on_key("ArrowRight", &mut ui));
    assert!(ui.contains(&UiUpdate::CarouselDots {
        count: 0,
        active: 0
    }));
}

#[test]
fn swapped_images_carry_alt_text() {
    let (mut state, mut registry, data) = setup();
    let mut ui = Vec::new();
    state.update_hover(Some(0), &mut registry, &data, &mut ui);
    ui.clear();
    state.tick(0.2, &mut ui);
    assert!(ui.contains(&UiUpdate::CarouselImage {
        src: Some("images/a1.jpg".into()),
        alt: "First - Image 1".into(),
    }));
    assert!(ui.contains(&UiUpdate::CarouselOpacity(1.0)));
}

#[test]
fn info_panel_stays_inside_the_viewport() {
    use glam::Vec2;
    use starpath_core::ui::panel_position;

    let viewport = Vec2::new(1280.0, 720.0);
    let panel = Vec2::new(320.0, 240.0);
    let margin = 20.0;
    for x in (0..=1280).step_by(64) {
        for y in (0..=720).step_by(48) {
            let pointer = Vec2::new(x as f32, y as f32);
            let at = panel_position(pointer, panel, viewport, margin);
            assert!(at.x >= margin && at.y >= margin, "{pointer:?} -> {at:?}");
            assert!(at.x + panel.x <= viewport.x - margin + 1e-3, "{pointer:?} -> {at:?}");
            assert!(at.y + panel.y <= viewport.y - margin + 1e-3, "{pointer:?} -> {at:?}");
        }
    }
}
