// Host-side tests for the procedural star fields. Every generator takes an
// explicit RNG, so a seeded StdRng makes the sky reproducible.

use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};
use starpath_core::camera::{Camera, CameraConfig};
use starpath_core::starfield::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

fn distance_to_segment(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[test]
fn belt_count_is_the_sum_of_segment_counts() {
    let positions = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(0.0, 0.0, -20.0),
    ];
    let config = ParallaxConfig::default();
    let cloud = generate_parallax_belt(&positions, &config, &mut rng()).unwrap();
    // two padding segments of 50 (100 stars each) + two segments of 10 (20 each)
    assert_eq!(cloud.len(), 240);

    let expected: usize = belt_segments(&positions, &config)
        .iter()
        .map(|(a, b)| stars_for_length(a.distance(*b), &config))
        .sum();
    assert_eq!(cloud.len(), expected);
}

#[test]
fn short_segments_still_get_the_minimum() {
    let config = ParallaxConfig::default();
    assert_eq!(stars_for_length(1.0, &config), 10);
    assert_eq!(stars_for_length(5.9, &config), 11);
}

#[test]
fn belt_stars_hug_their_segments() {
    let positions = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(5.0, 20.0, -10.0),
        Vec3::new(-8.0, 20.0, -40.0),
        Vec3::new(-8.0, 60.0, -40.0), // straight up: the vertical basis case
    ];
    let config = ParallaxConfig::default();
    let segments = belt_segments(&positions, &config);
    let cloud = generate_parallax_belt(&positions, &config, &mut rng()).unwrap();
    for star in &cloud.stars {
        let p = Vec3::from_array(star.position);
        let nearest = segments
            .iter()
            .map(|(a, b)| distance_to_segment(p, *a, *b))
            .fold(f32::MAX, f32::min);
        assert!(nearest <= config.spread_radius + 1e-3, "star {p:?} is {nearest} away");
    }
}

#[test]
fn belt_needs_two_events() {
    let config = ParallaxConfig::default();
    assert!(generate_parallax_belt(&[], &config, &mut rng()).is_none());
    assert!(generate_parallax_belt(&[Vec3::ZERO], &config, &mut rng()).is_none());
}

#[test]
fn galaxy_default_size_and_layer() {
    let cloud = generate_galaxy(&GalaxyConfig::default(), &mut rng());
    assert_eq!(cloud.len(), 15_000);
    assert_eq!(cloud.render_order, -2);
    for star in cloud.stars.iter().step_by(97) {
        let r = Vec3::from_array(star.position).length();
        assert!((300.0 - 1e-2..=600.0 + 1e-2).contains(&r));
        // 0xaaaaff tint with a ±0.2 jitter; blue may run past 1
        assert!(star.color.iter().all(|c| (0.0..=1.2 + 1e-5).contains(c)));
    }
}

#[test]
fn shooting_stars_and_afterimages_are_all_released() {
    let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
    let mut field = ShootingStarField::new(ShootingStarConfig::default());
    let mut rng = rng();
    for _ in 0..5 {
        field.spawn(&camera, &mut rng);
    }

    let mut released = 0;
    let mut saw_afterimage = false;
    // 6 seconds at 60 fps covers the longest star (5 s) and its last trail (0.8 s)
    for _ in 0..360 {
        released += field.update(1.0 / 60.0, &mut rng);
        saw_afterimage |= !field.afterimages().is_empty();
        assert!(field.afterimages().len() < 5 * 120);
    }
    assert!(saw_afterimage);
    assert!(field.is_idle(), "{} stars left", field.stars().len());
    assert!(released >= 5);
}

#[test]
fn afterimages_spawn_every_third_tick() {
    let camera = Camera::new(&CameraConfig::default(), 1.0);
    // long-lived trails so none expire while counting
    let mut field = ShootingStarField::new(ShootingStarConfig {
        afterimage_lifetime_secs: 10.0,
        ..ShootingStarConfig::default()
    });
    let mut rng = rng();
    field.spawn(&camera, &mut rng);
    // get past the fade-in so opacity is above the threshold
    for _ in 0..30 {
        field.update(1.0 / 60.0, &mut rng);
    }
    let before = field.afterimages().len();
    field.update(1.0 / 60.0, &mut rng);
    field.update(1.0 / 60.0, &mut rng);
    field.update(1.0 / 60.0, &mut rng);
    assert_eq!(field.afterimages().len(), before + 1);
}

#[test]
fn schedule_fires_repeatedly_until_canceled() {
    let config = ShootingStarConfig::default();
    let mut schedule = SpawnSchedule::new(&config);
    let mut rng = rng();
    schedule.start(&mut rng);

    let mut fired = 0;
    for _ in 0..(60 * 30) {
        fired += u32::from(schedule.tick(1.0 / 60.0, &mut rng));
    }
    // delays are 0.5..4.5 s, so 30 s gives at least 6 firings
    assert!(fired >= 6, "fired {fired}");

    schedule.cancel();
    assert!(!schedule.is_active());
    for _ in 0..(60 * 30) {
        assert!(!schedule.tick(1.0 / 60.0, &mut rng));
    }

    // restarting replaces, never stacks
    schedule.start(&mut rng);
    schedule.start(&mut rng);
    let remaining = schedule.remaining().unwrap();
    assert!((0.5..4.5).contains(&remaining));
}
