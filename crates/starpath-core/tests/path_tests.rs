// Host-side tests for the camera path and the camera drive built on it.

use chrono::NaiveDate;
use glam::Vec3;
use starpath_core::camera::{journey_date, look_ahead_pose, CameraConfig, CameraDrive};
use starpath_core::path::{CurveKind, PathCurve};
use starpath_core::story::{StoryDataset, StoryEvent};

fn line3() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(0.0, 0.0, -20.0),
    ]
}

fn winding(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            Vec3::new((f * 0.7).sin() * 8.0, (f * 0.3).cos() * 3.0, -12.0 * f)
        })
        .collect()
}

#[test]
fn middle_of_three_events_is_the_middle_event() {
    let curve = PathCurve::build(&line3(), CurveKind::default());
    let p = curve.point_at(0.5);
    assert!(p.distance(Vec3::new(0.0, 0.0, -10.0)) < 1e-5, "{p:?}");
}

#[test]
fn index_aligned_progress_hits_positions_exactly() {
    for n in [2, 3, 7, 24] {
        let pts = winding(n);
        let curve = PathCurve::build(&pts, CurveKind::default());
        for (i, expected) in pts.iter().enumerate() {
            let progress = i as f32 / (n - 1) as f32;
            assert_eq!(curve.point_at(progress), *expected, "n={n} i={i}");
        }
    }
}

#[test]
fn samples_are_finite_everywhere() {
    let curve = PathCurve::build(&winding(9), CurveKind::default());
    for step in 0..=1000 {
        let p = step as f32 / 1000.0;
        let point = curve.point_at(p);
        let tangent = curve.tangent_at(p);
        assert!(point.is_finite(), "point at {p}");
        assert!(tangent.is_finite(), "tangent at {p}");
        assert!((tangent.length() - 1.0).abs() < 1e-4);
    }
    // out of range progress clamps
    assert_eq!(curve.point_at(-3.0), curve.point_at(0.0));
    assert_eq!(curve.point_at(7.0), curve.point_at(1.0));
}

#[test]
fn path_is_continuous() {
    let curve = PathCurve::build(&winding(6), CurveKind::default());
    let mut prev = curve.point_at(0.0);
    for step in 1..=2000 {
        let p = curve.point_at(step as f32 / 2000.0);
        assert!(p.distance(prev) < 1.0, "jump at step {step}");
        prev = p;
    }
}

#[test]
fn short_datasets_fall_back_to_a_straight_path() {
    for pts in [vec![], vec![Vec3::new(3.0, 3.0, 3.0)]] {
        let curve = PathCurve::build(&pts, CurveKind::default());
        assert!(curve.is_fallback());
        assert_eq!(curve.point_at(0.0), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(curve.point_at(1.0), Vec3::new(0.0, 0.0, 5.0));
        assert!(curve.tangent_at(0.5).distance(Vec3::Z) < 1e-5);
    }
}

#[test]
fn camera_looks_ahead_along_the_path() {
    let curve = PathCurve::build(&line3(), CurveKind::default());
    let pose = look_ahead_pose(&curve, 0.0, 0.01);
    assert_eq!(pose.eye, Vec3::ZERO);
    assert!(pose.target.z < 0.0);
    // at the very end the look-ahead collapses and falls back to the tangent
    let end = look_ahead_pose(&curve, 1.0, 0.01);
    assert!(end.target.distance(end.eye) > 0.5);
}

#[test]
fn drive_smooths_towards_scroll_target() {
    let curve = PathCurve::build(&line3(), CurveKind::default());
    let mut drive = CameraDrive::new(CameraConfig::default());
    for _ in 0..100 {
        drive.on_scroll(120.0);
    }
    assert!((drive.target_progress() - 0.02).abs() < 1e-5);
    drive.update(1.0 / 60.0, &curve);
    assert!((drive.progress() - 0.002).abs() < 1e-5);
    for _ in 0..400 {
        drive.update(1.0 / 60.0, &curve);
    }
    assert_eq!(drive.progress(), drive.target_progress());

    // scrolling back past the start clamps at zero
    for _ in 0..1000 {
        drive.on_scroll(-1.0);
    }
    assert_eq!(drive.target_progress(), 0.0);
}

#[test]
fn journey_date_follows_the_nearest_event() {
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let events = vec![
        StoryEvent::new("a", "~2002", Vec3::ZERO),
        StoryEvent::new("b", "[recent]", Vec3::new(0.0, 0.0, -10.0)),
        StoryEvent::new("c", "2040-01-01", Vec3::new(0.0, 0.0, -20.0)),
    ];
    let data = StoryDataset::from_events(events).unwrap();
    assert_eq!(
        journey_date(&data, 0.1, today),
        NaiveDate::from_ymd_opt(2002, 6, 15).unwrap()
    );
    // unparseable date -> today
    assert_eq!(journey_date(&data, 0.5, today), today);
    // future date at the very end -> today
    assert_eq!(journey_date(&data, 1.0, today), today);
    // future date before the end is kept
    assert_eq!(
        journey_date(&data, 0.8, today),
        NaiveDate::from_ymd_opt(2040, 1, 1).unwrap()
    );
}
