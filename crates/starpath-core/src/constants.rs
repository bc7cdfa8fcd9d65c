use glam::Vec3;

// Shared tuning constants for the timeline engine. Config defaults read from here.

// Temporal model
pub const BIRTH_YEAR: i32 = 2001;
pub const BIRTH_MONTH: u32 = 5;
pub const BIRTH_DAY: u32 = 9;
pub const AVG_HEARTBEATS_PER_MINUTE: f64 = 72.0;
pub const AVG_BREATHS_PER_MINUTE: f64 = 15.0;
pub const AVG_MOON_ORBIT_DAYS: f64 = 27.3;
pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const PARSE_YEAR_MIN: i32 = 1990; // exclusive lower bound for generic date parsing
pub const PARSE_YEAR_MAX: i32 = 2050; // exclusive upper bound

// Path
pub const PATH_TENSION: f32 = 0.5;
pub const FALLBACK_PATH_START: [f32; 3] = [0.0, 0.0, -5.0];
pub const FALLBACK_PATH_END: [f32; 3] = [0.0, 0.0, 5.0];
pub const KNOT_SNAP_EPSILON: f32 = 1e-4; // in segment units; progress this close to a knot lands on it

// Camera drive
pub const SCROLL_SENSITIVITY: f32 = 0.0002;
pub const PROGRESS_SMOOTHING: f32 = 0.1;
pub const PROGRESS_SNAP_EPSILON: f32 = 1e-4;
pub const LOOK_AHEAD_PROGRESS: f32 = 0.01;
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;
pub const INTRO_CAMERA_EYE: [f32; 3] = [0.0, 5.0, 15.0];
pub const INTRO_CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const INTRO_FLIGHT_SECS: f32 = 4.0;

// Story points
pub const DESIGNATED_SPECIAL_ID: &str = "mom-star";
pub const IMAGE_BASE_PATH: &str = "images/";
pub const ORDINARY_SCALE: f32 = 2.0;
pub const ORDINARY_OPACITY: f32 = 0.5;
pub const ORDINARY_COLOR: u32 = 0xaaccff;
pub const SPECIAL_PLANE_SIZE: f32 = 3.0;
pub const SPECIAL_SCALE: f32 = 1.0;
pub const SPECIAL_OPACITY: f32 = 0.75;
pub const SPECIAL_COLOR: u32 = 0xccaa88;
pub const SPECIAL_EMISSIVE: u32 = 0xffddaa;
pub const DESIGNATED_COLOR: u32 = 0x8888dd;
pub const DESIGNATED_EMISSIVE: u32 = 0xaaaaff;
pub const SPECIAL_AMBIENT: f32 = 0.35; // fraction of the base color lit by ambient light
pub const GLOW_REST: f32 = 0.4;
pub const GLOW_PULSE_LOW: f32 = 0.3;
pub const GLOW_PULSE_HIGH: f32 = 1.0;
pub const GLOW_PULSE_SECS: f32 = 2.5;
pub const GLOW_PULSE_STAGGER_SECS: f32 = 0.1;
pub const HOVER_SCALE_FACTOR: f32 = 1.25;
pub const HOVER_OPACITY: f32 = 1.0;
pub const HOVER_TRANSITION_SECS: f32 = 0.15;
pub const POINT_RENDER_ORDER: i32 = 0;

// Path text labels
pub const PATH_TEXT_LERP: f32 = 0.35;
pub const PATH_TEXT_Y_OFFSET: f32 = 1.5;
pub const PATH_TEXT_FULL_DISTANCE: f32 = 12.0;
pub const PATH_TEXT_FADE_DISTANCE: f32 = 25.0;
pub const PATH_TEXT_OPACITY_RATE: f32 = 0.05;
pub const PATH_TEXT_INITIAL_OPACITY: f32 = 0.8;
pub const PATH_TEXT_MIN_DELTA: f32 = 0.001;

// Carousel
pub const CAROUSEL_INTERVAL_SECS: f32 = 4.0;
pub const CAROUSEL_FADE_SECS: f32 = 0.15;

// Info panel placement (css pixels)
pub const PANEL_POINTER_OFFSET_PX: f32 = 20.0;

// Galaxy background
pub const GALAXY_STAR_COUNT: usize = 15_000;
pub const GALAXY_BASE_RADIUS: f32 = 300.0;
pub const GALAXY_RADIUS_SPREAD: f32 = 300.0;
pub const GALAXY_TINT: u32 = 0xaaaaff;
pub const GALAXY_COLOR_VARIANCE: f32 = 0.4;
pub const GALAXY_POINT_SIZE: f32 = 5.0;
pub const GALAXY_OPACITY: f32 = 0.95;
pub const GALAXY_SPIN_X: f32 = 0.00002; // radians per frame
pub const GALAXY_SPIN_Y: f32 = 0.00005;
pub const GALAXY_RENDER_ORDER: i32 = -2;

// Parallax belt along the path
pub const PARALLAX_DENSITY: f32 = 2.0; // stars per unit of segment length
pub const PARALLAX_SPREAD_RADIUS: f32 = 35.0;
pub const PARALLAX_POINT_SIZE: f32 = 1.1;
pub const PARALLAX_PADDING: f32 = 50.0;
pub const PARALLAX_TINT: u32 = 0xaaaaff;
pub const PARALLAX_COLOR_VARIANCE: f32 = 0.5;
pub const PARALLAX_MIN_STARS_PER_SEGMENT: usize = 10;
pub const PARALLAX_MIN_SEGMENT_LENGTH: f32 = 0.01;
pub const PARALLAX_OPACITY: f32 = 0.9;
pub const PARALLAX_RENDER_ORDER: i32 = -1;

// Shooting stars
pub const SHOOTING_MIN_DELAY_SECS: f32 = 0.5;
pub const SHOOTING_MAX_DELAY_SECS: f32 = 4.5;
pub const SHOOTING_DELAY_FLOOR_SECS: f32 = 0.05; // lower bound for configured delays
pub const SHOOTING_SPAWN_DISTANCE: f32 = 30.0;
pub const SHOOTING_SPAWN_DISTANCE_JITTER: f32 = 10.0;
pub const SHOOTING_FRUSTUM_FILL: f32 = 0.7; // fraction of the view extent used for offsets
pub const SHOOTING_TRAVEL: f32 = 50.0;
pub const SHOOTING_TRAVEL_JITTER: f32 = 60.0;
pub const SHOOTING_FORWARD_MIN: f32 = -0.06;
pub const SHOOTING_FORWARD_MAX: f32 = 0.04;
pub const SHOOTING_SCALE: f32 = 2.5;
pub const SHOOTING_SCALE_JITTER: f32 = 2.5;
pub const SHOOTING_LIFETIME_SECS: f32 = 3.0;
pub const SHOOTING_LIFETIME_JITTER_SECS: f32 = 2.0;
pub const SHOOTING_PEAK_OPACITY: f32 = 0.95;
pub const SHOOTING_FADE_IN: f32 = 0.1; // fraction of lifetime
pub const SHOOTING_FADE_OUT: f32 = 0.2;
pub const SHOOTING_COLOR: u32 = 0xffffee;
pub const SHOOTING_RENDER_ORDER: i32 = 999;
pub const AFTERIMAGE_EVERY_TICKS: u32 = 3;
pub const AFTERIMAGE_MIN_OPACITY: f32 = 0.1;
pub const AFTERIMAGE_SCALE: f32 = 0.6;
pub const AFTERIMAGE_OPACITY: f32 = 0.5;
pub const AFTERIMAGE_SHRINK: f32 = 0.3;
pub const AFTERIMAGE_LIFETIME_SECS: f32 = 0.4;
pub const AFTERIMAGE_LIFETIME_JITTER_SECS: f32 = 0.4;
pub const AFTERIMAGE_RENDER_ORDER: i32 = 998;

// Asset locations relative to the page
pub const FONT_FAMILY: &str = "Orbitron";
pub const FONT_URL: &str = "fonts/orbitron.woff2";
pub const STAR_TEXTURE_URL: &str = "images/star-glow.png";
pub const BACKGROUND_STAR_TEXTURE_URL: &str = "images/background-star-dot.png";
pub const STORY_DATA_URL: &str = "story.json";

#[inline]
pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Splits a `0xRRGGBB` literal into linear `[0, 1]` channels.
#[inline]
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
