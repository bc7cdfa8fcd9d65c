// DOM hooks and renderer tuning for the web front-end.
// Engine tuning lives in `starpath_core::constants`.

// Canvas
pub const CANVAS_ID: &str = "three-canvas";

// Intro overlay
pub const INTRO_OVERLAY_ID: &str = "intro-overlay";
pub const INTRO_TITLE_ID: &str = "intro-title";
pub const INTRO_MESSAGE_ID: &str = "intro-message";
pub const RECALL_BUTTON_ID: &str = "recall-button";

// Info panel and carousel
pub const INFO_PANEL_ID: &str = "point-info-overlay";
pub const INFO_TITLE_ID: &str = "info-title";
pub const INFO_DATE_ID: &str = "info-date";
pub const INFO_NOTE_ID: &str = "info-note";
pub const INFO_IMAGE_ID: &str = "info-image";
pub const INFO_IMAGE_CONTAINER_ID: &str = "info-image-container";
pub const INFO_IMAGE_PREV_ID: &str = "info-image-prev";
pub const INFO_IMAGE_NEXT_ID: &str = "info-image-next";
pub const INFO_IMAGE_DOTS_ID: &str = "info-image-dots";
pub const PANEL_MARGIN_PX: f32 = 20.0; // gap between pointer and panel, and panel and viewport edge

// Age display and stats tooltip
pub const AGE_CONTAINER_ID: &str = "age-display-container";
pub const AGE_TEXT_ID: &str = "current-age";
pub const STATS_TOOLTIP_ID: &str = "stats-tooltip";
pub const STAT_HEARTBEATS_ID: &str = "stat-heartbeats";
pub const STAT_BREATHS_ID: &str = "stat-breaths";
pub const STAT_MOON_ORBITS_ID: &str = "stat-moon-orbits";
pub const STAT_CANDLES_ID: &str = "stat-candles";

// Path-text labels are absolutely positioned divs in this layer
pub const PATH_LABEL_LAYER_ID: &str = "path-labels";

// CSS classes toggled by the overlay
pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_VISIBLE: &str = "visible";
pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_DOT: &str = "carousel-dot";
pub const CLASS_PATH_LABEL: &str = "path-text";
pub const DOT_INDEX_ATTR: &str = "data-index";

// Optional runtime override for `ExperienceConfig`
pub const CONFIG_URL: &str = "config.json";

// Frame clear colour (deep space)
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.008];

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.9;
pub const BLOOM_THRESHOLD: f32 = 0.6;
pub const EXPOSURE: f32 = 1.0;

// Initial billboard instance capacity; grows by doubling
pub const INITIAL_INSTANCE_CAPACITY: usize = 256;
