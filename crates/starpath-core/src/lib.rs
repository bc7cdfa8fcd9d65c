pub mod assets;
pub mod camera;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod error;
pub mod interaction;
pub mod path;
pub mod path_text;
pub mod registry;
pub mod scene;
pub mod session;
pub mod starfield;
pub mod story;
pub mod temporal;
pub mod tween;
pub mod ui;

pub use assets::{AssetKind, AssetPaths, AssetState};
pub use camera::{Camera, CameraConfig, CameraDrive, CameraPose, Ray};
pub use carousel::{Carousel, CarouselNav};
pub use config::ExperienceConfig;
pub use error::{ConfigError, DatasetError, LoadError};
pub use interaction::{ClickOutcome, InteractionState, Mode};
pub use path::{CurveKind, PathCurve};
pub use registry::{PointKind, StoryPoint, StoryPointRegistry};
pub use scene::*;
pub use session::Session;
pub use story::{StoryDataset, StoryEvent};
pub use ui::{PathLabel, StatsText, UiUpdate};
