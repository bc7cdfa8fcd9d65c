use chrono::NaiveDate;
use serde::Deserialize;

use crate::assets::AssetPaths;
use crate::camera::CameraConfig;
use crate::carousel::CarouselConfig;
use crate::constants::{BIRTH_DAY, BIRTH_MONTH, BIRTH_YEAR};
use crate::error::ConfigError;
use crate::path::CurveKind;
use crate::path_text::PathTextConfig;
use crate::registry::RegistryConfig;
use crate::starfield::{GalaxyConfig, ParallaxConfig, ShootingStarConfig};
use crate::ui::IntroConfig;

/// Everything tunable about the experience. Every field falls back to its
/// default, so a partial `config.json` is fine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceConfig {
    pub birth_date: NaiveDate,
    /// Fixed seed for the star fields; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub assets: AssetPaths,
    pub curve: CurveKind,
    pub camera: CameraConfig,
    pub registry: RegistryConfig,
    pub path_text: PathTextConfig,
    pub carousel: CarouselConfig,
    pub galaxy: GalaxyConfig,
    pub parallax: ParallaxConfig,
    pub shooting_stars: ShootingStarConfig,
    pub intro: IntroConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            birth_date: NaiveDate::from_ymd_opt(BIRTH_YEAR, BIRTH_MONTH, BIRTH_DAY)
                .unwrap_or(NaiveDate::MIN),
            seed: None,
            assets: AssetPaths::default(),
            curve: CurveKind::default(),
            camera: CameraConfig::default(),
            registry: RegistryConfig::default(),
            path_text: PathTextConfig::default(),
            carousel: CarouselConfig::default(),
            galaxy: GalaxyConfig::default(),
            parallax: ParallaxConfig::default(),
            shooting_stars: ShootingStarConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

impl ExperienceConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
