use thiserror::Error;

use crate::assets::AssetKind;

/// Problems with the story dataset itself.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("story dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("story event {index} has a non-finite position")]
    NonFinitePosition { index: usize },
}

/// Problems with the optional `config.json` override.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// First failure seen while loading the scene assets.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {asset}: {reason}")]
    Fetch { asset: AssetKind, reason: String },
    #[error("failed to decode {asset}: {reason}")]
    Decode { asset: AssetKind, reason: String },
    #[error("failed to read story data: {source}")]
    Dataset {
        #[from]
        source: DatasetError,
    },
}

impl LoadError {
    pub fn asset(&self) -> AssetKind {
        match self {
            LoadError::Fetch { asset, .. } | LoadError::Decode { asset, .. } => *asset,
            LoadError::Dataset { .. } => AssetKind::StoryData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_the_failed_asset() {
        let err = LoadError::Fetch {
            asset: AssetKind::StarTexture,
            reason: "HTTP 404".into(),
        };
        assert_eq!(err.asset(), AssetKind::StarTexture);
        assert!(err.to_string().contains("star texture"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn dataset_errors_are_attributed_to_story_data() {
        let bad = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = LoadError::from(DatasetError::from(bad));
        assert_eq!(err.asset(), AssetKind::StoryData);
        assert!(err.to_string().starts_with("failed to read story data"));
    }
}
