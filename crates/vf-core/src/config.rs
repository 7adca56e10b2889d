//! Configuration types and parsing for varflow.yml

use crate::error::{CoreError, CoreResult};
use crate::feed::{is_valid_duration, QueryTarget};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of the variable feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Maximum number of variable queries running at once.
    ///
    /// Unset means every variable of a group is queried at the same time.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Datasource used when waves are run without a feed request
    #[serde(default)]
    pub default_datasource: Option<String>,

    /// Query time range used when neither the feed request nor the caller sets one
    #[serde(default)]
    pub default_duration: Option<String>,
}

impl FeedConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: FeedConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    /// Looks for varflow.yml or varflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("varflow.yml");
        let yaml_path = dir.join("varflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.max_concurrency == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "max_concurrency must be greater than 0".to_string(),
            });
        }
        if let Some(datasource) = &self.default_datasource {
            if datasource.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "default_datasource cannot be empty".to_string(),
                });
            }
        }
        if let Some(duration) = &self.default_duration {
            if !is_valid_duration(duration) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("default_duration '{}' is not a valid duration", duration),
                });
            }
        }
        Ok(())
    }

    /// Query target built from the defaults, if a default datasource is configured
    pub fn target(&self) -> Option<QueryTarget> {
        self.default_datasource.as_ref().map(|datasource| QueryTarget {
            datasource: datasource.clone(),
            duration: self.default_duration.clone(),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
