//! Plan catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where plan definitions come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlansConfig {
    /// YAML file listing plans; built-in plans are used when unset
    pub catalog_path: Option<PathBuf>,
}

impl PlansConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.catalog_path {
            Some(path) if path.as_os_str().is_empty() => Err(ValidationError::EmptyCatalogPath),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_path_is_valid() {
        assert!(PlansConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let config = PlansConfig {
            catalog_path: Some(PathBuf::new()),
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyCatalogPath));
    }
}
