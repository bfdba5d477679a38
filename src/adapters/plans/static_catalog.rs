//! Plan catalog held in memory, loaded from YAML or built in.
//!
//! # File Format
//!
//! ```yaml
//! plans:
//!   - id: premium
//!     name: Premium Member
//!     cashbackGoal: 5
//!     goldGoal: 7
//!   - id: silver
//!     name: Silver Member
//!     goldEnabled: false
//!     cashbackGoal: 4
//! ```
//!
//! Omitted track flags default to enabled; omitted goals default to 5 and 7.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::membership::Plan;
use crate::ports::PlanCatalog;

/// Errors loading a plan catalog file.
#[derive(Debug, Error)]
pub enum PlanCatalogError {
    #[error("Failed to read plan catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse plan catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid plan: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Duplicate plan id: {0}")]
    DuplicateId(String),
}

#[derive(Deserialize)]
struct CatalogFile {
    plans: Vec<Plan>,
}

/// Fixed set of plans.
#[derive(Debug, Clone)]
pub struct StaticPlanCatalog {
    plans: Vec<Plan>,
}

impl StaticPlanCatalog {
    /// Validates every plan and rejects duplicate ids.
    pub fn new(plans: Vec<Plan>) -> Result<Self, PlanCatalogError> {
        let mut seen = HashSet::new();
        for plan in &plans {
            plan.validate()?;
            if !seen.insert(plan.id.clone()) {
                return Err(PlanCatalogError::DuplicateId(plan.id.clone()));
            }
        }
        Ok(Self { plans })
    }

    /// The storefront's stock plans.
    pub fn builtin() -> Self {
        Self {
            plans: vec![
                Plan {
                    id: "premium".to_string(),
                    name: "Premium Member".to_string(),
                    cashback_enabled: true,
                    cashback_goal: 5,
                    gold_enabled: true,
                    gold_goal: 7,
                },
                Plan {
                    id: "elite".to_string(),
                    name: "Elite Member".to_string(),
                    cashback_enabled: true,
                    cashback_goal: 3,
                    gold_enabled: true,
                    gold_goal: 5,
                },
            ],
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, PlanCatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.plans)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, PlanCatalogError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| PlanCatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Loads `path` when given, else the built-in plans.
    pub fn load(path: Option<&Path>) -> Result<Self, PlanCatalogError> {
        match path {
            Some(path) => {
                let catalog = Self::from_yaml_file(path)?;
                tracing::info!(path = %path.display(), plans = catalog.plans.len(), "Loaded plan catalog");
                Ok(catalog)
            }
            None => Ok(Self::builtin()),
        }
    }
}

#[async_trait]
impl PlanCatalog for StaticPlanCatalog {
    async fn find(&self, plan_id: &str) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.iter().find(|p| p.id == plan_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Plan>, DomainError> {
        Ok(self.plans.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn builtin_has_premium_and_elite() {
        let catalog = StaticPlanCatalog::builtin();
        let elite = catalog.find("elite").await.unwrap().unwrap();
        assert_eq!(elite.cashback_goal, 3);
        assert_eq!(elite.gold_goal, 5);
        assert_eq!(catalog.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn resolve_falls_back_to_legacy_default() {
        let catalog = StaticPlanCatalog::builtin();
        let plan = catalog.resolve(Some("retired-plan")).await.unwrap();
        assert_eq!(plan.id, "default");
        assert_eq!(plan.cashback_goal, 5);
        assert_eq!(plan.gold_goal, 7);

        let plan = catalog.resolve(None).await.unwrap();
        assert_eq!(plan.id, "default");

        let plan = catalog.resolve(Some("premium")).await.unwrap();
        assert_eq!(plan.id, "premium");
    }

    #[tokio::test]
    async fn loads_yaml_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "plans:\n  - id: silver\n    name: Silver Member\n    goldEnabled: false\n    cashbackGoal: 4\n"
        )
        .unwrap();

        let catalog = StaticPlanCatalog::load(Some(file.path())).unwrap();
        let silver = catalog.find("silver").await.unwrap().unwrap();
        assert!(silver.cashback_enabled);
        assert!(!silver.gold_enabled);
        assert_eq!(silver.cashback_goal, 4);
        assert_eq!(silver.gold_goal, 7);
        assert_eq!(silver.completion_goal(), 4);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = "plans:\n  - id: a\n    name: A\n  - id: a\n    name: B\n";
        assert!(matches!(
            StaticPlanCatalog::from_yaml_str(yaml),
            Err(PlanCatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn rejects_zero_goal() {
        let yaml = "plans:\n  - id: a\n    name: A\n    goldGoal: 0\n";
        assert!(matches!(
            StaticPlanCatalog::from_yaml_str(yaml),
            Err(PlanCatalogError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticPlanCatalog::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, PlanCatalogError::Io { .. }));
    }
}
