//! Deployment-target identity.
//!
//! The account and region identifiers are the only external inputs a
//! plan depends on. They are passed in explicitly so synthesis stays
//! pure; [`TargetConfig::from_env`] exists for the CLI boundary only.

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Environment variable naming the target account.
pub const ACCOUNT_ENV: &str = "STRATA_ACCOUNT";

/// Environment variable naming the target region.
pub const REGION_ENV: &str = "STRATA_REGION";

/// Identifies where a plan is provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub account: String,
    pub region: String,
}

impl TargetConfig {
    /// Creates a target, rejecting blank identifiers.
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Result<Self, SynthError> {
        let account = account.into();
        let region = region.into();

        if account.trim().is_empty() {
            return Err(SynthError::InvalidTarget {
                message: "account cannot be blank".to_string(),
            });
        }
        if region.trim().is_empty() {
            return Err(SynthError::InvalidTarget {
                message: "region cannot be blank".to_string(),
            });
        }

        Ok(Self { account, region })
    }

    /// Reads the target from `STRATA_ACCOUNT` / `STRATA_REGION`.
    pub fn from_env() -> Result<Self, SynthError> {
        let account =
            std::env::var(ACCOUNT_ENV).map_err(|_| SynthError::MissingTarget(ACCOUNT_ENV))?;
        let region =
            std::env::var(REGION_ENV).map_err(|_| SynthError::MissingTarget(REGION_ENV))?;
        Self::new(account, region)
    }

    /// Hostname of the target's image registry service.
    pub fn registry_host(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account, self.region)
    }

    /// Full image URI for a repository in the target's registry.
    pub fn image_uri(&self, repository: &str) -> String {
        format!("{}/{}", self.registry_host(), repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_uri_composition() {
        let target = TargetConfig::new("123456789012", "eu-west-1").unwrap();
        assert_eq!(
            target.image_uri("acme-web-images"),
            "123456789012.dkr.ecr.eu-west-1.amazonaws.com/acme-web-images"
        );
    }

    #[test]
    fn blank_account_rejected() {
        let err = TargetConfig::new("  ", "eu-west-1").unwrap_err();
        assert!(matches!(err, SynthError::InvalidTarget { .. }));
    }
}
