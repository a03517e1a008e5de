//! Engine configuration
//!
//! Loaded from TOML. Batch bounds and catalog values are constants and are
//! deliberately absent here.
//!
//! ```toml
//! admin = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"
//! paused = false
//! risk_update_policy = "self-or-admin"
//! log_profile = "development"
//! ```

use std::path::Path;

use chainchat_core_types::Principal;
use serde::{Deserialize, Serialize};

use crate::access::{AdminOnlyRiskPolicy, RiskUpdatePolicy, SelfOrAdminRiskPolicy};
use crate::errors::{EngineError, Result};
use crate::logging_facility::Profile;

/// Which `RiskUpdatePolicy` the engine is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskPolicyKind {
    #[default]
    SelfOrAdmin,
    AdminOnly,
}

impl RiskPolicyKind {
    pub fn build(self) -> Box<dyn RiskUpdatePolicy> {
        match self {
            RiskPolicyKind::SelfOrAdmin => Box::new(SelfOrAdminRiskPolicy),
            RiskPolicyKind::AdminOnly => Box::new(AdminOnlyRiskPolicy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub admin: Principal,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub risk_update_policy: RiskPolicyKind,
    #[serde(default)]
    pub log_profile: Profile,
}

impl EngineConfig {
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            paused: false,
            risk_update_policy: RiskPolicyKind::default(),
            log_profile: Profile::default(),
        }
    }

    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML, unknown keys or an empty admin.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        if config.admin.as_str().is_empty() {
            return Err(EngineError::Config {
                message: "admin must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("Could not read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = EngineConfig::from_toml_str(r#"admin = "deployer""#).unwrap();
        assert_eq!(config, EngineConfig::new(Principal::from("deployer")));
        assert_eq!(config.risk_update_policy, RiskPolicyKind::SelfOrAdmin);
    }

    #[test]
    fn test_full_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            admin = "deployer"
            paused = true
            risk_update_policy = "admin-only"
            log_profile = "production"
            "#,
        )
        .unwrap();
        assert!(config.paused);
        assert_eq!(config.risk_update_policy, RiskPolicyKind::AdminOnly);
        assert_eq!(config.log_profile, Profile::Production);
        assert_eq!(config.risk_update_policy.build().name(), "admin-only");
    }

    #[test]
    fn test_rejects_bad_config() {
        for source in [
            "",
            r#"admin = """#,
            r#"admin = "deployer"
               risk_update_policy = "anyone""#,
            r#"admin = "deployer"
               max_batch = 20"#,
        ] {
            let err = EngineConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, EngineError::Config { .. }), "{:?}", source);
        }
    }
}
