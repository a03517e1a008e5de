//! Logging initialization

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output at debug level
    #[default]
    Development,
    /// JSON output at info level
    Production,
    /// Bare registry; tests install the capture layer instead
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the global subscriber
///
/// Only the first call in a process has any effect. `RUST_LOG` overrides the
/// profile's default filter.
///
/// ```
/// use chainchat_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("chainchat=debug")),
                )
                .with_writer(std::io::stderr)
                .try_init();
        }
        Profile::Production => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("chainchat=info")),
                )
                .with_writer(std::io::stderr)
                .try_init();
        }
        Profile::Test => {
            let _ = tracing_subscriber::registry().try_init();
        }
    });
}
