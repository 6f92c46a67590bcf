//! # System Constants
//!
//! Names and literals shared between the HTTP surface, the result store and the
//! worker-facing collaborators.

/// Table holding collected scan results
pub const RESULTS_TABLE: &str = "banners";

/// Default RPC procedure invoked on scan workers for a submitted task
pub const DEFAULT_RPC_PROCEDURE: &str = "scan";

/// Path prefix of the result query endpoints
pub const RESULTS_PATH: &str = "/ips";

/// Detail exposed to callers on every server-side failure
pub const GENERIC_ERROR_DETAIL: &str = "Something went wrong.";

/// Environment variable selecting the configuration environment
pub const ENVIRONMENT_VAR: &str = "SCANFLEET_ENV";

/// Prefix for configuration overrides taken from the process environment
pub const CONFIG_ENV_PREFIX: &str = "SCANFLEET";

pub mod delivery_mode {
    /// AMQP delivery mode for messages that may be lost on broker restart
    pub const TRANSIENT: u8 = 1;
    /// AMQP delivery mode for messages written to disk by the broker
    pub const PERSISTENT: u8 = 2;
}
