//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults.

mod endpoint;
mod llm;
mod system;

pub use endpoint::*;
pub use llm::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OramaConfig {
    pub endpoint: EndpointConfig,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub transport: TransportConfig,
    pub session: SessionSettings,
    pub logging: LoggingConfig,
}
