use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A scan result row as read from the result store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerRow {
    /// Dotted-quad rendering of the stored 32-bit address
    pub ip: String,
    pub port: u32,
    pub service: String,
    /// Raw banner bytes captured by the worker
    pub content: Vec<u8>,
}

/// A scan result as served to API callers
///
/// `content` is the base64 encoding of the stored banner bytes so arbitrary
/// binary banners survive JSON transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Banner {
    pub ip: String,
    pub port: String,
    pub service: String,
    pub content: String,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            ip: row.ip,
            port: row.port.to_string(),
            service: row.service,
            content: STANDARD.encode(&row.content),
        }
    }
}
