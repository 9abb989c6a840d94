//! Structured configuration record and its encryption settings.
//!
//! Only the streaming-relevant subset of the cluster config file is
//! consumed; every field defaults independently so partial files parse,
//! and unknown keys are ignored.

pub mod loader;

pub use loader::load_config;

use serde::Deserialize;

/// Scope of encryption between cluster nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternodeEncryption {
    #[default]
    None,
    All,
    Dc,
    Rack,
}

/// TLS settings for the loader's client-facing connections.
///
/// `require_client_auth` is also derived during resolution: providing a
/// keystore forces it to true whether or not the file set it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientEncryption {
    pub enabled: bool,
    pub truststore: Option<String>,
    pub truststore_password: Option<String>,
    pub keystore: Option<String>,
    pub keystore_password: Option<String>,
    pub protocol: String,
    pub algorithm: String,
    pub store_type: String,
    pub cipher_suites: Vec<String>,
    pub require_client_auth: bool,
}

impl Default for ClientEncryption {
    fn default() -> Self {
        Self {
            enabled: false,
            truststore: None,
            truststore_password: None,
            keystore: None,
            keystore_password: None,
            protocol: "TLS".to_string(),
            algorithm: "SunX509".to_string(),
            store_type: "JKS".to_string(),
            cipher_suites: Vec::new(),
            require_client_auth: false,
        }
    }
}

/// TLS settings for node-to-node streaming connections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerEncryption {
    pub internode_encryption: InternodeEncryption,
    pub truststore: Option<String>,
    pub truststore_password: Option<String>,
    pub keystore: Option<String>,
    pub keystore_password: Option<String>,
    pub protocol: String,
    pub algorithm: String,
    pub store_type: String,
    pub cipher_suites: Vec<String>,
    pub require_client_auth: bool,
}

impl Default for ServerEncryption {
    fn default() -> Self {
        Self {
            internode_encryption: InternodeEncryption::None,
            truststore: None,
            truststore_password: None,
            keystore: None,
            keystore_password: None,
            protocol: "TLS".to_string(),
            algorithm: "SunX509".to_string(),
            store_type: "JKS".to_string(),
            cipher_suites: Vec::new(),
            require_client_auth: false,
        }
    }
}

/// On-disk configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_port: u16,
    pub ssl_storage_port: u16,
    pub stream_throughput_outbound_megabits_per_sec: u32,
    pub client_encryption_options: ClientEncryption,
    pub server_encryption_options: ServerEncryption,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_port: 7000,
            ssl_storage_port: 7001,
            // 0 means unlimited.
            stream_throughput_outbound_megabits_per_sec: 0,
            client_encryption_options: ClientEncryption::default(),
            server_encryption_options: ServerEncryption::default(),
        }
    }
}
