//! TOML file configuration structures.
//!
//! These structs directly map to the `dnotify-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub fcm: FcmConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default address")
}

/// FCM credential section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmConfig {
    /// Server key sent with every send request.
    pub server_key: String,
    /// Send endpoint. Overridable for tests and local emulators.
    #[serde(default = "default_fcm_endpoint")]
    pub endpoint: Url,
}

fn default_fcm_endpoint() -> Url {
    Url::parse("https://fcm.googleapis.com/fcm/send").expect("valid default endpoint")
}
