use std::net::SocketAddr;

use clap::Args;

// ---------------------------------------------------------------------------
// Server configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Uploads above this size are rejected with 413.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Settings of the HTTP service, read from flags or the environment.
/// Read-only once the server starts.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "ROUGHNESS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "ROUGHNESS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_flag_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }
}
