use std::env;

use crate::{env_flag, env_parse};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Adds the `Secure` attribute to the auth cookie
    pub cookie_secure: bool,
    pub side_effect_queue_capacity: usize,
    pub observability_enabled: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 5000),
            metrics_port: env_parse("METRICS_PORT", 9090),
            cookie_secure: env_flag("COOKIE_SECURE", false),
            side_effect_queue_capacity: env_parse("SIDE_EFFECT_QUEUE_CAPACITY", 1024),
            observability_enabled: env_flag("OBSERVABILITY_ENABLED", true),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            metrics_port: 9090,
            cookie_secure: false,
            side_effect_queue_capacity: 1024,
            observability_enabled: false,
        }
    }
}
