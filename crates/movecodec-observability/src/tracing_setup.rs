//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter directive string, e.g. `"warn,movecodec_bcs=debug"`.
    pub fn directives(&self) -> String {
        let mut components: Vec<_> = self.components.iter().collect();
        components.sort();
        let mut directives = self.level.clone();
        for (component, level) in components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Initialise tracing with the given log config.
/// Should be called once at application startup; panics if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) {
    if let Err(e) = try_init_tracing(config) {
        panic!("failed to install tracing subscriber: {e}");
    }
}

/// Filter directives to install: a non-empty `RUST_LOG` wins over the config.
fn effective_directives(config: &LogConfig, env: Option<&str>) -> String {
    match env.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => config.directives(),
    }
}

/// Like [`init_tracing`], but reports an already-installed subscriber as an error.
pub fn try_init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(effective_directives(config, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so decoded output on stdout stays machine-readable.
    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}
