//! Declarative wiring with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/syndesis/wiring.toml` (XDG) or platform config dir
//! 2. Project config: `.syndesis.toml`
//! 3. Environment variables: `SYNDESIS_*`
//!
//! # Intended Usage
//!
//! ```toml
//! [[bindings]]
//! source = "Clock"
//! destination = "FixedClock"
//!
//! [[bindings]]
//! source = "Repository<_>"
//! destination = "SqlRepository<_>"
//! ```
//!
//! Both sides of a binding use the textual contract form parsed by
//! [`ContractId`](crate::ContractId): `Name`, `Name<_>` for an open
//! generic, `Name<A, B>` for a closed one. Bindings are applied to a
//! [`Registry`] during the registration phase; the registry's add-only
//! semantics apply, so a binding that duplicates an existing source
//! fails.

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::ResolveError;
use crate::registry::Registry;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// A declarative source to destination binding.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingSpec {
    /// Contract being requested (e.g. "Clock", "Repository<_>").
    pub source: String,
    /// Implementation to construct for it.
    pub destination: String,
}

/// Root wiring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WiringConfig {
    /// Declared bindings, applied in order.
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

impl WiringConfig {
    /// Load wiring with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(".syndesis.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("SYNDESIS_").split("_"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load wiring from a single TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Registers every binding, parsing both sides of each pair.
    pub fn apply(&self, registry: &mut Registry) -> Result<(), ResolveError> {
        for binding in &self.bindings {
            let source = binding.source.parse()?;
            let destination = binding.destination.parse()?;
            registry.register(source, destination)?;
        }
        tracing::debug!("applied {} declarative bindings", self.bindings.len());
        Ok(())
    }

    /// User wiring path: ~/.config/syndesis/wiring.toml (XDG) or platform
    /// config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("syndesis").join("wiring.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("syndesis").join("wiring.toml"))
            .unwrap_or_default()
    }
}
