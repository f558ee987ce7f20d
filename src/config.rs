//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/flipside.sqlite"
//!
//! [user]
//! name = "Sam Rivera"
//! handle = "@sam"
//!
//! [pool]
//! seed = 7
//!
//! [rooms]
//! default_title = "Untitled room"
//!
//! [generation]
//! provider = "disabled"   # disabled | openai
//! model = "gpt-4o-mini"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use flipside_core::models::Author;
use flipside_core::room::DEFAULT_ROOM_TITLE;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub user: UserConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub rooms: RoomsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// The acting user. There is no authentication; this identity owns drafts
/// and decks and signs replies.
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub name: String,
    #[serde(default)]
    pub handle: String,
}

impl UserConfig {
    pub fn author(&self) -> Author {
        Author::new(self.name.trim(), self.handle.trim())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoolConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

fn default_seed() -> u64 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoomsConfig {
    #[serde(default = "default_room_title")]
    pub default_title: String,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            default_title: default_room_title(),
        }
    }
}

fn default_room_title() -> String {
    DEFAULT_ROOM_TITLE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl GenerationConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl Config {
    /// Defaults for commands that run without a config file.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/flipside.sqlite"),
            },
            user: UserConfig {
                name: "Anonymous".to_string(),
                handle: String::new(),
            },
            pool: PoolConfig::default(),
            rooms: RoomsConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.user.name.trim().is_empty() {
        anyhow::bail!("user.name must not be empty");
    }

    if config.rooms.default_title.trim().is_empty() {
        anyhow::bail!("rooms.default_title must not be empty");
    }

    if !(0.0..=2.0).contains(&config.generation.temperature) {
        anyhow::bail!("generation.temperature must be in [0.0, 2.0]");
    }

    if config.generation.is_enabled() && config.generation.model.is_none() {
        anyhow::bail!(
            "generation.model must be specified when provider is '{}'",
            config.generation.provider
        );
    }

    match config.generation.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown generation provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    Ok(config)
}
