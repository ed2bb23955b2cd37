//! Application configuration for BriefBuilder.
//!
//! User config lives at `~/.briefbuilder/briefbuilder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BriefBuilderError, Result};
use crate::types::{ItemOrder, MAX_BLOCKS_PER_BATCH};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "briefbuilder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".briefbuilder";

// ---------------------------------------------------------------------------
// Config structs (matching briefbuilder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Header markers identifying the brief sections.
    #[serde(default)]
    pub sections: SectionMarkers,

    /// Rendering options.
    #[serde(default)]
    pub render: RenderConfig,

    /// Notion destination settings.
    #[serde(default)]
    pub notion: NotionConfig,
}

/// `[sections]`: substrings that identify each section's header line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMarkers {
    #[serde(default = "default_signals_marker")]
    pub signals: String,
    #[serde(default = "default_relevance_marker")]
    pub relevance: String,
    #[serde(default = "default_actions_marker")]
    pub actions: String,
    #[serde(default = "default_sources_marker")]
    pub sources: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            signals: default_signals_marker(),
            relevance: default_relevance_marker(),
            actions: default_actions_marker(),
            sources: default_sources_marker(),
        }
    }
}

fn default_signals_marker() -> String {
    "📌 Top 5 AI Signals".into()
}
fn default_relevance_marker() -> String {
    "🎯 Relevance Summary".into()
}
fn default_actions_marker() -> String {
    "✅ Today's Suggested Actions".into()
}
fn default_sources_marker() -> String {
    "📊 Update Sources".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Item ordering. Deliberately has no default: either this or the
    /// `--order` flag must be given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<ItemOrder>,

    /// Prefix of the synthesized page title (`"<prefix> - <date>"`).
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// Blocks per API request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            order: None,
            title_prefix: default_title_prefix(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_title_prefix() -> String {
    "AI Strategy Brief".into()
}
fn default_max_batch_size() -> usize {
    MAX_BLOCKS_PER_BATCH
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Name of the env var holding the integration token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Name of the env var holding the target database id.
    #[serde(default = "default_database_id_env")]
    pub database_id_env: String,

    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// Title prefix of the database row (`"<prefix> – <date>"`).
    #[serde(default = "default_row_title_prefix")]
    pub row_title_prefix: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            database_id_env: default_database_id_env(),
            api_base: default_api_base(),
            notion_version: default_notion_version(),
            row_title_prefix: default_row_title_prefix(),
        }
    }
}

fn default_token_env() -> String {
    "NOTION_TOKEN".into()
}
fn default_database_id_env() -> String {
    "NOTION_DATABASE_ID".into()
}
fn default_api_base() -> String {
    "https://api.notion.com".into()
}
fn default_notion_version() -> String {
    "2022-06-28".into()
}
fn default_row_title_prefix() -> String {
    "AI Brief".into()
}

// ---------------------------------------------------------------------------
// Runtime values (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Credentials for the Notion API, resolved once from the environment.
#[derive(Clone)]
pub struct NotionCredentials {
    pub token: String,
    pub database_id: String,
}

impl std::fmt::Debug for NotionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionCredentials")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

impl RenderConfig {
    /// Resolve the item order, preferring the CLI override.
    pub fn resolve_order(&self, cli_override: Option<ItemOrder>) -> Result<ItemOrder> {
        cli_override.or(self.order).ok_or_else(|| {
            BriefBuilderError::config(
                "item order is not configured: pass --order input|score or set [render] order",
            )
        })
    }

    /// Check the batch size against the API ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 || self.max_batch_size > MAX_BLOCKS_PER_BATCH {
            return Err(BriefBuilderError::config(format!(
                "render.max_batch_size must be between 1 and {MAX_BLOCKS_PER_BATCH}, got {}",
                self.max_batch_size
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.briefbuilder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BriefBuilderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.briefbuilder/briefbuilder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BriefBuilderError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        BriefBuilderError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.render.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BriefBuilderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BriefBuilderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BriefBuilderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the Notion token and database id from the env vars named in config.
pub fn resolve_notion_credentials(config: &NotionConfig) -> Result<NotionCredentials> {
    let read = |var_name: &str| match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(BriefBuilderError::config(format!(
            "Notion credentials not found. Set the {var_name} environment variable."
        ))),
    };

    Ok(NotionCredentials {
        token: read(&config.token_env)?,
        database_id: read(&config.database_id_env)?,
    })
}
