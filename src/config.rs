use std::path::{Path, PathBuf};

use executor_portal_core::ClientSettings;
use serde::Deserialize;

const DEFAULTS_TOML: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    /// Directory of the built UI bundle. Empty means `<exe_dir>/ui`, then `./ui`.
    #[serde(default)]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    pub security: Option<SecurityConfig>,
    /// Published to the browser at `/ui-config.json`.
    #[serde(default)]
    pub client: ClientSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080 },
            ui: UiConfig::default(),
            security: Some(SecurityConfig {
                enable_hsts: Some(false),
                hsts_max_age: Some(31_536_000),
                hsts_include_subdomains: Some(false),
                csp: Some(String::new()),
            }),
            client: ClientSettings::default(),
        }
    }
}

impl AppConfig {
    /// Resolved UI bundle directory and its `index.html`.
    pub fn ui_paths(&self) -> (PathBuf, PathBuf) {
        let configured = self.ui.dir.trim();
        let root = if !configured.is_empty() {
            PathBuf::from(configured)
        } else {
            // Prefer <exe_dir>/ui next to the binary, then ./ui
            let runtime_ui = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("ui")))
                .filter(|d| d.join("index.html").is_file());
            runtime_ui.unwrap_or_else(|| PathBuf::from("ui"))
        };
        let index = root.join("index.html");
        (root, index)
    }
}

/// Embedded defaults → `executor-portal.toml` → `$EXECUTOR_PORTAL_CONFIG` → environment.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();
    let custom = std::env::var("EXECUTOR_PORTAL_CONFIG").ok().map(PathBuf::from);
    load_with(custom.as_deref())
}

pub fn load_with(custom_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS_TOML, ::config::FileFormat::Toml))
        // Optional local file: executor-portal.toml (in CWD)
        .add_source(::config::File::with_name("executor-portal").required(false));

    if let Some(path) = custom_path {
        builder = builder.add_source(::config::File::from(path).required(true));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(
        ::config::Environment::with_prefix("EXECUTOR_PORTAL")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("client.allowed_extensions")
            .try_parsing(true),
    );

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    let client = &cfg.client;
    if client.max_file_size == 0 {
        return Err(anyhow::anyhow!("client.max_file_size must be > 0"));
    }
    if client.allowed_extensions.is_empty() {
        return Err(anyhow::anyhow!("client.allowed_extensions must not be empty"));
    }
    if let Some(bad) = client.allowed_extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
        return Err(anyhow::anyhow!("client.allowed_extensions: '{}' must look like '.ext'", bad));
    }
    if client.search_debounce_ms == 0 {
        return Err(anyhow::anyhow!("client.search_debounce_ms must be > 0"));
    }
    if !client.submit_url.starts_with('/') || !client.lookup_url.starts_with('/') {
        return Err(anyhow::anyhow!("client.submit_url and client.lookup_url must be absolute paths"));
    }

    Ok(())
}
