use contracts::enums::{CargoRounding, DiscountMergePolicy};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub report: ReportConfig,
    pub trendyol: TrendyolConfig,
    pub cargo: CargoConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Offset used to turn calendar days into timestamps (Turkey: +3)
    pub utc_offset_hours: i32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file for SKU costs; empty keeps them in memory only
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub invoice_rate: f64,
    pub discount_policy: DiscountMergePolicy,
    pub cargo_rounding: CargoRounding,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrendyolConfig {
    pub api_base: String,
    pub finance_base: String,
    pub page_size: u32,
    pub invoice_page_size: u32,
    pub max_pages: u32,
    pub timeout_secs: u64,
    pub api_key: String,
    pub api_secret: String,
    pub seller_id: String,
    pub cargo_invoice_serials: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CargoConfig {
    /// Use flat carrier tariffs for orders missing from the cargo invoices
    pub tariff_fallback: bool,
    pub default_tariff: f64,
    pub tariffs: HashMap<String, f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
utc_offset_hours = 3

[database]
path = "target/db/app.db"

[report]
invoice_rate = 0.10
discount_policy = "sum"
cargo_rounding = "exact"

[trendyol]
api_base = "https://api.trendyol.com"
finance_base = "https://api.trendyol.com"
page_size = 200
invoice_page_size = 500
max_pages = 200
timeout_secs = 60
api_key = ""
api_secret = ""
seller_id = ""
cargo_invoice_serials = []

[cargo]
tariff_fallback = false
default_tariff = 70.0

[cargo.tariffs]
"Sürat Kargo" = 65.0
"Yurtiçi Kargo" = 70.0
"MNG Kargo" = 75.0
"Aras Kargo" = 72.0
"#;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            utc_offset_hours: 3,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/app.db".into(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            invoice_rate: 0.10,
            discount_policy: DiscountMergePolicy::default(),
            cargo_rounding: CargoRounding::default(),
        }
    }
}

impl Default for TrendyolConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.trendyol.com".into(),
            finance_base: "https://api.trendyol.com".into(),
            page_size: 200,
            invoice_page_size: 500,
            max_pages: 200,
            timeout_secs: 60,
            api_key: String::new(),
            api_secret: String::new(),
            seller_id: String::new(),
            cargo_invoice_serials: Vec::new(),
        }
    }
}

impl Default for CargoConfig {
    fn default() -> Self {
        Self {
            tariff_fallback: false,
            default_tariff: 70.0,
            tariffs: HashMap::from([
                ("Sürat Kargo".to_string(), 65.0),
                ("Yurtiçi Kargo".to_string(), 70.0),
                ("MNG Kargo".to_string(), 75.0),
                ("Aras Kargo".to_string(), 72.0),
            ]),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            report: ReportConfig::default(),
            trendyol: TrendyolConfig::default(),
            cargo: CargoConfig::default(),
        }
    }
}

impl TrendyolConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.seller_id.is_empty()
    }
}

/// Parse TOML contents and validate them
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.report.invoice_rate;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::Invalid(format!(
                "report.invoice_rate must be within [0, 1], got {}",
                rate
            )));
        }
        if self.trendyol.page_size == 0 || self.trendyol.invoice_page_size == 0 {
            return Err(ConfigError::Invalid(
                "trendyol page sizes must be greater than zero".into(),
            ));
        }
        if !(-12..=14).contains(&self.server.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "server.utc_offset_hours out of range: {}",
                self.server.utc_offset_hours
            )));
        }
        Ok(())
    }

    /// Apply environment overrides; `lookup` is `std::env::var` outside tests
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string());

        if let Some(v) = get("INVOICE_RATE") {
            self.report.invoice_rate = parse_env("INVOICE_RATE", &v)?;
        }
        if let Some(v) = get("TRENDYOL_PAGE_SIZE") {
            self.trendyol.page_size = parse_env("TRENDYOL_PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("SERVER_PORT") {
            self.server.port = parse_env("SERVER_PORT", &v)?;
        }
        if let Some(v) = get("TRENDYOL_API_BASE") {
            self.trendyol.api_base = v;
        }
        if let Some(v) = get("TRENDYOL_FINANCE_BASE") {
            self.trendyol.finance_base = v;
        }
        if let Some(v) = get("TRENDYOL_API_KEY") {
            self.trendyol.api_key = v;
        }
        if let Some(v) = get("TRENDYOL_API_SECRET") {
            self.trendyol.api_secret = v;
        }
        if let Some(v) = get("TRENDYOL_SELLER_ID") {
            self.trendyol.seller_id = v;
        }
        if let Some(v) = get("CARGO_INVOICE_SERIALS") {
            self.trendyol.cargo_invoice_serials = split_serials(&v);
        }
        if let Some(v) = get("DATABASE_PATH") {
            self.database.path = v;
        }

        self.trendyol.api_base = self.trendyol.api_base.trim_end_matches('/').to_string();
        self.trendyol.finance_base = self.trendyol.finance_base.trim_end_matches('/').to_string();
        self.validate()
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

/// "A, B,,C" -> ["A", "B", "C"]
pub fn split_serials(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment variables are applied on top in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match config_file_path() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.display().to_string(),
                    source,
                })?;
            parse_config(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    config.apply_env_overrides(|name| std::env::var(name).ok())?;
    Ok(config)
}

fn config_file_path() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory.
/// None when the path is empty (in-memory cost store).
pub fn get_database_path(config: &Config) -> Option<PathBuf> {
    let db_path_str = config.database.path.trim();
    if db_path_str.is_empty() {
        return None;
    }
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Some(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Some(exe_dir.join(db_path));
        }
    }

    Some(PathBuf::from(db_path_str))
}
