//! Layered configuration: built-in defaults, then `config.toml`, then
//! `CARDKEEP_*` environment variables (nested keys split on `__`, e.g.
//! `CARDKEEP_ADMIN__PASSWORD`).

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "CARDKEEP_";

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::figment()
        .extract()
        .expect("FATAL: invalid cardkeep configuration")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub extraction: ExtractionConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    /// Master key for the encrypted session cookie, at least 64 bytes.
    /// A random key is generated at startup when unset, which logs every
    /// session out on restart.
    pub cookie_key: Option<String>,
    pub insecure_cookie: bool,
    pub upload_limit_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8501".to_string(),
            loglevel: "info".to_string(),
            cookie_key: None,
            insecure_cookie: false,
            upload_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub records_path: PathBuf,
    pub accounts_path: PathBuf,
    pub image_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("business_cards.json"),
            accounts_path: PathBuf::from("user_data.json"),
            image_dir: PathBuf::from("business_card_images"),
        }
    }
}

/// The built-in administrator. Never written to the account store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Extra attempts after a connect failure, timeout or 5xx.
    pub max_retries: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/upload/".to_string(),
            connect_timeout_secs: 5,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub customer_types: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            customer_types: ["videolytical", "Endeavour", "Aasvaa", "Times Watch", "others"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
