use crate::error::{AppError, Result};
use std::env::VarError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_DIR_PREFIX: &str = "ozon-price-sheet";
const DEFAULT_WORKSHEET_NAME: &str = "API Ozon";
const DEFAULT_TYPE_ATTRIBUTE: &str = "Тип товара";
const DEFAULT_CACHE_FILE: &str = "ms_catalog.json";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 60;
const MAX_CABINETS: usize = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub google: GoogleConfig,
    pub cabinets: Vec<CabinetConfig>,
    pub moysklad: MoySkladConfig,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub spreadsheet_id: String,
    pub worksheet_name: String,
    pub service_account_json: PathBuf,
}

/// Credentials for one Ozon seller account.
#[derive(Clone)]
pub struct CabinetConfig {
    pub label: String,
    pub client_id: String,
    pub api_key: String,
}

impl fmt::Debug for CabinetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CabinetConfig")
            .field("label", &self.label)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct MoySkladConfig {
    pub token: String,
    /// Name of the custom attribute holding the product type
    pub type_attribute: String,
    pub cache_path: PathBuf,
    /// Zero disables the catalog cache
    pub cache_ttl: Duration,
}

impl MoySkladConfig {
    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}

impl fmt::Debug for MoySkladConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoySkladConfig")
            .field("type_attribute", &self.type_attribute)
            .field("cache_path", &self.cache_path)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Parse and validate configuration through an env-var lookup function.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let optional = |var: &str| -> Option<String> {
            lookup(var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let require = |var: &str| -> Result<String> {
            optional(var).ok_or_else(|| AppError::Config(format!("{} is required", var)))
        };

        let parse_u64 = |var: &str, default: u64| -> Result<u64> {
            match optional(var) {
                Some(raw) => raw
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("{} is invalid: {}", var, e))),
                None => Ok(default),
            }
        };

        let spreadsheet_id = require("SPREADSHEET_ID")?;
        let worksheet_name =
            optional("WORKSHEET_NAME").unwrap_or_else(|| DEFAULT_WORKSHEET_NAME.to_string());

        let service_account_json = PathBuf::from(require("GOOGLE_SERVICE_ACCOUNT_JSON")?);
        if !service_account_json.exists() {
            return Err(AppError::Config(format!(
                "Service account JSON not found: {:?}",
                service_account_json
            )));
        }

        let token = require("MS_TOKEN")?;

        let mut cabinets = Vec::new();
        for n in 1..=MAX_CABINETS {
            let id_var = format!("OZON_CLIENT_ID_{}", n);
            let key_var = format!("OZON_API_KEY_{}", n);

            match (optional(&id_var), optional(&key_var)) {
                (Some(client_id), Some(api_key)) => cabinets.push(CabinetConfig {
                    label: format!("Cab{}", n),
                    client_id,
                    api_key,
                }),
                (None, None) if n > 1 => {}
                _ => {
                    return Err(AppError::Config(format!(
                        "{} and {} must be set together{}",
                        id_var,
                        key_var,
                        if n == 1 { " and are required" } else { "" }
                    )));
                }
            }
        }

        let cache_path = match optional("MS_CACHE_PATH") {
            Some(path) => PathBuf::from(path),
            None => Self::cache_dir()?.join(DEFAULT_CACHE_FILE),
        };

        let moysklad = MoySkladConfig {
            token,
            type_attribute: optional("MS_TYPE_ATTRIBUTE")
                .unwrap_or_else(|| DEFAULT_TYPE_ATTRIBUTE.to_string()),
            cache_path,
            cache_ttl: Duration::from_secs(parse_u64("MS_CACHE_TTL_SECONDS", 0)?),
        };

        let http_timeout = Duration::from_secs(parse_u64(
            "HTTP_TIMEOUT_SECONDS",
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )?);
        if http_timeout.is_zero() {
            return Err(AppError::Config(
                "HTTP_TIMEOUT_SECONDS must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            google: GoogleConfig {
                spreadsheet_id,
                worksheet_name,
                service_account_json,
            },
            cabinets,
            moysklad,
            http_timeout,
        })
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
            .get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }
}
