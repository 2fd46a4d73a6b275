//! # History Configuration
//!
//! Store header, paper, share-link and locale settings for the history page.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAJA_STORE_NAME="Minimarket Don Pepe"                              │
//! │     CAJA_PAPER=58mm                                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/caja-pos/caja.toml (Linux)                               │
//! │     ~/Library/Application Support/com.caja.caja-pos/caja.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     80mm paper, prefix 569, wa.me link, system UTC offset              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # caja.toml
//! [store]
//! name = "Minimarket Don Pepe"
//! address = "Av. Grecia 1450, Ñuñoa"
//! footer = ["¡Gracias por su compra!", "Vuelva pronto"]
//!
//! [receipt]
//! paper = "58mm"   # 58mm | 80mm
//!
//! [share]
//! phone_prefix = "569"
//! url_template = "https://wa.me/{phone}?text={text}"
//! columns = 32
//!
//! [locale]
//! utc_offset_minutes = -180   # omit to use the machine's offset
//! ```

use std::path::PathBuf;

use caja_core::receipt::{PaperWidth, ReceiptOptions, ShareSettings, StoreInfo};
use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Narrowest share column budget that still fits a label and an amount.
const MIN_SHARE_COLUMNS: usize = 16;

// =============================================================================
// Sections
// =============================================================================

/// Printed receipt settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    #[serde(default)]
    pub paper: PaperWidth,
}

/// Locale settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Offset from UTC used for calendar days and printed dates.
    /// `None` uses the machine's current offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl LocaleSettings {
    /// The configured offset, or the machine's.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)))
            .unwrap_or_else(|| Local::now().offset().fix())
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete history page configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub store: StoreInfo,

    #[serde(default)]
    pub receipt: ReceiptSettings,

    #[serde(default)]
    pub share: ShareSettings,

    #[serde(default)]
    pub locale: LocaleSettings,
}

impl HistoryConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (caja.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading history config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load history config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "History config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        for placeholder in ["{phone}", "{text}"] {
            if !self.share.url_template.contains(placeholder) {
                return Err(ConfigError::InvalidConfig(format!(
                    "share.url_template must contain {}, got: {}",
                    placeholder, self.share.url_template
                )));
            }
        }

        if !self.share.phone_prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidConfig(format!(
                "share.phone_prefix must be digits only, got: {}",
                self.share.phone_prefix
            )));
        }

        if self.share.columns < MIN_SHARE_COLUMNS {
            return Err(ConfigError::InvalidConfig(format!(
                "share.columns must be at least {}",
                MIN_SHARE_COLUMNS
            )));
        }

        if let Some(minutes) = self.locale.utc_offset_minutes {
            if FixedOffset::east_opt(minutes.saturating_mul(60)).is_none() {
                return Err(ConfigError::InvalidConfig(format!(
                    "locale.utc_offset_minutes out of range: {}",
                    minutes
                )));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CAJA_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("CAJA_STORE_NAME") {
            debug!(name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(address) = lookup("CAJA_STORE_ADDRESS") {
            self.store.address = address;
        }

        if let Some(paper) = lookup("CAJA_PAPER") {
            match paper.parse() {
                Ok(parsed) => self.receipt.paper = parsed,
                Err(e) => warn!(paper = %paper, "Ignoring CAJA_PAPER: {}", e),
            }
        }

        if let Some(prefix) = lookup("CAJA_PHONE_PREFIX") {
            self.share.phone_prefix = prefix;
        }

        if let Some(url) = lookup("CAJA_SHARE_URL") {
            debug!(url = %url, "Overriding share URL from environment");
            self.share.url_template = url;
        }

        if let Some(minutes) = lookup("CAJA_UTC_OFFSET_MINUTES") {
            match minutes.trim().parse::<i32>() {
                Ok(m) => self.locale.utc_offset_minutes = Some(m),
                Err(_) => warn!(minutes = %minutes, "Ignoring non-numeric CAJA_UTC_OFFSET_MINUTES"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "caja", "caja-pos")
            .map(|dirs| dirs.config_dir().join("caja.toml"))
    }

    /// Formatter options built from this configuration.
    pub fn receipt_options(&self) -> ReceiptOptions {
        ReceiptOptions {
            store: self.store.clone(),
            paper: self.receipt.paper,
            share: self.share.clone(),
            offset: self.locale.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = HistoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.share.phone_prefix, "569");
        assert_eq!(config.receipt.paper, PaperWidth::Mm80);
    }

    #[test]
    fn test_parse_file_format() {
        let toml_str = r#"
            [store]
            name = "Minimarket Don Pepe"
            address = "Av. Grecia 1450, Ñuñoa"
            footer = ["Vuelva pronto"]

            [receipt]
            paper = "58mm"

            [share]
            phone_prefix = "569"
            url_template = "https://wa.me/{phone}?text={text}"
            columns = 40

            [locale]
            utc_offset_minutes = -180
        "#;

        let config: HistoryConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let options = config.receipt_options();
        assert_eq!(options.store.name, "Minimarket Don Pepe");
        assert_eq!(options.store.footer, ["Vuelva pronto"]);
        assert_eq!(options.paper.columns(), 32);
        assert_eq!(options.share.columns, 40);
        assert_eq!(options.offset, FixedOffset::west_opt(3 * 3600).unwrap());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: HistoryConfig = toml::from_str("[store]\nname = \"Kiosko\"\n").unwrap();
        assert_eq!(config.store.name, "Kiosko");
        assert_eq!(config.store.address, StoreInfo::default().address);
        assert_eq!(config.share, ShareSettings::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAJA_STORE_NAME", "Botillería Central"),
            ("CAJA_PAPER", "58mm"),
            ("CAJA_PHONE_PREFIX", "54911"),
            ("CAJA_UTC_OFFSET_MINUTES", "-240"),
        ]
        .into_iter()
        .collect();

        let mut config = HistoryConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.name, "Botillería Central");
        assert_eq!(config.receipt.paper, PaperWidth::Mm58);
        assert_eq!(config.share.phone_prefix, "54911");
        assert_eq!(config.locale.utc_offset_minutes, Some(-240));
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = HistoryConfig::default();
        config.apply_overrides(|key| match key {
            "CAJA_PAPER" => Some("A4".to_string()),
            "CAJA_UTC_OFFSET_MINUTES" => Some("tres".to_string()),
            _ => None,
        });
        assert_eq!(config.receipt.paper, PaperWidth::Mm80);
        assert_eq!(config.locale.utc_offset_minutes, None);
    }

    #[test]
    fn test_validation_rejects() {
        let mut config = HistoryConfig::default();
        config.share.url_template = "https://wa.me/{phone}".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        let mut config = HistoryConfig::default();
        config.share.phone_prefix = "+56".into();
        assert!(config.validate().is_err());

        let mut config = HistoryConfig::default();
        config.share.columns = 8;
        assert!(config.validate().is_err());

        let mut config = HistoryConfig::default();
        config.locale.utc_offset_minutes = Some(24 * 60);
        assert!(config.validate().is_err());

        let mut config = HistoryConfig::default();
        config.store.name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("caja.toml");

        let mut config = HistoryConfig::default();
        config.store.name = "Almacén Rosita".into();
        config.receipt.paper = PaperWidth::Mm58;
        config.locale.utc_offset_minutes = Some(-180);
        config.save(Some(path.clone())).unwrap();

        let loaded: HistoryConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caja.toml");
        std::fs::write(&path, "[receipt]\npaper = \"A4\"\n").unwrap();

        assert!(matches!(
            HistoryConfig::load(Some(path.clone())),
            Err(ConfigError::LoadFailed(_))
        ));
        // load_or_default falls back instead of failing
        let fallback = HistoryConfig::load_or_default(Some(path));
        assert_eq!(fallback.receipt.paper, PaperWidth::default());
    }
}
