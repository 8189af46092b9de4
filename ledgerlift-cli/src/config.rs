use anyhow::{bail, Context, Result};
use ledgerlift_core::rules::{DEFAULT_EXCLUDED_PHRASES, DEFAULT_EXCLUDED_PREFIXES};
use ledgerlift_core::{ExclusionRuleSet, Fallbacks, DEFAULT_BANK_NAME, DEFAULT_CURRENCY};
use ledgerlift_export::ExportFormat;
use ledgerlift_extract::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use ledgerlift_extract::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_ledgerlift_home, ledgerlift_home};

/// Environment variables checked, in order, when no key is in config.toml
const API_KEY_ENV: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gemini: GeminiSection,
    pub rules: RulesSection,
    pub defaults: DefaultsSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiSection {
    pub model: String,
    pub base_url: String,
    /// Falls back to GEMINI_API_KEY / API_KEY
    pub api_key: Option<String>,
    /// Trim leading pages of Chase statements before upload
    pub preprocess: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesSection {
    /// Excluded when found anywhere in the description (case-insensitive)
    pub phrases: Vec<String>,
    /// Excluded when the description starts with one (case-insensitive)
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultsSection {
    pub currency: String,
    pub bank_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSection {
    pub format: ExportFormat,
    pub out_dir: PathBuf,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            preprocess: true,
        }
    }
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_EXCLUDED_PHRASES.iter().map(|s| s.to_string()).collect(),
            prefixes: DEFAULT_EXCLUDED_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            bank_name: DEFAULT_BANK_NAME.to_string(),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            out_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        for (kind, list) in [("phrases", &self.rules.phrases), ("prefixes", &self.rules.prefixes)] {
            if list.iter().any(|s| s.trim().is_empty()) {
                bail!("rules.{kind} contains an empty entry; it would exclude every transaction");
            }
        }
        Ok(())
    }

    pub fn rule_set(&self) -> ExclusionRuleSet {
        ExclusionRuleSet::new(&self.rules.phrases, &self.rules.prefixes)
    }

    pub fn fallbacks(&self) -> Fallbacks {
        Fallbacks {
            currency: self.defaults.currency.clone(),
            bank_name: self.defaults.bank_name.clone(),
        }
    }

    pub fn gemini_config(&self) -> Result<GeminiConfig> {
        let api_key = self
            .gemini
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| {
                API_KEY_ENV
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
            })
            .context("Gemini API key is missing. Set GEMINI_API_KEY or gemini.api_key in config.toml")?;

        Ok(GeminiConfig {
            api_key,
            model: self.gemini.model.clone(),
            base_url: self.gemini.base_url.clone(),
            preprocess: self.gemini.preprocess,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ledgerlift_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_ledgerlift_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
