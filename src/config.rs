use clap::{ArgAction, Parser, Subcommand, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::screen::i2c::{DEFAULT_ADDRESS, DEFAULT_BUS};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// e.g., "info" | "debug"
    pub log_level: Option<String>,
    /// which screen and how it is wired
    pub display: Option<DisplayConfig>,
    /// timing and duration limits for the state engine
    pub engine: Option<EngineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub driver: Option<DriverKind>, // <- strongly-typed driver selection
    pub bus: Option<BusConfig>,     // <- i2c wiring, ignored by the mock
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// slack added to every expiry timer
    pub grace_ms: Option<u64>,
    /// clamp for per-line temporary messages
    pub message_min_secs: Option<u64>,
    pub message_max_secs: Option<u64>,
    /// clamp for temporary images, unbounded when unset
    pub image_max_secs: Option<u64>,
}

pub const DEFAULT_GRACE_MS: u64 = 10;
pub const DEFAULT_MESSAGE_MIN_SECS: u64 = 1;
pub const DEFAULT_MESSAGE_MAX_SECS: u64 = 3600;

impl EngineConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms.unwrap_or(DEFAULT_GRACE_MS))
    }

    /// Clamp a requested message duration in whole seconds.
    pub fn clamp_message(&self, secs: i64) -> Duration {
        let min = self.message_min_secs.unwrap_or(DEFAULT_MESSAGE_MIN_SECS);
        let max = self.message_max_secs.unwrap_or(DEFAULT_MESSAGE_MAX_SECS);
        Duration::from_secs((secs.max(0) as u64).max(min).min(max))
    }

    /// Clamp a requested image duration, only capped when configured.
    pub fn clamp_image(&self, secs: i64) -> Duration {
        let secs = secs.max(0) as u64;
        Duration::from_secs(match self.image_max_secs {
            Some(max) => secs.min(max),
            None => secs,
        })
    }
}

/// CLI overrides. All config fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "screend", version, about = "OLED line display driver", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Screen driver, sh1106 or mock
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    /// I2C character device, e.g. /dev/i2c-1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// 7 bit I2C address, decimal or 0x prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub i2c_address: Option<u8>,
    /// cap for temporary image durations in seconds
    #[arg(long)]
    pub image_max_secs: Option<u64>,
    /// exit once temporary content has expired instead of waiting for a signal
    #[arg(long, action = ArgAction::SetTrue)]
    pub once: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show text on a line, or on the next line when none is given
    Print {
        #[arg(long, short = 'l')]
        line: Option<usize>,
        /// seconds before the text is erased
        #[arg(long, short = 'd')]
        duration: Option<i64>,
        text: String,
    },
    /// Clear one line, or everything
    Clear {
        #[arg(long, short = 'l')]
        line: Option<usize>,
    },
    /// Show a 128x64 PNG
    Image {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// seconds before the image is erased
        #[arg(long, short = 'd')]
        duration: Option<i64>,
    },
    /// Log the text on every line
    Show,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address {:?}: {}", s, e))
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of effective config (nice for debugging)
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/screend/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/screend/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/screend.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["screend.yaml", "config.yaml", "config/screend.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    // engine
    match (&mut dst.engine, src.engine) {
        (None, Some(c)) => dst.engine = Some(c),
        (Some(d), Some(s)) => merge_engine(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.driver.is_some()      { dst.driver = src.driver; }
    if src.bus.is_some()         { dst.bus = src.bus; }
}

fn merge_engine(dst: &mut EngineConfig, src: EngineConfig) {
    if src.grace_ms.is_some()          { dst.grace_ms = src.grace_ms; }
    if src.message_min_secs.is_some()  { dst.message_min_secs = src.message_min_secs; }
    if src.message_max_secs.is_some()  { dst.message_max_secs = src.message_max_secs; }
    if src.image_max_secs.is_some()    { dst.image_max_secs = src.image_max_secs; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }

    let any_display = cli.driver.is_some() || cli.i2c_bus.is_some() || cli.i2c_address.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.driver.is_some()      { display.driver = cli.driver.clone(); }
        if cli.i2c_bus.is_some() || cli.i2c_address.is_some() {
            let (bus, address) = match display.bus.take() {
                Some(BusConfig::I2c { bus, address }) => (bus, address),
                None => (DEFAULT_BUS.to_string(), DEFAULT_ADDRESS),
            };
            display.bus = Some(BusConfig::I2c {
                bus: cli.i2c_bus.clone().unwrap_or(bus),
                address: cli.i2c_address.unwrap_or(address),
            });
        }
    }

    if cli.image_max_secs.is_some() {
        cfg.engine.get_or_insert_with(EngineConfig::default).image_max_secs = cli.image_max_secs;
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if let Some(BusConfig::I2c { bus, address }) = display.bus.as_ref() {
            if bus.is_empty() {
                return Err(ConfigError::Validation("i2c bus path must not be empty".into()));
            }
            if *address > 0x7F {
                return Err(ConfigError::Validation("i2c address must be 7 bit (0x00..=0x7F)".into()));
            }
        }
    }
    if let Some(engine) = cfg.engine.as_ref() {
        let min = engine.message_min_secs.unwrap_or(DEFAULT_MESSAGE_MIN_SECS);
        let max = engine.message_max_secs.unwrap_or(DEFAULT_MESSAGE_MAX_SECS);
        if min > max {
            return Err(ConfigError::Validation(format!(
                "engine message_min_secs ({}) must not exceed message_max_secs ({})", min, max
            )));
        }
        if engine.image_max_secs == Some(0) {
            return Err(ConfigError::Validation("engine image_max_secs must be > 0".into()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    I2c {
        bus: String,        // e.g. "/dev/i2c-1"
        address: u8,        // e.g. 0x3C (I2C addresses are 7-bit, stored in u8)
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Sh1106,
    Mock,
}
