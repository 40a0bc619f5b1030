use std::env;
use std::path::PathBuf;

use crate::charts::{ChartOptions, SeasonOrder};
use crate::tenure::ColorMode;

const APP_DIR: &str = "soccer_dash";

#[derive(Debug, Clone)]
pub struct DashConfig {
    pub data_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub color_mode: ColorMode,
    pub season_order: SeasonOrder,
    pub export_dir: PathBuf,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("out"),
            raw_dir: PathBuf::from("archives"),
            host: "127.0.0.1".to_string(),
            port: 8050,
            color_mode: ColorMode::ByClub,
            season_order: SeasonOrder::Chronological,
            export_dir: PathBuf::from("."),
        }
    }
}

impl DashConfig {
    /// Exports `.env.local` then `.env` into the process environment. Call
    /// this before the logger starts so `RUST_LOG` from those files applies,
    /// and call `from_env` after it so bad values are reported.
    pub fn load_env_files() {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
    }

    pub fn from_env() -> Self {
        Self::from_vars(env_string)
    }

    /// Builds the config from a variable lookup; unknown enum values log a
    /// warning and keep the default.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let color_mode = match var("CLUB_COLOR_MODE") {
            Some(raw) => ColorMode::parse(&raw).unwrap_or_else(|| {
                log::warn!("ignoring CLUB_COLOR_MODE={raw}, expected `club` or `segment`");
                defaults.color_mode
            }),
            None => defaults.color_mode,
        };
        let season_order = match var("SEASON_ORDER") {
            Some(raw) => SeasonOrder::parse(&raw).unwrap_or_else(|| {
                log::warn!("ignoring SEASON_ORDER={raw}, expected `chronological` or `stored`");
                defaults.season_order
            }),
            None => defaults.season_order,
        };
        Self {
            data_dir: var("STATS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            raw_dir: var("STATS_RAW_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_dir),
            host: var("DASH_HOST").unwrap_or(defaults.host),
            port: var("DASH_PORT")
                .and_then(|val| val.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            color_mode,
            season_order,
            export_dir: var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            color_mode: self.color_mode,
            season_order: self.season_order,
        }
    }

    /// Applies `--data`, `--raw` and `--out` style overrides from the command line.
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(dir) = flag_value(args, "data") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = flag_value(args, "raw") {
            self.raw_dir = PathBuf::from(dir);
        }
        if let Some(dir) = flag_value(args, "out") {
            self.data_dir = PathBuf::from(dir);
        }
    }
}

/// Accepts both `--name=value` and `--name value`.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
