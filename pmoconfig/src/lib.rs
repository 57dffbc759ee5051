//! # PMO Radios configuration
//!
//! Settings of the radios lens live in one YAML tree:
//!
//! 1. the defaults embedded in the crate (`radios.yaml`)
//! 2. overlaid with `config.yaml` from the configuration directory
//! 3. overlaid with `PMORADIOS_CONFIG__SECTION__KEY=value` environment variables
//!
//! Keys are case-insensitive (stored lower-cased). Every change is written
//! back to `config.yaml`.
//!
//! ```no_run
//! use pmoconfig::get_config;
//!
//! let config = get_config();
//! let level = config.get_log_min_level()?;
//! config.set_u64(&["sources", "radios", "timeout_secs"], 10)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Typed accessors for a source (e.g. `sources.radios.*`) belong to extension
//! traits in the source crate.

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const DEFAULTS: &str = include_str!("radios.yaml");

/// Explicit configuration directory
const DIR_ENV: &str = "PMORADIOS_CONFIG";
/// Prefix of per-setting overrides, path segments separated by `__`
const OVERRIDE_PREFIX: &str = "PMORADIOS_CONFIG__";
const DIR_NAME: &str = ".pmoradios";
const FILE_NAME: &str = "config.yaml";

const LOG_MIN_LEVEL_PATH: &[&str] = &["host", "logger", "min_level"];
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";

lazy_static! {
    static ref GLOBAL: Arc<Config> =
        Arc::new(Config::load_config("").expect("radios lens configuration cannot be loaded"));
}

/// Process-wide configuration, loaded on first use
pub fn get_config() -> Arc<Config> {
    GLOBAL.clone()
}

/// YAML settings tree backed by `<dir>/config.yaml`
#[derive(Debug)]
pub struct Config {
    file: PathBuf,
    tree: Mutex<Value>,
}

impl Config {
    /// Load the configuration of `directory`
    ///
    /// An empty `directory` falls back to `$PMORADIOS_CONFIG`, then to the
    /// first existing `.pmoradios` in the working directory or the home
    /// directory, then to `./.pmoradios`. The directory is created when
    /// missing and the merged tree is saved right away.
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = resolve_dir(directory);
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create config directory {}", dir.display()))?;
        let file = dir.join(FILE_NAME);

        let mut tree: Value = serde_yaml::from_str(DEFAULTS)?;
        match fs::read_to_string(&file) {
            Ok(text) => {
                info!(file = %file.display(), "Loading radios configuration");
                let user: Value = serde_yaml::from_str(&text)
                    .with_context(|| format!("invalid YAML in {}", file.display()))?;
                overlay(&mut tree, normalize_keys(user));
            }
            Err(_) => info!(file = %file.display(), "No configuration file yet, using defaults"),
        }

        for (name, raw) in env::vars() {
            let Some(rest) = name.strip_prefix(OVERRIDE_PREFIX) else {
                continue;
            };
            let path: Vec<&str> = rest.split("__").collect();
            debug!(variable = %name, "Configuration override from environment");
            if let Err(e) = insert_at(&mut tree, &path, parse_scalar(&raw)) {
                debug!(variable = %name, error = %e, "Override ignored");
            }
        }

        let config = Config {
            file,
            tree: Mutex::new(tree),
        };
        config.save()?;
        Ok(config)
    }

    /// Write the whole tree to `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.tree())?;
        fs::write(&self.file, yaml)
            .with_context(|| format!("cannot write {}", self.file.display()))?;
        debug!(file = %self.file.display(), "Configuration saved");
        Ok(())
    }

    /// Value at `path` (e.g. `&["sources", "radios", "language"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let tree = self.tree();
        let mut node = &*tree;
        for (depth, key) in path.iter().enumerate() {
            node = node
                .as_mapping()
                .and_then(|section| section.get(&key_of(key)))
                .ok_or_else(|| anyhow!("no setting at {}", path[..=depth].join(".")))?;
        }
        Ok(node.clone())
    }

    /// Set the value at `path`, creating missing sections, and save
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        insert_at(&mut self.tree(), path, value)?;
        self.save()
    }

    pub fn set_u64(&self, path: &[&str], value: u64) -> Result<()> {
        self.set_value(path, Value::Number(Number::from(value)))
    }

    /// Trimmed string at `path`; `None` when unset, null or blank
    pub fn get_string(&self, path: &[&str]) -> Option<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Minimum log level (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
    pub fn get_log_min_level(&self) -> Result<String> {
        Ok(self
            .get_string(LOG_MIN_LEVEL_PATH)
            .unwrap_or_else(|| DEFAULT_LOG_MIN_LEVEL.to_string()))
    }

    fn tree(&self) -> MutexGuard<'_, Value> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve_dir(explicit: &str) -> PathBuf {
    if !explicit.is_empty() {
        return PathBuf::from(explicit);
    }
    if let Ok(dir) = env::var(DIR_ENV) {
        info!(variable = DIR_ENV, dir = %dir, "Configuration directory from environment");
        return PathBuf::from(dir);
    }

    let local = Path::new(DIR_NAME).to_path_buf();
    let home = dirs::home_dir().map(|home| home.join(DIR_NAME));
    [Some(local.clone()), home]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_dir())
        .unwrap_or(local)
}

fn key_of(segment: &str) -> Value {
    Value::String(segment.to_lowercase())
}

fn insert_at(tree: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, sections)) = path.split_last() else {
        *tree = value;
        return Ok(());
    };

    let mut node = tree;
    for section in sections {
        let map = node
            .as_mapping_mut()
            .ok_or_else(|| anyhow!("cannot create section {} under a value", section))?;
        node = map
            .entry(key_of(section))
            .or_insert(Value::Mapping(Mapping::new()));
    }

    node.as_mapping_mut()
        .ok_or_else(|| anyhow!("cannot set {} under a value", last))?
        .insert(key_of(last), value);
    Ok(())
}

/// Environment values are YAML scalars ("12", "true", "fr"), raw text otherwise
fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (key, normalize_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Merge `extra` into `base`: sections merge key by key, anything else is replaced
fn overlay(base: &mut Value, extra: Value) {
    match (base, extra) {
        (Value::Mapping(base), Value::Mapping(extra)) => {
            for (key, value) in extra {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
