//! Configuration service for Importune

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::config::ImportuneConfig;

pub trait ConfigService: Send + Sync {
    fn load(&self, global_only: bool) -> Result<ImportuneConfig, ConfigError>;
    fn config_path(&self, global: bool) -> PathBuf;
    fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError>;
}

pub struct DefaultConfigService {
    root: PathBuf,
}

impl DefaultConfigService {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/importune/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("importune")
            .join("config.toml")
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(".importune.toml")
    }

    fn load_from_path(path: &Path) -> Result<ImportuneConfig, ConfigError> {
        if !path.exists() {
            return Ok(ImportuneConfig::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&ImportuneConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl ConfigService for DefaultConfigService {
    fn load(&self, global_only: bool) -> Result<ImportuneConfig, ConfigError> {
        if global_only {
            return Self::load_from_path(&Self::global_config_path());
        }

        let global = Self::load_from_path(&Self::global_config_path())?;
        let project = Self::load_from_path(&self.project_config_path())?;
        let mut config = merge_config(global, project);
        config = apply_env_overrides(config)?;
        Ok(config)
    }

    fn config_path(&self, global: bool) -> PathBuf {
        if global {
            Self::global_config_path()
        } else {
            self.project_config_path()
        }
    }

    fn init(&self, global: bool, force: bool) -> Result<PathBuf, ConfigError> {
        let path = self.config_path(global);

        if path.exists() && !force {
            return Err(ConfigError::InvalidValue {
                key: "config".to_string(),
                message: format!(
                    "Config already exists: {}. Use --force to overwrite.",
                    path.display()
                ),
            });
        }

        Self::write_default_config(&path)?;
        Ok(path)
    }
}

/// Project config wins on behavior; import mappings from both layers are
/// kept, project entries after global ones.
fn merge_config(global: ImportuneConfig, project: ImportuneConfig) -> ImportuneConfig {
    let mut imports = project.imports;
    let mut auto = global.imports.auto;
    auto.extend(imports.auto);
    imports.auto = auto;

    let mut always = global.imports.always_import;
    for entry in imports.always_import {
        if !always.contains(&entry) {
            always.push(entry);
        }
    }
    imports.always_import = always;

    ImportuneConfig {
        format: project.format,
        imports,
        analyzer: project.analyzer,
    }
}

fn apply_env_overrides(mut config: ImportuneConfig) -> Result<ImportuneConfig, ConfigError> {
    if let Ok(val) = std::env::var("IMPORTUNE_ANALYZER") {
        config.analyzer.command = val;
    }
    if let Ok(val) = std::env::var("IMPORTUNE_DEPTH_LIMIT") {
        config.format.depth_limit = val.parse().map_err(|_| ConfigError::InvalidValue {
            key: "IMPORTUNE_DEPTH_LIMIT".to_string(),
            message: format!("expected an integer, got '{val}'"),
        })?;
    }
    Ok(config)
}
