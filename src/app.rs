//! Application container for Importune

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::OutputContext;
use crate::config::SettingsStore;
use crate::infra::oracle::{Oracle, RuffOracle};
use crate::models::config::ImportuneConfig;
use crate::services::config::{ConfigService, DefaultConfigService};
use crate::services::format::{DefaultFormatService, FormatService};

pub struct App {
    root: PathBuf,
    analyzer_command: String,
    pub(crate) output: OutputContext,
    pub(crate) oracle: Arc<dyn Oracle>,
    pub(crate) formatter: Arc<dyn FormatService>,
    pub(crate) config_service: Arc<dyn ConfigService>,
    pub(crate) settings: SettingsStore,
}

impl App {
    pub fn new() -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;

        tracing::debug!("Initializing Importune at {:?}", root);

        let output = OutputContext::new(root.clone());
        let config_service = Arc::new(DefaultConfigService::new(&root));
        let config = config_service.load(false).unwrap_or_default();

        let settings = SettingsStore::new(&config);
        let oracle: Arc<dyn Oracle> = Arc::new(RuffOracle::new(&config.analyzer.command));
        let formatter = Arc::new(DefaultFormatService::new(Arc::clone(&oracle)));

        tracing::info!(
            analyzer = %config.analyzer.command,
            mappings = settings.snapshot().import_table.len(),
            "Importune initialized"
        );

        Ok(Self {
            root,
            analyzer_command: config.analyzer.command,
            output,
            oracle,
            formatter,
            config_service,
            settings,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn oracle_command(&self) -> &str {
        &self.analyzer_command
    }

    /// Swap in a freshly built settings snapshot. In-flight requests keep
    /// the snapshot they started with.
    pub fn reload(&self, config: &ImportuneConfig) {
        self.settings.reload(config);
    }
}
