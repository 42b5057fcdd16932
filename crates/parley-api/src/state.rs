//! Application state wiring the session controller to its infrastructure.
//!
//! The controller is generic over its snapshot store; AppState pins it to the
//! JSON file store and shares it between handlers behind one async mutex.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Mutex;

use parley_core::chat::session::SessionController;
use parley_infra::config::{history_path, load_app_config, load_system_instruction};
use parley_infra::filesystem::JsonFileStore;
use parley_infra::llm::create_gateway;
use parley_infra::secret::{load_dotenv, resolve_api_key};
use parley_types::config::AppConfig;

/// Session controller pinned to the on-disk snapshot store.
pub type ConcreteSessionController = SessionController<JsonFileStore>;

/// Shared application state.
///
/// Every handler locks `controller` for the whole request, so requests that
/// touch the session are processed one at a time.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<ConcreteSessionController>>,
    pub data_dir: PathBuf,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(controller: ConcreteSessionController, data_dir: PathBuf, config: AppConfig) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            data_dir,
            config: Arc::new(config),
        }
    }

    /// Initialize the application state: config, API key, gateway, chat history.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        load_dotenv(&data_dir);
        let config = load_app_config(&data_dir).await;

        let api_key = resolve_api_key().context(
            "no Gemini API key found: set PARLEY_API_KEY (or API_KEY) in the environment or a .env file",
        )?;
        let system_instruction = load_system_instruction(&data_dir, &config).await;
        let gateway = create_gateway(&config.model, Some(api_key), system_instruction)
            .context("failed to create the Gemini gateway")?;

        let snapshot = JsonFileStore::new(history_path(&data_dir, &config));
        let timeout = Duration::from_secs(config.model.timeout_secs);
        let controller = SessionController::open(gateway, snapshot, timeout)
            .await
            .context("failed to load chat history")?;

        tracing::info!(
            data_dir = %data_dir.display(),
            chats = controller.store().len(),
            "Application state initialized"
        );
        Ok(Self::new(controller, data_dir, config))
    }
}
