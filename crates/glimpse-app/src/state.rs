use std::collections::HashMap;
use std::sync::Arc;

use glimpse_capture::{DesktopCapture, ScreenSource};
use glimpse_config::Config;
use glimpse_vision::{OpenAiCompatibleClient, VisionClient};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub screen: Arc<dyn ScreenSource>,
    clients: HashMap<String, Arc<dyn VisionClient>>,
}

impl AppState {
    pub fn new(
        config: Config,
        screen: Arc<dyn ScreenSource>,
        clients: HashMap<String, Arc<dyn VisionClient>>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            screen,
            clients,
        }
    }

    /// Real desktop capture and one HTTP client per configured provider
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let mut clients: HashMap<String, Arc<dyn VisionClient>> = HashMap::new();
        for provider in &config.api.providers {
            if provider.api_key.is_empty() {
                tracing::warn!(
                    "Provider '{}' has no API key; set {} or api_key in the config",
                    provider.name,
                    provider.api_key_env
                );
            }
            let client = OpenAiCompatibleClient::new(provider, &config.api)?;
            clients.insert(provider.name.clone(), Arc::new(client));
        }

        let screen = Arc::new(DesktopCapture::new(config.capture.all_monitors));
        Ok(Self::new(config, screen, clients))
    }

    pub fn client(&self, provider: &str) -> Option<Arc<dyn VisionClient>> {
        self.clients.get(provider).cloned()
    }
}
