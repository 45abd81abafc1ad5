use anyhow::Context;
use passvault_core::VaultConfig;
use passvault_sso::{ClientRegistrar, SsoClient};
use passvault_storage::{VaultStorage, create_storage};
use passvault_token::TokenCodec;
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only state for every request task.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn VaultStorage>,

    /// Built once from the configured secret; never mutated.
    pub codec: Arc<TokenCodec>,

    /// Handler deadline.
    pub request_timeout: Duration,

    /// Present only when an identity service is configured.
    pub registrar: Option<Arc<dyn ClientRegistrar>>,
}

impl AppState {
    pub fn new(storage: Arc<dyn VaultStorage>, codec: TokenCodec, request_timeout: Duration) -> Self {
        Self {
            storage,
            codec: Arc::new(codec),
            request_timeout,
            registrar: None,
        }
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn ClientRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    pub async fn init(cfg: &VaultConfig) -> anyhow::Result<Self> {
        let codec = TokenCodec::new(&cfg.secret).context("invalid signing secret")?;
        let storage = create_storage(&cfg.storage)
            .await
            .context("failed to open storage")?;

        let mut state = Self::new(storage, codec, cfg.http_server.timeout);
        if let Some(sso) = &cfg.sso {
            let client = SsoClient::connect_lazy(sso).context("failed to configure SSO client")?;
            state = state.with_registrar(Arc::new(client));
        }
        Ok(state)
    }
}
