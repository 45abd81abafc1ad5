//! gRPC client for the identity service.

use crate::error::UpstreamError;
use crate::proto::{REGISTER_CLIENT_PATH, RegisterClientRequest, RegisterClientResponse};
use crate::retry::{RetryPolicy, with_retry};
use async_trait::async_trait;
use http::uri::PathAndQuery;
use passvault_core::SsoConfig;
use tonic::Status;
use tonic::codec::ProstCodec;
use tonic::transport::{Channel, Endpoint};

/// Registers client applications and returns their app id.
#[async_trait]
pub trait ClientRegistrar: Send + Sync {
    async fn register_client(
        &self,
        app_name: &str,
        secret: &str,
        redirect_url: &str,
    ) -> Result<i64, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct SsoClient {
    channel: Channel,
    policy: RetryPolicy,
}

impl SsoClient {
    /// Build a client without dialing; the connection is made on first use.
    pub fn connect_lazy(config: &SsoConfig) -> Result<Self, UpstreamError> {
        let endpoint = Endpoint::from_shared(config.endpoint())?.connect_timeout(config.timeout);
        tracing::info!(endpoint = %config.endpoint(), retries = config.retries_count, "SSO client configured");

        Ok(Self {
            channel: endpoint.connect_lazy(),
            policy: RetryPolicy::from_config(config),
        })
    }

    async fn call_register(
        &self,
        request: RegisterClientRequest,
    ) -> Result<RegisterClientResponse, Status> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("service not ready: {e}")))?;

        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(REGISTER_CLIENT_PATH),
                ProstCodec::default(),
            )
            .await?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl ClientRegistrar for SsoClient {
    async fn register_client(
        &self,
        app_name: &str,
        secret: &str,
        redirect_url: &str,
    ) -> Result<i64, UpstreamError> {
        let request = RegisterClientRequest {
            app_name: app_name.to_string(),
            secret: secret.to_string(),
            redirect_url: redirect_url.to_string(),
        };

        let response = with_retry(&self.policy, "register_client", || {
            self.call_register(request.clone())
        })
        .await
        .map_err(|status| {
            tracing::error!(app_name = %app_name, code = ?status.code(), message = %status.message(), "failed to register client");
            UpstreamError::from(status)
        })?;

        tracing::info!(app_name = %app_name, app_id = response.app_id, "client registered");
        Ok(response.app_id)
    }
}
