//! Request execution over an injected transport.
//!
//! # Design
//! `NetworkClient` holds only an `Arc<dyn Transport>` and its `ClientConfig`;
//! it carries no per-call state, so clones can run any number of calls
//! concurrently. Every operation funnels through `perform`, which enforces the
//! per-call timeout and classifies transport failures before status
//! validation runs. Nothing is retried.
//!
//! Dropping an operation's future cancels it. `spawn` additionally returns a
//! `CallHandle` whose `cancel` surfaces `NetworkError::Cancelled` to whoever
//! joins it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::classify::{classify_failure, require_success, response_parts, validate_response};
use crate::error::NetworkError;
use crate::http::{HttpMethod, ResponseMetadata, TransportResponse, WireRequest, DEFAULT_TIMEOUT};
use crate::request::NetworkRequest;
use crate::transport::{HttpTransport, Transport};

/// Settings that apply to every call made by a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory `download` writes into.
    pub download_dir: PathBuf,
    pub download_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            download_dir: std::env::temp_dir(),
            download_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builds, dispatches and validates requests over a `Transport`.
#[derive(Clone)]
pub struct NetworkClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl std::fmt::Debug for NetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Default for NetworkClient {
    fn default() -> Self {
        Self::new(HttpTransport::new())
    }
}

impl NetworkClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform the call and decode a 2xx JSON body into `R::Response`.
    pub async fn execute<R>(&self, request: &R) -> Result<R::Response, NetworkError>
    where
        R: NetworkRequest + ?Sized,
    {
        let (body, _) = self.execute_raw(request).await?;
        serde_json::from_slice(&body).map_err(NetworkError::DecodingError)
    }

    /// Perform the call and return the 2xx body undecoded.
    pub async fn execute_raw<R>(&self, request: &R) -> Result<(Bytes, ResponseMetadata), NetworkError>
    where
        R: NetworkRequest + ?Sized,
    {
        let wire = request.build_wire_request()?;
        validate_response(self.perform(wire).await?)
    }

    /// Perform the call and return its status, whatever it is.
    pub async fn execute_status_code<R>(&self, request: &R) -> Result<u16, NetworkError>
    where
        R: NetworkRequest + ?Sized,
    {
        let wire = request.build_wire_request()?;
        let (_, meta) = response_parts(self.perform(wire).await?)?;
        Ok(meta.status)
    }

    /// GET `url` and store the body in a fresh file under `download_dir`.
    pub async fn download(&self, url: &str) -> Result<(PathBuf, ResponseMetadata), NetworkError> {
        let url = Url::parse(url).map_err(|_| NetworkError::InvalidUrl)?;
        let mut wire = WireRequest::new(HttpMethod::Get, url);
        wire.timeout = self.config.download_timeout;

        let (body, meta) = response_parts(self.perform(wire).await?)?;
        require_success(&meta, None)?;

        tokio::fs::create_dir_all(&self.config.download_dir)
            .await
            .map_err(NetworkError::network_failure)?;
        let path = self.config.download_dir.join(format!("{}.download", Uuid::new_v4()));
        tokio::fs::write(&path, &body)
            .await
            .map_err(NetworkError::network_failure)?;
        debug!("downloaded {} bytes to {}", body.len(), path.display());
        Ok((path, meta))
    }

    /// Send a pre-built request with `data` as its body.
    pub async fn upload(
        &self,
        request: WireRequest,
        data: impl Into<Bytes>,
    ) -> Result<(Bytes, ResponseMetadata), NetworkError> {
        validate_response(self.perform(request.with_body(data)).await?)
    }

    /// Run `execute` on a background task that can be cancelled.
    pub fn spawn<R>(&self, request: R) -> CallHandle<R::Response>
    where
        R: NetworkRequest + Send + Sync + 'static,
        R::Response: Send + 'static,
    {
        let client = self.clone();
        CallHandle {
            task: Some(tokio::spawn(async move { client.execute(&request).await })),
        }
    }

    async fn perform(&self, request: WireRequest) -> Result<TransportResponse, NetworkError> {
        let method = request.method;
        let url = request.url.clone();
        let started = Instant::now();

        match tokio::time::timeout(request.timeout, self.transport.send(request)).await {
            Err(_) => {
                warn!("{method} {url} timed out after {:?}", started.elapsed());
                Err(NetworkError::Timeout)
            }
            Ok(Err(failure)) => {
                let err = classify_failure(failure);
                warn!("{method} {url} failed: {err}");
                Err(err)
            }
            Ok(Ok(response)) => {
                debug!("{method} {url} -> {} in {:?}", response.status, started.elapsed());
                Ok(response)
            }
        }
    }
}

/// A call running on its own task.
///
/// Dropping the handle aborts the call.
#[derive(Debug)]
pub struct CallHandle<T> {
    task: Option<JoinHandle<Result<T, NetworkError>>>,
}

impl<T> CallHandle<T> {
    /// Abort the call. Has no effect once it has already finished.
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the outcome; an aborted call yields `Cancelled`.
    pub async fn join(mut self) -> Result<T, NetworkError> {
        let Some(task) = self.task.take() else {
            return Err(NetworkError::Unknown);
        };
        match task.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(NetworkError::Cancelled),
            Err(_) => Err(NetworkError::Unknown),
        }
    }
}

impl<T> Drop for CallHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
