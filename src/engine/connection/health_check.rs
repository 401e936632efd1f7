//! Engine health check and connect-and-verify helpers.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bollard::Docker;
use tracing::{debug, warn};

use super::{ClientFactory, EngineClient};
use crate::environment::ClientEnvironment;
use crate::error::{ContainerError, DockenvError, Result};

/// Upper bound on a single ping, in seconds.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Boxed future returned by [`EnginePinger`] implementors.
pub type PingFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<String, bollard::errors::Error>> + Send + 'a>>;

/// Anything that can ping a container engine.
///
/// Exists so the health check can be exercised without a running daemon.
pub trait EnginePinger {
    /// Sends a `/_ping` request.
    fn ping(&self) -> PingFuture<'_>;
}

impl EnginePinger for Docker {
    fn ping(&self) -> PingFuture<'_> {
        Box::pin(async move { Self::ping(self).await })
    }
}

impl EnginePinger for EngineClient {
    fn ping(&self) -> PingFuture<'_> {
        EnginePinger::ping(self.docker())
    }
}

impl ClientFactory {
    /// Verifies the engine answers a ping within
    /// [`HEALTH_CHECK_TIMEOUT_SECS`].
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::HealthCheckFailed` if the engine answers with
    /// an error and `ContainerError::HealthCheckTimeout` if it does not answer
    /// in time.
    pub async fn health_check_async<P: EnginePinger + ?Sized>(pinger: &P) -> Result<()> {
        let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

        let outcome = tokio::time::timeout(timeout, pinger.ping())
            .await
            .map_err(|_| {
                DockenvError::from(ContainerError::HealthCheckTimeout {
                    seconds: HEALTH_CHECK_TIMEOUT_SECS,
                })
            })
            .and_then(|reply| {
                reply.map_err(|e| {
                    DockenvError::from(ContainerError::HealthCheckFailed {
                        message: e.to_string(),
                    })
                })
            });

        match outcome {
            Ok(reply) => {
                debug!(%reply, "engine answered ping");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "engine health check failed");
                Err(error)
            }
        }
    }

    /// Blocking variant of [`Self::health_check_async`] on a dedicated
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the runtime cannot
    /// be created, otherwise the errors of [`Self::health_check_async`].
    pub fn health_check<P: EnginePinger + ?Sized>(pinger: &P) -> Result<()> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::health_check_async(pinger))
    }

    /// Builds a client for `environment` and pings it.
    ///
    /// # Errors
    ///
    /// Returns the construction errors of [`Self::connect`] followed by the
    /// health check errors.
    pub async fn connect_and_verify_async(environment: &ClientEnvironment) -> Result<EngineClient> {
        let client = Self::connect(environment)?;
        Self::health_check_async(&client).await?;
        Ok(client)
    }

    /// Blocking variant of [`Self::connect_and_verify_async`].
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the runtime cannot
    /// be created, otherwise the errors of
    /// [`Self::connect_and_verify_async`].
    pub fn connect_and_verify(environment: &ClientEnvironment) -> Result<EngineClient> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::connect_and_verify_async(environment))
    }

    fn create_runtime() -> Result<tokio::runtime::Runtime> {
        tokio::runtime::Runtime::new().map_err(|e| {
            ContainerError::RuntimeCreationFailed {
                message: e.to_string(),
            }
            .into()
        })
    }
}
