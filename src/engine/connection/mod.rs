//! Client factory: environment in, `bollard` client out.

mod error_classification;
mod health_check;
mod plan;
mod tls;

use std::time::Duration;

use bollard::{ClientVersion, Docker};
use tracing::{debug, info};

pub use health_check::{EnginePinger, HEALTH_CHECK_TIMEOUT_SECS, PingFuture};
pub use plan::ConnectionPlan;

use crate::environment::{ApiVersion, ClientEnvironment, EnvOverrides};
use crate::error::{DockenvError, Result};

/// A configured engine client.
///
/// Carries the `bollard` handle together with the endpoint and request
/// timeout it was built with.
#[derive(Debug, Clone)]
pub struct EngineClient {
    docker: Docker,
    endpoint: String,
    transport: &'static str,
    timeout: Duration,
    api_version: Option<ApiVersion>,
}

impl EngineClient {
    /// The underlying `bollard` client.
    #[must_use]
    pub const fn docker(&self) -> &Docker {
        &self.docker
    }

    /// Consumes the wrapper and returns the `bollard` client.
    #[must_use]
    pub fn into_inner(self) -> Docker {
        self.docker
    }

    /// The endpoint the client talks to, after scheme rewriting.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Transport name: `socket`, `http` or `tls`.
    #[must_use]
    pub const fn transport(&self) -> &'static str {
        self.transport
    }

    /// The request timeout applied to every call.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The pinned API version, if one was requested.
    #[must_use]
    pub const fn api_version(&self) -> Option<ApiVersion> {
        self.api_version
    }
}

/// Builds engine clients the way the Docker CLI configures itself.
pub struct ClientFactory;

impl ClientFactory {
    /// Builds a client from the process environment behind `env`.
    ///
    /// `HOME` is optional, `DOCKER_HOST` is required and
    /// `DOCKER_CLIENT_TIMEOUT` overrides the 60 second default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HostNotSet` when `DOCKER_HOST` is missing, plus
    /// any error from [`ClientEnvironment::from_env`] or [`Self::connect`].
    pub fn docker_client<E: mockable::Env>(env: &E) -> Result<EngineClient> {
        let environment = ClientEnvironment::from_env(env)?;
        Self::connect(&environment)
    }

    /// Builds a client, preferring `overrides` over the environment.
    ///
    /// # Errors
    ///
    /// As for [`Self::docker_client`].
    pub fn docker_client_with_overrides<E: mockable::Env>(
        overrides: &EnvOverrides,
        env: &E,
    ) -> Result<EngineClient> {
        let environment = ClientEnvironment::resolve(overrides, env)?;
        Self::connect(&environment)
    }

    /// Builds a client for an already resolved environment.
    ///
    /// HTTP and TLS clients are created without contacting the engine. Unix
    /// socket clients require the socket to exist.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidValue` for an unsupported host or TLS on a
    ///   socket endpoint.
    /// - `FilesystemError::NotFound` when TLS material is missing.
    /// - `ContainerError::{SocketNotFound, PermissionDenied, ConnectionFailed}`
    ///   when the client library refuses the endpoint.
    pub fn connect(environment: &ClientEnvironment) -> Result<EngineClient> {
        let plan = ConnectionPlan::for_environment(environment)?;
        let version = environment
            .api_version()
            .map_or_else(|| bollard::API_DEFAULT_VERSION.clone(), to_client_version);
        let timeout_secs = environment.timeout_secs();

        debug!(
            transport = plan.kind(),
            endpoint = plan.endpoint(),
            timeout_secs,
            api_version = ?environment.api_version(),
            "building engine client"
        );

        let docker = Self::build(&plan, timeout_secs, &version)?;

        info!(endpoint = plan.endpoint(), "engine client ready");
        Ok(EngineClient {
            docker,
            endpoint: plan.endpoint().to_owned(),
            transport: plan.kind(),
            timeout: environment.timeout(),
            api_version: environment.api_version(),
        })
    }

    fn build(plan: &ConnectionPlan, timeout_secs: u64, version: &ClientVersion) -> Result<Docker> {
        let built = match plan {
            ConnectionPlan::Socket { uri } => Docker::connect_with_socket(uri, timeout_secs, version),
            ConnectionPlan::Http { url } => Docker::connect_with_http(url, timeout_secs, version),
            ConnectionPlan::Tls { url, material } => {
                tls::ensure_material_present(material)?;
                Docker::connect_with_ssl(
                    url,
                    material.key.as_std_path(),
                    material.cert.as_std_path(),
                    material.ca.as_std_path(),
                    timeout_secs,
                    version,
                )
            }
        };

        built.map_err(|error| {
            DockenvError::from(error_classification::classify_connection_error(&error, plan))
        })
    }
}

const fn to_client_version(version: ApiVersion) -> ClientVersion {
    ClientVersion {
        major_version: version.major(),
        minor_version: version.minor(),
    }
}
