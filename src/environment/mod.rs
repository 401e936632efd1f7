//! Client environment resolution.
//!
//! A [`ClientEnvironment`] is a snapshot of the variables the official Docker
//! client honours. Each value is taken from an explicit override when one is
//! supplied, otherwise from the process environment:
//!
//! | Value | Variable | Default |
//! |---|---|---|
//! | engine endpoint | `DOCKER_HOST` | none, resolution fails |
//! | request timeout | `DOCKER_CLIENT_TIMEOUT` | 60 seconds |
//! | TLS verification | `DOCKER_TLS_VERIFY` | off |
//! | certificate directory | `DOCKER_CERT_PATH` | `$HOME/.docker` |
//! | API version | `DOCKER_API_VERSION` | client library default |
//!
//! Empty variables are treated as unset. Reads go through [`mockable::Env`]
//! so tests never touch the real process environment.

mod api_version;


use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

pub use api_version::ApiVersion;

use crate::error::{ConfigError, Result};

/// Home directory, used to locate the default certificate directory.
pub const HOME_VAR: &str = "HOME";
/// Engine endpoint.
pub const HOST_VAR: &str = "DOCKER_HOST";
/// Request timeout in seconds.
pub const TIMEOUT_VAR: &str = "DOCKER_CLIENT_TIMEOUT";
/// Enables TLS with client certificate verification when non-empty.
pub const TLS_VERIFY_VAR: &str = "DOCKER_TLS_VERIFY";
/// Directory holding `ca.pem`, `cert.pem` and `key.pem`.
pub const CERT_PATH_VAR: &str = "DOCKER_CERT_PATH";
/// Pinned engine API version.
pub const API_VERSION_VAR: &str = "DOCKER_API_VERSION";

/// Request timeout applied when `DOCKER_CLIENT_TIMEOUT` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Certificate directory name below `HOME`.
const DEFAULT_CERT_DIR: &str = ".docker";

const CA_FILE: &str = "ca.pem";
const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";

/// Explicit values that win over the process environment.
///
/// Typically built from the layered application configuration via
/// `AppConfig::overrides`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Engine endpoint.
    pub host: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Whether TLS verification is enabled.
    pub tls_verify: Option<bool>,
    /// Certificate directory.
    pub cert_path: Option<Utf8PathBuf>,
    /// Engine API version in `major.minor` form.
    pub api_version: Option<String>,
}

/// Paths of the PEM files used for TLS client authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    /// Certificate authority bundle.
    pub ca: Utf8PathBuf,
    /// Client certificate.
    pub cert: Utf8PathBuf,
    /// Client private key.
    pub key: Utf8PathBuf,
}

impl TlsMaterial {
    /// Material laid out the way the Docker CLI expects inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Utf8Path) -> Self {
        Self {
            ca: dir.join(CA_FILE),
            cert: dir.join(CERT_FILE),
            key: dir.join(KEY_FILE),
        }
    }

    /// Iterates over the three files in `ca`, `cert`, `key` order.
    pub fn files(&self) -> impl Iterator<Item = &Utf8Path> {
        [self.ca.as_path(), self.cert.as_path(), self.key.as_path()].into_iter()
    }
}

/// Reads non-empty variables through a [`mockable::Env`].
struct EnvReader<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> EnvReader<'a, E> {
    const fn new(env: &'a E) -> Self {
        Self { env }
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.env.string(name).filter(|value| !value.is_empty())
    }
}

/// Client configuration derived from the environment.
///
/// The value is immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEnvironment {
    home: Option<Utf8PathBuf>,
    host: String,
    timeout_secs: u64,
    tls_verify: bool,
    cert_path: Utf8PathBuf,
    api_version: Option<ApiVersion>,
}

impl ClientEnvironment {
    /// Resolves the client environment from environment variables only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HostNotSet` when `DOCKER_HOST` is unset or empty,
    /// and `ConfigError::InvalidValue` when `DOCKER_CLIENT_TIMEOUT` or
    /// `DOCKER_API_VERSION` cannot be parsed.
    pub fn from_env<E: mockable::Env>(env: &E) -> Result<Self> {
        Self::resolve(&EnvOverrides::default(), env)
    }

    /// Resolves the client environment, preferring `overrides` over
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HostNotSet` when neither an override nor
    /// `DOCKER_HOST` supplies an endpoint, and `ConfigError::InvalidValue`
    /// when a timeout or API version cannot be parsed.
    pub fn resolve<E: mockable::Env>(overrides: &EnvOverrides, env: &E) -> Result<Self> {
        let reader = EnvReader::new(env);

        let home = reader.non_empty(HOME_VAR).map(Utf8PathBuf::from);

        let host = overrides
            .host
            .clone()
            .filter(|value| !value.is_empty())
            .or_else(|| reader.non_empty(HOST_VAR))
            .ok_or(ConfigError::HostNotSet)?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => reader
                .non_empty(TIMEOUT_VAR)
                .map(|raw| parse_timeout(&raw))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let tls_verify = overrides
            .tls_verify
            .unwrap_or_else(|| reader.non_empty(TLS_VERIFY_VAR).is_some());

        let cert_path = overrides
            .cert_path
            .clone()
            .filter(|path| !path.as_str().is_empty())
            .or_else(|| reader.non_empty(CERT_PATH_VAR).map(Utf8PathBuf::from))
            .unwrap_or_else(|| default_cert_path(home.as_deref()));

        let api_version = match overrides.api_version.as_deref() {
            Some(raw) if !raw.is_empty() => Some(parse_api_version(raw, "api_version")?),
            _ => reader
                .non_empty(API_VERSION_VAR)
                .map(|raw| parse_api_version(&raw, API_VERSION_VAR))
                .transpose()?,
        };

        let environment = Self {
            home,
            host,
            timeout_secs,
            tls_verify,
            cert_path,
            api_version,
        };
        debug!(
            host = %environment.host,
            timeout_secs = environment.timeout_secs,
            tls_verify = environment.tls_verify,
            cert_path = %environment.cert_path,
            "resolved client environment"
        );
        Ok(environment)
    }

    /// The home directory, if `HOME` was set.
    #[must_use]
    pub fn home(&self) -> Option<&Utf8Path> {
        self.home.as_deref()
    }

    /// The engine endpoint as supplied.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The request timeout in whole seconds.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Whether TLS client verification is enabled.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Directory holding the TLS material.
    #[must_use]
    pub fn cert_path(&self) -> &Utf8Path {
        &self.cert_path
    }

    /// The pinned API version, if any.
    #[must_use]
    pub const fn api_version(&self) -> Option<ApiVersion> {
        self.api_version
    }

    /// TLS material paths below [`Self::cert_path`].
    #[must_use]
    pub fn tls_material(&self) -> TlsMaterial {
        TlsMaterial::in_dir(&self.cert_path)
    }
}

/// `$HOME/.docker`, or a relative `.docker` when `HOME` is unset.
fn default_cert_path(home: Option<&Utf8Path>) -> Utf8PathBuf {
    home.map_or_else(
        || Utf8PathBuf::from(DEFAULT_CERT_DIR),
        |dir| dir.join(DEFAULT_CERT_DIR),
    )
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        ConfigError::InvalidValue {
            field: TIMEOUT_VAR.to_owned(),
            reason: format!("expected an integer number of seconds, got '{raw}'"),
        }
        .into()
    })
}

fn parse_api_version(raw: &str, field: &str) -> Result<ApiVersion> {
    raw.parse::<ApiVersion>().map_err(|reason| {
        ConfigError::InvalidValue {
            field: field.to_owned(),
            reason,
        }
        .into()
    })
}
