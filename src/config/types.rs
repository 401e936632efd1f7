//! Configuration data types for dockenv.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::environment::EnvOverrides;

/// TLS overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Force TLS verification on or off, ignoring `DOCKER_TLS_VERIFY`.
    pub verify: Option<bool>,

    /// Directory holding `ca.pem`, `cert.pem` and `key.pem`.
    pub cert_path: Option<Utf8PathBuf>,
}

/// Root application configuration.
///
/// Every field is optional; unset fields fall through to the matching
/// `DOCKER_*` variable.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKENV_CONFIG_PATH` environment variable
/// 2. `.dockenv.toml` in the current working directory
/// 3. `.dockenv.toml` in the home directory
/// 4. `~/.config/dockenv/config.toml` (XDG default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKENV",
    post_merge_hook,
    discovery(
        app_name = "dockenv",
        env_var = "DOCKENV_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockenv.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The engine endpoint, overriding `DOCKER_HOST`.
    pub host: Option<String>,

    /// Request timeout in seconds, overriding `DOCKER_CLIENT_TIMEOUT`.
    pub timeout: Option<u64>,

    /// Engine API version, overriding `DOCKER_API_VERSION`.
    pub api_version: Option<String>,

    /// TLS overrides.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub tls: TlsConfig,
}

impl AppConfig {
    /// Converts the configuration into overrides for client resolution.
    #[must_use]
    pub fn overrides(&self) -> EnvOverrides {
        EnvOverrides {
            host: self.host.clone(),
            timeout_secs: self.timeout,
            tls_verify: self.tls.verify,
            cert_path: self.tls.cert_path.clone(),
            api_version: self.api_version.clone(),
        }
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Blank strings from any layer mean "not configured".
        self.host = self.host.take().filter(|value| !value.trim().is_empty());
        self.api_version = self
            .api_version
            .take()
            .filter(|value| !value.trim().is_empty());
        self.tls.cert_path = self
            .tls
            .cert_path
            .take()
            .filter(|path| !path.as_str().trim().is_empty());
        Ok(())
    }
}
