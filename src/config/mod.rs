//! Application configuration for the `dockenv` binary.
//!
//! Values here override the `DOCKER_*` environment variables when the client
//! is built. Layers are merged with `ortho_config`, lowest to highest:
//! defaults, configuration file, `DOCKENV_*` environment variables, and
//! command-line flags.
//!
//! The configuration file is expected at `~/.config/dockenv/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "tcp://192.168.59.103:2376"
//! timeout = 300
//! api_version = "1.41"
//!
//! [tls]
//! verify = true
//! cert_path = "/home/user/.docker/machine"
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, TlsConfig};
