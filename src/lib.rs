//! Container engine clients configured from the environment.
//!
//! `dockenv` reads the variables the Docker CLI honours (`DOCKER_HOST`,
//! `DOCKER_CLIENT_TIMEOUT`, `DOCKER_TLS_VERIFY`, `DOCKER_CERT_PATH`,
//! `DOCKER_API_VERSION`) and returns a ready-to-use `bollard` client.
//!
//! ```ignore
//! use dockenv::engine::ClientFactory;
//! use mockable::DefaultEnv;
//!
//! let client = ClientFactory::docker_client(&DefaultEnv::new())?;
//! println!("talking to {} with a {:?} timeout", client.endpoint(), client.timeout());
//! ```
//!
//! # Modules
//!
//! - [`environment`]: Resolution of the client environment and its defaults
//! - [`engine`]: Transport selection, client construction and health checks
//! - [`config`]: Layered configuration for the `dockenv` binary
//! - [`error`]: Semantic error types

pub mod config;
pub mod engine;
pub mod environment;
pub mod error;
