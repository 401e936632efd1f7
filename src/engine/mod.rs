//! Container engine client construction.
//!
//! A [`ClientEnvironment`](crate::environment::ClientEnvironment) is turned
//! into a [`ConnectionPlan`] (Unix socket, named pipe, plain HTTP or TLS) and
//! then into an [`EngineClient`] backed by `bollard`. HTTP clients are built
//! lazily, so constructing one performs no network I/O; call the health check
//! to confirm the engine answers.

mod connection;

pub use connection::{
    ClientFactory, ConnectionPlan, EngineClient, EnginePinger, HEALTH_CHECK_TIMEOUT_SECS,
    PingFuture,
};
