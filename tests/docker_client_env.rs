//! Integration tests for `ClientFactory::docker_client` against the real
//! process environment.

mod test_utils;

use std::time::Duration;

use dockenv::engine::ClientFactory;
use dockenv::error::{ConfigError, DockenvError};
use mockable::DefaultEnv;
use serial_test::serial;
use test_utils::PatchedEnv;

const TCP_HOST: &str = "tcp://192.168.59.103:2375";

/// Variables that would otherwise leak in from the developer's shell.
const DOCKER_VARS: &[&str] = &[
    "DOCKER_HOST",
    "DOCKER_CLIENT_TIMEOUT",
    "DOCKER_TLS_VERIFY",
    "DOCKER_CERT_PATH",
    "DOCKER_API_VERSION",
];

fn patch(extra: &[(&str, Option<&str>)]) -> PatchedEnv {
    let mut vars: Vec<(&str, Option<&str>)> = DOCKER_VARS.iter().map(|k| (*k, None)).collect();
    vars.extend_from_slice(extra);
    PatchedEnv::apply(&vars)
}

#[test]
#[serial]
fn docker_client_no_home() {
    let _env = patch(&[("HOME", None), ("DOCKER_HOST", Some(TCP_HOST))]);
    ClientFactory::docker_client(&DefaultEnv::new()).expect("client should be built without HOME");
}

#[test]
#[serial]
fn docker_client_no_docker_host() {
    let _env = patch(&[]);
    match ClientFactory::docker_client(&DefaultEnv::new()) {
        Err(DockenvError::Config(error @ ConfigError::HostNotSet)) => {
            assert!(
                error.msg().contains("DOCKER_HOST is not set"),
                "unexpected message: {error}"
            );
        }
        Err(other) => panic!("expected a configuration error, got {other:?}"),
        Ok(_) => panic!("should have failed with a configuration error"),
    }
}

#[test]
#[serial]
fn docker_client_with_custom_timeout() {
    let _env = patch(&[
        ("DOCKER_HOST", Some(TCP_HOST)),
        ("DOCKER_CLIENT_TIMEOUT", Some("300")),
    ]);
    let client = ClientFactory::docker_client(&DefaultEnv::new()).expect("client should be built");
    assert_eq!(client.timeout(), Duration::from_secs(300));
}
