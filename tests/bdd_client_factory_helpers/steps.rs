//! Step definitions for client factory scenarios.

use dockenv::engine::{ClientFactory, ConnectionPlan};
use dockenv::environment::ClientEnvironment;
use dockenv::error::{ConfigError, DockenvError};
use rstest_bdd_macros::{given, then, when};

use super::{
    BuildOutcome, ClientFactoryState, StepResult, create_mock_env, set_env_var, unset_env_var,
};

// =============================================================================
// Given
// =============================================================================

#[given("{name} is set to {value}")]
fn variable_is_set_to(
    client_factory_state: &ClientFactoryState,
    name: String,
    value: String,
) -> StepResult<()> {
    set_env_var(client_factory_state, &name, &value)
}

#[given("{name} is not set")]
fn variable_is_not_set(client_factory_state: &ClientFactoryState, name: String) -> StepResult<()> {
    unset_env_var(client_factory_state, &name)
}

// =============================================================================
// When
// =============================================================================

#[when("the client is built")]
fn client_is_built(client_factory_state: &ClientFactoryState) -> StepResult<()> {
    let env = create_mock_env(client_factory_state)?;
    let outcome = match ClientFactory::docker_client(&env) {
        Ok(client) => BuildOutcome::Built {
            endpoint: client.endpoint().to_owned(),
            timeout_secs: client.timeout().as_secs(),
        },
        Err(DockenvError::Config(error)) => {
            let field = match &error {
                ConfigError::InvalidValue { field, .. } => Some(field.clone()),
                _ => None,
            };
            BuildOutcome::ConfigError {
                field,
                message: error.msg(),
            }
        }
        Err(other) => BuildOutcome::OtherError(other.to_string()),
    };
    client_factory_state.outcome.set(outcome);
    Ok(())
}

#[when("the connection is planned")]
fn connection_is_planned(client_factory_state: &ClientFactoryState) -> StepResult<()> {
    let env = create_mock_env(client_factory_state)?;
    let environment =
        ClientEnvironment::from_env(&env).map_err(|_| "environment should resolve")?;
    let plan =
        ConnectionPlan::for_environment(&environment).map_err(|_| "plan should be built")?;
    client_factory_state.plan.set(plan);
    Ok(())
}

// =============================================================================
// Then
// =============================================================================

fn outcome(state: &ClientFactoryState) -> StepResult<BuildOutcome> {
    state.outcome.get().ok_or("the client should have been built")
}

fn plan(state: &ClientFactoryState) -> StepResult<ConnectionPlan> {
    state.plan.get().ok_or("the connection should have been planned")
}

#[then("the client is ready")]
fn client_is_ready(client_factory_state: &ClientFactoryState) -> StepResult<()> {
    match outcome(client_factory_state)? {
        BuildOutcome::Built { .. } => Ok(()),
        _ => Err("expected the client to be built"),
    }
}

#[then("the client endpoint is {endpoint}")]
fn client_endpoint_is(
    client_factory_state: &ClientFactoryState,
    endpoint: String,
) -> StepResult<()> {
    match outcome(client_factory_state)? {
        BuildOutcome::Built {
            endpoint: actual, ..
        } => {
            assert_eq!(actual, endpoint);
            Ok(())
        }
        _ => Err("expected the client to be built"),
    }
}

#[then("the client timeout is {seconds} seconds")]
fn client_timeout_is(client_factory_state: &ClientFactoryState, seconds: u64) -> StepResult<()> {
    match outcome(client_factory_state)? {
        BuildOutcome::Built { timeout_secs, .. } => {
            assert_eq!(timeout_secs, seconds);
            Ok(())
        }
        _ => Err("expected the client to be built"),
    }
}

#[then("a configuration error mentions {text}")]
fn configuration_error_mentions(
    client_factory_state: &ClientFactoryState,
    text: String,
) -> StepResult<()> {
    match outcome(client_factory_state)? {
        BuildOutcome::ConfigError { message, .. } => {
            assert!(message.contains(&text), "message was: {message}");
            Ok(())
        }
        _ => Err("expected a configuration error"),
    }
}

#[then("an invalid value is reported for {field}")]
fn invalid_value_reported_for(
    client_factory_state: &ClientFactoryState,
    field: String,
) -> StepResult<()> {
    match outcome(client_factory_state)? {
        BuildOutcome::ConfigError {
            field: Some(actual),
            ..
        } => {
            assert_eq!(actual, field);
            Ok(())
        }
        _ => Err("expected an invalid value error"),
    }
}

#[then("the plan uses {kind} at {endpoint}")]
fn plan_uses(
    client_factory_state: &ClientFactoryState,
    kind: String,
    endpoint: String,
) -> StepResult<()> {
    let planned = plan(client_factory_state)?;
    assert_eq!(planned.kind(), kind);
    assert_eq!(planned.endpoint(), endpoint);
    Ok(())
}

#[then("the CA certificate is {path}")]
fn ca_certificate_is(client_factory_state: &ClientFactoryState, path: String) -> StepResult<()> {
    match plan(client_factory_state)? {
        ConnectionPlan::Tls { material, .. } => {
            assert_eq!(material.ca.as_str(), path);
            Ok(())
        }
        _ => Err("expected a TLS plan"),
    }
}
