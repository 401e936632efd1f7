//! Behavioural test helpers for the client factory.
//!
//! Environment variables live in scenario state and reach the code under test
//! through a `MockEnv`, so scenarios never touch the real process environment.

mod steps;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dockenv::engine::ConnectionPlan;
use mockable::MockEnv;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

#[expect(
    unused_imports,
    reason = "rstest-bdd discovers step functions via attributes, not runtime usage"
)]
pub use steps::*;

/// Step result type for BDD tests, using a static string for errors.
pub type StepResult<T> = Result<T, &'static str>;

/// Thread-safe environment variable storage for BDD tests.
type EnvVars = Arc<Mutex<HashMap<String, String>>>;

/// Snapshot of a client build attempt.
#[derive(Clone, Debug)]
pub enum BuildOutcome {
    /// The client was built.
    Built {
        /// Endpoint after scheme rewriting.
        endpoint: String,
        /// Request timeout in seconds.
        timeout_secs: u64,
    },
    /// A configuration error with its message.
    ConfigError {
        /// Field named by `InvalidValue`, if any.
        field: Option<String>,
        /// Rendered error message.
        message: String,
    },
    /// Any other failure.
    OtherError(String),
}

/// State shared across client factory scenarios.
#[derive(Default, ScenarioState)]
pub struct ClientFactoryState {
    env_vars: Slot<EnvVars>,
    /// Outcome of "the client is built".
    pub outcome: Slot<BuildOutcome>,
    /// Outcome of "the connection is planned".
    pub plan: Slot<ConnectionPlan>,
}

/// Fixture providing a fresh client factory state.
#[fixture]
pub fn client_factory_state() -> ClientFactoryState {
    let state = ClientFactoryState::default();
    state.env_vars.set(Arc::new(Mutex::new(HashMap::new())));
    state
}

fn env_vars(state: &ClientFactoryState) -> StepResult<EnvVars> {
    state.env_vars.get().ok_or("env_vars should be initialised")
}

/// Records a variable for the mock environment.
pub fn set_env_var(state: &ClientFactoryState, key: &str, value: &str) -> StepResult<()> {
    let vars = env_vars(state)?;
    vars.lock()
        .map_err(|_| "mutex poisoned")?
        .insert(String::from(key), String::from(value));
    Ok(())
}

/// Forgets a variable so the mock environment reports it as unset.
pub fn unset_env_var(state: &ClientFactoryState, key: &str) -> StepResult<()> {
    let vars = env_vars(state)?;
    vars.lock().map_err(|_| "mutex poisoned")?.remove(key);
    Ok(())
}

/// Creates a `MockEnv` answering from a snapshot of the recorded variables.
///
/// All "Given" steps run before the "When" step that calls this, so the
/// snapshot is complete.
pub fn create_mock_env(state: &ClientFactoryState) -> StepResult<MockEnv> {
    let vars = env_vars(state)?
        .lock()
        .map_err(|_| "mutex poisoned")?
        .clone();

    let mut mock = MockEnv::new();
    mock.expect_string()
        .returning(move |key| vars.get(key).cloned());
    Ok(mock)
}
