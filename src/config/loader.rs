//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: application defaults, configuration file,
//! `DOCKENV_*` environment variables, command-line arguments.
//!
//! Layers are composed by hand with `MergeComposer` because the CLI owns
//! subcommand dispatch and because typed environment variables must fail
//! fast. `OrthoConfig`'s own environment layer silently drops values it
//! cannot parse; here `DOCKENV_TIMEOUT=soon` is an error.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`).
    Bool,
    /// Unsigned 64-bit integer.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    env_var: &'static str,
    path: &'static [&'static str],
    var_type: EnvVarType,
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "DOCKENV_HOST",
        path: &["host"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_TIMEOUT",
        path: &["timeout"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "DOCKENV_API_VERSION",
        path: &["api_version"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_TLS_VERIFY",
        path: &["tls", "verify"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKENV_TLS_CERT_PATH",
        path: &["tls", "cert_path"],
        var_type: EnvVarType::String,
    },
];

/// Returns the environment variable names recognised by the loader.
///
/// Tests use this to clear every `DOCKENV_*` variable without keeping a
/// second list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Reads a TOML configuration file through `cap_std` and pushes it as the
/// file layer.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    debug!(%path, "loaded configuration file");
    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

/// Finds the configuration file: `--config` if it exists, otherwise the
/// first discovered candidate.
fn discover_config_file(cli: &Cli) -> Option<Utf8PathBuf> {
    cli.config.clone().filter(|p| p.exists()).or_else(|| {
        let discovery = ConfigDiscovery::builder("dockenv")
            .env_var("DOCKENV_CONFIG_PATH")
            .config_file_name("config.toml")
            .dotfile_name(".dockenv.toml")
            .build();
        discovery
            .candidates()
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Utf8PathBuf::try_from(p).ok())
    })
}

/// Load configuration with full layer precedence.
///
/// # Errors
///
/// Returns `ConfigError` if a configuration file is malformed, a typed
/// `DOCKENV_*` variable cannot be parsed, or the merged layers do not
/// deserialise.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// [`load_config`] with an explicit environment source.
pub(crate) fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(ref path) = discover_config_file(cli) {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Collects `DOCKENV_*` variables into a JSON value shaped like `AppConfig`.
///
/// Blank variables are skipped so they cannot mask lower layers.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable cannot be parsed.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env
            .string(spec.env_var)
            .filter(|value| !value.trim().is_empty())
        else {
            continue;
        };
        let json_value = parse_env_value(spec, raw_value)?;
        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

fn parse_env_value(spec: &EnvVarSpec, raw_value: String) -> Result<Value> {
    let invalid = |expected: &str, raw: &str| ConfigError::InvalidValue {
        field: spec.env_var.to_owned(),
        reason: format!("expected {expected}, got '{raw}'"),
    };

    match spec.var_type {
        EnvVarType::String => Ok(Value::String(raw_value)),
        EnvVarType::Bool => raw_value
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid("bool (true/false)", &raw_value).into()),
        EnvVarType::U64 => raw_value
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid("unsigned integer", &raw_value).into()),
    }
}

/// Inserts `value` at a nested path, creating intermediate objects.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Builds the CLI layer from the global flags.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref host) = cli.host {
        overrides.insert("host".to_owned(), Value::String(host.clone()));
    }
    if let Some(timeout) = cli.timeout {
        overrides.insert("timeout".to_owned(), Value::Number(timeout.into()));
    }
    if let Some(ref version) = cli.api_version {
        overrides.insert("api_version".to_owned(), Value::String(version.clone()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
