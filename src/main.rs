//! `dockenv` application entry point.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`, then
//! merged over the `DOCKER_*` environment to build the engine client.
//! Domain errors are converted to `eyre::Report` at this boundary.

use clap::Parser;
use dockenv::config::{AppConfig, Cli, Commands, load_config};
use dockenv::engine::ClientFactory;
use dockenv::environment::ClientEnvironment;
use dockenv::error::Result as DockenvResult;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> EyreResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Installs the log subscriber.
///
/// `RUST_LOG` wins; otherwise `-v` selects debug and `-vv` trace.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, config: &AppConfig) -> DockenvResult<()> {
    let env = DefaultEnv::new();
    let environment = ClientEnvironment::resolve(&config.overrides(), &env)?;

    match cli.command {
        Commands::Show => {
            show(&environment);
            Ok(())
        }
        Commands::Ping => ping(&environment),
    }
}

/// Prints the resolved client settings.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn show(environment: &ClientEnvironment) {
    println!("host:        {}", environment.host());
    println!("timeout:     {}s", environment.timeout_secs());
    println!("tls verify:  {}", environment.tls_verify());
    println!("cert path:   {}", environment.cert_path());
    match environment.api_version() {
        Some(version) => println!("api version: {version}"),
        None => println!("api version: default"),
    }
    if environment.home().is_none() {
        println!("home:        not set");
    }
}

/// Builds the client and pings the engine.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn ping(environment: &ClientEnvironment) -> DockenvResult<()> {
    let client = ClientFactory::connect_and_verify(environment)?;
    println!(
        "engine at {} ({}) is responding",
        client.endpoint(),
        client.transport()
    );
    Ok(())
}
