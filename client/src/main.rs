//! `registration` entry-point: loads settings, wires the HTTP authority and
//! runs one command.

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use registration_client::inbound::cli::{CliArgs, CommandStatus, execute};
use registration_client::outbound::notify::TracingNotifier;
use registration_client::{ClientSettings, RegistrationClient};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("registration")])
        .map_err(|error| eyre!("failed to load client settings: {error}"))?;
    let client = RegistrationClient::from_settings(&settings, Arc::new(TracingNotifier))
        .wrap_err("failed to build registration client")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    let mut stdout = io::stdout().lock();
    let status = runtime
        .block_on(execute(args.command, &client, &mut stdout))
        .wrap_err("failed to write command output")?;

    Ok(match status {
        CommandStatus::Succeeded => ExitCode::SUCCESS,
        CommandStatus::Failed => ExitCode::FAILURE,
    })
}
