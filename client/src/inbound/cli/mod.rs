//! Command-line adapter driving the registration and sign-in flows.
//!
//! Commands write plain `key=value` lines to the supplied writer so the
//! binary stays a thin shell and the handlers can be tested in memory.

use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::app::RegistrationClient;
use crate::domain::{
    BearerToken, CheckableLogin, Field, FormSnapshot, LoginAvailabilityStatus, LoginCredentials,
    NameValidationError, SignInOutcome, SubmitOutcome,
    validation::{MIN_LOGIN_LENGTH, MIN_PASSWORD_LENGTH, has_surname, is_checkable_login},
};

/// `registration` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "registration",
    about = "Check login availability, register accounts and sign in",
    version
)]
pub struct CliArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Query whether a login is still free.
    CheckLogin {
        /// Login to look up.
        login: String,
    },
    /// Fill in the registration form and submit it.
    Register {
        /// Display name ("first last").
        #[arg(long, value_name = "name")]
        name: String,
        /// Login handle.
        #[arg(long, value_name = "login")]
        login: String,
        /// Account password.
        #[arg(long, value_name = "password")]
        password: String,
        /// Bearer token to attach to requests.
        #[arg(long, value_name = "token")]
        token: Option<String>,
    },
    /// Exchange credentials for a bearer token.
    SignIn {
        /// Login handle.
        #[arg(long, value_name = "login")]
        login: String,
        /// Account password.
        #[arg(long, value_name = "password")]
        password: String,
    },
}

/// Whether a command achieved what it was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The operation completed.
    Succeeded,
    /// The operation was refused or failed; details were written out.
    Failed,
}

/// Run `command` against `client`, writing a report to `out`.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub async fn execute<W: Write>(
    command: Command,
    client: &RegistrationClient,
    out: &mut W,
) -> io::Result<CommandStatus> {
    match command {
        Command::CheckLogin { login } => check_login(client, &login, out).await,
        Command::Register {
            name,
            login,
            password,
            token,
        } => {
            if let Some(token) = token.as_deref() {
                match BearerToken::try_new(token) {
                    Ok(token) => client.session().set_token(token),
                    Err(error) => {
                        writeln!(out, "error={error}")?;
                        return Ok(CommandStatus::Failed);
                    }
                }
            }
            register(client, &name, &login, &password, out).await
        }
        Command::SignIn { login, password } => sign_in(client, &login, &password, out).await,
    }
}

async fn check_login<W: Write>(
    client: &RegistrationClient,
    raw: &str,
    out: &mut W,
) -> io::Result<CommandStatus> {
    let login = match CheckableLogin::parse(raw) {
        Ok(login) => login,
        Err(error) => {
            writeln!(out, "error={error}")?;
            return Ok(CommandStatus::Failed);
        }
    };
    let status = client.availability_checker().check(&login).await.status();
    writeln!(out, "login={login}")?;
    writeln!(out, "availability={status}")?;
    Ok(match status {
        LoginAvailabilityStatus::Available | LoginAvailabilityStatus::Taken => {
            CommandStatus::Succeeded
        }
        LoginAvailabilityStatus::Idle | LoginAvailabilityStatus::Checking => CommandStatus::Failed,
    })
}

async fn register<W: Write>(
    client: &RegistrationClient,
    name: &str,
    login: &str,
    password: &str,
    out: &mut W,
) -> io::Result<CommandStatus> {
    let session = client.registration();
    session.set_field(Field::Name, name);
    session.set_field(Field::Password, password);
    session.set_field(Field::Login, login);

    let availability = session.availability_settled().await;
    writeln!(out, "availability={availability}")?;

    let snapshot = session.snapshot();
    if !snapshot.is_valid {
        write_problems(out, &describe_problems(&snapshot))?;
        return Ok(CommandStatus::Failed);
    }

    let outcome = match session.submit().await {
        Ok(outcome) => outcome,
        Err(refused) => {
            writeln!(out, "error={refused}")?;
            return Ok(CommandStatus::Failed);
        }
    };
    match outcome {
        SubmitOutcome::Success => {
            writeln!(out, "registered={}", login.trim())?;
            Ok(CommandStatus::Succeeded)
        }
        SubmitOutcome::Rejected(_) | SubmitOutcome::TransportFailure => {
            write_problems(out, &describe_problems(&session.snapshot()))?;
            Ok(CommandStatus::Failed)
        }
    }
}

async fn sign_in<W: Write>(
    client: &RegistrationClient,
    login: &str,
    password: &str,
    out: &mut W,
) -> io::Result<CommandStatus> {
    let credentials = match LoginCredentials::try_from_parts(login, password) {
        Ok(credentials) => credentials,
        Err(error) => {
            writeln!(out, "error={error}")?;
            return Ok(CommandStatus::Failed);
        }
    };
    match client.sign_in().sign_in(&credentials).await {
        SignInOutcome::SignedIn { display_name } => {
            writeln!(out, "signed_in={display_name}")?;
            Ok(CommandStatus::Succeeded)
        }
        SignInOutcome::Rejected { message } => {
            writeln!(out, "error={message}")?;
            Ok(CommandStatus::Failed)
        }
        SignInOutcome::TransportFailure => {
            writeln!(out, "error=authority unreachable")?;
            Ok(CommandStatus::Failed)
        }
    }
}

fn write_problems<W: Write>(out: &mut W, problems: &[String]) -> io::Result<()> {
    for problem in problems {
        writeln!(out, "problem={problem}")?;
    }
    Ok(())
}

/// Human-readable reasons the form cannot be submitted, or was rejected.
///
/// Field and form-wide messages come first, followed by unmet rules that
/// have no message of their own.
pub fn describe_problems(snapshot: &FormSnapshot) -> Vec<String> {
    let errors = &snapshot.errors;
    let mut problems: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect();
    if let Some(general) = errors.general() {
        problems.push(general.to_owned());
    }

    if errors.get(Field::Name).is_none() && !has_surname(&snapshot.name) {
        problems.push(format!("name: {}", NameValidationError::MissingSurname));
    }
    if errors.get(Field::Login).is_none() {
        if !is_checkable_login(&snapshot.login) {
            problems.push(format!(
                "login: must have at least {MIN_LOGIN_LENGTH} characters"
            ));
        } else if snapshot.availability == LoginAvailabilityStatus::Taken {
            problems.push("login: already registered".to_owned());
        }
    }
    let criteria = snapshot.password_criteria;
    if !criteria.has_min_length {
        problems.push(format!(
            "password: must have at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if !criteria.has_upper_case {
        problems.push("password: must contain an uppercase letter".to_owned());
    }
    if !criteria.has_digit {
        problems.push("password: must contain a digit".to_owned());
    }
    problems
}

#[cfg(test)]
mod tests;
