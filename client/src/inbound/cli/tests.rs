//! Tests for the CLI handlers, run against the fixture authority.

use std::sync::Arc;

use super::*;
use crate::domain::ports::FixtureAuthAuthority;
use crate::domain::{PasswordCriteria, RegistrationForm};
use crate::outbound::notify::TracingNotifier;
use rstest::rstest;

fn client() -> RegistrationClient {
    RegistrationClient::new(
        Arc::new(FixtureAuthAuthority::with_registered(["joao"])),
        Arc::new(TracingNotifier),
    )
}

async fn run(client: &RegistrationClient, command: Command) -> (CommandStatus, Vec<String>) {
    let mut out = Vec::new();
    let status = execute(command, client, &mut out)
        .await
        .expect("writing to memory succeeds");
    let lines = String::from_utf8(out)
        .expect("utf-8 output")
        .lines()
        .map(str::to_owned)
        .collect();
    (status, lines)
}

fn register(name: &str, login: &str, password: &str) -> Command {
    Command::Register {
        name: name.to_owned(),
        login: login.to_owned(),
        password: password.to_owned(),
        token: None,
    }
}

#[test]
fn arguments_parse_into_commands() {
    let args = CliArgs::try_parse_from([
        "registration",
        "register",
        "--name",
        "Ana Silva",
        "--login",
        "anasilva",
        "--password",
        "Senha123",
    ])
    .expect("valid arguments");
    assert!(matches!(args.command, Command::Register { token: None, .. }));

    let args = CliArgs::try_parse_from(["registration", "check-login", "joao"])
        .expect("valid arguments");
    assert!(matches!(args.command, Command::CheckLogin { ref login } if login == "joao"));
}

#[rstest]
#[case("joao", CommandStatus::Succeeded, "availability=taken")]
#[case("anasilva", CommandStatus::Succeeded, "availability=available")]
#[case("ab", CommandStatus::Failed, "error=login must have at least 3 characters")]
#[tokio::test]
async fn check_login_reports_availability(
    #[case] login: &str,
    #[case] expected_status: CommandStatus,
    #[case] expected_line: &str,
) {
    let (status, lines) = run(
        &client(),
        Command::CheckLogin {
            login: login.to_owned(),
        },
    )
    .await;
    assert_eq!(status, expected_status);
    assert!(lines.iter().any(|line| line == expected_line), "{lines:?}");
}

#[tokio::test(start_paused = true)]
async fn register_submits_a_valid_form() {
    let client = client();
    let (status, lines) = run(&client, register("Ana Silva", "anasilva", "Senha123")).await;

    assert_eq!(status, CommandStatus::Succeeded);
    assert_eq!(lines, ["availability=available", "registered=anasilva"]);
}

#[tokio::test(start_paused = true)]
async fn register_refuses_a_taken_login_without_submitting() {
    let (status, lines) = run(&client(), register("João Souza", "joao", "Senha123")).await;

    assert_eq!(status, CommandStatus::Failed);
    assert_eq!(lines, ["availability=taken", "problem=login: already registered"]);
}

#[tokio::test(start_paused = true)]
async fn register_lists_every_unmet_rule() {
    let (status, lines) = run(&client(), register("Ana", "ab", "senha")).await;

    assert_eq!(status, CommandStatus::Failed);
    assert_eq!(
        lines,
        [
            "availability=idle",
            "problem=name: enter a first and last name",
            "problem=login: must have at least 3 characters",
            "problem=password: must have at least 8 characters",
            "problem=password: must contain an uppercase letter",
            "problem=password: must contain a digit",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn register_attaches_a_supplied_token() {
    let client = client();
    let command = Command::Register {
        name: "Ana Silva".to_owned(),
        login: "anasilva".to_owned(),
        password: "Senha123".to_owned(),
        token: Some("abc.def".to_owned()),
    };

    let (status, _) = run(&client, command).await;

    assert_eq!(status, CommandStatus::Succeeded);
    assert!(client.session().is_authenticated());
}

#[rstest]
#[case("admin", "password", CommandStatus::Succeeded, "signed_in=Fixture Admin")]
#[case("admin", "wrong", CommandStatus::Failed, "error=Usuário ou senha inválidos")]
#[case("  ", "password", CommandStatus::Failed, "error=login must not be empty")]
#[tokio::test]
async fn sign_in_reports_the_outcome(
    #[case] login: &str,
    #[case] password: &str,
    #[case] expected_status: CommandStatus,
    #[case] expected_line: &str,
) {
    let command = Command::SignIn {
        login: login.to_owned(),
        password: password.to_owned(),
    };
    let (status, lines) = run(&client(), command).await;
    assert_eq!(status, expected_status);
    assert_eq!(lines, [expected_line]);
}

#[test]
fn problems_prefer_field_messages_over_rule_descriptions() {
    let mut form = RegistrationForm::new();
    form.set_field(Field::Name, "Ana");
    form.set_field(Field::Password, "Senha123");
    let snapshot = form.snapshot();

    let problems = describe_problems(&snapshot);

    assert_eq!(
        problems,
        [
            "name: enter a first and last name",
            "login: must have at least 3 characters",
        ]
    );
}

#[test]
fn met_criteria_are_not_reported() {
    let snapshot = FormSnapshot {
        name: "Ana Silva".to_owned(),
        login: "anasilva".to_owned(),
        password_criteria: PasswordCriteria {
            has_min_length: true,
            has_upper_case: true,
            has_digit: true,
        },
        ..FormSnapshot::default()
    };
    assert!(describe_problems(&snapshot).is_empty());
}
