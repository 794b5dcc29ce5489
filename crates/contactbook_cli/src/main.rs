//! Command-line front end for the contact book.
//!
//! # Usage
//!
//! ```bash
//! contactbook register-user --body '{"username":"alice123","password":"secret123","name":"Alice"}'
//! contactbook login-user --body '{"username":"alice123","password":"secret123"}'
//! contactbook search-contacts --token <TOKEN> --body '{"name":"bo"}'
//! contactbook list-addresses --token <TOKEN> --contact 1
//! ```
//!
//! # Responsibility
//! - Resolve configuration and logging from the environment.
//! - Run one request through the core pipeline and print its envelope.
//!
//! # Invariants
//! - Stdout carries only the JSON envelope.
//! - Exit status is non-zero for every non-2xx response.

use clap::Parser;
use contactbook_core::db::open_db;
use contactbook_core::{
    init_logging, ApiRequest, AppConfig, Argon2PasswordHasher, ContactBookApi, Route,
    UuidTokenGenerator,
};
use log::error;
use serde_json::Value;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "contactbook")]
#[command(version, about = "Contact book request runner")]
struct Cli {
    /// Route name, e.g. `create-contact` or `list-addresses`
    #[arg(value_parser = parse_route)]
    route: Route,

    /// Session token issued by `login-user`
    #[arg(long)]
    token: Option<String>,

    /// Contact id path parameter
    #[arg(long = "contact")]
    contact_id: Option<i64>,

    /// Address id path parameter
    #[arg(long = "address")]
    address_id: Option<i64>,

    /// JSON request body
    #[arg(long, value_parser = parse_body)]
    body: Option<Value>,
}

fn parse_route(raw: &str) -> Result<Route, String> {
    Route::from_name(raw).ok_or_else(|| {
        let known = Route::ALL
            .iter()
            .map(|route| route.name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown route `{raw}`; expected one of: {known}")
    })
}

fn parse_body(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("body is not valid JSON: {err}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("contactbook: {message}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the request succeeded.
fn run(cli: Cli) -> Result<bool, String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log)?;

    let conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.db_path.display()
        )
    })?;

    let mut request = ApiRequest::new(cli.route);
    if let Some(token) = cli.token.as_deref() {
        request = request.with_token(token);
    }
    if let Some(contact_id) = cli.contact_id {
        request = request.with_contact(contact_id);
    }
    if let Some(address_id) = cli.address_id {
        request = request.with_address(address_id);
    }
    if let Some(body) = cli.body {
        request = request.with_body(body);
    }

    let api = ContactBookApi::new(&conn, Argon2PasswordHasher, UuidTokenGenerator);
    let response = api.handle(&request);

    let rendered = serde_json::to_string_pretty(&response.body)
        .map_err(|err| format!("failed to render response: {err}"))?;
    println!("{rendered}");
    Ok(response.is_success())
}
