//! Doctor command: configuration and connectivity diagnostics.
//!
//! Checks, in order: configuration values, API token, DNS resolution of the
//! API host, the platform health endpoint, and the object-storage endpoint.

use std::net::ToSocketAddrs;

use colored::Colorize;
use serde_json::Value;

use crate::client::{PlatformClient, Session};
use crate::config::Config;
use crate::palette;

/// Diagnostic check result with status and optional hint
struct CheckResult {
    status: Status,
    message: String,
    hint: Option<String>,
}

#[derive(Clone, Copy)]
enum Status {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
            hint: None,
        }
    }

    fn warning_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            status: Status::Warning,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    fn error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// Run all diagnostics and print the report.
pub async fn doctor(config: &Config) {
    let checks = vec![
        ("Configuration", check_config(config)),
        ("API token", check_token(config)),
        ("Network", check_network(config)),
        ("Platform API", check_health(config).await),
        ("Object storage", check_storage(config)),
    ];

    for (section, results) in checks {
        println!("{}", section.bold());
        for result in results {
            let marker = match result.status {
                Status::Ok => {
                    let (r, g, b) = palette::GREEN_RGB;
                    "✓".truecolor(r, g, b)
                }
                Status::Warning => {
                    let (r, g, b) = palette::YELLOW_RGB;
                    "!".truecolor(r, g, b)
                }
                Status::Error => {
                    let (r, g, b) = palette::RED_RGB;
                    "✗".truecolor(r, g, b)
                }
            };
            println!("  {marker} {}", result.message);
            if let Some(hint) = result.hint {
                println!("    {}", hint.dimmed());
            }
        }
        println!();
    }
}

fn check_config(config: &Config) -> Vec<CheckResult> {
    let mut results = Vec::new();
    results.push(CheckResult::ok(format!("API URL: {}", config.api_url())));
    results.push(CheckResult::ok(format!("Workspace: {}", config.workspace())));
    if config.default_agent.is_none() {
        results.push(CheckResult::warning_with_hint(
            "No default agent configured",
            "Set default_agent in config.toml to omit --agent on chat commands",
        ));
    }
    results
}

fn check_token(config: &Config) -> Vec<CheckResult> {
    match config.api_token() {
        Ok(_) => vec![CheckResult::ok("API token is configured")],
        Err(_) => vec![CheckResult::error_with_hint(
            "No API token configured",
            "Set AGENTCTL_API_TOKEN or api_token in ~/.agentctl/config.toml",
        )],
    }
}

fn check_network(config: &Config) -> Vec<CheckResult> {
    let api_url = config.api_url();
    let Ok(url) = reqwest::Url::parse(&api_url) else {
        return vec![CheckResult::error_with_hint(
            format!("API URL does not parse: {api_url}"),
            "Fix api_url in config.toml",
        )];
    };
    let host = url.host_str().unwrap_or_default().to_string();
    let port = url.port_or_known_default().unwrap_or(443);
    match format!("{host}:{port}").to_socket_addrs() {
        Ok(_) => vec![CheckResult::ok(format!("{host} resolves"))],
        Err(err) => vec![CheckResult::error_with_hint(
            format!("{host} does not resolve: {err}"),
            "Check the API URL and your network connection",
        )],
    }
}

async fn check_health(config: &Config) -> Vec<CheckResult> {
    let session = match Session::from_config(config) {
        Ok(session) => session,
        Err(_) => {
            return vec![CheckResult::warning_with_hint(
                "Skipped (no API token)",
                "Configure a token to probe the health endpoint",
            )];
        }
    };
    let client = match PlatformClient::new(session) {
        Ok(client) => client,
        Err(err) => {
            return vec![CheckResult::error_with_hint(
                format!("Could not build client: {err}"),
                "Check the configured token for invalid characters",
            )];
        }
    };
    match client.get_json::<Value>("/api/v1/health").await {
        Ok(body) => {
            let status = body
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            vec![CheckResult::ok(format!("Health endpoint answered: {status}"))]
        }
        Err(err) => vec![CheckResult::error_with_hint(
            format!("Health endpoint failed: {err}"),
            "Is the platform API running and reachable?",
        )],
    }
}

fn check_storage(config: &Config) -> Vec<CheckResult> {
    match config.storage_url() {
        Some(url) => vec![CheckResult::ok(format!("Public endpoint: {url}"))],
        None => vec![CheckResult::warning_with_hint(
            "No public object-storage endpoint configured",
            "Presigned upload URLs naming internal hosts will be used as-is; set storage_url to rewrite them",
        )],
    }
}
