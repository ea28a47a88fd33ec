//! Print server push events as they arrive.
//!
//! Usage: cargo run --example listen -- <server-url> <project-key>...
//!
//! Press Ctrl-C to stop. Set RUST_LOG to adjust verbosity
//! (default: pushstream=debug).

use color_eyre::eyre::{eyre, Result};
use pushstream::{CancellationToken, PushClient, PushConfig, ServerEvent};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pushstream=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let server_url = args
        .next()
        .ok_or_else(|| eyre!("usage: listen <server-url> <project-key>..."))?;
    let project_keys: Vec<String> = args.collect();

    let config = PushConfig::new()
        .with_server_url(server_url)
        .with_project_keys(project_keys);
    let client = PushClient::new(config)?;
    let stream = client.connect().await?;

    let token = CancellationToken::new();
    let handle = stream.begin_listening(&token)?;

    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    while let Some(event) = stream.read_next(&token).await {
        print_event(&event);
    }

    stream.dispose().await;
    handle.finished().await.into_result()?;
    Ok(())
}

fn print_event(event: &ServerEvent) {
    match event {
        ServerEvent::IssueChanged(e) => println!(
            "[{}] {} issue(s) changed, resolved={}",
            e.project_key(),
            e.issues().len(),
            e.is_resolved()
        ),
        ServerEvent::TaintVulnerabilityRaised(e) => println!(
            "[{}] taint vulnerability {} raised on {} ({}, {})",
            e.project_key(),
            e.key(),
            e.branch(),
            e.rule_key(),
            e.severity()
        ),
        ServerEvent::TaintVulnerabilityClosed(e) => {
            println!("[{}] taint vulnerability {} closed", e.project_key(), e.key())
        }
        ServerEvent::QualityProfileChanged(e) => println!(
            "[{}] quality profile changed: +{} -{} rules",
            e.projects().join(","),
            e.activated_rules().len(),
            e.deactivated_rules().len()
        ),
    }
}
