// ABOUTME: Server binary exposing the Agentforce tool protocol over HTTP
// ABOUTME: Loads configuration, runs the setup wizard when needed and serves /api and /health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Agentforce MCP Server Binary
//!
//! Starts the HTTP server. With the `setup` subcommand, or when required
//! configuration is missing, the interactive setup wizard runs first.

use agentforce_mcp_server::{
    config::environment::ServerConfig,
    constants::{env_vars, service_names},
    logging,
    mcp::ServerResources,
    routes,
    setup::SetupWizard,
    utils::net::bind_listener,
};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "agentforce-mcp-server")]
#[command(about = "Agentforce MCP Server - tool protocol bridge to Salesforce Agentforce agents")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write .env interactively, then start the server
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env(service_names::AGENTFORCE_MCP_SERVER)?;

    let mut config = ServerConfig::from_env()?;
    let problems = config.validate();

    if matches!(args.command, Some(Command::Setup)) || !problems.is_empty() {
        for problem in &problems {
            warn!("{}", problem);
        }
        tokio::task::spawn_blocking(|| SetupWizard::server().run_interactive()).await??;

        config = ServerConfig::from_current_env()?;
        let problems = config.validate();
        if !problems.is_empty() {
            bail!("Configuration is still incomplete: {}", problems.join(", "));
        }
    } else {
        info!("Using existing configuration from environment variables");
    }

    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = ServerResources::new(config)?;
    let listener = bind_listener(port, env_vars::PORT).await?;

    info!("Agentforce MCP Server listening on port {}", port);
    info!("   Manifest: http://localhost:{}/api/manifest", port);
    info!("   Execute:  http://localhost:{}/api/execute", port);
    info!("   Health:   http://localhost:{}/health", port);

    axum::serve(listener, routes::build_router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Agentforce MCP Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
