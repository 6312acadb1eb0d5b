// ABOUTME: Reverse-proxy binary placed in front of the Agentforce MCP server
// ABOUTME: Forwards tool traffic to SERVER_URL and answers its own /health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Agentforce Tool Proxy Binary

use agentforce_mcp_server::{
    config::environment::ProxyConfig, constants::service_names, logging, proxy,
    setup::SetupWizard,
};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "agentforce-tool")]
#[command(about = "Agentforce MCP Tool - reverse proxy in front of the Agentforce MCP server")]
pub struct Args {
    /// Override proxy port
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write .env interactively, then start the proxy
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env(service_names::AGENTFORCE_TOOL)?;

    let mut config = ProxyConfig::from_env();
    if matches!(args.command, Some(Command::Setup)) {
        tokio::task::spawn_blocking(|| SetupWizard::tool().run_interactive()).await??;
        config = ProxyConfig::from_current_env();
    }

    let problems = config.validate();
    if !problems.is_empty() {
        bail!("Invalid configuration: {}", problems.join(", "));
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Forwarding to {}", config.server_url);
    proxy::run(&config).await
}
