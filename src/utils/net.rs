// ABOUTME: TCP listener binding shared by the server and proxy binaries
// ABOUTME: Reports an occupied port with a hint naming the variable that configures it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use std::io;
use tokio::net::TcpListener;

/// Bind `0.0.0.0:port`
///
/// # Errors
///
/// Returns an error if the port cannot be bound; an occupied port yields a
/// hint to change `port_var`
pub async fn bind_listener(port: u16, port_var: &str) -> Result<TcpListener> {
    match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Err(anyhow!(
            "Port {port} is already in use. Set {port_var} in your .env file to use a different port"
        )),
        Err(e) => Err(anyhow!("Failed to bind port {port}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_in_use_hint() {
        let taken = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let error = bind_listener(port, "TOOL_PORT").await.unwrap_err();
        assert!(error.to_string().contains("Set TOOL_PORT"), "{error}");
    }
}
