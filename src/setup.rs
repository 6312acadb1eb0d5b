// ABOUTME: Interactive terminal setup wizard writing the .env file for server and proxy
// ABOUTME: Prompts for each setting with existing values as defaults and exports them to the process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Setup wizard
//!
//! Answers are written as `KEY=value` lines under a comment header, replacing
//! the previous file, and exported into the current process so the binary can
//! start right away with the new configuration.

use crate::constants::{defaults, env_vars};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

/// Value shape accepted for a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Any text
    Text,
    /// TCP port number
    Port,
}

/// One question asked by the wizard
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Environment variable the answer is stored in
    pub key: &'static str,
    /// Label shown to the user
    pub label: &'static str,
    /// Value shape
    pub kind: PromptKind,
    /// Built-in default when neither `.env` nor the environment has a value
    pub fallback: Option<String>,
}

impl Prompt {
    fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: PromptKind::Text,
            fallback: None,
        }
    }

    fn port(key: &'static str, label: &'static str, fallback: u16) -> Self {
        Self {
            key,
            label,
            kind: PromptKind::Port,
            fallback: Some(fallback.to_string()),
        }
    }
}

/// A named wizard: greeting, `.env` header and questions
#[derive(Debug, Clone)]
pub struct SetupWizard {
    greeting: &'static str,
    header: &'static str,
    prompts: Vec<Prompt>,
}

impl SetupWizard {
    /// Wizard for the server credentials and port
    #[must_use]
    pub fn server() -> Self {
        Self {
            greeting: "Welcome to Agentforce MCP Server Setup!\nEnter your Salesforce Agentforce credentials:",
            header: "# Agentforce MCP Server Configuration",
            prompts: vec![
                Prompt::text(env_vars::CLIENT_ID, "Salesforce Client ID"),
                Prompt::text(env_vars::CLIENT_SECRET, "Salesforce Client Secret"),
                Prompt::text(env_vars::ORG_BASE_URL, "Salesforce Org Base URL"),
                Prompt::text(env_vars::AGENT_ID, "Agentforce Agent ID"),
                Prompt::port(env_vars::PORT, "Server Port", defaults::SERVER_PORT),
            ],
        }
    }

    /// Wizard for the reverse proxy
    #[must_use]
    pub fn tool() -> Self {
        let mut server_url = Prompt::text(env_vars::SERVER_URL, "Server URL");
        server_url.fallback = Some(defaults::SERVER_URL.to_owned());

        Self {
            greeting: "Welcome to Agentforce MCP Tool Setup!",
            header: "# Agentforce MCP Tool Configuration",
            prompts: vec![
                server_url,
                Prompt::port(env_vars::TOOL_PORT, "Tool Port", defaults::TOOL_PORT),
            ],
        }
    }

    /// Ask every question, write `env_path` and export the answers
    ///
    /// # Errors
    ///
    /// Returns an error if input ends early or the file cannot be written
    pub fn run<R: BufRead, W: Write>(&self, env_path: &Path, input: R, output: W) -> Result<()> {
        let existing = read_env_file(env_path);
        let answers = self.ask(&existing, input, output)?;

        fs::write(env_path, render_env(self.header, &answers))
            .with_context(|| format!("Failed to write {}", env_path.display()))?;
        info!(path = %env_path.display(), ".env file has been created/updated successfully");

        for (key, value) in &answers {
            env::set_var(key, value);
        }
        Ok(())
    }

    /// Run against the terminal and `.env` in the working directory
    ///
    /// # Errors
    ///
    /// Returns an error if setup is cancelled or the file cannot be written
    pub fn run_interactive(&self) -> Result<()> {
        let stdin = std::io::stdin();
        self.run(Path::new(defaults::ENV_FILE), stdin.lock(), std::io::stdout())
    }

    fn ask<R: BufRead, W: Write>(
        &self,
        existing: &HashMap<String, String>,
        mut input: R,
        mut output: W,
    ) -> Result<Vec<(String, String)>> {
        writeln!(output, "{}", self.greeting)?;

        let mut answers = Vec::with_capacity(self.prompts.len());
        for prompt in &self.prompts {
            let default = existing
                .get(prompt.key)
                .cloned()
                .or_else(|| env::var(prompt.key).ok())
                .filter(|value| !value.is_empty())
                .or_else(|| prompt.fallback.clone())
                .unwrap_or_default();

            let value = loop {
                if default.is_empty() {
                    write!(output, "{}: ", prompt.label)?;
                } else {
                    write!(output, "{} [{}]: ", prompt.label, default)?;
                }
                output.flush()?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    bail!("Setup was cancelled");
                }
                let answer = match line.trim() {
                    "" => default.clone(),
                    typed => typed.to_owned(),
                };

                if prompt.kind == PromptKind::Port && !is_valid_port(&answer) {
                    writeln!(output, "Please enter a port number between 1 and 65535")?;
                    continue;
                }
                break answer;
            };
            answers.push((prompt.key.to_owned(), value));
        }
        Ok(answers)
    }
}

fn is_valid_port(value: &str) -> bool {
    value.parse::<u16>().is_ok_and(|port| port != 0)
}

/// Existing `KEY=value` pairs of a dotenv file; empty if missing or unreadable
#[must_use]
pub fn read_env_file(path: &Path) -> HashMap<String, String> {
    dotenvy::from_path_iter(path)
        .map(|iter| iter.filter_map(Result::ok).collect())
        .unwrap_or_default()
}

/// Render answers as a dotenv file
#[must_use]
pub fn render_env(header: &str, answers: &[(String, String)]) -> String {
    let mut content = format!("{header}\n");
    for (key, value) in answers {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    content
}
