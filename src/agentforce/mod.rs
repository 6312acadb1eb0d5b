// ABOUTME: Remote Agentforce agent API seam used by the session and streaming services
// ABOUTME: Defines the AgentBackend trait, reply type and the raw byte stream of SSE replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Agentforce Backend
//!
//! [`AgentBackend`] is the only way the core talks to the remote agent. The
//! production implementation is [`AgentforceClient`]; tests substitute fakes.

/// reqwest implementation of the backend
pub mod client;

pub use client::AgentforceClient;

use crate::errors::AppResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Raw body chunks of a streaming reply, in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = AppResult<Bytes>> + Send>>;

/// Reply to a plain (non-streaming) message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    /// Backend identifier of the reply
    #[serde(default)]
    pub response_id: String,
    /// Reply text
    pub message: String,
}

/// Operations the remote agent offers
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Exchange a locally generated session key for a backend session id
    async fn create_session(&self, session_key: &str) -> AppResult<String>;

    /// Delete a backend session
    async fn delete_session(&self, session_id: &str) -> AppResult<()>;

    /// Send a message and wait for the whole reply
    async fn send_message(
        &self,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<AgentReply>;

    /// Bearer token for a call made later with [`Self::open_message_stream`]
    ///
    /// Resolved by the caller before a stream is registered, so credential
    /// failures reach the caller instead of the stream's queue.
    async fn access_token(&self) -> AppResult<String>;

    /// Send a message and return the reply as a raw SSE byte stream
    ///
    /// Errors returned here mean the stream was never established; errors
    /// yielded by the stream are transport failures mid-reply.
    async fn open_message_stream(
        &self,
        access_token: &str,
        session_id: &str,
        sequence_id: u64,
        message: &str,
    ) -> AppResult<ByteStream>;
}
