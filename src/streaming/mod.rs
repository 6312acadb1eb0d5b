// ABOUTME: Streaming module organization for incremental agent replies
// ABOUTME: SSE record reassembly plus the coordinator that queues events for polling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Streaming
//!
//! A streaming reply arrives as raw SSE bytes. [`sse_parser`] turns them into
//! decoded text pieces; [`coordinator`] runs one producer task per stream and
//! keeps the FIFO queue that `get_stream_message` drains.

/// Poll-based stream coordinator
pub mod coordinator;

/// SSE record buffering and decoding
pub mod sse_parser;

pub use coordinator::StreamCoordinator;
pub use sse_parser::{SseDecoder, SseRecord};
