// ABOUTME: SSE record reassembly and decoding for Agentforce streaming replies
// ABOUTME: Buffers raw bytes across arrivals, splits records on blank lines and decodes data fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # SSE Record Parser
//!
//! Network chunks do not line up with SSE records. [`SseDecoder`] keeps the
//! unterminated tail of the byte stream between calls to [`SseDecoder::feed`]
//! and only decodes records once their terminating blank line (`\n\n`) has
//! arrived, so splitting the same bytes at any boundary yields the same events.
//!
//! A record's `data` value is decoded as follows:
//!
//! - JSON with `"type": "content"` yields its `content` string
//! - any other value (JSON or not) is used verbatim
//!
//! Buffering is done on bytes, which keeps multi-byte characters intact when
//! they straddle two network chunks. Bytes already searched for a terminator
//! are not searched again, so a large record arriving in small pieces costs
//! time linear in its size.
//!
//! An unterminated tail left at end of stream is not a record: the whole
//! trimmed tail goes through the same JSON-or-plain-text rule as a `data` value.

use crate::constants::messages;
use crate::protocol::StreamEvent;
use serde_json::Value;
use std::mem;
use tracing::warn;

/// Record terminator
const RECORD_SEPARATOR: &[u8] = b"\n\n";

/// Fields of one SSE record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseRecord {
    /// `data` value (the last one wins when repeated)
    pub data: Option<String>,
    /// `event` value
    pub event: Option<String>,
    /// `id` value
    pub id: Option<String>,
    /// `retry` value, when it is an integer
    pub retry: Option<u64>,
}

impl SseRecord {
    /// Parse the lines of one record
    ///
    /// Each non-blank line is split on its first colon; the value is trimmed.
    /// Lines without a colon and unknown field names are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut record = Self::default();

        for line in text.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match field {
                "data" => record.data = Some(value.to_owned()),
                "event" => record.event = Some(value.to_owned()),
                "id" => record.id = Some(value.to_owned()),
                "retry" => record.retry = value.parse().ok(),
                _ => {}
            }
        }

        record
    }
}

/// A `data` value that could not be turned into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError(String);

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode a `data` value into response text
///
/// # Errors
///
/// Returns an error for a `content` JSON object whose `content` is not a string
pub fn decode_data(data: &str) -> Result<String, DecodeError> {
    let Ok(json) = serde_json::from_str::<Value>(data) else {
        return Ok(data.to_owned());
    };

    if json.get("type").and_then(Value::as_str) != Some("content") {
        return Ok(data.to_owned());
    }

    match json.get("content") {
        Some(Value::String(content)) => Ok(content.clone()),
        other => Err(DecodeError(format!(
            "content field is not a string: {}",
            other.map_or_else(|| "missing".to_owned(), ToString::to_string)
        ))),
    }
}

/// Incremental SSE decoder for one stream
///
/// Tracks the unterminated byte tail and the full text decoded so far.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` known not to start a terminator
    scanned: usize,
    accumulated: String,
}

impl SseDecoder {
    /// Create an empty decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk and return the events it completes
    ///
    /// Every decoded record yields a `Chunk`. A record that cannot be decoded
    /// yields an `Error` event and decoding continues with the next record.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(bytes);
        let buffer = mem::take(&mut self.buffer);

        let mut events = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(end) = find_separator(&buffer, from) {
            if let Some(event) = self.decode_record(&buffer[start..end]) {
                events.push(event);
            }
            start = end + RECORD_SEPARATOR.len();
            from = start;
        }

        self.buffer = buffer;
        self.buffer.drain(..start);
        // a terminator may still begin in the last byte
        self.scanned = self.buffer.len().saturating_sub(RECORD_SEPARATOR.len() - 1);
        events
    }

    fn decode_record(&mut self, raw: &[u8]) -> Option<StreamEvent> {
        let result = std::str::from_utf8(raw)
            .map_err(|e| DecodeError(e.to_string()))
            .and_then(|text| match SseRecord::parse(text).data {
                Some(data) if !data.is_empty() => decode_data(&data).map(Some),
                _ => Ok(None),
            });

        match result {
            Ok(Some(text)) => {
                self.accumulated.push_str(&text);
                Some(StreamEvent::chunk(text))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to decode SSE record: {}", e);
                Some(StreamEvent::error(messages::STREAM_CHUNK_FAILED))
            }
        }
    }

    /// Text decoded so far
    #[must_use]
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Unterminated bytes waiting for more input
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// End of stream: fold the residual tail into the text and return it
    ///
    /// The trimmed tail is decoded as a whole, field names included. It is
    /// never reported as a separate chunk.
    #[must_use]
    pub fn finish(mut self) -> String {
        let residual = mem::take(&mut self.buffer);
        let Ok(text) = std::str::from_utf8(&residual) else {
            warn!("Discarding residual SSE bytes that are not valid UTF-8");
            return self.accumulated;
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.accumulated;
        }

        match decode_data(trimmed) {
            Ok(decoded) => self.accumulated.push_str(&decoded),
            Err(e) => warn!("Failed to decode residual SSE data: {}", e),
        }
        self.accumulated
    }
}

fn find_separator(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(RECORD_SEPARATOR.len())
        .position(|window| window == RECORD_SEPARATOR)
        .map(|offset| from + offset)
}
