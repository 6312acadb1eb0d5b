// ABOUTME: Session lifecycle module
// ABOUTME: Backend session ids, their session keys and per-session message sequence counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory session registry
pub mod registry;

pub use registry::{Session, SessionRegistry};
