// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Flatscan.

use thiserror::Error;

/// Top-level error type for all Flatscan operations.
///
/// Only [`FlatscanError::EmptyImage`] and the decoding/persistence variants
/// ever reach a caller of the scan pipeline; every other variant is a
/// processing fault that the orchestrator converts into a passthrough result.
#[derive(Debug, Error)]
pub enum FlatscanError {
    // -- Input errors --
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Pipeline faults --
    #[error("homography solve failed: {0}")]
    Homography(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("storage error: {0}")]
    Storage(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FlatscanError>;
