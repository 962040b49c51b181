// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language notices for scan outcomes and errors.
//
// The front end shows these instead of raw error text. Severity drives how
// loudly the notice is presented.

use crate::error::FlatscanError;
use crate::types::ScanOutcome;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Advisory only; the result is usable.
    Info,
    /// The user should do something (retake the photo, pick another file).
    ActionRequired,
    /// Retrying with the same input will not help.
    Permanent,
}

/// A user-facing message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

/// Notice for a completed scan, or `None` when the document was found
/// confidently and nothing needs to be said.
pub fn notice_for_outcome(outcome: ScanOutcome) -> Option<Notice> {
    match outcome {
        ScanOutcome::Rectified => None,
        ScanOutcome::BoundingBox => Some(Notice {
            message: "We couldn't find all four corners of the document.".into(),
            suggestion: "The image was cropped to the most likely area. For a cleaner result, photograph the page on a plain, contrasting surface with all four corners visible.".into(),
            severity: Severity::Info,
        }),
        ScanOutcome::Passthrough => Some(Notice {
            message: "We couldn't find the document's edges.".into(),
            suggestion: "The original image was kept unchanged. Try again with the whole page in view and even lighting.".into(),
            severity: Severity::Info,
        }),
    }
}

/// Convert a `FlatscanError` into a notice the user can act on.
pub fn notice_for_error(err: &FlatscanError) -> Notice {
    match err {
        FlatscanError::EmptyImage { .. } => Notice {
            message: "This image is empty.".into(),
            suggestion: "Choose a different photo or file.".into(),
            severity: Severity::ActionRequired,
        },

        FlatscanError::UnsupportedDocument(detail) => Notice {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Try saving it as a JPEG or PNG first. (File type: {detail})"),
            severity: Severity::Permanent,
        },

        FlatscanError::ImageError(_) => Notice {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        FlatscanError::Homography(_) | FlatscanError::DegenerateGeometry(_) => Notice {
            message: "The document's shape couldn't be straightened.".into(),
            suggestion: "Try photographing the page from directly above.".into(),
            severity: Severity::ActionRequired,
        },

        FlatscanError::Config(detail) => Notice {
            message: "The scanner settings are invalid.".into(),
            suggestion: format!("Fix or remove the configuration file. ({detail})"),
            severity: Severity::ActionRequired,
        },

        FlatscanError::Storage(_) | FlatscanError::Serialization(_) => Notice {
            message: "The scan couldn't be saved.".into(),
            suggestion: "Try again. If this keeps happening, check the data directory is writable.".into(),
            severity: Severity::ActionRequired,
        },

        FlatscanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => Notice {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => Notice {
                message: "Flatscan doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                severity: Severity::ActionRequired,
            },
            _ => Notice {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                severity: Severity::ActionRequired,
            },
        },
    }
}
