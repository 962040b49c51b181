// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — strategy cascade, candidate scoring, corner ordering,
// perspective rectification and the orchestrating scanner.

pub mod candidate;
pub mod detect;
pub mod order;
pub mod rectify;
pub mod scanner;
pub mod strategy;

pub use detect::{BoundaryDetector, Detection};
pub use order::order_corners;
pub use rectify::{output_size, rectify};
pub use scanner::{Scanner, scan};
pub use strategy::{DetectionStrategy, StrategyKind};
