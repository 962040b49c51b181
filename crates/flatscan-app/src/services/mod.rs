// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — everything the front end needs around a scan: where data
// lives and how finished scans are persisted.

pub mod data_dir;
pub mod store;
