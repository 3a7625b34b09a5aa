// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   generate, resolve, config (options / inis / modules)
//! ```

pub mod config;
pub mod generate;
pub mod resolve;
