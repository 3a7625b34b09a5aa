// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         generate / resolve / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, env, CI variables  |
//!              '-------------+-------------'
//!                            v
//!                        manifest
//!                 builder, render, write
//!                            |
//!                            v
//!                         resolve
//!              user fork -> upstream -> origin
//!                            |
//!                            v
//!                         gitlab
//!                  ProjectHost, reqwest
//!
//!   +-----------------------------------------+
//!   |  foundation        error, logging       |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod manifest;
pub mod resolve;
