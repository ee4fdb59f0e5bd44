// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! # policygen - Compliance hardening generator
//!
//! `policygen` turns a compliance benchmark plus a small YAML file of
//! overrides into a ready-to-run hardening artifact: a POSIX shell script,
//! an Ansible playbook or a PowerShell script.
//!
//! ## Features
//!
//! - **Built-in catalog** - CIS Linux and Windows rules with typed defaults
//! - **Strict validation** - every bad setting reported in one run
//! - **Deterministic output** - same inputs, byte-identical document
//! - **Atomic writes** - never a half-written script at the destination
//!
//! ## Quick Start
//!
//! ```bash
//! # See what can be configured
//! policygen rules -c CIS-Linux-v8
//!
//! # Generate a shell script
//! policygen -c CIS-Linux-v8 -f hardening.yaml -o harden.sh -p shell
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod emit;
pub mod errors;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use catalog::{Platform, RuleCatalog, SettingValue};
pub use config::{ConfigLoader, LoadedConfig, UserConfig};
pub use errors::{PolicygenError, PolicygenResult};
pub use render::{RenderedDocument, Renderer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
