//! ZenZebra Core - Shared domain types for the back-office.
//!
//! This crate provides the types and rules used by every ZenZebra component:
//! - `server` - Public form API and admin API
//! - `cli` - Operator commands (owner bootstrap, inspection)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The status workflow and owner resolution live here so that the
//! rules can be checked without a running backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, phone numbers and statuses
//! - [`workflow`] - Forward-only status transition tables
//! - [`principal`] - Admin principals, owner resolution and session gating
//! - [`settings`] - System settings with typed defaults

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod principal;
pub mod settings;
pub mod types;
pub mod workflow;

pub use principal::{AdminPrefs, AdminPrincipal, OwnerResolver, SessionGate};
pub use settings::{SystemSettings, render_template, stringify_value};
pub use types::*;
pub use workflow::{StatusWorkflow, TransitionError};
