//! # Homecfg Architecture
//!
//! Homecfg edits a dashboard `services.yaml` in place without losing what the
//! file says in comments. Such files use comments as state: a commented-out
//! entry block is a *hidden* entry, and a commented-out `ping` / `server` /
//! `container` line is a *disabled health check*. A plain YAML round trip
//! would delete both; homecfg keeps them.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs + args.rs)                                    │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Builds field payloads from JSON / key=value pairs        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One load → transform → save cycle per operation          │
//! │  - Operates on `Document`, returns `CmdResult`              │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Codec (codec/)               │ │  Storage (store/)         │
//! │  - serde_yaml for structure   │ │  - DocumentStore trait    │
//! │  - scanner: comments → flags  │ │  - FileStore (atomic)     │
//! │  - rewriter: flags → comments │ │  - InMemoryStore (tests)  │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes and returns plain Rust values, never
//! prints and never exits. Diagnostics go through the `log` facade; the binary
//! decides where they end up.
//!
//! ## Round Trip
//!
//! For every document `d`, `codec::decode(&codec::encode(&d)?)? == d`:
//! same categories, entries, fields, flags and order. Entry order survives
//! hide/show cycles because every decoded entry remembers the line its header
//! was on (`Entry::origin_line`) and each category is re-sorted by it.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`codec`]: Text ⇄ `Document`, including comment state
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `Document`, `Category`, `Entry`
//! - [`config`]: Configuration management
//! - [`logging`]: stderr logger setup for the binary
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
