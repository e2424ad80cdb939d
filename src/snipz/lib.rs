//! # Snipz Architecture
//!
//! Snipz is a **personal snippet and bookmark store**: content blobs on disk,
//! indexed by a small metadata table (key, type, timestamps, description,
//! tags). The library holds all of the behaviour; the `snipz` binary is one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns stores, clock, key generator and launchers          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Save / Get / List / Edit / Remove / Tag / Open / Path    │
//! │  - Orders writes across the two stores, compensates         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ContentStore: atomic flat files under the base dir       │
//! │  - MetadataStore: SqliteStore (production), InMemoryStore   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Keys Are Untrusted Input
//!
//! A key such as `go/foo` becomes a path under the base directory. Every
//! key passes through [`key::normalize`] and [`key::resolve_path`] before
//! touching the filesystem; the second re-checks the joined path against the
//! base directory rather than trusting segment validation alone.
//!
//! ## No Ambient State in Core
//!
//! From `api.rs` inward, code never reads environment variables, never calls
//! `Utc::now()` directly and never spawns processes on its own. The clock and
//! the editor/opener/pager are injected ([`clock::Clock`],
//! [`launcher::Launcher`]), which is what lets the command tests run with a
//! frozen clock and a closure for an editor.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Orchestration for each operation
//! - [`store`]: Content files and the metadata table
//! - [`key`]: Key validation and path resolution
//! - [`keygen`]: Auto keys (timestamp or counter)
//! - [`tags`]: Canonical tag strings and merging
//! - [`model`]: `Metadata`, `SnippetType`, type detection
//! - [`config`] / [`init`]: Configuration discovery and production wiring
//! - [`clock`], [`launcher`]: Injected collaborators
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod key;
pub mod keygen;
pub mod launcher;
pub mod model;
pub mod store;
pub mod tags;
