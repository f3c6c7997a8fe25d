//! Core state and translation logic for adderls.
//!
//! This crate holds the pieces of the server with real invariants: the
//! per-document analysis-handle cache, the per-workspace-folder derived
//! config caches, the diagnostics mapping and aggregation policy, completion
//! ranking and snippet expansion, the unified-diff → text-edit translator,
//! and the type-checker command/output plumbing. Protocol transport and the
//! external tools themselves live elsewhere; everything here is synchronous
//! and IO-free except for config-file discovery in [`workspace`].

pub mod completion;
pub mod diagnostics;
pub mod documents;
pub mod edits;
pub mod engine;
pub mod error;
pub mod typecheck;
pub mod workspace;

pub use documents::{Document, DocumentCache, DocumentStore, UnknownDocument};
pub use error::{CheckerFailure, RefactorUnavailable};
