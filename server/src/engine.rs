//! The analysis-engine seam.
//!
//! Everything the session needs from Python-side analysis sits behind
//! [`Engine`], so the request handlers can be exercised against a scripted
//! engine in tests while production runs [`crate::bridge::PythonBridge`].
//! Positions cross this boundary in the engine convention: 1-based line,
//! 0-based column.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use adder_core::engine::{
    CallSignatureInfo, Candidate, FlakeFinding, HoverInfo, NameInfo, StyleFinding, SyntaxErrorInfo,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("analysis engine exited")]
    Closed,
    #[error("analysis engine i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("analysis engine protocol: {0}")]
    Protocol(String),
    /// The engine ran but the operation itself failed, e.g. a refactoring
    /// that does not apply at the requested position.
    #[error("{0}")]
    Failed(String),
    #[error("analysis engine request timed out")]
    Timeout,
}

/// Interpreter identity, reported once at startup and threaded into the
/// type-checker invocation so it analyzes against the same environment.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterInfo {
    pub executable: PathBuf,
    /// `major.minor`, e.g. "3.12".
    pub version: String,
}

/// A document position in engine convention (1-based line, 0-based column).
#[derive(Debug, Clone, Copy)]
pub struct EnginePosition {
    pub line: u32,
    pub column: u32,
}

/// Inputs for one style-checker run.
#[derive(Debug, Clone)]
pub struct StyleRequest<'a> {
    pub text: &'a str,
    pub config_path: Option<&'a Path>,
    pub search_paths: &'a [PathBuf],
}

#[allow(async_fn_in_trait)]
pub trait Engine {
    async fn interpreter(&mut self) -> Result<InterpreterInfo, EngineError>;

    async fn syntax_errors(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<SyntaxErrorInfo>, EngineError>;

    async fn complete(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        fuzzy: bool,
    ) -> Result<Vec<Candidate>, EngineError>;

    /// Docstring material at a position. `help` selects the engine's help
    /// lookup over plain type inference.
    async fn hover(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        help: bool,
    ) -> Result<Option<HoverInfo>, EngineError>;

    async fn call_signatures(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<CallSignatureInfo>, EngineError>;

    async fn definitions(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError>;

    async fn references(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError>;

    /// Occurrences of the name under the cursor within the same document.
    async fn highlights(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError>;

    /// All defined names of a document, parent-linked for symbol hierarchy.
    async fn document_names(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<NameInfo>, EngineError>;

    /// Rename the symbol at `pos`; the result is a zero-context unified
    /// diff of the document, empty when nothing changes.
    async fn rename(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        new_name: &str,
    ) -> Result<String, EngineError>;

    /// Inline the variable at `pos`, as a unified diff.
    async fn inline(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<String, EngineError>;

    async fn flakes(&mut self, text: &str) -> Result<Vec<FlakeFinding>, EngineError>;

    async fn style_findings(
        &mut self,
        request: StyleRequest<'_>,
    ) -> Result<Vec<StyleFinding>, EngineError>;

    /// Reformat `text` (or just `lines`, 1-based inclusive) under the given
    /// style, as a unified diff against the input.
    async fn format(
        &mut self,
        text: &str,
        style: &str,
        lines: Option<(u32, u32)>,
    ) -> Result<String, EngineError>;
}
