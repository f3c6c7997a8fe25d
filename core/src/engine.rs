//! Data contracts for analysis-engine and checker results.
//!
//! The engine reports positions as 1-based line / 0-based column; callers
//! convert to the 0-based LSP convention when mapping into wire types.
//! These shapes deserialize directly from the engine bridge's JSON replies.

use std::path::PathBuf;

use serde::Deserialize;

/// A syntax error reported by the analysis engine. Terminal for a
/// validation pass: no other checker runs on syntactically invalid input.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxErrorInfo {
    /// 1-based.
    pub line: u32,
    pub column: u32,
    /// 1-based.
    pub until_line: u32,
    pub until_column: u32,
    pub message: String,
}

/// Engine classification of a name or completion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Module,
    Class,
    Instance,
    Function,
    Param,
    Keyword,
    Statement,
    Property,
    #[serde(other)]
    Other,
}

/// Python parameter kind, spelled the way `inspect.Parameter` spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamInfo {
    /// The positional-only marker appears as a parameter named `/`.
    pub name: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub has_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureInfo {
    #[serde(default)]
    pub params: Vec<ParamInfo>,
}

/// A raw completion candidate from the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub kind: CandidateKind,
    #[serde(default)]
    pub docstring: String,
    /// Length of the already-typed identifier prefix this candidate matched.
    #[serde(default)]
    pub like_name_length: u32,
    #[serde(default)]
    pub signatures: Vec<SignatureInfo>,
}

/// A call signature at a cursor position, for signature help.
#[derive(Debug, Clone, Deserialize)]
pub struct CallSignatureInfo {
    pub label: String,
    #[serde(default)]
    pub params: Vec<String>,
    /// Index of the active parameter, if the cursor is inside the call.
    #[serde(default)]
    pub index: Option<u32>,
}

/// A resolved name, used for goto/references/highlight/symbols.
#[derive(Debug, Clone, Deserialize)]
pub struct NameInfo {
    pub name: String,
    pub kind: CandidateKind,
    /// 1-based.
    pub line: u32,
    pub column: u32,
    /// Index of the enclosing name in the same reply, for symbol hierarchy.
    #[serde(default)]
    pub parent: Option<u32>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    /// Absolute path of the defining module, when it has one.
    #[serde(default)]
    pub module_path: Option<PathBuf>,
}

/// Docstring material for hover, tagged with the name's kind so markdown
/// rendering can fence signatures of callables.
#[derive(Debug, Clone, Deserialize)]
pub struct HoverInfo {
    pub kind: CandidateKind,
    #[serde(default)]
    pub docstring: String,
}

/// One pyflakes finding. `category` is the finding's class name
/// (e.g. "UndefinedName"), matched against the escalation allow-list.
#[derive(Debug, Clone, Deserialize)]
pub struct FlakeFinding {
    /// 1-based.
    pub line: u32,
    pub column: u32,
    pub category: String,
    pub message: String,
}

/// One pycodestyle finding, already filtered through the checker's own
/// ignore set.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleFinding {
    /// 1-based.
    pub line: u32,
    pub column: u32,
    pub code: String,
    pub message: String,
}
