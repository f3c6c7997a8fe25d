//! Wire-level LSP data types for adderls.
//!
//! This crate contains pure data types with no IO and no async: the subset of
//! the Language Server Protocol structures the server produces or consumes,
//! plus the flat [`Settings`] map. Numeric LSP enums serialize as integers,
//! string enums as their protocol spelling.

mod lsp;
mod settings;

pub use lsp::{
    CodeAction, CodeActionKind, CompletionItem, CompletionItemKind, CompletionList, Diagnostic,
    DiagnosticSeverity, DocumentHighlight, DocumentSymbol, Hover, InsertTextFormat, Location,
    MarkupContent, MarkupKind, ParameterInformation, Position, Range, SignatureHelp,
    SignatureInformation, SymbolInformation, SymbolKind, TextDocumentEdit, TextEdit,
    VersionedTextDocumentIdentifier, WorkspaceEdit,
};
pub use settings::{Settings, SettingsDelta};
