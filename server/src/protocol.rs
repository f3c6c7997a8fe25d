//! Initialize handshake material and pushed-notification builders.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use url::Url;

use adder_core::workspace::{Folder, WorkspaceFolders};
use adder_types::{Diagnostic, MarkupKind};

/// Client capabilities the server actually adapts to, fixed for the
/// lifetime of the session at initialize time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientProfile {
    pub markup: MarkupKind,
    pub snippets: bool,
    pub hierarchical_symbols: bool,
}

impl ClientProfile {
    #[must_use]
    pub fn from_initialize(params: &Value) -> Self {
        let text_document = &params["capabilities"]["textDocument"];
        let markup = text_document["hover"]["contentFormat"]
            .as_array()
            .and_then(|formats| formats.first())
            .and_then(Value::as_str)
            .map_or(MarkupKind::PlainText, |kind| match kind {
                "markdown" => MarkupKind::Markdown,
                _ => MarkupKind::PlainText,
            });
        Self {
            markup,
            snippets: text_document["completion"]["completionItem"]["snippetSupport"]
                .as_bool()
                .unwrap_or(false),
            hierarchical_symbols: text_document["documentSymbol"]
                ["hierarchicalDocumentSymbolSupport"]
                .as_bool()
                .unwrap_or(false),
        }
    }
}

/// Workspace folders declared at initialize, with the single-root fields
/// as fallback.
#[must_use]
pub fn workspace_folders(params: &Value) -> WorkspaceFolders {
    let folders = params["workspaceFolders"]
        .as_array()
        .map(|folders| {
            folders
                .iter()
                .filter_map(|folder| {
                    let uri = folder["uri"].as_str()?;
                    Some(Folder {
                        uri: uri.to_string(),
                        path: file_uri_to_path(uri)?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    let root = params["rootUri"]
        .as_str()
        .and_then(file_uri_to_path)
        .or_else(|| params["rootPath"].as_str().map(PathBuf::from));
    WorkspaceFolders::new(folders, root)
}

/// The `initialize` result. Text sync is full-document; every language
/// feature the session implements is announced here and nowhere else.
#[must_use]
pub fn initialize_result() -> Value {
    json!({
        "capabilities": {
            "textDocumentSync": {
                "openClose": true,
                "change": 1,
                "save": true,
            },
            "completionProvider": {
                "triggerCharacters": [".", "'", "\""],
            },
            "hoverProvider": true,
            "signatureHelpProvider": {
                "triggerCharacters": ["(", ","],
            },
            "definitionProvider": true,
            "referencesProvider": true,
            "documentHighlightProvider": true,
            "documentSymbolProvider": true,
            "codeActionProvider": {
                "codeActionKinds": ["refactor.inline"],
            },
            "documentFormattingProvider": true,
            "documentRangeFormattingProvider": true,
            "renameProvider": true,
            "workspace": {
                "workspaceFolders": { "supported": true },
            },
        },
        "serverInfo": {
            "name": "adderls",
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

#[derive(Debug, Clone, Copy)]
pub enum MessageType {
    Error = 1,
    Warning = 2,
    Info = 3,
}

#[must_use]
pub fn publish_diagnostics(uri: &str, diagnostics: &[Diagnostic]) -> Value {
    crate::rpc::notification(
        "textDocument/publishDiagnostics",
        json!({ "uri": uri, "diagnostics": diagnostics }),
    )
}

#[must_use]
pub fn show_message(kind: MessageType, message: &str) -> Value {
    crate::rpc::notification(
        "window/showMessage",
        json!({ "type": kind as u8, "message": message }),
    )
}

#[must_use]
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    Url::parse(uri).ok()?.to_file_path().ok()
}

#[must_use]
pub fn path_to_file_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}
