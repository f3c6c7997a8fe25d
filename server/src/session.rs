//! Per-connection server state and request handlers.
//!
//! One [`Session`] per client connection. It owns the open-document text
//! store, the analysis-handle cache, per-folder derived config, the
//! settings, and the engine; the dispatch loop feeds it decoded requests
//! and notifications and drains [`Session::drain_outbox`] for pushed
//! notifications (diagnostics, window messages) after every message.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use adder_core::completion::{self, CompletionMode};
use adder_core::diagnostics::{flake_diagnostics, style_diagnostics, syntax_diagnostics};
use adder_core::documents::{Document, DocumentCache, DocumentStore};
use adder_core::edits::{diff_to_edits, refactor_edits};
use adder_core::engine::{CandidateKind, NameInfo};
use adder_core::typecheck::{self, CheckTarget};
use adder_core::workspace::{FolderConfigCache, StyleOptions, WorkspaceFolders};
use adder_types::{
    CodeAction, CodeActionKind, CompletionList, DocumentHighlight, DocumentSymbol, Hover,
    Location, MarkupContent, MarkupKind, ParameterInformation, Position, Range, Settings,
    SignatureHelp, SignatureInformation, SymbolInformation, SymbolKind, TextDocumentEdit,
    TextEdit, VersionedTextDocumentIdentifier, WorkspaceEdit,
};

use crate::engine::{Engine, EngineError, EnginePosition, InterpreterInfo, StyleRequest};
use crate::mypy;
use crate::protocol::{self, ClientProfile, MessageType};
use crate::rpc;

/// A request handler failure, carrying its JSON-RPC error code.
#[derive(Debug)]
pub enum HandlerError {
    MethodNotFound(String),
    InvalidParams(String),
    /// The operation ran and reported a user-meaningful failure, e.g. a
    /// rename at a position where nothing can be renamed.
    RequestFailed(String),
    Internal(String),
}

impl HandlerError {
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::MethodNotFound(_) => rpc::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => rpc::INVALID_PARAMS,
            Self::RequestFailed(_) => rpc::REQUEST_FAILED,
            Self::Internal(_) => rpc::INTERNAL_ERROR,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MethodNotFound(m)
            | Self::InvalidParams(m)
            | Self::RequestFailed(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<EngineError> for HandlerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Failed(message) => Self::RequestFailed(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

type HandlerResult = Result<Value, HandlerError>;

#[derive(Debug)]
struct OpenDoc {
    text: String,
    version: i32,
    path: PathBuf,
}

/// The authoritative text of every open document.
#[derive(Debug, Default)]
struct OpenDocs {
    map: HashMap<String, OpenDoc>,
}

impl DocumentStore for OpenDocs {
    fn text(&self, uri: &str) -> Option<&str> {
        self.map.get(uri).map(|doc| doc.text.as_str())
    }

    fn version(&self, uri: &str) -> Option<i32> {
        self.map.get(uri).map(|doc| doc.version)
    }
}

fn lookup<'a>(docs: &'a OpenDocs, uri: &str) -> Result<&'a OpenDoc, HandlerError> {
    docs.map
        .get(uri)
        .ok_or_else(|| HandlerError::InvalidParams(format!("no open document for {uri}")))
}

pub struct Session<E> {
    engine: E,
    profile: ClientProfile,
    mode: CompletionMode,
    settings: Settings,
    folders: WorkspaceFolders,
    folder_config: FolderConfigCache,
    interpreter: Option<InterpreterInfo>,
    docs: OpenDocs,
    cache: DocumentCache,
    /// URIs whose cached analysis handle is stale.
    dirty: HashSet<String>,
    outbox: Vec<Value>,
}

fn encode<T: Serialize>(value: &T) -> HandlerResult {
    serde_json::to_value(value).map_err(|e| HandlerError::Internal(e.to_string()))
}

fn uri_of(params: &Value) -> Result<String, HandlerError> {
    params["textDocument"]["uri"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| HandlerError::InvalidParams("missing textDocument.uri".to_string()))
}

fn position_of(params: &Value) -> Result<Position, HandlerError> {
    let position = &params["position"];
    match (position["line"].as_u64(), position["character"].as_u64()) {
        (Some(line), Some(character)) => Ok(Position::new(line as u32, character as u32)),
        _ => Err(HandlerError::InvalidParams(
            "missing position".to_string(),
        )),
    }
}

/// LSP position to engine convention (1-based line).
fn engine_position(pos: Position) -> EnginePosition {
    EnginePosition {
        line: pos.line + 1,
        column: pos.character,
    }
}

/// Range covering the name at its definition site, back in LSP convention.
fn name_range(name: &NameInfo) -> Range {
    let line = name.line.saturating_sub(1);
    Range::new(
        Position::new(line, name.column),
        Position::new(line, name.column + name.name.chars().count() as u32),
    )
}

fn locations(names: &[NameInfo]) -> Vec<Location> {
    names
        .iter()
        .filter_map(|name| {
            let path = name.module_path.as_ref()?;
            Some(Location {
                uri: protocol::path_to_file_uri(path)?,
                range: name_range(name),
            })
        })
        .collect()
}

fn symbol_kind(kind: CandidateKind) -> SymbolKind {
    match kind {
        CandidateKind::Module => SymbolKind::Module,
        CandidateKind::Class => SymbolKind::Class,
        CandidateKind::Function => SymbolKind::Function,
        CandidateKind::Instance
        | CandidateKind::Param
        | CandidateKind::Property
        | CandidateKind::Statement => SymbolKind::Variable,
        CandidateKind::Keyword | CandidateKind::Other => SymbolKind::Null,
    }
}

fn build_symbol(
    names: &[NameInfo],
    idx: usize,
    children: &HashMap<usize, Vec<usize>>,
) -> DocumentSymbol {
    let name = &names[idx];
    let range = name_range(name);
    DocumentSymbol {
        name: name.name.clone(),
        kind: symbol_kind(name.kind),
        range,
        selection_range: range,
        children: children.get(&idx).map(|kids| {
            kids.iter()
                .map(|&kid| build_symbol(names, kid, children))
                .collect()
        }),
    }
}

/// Hover text in the negotiated markup. For callables the first docstring
/// line is the signature; markdown clients get it fenced as Python.
fn hover_markup(kind: CandidateKind, docstring: &str, markup: MarkupKind) -> String {
    if markup == MarkupKind::PlainText {
        return docstring.to_string();
    }
    match kind {
        CandidateKind::Function | CandidateKind::Class => {
            let (signature, rest) = docstring.split_once('\n').unwrap_or((docstring, ""));
            let mut value = format!("```python\n{signature}\n```");
            if !rest.trim().is_empty() {
                value.push('\n');
                value.push_str(rest);
            }
            value
        }
        _ => docstring.to_string(),
    }
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            profile: ClientProfile::default(),
            mode: CompletionMode::Plain,
            settings: Settings::default(),
            folders: WorkspaceFolders::default(),
            folder_config: FolderConfigCache::new(),
            interpreter: None,
            docs: OpenDocs::default(),
            cache: DocumentCache::new(),
            dirty: HashSet::new(),
            outbox: Vec::new(),
        }
    }

    /// Notifications queued by the last handled message, in push order.
    pub fn drain_outbox(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.outbox)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn doc_handle(&mut self, uri: &str) -> Result<Arc<Document>, HandlerError> {
        let rebuild = self.dirty.remove(uri);
        self.cache
            .get(&self.docs, uri, rebuild)
            .map_err(|e| HandlerError::InvalidParams(e.to_string()))
    }

    fn push_checker_warning(&mut self, checker: &str, err: &EngineError) {
        tracing::warn!("{checker} failed: {err}");
        self.outbox.push(protocol::show_message(
            MessageType::Warning,
            &format!("{checker}: {err}"),
        ));
    }

    // ---- lifecycle -------------------------------------------------------

    pub async fn initialize(&mut self, params: &Value) -> HandlerResult {
        self.profile = ClientProfile::from_initialize(params);
        self.mode = if self.profile.snippets {
            CompletionMode::Snippet
        } else {
            CompletionMode::Plain
        };
        self.folders = protocol::workspace_folders(params);
        if let Some(options) = params.get("initializationOptions") {
            self.settings.merge(options);
        }
        let interpreter = self
            .engine
            .interpreter()
            .await
            .map_err(|e| HandlerError::Internal(e.to_string()))?;
        tracing::info!(
            "analysis interpreter {} ({})",
            interpreter.executable.display(),
            interpreter.version
        );
        self.interpreter = Some(interpreter);
        Ok(protocol::initialize_result())
    }

    pub async fn did_change_configuration(&mut self, params: &Value) {
        let delta = self.settings.merge(&params["settings"]["adderls"]);
        if delta.style_options_invalidated {
            self.folder_config.invalidate_style_options();
        }
        if delta.type_checker_configs_invalidated {
            self.folder_config.invalidate_type_checker_configs();
        }
        if delta.revalidate {
            let open: Vec<String> = self.docs.map.keys().cloned().collect();
            for uri in open {
                self.validate(&uri, false).await;
            }
        }
    }

    // ---- document sync ---------------------------------------------------

    pub async fn did_open(&mut self, params: &Value) {
        let doc = &params["textDocument"];
        let (Some(uri), Some(text)) = (doc["uri"].as_str(), doc["text"].as_str()) else {
            tracing::warn!("didOpen without uri or text");
            return;
        };
        let Some(path) = protocol::file_uri_to_path(uri) else {
            tracing::warn!("ignoring non-file document {uri}");
            return;
        };
        let uri = uri.to_string();
        self.docs.map.insert(
            uri.clone(),
            OpenDoc {
                text: text.to_string(),
                version: doc["version"].as_i64().unwrap_or(0) as i32,
                path,
            },
        );
        self.dirty.insert(uri.clone());
        if self.settings.diagnostic_on_open {
            self.validate(&uri, false).await;
        }
    }

    pub async fn did_change(&mut self, params: &Value) {
        let Ok(uri) = uri_of(params) else {
            return;
        };
        // Full sync: the last content change carries the whole document.
        let Some(text) = params["contentChanges"]
            .as_array()
            .and_then(|changes| changes.last())
            .and_then(|change| change["text"].as_str())
        else {
            return;
        };
        let Some(doc) = self.docs.map.get_mut(&uri) else {
            tracing::warn!("didChange for unopened {uri}");
            return;
        };
        doc.text = text.to_string();
        if let Some(version) = params["textDocument"]["version"].as_i64() {
            doc.version = version as i32;
        }
        self.dirty.insert(uri.clone());
        if self.settings.diagnostic_on_change {
            self.validate(&uri, true).await;
        }
    }

    pub async fn did_save(&mut self, params: &Value) {
        let Ok(uri) = uri_of(params) else {
            return;
        };
        if self.settings.diagnostic_on_save && self.docs.map.contains_key(&uri) {
            self.validate(&uri, false).await;
        }
    }

    pub fn did_close(&mut self, params: &Value) {
        let Ok(uri) = uri_of(params) else {
            return;
        };
        self.docs.map.remove(&uri);
        self.cache.remove(&uri);
        self.dirty.remove(&uri);
        // Clear the client's diagnostics for the closed document.
        self.outbox.push(protocol::publish_diagnostics(&uri, &[]));
    }

    // ---- diagnostics -----------------------------------------------------

    /// Run the checker sequence for one document and publish the result.
    ///
    /// Order is fixed: engine syntax check (any error short-circuits the
    /// pass), pyflakes, pycodestyle, then the type checker when enabled.
    /// A failing checker contributes nothing and surfaces as a window
    /// message; the pass still publishes what the others produced.
    /// `from_buffer` makes the type checker read the unsaved buffer text
    /// instead of the file on disk.
    pub async fn validate(&mut self, uri: &str, from_buffer: bool) {
        let Ok(doc) = self.doc_handle(uri) else {
            return;
        };
        let path = match lookup(&self.docs, uri) {
            Ok(open) => open.path.clone(),
            Err(_) => return,
        };

        let syntax = match self.engine.syntax_errors(&path, doc.text()).await {
            Ok(errors) => errors,
            Err(err) => {
                self.push_checker_warning("engine", &err);
                return;
            }
        };
        if !syntax.is_empty() {
            self.outbox
                .push(protocol::publish_diagnostics(uri, &syntax_diagnostics(&syntax)));
            return;
        }

        let mut all = Vec::new();

        match self.engine.flakes(doc.text()).await {
            Ok(findings) => {
                all.extend(flake_diagnostics(&findings, &doc, &self.settings.pyflakes_errors));
            }
            Err(err) => self.push_checker_warning("pyflakes", &err),
        }

        let folder = self.folders.resolve(uri).map(Path::to_path_buf);
        let style = match &folder {
            Some(folder) => self.folder_config.style_options(
                folder,
                self.settings.pycodestyle_config.as_deref().map(Path::new),
            ),
            None => StyleOptions {
                config_path: self
                    .settings
                    .pycodestyle_config
                    .as_deref()
                    .map(PathBuf::from),
                search_paths: Vec::new(),
            },
        };
        let style_request = StyleRequest {
            text: doc.text(),
            config_path: style.config_path.as_deref(),
            search_paths: &style.search_paths,
        };
        match self.engine.style_findings(style_request).await {
            Ok(findings) => {
                all.extend(style_diagnostics(&findings, &doc, &HashSet::new()));
            }
            Err(err) => self.push_checker_warning("pycodestyle", &err),
        }

        if self.settings.mypy_enabled
            && let Some(interpreter) = self.interpreter.clone()
        {
            let config = folder
                .as_deref()
                .and_then(|f| self.folder_config.type_checker_config(f));
            let target = if from_buffer {
                CheckTarget::Source {
                    path: path.clone(),
                    text: doc.text().to_string(),
                }
            } else {
                CheckTarget::File(path.clone())
            };
            let args = typecheck::build_args(
                &interpreter.executable,
                &interpreter.version,
                config.as_deref(),
                &target,
            );
            match mypy::run(&args).await {
                Ok(report) => all.extend(typecheck::parse_output(&report, &target, &doc)),
                Err(failure) => {
                    tracing::warn!("{failure}");
                    self.outbox.push(protocol::show_message(
                        MessageType::Warning,
                        &failure.to_string(),
                    ));
                }
            }
        }

        self.outbox.push(protocol::publish_diagnostics(uri, &all));
    }

    // ---- language features -----------------------------------------------

    pub async fn completion(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let candidates = self
            .engine
            .complete(
                &open.path,
                doc.text(),
                engine_position(pos),
                self.settings.completion_fuzzy,
            )
            .await?;
        let suffix = completion::word_suffix_len(doc.line(pos.line as usize).unwrap_or(""), pos.character);
        let range = Range::new(pos, Position::new(pos.line, pos.character + suffix));
        let items =
            completion::items(&candidates, range, self.mode, self.settings.completion_snippet_first);
        encode(&CompletionList {
            is_incomplete: false,
            items,
        })
    }

    pub async fn hover(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let info = self
            .engine
            .hover(
                &open.path,
                doc.text(),
                engine_position(pos),
                self.settings.help_on_hover,
            )
            .await?;
        match info {
            Some(info) if !info.docstring.is_empty() => encode(&Hover {
                contents: MarkupContent {
                    kind: self.profile.markup,
                    value: hover_markup(info.kind, &info.docstring, self.profile.markup),
                },
            }),
            _ => Ok(Value::Null),
        }
    }

    pub async fn signature_help(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let signatures = self
            .engine
            .call_signatures(&open.path, doc.text(), engine_position(pos))
            .await?;
        // Of the overloads in scope, show only the one whose active
        // parameter index is furthest along; unindexed ones lose.
        let Some(best) = signatures.iter().max_by_key(|s| s.index) else {
            return Ok(Value::Null);
        };
        encode(&SignatureHelp {
            signatures: vec![SignatureInformation {
                label: best.label.clone(),
                parameters: best
                    .params
                    .iter()
                    .map(|p| ParameterInformation { label: p.clone() })
                    .collect(),
            }],
            active_signature: 0,
            active_parameter: best.index.unwrap_or(0),
        })
    }

    pub async fn definition(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let names = self
            .engine
            .definitions(&open.path, doc.text(), engine_position(pos))
            .await?;
        encode(&locations(&names))
    }

    pub async fn references(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let names = self
            .engine
            .references(&open.path, doc.text(), engine_position(pos))
            .await?;
        encode(&locations(&names))
    }

    pub async fn document_highlight(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let names = self
            .engine
            .highlights(&open.path, doc.text(), engine_position(pos))
            .await?;
        let highlights: Vec<DocumentHighlight> = names
            .iter()
            .map(|name| DocumentHighlight {
                range: name_range(name),
            })
            .collect();
        encode(&highlights)
    }

    pub async fn document_symbol(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let names = self.engine.document_names(&open.path, doc.text()).await?;
        if self.profile.hierarchical_symbols {
            let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
            let mut roots = Vec::new();
            for (idx, name) in names.iter().enumerate() {
                match name.parent {
                    Some(parent) => children.entry(parent as usize).or_default().push(idx),
                    None => roots.push(idx),
                }
            }
            let symbols: Vec<DocumentSymbol> = roots
                .iter()
                .map(|&idx| build_symbol(&names, idx, &children))
                .collect();
            encode(&symbols)
        } else {
            let symbols: Vec<SymbolInformation> = names
                .iter()
                .map(|name| SymbolInformation {
                    name: name.name.clone(),
                    kind: symbol_kind(name.kind),
                    location: Location {
                        uri: uri.clone(),
                        range: name_range(name),
                    },
                    container_name: name
                        .parent
                        .and_then(|p| names.get(p as usize))
                        .map(|p| p.name.clone()),
                })
                .collect();
            encode(&symbols)
        }
    }

    pub async fn code_action(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let line = params["range"]["start"]["line"].as_u64().unwrap_or(0) as u32;
        let character = params["range"]["start"]["character"].as_u64().unwrap_or(0) as u32;
        let pos = Position::new(line, character);
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let version = open.version;
        let diff = match self
            .engine
            .inline(&open.path, doc.text(), engine_position(pos))
            .await
        {
            Ok(diff) => diff,
            // Nothing inlinable at this position is an empty action list,
            // not an error.
            Err(EngineError::Failed(_)) => return Ok(Value::Null),
            Err(err) => return Err(err.into()),
        };
        let Ok(edits) = refactor_edits(&diff) else {
            return Ok(Value::Null);
        };
        encode(&vec![CodeAction {
            title: "Inline variable".to_string(),
            kind: CodeActionKind::RefactorInline,
            edit: workspace_edit(&uri, version, edits),
        }])
    }

    pub async fn formatting(&mut self, params: &Value) -> HandlerResult {
        self.format_edits(params, None).await
    }

    pub async fn range_formatting(&mut self, params: &Value) -> HandlerResult {
        let range = &params["range"];
        let (Some(start), Some(end)) = (
            range["start"]["line"].as_u64(),
            range["end"]["line"].as_u64(),
        ) else {
            return Err(HandlerError::InvalidParams("missing range".to_string()));
        };
        self.format_edits(params, Some((start as u32 + 1, end as u32 + 1)))
            .await
    }

    async fn format_edits(&mut self, params: &Value, lines: Option<(u32, u32)>) -> HandlerResult {
        let uri = uri_of(params)?;
        let doc = self.doc_handle(&uri)?;
        let style = self.settings.yapf_style_config.clone();
        let diff = match self.engine.format(doc.text(), &style, lines).await {
            Ok(diff) => diff,
            // The formatter refuses syntactically invalid input; the client
            // simply gets no edits.
            Err(EngineError::Failed(message)) => {
                tracing::debug!("format failed: {message}");
                return Ok(Value::Null);
            }
            Err(err) => return Err(err.into()),
        };
        let edits = diff_to_edits(&diff);
        if edits.is_empty() {
            return Ok(Value::Null);
        }
        encode(&edits)
    }

    pub async fn rename(&mut self, params: &Value) -> HandlerResult {
        let uri = uri_of(params)?;
        let pos = position_of(params)?;
        let new_name = params["newName"]
            .as_str()
            .ok_or_else(|| HandlerError::InvalidParams("missing newName".to_string()))?
            .to_string();
        let doc = self.doc_handle(&uri)?;
        let open = lookup(&self.docs, &uri)?;
        let version = open.version;
        let diff = self
            .engine
            .rename(&open.path, doc.text(), engine_position(pos), &new_name)
            .await?;
        let Ok(edits) = refactor_edits(&diff) else {
            return Ok(Value::Null);
        };
        encode(&workspace_edit(&uri, version, edits))
    }
}

fn workspace_edit(uri: &str, version: i32, edits: Vec<TextEdit>) -> WorkspaceEdit {
    WorkspaceEdit {
        document_changes: vec![TextDocumentEdit {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.to_string(),
                version,
            },
            edits,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_kind_mapping() {
        assert_eq!(symbol_kind(CandidateKind::Class), SymbolKind::Class);
        assert_eq!(symbol_kind(CandidateKind::Function), SymbolKind::Function);
        assert_eq!(symbol_kind(CandidateKind::Statement), SymbolKind::Variable);
        assert_eq!(symbol_kind(CandidateKind::Keyword), SymbolKind::Null);
    }

    #[test]
    fn test_hover_markup_fences_callable_signature() {
        let doc = "foo(a, b)\n\nAdd two things.";
        let value = hover_markup(CandidateKind::Function, doc, MarkupKind::Markdown);
        assert!(value.starts_with("```python\nfoo(a, b)\n```\n"));
        assert!(value.ends_with("Add two things."));
        let plain = hover_markup(CandidateKind::Function, doc, MarkupKind::PlainText);
        assert_eq!(plain, doc);
    }

    #[test]
    fn test_hover_markup_plain_value_for_data() {
        let value = hover_markup(CandidateKind::Instance, "int(x=0)", MarkupKind::Markdown);
        assert_eq!(value, "int(x=0)");
    }

    #[test]
    fn test_name_range_converts_line_base() {
        let name = NameInfo {
            name: "value".to_string(),
            kind: CandidateKind::Statement,
            line: 4,
            column: 2,
            parent: None,
            full_name: None,
            module_name: None,
            module_path: None,
        };
        let range = name_range(&name);
        assert_eq!(range.start, Position::new(3, 2));
        assert_eq!(range.end, Position::new(3, 7));
    }
}
