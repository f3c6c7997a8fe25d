//! Session behavior against a scripted analysis engine.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use adder_core::engine::{
    CallSignatureInfo, Candidate, CandidateKind, FlakeFinding, HoverInfo, NameInfo, StyleFinding,
    SyntaxErrorInfo,
};
use adder_server::engine::{Engine, EngineError, EnginePosition, InterpreterInfo, StyleRequest};
use adder_server::session::Session;

const URI: &str = "file:///w/t.py";

type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct MockEngine {
    log: CallLog,
    syntax: Vec<SyntaxErrorInfo>,
    flakes: Vec<FlakeFinding>,
    styles: Vec<StyleFinding>,
    candidates: Vec<Candidate>,
    hover: Option<HoverInfo>,
    signatures: Vec<CallSignatureInfo>,
    names: Vec<NameInfo>,
    diff: String,
    refuse_refactor: bool,
}

impl MockEngine {
    fn record(&self, op: &str) {
        self.log.lock().unwrap().push(op.to_string());
    }
}

impl Engine for MockEngine {
    async fn interpreter(&mut self) -> Result<InterpreterInfo, EngineError> {
        self.record("interpreter");
        Ok(InterpreterInfo {
            executable: PathBuf::from("/usr/bin/python3"),
            version: "3.12".to_string(),
        })
    }

    async fn syntax_errors(
        &mut self,
        _path: &Path,
        _text: &str,
    ) -> Result<Vec<SyntaxErrorInfo>, EngineError> {
        self.record("syntax");
        Ok(self.syntax.clone())
    }

    async fn complete(
        &mut self,
        _path: &Path,
        _text: &str,
        pos: EnginePosition,
        _fuzzy: bool,
    ) -> Result<Vec<Candidate>, EngineError> {
        self.record(&format!("complete:{}:{}", pos.line, pos.column));
        Ok(self.candidates.clone())
    }

    async fn hover(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
        help: bool,
    ) -> Result<Option<HoverInfo>, EngineError> {
        self.record(&format!("hover:{help}"));
        Ok(self.hover.clone())
    }

    async fn call_signatures(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
    ) -> Result<Vec<CallSignatureInfo>, EngineError> {
        self.record("signatures");
        Ok(self.signatures.clone())
    }

    async fn definitions(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.record("definitions");
        Ok(self.names.clone())
    }

    async fn references(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.record("references");
        Ok(self.names.clone())
    }

    async fn highlights(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.record("highlights");
        Ok(self.names.clone())
    }

    async fn document_names(
        &mut self,
        _path: &Path,
        _text: &str,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.record("names");
        Ok(self.names.clone())
    }

    async fn rename(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
        new_name: &str,
    ) -> Result<String, EngineError> {
        self.record(&format!("rename:{new_name}"));
        if self.refuse_refactor {
            return Err(EngineError::Failed("cannot rename this".to_string()));
        }
        Ok(self.diff.clone())
    }

    async fn inline(
        &mut self,
        _path: &Path,
        _text: &str,
        _pos: EnginePosition,
    ) -> Result<String, EngineError> {
        self.record("inline");
        if self.refuse_refactor {
            return Err(EngineError::Failed("not a variable".to_string()));
        }
        Ok(self.diff.clone())
    }

    async fn flakes(&mut self, _text: &str) -> Result<Vec<FlakeFinding>, EngineError> {
        self.record("flakes");
        Ok(self.flakes.clone())
    }

    async fn style_findings(
        &mut self,
        _request: StyleRequest<'_>,
    ) -> Result<Vec<StyleFinding>, EngineError> {
        self.record("style");
        Ok(self.styles.clone())
    }

    async fn format(
        &mut self,
        _text: &str,
        style: &str,
        lines: Option<(u32, u32)>,
    ) -> Result<String, EngineError> {
        self.record(&format!("format:{style}:{lines:?}"));
        Ok(self.diff.clone())
    }
}

fn initialize_params(snippets: bool, markdown: bool) -> Value {
    let format = if markdown { "markdown" } else { "plaintext" };
    json!({
        "rootUri": "file:///w",
        "capabilities": {
            "textDocument": {
                "completion": { "completionItem": { "snippetSupport": snippets } },
                "hover": { "contentFormat": [format] },
                "documentSymbol": { "hierarchicalDocumentSymbolSupport": true },
            }
        }
    })
}

async fn started(engine: MockEngine, snippets: bool, markdown: bool) -> Session<MockEngine> {
    let mut session = Session::new(engine);
    session
        .initialize(&initialize_params(snippets, markdown))
        .await
        .unwrap();
    session
}

async fn open(session: &mut Session<MockEngine>, text: &str) {
    session
        .did_open(&json!({
            "textDocument": { "uri": URI, "text": text, "version": 7 }
        }))
        .await;
}

fn position_params(line: u32, character: u32) -> Value {
    json!({
        "textDocument": { "uri": URI },
        "position": { "line": line, "character": character }
    })
}

fn published_diagnostics(frame: &Value) -> &Vec<Value> {
    assert_eq!(frame["method"], "textDocument/publishDiagnostics");
    assert_eq!(frame["params"]["uri"], URI);
    frame["params"]["diagnostics"].as_array().unwrap()
}

#[tokio::test]
async fn test_syntax_errors_short_circuit_the_pass() {
    let log = CallLog::default();
    let engine = MockEngine {
        log: log.clone(),
        syntax: vec![SyntaxErrorInfo {
            line: 1,
            column: 4,
            until_line: 1,
            until_column: 5,
            message: "invalid syntax".to_string(),
        }],
        flakes: vec![FlakeFinding {
            line: 1,
            column: 0,
            category: "UndefinedName".to_string(),
            message: "should never surface".to_string(),
        }],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "def f(:\n").await;

    let pushed = session.drain_outbox();
    assert_eq!(pushed.len(), 1);
    let diags = published_diagnostics(&pushed[0]);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["source"], "syntax");
    assert_eq!(diags[0]["severity"], 1);

    let calls = log.lock().unwrap().clone();
    assert!(
        !calls.iter().any(|c| c == "flakes" || c == "style"),
        "no other checker may run on invalid syntax, got {calls:?}"
    );
}

#[tokio::test]
async fn test_clean_syntax_aggregates_flakes_and_style() {
    let engine = MockEngine {
        flakes: vec![
            FlakeFinding {
                line: 1,
                column: 0,
                category: "UnusedImport".to_string(),
                message: "'os' imported but unused".to_string(),
            },
            FlakeFinding {
                line: 2,
                column: 6,
                category: "UndefinedName".to_string(),
                message: "undefined name 'nope'".to_string(),
            },
        ],
        styles: vec![StyleFinding {
            line: 2,
            column: 0,
            code: "E302".to_string(),
            message: "E302 expected 2 blank lines".to_string(),
        }],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "import os\nprint(nope)\n").await;

    let pushed = session.drain_outbox();
    assert_eq!(pushed.len(), 1);
    let diags = published_diagnostics(&pushed[0]);
    assert_eq!(diags.len(), 3);
    // Default escalation list turns UndefinedName into an error.
    assert_eq!(diags[0]["severity"], 2);
    assert_eq!(diags[1]["severity"], 1);
    assert_eq!(diags[2]["source"], "pycodestyle");
    assert_eq!(diags[2]["code"], "E302");
}

#[tokio::test]
async fn test_change_revalidates_only_when_configured() {
    let log = CallLog::default();
    let engine = MockEngine {
        log: log.clone(),
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "x = 1\n").await;
    session.drain_outbox();

    session
        .did_change(&json!({
            "textDocument": { "uri": URI, "version": 8 },
            "contentChanges": [{ "text": "x = 2\n" }]
        }))
        .await;
    assert!(
        session.drain_outbox().is_empty(),
        "diagnostic_on_change defaults to off"
    );

    session
        .did_change_configuration(&json!({
            "settings": { "adderls": { "diagnostic_on_change": true } }
        }))
        .await;
    // The settings update itself revalidates all open documents.
    assert_eq!(session.drain_outbox().len(), 1);

    session
        .did_change(&json!({
            "textDocument": { "uri": URI, "version": 9 },
            "contentChanges": [{ "text": "x = 3\n" }]
        }))
        .await;
    assert_eq!(session.drain_outbox().len(), 1);
}

#[tokio::test]
async fn test_close_clears_published_diagnostics() {
    let mut session = started(MockEngine::default(), false, false).await;
    open(&mut session, "x = 1\n").await;
    session.drain_outbox();

    session.did_close(&json!({ "textDocument": { "uri": URI } }));
    let pushed = session.drain_outbox();
    assert_eq!(pushed.len(), 1);
    assert!(published_diagnostics(&pushed[0]).is_empty());

    let err = session.hover(&position_params(0, 0)).await.unwrap_err();
    assert_eq!(err.code(), -32602);
}

#[tokio::test]
async fn test_completion_plain_client_gets_no_snippets() {
    let engine = MockEngine {
        candidates: vec![Candidate {
            name: "sorted".to_string(),
            kind: CandidateKind::Function,
            docstring: String::new(),
            like_name_length: 3,
            signatures: Vec::new(),
        }],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "sor\n").await;
    session.drain_outbox();

    let result = session.completion(&position_params(0, 3)).await.unwrap();
    let items = result["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["label"], "sorted");
    assert_eq!(items[0]["sortText"], "aasorted");
    assert!(items[0].get("insertTextFormat").is_none());
    // The replacement range covers the typed prefix.
    assert_eq!(items[0]["textEdit"]["range"]["start"]["character"], 0);
}

#[tokio::test]
async fn test_completion_snippet_client_gets_expansion() {
    use adder_core::engine::{ParamInfo, ParamKind, SignatureInfo};
    let engine = MockEngine {
        candidates: vec![Candidate {
            name: "foo".to_string(),
            kind: CandidateKind::Function,
            docstring: String::new(),
            like_name_length: 0,
            signatures: vec![SignatureInfo {
                params: vec![
                    ParamInfo {
                        name: "a".to_string(),
                        kind: ParamKind::PositionalOrKeyword,
                        has_default: false,
                    },
                    ParamInfo {
                        name: "b".to_string(),
                        kind: ParamKind::KeywordOnly,
                        has_default: false,
                    },
                    ParamInfo {
                        name: "c".to_string(),
                        kind: ParamKind::KeywordOnly,
                        has_default: true,
                    },
                ],
            }],
        }],
        ..MockEngine::default()
    };
    let mut session = started(engine, true, false).await;
    open(&mut session, "\n").await;
    session.drain_outbox();

    let result = session.completion(&position_params(0, 0)).await.unwrap();
    let items = result["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["label"], "foo(a, b)");
    assert_eq!(items[1]["insertText"], "foo(${1:a}, b=${2:b})$0");
    assert_eq!(items[1]["insertTextFormat"], 2);
    assert!(items[0]["sortText"].as_str() < items[1]["sortText"].as_str());
}

#[tokio::test]
async fn test_hover_respects_markup_and_help_setting() {
    let log = CallLog::default();
    let engine = MockEngine {
        log: log.clone(),
        hover: Some(HoverInfo {
            kind: CandidateKind::Function,
            docstring: "foo(a)\n\nDoes things.".to_string(),
        }),
        ..MockEngine::default()
    };
    let mut session = started(engine, false, true).await;
    open(&mut session, "foo\n").await;
    session.drain_outbox();

    let result = session.hover(&position_params(0, 1)).await.unwrap();
    assert_eq!(result["contents"]["kind"], "markdown");
    let value = result["contents"]["value"].as_str().unwrap();
    assert!(value.starts_with("```python\nfoo(a)\n```"));
    assert!(
        log.lock().unwrap().contains(&"hover:true".to_string()),
        "help_on_hover defaults to true"
    );
}

#[tokio::test]
async fn test_signature_help_picks_highest_active_index() {
    // Overloads: only the signature with the furthest active parameter
    // is returned.
    let engine = MockEngine {
        signatures: vec![
            CallSignatureInfo {
                label: "foo(x)".to_string(),
                params: vec!["x".to_string()],
                index: Some(0),
            },
            CallSignatureInfo {
                label: "foo(a, b)".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
                index: Some(1),
            },
            CallSignatureInfo {
                label: "foo()".to_string(),
                params: Vec::new(),
                index: None,
            },
        ],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "foo(1, \n").await;
    session.drain_outbox();

    let result = session
        .signature_help(&position_params(0, 7))
        .await
        .unwrap();
    assert_eq!(result["activeParameter"], 1);
    assert_eq!(result["signatures"].as_array().unwrap().len(), 1);
    assert_eq!(result["signatures"][0]["label"], "foo(a, b)");
    assert_eq!(result["signatures"][0]["parameters"][1]["label"], "b");
}

#[tokio::test]
async fn test_definition_maps_to_location() {
    let engine = MockEngine {
        names: vec![NameInfo {
            name: "target".to_string(),
            kind: CandidateKind::Function,
            line: 3,
            column: 4,
            parent: None,
            full_name: None,
            module_name: None,
            module_path: Some(PathBuf::from("/w/lib.py")),
        }],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "target()\n").await;
    session.drain_outbox();

    let result = session.definition(&position_params(0, 2)).await.unwrap();
    assert_eq!(result[0]["uri"], "file:///w/lib.py");
    assert_eq!(result[0]["range"]["start"]["line"], 2);
    assert_eq!(result[0]["range"]["end"]["character"], 10);
}

#[tokio::test]
async fn test_document_symbols_build_hierarchy() {
    let engine = MockEngine {
        names: vec![
            NameInfo {
                name: "Outer".to_string(),
                kind: CandidateKind::Class,
                line: 1,
                column: 6,
                parent: None,
                full_name: None,
                module_name: None,
                module_path: Some(PathBuf::from("/w/t.py")),
            },
            NameInfo {
                name: "method".to_string(),
                kind: CandidateKind::Function,
                line: 2,
                column: 8,
                parent: Some(0),
                full_name: None,
                module_name: None,
                module_path: Some(PathBuf::from("/w/t.py")),
            },
        ],
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "class Outer:\n    def method(self): ...\n").await;
    session.drain_outbox();

    let result = session
        .document_symbol(&json!({ "textDocument": { "uri": URI } }))
        .await
        .unwrap();
    assert_eq!(result[0]["name"], "Outer");
    assert_eq!(result[0]["kind"], 5);
    assert_eq!(result[0]["children"][0]["name"], "method");
    assert_eq!(result[0]["children"][0]["kind"], 12);
}

#[tokio::test]
async fn test_rename_translates_diff_into_workspace_edit() {
    let engine = MockEngine {
        diff: "--- a/t.py\n+++ b/t.py\n@@ -1,2 +1,2 @@\n-x = 1\n-print(x)\n+y = 1\n+print(y)\n"
            .to_string(),
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "x = 1\nprint(x)\n").await;
    session.drain_outbox();

    let mut params = position_params(0, 0);
    params["newName"] = json!("y");
    let result = session.rename(&params).await.unwrap();
    let change = &result["documentChanges"][0];
    assert_eq!(change["textDocument"]["uri"], URI);
    assert_eq!(change["textDocument"]["version"], 7);
    let edit = &change["edits"][0];
    assert_eq!(edit["range"]["start"]["line"], 0);
    assert_eq!(edit["range"]["end"]["line"], 2);
    assert_eq!(edit["newText"], "y = 1\nprint(y)\n");
}

#[tokio::test]
async fn test_refused_rename_is_a_request_error() {
    let engine = MockEngine {
        refuse_refactor: true,
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "import os\n").await;
    session.drain_outbox();

    let mut params = position_params(0, 0);
    params["newName"] = json!("y");
    let err = session.rename(&params).await.unwrap_err();
    assert_eq!(err.code(), -32803);
    assert_eq!(err.message(), "cannot rename this");
}

#[tokio::test]
async fn test_unavailable_inline_yields_no_actions() {
    let engine = MockEngine {
        refuse_refactor: true,
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "import os\n").await;
    session.drain_outbox();

    let result = session
        .code_action(&json!({
            "textDocument": { "uri": URI },
            "range": {
                "start": { "line": 0, "character": 0 },
                "end": { "line": 0, "character": 0 }
            }
        }))
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_range_formatting_passes_one_based_lines() {
    let log = CallLog::default();
    let engine = MockEngine {
        log: log.clone(),
        diff: "--- a/t.py\n+++ b/t.py\n@@ -2,1 +2,1 @@\n-x=1\n+x = 1\n".to_string(),
        ..MockEngine::default()
    };
    let mut session = started(engine, false, false).await;
    open(&mut session, "pass\nx=1\n").await;
    session.drain_outbox();

    let result = session
        .range_formatting(&json!({
            "textDocument": { "uri": URI },
            "range": {
                "start": { "line": 1, "character": 0 },
                "end": { "line": 1, "character": 3 }
            },
            "options": { "tabSize": 4, "insertSpaces": true }
        }))
        .await
        .unwrap();
    assert!(
        log.lock()
            .unwrap()
            .contains(&"format:pep8:Some((2, 2))".to_string())
    );
    assert_eq!(result[0]["range"]["start"]["line"], 1);
    assert_eq!(result[0]["newText"], "x = 1\n");
}

#[tokio::test]
async fn test_serve_handles_a_full_conversation() {
    use adder_server::codec::{MessageReader, MessageWriter};

    let (client, server) = tokio::io::duplex(1 << 16);
    let (server_read, server_write) = tokio::io::split(server);
    let (client_read, client_write) = tokio::io::split(client);

    let serve = adder_server::serve(server_read, server_write, MockEngine::default());

    let client = async move {
        let mut reader = MessageReader::new(client_read);
        let mut writer = MessageWriter::new(client_write);

        writer
            .write(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": initialize_params(false, false)
            }))
            .await
            .unwrap();
        let reply = reader.read().await.unwrap().unwrap();
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["serverInfo"]["name"], "adderls");

        writer
            .write(&json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }))
            .await
            .unwrap();
        writer
            .write(&json!({
                "jsonrpc": "2.0", "method": "textDocument/didOpen",
                "params": { "textDocument": { "uri": URI, "text": "x = 1\n", "version": 1 } }
            }))
            .await
            .unwrap();
        let pushed = reader.read().await.unwrap().unwrap();
        assert_eq!(pushed["method"], "textDocument/publishDiagnostics");

        writer
            .write(&json!({ "jsonrpc": "2.0", "id": 2, "method": "no/suchMethod" }))
            .await
            .unwrap();
        let reply = reader.read().await.unwrap().unwrap();
        assert_eq!(reply["error"]["code"], -32601);

        writer
            .write(&json!({ "jsonrpc": "2.0", "id": 3, "method": "shutdown" }))
            .await
            .unwrap();
        let reply = reader.read().await.unwrap().unwrap();
        assert_eq!(reply["id"], 3);

        writer
            .write(&json!({ "jsonrpc": "2.0", "method": "exit" }))
            .await
            .unwrap();
    };

    let (served, ()) = tokio::join!(serve, client);
    served.unwrap();
}
