//! The Python helper process.
//!
//! Jedi, pyflakes, pycodestyle and yapf live in a small helper interpreter
//! whose source ships inside this binary and is handed to `python -c` at
//! spawn time. The wire protocol is line-delimited JSON with exactly one
//! request in flight, which matches the session's single-threaded request
//! handling and keeps replies trivially ordered.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

use adder_core::engine::{
    CallSignatureInfo, Candidate, FlakeFinding, HoverInfo, NameInfo, StyleFinding, SyntaxErrorInfo,
};

use crate::engine::{Engine, EngineError, EnginePosition, InterpreterInfo, StyleRequest};

const BRIDGE_SOURCE: &str = include_str!("../assets/bridge.py");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const EXIT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct PythonBridge {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl PythonBridge {
    /// Spawn the helper under `python` (or the first `python3`/`python`
    /// found on PATH).
    pub fn spawn(python: Option<&Path>) -> Result<Self> {
        let python = match python {
            Some(path) => path.to_path_buf(),
            None => which::which("python3")
                .or_else(|_| which::which("python"))
                .context("no python interpreter found in PATH")?,
        };
        tracing::debug!("starting analysis helper under {}", python.display());
        let mut child = Command::new(&python)
            .arg("-c")
            .arg(BRIDGE_SOURCE)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning {}", python.display()))?;
        let stdin = child.stdin.take().context("helper process has no stdin")?;
        let stdout = child.stdout.take().context("helper process has no stdout")?;
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    async fn call<T: DeserializeOwned>(&mut self, request: Value) -> Result<T, EngineError> {
        let mut line =
            serde_json::to_string(&request).map_err(|e| EngineError::Protocol(e.to_string()))?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let mut reply = String::new();
        let read = timeout(REQUEST_TIMEOUT, self.stdout.read_line(&mut reply))
            .await
            .map_err(|_| EngineError::Timeout)??;
        if read == 0 {
            return Err(EngineError::Closed);
        }
        let value: Value =
            serde_json::from_str(&reply).map_err(|e| EngineError::Protocol(e.to_string()))?;
        if let Some(message) = value.get("err").and_then(Value::as_str) {
            return Err(EngineError::Failed(message.to_string()));
        }
        let Some(ok) = value.get("ok") else {
            return Err(EngineError::Protocol(
                "reply carries neither ok nor err".to_string(),
            ));
        };
        serde_json::from_value(ok.clone()).map_err(|e| EngineError::Protocol(e.to_string()))
    }

    /// Ask the helper to exit, then reap it, killing after a grace period.
    pub async fn shutdown(mut self) {
        let _ = self.stdin.write_all(b"{\"op\":\"exit\"}\n").await;
        let _ = self.stdin.flush().await;
        if timeout(EXIT_TIMEOUT, self.child.wait()).await.is_err() {
            tracing::debug!("analysis helper did not exit in time, killing");
            let _ = self.child.kill().await;
        }
    }
}

impl Engine for PythonBridge {
    async fn interpreter(&mut self) -> Result<InterpreterInfo, EngineError> {
        self.call(json!({ "op": "interpreter" })).await
    }

    async fn syntax_errors(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<SyntaxErrorInfo>, EngineError> {
        self.call(json!({ "op": "syntax", "path": path, "text": text }))
            .await
    }

    async fn complete(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        fuzzy: bool,
    ) -> Result<Vec<Candidate>, EngineError> {
        self.call(json!({
            "op": "complete",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
            "fuzzy": fuzzy,
        }))
        .await
    }

    async fn hover(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        help: bool,
    ) -> Result<Option<HoverInfo>, EngineError> {
        self.call(json!({
            "op": "hover",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
            "help": help,
        }))
        .await
    }

    async fn call_signatures(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<CallSignatureInfo>, EngineError> {
        self.call(json!({
            "op": "signatures",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
        }))
        .await
    }

    async fn definitions(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.call(json!({
            "op": "definitions",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
        }))
        .await
    }

    async fn references(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.call(json!({
            "op": "references",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
        }))
        .await
    }

    async fn highlights(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.call(json!({
            "op": "highlights",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
        }))
        .await
    }

    async fn document_names(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<NameInfo>, EngineError> {
        self.call(json!({ "op": "names", "path": path, "text": text }))
            .await
    }

    async fn rename(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
        new_name: &str,
    ) -> Result<String, EngineError> {
        self.call(json!({
            "op": "rename",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
            "new_name": new_name,
        }))
        .await
    }

    async fn inline(
        &mut self,
        path: &Path,
        text: &str,
        pos: EnginePosition,
    ) -> Result<String, EngineError> {
        self.call(json!({
            "op": "inline",
            "path": path,
            "text": text,
            "line": pos.line,
            "column": pos.column,
        }))
        .await
    }

    async fn flakes(&mut self, text: &str) -> Result<Vec<FlakeFinding>, EngineError> {
        self.call(json!({ "op": "flakes", "text": text })).await
    }

    async fn style_findings(
        &mut self,
        request: StyleRequest<'_>,
    ) -> Result<Vec<StyleFinding>, EngineError> {
        self.call(json!({
            "op": "style",
            "text": request.text,
            "config_path": request.config_path,
            "search_paths": request.search_paths,
        }))
        .await
    }

    async fn format(
        &mut self,
        text: &str,
        style: &str,
        lines: Option<(u32, u32)>,
    ) -> Result<String, EngineError> {
        self.call(json!({
            "op": "format",
            "text": text,
            "style": style,
            "lines": lines,
        }))
        .await
    }
}
