//! The read-route-reply loop.

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::codec::{MessageReader, MessageWriter};
use crate::engine::Engine;
use crate::rpc::{self, Incoming};
use crate::session::{HandlerError, Session};

/// Serve one client connection until `exit` or EOF.
///
/// Messages are handled strictly in arrival order; a request's reply and
/// any notifications it queued are written before the next message is
/// read.
pub async fn serve<R, W, E>(input: R, output: W, engine: E) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    E: Engine,
{
    let mut reader = MessageReader::new(input);
    let mut writer = MessageWriter::new(output);
    let mut session = Session::new(engine);

    while let Some(frame) = reader.read().await? {
        let Some(incoming) = rpc::classify(&frame) else {
            tracing::trace!("dropping frame that is not JSON-RPC");
            continue;
        };
        match incoming {
            Incoming::Request { id, method, params } => {
                let reply = match handle_request(&mut session, &method, &params).await {
                    Ok(result) => rpc::response(&id, result),
                    Err(err) => {
                        tracing::debug!("{method} failed: {}", err.message());
                        rpc::error_response(&id, err.code(), err.message())
                    }
                };
                writer.write(&reply).await?;
            }
            Incoming::Notification { method, params } => {
                if method == "exit" {
                    tracing::info!("client requested exit");
                    return Ok(());
                }
                handle_notification(&mut session, &method, &params).await;
            }
            Incoming::Response => {
                tracing::trace!("dropping stray response frame");
            }
        }
        for pushed in session.drain_outbox() {
            writer.write(&pushed).await?;
        }
    }
    tracing::info!("client closed the connection");
    Ok(())
}

async fn handle_request<E: Engine>(
    session: &mut Session<E>,
    method: &str,
    params: &Value,
) -> Result<Value, HandlerError> {
    match method {
        "initialize" => session.initialize(params).await,
        "shutdown" => Ok(Value::Null),
        "textDocument/completion" => session.completion(params).await,
        "textDocument/hover" => session.hover(params).await,
        "textDocument/signatureHelp" => session.signature_help(params).await,
        "textDocument/definition" => session.definition(params).await,
        "textDocument/references" => session.references(params).await,
        "textDocument/documentHighlight" => session.document_highlight(params).await,
        "textDocument/documentSymbol" => session.document_symbol(params).await,
        "textDocument/codeAction" => session.code_action(params).await,
        "textDocument/formatting" => session.formatting(params).await,
        "textDocument/rangeFormatting" => session.range_formatting(params).await,
        "textDocument/rename" => session.rename(params).await,
        other => Err(HandlerError::MethodNotFound(format!(
            "method not found: {other}"
        ))),
    }
}

async fn handle_notification<E: Engine>(session: &mut Session<E>, method: &str, params: &Value) {
    match method {
        "initialized" => {}
        // Accepted but carries no work: the save itself arrives as didSave.
        "textDocument/willSave" => {}
        "textDocument/didOpen" => session.did_open(params).await,
        "textDocument/didChange" => session.did_change(params).await,
        "textDocument/didSave" => session.did_save(params).await,
        "textDocument/didClose" => session.did_close(params),
        "workspace/didChangeConfiguration" => session.did_change_configuration(params).await,
        other => {
            tracing::trace!("ignoring notification {other}");
        }
    }
}
