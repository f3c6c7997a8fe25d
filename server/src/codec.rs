//! `Content-Length` framing for the client transport.
//!
//! Every LSP message travels as `Content-Length: N\r\n\r\n{json}`. The
//! reader yields one [`serde_json::Value`] per frame and `None` on a clean
//! EOF; the writer frames and flushes one value per call.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Upper bound on a single frame body. A whole document rides inside a
/// `didChange`, so this is generous, but it still caps a corrupt header.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub struct MessageReader<R> {
    input: BufReader<R>,
    line: String,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: BufReader::new(input),
            line: String::new(),
        }
    }

    /// Next message, or `None` when the peer closed the stream between
    /// frames. EOF inside a frame is an error.
    pub async fn read(&mut self) -> Result<Option<serde_json::Value>> {
        let Some(body_len) = self.read_header_block().await? else {
            return Ok(None);
        };
        if body_len > MAX_BODY_BYTES {
            bail!("frame of {body_len} bytes exceeds the {MAX_BODY_BYTES} byte limit");
        }
        let mut body = vec![0u8; body_len];
        self.input
            .read_exact(&mut body)
            .await
            .context("reading frame body")?;
        let value = serde_json::from_slice(&body).context("decoding frame body")?;
        Ok(Some(value))
    }

    /// Consume header lines through the blank separator and return the
    /// announced body length. Header names are matched case-insensitively
    /// and unknown headers (`Content-Type`) are skipped.
    async fn read_header_block(&mut self) -> Result<Option<usize>> {
        let mut body_len = None;
        let mut at_frame_start = true;
        loop {
            self.line.clear();
            let n = self
                .input
                .read_line(&mut self.line)
                .await
                .context("reading frame header")?;
            if n == 0 {
                if at_frame_start {
                    return Ok(None);
                }
                bail!("stream closed inside a frame header");
            }
            at_frame_start = false;
            let line = self.line.trim_ascii();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.trim_ascii().eq_ignore_ascii_case("content-length")
            {
                body_len = Some(
                    value
                        .trim_ascii()
                        .parse()
                        .context("unparseable Content-Length")?,
                );
            }
        }
        match body_len {
            Some(len) => Ok(Some(len)),
            None => bail!("frame header carried no Content-Length"),
        }
    }
}

pub struct MessageWriter<W> {
    output: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub async fn write(&mut self, message: &serde_json::Value) -> Result<()> {
        let body = serde_json::to_vec(message).context("encoding frame body")?;
        let header = format!("Content-Length: {}\r\n\r\n", body.len());
        self.output
            .write_all(header.as_bytes())
            .await
            .context("writing frame header")?;
        self.output
            .write_all(&body)
            .await
            .context("writing frame body")?;
        self.output.flush().await.context("flushing frame")?;
        Ok(())
    }
}
