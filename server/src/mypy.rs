//! Out-of-process mypy runner.
//!
//! Argument construction and output parsing live in
//! [`adder_core::typecheck`]; this module only finds the executable, runs
//! it with a deadline, and hands the report back. A failure here never
//! fails the request that triggered it; the session reports it to the
//! client as a window message and publishes the other checkers' results.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use adder_core::CheckerFailure;

const RUN_TIMEOUT: Duration = Duration::from_secs(60);

/// Run mypy with `args` and return its stdout report. Exit status is
/// deliberately ignored: mypy exits non-zero whenever it has findings.
pub async fn run(args: &[String]) -> Result<String, CheckerFailure> {
    let exe = which::which("mypy")
        .map_err(|e| CheckerFailure::new("mypy", format!("executable not found: {e}")))?;
    let output = timeout(
        RUN_TIMEOUT,
        Command::new(exe)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| CheckerFailure::new("mypy", "run timed out"))?
    .map_err(|e| CheckerFailure::new("mypy", e.to_string()))?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
