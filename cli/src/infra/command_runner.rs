//! Process execution for the ssh, scp and local shell transports.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Upper bound for a single phase script or upload.
pub const PHASE_TIMEOUT: Duration = Duration::from_secs(300);

/// Runs programs with tokio, capturing their output.
///
/// A child that outlives its timeout is killed explicitly; dropping the
/// wait future alone leaves the process running on Windows.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(PHASE_TIMEOUT)
    }
}

fn spawn(program: &str, args: &[&str], stdin: Stdio) -> Result<Child> {
    Command::new(program)
        .args(args)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

async fn drain(pipe: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut bytes = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut bytes).await;
    }
    bytes
}

async fn collect(mut child: Child, program: &str, limit: Duration) -> Result<Output> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    tokio::select! {
        finished = async {
            let (status, stdout, stderr) = tokio::join!(child.wait(), drain(stdout), drain(stderr));
            let status = status.with_context(|| format!("waiting for {program}"))?;
            Ok(Output { status, stdout, stderr })
        } => finished,
        () = tokio::time::sleep(limit) => {
            let _ = child.kill().await;
            anyhow::bail!("{program} timed out after {}s", limit.as_secs())
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = spawn(program, args, Stdio::null())?;
        collect(child, program, timeout).await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        let mut child = spawn(program, args, Stdio::piped())?;

        // The remote shell reads its script until stdin closes.
        let script = input.to_vec();
        let pipe = child.stdin.take();
        let feeder = tokio::spawn(async move {
            if let Some(mut pipe) = pipe {
                let _ = pipe.write_all(&script).await;
            }
        });

        let output = collect(child, program, self.timeout).await;
        let _ = feeder.await;
        output
    }
}
