use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

use crate::config::ClientConfig;
use crate::transport::traits::{Host, Request, Response, Transport};

/// Routes requests through a locally installed CLI.
///
/// The CLI is invoked as `<cli> request <METHOD> <url> [--query k=v]...
/// [--header k:v]...`, with any JSON body on stdin. A zero exit yields a 200
/// with stdout as the body; a non-zero exit yields a 5xx carrying stderr.
#[derive(Debug, Clone)]
pub struct CliTransport {
    cli_path: PathBuf,
    api_url: String,
    previews_url: String,
    access_token: Option<String>,
}

impl CliTransport {
    pub fn new(cli_path: PathBuf, config: &ClientConfig) -> Self {
        Self {
            cli_path,
            api_url: config.api_base().to_string(),
            previews_url: config.previews_base().to_string(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn args(&self, request: &Request) -> Vec<String> {
        let base = match request.host {
            Host::Api => &self.api_url,
            Host::Previews => &self.previews_url,
        };

        let mut args = vec![
            "request".to_string(),
            request.method.as_str().to_string(),
            format!("{}/{}", base, request.path),
        ];
        for (key, value) in &request.query {
            args.push("--query".to_string());
            args.push(format!("{}={}", key, value));
        }
        for (key, value) in &request.headers {
            args.push("--header".to_string());
            args.push(format!("{}:{}", key, value));
        }
        args
    }
}

/// Writes the body and closes stdin. A CLI that exits without reading its
/// input is judged by its exit status, not by the broken pipe.
async fn write_body<W: AsyncWrite + Unpin>(stdin: &mut W, body: &[u8]) -> io::Result<()> {
    let written = async {
        stdin.write_all(body).await?;
        stdin.shutdown().await
    };
    match written.await {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

fn failure_status(code: Option<i32>) -> u16 {
    match code {
        Some(code) => 500 + code.clamp(0, 99) as u16,
        // Terminated by a signal
        None => 500,
    }
}

#[async_trait::async_trait]
impl Transport for CliTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let mut command = Command::new(&self.cli_path);
        command
            .args(self.args(&request))
            .stdin(if request.body.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(token) = &self.access_token {
            command.env("ABSTRACT_TOKEN", token);
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to launch CLI at {}", self.cli_path.display()))?;

        // Feed stdin while stdout and stderr drain, or a chatty CLI blocks on
        // a full pipe before it reads the body.
        let stdin = child.stdin.take();
        let body = request.body.as_ref().map(|body| body.to_string());
        let feed = async move {
            if let (Some(mut stdin), Some(body)) = (stdin, body) {
                write_body(&mut stdin, body.as_bytes())
                    .await
                    .context("Failed to write request body to CLI")?;
            }
            Ok::<_, anyhow::Error>(())
        };
        let wait = async {
            child
                .wait_with_output()
                .await
                .context("Failed to wait for CLI")
        };
        let ((), output) = tokio::try_join!(feed, wait)?;

        if output.status.success() {
            Ok(Response::new(200, output.stdout))
        } else {
            Ok(Response::new(failure_status(output.status.code()), output.stderr))
        }
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_layout() {
        let transport = CliTransport::new(PathBuf::from("abstract-cli"), &ClientConfig::default());
        let request = Request::get("projects")
            .query("filter", "active")
            .header("Abstract-Api-Version", "8");

        assert_eq!(
            transport.args(&request),
            vec![
                "request",
                "GET",
                "https://api.goabstract.com/projects",
                "--query",
                "filter=active",
                "--header",
                "Abstract-Api-Version:8",
            ]
        );
    }

    #[test]
    fn test_failure_status() {
        assert_eq!(failure_status(Some(1)), 501);
        assert_eq!(failure_status(Some(255)), 599);
        assert_eq!(failure_status(None), 500);
    }

    #[tokio::test]
    async fn test_missing_binary_is_transport_error() {
        let transport = CliTransport::new(
            PathBuf::from("/nonexistent/abstract-cli"),
            &ClientConfig::default(),
        );
        assert!(transport.send(Request::get("organizations")).await.is_err());
    }

    #[cfg(unix)]
    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("abstract-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn large_body() -> serde_json::Value {
        serde_json::json!({ "body": "x".repeat(256 * 1024) })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_returns_stdout_with_body_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let cli = script(
            &dir,
            "printf '%s|' \"$@\"\nprintf 'token=%s|' \"$ABSTRACT_TOKEN\"\ncat",
        );
        let transport = CliTransport::new(cli, &ClientConfig::default().with_access_token("secret"));

        let request = Request::post("comments", serde_json::json!({"body": "hi"})).header("K", "V");
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            response.text(),
            "request|POST|https://api.goabstract.com/comments|--header|K:V|token=secret|{\"body\":\"hi\"}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_returns_stderr_even_when_body_is_unread() {
        let dir = tempfile::tempdir().unwrap();
        let cli = script(&dir, "echo 'unknown command' >&2\nexit 2");
        let transport = CliTransport::new(cli, &ClientConfig::default());

        let response = transport
            .send(Request::post("comments", large_body()))
            .await
            .unwrap();

        assert_eq!(response.status, 502);
        assert_eq!(response.text().trim(), "unknown command");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_before_reading_stdin_completes() {
        let dir = tempfile::tempdir().unwrap();
        let cli = script(&dir, "head -c 200000 /dev/zero\ncat >/dev/null");
        let transport = CliTransport::new(cli, &ClientConfig::default());

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            transport.send(Request::post("comments", large_body())),
        )
        .await
        .expect("CLI exchange stalled")
        .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body.len(), 200_000);
    }
}
