//! Docker-backed sandbox
//!
//! Each test case run gets a fresh container: no network, a hard memory and
//! pids cap, and a `/scratch` workspace that is destroyed together with the
//! container. Wall-clock preemption is layered: `timeout` inside the
//! container handles a well-behaved slow program, and an outer
//! `tokio::time::timeout` force-removes the container if the exec stream
//! itself hangs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use bollard::{
    Docker,
    container::LogOutput,
    exec::{CreateExecOptions, StartExecResults},
    models::ContainerCreateBody,
    query_parameters::{CreateContainerOptionsBuilder, RemoveContainerOptionsBuilder},
};
use futures::StreamExt;
use uuid::Uuid;

use crate::constants::{SANDBOX_PIDS_LIMIT, WALL_CLOCK_GRACE_MS};

use super::sandbox::{RunReport, RunRequest, RunStatus, Sandbox, SandboxFailure};

const WORKSPACE: &str = "/scratch";

/// Sandbox implementation backed by per-run Docker containers
pub struct DockerSandbox {
    docker: Docker,
}

/// Output of one exec inside the container
struct ExecOutput {
    stdout: String,
    stderr: String,
    exit_code: i32,
}

impl DockerSandbox {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    async fn create_container(&self, request: &RunRequest<'_>) -> Result<String, SandboxFailure> {
        let container_name = format!("codearena-{}-{}", request.submission_id, Uuid::new_v4());

        let options = CreateContainerOptionsBuilder::default()
            .name(&container_name)
            .build();

        let host_config = bollard::models::HostConfig {
            memory: Some((request.limits.memory_mb * 1024 * 1024) as i64),
            memory_swap: Some((request.limits.memory_mb * 1024 * 1024) as i64),
            cpu_period: Some(100_000),
            cpu_quota: Some(100_000), // 1 CPU
            network_mode: Some("none".to_string()),
            pids_limit: Some(SANDBOX_PIDS_LIMIT),
            ..Default::default()
        };

        let config = ContainerCreateBody {
            image: Some(request.language.container_image().to_string()),
            tty: Some(true),
            open_stdin: Some(true),
            host_config: Some(host_config),
            working_dir: Some(WORKSPACE.to_string()),
            env: Some(vec!["LANG=C.UTF-8".to_string()]),
            labels: Some({
                let mut labels = HashMap::new();
                labels.insert(
                    "codearena.submission".to_string(),
                    request.submission_id.to_string(),
                );
                labels
            }),
            ..Default::default()
        };

        let container = self.docker.create_container(Some(options), config).await?;

        self.docker
            .start_container(
                &container.id,
                None::<bollard::query_parameters::StartContainerOptions>,
            )
            .await?;

        Ok(container.id)
    }

    async fn remove_container(&self, container_id: &str) -> Result<(), SandboxFailure> {
        let options = RemoveContainerOptionsBuilder::default().force(true).build();
        self.docker
            .remove_container(container_id, Some(options))
            .await?;
        Ok(())
    }

    /// Write a file into the container workspace
    async fn write_file(
        &self,
        container_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<(), SandboxFailure> {
        // base64 round-trip survives arbitrary source bytes
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let cmd = format!("echo '{}' | base64 -d > {}/{}", encoded, WORKSPACE, file_name);

        let output = self.exec(container_id, &cmd).await?;
        if output.exit_code != 0 {
            return Err(SandboxFailure(format!(
                "failed to write {} into sandbox: {}",
                file_name, output.stderr
            )));
        }
        Ok(())
    }

    /// Execute a command in the container and collect its output
    async fn exec(&self, container_id: &str, cmd: &str) -> Result<ExecOutput, SandboxFailure> {
        let exec = self
            .docker
            .create_exec(
                container_id,
                CreateExecOptions {
                    cmd: Some(vec!["/bin/sh", "-c", cmd]),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        let output = self.docker.start_exec(&exec.id, None).await?;

        let mut stdout = String::new();
        let mut stderr = String::new();

        if let StartExecResults::Attached { mut output, .. } = output {
            while let Some(msg) = output.next().await {
                match msg? {
                    LogOutput::StdOut { message } => {
                        stdout.push_str(&String::from_utf8_lossy(&message));
                    }
                    LogOutput::StdErr { message } => {
                        stderr.push_str(&String::from_utf8_lossy(&message));
                    }
                    _ => {}
                }
            }
        }

        let inspect = self.docker.inspect_exec(&exec.id).await?;
        let exit_code = inspect.exit_code.unwrap_or(-1) as i32;

        Ok(ExecOutput {
            stdout,
            stderr,
            exit_code,
        })
    }

    async fn run_inner(
        &self,
        container_id: &str,
        request: &RunRequest<'_>,
    ) -> Result<RunReport, SandboxFailure> {
        let grace = Duration::from_millis(WALL_CLOCK_GRACE_MS);

        self.write_file(container_id, request.language.source_file(), request.code)
            .await?;

        if let Some(compile_cmd) = request.language.compile_command() {
            let compile_secs = request.limits.compile_wall_clock.as_secs_f64().max(1.0);
            let cmd = format!(
                "cd {} && timeout {:.1}s sh -c '{}' 2>&1",
                WORKSPACE, compile_secs, compile_cmd
            );
            let output = tokio::time::timeout(
                request.limits.compile_wall_clock + grace,
                self.exec(container_id, &cmd),
            )
            .await
            .map_err(|_| SandboxFailure("compile step hung past its limit".to_string()))??;

            if output.exit_code != 0 {
                return Ok(RunReport::compile_failed(output.stdout));
            }
        }

        self.write_file(container_id, "input.txt", request.input)
            .await?;

        let run_secs = request.limits.wall_clock.as_secs_f64().max(0.1);
        // /usr/bin/time reports peak memory on stderr, keeping stdout clean
        let cmd = format!(
            "cd {} && timeout {:.1}s /usr/bin/time -v sh -c '{} < input.txt'",
            WORKSPACE,
            run_secs,
            request.language.run_command()
        );

        let started = Instant::now();
        let execution =
            tokio::time::timeout(request.limits.wall_clock + grace, self.exec(container_id, &cmd))
                .await;
        let wall_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        let output = match execution {
            // the exec stream hung; the caller force-removes the container
            Err(_) => {
                return Ok(RunReport {
                    status: RunStatus::TimedOut,
                    stdout: String::new(),
                    stderr: None,
                    compile_log: None,
                    wall_time_ms,
                    memory_kb: 0,
                });
            }
            Ok(result) => result?,
        };

        let memory_kb = parse_memory_usage(&output.stderr);

        let status = match output.exit_code {
            124 => RunStatus::TimedOut,
            137 => RunStatus::OutOfMemory, // SIGKILL from the memory cgroup
            code => RunStatus::Completed { exit_code: code },
        };

        Ok(RunReport {
            status,
            stdout: output.stdout,
            stderr: if output.stderr.is_empty() {
                None
            } else {
                Some(output.stderr)
            },
            compile_log: None,
            wall_time_ms,
            memory_kb,
        })
    }
}

#[async_trait]
impl Sandbox for DockerSandbox {
    async fn run(&self, request: RunRequest<'_>) -> Result<RunReport, SandboxFailure> {
        let container_id = self.create_container(&request).await?;

        let result = self.run_inner(&container_id, &request).await;

        // Force removal destroys the scratch workspace and kills anything
        // still running, regardless of how the run ended
        if let Err(e) = self.remove_container(&container_id).await {
            tracing::warn!(container = %container_id, "failed to remove sandbox container: {}", e);
        }

        result
    }
}

/// Parse peak memory from `/usr/bin/time -v` output
fn parse_memory_usage(time_output: &str) -> i64 {
    for line in time_output.lines() {
        if line.contains("Maximum resident set size") {
            if let Some(kb_str) = line.split(':').nth(1) {
                if let Ok(kb) = kb_str.trim().parse::<i64>() {
                    return kb;
                }
            }
        }
    }
    0
}
