use std::borrow::Cow;
use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;

/// Exit status a shell reports when the program cannot be found.
pub const SPAWN_FAILED_EXIT_CODE: i32 = 127;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::Spawn { .. } => SPAWN_FAILED_EXIT_CODE,
            ToolError::Wait { .. } => 1,
        }
    }
}

/// An external utility invocation: program name plus ordered arguments.
///
/// Arguments are kept as `OsString` so non-UTF-8 paths reach the tool unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    secrets: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds an argument that is masked in [`ToolCommand::redacted`].
    pub fn secret_arg(mut self, arg: impl Into<OsString>) -> Self {
        let arg = arg.into();
        if !arg.is_empty() {
            self.secrets.push(arg.clone());
        }
        self.args.push(arg);
        self
    }

    /// Swaps in a stand-in binary while keeping the assembled arguments.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Command line safe to log.
    pub fn redacted(&self) -> String {
        std::iter::once(self.program.to_string_lossy())
            .chain(self.args.iter().map(|arg| {
                if self.secrets.contains(arg) {
                    Cow::Borrowed("****")
                } else {
                    arg.to_string_lossy()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the program with inherited stdio and returns its exit code.
    pub async fn run(&self) -> Result<i32, ToolError> {
        tracing::info!(command = %self.redacted(), "running");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: self.program_name(),
                source,
            })?;

        let status = child.wait().await.map_err(|source| ToolError::Wait {
            program: self.program_name(),
            source,
        })?;

        let code = exit_code(status);
        tracing::info!(program = %self.program_name(), code, "finished");
        Ok(code)
    }
}

/// Maps a status to the code a shell would report for it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
