use std::path::Path;

use crate::config::environment::{MongoEnv, AUTH_DATABASE};
use crate::services::process::{ToolCommand, ToolError};

pub const PROGRAM: &str = "mongorestore";

/// Builds the `mongorestore` invocation for a gzip dump, dropping collections first.
pub fn restore_command(env: &MongoEnv, dump_dir: &Path) -> ToolCommand {
    ToolCommand::new(PROGRAM)
        .arg("-h")
        .arg(env.host.as_str())
        .arg("-u")
        .arg(env.username.as_str())
        .arg("-p")
        .secret_arg(env.password.as_str())
        .arg(format!("--authenticationDatabase={AUTH_DATABASE}"))
        .arg("--gzip")
        .arg("--drop")
        .arg(dump_dir)
}

/// Runs the restore and hands back the tool's exit code untouched.
pub async fn restore(command: &ToolCommand) -> Result<i32, ToolError> {
    let source = command
        .args
        .last()
        .map(|arg| arg.to_string_lossy())
        .unwrap_or_default();
    tracing::info!(%source, "restoring dump");

    let code = command.run().await?;
    if code != 0 {
        tracing::error!(code, "{} exited with failure", command.program_name());
    }
    Ok(code)
}
