use chrono::{DateTime, Utc};
use mongodb::Database;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::environment::{MongoEnv, AUTH_DATABASE, DUMP_ROOT};
use crate::services::process::{ToolCommand, ToolError};

pub const PROGRAM: &str = "mongodump";

pub const ARCHIVE_NAME: &str = "nmdcdb.test.archive.gz";

/// Collections too large to include in routine exports.
pub const HEAVY_COLLECTIONS: [&str; 4] = [
    "functional_annotation_set",
    "genome_feature_set",
    "functional_annotation_set_prev",
    "functional_annotation_agg",
];

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("{program} exited with status {code}")]
    Failed { program: String, code: i32 },
}

impl DumpError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DumpError::Tool(err) => err.exit_code(),
            DumpError::Failed { code, .. } => *code,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPlan {
    pub included: Vec<String>,
    pub excluded: Vec<String>,
    pub archive: PathBuf,
}

impl DumpPlan {
    pub fn new<I>(collections: I, archive: PathBuf) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let (excluded, included): (BTreeSet<String>, BTreeSet<String>) = collections
            .into_iter()
            .partition(|name| HEAVY_COLLECTIONS.contains(&name.as_str()));

        Self {
            included: included.into_iter().collect(),
            excluded: excluded.into_iter().collect(),
            archive,
        }
    }

    /// Every listed collection, sorted, before the heavy ones are filtered out.
    pub fn all_collections(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .included
            .iter()
            .chain(self.excluded.iter())
            .cloned()
            .collect();
        all.sort();
        all
    }

    pub fn command(&self, env: &MongoEnv) -> ToolCommand {
        let mut cmd = ToolCommand::new(PROGRAM)
            .arg("--host")
            .arg(env.bare_host())
            .arg("-u")
            .arg(env.username.as_str())
            .arg("-p")
            .secret_arg(env.password.as_str())
            .arg("--authenticationDatabase")
            .arg(AUTH_DATABASE)
            .arg("-d")
            .arg(env.dbname.as_str())
            .arg("--gzip")
            .arg(archive_arg(&self.archive));

        for name in &self.excluded {
            cmd = cmd.arg(format!("--excludeCollection={name}"));
        }

        cmd
    }
}

fn archive_arg(archive: &Path) -> OsString {
    let mut arg = OsString::from("--archive=");
    arg.push(archive);
    arg
}

/// `<home>/nmdcdb-mongodump/<YYYY-MM-DD>` for the given instant, in UTC.
pub fn dated_dir(home: &Path, now: DateTime<Utc>) -> PathBuf {
    home.join(DUMP_ROOT).join(now.format("%Y-%m-%d").to_string())
}

pub async fn list_collections(db: &Database) -> Result<Vec<String>, DumpError> {
    Ok(db.list_collection_names().await?)
}

/// Creates the dated export directory and runs `command`, built from `plan`.
pub async fn dump(plan: &DumpPlan, command: &ToolCommand) -> Result<(), DumpError> {
    if let Some(dir) = plan.archive.parent() {
        tracing::info!(dir = %dir.display(), "ensuring export directory");
        tokio::fs::create_dir_all(dir).await?;
    }

    let code = command.run().await?;
    if code != 0 {
        return Err(DumpError::Failed {
            program: command.program_name(),
            code,
        });
    }

    Ok(())
}
