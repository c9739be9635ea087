//! Run with: cargo run --bin nmdcdb-mongodump

use anyhow::Context;
use chrono::Utc;
use nmdcdb_restore::config::{
    database,
    environment::{home_dir, MongoEnv},
};
use nmdcdb_restore::services::mongodump::{self, DumpError, DumpPlan, ARCHIVE_NAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    nmdcdb_restore::init_tracing();

    let env = MongoEnv::from_env();

    tracing::info!("starting nmdcdb mongodump");
    let db = database::connect(&env)
        .await
        .context("failed to connect to MongoDB")?;
    tracing::info!(database = %env.dbname, "connected to database");

    let collections = mongodump::list_collections(&db)
        .await
        .context("failed to list collections")?;

    let archive = mongodump::dated_dir(&home_dir(), Utc::now()).join(ARCHIVE_NAME);
    let plan = DumpPlan::new(collections, archive);
    let all = plan.all_collections();
    tracing::info!(count = all.len(), collections = ?all, "filtering collections");
    tracing::info!(
        count = plan.included.len(),
        collections = ?plan.included,
        excluded = ?plan.excluded,
        "filtered collections"
    );

    match mongodump::dump(&plan, &plan.command(&env)).await {
        Ok(()) => {
            tracing::info!(archive = %plan.archive.display(), "dump complete");
            Ok(())
        }
        Err(e @ (DumpError::Failed { .. } | DumpError::Tool(_))) => {
            tracing::error!("{e}");
            std::process::exit(e.exit_code());
        }
        Err(e) => Err(e).context("dump failed"),
    }
}
