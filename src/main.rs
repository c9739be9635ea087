//! Restores the dated nmdcdb snapshot with `mongorestore`, dropping collections first.
//!
//! Run with: cargo run --bin nmdcdb-restore

use nmdcdb_restore::config::environment::{dump_snapshot_dir, MongoEnv};
use nmdcdb_restore::services::mongorestore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    nmdcdb_restore::init_tracing();

    let env = MongoEnv::from_env();
    let command = mongorestore::restore_command(&env, &dump_snapshot_dir());

    let code = match mongorestore::restore(&command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
