use std::env;
use std::path::PathBuf;

/// Authentication database the credentials are checked against.
pub const AUTH_DATABASE: &str = "admin";

/// Dated snapshot restored by `nmdcdb-restore`, relative to `$HOME`.
pub const DUMP_SNAPSHOT: &str = "nmdcdb-mongodump/2021-12-06/nmdcdb";

/// Root under `$HOME` where `nmdcdb-mongodump` writes dated exports.
pub const DUMP_ROOT: &str = "nmdcdb-mongodump";

/// Connection values read from `MONGO_*` variables.
///
/// Unset variables are kept as empty strings; nothing here validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MongoEnv {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
}

impl MongoEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                tracing::warn!(variable = key, "environment variable not set, using empty value");
                String::new()
            })
        };

        Self {
            host: read("MONGO_HOST"),
            username: read("MONGO_USERNAME"),
            password: read("MONGO_PASSWORD"),
            dbname: lookup("MONGO_DBNAME").unwrap_or_default(),
        }
    }

    /// Host with any `mongodb://` scheme removed, as `mongodump --host` expects.
    pub fn bare_host(&self) -> &str {
        self.host
            .strip_prefix("mongodb://")
            .unwrap_or(&self.host)
    }
}

/// Home directory of the invoking user, falling back to the current directory.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn dump_snapshot_dir() -> PathBuf {
    home_dir().join(DUMP_SNAPSHOT)
}
