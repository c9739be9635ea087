use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};

use crate::config::environment::{MongoEnv, AUTH_DATABASE};

/// Client options for `env`, with credentials set directly rather than encoded into the URI.
pub async fn client_options(env: &MongoEnv) -> mongodb::error::Result<ClientOptions> {
    let mut options = ClientOptions::parse(format!("mongodb://{}", env.bare_host())).await?;

    if !env.username.is_empty() {
        options.credential = Some(
            Credential::builder()
                .username(env.username.clone())
                .password(env.password.clone())
                .source(AUTH_DATABASE.to_string())
                .build(),
        );
    }

    Ok(options)
}

pub async fn connect(env: &MongoEnv) -> mongodb::error::Result<Database> {
    let client = Client::with_options(client_options(env).await?)?;

    Ok(client.database(&env.dbname))
}
