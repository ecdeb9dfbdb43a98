//! SurrealDB connection setup for the DICRI backend.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Connection settings for the DICRI database.
///
/// Every field has a local-development default and a `SURREAL_*`
/// environment override, mirroring how the rest of the backend is
/// configured.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address of the SurrealDB node, host:port.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "dicri".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read `SURREAL_URL`, `SURREAL_NS`, `SURREAL_DB`, `SURREAL_USER`
    /// and `SURREAL_PASS`, keeping the default for any that is unset.
    pub fn from_env() -> Self {
        Self::default().overridden_by(|key| env::var(key).ok())
    }

    fn overridden_by(self, get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            url: get("SURREAL_URL").unwrap_or(self.url),
            namespace: get("SURREAL_NS").unwrap_or(self.namespace),
            database: get("SURREAL_DB").unwrap_or(self.database),
            username: get("SURREAL_USER").unwrap_or(self.username),
            password: get("SURREAL_PASS").unwrap_or(self.password),
        }
    }
}

/// Owns the live SurrealDB session used by the repositories.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open a WebSocket session, sign in as root, and select the
    /// configured namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "abriendo sesión SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("sesión SurrealDB lista");

        Ok(Self { db })
    }

    /// The client handle repositories are built over.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_dev() {
        let config = DbConfig::default();
        assert_eq!(config.url, "127.0.0.1:8000");
        assert_eq!(config.namespace, "dicri");
        assert_eq!(config.database, "main");
    }

    #[test]
    fn env_overrides_replace_only_set_keys() {
        let config = DbConfig::default().overridden_by(|key| match key {
            "SURREAL_URL" => Some("db.interno:9000".into()),
            "SURREAL_PASS" => Some("clave-fuerte".into()),
            _ => None,
        });
        assert_eq!(config.url, "db.interno:9000");
        assert_eq!(config.password, "clave-fuerte");
        // Unset keys keep their defaults.
        assert_eq!(config.namespace, "dicri");
        assert_eq!(config.username, "root");
    }
}
