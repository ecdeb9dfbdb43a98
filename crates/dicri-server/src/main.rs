//! DICRI Server — Application entry point.

use std::env;

use dicri_auth::{AuthConfig, AuthService, DirectoryService, UserAdminService};
use dicri_casework::{ExpedienteService, IndicioService};
use dicri_db::repository::{
    SurrealExpedienteRepository, SurrealIndicioRepository, SurrealPermisoRepository,
    SurrealRechazoRepository, SurrealRolRepository, SurrealUsuarioRepository,
};
use dicri_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn auth_config_from_env() -> AuthConfig {
    let mut config = AuthConfig::default();
    if let Ok(secret) = env::var("JWT_SECRET") {
        config.jwt_secret = secret;
    }
    if let Ok(rounds) = env::var("BCRYPT_ROUNDS") {
        if let Ok(cost) = rounds.parse() {
            config.bcrypt_cost = cost;
        }
    }
    config
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dicri=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting DICRI server...");

    let db_config = DbConfig::from_env();
    let manager = match DbManager::connect(&db_config).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = dicri_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Migration run failed");
        std::process::exit(1);
    }

    let db = manager.client().clone();
    let auth_config = auth_config_from_env();

    let _auth = AuthService::new(
        SurrealUsuarioRepository::new(db.clone()),
        SurrealRolRepository::new(db.clone()),
        auth_config.clone(),
    );
    let _users = UserAdminService::new(SurrealUsuarioRepository::new(db.clone()), auth_config);
    let _directory = DirectoryService::new(
        SurrealUsuarioRepository::new(db.clone()),
        SurrealRolRepository::new(db.clone()),
        SurrealPermisoRepository::new(db.clone()),
    );
    let _expedientes = ExpedienteService::new(
        SurrealExpedienteRepository::new(db.clone()),
        SurrealRechazoRepository::new(db.clone()),
    );
    let _indicios = IndicioService::new(
        SurrealIndicioRepository::new(db.clone()),
        SurrealExpedienteRepository::new(db),
    );

    // TODO: mount the HTTP router over these services once the
    // transport layer lands.

    tracing::info!("DICRI server stopped.");
}
