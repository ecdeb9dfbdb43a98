//! Integration tests for the user, role and permission repositories
//! using in-memory SurrealDB.

use dicri_core::error::CoreError;
use dicri_core::models::permiso::CreatePermiso;
use dicri_core::models::rol::{CreateRol, UpdateRol};
use dicri_core::models::usuario::{CreateUsuario, UpdateUsuario};
use dicri_core::repository::{PermisoRepository, RolRepository, UsuarioRepository};
use dicri_db::repository::{
    SurrealPermisoRepository, SurrealRolRepository, SurrealUsuarioRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dicri_db::run_migrations(&db).await.unwrap();
    db
}

fn nueva_cuenta(nombre: &str, email: &str) -> CreateUsuario {
    CreateUsuario {
        nombre: nombre.into(),
        email: email.into(),
        password_hash: "$2b$04$abcdefghijklmnopqrstuvwxyz012345678901234567890123456".into(),
        activo: true,
    }
}

#[tokio::test]
async fn create_and_get_usuario() {
    let db = setup().await;
    let repo = SurrealUsuarioRepository::new(db);

    let creado = repo
        .create(nueva_cuenta("Ana Pérez", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    assert_eq!(creado.nombre, "Ana Pérez");
    assert!(creado.activo);

    let leido = repo.get_by_id(creado.id).await.unwrap();
    assert_eq!(leido.email, "ana@dicri.gob.gt");

    let por_email = repo.get_by_email("ana@dicri.gob.gt").await.unwrap();
    assert_eq!(por_email.id, creado.id);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let db = setup().await;
    let repo = SurrealUsuarioRepository::new(db);

    repo.create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    let err = repo
        .create(nueva_cuenta("Otra Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }), "got {err:?}");
}

#[tokio::test]
async fn get_unknown_usuario_is_not_found() {
    let db = setup().await;
    let repo = SurrealUsuarioRepository::new(db);

    let err = repo.get_by_id(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let err = repo.get_by_email("nadie@dicri.gob.gt").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn update_usuario_partial_fields() {
    let db = setup().await;
    let repo = SurrealUsuarioRepository::new(db);

    let creado = repo
        .create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();

    let actualizado = repo
        .update(
            creado.id,
            UpdateUsuario {
                activo: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!actualizado.activo);
    // Untouched fields keep their values.
    assert_eq!(actualizado.nombre, "Ana");
    assert_eq!(actualizado.email, "ana@dicri.gob.gt");
}

#[tokio::test]
async fn update_password_persists_new_hash() {
    let db = setup().await;
    let repo = SurrealUsuarioRepository::new(db);

    let creado = repo
        .create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    repo.update_password(creado.id, "$2b$04$nuevohashnuevohashnuevohashnuevohashnuevohash0".into())
        .await
        .unwrap();

    let leido = repo.get_by_id(creado.id).await.unwrap();
    assert!(leido.password_hash.starts_with("$2b$04$nuevo"));
}

#[tokio::test]
async fn assign_and_remove_roles() {
    let db = setup().await;
    let usuarios = SurrealUsuarioRepository::new(db.clone());
    let roles = SurrealRolRepository::new(db);

    let usuario = usuarios
        .create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    let tecnico = roles
        .create(CreateRol {
            nombre: "TECNICO".into(),
        })
        .await
        .unwrap();
    let coordinador = roles
        .create(CreateRol {
            nombre: "COORDINADOR".into(),
        })
        .await
        .unwrap();

    usuarios.assign_rol(usuario.id, tecnico.id).await.unwrap();
    usuarios
        .assign_rol(usuario.id, coordinador.id)
        .await
        .unwrap();

    let mut nombres: Vec<String> = usuarios
        .get_roles(usuario.id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.nombre)
        .collect();
    nombres.sort();
    assert_eq!(nombres, vec!["COORDINADOR", "TECNICO"]);

    usuarios.remove_rol(usuario.id, tecnico.id).await.unwrap();
    let restantes = usuarios.get_roles(usuario.id).await.unwrap();
    assert_eq!(restantes.len(), 1);
    assert_eq!(restantes[0].nombre, "COORDINADOR");

    // Removing an assignment that no longer exists is not an error.
    usuarios.remove_rol(usuario.id, tecnico.id).await.unwrap();
}

#[tokio::test]
async fn deleting_usuario_removes_assignments() {
    let db = setup().await;
    let usuarios = SurrealUsuarioRepository::new(db.clone());
    let roles = SurrealRolRepository::new(db.clone());

    let usuario = usuarios
        .create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    let rol = roles
        .create(CreateRol {
            nombre: "TECNICO".into(),
        })
        .await
        .unwrap();
    usuarios.assign_rol(usuario.id, rol.id).await.unwrap();

    usuarios.delete(usuario.id).await.unwrap();

    let err = usuarios.get_by_id(usuario.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let mut result = db.query("SELECT * FROM tiene_rol").await.unwrap();
    let edges: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert!(edges.is_empty());
}

#[tokio::test]
async fn rol_crud_and_unique_nombre() {
    let db = setup().await;
    let repo = SurrealRolRepository::new(db);

    let rol = repo
        .create(CreateRol {
            nombre: "TECNICO".into(),
        })
        .await
        .unwrap();

    let err = repo
        .create(CreateRol {
            nombre: "TECNICO".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    let renombrado = repo
        .update(
            rol.id,
            UpdateRol {
                nombre: Some("PERITO".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renombrado.nombre, "PERITO");

    repo.delete(rol.id).await.unwrap();
    let err = repo.get_by_id(rol.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn grant_and_revoke_permisos() {
    let db = setup().await;
    let roles = SurrealRolRepository::new(db.clone());
    let permisos = SurrealPermisoRepository::new(db);

    let rol = roles
        .create(CreateRol {
            nombre: "COORDINADOR".into(),
        })
        .await
        .unwrap();
    let aprobar = permisos
        .create(CreatePermiso {
            nombre: "EXPEDIENTES_APROBAR".into(),
        })
        .await
        .unwrap();
    let rechazar = permisos
        .create(CreatePermiso {
            nombre: "EXPEDIENTES_RECHAZAR".into(),
        })
        .await
        .unwrap();

    roles.grant_permiso(rol.id, aprobar.id).await.unwrap();
    roles.grant_permiso(rol.id, rechazar.id).await.unwrap();

    let mut nombres: Vec<String> = roles
        .get_permisos(rol.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.nombre)
        .collect();
    nombres.sort();
    assert_eq!(nombres, vec!["EXPEDIENTES_APROBAR", "EXPEDIENTES_RECHAZAR"]);

    roles.revoke_permiso(rol.id, aprobar.id).await.unwrap();
    let restantes = roles.get_permisos(rol.id).await.unwrap();
    assert_eq!(restantes.len(), 1);
    assert_eq!(restantes[0].nombre, "EXPEDIENTES_RECHAZAR");

    // Revoking an absent grant is a no-op.
    roles.revoke_permiso(rol.id, aprobar.id).await.unwrap();
}

#[tokio::test]
async fn deleting_rol_cascades_edges() {
    let db = setup().await;
    let usuarios = SurrealUsuarioRepository::new(db.clone());
    let roles = SurrealRolRepository::new(db.clone());
    let permisos = SurrealPermisoRepository::new(db.clone());

    let usuario = usuarios
        .create(nueva_cuenta("Ana", "ana@dicri.gob.gt"))
        .await
        .unwrap();
    let rol = roles
        .create(CreateRol {
            nombre: "COORDINADOR".into(),
        })
        .await
        .unwrap();
    let permiso = permisos
        .create(CreatePermiso {
            nombre: "EXPEDIENTES_APROBAR".into(),
        })
        .await
        .unwrap();

    usuarios.assign_rol(usuario.id, rol.id).await.unwrap();
    roles.grant_permiso(rol.id, permiso.id).await.unwrap();

    roles.delete(rol.id).await.unwrap();

    assert!(usuarios.get_roles(usuario.id).await.unwrap().is_empty());

    let mut result = db.query("SELECT * FROM otorga").await.unwrap();
    let grants: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert!(grants.is_empty());
}

#[tokio::test]
async fn permiso_unique_nombre_and_list() {
    let db = setup().await;
    let repo = SurrealPermisoRepository::new(db);

    repo.create(CreatePermiso {
        nombre: "INDICIOS_CREAR".into(),
    })
    .await
    .unwrap();
    repo.create(CreatePermiso {
        nombre: "EXPEDIENTES_VER".into(),
    })
    .await
    .unwrap();

    let err = repo
        .create(CreatePermiso {
            nombre: "INDICIOS_CREAR".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    let nombres: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.nombre)
        .collect();
    assert_eq!(nombres, vec!["EXPEDIENTES_VER", "INDICIOS_CREAR"]);
}
