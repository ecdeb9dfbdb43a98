//! Registry tests for the indicio service backed by in-memory
//! SurrealDB repositories.

use chrono::{TimeZone, Utc};
use dicri_casework::{ExpedienteService, IndicioService};
use dicri_core::error::CoreError;
use dicri_core::models::expediente::CreateExpediente;
use dicri_core::models::indicio::{CreateIndicio, UpdateIndicio};
use dicri_db::repository::{
    SurrealExpedienteRepository, SurrealIndicioRepository, SurrealRechazoRepository,
};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

struct Fixture {
    expedientes: ExpedienteService<SurrealExpedienteRepository<Db>, SurrealRechazoRepository<Db>>,
    indicios: IndicioService<SurrealIndicioRepository<Db>, SurrealExpedienteRepository<Db>>,
    expediente_id: Uuid,
    tecnico_id: Uuid,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dicri_db::run_migrations(&db).await.unwrap();

    let expedientes = ExpedienteService::new(
        SurrealExpedienteRepository::new(db.clone()),
        SurrealRechazoRepository::new(db.clone()),
    );
    let indicios = IndicioService::new(
        SurrealIndicioRepository::new(db.clone()),
        SurrealExpedienteRepository::new(db),
    );

    let tecnico_id = Uuid::new_v4();
    let exp = expedientes
        .create(CreateExpediente {
            numero: "EXP-001".into(),
            descripcion: None,
            fecha_registro: Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap(),
            tecnico_id,
        })
        .await
        .unwrap();

    Fixture {
        expedientes,
        indicios,
        expediente_id: exp.id,
        tecnico_id,
    }
}

fn nuevo(expediente_id: Uuid, tecnico_id: Uuid, descripcion: &str) -> CreateIndicio {
    CreateIndicio {
        expediente_id,
        objeto: Some("Casquillo".into()),
        descripcion: descripcion.into(),
        color: Some("dorado".into()),
        tamano: Some("9mm".into()),
        peso: Some(Decimal::new(830, 2)),
        ubicacion: Some("pasillo".into()),
        tecnico_id,
    }
}

#[tokio::test]
async fn create_requires_existing_expediente() {
    let fx = setup().await;

    let err = fx
        .indicios
        .create(nuevo(Uuid::new_v4(), fx.tecnico_id, "Casquillo 9mm"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn create_requires_descripcion() {
    let fx = setup().await;

    let err = fx
        .indicios
        .create(nuevo(fx.expediente_id, fx.tecnico_id, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

#[tokio::test]
async fn peso_is_normalized_to_two_decimals() {
    let fx = setup().await;

    let mut input = nuevo(fx.expediente_id, fx.tecnico_id, "Casquillo");
    input.peso = Some(Decimal::new(12345, 3)); // 12.345
    let creado = fx.indicios.create(input).await.unwrap();

    // Banker's rounding at 2 fraction digits.
    assert_eq!(creado.peso, Some(Decimal::new(1234, 2)));
}

#[tokio::test]
async fn listing_scopes_to_one_expediente() {
    let fx = setup().await;

    let otro = fx
        .expedientes
        .create(CreateExpediente {
            numero: "EXP-002".into(),
            descripcion: None,
            fecha_registro: Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap(),
            tecnico_id: fx.tecnico_id,
        })
        .await
        .unwrap();

    fx.indicios
        .create(nuevo(fx.expediente_id, fx.tecnico_id, "Casquillo"))
        .await
        .unwrap();
    fx.indicios
        .create(nuevo(otro.id, fx.tecnico_id, "Fibra"))
        .await
        .unwrap();

    let propios = fx.indicios.list_by_expediente(fx.expediente_id).await.unwrap();
    assert_eq!(propios.len(), 1);
    assert_eq!(propios[0].descripcion, "Casquillo");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let fx = setup().await;

    let creado = fx
        .indicios
        .create(nuevo(fx.expediente_id, fx.tecnico_id, "Casquillo"))
        .await
        .unwrap();

    let actualizado = fx
        .indicios
        .update(
            creado.id,
            UpdateIndicio {
                ubicacion: Some("bodega".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(actualizado.ubicacion.as_deref(), Some("bodega"));
    assert_eq!(actualizado.descripcion, "Casquillo");
    assert_eq!(actualizado.color.as_deref(), Some("dorado"));
}

#[tokio::test]
async fn descripcion_cannot_be_blanked() {
    let fx = setup().await;

    let creado = fx
        .indicios
        .create(nuevo(fx.expediente_id, fx.tecnico_id, "Casquillo"))
        .await
        .unwrap();

    let err = fx
        .indicios
        .update(
            creado.id,
            UpdateIndicio {
                descripcion: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

#[tokio::test]
async fn remove_unknown_indicio_is_not_found() {
    let fx = setup().await;

    let err = fx.indicios.remove(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn remove_then_get_is_not_found() {
    let fx = setup().await;

    let creado = fx
        .indicios
        .create(nuevo(fx.expediente_id, fx.tecnico_id, "Casquillo"))
        .await
        .unwrap();
    fx.indicios.remove(creado.id).await.unwrap();

    let err = fx.indicios.get(creado.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
