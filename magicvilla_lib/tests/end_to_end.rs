use magicvilla_lib::magicvilla_api::Error;
use magicvilla_lib::types::{HttpStatusCode, PatchOperation, VillaCreateDto, VillaUpdateDto};
use magicvilla_lib::{serve_on, AppState, Db, VillaService};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct RunningServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    async fn start() -> Self {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve_on(listener, AppState::new(db), async {
                rx.await.ok();
            })
            .await
            .expect("server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
            handle,
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.handle.await.unwrap();
    }
}

fn new_villa(name: &str) -> VillaCreateDto {
    VillaCreateDto {
        name: name.to_string(),
        details: Some("Lagoon side".to_string()),
        rate: 150.0,
        sqft: 400,
        occupancy: 2,
        image_url: None,
        amenity: None,
    }
}

#[tokio::test]
async fn full_crud_cycle_through_service() {
    let server = RunningServer::start().await;
    let service = VillaService::with_base_url(&server.base_url)
        .unwrap()
        .with_token(Some("ignored-by-server".to_string()));

    let created = service.create(&new_villa("Beach House")).await.unwrap();
    assert_eq!(created.status_code, HttpStatusCode::Created);
    let villa = created.result.unwrap();
    assert_eq!(villa.name, "Beach House");

    let listed = service.get_all().await.unwrap();
    assert_eq!(listed.result.unwrap().len(), 1);

    let mut update = VillaUpdateDto::from(villa.clone());
    update.occupancy = 6;
    let updated = service.update(&update).await.unwrap();
    assert!(updated.is_success);
    assert_eq!(updated.status_code, HttpStatusCode::NoContent);

    let patched = service
        .patch(villa.id, &[PatchOperation::replace("/amenity", json!("Hot tub"))])
        .await
        .unwrap();
    assert!(patched.is_success);

    let fetched = service.get(villa.id).await.unwrap().result.unwrap();
    assert_eq!(fetched.occupancy, 6);
    assert_eq!(fetched.amenity.as_deref(), Some("Hot tub"));

    let deleted = service.delete(villa.id).await.unwrap();
    assert!(deleted.is_success);

    let err = service.get(villa.id).await.unwrap_err();
    assert!(matches!(err, Error::ClientFailure { status: 404, .. }));
    let envelope = err.envelope().unwrap();
    assert_eq!(envelope.status_code, HttpStatusCode::BadRequest);
    assert!(!envelope.is_success);

    drop(service);
    server.stop().await;
}

#[tokio::test]
async fn validation_failure_surfaces_as_client_failure() {
    let server = RunningServer::start().await;
    let service = VillaService::with_base_url(&server.base_url).unwrap();

    let err = service.create(&new_villa("")).await.unwrap_err();
    assert!(matches!(err, Error::ClientFailure { status: 400, .. }));
    assert_eq!(err.messages(), vec!["The Name field is required.".to_string()]);

    drop(service);
    server.stop().await;
}

#[tokio::test]
async fn stopped_server_yields_failure_value() {
    let server = RunningServer::start().await;
    let base_url = server.base_url.clone();
    server.stop().await;

    let service = VillaService::with_base_url(&base_url).unwrap();
    let resp = service.get_all().await.unwrap();
    assert!(!resp.is_success);
    assert_eq!(resp.error_messages.len(), 1);
}
