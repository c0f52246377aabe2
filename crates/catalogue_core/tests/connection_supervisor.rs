use catalogue_core::db::open_db;
use catalogue_core::{
    load_products, CatalogueError, CatalogueService, ConnectionState, ConnectionSupervisor,
    Product, SqliteConnector,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn supervisor_converges_once_the_store_is_provisioned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");
    let target = path.to_str().unwrap().to_string();

    let supervisor = Arc::new(ConnectionSupervisor::new(
        Arc::new(SqliteConnector),
        target,
        Duration::from_millis(20),
    ));
    let service = CatalogueService::new(supervisor.handle());

    let task = tokio::spawn({
        let supervisor = Arc::clone(&supervisor);
        async move { supervisor.supervise_forever().await }
    });

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(supervisor.current_state(), ConnectionState::Disconnected);
    assert!(matches!(
        service.list_all().await,
        Err(CatalogueError::DependencyUnavailable)
    ));

    let mut conn = open_db(&path).unwrap();
    load_products(&mut conn, &[Product::new("sku1", "Robot", ["cat1"])]).unwrap();
    drop(conn);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("supervisor should converge")
        .unwrap();

    assert_eq!(service.connection_state(), ConnectionState::Connected);
    assert!(supervisor.attempts() >= 2);
    let products = service.list_all().await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn state_reads_during_retry_are_never_partial() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");

    let supervisor = Arc::new(ConnectionSupervisor::new(
        Arc::new(SqliteConnector),
        path.to_str().unwrap(),
        Duration::from_millis(5),
    ));
    let handle = supervisor.handle();
    let task = tokio::spawn({
        let supervisor = Arc::clone(&supervisor);
        async move { supervisor.supervise_forever().await }
    });

    let reader = tokio::spawn(async move {
        loop {
            let state = handle.state();
            let store = handle.store();
            // A store observed after the flag must exist; the flag never regresses.
            if state == ConnectionState::Connected {
                assert!(store.is_some());
                assert_eq!(handle.state(), ConnectionState::Connected);
                return;
            }
            tokio::task::yield_now().await;
        }
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    drop(open_db(&path).unwrap());

    tokio::time::timeout(Duration::from_secs(5), async {
        task.await.unwrap();
        reader.await.unwrap();
    })
    .await
    .expect("reader should observe the connected state");
}
