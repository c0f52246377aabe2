use catalogue_core::db::migrations::latest_version;
use catalogue_core::db::{open_db, open_db_in_memory, open_db_read_only, DbError};
use catalogue_core::{load_products, Product};
use rusqlite::Connection;

const FTS_TRIGGERS: &[&str] = &[
    "products_fts_after_insert",
    "products_fts_after_delete",
    "products_fts_after_update",
];

#[test]
fn writer_open_provisions_documents_categories_and_text_index() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["products", "product_categories", "products_fts"] {
        assert_schema_object(&conn, "table", table);
    }
    for trigger in FTS_TRIGGERS {
        assert_schema_object(&conn, "trigger", trigger);
    }
}

#[test]
fn reprovisioning_keeps_loaded_products_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");

    let mut writer = open_db(&path).unwrap();
    load_products(
        &mut writer,
        &[Product::new("sku1", "Robot", ["toys"]).with_attribute("description", "tin robot")],
    )
    .unwrap();
    drop(writer);
    drop(open_db(&path).unwrap());

    let reader = open_db_read_only(path.to_str().unwrap()).unwrap();
    let indexed: i64 = reader
        .query_row(
            "SELECT COUNT(*) FROM products_fts WHERE products_fts MATCH 'robot'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexed, 1);
}

#[test]
fn newer_schema_is_rejected_by_writer_and_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let errors = [
        open_db(&path).unwrap_err(),
        open_db_read_only(path.to_str().unwrap()).unwrap_err(),
    ];
    for err in errors {
        match err {
            DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => {
                assert_eq!(db_version, 999);
                assert_eq!(latest_supported, latest_version());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn read_only_open_fails_for_missing_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    let err = open_db_read_only(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
    assert!(!path.exists(), "read-only open must not create the store");
}

#[test]
fn read_only_open_fails_until_schema_is_current() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path).unwrap();

    let err = open_db_read_only(path.to_str().unwrap()).unwrap_err();
    match err {
        DbError::SchemaNotReady {
            db_version,
            expected,
        } => {
            assert_eq!(db_version, 0);
            assert_eq!(expected, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    drop(open_db(&path).unwrap());
    let conn = open_db_read_only(path.to_str().unwrap()).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn read_only_connection_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");
    drop(open_db(&path).unwrap());

    let conn = open_db_read_only(path.to_str().unwrap()).unwrap();
    let result = conn.execute(
        "INSERT INTO products (sku, name, document) VALUES ('x', 'y', '{}')",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2);",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
