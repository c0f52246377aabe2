use catalogue_core::db::open_db;
use catalogue_core::{
    load_products, LoadError, MemoryProductStore, Product, ProductStore, SqliteConnector,
    StoreConnector,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn fixture_products() -> Vec<Product> {
    vec![
        Product::new("sku1", "Robot", ["cat1", "toys"])
            .with_attribute("description", "Clockwork tin robot")
            .with_attribute("price", 12.5),
        Product::new("sku2", "Kite", ["cat2", "toys"])
            .with_attribute("description", "Paper kite for windy days"),
        Product::new("sku3", "Abacus", ["toys"]),
    ]
}

fn seeded_store(products: &[Product]) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");
    let mut conn = open_db(&path).unwrap();
    load_products(&mut conn, products).unwrap();
    (dir, path_string(&path))
}

fn path_string(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

async fn connect(target: &str) -> Arc<dyn ProductStore> {
    SqliteConnector.connect(target).await.unwrap()
}

#[tokio::test]
async fn find_all_returns_documents_in_storage_order() {
    let products = fixture_products();
    let (_dir, target) = seeded_store(&products);
    let store = connect(&target).await;

    let all = store.find_all().await.unwrap();
    assert_eq!(all, products);
}

#[tokio::test]
async fn find_by_sku_is_exact_match() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    let product = store.find_by_sku("sku1").await.unwrap().unwrap();
    assert_eq!(product.name, "Robot");
    assert_eq!(product.attributes["price"], serde_json::json!(12.5));

    assert!(store.find_by_sku("SKU1").await.unwrap().is_none());
    assert!(store.find_by_sku("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn category_filter_is_sorted_by_name() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    let toys = store.find_by_category_sorted_by_name("toys").await.unwrap();
    let names = toys.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["Abacus", "Kite", "Robot"]);

    let cat1 = store.find_by_category_sorted_by_name("cat1").await.unwrap();
    assert_eq!(cat1.len(), 1);
    assert_eq!(cat1[0].sku, "sku1");

    assert!(store
        .find_by_category_sorted_by_name("cat9")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn distinct_categories_are_unique() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    let categories = store.distinct_categories().await.unwrap();
    let unique = categories.iter().cloned().collect::<HashSet<_>>();
    assert_eq!(categories.len(), unique.len());
    assert_eq!(
        unique,
        HashSet::from(["cat1", "cat2", "toys"].map(String::from))
    );
}

#[tokio::test]
async fn text_search_matches_name_or_description() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    let hits = store.text_search("windy").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].sku, "sku2");

    let hits = store.text_search("robot kite").await.unwrap();
    let skus = hits.iter().map(|p| p.sku.as_str()).collect::<HashSet<_>>();
    assert_eq!(skus, HashSet::from(["sku1", "sku2"]));

    assert!(store.text_search("zeppelin").await.unwrap().is_empty());
}

#[tokio::test]
async fn punctuated_terms_match_as_phrases_in_both_stores() {
    let products = fixture_products();
    let (_dir, target) = seeded_store(&products);
    let sqlite = connect(&target).await;
    let memory = MemoryProductStore::new(products);

    for (query, expected) in [
        ("tin-robot", vec!["sku1"]),
        ("robot-tin", vec![]),
        ("paper-kite", vec!["sku2"]),
        ("kite-robot", vec![]),
        ("windy tin-robot", vec!["sku1", "sku2"]),
    ] {
        for store in [sqlite.as_ref(), &memory as &dyn ProductStore] {
            let skus = store
                .text_search(query)
                .await
                .unwrap()
                .into_iter()
                .map(|product| product.sku)
                .collect::<HashSet<_>>();
            let expected = expected
                .iter()
                .map(|sku| sku.to_string())
                .collect::<HashSet<_>>();
            assert_eq!(skus, expected, "query `{query}`");
        }
    }
}

#[tokio::test]
async fn text_search_tolerates_fts_syntax_characters() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    assert!(store.text_search("\"unterminated").await.is_ok());
    assert!(store.text_search("a:b OR NOT").await.is_ok());
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let (_dir, target) = seeded_store(&fixture_products());
    let store = connect(&target).await;

    let first = serde_json::to_vec(&store.find_all().await.unwrap()).unwrap();
    let second = serde_json::to_vec(&store.find_all().await.unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn reloading_a_product_replaces_its_document_and_index_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");
    let mut conn = open_db(&path).unwrap();
    load_products(&mut conn, &fixture_products()).unwrap();

    let updated =
        Product::new("sku1", "Robot", ["cat3"]).with_attribute("description", "Solar robot");
    load_products(&mut conn, &[updated]).unwrap();

    let store = connect(&path_string(&path)).await;
    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].categories, ["cat3"]);

    assert!(store.text_search("clockwork").await.unwrap().is_empty());
    assert_eq!(store.text_search("solar").await.unwrap().len(), 1);
    assert!(store
        .find_by_category_sorted_by_name("cat1")
        .await
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_batch_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalogue.db");
    let mut conn = open_db(&path).unwrap();

    let batch = vec![
        Product::new("sku1", "Robot", ["toys"]),
        Product::new("", "Nameless", ["toys"]),
    ];
    let err = load_products(&mut conn, &batch).unwrap_err();
    assert!(matches!(err, LoadError::Validation(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
