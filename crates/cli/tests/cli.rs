use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "products": [
        { "_id": "P1", "type": "simple", "title": "Shirt", "vendor": "Acme" },
        { "_id": "V1", "type": "variant", "ancestors": ["P1"], "sku": "SH-1" }
    ],
    "media": [
        { "_id": "M1", "metadata": { "productId": "P1", "workflow": "published", "priority": 1 } }
    ]
}"#;

fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("catalog.json");
    fs::write(&path, content).expect("write catalog");
    path
}

fn import(db_path: &Path, catalog: &Path) {
    let mut cmd = cargo_bin_cmd!("product-hash");
    cmd.arg("import")
        .arg(catalog)
        .arg("--db-path")
        .arg(db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported"));
}

fn run_json(args: &[&str], db_path: &Path) -> Value {
    let mut cmd = cargo_bin_cmd!("product-hash");
    let output = cmd
        .args(args)
        .arg("--json")
        .arg("--db-path")
        .arg(db_path)
        .output()
        .expect("run command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("product-hash.toml");

    let mut cmd = cargo_bin_cmd!("product-hash");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("db_path"));
    assert!(content.contains("backend = \"sqlite\""));
}

#[test]
fn hash_is_stable_across_invocations() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("catalog.sqlite");
    import(&db_path, &write_catalog(&dir, CATALOG));

    let first = run_json(&["hash", "P1"], &db_path);
    let second = run_json(&["hash", "V1"], &db_path);

    let hash = first["hash"].as_str().expect("hash string");
    assert_eq!(hash.len(), 64);
    assert_eq!(first["hash"], second["hash"]);
}

#[test]
fn update_then_status_tracks_unpublished_changes() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("catalog.sqlite");
    import(&db_path, &write_catalog(&dir, CATALOG));

    let published = run_json(&["update", "P1"], &db_path);
    assert_eq!(published["currentProductHash"], published["publishedProductHash"]);

    let status = run_json(&["status", "P1"], &db_path);
    assert_eq!(status["has_unpublished_changes"], false);

    // Change the variant's sku, then record it without publishing
    let variant_only = r#"{ "products": [
        { "_id": "V1", "type": "variant", "ancestors": ["P1"], "sku": "SH-2" }
    ] }"#;
    import(&db_path, &write_catalog(&dir, variant_only));
    let draft = run_json(&["update", "P1", "--unpublished"], &db_path);
    assert_ne!(draft["currentProductHash"], published["currentProductHash"]);
    assert_eq!(draft["publishedProductHash"], published["publishedProductHash"]);

    let status = run_json(&["status", "P1"], &db_path);
    assert_eq!(status["has_unpublished_changes"], true);
}

#[test]
fn hash_unknown_product_fails() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("catalog.sqlite");
    import(&db_path, &write_catalog(&dir, CATALOG));

    let mut cmd = cargo_bin_cmd!("product-hash");
    cmd.args(["hash", "missing", "--db-path"])
        .arg(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No top-level product found"));
}

#[test]
fn memory_backend_hashes_fixture() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir, CATALOG);

    let mut cmd = cargo_bin_cmd!("product-hash");
    let output = cmd
        .env("PRODUCT_HASH__STORE__BACKEND", "memory")
        .env("PRODUCT_HASH__STORE__FIXTURE", &catalog)
        .current_dir(dir.path())
        .args(["hash", "P1"])
        .output()
        .expect("run hash");

    assert!(output.status.success());
    let memory_hash = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let db_path = dir.path().join("catalog.sqlite");
    import(&db_path, &catalog);
    let sqlite = run_json(&["hash", "P1"], &db_path);

    assert_eq!(sqlite["hash"], memory_hash.as_str());
}

#[test]
fn import_reports_counts() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir, CATALOG);

    let mut cmd = cargo_bin_cmd!("product-hash");
    cmd.arg("import")
        .arg(&catalog)
        .arg("--db-path")
        .arg(dir.path().join("catalog.sqlite"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 products and 1 media records"));
}

#[test]
fn import_rejects_duplicate_ids() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir, r#"{ "products": [{ "_id": "P1" }, { "_id": "P1" }] }"#);

    let mut cmd = cargo_bin_cmd!("product-hash");
    cmd.arg("import")
        .arg(&catalog)
        .arg("--db-path")
        .arg(dir.path().join("catalog.sqlite"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate product id 'P1'"));
}
