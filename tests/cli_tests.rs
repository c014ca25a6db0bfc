//! CLI integration tests for tradedesk

mod common;

use common::{files_in, ids_of, setup_test_project, stdout_of, tradedesk};
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Init
// ============================================================================

#[test]
fn test_init_writes_sample_dataset() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 25 sample orders"));
    assert!(tmp.path().join("orders.yaml").exists());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tradedesk()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_init_json_dataset() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .args(["--data", "desk/orders.json", "init"])
        .assert()
        .success();

    let content = std::fs::read_to_string(tmp.path().join("desk/orders.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 25);

    let ids = ids_of(&tmp, &["orders", "list", "--data", "desk/orders.json", "--all"]);
    assert_eq!(ids.len(), 25);
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_list_first_page_by_default() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hard Red Winter Wheat"))
        .stdout(predicate::str::contains("Page 1 of 3"))
        .stdout(predicate::str::contains("Milling Oats").not());

    assert_eq!(ids_of(&tmp, &["orders", "list"]), (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_list_last_page_and_clamping() {
    let tmp = setup_test_project();
    assert_eq!(
        ids_of(&tmp, &["orders", "list", "--page", "3"]),
        (21..=25).collect::<Vec<_>>()
    );
    // Past the end clamps to the last page
    assert_eq!(
        ids_of(&tmp, &["orders", "list", "--page", "9"]),
        (21..=25).collect::<Vec<_>>()
    );
}

#[test]
fn test_list_page_size() {
    let tmp = setup_test_project();
    let ids = ids_of(&tmp, &["orders", "list", "--page-size", "20", "--page", "2"]);
    assert_eq!(ids, (21..=25).collect::<Vec<_>>());
}

#[test]
fn test_list_rejects_unsupported_page_size() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--page-size", "7"])
        .assert()
        .failure();
}

#[test]
fn test_list_search_is_case_insensitive() {
    let tmp = setup_test_project();
    assert_eq!(ids_of(&tmp, &["orders", "list", "--search", "COFFEE"]), vec![4, 11]);
}

#[test]
fn test_list_search_matches_origin_name() {
    let tmp = setup_test_project();
    let ids = ids_of(&tmp, &["orders", "list", "--all", "--search", "brazil"]);
    assert!(ids.contains(&2));
    assert!(ids.contains(&4));
}

#[test]
fn test_list_status_filter() {
    let tmp = setup_test_project();
    assert_eq!(
        ids_of(&tmp, &["orders", "list", "--status", "on-hold"]),
        vec![3, 9, 18, 24]
    );
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--status", "delivered,on-hold", "--count"])
        .assert()
        .success()
        .stdout("11\n");
}

#[test]
fn test_list_active_includes_custom_status() {
    let tmp = setup_test_project();
    let ids = ids_of(&tmp, &["orders", "list", "--all", "--status", "active"]);
    assert_eq!(ids.len(), 18);
    assert!(ids.contains(&15));
    assert!(!ids.contains(&1));
}

#[test]
fn test_list_category_filter() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--category", "coffee", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_list_sort_by_price_puts_unparseable_last() {
    let tmp = setup_test_project();
    let desc = ids_of(&tmp, &["orders", "list", "--all", "--sort", "price:desc"]);
    assert_eq!(desc.len(), 25);
    assert_eq!(desc[0], 19);
    assert_eq!(&desc[22..], &[3, 18, 24]);

    let asc = ids_of(&tmp, &["orders", "list", "--all", "--sort", "price"]);
    assert_eq!(&asc[22..], &[3, 18, 24]);
    assert_eq!(asc[21], 19);
}

#[test]
fn test_list_rejects_unsortable_column() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--sort", "actions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be sorted"));
}

#[test]
fn test_list_hide_columns() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--hide", "price,origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product Name"))
        .stdout(predicate::str::contains("Price (USD/MT)").not());
}

#[test]
fn test_list_json_output() {
    let tmp = setup_test_project();
    let out = stdout_of(&tmp, &["orders", "list", "--output", "json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["header"], "Hard Red Winter Wheat");
}

#[test]
fn test_list_no_matches() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list", "--search", "no-such-commodity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No orders found."));
}

#[test]
fn test_missing_dataset_is_reported() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dataset not found"));
}

#[test]
fn test_data_from_environment() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .env("TRADEDESK_DATA", "book.yaml")
        .arg("init")
        .assert()
        .success();
    assert!(tmp.path().join("book.yaml").exists());
}

// ============================================================================
// Show, move, summary
// ============================================================================

#[test]
fn test_show_order() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "show", "1", "--output", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hard Red Winter Wheat"))
        .stdout(predicate::str::contains("$245.50"));

    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No order with id 99"));
}

#[test]
fn test_move_persists_new_order() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "move", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved order 1 to position 3"));

    let ids = ids_of(&tmp, &["orders", "list", "--page-size", "10"]);
    assert_eq!(&ids[..4], &[2, 3, 1, 4]);
}

#[test]
fn test_move_unknown_order() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "move", "1", "77"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No order with id 77"));
}

#[test]
fn test_summary() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Orders"))
        .stdout(predicate::str::contains("Contract Value"));

    let out = stdout_of(&tmp, &["orders", "summary", "--output", "json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["total"], 25);
    assert_eq!(value["delivered"], 7);
    assert_eq!(value["on_hold"], 4);
}

// ============================================================================
// Browse
// ============================================================================

#[test]
fn test_browse_from_piped_input() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "browse"])
        .write_stdin("search wheat\nselect all\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Durum Wheat"))
        .stdout(predicate::str::contains("2 of 2 row(s) selected."));
}

#[test]
fn test_browse_save_writes_row_order() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "browse", "--save"])
        .write_stdin("move 5 1\nquit\n")
        .assert()
        .success();

    let ids = ids_of(&tmp, &["orders", "list"]);
    assert_eq!(&ids[..2], &[5, 1]);
}

#[test]
fn test_browse_without_save_leaves_dataset() {
    let tmp = setup_test_project();
    tradedesk()
        .current_dir(tmp.path())
        .args(["orders", "browse"])
        .write_stdin("move 5 1\n")
        .assert()
        .success();

    assert_eq!(ids_of(&tmp, &["orders", "list"])[0], 1);
}

// ============================================================================
// RFQ
// ============================================================================

#[test]
fn test_rfq_new_writes_outbox() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(
        &tmp,
        &[
            "rfq",
            "new",
            "--product",
            "Hard Red Winter Wheat",
            "--category",
            "Grains",
            "--quantity",
            "5000",
            "--port",
            "Rotterdam",
            "--date",
            "2026-12-01",
            "--output",
            "id",
        ],
    );
    let reference = out.trim();
    assert!(reference.starts_with("RFQ-"));

    let files = files_in(&tmp.path().join("rfq-outbox"));
    assert_eq!(files, vec![format!("{}.yaml", reference)]);

    let content =
        std::fs::read_to_string(tmp.path().join("rfq-outbox").join(&files[0])).unwrap();
    assert!(content.contains("Rotterdam"));
    assert!(content.contains("tester"));

    tradedesk()
        .current_dir(tmp.path())
        .args(["rfq", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(reference))
        .stdout(predicate::str::contains("Rotterdam"));
}

#[test]
fn test_rfq_new_missing_required_fields() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .args(["rfq", "new", "--product", "Soybeans", "--category", "Oilseeds"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in"))
        .stderr(predicate::str::contains("Quantity"));
    assert!(files_in(&tmp.path().join("rfq-outbox")).is_empty());
}

#[test]
fn test_rfq_new_rejects_bad_date() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .args([
            "rfq",
            "new",
            "--product",
            "Soybeans",
            "--category",
            "Oilseeds",
            "--quantity",
            "100",
            "--port",
            "Santos",
            "--date",
            "next week",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid delivery date"));
}

#[test]
fn test_rfq_list_empty() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .args(["rfq", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No RFQs found."));
}

#[test]
fn test_rfq_outbox_from_environment() {
    let tmp = TempDir::new().unwrap();
    tradedesk()
        .current_dir(tmp.path())
        .env("TRADEDESK_OUTBOX", "sent")
        .args([
            "rfq", "new", "--product", "Copper", "--category", "Metals", "--quantity", "25",
            "--port", "Shanghai",
        ])
        .assert()
        .success();
    assert_eq!(files_in(&tmp.path().join("sent")).len(), 1);
}

// ============================================================================
// Misc
// ============================================================================

#[test]
fn test_completions() {
    tradedesk()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tradedesk"));
}

#[test]
fn test_local_config_page_size() {
    let tmp = setup_test_project();
    std::fs::write(tmp.path().join(".tradedesk.yaml"), "page_size: 20\n").unwrap();
    assert_eq!(ids_of(&tmp, &["orders", "list"]).len(), 20);
}
