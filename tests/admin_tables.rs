mod common;

use common::{DocxBuilder, labelled_table, para};
use doctransfer::docx::{table, wml};
use doctransfer::extract::{APPROVAL_TABLE, REVISION_HISTORY};
use doctransfer::{AdminRow, Error, TransferConfig, reconcile_admin_tables};

fn row(values: &[&str]) -> AdminRow {
    AdminRow(values.iter().map(|v| v.to_string()).collect())
}

fn labels(doc: &doctransfer::Document) -> Vec<String> {
    doc.tables().filter_map(table::label).collect()
}

#[test]
fn second_copy_is_removed_and_the_rest_filled() {
    common::init_logging();
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(REVISION_HISTORY, 3, 3))
        .body(&para(None, "between"))
        .body(&labelled_table(APPROVAL_TABLE, 3, 4))
        .body(&labelled_table(REVISION_HISTORY, 3, 3))
        .body(&labelled_table(APPROVAL_TABLE, 3, 4))
        .document();
    let revision = row(&["C", "2024-05-01", "Initial release"]);
    let approval = row(&["Author", "J. Doe", "Engineer", "2024-05-01"]);

    reconcile_admin_tables(&mut dest, Some(&revision), Some(&approval), &TransferConfig::default())
        .unwrap();

    assert_eq!(labels(&dest), [REVISION_HISTORY, APPROVAL_TABLE]);
    assert_eq!(common::table_grid(&dest, 0)[2], ["C", "2024-05-01", "Initial release"]);
    assert_eq!(common::table_grid(&dest, 1)[2], ["Author", "J. Doe", "Engineer", "2024-05-01"]);
    // Other rows are untouched.
    assert_eq!(common::table_grid(&dest, 0)[1], ["r1c0", "r1c1", "r1c2"]);

    let filled = table::cell(dest.table(0).unwrap(), 2, 1).unwrap();
    let p = table::first_paragraph(filled).unwrap();
    assert_eq!(wml::paragraph_style_id(p), Some("00TEXT"));
    assert_eq!(common::paragraph_texts(&dest), ["between"]);
}

#[test]
fn single_occurrence_is_filled_and_kept() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(REVISION_HISTORY, 4, 3))
        .document();
    let revision = row(&["A", "2023-01-01", "Draft"]);

    reconcile_admin_tables(&mut dest, Some(&revision), None, &TransferConfig::default()).unwrap();

    assert_eq!(dest.tables().count(), 1);
    assert_eq!(common::table_grid(&dest, 0)[2], ["A", "2023-01-01", "Draft"]);
}

#[test]
fn third_occurrence_is_filled_too() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(REVISION_HISTORY, 3, 3))
        .body(&labelled_table(REVISION_HISTORY, 3, 3))
        .body(&labelled_table(REVISION_HISTORY, 3, 3))
        .document();
    let revision = row(&["B", "2024-02-02", "Update"]);

    reconcile_admin_tables(&mut dest, Some(&revision), None, &TransferConfig::default()).unwrap();

    assert_eq!(dest.tables().count(), 2);
    for i in 0..2 {
        assert_eq!(common::table_grid(&dest, i)[2], ["B", "2024-02-02", "Update"]);
    }
}

#[test]
fn template_without_admin_tables_is_unchanged() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table("Parts List", 3, 3))
        .document();
    reconcile_admin_tables(&mut dest, None, None, &TransferConfig::default()).unwrap();
    assert_eq!(labels(&dest), ["Parts List"]);
    assert_eq!(common::table_grid(&dest, 0)[2], ["r2c0", "r2c1", "r2c2"]);
}

#[test]
fn missing_source_row_is_a_structural_error() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(APPROVAL_TABLE, 3, 4))
        .document();
    let err = reconcile_admin_tables(&mut dest, None, None, &TransferConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::StructuralIndex { what: "source row", ref table, .. } if table == APPROVAL_TABLE
    ));
}

#[test]
fn short_source_row_is_a_structural_error() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(APPROVAL_TABLE, 3, 4))
        .document();
    let approval = row(&["Author", "J. Doe"]);
    let err = reconcile_admin_tables(&mut dest, None, Some(&approval), &TransferConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::StructuralIndex { what: "source value", row: 2, col: 2, .. }
    ));
}

#[test]
fn destination_without_data_row_is_a_structural_error() {
    let mut dest = DocxBuilder::template()
        .body(&labelled_table(REVISION_HISTORY, 2, 3))
        .document();
    let revision = row(&["A", "B", "C"]);
    let err = reconcile_admin_tables(&mut dest, Some(&revision), None, &TransferConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::StructuralIndex { what: "destination cell", .. }));
}
