//! スプレッドシート事前チェックのテスト

use idcard_client::error::ClientError;
use calamine::{open_workbook_auto, Reader};
use idcard_client::sheet::{self, DEFAULT_PHOTO, HEADERS, SHEET_NAME};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

fn write_sheet(path: &Path, rows: &[&[&str]]) {
    write_named_sheet(path, SHEET_NAME, rows);
}

fn write_named_sheet(path: &Path, name: &str, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name).unwrap();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            worksheet
                .write_string((r + 1) as u32, c as u16, *value)
                .unwrap();
        }
    }
    workbook.save(path).unwrap();
}

/// テンプレートは見出しのみ
#[test]
fn test_template_has_no_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("users.xlsx");

    sheet::write_template(&path).expect("テンプレート作成失敗");
    let report = sheet::inspect(&path).expect("読み込み失敗");

    assert!(report.rows.is_empty());
    assert!(report.is_complete());
}

/// サーバーは `data` シートだけを読む
#[test]
fn test_template_sheet_is_named_data() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("users.xlsx");
    sheet::write_template(&path).unwrap();

    let mut workbook = open_workbook_auto(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    assert_eq!(range.get_size(), (1, HEADERS.len()));
}

#[test]
fn test_sheet_without_data_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("users.xlsx");
    write_named_sheet(
        &path,
        "users",
        &[&["V001", "V", "3201", "Budi", "0812", "Bandung", "4"]],
    );

    let result = sheet::inspect(&path);
    assert!(matches!(result, Err(ClientError::Sheet(ref m)) if m.contains("data")));
}

#[test]
fn test_inspect_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("users.xlsx");
    write_sheet(
        &path,
        &[
            &["V001", "V", "3201", "Budi", "0812", "Bandung", "4"],
            &["S002", "S", "3202", "Siti", "0813", "Garut", "x", "baru", "static/uploads/S002.png"],
        ],
    );

    let report = sheet::inspect(&path).unwrap();

    assert_eq!(report.rows.len(), 2);
    assert!(report.is_complete());
    assert_eq!(report.rows[0].photo, DEFAULT_PHOTO);
    assert_eq!(report.rows[0].rating, 4);
    assert_eq!(report.rows[1].rating, 0);
    assert_eq!(report.rows[1].notes, "baru");
}

/// 7列に満たない行は行番号で報告
#[test]
fn test_incomplete_rows_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("users.xlsx");
    write_sheet(
        &path,
        &[
            &["V001", "V", "3201", "Budi", "0812", "Bandung", "4"],
            &["V002", "V", "3203"],
        ],
    );

    let report = sheet::inspect(&path).unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.incomplete, vec![3]);
    assert_eq!(report.incomplete_summary(), "row 3");
}

#[test]
fn test_missing_file() {
    let result = sheet::inspect(Path::new("/nonexistent/users-12345.xlsx"));
    assert!(matches!(result, Err(ClientError::FileNotFound(_))));
}
