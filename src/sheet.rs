//! 一括登録用スプレッドシートの事前チェック
//!
//! 列: ID, Status, NIK, Name, Phone, Address, Rating[, Notes][, Photo]
//! 1行目は見出し。7列に満たない行は不完全として扱う。

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{ClientError, Result};

pub const HEADERS: [&str; 9] = [
    "ID", "Status", "NIK", "Name", "Phone", "Address", "Rating", "Notes", "Photo",
];

/// 必須列の数
pub const REQUIRED_COLUMNS: usize = 7;

/// サーバーが読むシート名
pub const SHEET_NAME: &str = "data";

/// 写真列が無い行に使う画像
pub const DEFAULT_PHOTO: &str = "static/assets/avatar.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub id: String,
    pub status: String,
    pub nik: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub rating: i64,
    pub notes: String,
    pub photo: String,
}

impl SheetRow {
    /// 末尾の空セルを除いた値から行を作る。必須列が足りなければ None
    pub fn parse(cells: &[String]) -> Option<Self> {
        let len = cells
            .iter()
            .rposition(|c| !c.trim().is_empty())
            .map_or(0, |i| i + 1);
        if len < REQUIRED_COLUMNS {
            return None;
        }

        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        let photo = cells
            .get(8)
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_PHOTO.to_string());

        Some(Self {
            id: cell(0),
            status: cell(1),
            nik: cell(2),
            name: cell(3),
            phone: cell(4),
            address: cell(5),
            rating: parse_rating(&cell(6)),
            notes: cell(7),
            photo,
        })
    }
}

/// 整数として読めなければ 0
pub fn parse_rating(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct SheetReport {
    pub rows: Vec<SheetRow>,
    /// 不完全な行の行番号（1始まり、見出しが1行目）
    pub incomplete: Vec<usize>,
}

impl SheetReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }

    pub fn incomplete_summary(&self) -> String {
        self.incomplete
            .iter()
            .map(|n| format!("row {}", n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// `data` シートを読み込んで検査する
pub fn inspect(path: &Path) -> Result<SheetReport> {
    if !path.exists() {
        return Err(ClientError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|name| name == SHEET_NAME) {
        return Err(ClientError::Sheet(format!(
            "シート '{}' がありません",
            SHEET_NAME
        )));
    }
    let range = workbook.worksheet_range(SHEET_NAME)?;

    let mut report = SheetReport::default();
    for (index, row) in range.rows().enumerate().skip(1) {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        match SheetRow::parse(&cells) {
            Some(parsed) => report.rows.push(parsed),
            None => report.incomplete.push(index + 1),
        }
    }
    Ok(report)
}

/// 見出しだけの空テンプレートを書き出す
pub fn write_template(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_minimal_row() {
        let row = SheetRow::parse(&cells(&[
            "V001", "V", "3201", "Budi", "0812", "Bandung", "4",
        ]))
        .unwrap();
        assert_eq!(row.id, "V001");
        assert_eq!(row.rating, 4);
        assert_eq!(row.notes, "");
        assert_eq!(row.photo, DEFAULT_PHOTO);
    }

    #[test]
    fn test_parse_full_row() {
        let row = SheetRow::parse(&cells(&[
            "S002",
            "S",
            "3202",
            "Siti",
            "0813",
            "Garut",
            "5",
            "langganan",
            "static/uploads/S002.png",
        ]))
        .unwrap();
        assert_eq!(row.notes, "langganan");
        assert_eq!(row.photo, "static/uploads/S002.png");
    }

    #[test]
    fn test_parse_short_row_is_incomplete() {
        assert!(SheetRow::parse(&cells(&["V001", "V", "3201", "Budi"])).is_none());
        // 末尾の空セルは数えない
        assert!(SheetRow::parse(&cells(&["V001", "V", "3201", "Budi", "", "", ""])).is_none());
    }

    #[test]
    fn test_parse_rating_fallback() {
        assert_eq!(parse_rating(" 3 "), 3);
        assert_eq!(parse_rating("bagus"), 0);
        assert_eq!(parse_rating(""), 0);
    }
}
