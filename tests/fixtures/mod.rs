//! テスト用ワークブックの作成

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;

/// セル（None は書き込まない）
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    rows: &[Vec<Option<Cell<'_>>>],
) -> Result<(), rust_xlsxwriter::XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Some(Cell::Text(s)) => {
                    worksheet.write_string(r as u32, c as u16, *s)?;
                }
                Some(Cell::Number(n)) => {
                    worksheet.write_number(r as u32, c as u16, *n)?;
                }
                None => {}
            }
        }
    }
    Ok(())
}

pub fn text(s: &str) -> Option<Cell<'_>> {
    Some(Cell::Text(s))
}

pub fn number(n: f64) -> Option<Cell<'static>> {
    Some(Cell::Number(n))
}

/// 任意のシート構成でワークブックを作る
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Option<Cell<'_>>>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        write_sheet(&mut workbook, name, rows).expect("シート作成失敗");
    }
    workbook.save(path).expect("ワークブック保存失敗");
}

/// マトリクス・質問シートを持つ標準的なワークブック
pub fn write_storage_workbook(path: &Path) {
    let matrix = vec![
        vec![text("Service"), text("Sensitivity"), text("Cost"), text("Max Size (GB)"), text("Description")],
        vec![text("OneDrive"), text("Low, Medium"), text("Included"), number(1024.0), text("Personal storage\nSync client")],
        vec![None, None, None, None, None],
        vec![text("SharePoint"), text("High"), text("Included"), number(25600.0), text("Department sites")],
        vec![text("Azure Blob"), text("High; Medium"), text("Usage based"), None, text("Research archives")],
    ];
    let questions = vec![
        vec![text("Question"), text("Options")],
        vec![text("How sensitive is the data?"), text("Low\nMedium\nHigh")],
        vec![text("Who pays?"), text("Included\nUsage based")],
    ];

    write_workbook(
        path,
        &[
            ("Intro", vec![vec![text("Read me first")]]),
            ("KD#1 Data Storage Matrix", matrix),
            ("Questions", questions),
        ],
    );
}
