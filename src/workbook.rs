//! ワークブック読み込み（calamine）
//!
//! シートを探して Grid に変換するところまでを担当し、
//! 以降の正規化・照合は共通ライブラリに任せる。

use crate::error::{DssError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use dss_matrix_common::{build_dataset, CellValue, Dataset, Grid};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// ワークブックから取り出したシート
#[derive(Debug, Clone)]
pub struct SourceSheets {
    pub matrix_name: String,
    pub matrix: Grid,
    pub questions: Option<Grid>,
}

/// マトリクスシート名（一致しなければ先頭シート）
pub fn find_matrix_sheet(names: &[String]) -> Option<&str> {
    lazy_static::lazy_static! {
        static ref MATRIX_RE: Regex = Regex::new(r"(?i)matrix|data storage").unwrap();
    }

    names
        .iter()
        .find(|n| MATRIX_RE.is_match(n))
        .or_else(|| names.first())
        .map(String::as_str)
}

/// 質問シート名（前後の空白を除いて "questions"）
pub fn find_questions_sheet(names: &[String]) -> Option<&str> {
    lazy_static::lazy_static! {
        static ref QUESTIONS_RE: Regex = Regex::new(r"(?i)^questions$").unwrap();
    }

    names
        .iter()
        .find(|n| QUESTIONS_RE.is_match(n.trim()))
        .map(String::as_str)
}

/// セル値の変換
///
/// 日付は Excel のシリアル値のまま数値として扱う。
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

pub fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect()
}

/// ワークブックを開いてシートを取り出す
pub fn read_workbook(path: &Path) -> Result<SourceSheets> {
    if !path.exists() {
        return Err(DssError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    debug!(sheets = ?names, "ワークブックを開きました");

    let matrix_name = find_matrix_sheet(&names)
        .ok_or_else(|| DssError::Workbook(format!("シートがありません: {}", path.display())))?
        .to_string();
    let questions_name = find_questions_sheet(&names).map(str::to_string);

    let matrix = range_to_grid(&workbook.worksheet_range(&matrix_name)?);
    let questions = match questions_name {
        Some(name) => Some(range_to_grid(&workbook.worksheet_range(&name)?)),
        None => None,
    };

    Ok(SourceSheets {
        matrix_name,
        matrix,
        questions,
    })
}

/// ワークブックから Dataset を構築
pub fn build_from_workbook(path: &Path) -> Result<Dataset> {
    let sheets = read_workbook(path)?;
    let dataset = build_dataset(&sheets.matrix, sheets.questions.as_deref())
        .ok_or_else(|| DssError::EmptyMatrix(sheets.matrix_name.clone()))?;

    info!(
        sheet = %sheets.matrix_name,
        services = dataset.services.len(),
        criteria = dataset.criteria.len(),
        questions = dataset.questions.len(),
        "ワークブックから構築"
    );
    Ok(dataset)
}
