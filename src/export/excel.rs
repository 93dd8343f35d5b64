//! 比較表のExcel出力

use crate::error::Result;
use dss_matrix_common::ComparisonTable;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

const SHEET_NAME: &str = "Comparison";
const MIN_COL_WIDTH: f64 = 12.0;
const MAX_COL_WIDTH: f64 = 60.0;

fn column_width(table: &ComparisonTable, col: usize) -> f64 {
    let longest = std::iter::once(table.headers.get(col))
        .chain(table.rows.iter().map(|r| r.get(col)))
        .flatten()
        .flat_map(|s| s.lines())
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    (longest as f64 + 2.0).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
}

/// 比較表をバッファに生成
pub fn comparison_buffer(table: &ComparisonTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let value_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Hair);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
        worksheet.set_column_width(col, column_width(table, col as usize))?;
    }

    for (row, values) in table.rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string_with_format(row as u32 + 1, col as u16, value, &value_format)?;
        }
    }

    worksheet.set_freeze_panes(1, 1)?;

    Ok(workbook.save_to_buffer()?)
}

/// 比較表を .xlsx ファイルに書き出す
pub fn write_comparison(table: &ComparisonTable, output_path: &Path) -> Result<()> {
    let buffer = comparison_buffer(table)?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
