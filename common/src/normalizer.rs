//! マトリクスシート正規化モジュール
//!
//! 1行目をヘッダー、残りをサービス行として読み込み、
//! 名前列・属性列・サービス一覧を持つ Dataset を生成する。

use crate::text::slug;
use crate::types::{AttributeColumn, CellValue, Dataset, Entity};

/// 名前列のヘッダー（大文字小文字無視）
pub const NAME_HEADER: &str = "service";

/// ヘッダーが1つもない場合の名前列
pub const DEFAULT_NAME_KEY: &str = "Service";

/// ヘッダー行をトリム済み文字列に変換
pub fn resolve_headers(header_row: &[CellValue]) -> Vec<String> {
    header_row
        .iter()
        .map(|cell| {
            if cell.is_blank() {
                String::new()
            } else {
                cell.to_text().trim().to_string()
            }
        })
        .collect()
}

/// 名前列を決定する
///
/// `service` に一致する最初のヘッダー、なければ先頭ヘッダー、それもなければ `"Service"`。
pub fn resolve_name_key(headers: &[String]) -> String {
    headers
        .iter()
        .find(|h| h.to_lowercase() == NAME_HEADER)
        .or_else(|| headers.first().filter(|h| !h.is_empty()))
        .cloned()
        .unwrap_or_else(|| DEFAULT_NAME_KEY.to_string())
}

/// 列のキー（ヘッダーが空なら `Column_<index>`）
pub fn column_key(headers: &[String], index: usize) -> String {
    match headers.get(index) {
        Some(h) if !h.is_empty() => h.clone(),
        _ => format!("Column_{}", index),
    }
}

/// 全セルが空の行か
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

/// マトリクスシートを正規化する
///
/// # Arguments
/// * `rows` - シートの生データ（1行目がヘッダー）
///
/// # Returns
/// ヘッダー行とデータ行がそろっていれば `Some(Dataset)`（questions は空）
pub fn normalize(rows: &[Vec<CellValue>]) -> Option<Dataset> {
    if rows.len() < 2 {
        return None;
    }

    let headers = resolve_headers(&rows[0]);
    let name_key = resolve_name_key(&headers);

    let criteria = headers
        .iter()
        .filter(|h| !h.is_empty() && **h != name_key)
        .map(|h| AttributeColumn {
            id: slug(h),
            label: h.clone(),
        })
        .collect();

    let keys: Vec<String> = (0..headers.len()).map(|i| column_key(&headers, i)).collect();

    let services = rows[1..]
        .iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            keys.iter()
                .enumerate()
                .map(|(i, key)| {
                    let value = row.get(i).map(CellValue::normalized).unwrap_or_default();
                    (key.clone(), value)
                })
                .collect::<Entity>()
        })
        .collect();

    Some(Dataset {
        name_key,
        criteria,
        services,
        questions: Vec::new(),
    })
}
