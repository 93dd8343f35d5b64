//! 質問シート照合モジュール
//!
//! 質問シートの各行（質問文・改行区切りの選択肢）を Question に変換し、
//! 選択肢と実データの重なりが最も多い属性列に紐付ける。
//!
//! ## 紐付けルール
//! 1. 属性列ごとに、サービスのセル値（`,` `;` で分割）の集合を作る
//! 2. 選択肢が集合に含まれる数をスコアとし、最大の列を採用（同点は先の列）
//! 3. どの列もスコア0なら、採用済み質問数番目の列を位置で割り当てる

use crate::text::{option_key, slug, split_multi_value, split_options};
use crate::types::{AttributeColumn, CellValue, Entity, Question};
use std::collections::HashSet;

/// 質問文列の見出しに含まれる語
pub const QUESTION_HEADER: &str = "question";

/// 選択肢列の見出しに含まれる語
pub const OPTION_HEADER: &str = "option";

/// 属性列ごとの実データ値集合
#[derive(Debug, Clone)]
pub struct ColumnValueIndex {
    columns: Vec<(String, HashSet<String>)>,
}

impl ColumnValueIndex {
    /// サービス一覧から値集合を構築
    ///
    /// 複数値セルは分割してから登録する（取込スクリプトと対話UIで共通）。
    pub fn build(criteria: &[AttributeColumn], services: &[Entity]) -> Self {
        let columns = criteria
            .iter()
            .map(|c| {
                let values = services
                    .iter()
                    .flat_map(|s| split_multi_value(s.value(&c.label)))
                    .map(option_key)
                    .collect();
                (c.label.clone(), values)
            })
            .collect();
        Self { columns }
    }

    /// 選択肢と列の重なり数
    pub fn overlap(&self, label: &str, options: &HashSet<String>) -> usize {
        self.columns
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, values)| options.iter().filter(|o| values.contains(*o)).count())
            .unwrap_or(0)
    }

    /// 最も重なりの多い列（スコア0のみなら None）
    pub fn best_column(&self, options: &HashSet<String>) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, values) in &self.columns {
            let score = options.iter().filter(|o| values.contains(*o)).count();
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((label.as_str(), score));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// 見出し行から質問文列・選択肢列の位置を探す
pub fn locate_columns(header_row: &[CellValue]) -> Option<(usize, usize)> {
    let headers: Vec<String> = header_row
        .iter()
        .map(|h| h.to_text().trim().to_lowercase())
        .collect();
    let question_col = headers.iter().position(|h| h.contains(QUESTION_HEADER))?;
    let options_col = headers.iter().position(|h| h.contains(OPTION_HEADER))?;
    Some((question_col, options_col))
}

/// 質問シートを照合する
///
/// # Arguments
/// * `rows` - 質問シートの生データ（1行目が見出し）
/// * `criteria` - 正規化済みの属性列
/// * `services` - 正規化済みのサービス一覧
///
/// # Returns
/// 紐付け済みの質問一覧。入力不足・見出し不明の場合は空
pub fn match_questions(
    rows: &[Vec<CellValue>],
    criteria: &[AttributeColumn],
    services: &[Entity],
) -> Vec<Question> {
    if rows.len() < 2 || criteria.is_empty() {
        return Vec::new();
    }

    let Some((question_col, options_col)) = locate_columns(&rows[0]) else {
        return Vec::new();
    };

    let index = ColumnValueIndex::build(criteria, services);
    let mut questions: Vec<Question> = Vec::new();

    for row in &rows[1..] {
        let text = row
            .get(question_col)
            .map(|c| c.to_text().trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            continue;
        }

        let options = split_options(&row.get(options_col).map(CellValue::to_text).unwrap_or_default());
        if options.is_empty() {
            continue;
        }

        let option_keys: HashSet<String> = options.iter().map(|o| option_key(o)).collect();
        let column = index
            .best_column(&option_keys)
            .map(str::to_string)
            .or_else(|| criteria.get(questions.len()).map(|c| c.label.clone()));

        questions.push(Question {
            id: slug(&text),
            label: text,
            options,
            column,
        });
    }

    questions
}
