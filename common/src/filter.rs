//! 比較表フィルタ
//!
//! 質問（なければ属性列そのもの）をフィルタ項目とし、
//! 選択値とセル値の完全一致、または複数値セルの要素一致で絞り込む。

use crate::text::split_multi_value;
use crate::types::{Dataset, Entity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 列ラベル → 選択値（空文字列は未選択）
pub type FilterValues = BTreeMap<String, String>;

/// フィルタ項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSource {
    pub id: String,
    pub label: String,
    pub options: Vec<String>,
    /// 絞り込み対象の列ラベル
    pub column: String,
}

/// 列に現れる値の一覧（トリム・重複除去・ソート済み）
pub fn unique_values(services: &[Entity], column: &str) -> Vec<String> {
    services
        .iter()
        .map(|s| s.value(column).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// フィルタ項目を列挙する
///
/// 質問があれば列に紐付いた質問を、なければ属性列ごとの値一覧を使う。
pub fn filter_sources(dataset: &Dataset) -> Vec<FilterSource> {
    if !dataset.questions.is_empty() {
        return dataset
            .questions
            .iter()
            .filter_map(|q| {
                q.column.as_ref().map(|column| FilterSource {
                    id: q.id.clone(),
                    label: q.label.clone(),
                    options: q.options.clone(),
                    column: column.clone(),
                })
            })
            .collect();
    }

    dataset
        .criteria
        .iter()
        .map(|c| FilterSource {
            id: c.id.clone(),
            label: c.label.clone(),
            options: unique_values(&dataset.services, &c.label),
            column: c.label.clone(),
        })
        .collect()
}

/// セル値が選択値に一致するか
pub fn cell_matches(raw: &str, chosen: &str) -> bool {
    let raw = raw.trim();
    raw == chosen || split_multi_value(raw).any(|v| v == chosen)
}

/// サービスがすべてのフィルタに一致するか
///
/// 選択値が空の項目は無視する。項目がなければ常に一致。
pub fn matches_filters(entity: &Entity, filter_values: &FilterValues) -> bool {
    filter_values
        .iter()
        .filter(|(_, chosen)| !chosen.is_empty())
        .all(|(column, chosen)| cell_matches(entity.value(column), chosen))
}
