//! 比較画面のセッション状態
//!
//! 読み込んだ Dataset（不変）と、フィルタ選択・比較対象の選択を保持する。
//! 再読み込み時は Session ごと作り直す。

use crate::error::{Error, Result};
use crate::filter::{filter_sources, matches_filters, unique_values, FilterSource, FilterValues};
use crate::types::{Dataset, Entity};
use std::collections::BTreeSet;

/// 説明文の最大表示文字数
pub const DESCRIPTION_MAX_CHARS: usize = 140;

/// 名前が空のサービスの表示名
pub const UNNAMED: &str = "Unnamed";

/// 比較表の空セル表示
pub const EMPTY_CELL: &str = "—";

/// 比較表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    sources: Vec<FilterSource>,
    filter_values: FilterValues,
    selected: BTreeSet<String>,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        let sources = filter_sources(&dataset);
        Self {
            dataset,
            sources,
            filter_values: FilterValues::new(),
            selected: BTreeSet::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter_sources(&self) -> &[FilterSource] {
        &self.sources
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.filter_values
    }

    pub fn unique_values(&self, column: &str) -> Vec<String> {
        unique_values(&self.dataset.services, column)
    }

    /// フィルタ値を設定（空文字列で解除）
    ///
    /// 列ラベルのほか、フィルタ項目のIDやラベルでも指定できる。
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        let column = self
            .sources
            .iter()
            .find(|s| s.column == key)
            .or_else(|| self.sources.iter().find(|s| s.id == key || s.label == key))
            .map(|s| s.column.clone())
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))?;
        self.filter_values.insert(column, value.trim().to_string());
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filter_values.clear();
    }

    pub fn matches(&self, service: &Entity) -> bool {
        matches_filters(service, &self.filter_values)
    }

    pub fn filtered_services(&self) -> Vec<&Entity> {
        self.dataset
            .services
            .iter()
            .filter(|s| self.matches(s))
            .collect()
    }

    /// 一致件数の表示（"N of M"）
    pub fn match_count(&self) -> String {
        format!(
            "{} of {}",
            self.filtered_services().len(),
            self.dataset.services.len()
        )
    }

    /// サービスの識別子（名前、空ならJSON表現）
    pub fn service_id(&self, service: &Entity) -> String {
        let name = service.value(&self.dataset.name_key).trim();
        if name.is_empty() {
            serde_json::to_string(service).unwrap_or_default()
        } else {
            name.to_string()
        }
    }

    pub fn service_name<'s>(&self, service: &'s Entity) -> &'s str {
        let name = service.value(&self.dataset.name_key).trim();
        if name.is_empty() {
            UNNAMED
        } else {
            name
        }
    }

    /// 説明列の1行目（長すぎる場合は省略）
    pub fn description(&self, service: &Entity) -> String {
        let Some(key) = self
            .dataset
            .services
            .first()
            .and_then(|first| first.keys().find(|k| k.to_lowercase().contains("description")))
        else {
            return String::new();
        };

        let first_line = service
            .value(key)
            .trim()
            .lines()
            .next()
            .unwrap_or("")
            .trim();

        if first_line.chars().count() > DESCRIPTION_MAX_CHARS {
            let truncated: String = first_line.chars().take(DESCRIPTION_MAX_CHARS - 3).collect();
            format!("{}…", truncated)
        } else {
            first_line.to_string()
        }
    }

    pub fn find_service(&self, id: &str) -> Option<&Entity> {
        self.dataset.services.iter().find(|s| self.service_id(s) == id)
    }

    pub fn is_selected(&self, service: &Entity) -> bool {
        self.selected.contains(&self.service_id(service))
    }

    /// 比較対象に追加（選択済みなら何もしない）
    pub fn select(&mut self, id: &str) -> Result<()> {
        if self.find_service(id).is_none() {
            return Err(Error::UnknownService(id.to_string()));
        }
        self.selected.insert(id.to_string());
        Ok(())
    }

    /// 比較対象の選択を切り替える（選択後の状態を返す）
    pub fn toggle_selected(&mut self, id: &str) -> Result<bool> {
        if self.find_service(id).is_none() {
            return Err(Error::UnknownService(id.to_string()));
        }
        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.to_string());
            Ok(true)
        }
    }

    /// 絞り込み中のサービスをすべて選択
    pub fn select_all_filtered(&mut self) {
        let ids: Vec<String> = self
            .filtered_services()
            .into_iter()
            .map(|s| self.service_id(s))
            .collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_services(&self) -> Vec<&Entity> {
        self.dataset
            .services
            .iter()
            .filter(|s| self.is_selected(s))
            .collect()
    }

    /// 選択中サービスの比較表（名前列 + 全属性列）
    pub fn comparison(&self) -> ComparisonTable {
        let headers: Vec<String> = std::iter::once(self.dataset.name_key.clone())
            .chain(self.dataset.criteria.iter().map(|c| c.label.clone()))
            .collect();

        let rows = self
            .selected_services()
            .into_iter()
            .map(|s| {
                headers
                    .iter()
                    .map(|h| {
                        let v = s.value(h).trim();
                        if v.is_empty() { EMPTY_CELL.to_string() } else { v.to_string() }
                    })
                    .collect()
            })
            .collect();

        ComparisonTable { headers, rows }
    }
}
