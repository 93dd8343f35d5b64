//! データ管理マトリクス
//!
//! データ区分ごとに、各保存先のサポートレベル（推奨・可・個別審査・禁止）を定める。
//! 区分の検索と、推奨保存先（申請先）の引き当てを提供する。

use crate::scoring::{Destination, Policy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// サポートレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportLevel {
    Recommended,
    Supported,
    #[serde(rename = "Case-by-Case")]
    CaseByCase,
    #[serde(rename = "Not Permitted")]
    NotPermitted,
}

impl SupportLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportLevel::Recommended => "Recommended",
            SupportLevel::Supported => "Supported",
            SupportLevel::CaseByCase => "Case-by-Case",
            SupportLevel::NotPermitted => "Not Permitted",
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 機密区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensitivity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sensitivity::Low => "Low",
            Sensitivity::Medium => "Medium",
            Sensitivity::High => "High",
        };
        f.write_str(s)
    }
}

/// サポートレベルの定義と運用指針
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: SupportLevel,
    pub definition: String,
    #[serde(default)]
    pub guidance: String,
}

/// データ区分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCategory {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub sensitivity: Sensitivity,
}

impl DataCategory {
    /// 名称・説明に検索語を含むか（大文字小文字を区別しない、空の検索語は常に一致）
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.label.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// マトリクスの1セル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub category_id: String,
    pub destination_id: String,
    pub level: SupportLevel,
    #[serde(default)]
    pub notes: Option<String>,
}

/// 区分1行分（保存先の並び順でレベルを持つ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow<'a> {
    pub category: &'a DataCategory,
    pub levels: Vec<Option<SupportLevel>>,
    pub recommended: Option<&'a Destination>,
}

impl Policy {
    pub fn category(&self, id: &str) -> Option<&DataCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn level_definition(&self, level: SupportLevel) -> Option<&LevelDefinition> {
        self.levels.iter().find(|d| d.level == level)
    }

    /// 区分 × 保存先 のサポートレベル（未定義なら None）
    pub fn support_level(&self, category_id: &str, destination_id: &str) -> Option<SupportLevel> {
        self.matrix
            .iter()
            .find(|e| e.category_id == category_id && e.destination_id == destination_id)
            .map(|e| e.level)
    }

    /// 区分の推奨保存先（マトリクス上で最初の Recommended）
    pub fn recommended_destination(&self, category_id: &str) -> Option<&Destination> {
        self.matrix
            .iter()
            .find(|e| e.category_id == category_id && e.level == SupportLevel::Recommended)
            .and_then(|e| self.destination(&e.destination_id))
    }

    /// 検索語に一致する区分（定義順）
    pub fn search_categories(&self, query: &str) -> Vec<&DataCategory> {
        self.categories
            .iter()
            .filter(|c| c.matches_query(query))
            .collect()
    }

    /// 検索語に一致する区分のマトリクス行
    pub fn matrix_rows(&self, query: &str) -> Vec<MatrixRow<'_>> {
        self.search_categories(query)
            .into_iter()
            .map(|category| MatrixRow {
                category,
                levels: self
                    .destinations
                    .iter()
                    .map(|d| self.support_level(&category.id, &d.id))
                    .collect(),
                recommended: self.recommended_destination(&category.id),
            })
            .collect()
    }
}

fn level(level: SupportLevel, definition: &str, guidance: &str) -> LevelDefinition {
    LevelDefinition {
        level,
        definition: definition.into(),
        guidance: guidance.into(),
    }
}

pub(crate) fn default_levels() -> Vec<LevelDefinition> {
    vec![
        level(
            SupportLevel::Recommended,
            "The primary and preferred storage solution for this data type.",
            "Highest priority for migration and new projects. Aligns with corporate security architecture.",
        ),
        level(
            SupportLevel::Supported,
            "Permitted and supported by IT, but not the primary recommendation.",
            "Use if Recommended options do not meet specific technical needs or departmental workflows.",
        ),
        level(
            SupportLevel::CaseByCase,
            "Requires consultation with the Data Stewardship committee or IT Security.",
            "Do not move data here without explicit written approval. Risk assessment required.",
        ),
        level(
            SupportLevel::NotPermitted,
            "Explicitly prohibited due to security, compliance, or policy constraints.",
            "Strictly forbidden. Data found here will be flagged for immediate removal to maintain compliance.",
        ),
    ]
}

fn category(id: &str, label: &str, description: &str, sensitivity: Sensitivity) -> DataCategory {
    DataCategory {
        id: id.into(),
        label: label.into(),
        description: description.into(),
        sensitivity,
    }
}

pub(crate) fn default_categories() -> Vec<DataCategory> {
    vec![
        category("pii", "Personally Identifiable Info (PII)", "Sensitive records containing SSNs, birth dates, or private IDs.", Sensitivity::High),
        category("hipaa", "Health Data (HIPAA)", "Protected Patient records, clinical trial data, or medical histories.", Sensitivity::High),
        category("research", "General Research Data", "Lab notes, raw experimental data, and publication drafts.", Sensitivity::Medium),
        category("internal", "Internal Administrative", "Internal policies, budget drafts, and corporate memos.", Sensitivity::Low),
        category("media", "Multimedia Content", "High-res videos, raw photography archives, and audio logs.", Sensitivity::Low),
        category("personal", "Personal Files", "Non-work related items (personal resumes, family photos).", Sensitivity::Low),
    ]
}

pub(crate) fn default_matrix() -> Vec<MatrixEntry> {
    use SupportLevel::*;

    // 保存先の並び: onedrive, sharepoint, teams, google, azure
    let table: [(&str, [SupportLevel; 5]); 6] = [
        ("pii", [Supported, Recommended, Supported, CaseByCase, CaseByCase]),
        ("hipaa", [NotPermitted, Recommended, Supported, NotPermitted, Recommended]),
        ("research", [Supported, Supported, Recommended, Supported, Recommended]),
        ("internal", [Recommended, Recommended, Recommended, Supported, NotPermitted]),
        ("media", [Supported, Supported, CaseByCase, Supported, Recommended]),
        ("personal", [CaseByCase, NotPermitted, NotPermitted, CaseByCase, NotPermitted]),
    ];
    let destinations = ["onedrive", "sharepoint", "teams", "google", "azure"];

    table
        .iter()
        .flat_map(|(category_id, levels)| {
            destinations.iter().zip(levels).map(move |(destination_id, level)| MatrixEntry {
                category_id: category_id.to_string(),
                destination_id: destination_id.to_string(),
                level: *level,
                notes: None,
            })
        })
        .collect()
}
