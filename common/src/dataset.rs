//! Dataset の構築と読み書き
//!
//! 取込（xlsx → JSON）と対話UI（JSON読込、失敗時はxlsxから再構築）の
//! どちらも build_dataset を通すため、同じ入力からは同じ Dataset が得られる。

use crate::error::{Error, Result};
use crate::normalizer::{normalize, DEFAULT_NAME_KEY};
use crate::questions::match_questions;
use crate::types::{AttributeColumn, CellValue, Dataset, Entity, Question};
use serde::Deserialize;

/// マトリクスシートと質問シートから Dataset を構築する
///
/// マトリクスが不足していれば None。質問シートがない・見出し不明の場合は質問なし。
pub fn build_dataset(
    matrix_rows: &[Vec<CellValue>],
    question_rows: Option<&[Vec<CellValue>]>,
) -> Option<Dataset> {
    let mut dataset = normalize(matrix_rows)?;
    if let Some(rows) = question_rows {
        dataset.questions = match_questions(rows, &dataset.criteria, &dataset.services);
    }
    Some(dataset)
}

/// 読み込み用のドキュメント形式（services 以外は省略可）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetDocument {
    #[serde(default)]
    name_key: Option<String>,
    #[serde(default)]
    criteria: Option<Vec<AttributeColumn>>,
    services: Option<Vec<Entity>>,
    #[serde(default)]
    questions: Option<Vec<Question>>,
}

/// 名前列が記録されていない場合の推定
fn infer_name_key(services: &[Entity]) -> String {
    let Some(first) = services.first() else {
        return DEFAULT_NAME_KEY.to_string();
    };
    first
        .keys()
        .find(|k| k.to_lowercase().contains("service"))
        .or_else(|| first.keys().next())
        .unwrap_or(DEFAULT_NAME_KEY)
        .to_string()
}

impl Dataset {
    /// JSONドキュメントから読み込む
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: DatasetDocument = serde_json::from_str(json)?;
        let services = doc
            .services
            .ok_or_else(|| Error::InvalidDocument("missing \"services\"".into()))?;

        let name_key = match doc.name_key {
            Some(key) if !key.is_empty() => key,
            _ => infer_name_key(&services),
        };

        Ok(Self {
            name_key,
            criteria: doc.criteria.unwrap_or_default(),
            services,
            questions: doc.questions.unwrap_or_default(),
        })
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 整形済みJSON（インデント2）
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 件数の要約（"( N services, M criteria, K questions )"）
    pub fn summary(&self) -> String {
        format!(
            "( {} services, {} criteria, {} questions )",
            self.services.len(),
            self.criteria.len(),
            self.questions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::grid_from_strs;

    fn matrix() -> Vec<Vec<CellValue>> {
        grid_from_strs(&[
            &["Service", "Sensitivity", "Sharing"],
            &["OneDrive", "Low", "Internal"],
            &["Azure", "High", "None"],
        ])
    }

    #[test]
    fn test_build_with_questions() {
        let questions = grid_from_strs(&[
            &["Question", "Options"],
            &["How sensitive?", "Low\nHigh"],
        ]);
        let dataset = build_dataset(&matrix(), Some(questions.as_slice())).unwrap();
        assert_eq!(dataset.questions.len(), 1);
        assert_eq!(dataset.questions[0].column.as_deref(), Some("Sensitivity"));
        assert_eq!(dataset.summary(), "( 2 services, 2 criteria, 1 questions )");
    }

    #[test]
    fn test_build_without_questions() {
        let dataset = build_dataset(&matrix(), None).unwrap();
        assert!(dataset.questions.is_empty());
        assert!(build_dataset(&matrix()[..1], None).is_none());
    }

    #[test]
    fn test_json_document_shape() {
        let dataset = build_dataset(&matrix(), None).unwrap();
        let json = dataset.to_json_pretty().unwrap();
        assert!(json.starts_with("{\n  \"nameKey\": \"Service\",\n  \"criteria\": ["));
        assert!(json.contains("\"Service\": \"OneDrive\",\n      \"Sensitivity\": \"Low\""));

        let reloaded = Dataset::from_json(&json).unwrap();
        assert_eq!(reloaded, dataset);
    }

    #[test]
    fn test_from_json_infers_name_key() {
        let dataset = Dataset::from_json(r#"{"services": [{"Name": "A", "My Service": "x"}]}"#).unwrap();
        assert_eq!(dataset.name_key, "My Service");
        assert!(dataset.criteria.is_empty());
        assert!(dataset.questions.is_empty());

        let dataset = Dataset::from_json(r#"{"services": [{"Name": "A"}]}"#).unwrap();
        assert_eq!(dataset.name_key, "Name");

        let dataset = Dataset::from_json(r#"{"services": []}"#).unwrap();
        assert_eq!(dataset.name_key, "Service");
    }

    #[test]
    fn test_from_json_null_sections_are_empty() {
        let dataset = Dataset::from_json(
            r#"{"nameKey": "Service", "criteria": null, "services": [{"Service": "A"}], "questions": null}"#,
        )
        .unwrap();
        assert!(dataset.criteria.is_empty());
        assert!(dataset.questions.is_empty());
        assert_eq!(dataset.services.len(), 1);
    }

    #[test]
    fn test_from_json_requires_services() {
        let result = Dataset::from_json(r#"{"nameKey": "Service", "criteria": []}"#);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
        assert!(matches!(Dataset::from_json("not json"), Err(Error::Json(_))));
    }
}
