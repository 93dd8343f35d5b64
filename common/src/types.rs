//! データモデル定義
//!
//! 取込スクリプトと対話UIの両方で共有される型:
//! - CellValue / Grid: シートから読み込んだ生データ
//! - AttributeColumn: マトリクスの属性列（判定基準）
//! - Entity: 保存先サービス1行分
//! - Question: 質問シートの1問（属性列に紐付け）
//! - Dataset: 上記をまとめた正規化済みドキュメント

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// シートのセル値（プリミティブまたは空）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 空セル（null または空文字列）か
    ///
    /// 空白のみの文字列は空扱いしない。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// セル値の文字列表現（トリムなし）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// 正規化済みのセル値（空セルは空文字列、それ以外はトリム）
    pub fn normalized(&self) -> String {
        if self.is_blank() {
            String::new()
        } else {
            self.to_text().trim().to_string()
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        // -0 も "0" として出す
        "0".into()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // 指数表記（"1e+21" / "1.5e-7"）
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// シート1枚分の生データ（1行目がヘッダー）
pub type Grid = Vec<Vec<CellValue>>;

/// 文字列スライスからGridを作る（テスト・小規模データ用）
pub fn grid_from_strs(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|row| row.iter().map(|&c| CellValue::from(c)).collect())
        .collect()
}

/// 属性列（判定基準）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeColumn {
    pub id: String,
    pub label: String,
}

/// 保存先サービス1行分
///
/// ヘッダー順を保持したキー→値のマップ。JSONではオブジェクトとして出力する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    fields: Vec<(String, String)>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を設定する
    ///
    /// 既存キーは位置を保ったまま値を上書きする。
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 値を取得（キーがなければ空文字列）
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entity {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entity = Entity::new();
        for (k, v) in iter {
            entity.insert(k, v);
        }
        entity
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntityVisitor)
    }
}

struct EntityVisitor;

impl<'de> Visitor<'de> for EntityVisitor {
    type Value = Entity;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a service object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Entity, A::Error> {
        let mut entity = Entity::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            let text = match value {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            entity.insert(key, text);
        }
        Ok(entity)
    }
}

/// 質問シートの1問
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub label: String,
    pub options: Vec<String>,
    /// 紐付いた属性列のラベル
    pub column: Option<String>,
}

/// 正規化済みドキュメント
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub name_key: String,
    pub criteria: Vec<AttributeColumn>,
    pub services: Vec<Entity>,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("").is_blank());
        assert!(!CellValue::from(" ").is_blank());
        assert!(!CellValue::from(0.0).is_blank());
        assert!(!CellValue::from(false).is_blank());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(CellValue::from(3.0).to_text(), "3");
        assert_eq!(CellValue::from(2.5).to_text(), "2.5");
        assert_eq!(CellValue::from(-0.0).to_text(), "0");
        assert_eq!(CellValue::from(true).to_text(), "true");
        assert_eq!(CellValue::from("  S3 ").normalized(), "S3");
        assert_eq!(CellValue::Empty.normalized(), "");
    }

    #[test]
    fn test_number_text_uses_exponent_at_extremes() {
        assert_eq!(CellValue::Number(1e21).to_text(), "1e+21");
        assert_eq!(CellValue::Number(-2.5e22).to_text(), "-2.5e+22");
        assert_eq!(CellValue::Number(1e-7).to_text(), "1e-7");
        assert_eq!(CellValue::Number(1.5e-7).to_text(), "1.5e-7");
        assert_eq!(CellValue::Number(1e20).to_text(), "100000000000000000000");
        assert_eq!(CellValue::Number(0.000001).to_text(), "0.000001");
    }

    #[test]
    fn test_cell_deserialize_untagged() {
        let row: Vec<CellValue> = serde_json::from_str(r#"[null, "a", 1.5, true]"#).unwrap();
        assert_eq!(
            row,
            vec![
                CellValue::Empty,
                CellValue::from("a"),
                CellValue::from(1.5),
                CellValue::from(true)
            ]
        );
    }

    #[test]
    fn test_entity_insert_keeps_position() {
        let mut entity = Entity::new();
        entity.insert("Service", "S3");
        entity.insert("Region", "US");
        entity.insert("Service", "GCS");
        assert_eq!(entity.keys().collect::<Vec<_>>(), vec!["Service", "Region"]);
        assert_eq!(entity.value("Service"), "GCS");
        assert_eq!(entity.value("Missing"), "");
    }

    #[test]
    fn test_entity_serializes_in_header_order() {
        let entity: Entity = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_entity_deserialize_scalars() {
        let entity: Entity =
            serde_json::from_str(r#"{"Service":"S3","Tier":2,"Note":null}"#).unwrap();
        assert_eq!(entity.value("Tier"), "2");
        assert_eq!(entity.value("Note"), "");
        assert_eq!(entity.len(), 3);
    }

    #[test]
    fn test_question_column_serializes_null() {
        let q = Question {
            id: "q".into(),
            label: "Q".into(),
            options: vec!["a".into()],
            column: None,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert!(json["column"].is_null());
    }

    #[test]
    fn test_dataset_keys() {
        let json = serde_json::to_value(Dataset::default()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["criteria", "nameKey", "questions", "services"]);
    }
}
