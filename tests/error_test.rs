//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use dss_matrix::error::DssError;
use dss_matrix::workbook::read_workbook;
use dss_matrix_common::{Policy, Session};
use tempfile::tempdir;

/// ワークブックでないファイルを開いた場合
#[test]
fn test_read_non_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("matrix.xlsx");
    std::fs::write(&path, "this is not a zip").unwrap();

    let err = read_workbook(&path).unwrap_err();
    assert!(matches!(err, DssError::Workbook(_)));
}

/// 拡張子が不明なファイル
#[test]
fn test_read_unknown_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("matrix.txt");
    std::fs::write(&path, "Service,Cost").unwrap();

    assert!(read_workbook(&path).is_err());
}

/// 存在しない保存先を参照するポリシー
#[test]
fn test_policy_with_unknown_destination() {
    let json = r#"{
        "destinations": [{"id": "a", "name": "A", "user_friendly_rating": 3}],
        "rules": [{"answer_key": "SIZE", "answer_value": "mid", "target": {"only": ["b"]}, "delta": 10}]
    }"#;
    let err = Policy::from_json(json).unwrap_err();
    let err: DssError = err.into();
    assert!(err.to_string().contains("unknown destination 'b'"));
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_is_transparent() {
    let dataset = dss_matrix_common::Dataset::from_json(r#"{"services": [{"Service": "A"}]}"#).unwrap();
    let mut session = Session::new(dataset);
    let err: DssError = session.set_filter("Region", "US").unwrap_err().into();
    assert_eq!(err.to_string(), "Unknown filter column: Region");
}

/// DssErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DssError::Config("テスト設定エラー".to_string()),
        DssError::FileNotFound("matrix.xlsx".to_string()),
        DssError::Workbook("zip error".to_string()),
        DssError::EmptyMatrix("Matrix".to_string()),
        DssError::InvalidDocument("services がありません".to_string()),
        DssError::DataUnavailable("no data".to_string()),
        DssError::ExcelGeneration("Excel生成エラー".to_string()),
        DssError::InvalidArgument("--select".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空");
    }
}

/// IOエラーからの変換
#[test]
fn test_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: DssError = io_error.into();
    assert!(matches!(err, DssError::Io(_)));
    assert!(err.to_string().contains("denied"));
}
