use thiserror::Error;

#[derive(Error, Debug)]
pub enum DssError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ワークブック読み込みエラー: {0}")]
    Workbook(String),

    #[error("マトリクスシートにデータがありません: {0}")]
    EmptyMatrix(String),

    #[error("データファイルが不正: {0}")]
    InvalidDocument(String),

    #[error("データを読み込めません。`dss-matrix build` でデータファイルを生成してください ({0})")]
    DataUnavailable(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("引数が不正: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Common(#[from] dss_matrix_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<calamine::Error> for DssError {
    fn from(e: calamine::Error) -> Self {
        DssError::Workbook(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DssError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DssError::ExcelGeneration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DssError>;
