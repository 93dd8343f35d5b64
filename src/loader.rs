//! データ読み込み
//!
//! 生成済みJSONを優先し、読めない・空の場合はワークブックから再構築する。

use crate::error::{DssError, Result};
use crate::workbook::build_from_workbook;
use dss_matrix_common::Dataset;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 読み込み元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Document(PathBuf),
    Workbook(PathBuf),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Document(p) => write!(f, "{}", p.display()),
            DataSource::Workbook(p) => write!(f, "{} (ワークブック)", p.display()),
        }
    }
}

/// データファイルを読む（サービスが1件以上あるものだけ有効）
pub fn load_document(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(DssError::FileNotFound(path.display().to_string()));
    }

    let dataset = Dataset::from_file(path).map_err(|e| match e {
        dss_matrix_common::Error::Io(io) => DssError::Io(io),
        other => DssError::InvalidDocument(other.to_string()),
    })?;

    if dataset.services.is_empty() {
        return Err(DssError::InvalidDocument(format!(
            "サービスがありません: {}",
            path.display()
        )));
    }
    Ok(dataset)
}

/// Dataset を読み込む（JSON → ワークブックの順に試す）
pub fn load_dataset(data_path: &Path, workbook_path: &Path) -> Result<(Dataset, DataSource)> {
    let doc_err = match load_document(data_path) {
        Ok(dataset) => {
            debug!(path = %data_path.display(), "データファイルを読み込みました");
            return Ok((dataset, DataSource::Document(data_path.to_path_buf())));
        }
        Err(e) => e,
    };
    warn!(path = %data_path.display(), error = %doc_err, "データファイルを使えないためワークブックから構築します");

    match build_from_workbook(workbook_path) {
        Ok(dataset) => Ok((dataset, DataSource::Workbook(workbook_path.to_path_buf()))),
        Err(wb_err) => {
            warn!(path = %workbook_path.display(), error = %wb_err, "ワークブックも読み込めません");
            Err(DssError::DataUnavailable(format!("{}; {}", doc_err, wb_err)))
        }
    }
}
