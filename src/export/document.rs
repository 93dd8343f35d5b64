//! データファイル出力

use crate::error::Result;
use dss_matrix_common::Dataset;
use std::path::Path;

/// Dataset を整形済みJSONとして書き出す（親ディレクトリは作成）
pub fn write_document(dataset: &Dataset, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = dataset.to_json_pretty()?;
    std::fs::write(output_path, json)?;
    Ok(())
}
