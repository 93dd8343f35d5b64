use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dss-matrix")]
#[command(about = "データ保存先マトリクスの取込・比較・保存先推薦ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ワークブックを読み込んでデータファイル（JSON）を生成
    Build {
        /// 入力ワークブック（デフォルト: 設定値）
        input: Option<PathBuf>,

        /// 出力JSONファイル（デフォルト: 設定値）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// サービス一覧をフィルタ付きで表示
    List {
        /// データファイル
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// データファイルが使えない場合のワークブック
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        /// フィルタ（COLUMN=VALUE、複数指定可）
        #[arg(short, long, value_parser = parse_key_value)]
        filter: Vec<(String, String)>,
    },

    /// 選択したサービスを比較
    Compare {
        /// 比較するサービス名（複数指定可）
        #[arg(short, long)]
        select: Vec<String>,

        /// フィルタに一致するサービスをすべて比較
        #[arg(long)]
        all_filtered: bool,

        /// フィルタ（COLUMN=VALUE、複数指定可）
        #[arg(short, long, value_parser = parse_key_value)]
        filter: Vec<(String, String)>,

        /// 比較表をExcelに出力
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// データファイル
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// データファイルが使えない場合のワークブック
        #[arg(short, long)]
        workbook: Option<PathBuf>,
    },

    /// 回答から保存先を推薦（非対話）
    Recommend {
        /// 回答（STEP=VALUE、複数指定可）
        #[arg(short, long, value_parser = parse_key_value)]
        answer: Vec<(String, String)>,

        /// ポリシーファイル（JSON）
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// 保存先の詳細を表示
        #[arg(long)]
        detail: bool,
    },

    /// データ区分 × 保存先 の管理マトリクスを表示
    Matrix {
        /// 区分の検索語（名称・説明に含むもの）
        #[arg(short, long)]
        category: Option<String>,

        /// ポリシーファイル（JSON）
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// サポートレベルの定義を表示
        #[arg(long)]
        legend: bool,
    },

    /// 対話形式で保存先を推薦
    Wizard {
        /// ポリシーファイル（JSON）
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 取込元ワークブックを設定
        #[arg(long)]
        set_workbook: Option<PathBuf>,

        /// データファイルを設定（build の出力先も兼ねる）
        #[arg(long)]
        set_data: Option<PathBuf>,

        /// ポリシーファイルを設定
        #[arg(long)]
        set_policy: Option<PathBuf>,
    },
}

/// "KEY=VALUE" を分解（VALUE は空でもよい）
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("KEY=VALUE 形式で指定してください: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("Sensitivity=High").unwrap(),
            ("Sensitivity".to_string(), "High".to_string())
        );
        assert_eq!(
            parse_key_value(" Data Category = PII, PHI ").unwrap(),
            ("Data Category".to_string(), "PII, PHI".to_string())
        );
        assert_eq!(parse_key_value("Cost=").unwrap().1, "");
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_cli_parses_matrix() {
        let cli = Cli::parse_from(["dss-matrix", "matrix", "-c", "health", "--legend"]);
        match cli.command {
            Commands::Matrix { category, legend, policy } => {
                assert_eq!(category.as_deref(), Some("health"));
                assert!(legend);
                assert!(policy.is_none());
            }
            _ => panic!("matrix expected"),
        }
    }

    #[test]
    fn test_cli_parses_repeated_filters() {
        let cli = Cli::parse_from([
            "dss-matrix", "list", "-f", "Region=US", "--filter", "Cost=Free",
        ]);
        match cli.command {
            Commands::List { filter, .. } => assert_eq!(filter.len(), 2),
            _ => panic!("list expected"),
        }
    }
}
