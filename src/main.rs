use anyhow::Context;
use clap::Parser;
use dss_matrix::{cli, config, error, export, loader, logging, report, wizard, workbook};
use cli::{Cli, Commands};
use config::Config;
use dss_matrix_common::{Answers, Policy, Session};
use error::DssError;
use std::path::{Path, PathBuf};

fn load_policy(path: Option<&Path>) -> anyhow::Result<Policy> {
    match path {
        Some(p) => Policy::from_file(p)
            .with_context(|| format!("ポリシーを読み込めません: {}", p.display())),
        None => Ok(Policy::default_preset()),
    }
}

fn load_session(
    config: &Config,
    data: Option<PathBuf>,
    workbook: Option<PathBuf>,
    filters: &[(String, String)],
) -> anyhow::Result<Session> {
    let data_path = data.unwrap_or_else(|| config.data_path.clone());
    let workbook_path = workbook.unwrap_or_else(|| config.workbook_path.clone());

    let (dataset, source) = loader::load_dataset(&data_path, &workbook_path)?;
    println!("✔ 読み込み: {} {}\n", source, dataset.summary());

    let mut session = Session::new(dataset);
    for (column, value) in filters {
        session.set_filter(column, value).map_err(DssError::from)?;
    }
    Ok(session)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&logging::LogConfig::from_verbose(cli.verbose));
    let config = Config::load()?;

    match cli.command {
        Commands::Build { input, output } => {
            let input = input.unwrap_or_else(|| config.workbook_path.clone());
            let output = output.unwrap_or_else(|| config.output_path.clone());

            let dataset = workbook::build_from_workbook(&input)
                .with_context(|| format!("ワークブックを処理できません: {}", input.display()))?;
            export::write_document(&dataset, &output)
                .with_context(|| format!("書き込みに失敗: {}", output.display()))?;

            println!("Wrote {} {}", output.display(), dataset.summary());
        }

        Commands::List { data, workbook, filter } => {
            let session = load_session(&config, data, workbook, &filter)?;

            println!("フィルタ:");
            print!("{}", report::format_filter_sources(&session));
            println!("\nサービス:");
            print!("{}", report::format_service_list(&session));
        }

        Commands::Compare { select, all_filtered, filter, xlsx, data, workbook } => {
            let mut session = load_session(&config, data, workbook, &filter)?;

            if all_filtered {
                session.select_all_filtered();
            }
            for name in &select {
                session.select(name).map_err(DssError::from)?;
            }

            let table = session.comparison();
            if table.rows.is_empty() {
                return Err(DssError::InvalidArgument(
                    "比較するサービスを --select または --all-filtered で指定してください".into(),
                )
                .into());
            }

            print!("{}", report::format_comparison(&table));

            if let Some(path) = xlsx {
                export::write_comparison(&table, &path)
                    .with_context(|| format!("書き込みに失敗: {}", path.display()))?;
                println!("\n✔ 比較表を保存: {}", path.display());
            }
        }

        Commands::Recommend { answer, policy, detail } => {
            let policy = load_policy(policy.as_deref().or(config.policy_path.as_deref()))?;

            let answers: Answers = answer.into_iter().collect();
            for (key, value) in &answers {
                let known = policy
                    .steps
                    .iter()
                    .find(|s| &s.key == key)
                    .map(|s| s.option(value).is_some());
                if known != Some(true) {
                    tracing::warn!(step = %key, value = %value, "どのステップにも一致しない回答");
                }
            }

            print!("{}", report::format_ranking(&policy.rank(&answers), detail));
        }

        Commands::Matrix { category, policy, legend } => {
            let policy = load_policy(policy.as_deref().or(config.policy_path.as_deref()))?;

            if legend {
                println!("サポートレベル:");
                println!("{}", report::format_level_definitions(&policy));
            }

            let rows = policy.matrix_rows(category.as_deref().unwrap_or(""));
            if rows.is_empty() {
                println!("一致するデータ区分がありません");
            } else {
                print!("{}", report::format_matrix(&policy, &rows));
            }
        }

        Commands::Wizard { policy } => {
            let policy = load_policy(policy.as_deref().or(config.policy_path.as_deref()))?;
            wizard::run_interactive_wizard(&policy, true)?;
        }

        Commands::Config { show, set_workbook, set_data, set_policy } => {
            let mut config = config;
            let changed = set_workbook.is_some() || set_data.is_some() || set_policy.is_some();

            if let Some(path) = set_workbook {
                config.workbook_path = path;
            }
            if let Some(path) = set_data {
                config.data_path = path.clone();
                config.output_path = path;
            }
            if let Some(path) = set_policy {
                config.policy_path = Some(path);
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  ワークブック: {}", config.workbook_path.display());
                println!("  データファイル: {}", config.data_path.display());
                println!("  出力先: {}", config.output_path.display());
                println!(
                    "  ポリシー: {}",
                    config
                        .policy_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
            }
        }
    }

    Ok(())
}
