//! 端末向けの表示整形
//!
//! 文字列を組み立てるだけで出力はしない（main で println! する）。

use dss_matrix_common::scoring::ScoredDestination;
use dss_matrix_common::{ComparisonTable, MatrixRow, Policy, Ranking, Session};

/// フィルタ項目の一覧
pub fn format_filter_sources(session: &Session) -> String {
    let mut out = String::new();
    for source in session.filter_sources() {
        let current = session
            .filter_values()
            .get(&source.column)
            .filter(|v| !v.is_empty());
        out.push_str(&format!("  {} [{}]", source.label, source.column));
        if let Some(value) = current {
            out.push_str(&format!(" = {}", value));
        }
        out.push('\n');
        if !source.options.is_empty() {
            out.push_str(&format!("    {}\n", source.options.join(" / ")));
        }
    }
    out
}

/// サービス一覧（一致するものに ✔、選択中に *）
pub fn format_service_list(session: &Session) -> String {
    let mut out = String::new();
    for service in &session.dataset().services {
        let mark = if session.matches(service) { "✔" } else { " " };
        let selected = if session.is_selected(service) { "*" } else { " " };
        out.push_str(&format!("{}{} {}\n", mark, selected, session.service_name(service)));

        let description = session.description(service);
        if !description.is_empty() {
            out.push_str(&format!("     {}\n", description));
        }
    }
    out.push_str(&format!("\n一致: {}\n", session.match_count()));
    out
}

/// 比較表（属性ごとに1ブロック）
pub fn format_comparison(table: &ComparisonTable) -> String {
    let mut out = String::new();
    for (row_idx, row) in table.rows.iter().enumerate() {
        if row_idx > 0 {
            out.push('\n');
        }
        for (header, value) in table.headers.iter().zip(row) {
            let mut lines = value.lines();
            out.push_str(&format!("{}: {}\n", header, lines.next().unwrap_or("")));
            for line in lines {
                out.push_str(&format!("    {}\n", line));
            }
        }
    }
    out
}

fn format_destination(item: &ScoredDestination, detail: bool) -> String {
    let d = &item.destination;
    let mut out = format!("{} (score {}) - {}\n", d.name, item.score, item.reason);
    if detail {
        if !d.description.is_empty() {
            out.push_str(&format!("    {}\n", d.description));
        }
        if !d.detailed_overview.is_empty() {
            out.push_str(&format!("    {}\n", d.detailed_overview));
        }
        if !d.allocation.is_empty() {
            out.push_str(&format!("    容量: {}\n", d.allocation));
        }
        if !d.cost_model.is_empty() {
            out.push_str(&format!("    費用: {}\n", d.cost_model));
        }
        if !d.pricing_notes.is_empty() {
            out.push_str(&format!("    料金: {}\n", d.pricing_notes));
        }
        if !d.best_for.is_empty() {
            out.push_str(&format!("    適する用途: {}\n", d.best_for.join(", ")));
        }
        if !d.limitations.is_empty() {
            out.push_str(&format!("    制限: {}\n", d.limitations.join(", ")));
        }
        if !d.full_cost_details.is_empty() {
            out.push_str(&format!("    費用詳細: {}\n", d.full_cost_details));
        }
        if !d.governance_rules.is_empty() {
            out.push_str(&format!("    運用ルール: {}\n", d.governance_rules.join(", ")));
        }
        for (label, link) in [
            ("申請", &d.request_link),
            ("ガイド", &d.doc_link),
            ("相談", &d.consultation_link),
        ] {
            if !link.is_empty() {
                out.push_str(&format!("    {}: {}\n", label, link));
            }
        }
    }
    out
}

/// 推薦結果（第一候補・代替・その他）
pub fn format_ranking(ranking: &Ranking, detail: bool) -> String {
    let mut out = String::new();
    if let Some(primary) = ranking.primary() {
        out.push_str("推奨:\n  ");
        out.push_str(&format_destination(primary, detail));
    }
    if !ranking.alternatives().is_empty() {
        out.push_str("代替候補:\n");
        for item in ranking.alternatives() {
            out.push_str("  ");
            out.push_str(&format_destination(item, detail));
        }
    }
    if !ranking.others().is_empty() {
        out.push_str("その他:\n");
        for item in ranking.others() {
            out.push_str("  ");
            out.push_str(&format_destination(item, false));
        }
    }
    out
}

/// サポートレベルの凡例
pub fn format_level_definitions(policy: &Policy) -> String {
    policy
        .levels
        .iter()
        .map(|d| format!("  {}: {}\n    {}\n", d.level, d.definition, d.guidance))
        .collect()
}

/// 管理マトリクス（区分ごとに保存先のレベルと推奨申請先）
pub fn format_matrix(policy: &Policy, rows: &[MatrixRow<'_>]) -> String {
    let mut out = String::new();
    for row in rows {
        let c = row.category;
        out.push_str(&format!("{} [{}] ({} Security Level)\n", c.label, c.id, c.sensitivity));
        if !c.description.is_empty() {
            out.push_str(&format!("    {}\n", c.description));
        }
        for (d, level) in policy.destinations.iter().zip(&row.levels) {
            let level = level.map(|l| l.as_str()).unwrap_or("-");
            out.push_str(&format!("    {:<28}{}\n", d.name, level));
        }
        match row.recommended {
            Some(d) => {
                out.push_str(&format!("  → Request {}: {}\n", d.name, d.request_link));
                if !d.full_cost_details.is_empty() {
                    out.push_str(&format!("    {}\n", d.full_cost_details));
                }
            }
            None => out.push_str("  → Manual Review\n"),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dss_matrix_common::types::grid_from_strs;
    use dss_matrix_common::{normalize, Answers};

    fn session() -> Session {
        let dataset = normalize(&grid_from_strs(&[
            &["Service", "Region"],
            &["S3", "US"],
            &["GCS", "EU"],
        ]))
        .unwrap();
        Session::new(dataset)
    }

    #[test]
    fn test_service_list_marks_matches() {
        let mut s = session();
        s.set_filter("Region", "EU").unwrap();
        let text = format_service_list(&s);
        assert!(text.contains("✔  GCS"));
        assert!(text.contains("   S3"));
        assert!(text.ends_with("一致: 1 of 2\n"));
    }

    #[test]
    fn test_filter_sources_show_current_value() {
        let mut s = session();
        s.set_filter("Region", "US").unwrap();
        let text = format_filter_sources(&s);
        assert!(text.contains("Region [Region] = US"));
        assert!(text.contains("EU / US"));
    }

    #[test]
    fn test_comparison_multiline_values() {
        let table = ComparisonTable {
            headers: vec!["Service".into(), "Notes".into()],
            rows: vec![vec!["S3".into(), "first\nsecond".into()]],
        };
        assert_eq!(format_comparison(&table), "Service: S3\nNotes: first\n    second\n");
    }

    #[test]
    fn test_ranking_sections() {
        let policy = Policy::default_preset();
        let text = format_ranking(&policy.rank(&Answers::new()), true);
        assert!(text.starts_with("推奨:\n"));
        assert!(text.contains("代替候補:\n"));
        assert!(text.contains("その他:\n"));

        // 推奨（onedrive）の詳細
        assert!(text.contains("OneDrive provides a consistent experience"));
        assert!(text.contains("費用詳細: Initial 5TB is covered"));
        assert!(text.contains("運用ルール: Encryption at rest required, "));
        assert!(text.contains("申請: https://service-now.com/request_onedrive\n"));
        assert!(text.contains("ガイド: https://kb.corporate.com/onedrive-guide\n"));
        assert!(text.contains("相談: https://service-now.com/it_consultation\n"));
    }

    #[test]
    fn test_ranking_without_detail_is_one_line_each() {
        let policy = Policy::default_preset();
        let text = format_ranking(&policy.rank(&Answers::new()), false);
        assert!(!text.contains("申請:"));
        assert_eq!(text.lines().count(), 5 + 3);
    }

    #[test]
    fn test_matrix_rows() {
        let policy = Policy::default_preset();
        let text = format_matrix(&policy, &policy.matrix_rows("health"));
        assert!(text.starts_with("Health Data (HIPAA) [hipaa] (High Security Level)\n"));
        assert!(text.contains("Not Permitted"));
        assert!(text.contains("→ Request SharePoint (M365): https://service-now.com/request_sharepoint_site\n"));

        let text = format_matrix(&policy, &policy.matrix_rows("personal"));
        assert!(text.contains("→ Manual Review\n"));
    }

    #[test]
    fn test_level_definitions() {
        let text = format_level_definitions(&Policy::default_preset());
        assert!(text.starts_with("  Recommended: The primary"));
        assert!(text.contains("  Case-by-Case: "));
    }
}
