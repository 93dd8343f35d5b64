//! 保存先スコアリング
//!
//! ウィザードの回答から各保存先のスコアを計算し、順位付けする。
//!
//! score = 使いやすさ評価 × 10 + 発火したルールの加減点
//!
//! ルール表は Policy として差し替え可能（組み込みプリセット / JSONファイル）。

use crate::error::{Error, Result};
use crate::stewardship::{
    default_categories, default_levels, default_matrix, DataCategory, LevelDefinition, MatrixEntry,
};
use crate::wizard::{default_steps, WizardStep};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ステップキー → 選択値
pub type Answers = BTreeMap<String, String>;

/// 評価1あたりの基礎点
pub const RATING_WEIGHT: i32 = 10;

/// 次点として表示する件数
pub const ALTERNATIVE_COUNT: usize = 2;

pub const DEFAULT_REASON: &str = "Standard institutional offering.";

fn default_reason() -> String {
    DEFAULT_REASON.to_string()
}

/// 保存先
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detailed_overview: String,
    #[serde(default)]
    pub allocation: String,
    #[serde(default)]
    pub cost_model: String,
    #[serde(default)]
    pub pricing_notes: String,
    #[serde(default)]
    pub full_cost_details: String,
    /// 使いやすさ（1-5）
    #[serde(alias = "rating")]
    pub user_friendly_rating: u8,
    #[serde(default)]
    pub best_for: Vec<String>,
    #[serde(default)]
    pub limitations: Vec<String>,
    #[serde(default)]
    pub governance_rules: Vec<String>,
    /// 利用申請
    #[serde(default)]
    pub request_link: String,
    /// 利用ガイド
    #[serde(default)]
    pub doc_link: String,
    /// 技術相談窓口
    #[serde(default)]
    pub consultation_link: String,
}

/// ルールの適用対象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    /// 指定した保存先のみ
    Only(Vec<String>),
    /// 指定した保存先以外すべて
    Except(Vec<String>),
}

impl RuleTarget {
    pub fn applies_to(&self, destination_id: &str) -> bool {
        match self {
            RuleTarget::Only(ids) => ids.iter().any(|id| id == destination_id),
            RuleTarget::Except(ids) => ids.iter().all(|id| id != destination_id),
        }
    }
}

/// 加減点ルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub answer_key: String,
    pub answer_value: String,
    pub target: RuleTarget,
    pub delta: i32,
    /// 推奨理由（後から発火したルールが上書き）
    #[serde(default)]
    pub reason: Option<String>,
}

impl ScoringRule {
    fn fires(&self, answers: &Answers, destination_id: &str) -> bool {
        answers.get(&self.answer_key).map(String::as_str) == Some(self.answer_value.as_str())
            && self.target.applies_to(destination_id)
    }
}

/// スコア付きの保存先
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredDestination {
    pub destination: Destination,
    pub score: i32,
    pub reason: String,
}

/// 順位付け結果（スコア降順、同点は元の順序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub ranked: Vec<ScoredDestination>,
}

impl Ranking {
    /// 第1候補
    pub fn primary(&self) -> Option<&ScoredDestination> {
        self.ranked.first()
    }

    /// 第2・第3候補
    pub fn alternatives(&self) -> &[ScoredDestination] {
        let end = self.ranked.len().min(1 + ALTERNATIVE_COUNT);
        self.ranked.get(1..end).unwrap_or(&[])
    }

    /// それ以外
    pub fn others(&self) -> &[ScoredDestination] {
        self.ranked.get(1 + ALTERNATIVE_COUNT..).unwrap_or(&[])
    }

    pub fn find(&self, destination_id: &str) -> Option<&ScoredDestination> {
        self.ranked.iter().find(|s| s.destination.id == destination_id)
    }
}

/// 1件のスコアと推奨理由を計算
pub fn score_destination(
    destination: &Destination,
    rules: &[ScoringRule],
    answers: &Answers,
    default_reason: &str,
) -> (i32, String) {
    let mut score = i32::from(destination.user_friendly_rating) * RATING_WEIGHT;
    let mut reason = default_reason;

    for rule in rules.iter().filter(|r| r.fires(answers, &destination.id)) {
        score = score.saturating_add(rule.delta);
        if let Some(r) = &rule.reason {
            reason = r;
        }
    }

    (score, reason.to_string())
}

/// 全保存先を順位付けする
pub fn rank(
    destinations: &[Destination],
    rules: &[ScoringRule],
    answers: &Answers,
    default_reason: &str,
) -> Ranking {
    let mut ranked: Vec<ScoredDestination> = destinations
        .iter()
        .map(|d| {
            let (score, reason) = score_destination(d, rules, answers, default_reason);
            ScoredDestination {
                destination: d.clone(),
                score,
                reason,
            }
        })
        .collect();

    // sort_by は安定ソート
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    Ranking { ranked }
}

/// スコアリングポリシー（保存先・ルール表・ウィザード手順・管理マトリクス）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub destinations: Vec<Destination>,
    pub rules: Vec<ScoringRule>,
    #[serde(default = "default_steps")]
    pub steps: Vec<WizardStep>,
    #[serde(default = "default_reason")]
    pub default_reason: String,
    /// サポートレベルの定義
    #[serde(default)]
    pub levels: Vec<LevelDefinition>,
    /// データ区分
    #[serde(default)]
    pub categories: Vec<DataCategory>,
    /// 区分 × 保存先 のサポートレベル
    #[serde(default)]
    pub matrix: Vec<MatrixEntry>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::default_preset()
    }
}

impl Policy {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// ルール・マトリクスが存在しない保存先や区分を指していないか確認
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            let ids = match &rule.target {
                RuleTarget::Only(ids) | RuleTarget::Except(ids) => ids,
            };
            if let Some(unknown) = ids.iter().find(|id| self.destination(id).is_none()) {
                return Err(Error::Config(format!(
                    "rule {}={} references unknown destination '{}'",
                    rule.answer_key, rule.answer_value, unknown
                )));
            }
        }

        for entry in &self.matrix {
            if self.category(&entry.category_id).is_none() {
                return Err(Error::Config(format!(
                    "matrix entry references unknown category '{}'",
                    entry.category_id
                )));
            }
            if self.destination(&entry.destination_id).is_none() {
                return Err(Error::Config(format!(
                    "matrix entry for {} references unknown destination '{}'",
                    entry.category_id, entry.destination_id
                )));
            }
        }
        Ok(())
    }

    pub fn destination(&self, id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    pub fn rank(&self, answers: &Answers) -> Ranking {
        rank(&self.destinations, &self.rules, answers, &self.default_reason)
    }

    /// 組み込みプリセット（M365 / Google / Azure の5保存先）
    pub fn default_preset() -> Self {
        Self {
            destinations: default_destinations(),
            rules: default_rules(),
            steps: default_steps(),
            default_reason: default_reason(),
            levels: default_levels(),
            categories: default_categories(),
            matrix: default_matrix(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_destinations() -> Vec<Destination> {
    vec![
        Destination {
            id: "onedrive".into(),
            name: "OneDrive (M365)".into(),
            description: "Personal work storage for individual business files.".into(),
            detailed_overview: "OneDrive provides a consistent experience for personal work drafts. It is the designated primary target for users moving individual files from legacy or local storage.".into(),
            allocation: "5TB per User".into(),
            cost_model: "Threshold-Based".into(),
            pricing_notes: "Included in M365 License.".into(),
            full_cost_details: "Initial 5TB is covered under the Enterprise M365 license. Storage exceeding this limit requires a justified business case and departmental chargeback.".into(),
            user_friendly_rating: 5,
            best_for: strings(&["Draft documents", "Individual working files", "Syncing files across devices"]),
            limitations: strings(&["Not for departmental records", "Limited external guest collaboration features"]),
            governance_rules: strings(&["Encryption at rest required", "No sharing with external personal accounts", "Subject to individual offboarding policy"]),
            request_link: "https://service-now.com/request_onedrive".into(),
            doc_link: "https://kb.corporate.com/onedrive-guide".into(),
            consultation_link: "https://service-now.com/it_consultation".into(),
        },
        Destination {
            id: "sharepoint".into(),
            name: "SharePoint (M365)".into(),
            description: "Long-term storage for departments and structured teams.".into(),
            detailed_overview: "SharePoint is the backbone for organizational data. It supports complex metadata, versioning, and large-scale document management for institutional records.".into(),
            allocation: "25TB per Site Collection".into(),
            cost_model: "Threshold-Based".into(),
            pricing_notes: "Included up to 5TB pool per Dept.".into(),
            full_cost_details: "Departmental allocations are pooled. If the total departmental footprint exceeds 5TB, the department will be billed per TB/year for excess capacity.".into(),
            user_friendly_rating: 3,
            best_for: strings(&["Departmental records", "Public-facing team content", "Intranet document publishing"]),
            limitations: strings(&["Complex permission management", "Not for high-frequency small file collaboration"]),
            governance_rules: strings(&["Requires Site Owner training", "Sensitivity labels must be applied", "Annual permission audit required"]),
            request_link: "https://service-now.com/request_sharepoint_site".into(),
            doc_link: "https://kb.corporate.com/sharepoint-guide".into(),
            consultation_link: "https://service-now.com/it_consultation".into(),
        },
        Destination {
            id: "teams".into(),
            name: "MS Teams (M365)".into(),
            description: "Collaborative space for active projects and small groups.".into(),
            detailed_overview: "Teams provides a high-velocity collaboration environment. Behind every Team is a SharePoint site, but the focus is on communication and iterative drafts.".into(),
            allocation: "5TB per Team".into(),
            cost_model: "Threshold-Based".into(),
            pricing_notes: "Standard teams are included.".into(),
            full_cost_details: "Usage counts toward the departmental M365 pool. Threshold alerts are triggered at 80% of the 5TB soft limit to prevent overages.".into(),
            user_friendly_rating: 4,
            best_for: strings(&["Daily collaboration", "Project-specific files", "Internal team drafts & chat sharing"]),
            limitations: strings(&["Storage limits per team", "Can become unstructured if not curated"]),
            governance_rules: strings(&["Team must have 2+ owners", "Inactive teams deleted after 12 months", "No PII in chat channels"]),
            request_link: "https://service-now.com/request_teams_group".into(),
            doc_link: "https://kb.corporate.com/teams-guide".into(),
            consultation_link: "https://service-now.com/it_consultation".into(),
        },
        Destination {
            id: "google".into(),
            name: "Google Drive (Workspace)".into(),
            description: "Cloud storage for Workspace users and research labs.".into(),
            detailed_overview: "Google Drive is the preferred choice for departments with established Google Workspace workflows and collaborative research environments.".into(),
            allocation: "2TB per Shared Drive".into(),
            cost_model: "Threshold-Based".into(),
            pricing_notes: "Quota-limited by Google terms.".into(),
            full_cost_details: "Accounts or shared drives exceeding 5TB must be migrated or converted to a paid Google Cloud Storage bucket with monthly usage billing.".into(),
            user_friendly_rating: 4,
            best_for: strings(&["Google Doc/Sheet collaboration", "Cross-institutional research sharing", "Lab-specific data management"]),
            limitations: strings(&["Secondary to M365 strategy", "External sharing strictly monitored", "Complex data export"]),
            governance_rules: strings(&["Business-only accounts", "No personal data mixed with corporate", "Shared Drive ownership strictly controlled"]),
            request_link: "https://service-now.com/request_google_drive".into(),
            doc_link: "https://kb.corporate.com/google-drive-guide".into(),
            consultation_link: "https://service-now.com/it_consultation".into(),
        },
        Destination {
            id: "azure".into(),
            name: "Azure Blob/Files".into(),
            description: "High-scale storage for research and technical data.".into(),
            detailed_overview: "Azure Storage provides enterprise-grade cloud storage for large datasets (Petabyte scale). It requires technical proficiency for management.".into(),
            allocation: "Unlimited (Elastic)".into(),
            cost_model: "Usage-Based".into(),
            pricing_notes: "Pay-as-you-go monthly.".into(),
            full_cost_details: "Billing is based on Tier (Hot/Cool/Archive). Hot storage is ~$0.018/GB. Data egress fees and transaction costs apply monthly.".into(),
            user_friendly_rating: 1,
            best_for: strings(&["Big Data sets", "Research sets > 5TB", "Database backups & Application data"]),
            limitations: strings(&["Requires technical setup", "No native file explorer interface", "Usage costs accrue daily"]),
            governance_rules: strings(&["Subscription-based access", "VNET integration required", "Identity access management via Entra ID"]),
            request_link: "https://service-now.com/request_azure_storage".into(),
            doc_link: "https://kb.corporate.com/azure-storage-guide".into(),
            consultation_link: "https://service-now.com/it_consultation_technical".into(),
        },
    ]
}

fn rule(key: &str, value: &str, target: RuleTarget, delta: i32, reason: Option<&str>) -> ScoringRule {
    ScoringRule {
        answer_key: key.into(),
        answer_value: value.into(),
        target,
        delta,
        reason: reason.map(str::to_string),
    }
}

fn only(ids: &[&str]) -> RuleTarget {
    RuleTarget::Only(ids.iter().map(|s| s.to_string()).collect())
}

fn default_rules() -> Vec<ScoringRule> {
    vec![
        rule("OWNERSHIP", "work", only(&["sharepoint"]), 50, None),
        rule("OWNERSHIP", "work", only(&["onedrive"]), -20, None),
        rule(
            "SENSITIVITY",
            "high",
            only(&["sharepoint", "azure"]),
            100,
            Some("Compliance prioritized: High sensitivity requires robust audit logs."),
        ),
        rule("SENSITIVITY", "high", only(&["google", "onedrive"]), -40, None),
        rule(
            "COLLABORATION",
            "active",
            only(&["teams"]),
            80,
            Some("Optimized for high-velocity internal project work."),
        ),
        rule("COLLABORATION", "active", only(&["google"]), 40, None),
        rule(
            "COLLABORATION",
            "structured",
            only(&["sharepoint"]),
            80,
            Some("Institutional record keeping standard."),
        ),
        rule(
            "SIZE",
            "enterprise",
            only(&["azure"]),
            150,
            Some("Cost-effective at massive scale (>5TB)."),
        ),
        rule(
            "SIZE",
            "enterprise",
            RuleTarget::Except(vec!["azure".into()]),
            -60,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> Answers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn order(ranking: &Ranking) -> Vec<&str> {
        ranking.ranked.iter().map(|s| s.destination.id.as_str()).collect()
    }

    #[test]
    fn test_no_answers_ranks_by_rating() {
        let policy = Policy::default_preset();
        let ranking = policy.rank(&Answers::new());
        // teams と google は同点で元の順序を保つ
        assert_eq!(order(&ranking), vec!["onedrive", "teams", "google", "sharepoint", "azure"]);
        assert_eq!(ranking.primary().unwrap().score, 50);
        assert!(ranking.ranked.iter().all(|s| s.reason == DEFAULT_REASON));
    }

    #[test]
    fn test_high_sensitivity_enterprise() {
        let policy = Policy::default_preset();
        let ranking = policy.rank(&answers(&[
            ("OWNERSHIP", "work"),
            ("SENSITIVITY", "high"),
            ("COLLABORATION", "structured"),
            ("SIZE", "enterprise"),
        ]));

        let azure = ranking.find("azure").unwrap();
        assert_eq!(azure.score, 10 + 100 + 150);
        assert_eq!(azure.reason, "Cost-effective at massive scale (>5TB).");

        let sharepoint = ranking.find("sharepoint").unwrap();
        assert_eq!(sharepoint.score, 30 + 50 + 100 + 80 - 60);
        // 後から発火したルールの理由で上書き
        assert_eq!(sharepoint.reason, "Institutional record keeping standard.");

        let onedrive = ranking.find("onedrive").unwrap();
        assert_eq!(onedrive.score, 50 - 20 - 40 - 60);
        assert_eq!(onedrive.reason, DEFAULT_REASON);

        assert_eq!(ranking.primary().unwrap().destination.id, "azure");
    }

    #[test]
    fn test_tiers() {
        let ranking = Policy::default_preset().rank(&answers(&[("COLLABORATION", "active")]));
        assert_eq!(ranking.primary().unwrap().destination.id, "teams");
        assert_eq!(ranking.alternatives().len(), 2);
        assert_eq!(ranking.others().len(), 2);
        assert_eq!(ranking.alternatives()[0].destination.id, "google");
    }

    #[test]
    fn test_tiers_with_few_destinations() {
        let mut policy = Policy::default_preset();
        policy.destinations.truncate(2);
        policy.rules.clear();
        let ranking = policy.rank(&Answers::new());
        assert_eq!(ranking.alternatives().len(), 1);
        assert!(ranking.others().is_empty());

        let empty = Ranking::default();
        assert!(empty.primary().is_none());
        assert!(empty.alternatives().is_empty());
        assert!(empty.others().is_empty());
    }

    #[test]
    fn test_scores_independent_of_input_order() {
        let policy = Policy::default_preset();
        let a = answers(&[("SENSITIVITY", "high"), ("SIZE", "enterprise")]);
        let forward = rank(&policy.destinations, &policy.rules, &a, DEFAULT_REASON);

        let mut reversed = policy.destinations.clone();
        reversed.reverse();
        let backward = rank(&reversed, &policy.rules, &a, DEFAULT_REASON);

        for scored in &forward.ranked {
            let other = backward.find(&scored.destination.id).unwrap();
            assert_eq!(scored.score, other.score);
            assert_eq!(scored.reason, other.reason);
        }
    }

    #[test]
    fn test_injected_rules() {
        let policy = Policy::from_json(
            r#"{
                "destinations": [
                    {"id": "a", "name": "A", "rating": 1},
                    {"id": "b", "name": "B", "user_friendly_rating": 2}
                ],
                "rules": [
                    {"answer_key": "K", "answer_value": "v", "target": {"except": ["b"]}, "delta": 50, "reason": "picked"}
                ]
            }"#,
        )
        .unwrap();
        let ranking = policy.rank(&answers(&[("K", "v")]));
        assert_eq!(ranking.primary().unwrap().destination.id, "a");
        assert_eq!(ranking.primary().unwrap().reason, "picked");
        assert_eq!(ranking.find("b").unwrap().reason, DEFAULT_REASON);
        // steps 省略時は組み込み手順
        assert!(!policy.steps.is_empty());
    }

    #[test]
    fn test_policy_rejects_unknown_destination() {
        let result = Policy::from_json(
            r#"{"destinations": [{"id": "a", "name": "A", "rating": 1}],
                "rules": [{"answer_key": "K", "answer_value": "v", "target": {"only": ["zzz"]}, "delta": 1}]}"#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let policy = Policy::from_json(
            r#"{
                "destinations": [{"id": "a", "name": "A", "rating": 1}],
                "rules": [
                    {"answer_key": "K", "answer_value": "v", "target": {"only": ["a"]}, "delta": 2147483647},
                    {"answer_key": "K", "answer_value": "v", "target": {"only": ["a"]}, "delta": 100}
                ]
            }"#,
        )
        .unwrap();
        let ranking = policy.rank(&answers(&[("K", "v")]));
        assert_eq!(ranking.primary().unwrap().score, i32::MAX);
    }

    #[test]
    fn test_preset_destination_details() {
        let policy = Policy::default_preset();
        for d in &policy.destinations {
            assert!(!d.detailed_overview.is_empty(), "{}", d.id);
            assert!(!d.full_cost_details.is_empty(), "{}", d.id);
            assert_eq!(d.governance_rules.len(), 3, "{}", d.id);
            assert!(d.request_link.starts_with("https://"), "{}", d.id);
            assert!(d.doc_link.starts_with("https://"), "{}", d.id);
            assert!(d.consultation_link.starts_with("https://"), "{}", d.id);
        }
        let azure = policy.destination("azure").unwrap();
        assert_eq!(azure.consultation_link, "https://service-now.com/it_consultation_technical");
    }

    #[test]
    fn test_rule_target() {
        assert!(RuleTarget::Only(vec!["a".into()]).applies_to("a"));
        assert!(!RuleTarget::Only(vec!["a".into()]).applies_to("b"));
        assert!(RuleTarget::Except(vec!["a".into()]).applies_to("b"));
        assert!(!RuleTarget::Except(vec!["a".into()]).applies_to("a"));
    }
}
