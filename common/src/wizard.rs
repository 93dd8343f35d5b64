//! 保存先ウィザード
//!
//! 所有 → 機密性 → 共同作業 → 保存期間 → 容量 の順に質問し、
//! 回答を集めて Policy で順位付けする。
//! 個人所有を選んだ場合は途中で結果に進む。

use crate::error::{Error, Result};
use crate::scoring::{Answers, Policy, Ranking};
use serde::{Deserialize, Serialize};

/// 選択肢
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// 次のステップ（None なら結果表示）
    #[serde(default)]
    pub next: Option<String>,
}

/// ウィザードの1ステップ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    pub options: Vec<StepOption>,
}

impl WizardStep {
    pub fn option(&self, value: &str) -> Option<&StepOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// ウィザードの進行状態
#[derive(Debug, Clone)]
pub struct WizardState<'a> {
    policy: &'a Policy,
    /// 現在のステップ（None なら結果）
    current: Option<String>,
    answers: Answers,
    history: Vec<String>,
}

impl<'a> WizardState<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self {
            policy,
            current: policy.steps.first().map(|s| s.key.clone()),
            answers: Answers::new(),
            history: Vec::new(),
        }
    }

    pub fn current_step(&self) -> Option<&'a WizardStep> {
        let key = self.current.as_deref()?;
        self.policy.steps.iter().find(|s| s.key == key)
    }

    pub fn is_complete(&self) -> bool {
        self.current_step().is_none()
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// 現在のステップに回答して次へ進む
    pub fn answer(&mut self, value: &str) -> Result<()> {
        let step = self.current_step().ok_or_else(|| Error::InvalidAnswer {
            step: "RESULT".into(),
            value: value.into(),
        })?;
        let option = step.option(value).ok_or_else(|| Error::InvalidAnswer {
            step: step.key.clone(),
            value: value.into(),
        })?;

        self.answers.insert(step.key.clone(), option.value.clone());
        self.history.push(step.key.clone());
        self.current = option.next.clone();
        Ok(())
    }

    /// 1つ前のステップに戻る（回答は保持）
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = Some(previous);
                true
            }
            None => false,
        }
    }

    /// 最初からやり直す
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn ranking(&self) -> Ranking {
        self.policy.rank(&self.answers)
    }
}

fn step(key: &str, title: &str, prompt: &str, options: Vec<StepOption>) -> WizardStep {
    WizardStep {
        key: key.into(),
        title: title.into(),
        prompt: prompt.into(),
        options,
    }
}

fn opt(value: &str, label: &str, description: &str, next: Option<&str>) -> StepOption {
    StepOption {
        value: value.into(),
        label: label.into(),
        description: description.into(),
        next: next.map(str::to_string),
    }
}

/// 組み込みの質問手順
pub fn default_steps() -> Vec<WizardStep> {
    vec![
        step(
            "OWNERSHIP",
            "Who owns this data?",
            "Determines institutional policy accountability.",
            vec![
                opt("work", "Corporate / Dept", "Business assets, official records, or team project data.", Some("SENSITIVITY")),
                opt("personal", "Individual Work", "Personal drafts, resumes, or non-departmental items.", None),
            ],
        ),
        step(
            "SENSITIVITY",
            "Classification?",
            "Matches data type to security controls.",
            vec![
                opt("high", "High (PII / HIPAA)", "SSNs, Patient IDs, or Export-controlled info.", Some("COLLABORATION")),
                opt("low", "Internal / Public", "General memos, public data, or non-sensitive drafts.", Some("COLLABORATION")),
            ],
        ),
        step(
            "COLLABORATION",
            "Collaboration Flow?",
            "",
            vec![
                opt("none", "Private Use", "", Some("RETENTION")),
                opt("active", "Fast Team Iteration", "", Some("RETENTION")),
                opt("structured", "Structured Institutional records", "", Some("RETENTION")),
            ],
        ),
        step(
            "RETENTION",
            "Archive Target?",
            "",
            vec![
                opt("temporary", "Project-Based", "Active for < 2 years.", Some("SIZE")),
                opt("permanent", "Permanent", "Institutional records retention.", Some("SIZE")),
            ],
        ),
        step(
            "SIZE",
            "Data Footprint?",
            "",
            vec![
                opt("standard", "<1TB", "", None),
                opt("mid", "1-5TB", "", None),
                opt("enterprise", ">5TB", "", None),
            ],
        ),
    ]
}
