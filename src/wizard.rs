//! 対話式の保存先ウィザード
//!
//! 各ステップの選択肢に「戻る」「最初から」を加えて dialoguer で選ばせる。

use crate::error::Result;
use crate::report::format_ranking;
use dialoguer::Select;
use dss_matrix_common::{Policy, Ranking, WizardState, WizardStep};
use tracing::debug;

/// ステップでの操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// 選択肢を回答
    Answer(String),
    /// 1つ前に戻る
    Back,
    /// 最初からやり直す
    Restart,
}

/// 表示項目と対応する操作
pub fn step_items(step: &WizardStep, can_go_back: bool) -> Vec<(String, StepAction)> {
    let mut items: Vec<(String, StepAction)> = step
        .options
        .iter()
        .map(|o| {
            let label = if o.description.is_empty() {
                o.label.clone()
            } else {
                format!("{} - {}", o.label, o.description)
            };
            (label, StepAction::Answer(o.value.clone()))
        })
        .collect();

    if can_go_back {
        items.push(("← 戻る".to_string(), StepAction::Back));
        items.push(("最初から".to_string(), StepAction::Restart));
    }
    items
}

/// 操作を状態に適用
pub fn apply_action(state: &mut WizardState<'_>, action: &StepAction) -> Result<()> {
    match action {
        StepAction::Answer(value) => state.answer(value)?,
        StepAction::Back => {
            state.back();
        }
        StepAction::Restart => state.reset(),
    }
    Ok(())
}

/// 結果表示での操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    /// 最後のステップに戻る
    Back,
    /// 最初からやり直す
    Restart,
    /// 終了
    Done,
}

/// 結果表示の選択肢
pub fn result_items() -> Vec<(&'static str, ResultAction)> {
    vec![
        ("完了", ResultAction::Done),
        ("← 戻る", ResultAction::Back),
        ("最初から", ResultAction::Restart),
    ]
}

/// 結果表示での操作を適用（ウィザードを続けるなら true）
pub fn apply_result_action(state: &mut WizardState<'_>, action: ResultAction) -> bool {
    match action {
        ResultAction::Back => state.back(),
        ResultAction::Restart => {
            state.reset();
            true
        }
        ResultAction::Done => false,
    }
}

/// ウィザードを対話で実行して結果を返す
pub fn run_interactive_wizard(policy: &Policy, detail: bool) -> Result<Ranking> {
    let mut state = WizardState::new(policy);
    let mut depth = 0usize;

    loop {
        while let Some(step) = state.current_step() {
            println!("\n{}", step.title);
            if !step.prompt.is_empty() {
                println!("{}", step.prompt);
            }

            let items = step_items(step, depth > 0);
            let labels: Vec<&str> = items.iter().map(|(l, _)| l.as_str()).collect();
            let selection = Select::new().items(&labels).default(0).interact()?;

            let action = &items[selection].1;
            debug!(step = %step.key, ?action, "ウィザード操作");
            apply_action(&mut state, action)?;

            depth = match action {
                StepAction::Answer(_) => depth + 1,
                StepAction::Back => depth.saturating_sub(1),
                StepAction::Restart => 0,
            };
        }

        let ranking = state.ranking();
        println!("\n{}", format_ranking(&ranking, detail));

        let items = result_items();
        let labels: Vec<&str> = items.iter().map(|(l, _)| *l).collect();
        let selection = Select::new().items(&labels).default(0).interact()?;

        let action = items[selection].1;
        debug!(?action, "結果画面の操作");
        if !apply_result_action(&mut state, action) {
            return Ok(ranking);
        }
        depth = match action {
            ResultAction::Back => depth.saturating_sub(1),
            _ => 0,
        };
    }
}
