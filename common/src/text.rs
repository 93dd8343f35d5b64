//! 文字列ユーティリティ
//!
//! スラッグ生成とセル値の分割。正規化・照合・フィルタで共通に使う。

/// 複数値セルの区切り文字
pub const MULTI_VALUE_SEPARATORS: [char; 2] = [',', ';'];

/// スラッグが空になった場合の代替値
pub const FALLBACK_SLUG: &str = "col";

/// 表示ラベルから識別子を生成する
///
/// 前後の空白を除去し、連続する空白を `_` に置換、英数字と `_` 以外を削除して小文字化する。
/// 結果が空の場合は `"col"` を返す。
pub fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_whitespace = false;

    for c in label.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
        }
    }

    if out.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        out
    }
}

/// 複数値セルを `,` / `;` で分割（空要素は除外）
pub fn split_multi_value(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(MULTI_VALUE_SEPARATORS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// 選択肢の比較キー
pub fn option_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 改行区切りの選択肢セルを分割（順序は保持）
pub fn split_options(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
