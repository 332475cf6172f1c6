//! Prompt text sent alongside the user's entry.
//!
//! The prompts ask for exactly the keys of the active [`ReplyFields`] and
//! forbid the labels, numbering and emoji that the cleaner would otherwise
//! have to strip.

use crate::fields::{FieldKind, ReplyFields};

/// A system + user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Reflection prompt for one journal entry.
pub fn reflection_prompt(fields: &ReplyFields, user_input: &str) -> Prompt {
    let keys = fields.names().collect::<Vec<_>>().join(", ");
    let hints: Vec<String> = fields
        .iter()
        .filter_map(|f| {
            let what = describe(&f.name)?;
            Some(match f.kind {
                FieldKind::Text => format!("{}：{}", f.name, what),
                FieldKind::List { max_items } => {
                    format!("{}：{}（最大{}個の短い文字列の配列）", f.name, what, max_items)
                }
                FieldKind::Score { min, max, .. } => {
                    format!("{}：{}（{}〜{}の整数）", f.name, what, min, max)
                }
            })
        })
        .collect();

    let mut system = String::from("あなたは共感的で温かい日本語コーチです。");
    system.push_str(&format!("出力は必ずJSON一行のみ。キーは {keys}。"));
    if !hints.is_empty() {
        system.push_str(&hints.join("。"));
        system.push('。');
    }
    system.push_str(
        "数字やラベル（要約・助言・次の一言・カテゴリ）、番号（1. 2. 3.）、絵文字は付けない。\
         声に出して自然に聞こえる短文で。",
    );

    Prompt {
        system,
        user: format!("入力文：{user_input}\n短く過不足なく。句読点は日本語。"),
    }
}

/// Weekly reflection over the week's entry summaries (oldest first).
pub fn weekly_prompt(summaries: &[String], average_score: Option<f64>) -> Prompt {
    let mut user = String::from("今週の記録：\n");
    for s in summaries {
        user.push_str(s);
        user.push('\n');
    }
    if let Some(avg) = average_score {
        user.push_str(&format!("平均気分スコア：{avg:.0}\n"));
    }

    Prompt {
        system: "あなたは共感的な日本語コーチです。一週間の記録を読み、\
                 傾向と前向きな一言を三文以内でまとめてください。\
                 番号・ラベル・箇条書き・絵文字は使わないでください。"
            .into(),
        user,
    }
}

fn describe(name: &str) -> Option<&'static str> {
    Some(match name {
        "summary" => "入力内容を一文で要約",
        "advice" => "前向きで短い助言",
        "next" => "話しかけるように締めくくる次の一言",
        "category" => "感情カテゴリ",
        "score" => "気分スコア",
        "followup" => "次に尋ねる質問",
        _ => return None,
    })
}
