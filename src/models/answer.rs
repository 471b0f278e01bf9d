use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个题目的答案
///
/// 线上格式：文本题和单选题是 JSON 字符串，多选题是字符串数组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// 文本题 / 单选题
    Text(String),
    /// 多选题（保持勾选顺序）
    Choices(Vec<String>),
}

impl Answer {
    /// 是否为空答案（空白字符串或空选项列表）
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.trim().is_empty(),
            Answer::Choices(opts) => opts.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            Answer::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Answer::Text(_) => None,
            Answer::Choices(opts) => Some(opts),
        }
    }

    /// 切换多选项：不存在则追加，存在则移除，其余选项顺序不变
    pub fn toggled(choices: &[String], option: &str) -> Vec<String> {
        if choices.iter().any(|o| o == option) {
            choices.iter().filter(|o| *o != option).cloned().collect()
        } else {
            let mut next = choices.to_vec();
            next.push(option.to_string());
            next
        }
    }
}

/// 题目 ID → 答案
pub type AnswerMap = BTreeMap<String, Answer>;
