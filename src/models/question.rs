use serde::{Deserialize, Serialize};

/// 问卷题目
///
/// 三种题型：自由文本、单选、多选。题目在各自轨道内顺序固定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    /// 自由文本
    Text { id: String, prompt: String },
    /// 单选，必须且只能选一个
    Single {
        id: String,
        prompt: String,
        options: Vec<String>,
    },
    /// 多选，可选任意子集
    Multiple {
        id: String,
        prompt: String,
        options: Vec<String>,
    },
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Single,
    Multiple,
}

impl Question {
    pub fn text(id: &str, prompt: &str) -> Self {
        Question::Text {
            id: id.to_string(),
            prompt: prompt.to_string(),
        }
    }

    pub fn single(id: &str, prompt: &str, options: &[&str]) -> Self {
        Question::Single {
            id: id.to_string(),
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn multiple(id: &str, prompt: &str, options: &[&str]) -> Self {
        Question::Multiple {
            id: id.to_string(),
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Question::Text { id, .. } | Question::Single { id, .. } | Question::Multiple { id, .. } => id,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Question::Text { prompt, .. }
            | Question::Single { prompt, .. }
            | Question::Multiple { prompt, .. } => prompt,
        }
    }

    /// 选项列表（文本题为空）
    pub fn options(&self) -> &[String] {
        match self {
            Question::Text { .. } => &[],
            Question::Single { options, .. } | Question::Multiple { options, .. } => options.as_slice(),
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Text { .. } => QuestionKind::Text,
            Question::Single { .. } => QuestionKind::Single,
            Question::Multiple { .. } => QuestionKind::Multiple,
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options().iter().any(|o| o == option)
    }
}
