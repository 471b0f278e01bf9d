use serde::{Deserialize, Serialize};

/// 技能等级
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Pro,
}

impl SkillLevel {
    /// 登记表中展示的全部等级（按顺序）
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Expert,
        SkillLevel::Pro,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Expert => "Expert",
            SkillLevel::Pro => "Pro",
        }
    }

    /// 尝试从字符串解析等级（忽略大小写）
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lvl| lvl.name().eq_ignore_ascii_case(s.trim()))
    }

    /// 该等级对应的题目轨道
    pub fn track(self) -> Track {
        match self {
            SkillLevel::Beginner | SkillLevel::Intermediate => Track::Beginner,
            SkillLevel::Expert | SkillLevel::Pro => Track::Advanced,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 题目轨道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// 初级 / 中级
    Beginner,
    /// 专家 / 资深
    Advanced,
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Track::Beginner => write!(f, "beginner"),
            Track::Advanced => write!(f, "advanced"),
        }
    }
}

/// 问卷参与者
///
/// 在登记表提交时创建，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub department: String,
    pub nickname: String,
    pub skill_level: SkillLevel,
    /// 开始时间（毫秒时间戳）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        nickname: impl Into<String>,
        skill_level: SkillLevel,
    ) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            nickname: nickname.into(),
            skill_level,
            started_at: None,
        }
    }

    pub fn with_started_at(mut self, millis: i64) -> Self {
        self.started_at = Some(millis);
        self
    }
}
