use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::{Answer, AnswerMap};
use crate::models::participant::{Participant, SkillLevel};

/// 提交包：参与者 + 全部答案 + 完成时间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBundle {
    pub participant: Participant,
    pub answers: AnswerMap,
    /// RFC 3339 格式的完成时间
    pub completed_at: String,
}

impl SubmissionBundle {
    pub fn new(participant: Participant, answers: AnswerMap, completed_at: DateTime<Utc>) -> Self {
        Self {
            participant,
            answers,
            completed_at: completed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 提交接口返回
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// 本地保存的提交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    /// 毫秒时间戳作为 ID
    pub id: i64,
    pub name: String,
    pub department: String,
    pub nickname: String,
    #[serde(rename = "skillLevel")]
    pub skill_level: SkillLevel,
    #[serde(rename = "startedAt", default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    pub answers: AnswerMap,
    pub completed_at: String,
    pub created_at: String,
}

impl StoredSubmission {
    pub fn from_bundle(bundle: &SubmissionBundle, created_at: DateTime<Utc>) -> Self {
        let p = &bundle.participant;
        Self {
            id: created_at.timestamp_millis(),
            name: p.name.clone(),
            department: p.department.clone(),
            nickname: p.nickname.clone(),
            skill_level: p.skill_level,
            started_at: p.started_at,
            answers: bundle.answers.clone(),
            completed_at: bundle.completed_at.clone(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 审阅端读取的单条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub nickname: String,
    pub skill_level: SkillLevel,
    pub completed_at: String,
    pub survey_answers: Vec<ReviewAnswer>,
}

/// 审阅记录中的单个答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAnswer {
    pub question_id: String,
    pub answer_text: Option<String>,
    pub answer_options: Option<Vec<String>>,
}

impl From<&StoredSubmission> for ReviewRecord {
    fn from(s: &StoredSubmission) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            department: s.department.clone(),
            nickname: s.nickname.clone(),
            skill_level: s.skill_level,
            completed_at: s.completed_at.clone(),
            survey_answers: s
                .answers
                .iter()
                .map(|(question_id, answer)| ReviewAnswer {
                    question_id: question_id.clone(),
                    answer_text: answer.as_text().map(str::to_string),
                    answer_options: match answer {
                        Answer::Choices(opts) => Some(opts.clone()),
                        Answer::Text(_) => None,
                    },
                })
                .collect(),
        }
    }
}

/// 审阅统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub total: usize,
    /// Beginner / Intermediate
    pub beginner: usize,
    /// Expert / Pro
    pub expert: usize,
    /// 第一条记录的完成时间
    pub latest_completed_at: Option<String>,
}

impl ReviewSummary {
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let beginner = records
            .iter()
            .filter(|r| matches!(r.skill_level, SkillLevel::Beginner | SkillLevel::Intermediate))
            .count();
        Self {
            total: records.len(),
            beginner,
            expert: records.len() - beginner,
            latest_completed_at: records.first().map(|r| r.completed_at.clone()),
        }
    }
}
