//! 登记表服务 - 业务能力层
//!
//! 校验登记表并写入参与者信息

use chrono::Utc;
use tracing::info;

use crate::error::{AppResult, FlowError};
use crate::infrastructure::KvStore;
use crate::models::{Participant, SkillLevel};
use crate::services::answer_store::AnswerStore;

/// 登记表内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub department: String,
    pub nickname: String,
    pub skill_level: SkillLevel,
}

impl RegistrationForm {
    /// 校验并生成参与者（字段去除首尾空白，任一为空则拒绝）
    pub fn into_participant(self, started_at_millis: i64) -> AppResult<Participant> {
        let name = required("name", &self.name)?;
        let department = required("department", &self.department)?;
        let nickname = required("nickname", &self.nickname)?;
        Ok(Participant::new(name, department, nickname, self.skill_level)
            .with_started_at(started_at_millis))
    }
}

fn required(field: &'static str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FlowError::BlankField { field }.into());
    }
    Ok(trimmed.to_string())
}

/// 提交登记表，保存参与者
pub fn register_participant<S: KvStore>(
    store: &AnswerStore<S>,
    form: RegistrationForm,
) -> AppResult<Participant> {
    let participant = form.into_participant(Utc::now().timestamp_millis())?;
    store.set_participant(&participant);
    info!(
        "✓ 参与者已登记: {} ({}, {})",
        participant.nickname, participant.department, participant.skill_level
    );
    Ok(participant)
}

/// 回填登记表：已有参与者时使用其信息，否则为空表（等级默认 Beginner）
pub fn prefill_form<S: KvStore>(store: &AnswerStore<S>) -> RegistrationForm {
    match store.get_participant() {
        Some(p) if !p.name.is_empty() => RegistrationForm {
            name: p.name,
            department: p.department,
            nickname: p.nickname,
            skill_level: p.skill_level,
        },
        _ => RegistrationForm::default(),
    }
}
