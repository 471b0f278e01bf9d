//! 问卷作答流程 - 流程层
//!
//! 核心职责：按顺序遍历当前轨道的题目，维护游标和答案表，
//! 最后一题通过校验后组装提交包并交给提交网关
//!
//! 状态机：
//! 1. `Answering(i)` → `Answering(i + 1)`：当前题已作答，且不是最后一题
//! 2. `Answering(last)` → `Submitting`：最后一题已作答
//! 3. `Submitting` → `Done`：提交成功
//! 4. `Submitting` → `Answering(last)`：提交失败，只记录日志

use std::fmt::Display;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::TrackPolicy;
use crate::error::{AppResult, FlowError};
use crate::infrastructure::KvStore;
use crate::models::{Answer, AnswerMap, Participant, Question, QuestionKind, SubmissionBundle, Track};
use crate::services::catalog::{questions_for, resolve_track};
use crate::services::{AnswerStore, SubmissionGateway};

/// 流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// 正在回答第 i 题（从 0 开始）
    Answering(usize),
    /// 提交中，所有输入都被禁用
    Submitting,
    /// 已提交
    Done,
}

impl Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowState::Answering(i) => write!(f, "Answering({})", i),
            FlowState::Submitting => write!(f, "Submitting"),
            FlowState::Done => write!(f, "Done"),
        }
    }
}

/// 问卷流程
///
/// - 持有答案存储和提交网关
/// - 每次修改答案都同步写入存储
/// - 不关心界面如何展示
pub struct SurveyFlow<S: KvStore, G: SubmissionGateway> {
    store: AnswerStore<S>,
    gateway: G,
    participant: Participant,
    track: Track,
    questions: Vec<Question>,
    cursor: usize,
    answers: AnswerMap,
    state: FlowState,
    pending: Option<SubmissionBundle>,
}

impl<S: KvStore, G: SubmissionGateway> SurveyFlow<S, G> {
    /// 根据存储中的参与者开始作答
    pub fn start(store: AnswerStore<S>, gateway: G, policy: TrackPolicy) -> AppResult<Self> {
        let participant = store
            .get_participant()
            .ok_or(FlowError::MissingParticipant)?;
        let track = resolve_track(policy, &participant);
        info!(
            "📋 {} 开始作答，轨道: {} (等级: {})",
            participant.nickname, track, participant.skill_level
        );
        Self::with_questions(store, gateway, participant, track, questions_for(track))
    }

    /// 使用指定题目列表开始作答
    pub fn with_questions(
        store: AnswerStore<S>,
        gateway: G,
        participant: Participant,
        track: Track,
        questions: Vec<Question>,
    ) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(FlowError::EmptyCatalog.into());
        }
        // 只恢复本轨道题目的答案
        let mut answers = store.get_answers();
        let stored = answers.len();
        answers.retain(|id, _| questions.iter().any(|q| q.id() == id.as_str()));
        if stored > answers.len() {
            debug!("忽略 {} 个不属于轨道 {} 的已存答案", stored - answers.len(), track);
        }
        if !answers.is_empty() {
            debug!("从存储恢复 {} 个答案", answers.len());
        }
        Ok(Self {
            store,
            gateway,
            participant,
            track,
            questions,
            cursor: 0,
            answers,
            state: FlowState::Answering(0),
            pending: None,
        })
    }

    // ========== 只读访问 ==========

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn store(&self) -> &AnswerStore<S> {
        &self.store
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.answers.get(self.current_question().id())
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.questions.len()
    }

    /// 已组装、待提交的提交包
    pub fn pending_bundle(&self) -> Option<&SubmissionBundle> {
        self.pending.as_ref()
    }

    /// 当前题目是否已作答且非空，并且处于作答状态
    pub fn can_advance(&self) -> bool {
        matches!(self.state, FlowState::Answering(_))
            && self.current_answer().is_some_and(|a| !a.is_empty())
    }

    // ========== 导航 ==========

    /// 下一题；最后一题时进入 `Submitting`
    ///
    /// 当前题未作答或答案为空时不做任何事
    pub fn advance(&mut self) -> FlowState {
        if !self.can_advance() {
            debug!("无法前进: 状态 {}，题目 {}", self.state, self.current_question().id());
            return self.state;
        }

        if self.is_last() {
            let bundle =
                SubmissionBundle::new(self.participant.clone(), self.answers.clone(), Utc::now());
            info!("📤 最后一题已完成，准备提交 ({} 个答案)", bundle.answers.len());
            self.pending = Some(bundle);
            self.state = FlowState::Submitting;
        } else {
            self.cursor += 1;
            self.state = FlowState::Answering(self.cursor);
        }
        self.state
    }

    /// 上一题；已在第一题时不做任何事
    pub fn retreat(&mut self) -> FlowState {
        if let FlowState::Answering(_) = self.state {
            if self.cursor > 0 {
                self.cursor -= 1;
                self.state = FlowState::Answering(self.cursor);
            }
        }
        self.state
    }

    // ========== 作答 ==========

    /// 设置当前题目的答案（答案类型必须与题型一致，选项必须属于该题）
    pub fn set_answer(&mut self, value: Answer) -> AppResult<()> {
        self.ensure_answering("set_answer")?;
        let question = self.current_question();

        match (question.kind(), &value) {
            (QuestionKind::Text, Answer::Text(_)) => {}
            (QuestionKind::Single, Answer::Text(choice)) => {
                if !choice.is_empty() && !question.has_option(choice) {
                    return Err(unknown_option(question, choice));
                }
            }
            (QuestionKind::Multiple, Answer::Choices(choices)) => {
                if let Some(bad) = choices.iter().find(|c| !question.has_option(c)) {
                    return Err(unknown_option(question, bad));
                }
            }
            (kind, _) => {
                return Err(FlowError::AnswerKindMismatch {
                    question_id: question.id().to_string(),
                    expected: match kind {
                        QuestionKind::Multiple => "多选",
                        _ => "文本",
                    },
                }
                .into())
            }
        }

        self.write_current(value);
        Ok(())
    }

    /// 文本题作答
    pub fn set_text(&mut self, text: impl Into<String>) -> AppResult<()> {
        self.set_answer(Answer::Text(text.into()))
    }

    /// 单选题选择
    pub fn select_option(&mut self, option: &str) -> AppResult<()> {
        self.ensure_kind(QuestionKind::Single, "单选")?;
        self.set_answer(Answer::Text(option.to_string()))
    }

    /// 多选题切换选项：未选则追加到末尾，已选则移除，其余顺序不变
    pub fn toggle_option(&mut self, option: &str) -> AppResult<()> {
        self.ensure_answering("toggle_option")?;
        self.ensure_kind(QuestionKind::Multiple, "多选")?;
        let question = self.current_question();
        if !question.has_option(option) {
            return Err(unknown_option(question, option));
        }

        let current = self
            .current_answer()
            .and_then(Answer::as_choices)
            .unwrap_or_default();
        let next = Answer::toggled(current, option);
        self.write_current(Answer::Choices(next));
        Ok(())
    }

    // ========== 提交 ==========

    /// 执行提交：成功进入 `Done`，失败回到最后一题
    ///
    /// 非 `Submitting` 状态下不做任何事
    pub async fn submit(&mut self) -> FlowState {
        let Some(bundle) = self.pending.take().filter(|_| self.state == FlowState::Submitting) else {
            debug!("没有待提交的问卷，状态: {}", self.state);
            return self.state;
        };

        match self.gateway.submit(&bundle).await {
            Ok(()) => {
                info!("✓ 问卷提交成功: {}", self.participant.nickname);
                self.state = FlowState::Done;
            }
            Err(e) => {
                error!("提交问卷失败: {}", e);
                self.state = FlowState::Answering(self.cursor);
            }
        }
        self.state
    }

    /// 前进一步；若进入 `Submitting` 则立即提交
    pub async fn advance_and_submit(&mut self) -> FlowState {
        match self.advance() {
            FlowState::Submitting => self.submit().await,
            other => other,
        }
    }

    // ========== 内部辅助 ==========

    fn write_current(&mut self, value: Answer) {
        let id = self.current_question().id().to_string();
        self.store.save_answer(&id, &value);
        self.answers.insert(id, value);
    }

    fn ensure_answering(&self, action: &'static str) -> AppResult<()> {
        match self.state {
            FlowState::Answering(_) => Ok(()),
            other => Err(FlowError::InvalidState {
                state: other.to_string(),
                action,
            }
            .into()),
        }
    }

    fn ensure_kind(&self, kind: QuestionKind, expected: &'static str) -> AppResult<()> {
        if self.current_question().kind() == kind {
            Ok(())
        } else {
            Err(FlowError::AnswerKindMismatch {
                question_id: self.current_question().id().to_string(),
                expected,
            }
            .into())
        }
    }
}

fn unknown_option(question: &Question, option: &str) -> crate::error::AppError {
    FlowError::UnknownOption {
        question_id: question.id().to_string(),
        option: option.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, SubmitError};
    use crate::infrastructure::MemoryKvStore;
    use crate::models::SkillLevel;
    use crate::services::catalog::beginner_questions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 可控结果的提交网关
    struct StubGateway {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl StubGateway {
        fn ok() -> Self {
            Self {
                succeed: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                succeed: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SubmissionGateway for StubGateway {
        async fn submit(&self, _bundle: &SubmissionBundle) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(SubmitError::Rejected {
                    message: Some("db down".into()),
                }
                .into())
            }
        }
    }

    fn participant(level: SkillLevel) -> Participant {
        Participant::new("Mia", "QA", "mia", level).with_started_at(1)
    }

    fn beginner_flow(gateway: StubGateway) -> SurveyFlow<MemoryKvStore, StubGateway> {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant(SkillLevel::Beginner));
        SurveyFlow::start(store, gateway, TrackPolicy::Adaptive).unwrap()
    }

    /// 给当前题目填一个合法答案
    fn answer_current(flow: &mut SurveyFlow<MemoryKvStore, StubGateway>) {
        let question = flow.current_question().clone();
        match question.kind() {
            QuestionKind::Text => flow.set_text("an answer").unwrap(),
            QuestionKind::Single => flow.select_option(&question.options()[0]).unwrap(),
            QuestionKind::Multiple => flow.toggle_option(&question.options()[0]).unwrap(),
        }
    }

    #[test]
    fn test_start_requires_participant() {
        let store = AnswerStore::new(MemoryKvStore::new());
        let result = SurveyFlow::start(store, StubGateway::ok(), TrackPolicy::Adaptive);
        assert!(matches!(
            result,
            Err(AppError::Flow(FlowError::MissingParticipant))
        ));
    }

    #[test]
    fn test_start_picks_track() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant(SkillLevel::Pro));
        let flow = SurveyFlow::start(store, StubGateway::ok(), TrackPolicy::Adaptive).unwrap();
        assert_eq!(flow.track(), Track::Advanced);
        assert_eq!(flow.total(), 8);

        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant(SkillLevel::Pro));
        let flow = SurveyFlow::start(store, StubGateway::ok(), TrackPolicy::BeginnerOnly).unwrap();
        assert_eq!(flow.track(), Track::Beginner);
        assert_eq!(flow.total(), 12);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = SurveyFlow::with_questions(
            AnswerStore::new(MemoryKvStore::new()),
            StubGateway::ok(),
            participant(SkillLevel::Beginner),
            Track::Beginner,
            Vec::new(),
        );
        assert!(matches!(result, Err(AppError::Flow(FlowError::EmptyCatalog))));
    }

    #[test]
    fn test_advance_blocked_without_answer() {
        let mut flow = beginner_flow(StubGateway::ok());
        assert_eq!(flow.advance(), FlowState::Answering(0));

        flow.set_text("   ").unwrap();
        assert_eq!(flow.advance(), FlowState::Answering(0));
        assert_eq!(flow.cursor(), 0);

        flow.set_text("A friend showed me Scratch").unwrap();
        assert_eq!(flow.advance(), FlowState::Answering(1));

        // 多选题：选中后又取消，答案为空
        flow.toggle_option("Python").unwrap();
        flow.toggle_option("Python").unwrap();
        assert_eq!(flow.advance(), FlowState::Answering(1));
    }

    #[test]
    fn test_retreat_never_below_zero() {
        let mut flow = beginner_flow(StubGateway::ok());
        assert_eq!(flow.retreat(), FlowState::Answering(0));
        assert_eq!(flow.cursor(), 0);

        answer_current(&mut flow);
        flow.advance();
        assert_eq!(flow.retreat(), FlowState::Answering(0));
        assert_eq!(flow.retreat(), FlowState::Answering(0));
    }

    #[test]
    fn test_toggle_python_java_python() {
        let mut flow = beginner_flow(StubGateway::ok());
        answer_current(&mut flow);
        flow.advance();
        assert_eq!(flow.current_question().id(), "beg-2");

        flow.toggle_option("Python").unwrap();
        flow.toggle_option("Java").unwrap();
        flow.toggle_option("Python").unwrap();

        assert_eq!(
            flow.current_answer(),
            Some(&Answer::Choices(vec!["Java".to_string()]))
        );
        // 同步写入存储
        assert_eq!(
            flow.store().get_answers().get("beg-2"),
            Some(&Answer::Choices(vec!["Java".to_string()]))
        );
    }

    #[test]
    fn test_answer_validation() {
        let mut flow = beginner_flow(StubGateway::ok());

        // beg-1 是文本题
        assert!(matches!(
            flow.toggle_option("Python"),
            Err(AppError::Flow(FlowError::AnswerKindMismatch { .. }))
        ));
        assert!(matches!(
            flow.set_answer(Answer::Choices(vec![])),
            Err(AppError::Flow(FlowError::AnswerKindMismatch { .. }))
        ));

        answer_current(&mut flow);
        flow.advance();
        assert!(matches!(
            flow.toggle_option("COBOL"),
            Err(AppError::Flow(FlowError::UnknownOption { .. }))
        ));

        answer_current(&mut flow);
        flow.advance();
        assert_eq!(flow.current_question().id(), "beg-3");
        assert!(flow.select_option("Somewhat").is_err());
        flow.select_option("Very confident").unwrap();
        assert_eq!(flow.current_answer(), Some(&Answer::Text("Very confident".into())));
    }

    #[test]
    fn test_twelve_questions_reach_submitting() {
        let mut flow = beginner_flow(StubGateway::ok());

        for i in 0..11 {
            assert_eq!(flow.state(), FlowState::Answering(i));
            answer_current(&mut flow);
            assert_eq!(flow.advance(), FlowState::Answering(i + 1));
        }
        assert_eq!(flow.cursor(), 11);
        assert_eq!(flow.state(), FlowState::Answering(11));
        assert!(flow.is_last());

        answer_current(&mut flow);
        assert_eq!(flow.advance(), FlowState::Submitting);

        let bundle = flow.pending_bundle().unwrap();
        assert_eq!(bundle.answers.len(), 12);
        assert_eq!(bundle.participant.nickname, "mia");

        // 提交中禁止导航和修改
        assert_eq!(flow.advance(), FlowState::Submitting);
        assert_eq!(flow.retreat(), FlowState::Submitting);
        assert!(matches!(
            flow.set_text("late edit"),
            Err(AppError::Flow(FlowError::InvalidState { .. }))
        ));
    }

    #[tokio::test]
    async fn test_submit_success_is_done() {
        let mut flow = beginner_flow(StubGateway::ok());
        for _ in 0..12 {
            answer_current(&mut flow);
            flow.advance();
        }

        assert_eq!(flow.submit().await, FlowState::Done);
        assert_eq!(flow.gateway.calls.load(Ordering::SeqCst), 1);

        // 不会重复提交
        assert_eq!(flow.submit().await, FlowState::Done);
        assert_eq!(flow.gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_stays_on_last() {
        let mut flow = beginner_flow(StubGateway::failing());
        for _ in 0..12 {
            answer_current(&mut flow);
            flow.advance_and_submit().await;
        }

        assert_eq!(flow.state(), FlowState::Answering(11));
        assert!(flow.pending_bundle().is_none());
        assert_eq!(flow.gateway.calls.load(Ordering::SeqCst), 1);

        // 用户可以再次点击提交
        assert_eq!(flow.advance_and_submit().await, FlowState::Answering(11));
        assert_eq!(flow.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hydrates_answers_from_store() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant(SkillLevel::Beginner));
        store.save_answer("beg-1", &Answer::Text("Saved earlier".into()));

        let mut flow = SurveyFlow::with_questions(
            store,
            StubGateway::ok(),
            participant(SkillLevel::Beginner),
            Track::Beginner,
            beginner_questions(),
        )
        .unwrap();

        assert!(flow.can_advance());
        assert_eq!(flow.advance(), FlowState::Answering(1));
    }

    #[test]
    fn test_switching_track_drops_other_track_answers() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant(SkillLevel::Beginner));
        store.save_answer("beg-1", &Answer::Text("Started as a beginner".into()));

        // 重新登记为 Pro 后进入专家轨道
        store.set_participant(&participant(SkillLevel::Pro));
        let mut flow = SurveyFlow::start(store, StubGateway::ok(), TrackPolicy::Adaptive).unwrap();
        assert_eq!(flow.track(), Track::Advanced);
        assert!(flow.answers().is_empty());

        for _ in 0..8 {
            answer_current(&mut flow);
            flow.advance();
        }
        assert_eq!(flow.state(), FlowState::Submitting);

        let bundle = flow.pending_bundle().unwrap();
        assert_eq!(bundle.answers.len(), 8);
        assert!(bundle.answers.keys().all(|id| id.starts_with("adv-")));
    }
}
