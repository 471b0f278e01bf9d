//! # SOE Survey
//!
//! 多步骤问卷：登记 → 逐题作答 → 提交 → 感谢页倒计时
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有设备本地存储，只暴露 get / set / remove
//! - `FileKvStore` - JSON 文件存储；`MemoryKvStore` - 内存存储
//!
//! ### ② 业务能力层（Services）
//! - `AnswerStore` - 参与者与作答进度的持久化（失败只记录日志）
//! - `catalog` - 两条固定题目轨道
//! - `SubmissionGateway` - 一次性提交（HTTP / 本地）
//! - `registration` / `review` - 登记表校验、审阅记录
//!
//! ### ③ 流程层（Workflow）
//! - `SurveyFlow` - 游标 + 答案表 + 状态机
//! - `Countdown` - 提交成功后的倒计时与清理
//!
//! ### ④ 应用层
//! - `App` - 终端交互驱动

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, SessionOutcome};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FileKvStore, KvStore, MemoryKvStore};
pub use models::{Answer, AnswerMap, Participant, Question, SkillLevel, SubmissionBundle, Track};
pub use services::{AnswerStore, SubmissionGateway};
pub use workflow::{Countdown, FlowState, SurveyFlow};
