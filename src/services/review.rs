//! 审阅数据 - 业务能力层
//!
//! 把本地提交记录转换成审阅端读取的记录格式

use tracing::error;

use crate::infrastructure::KvStore;
use crate::models::{ReviewRecord, ReviewSummary};
use crate::services::submission_gateway::load_submissions;

/// 读取审阅记录，读取失败时返回空列表
pub fn load_review_records<S: KvStore + ?Sized>(store: &S) -> Vec<ReviewRecord> {
    match load_submissions(store) {
        Ok(submissions) => submissions.iter().map(ReviewRecord::from).collect(),
        Err(e) => {
            error!("读取问卷数据失败: {}", e);
            Vec::new()
        }
    }
}

/// 读取审阅记录并统计
pub fn summarize<S: KvStore + ?Sized>(store: &S) -> (Vec<ReviewRecord>, ReviewSummary) {
    let records = load_review_records(store);
    let summary = ReviewSummary::from_records(&records);
    (records, summary)
}
