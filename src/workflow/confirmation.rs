//! 提交成功后的确认倒计时
//!
//! 倒计时结束后清除本地作答状态，回到登记页

use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::KvStore;
use crate::services::AnswerStore;

/// 感谢页上显示的称呼
pub fn greeting_name<S: KvStore>(store: &AnswerStore<S>) -> String {
    store
        .get_participant()
        .map(|p| p.name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// 确认倒计时
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    secs: u32,
    tick: Duration,
}

impl Countdown {
    pub fn new(secs: u32, tick: Duration) -> Self {
        Self { secs, tick }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.countdown_secs, Duration::from_secs(1))
    }

    pub fn secs(&self) -> u32 {
        self.secs
    }

    /// 运行倒计时
    ///
    /// 每个节拍回调一次剩余秒数（secs, secs-1, …, 1），结束后执行 `clear_all`
    pub async fn run<S: KvStore>(&self, store: &AnswerStore<S>, mut on_tick: impl FnMut(u32)) {
        for remaining in (1..=self.secs).rev() {
            on_tick(remaining);
            sleep(self.tick).await;
        }
        store.clear_all();
        info!("⏱️ 倒计时结束，本地作答状态已清除");
    }
}
