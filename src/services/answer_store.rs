//! 答案存储服务 - 业务能力层
//!
//! 只负责"保存参与者和作答进度"能力，不关心流程

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::infrastructure::KvStore;
use crate::models::{Answer, AnswerMap, Participant};

/// 参与者记录的存储键
pub const PARTICIPANT_KEY: &str = "soapbox_participant";
/// 作答进度的存储键
pub const ANSWERS_KEY: &str = "soapbox_answers";

/// 答案存储
///
/// 所有操作都是同步、尽力而为的：存储不可用或内容损坏时只记录警告，
/// 读取操作视为"没有数据"
pub struct AnswerStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> AnswerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 获取底层存储
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn set_participant(&self, participant: &Participant) {
        if let Err(e) = self.write_json(PARTICIPANT_KEY, participant) {
            warn!("⚠️ 保存参与者信息失败: {}", e);
        }
    }

    pub fn get_participant(&self) -> Option<Participant> {
        self.read_json(PARTICIPANT_KEY).unwrap_or_else(|e| {
            warn!("⚠️ 读取参与者信息失败: {}", e);
            None
        })
    }

    /// 保存单题答案（读-改-写整个答案表）
    pub fn save_answer(&self, question_id: &str, value: &Answer) {
        let result = self.load_answers().and_then(|mut answers| {
            answers.insert(question_id.to_string(), value.clone());
            self.write_json(ANSWERS_KEY, &answers)
        });
        match result {
            Ok(()) => debug!("已保存答案: {}", question_id),
            Err(e) => warn!("⚠️ 保存答案失败 ({}): {}", question_id, e),
        }
    }

    pub fn get_answers(&self) -> AnswerMap {
        self.load_answers().unwrap_or_else(|e| {
            warn!("⚠️ 读取答案失败: {}", e);
            AnswerMap::new()
        })
    }

    /// 清除参与者和答案
    pub fn clear_all(&self) {
        for key in [PARTICIPANT_KEY, ANSWERS_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("⚠️ 清除存储键 {} 失败: {}", key, e);
            }
        }
        debug!("本地作答状态已清除");
    }

    fn load_answers(&self) -> AppResult<AnswerMap> {
        Ok(self.read_json(ANSWERS_KEY)?.unwrap_or_default())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| crate::error::AppError::storage_corrupted(key, e)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, StorageError};
    use crate::infrastructure::MemoryKvStore;
    use crate::models::SkillLevel;

    /// 永远失败的存储，模拟存储不可用
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(StorageError::Unavailable {
                reason: "quota exceeded".into(),
            }
            .into())
        }

        fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Storage(StorageError::Unavailable {
                reason: "quota exceeded".into(),
            }))
        }

        fn remove(&self, _key: &str) -> AppResult<()> {
            Err(AppError::Storage(StorageError::Unavailable {
                reason: "quota exceeded".into(),
            }))
        }
    }

    fn participant() -> Participant {
        Participant::new("Grace", "Research", "gh", SkillLevel::Pro).with_started_at(42)
    }

    #[test]
    fn test_participant_round_trip() {
        let store = AnswerStore::new(MemoryKvStore::new());
        assert_eq!(store.get_participant(), None);

        for level in SkillLevel::ALL {
            let mut p = participant();
            p.skill_level = level;
            store.set_participant(&p);
            assert_eq!(store.get_participant(), Some(p));
        }
    }

    #[test]
    fn test_save_answer_merges() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.save_answer("beg-1", &Answer::Text("A friend".into()));
        store.save_answer("beg-2", &Answer::Choices(vec!["Java".into()]));
        store.save_answer("beg-1", &Answer::Text("A teacher".into()));

        let answers = store.get_answers();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers["beg-1"], Answer::Text("A teacher".into()));
    }

    #[test]
    fn test_clear_all() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.set_participant(&participant());
        store.save_answer("adv-1", &Answer::Text("Rust".into()));
        store.inner().set("survey_submissions", "[]").unwrap();

        store.clear_all();

        assert_eq!(store.get_participant(), None);
        assert!(store.get_answers().is_empty());
        // 只清除这两个键
        assert_eq!(store.inner().len(), 1);
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let store = AnswerStore::new(BrokenStore);
        store.set_participant(&participant());
        store.save_answer("beg-1", &Answer::Text("x".into()));
        store.clear_all();

        assert_eq!(store.get_participant(), None);
        assert!(store.get_answers().is_empty());
    }

    #[test]
    fn test_corrupted_entry_reads_as_empty() {
        let store = AnswerStore::new(MemoryKvStore::new());
        store.inner().set(PARTICIPANT_KEY, "{not json").unwrap();
        store.inner().set(ANSWERS_KEY, "42").unwrap();

        assert_eq!(store.get_participant(), None);
        assert!(store.get_answers().is_empty());
    }
}
