//! 键值存储 - 基础设施层
//!
//! 持有设备本地的持久化存储，只暴露 get / set / remove 能力，
//! 不认识参与者或答案

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{AppError, AppResult, StorageError};

/// 字符串键值存储
///
/// 值统一为 JSON 编码后的字符串
pub trait KvStore {
    /// 读取键，不存在时返回 `None`
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 写入键
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// 删除键（不存在时什么也不做）
    fn remove(&self, key: &str) -> AppResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        (**self).remove(key)
    }
}

/// 基于单个 JSON 文件的存储
///
/// 文件内容是 `{ key: value }` 对象，每次读写都整文件加载、整文件覆盖
#[derive(Debug, Clone)]
pub struct FileKvStore {
    path: PathBuf,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::storage_read_failed(self.path.display().to_string(), e))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| AppError::storage_corrupted("*", e))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::storage_write_failed(parent.display().to_string(), e))?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)
            .map_err(|e| AppError::storage_write_failed(self.path.display().to_string(), e))?;
        debug!("存储已写入: {} ({} 个键)", self.path.display(), entries.len());
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// 内存存储（测试和临时会话使用）
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> AppResult<T> {
        let mut guard = self.entries.lock().map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        Ok(f(&mut guard))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.with_entries(|m| m.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.with_entries(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.with_entries(|m| {
            m.remove(key);
        })
    }
}
