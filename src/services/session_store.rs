use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::Session;

/// 会话的底层存储接口
///
/// 浏览器环境里对应 localStorage；这里抽象为 trait，
/// 二进制用文件实现，测试用内存实现。
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, raw: &str) -> Result<()>;
    fn clear(&self);
}

/// 文件存储（JSON）
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn save(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// 内存存储（测试用）
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<String>>,
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<String> {
        self.inner.lock().expect("session storage lock").clone()
    }

    fn save(&self, raw: &str) -> Result<()> {
        *self.inner.lock().expect("session storage lock") = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.inner.lock().expect("session storage lock") = None;
    }
}

/// 统一的会话访问器
///
/// 各组件挂载点都曾各自去解析本地存储，默认值也不一致；
/// 这里收敛为单一解析入口：缺失或损坏一律回落为访客。
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// 读取当前会话，缺失/损坏回落为访客
    pub fn current(&self) -> Session {
        match self.storage.load() {
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("Discarding corrupt stored session: {}", e);
                    Session::guest()
                }
            },
            None => Session::guest(),
        }
    }

    /// 当前会话的 bearer token（访客为 None）
    pub fn token(&self) -> Option<String> {
        self.current().token
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let mut session = session.clone();
        session.saved_at = Some(Utc::now());
        let raw = serde_json::to_string(&session)?;
        self.storage.save(&raw)
    }

    /// 强制登出钩子（401 拦截器调用）
    pub fn clear(&self) {
        self.storage.clear();
    }
}
