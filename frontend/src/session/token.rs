//! 令牌存储
//!
//! 内存中保存一份令牌，同时镜像到两个持久化存储（Cookie + LocalStorage）。
//! 两个持久化存储总是成对写入、成对清除。

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use skillsync_shared::TOKEN_STORAGE_KEY;

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

/// 可在页面刷新后存活的键值存储
pub trait DurableStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    /// 写入成功返回 `true`
    fn write(&self, key: &str, value: &str) -> bool;
    /// 删除成功（或键本不存在）返回 `true`
    fn remove(&self, key: &str) -> bool;
}

// =========================================================
// 持久化令牌 (Persisted Token)
// =========================================================

/// Cookie 与 LocalStorage 组成的一对持久化存储
#[derive(Clone)]
pub struct TokenVault {
    cookie: Arc<dyn DurableStore>,
    local: Arc<dyn DurableStore>,
}

impl TokenVault {
    pub fn new(cookie: Arc<dyn DurableStore>, local: Arc<dyn DurableStore>) -> Self {
        Self { cookie, local }
    }

    /// 优先读取 Cookie，其次 LocalStorage
    pub fn load(&self) -> Option<String> {
        self.cookie
            .read(TOKEN_STORAGE_KEY)
            .filter(|t| !t.is_empty())
            .or_else(|| self.local.read(TOKEN_STORAGE_KEY))
            .filter(|t| !t.is_empty())
    }

    /// 写入两个存储
    ///
    /// 任一写入失败时两个存储都会被清除，返回 `false`。
    pub fn save(&self, token: &str) -> bool {
        let cookie_ok = self.cookie.write(TOKEN_STORAGE_KEY, token);
        let local_ok = self.local.write(TOKEN_STORAGE_KEY, token);
        if cookie_ok && local_ok {
            return true;
        }
        log::warn!(
            "[Session] Persisting token failed (cookie: {}, local: {}), clearing both stores",
            cookie_ok,
            local_ok
        );
        self.clear();
        false
    }

    pub fn clear(&self) {
        let cookie_ok = self.cookie.remove(TOKEN_STORAGE_KEY);
        let local_ok = self.local.remove(TOKEN_STORAGE_KEY);
        if !(cookie_ok && local_ok) {
            log::warn!(
                "[Session] Clearing token failed (cookie: {}, local: {})",
                cookie_ok,
                local_ok
            );
        }
    }
}

// =========================================================
// 令牌缓存 (Token Cache)
// =========================================================

/// 会话与请求管线共享的令牌
///
/// 内存值缺失时回退到持久化存储。
#[derive(Clone)]
pub struct TokenStore {
    memory: Arc<ArcSwapOption<String>>,
    vault: TokenVault,
}

impl TokenStore {
    pub fn new(vault: TokenVault) -> Self {
        Self {
            memory: Arc::new(ArcSwapOption::empty()),
            vault,
        }
    }

    /// 附加到请求上的令牌
    pub fn current(&self) -> Option<String> {
        self.in_memory().or_else(|| self.vault.load())
    }

    pub fn in_memory(&self) -> Option<String> {
        self.memory.load_full().map(|t| t.as_ref().clone())
    }

    pub fn persisted(&self) -> Option<String> {
        self.vault.load()
    }

    /// 仅写入内存（令牌已在持久化存储中）
    pub fn adopt(&self, token: String) {
        self.memory.store(Some(Arc::new(token)));
    }

    /// 写入内存与两个持久化存储
    pub fn persist(&self, token: String) {
        self.vault.save(&token);
        self.memory.store(Some(Arc::new(token)));
    }

    /// 清除内存与两个持久化存储
    pub fn clear(&self) {
        self.memory.store(None);
        self.vault.clear();
    }
}

// =========================================================
// 测试工具: MemoryStore
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Default::default()
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[cfg(test)]
impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        if self.fail_writes {
            return false;
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key);
        true
    }
}
