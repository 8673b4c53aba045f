//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口。

use crate::session::DurableStore;

/// 本地存储操作封装
///
/// 访问浏览器 LocalStorage API，没有过期时间。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 写入字符串值
    ///
    /// # 返回
    /// - `true` 如果写入成功
    /// - `false` 如果存储不可用或配额已满
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除指定键
    ///
    /// # 返回
    /// - `true` 如果删除成功（键不存在也视为成功）
    /// - `false` 如果存储不可用
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

impl DurableStore for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::get(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        Self::set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        Self::delete(key)
    }
}
