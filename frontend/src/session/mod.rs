//! 会话管理
//!
//! - `token`: 令牌缓存与成对的持久化存储
//! - `store`: 会话生命周期（初始化 / 登录 / 注册 / 注销 / 更新用户）

mod store;
mod token;

#[cfg(test)]
mod tests;

pub use store::{LOGIN_FALLBACK, REGISTER_FALLBACK, Session, SessionError, SessionStore};
pub use token::{DurableStore, TokenStore, TokenVault};

#[cfg(test)]
pub use token::MemoryStore;
