//! Cookie 封装模块
//!
//! 通过 `document.cookie` 读写，值使用 URI 编码。

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use crate::session::DurableStore;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// 从 `document.cookie` 字符串中取出指定键的原始值
fn find_cookie<'a>(cookies: &'a str, key: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == key).then_some(value)
    })
}

/// 生成写入用的 cookie 字符串
fn cookie_entry(key: &str, encoded_value: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; max-age={}; path=/; SameSite=Lax",
        key, encoded_value, max_age_secs
    )
}

/// 带有效期的 Cookie 存储
#[derive(Debug, Clone, Copy)]
pub struct CookieJar {
    expires_in_days: u32,
}

impl CookieJar {
    pub fn new(expires_in_days: u32) -> Self {
        Self { expires_in_days }
    }

    fn document() -> Option<HtmlDocument> {
        web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
    }

    fn max_age(&self) -> u64 {
        u64::from(self.expires_in_days) * SECONDS_PER_DAY
    }
}

impl DurableStore for CookieJar {
    fn read(&self, key: &str) -> Option<String> {
        let cookies = Self::document()?.cookie().ok()?;
        let raw = find_cookie(&cookies, key)?;
        js_sys::decode_uri_component(raw)
            .ok()
            .and_then(|v| v.as_string())
    }

    fn write(&self, key: &str, value: &str) -> bool {
        let Some(document) = Self::document() else {
            return false;
        };
        let encoded: String = js_sys::encode_uri_component(value).into();
        document
            .set_cookie(&cookie_entry(key, &encoded, self.max_age()))
            .is_ok()
    }

    fn remove(&self, key: &str) -> bool {
        let Some(document) = Self::document() else {
            return false;
        };
        document.set_cookie(&cookie_entry(key, "", 0)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie() {
        let cookies = "theme=dark; token=abc.def%3D; tokenish=nope";
        assert_eq!(find_cookie(cookies, "token"), Some("abc.def%3D"));
        assert_eq!(find_cookie(cookies, "theme"), Some("dark"));
        assert_eq!(find_cookie(cookies, "missing"), None);
        assert_eq!(find_cookie("", "token"), None);
    }

    #[test]
    fn test_cookie_entry_uses_seven_day_max_age() {
        let jar = CookieJar::new(7);
        assert_eq!(jar.max_age(), 604_800);
        assert_eq!(
            cookie_entry("token", "abc", jar.max_age()),
            "token=abc; max-age=604800; path=/; SameSite=Lax"
        );
    }
}
