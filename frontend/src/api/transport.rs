use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use skillsync_shared::protocol::HttpMethod;
use thiserror::Error;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 中的单个文件字段
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Json(String),
    Multipart(Vec<FilePart>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: HttpBody,
    pub timeout: Option<Duration>,
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: HttpBody::Empty,
            timeout: None,
            with_credentials: false,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = HttpBody::Json(body);
        self
    }

    /// 浏览器会自行设置带 boundary 的 Content-Type，这里不设置
    pub fn with_multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = HttpBody::Multipart(parts);
        self
    }

    /// 按名称查找请求头（不区分大小写）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// 传输层错误
///
/// 只描述"没拿到响应"的情况，HTTP 状态码错误由上层解释。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// 客户端超时中止
    #[error("request aborted after timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to build request: {0}")]
    Build(String),
}

#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub enum MockReply {
    Respond(u16, String),
    Fail(TransportError),
}

#[cfg(test)]
pub struct MockTransport {
    // "METHOD URL" -> 回复
    replies: RefCell<HashMap<String, MockReply>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    // 为 true 时每次发送前让出一次执行权，用于模拟挂起中的请求
    pub yield_first: bool,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            yield_first: false,
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.replies.borrow_mut().insert(
            Self::key(method, url),
            MockReply::Respond(status, body.to_string()),
        );
    }

    pub fn mock_failure(&self, method: HttpMethod, url: &str, error: TransportError) {
        self.replies
            .borrow_mut()
            .insert(Self::key(method, url), MockReply::Fail(error));
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.yield_first {
            tokio::task::yield_now().await;
        }

        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        match self.replies.borrow().get(&key) {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(MockReply::Fail(error)) => Err(error.clone()),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for std::rc::Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}
