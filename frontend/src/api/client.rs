//! 请求管线
//!
//! `prepare`（拼接地址、超时、凭据、令牌）-> `Transport::send` -> `interpret`（错误归一化）。
//! 三个阶段都可以脱离浏览器单独测试。

use std::sync::Arc;

use serde::de::DeserializeOwned;
use skillsync_shared::protocol::{ApiRequest, HttpMethod};
use skillsync_shared::{HEADER_AUTHORIZATION, bearer};

use super::error::ApiError;
use super::transport::{FilePart, HttpRequest, HttpResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::session::TokenStore;

pub struct ApiClient<T> {
    config: ClientConfig,
    transport: Arc<T>,
    tokens: TokenStore,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
            tokens: self.tokens.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ClientConfig, transport: Arc<T>, tokens: TokenStore) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 发送前处理
    ///
    /// 相对路径拼接到 base URL；已显式设置的 `Authorization` 头不会被覆盖。
    pub fn prepare(&self, mut req: HttpRequest) -> HttpRequest {
        if !req.url.starts_with("http://") && !req.url.starts_with("https://") {
            req.url = self.config.url(&req.url);
        }
        req.timeout = Some(self.config.timeout);
        req.with_credentials = self.config.with_credentials;

        if req.header(HEADER_AUTHORIZATION).is_none() {
            if let Some(token) = self.tokens.current() {
                req.headers
                    .insert(HEADER_AUTHORIZATION.to_string(), bearer(&token));
            }
        }
        req
    }

    /// 响应后处理
    ///
    /// 401 时清除本地令牌但不调用 `logout()`，由调用方决定如何重置会话。
    pub fn interpret(
        &self,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<HttpResponse, ApiError> {
        let label = self.config.label;
        match result {
            Ok(res) if res.ok() => Ok(res),
            Ok(res) if res.status == 401 => {
                log::warn!("[{}] Unauthorized response, clearing token", label);
                self.tokens.clear();
                Err(ApiError::Unauthorized { body: res.body })
            }
            Ok(res) => {
                log::warn!("[{}] Request failed with status {}", label, res.status);
                Err(ApiError::Status {
                    status: res.status,
                    body: res.body,
                })
            }
            Err(TransportError::Timeout) => {
                log::warn!("[{}] Request timed out", label);
                Err(ApiError::Timeout {
                    message: self.config.timeout_message.to_string(),
                })
            }
            Err(e @ (TransportError::Network(_) | TransportError::Build(_))) => {
                log::error!("[{}] {}", label, e);
                Err(ApiError::Network(e.to_string()))
            }
        }
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let req = self.prepare(req);
        let url = req.url.clone();
        log::debug!("[{}] {} {}", self.config.label, req.method.as_str(), url);

        let result = self.transport.send(req).await;
        let res = self.interpret(result)?;
        log::debug!("[{}] Response {} from {}", self.config.label, res.status, url);
        Ok(res)
    }

    /// 调用一个类型化的 JSON 端点
    pub async fn call<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let mut req = HttpRequest::new(R::PATH, R::METHOD);
        if R::METHOD.has_body() {
            let body =
                serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
            req = req.with_json(body);
        }
        let res = self.execute(req).await?;
        decode(&res)
    }

    /// multipart 上传
    pub async fn upload<R: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FilePart>,
    ) -> Result<R, ApiError> {
        let req = HttpRequest::new(path, HttpMethod::Post).with_multipart(parts);
        let res = self.execute(req).await?;
        decode(&res)
    }
}

fn decode<R: DeserializeOwned>(res: &HttpResponse) -> Result<R, ApiError> {
    res.json::<R>().map_err(|e| ApiError::Decode(e.to_string()))
}
