//! 浏览器传输层
//!
//! 使用 `web_sys::fetch` 实现 [`Transport`]，超时通过 `AbortController` 中止请求。

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, Blob, BlobPropertyBag, File, FormData, Headers, Request, RequestCredentials,
    RequestInit, Response,
};

use super::timer::Timeout;
use crate::api::{FilePart, HttpBody, HttpRequest, HttpResponse, Transport, TransportError};

fn build_error(context: &str, e: JsValue) -> TransportError {
    TransportError::Build(format!("{}: {:?}", context, e))
}

/// 区分超时中止与普通网络错误
fn failure(controller: &AbortController, e: JsValue) -> TransportError {
    if controller.signal().aborted() {
        TransportError::Timeout
    } else {
        TransportError::Network(format!("{:?}", e))
    }
}

fn form_data(parts: &[FilePart]) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(|e| build_error("创建 FormData 失败", e))?;
    for part in parts {
        let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
        let sequence = js_sys::Array::of1(&bytes);
        let bag = BlobPropertyBag::new();
        bag.set_type(&part.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &bag)
            .map_err(|e| build_error("创建 Blob 失败", e))?;
        form.append_with_blob_and_filename(&part.field, &blob, &part.file_name)
            .map_err(|e| build_error("追加表单字段失败", e))?;
    }
    Ok(form)
}

/// 基于 fetch 的传输层
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Build("无法获取 window 对象".to_string()))?;

        let headers = Headers::new().map_err(|e| build_error("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| build_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if req.with_credentials {
            opts.set_credentials(RequestCredentials::Include);
        }

        match &req.body {
            HttpBody::Empty => {}
            HttpBody::Json(body) => opts.set_body(&JsValue::from_str(body)),
            HttpBody::Multipart(parts) => opts.set_body(&form_data(parts)?.into()),
        }

        let controller =
            AbortController::new().map_err(|e| build_error("创建 AbortController 失败", e))?;
        opts.set_signal(Some(&controller.signal()));

        // 计时器随本函数结束而清除
        let _timeout = req.timeout.and_then(|timeout| {
            let controller = controller.clone();
            let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || controller.abort())
        });

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| build_error("创建 Request 失败", e))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| failure(&controller, e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| TransportError::Network(format!("Response 类型转换失败: {:?}", e)))?;
        let status = response.status();

        let promise = response
            .text()
            .map_err(|e| TransportError::Network(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| failure(&controller, e))?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// 读取用户选择的文件内容
pub async fn read_file(file: &File) -> Result<FilePart, TransportError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| build_error("读取文件失败", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(FilePart {
        field: skillsync_shared::protocol::RESUME_FIELD.to_string(),
        file_name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}
