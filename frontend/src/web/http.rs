//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`。

use prodconsole::shared::HttpMethod;
use prodconsole::{ConsoleError, ConsoleResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_error(context: &str, e: JsValue) -> ConsoleError {
    let detail = e.as_string().unwrap_or_else(|| format!("{:?}", e));
    ConsoleError::network(format!("{}: {}", context, detail))
}

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build(req: &HttpRequest) -> ConsoleResult<Request> {
        let headers = Headers::new().map_err(|e| js_error("Failed to create headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("Failed to set header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_error("Failed to build request", e))
    }

    async fn text(response: &Response) -> ConsoleResult<String> {
        let promise = response
            .text()
            .map_err(|e| js_error("Failed to read response", e))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| js_error("Failed to read response", e))?;
        Ok(text.as_string().unwrap_or_default())
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ConsoleResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ConsoleError::network("No window object available"))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("Failed to fetch", e))?;

        let response: Response = value
            .dyn_into()
            .map_err(|e| js_error("Unexpected fetch result", e))?;

        // DELETE 可能返回 204，没有响应体
        let body = if req.method == HttpMethod::Delete && response.status() == 204 {
            String::new()
        } else {
            Self::text(&response).await?
        };

        Ok(HttpResponse {
            status: response.status(),
            body,
        })
    }
}
