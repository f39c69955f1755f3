use crate::error::{ConsoleError, ConsoleErrorStatus, ConsoleResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use prodconsole_shared::{
    ApiRequest, CONTENT_TYPE_JSON, ErrorBody, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
};

// =========================================================
// 远端服务网关
// =========================================================

/// 远端商品/认证服务的客户端
///
/// 接受任何实现了 HttpClient 的客户端，从而解耦具体的 HTTP 实现
/// (浏览器 fetch、测试里的 mock)。
pub struct ServiceApi<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> ServiceApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> ConsoleResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&req.path()), R::METHOD);

        // 认证端点永远不带 token
        if R::AUTHORIZED {
            if let Some(token) = token {
                http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
            }
        }

        if let Some(body) = req.body() {
            let json = serde_json::to_string(body)?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(json);
        }

        Ok(http)
    }

    /// 发送请求并返回原始响应，只有请求无法完成时才是错误
    pub async fn send<R: ApiRequest>(
        &self,
        req: &R,
        token: Option<&str>,
    ) -> ConsoleResult<HttpResponse> {
        let op = format!("{} {}", R::METHOD.as_str(), req.path());
        let http = self.build(req, token).map_err(|e| e.in_op_with("api.build", op.clone()))?;

        self.client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.send", op))
    }

    /// 发送请求，非 2xx 视为失败，成功时解析响应体
    pub async fn call<R: ApiRequest>(
        &self,
        req: &R,
        token: Option<&str>,
    ) -> ConsoleResult<R::Response> {
        let op = format!("{} {}", R::METHOD.as_str(), req.path());
        let resp = self.send(req, token).await?;

        if !resp.ok() {
            let status = if R::AUTHORIZED {
                ConsoleErrorStatus::from_rejected_status(resp.status)
            } else {
                ConsoleErrorStatus::Authentication
            };
            let message = service_message(&resp)
                .unwrap_or_else(|| format!("Request failed with status {}", resp.status));
            return Err(ConsoleError::new(status, message).in_op_with("api.call", op));
        }

        resp.json::<R::Response>()
            .map_err(|e| e.in_op_with("api.decode", op))
    }
}

/// 取出服务端返回的 `{ "error": "..." }` 信息
pub fn service_message(resp: &HttpResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&resp.body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}
