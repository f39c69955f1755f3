use crate::error::{ConsoleError, ConsoleResult};
use prodconsole_shared::HttpMethod;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体，空响应体 (如 204) 按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> ConsoleResult<T> {
        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        Ok(serde_json::from_str(body)?)
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 发送请求。只有请求无法完成时才返回错误，非 2xx 状态由调用方判断。
    async fn send(&self, req: HttpRequest) -> ConsoleResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

// None 表示网络中断；bool 标记该响应是否已经返回过
#[cfg(test)]
type MockEntry = (Option<(u16, String)>, bool);

/// 按 "METHOD url" 匹配的模拟客户端
///
/// 同一个键可以排队多个响应，依次返回，最后一个会一直保留，
/// 直到有新的响应排进来。
#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, VecDeque<MockEntry>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.push(method, url, Some((status, body.to_string())));
    }

    /// 模拟网络中断
    pub fn mock_failure(&self, method: HttpMethod, url: &str) {
        self.push(method, url, None);
    }

    fn push(&self, method: HttpMethod, url: &str, entry: Option<(u16, String)>) {
        let mut responses = self.responses.borrow_mut();
        let queue = responses.entry(Self::key(method, url)).or_default();
        // 已经返回过的常驻响应被新的替换
        queue.retain(|(_, served)| !served);
        queue.push_back((entry, false));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ConsoleResult<HttpResponse> {
        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        let mut responses = self.responses.borrow_mut();
        let next = match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().and_then(|(entry, _)| entry),
            Some(queue) => match queue.front_mut() {
                Some((entry, served)) => {
                    *served = true;
                    entry.clone()
                }
                None => Some((404, "Not Found".to_string())),
            },
            None => Some((404, "Not Found".to_string())),
        };

        match next {
            Some((status, body)) => Ok(HttpResponse { status, body }),
            None => Err(ConsoleError::network("Failed to fetch")),
        }
    }
}
