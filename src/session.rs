//! 会话模块
//!
//! `SessionStore` 是"当前客户端是否已认证、凭据是什么"的唯一来源。
//! 其他组件只通过 `token()` 读取，不直接修改。

use crate::api::{ServiceApi, service_message};
use crate::error::{ConsoleError, ConsoleResult};
use crate::request::HttpClient;
use crate::{log_error, log_info};
use prodconsole_shared::{LoginRequest, RegisterRequest, TokenResponse};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed.";

// =========================================================
// 持久化存储抽象
// =========================================================

/// token 的持久化存储
///
/// 浏览器中对应 localStorage，测试中使用 `MemoryStorage`。
/// 写入失败不会中断会话，只会返回 `false`。
pub trait TokenStorage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.save(key, value);
        storage
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> bool {
        self.items().insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.items().remove(key);
        true
    }
}

// =========================================================
// SessionStore
// =========================================================

pub struct SessionStore<S> {
    storage: S,
    key: String,
    token: Mutex<Option<String>>,
}

impl<S: TokenStorage> SessionStore<S> {
    /// 启动时从持久化存储恢复 token
    ///
    /// 不发起网络请求，也不会失败；没有存储值时处于未认证状态。
    pub fn restore(storage: S, key: &str) -> Self {
        let token = storage.load(key).filter(|t| !t.is_empty());
        if token.is_some() {
            log_info!("[Session] Restored token from storage.");
        }
        Self {
            storage,
            key: key.to_string(),
            token: Mutex::new(token),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot().is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 登录
    ///
    /// 成功时 token 同时写入内存和持久化存储；失败时返回 Authentication 错误，
    /// 携带服务端的错误信息（或通用的 "Login failed"），会话状态保持不变。
    /// 不做重试。
    pub async fn login<C: HttpClient>(
        &self,
        api: &ServiceApi<C>,
        email: &str,
        password: &str,
    ) -> ConsoleResult<()> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = api
            .send(&req, None)
            .await
            .map_err(|e| e.in_op("session.login"))?;

        if !resp.ok() {
            let message = service_message(&resp).unwrap_or_else(|| LOGIN_FAILED.to_string());
            log_error!("[Session] Login rejected ({}): {}", resp.status, message);
            return Err(ConsoleError::authentication(message).in_op("session.login"));
        }

        // 2xx 但没有可用的 token 同样视为失败
        let token = resp
            .json::<TokenResponse>()
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConsoleError::authentication(LOGIN_FAILED).in_op("session.login"))?;

        if !self.storage.save(&self.key, &token) {
            log_error!("[Session] Could not persist token; session is memory-only.");
        }
        *self.slot() = Some(token);
        log_info!("[Session] Logged in.");
        Ok(())
    }

    /// 注册新用户，不改变会话状态
    pub async fn register<C: HttpClient>(
        &self,
        api: &ServiceApi<C>,
        name: &str,
        email: &str,
        password: &str,
    ) -> ConsoleResult<()> {
        let req = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = api
            .send(&req, None)
            .await
            .map_err(|e| e.in_op("session.register"))?;

        if !resp.ok() {
            let message = service_message(&resp).unwrap_or_else(|| REGISTER_FAILED.to_string());
            log_error!("[Session] Registration rejected ({}): {}", resp.status, message);
            return Err(ConsoleError::authentication(message).in_op("session.register"));
        }

        log_info!("[Session] Registered {}.", email);
        Ok(())
    }

    /// 注销，同步清除内存和持久化存储。未认证时调用不产生任何效果。
    pub fn logout(&self) {
        let previous = self.slot().take();
        if previous.is_some() {
            self.storage.remove(&self.key);
            log_info!("[Session] Logged out.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleErrorStatus;
    use crate::request::MockHttpClient;
    use prodconsole_shared::HttpMethod;
    use serde_json::json;

    const KEY: &str = "token";
    const LOGIN_URL: &str = "http://api.test/api/auth/login";
    const REGISTER_URL: &str = "http://api.test/api/auth/register";

    fn api() -> ServiceApi<MockHttpClient> {
        ServiceApi::new("http://api.test", MockHttpClient::new())
    }

    // =========================================================
    // restore 测试
    // =========================================================

    #[test]
    fn restore_without_stored_token_is_unauthenticated() {
        let session = SessionStore::restore(MemoryStorage::new(), KEY);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn restore_reads_persisted_token() {
        let session = SessionStore::restore(MemoryStorage::with_item(KEY, "abc"), KEY);
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn restore_ignores_empty_value() {
        let session = SessionStore::restore(MemoryStorage::with_item(KEY, ""), KEY);
        assert!(!session.is_authenticated());
    }

    // =========================================================
    // login 测试
    // =========================================================

    #[tokio::test]
    async fn login_success_persists_token() {
        let api = api();
        api.client()
            .mock_response(HttpMethod::Post, LOGIN_URL, 200, json!({"token": "abc"}));
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        session.login(&api, "a@b.com", "secret1").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.storage().load(KEY).as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn login_rejection_carries_service_message() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            LOGIN_URL,
            401,
            json!({"error": "Invalid credentials"}),
        );
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        let err = session.login(&api, "a@b.com", "wrong11").await.unwrap_err();

        assert_eq!(err.status, ConsoleErrorStatus::Authentication);
        assert_eq!(err.message(), "Invalid credentials");
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().load(KEY), None);
    }

    #[tokio::test]
    async fn login_rejection_without_message_uses_fallback() {
        let api = api();
        api.client()
            .mock_raw(HttpMethod::Post, LOGIN_URL, 500, "Internal Server Error");
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        let err = session.login(&api, "a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.message(), LOGIN_FAILED);
    }

    #[tokio::test]
    async fn login_ok_without_token_fails() {
        let api = api();
        api.client()
            .mock_response(HttpMethod::Post, LOGIN_URL, 200, json!({"token": ""}));
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        let err = session.login(&api, "a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.status, ConsoleErrorStatus::Authentication);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_network_failure_is_network_error() {
        let api = api();
        api.client().mock_failure(HttpMethod::Post, LOGIN_URL);
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        let err = session.login(&api, "a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.status, ConsoleErrorStatus::Network);
        assert_eq!(api.client().request_count(), 1);
    }

    // =========================================================
    // logout 测试
    // =========================================================

    #[test]
    fn logout_clears_memory_and_storage() {
        let session = SessionStore::restore(MemoryStorage::with_item(KEY, "abc"), KEY);
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().load(KEY), None);
    }

    #[test]
    fn logout_is_idempotent() {
        let session = SessionStore::restore(MemoryStorage::new(), KEY);
        session.logout();
        session.logout();
        assert!(!session.is_authenticated());
    }

    // =========================================================
    // register 测试
    // =========================================================

    #[tokio::test]
    async fn register_created_does_not_authenticate() {
        let api = api();
        api.client()
            .mock_response(HttpMethod::Post, REGISTER_URL, 201, json!({"message": "ok"}));
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        session
            .register(&api, "Ada", "ada@b.com", "secret1")
            .await
            .unwrap();
        assert!(!session.is_authenticated());

        let sent = api.client().requests_to(HttpMethod::Post, REGISTER_URL);
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name": "Ada", "email": "ada@b.com", "password": "secret1"})
        );
    }

    #[tokio::test]
    async fn register_conflict_reports_message() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            REGISTER_URL,
            409,
            json!({"error": "Email already registered"}),
        );
        let session = SessionStore::restore(MemoryStorage::new(), KEY);

        let err = session
            .register(&api, "Ada", "ada@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.status, ConsoleErrorStatus::Authentication);
        assert_eq!(err.message(), "Email already registered");
    }
}
