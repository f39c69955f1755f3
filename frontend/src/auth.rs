//! 认证模块
//!
//! 把核心库的 `SessionStore` 包装成响应式上下文，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use crate::web::{FetchHttpClient, LocalStorage};
use leptos::prelude::*;
use prodconsole::{ClientConfig, ConsoleResult, ServiceApi, SessionStore};
use std::sync::Arc;

pub type BrowserApi = ServiceApi<FetchHttpClient>;
pub type BrowserSession = SessionStore<LocalStorage>;

/// 认证上下文
///
/// 会话本身存放在 `SessionStore` 中，`token` 信号只是它的响应式镜像，
/// 每次登录或注销后同步一次。
#[derive(Clone)]
pub struct AuthContext {
    pub api: Arc<BrowserApi>,
    pub session: Arc<BrowserSession>,
    token: RwSignal<Option<String>>,
}

impl AuthContext {
    /// 创建认证上下文，并从 LocalStorage 恢复上次的会话
    pub fn new(config: &ClientConfig) -> Self {
        let api = Arc::new(ServiceApi::new(&config.api_base_url, FetchHttpClient));
        let session = Arc::new(SessionStore::restore(
            LocalStorage,
            &config.token_storage_key,
        ));
        let token = RwSignal::new(session.token());

        Self {
            api,
            session,
            token,
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let token = self.token;
        Signal::derive(move || token.with(Option::is_some))
    }

    fn sync_token(&self) {
        self.token.set(self.session.token());
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

pub async fn login(ctx: &AuthContext, email: &str, password: &str) -> ConsoleResult<()> {
    let result = ctx.session.login(&ctx.api, email, password).await;
    ctx.sync_token();
    result
}

pub async fn register(
    ctx: &AuthContext,
    name: &str,
    email: &str,
    password: &str,
) -> ConsoleResult<()> {
    ctx.session.register(&ctx.api, name, email, password).await
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.session.logout();
    ctx.sync_token();
}
