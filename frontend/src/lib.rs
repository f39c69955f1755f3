//! 商品管理控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `prodconsole`: 会话、路由守卫、商品同步等核心逻辑（与 DOM 无关）
//! - `web::router`: 路由服务（把守卫接到 History API 上）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod auth;
mod components {
    mod field_error;
    pub mod layout;
    pub mod login;
    pub mod pages;
    pub mod products;
    pub mod register;

    pub use field_error::FieldError;
}

// 原生 Web API 封装模块
pub(crate) mod web;

use crate::auth::AuthContext;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::pages::{AboutPage, HomePage, LandingPage, NotFoundPage};
use crate::components::products::ProductsPage;
use crate::components::register::RegisterPage;

use leptos::prelude::*;
use prodconsole::{AppRoute, ClientConfig, log_info};
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <Layout><LandingPage /></Layout> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home => view! { <Layout><HomePage /></Layout> }.into_any(),
        AppRoute::About => view! { <Layout><AboutPage /></Layout> }.into_any(),
        AppRoute::Products => view! { <Layout><ProductsPage /></Layout> }.into_any(),
        AppRoute::NotFound => view! { <Layout><NotFoundPage /></Layout> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置并恢复会话
    let config = ClientConfig::from_build_env();
    log_info!("[App] Using service at {}", config.api_base_url);
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx.clone());

    // 2. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
