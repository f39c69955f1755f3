//! 路由定义与守卫 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 路由表是静态的；守卫只回答"这个视图现在能不能渲染"。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    Login,
    Register,
    /// 首页 (需要认证)
    Home,
    /// 关于页 (需要认证)
    About,
    /// 商品管理 (需要认证)
    Products,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 大小写不敏感，并兼容旧链接 (`/Home`, `/AboutUs`, `/AddProduct`, `/dashboard`)。
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/').to_ascii_lowercase();
        match path.as_str() {
            "" => Self::Landing,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/home" => Self::Home,
            "/about" | "/aboutus" => Self::About,
            "/products" | "/addproduct" | "/dashboard" => Self::Products,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/home",
            Self::About => "/about",
            Self::Products => "/products",
            Self::NotFound => "/404",
        }
    }

    /// 该路由是否是受保护视图
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Home | Self::About | Self::Products)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功后的跳转目标
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }

    /// 注册成功后的跳转目标
    pub fn register_success_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(AppRoute),
    Redirect(AppRoute),
}

impl GuardDecision {
    /// 最终要显示的路由
    pub fn route(&self) -> AppRoute {
        match self {
            GuardDecision::Render(r) | GuardDecision::Redirect(r) => *r,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirect(_))
    }
}

/// 路由守卫
///
/// 只看是否持有 token，不在客户端验证 token 是否有效；
/// 过期的 token 会在下一次带 token 的请求被拒绝时暴露出来。
pub struct RouteGuard;

impl RouteGuard {
    pub fn check(is_authenticated: bool, route: AppRoute) -> GuardDecision {
        if route.requires_auth() && !is_authenticated {
            GuardDecision::Redirect(AppRoute::auth_failure_redirect())
        } else {
            GuardDecision::Render(route)
        }
    }

    /// 按路径判定
    pub fn check_path(is_authenticated: bool, path: &str) -> GuardDecision {
        Self::check(is_authenticated, AppRoute::from_path(path))
    }
}
