//! prodconsole 核心
//!
//! 与平台无关的商品管理控制台逻辑：
//! - `session`: 认证 token 的生命周期与持久化
//! - `guard`: 受保护视图的路由守卫
//! - `sync`: 商品集合的增删改查与表单模式
//!
//! 浏览器相关的实现 (fetch、localStorage、页面) 在 frontend crate 中，
//! 通过 `HttpClient` / `TokenStorage` 两个 trait 注入。

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod guard;
pub mod request;
pub mod session;
pub mod sync;

pub use api::ServiceApi;
pub use config::ClientConfig;
pub use error::{ConsoleError, ConsoleErrorStatus, ConsoleResult};
pub use form::{FieldErrors, FormField, FormFields, FormMode};
pub use guard::{AppRoute, GuardDecision, RouteGuard};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::{MemoryStorage, SessionStore, TokenStorage};
pub use sync::{CollectionSync, Notice, SyncSnapshot};

pub use prodconsole_shared as shared;

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}
