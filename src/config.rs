// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果环境中没有定义对应变量，则使用这些值
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "token";

pub const ENV_API_URL: &str = "PRODCONSOLE_API_URL";
pub const ENV_TOKEN_KEY: &str = "PRODCONSOLE_TOKEN_KEY";

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 远端服务地址，不带结尾的 `/`
    pub api_base_url: String,
    /// 持久化 token 使用的存储键
    pub token_storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ClientConfig {
    /// 通过任意查找函数读取配置，读不到或为空时使用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_base_url: read(ENV_API_URL, DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            token_storage_key: read(ENV_TOKEN_KEY, DEFAULT_TOKEN_STORAGE_KEY),
        }
    }

    /// 读取编译期环境变量
    ///
    /// 浏览器里没有进程环境，地址在构建时确定。
    pub fn from_build_env() -> Self {
        Self::from_lookup(|name| match name {
            ENV_API_URL => option_env!("PRODCONSOLE_API_URL").map(str::to_string),
            ENV_TOKEN_KEY => option_env!("PRODCONSOLE_TOKEN_KEY").map(str::to_string),
            _ => None,
        })
    }

    /// 读取进程环境变量（非浏览器环境）
    pub fn from_process_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}
