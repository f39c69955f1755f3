use serde::{Deserialize, Serialize};

pub mod protocol;

pub use protocol::{
    Ack, ApiRequest, CreateProductRequest, DeleteProductRequest, HttpMethod, ListProductsRequest,
    LoginRequest, RegisterRequest, UpdateProductRequest,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const PATH_LOGIN: &str = "/api/auth/login";
pub const PATH_REGISTER: &str = "/api/auth/register";
pub const PATH_PRODUCTS: &str = "/api/products";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 商品记录
///
/// `id` 由调用方指定，唯一性由远端服务保证。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub quantity: i64,
}

/// 登录成功后的响应
///
/// 服务端在失败时不会返回 token，因此这里是可选的。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// 服务端的错误响应体 `{ "error": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_uses_plain_field_names() {
        let product = Product {
            id: 5,
            title: "Widget".to_string(),
            quantity: 3,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 5, "title": "Widget", "quantity": 3})
        );
    }

    #[test]
    fn token_response_tolerates_missing_token() {
        let resp: TokenResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.token.is_none());
    }

    #[test]
    fn error_body_reads_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "Invalid credentials"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Invalid credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"message": "Product deleted"}"#).unwrap();
        assert!(body.error.is_none());
    }
}
