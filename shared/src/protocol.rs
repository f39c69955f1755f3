use crate::{PATH_LOGIN, PATH_PRODUCTS, PATH_REGISTER, Product, TokenResponse};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 对响应内容不关心的端点使用，任何 JSON（包括空响应）都能被接受
pub type Ack = serde::de::IgnoredAny;

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The JSON body type. Requests without a body use `()` and return `None`.
    type Body: Serialize;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the call carries the session token.
    const AUTHORIZED: bool;

    /// The URL path. May embed identifiers, e.g. `/api/products/5`.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body>;
}

// =========================================================
// Auth Requests
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHORIZED: bool = false;

    fn path(&self) -> String {
        PATH_LOGIN.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = Ack;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHORIZED: bool = false;

    fn path(&self) -> String {
        PATH_REGISTER.to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

// =========================================================
// Product Requests
// =========================================================

/// List the whole collection
#[derive(Debug, Clone, Copy, Default)]
pub struct ListProductsRequest;

impl ApiRequest for ListProductsRequest {
    type Response = Vec<Product>;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHORIZED: bool = true;

    fn path(&self) -> String {
        PATH_PRODUCTS.to_string()
    }

    fn body(&self) -> Option<&()> {
        None
    }
}

/// Create a product. The body is the product itself.
#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub product: Product,
}

impl ApiRequest for CreateProductRequest {
    // 服务端会回显新记录，但列表始终以刷新结果为准
    type Response = Ack;
    type Body = Product;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHORIZED: bool = true;

    fn path(&self) -> String {
        PATH_PRODUCTS.to_string()
    }

    fn body(&self) -> Option<&Product> {
        Some(&self.product)
    }
}

/// Replace title/quantity of the product at `/api/products/:id`
#[derive(Debug, Clone)]
pub struct UpdateProductRequest {
    pub product: Product,
}

impl ApiRequest for UpdateProductRequest {
    type Response = Ack;
    type Body = Product;
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTHORIZED: bool = true;

    fn path(&self) -> String {
        format!("{}/{}", PATH_PRODUCTS, self.product.id)
    }

    fn body(&self) -> Option<&Product> {
        Some(&self.product)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteProductRequest {
    pub id: i64,
}

impl ApiRequest for DeleteProductRequest {
    type Response = Ack;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    const AUTHORIZED: bool = true;

    fn path(&self) -> String {
        format!("{}/{}", PATH_PRODUCTS, self.id)
    }

    fn body(&self) -> Option<&()> {
        None
    }
}
