//! 通过 reqwest 对本地 axum 模拟服务跑完整的登录 -> 增删改查 -> 注销流程

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use prodconsole::shared::{HttpMethod, Product};
use prodconsole::{
    AppRoute, CollectionSync, ConsoleError, ConsoleErrorStatus, ConsoleResult, GuardDecision,
    HttpClient, HttpRequest, HttpResponse, MemoryStorage, RouteGuard, ServiceApi, SessionStore,
    TokenStorage,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const TOKEN: &str = "abc";
const TOKEN_KEY: &str = "token";

// =========================================================
// 实现层: Reqwest 客户端
// =========================================================

struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ConsoleResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);
        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| {
            let message = format!("Reqwest Error: {}", e);
            ConsoleError::network(message).with_source(e)
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ConsoleError::network(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 模拟远端服务
// =========================================================

#[derive(Default)]
struct FakeService {
    products: Vec<Product>,
}

type Shared = Arc<Mutex<FakeService>>;

async fn spawn_service(initial: Vec<Product>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeService { products: initial }));

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            put(update_product).delete(delete_product),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (format!("http://{}", addr), state)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Unauthorized" }),
        )),
    }
}

async fn login(Json(creds): Json<Value>) -> Response {
    if creds["password"] == "secret1" {
        reply(StatusCode::OK, json!({ "token": TOKEN }))
    } else {
        reply(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Invalid credentials" }),
        )
    }
}

async fn register(Json(_user): Json<Value>) -> Response {
    reply(StatusCode::CREATED, json!({ "message": "User registered" }))
}

async fn list_products(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = authorize(&headers) {
        return rejected;
    }
    let service = state.lock().unwrap();
    reply(StatusCode::OK, json!(service.products))
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(product): Json<Product>,
) -> Response {
    if let Err(rejected) = authorize(&headers) {
        return rejected;
    }
    let mut service = state.lock().unwrap();
    if service.products.iter().any(|p| p.id == product.id) {
        return reply(
            StatusCode::CONFLICT,
            json!({ "error": "Product with this ID already exists" }),
        );
    }
    service.products.push(product.clone());
    reply(StatusCode::CREATED, json!(product))
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(product): Json<Product>,
) -> Response {
    if let Err(rejected) = authorize(&headers) {
        return rejected;
    }
    let mut service = state.lock().unwrap();
    match service.products.iter_mut().find(|p| p.id == id) {
        Some(slot) => {
            *slot = product.clone();
            reply(StatusCode::OK, json!(product))
        }
        None => reply(StatusCode::NOT_FOUND, json!({ "error": "Product not found" })),
    }
}

async fn delete_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = authorize(&headers) {
        return rejected;
    }
    let mut service = state.lock().unwrap();
    match service.products.iter().position(|p| p.id == id) {
        Some(pos) => {
            service.products.remove(pos);
            reply(StatusCode::OK, json!({ "message": "Product deleted" }))
        }
        None => reply(StatusCode::NOT_FOUND, json!({ "error": "Product not found" })),
    }
}

// =========================================================
// 辅助函数
// =========================================================

fn macbook() -> Product {
    Product {
        id: 1,
        title: "MacBook".to_string(),
        quantity: 10,
    }
}

struct Console {
    api: Arc<ServiceApi<ReqwestHttpClient>>,
    session: Arc<SessionStore<MemoryStorage>>,
    sync: CollectionSync<ReqwestHttpClient, MemoryStorage>,
}

fn console(base_url: &str) -> Console {
    let api = Arc::new(ServiceApi::new(base_url, ReqwestHttpClient::new()));
    let session = Arc::new(SessionStore::restore(MemoryStorage::new(), TOKEN_KEY));
    let sync = CollectionSync::new(api.clone(), session.clone());
    Console { api, session, sync }
}

fn service_products(state: &Shared) -> Vec<Product> {
    state.lock().unwrap().products.clone()
}

// =========================================================
// 测试
// =========================================================

#[tokio::test]
async fn test_login_crud_logout_flow() {
    let (url, state) = spawn_service(vec![macbook()]).await;
    let c = console(&url);

    // 未登录时受保护页面被重定向
    assert_eq!(
        RouteGuard::check(c.session.is_authenticated(), AppRoute::Products),
        GuardDecision::Redirect(AppRoute::Login)
    );

    c.session.login(&c.api, "a@b.com", "secret1").await.unwrap();
    assert_eq!(c.session.token().as_deref(), Some(TOKEN));
    assert_eq!(c.session.storage().load(TOKEN_KEY).as_deref(), Some(TOKEN));
    assert_eq!(
        RouteGuard::check(c.session.is_authenticated(), AppRoute::Products),
        GuardDecision::Render(AppRoute::Products)
    );

    c.sync.refresh().await.unwrap();
    assert_eq!(c.sync.products(), vec![macbook()]);

    c.sync.create("5", "Widget", "3").await.unwrap();
    assert!(c.sync.products().contains(&Product {
        id: 5,
        title: "Widget".to_string(),
        quantity: 3,
    }));
    assert_eq!(c.sync.products(), service_products(&state));

    c.sync.begin_edit(5).unwrap();
    c.sync.update(5, "Widget XL", "4").await.unwrap();
    assert_eq!(c.sync.products(), service_products(&state));
    assert!(c.sync.products().iter().any(|p| p.title == "Widget XL"));

    assert!(c.sync.delete(5, |_| true).await.unwrap());
    assert_eq!(c.sync.products(), vec![macbook()]);
    assert_eq!(c.sync.products(), service_products(&state));

    c.session.logout();
    assert_eq!(c.session.storage().load(TOKEN_KEY), None);
    assert!(RouteGuard::check(c.session.is_authenticated(), AppRoute::Home).is_redirect());
}

#[tokio::test]
async fn test_wrong_password_reports_service_message() {
    let (url, _state) = spawn_service(Vec::new()).await;
    let c = console(&url);

    let err = c.session.login(&c.api, "a@b.com", "nope123").await.unwrap_err();

    assert_eq!(err.status, ConsoleErrorStatus::Authentication);
    assert_eq!(err.message(), "Invalid credentials");
    assert!(!c.session.is_authenticated());
}

#[tokio::test]
async fn test_duplicate_create_leaves_service_and_mirror_untouched() {
    let (url, state) = spawn_service(vec![macbook()]).await;
    let c = console(&url);
    c.session.login(&c.api, "a@b.com", "secret1").await.unwrap();
    c.sync.refresh().await.unwrap();

    let err = c.sync.create("1", "Clone", "1").await.unwrap_err();

    assert_eq!(err.message(), "Product with this ID already exists");
    assert_eq!(service_products(&state), vec![macbook()]);
    assert_eq!(c.sync.products(), vec![macbook()]);
}

#[tokio::test]
async fn test_requests_after_logout_are_rejected() {
    let (url, _state) = spawn_service(vec![macbook()]).await;
    let c = console(&url);
    c.session.login(&c.api, "a@b.com", "secret1").await.unwrap();
    c.sync.refresh().await.unwrap();

    c.session.logout();
    let err = c.sync.refresh().await.unwrap_err();

    assert_eq!(err.status, ConsoleErrorStatus::Authorization);
    // 旧镜像保持不变
    assert_eq!(c.sync.products(), vec![macbook()]);
}

#[tokio::test]
async fn test_register_then_login() {
    let (url, _state) = spawn_service(Vec::new()).await;
    let c = console(&url);

    c.session
        .register(&c.api, "Ada", "ada@b.com", "secret1")
        .await
        .unwrap();
    assert!(!c.session.is_authenticated());

    c.session.login(&c.api, "ada@b.com", "secret1").await.unwrap();
    assert!(c.session.is_authenticated());
}
