//! 商品集合同步
//!
//! `CollectionSync` 维护本地商品列表（镜像）和新增/编辑表单的模式。
//!
//! 一致性约定：镜像只会被一次完整的 `GET /api/products` 响应整体替换，
//! 初次加载和每次成功的增删改之后都会重新拉取，从不在本地增量修改。
//! 这样渲染出来的列表始终是服务端的真实快照，代价是每次修改多一次往返。
//!
//! 并发的 `refresh()` 按发起顺序编号，晚到的旧响应会被丢弃。

use crate::api::ServiceApi;
use crate::error::{ConsoleError, ConsoleResult};
use crate::form::{
    FieldErrors, FormField, FormFields, FormMode, validate_new_product, validate_product_update,
};
use crate::request::HttpClient;
use crate::session::{SessionStore, TokenStorage};
use crate::{log_error, log_info};
use prodconsole_shared::{
    ApiRequest, CreateProductRequest, DeleteProductRequest, ListProductsRequest, Product,
    UpdateProductRequest,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};


pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

/// 操作结束后给用户的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

/// 渲染用的状态快照
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
    pub products: Vec<Product>,
    pub mode: FormMode,
    pub fields: FormFields,
    pub errors: FieldErrors,
    pub notice: Option<Notice>,
    /// 尚未完成的请求数
    pub pending: usize,
    /// 是否已经成功加载过一次
    pub loaded: bool,
}

impl SyncSnapshot {
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}

#[derive(Default)]
struct SyncState {
    view: SyncSnapshot,
    /// 已发出的 refresh 编号
    issued: u64,
    /// 已应用到镜像的最新编号
    applied: u64,
}

pub struct CollectionSync<C, S> {
    api: Arc<ServiceApi<C>>,
    session: Arc<SessionStore<S>>,
    state: Mutex<SyncState>,
}

impl<C: HttpClient, S: TokenStorage> CollectionSync<C, S> {
    pub fn new(api: Arc<ServiceApi<C>>, session: Arc<SessionStore<S>>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(SyncState::default()),
        }
    }

    pub fn api(&self) -> &ServiceApi<C> {
        &self.api
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    // 锁不会跨越 .await 持有
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.lock().view.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().view.products.clone()
    }

    pub fn mode(&self) -> FormMode {
        self.lock().view.mode
    }

    pub fn dismiss_notice(&self) {
        self.lock().view.notice = None;
    }

    // =========================================================
    // 表单模式切换
    // =========================================================

    /// Hidden -> Creating，字段清空。表单已打开时不做任何事。
    pub fn open_create(&self) -> bool {
        let mut state = self.lock();
        if state.view.mode.is_open() {
            return false;
        }
        state.view.mode = FormMode::Creating;
        state.view.fields.clear();
        state.view.errors = FieldErrors::default();
        true
    }

    /// 进入编辑模式，字段取自镜像中该商品此刻的值
    pub fn begin_edit(&self, id: i64) -> ConsoleResult<()> {
        let mut state = self.lock();
        let product = state
            .view
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| {
                ConsoleError::validation(format!("Product {} is not in the list", id))
                    .in_op("sync.begin_edit")
            })?;

        state.view.mode = FormMode::Editing(id);
        state.view.fields = FormFields::from_product(&product);
        state.view.errors = FieldErrors::default();
        Ok(())
    }

    pub fn set_field(&self, field: FormField, value: String) {
        // 编辑期间 id 不可修改
        let mut state = self.lock();
        if field == FormField::Id && state.view.mode.editing_id().is_some() {
            return;
        }
        state.view.fields.set(field, value);
    }

    /// 取消：回到 Hidden，清空字段和错误，不发请求
    pub fn cancel(&self) {
        let mut state = self.lock();
        Self::close_form(&mut state);
    }

    fn close_form(state: &mut SyncState) {
        state.view.mode = FormMode::Hidden;
        state.view.fields.clear();
        state.view.errors = FieldErrors::default();
    }

    /// 按当前模式提交表单
    pub async fn submit(&self) -> ConsoleResult<()> {
        let (mode, fields) = {
            let state = self.lock();
            (state.view.mode, state.view.fields.clone())
        };

        match mode {
            FormMode::Creating => self.create(&fields.id, &fields.title, &fields.quantity).await,
            FormMode::Editing(id) => self.update(id, &fields.title, &fields.quantity).await,
            FormMode::Hidden => {
                Err(ConsoleError::validation("The product form is not open").in_op("sync.submit"))
            }
        }
    }

    // =========================================================
    // 远端操作
    // =========================================================

    /// 拉取完整集合并整体替换镜像
    ///
    /// 失败时保留旧镜像并设置失败通知。
    pub async fn refresh(&self) -> ConsoleResult<()> {
        let ticket = {
            let mut state = self.lock();
            state.issued += 1;
            state.view.pending += 1;
            state.issued
        };

        let token = self.session.token();
        let result = self.api.call(&ListProductsRequest, token.as_deref()).await;

        let mut state = self.lock();
        state.view.pending -= 1;
        let stale = ticket < state.applied;

        match result {
            Ok(products) => {
                if stale {
                    log_info!("[Sync] Discarded refresh #{} (#{} already applied).", ticket, state.applied);
                    return Ok(());
                }
                state.applied = ticket;
                state.view.products = products;
                state.view.loaded = true;
                Ok(())
            }
            Err(e) => {
                let e = e.in_op("sync.refresh");
                log_error!("[Sync] {}", e);
                if !stale {
                    state.view.notice =
                        Some(Notice::Failure(format!("Failed to load products: {}", e.message())));
                }
                Err(e)
            }
        }
    }

    /// 新建商品
    ///
    /// 校验失败时不发请求；服务端拒绝时保留表单内容以便重试。
    pub async fn create(&self, id: &str, title: &str, quantity: &str) -> ConsoleResult<()> {
        let submitted = self.mode();
        let product = self.validated(validate_new_product(id, title, quantity), "sync.create")?;
        self.mutate(
            "sync.create",
            submitted,
            CreateProductRequest { product },
            "Product added",
            "Failed to save product",
        )
        .await
    }

    /// 更新商品的 title/quantity，`id` 为编辑目标
    pub async fn update(&self, id: i64, title: &str, quantity: &str) -> ConsoleResult<()> {
        let submitted = self.mode();
        let product = self.validated(validate_product_update(id, title, quantity), "sync.update")?;
        self.mutate(
            "sync.update",
            submitted,
            UpdateProductRequest { product },
            "Product updated",
            "Failed to save product",
        )
        .await
    }

    /// 删除商品
    ///
    /// `confirm` 是用户确认步骤，拒绝时不发请求，返回 `Ok(false)`。
    /// 确认后无论删除是否成功都会刷新镜像，删除失败仍以错误返回。
    pub async fn delete<F>(&self, id: i64, confirm: F) -> ConsoleResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_PROMPT) {
            log_info!("[Sync] Delete of product {} cancelled by user.", id);
            return Ok(false);
        }

        let outcome = self.send_tracked(&DeleteProductRequest { id }).await;
        let refreshed = self.refresh().await;

        let mut state = self.lock();
        match outcome {
            Ok(()) => {
                if state.view.mode == FormMode::Editing(id) {
                    Self::close_form(&mut state);
                }
                if refreshed.is_ok() {
                    state.view.notice = Some(Notice::Success("Product deleted".to_string()));
                }
                Ok(true)
            }
            Err(e) => {
                let e = e.in_op_with("sync.delete", id.to_string());
                log_error!("[Sync] {}", e);
                state.view.notice = Some(Notice::Failure(format!(
                    "Failed to delete product: {}",
                    e.message()
                )));
                Err(e)
            }
        }
    }

    // =========================================================
    // 内部工具
    // =========================================================

    fn validated(
        &self,
        result: Result<Product, FieldErrors>,
        op: &str,
    ) -> ConsoleResult<Product> {
        let mut state = self.lock();
        match result {
            Ok(product) => {
                state.view.errors = FieldErrors::default();
                Ok(product)
            }
            Err(errors) => {
                let e = errors.to_error().in_op(op);
                state.view.errors = errors;
                Err(e)
            }
        }
    }

    /// 发送带 token 的请求并维护 pending 计数
    async fn send_tracked<R: ApiRequest>(&self, req: &R) -> ConsoleResult<()> {
        self.lock().view.pending += 1;
        let token = self.session.token();
        let result = self.api.call(req, token.as_deref()).await;
        self.lock().view.pending -= 1;
        result.map(|_| ())
    }

    /// 发送修改请求
    ///
    /// 成功时只有表单仍处于提交时的模式才会关闭，请求期间用户切换到的
    /// 其他编辑不受影响。
    async fn mutate<R: ApiRequest>(
        &self,
        op: &str,
        submitted: FormMode,
        req: R,
        success: &str,
        failure: &str,
    ) -> ConsoleResult<()> {
        match self.send_tracked(&req).await {
            Ok(()) => {
                {
                    let mut state = self.lock();
                    if state.view.mode == submitted {
                        Self::close_form(&mut state);
                    }
                    state.view.notice = Some(Notice::Success(success.to_string()));
                }
                log_info!("[Sync] {} ok.", op);
                // 刷新失败会覆盖成功通知，但修改本身已经成功
                if let Err(e) = self.refresh().await {
                    log_info!("[Sync] {} kept despite failed refresh: {}", op, e.message());
                }
                Ok(())
            }
            Err(e) => {
                let e = e.in_op(op);
                log_error!("[Sync] {}", e);
                self.lock().view.notice =
                    Some(Notice::Failure(format!("{}: {}", failure, e.message())));
                Err(e)
            }
        }
    }
}
