use crate::auth::use_auth;
use crate::components::FieldError;
use crate::web::{FetchHttpClient, LocalStorage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use prodconsole::shared::Product;
use prodconsole::{CollectionSync, FieldErrors, FormField, FormMode, Notice, SyncSnapshot};
use std::sync::Arc;
use std::time::Duration;

type ProductSync = CollectionSync<FetchHttpClient, LocalStorage>;

/// 浏览器原生确认框，取消或无法弹出时视为拒绝
fn confirm_in_browser(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Clone, Copy)]
enum Action {
    Refresh,
    Submit,
    Delete(i64),
}

/// 页面与 `CollectionSync` 之间的桥
///
/// 同步状态保存在核心库里，每次操作结束后把快照发布到 `view` 信号驱动重新渲染。
#[derive(Clone, Copy)]
struct Controller {
    sync: StoredValue<Arc<ProductSync>>,
    view: RwSignal<SyncSnapshot>,
    running: RwSignal<usize>,
}

impl Controller {
    fn new(sync: ProductSync) -> Self {
        let view = RwSignal::new(sync.snapshot());
        Self {
            sync: StoredValue::new(Arc::new(sync)),
            view,
            running: RwSignal::new(0),
        }
    }

    /// 执行同步的本地操作并发布快照
    fn apply(&self, f: impl FnOnce(&ProductSync)) {
        let view = self.view;
        self.sync.with_value(|sync| {
            f(sync);
            view.set(sync.snapshot());
        });
    }

    /// 在后台执行远程操作，结束后发布快照
    fn spawn(&self, action: Action) {
        let sync = self.sync.get_value();
        let (view, running) = (self.view, self.running);
        running.update(|n| *n += 1);

        spawn_local(async move {
            // 错误已经写入快照中的 notice 和 errors
            let _ = match action {
                Action::Refresh => sync.refresh().await,
                Action::Submit => sync.submit().await,
                Action::Delete(id) => sync.delete(id, confirm_in_browser).await.map(|_| ()),
            };
            // 页面可能已经卸载
            view.try_set(sync.snapshot());
            running.try_update(|n| *n = n.saturating_sub(1));
        });
    }

    /// 只有当前通知仍是 `expected` 时才关闭
    fn dismiss(&self, expected: &Notice) {
        let view = self.view;
        self.sync.try_with_value(|sync| {
            if sync.snapshot().notice.as_ref() == Some(expected) {
                sync.dismiss_notice();
                view.try_set(sync.snapshot());
            }
        });
    }

    fn busy(&self) -> bool {
        self.running.get() > 0 || self.view.with(SyncSnapshot::is_busy)
    }
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let auth = use_auth();
    let controller = Controller::new(CollectionSync::new(auth.api.clone(), auth.session.clone()));
    let view_state = controller.view;

    // 首次进入页面时加载
    controller.spawn(Action::Refresh);

    // 成功通知 3 秒后自动消失，失败通知需要手动关闭
    Effect::new(move |_| {
        if let Some(notice @ Notice::Success(_)) = view_state.with(|v| v.notice.clone()) {
            set_timeout(move || controller.dismiss(&notice), Duration::from_secs(3));
        }
    });

    let mode = move || view_state.with(|v| v.mode);
    let product_count = move || view_state.with(|v| v.products.len());

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <NoticeToast controller=controller />

            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"Products"</h2>
                    <p class="text-base-content/70 text-sm">
                        {move || format!("{} items in inventory", product_count())}
                    </p>
                </div>
                <div class="flex gap-2">
                    <button
                        class="btn btn-ghost"
                        disabled=move || controller.busy()
                        on:click=move |_| controller.spawn(Action::Refresh)
                    >
                        {move || if controller.busy() {
                            view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                        } else {
                            "Refresh".into_any()
                        }}
                    </button>
                    <button
                        class="btn btn-primary"
                        disabled=move || mode().is_open()
                        on:click=move |_| controller.apply(|s| {
                            s.open_create();
                        })
                    >
                        "Add Product"
                    </button>
                </div>
            </div>

            <Show when=move || mode().is_open()>
                <ProductForm controller=controller />
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Quantity"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || product_count() == 0>
                                <tr>
                                    <td colspan="4" class="text-center py-8 text-base-content/50">
                                        {move || if view_state.with(|v| v.loaded) {
                                            "No products yet."
                                        } else {
                                            "Loading products..."
                                        }}
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || view_state.with(|v| v.products.clone())
                                key=|p: &Product| (p.id, p.title.clone(), p.quantity)
                                children=move |product: Product| {
                                    let id = product.id;
                                    view! {
                                        <tr>
                                            <td class="font-mono">{product.id}</td>
                                            <td>{product.title}</td>
                                            <td>{product.quantity}</td>
                                            <td class="text-right space-x-2">
                                                <button
                                                    class="btn btn-sm btn-outline"
                                                    on:click=move |_| controller.apply(|s| {
                                                        let _ = s.begin_edit(id);
                                                    })
                                                >
                                                    "Update"
                                                </button>
                                                <button
                                                    class="btn btn-sm btn-outline btn-error"
                                                    on:click=move |_| controller.spawn(Action::Delete(id))
                                                >
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn NoticeToast(controller: Controller) -> impl IntoView {
    let notice = move || controller.view.with(|v| v.notice.clone());

    view! {
        <Show when=move || notice().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || match notice() {
                    Some(Notice::Failure(_)) => "alert alert-error shadow-lg",
                    _ => "alert alert-success shadow-lg",
                }>
                    <span>{move || match notice() {
                        Some(Notice::Success(msg) | Notice::Failure(msg)) => msg,
                        None => String::new(),
                    }}</span>
                    <button
                        class="btn btn-sm btn-ghost"
                        on:click=move |_| {
                            if let Some(n) = notice() {
                                controller.dismiss(&n);
                            }
                        }
                    >
                        "✕"
                    </button>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn ProductForm(controller: Controller) -> impl IntoView {
    let view_state = controller.view;
    let fields = move || view_state.with(|v| v.fields.clone());
    let errors = Signal::derive(move || view_state.with(|v| v.errors.clone()));
    let editing = move || view_state.with(|v| v.mode.editing_id());

    let heading = move || match view_state.with(|v| v.mode) {
        FormMode::Editing(id) => format!("Edit product {}", id),
        _ => "Add product".to_string(),
    };

    let set = move |field: FormField| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            controller.apply(|s| s.set_field(field, value));
        }
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        controller.spawn(Action::Submit);
    };

    let has_errors = move || !errors.with(FieldErrors::is_empty);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit novalidate>
                <h3 class="card-title">{heading}</h3>

                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <div class="form-control">
                        <label class="label" for="product-id">
                            <span class="label-text">"Product ID"</span>
                        </label>
                        <input
                            id="product-id"
                            type="text"
                            inputmode="numeric"
                            class="input input-bordered"
                            prop:value=move || fields().id
                            disabled=move || editing().is_some()
                            on:input=set(FormField::Id)
                        />
                        <FieldError errors=errors field=FormField::Id />
                    </div>
                    <div class="form-control">
                        <label class="label" for="product-title">
                            <span class="label-text">"Product name"</span>
                        </label>
                        <input
                            id="product-title"
                            type="text"
                            class="input input-bordered"
                            prop:value=move || fields().title
                            on:input=set(FormField::Title)
                        />
                        <FieldError errors=errors field=FormField::Title />
                    </div>
                    <div class="form-control">
                        <label class="label" for="product-quantity">
                            <span class="label-text">"Quantity"</span>
                        </label>
                        <input
                            id="product-quantity"
                            type="text"
                            inputmode="numeric"
                            class="input input-bordered"
                            prop:value=move || fields().quantity
                            on:input=set(FormField::Quantity)
                        />
                        <FieldError errors=errors field=FormField::Quantity />
                    </div>
                </div>

                <div class="card-actions justify-end mt-4">
                    <Show when=has_errors>
                        <span class="text-error text-sm self-center">"Please fix the highlighted fields."</span>
                    </Show>
                    <button
                        type="button"
                        class="btn btn-ghost"
                        on:click=move |_| controller.apply(|s| s.cancel())
                    >
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || controller.busy()>
                        {move || if editing().is_some() { "Save changes" } else { "Add" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
