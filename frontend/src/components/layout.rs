use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use prodconsole::AppRoute;

/// 顶部导航栏，链接随登录状态变化
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let is_authenticated = auth.is_authenticated_signal();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        logout(&auth);
        router.go(AppRoute::auth_failure_redirect());
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl mb-6">
            <div class="flex-1">
                <Link to=AppRoute::Landing class="btn btn-ghost text-xl">"Inventory"</Link>
            </div>
            <div class="flex-none gap-2">
                <Show
                    when=move || is_authenticated.get()
                    fallback=|| view! {
                        <Link to=AppRoute::Login class="btn btn-ghost">"Login"</Link>
                        <Link to=AppRoute::Register class="btn btn-primary">"Register"</Link>
                    }
                >
                    <Link to=AppRoute::Home class="btn btn-ghost">"Home"</Link>
                    <Link to=AppRoute::Products class="btn btn-ghost">"Products"</Link>
                    <Link to=AppRoute::About class="btn btn-ghost">"About"</Link>
                    <button on:click=on_logout.clone() class="btn btn-outline btn-error">
                        "Logout"
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// 带导航栏的页面外壳
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <NavBar />
            {children()}
        </div>
    }
}
