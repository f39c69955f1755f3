//! 静态页面

use crate::web::router::Link;
use leptos::prelude::*;
use prodconsole::AppRoute;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh] bg-base-100 rounded-box shadow-xl">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-5xl font-bold">"Inventory Console"</h1>
                    <p class="py-6">"Keep track of every product and its stock in one place."</p>
                    <Link to=AppRoute::Login class="btn btn-primary">"Get started"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl max-w-3xl mx-auto">
            <div class="card-body">
                <h2 class="card-title">"Welcome back"</h2>
                <p>"Manage your catalogue from the products page."</p>
                <div class="card-actions justify-end">
                    <Link to=AppRoute::Products class="btn btn-primary">"Go to products"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl max-w-3xl mx-auto">
            <div class="card-body">
                <h2 class="card-title">"About"</h2>
                <p>
                    "A small console for adding, updating and removing products. "
                    "Every change is confirmed by the server before it shows up in the list."
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
            </div>
        </div>
    }
}
