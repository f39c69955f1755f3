use leptos::prelude::*;
use prodconsole::{FieldErrors, FormField};

/// 输入框下方的校验错误提示
#[component]
pub fn FieldError(#[prop(into)] errors: Signal<FieldErrors>, field: FormField) -> impl IntoView {
    let message = move || errors.with(|e| e.get(field).map(str::to_string));

    view! {
        <Show when=move || message().is_some()>
            <label class="label">
                <span class="label-text-alt text-error">{move || message().unwrap_or_default()}</span>
            </label>
        </Show>
    }
}
