use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::user::{FieldError, LoginForm, RegisterForm};

use crate::auth::use_auth;
use crate::web::route::{AuthMode, Overlay};
use crate::web::router::use_router;

fn field_message(errors: &[FieldError], field: &str) -> Option<&'static str> {
    errors.iter().find(|e| e.field == field).map(|e| e.message)
}

#[component]
fn FieldHint(errors: ReadSignal<Vec<FieldError>>, field: &'static str) -> impl IntoView {
    move || {
        errors.with(|list| field_message(list, field)).map(|message| {
            view! {
                <label class="label">
                    <span class="label-text-alt text-error">{message}</span>
                </label>
            }
        })
    }
}

#[component]
fn LoginFields() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (pending, set_pending) = signal(false);
    let (server_error, set_server_error) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get(),
            password: password.get(),
        };
        let problems = form.validate();
        set_errors.set(problems.clone());
        if !problems.is_empty() {
            return;
        }

        set_pending.set(true);
        set_server_error.set(None);
        spawn_local(async move {
            if let Err(e) = auth.login(form.email, form.password).await {
                set_server_error.set(Some(e.to_string()));
            }
            set_pending.set(false);
        });
    };

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <Show when=move || server_error.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || server_error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="form-control">
                <label class="label" for="login_email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="login_email"
                    type="email"
                    placeholder="you@example.com"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                    class="input input-bordered"
                />
                <FieldHint errors=errors field="email" />
            </div>
            <div class="form-control">
                <label class="label" for="login_password">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    id="login_password"
                    type="password"
                    placeholder="••••••••"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                    class="input input-bordered"
                />
                <FieldHint errors=errors field="password" />
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || pending.get()>
                    {move || if pending.get() {
                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                    } else {
                        "Sign in".into_any()
                    }}
                </button>
            </div>
            <p class="text-center text-sm">
                "Don't have an account? "
                <a class="link link-primary" on:click=move |_| router.prompt(AuthMode::Register)>
                    "Create one"
                </a>
            </p>
        </form>
    }
}

#[component]
fn RegisterFields() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (pending, set_pending) = signal(false);
    let (server_error, set_server_error) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            first_name: first_name.get(),
            last_name: last_name.get(),
            email: email.get(),
            password: password.get(),
            confirm_password: confirm.get(),
        };
        let problems = form.validate();
        set_errors.set(problems.clone());
        if !problems.is_empty() {
            return;
        }

        set_pending.set(true);
        set_server_error.set(None);
        spawn_local(async move {
            let result = auth
                .register(form.first_name, form.last_name, form.email, form.password)
                .await;
            if let Err(e) = result {
                set_server_error.set(Some(e.to_string()));
            }
            set_pending.set(false);
        });
    };

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <Show when=move || server_error.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || server_error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="grid grid-cols-2 gap-4">
                <div class="form-control">
                    <label class="label" for="first_name">
                        <span class="label-text">"First name"</span>
                    </label>
                    <input
                        id="first_name"
                        type="text"
                        on:input=move |ev| set_first_name.set(event_target_value(&ev))
                        prop:value=first_name
                        class="input input-bordered w-full"
                    />
                    <FieldHint errors=errors field="firstName" />
                </div>
                <div class="form-control">
                    <label class="label" for="last_name">
                        <span class="label-text">"Last name"</span>
                    </label>
                    <input
                        id="last_name"
                        type="text"
                        on:input=move |ev| set_last_name.set(event_target_value(&ev))
                        prop:value=last_name
                        class="input input-bordered w-full"
                    />
                    <FieldHint errors=errors field="lastName" />
                </div>
            </div>
            <div class="form-control">
                <label class="label" for="register_email">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    id="register_email"
                    type="email"
                    placeholder="you@example.com"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                    class="input input-bordered"
                />
                <FieldHint errors=errors field="email" />
            </div>
            <div class="form-control">
                <label class="label" for="register_password">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    id="register_password"
                    type="password"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                    class="input input-bordered"
                />
                <FieldHint errors=errors field="password" />
            </div>
            <div class="form-control">
                <label class="label" for="confirm_password">
                    <span class="label-text">"Confirm password"</span>
                </label>
                <input
                    id="confirm_password"
                    type="password"
                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                    prop:value=confirm
                    class="input input-bordered"
                />
                <FieldHint errors=errors field="confirmPassword" />
            </div>
            <div class="form-control mt-6">
                <button class="btn btn-primary" disabled=move || pending.get()>
                    {move || if pending.get() {
                        view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                    } else {
                        "Create account".into_any()
                    }}
                </button>
            </div>
            <p class="text-center text-sm">
                "Already have an account? "
                <a class="link link-primary" on:click=move |_| router.prompt(AuthMode::Login)>
                    "Sign in"
                </a>
            </p>
        </form>
    }
}

/// 登录 / 注册浮层
///
/// 由路由状态中的 [`Overlay`] 控制显示。
#[component]
pub fn AuthModal() -> impl IntoView {
    let router = use_router();
    let overlay = router.overlay();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            let open = overlay.get() != Overlay::Closed;
            if open && !dialog.open() {
                let _ = dialog.show_modal();
            } else if !open && dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| router.close_overlay()>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || match overlay.get() {
                        Overlay::Open(AuthMode::Register) => "Create your account",
                        _ => "Welcome back",
                    }}
                </h3>
                {move || match overlay.get() {
                    Overlay::Open(AuthMode::Register) => view! { <RegisterFields /> }.into_any(),
                    Overlay::Open(AuthMode::Login) => view! { <LoginFields /> }.into_any(),
                    Overlay::Closed => ().into_any(),
                }}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
