use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::route::{AuthMode, View};
use crate::web::router::use_router;

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let current = router.current_view();
    let is_authenticated = auth.is_authenticated_signal();
    let user = auth.user_signal();

    let nav_items = View::NAVIGATION
        .into_iter()
        .map(|view| {
            let class = move || {
                if current.get() == view {
                    "btn btn-ghost btn-sm btn-active"
                } else {
                    "btn btn-ghost btn-sm"
                }
            };
            view! {
                <li>
                    <a class=class on:click=move |_| router.navigate(view)>
                        {view.label()}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="navbar bg-base-100 shadow-md sticky top-0 z-40">
            <div class="flex-1 gap-2">
                <a class="btn btn-ghost text-xl" on:click=move |_| router.navigate(View::Home)>
                    "SkillSync"
                </a>
                <ul class="menu menu-horizontal px-1 hidden lg:flex">{nav_items}</ul>
            </div>
            <div class="flex-none gap-2">
                <Show
                    when=move || is_authenticated.get()
                    fallback=move || view! {
                        <button class="btn btn-ghost" on:click=move |_| router.prompt(AuthMode::Login)>
                            "Sign in"
                        </button>
                        <button class="btn btn-primary" on:click=move |_| router.prompt(AuthMode::Register)>
                            "Get started"
                        </button>
                    }
                >
                    <div class="dropdown dropdown-end">
                        <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                            <div class="avatar placeholder">
                                <div class="bg-primary text-primary-content rounded-full w-8">
                                    <span>
                                        {move || user.get()
                                            .and_then(|u| u.first_name.chars().next())
                                            .map(|c| c.to_uppercase().to_string())
                                            .unwrap_or_default()}
                                    </span>
                                </div>
                            </div>
                            <span class="hidden md:inline">
                                {move || user.get().map(|u| u.full_name()).unwrap_or_default()}
                            </span>
                        </div>
                        <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                            <li>
                                <a on:click=move |_| router.navigate(View::Profile)>"Profile"</a>
                            </li>
                            <li>
                                <a on:click=move |_| router.navigate(View::Dashboard)>"Dashboard"</a>
                            </li>
                            <li>
                                <a class="text-error hover:bg-error/10" on:click=move |_| auth.logout()>
                                    "Sign out"
                                </a>
                            </li>
                        </ul>
                    </div>
                </Show>
            </div>
        </div>
    }
}
