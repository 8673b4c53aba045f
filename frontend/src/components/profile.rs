use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::{ProfileData, ProfileExperience};

use crate::auth::use_auth;
use crate::web::router::use_router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Personal,
    Skills,
    Experience,
}

/// 单行文本字段
#[component]
fn TextField(
    label: &'static str,
    editing: ReadSignal<bool>,
    value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type="text"
                class="input input-bordered w-full"
                disabled=move || !editing.get()
                prop:value=value
                on:input=move |ev| on_change.run(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (profile, set_profile) = signal(ProfileData::default());
    let (loading, set_loading) = signal(true);
    let (editing, set_editing) = signal(false);
    let (saving, set_saving) = signal(false);
    let (tab, set_tab) = signal(Tab::Personal);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let load_profile = move || {
        set_loading.set(true);
        spawn_local(async move {
            match auth.api().profile().await {
                Ok(data) => set_profile.set(data.unwrap_or_default()),
                Err(e) if e.is_unauthorized() => {
                    auth.session_expired();
                    router.auth_required();
                    return;
                }
                Err(e) => {
                    log::error!("[Profile] Loading failed: {}", e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_loading.set(false);
        });
    };

    load_profile();

    let on_save = move |_: leptos::ev::MouseEvent| {
        let data = profile.get();
        set_saving.set(true);
        spawn_local(async move {
            match auth.api().update_profile(&data).await {
                Ok(saved) => {
                    let saved = saved.unwrap_or(data);
                    auth.update_user(saved.user_patch());
                    set_profile.set(saved);
                    set_editing.set(false);
                    set_notification.set(Some(("Profile saved".to_string(), false)));
                }
                Err(e) if e.is_unauthorized() => {
                    auth.session_expired();
                    router.auth_required();
                    return;
                }
                Err(e) => {
                    log::error!("[Profile] Saving failed: {}", e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            set_saving.set(false);
        });
    };

    let on_cancel = move |_: leptos::ev::MouseEvent| {
        set_editing.set(false);
        load_profile();
    };

    // 文本字段：读取器 + 写入器
    let field = move |read: fn(&ProfileData) -> String, write: fn(&mut ProfileData, String)| {
        (
            Signal::derive(move || profile.with(read)),
            Callback::new(move |value: String| set_profile.update(|p| write(p, value))),
        )
    };

    let personal = move || {
        let fields: [(&'static str, fn(&ProfileData) -> String, fn(&mut ProfileData, String)); 9] = [
            ("First name", |p| p.first_name.clone(), |p, v| p.first_name = v),
            ("Last name", |p| p.last_name.clone(), |p, v| p.last_name = v),
            ("Email", |p| p.email.clone(), |p, v| p.email = v),
            ("Phone", |p| p.phone.clone(), |p, v| p.phone = v),
            ("Location", |p| p.location.clone(), |p, v| p.location = v),
            ("Current role", |p| p.current_role.clone(), |p, v| p.current_role = v),
            ("LinkedIn", |p| p.linkedin_url.clone(), |p, v| p.linkedin_url = v),
            ("GitHub", |p| p.github_url.clone(), |p, v| p.github_url = v),
            ("Portfolio", |p| p.portfolio_url.clone(), |p, v| p.portfolio_url = v),
        ];
        view! {
            <div class="grid md:grid-cols-2 gap-4">
                {fields
                    .into_iter()
                    .map(|(label, read, write)| {
                        let (value, on_change) = field(read, write);
                        view! { <TextField label=label editing=editing value=value on_change=on_change /> }
                    })
                    .collect_view()}
            </div>
            <div class="form-control mt-4">
                <label class="label">
                    <span class="label-text">"Bio"</span>
                </label>
                <textarea
                    class="textarea textarea-bordered h-24"
                    disabled=move || !editing.get()
                    prop:value=move || profile.with(|p| p.bio.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        set_profile.update(|p| p.bio = value);
                    }
                ></textarea>
            </div>
        }
    };

    // 只在条目数量变化时重建列表，编辑中的输入框保持焦点
    let skill_count = Memo::new(move |_| profile.with(|p| p.skills.len()));
    let experience_count = Memo::new(move |_| profile.with(|p| p.experience.len()));

    let skills = move || {
        let count = skill_count.get();
        view! {
            <div class="space-y-3">
                {(0..count)
                    .map(|i| {
                        view! {
                            <div class="flex items-center gap-4">
                                <input
                                    type="text"
                                    placeholder="Skill"
                                    class="input input-bordered flex-1"
                                    disabled=move || !editing.get()
                                    prop:value=move || profile.with(|p| p.skills.get(i).map(|s| s.name.clone()).unwrap_or_default())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        set_profile.update(|p| if let Some(s) = p.skills.get_mut(i) { s.name = value; });
                                    }
                                />
                                <input
                                    type="range"
                                    min="0"
                                    max="100"
                                    class="range range-primary flex-1"
                                    disabled=move || !editing.get()
                                    prop:value=move || profile.with(|p| p.skills.get(i).map(|s| s.level.to_string()).unwrap_or_default())
                                    on:input=move |ev| {
                                        let level = event_target_value(&ev).parse::<f64>().unwrap_or_default();
                                        set_profile.update(|p| if let Some(s) = p.skills.get_mut(i) { s.level = level; });
                                    }
                                />
                                <Show when=move || editing.get()>
                                    <button class="btn btn-ghost btn-sm text-error" on:click=move |_| set_profile.update(|p| p.remove_skill(i))>
                                        "Remove"
                                    </button>
                                </Show>
                            </div>
                        }
                    })
                    .collect_view()}
                <Show when=move || editing.get()>
                    <button class="btn btn-outline btn-sm" on:click=move |_| set_profile.update(ProfileData::add_skill)>
                        "Add skill"
                    </button>
                </Show>
            </div>
        }
    };

    let experience = move || {
        let count = experience_count.get();
        view! {
            <div class="space-y-4">
                {(0..count)
                    .map(|i| {
                        let read = move |f: fn(&ProfileExperience) -> String| {
                            move || profile.with(|p| p.experience.get(i).map(f).unwrap_or_default())
                        };
                        view! {
                            <div class="card bg-base-200">
                                <div class="card-body p-4 grid md:grid-cols-3 gap-2">
                                    <input type="text" placeholder="Company" class="input input-bordered"
                                        disabled=move || !editing.get()
                                        prop:value=read(|e| e.company.clone())
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_profile.update(|p| if let Some(e) = p.experience.get_mut(i) { e.company = value; });
                                        }
                                    />
                                    <input type="text" placeholder="Position" class="input input-bordered"
                                        disabled=move || !editing.get()
                                        prop:value=read(|e| e.position.clone())
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_profile.update(|p| if let Some(e) = p.experience.get_mut(i) { e.position = value; });
                                        }
                                    />
                                    <input type="text" placeholder="Duration" class="input input-bordered"
                                        disabled=move || !editing.get()
                                        prop:value=read(|e| e.duration.clone())
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_profile.update(|p| if let Some(e) = p.experience.get_mut(i) { e.duration = value; });
                                        }
                                    />
                                    <textarea placeholder="Description" class="textarea textarea-bordered md:col-span-3"
                                        disabled=move || !editing.get()
                                        prop:value=read(|e| e.description.clone())
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_profile.update(|p| if let Some(e) = p.experience.get_mut(i) { e.description = value; });
                                        }
                                    ></textarea>
                                    <Show when=move || editing.get()>
                                        <button class="btn btn-ghost btn-sm text-error" on:click=move |_| set_profile.update(|p| p.remove_experience(i))>
                                            "Remove"
                                        </button>
                                    </Show>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
                <Show when=move || editing.get()>
                    <button class="btn btn-outline btn-sm" on:click=move |_| set_profile.update(ProfileData::add_experience)>
                        "Add experience"
                    </button>
                </Show>
            </div>
        }
    };

    let tab_class = move |t: Tab| if tab.get() == t { "tab tab-active" } else { "tab" };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-4xl mx-auto space-y-6">
                {move || notification.get().map(|(message, is_err)| {
                    let class = if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" };
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class=class><span>{message}</span></div>
                        </div>
                    }
                })}

                <div class="flex items-center justify-between">
                    <h1 class="text-3xl font-bold">"Your profile"</h1>
                    <Show
                        when=move || editing.get()
                        fallback=move || view! {
                            <button class="btn btn-primary" disabled=move || loading.get() on:click=move |_| set_editing.set(true)>
                                "Edit profile"
                            </button>
                        }
                    >
                        <div class="flex gap-2">
                            <button class="btn btn-ghost" on:click=on_cancel>"Cancel"</button>
                            <button class="btn btn-primary" disabled=move || saving.get() on:click=on_save>
                                {move || if saving.get() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                } else {
                                    "Save".into_any()
                                }}
                            </button>
                        </div>
                    </Show>
                </div>

                <div role="tablist" class="tabs tabs-boxed">
                    <a role="tab" class=move || tab_class(Tab::Personal) on:click=move |_| set_tab.set(Tab::Personal)>"Personal"</a>
                    <a role="tab" class=move || tab_class(Tab::Skills) on:click=move |_| set_tab.set(Tab::Skills)>"Skills"</a>
                    <a role="tab" class=move || tab_class(Tab::Experience) on:click=move |_| set_tab.set(Tab::Experience)>"Experience"</a>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        {move || {
                            if loading.get() {
                                return view! {
                                    <div class="flex justify-center py-16">
                                        <span class="loading loading-spinner loading-lg text-primary"></span>
                                    </div>
                                }
                                .into_any();
                            }
                            match tab.get() {
                                Tab::Personal => personal().into_any(),
                                Tab::Skills => skills().into_any(),
                                Tab::Experience => experience().into_any(),
                            }
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}
