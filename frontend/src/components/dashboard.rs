use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::{DashboardProfile, ExperienceField};

use crate::auth::use_auth;
use crate::web::route::View;
use crate::web::router::use_router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Skills,
    Gaps,
    Roadmap,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Overview, Tab::Skills, Tab::Gaps, Tab::Roadmap];

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Skills => "Skills",
            Tab::Gaps => "Skill Gaps",
            Tab::Roadmap => "Roadmap",
        }
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

#[component]
fn Overview(profile: DashboardProfile) -> impl IntoView {
    let average = profile
        .average_skill_level()
        .map(|level| format!("{:.0}%", level))
        .unwrap_or_else(|| "-".to_string());
    let experience = match profile.experience {
        ExperienceField::Summary(text) => view! { <p class="whitespace-pre-line">{text}</p> }.into_any(),
        ExperienceField::Entries(entries) if entries.is_empty() => {
            view! { <p class="text-base-content/50">"No experience on record yet."</p> }.into_any()
        }
        ExperienceField::Entries(entries) => entries
            .into_iter()
            .map(|e| view! {
                <div class="border-l-4 border-primary pl-4">
                    <p class="font-bold">{e.position} " at " {e.company}</p>
                    <p class="text-sm text-base-content/60">{e.duration}</p>
                    <p class="text-sm">{e.description}</p>
                </div>
            })
            .collect_view()
            .into_any(),
    };

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Skills"</div>
                <div class="stat-value text-primary">{profile.skills.len()}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Average level"</div>
                <div class="stat-value text-secondary">{average}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Skill gaps"</div>
                <div class="stat-value">{profile.skill_gaps.len()}</div>
            </div>
        </div>

        <div class="grid md:grid-cols-2 gap-6 mt-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Career matches"</h3>
                    <Show when={
                        let empty = profile.career_matches.is_empty();
                        move || empty
                    }>
                        <p class="text-base-content/50">"Upload your resume to see matching roles."</p>
                    </Show>
                    {profile
                        .career_matches
                        .into_iter()
                        .map(|m| view! {
                            <div class="space-y-1">
                                <div class="flex justify-between">
                                    <span class="font-semibold">{m.role}</span>
                                    <span>{format!("{:.0}%", m.match_percentage)}</span>
                                </div>
                                <progress class="progress progress-primary w-full" value=m.match_percentage max="100"></progress>
                                <p class="text-xs text-base-content/60">
                                    "Missing: " {list_or_dash(&m.missing_skills)}
                                </p>
                            </div>
                        })
                        .collect_view()}
                </div>
            </div>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Experience"</h3>
                    {experience}
                </div>
            </div>
        </div>
    }
}

#[component]
fn SkillsTab(profile: DashboardProfile) -> impl IntoView {
    let groups = profile.skills_by_category();
    if groups.is_empty() {
        return view! { <p class="text-base-content/50">"No skills detected yet."</p> }.into_any();
    }

    view! {
        <div class="grid md:grid-cols-2 gap-6">
            {groups
                .into_iter()
                .map(|(category, skills)| view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">{category}</h3>
                            {skills
                                .into_iter()
                                .map(|s| view! {
                                    <div class="flex items-center gap-4">
                                        <span class="w-32 truncate">{s.name}</span>
                                        <progress class="progress progress-secondary flex-1" value=s.level max="100"></progress>
                                        <span class="text-sm w-12 text-right">{format!("{:.0}%", s.level)}</span>
                                    </div>
                                })
                                .collect_view()}
                        </div>
                    </div>
                })
                .collect_view()}
        </div>
    }
    .into_any()
}

#[component]
fn GapsTab(profile: DashboardProfile) -> impl IntoView {
    if profile.skill_gaps.is_empty() {
        return view! { <p class="text-base-content/50">"No skill gaps identified."</p> }.into_any();
    }

    view! {
        <div class="overflow-x-auto w-full bg-base-100 rounded-box shadow-xl">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Skill"</th>
                        <th>"Importance"</th>
                        <th class="hidden md:table-cell">"Time to learn"</th>
                        <th class="hidden md:table-cell">"Resources"</th>
                    </tr>
                </thead>
                <tbody>
                    {profile
                        .skill_gaps
                        .into_iter()
                        .map(|gap| view! {
                            <tr>
                                <td class="font-bold">{gap.skill}</td>
                                <td><span class="badge badge-accent badge-outline">{gap.importance}</span></td>
                                <td class="hidden md:table-cell">{gap.time_to_learn}</td>
                                <td class="hidden md:table-cell text-sm">{list_or_dash(&gap.resources)}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
fn RoadmapTab(profile: DashboardProfile) -> impl IntoView {
    if profile.roadmap.is_empty() {
        return view! { <p class="text-base-content/50">"No learning roadmap yet."</p> }.into_any();
    }

    view! {
        <ul class="steps steps-vertical w-full">
            {profile
                .roadmap
                .into_iter()
                .map(|step| {
                    let class = if step.status == "completed" { "step step-primary" } else { "step" };
                    view! {
                        <li class=class>
                            <div class="text-left p-2">
                                <p class="font-bold">{step.title} " (" {step.phase} ")"</p>
                                <p class="text-sm text-base-content/60">{step.timeframe}</p>
                                <p class="text-sm">"Skills: " {list_or_dash(&step.skills)}</p>
                                <p class="text-sm">"Resources: " {list_or_dash(&step.resources)}</p>
                            </div>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (profile, set_profile) = signal(Option::<DashboardProfile>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (tab, set_tab) = signal(Tab::Overview);

    let load_dashboard = move || {
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match auth.api().me_and_history().await {
                Ok((me, history)) => {
                    let user = auth.state.get_untracked().user;
                    set_profile.set(Some(DashboardProfile::combine(me, history, user.as_ref())));
                    set_loading.set(false);
                }
                Err(e) if e.is_unauthorized() => {
                    log::warn!("[Dashboard] Session rejected while loading");
                    auth.session_expired();
                    router.auth_required();
                }
                Err(e) => {
                    log::error!("[Dashboard] Loading failed: {}", e);
                    set_error_msg.set(Some(e.user_message()));
                    set_loading.set(false);
                }
            }
        });
    };

    // 初始加载
    load_dashboard();

    let tab_buttons = Tab::ALL
        .into_iter()
        .map(|t| {
            let class = move || if tab.get() == t { "tab tab-active" } else { "tab" };
            view! {
                <a role="tab" class=class on:click=move |_| set_tab.set(t)>
                    {t.label()}
                </a>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                    <div>
                        <h1 class="text-3xl font-bold">
                            "Welcome back, "
                            {move || profile.with(|p| p.as_ref().map(|p| p.name.clone()).unwrap_or_default())}
                        </h1>
                        <p class="text-base-content/70">
                            {move || profile.with(|p| p.as_ref().map(|p| p.current_role.clone()).unwrap_or_default())}
                        </p>
                        <p class="text-sm text-base-content/50">
                            "Target roles: "
                            {move || profile.with(|p| p.as_ref().map(|p| list_or_dash(&p.target_roles)).unwrap_or_default())}
                        </p>
                    </div>
                    <div class="flex gap-2">
                        <button class="btn btn-primary" on:click=move |_| router.navigate(View::Upload)>
                            "Upload new resume"
                        </button>
                        <button class="btn btn-ghost" disabled=move || loading.get() on:click=move |_| load_dashboard()>
                            "Refresh"
                        </button>
                    </div>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                        <button class="btn btn-sm" on:click=move |_| load_dashboard()>"Retry"</button>
                    </div>
                </Show>

                <div role="tablist" class="tabs tabs-boxed">{tab_buttons}</div>

                {move || {
                    if loading.get() {
                        return view! {
                            <div class="flex justify-center py-16">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any();
                    }
                    let Some(current) = profile.get() else {
                        return ().into_any();
                    };
                    match tab.get() {
                        Tab::Overview => view! { <Overview profile=current /> }.into_any(),
                        Tab::Skills => view! { <SkillsTab profile=current /> }.into_any(),
                        Tab::Gaps => view! { <GapsTab profile=current /> }.into_any(),
                        Tab::Roadmap => view! { <RoadmapTab profile=current /> }.into_any(),
                    }
                }}
            </div>
        </div>
    }
}
