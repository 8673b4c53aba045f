//! 静态页面：首页、功能、关于、联系方式

use leptos::prelude::*;

use crate::web::route::View;
use crate::web::router::use_router;

const FEATURES: [(&str, &str); 6] = [
    (
        "Resume Analysis",
        "Upload your resume and get an instant breakdown of your skills and experience.",
    ),
    (
        "LinkedIn Import",
        "Paste your LinkedIn profile URL to build your profile in seconds.",
    ),
    (
        "Skill Gap Insights",
        "See which skills stand between you and your target roles.",
    ),
    (
        "Learning Roadmap",
        "Follow a step-by-step plan with curated resources for each phase.",
    ),
    (
        "Career Matches",
        "Discover roles that fit your background and how close you are to each.",
    ),
    (
        "AI Career Assistant",
        "Ask questions about interviews, salaries and career moves, with answers tailored to you.",
    ),
];

#[component]
fn FeatureGrid() -> impl IntoView {
    view! {
        <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">
            {FEATURES
                .into_iter()
                .map(|(title, description)| view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">{title}</h3>
                            <p class="text-base-content/70">{description}</p>
                        </div>
                    </div>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-2xl">
                    <h1 class="text-5xl font-bold">"Navigate your career with confidence"</h1>
                    <p class="py-6 text-base-content/70">
                        "SkillSync analyzes your resume, maps your skills against the roles you want "
                        "and builds a personal learning roadmap to get you there."
                    </p>
                    <div class="flex justify-center gap-4">
                        <button class="btn btn-primary" on:click=move |_| router.get_started()>
                            "Get started"
                        </button>
                        <button class="btn btn-outline" on:click=move |_| router.navigate(View::Features)>
                            "Learn more"
                        </button>
                    </div>
                </div>
            </div>
        </div>
        <div class="max-w-7xl mx-auto p-4 md:p-8">
            <FeatureGrid />
        </div>
    }
}

#[component]
pub fn FeaturesPage() -> impl IntoView {
    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
            <div class="text-center">
                <h1 class="text-4xl font-bold">"Features"</h1>
                <p class="text-base-content/70 mt-2">
                    "Everything you need to plan your next career move."
                </p>
            </div>
            <FeatureGrid />
        </div>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8 space-y-4">
            <h1 class="text-4xl font-bold">"About SkillSync"</h1>
            <p class="text-base-content/70">
                "SkillSync helps professionals understand where they stand and where they can go. "
                "We combine resume analysis with market data to highlight your strengths, "
                "uncover skill gaps and suggest concrete next steps."
            </p>
            <p class="text-base-content/70">
                "Your data stays yours. Analyses are only visible to your account."
            </p>
        </div>
    }
}

#[component]
pub fn ContactPage() -> impl IntoView {
    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8 space-y-4">
            <h1 class="text-4xl font-bold">"Contact"</h1>
            <p class="text-base-content/70">"Questions or feedback? We'd love to hear from you."</p>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <p>"Email: " <a class="link link-primary" href="mailto:support@skillsync.app">"support@skillsync.app"</a></p>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let router = use_router();

    view! {
        <footer class="footer footer-center p-6 bg-base-300 text-base-content">
            <nav class="grid grid-flow-col gap-4">
                <a class="link link-hover" on:click=move |_| router.navigate(View::About)>"About"</a>
                <a class="link link-hover" on:click=move |_| router.navigate(View::Features)>"Features"</a>
                <a class="link link-hover" on:click=move |_| router.navigate(View::Contact)>"Contact"</a>
            </nav>
            <aside>
                <p>"SkillSync"</p>
            </aside>
        </footer>
    }
}
