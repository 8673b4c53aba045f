use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::analysis::{is_linkedin_url, is_supported_resume_type};

use crate::api::ApiError;
use crate::auth::use_auth;
use crate::web::read_file;
use crate::web::router::use_router;

const UNSUPPORTED_FILE: &str = "Please upload a PDF or Word document.";
const INVALID_LINKEDIN: &str = "Please enter a valid LinkedIn profile URL.";
const NO_FILE: &str = "Please choose a file first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Resume,
    LinkedIn,
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Processing,
    Success,
    Error(String),
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (source, set_source) = signal(Source::Resume);
    let (status, set_status) = signal(Status::Idle);
    let (file_label, set_file_label) = signal(Option::<String>::None);
    let (linkedin_url, set_linkedin_url) = signal(String::new());
    let file_input = NodeRef::<leptos::html::Input>::new();

    let finish = move |result: Result<(), ApiError>| match result {
        Ok(()) => {
            set_status.set(Status::Success);
            router.upload_succeeded();
        }
        Err(e) => {
            log::warn!("[Upload] Analysis failed: {}", e);
            set_status.set(Status::Error(e.user_message()));
            if e.is_unauthorized() {
                auth.session_expired();
                router.auth_required();
            }
        }
    };

    let selected_file = move || {
        file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
    };

    let on_file_change = move |_: leptos::ev::Event| match selected_file() {
        Some(file) if !is_supported_resume_type(&file.type_()) => {
            set_file_label.set(None);
            set_status.set(Status::Error(UNSUPPORTED_FILE.to_string()));
        }
        Some(file) => {
            set_file_label.set(Some(file.name()));
            set_status.set(Status::Idle);
        }
        None => set_file_label.set(None),
    };

    let submit_resume = move |_: leptos::ev::MouseEvent| {
        let Some(file) = selected_file() else {
            set_status.set(Status::Error(NO_FILE.to_string()));
            return;
        };
        if !is_supported_resume_type(&file.type_()) {
            set_status.set(Status::Error(UNSUPPORTED_FILE.to_string()));
            return;
        }

        set_status.set(Status::Processing);
        spawn_local(async move {
            let part = match read_file(&file).await {
                Ok(part) => part,
                Err(e) => {
                    log::error!("[Upload] Reading file failed: {}", e);
                    set_status.set(Status::Error(e.to_string()));
                    return;
                }
            };
            let result = auth
                .api()
                .upload_resume(&part.file_name, &part.content_type, part.bytes)
                .await
                .map(|_| ());
            finish(result);
        });
    };

    let submit_linkedin = move |_: leptos::ev::MouseEvent| {
        let url = linkedin_url.get();
        if !is_linkedin_url(&url) {
            set_status.set(Status::Error(INVALID_LINKEDIN.to_string()));
            return;
        }

        set_status.set(Status::Processing);
        spawn_local(async move {
            let result = auth.api().analyze_linkedin(&url).await.map(|_| ());
            finish(result);
        });
    };

    let is_processing = move || status.get() == Status::Processing;
    let tab_class = move |tab: Source| {
        if source.get() == tab {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8 space-y-6">
            <div class="text-center">
                <h1 class="text-4xl font-bold">"Analyze your profile"</h1>
                <p class="text-base-content/70 mt-2">
                    "Upload your resume or import your LinkedIn profile to get started."
                </p>
            </div>

            <div role="tablist" class="tabs tabs-boxed justify-center">
                <a role="tab" class=move || tab_class(Source::Resume)
                    on:click=move |_| { set_source.set(Source::Resume); set_status.set(Status::Idle); }>
                    "Resume"
                </a>
                <a role="tab" class=move || tab_class(Source::LinkedIn)
                    on:click=move |_| { set_source.set(Source::LinkedIn); set_status.set(Status::Idle); }>
                    "LinkedIn"
                </a>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body space-y-4">
                    <Show
                        when=move || source.get() == Source::Resume
                        fallback=move || view! {
                            <div class="form-control">
                                <label class="label" for="linkedin_url">
                                    <span class="label-text">"LinkedIn profile URL"</span>
                                </label>
                                <input
                                    id="linkedin_url"
                                    type="url"
                                    placeholder="https://www.linkedin.com/in/your-name"
                                    on:input=move |ev| set_linkedin_url.set(event_target_value(&ev))
                                    prop:value=linkedin_url
                                    class="input input-bordered w-full"
                                />
                            </div>
                            <button class="btn btn-primary" disabled=is_processing on:click=submit_linkedin>
                                "Analyze LinkedIn profile"
                            </button>
                        }
                    >
                        <div class="form-control">
                            <label class="label" for="resume_file">
                                <span class="label-text">"Resume (PDF or Word)"</span>
                            </label>
                            <input
                                id="resume_file"
                                type="file"
                                accept=".pdf,.doc,.docx"
                                node_ref=file_input
                                on:change=on_file_change
                                class="file-input file-input-bordered w-full"
                            />
                            <label class="label">
                                <span class="label-text-alt">
                                    {move || file_label.get().unwrap_or_else(|| "No file selected".to_string())}
                                </span>
                            </label>
                        </div>
                        <button class="btn btn-primary" disabled=is_processing on:click=submit_resume>
                            "Upload and analyze"
                        </button>
                    </Show>

                    {move || match status.get() {
                        Status::Idle => ().into_any(),
                        Status::Processing => view! {
                            <div class="alert">
                                <span class="loading loading-spinner"></span>
                                <span>"Analyzing your profile. This can take a moment..."</span>
                            </div>
                        }
                        .into_any(),
                        Status::Success => view! {
                            <div role="alert" class="alert alert-success">
                                <span>"Analysis complete!"</span>
                            </div>
                        }
                        .into_any(),
                        Status::Error(message) => view! {
                            <div role="alert" class="alert alert-error">
                                <span>{message}</span>
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
