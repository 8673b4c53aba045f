use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::chat::QUICK_QUESTIONS;
use skillsync_shared::{ChatContext, ConnectionStatus, Conversation, Sender};

use crate::api::ApiError;
use crate::auth::use_auth;
use crate::web::router::use_router;

const OFFLINE_REPLY: &str =
    "I can't reach the server right now. Please check your internet connection and try again.";
const SERVER_REPLY: &str =
    "The AI service is temporarily unavailable. Please try again in a few moments.";
const EXPIRED_REPLY: &str = "Your session has expired. Please sign in again to continue.";
const GENERIC_REPLY: &str = "Sorry, I couldn't process your request. Please try again.";

/// 把请求失败转成对话中的回复文本
fn reply_for(err: &ApiError) -> String {
    match err {
        ApiError::Timeout { message } => message.clone(),
        ApiError::Network(_) => OFFLINE_REPLY.to_string(),
        ApiError::Unauthorized { .. } => EXPIRED_REPLY.to_string(),
        ApiError::Status { status, .. } if *status >= 500 => SERVER_REPLY.to_string(),
        _ => err
            .server_message()
            .unwrap_or_else(|| GENERIC_REPLY.to_string()),
    }
}

fn status_badge(status: ConnectionStatus) -> (&'static str, &'static str) {
    match status {
        ConnectionStatus::Connected => ("badge badge-success", "Connected"),
        ConnectionStatus::Connecting => ("badge badge-warning", "Connecting..."),
        ConnectionStatus::Error => ("badge badge-error", "Connection error"),
    }
}

#[component]
pub fn AssistantPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (conversation, set_conversation) = signal(Conversation::new());
    let (context, set_context) = signal(Option::<ChatContext>::None);
    let (status, set_status) = signal(ConnectionStatus::Connecting);
    let (draft, set_draft) = signal(String::new());

    let expire = move || {
        auth.session_expired();
        router.auth_required();
    };

    let load_context = move || {
        set_status.set(ConnectionStatus::Connecting);
        spawn_local(async move {
            match auth.api().me_and_history().await {
                Ok((me, history)) => {
                    set_context.set(Some(ChatContext::from_parts(me, history)));
                    set_status.set(ConnectionStatus::Connected);
                }
                Err(e) => {
                    log::warn!("[Assistant] Loading chat context failed: {}", e);
                    set_status.set(ConnectionStatus::Error);
                    if e.is_unauthorized() {
                        expire();
                    }
                }
            }
        });
    };

    load_context();

    let send = move |text: String| {
        let mut question = None;
        set_conversation.update(|c| question = c.ask(&text));
        let Some(question) = question else {
            return;
        };
        set_draft.set(String::new());

        spawn_local(async move {
            let result = auth.api().chat(&question, context.get_untracked()).await;
            let reply = match &result {
                Ok(response) => response.clone(),
                Err(e) => {
                    log::warn!("[Assistant] Chat request failed: {}", e);
                    reply_for(e)
                }
            };
            set_conversation.update(|c| c.answer(reply));
            if matches!(result, Err(ref e) if e.is_unauthorized()) {
                expire();
            }
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        send(draft.get());
    };

    let is_waiting = move || conversation.with(Conversation::is_waiting);

    let quick_questions = QUICK_QUESTIONS
        .into_iter()
        .map(|(category, question)| {
            view! {
                <button
                    class="btn btn-outline btn-sm h-auto py-2 flex-col items-start text-left"
                    disabled=is_waiting
                    on:click=move |_| send(question.to_string())
                >
                    <span class="font-bold">{category}</span>
                    <span class="font-normal text-xs">{question}</span>
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"AI Career Assistant"</h1>
                <div class="flex items-center gap-2">
                    {move || {
                        let (class, label) = status_badge(status.get());
                        view! { <span class=class>{label}</span> }
                    }}
                    <Show when=move || status.get() == ConnectionStatus::Error>
                        <button class="btn btn-ghost btn-sm" on:click=move |_| load_context()>
                            "Retry"
                        </button>
                    </Show>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| set_conversation.update(Conversation::clear)>
                        "Clear chat"
                    </button>
                </div>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-2">{quick_questions}</div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body h-[28rem] overflow-y-auto">
                    <For
                        each=move || conversation.get().messages().to_vec()
                        key=|m| m.id
                        children=move |message| {
                            let (align, bubble) = match message.sender {
                                Sender::User => ("chat chat-end", "chat-bubble chat-bubble-primary"),
                                Sender::Ai => ("chat chat-start", "chat-bubble"),
                            };
                            let typing = message.is_typing;
                            view! {
                                <div class=align>
                                    <div class="chat-header text-xs opacity-50">
                                        {message.timestamp.format("%H:%M").to_string()}
                                    </div>
                                    <div class=bubble>
                                        <Show when=move || typing>
                                            <span class="loading loading-dots loading-sm"></span>
                                        </Show>
                                        <span class="whitespace-pre-line">{message.text}</span>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            <form class="flex gap-2" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Ask me anything about your career..."
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    prop:value=draft
                    class="input input-bordered flex-1"
                />
                <button class="btn btn-primary" disabled=move || is_waiting() || draft.with(|d| d.trim().is_empty())>
                    "Send"
                </button>
            </form>
        </div>
    }
}
