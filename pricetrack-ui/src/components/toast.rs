//! Notices
//!
//! Transient banners for tracking changes (product added, removed, account
//! created) and for failures that have no inline place on the page.

use leptos::*;

use crate::state::global::GlobalState;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Notice {
    Done,
    Problem,
}

impl Notice {
    fn classes(self) -> &'static str {
        match self {
            Notice::Done => "border-green-500 bg-green-50 text-green-800",
            Notice::Problem => "border-red-500 bg-red-50 text-red-800",
        }
    }

    /// Screen readers announce problems immediately
    fn role(self) -> &'static str {
        match self {
            Notice::Done => "status",
            Notice::Problem => "alert",
        }
    }
}

/// Success and error banners, stacked top right; each can be dismissed early
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed top-20 right-4 z-50 w-80 space-y-2">
            {move || state.error.get().map(|message| view! {
                <Banner message=message notice=Notice::Problem signal=state.error />
            })}
            {move || state.success.get().map(|message| view! {
                <Banner message=message notice=Notice::Done signal=state.success />
            })}
        </div>
    }
}

#[component]
fn Banner(message: String, notice: Notice, signal: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <div
            role=notice.role()
            class=format!("flex items-start justify-between border-l-4 px-4 py-3 rounded shadow {}", notice.classes())
        >
            <p class="text-sm">{message}</p>
            <button
                class="ml-3 text-lg leading-none opacity-60 hover:opacity-100"
                aria-label="Dismiss"
                on:click=move |_| signal.set(None)
            >
                "×"
            </button>
        </div>
    }
}
