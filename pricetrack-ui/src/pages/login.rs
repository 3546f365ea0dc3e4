//! Login Page
//!
//! Email/password form. The same form creates an account in register mode.

use leptos::*;
use leptos_router::*;

use crate::state::actions;
use crate::state::global::GlobalState;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (mode, set_mode) = create_signal(Mode::Login);
    let (registering, set_registering) = create_signal(false);

    // Leave for the dashboard as soon as a login succeeds
    create_effect(move |_| {
        let done = state
            .auth
            .with(|a| a.status == crate::state::Status::Succeeded && a.is_authenticated());
        if done {
            navigate("/dashboard", Default::default());
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let e = email.get();
        let p = password.get();

        match mode.get() {
            Mode::Login => spawn_local(actions::login(state, e, p)),
            Mode::Register => {
                set_registering.set(true);
                spawn_local(async move {
                    if actions::register(state, e, p).await {
                        set_password.set(String::new());
                        set_mode.set(Mode::Login);
                    }
                    set_registering.set(false);
                });
            }
        }
    };

    let busy = move || registering.get() || state.auth.with(|a| a.status.is_loading());

    view! {
        <div class="max-w-md mx-auto mt-12 bg-white rounded-xl shadow p-8">
            <h1 class="text-2xl font-bold text-gray-900 mb-6">
                {move || if mode.get() == Mode::Login { "Log in to PriceTrack" } else { "Create your account" }}
            </h1>

            {move || {
                state.auth.with(|a| a.status.error().map(str::to_string)).map(|message| view! {
                    <div class="mb-4 bg-red-50 border border-red-200 text-red-700 rounded-lg px-4 py-3 text-sm">
                        {message}
                    </div>
                })
            }}

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm text-gray-600 mb-1">"Email"</label>
                    <input
                        type="email"
                        required=true
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        class="w-full border border-gray-300 rounded-lg px-4 py-2 focus:border-indigo-500 focus:outline-none"
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-600 mb-1">"Password"</label>
                    <input
                        type="password"
                        required=true
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full border border-gray-300 rounded-lg px-4 py-2 focus:border-indigo-500 focus:outline-none"
                    />
                </div>
                <button
                    type="submit"
                    disabled=busy
                    class="w-full py-3 bg-indigo-600 hover:bg-indigo-700 disabled:bg-indigo-300 text-white rounded-lg font-medium"
                >
                    {move || match (mode.get(), busy()) {
                        (_, true) => "Please wait...",
                        (Mode::Login, false) => "Log In",
                        (Mode::Register, false) => "Register",
                    }}
                </button>
            </form>

            <p class="mt-6 text-sm text-center text-gray-600">
                {move || if mode.get() == Mode::Login { "No account yet? " } else { "Already registered? " }}
                <button
                    on:click=move |_| {
                        set_mode.update(|m| {
                            *m = if *m == Mode::Login { Mode::Register } else { Mode::Login }
                        })
                    }
                    class="text-indigo-600 hover:underline"
                >
                    {move || if mode.get() == Mode::Login { "Create one" } else { "Log in" }}
                </button>
            </p>
        </div>
    }
}
