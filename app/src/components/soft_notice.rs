use dioxus::prelude::*;

/// Shown instead of an error when an upstream service is down or not set up.
#[component]
pub fn SoftNotice(feature: &'static str, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "card text-center py-12",
            p { class: "text-gray-300 mb-2", "{feature} is still being finished." }
            p { class: "text-gray-500 text-sm mb-6", "The data service is not reachable right now." }
            button {
                class: "btn btn-secondary",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}

#[component]
pub fn Spinner(label: &'static str) -> Element {
    rsx! {
        div { class: "text-center py-12",
            div { class: "animate-spin w-8 h-8 border-2 border-market-400 border-t-transparent rounded-full mx-auto mb-4" }
            p { class: "text-gray-500", "{label}" }
        }
    }
}
