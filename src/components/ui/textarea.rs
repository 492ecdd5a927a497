use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

use super::input::FIELD_CLASS;

/// Multi-line counterpart of `Input`, same manual two-way binding.
#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,
    #[prop(default = 4)] rows: u32,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(FIELD_CLASS, "min-h-20 py-2", class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(area) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
                bind_value.set(area.value());
            }
        }
    };

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            required=required
            rows=rows.to_string()
            prop:value=move || bind_value.get()
            on:input=on_input
        />
    }
}
