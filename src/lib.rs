mod actions;
mod api;
mod app;
mod catalog;
mod components;
mod forms;
mod models;
mod pages;
mod search;
mod state;
mod util;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::actions::{resolve_click, RowAction};
    use crate::api::{ApiClient, EnvConfig};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_env_config_defaults_to_page_origin() {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        assert_eq!(EnvConfig::new().api_url, origin);
        assert_eq!(
            ApiClient::from_env().phrase_url(Some("#abc1a")),
            format!("{origin}/api/frases/%23abc1a")
        );
    }

    #[wasm_bindgen_test]
    fn test_click_inside_button_resolves_row_action() {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("document should exist");
        let container = document.create_element("div").expect("create div");
        container.set_inner_html(
            r#"<div data-alias="|omb1a">
                 <div data-role="phrase-text">texto</div>
                 <button data-action="delete"><span id="icon">x</span></button>
               </div>"#,
        );
        document
            .body()
            .expect("body should exist")
            .append_child(&container)
            .expect("append container");

        let icon = document.get_element_by_id("icon").expect("icon should exist");
        let captured = std::rc::Rc::new(std::cell::RefCell::new(None));
        let sink = captured.clone();
        let listener = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
            move |ev: web_sys::MouseEvent| {
                *sink.borrow_mut() = resolve_click(&ev)
                    .map(|(action, target)| (action, target.key.clone(), target.text_element().and_then(|el| el.text_content())));
            },
        );
        container
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .expect("listen");

        icon.dyn_ref::<web_sys::HtmlElement>()
            .expect("icon is an html element")
            .click();

        assert_eq!(
            captured.borrow().clone(),
            Some((RowAction::Delete, "|omb1a".to_string(), Some("texto".to_string())))
        );

        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_click_outside_actions_resolves_nothing() {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("document should exist");
        let container = document.create_element("div").expect("create div");
        container.set_inner_html(r#"<div data-alias="_abc1a"><span id="plain">texto</span></div>"#);
        document
            .body()
            .expect("body should exist")
            .append_child(&container)
            .expect("append container");

        let captured = std::rc::Rc::new(std::cell::RefCell::new(Some(RowAction::Edit)));
        let sink = captured.clone();
        let listener = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
            move |ev: web_sys::MouseEvent| {
                *sink.borrow_mut() = resolve_click(&ev).map(|(action, _)| action);
            },
        );
        container
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .expect("listen");

        document
            .get_element_by_id("plain")
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            .expect("plain span")
            .click();

        assert!(captured.borrow().is_none());
        container.remove();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
