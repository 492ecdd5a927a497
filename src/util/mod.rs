use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// Blocking browser alert. Failures (e.g. dialogs suppressed) are ignored.
pub(crate) fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

/// Blocking OK/Cancel dialog; a suppressed dialog counts as "Cancel".
pub(crate) fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

/// `None` when the user dismissed the prompt.
pub(crate) fn prompt(message: &str, default: &str) -> Option<String> {
    window()
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

pub(crate) async fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    let promise = window().navigator().clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise).await.map(|_| ())
}

/// Full page navigation (used for backend-generated downloads).
pub(crate) fn navigate_to(href: &str) {
    let _ = window().location().set_href(href);
}
