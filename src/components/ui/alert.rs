use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
    // Transient confirmation shown after a phrase is created.
    clx! {AlertSuccess, div, "w-full rounded-lg border border-success/30 bg-success/10 px-4 py-3 text-sm text-success"}
}

pub use components::*;
