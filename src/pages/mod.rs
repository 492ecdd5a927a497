mod manage;
mod search;

pub use manage::ManagePage;
pub use search::SearchPage;

use leptos::prelude::*;
use leptos_router::hooks::use_location;

const NAV_LINKS: [(&str, &str); 2] = [("/", "Gerenciar acervo"), ("/busca", "Buscar frases")];

#[component]
pub fn AppHeader() -> impl IntoView {
    let pathname = use_location().pathname;

    view! {
        <header class="border-b border-border bg-background">
            <div class="mx-auto flex w-full max-w-[1200px] items-center justify-between px-4 py-3">
                <div class="space-y-0.5">
                    <a href="/" class="text-sm font-semibold text-foreground">"Acervo de Frases"</a>
                    <div class="text-xs text-muted-foreground">"Frases de laudo por segmento e estrutura"</div>
                </div>
                <nav class="flex items-center gap-1">
                    {NAV_LINKS
                        .into_iter()
                        .map(|(href, label)| {
                            view! {
                                <a
                                    href=href
                                    class=move || {
                                        if pathname.get() == href {
                                            "rounded-md bg-accent px-3 py-1.5 text-sm font-medium text-accent-foreground"
                                        } else {
                                            "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent hover:text-accent-foreground"
                                        }
                                    }
                                >
                                    {label}
                                </a>
                            }
                        })
                        .collect_view()}
                </nav>
            </div>
        </header>
    }
}
