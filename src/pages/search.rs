use crate::components::ui::{
    Alert, AlertDescription, Card, CardContent, CardDescription, CardHeader, CardTitle, Input,
    Spinner,
};
use crate::search::{flatten_collection, search_records, SearchRecord};
use crate::state::{AppContext, LoadStatus};
use crate::util::{alert, copy_to_clipboard};
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use std::time::Duration;

use super::AppHeader;

const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

#[component]
pub fn SearchPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let api_client = app_state.0.api_client;

    let query: RwSignal<String> = RwSignal::new(String::new());

    // Load once on mount; searching runs against the mirror afterwards.
    Effect::new(move |_| {
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = store.reload(&api_client).await {
                error!("Erro ao carregar frases ({:?}): {e}", e.kind);
            }
        });
    });

    let records = Memo::new(move |_| flatten_collection(&store.get_collection()));

    // No debounce: the mirror is small and filtering is a linear scan.
    let results = move || {
        let term = query.get();
        records.with(|rs| {
            search_records(rs, &term).map(|hits| hits.into_iter().cloned().collect::<Vec<_>>())
        })
    };

    view! {
        <div class="min-h-screen bg-background">
            <AppHeader />
            <div class="mx-auto w-full max-w-[880px] space-y-4 px-4 py-6">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-xl">"Buscar frases"</CardTitle>
                        <CardDescription>
                            "Procure por alias, segmento, estrutura ou trecho do texto. Clique em um resultado para copiar."
                        </CardDescription>
                    </CardHeader>
                    <CardContent>
                        <Input
                            id="search-input"
                            placeholder="Ex.: _omb1a, manguito, preservado..."
                            bind_value=query
                            autofocus=true
                        />
                    </CardContent>
                </Card>

                <div class="space-y-2">
                    {move || match store.status() {
                        LoadStatus::Idle | LoadStatus::Loading => view! {
                            <p class="flex items-center justify-center gap-2 text-center text-sm text-muted-foreground">
                                <Spinner />
                                "Carregando frases..."
                            </p>
                        }
                        .into_any(),
                        LoadStatus::Failed(reason) => view! {
                            <Alert class="border-destructive/30" attr:title=reason>
                                <AlertDescription class="text-center text-destructive">
                                    "Erro ao carregar frases. Verifique a conexão."
                                </AlertDescription>
                            </Alert>
                        }
                        .into_any(),
                        LoadStatus::Ready => match results() {
                            None => view! {
                                <p class="text-center text-sm text-muted-foreground">
                                    "Digite algo acima para buscar."
                                </p>
                            }
                            .into_any(),
                            Some(hits) if hits.is_empty() => view! {
                                <div class="rounded-md border border-border bg-muted p-4 text-center text-sm text-muted-foreground">
                                    "Nenhuma frase encontrada."
                                </div>
                            }
                            .into_any(),
                            Some(hits) => hits
                                .into_iter()
                                .map(|record| view! { <SearchResultCard record=record /> })
                                .collect_view()
                                .into_any(),
                        },
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn SearchResultCard(record: SearchRecord) -> impl IntoView {
    let copied: RwSignal<bool> = RwSignal::new(false);
    let text = StoredValue::new(record.text.clone());

    let on_click = move |_: web_sys::MouseEvent| {
        let text = text.get_value();
        spawn_local(async move {
            match copy_to_clipboard(&text).await {
                Ok(()) => {
                    copied.set(true);
                    set_timeout(
                        move || {
                            // The card may be gone by now (query changed).
                            let _ = copied.try_set(false);
                        },
                        COPY_FEEDBACK,
                    );
                }
                Err(e) => {
                    error!("Erro ao copiar: {e:?}");
                    alert("Não foi possível copiar automaticamente.");
                }
            }
        });
    };

    view! {
        <div
            class=move || {
                if copied.get() {
                    "cursor-pointer rounded-md border border-success bg-success/10 px-4 py-3 transition-colors"
                } else {
                    "cursor-pointer rounded-md border border-border bg-background px-4 py-3 transition-colors hover:bg-surface-hover"
                }
            }
            on:click=on_click
        >
            <div class="flex items-baseline justify-between gap-3">
                <span class="font-mono text-sm font-semibold text-primary">{record.alias}</span>
                <span class="truncate text-xs text-muted-foreground">
                    {format!("{} \u{2022} {}", record.segment_name, record.structure_name)}
                </span>
            </div>
            <div class="mt-1 whitespace-pre-wrap text-sm">{record.text}</div>
            <div class=move || {
                if copied.get() {
                    "mt-2 text-right text-xs text-success"
                } else {
                    "mt-2 text-right text-xs text-muted-foreground opacity-60"
                }
            }>
                {move || if copied.get() { "Copiado!" } else { "Clique para copiar" }}
            </div>
        </div>
    }
}
