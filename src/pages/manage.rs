use crate::actions::{resolve_click, ActionTable, ActionTarget, Followup, RowAction};
use crate::catalog::{build_catalog_tree, segment_counts_line, CatalogTree, PhraseRow, SegmentNode};
use crate::components::ui::{
    Alert, AlertDescription, AlertSuccess, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner, Textarea,
};
use crate::forms::{rename_request, NewPhraseDraft};
use crate::models::{alias_letter, PhraseKind};
use crate::state::{AppContext, LoadStatus};
use crate::util::{alert, confirm, navigate_to, prompt};
use icons::{Check, ChevronDown, ChevronRight, X};
use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use std::collections::HashSet;
use std::time::Duration;

use super::AppHeader;

const SUCCESS_NOTICE: Duration = Duration::from_millis(4000);

const SELECT_CLASS: &str = "border-input h-9 w-full rounded-md border bg-transparent px-3 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50";

#[component]
pub fn ManagePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let api_client = app_state.0.api_client;

    let reload = Callback::new(move |_: ()| {
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = store.reload(&api_client).await {
                error!("Falha ao carregar o acervo ({:?}): {e}", e.kind);
            }
        });
    });

    Effect::new(move |_| reload.run(()));

    let tree = Memo::new(move |_| store.with_collection(build_catalog_tree));

    let on_export = move |_| {
        navigate_to(&api_client.get_untracked().export_txt_url());
    };

    view! {
        <div class="min-h-screen bg-background">
            <AppHeader />
            <div class="mx-auto grid w-full max-w-[1200px] gap-6 px-4 py-6 lg:grid-cols-[380px_1fr]">
                <div class="space-y-4">
                    <NewPhraseForm />

                    <Card>
                        <CardHeader>
                            <CardTitle>"Exportar"</CardTitle>
                            <CardDescription>"Baixa todo o acervo em um arquivo de texto."</CardDescription>
                        </CardHeader>
                        <CardContent>
                            <Button variant=ButtonVariant::Outline on:click=on_export>
                                "Exportar .txt"
                            </Button>
                        </CardContent>
                    </Card>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle>"Acervo"</CardTitle>
                        <CardDescription>
                            <PhraseCounts tree=tree />
                        </CardDescription>
                    </CardHeader>
                    <CardContent>
                        <CatalogTreeView tree=tree reload=reload />
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
fn PhraseCounts(tree: Memo<CatalogTree>) -> impl IntoView {
    view! {
        <span class="block">
            <strong>"Total de Frases: "</strong>
            {move || tree.with(|t| t.total)}
        </span>
        <span class="block text-xs">{move || tree.with(segment_counts_line)}</span>
    }
}

#[component]
fn NewPhraseForm() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let api_client = app_state.0.api_client;

    let kind: RwSignal<PhraseKind> = RwSignal::new(PhraseKind::default());
    let segment: RwSignal<String> = RwSignal::new(String::new());
    let structure: RwSignal<String> = RwSignal::new(String::new());
    let text: RwSignal<String> = RwSignal::new(String::new());
    let letter: RwSignal<String> = RwSignal::new(String::new());

    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting: RwSignal<bool> = RwSignal::new(false);

    let set_kind = move |k: PhraseKind| {
        kind.set(k);
        if !k.needs_manual_letter() {
            letter.set(String::new());
        }
    };

    let segment_options = move || {
        store.with_collection(|c| {
            c.iter()
                .map(|(id, seg)| (id.clone(), format!("{} ({})", seg.name, id)))
                .collect::<Vec<_>>()
        })
    };

    let structure_options = move || {
        let seg_id = segment.get();
        store.with_collection(|c| {
            c.get(&seg_id)
                .map(|seg| {
                    seg.ordered_structures()
                        .into_iter()
                        .map(|(id, st)| (id.clone(), format!("{} ({})", st.name, id)))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if submitting.get_untracked() {
            return;
        }

        let draft = NewPhraseDraft {
            kind: kind.get_untracked(),
            segment_id: segment.get_untracked(),
            structure_id: structure.get_untracked(),
            text: text.get_untracked(),
            manual_letter: letter.get_untracked(),
        };

        let Some(request) = store.with_collection_untracked(|c| draft.submit_plan(c, confirm)) else {
            return;
        };

        let api_client = api_client.get_untracked();
        submitting.set(true);

        spawn_local(async move {
            match api_client.create_phrase(&request).await {
                Ok(created) => {
                    notice.set(Some(format!(
                        "Frase adicionada com sucesso! Alias gerado: {}",
                        created.alias
                    )));
                    set_timeout(
                        move || {
                            let _ = notice.try_set(None);
                        },
                        SUCCESS_NOTICE,
                    );

                    // Reset to a blank body-phrase form.
                    let next = draft.next_form();
                    set_kind(next.kind);
                    text.set(next.text);
                    segment.set(String::new());
                    structure.set(String::new());

                    if let Err(e) = store.reload(&api_client).await {
                        error!("Falha ao recarregar o acervo: {e}");
                    }

                    // Keep the user on the same segment/structure for the next phrase.
                    segment.set(next.segment_id);
                    structure.set(next.structure_id);
                }
                Err(e) => {
                    error!("Falha ao enviar formulário: {e}");
                    alert("Não foi possível adicionar a frase. Verifique o console para mais detalhes.");
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"Adicionar frase"</CardTitle>
                <CardDescription>"O alias é gerado pelo servidor."</CardDescription>
            </CardHeader>
            <CardContent>
                <form id="form-adicionar-frase" class="flex flex-col gap-4" on:submit=on_submit>
                    <fieldset class="flex flex-col gap-2">
                        <Label>"Tipo"</Label>
                        <div class="flex gap-4 text-sm">
                            {[PhraseKind::Body, PhraseKind::Conclusion]
                                .into_iter()
                                .map(|k| {
                                    view! {
                                        <label class="inline-flex items-center gap-2">
                                            <input
                                                type="radio"
                                                name="tipo"
                                                value=k.to_string()
                                                prop:checked=move || kind.get() == k
                                                on:change=move |_| set_kind(k)
                                            />
                                            {k.label()}
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </fieldset>

                    <div class="flex flex-col gap-2">
                        <Label html_for="select-segmento">"Segmento"</Label>
                        <select
                            id="select-segmento"
                            name="segmento"
                            class=SELECT_CLASS
                            required=true
                            on:change=move |ev| {
                                segment.set(event_target_value(&ev));
                                structure.set(String::new());
                            }
                        >
                            <option value="" disabled=true prop:selected=move || segment.get().is_empty()>
                                "Selecione um segmento..."
                            </option>
                            {move || {
                                segment_options()
                                    .into_iter()
                                    .map(|(id, label)| {
                                        let id_sel = id.clone();
                                        view! {
                                            <option value=id prop:selected=move || segment.get() == id_sel>
                                                {label}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>

                    <div class="flex flex-col gap-2">
                        <Label html_for="select-estrutura">"Estrutura"</Label>
                        <select
                            id="select-estrutura"
                            name="estrutura"
                            class=SELECT_CLASS
                            required=true
                            on:change=move |ev| structure.set(event_target_value(&ev))
                        >
                            <option value="" disabled=true prop:selected=move || structure.get().is_empty()>
                                "Selecione uma estrutura..."
                            </option>
                            {move || {
                                structure_options()
                                    .into_iter()
                                    .map(|(id, label)| {
                                        let id_sel = id.clone();
                                        view! {
                                            <option value=id prop:selected=move || structure.get() == id_sel>
                                                {label}
                                            </option>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>

                    <Show when=move || kind.get().needs_manual_letter() fallback=|| ().into_view()>
                        <div id="grupo-letra-manual" class="flex flex-col gap-2">
                            <Label html_for="input-letra-manual">"Letra da conclusão"</Label>
                            <Input
                                id="input-letra-manual"
                                name="letra_manual"
                                placeholder="a"
                                maxlength=1
                                required=true
                                bind_value=letter
                            />
                        </div>
                    </Show>

                    <div class="flex flex-col gap-2">
                        <Label html_for="texto">"Texto"</Label>
                        <Textarea id="texto" name="texto" required=true bind_value=text />
                    </div>

                    <Show when=move || notice.get().is_some() fallback=|| ().into_view()>
                        <AlertSuccess>{move || notice.get().unwrap_or_default()}</AlertSuccess>
                    </Show>

                    <Button class="w-full" attr:disabled=move || submitting.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || submitting.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if submitting.get() { "Adicionando..." } else { "Adicionar frase" }}
                        </span>
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
fn CatalogTreeView(tree: Memo<CatalogTree>, reload: Callback<()>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.store;
    let api_client = app_state.0.api_client;

    // Aliases whose text is currently contenteditable.
    let editing: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());
    let open_segments: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());

    let stop_editing = move |alias: &str| {
        editing.update(|e| {
            e.remove(alias);
        });
    };

    // Mirror upkeep once the server accepted a row mutation.
    let settle = move |action: RowAction, alias: &str, new_text: &str| {
        stop_editing(alias);
        match action.followup() {
            Followup::Nothing => {}
            Followup::PatchMirror => match store.locate(alias) {
                Some((segment_id, structure_id)) => {
                    store.patch_phrase(&segment_id, &structure_id, alias, new_text);
                }
                None => warn!("{alias} salvo, mas não está no acervo local"),
            },
            Followup::RemoveAndReload => {
                store.remove_phrase(alias);
                reload.run(());
            }
            Followup::Reload => reload.run(()),
        }
    };

    let actions = ActionTable {
        edit: Callback::new(move |target: ActionTarget| {
            editing.update(|e| {
                e.insert(target.key.clone());
            });
            // Focus once the row has re-rendered as editable.
            set_timeout(
                move || {
                    if let Some(el) = target.text_element() {
                        let _ = el.focus();
                    }
                },
                Duration::ZERO,
            );
        }),

        cancel: Callback::new(move |target: ActionTarget| {
            stop_editing(&target.key);
            if let Some(el) = target.text_element() {
                el.set_text_content(store.phrase_text(&target.key).as_deref());
            }
        }),

        save: Callback::new(move |target: ActionTarget| {
            let new_text = target
                .text_element()
                .and_then(|el| el.text_content())
                .unwrap_or_default();
            let alias = target.key;
            let api_client = api_client.get_untracked();

            spawn_local(async move {
                // Failures are logged only; the row stays editable.
                if let Err(e) = api_client.update_phrase(&alias, &new_text).await {
                    error!("Erro ao salvar {alias}: {e}");
                    return;
                }

                settle(RowAction::Save, &alias, &new_text);
            });
        }),

        delete: Callback::new(move |target: ActionTarget| {
            let alias = target.key;
            let api_client = api_client.get_untracked();

            // No confirmation and no user-facing error on this path.
            spawn_local(async move {
                match api_client.delete_phrase(&alias).await {
                    Ok(()) => settle(RowAction::Delete, &alias, ""),
                    Err(e) => error!("Erro ao deletar {alias}: {e}"),
                }
            });
        }),

        rename: Callback::new(move |target: ActionTarget| {
            let alias = target.key;
            let current = alias_letter(&alias).map(String::from).unwrap_or_default();

            let answer = prompt(
                &format!("Digite a nova letra para o alias \"{alias}\":"),
                &current,
            );

            let request = match rename_request(&alias, answer) {
                None => return,
                Some(Ok(request)) => request,
                Some(Err(e)) => {
                    warn!("Letra inválida para {alias}: {e}");
                    alert("Por favor, insira uma única letra válida.");
                    return;
                }
            };

            let api_client = api_client.get_untracked();
            spawn_local(async move {
                match api_client.rename_phrase(&request).await {
                    Ok(()) => {
                        alert("Alias renomeado com sucesso! O acervo será recarregado.");
                        settle(RowAction::Rename, &alias, "");
                    }
                    Err(e) => {
                        error!("Erro ao renomear {alias}: {e}");
                        let detail = e.user_detail("Falha ao renomear");
                        alert(&format!("Não foi possível renomear: {detail}"));
                    }
                }
            });
        }),

        toggle_segment: Callback::new(move |target: ActionTarget| {
            open_segments.update(|open| {
                if !open.remove(&target.key) {
                    open.insert(target.key);
                }
            });
        }),
    };

    let on_tree_click = move |ev: web_sys::MouseEvent| {
        if let Some((action, target)) = resolve_click(&ev) {
            actions.dispatch(action, target);
        }
    };

    view! {
        {move || match store.status() {
            LoadStatus::Failed(reason) => view! {
                <Alert class="border-destructive/30" attr:title=reason>
                    <AlertDescription class="text-destructive">
                        "Não foi possível carregar o acervo. Verifique se o servidor está rodando."
                    </AlertDescription>
                </Alert>
            }
            .into_any(),
            status => {
                let loading = matches!(status, LoadStatus::Idle | LoadStatus::Loading);
                if loading && tree.with(|t| t.segments.is_empty()) {
                    view! {
                        <div class="flex items-center gap-2 text-sm text-muted-foreground">
                            <Spinner />
                            "Carregando acervo..."
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div id="acervo-container" class="flex flex-col gap-2" on:click=on_tree_click>
                            {move || {
                                tree.get()
                                    .segments
                                    .into_iter()
                                    .map(|segment| {
                                        view! {
                                            <SegmentView
                                                segment=segment
                                                open_segments=open_segments
                                                editing=editing
                                            />
                                        }
                                    })
                                    .collect_view()
                            }}
                        </div>
                    }
                    .into_any()
                }
            }
        }}
    }
}

#[component]
fn SegmentView(
    segment: SegmentNode,
    open_segments: RwSignal<HashSet<String>>,
    editing: RwSignal<HashSet<String>>,
) -> impl IntoView {
    let seg_id = segment.id.clone();
    let is_open = Memo::new(move |_| open_segments.with(|open| open.contains(&seg_id)));

    view! {
        <div class="rounded-md border border-border">
            <button
                type="button"
                class="flex w-full items-center justify-between px-3 py-2 text-left text-sm font-medium hover:bg-surface-hover"
                data-action=RowAction::ToggleSegment.attr()
                data-segment=segment.id.clone()
            >
                <span>{format!("{} ({})", segment.name, segment.id)}</span>
                <span class="inline-flex items-center gap-2 text-xs text-muted-foreground">
                    {segment.count}
                    {move || if is_open.get() {
                        view! { <ChevronDown class="size-4" /> }.into_any()
                    } else {
                        view! { <ChevronRight class="size-4" /> }.into_any()
                    }}
                </span>
            </button>

            <div class=move || if is_open.get() { "space-y-3 border-t border-border px-3 py-3" } else { "hidden" }>
                {segment
                    .structures
                    .into_iter()
                    .map(|structure| {
                        view! {
                            <div class="space-y-2" data-structure=structure.id>
                                <h4 class="text-xs font-semibold uppercase tracking-wide text-muted-foreground">
                                    {structure.name}
                                </h4>
                                {structure
                                    .phrases
                                    .into_iter()
                                    .map(|row| view! { <PhraseRowView row=row editing=editing /> })
                                    .collect_view()}
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn PhraseRowView(row: PhraseRow, editing: RwSignal<HashSet<String>>) -> impl IntoView {
    let alias_key = row.alias.clone();
    let row_alias = row.alias.clone();
    let is_editing = Memo::new(move |_| editing.with(|e| e.contains(&alias_key)));

    view! {
        <div
            class="rounded-md border border-border bg-background px-3 py-2"
            data-alias=row_alias
        >
            <div class="flex items-center justify-between gap-2">
                <span class="font-mono text-xs font-semibold text-primary">{row.alias}</span>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:title="Renomear Alias"
                    attr:data-action=RowAction::Rename.attr()
                >
                    "✏️"
                </Button>
            </div>

            <div
                data-role="phrase-text"
                class=move || {
                    if is_editing.get() {
                        "mt-1 whitespace-pre-wrap rounded-sm px-1 text-sm outline outline-1 outline-ring"
                    } else {
                        "mt-1 whitespace-pre-wrap px-1 text-sm"
                    }
                }
                contenteditable=move || if is_editing.get() { "true" } else { "false" }
            >
                {row.text}
            </div>

            <div class="mt-1 flex justify-end gap-1">
                {move || if is_editing.get() {
                    view! {
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Salvar"
                            attr:data-action=RowAction::Save.attr()
                        >
                            <Check class="size-4 text-success" />
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Cancelar"
                            attr:data-action=RowAction::Cancel.attr()
                        >
                            <X class="size-4 text-destructive" />
                        </Button>
                    }
                    .into_any()
                } else {
                    view! {
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Editar Frase"
                            attr:data-action=RowAction::Edit.attr()
                        >
                            "📝"
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Deletar Frase"
                            attr:data-action=RowAction::Delete.attr()
                        >
                            "🗑️"
                        </Button>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_phrase_row_renders_alias_as_label_and_key() {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("document should exist");
        let host = document.create_element("div").expect("create div");
        document
            .body()
            .expect("body should exist")
            .append_child(&host)
            .expect("append host");
        let host: web_sys::HtmlElement = host.unchecked_into();

        let editing = RwSignal::new(HashSet::new());
        let row = PhraseRow {
            alias: "|omb1a".to_string(),
            text: "texto".to_string(),
        };
        let handle = leptos::mount::mount_to(host.clone(), move || {
            view! { <PhraseRowView row=row editing=editing /> }
        });

        let row_el = host
            .query_selector("[data-alias]")
            .ok()
            .flatten()
            .expect("row should render");
        assert_eq!(row_el.get_attribute("data-alias").as_deref(), Some("|omb1a"));
        assert!(host.text_content().unwrap_or_default().contains("|omb1a"));

        drop(handle);
        host.remove();
    }
}
