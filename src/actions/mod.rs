use leptos::prelude::*;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Actions addressable from the catalog tree through `data-action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum RowAction {
    Edit,
    Save,
    Cancel,
    Delete,
    Rename,
    ToggleSegment,
}

impl RowAction {
    /// Value written to the `data-action` attribute.
    pub fn attr(self) -> &'static str {
        self.into()
    }
}

/// What a successful server round trip does to the local mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Followup {
    Nothing,
    PatchMirror,
    RemoveAndReload,
    Reload,
}

impl RowAction {
    pub fn followup(self) -> Followup {
        match self {
            RowAction::Save => Followup::PatchMirror,
            RowAction::Delete => Followup::RemoveAndReload,
            RowAction::Rename => Followup::Reload,
            RowAction::Edit | RowAction::Cancel | RowAction::ToggleSegment => Followup::Nothing,
        }
    }
}

pub(crate) const ACTION_ATTR: &str = "data-action";
pub(crate) const ALIAS_ATTR: &str = "data-alias";
pub(crate) const SEGMENT_ATTR: &str = "data-segment";

/// Element roles looked up inside a phrase row.
pub(crate) const ROLE_TEXT_SELECTOR: &str = "[data-role='phrase-text']";

/// What a click resolved to: the action, the key it targets and the row element
/// (for phrase actions) so handlers can read or reset the inline text.
#[derive(Clone)]
pub(crate) struct ActionTarget {
    pub key: String,
    pub row: Option<web_sys::Element>,
}

impl ActionTarget {
    /// Inline text element of a phrase row.
    pub fn text_element(&self) -> Option<web_sys::HtmlElement> {
        use wasm_bindgen::JsCast;

        self.row
            .as_ref()?
            .query_selector(ROLE_TEXT_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()
    }
}

/// Resolves a click inside the tree container to an action and its target.
/// Clicks that do not land on (or inside) a `data-action` element yield `None`.
pub(crate) fn resolve_click(ev: &web_sys::MouseEvent) -> Option<(RowAction, ActionTarget)> {
    use wasm_bindgen::JsCast;

    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let action_el = target.closest(&format!("[{ACTION_ATTR}]")).ok().flatten()?;
    let action = action_el
        .get_attribute(ACTION_ATTR)?
        .parse::<RowAction>()
        .ok()?;

    if action == RowAction::ToggleSegment {
        let key = action_el.get_attribute(SEGMENT_ATTR)?;
        return Some((action, ActionTarget { key, row: None }));
    }

    let row = action_el.closest(&format!("[{ALIAS_ATTR}]")).ok().flatten()?;
    let key = row.get_attribute(ALIAS_ATTR)?;
    Some((
        action,
        ActionTarget {
            key,
            row: Some(row),
        },
    ))
}

/// Dispatch table: one handler per action.
#[derive(Clone, Copy)]
pub(crate) struct ActionTable {
    pub edit: Callback<ActionTarget>,
    pub save: Callback<ActionTarget>,
    pub cancel: Callback<ActionTarget>,
    pub delete: Callback<ActionTarget>,
    pub rename: Callback<ActionTarget>,
    pub toggle_segment: Callback<ActionTarget>,
}

impl ActionTable {
    pub fn handler(&self, action: RowAction) -> Callback<ActionTarget> {
        match action {
            RowAction::Edit => self.edit,
            RowAction::Save => self.save,
            RowAction::Cancel => self.cancel,
            RowAction::Delete => self.delete,
            RowAction::Rename => self.rename,
            RowAction::ToggleSegment => self.toggle_segment,
        }
    }

    pub fn dispatch(&self, action: RowAction, target: ActionTarget) {
        self.handler(action).run(target);
    }
}
