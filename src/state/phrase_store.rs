use crate::api::{ApiClient, ApiResult};
use crate::models::Collection;
use leptos::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// In-memory mirror of the remote catalog, shared by both pages.
///
/// Loads replace the mirror wholesale; edits are patched in place after the
/// backend accepted them.
#[derive(Clone, Copy)]
pub(crate) struct PhraseStore {
    collection: RwSignal<Collection>,
    status: RwSignal<LoadStatus>,

    /// Load guard: only the latest request may write the mirror.
    request_id: RwSignal<u64>,
}

impl PhraseStore {
    pub fn new() -> Self {
        Self {
            collection: RwSignal::new(Collection::new()),
            status: RwSignal::new(LoadStatus::Idle),
            request_id: RwSignal::new(0),
        }
    }

    pub fn get_collection(&self) -> Collection {
        self.collection.get()
    }

    pub fn with_collection<T>(&self, f: impl FnOnce(&Collection) -> T) -> T {
        self.collection.with(f)
    }

    pub fn with_collection_untracked<T>(&self, f: impl FnOnce(&Collection) -> T) -> T {
        self.collection.with_untracked(f)
    }

    pub fn set_collection(&self, collection: Collection) {
        self.collection.set(collection);
        self.status.set(LoadStatus::Ready);
    }

    pub fn status(&self) -> LoadStatus {
        self.status.get()
    }

    /// Writes new text for an alias at a known segment/structure.
    ///
    /// Subscribers are not notified: the row that was saved already shows
    /// the new text, and re-rendering the tree would drop other open edits.
    pub fn patch_phrase(&self, segment_id: &str, structure_id: &str, alias: &str, text: &str) -> bool {
        let mut patched = false;
        self.collection.update_untracked(|c| {
            patched = patch_collection(c, segment_id, structure_id, alias, text);
        });
        patched
    }

    /// Drops an alias from the mirror so its row disappears before the reload lands.
    pub fn remove_phrase(&self, alias: &str) -> bool {
        let mut removed = false;
        self.collection.update(|c| {
            removed = remove_from_collection(c, alias);
        });
        removed
    }

    /// Segment and structure ids holding `alias`.
    pub fn locate(&self, alias: &str) -> Option<(String, String)> {
        self.collection.with_untracked(|c| locate_alias(c, alias))
    }

    pub fn phrase_text(&self, alias: &str) -> Option<String> {
        self.collection.with_untracked(|c| {
            let (seg, st) = locate_alias(c, alias)?;
            c.get(&seg)?.structures.get(&st)?.phrases.get(alias).cloned()
        })
    }

    /// Fetches the whole catalog and replaces the mirror.
    /// Responses to superseded loads are dropped.
    pub async fn reload(&self, api_client: &ApiClient) -> ApiResult<()> {
        let req_id = self.request_id.get_untracked().saturating_add(1);
        self.request_id.set(req_id);
        self.status.set(LoadStatus::Loading);

        let result = api_client.get_collection().await;

        if self.request_id.get_untracked() != req_id {
            return Ok(());
        }

        match result {
            Ok(collection) => {
                self.set_collection(collection);
                Ok(())
            }
            Err(e) => {
                self.status.set(LoadStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}

impl Default for PhraseStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn locate_alias(collection: &Collection, alias: &str) -> Option<(String, String)> {
    collection.iter().find_map(|(seg_id, seg)| {
        seg.structures
            .iter()
            .find(|(_, st)| st.phrases.contains_key(alias))
            .map(|(st_id, _)| (seg_id.clone(), st_id.clone()))
    })
}

/// Best-effort: a missing path or alias leaves the collection untouched.
pub(crate) fn patch_collection(
    collection: &mut Collection,
    segment_id: &str,
    structure_id: &str,
    alias: &str,
    text: &str,
) -> bool {
    let Some(slot) = collection
        .get_mut(segment_id)
        .and_then(|seg| seg.structures.get_mut(structure_id))
        .and_then(|st| st.phrases.get_mut(alias))
    else {
        return false;
    };
    *slot = text.to_string();
    true
}

pub(crate) fn remove_from_collection(collection: &mut Collection, alias: &str) -> bool {
    let mut removed = false;
    for seg in collection.values_mut() {
        for st in seg.structures.values_mut() {
            removed |= st.phrases.remove(alias).is_some();
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Collection {
        serde_json::from_str(
            r##"{
                "ABC": {"nome": "Cardio", "estruturas": {
                    "1": {"nome": "Intro", "frases": {"#abc1a": "Texto exemplo"}},
                    "12": {"nome": "Fim", "frases": {"_abc12a": "outro"}}
                }},
                "DEF": {"nome": "Neuro", "estruturas": {}}
            }"##,
        )
        .expect("collection should parse")
    }

    #[test]
    fn test_locate_does_not_depend_on_alias_layout() {
        let c = collection();
        assert_eq!(
            locate_alias(&c, "#abc1a"),
            Some(("ABC".to_string(), "1".to_string()))
        );
        // Two-digit structure id: fixed-offset slicing would read "1" here.
        assert_eq!(
            locate_alias(&c, "_abc12a"),
            Some(("ABC".to_string(), "12".to_string()))
        );
        assert_eq!(locate_alias(&c, "_nope"), None);
    }

    #[test]
    fn test_patch_collection() {
        let mut c = collection();
        assert!(patch_collection(&mut c, "ABC", "1", "#abc1a", "novo"));
        assert_eq!(c["ABC"].structures["1"].phrases["#abc1a"], "novo");

        assert!(!patch_collection(&mut c, "ABC", "2", "#abc1a", "x"));
        assert!(!patch_collection(&mut c, "ABC", "1", "#abc1z", "x"));
        assert!(!c["ABC"].structures["1"].phrases.contains_key("#abc1z"));
    }

    #[test]
    fn test_remove_from_collection_keeps_empty_branches() {
        let mut c = collection();
        assert!(remove_from_collection(&mut c, "#abc1a"));
        assert!(c["ABC"].structures["1"].phrases.is_empty());
        assert!(c["ABC"].structures.contains_key("1"));
        assert!(!remove_from_collection(&mut c, "#abc1a"));
    }
}
