use crate::models::Collection;

/// Maximum number of cards rendered for one query.
pub(crate) const SEARCH_LIMIT: usize = 50;

/// One phrase flattened out of the segment/structure tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchRecord {
    pub alias: String,
    pub text: String,
    pub segment_name: String,
    pub structure_name: String,

    /// Lowercased `alias segment structure text`; the only field queries match against.
    pub full_search: String,
}

pub(crate) fn flatten_collection(collection: &Collection) -> Vec<SearchRecord> {
    let mut out = Vec::new();
    for segment in collection.values() {
        for (_, structure) in segment.ordered_structures() {
            for (alias, text) in &structure.phrases {
                let full_search = format!(
                    "{} {} {} {}",
                    alias, segment.name, structure.name, text
                )
                .to_lowercase();

                out.push(SearchRecord {
                    alias: alias.clone(),
                    text: text.clone(),
                    segment_name: segment.name.clone(),
                    structure_name: structure.name.clone(),
                    full_search,
                });
            }
        }
    }
    out
}

/// Case-insensitive substring search, first `SEARCH_LIMIT` hits in flattening order.
/// Returns `None` for an empty term so callers can show the prompt instead of results.
pub(crate) fn search_records<'a>(records: &'a [SearchRecord], term: &str) -> Option<Vec<&'a SearchRecord>> {
    if term.is_empty() {
        return None;
    }

    let needle = term.to_lowercase();
    Some(
        records
            .iter()
            .filter(|r| r.full_search.contains(&needle))
            .take(SEARCH_LIMIT)
            .collect(),
    )
}
