use crate::models::Collection;
use std::cmp::Ordering;

/// Display tree for the management page. Only non-empty branches survive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CatalogTree {
    pub segments: Vec<SegmentNode>,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SegmentNode {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub structures: Vec<StructureNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StructureNode {
    pub id: String,
    pub name: String,
    pub phrases: Vec<PhraseRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PhraseRow {
    pub alias: String,
    pub text: String,
}

/// Locale-style alias order: case-insensitive first, exact order as tie-break.
pub(crate) fn compare_aliases(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub(crate) fn build_catalog_tree(collection: &Collection) -> CatalogTree {
    let mut tree = CatalogTree::default();

    // BTreeMap iteration is already ascending by segment id.
    for (segment_id, segment) in collection {
        if segment.phrase_count() == 0 {
            continue;
        }

        let mut structures = Vec::new();
        let mut count = 0;
        for (structure_id, structure) in segment.ordered_structures() {
            if structure.phrases.is_empty() {
                continue;
            }

            let mut phrases: Vec<PhraseRow> = structure
                .phrases
                .iter()
                .map(|(alias, text)| PhraseRow {
                    alias: alias.clone(),
                    text: text.clone(),
                })
                .collect();
            phrases.sort_by(|a, b| compare_aliases(&a.alias, &b.alias));

            count += phrases.len();
            structures.push(StructureNode {
                id: structure_id.clone(),
                name: structure.name.clone(),
                phrases,
            });
        }

        tree.total += count;
        tree.segments.push(SegmentNode {
            id: segment_id.clone(),
            name: segment.name.clone(),
            count,
            structures,
        });
    }

    tree
}

/// `ABC: 3 | DEF: 1` line under the total.
pub(crate) fn segment_counts_line(tree: &CatalogTree) -> String {
    tree.segments
        .iter()
        .map(|s| format!("{}: {}", s.id, s.count))
        .collect::<Vec<_>>()
        .join(" | ")
}
