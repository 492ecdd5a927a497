use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

/// Whole phrase catalog as returned by `GET /api/frases`, keyed by segment id.
pub(crate) type Collection = BTreeMap<String, Segment>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Segment {
    #[serde(rename = "nome")]
    pub name: String,

    /// Keyed by structure id ("1", "2", ...).
    #[serde(rename = "estruturas", default)]
    pub structures: BTreeMap<String, Structure>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Structure {
    #[serde(rename = "nome")]
    pub name: String,

    /// Alias -> phrase text.
    #[serde(rename = "frases", default)]
    pub phrases: BTreeMap<String, String>,
}

impl Segment {
    pub fn phrase_count(&self) -> usize {
        self.structures.values().map(|s| s.phrases.len()).sum()
    }

    /// Structures in display order: numeric ids ascending ("2" before "10").
    pub fn ordered_structures(&self) -> Vec<(&String, &Structure)> {
        let mut out: Vec<_> = self.structures.iter().collect();
        out.sort_by(|a, b| compare_structure_ids(a.0, b.0));
        out
    }
}

/// Structure ids are numeric in practice; fall back to plain string order otherwise.
pub(crate) fn compare_structure_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Phrase kind, serialized as the alias type marker.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
)]
pub(crate) enum PhraseKind {
    /// Report body phrase; the backend assigns the next free letter.
    #[default]
    #[serde(rename = "_")]
    #[strum(serialize = "_")]
    Body,

    /// Conclusion phrase; the letter is chosen by the user.
    #[serde(rename = "|")]
    #[strum(serialize = "|")]
    Conclusion,
}

impl PhraseKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhraseKind::Body => "Corpo do laudo",
            PhraseKind::Conclusion => "Conclusão",
        }
    }

    pub fn needs_manual_letter(&self) -> bool {
        matches!(self, PhraseKind::Conclusion)
    }
}

/// Builds the alias the backend would assign for a manual letter:
/// type marker, lowercase segment id, structure id, lowercase letter.
pub(crate) fn compose_alias(kind: PhraseKind, segment_id: &str, structure_id: &str, letter: &str) -> String {
    format!(
        "{}{}{}{}",
        kind.as_ref(),
        segment_id.to_lowercase(),
        structure_id,
        letter.to_lowercase()
    )
}

/// Last character of an alias, used as the rename prompt default.
pub(crate) fn alias_letter(alias: &str) -> Option<char> {
    alias.chars().last().filter(|c| c.is_ascii_alphabetic())
}
