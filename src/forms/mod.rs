use crate::api::{CreatePhraseRequest, RenamePhraseRequest};
use crate::models::{compose_alias, Collection, PhraseKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LetterError {
    Empty,
    TooLong,
    NotALetter,
}

impl std::fmt::Display for LetterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LetterError::Empty => write!(f, "letter is empty"),
            LetterError::TooLong => write!(f, "expected exactly one letter"),
            LetterError::NotALetter => write!(f, "not an ASCII letter"),
        }
    }
}

/// Exactly one ASCII letter. No trimming: `" a"` is rejected like any other two-char input.
pub(crate) fn parse_letter(input: &str) -> Result<char, LetterError> {
    let mut chars = input.chars();
    let Some(c) = chars.next() else {
        return Err(LetterError::Empty);
    };
    if chars.next().is_some() {
        return Err(LetterError::TooLong);
    }
    if !c.is_ascii_alphabetic() {
        return Err(LetterError::NotALetter);
    }
    Ok(c)
}

/// Values of the "add phrase" form at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NewPhraseDraft {
    pub kind: PhraseKind,
    pub segment_id: String,
    pub structure_id: String,
    pub text: String,
    pub manual_letter: String,
}

impl NewPhraseDraft {
    /// Alias a conclusion would take. Body phrases are lettered by the backend.
    pub fn candidate_alias(&self) -> Option<String> {
        if !self.kind.needs_manual_letter() {
            return None;
        }
        Some(compose_alias(
            self.kind,
            &self.segment_id,
            &self.structure_id,
            &self.manual_letter,
        ))
    }

    /// Existing alias the submit would overwrite, if any.
    pub fn conflicting_alias(&self, collection: &Collection) -> Option<String> {
        let alias = self.candidate_alias()?;
        let exists = collection
            .get(&self.segment_id)
            .and_then(|seg| seg.structures.get(&self.structure_id))
            .is_some_and(|st| st.phrases.contains_key(&alias));
        exists.then_some(alias)
    }

    /// Request to send, or `None` when the draft would overwrite an existing
    /// conclusion and `confirm_overwrite` declines.
    pub fn submit_plan(
        &self,
        collection: &Collection,
        confirm_overwrite: impl FnOnce(&str) -> bool,
    ) -> Option<CreatePhraseRequest> {
        if let Some(alias) = self.conflicting_alias(collection) {
            if !confirm_overwrite(&overwrite_prompt(&alias)) {
                return None;
            }
        }
        Some(self.to_request())
    }

    /// Form values after a successful submit: a blank body phrase on the same
    /// segment and structure.
    pub fn next_form(&self) -> NewPhraseDraft {
        NewPhraseDraft {
            segment_id: self.segment_id.clone(),
            structure_id: self.structure_id.clone(),
            ..NewPhraseDraft::default()
        }
    }

    pub fn to_request(&self) -> CreatePhraseRequest {
        CreatePhraseRequest {
            tipo: self.kind,
            segmento: self.segment_id.clone(),
            estrutura: self.structure_id.clone(),
            texto: self.text.clone(),
            letra_manual: self
                .kind
                .needs_manual_letter()
                .then(|| self.manual_letter.clone()),
        }
    }
}

pub(crate) fn overwrite_prompt(alias: &str) -> String {
    format!("Já existe uma conclusão com o alias \"{alias}\". Deseja substituí-la?")
}

/// Rename request from the prompt's answer. `None` when the prompt was
/// cancelled; an invalid letter yields the error and no request.
pub(crate) fn rename_request(
    alias: &str,
    answer: Option<String>,
) -> Option<Result<RenamePhraseRequest, LetterError>> {
    let answer = answer?;
    Some(parse_letter(&answer).map(|letter| RenamePhraseRequest {
        alias_antigo: alias.to_string(),
        nova_letra: letter.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Collection {
        serde_json::from_str(
            r#"{"OMB": {"nome": "Ombro", "estruturas": {"1": {"nome": "Manguito", "frases": {
                "_omb1a": "corpo", "|omb1a": "conclusão"
            }}}}}"#,
        )
        .expect("collection should parse")
    }

    fn conclusion(letter: &str) -> NewPhraseDraft {
        NewPhraseDraft {
            kind: PhraseKind::Conclusion,
            segment_id: "OMB".to_string(),
            structure_id: "1".to_string(),
            text: "nova".to_string(),
            manual_letter: letter.to_string(),
        }
    }

    #[test]
    fn test_parse_letter() {
        assert_eq!(parse_letter("b"), Ok('b'));
        assert_eq!(parse_letter("Z"), Ok('Z'));
        assert_eq!(parse_letter(""), Err(LetterError::Empty));
        assert_eq!(parse_letter("ab"), Err(LetterError::TooLong));
        assert_eq!(parse_letter("1"), Err(LetterError::NotALetter));
        assert_eq!(parse_letter("ç"), Err(LetterError::NotALetter));
        assert_eq!(parse_letter(" a"), Err(LetterError::TooLong));
    }

    #[test]
    fn test_conclusion_conflict_is_detected() {
        let c = collection();
        assert_eq!(conclusion("A").conflicting_alias(&c).as_deref(), Some("|omb1a"));
        assert_eq!(conclusion("b").conflicting_alias(&c), None);
    }

    #[test]
    fn test_body_phrase_never_conflicts() {
        let draft = NewPhraseDraft {
            kind: PhraseKind::Body,
            manual_letter: "a".to_string(),
            ..conclusion("a")
        };
        assert_eq!(draft.candidate_alias(), None);
        assert_eq!(draft.conflicting_alias(&collection()), None);
    }

    #[test]
    fn test_conflict_lookup_on_unknown_segment() {
        let draft = NewPhraseDraft {
            segment_id: "XXX".to_string(),
            ..conclusion("a")
        };
        assert_eq!(draft.conflicting_alias(&collection()), None);
    }

    #[test]
    fn test_request_only_carries_letter_for_conclusions() {
        assert_eq!(conclusion("c").to_request().letra_manual.as_deref(), Some("c"));

        let body = NewPhraseDraft {
            kind: PhraseKind::Body,
            ..conclusion("c")
        };
        let req = body.to_request();
        assert_eq!(req.tipo, PhraseKind::Body);
        assert!(req.letra_manual.is_none());
        assert_eq!(req.segmento, "OMB");
        assert_eq!(req.estrutura, "1");
    }

    #[test]
    fn test_declined_overwrite_sends_nothing() {
        let mut asked = None;
        let plan = conclusion("a").submit_plan(&collection(), |msg| {
            asked = Some(msg.to_string());
            false
        });
        assert_eq!(plan, None);
        assert_eq!(asked, Some(overwrite_prompt("|omb1a")));
    }

    #[test]
    fn test_confirmed_overwrite_sends_request() {
        let plan = conclusion("a").submit_plan(&collection(), |_| true);
        assert_eq!(plan, Some(conclusion("a").to_request()));
    }

    #[test]
    fn test_new_alias_skips_confirmation() {
        let plan = conclusion("z").submit_plan(&collection(), |_| {
            panic!("no conflict, no question");
        });
        assert_eq!(plan.and_then(|r| r.letra_manual).as_deref(), Some("z"));
    }

    #[test]
    fn test_next_form_keeps_segment_and_structure() {
        let next = conclusion("a").next_form();
        assert_eq!(next.kind, PhraseKind::Body);
        assert_eq!(next.segment_id, "OMB");
        assert_eq!(next.structure_id, "1");
        assert!(next.text.is_empty());
        assert!(next.manual_letter.is_empty());
    }

    #[test]
    fn test_rename_request_from_prompt_answer() {
        assert_eq!(rename_request("_omb1a", None), None);
        assert_eq!(
            rename_request("_omb1a", Some("c".to_string())),
            Some(Ok(RenamePhraseRequest {
                alias_antigo: "_omb1a".to_string(),
                nova_letra: "c".to_string(),
            }))
        );
        for bad in ["", "ab", "1", " a"] {
            assert!(matches!(
                rename_request("_omb1a", Some(bad.to_string())),
                Some(Err(_))
            ));
        }
    }

    #[test]
    fn test_overwrite_prompt_names_alias() {
        assert!(overwrite_prompt("|omb1a").contains("\"|omb1a\""));
    }
}
