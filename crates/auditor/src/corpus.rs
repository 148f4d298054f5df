use crate::error::{AuditError, Result};
use skill_document::{DocumentParser, ParsedDocument};
use std::collections::BTreeMap;

/// All parsed documents of one run, keyed and iterated by name.
///
/// Every analysis stage borrows the corpus; nothing mutates it after load.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: BTreeMap<String, ParsedDocument>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(name, text)` pairs. Names must be unique.
    pub fn parse<N, T>(
        parser: &DocumentParser,
        sources: impl IntoIterator<Item = (N, T)>,
    ) -> Result<Self>
    where
        N: Into<String>,
        T: AsRef<str>,
    {
        let mut corpus = Self::new();
        for (name, text) in sources {
            corpus.insert(parser.parse_named(name, text.as_ref()))?;
        }
        Ok(corpus)
    }

    pub fn insert(&mut self, document: ParsedDocument) -> Result<()> {
        if self.documents.contains_key(document.name()) {
            return Err(AuditError::DuplicateDocument(document.name().to_string()));
        }
        self.documents
            .insert(document.name().to_string(), document);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParsedDocument> {
        self.documents.get(name)
    }

    /// Documents in name order
    pub fn documents(&self) -> impl Iterator<Item = &ParsedDocument> + Clone {
        self.documents.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Fails with [`AuditError::EmptyCorpus`] when there is nothing to analyze
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AuditError::EmptyCorpus);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_iterate_in_name_order() {
        let corpus = Corpus::parse(
            &DocumentParser::default(),
            [("zeta", "body"), ("alpha", "body"), ("mid", "")],
        )
        .unwrap();
        assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(corpus.get("mid").map(ParsedDocument::size), Some(0));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Corpus::parse(&DocumentParser::default(), [("a", "x"), ("a", "y")]).unwrap_err();
        assert!(matches!(err, AuditError::DuplicateDocument(name) if name == "a"));
    }

    #[test]
    fn empty_corpus_is_explicit() {
        assert!(matches!(
            Corpus::new().ensure_not_empty(),
            Err(AuditError::EmptyCorpus)
        ));
    }
}
