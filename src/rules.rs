//! Phrase tables that drive line classification and number exclusion.
//!
//! A [`RuleSet`] is built once (from the defaults or a JSON file) and passed by
//! reference into every stage that needs it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::ExtractError;

const DEFAULT_FINANCIAL_TERMS: &[&str] = &[
    "operating income",
    "operating expenses",
    "credit impairment",
    "profit before tax",
    "profit after tax",
    "net interest income",
    "fee income",
    "earnings per share",
    "eps",
    "total assets",
    "total equity",
    "risk weighted assets",
    "common equity tier",
    "cet1",
    "tier 1 capital",
    "tier 2 capital",
];

const DEFAULT_EXCLUSION_PHRASES: &[(&str, &[&str])] = &[
    ("tier 1", &["1"]),
    ("tier 2", &["2"]),
    ("tier 3", &["3"]),
    ("cet1", &["1"]),
    ("q1", &["1"]),
    ("q2", &["2"]),
    ("q3", &["3"]),
    ("q4", &["4"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    financial_terms: BTreeSet<String>,
    exclusion_phrases: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    financial_terms: Vec<String>,
    #[serde(default)]
    exclusion_phrases: BTreeMap<String, Vec<String>>,
}

impl RuleSet {
    /// A rule set with no terms and no exclusions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            financial_terms: BTreeSet::new(),
            exclusion_phrases: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn new<T, P, D>(financial_terms: T, exclusion_phrases: P) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        P: IntoIterator<Item = (String, D)>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let financial_terms = financial_terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        let exclusion_phrases = exclusion_phrases
            .into_iter()
            .map(|(phrase, digits)| {
                let digits = digits
                    .into_iter()
                    .map(|digit| digit.as_ref().trim().to_string())
                    .filter(|digit| !digit.is_empty())
                    .collect::<BTreeSet<_>>();
                (phrase.trim().to_lowercase(), digits)
            })
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();

        Self {
            financial_terms,
            exclusion_phrases,
        }
    }

    /// Parses a rules document of the form
    /// `{"financial_terms": [..], "exclusion_phrases": {"tier 1": ["1"]}}`.
    pub fn from_json_str(json: &str) -> Result<Self, ExtractError> {
        let file: RuleFile = serde_json::from_str(json)?;
        Ok(Self::new(file.financial_terms, file.exclusion_phrases))
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn with_exclusion(mut self, phrase: &str, digits: &[&str]) -> Self {
        self.exclusion_phrases.insert(
            phrase.trim().to_lowercase(),
            digits.iter().map(|digit| (*digit).to_string()).collect(),
        );
        self
    }

    #[must_use]
    pub fn with_financial_term(mut self, term: &str) -> Self {
        self.financial_terms.insert(term.trim().to_lowercase());
        self
    }

    /// True when `lowered` (already lower-cased) mentions a financial term.
    #[must_use]
    pub fn mentions_financial_term(&self, lowered: &str) -> bool {
        self.financial_terms
            .iter()
            .any(|term| lowered.contains(term.as_str()))
    }

    pub fn exclusion_phrases(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.exclusion_phrases
            .iter()
            .map(|(phrase, digits)| (phrase.as_str(), digits))
    }

    pub fn financial_terms(&self) -> impl Iterator<Item = &str> {
        self.financial_terms.iter().map(String::as_str)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_FINANCIAL_TERMS.iter().copied(),
            DEFAULT_EXCLUSION_PHRASES
                .iter()
                .map(|(phrase, digits)| ((*phrase).to_string(), digits.iter().copied())),
        )
    }
}
