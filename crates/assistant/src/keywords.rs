//! Domain vocabulary: fiscal keywords and greeting tokens.
//!
//! Both sets are built once at startup (built-in lists or the `domain`
//! section of the config) and only read afterwards.

use std::collections::BTreeSet;

/// Built-in fiscal domain terms.
///
/// Matching is a case-insensitive substring test, so short terms such as
/// "ir", "is" or "pv" also fire inside unrelated words.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "impôt", "impot", "taxe", "tva", "cfpnb", "etax", "pv", "pme", "quitus", "pcf",
    "fiscalité", "déclaration", "cgu", "patente", "récapitulatifs", "exonération",
    "remboursement", "trop perçu", "délai", "quitus fiscal", "délai de paiement",
    "quittance", "récépissé", "revenus", "formalisation", "contribution", "taxation",
    "cadastre", "redevance", "contribution foncière", "taxe sur les véhicules",
    "taxe sur les biens", "taxe sur les opérations", "taxe sur les produits",
    "taxe sur les services", "droit d'enregistrement", "droits d'enregistrement",
    "taxes d'enregistrement", "entreprise", "changement de statuts",
    "taxes sur les salaires", "taxe sur les salaires", "taxe foncière",
    "taxe professionnelle", "ninea", "direct", "indirect", "réouverture",
    "taxe sur la valeur ajoutée", "passeport", "taxe sur les boissons", "réductions",
    "immatriculation", "propriétaire", "compte", "duplicata", "ir", "is", "douane",
    "régime fiscal", "code général des impôts", "procédure", "acte administratif",
    "exonérations", "obligation fiscale", "pénalité", "penalite", "amende",
    "contrôle fiscal", "démarrage des activités", "homologation", "acte", "titre",
    "sigtas", "imposition", "bail", "foncier bâti", "foncier non bâti", "teom",
    "vérification", "versement", "trésor", "tva déductible", "tva collectée",
    "tva non récupérable", "non-assujetti", "assujetti", "centre des impôts",
    "régularisation", "déductibilité", "déclaration mensuelle", "déclaration annuelle",
    "numéro fiscal", "avis d'imposition", "bordereau de paiement", "numéro ifu", "cofi",
    "fiscale", "fiscaux", "fiscal", "dgid", "impotsetdomaines", "dgi",
    "direction générale des impôts",
];

/// Built-in greeting tokens, matched exactly after normalization.
pub const DEFAULT_GREETINGS: &[&str] = &[
    "bonjour", "salut", "hello", "bonsoir", "hi", "coucou", "yo", "allo", "bjr", "salam",
];

/// Lower-case, trim and drop blanks and duplicates.
fn normalize_terms<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Immutable set of domain-indicator terms.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: BTreeSet<String>,
}

impl KeywordSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: normalize_terms(terms),
        }
    }

    /// Configured terms, or the built-in list when `None`.
    pub fn from_config(terms: Option<&[String]>) -> Self {
        match terms {
            Some(terms) => Self::new(terms),
            None => Self::default(),
        }
    }

    /// First term found as a substring of `normalized_text`.
    pub fn find_in(&self, normalized_text: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|term| normalized_text.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

/// Immutable set of greeting tokens.
#[derive(Debug, Clone)]
pub struct GreetingSet {
    tokens: BTreeSet<String>,
}

impl GreetingSet {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: normalize_terms(tokens),
        }
    }

    /// Configured tokens, or the built-in list when `None`.
    pub fn from_config(tokens: Option<&[String]>) -> Self {
        match tokens {
            Some(tokens) => Self::new(tokens),
            None => Self::default(),
        }
    }

    /// Exact match against already-normalized text.
    pub fn is_greeting(&self, normalized_text: &str) -> bool {
        self.tokens.contains(normalized_text)
    }
}

impl Default for GreetingSet {
    fn default() -> Self {
        Self::new(DEFAULT_GREETINGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercased_and_deduplicated() {
        let set = KeywordSet::new(["TVA", "tva", "  Patente ", ""]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.find_in("délai de la tva"), Some("tva"));
        assert_eq!(set.find_in("payer la patente"), Some("patente"));
    }

    #[test]
    fn test_find_in_is_substring_match() {
        let set = KeywordSet::new(["ir"]);
        assert_eq!(set.find_in("irrelevant"), Some("ir"));
        assert_eq!(set.find_in("cuisine"), None);
    }

    #[test]
    fn test_default_sets_cover_source_vocabulary() {
        let keywords = KeywordSet::default();
        assert!(keywords.len() > 50);
        assert!(keywords.find_in("quitus").is_some());
        assert!(keywords.find_in("ninea").is_some());
        assert_eq!(KeywordSet::new(["NINEA"]).find_in("mon ninea"), Some("ninea"));

        let greetings = GreetingSet::default();
        assert!(greetings.is_greeting("salam"));
        assert!(greetings.is_greeting("bjr"));
        assert!(!greetings.is_greeting("bonjour madame"));
    }

    #[test]
    fn test_from_config_overrides_builtin() {
        let custom = vec!["Hey".to_string()];
        let greetings = GreetingSet::from_config(Some(&custom));
        assert!(greetings.is_greeting("hey"));
        assert!(!greetings.is_greeting("bonjour"));
    }
}
