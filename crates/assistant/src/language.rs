//! Language guard.
//!
//! Lexical detection in two tiers. Each token found in a language's
//! stopword list scores one point for it, and each language-specific
//! diacritic adds one point. When neither tier-one cue appears anywhere,
//! typical word endings are scored the same way. Text without any cue falls
//! back to the caller's language. Text without letters, or a tie for first
//! place in either tier, is reported as ambiguous.

use crate::query::Query;
use serde::Serialize;
use thiserror::Error;

/// Languages the detector can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    French,
    English,
    Spanish,
    Portuguese,
    German,
}

impl Language {
    const ALL: [Language; 5] = [
        Language::French,
        Language::English,
        Language::Spanish,
        Language::Portuguese,
        Language::German,
    ];

    /// ISO 639-1 tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::French => "fr",
            Self::English => "en",
            Self::Spanish => "es",
            Self::Portuguese => "pt",
            Self::German => "de",
        }
    }

    fn stopwords(&self) -> &'static [&'static str] {
        match self {
            Self::French => &[
                "le", "la", "les", "un", "une", "des", "du", "de", "et", "ou", "mais", "je",
                "tu", "il", "elle", "nous", "vous", "ils", "elles", "est", "sont", "être",
                "avoir", "faire", "pour", "dans", "sur", "avec", "comment", "pourquoi",
                "quand", "qui", "que", "quoi", "quel", "quelle", "quels", "quelles", "mon",
                "ma", "mes", "ce", "cette", "ces", "au", "aux", "pas", "ne", "sa", "son",
                "leur", "leurs", "combien", "où", "merci", "bonjour",
            ],
            Self::English => &[
                "the", "a", "an", "is", "are", "was", "were", "be", "been", "have", "has",
                "had", "do", "does", "did", "i", "you", "he", "she", "it", "we", "they",
                "and", "or", "but", "for", "with", "from", "to", "in", "on", "of", "what",
                "why", "how", "when", "where", "who", "which", "my", "your", "me", "about",
                "can", "tell", "please", "thank", "this", "that",
            ],
            Self::Spanish => &[
                "el", "los", "las", "una", "unos", "del", "y", "pero", "yo", "usted", "es",
                "está", "ser", "para", "por", "con", "cómo", "qué", "cuál", "cuándo",
                "dónde", "quién", "mi", "hola", "gracias", "muy", "también",
            ],
            Self::Portuguese => &[
                "o", "os", "um", "uma", "do", "da", "dos", "das", "e", "eu", "você", "é",
                "são", "com", "como", "onde", "quem", "meu", "minha", "não", "obrigado",
                "olá", "também", "isso",
            ],
            Self::German => &[
                "der", "die", "das", "und", "ist", "sind", "ein", "eine", "nicht", "ich",
                "du", "wir", "sie", "mit", "für", "von", "zu", "auf", "wie", "warum",
                "wann", "wo", "wer", "mein", "bitte", "danke", "hallo",
            ],
        }
    }

    fn is_marker(&self, c: char) -> bool {
        match self {
            Self::French => matches!(
                c,
                'é' | 'è' | 'ê' | 'ë' | 'à' | 'â' | 'ù' | 'û' | 'ô' | 'î' | 'ï' | 'ç' | 'œ'
            ),
            Self::English => false,
            Self::Spanish => matches!(c, 'ñ' | '¿' | '¡' | 'á' | 'í' | 'ó' | 'ú'),
            Self::Portuguese => matches!(c, 'ã' | 'õ'),
            Self::German => matches!(c, 'ä' | 'ö' | 'ü' | 'ß'),
        }
    }

    /// Word endings typical of the language, checked on tokens longer than
    /// the ending itself.
    fn suffixes(&self) -> &'static [&'static str] {
        match self {
            Self::French => &[
                "ement", "aire", "iale", "ique", "eur", "eurs", "eux", "oire", "ette", "elle",
                "eau", "eaux", "isme",
            ],
            Self::English => &["ing", "ness", "ship", "ful", "ght", "ly"],
            Self::Spanish => &["dad", "ado", "ada", "idos", "ario"],
            Self::Portuguese => &["mento", "agem", "inho", "inha"],
            Self::German => &["ung", "keit", "heit", "lich", "isch", "chen"],
        }
    }

    fn lexical_score(&self, tokens: &[&str], lower: &str) -> usize {
        let words = tokens
            .iter()
            .filter(|t| self.stopwords().contains(t))
            .count();
        let markers = lower.chars().filter(|c| self.is_marker(*c)).count();
        words + markers
    }

    fn suffix_score(&self, tokens: &[&str]) -> usize {
        tokens
            .iter()
            .filter(|t| {
                self.suffixes()
                    .iter()
                    .any(|s| t.len() > s.len() && t.ends_with(s))
            })
            .count()
    }
}

/// No language could be singled out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("language detection is ambiguous")]
pub struct DetectionAmbiguous;

/// Winner of one scoring tier, `None` when the tier found no cue at all.
fn best(mut scores: Vec<(Language, usize)>) -> Option<Result<Language, DetectionAmbiguous>> {
    scores.sort_by(|a, b| b.1.cmp(&a.1));
    tracing::trace!("Language scores: {:?}", scores);

    match scores.as_slice() {
        [] | [(_, 0), ..] => None,
        [(_, first), (_, second), ..] if first == second => Some(Err(DetectionAmbiguous)),
        [(lang, _), ..] => Some(Ok(*lang)),
    }
}

/// Detect the language of `text`, answering `fallback` when the text has
/// letters but no cue for any language.
pub fn detect_language(text: &str, fallback: Language) -> Result<Language, DetectionAmbiguous> {
    let lower = text.to_lowercase();
    if !lower.chars().any(char::is_alphabetic) {
        return Err(DetectionAmbiguous);
    }

    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let lexical = Language::ALL
        .iter()
        .map(|lang| (*lang, lang.lexical_score(&tokens, &lower)))
        .collect();
    if let Some(verdict) = best(lexical) {
        return verdict;
    }

    let endings = Language::ALL
        .iter()
        .map(|lang| (*lang, lang.suffix_score(&tokens)))
        .collect();
    best(endings).unwrap_or(Ok(fallback))
}

/// Outcome of the language check for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageVerdict {
    Accepted,
    Unsupported(Language),
    Ambiguous,
}

/// Accepts only queries written in the service language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageGuard {
    accepted: Language,
}

impl Default for LanguageGuard {
    fn default() -> Self {
        Self {
            accepted: Language::French,
        }
    }
}

impl LanguageGuard {
    /// Text with letters but no language cue is taken as the accepted
    /// language.
    pub fn check(&self, query: &Query) -> LanguageVerdict {
        let verdict = match detect_language(query.raw_text(), self.accepted) {
            Ok(lang) if lang == self.accepted => LanguageVerdict::Accepted,
            Ok(lang) => LanguageVerdict::Unsupported(lang),
            Err(DetectionAmbiguous) => LanguageVerdict::Ambiguous,
        };
        tracing::debug!("Language verdict: {:?}", verdict);
        verdict
    }
}
