//! Response selector: turns verdicts and ranked hits into the final answer.

use crate::types::{AnswerOrigin, Classification, FinalAnswer, RankedResults};

/// Reply to a bare greeting, shared by every surface.
pub const GREETING_MESSAGE: &str = "💼 Bonjour ! Assistant fiscal sénégalais à votre service. Posez-moi vos questions sur les impôts et taxes.";

/// Reply to a question written in another language.
pub const LANGUAGE_REFUSAL_MESSAGE: &str = "⛔ Veuillez poser votre question en français uniquement.";

/// Reply when the language could not be determined.
pub const DETECTION_FAILED_MESSAGE: &str = "⚠️ Impossible de détecter la langue de votre question.";

/// Composes final answers; holds only the reference link.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    reference_link: String,
}

impl ResponseSelector {
    pub fn new(reference_link: impl Into<String>) -> Self {
        Self {
            reference_link: reference_link.into(),
        }
    }

    pub fn reference_link(&self) -> &str {
        &self.reference_link
    }

    /// Pick the answer for a classification.
    ///
    /// For in-domain queries the text is exactly the top hit's answer, or a
    /// "no precise answer" fallback when nothing was found. `results` is
    /// ignored for every other classification.
    pub fn select(&self, classification: Classification, results: &RankedResults) -> FinalAnswer {
        match classification {
            Classification::Greeting => Self::greeting(),
            Classification::UnsupportedLanguage => {
                FinalAnswer::new(LANGUAGE_REFUSAL_MESSAGE, AnswerOrigin::LanguageRefusal)
            }
            Classification::OutOfDomain => FinalAnswer::new(
                format!(
                    "⛔ Je suis strictement limité aux questions fiscales sénégalaises. \
                     Posez-moi une question sur les impôts, taxes, déclarations fiscales, etc. \
                     Pour plus d'informations, consultez : {}",
                    self.reference_link
                ),
                AnswerOrigin::OutOfDomainRefusal,
            ),
            Classification::InDomain => match results.top() {
                Some(hit) => FinalAnswer::new(hit.answer_text.clone(), AnswerOrigin::Retrieved),
                None => FinalAnswer::new(
                    format!(
                        "🔍 Je n'ai pas trouvé de réponse précise dans ma base de données fiscales. \
                         Consultez le site officiel : {}",
                        self.reference_link
                    ),
                    AnswerOrigin::NoMatchFallback,
                ),
            },
        }
    }

    /// Refusal used when language detection was inconclusive.
    pub fn detection_failed(&self) -> FinalAnswer {
        FinalAnswer::new(DETECTION_FAILED_MESSAGE, AnswerOrigin::LanguageRefusal)
    }

    pub fn greeting() -> FinalAnswer {
        FinalAnswer::new(GREETING_MESSAGE, AnswerOrigin::Greeting)
    }
}
