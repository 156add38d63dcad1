use super::support::{pipeline_over, StubIndex};
use crate::query::Query;
use crate::selector::{GREETING_MESSAGE, LANGUAGE_REFUSAL_MESSAGE};
use crate::types::{AnswerOrigin, Classification};

fn quitus_index() -> std::sync::Arc<StubIndex> {
    StubIndex::with_hits(&[
        (
            "Comment obtenir un quitus fiscal ?",
            "Le quitus fiscal se demande au centre des services fiscaux.",
            14.2,
        ),
        ("Qu'est-ce que la patente ?", "La patente est une contribution locale.", 3.1),
    ])
}

#[tokio::test]
async fn test_french_fiscal_question_gets_top_hit() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline
        .answer("Quelles sont les démarches pour obtenir un quitus fiscal ?")
        .await;

    assert_eq!(answer.origin, AnswerOrigin::Retrieved);
    assert_eq!(answer.text, "Le quitus fiscal se demande au centre des services fiscaux.");
    assert_eq!(index.searches(), 1);

    let request = index.last_request().unwrap();
    assert_eq!(request.size, 3);
    assert_eq!(
        request.text,
        "Quelles sont les démarches pour obtenir un quitus fiscal ?"
    );
}

#[tokio::test]
async fn test_short_french_questions_reach_the_index() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("Quitus fiscal").await;
    assert_eq!(answer.origin, AnswerOrigin::Retrieved);
    assert_eq!(answer.text, "Le quitus fiscal se demande au centre des services fiscaux.");

    let answer = pipeline.answer("Remboursement TVA").await;
    assert_eq!(answer.origin, AnswerOrigin::Retrieved);
    assert_eq!(index.searches(), 2);
}

#[tokio::test]
async fn test_greeting_bypasses_guard_and_ranker() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("  Bonjour ").await;
    assert_eq!(answer.origin, AnswerOrigin::Greeting);
    assert_eq!(answer.text, GREETING_MESSAGE);
    assert_eq!(index.searches(), 0);
}

#[tokio::test]
async fn test_english_fiscal_question_is_refused() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("What are my tax obligations?").await;
    assert_eq!(answer.origin, AnswerOrigin::LanguageRefusal);
    assert_eq!(answer.text, LANGUAGE_REFUSAL_MESSAGE);
    assert_eq!(index.searches(), 0);
}

#[tokio::test]
async fn test_english_off_topic_never_reaches_ranker() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("Tell me about cooking").await;
    assert_eq!(answer.origin, AnswerOrigin::LanguageRefusal);
    assert_eq!(index.searches(), 0);
}

#[tokio::test]
async fn test_french_off_topic_is_refused_without_search() {
    let index = quitus_index();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("Quelle est la meilleure recette de thiéboudienne ?").await;
    assert_eq!(answer.origin, AnswerOrigin::OutOfDomainRefusal);
    assert!(answer.text.contains("https://www.dgid.sn/procedures-fiscales/"));
    assert_eq!(index.searches(), 0);
}

#[tokio::test]
async fn test_index_failure_degrades_to_fallback() {
    let index = StubIndex::failing();
    let pipeline = pipeline_over(index.clone());

    let answer = pipeline.answer("Quel est le taux de la TVA au Sénégal ?").await;
    assert_eq!(answer.origin, AnswerOrigin::NoMatchFallback);
    assert_eq!(index.searches(), 1);
}

#[tokio::test]
async fn test_health_check() {
    assert!(pipeline_over(quitus_index()).health_check().await.is_ok());

    let err = pipeline_over(StubIndex::failing())
        .health_check()
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "Elasticsearch indisponible");
}

#[test]
fn test_classification_is_stable() {
    let pipeline = pipeline_over(quitus_index());
    let query = Query::new("Comment régulariser ma déclaration de TVA ?");

    let first = pipeline.classify(&query);
    assert_eq!(first, Ok(Classification::InDomain));
    assert_eq!(pipeline.classify(&query), first);
}
