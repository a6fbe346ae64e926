//! Collecting, submitting and aggregating responses.

use std::time::Duration;

use pretty_assertions::assert_eq;
use sample_surveys::customer_feedback::{
    COMMENTS, EMAIL, FEATURES, NAME, RATING, RECOMMEND, SATISFACTION,
};
use surveyor::{
    Answers, CollectError, CurrentUser, MemoryStore, Role, ScriptedCollector, Session,
    SubmitError, Survey, SurveyResults, SurveyStore, collect_answers,
};
use uuid::Uuid;

async fn saved_feedback(store: &MemoryStore) -> Survey {
    let user = CurrentUser::new(Uuid::new_v4(), "admin@example.com");
    let session = Session::new(user.clone(), Role::Admin);
    let mut model = sample_surveys::customer_feedback(user.id).unwrap();
    model.save(store, &session).await.unwrap();
    model.into_survey()
}

fn id_of(survey: &Survey, text: &str) -> Uuid {
    survey
        .questions()
        .find(|question| question.text == text)
        .unwrap()
        .id
}

fn full_answers(survey: &Survey) -> ScriptedCollector {
    ScriptedCollector::new()
        .with_answer_for(survey, NAME, "Ada")
        .with_answer_for(survey, EMAIL, "ada@example.com")
        .with_answer_for(survey, SATISFACTION, "very_satisfied")
        .with_answer_for(survey, RATING, 5)
        .with_answer_for(survey, FEATURES, vec!["delivery", "online_ordering"])
        .with_answer_for(survey, RECOMMEND, 9)
        .with_answer_for(survey, COMMENTS, "Keep it up")
}

#[tokio::test]
async fn collected_answers_are_stored_and_aggregated() {
    let store = MemoryStore::new();
    let survey = saved_feedback(&store).await;

    let answers = collect_answers(&survey, &full_answers(&survey)).unwrap();
    let response = surveyor::submit_response(&store, &survey, answers, Duration::from_secs(180))
        .await
        .unwrap();
    assert!(response.completed);
    assert_eq!(response.duration_secs, 180);

    let partial = collect_answers(
        &survey,
        &ScriptedCollector::new()
            .with_answer_for(&survey, NAME, "Grace")
            .with_answer_for(&survey, SATISFACTION, "neutral")
            .with_answer_for(&survey, FEATURES, vec!["delivery"]),
    )
    .unwrap();
    let response = surveyor::submit_response(&store, &survey, partial, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(!response.completed);

    let responses = store.list_responses(survey.id).await.unwrap();
    assert_eq!(responses.len(), 2);

    let results = SurveyResults::aggregate(&survey, &responses);
    assert_eq!(results.summary.total_responses, 2);
    assert_eq!(results.summary.completion_rate, 50.0);
    assert_eq!(results.summary.average_minutes, 2);
    assert_eq!(results.timeline.iter().map(|point| point.responses).sum::<usize>(), 2);

    let satisfaction = results.question(id_of(&survey, SATISFACTION)).unwrap();
    assert_eq!(
        satisfaction.data,
        vec![
            ("Very Satisfied".to_string(), 1),
            ("Satisfied".to_string(), 0),
            ("Neutral".to_string(), 1),
            ("Dissatisfied".to_string(), 0),
        ]
    );

    let features = results.question(id_of(&survey, FEATURES)).unwrap();
    assert_eq!(features.responses, 2);
    assert_eq!(
        features.data,
        vec![
            ("Online Ordering".to_string(), 1),
            ("Delivery".to_string(), 2),
            ("Loyalty Program".to_string(), 0),
        ]
    );

    let comments = results.question(id_of(&survey, COMMENTS)).unwrap();
    assert_eq!(comments.responses, 1);
}

#[test]
fn collector_rejects_answers_outside_the_options() {
    let survey = sample_surveys::customer_feedback(Uuid::new_v4())
        .unwrap()
        .into_survey();
    let collector = full_answers(&survey).with_answer_for(&survey, SATISFACTION, "thrilled");

    let err = collect_answers(&survey, &collector).unwrap_err();
    match err.downcast_ref::<CollectError>() {
        Some(CollectError::Rejected { question_id, message }) => {
            assert_eq!(*question_id, id_of(&survey, SATISFACTION));
            assert_eq!(message, "'thrilled' is not one of the options");
        }
        other => panic!("expected a rejected answer, got {other:?}"),
    }
}

#[test]
fn collector_requires_required_answers() {
    let survey = sample_surveys::customer_feedback(Uuid::new_v4())
        .unwrap()
        .into_survey();
    let collector = ScriptedCollector::new().with_answer_for(&survey, NAME, "Ada");

    let err = collect_answers(&survey, &collector).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CollectError>(),
        Some(CollectError::MissingAnswer(id)) if *id == id_of(&survey, SATISFACTION)
    ));
}

#[tokio::test]
async fn unsaved_survey_cannot_take_responses() {
    let store = MemoryStore::new();
    let survey = sample_surveys::customer_feedback(Uuid::new_v4())
        .unwrap()
        .into_survey();
    let answers = Answers::new().with(id_of(&survey, NAME), "Ada");

    let err = surveyor::submit_response(&store, &survey, answers, Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::MissingSurveyId(id) if id == survey.id));
}

#[tokio::test]
async fn submit_checks_answers() {
    let store = MemoryStore::new();
    let survey = saved_feedback(&store).await;
    let name = id_of(&survey, NAME);
    let satisfaction = id_of(&survey, SATISFACTION);

    let err = surveyor::submit_response(&store, &survey, Answers::new(), Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::NoAnswers));

    let answers = Answers::new().with(name, "Ada");
    let err = surveyor::submit_response(&store, &survey, answers, Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::MissingRequired(id) if id == satisfaction));

    let stranger = Uuid::new_v4();
    let answers = Answers::new()
        .with(name, "Ada")
        .with(satisfaction, "neutral")
        .with(stranger, "hello");
    let err = surveyor::submit_response(&store, &survey, answers, Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::UnknownQuestion(id) if id == stranger));

    let answers = Answers::new()
        .with(name, "Ada")
        .with(satisfaction, "neutral")
        .with(id_of(&survey, RECOMMEND), 11);
    let err = surveyor::submit_response(&store, &survey, answers, Duration::ZERO)
        .await
        .unwrap_err();
    match err {
        SubmitError::InvalidAnswer { message, .. } => {
            assert_eq!(message, "Value must be between 0 and 10");
        }
        other => panic!("expected an invalid answer, got {other:?}"),
    }

    assert!(store.list_responses(survey.id).await.unwrap().is_empty());
}
