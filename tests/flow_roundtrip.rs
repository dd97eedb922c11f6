mod common;

use common::{RouterApi, ScriptedModel, app};
use post_spark::error::GENERATION_FAILED_MESSAGE;
use post_spark::flow::{FlowController, FlowError, Phase};

const QUESTIONS_REPLY: &str =
    r#"{"questions": ["What was the challenge?", "What tech did you use?", "What's next?"]}"#;

#[tokio::test]
async fn topic_questions_post_round_trip() {
    let model = ScriptedModel::new(vec![Ok(QUESTIONS_REPLY), Ok("Headline\n\nStory\n\n#win")]);
    let api = RouterApi {
        app: app(model.clone()),
    };
    let mut flow = FlowController::new();

    flow.set_topic("I won a hackathon");
    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Questions);
    assert_eq!(flow.questions().len(), 3);
    assert!(flow.answers().questions().all(|q| flow.answers().answer(q) == Some("")));

    flow.set_answer("What was the challenge?", "Ship a drone in 24h");
    flow.set_answer("What tech did you use?", "Rust");
    flow.set_answer("What's next?", "Open-sourcing it");
    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Result);
    assert_eq!(flow.post(), "Headline\n\nStory\n\n#win");
    assert!(flow.questions().is_empty());
    assert!(flow.answers().is_empty());
    assert!(!flow.is_busy());

    // Second call carried the answers and used the persona prompt only
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("User's Detailed Answers"));
    assert!(prompts[1].contains(r#""What tech did you use?": "Rust""#));
    assert!(!prompts[1].contains("follow-up questions"));

    assert_eq!(flow.begin_submit().unwrap_err(), FlowError::NothingToSubmit);
    flow.reset();
    assert_eq!(flow.phase(), Phase::Topic);
    assert_eq!(flow.topic(), "");
    assert_eq!(flow.post(), "");
}

#[tokio::test]
async fn failure_keeps_answers_for_retry() {
    let model = ScriptedModel::new(vec![
        Ok(QUESTIONS_REPLY),
        Err("upstream 503"),
        Ok("Final post"),
    ]);
    let api = RouterApi {
        app: app(model.clone()),
    };
    let mut flow = FlowController::new();
    flow.set_topic("I won a hackathon");
    flow.submit(&api).await.unwrap();
    flow.set_answer("What tech did you use?", "Rust");

    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Questions);
    assert_eq!(flow.error(), Some(GENERATION_FAILED_MESSAGE));
    assert!(!flow.is_busy());
    assert_eq!(flow.answers().answer("What tech did you use?"), Some("Rust"));
    assert_eq!(flow.topic(), "I won a hackathon");

    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Result);
    assert_eq!(flow.error(), None);
    assert_eq!(flow.post(), "Final post");
}

#[tokio::test]
async fn fallback_questions_drive_the_flow() {
    let model = ScriptedModel::new(vec![Ok("no json here")]);
    let api = RouterApi { app: app(model) };
    let mut flow = FlowController::new();
    flow.set_topic("Promoted to staff engineer");
    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Questions);
    assert_eq!(flow.questions(), post_spark::extract::FALLBACK_QUESTIONS);
    assert!(flow.error().is_none());
}

#[tokio::test]
async fn unexpected_post_in_phase_one_goes_to_result() {
    // A phase-1 reply shaped like a post is still applied
    let mut flow = FlowController::new();
    flow.set_topic("t");
    let (ticket, _) = flow.begin_submit().unwrap();
    flow.complete(
        ticket,
        Ok(post_spark::models::GenerationResult::post("direct post")),
    );
    assert_eq!(flow.phase(), Phase::Result);
    assert_eq!(flow.post(), "direct post");
}

#[tokio::test]
async fn analysis_failure_keeps_topic_for_retry() {
    let model = ScriptedModel::new(vec![Err("upstream 503"), Ok(QUESTIONS_REPLY)]);
    let api = RouterApi { app: app(model) };
    let mut flow = FlowController::new();
    flow.set_topic("I won a hackathon");

    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Topic);
    assert_eq!(flow.error(), Some(GENERATION_FAILED_MESSAGE));
    assert_eq!(flow.topic(), "I won a hackathon");
    assert!(flow.can_submit());

    flow.dismiss_error();
    assert_eq!(flow.submit(&api).await.unwrap(), Phase::Questions);
    assert_eq!(flow.questions().len(), 3);
}
