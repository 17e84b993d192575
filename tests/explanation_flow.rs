// tests/explanation_flow.rs

mod common;

use std::time::Duration;

use common::{count, owner, project, test_app, test_app_with_timeouts, upload};
use versus::VersusError;
use versus::state::Timeouts;

async fn compared(app: &common::TestApp) -> (versus::Owner, String) {
    let alice = owner("alice");
    let p = project(&app.state, &alice, "explained").await;
    let a = upload(&app.state, &alice, &p.id, "v1", "SQL_INJECTION high O_1").await;
    let b = upload(&app.state, &alice, &p.id, "v2", "SQL_INJECTION low O_1").await;
    let outcome = app
        .state
        .comparisons
        .compare_versions(&alice, &p.id, &a.details.version.id, &b.details.version.id)
        .await
        .unwrap();
    (alice, outcome.comparison.id)
}

#[tokio::test]
async fn test_explanation_is_generated_once() {
    let app = test_app().await;
    let (alice, comparison_id) = compared(&app).await;

    let first = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap();
    let second = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.explanation.id, second.explanation.id);
    assert_eq!(first.explanation.explanation, "1 issue codes compared");
    assert_eq!(app.explainer.calls(), 1);

    let comparison = app.state.comparisons.get(&alice, &comparison_id).await.unwrap();
    assert_eq!(comparison.explanation.map(|e| e.id), Some(first.explanation.id));
}

#[tokio::test]
async fn test_failed_explanation_stores_nothing() {
    let app = test_app().await;
    let (alice, comparison_id) = compared(&app).await;

    app.explainer.set_failing(true);
    let err = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::Explainer(_)));
    assert_eq!(count(&app.state, "explanations").await, 0);

    app.explainer.set_failing(false);
    let retry = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap();
    assert!(!retry.cached);
    assert_eq!(app.explainer.calls(), 2);
}

#[tokio::test]
async fn test_slow_explainer_times_out_and_stores_nothing() {
    let app = test_app_with_timeouts(Timeouts {
        analyzer: Duration::from_secs(5),
        explainer: Duration::from_millis(50),
    })
    .await;
    let (alice, comparison_id) = compared(&app).await;

    app.explainer.set_slow(true);
    let err = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::Explainer(ref reason) if reason.contains("timed out")));
    assert_eq!(count(&app.state, "explanations").await, 0);

    app.explainer.set_slow(false);
    let retry = app
        .state
        .explanations
        .get_or_create(&alice, &comparison_id)
        .await
        .unwrap();
    assert!(!retry.cached);
    assert_eq!(retry.explanation.explanation, "1 issue codes compared");
    assert_eq!(app.explainer.calls(), 2);
}

#[tokio::test]
async fn test_explanation_requires_ownership() {
    let app = test_app().await;
    let (_, comparison_id) = compared(&app).await;

    let err = app
        .state
        .explanations
        .get_or_create(&owner("mallory"), &comparison_id)
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::NotFound(_)));
    assert_eq!(app.explainer.calls(), 0);
}
