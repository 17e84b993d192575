// tests/analysis_flow.rs

mod common;

use std::time::Duration;

use common::{count, owner, project, test_app, test_app_with_timeouts, upload};
use versus::VersusError;
use versus::analysis::types::DEGRADED_SUMMARY;
use versus::state::Timeouts;

#[tokio::test]
async fn test_slow_analyzer_degrades_instead_of_hanging() {
    let app = test_app_with_timeouts(Timeouts {
        analyzer: Duration::from_millis(50),
        explainer: Duration::from_millis(50),
    })
    .await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "slow").await;

    let uploaded = upload(&app.state, &alice, &p.id, "v1", "SLOW\nDEAD_CODE low O_1").await;

    let analysis = uploaded.details.analysis.unwrap();
    assert!(analysis.degraded);
    assert_eq!(analysis.summary, DEGRADED_SUMMARY);
    assert!(analysis.issues.is_empty());
    assert!(uploaded.analysis_error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_upload_requires_source_and_owned_project() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "strict").await;

    let err = app
        .state
        .projects
        .upload_version(&alice, &p.id, None, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::Validation { ref field, .. } if field == "sourceCode"));

    let err = app
        .state
        .projects
        .upload_version(&owner("mallory"), &p.id, None, "DEAD_CODE low O_1")
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_analysis_write_leaves_no_version() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "atomic").await;

    sqlx::query(
        "CREATE TRIGGER reject_analyses BEFORE INSERT ON analyses \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&app.state.pool)
    .await
    .unwrap();

    let err = app
        .state
        .projects
        .upload_version(&alice, &p.id, Some("v1".to_string()), "DEAD_CODE low O_1")
        .await
        .unwrap_err();
    assert!(matches!(err, VersusError::Db(_)));
    assert_eq!(count(&app.state, "code_versions").await, 0);
    assert_eq!(count(&app.state, "analyses").await, 0);

    sqlx::query("DROP TRIGGER reject_analyses")
        .execute(&app.state.pool)
        .await
        .unwrap();
    upload(&app.state, &alice, &p.id, "v1", "DEAD_CODE low O_1").await;
    assert_eq!(count(&app.state, "code_versions").await, 1);
    assert_eq!(count(&app.state, "analyses").await, 1);
}

#[tokio::test]
async fn test_versions_listed_newest_first_with_analyses() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "listing").await;
    upload(&app.state, &alice, &p.id, "v1", "DEAD_CODE low O_1").await;
    let v2 = upload(&app.state, &alice, &p.id, "v2", "MAGIC_NUMBER low O_1\nDEAD_CODE low O_1").await;

    let versions = app.state.projects.list_versions(&alice, &p.id).await.unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].version.id, v2.details.version.id);
    assert!(versions.iter().all(|v| v.analysis.is_some()));
    assert_eq!(versions[0].analysis.as_ref().unwrap().issues.len(), 2);

    let renamed = app
        .state
        .projects
        .rename_version(&alice, &v2.details.version.id, "release")
        .await
        .unwrap();
    assert_eq!(renamed.version_label.as_deref(), Some("release"));

    let fetched = app
        .state
        .projects
        .get_project(&alice, &p.id)
        .await
        .unwrap();
    assert_eq!(fetched.version_count, 2);
}

#[tokio::test]
async fn test_issues_keep_analyzer_order() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "order").await;
    let v = upload(
        &app.state,
        &alice,
        &p.id,
        "v1",
        "MAGIC_NUMBER low O_1\nDEAD_CODE medium O_n\nMAGIC_NUMBER low O_n",
    )
    .await;

    let stored = app
        .state
        .analyses
        .get_for_version(&alice, &v.details.version.id)
        .await
        .unwrap();
    let codes: Vec<_> = stored.issues.iter().map(|i| i.issue_code.as_str()).collect();
    assert_eq!(codes, vec!["MAGIC_NUMBER", "DEAD_CODE", "MAGIC_NUMBER"]);
}
