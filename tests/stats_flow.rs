// tests/stats_flow.rs

mod common;

use chrono::{Days, Utc};
use common::{owner, project, test_app, upload};
use versus::VersusError;
use versus::issues::IssueCode;
use versus::stats::ActivityKind;

#[tokio::test]
async fn test_trend_for_new_owner_is_seven_zero_days() {
    let app = test_app().await;
    let trend = app.state.stats.trends(&owner("nobody")).await.unwrap();

    let today = Utc::now().date_naive();
    assert_eq!(trend.len(), 7);
    assert!(trend.iter().all(|p| p.issues == 0));
    assert_eq!(trend.last().unwrap().date, today);
    assert_eq!(
        trend.first().unwrap().date,
        today.checked_sub_days(Days::new(6)).unwrap()
    );
}

#[tokio::test]
async fn test_trend_counts_todays_issues() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "trend").await;
    upload(&app.state, &alice, &p.id, "v1", "DEAD_CODE low O_1\nMAGIC_NUMBER low O_1").await;

    let today = Utc::now().date_naive();
    let trend = app.state.stats.trends_until(&alice, today).await.unwrap();
    assert_eq!(trend.last().unwrap().issues, 2);
    assert_eq!(trend.iter().map(|p| p.issues).sum::<i64>(), 2);
}

#[tokio::test]
async fn test_aggregates_are_owner_scoped() {
    let app = test_app().await;
    let alice = owner("alice");
    let bob = owner("bob");

    let pa = project(&app.state, &alice, "alice-app").await;
    let a1 = upload(&app.state, &alice, &pa.id, "v1", "NESTED_LOOP high O_n2\nDEAD_CODE low O_1").await;
    let a2 = upload(&app.state, &alice, &pa.id, "v2", "NESTED_LOOP low O_n").await;
    app.state
        .comparisons
        .compare_versions(&alice, &pa.id, &a1.details.version.id, &a2.details.version.id)
        .await
        .unwrap();

    let pb = project(&app.state, &bob, "bob-app").await;
    upload(&app.state, &bob, &pb.id, "v1", "SQL_INJECTION high O_1\nSQL_INJECTION high O_1\nSQL_INJECTION low O_1").await;

    let overview = app.state.stats.overview(&alice).await.unwrap();
    assert_eq!(overview.total_projects, 1);
    assert_eq!(overview.total_versions, 2);
    assert_eq!(overview.total_issues, 3);
    assert_eq!(overview.total_comparisons, 1);
    assert_eq!(overview.change_breakdown.improved, 2);
    assert_eq!(overview.change_breakdown.worsened, 0);

    let top = app.state.stats.top_issues(&alice, 10).await.unwrap();
    assert_eq!(top[0].issue_code, IssueCode::NestedLoop);
    assert_eq!(top[0].count, 2);
    assert!(top.iter().all(|f| f.issue_code != IssueCode::SqlInjection));

    let bob_overview = app.state.stats.overview(&bob).await.unwrap();
    assert_eq!(bob_overview.total_issues, 3);
    assert_eq!(bob_overview.total_comparisons, 0);
}

#[tokio::test]
async fn test_top_issues_respects_limit_and_ties() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "freq").await;
    upload(
        &app.state,
        &alice,
        &p.id,
        "v1",
        "MAGIC_NUMBER low O_1\nDEAD_CODE low O_1\nDEAD_CODE low O_1\nLONG_FUNCTION low O_n",
    )
    .await;

    let top = app.state.stats.top_issues(&alice, 2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].issue_code, IssueCode::DeadCode);
    // MAGIC_NUMBER and LONG_FUNCTION tie; the one recorded first wins
    assert_eq!(top[1].issue_code, IssueCode::MagicNumber);
}

#[tokio::test]
async fn test_activity_feed_merges_and_truncates() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "feed").await;
    let v1 = upload(&app.state, &alice, &p.id, "v1", "DEAD_CODE low O_1").await;
    let v2 = upload(&app.state, &alice, &p.id, "v2", "# clean").await;
    app.state
        .comparisons
        .compare_versions(&alice, &p.id, &v1.details.version.id, &v2.details.version.id)
        .await
        .unwrap();

    let feed = app.state.stats.recent_activity(&alice, 10).await.unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(feed.iter().filter(|e| e.kind == ActivityKind::Analysis).count(), 2);
    assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(feed.iter().all(|e| e.project_name == "feed"));

    let comparison = feed
        .iter()
        .find(|e| e.kind == ActivityKind::Comparison)
        .unwrap();
    assert_eq!(comparison.result_count, Some(1));

    let truncated = app.state.stats.recent_activity(&alice, 2).await.unwrap();
    assert_eq!(truncated.len(), 2);

    assert!(app.state.stats.recent_activity(&owner("bob"), 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_limits_are_honored_or_rejected() {
    let app = test_app().await;
    let alice = owner("alice");
    let p = project(&app.state, &alice, "limits").await;
    upload(&app.state, &alice, &p.id, "v1", "DEAD_CODE low O_1").await;
    upload(&app.state, &alice, &p.id, "v2", "MAGIC_NUMBER low O_1").await;

    assert!(app.state.stats.recent_activity(&alice, 0).await.unwrap().is_empty());
    assert!(app.state.stats.top_issues(&alice, 0).await.unwrap().is_empty());
    assert_eq!(app.state.stats.recent_activity(&alice, 100).await.unwrap().len(), 2);

    let err = app.state.stats.recent_activity(&alice, 250).await.unwrap_err();
    assert!(matches!(err, VersusError::Validation { ref field, .. } if field == "limit"));
    let err = app.state.stats.top_issues(&alice, 101).await.unwrap_err();
    assert!(matches!(err, VersusError::Validation { ref field, .. } if field == "limit"));
}
