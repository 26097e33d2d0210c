//! Gig and application lifecycle tests against the venue service.

mod common;

use common::{actor, TestContext};
use morphema_backend::models::application::ApplicationStatus;
use morphema_backend::models::gig::GigStatus;
use morphema_backend::services::venue_service::{GigPatch, NewGig};
use morphema_backend::AppError;

fn new_gig(title: &str) -> NewGig {
    NewGig {
        title: title.to_string(),
        pay_amount: 120.0,
        currency: "EUR".to_string(),
        start_time: None,
        end_time: None,
        venue_id: Some(1),
    }
}

/// Create a gig and move it to `published`.
async fn published_gig(ctx: &TestContext, title: &str) -> u64 {
    let gig = ctx
        .state
        .venue
        .create_gig(new_gig(title), &actor("v1", "venue"))
        .await
        .expect("create gig");
    ctx.state
        .venue
        .publish_gig(gig.gig.id, &actor("v1", "venue"))
        .await
        .expect("publish gig");
    gig.gig.id
}

#[tokio::test]
async fn full_lifecycle_reaches_settled() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");
    let worker_ctx = actor("w1", "worker");

    let created = venue
        .create_gig(new_gig("Serata jazz"), &venue_ctx)
        .await
        .expect("create");
    assert_eq!(created.gig.status, GigStatus::Draft);
    assert_eq!(created.applications_count, 0);
    assert!(created.gig.preauthorized_at.is_none());

    let published = venue
        .publish_gig(created.gig.id, &venue_ctx)
        .await
        .expect("publish");
    assert_eq!(published.status, GigStatus::Published);
    assert!(published.preauthorized_at.is_some());

    let application = venue
        .apply_to_gig(created.gig.id, "w1", "Anna", &worker_ctx)
        .await
        .expect("apply");
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.worker_name, "Anna");

    let accepted = venue
        .accept_application(application.id, &venue_ctx)
        .await
        .expect("accept");
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    let gigs = venue.list_gigs().await;
    assert_eq!(gigs[0].gig.status, GigStatus::Accepted);

    let completed = venue
        .complete_application(application.id, "w1", &worker_ctx)
        .await
        .expect("complete");
    assert_eq!(completed.status, ApplicationStatus::Completed);

    let gigs = venue.list_gigs().await;
    let gig = &gigs[0].gig;
    assert_eq!(gig.status, GigStatus::Completed);
    assert_eq!(gig.policy_snapshot_ref(), format!("pol_{}", gig.id));
    assert_eq!(gig.engagement_ref(), format!("eng_{}", gig.id));
    assert!(gig.payment_confirmed_at.is_none());

    let settled = venue
        .settle_gig(created.gig.id, &venue_ctx)
        .await
        .expect("settle");
    assert_eq!(settled.status, GigStatus::Settled);
    assert!(settled.payment_confirmed_at.is_some());
}

#[tokio::test]
async fn publish_requires_draft() {
    let ctx = TestContext::new();
    let id = published_gig(&ctx, "Apertura serale").await;

    let err = ctx
        .state
        .venue
        .publish_gig(id, &actor("v1", "venue"))
        .await
        .expect_err("second publish must fail");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn apply_rejects_unknown_draft_and_duplicate() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let worker_ctx = actor("w1", "worker");

    let err = venue
        .apply_to_gig(99, "w1", "Anna", &worker_ctx)
        .await
        .expect_err("unknown gig");
    assert!(matches!(err, AppError::NotFound(_)));

    let draft = venue
        .create_gig(new_gig("Bozza"), &actor("v1", "venue"))
        .await
        .expect("create");
    let err = venue
        .apply_to_gig(draft.gig.id, "w1", "Anna", &worker_ctx)
        .await
        .expect_err("draft gig is not open");
    assert!(matches!(err, AppError::Conflict(_)));

    let id = published_gig(&ctx, "Serata").await;
    venue
        .apply_to_gig(id, "w1", "Anna", &worker_ctx)
        .await
        .expect("first application");
    let err = venue
        .apply_to_gig(id, "w1", "Anna", &worker_ctx)
        .await
        .expect_err("duplicate application");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn board_shows_published_and_accepted_only() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");

    venue
        .create_gig(new_gig("Bozza"), &venue_ctx)
        .await
        .expect("draft");
    let open_id = published_gig(&ctx, "Aperto").await;

    let accepted_id = published_gig(&ctx, "Assegnato").await;
    let app = venue
        .apply_to_gig(accepted_id, "w1", "Anna", &actor("w1", "worker"))
        .await
        .expect("apply");
    venue
        .accept_application(app.id, &venue_ctx)
        .await
        .expect("accept");

    let board = venue.list_published_gigs().await;
    let ids: Vec<u64> = board.iter().map(|g| g.gig.id).collect();
    assert!(ids.contains(&open_id));
    assert!(ids.contains(&accepted_id));
    assert_eq!(board.len(), 2);
}

#[tokio::test]
async fn accept_requires_pending() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");

    let id = published_gig(&ctx, "Serata").await;
    let app = venue
        .apply_to_gig(id, "w1", "Anna", &actor("w1", "worker"))
        .await
        .expect("apply");
    venue
        .accept_application(app.id, &venue_ctx)
        .await
        .expect("accept");

    let err = venue
        .accept_application(app.id, &venue_ctx)
        .await
        .expect_err("already accepted");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn complete_is_owner_only_and_requires_accepted() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");

    let id = published_gig(&ctx, "Serata").await;
    let app = venue
        .apply_to_gig(id, "w1", "Anna", &actor("w1", "worker"))
        .await
        .expect("apply");

    // Still pending
    let err = venue
        .complete_application(app.id, "w1", &actor("w1", "worker"))
        .await
        .expect_err("pending application cannot complete");
    assert!(matches!(err, AppError::Conflict(_)));

    venue
        .accept_application(app.id, &venue_ctx)
        .await
        .expect("accept");

    let err = venue
        .complete_application(app.id, "w2", &actor("w2", "worker"))
        .await
        .expect_err("another worker cannot complete");
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn settle_requires_completed() {
    let ctx = TestContext::new();
    let id = published_gig(&ctx, "Serata").await;

    let err = ctx
        .state
        .venue
        .settle_gig(id, &actor("v1", "venue"))
        .await
        .expect_err("published gig cannot settle");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn delete_cascades_to_applications() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");

    let id = published_gig(&ctx, "Serata").await;
    venue
        .apply_to_gig(id, "w1", "Anna", &actor("w1", "worker"))
        .await
        .expect("apply");

    venue.delete_gig(id, &venue_ctx).await.expect("delete");

    assert!(venue.list_gigs().await.is_empty());
    assert!(venue.list_worker_applications("w1").await.is_empty());

    let err = venue
        .delete_gig(id, &venue_ctx)
        .await
        .expect_err("already deleted");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_patches_fields_but_not_status() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");

    let created = venue
        .create_gig(new_gig("Titolo iniziale"), &venue_ctx)
        .await
        .expect("create");

    let patch = GigPatch {
        title: Some("Titolo nuovo".to_string()),
        pay_amount: Some(200.0),
        ..Default::default()
    };
    let updated = venue
        .update_gig(created.gig.id, patch, &venue_ctx)
        .await
        .expect("update");

    assert_eq!(updated.gig.title, "Titolo nuovo");
    assert_eq!(updated.gig.pay_amount, 200.0);
    assert_eq!(updated.gig.currency, "EUR");
    assert_eq!(updated.gig.status, GigStatus::Draft);

    let err = venue
        .update_gig(99, GigPatch::default(), &venue_ctx)
        .await
        .expect_err("unknown gig");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn history_lists_completed_and_settled_gigs() {
    let ctx = TestContext::new();
    let venue = &ctx.state.venue;
    let venue_ctx = actor("v1", "venue");
    let worker_ctx = actor("w1", "worker");

    // Stays published, must not appear in history
    published_gig(&ctx, "Aperto").await;

    let id = published_gig(&ctx, "Concluso").await;
    let app = venue
        .apply_to_gig(id, "w1", "Anna", &worker_ctx)
        .await
        .expect("apply");
    venue
        .accept_application(app.id, &venue_ctx)
        .await
        .expect("accept");
    venue
        .complete_application(app.id, "w1", &worker_ctx)
        .await
        .expect("complete");

    let history = venue.list_history().await;
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.gig_id, id);
    assert_eq!(record.title, "Concluso");
    assert_eq!(record.policy_snapshot_id, format!("pol_{id}"));
    assert_eq!(record.engagement_id, format!("eng_{id}"));
    assert_eq!(record.compensation, 120.0);
    assert!(record.payment_confirmed_at.is_empty());

    venue.settle_gig(id, &venue_ctx).await.expect("settle");
    let history = venue.list_history().await;
    assert!(!history[0].payment_confirmed_at.is_empty());
    // Same wire form as the timestamps on the gig itself
    assert!(history[0].payment_confirmed_at.ends_with('Z'));
}

#[tokio::test]
async fn lifecycle_actions_land_in_the_audit_trail() {
    let ctx = TestContext::new();
    let id = published_gig(&ctx, "Serata").await;
    let app = ctx
        .state
        .venue
        .apply_to_gig(id, "w1", "Anna", &actor("w1", "worker"))
        .await
        .expect("apply");
    ctx.state
        .venue
        .accept_application(app.id, &actor("v1", "venue"))
        .await
        .expect("accept");

    let page = ctx.state.audit.query(&Default::default()).await;
    let actions: Vec<&str> = page.items.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(
        actions,
        vec![
            "application_accepted",
            "gig_accepted",
            "application_created",
            "gig_published",
            "gig_created",
        ]
    );
    assert!(page.items.iter().all(|e| !e.actor_user_id.is_empty()));
}
