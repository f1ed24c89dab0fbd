//! 徽章查询集成测试

mod common;

use common::{Fixture, SHARE_BASE_URL};
use skill_badge::{ErrorKind, TierName};

/// 为 u1 在一个技能下授予 beginner、expert、intermediate 各一枚
async fn seeded() -> (Fixture, i64, Vec<i64>) {
    let fx = Fixture::new();
    let skill = fx.skill("Rust");
    fx.standard_tiers(skill.id).await;

    let mut grant_ids = Vec::new();
    for score in [10, 95, 60] {
        let attempt = fx.completed_attempt("u1", skill.id, score);
        let resp = fx
            .state
            .assignment
            .assign_badge("u1", attempt.id)
            .await
            .unwrap();
        grant_ids.push(resp.grant.id());
    }
    (fx, skill.id, grant_ids)
}

#[tokio::test]
async fn test_list_grants_ordered_by_creation() {
    let (fx, _, grant_ids) = seeded().await;

    let grants = fx
        .state
        .query
        .list_grants_for_user("u1", None)
        .await
        .unwrap();

    let ids: Vec<_> = grants.iter().map(|g| g.id()).collect();
    assert_eq!(ids, grant_ids);
    assert!(
        grants
            .windows(2)
            .all(|w| w[0].grant.created_at <= w[1].grant.created_at)
    );
}

#[tokio::test]
async fn test_list_grants_with_tier_filter() {
    let (fx, _, _) = seeded().await;

    let experts = fx
        .state
        .query
        .list_grants_for_user("u1", Some("EXPERT"))
        .await
        .unwrap();
    assert_eq!(experts.len(), 1);
    assert!(experts.iter().all(|g| g.tier.name == TierName::Expert));
}

#[tokio::test]
async fn test_invalid_tier_filter_is_invalid_input() {
    let (fx, _, _) = seeded().await;

    let err = fx
        .state
        .query
        .list_grants_for_user("u1", Some("novice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_empty_results_are_success() {
    let (fx, skill_id, _) = seeded().await;

    let none = fx
        .state
        .query
        .list_grants_for_user("nobody", None)
        .await
        .unwrap();
    assert!(none.is_empty());

    let none = fx
        .state
        .query
        .list_grants_for_user_by_skill("nobody", skill_id)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_grants_by_skill() {
    let (fx, skill_id, _) = seeded().await;
    let other = fx.skill("Go");
    fx.state
        .catalog
        .define_tier(other.id, "beginner", 0, 100)
        .await
        .unwrap();
    let attempt = fx.completed_attempt("u1", other.id, 5);
    fx.state
        .assignment
        .assign_badge("u1", attempt.id)
        .await
        .unwrap();

    let rust = fx
        .state
        .query
        .list_grants_for_user_by_skill("u1", skill_id)
        .await
        .unwrap();
    assert_eq!(rust.len(), 3);
    assert!(rust.iter().all(|g| g.skill.id == skill_id));

    let go = fx
        .state
        .query
        .list_grants_for_user_by_skill("u1", other.id)
        .await
        .unwrap();
    assert_eq!(go.len(), 1);

    let err = fx
        .state
        .query
        .list_grants_for_user_by_skill("u1", 999)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_get_grant_scoped_to_owner() {
    let (fx, _, grant_ids) = seeded().await;
    let id = grant_ids[0];

    let detail = fx.state.query.get_grant_by_id(id, Some("u1")).await.unwrap();
    assert_eq!(detail.id(), id);
    assert_eq!(detail.tier.name, TierName::Beginner);
    assert_eq!(detail.attempt.score, 10);

    let err = fx
        .state
        .query
        .get_grant_by_id(id, Some("u2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = fx.state.query.get_grant_by_id(9999, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_share_grant_link() {
    let (fx, _, grant_ids) = seeded().await;
    let id = grant_ids[1];

    let link = fx.state.query.share_grant(id, "u1").await.unwrap();
    assert_eq!(
        link.url,
        format!("{}/api/share-badge/{}?user=u1", SHARE_BASE_URL, id)
    );

    let err = fx.state.query.share_grant(id, "u2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
