#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unwrap_in_result, clippy::panic)]

mod common;

use common::{RecordingStore, doc, schema};
use pretty_assertions::assert_eq;
use serde_json::json;
use writeguard::{
    Guard, GuardConfig, GuardError, GuardResult, TableStore, UniqueRows,
};
use writeguard_memory::MemoryStore;

fn membership_guard() -> Guard {
    let config =
        GuardConfig::new().plugin(UniqueRows::new().table("memberships", ["by_org_user"]));
    Guard::verify(&schema(), config).unwrap()
}

#[tokio::test]
async fn duplicate_tuple_is_rejected() -> GuardResult<()> {
    let guard = membership_guard();
    let store = MemoryStore::new();
    store
        .insert("memberships", doc(json!({"org": "acme", "user": "u1"})))
        .await?;

    let err = guard
        .insert(
            &store,
            "memberships",
            doc(json!({"org": "acme", "user": "u1", "role": "admin"})),
        )
        .await
        .err()
        .unwrap();

    assert_eq!(err.code(), "unique_violation");
    match err {
        GuardError::UniqueViolation {
            table,
            columns,
            values,
        } => {
            assert_eq!(table, "memberships");
            assert_eq!(columns, vec!["org".to_string(), "user".to_string()]);
            assert_eq!(values, vec![json!("acme"), json!("u1")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn differing_tuple_is_accepted() -> GuardResult<()> {
    let guard = membership_guard();
    let store = MemoryStore::new();
    store
        .insert("memberships", doc(json!({"org": "acme", "user": "u1"})))
        .await?;

    // Same org, different user: not a collision of the full tuple.
    guard
        .insert(
            &store,
            "memberships",
            doc(json!({"org": "acme", "user": "u2"})),
        )
        .await?;

    assert_eq!(store.len("memberships").await, 2);
    Ok(())
}

#[tokio::test]
async fn partial_tuple_performs_no_lookup() -> GuardResult<()> {
    let guard = membership_guard();
    let store = RecordingStore::new();
    store
        .insert("memberships", doc(json!({"org": "acme", "user": "u1"})))
        .await?;

    // The user column is absent, so the composite key cannot be formed.
    guard
        .insert(&store, "memberships", doc(json!({"org": "acme"})))
        .await?;

    assert_eq!(store.lookups(), 0);
    Ok(())
}

#[tokio::test]
async fn patching_own_row_is_not_a_conflict() -> GuardResult<()> {
    let guard = membership_guard();
    let store = MemoryStore::new();
    let id = store
        .insert("memberships", doc(json!({"org": "acme", "user": "u1"})))
        .await?;

    guard
        .patch(
            &store,
            "memberships",
            &id,
            doc(json!({"org": "acme", "user": "u1", "role": "admin"})),
        )
        .await?;
    Ok(())
}

#[tokio::test]
async fn patch_colliding_with_another_row_is_rejected() -> GuardResult<()> {
    let guard = membership_guard();
    let store = MemoryStore::new();
    store
        .insert("memberships", doc(json!({"org": "acme", "user": "u1"})))
        .await?;
    let other = store
        .insert("memberships", doc(json!({"org": "acme", "user": "u2"})))
        .await?;

    let err = guard
        .patch(
            &store,
            "memberships",
            &other,
            doc(json!({"org": "acme", "user": "u1"})),
        )
        .await
        .err()
        .unwrap();

    assert_eq!(err.code(), "unique_violation");
    Ok(())
}
