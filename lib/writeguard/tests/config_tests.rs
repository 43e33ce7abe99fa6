//! Configuration errors must surface when the guard is built, not at first
//! call.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unwrap_in_result)]

mod common;

use common::{doc, schema};
use serde_json::json;
use writeguard::{
    DefaultValues, Guard, GuardConfig, GuardError, IndexSpec, ProtectedColumns, UniqueColumns,
    UniqueRows,
};

fn verify(config: GuardConfig) -> Result<Guard, GuardError> {
    Guard::verify(&schema(), config)
}

#[test]
fn unknown_index_is_rejected() {
    let config =
        GuardConfig::new().plugin(UniqueColumns::new().table("users", ["by_phone_number"]));
    let err = verify(config).err().unwrap();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("by_phone_number"));
}

#[test]
fn unknown_table_is_rejected() {
    let config = GuardConfig::new().plugin(UniqueColumns::new().table("widgets", ["by_name"]));
    let err = verify(config).err().unwrap();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("widgets"));
}

#[test]
fn identifier_must_be_a_declared_column() {
    let spec = IndexSpec::with_identifiers("by_username", ["nickname"]);
    let config = GuardConfig::new().plugin(UniqueColumns::new().table("users", [spec]));
    let err = verify(config).err().unwrap();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("nickname"));
}

#[test]
fn intrinsic_id_is_always_a_valid_identifier() {
    let spec = IndexSpec::with_identifiers("by_username", ["_id"]);
    let config = GuardConfig::new().plugin(UniqueColumns::new().table("users", [spec]));
    assert!(verify(config).is_ok());
}

#[test]
fn composite_index_is_rejected_for_single_column_uniqueness() {
    let config = GuardConfig::new().plugin(UniqueColumns::new().table("posts", ["by_org_slug"]));
    let err = verify(config).err().unwrap();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("by_org_slug"));
}

#[test]
fn composite_index_is_accepted_for_row_uniqueness() {
    let config = GuardConfig::new().plugin(UniqueRows::new().table("posts", ["by_org_slug"]));
    assert!(verify(config).is_ok());
}

#[test]
fn defaults_on_unknown_table_are_rejected() {
    let defaults = DefaultValues::new().table("widgets", doc(json!({"status": "draft"})));
    let err = verify(GuardConfig::new().default_values(defaults)).err().unwrap();
    assert_eq!(err.code(), "config");
}

#[test]
fn protected_column_must_be_declared() {
    let protected = ProtectedColumns::new().table("users", ["secret"]);
    let err = verify(GuardConfig::new().protected_columns(protected))
        .err()
        .unwrap();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("secret"));
}

#[test]
fn empty_config_verifies() {
    assert!(verify(GuardConfig::new()).is_ok());
}
