//! Tests for db::factory module - repository creation and configuration.

mod support;

use std::str::FromStr;

use chairside::db::factory::{RepositoryFactory, RepositoryType};

#[test]
fn test_repository_type_from_str_local() {
    let rt = RepositoryType::from_str("local").unwrap();
    assert_eq!(rt, RepositoryType::Local);

    let rt = RepositoryType::from_str("LOCAL").unwrap();
    assert_eq!(rt, RepositoryType::Local);

    let rt = RepositoryType::from_str("memory").unwrap();
    assert_eq!(rt, RepositoryType::Local);
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("invalid");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        let rt = RepositoryType::from_env();
        assert_eq!(rt, RepositoryType::Local);
    });
}

#[test]
fn test_repository_type_from_env_explicit() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("memory"))], || {
        let rt = RepositoryType::from_env();
        assert_eq!(rt, RepositoryType::Local);
    });
}

#[test]
fn test_repository_type_from_env_garbage_falls_back() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("oracle"))], || {
        let rt = RepositoryType::from_env();
        assert_eq!(rt, RepositoryType::Local);
    });
}

#[tokio::test]
async fn test_factory_creates_a_usable_repository() {
    let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
    chairside::db::services::health_check(repo.as_ref()).await.unwrap();
}

#[test]
fn test_create_from_str_rejects_unknown() {
    assert!(RepositoryFactory::create_from_str("cloud").is_err());
    assert!(RepositoryFactory::create_from_str("local").is_ok());
}
