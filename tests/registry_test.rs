//! Integration tests for the provider registry and auth method catalog.

mod common;

use common::fixtures::fixture_path;
use common::logger::TestLogger;
use relaydash::RelayError;
use relaydash::core::auth_method::AuthMethod;
use relaydash::core::provider::{ProviderRegistry, ProviderType};

fn registry() -> ProviderRegistry {
    ProviderRegistry::builtin().unwrap()
}

#[test]
fn every_provider_type_is_registered() {
    let registry = registry();
    let keys = registry.list_provider_types();
    assert_eq!(keys.len(), ProviderType::ALL.len());
    for provider_type in ProviderType::ALL {
        assert!(keys.contains(&provider_type.key()));
        assert!(registry.is_valid_provider_type(provider_type.key()));
        assert!(registry.get_provider_type(provider_type.key()).is_some());
    }
}

#[test]
fn supported_matches_declared_methods() {
    let log = TestLogger::new("supported_matches_declared_methods");
    let registry = registry();

    for spec in registry.iter() {
        let provider = spec.provider_type.key();
        for auth in AuthMethod::ALL {
            log.debug(&format!("{provider} + {auth}"));
            assert_eq!(
                registry.is_auth_method_supported(provider, auth.key()),
                spec.supported_auth_methods.contains(auth),
                "{provider} + {auth}"
            );
        }
    }

    log.finish_ok();
}

#[test]
fn requirement_keys_equal_supported_methods() {
    for spec in registry().iter() {
        let keys: Vec<AuthMethod> = spec.requirement_keys().collect();
        assert_eq!(keys, spec.supported_auth_methods, "{}", spec.provider_type);
        assert!(!spec.supported_auth_methods.is_empty());
    }
}

#[test]
fn subject_identifier_scenarios() {
    let registry = registry();
    assert!(registry.requires_subject_identifier("AnyRouter", "sessions"));
    assert!(!registry.requires_subject_identifier("DoneHub", "token"));
    assert!(!registry.is_auth_method_supported("AnyRouter", "token"));
    // unsupported combination is simply "not required"
    assert!(!registry.requires_subject_identifier("AnyRouter", "token"));
}

#[test]
fn unknown_keys_are_not_faults() {
    let registry = registry();
    assert!(registry.get_provider_type("MysteryHub").is_none());
    assert!(!registry.is_valid_provider_type("newapi"));
    assert!(!registry.is_valid_auth_method("cookie"));
    assert!(!registry.is_auth_method_supported("MysteryHub", "token"));
    assert!(!registry.is_auth_method_supported("NewApi", "cookie"));
    assert!(!registry.requires_subject_identifier("MysteryHub", "sessions"));
    assert!(!registry.default_auto_checkin_enabled("MysteryHub"));
}

#[test]
fn auto_checkin_defaults() {
    let registry = registry();
    assert!(registry.default_auto_checkin_enabled("AnyRouter"));
    assert!(registry.default_auto_checkin_enabled("Veloera"));
    assert!(!registry.default_auto_checkin_enabled("OneHub"));
}

#[test]
fn validate_combination_maps_to_typed_errors() {
    let registry = registry();

    let err = registry
        .validate_combination("Mystery", "token", None)
        .unwrap_err();
    assert!(matches!(err, RelayError::InvalidProviderType(_)));

    let err = registry
        .validate_combination("NewApi", "cookie", None)
        .unwrap_err();
    assert!(matches!(err, RelayError::InvalidAuthMethod(_)));

    let err = registry
        .validate_combination("AnyRouter", "token", Some("1"))
        .unwrap_err();
    assert!(matches!(err, RelayError::UnsupportedAuthMethod { .. }));

    let err = registry
        .validate_combination("NewApi", "sessions", Some("   "))
        .unwrap_err();
    assert!(matches!(err, RelayError::SubjectIdRequired { .. }));

    let (provider, auth) = registry
        .validate_combination("NewApi", "sessions", Some("1024"))
        .unwrap();
    assert_eq!(provider, ProviderType::NewApi);
    assert_eq!(auth, AuthMethod::Sessions);
}

#[test]
fn custom_registry_file_overrides_requirements() {
    let registry = ProviderRegistry::load_from(&fixture_path("registry/custom.toml")).unwrap();
    assert!(registry.requires_subject_identifier("OneHub", "sessions"));
    assert!(!registry.requires_subject_identifier("OneHub", "token"));
    assert!(!registry.requires_subject_identifier("DoneHub", "token"));
}

#[test]
fn incomplete_registry_is_rejected() {
    let err = ProviderRegistry::load_from(&fixture_path("registry/incomplete.toml")).unwrap_err();
    match err {
        RelayError::RegistryInvalid { reason, .. } => assert!(reason.contains("missing")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn orphan_requirement_is_rejected() {
    let err =
        ProviderRegistry::load_from(&fixture_path("registry/orphan_requirement.toml")).unwrap_err();
    match err {
        RelayError::RegistryInvalid { provider, reason } => {
            assert_eq!(provider, "OneHub");
            assert!(reason.contains("unsupported auth method 'token'"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(registry());
    let handles: Vec<_> = ProviderType::ALL
        .iter()
        .map(|provider| {
            let registry = std::sync::Arc::clone(&registry);
            let key = provider.key();
            std::thread::spawn(move || registry.is_auth_method_supported(key, "sessions"))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
