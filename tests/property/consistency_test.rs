// tests/property/consistency_test.rs

//! Property-based tests for loader invariants: idempotence, lookups,
//! uniqueness and the shared-query filter.

use super::generators::{fixture, shared_count};
use graphdb_seed::core::SeedError;
use graphdb_seed::seed::load;
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeSet;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_load_is_idempotent(source in fixture()) {
        let text = source.to_string();
        prop_assert_eq!(load(&text).unwrap(), load(&text).unwrap());
    }

    #[test]
    fn test_every_seeded_user_is_found(source in fixture()) {
        let (users, _) = load(source.to_string()).unwrap();
        let seeded = source["users"].as_object().unwrap();
        prop_assert_eq!(users.len(), seeded.len());

        for (name, record) in seeded {
            let user = users.lookup_user(name).unwrap();
            let expected: BTreeSet<String> = record["grantedAuthorities"]
                .as_array()
                .unwrap()
                .iter()
                .map(|a| a.as_str().unwrap().to_string())
                .collect();
            prop_assert_eq!(user.granted_authorities(), &expected);
            prop_assert_eq!(user.date_created(), record["dateCreated"].as_i64().unwrap());
        }
        prop_assert!(users.lookup_user("NOT-A-GENERATED-NAME").is_none());
    }

    #[test]
    fn test_shared_filter_matches_flags(source in fixture()) {
        let (_, queries) = load(source.to_string()).unwrap();
        prop_assert_eq!(queries.shared_queries().count(), shared_count(&source));
        prop_assert!(queries.shared_queries().all(|q| q.is_shared()));
    }

    #[test]
    fn test_repeated_username_is_rejected(source in fixture()) {
        let users = source["users"].as_object().unwrap();
        prop_assume!(!users.is_empty());

        // serde_json maps cannot hold a repeated key, so build the text by hand.
        let mut entries: Vec<String> = users
            .iter()
            .map(|(name, user)| format!("{}: {}", Value::from(name.as_str()), user))
            .collect();
        entries.push(entries[0].clone());
        let text = format!(
            "{{\"users\": {{{}}}, \"user_queries\": {{}}}}",
            entries.join(", ")
        );

        let err = load(text).unwrap_err();
        let is_violation = matches!(err, SeedError::SchemaViolation { .. });
        prop_assert!(is_violation);
    }
}
