// tests/property/roundtrip_test.rs

//! Property-based tests for load / re-serialize round trips

use super::generators::fixture;
use graphdb_seed::seed::SeedFixture;
use proptest::prelude::*;
use serde_json::Value;

/// Authorities are a set on load, so array order is not significant.
fn normalize(mut value: Value) -> Value {
    if let Some(users) = value["users"].as_object_mut() {
        for user in users.values_mut() {
            if let Some(authorities) = user["grantedAuthorities"].as_array_mut() {
                authorities.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
                authorities.dedup();
            }
        }
    }
    value
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_load_serialize_load_roundtrip(source in fixture()) {
        let text = source.to_string();
        let loaded = SeedFixture::from_slice(text.as_bytes()).unwrap();
        let dumped = loaded.to_json_pretty().unwrap();
        let reloaded = SeedFixture::from_slice(dumped.as_bytes()).unwrap();
        prop_assert_eq!(&reloaded, &loaded);

        let reserialized: Value = serde_json::from_str(&dumped).unwrap();
        prop_assert_eq!(normalize(reserialized), normalize(source));
    }

    #[test]
    fn test_credentials_survive_verbatim(source in fixture()) {
        let loaded = SeedFixture::from_slice(source.to_string().as_bytes()).unwrap();
        for user in loaded.users().iter() {
            let original = source["users"][user.username()]["password"].as_str().unwrap();
            prop_assert_eq!(user.credential().as_str(), original);
            prop_assert_eq!(user.credential().scheme(), Some("bcrypt"));
        }
    }
}
