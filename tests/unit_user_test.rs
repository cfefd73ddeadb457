use chrono::{Datelike, TimeZone, Utc};
use graphdb_seed::seed::{AppSetting, Authority, SettingKey, load};
use serde_json::json;
use strum::IntoEnumIterator;

const FIXTURE: &str = include_str!("../fixtures/users.js");

#[tokio::test]
async fn test_admin_has_every_repository_permission() {
    let (users, _) = load(FIXTURE).unwrap();
    let admin = users.lookup_user("admin").unwrap();
    assert!(admin.is_admin());
    assert!(admin.can_read_repo("pfr"));
    assert!(admin.can_write_repo("any-repo"));
}

#[tokio::test]
async fn test_repository_permissions_from_authorities() {
    let (users, _) = load(FIXTURE).unwrap();
    let pfr = users.lookup_user("pfr").unwrap();
    assert!(!pfr.is_admin());
    assert!(pfr.has_authority("ROLE_USER"));
    assert!(pfr.can_read_repo("pfr"));
    assert!(pfr.can_write_repo("pfr"));
    assert!(!pfr.can_read_repo("other"));

    let mut classified: Vec<_> = pfr.authorities().collect();
    classified.sort_by_key(|a| format!("{a:?}"));
    assert_eq!(
        classified,
        vec![
            Authority::ReadRepo("pfr"),
            Authority::Role("USER"),
            Authority::WriteRepo("pfr"),
        ]
    );
}

#[tokio::test]
async fn test_read_only_user_cannot_write() {
    let source = json!({
        "users": {
            "reader": {
                "username": "reader",
                "password": "{bcrypt}$2a$10$abc",
                "grantedAuthorities": ["READ_REPO_*", "ROLE_USER"],
                "dateCreated": 0
            }
        },
        "user_queries": {}
    });
    let (users, _) = load(source.to_string()).unwrap();
    let reader = users.lookup_user("reader").unwrap();
    assert!(reader.can_read_repo("pfr"));
    assert!(reader.can_read_repo("anything"));
    assert!(!reader.can_write_repo("pfr"));
}

#[tokio::test]
async fn test_example_settings() {
    let (users, _) = load(FIXTURE).unwrap();
    let admin = users.lookup_user("admin").unwrap();
    for setting in AppSetting::iter() {
        let expected = setting != AppSetting::IgnoreSharedQueries;
        assert_eq!(admin.setting(setting), Some(expected), "{setting}");
    }
    assert_eq!(admin.unrecognized_settings().count(), 0);

    // pfr lists the same toggles in a different order; fixture order is kept.
    let pfr = users.lookup_user("pfr").unwrap();
    let order: Vec<_> = pfr
        .app_settings()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "DEFAULT_SAMEAS",
            "DEFAULT_INFERENCE",
            "EXECUTE_COUNT",
            "IGNORE_SHARED_QUERIES",
            "DEFAULT_VIS_GRAPH_SCHEMA"
        ]
    );
}

#[tokio::test]
async fn test_unrecognized_settings_survive_round_trip() {
    let source = json!({
        "users": {
            "a": {
                "username": "a",
                "password": "{bcrypt}$2a$10$abc",
                "grantedAuthorities": [],
                "appSettings": { "DEFAULT_INFERENCE": false, "FUTURE_TOGGLE": true },
                "dateCreated": 5
            }
        },
        "user_queries": {}
    });
    let fixture = graphdb_seed::seed::SeedFixture::from_slice(source.to_string().as_bytes()).unwrap();
    let a = fixture.users().lookup_user("a").unwrap();
    assert_eq!(a.setting(AppSetting::DefaultInference), Some(false));
    assert_eq!(
        a.unrecognized_settings().collect::<Vec<_>>(),
        vec![("FUTURE_TOGGLE", true)]
    );
    assert!(
        a.app_settings()
            .unwrap()
            .iter()
            .any(|(k, _)| *k == SettingKey::Unrecognized("FUTURE_TOGGLE".into()))
    );

    let dumped: serde_json::Value =
        serde_json::from_str(&fixture.to_json_pretty().unwrap()).unwrap();
    assert_eq!(
        dumped["users"]["a"]["appSettings"],
        json!({ "DEFAULT_INFERENCE": false, "FUTURE_TOGGLE": true })
    );
}

#[tokio::test]
async fn test_created_at_from_epoch_millis() {
    let (users, _) = load(FIXTURE).unwrap();
    let admin = users.lookup_user("admin").unwrap();
    let created = admin.created_at().unwrap();
    assert_eq!(created.timestamp_millis(), 1708329238374);
    assert_eq!(created.year(), 2024);
    assert_eq!(
        created.date_naive(),
        Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0)
            .unwrap()
            .date_naive()
    );
}
