// tests/property/generators.rs

//! Strategies producing well-formed fixtures as `serde_json::Value`.

use proptest::collection::{btree_map, btree_set, vec};
use proptest::option;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

const KNOWN_SETTINGS: &[&str] = &[
    "DEFAULT_INFERENCE",
    "DEFAULT_VIS_GRAPH_SCHEMA",
    "DEFAULT_SAMEAS",
    "IGNORE_SHARED_QUERIES",
    "EXECUTE_COUNT",
];

pub fn authority() -> impl Strategy<Value = String> {
    prop_oneof![
        "ROLE_[A-Z]{1,8}",
        "READ_REPO_[a-z0-9_]{1,8}",
        "WRITE_REPO_[a-z0-9_]{1,8}",
    ]
}

fn app_settings() -> impl Strategy<Value = Value> {
    (
        vec(any::<bool>(), KNOWN_SETTINGS.len()),
        btree_map("X_[A-Z_]{1,10}", any::<bool>(), 0..3),
    )
        .prop_map(|(known, extra)| {
            let mut map = Map::new();
            for (name, flag) in KNOWN_SETTINGS.iter().zip(known) {
                map.insert(name.to_string(), Value::Bool(flag));
            }
            for (name, flag) in extra {
                map.insert(name, Value::Bool(flag));
            }
            Value::Object(map)
        })
}

fn user(username: String) -> impl Strategy<Value = Value> {
    (
        "[A-Za-z0-9./$]{8,60}",
        vec(authority(), 0..5),
        option::of(app_settings()),
        0i64..4_102_444_800_000,
    )
        .prop_map(move |(payload, authorities, settings, created)| {
            let mut record = json!({
                "username": username,
                "password": format!("{{bcrypt}}{payload}"),
                "grantedAuthorities": authorities,
                "dateCreated": created
            });
            if let Some(settings) = settings {
                record["appSettings"] = settings;
            }
            record
        })
}

fn queries() -> impl Strategy<Value = Value> {
    btree_map("[^\"\\\\]{1,20}", (".{0,80}", any::<bool>()), 0..4).prop_map(|entries| {
        let mut map = Map::new();
        for (name, (body, shared)) in entries {
            map.insert(
                name.clone(),
                json!({ "name": name, "body": body, "shared": shared }),
            );
        }
        Value::Object(map)
    })
}

/// A fixture whose query owners are always seeded users.
pub fn fixture() -> impl Strategy<Value = Value> {
    btree_set("[a-z][a-z0-9_]{0,11}", 0..5)
        .prop_flat_map(|names| {
            let names: Vec<String> = names.into_iter().collect();
            let users: Vec<_> = names.iter().cloned().map(user).collect();
            let queries: Vec<_> = names.iter().map(|_| queries()).collect();
            (Just(names), users, queries)
        })
        .prop_map(|(names, users, queries)| {
            let mut user_map = Map::new();
            let mut query_map = Map::new();
            for ((name, user), owned) in names.into_iter().zip(users).zip(queries) {
                user_map.insert(name.clone(), user);
                query_map.insert(name, owned);
            }
            json!({ "users": user_map, "user_queries": query_map })
        })
}

/// Counts generated queries with `shared == true`.
pub fn shared_count(fixture: &Value) -> usize {
    fixture["user_queries"]
        .as_object()
        .map(|owners| {
            owners
                .values()
                .flat_map(|queries| queries.as_object().into_iter().flat_map(|m| m.values()))
                .filter(|query| query["shared"] == Value::Bool(true))
                .count()
        })
        .unwrap_or(0)
}
