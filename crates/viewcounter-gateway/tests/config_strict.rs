#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use viewcounter_gateway::config::{self, BackendConfig, RouteMode};
use viewcounter_gateway::storage;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8787"
  request_timout_ms: 500 # typo should fail
backend:
  kind: memory
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn deny_unknown_backend_fields() {
    let bad = r#"
version: 1
backend:
  kind: redis
  url: "redis://127.0.0.1:6379"
  prefix: "views:" # key_prefix is the real name
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
backend:
  kind: memory
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8787");
    assert_eq!(cfg.server.request_timeout_ms, 10000);
    assert_eq!(cfg.server.routes, RouteMode::Full);
    assert!(matches!(cfg.backend, BackendConfig::Memory));
}

#[test]
fn backend_defaults_are_filled() {
    let ok = r#"
version: 1
server:
  routes: single
backend:
  kind: postgrest
  url: "https://project.supabase.co"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.routes, RouteMode::Single);
    match cfg.backend {
        BackendConfig::Postgrest { table, increment_fn, api_key_env, timeout_ms, .. } => {
            assert_eq!(table, "view_counts");
            assert_eq!(increment_fn, "increment_view");
            assert_eq!(api_key_env, "SUPABASE_ANON_KEY");
            assert_eq!(timeout_ms, 5000);
        }
        other => panic!("unexpected backend: {other:?}"),
    }
}

#[test]
fn redis_prefix_defaults_to_views() {
    let cfg = config::load_from_str(
        r#"
version: 1
backend: { kind: redis, url: "redis://localhost:6379" }
"#,
    )
    .unwrap();
    match cfg.backend {
        BackendConfig::Redis { key_prefix, .. } => assert_eq!(key_prefix, "views:"),
        other => panic!("unexpected backend: {other:?}"),
    }
}

#[test]
fn rejects_bad_values() {
    let cases = [
        // unsupported version
        "version: 2\nbackend: { kind: memory }\n",
        // backend is mandatory
        "version: 1\n",
        // unknown backend kind
        "version: 1\nbackend: { kind: dynamo }\n",
        // listen must be a SocketAddr
        "version: 1\nserver: { listen: \"localhost\" }\nbackend: { kind: memory }\n",
        // timeout out of range
        "version: 1\nserver: { request_timeout_ms: 5 }\nbackend: { kind: memory }\n",
        // redis url scheme
        "version: 1\nbackend: { kind: redis, url: \"http://localhost\" }\n",
        // empty kv ids
        "version: 1\nbackend: { kind: cloudflare_kv, account_id: \"\", namespace_id: \"ns\" }\n",
    ];
    for c in cases {
        assert!(config::load_from_str(c).is_err(), "must fail: {c}");
    }
}

#[tokio::test]
async fn memory_backend_opens() {
    let cfg = config::load_from_str("version: 1\nbackend: { kind: memory }\n").unwrap();
    let store = storage::open_store(&cfg.backend).await.unwrap();
    assert_eq!(store.backend_id(), "memory");
}

#[tokio::test]
async fn missing_credential_is_a_config_error() {
    let cfg = config::load_from_str(
        r#"
version: 1
backend:
  kind: cloudflare_kv
  account_id: "acc"
  namespace_id: "ns"
  api_token_env: VIEWCOUNTER_TEST_TOKEN_THAT_IS_NEVER_SET
"#,
    )
    .unwrap();

    let err = storage::open_store(&cfg.backend).await.err().expect("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert!(err.to_string().contains("VIEWCOUNTER_TEST_TOKEN_THAT_IS_NEVER_SET"));
}
