use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use storefront_cli::commands::filter::FilterArgs;
use storefront_cli::commands::replay::ReplayArgs;
use storefront_cli::commands::{config, doctor, extract, filter, packet, replay};
use tempfile::TempDir;

#[test]
fn extract_reports_filters_from_agent_text() {
    let result = extract::run("Here are some cameras under 5000 rupees.");
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "extract");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["data"]["search_term"], "cameras");
    assert_eq!(payload["data"]["max_price"], 5000);
    assert_eq!(payload["data"]["clear_all"], false);
}

#[test]
fn extract_rejects_blank_text() {
    let result = extract::run("   ");
    assert_eq!(result.exit_code, 3, "expected input failure code");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "invalid_input");
}

#[test]
fn packet_decodes_full_state_or_reports_missing_tag() {
    let decoded = packet::run("Done. [FILTER:category=smart-home&sort_by=rating_desc]");
    assert_eq!(decoded.exit_code, 0);
    let payload = parse_payload(&decoded.output);
    assert_eq!(payload["data"]["category"], "smart-home");
    assert_eq!(payload["data"]["sort_by"], "rating_desc");
    assert_eq!(payload["data"]["search_term"], Value::Null);

    let untagged = packet::run("just chatting");
    assert_eq!(untagged.exit_code, 0);
    let payload = parse_payload(&untagged.output);
    assert_eq!(payload["status"], "ok");
    assert!(payload.get("data").is_none());
}

#[test]
fn filter_applies_category_and_sort_to_builtin_catalog() {
    with_env(&[], || {
        let result = filter::run(FilterArgs {
            category: Some("smart-home".to_string()),
            sort: Some("price_asc".to_string()),
            ..FilterArgs::default()
        });
        assert_eq!(result.exit_code, 0, "expected filter success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "Showing 5 of 22 products");
        let ids: Vec<&str> = payload["data"]["products"]
            .as_array()
            .expect("products array")
            .iter()
            .filter_map(|product| product["id"].as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["alexa-smart-plug", "smart-switch", "philips-hue", "nest-thermostat", "smart-lock"]
        );
        assert_eq!(payload["data"]["summary"]["headline"], "Filtered Results");
        assert_eq!(payload["data"]["summary"]["filtered"], true);
        assert_eq!(payload["data"]["summary"]["sort_label"], "Price: Low to High");
    });
}

#[test]
fn filter_reports_missing_catalog_file() {
    with_env(&[], || {
        let temp_dir = TempDir::new().expect("temp dir");
        let result = filter::run(FilterArgs {
            catalog: Some(temp_dir.path().join("missing.json")),
            ..FilterArgs::default()
        });
        assert_eq!(result.exit_code, 4, "expected catalog failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "filter");
        assert_eq!(payload["error_class"], "catalog_unavailable");
    });
}

#[test]
fn filter_returns_config_failure_for_invalid_env() {
    with_env(&[("STOREFRONT_SERVER_PORT", "not-a-port")], || {
        let result = filter::run(FilterArgs::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn replay_runs_events_through_one_session() {
    with_env(&[], || {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("session.jsonl");
        let lines = [
            r#"{"kind":"transcript","id":"m1","text":"Here are some cameras under 5000 rupees.","is_from_agent":true}"#,
            r#"{"kind":"data","topic":"chat","payload":"[FILTER:category=smart-home&sort_by=price_asc]"}"#,
            "",
            r#"{"kind":"transcript","id":"m2","text":"ok","is_from_agent":true}"#,
        ];
        fs::write(&path, lines.join("\n")).expect("write replay file");

        let result = replay::run(ReplayArgs { transcript: path, catalog: None });
        assert_eq!(result.exit_code, 0, "expected replay success: {}", result.output);

        let payload = parse_payload(&result.output);
        let steps = payload["data"]["steps"].as_array().expect("steps array");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["kind"], "transcript");
        assert_eq!(steps[0]["outcome"]["decision"]["decision"], "process");
        assert_eq!(steps[0]["outcome"]["change"], "updated");
        assert_eq!(steps[1]["outcome"]["outcome"], "applied");
        assert_eq!(steps[2]["line"], 4);
        assert_eq!(steps[2]["outcome"]["decision"]["reason"], "too_short");

        assert_eq!(payload["data"]["filters"]["category"], "smart-home");
        assert_eq!(payload["data"]["filters"]["search_term"], Value::Null);
        assert_eq!(payload["data"]["products"][0]["id"], "alexa-smart-plug");
    });
}

#[test]
fn replay_reports_the_bad_line() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("broken.jsonl");
    fs::write(&path, "{\"kind\":\"clear\"}\n{\"kind\":\"teleport\"}\n").expect("write replay file");

    let result = replay::run(ReplayArgs { transcript: path, catalog: None });
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "invalid_input");
    assert!(payload["message"].as_str().unwrap_or_default().starts_with("line 2:"));
}

#[test]
fn config_attributes_env_and_default_sources() {
    with_env(&[("STOREFRONT_SERVER_PORT", "9090"), ("STOREFRONT_LOG_LEVEL", "debug")], || {
        let output = config::run();
        assert!(output.contains("- server.port = 9090 (source: env (STOREFRONT_SERVER_PORT))"));
        assert!(output.contains("- logging.level = debug (source: env (STOREFRONT_LOG_LEVEL))"));
        assert!(output.contains("- catalog.path = <unset> (source: default)"));
        assert!(output.contains("- session.min_growth_chars = 30 (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("STOREFRONT_CATALOG_FETCH_TIMEOUT_SECS", "0")], || {
        assert!(config::run().starts_with("config validation failed:"));
    });
}

#[test]
fn doctor_passes_with_builtin_catalog() {
    with_env(&[], || {
        let report: Value = serde_json::from_str(&doctor::run(true)).expect("doctor json");
        assert_eq!(report["overall_status"], "pass");

        let names: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, vec!["config_validation", "catalog_availability", "extractor_self_test"]);
    });
}

#[test]
fn doctor_skips_catalog_when_config_fails() {
    with_env(&[("STOREFRONT_LOGGING_LEVEL", "loud")], || {
        let output = doctor::run(false);
        assert!(output.starts_with("doctor: one or more readiness checks failed"));
        assert!(output.contains("- [fail] config_validation:"));
        assert!(output.contains("- [skip] catalog_availability:"));
        assert!(output.contains("- [ok] extractor_self_test:"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STOREFRONT_CATALOG_PATH",
        "STOREFRONT_CATALOG_URL",
        "STOREFRONT_CATALOG_FETCH_TIMEOUT_SECS",
        "STOREFRONT_SESSION_MIN_MESSAGE_CHARS",
        "STOREFRONT_SESSION_COMPLETE_MESSAGE_CHARS",
        "STOREFRONT_SESSION_MIN_GROWTH_CHARS",
        "STOREFRONT_SERVER_BIND_ADDRESS",
        "STOREFRONT_SERVER_PORT",
        "STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "STOREFRONT_LOGGING_LEVEL",
        "STOREFRONT_LOGGING_FORMAT",
        "STOREFRONT_LOG_LEVEL",
        "STOREFRONT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
