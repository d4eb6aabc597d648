use serde::Serialize;
use storefront_core::config::{AppConfig, CatalogSource, LoadOptions};
use storefront_core::{FilterExtractor, SortOrder};

use crate::commands::block_on_catalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_availability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_extractor());

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let source = match config.catalog.source() {
        CatalogSource::Builtin => "bundled catalog".to_string(),
        CatalogSource::File(path) => format!("`{}`", path.display()),
        CatalogSource::Remote(url) => format!("`{url}`"),
    };

    match block_on_catalog(config) {
        Ok(catalog) if catalog.is_empty() => DoctorCheck {
            name: "catalog_availability",
            status: CheckStatus::Fail,
            details: format!("{source} contains no valid products"),
        },
        Ok(catalog) => DoctorCheck {
            name: "catalog_availability",
            status: CheckStatus::Pass,
            details: format!(
                "{source} loaded with {} products in {} categories",
                catalog.len(),
                catalog.categories().len()
            ),
        },
        Err(error) => {
            DoctorCheck { name: "catalog_availability", status: CheckStatus::Fail, details: error }
        }
    }
}

/// Runs one known sentence through the extractor and compares the result.
fn check_extractor() -> DoctorCheck {
    let extracted =
        FilterExtractor::new().extract("Here are the cheapest cameras under 5000 rupees.");
    let ok = extracted.search_term.as_deref() == Some("cameras")
        && extracted.max_price == Some(5000)
        && extracted.sort_by == Some(SortOrder::PriceAsc);

    DoctorCheck {
        name: "extractor_self_test",
        status: if ok { CheckStatus::Pass } else { CheckStatus::Fail },
        details: if ok {
            "sample sentence produced the expected filters".to_string()
        } else {
            format!("unexpected extraction result: {extracted:?}")
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
