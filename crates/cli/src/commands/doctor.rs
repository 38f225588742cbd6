use std::path::PathBuf;

use doorstep_core::config::{LoadOptions, SiteConfig};
use doorstep_core::EstimatorSession;
use serde::Serialize;

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

pub fn run(config_path: Option<PathBuf>, json_output: bool) -> String {
    let report = build_report(config_path);

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

fn build_report(config_path: Option<PathBuf>) -> DoctorReport {
    let mut checks = Vec::new();

    match SiteConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_coverage(&config));
            checks.push(check_estimate_smoke(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_coverage",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "estimate_smoke",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let failed = checks.iter().filter(|check| check.status == CheckStatus::Fail).count();
    let passed = checks.iter().filter(|check| check.status == CheckStatus::Pass).count();
    DoctorReport {
        overall_status: if failed == 0 { CheckStatus::Pass } else { CheckStatus::Fail },
        summary: format!("{passed} of {} checks passed", checks.len()),
        checks,
    }
}

fn check_catalog_coverage(config: &SiteConfig) -> DoctorCheck {
    let dedicated = config
        .services
        .iter()
        .filter(|service| config.catalog.has_entry(&service.id.0))
        .count();
    DoctorCheck {
        name: "catalog_coverage",
        status: CheckStatus::Pass,
        details: format!(
            "{dedicated} of {} services have dedicated question sets; the rest use the default entry",
            config.services.len()
        ),
    }
}

// Runs a priced service through the answer/estimate path end to end.
fn check_estimate_smoke(config: &SiteConfig) -> DoctorCheck {
    let Some(service) = config.services.iter().find(|service| service.base_range().is_some())
    else {
        return DoctorCheck {
            name: "estimate_smoke",
            status: CheckStatus::Skipped,
            details: "no configured service carries a price basis".to_string(),
        };
    };

    let mut session =
        EstimatorSession::for_service(service, &config.catalog, config.estimator.settings());
    for question in session.questions().to_vec() {
        if !question.required {
            continue;
        }
        let value = match question.options.first() {
            Some(option) => option.value.clone(),
            None => "sample".to_string(),
        };
        if session.set_answer(&question.id.0, value).is_err() {
            return DoctorCheck {
                name: "estimate_smoke",
                status: CheckStatus::Fail,
                details: "session refused an answer while collecting".to_string(),
            };
        }
    }

    match session.estimate() {
        Ok(Some(estimate)) => DoctorCheck {
            name: "estimate_smoke",
            status: CheckStatus::Pass,
            details: format!("{}: ${} - ${}", service.id.0, estimate.min, estimate.max),
        },
        Ok(None) => DoctorCheck {
            name: "estimate_smoke",
            status: CheckStatus::Fail,
            details: "priced service produced no estimate".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "estimate_smoke",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines =
        vec![format!("doctor: {} ({})", status_label(report.overall_status), report.summary)];
    for check in &report.checks {
        lines.push(format!(
            "  [{}] {}: {}",
            status_label(check.status),
            check.name,
            check.details
        ));
    }
    lines.join("\n")
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Fail => "fail",
        CheckStatus::Skipped => "skipped",
    }
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
