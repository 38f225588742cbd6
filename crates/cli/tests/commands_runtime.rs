use std::io::{Cursor, Write};
use std::sync::{Mutex, OnceLock};

use doorstep_cli::commands::estimate::drive_wizard;
use doorstep_cli::commands::{config as config_cmd, doctor, services};
use doorstep_core::config::{LoadOptions, SiteConfig};
use doorstep_core::InMemorySubmissionSink;
use serde_json::Value;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn with_env<F: FnOnce()>(vars: &[(&str, &str)], body: F) {
    let _guard = env_lock().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    body();
    for (key, _) in vars {
        std::env::remove_var(key);
    }
}

fn demo_config() -> SiteConfig {
    SiteConfig::load(LoadOptions {
        config_path: Some("no-such-file.toml".into()),
        require_file: false,
        ..LoadOptions::default()
    })
    .expect("demo defaults are valid")
}

#[test]
fn wizard_happy_path_submits_and_shows_the_band() {
    with_env(&[], || {
        let config = demo_config();
        let sink = InMemorySubmissionSink::default();
        // pants, hemming, rush, then contact details with no email.
        let script = "1\n1\n3\nJune Kim\n(914) 555-0101\n\n";
        let mut input = Cursor::new(script);
        let mut output = Vec::new();

        let record =
            drive_wizard(&config, Some("alterations"), &mut input, &mut output, &sink)
                .expect("scripted run completes")
                .expect("wizard reached submission");

        let rendered = String::from_utf8(output).expect("utf8 output");
        assert!(rendered.contains("Estimated range: $38 - $113"), "rendered: {rendered}");
        assert!(rendered.contains("Thank you!"), "rendered: {rendered}");

        assert_eq!(record.contact.name, "June Kim");
        assert_eq!(record.contact.email, None);
        assert_eq!(record.answers.len(), 3);
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].id, record.id);
    });
}

#[test]
fn wizard_reprompts_required_questions_and_survives_walkaway() {
    with_env(&[], || {
        let config = demo_config();
        let sink = InMemorySubmissionSink::default();
        // Blank on a required question forces a reprompt; input then ends at
        // the contact step, so nothing is submitted.
        let script = "\n1\n1\n3\n";
        let mut input = Cursor::new(script);
        let mut output = Vec::new();

        let outcome = drive_wizard(&config, Some("alterations"), &mut input, &mut output, &sink)
            .expect("scripted run completes");

        assert!(outcome.is_none());
        let rendered = String::from_utf8(output).expect("utf8 output");
        assert!(rendered.contains("This one is required."), "rendered: {rendered}");
        assert!(sink.records().is_empty());
    });
}

#[test]
fn wizard_back_keyword_returns_to_questions_with_answers_kept() {
    with_env(&[], || {
        let config = demo_config();
        let sink = InMemorySubmissionSink::default();
        // Answer everything, type `back` at the name prompt, keep every
        // answer by pressing Enter, then finish the contact form.
        let script = "1\n1\n3\nback\n\n\n\nJune Kim\n(914) 555-0101\njune@example.com\n";
        let mut input = Cursor::new(script);
        let mut output = Vec::new();

        let record =
            drive_wizard(&config, Some("alterations"), &mut input, &mut output, &sink)
                .expect("scripted run completes")
                .expect("wizard reached submission after going back");

        assert_eq!(record.answers.len(), 3);
        assert_eq!(record.contact.email.as_deref(), Some("june@example.com"));
    });
}

#[test]
fn services_lists_bands_and_question_counts() {
    with_env(&[], || {
        let output = services::run(Some("no-such-file.toml".into()));

        assert!(output.contains("Chase Cleaners & Tailor"), "output: {output}");
        assert!(output.contains("alterations"), "output: {output}");
        assert!(output.contains("$25-$75 base"), "output: {output}");
        assert!(output.contains("3 questions"), "output: {output}");
    });
}

#[test]
fn doctor_reports_pass_in_json() {
    with_env(&[], || {
        let output = doctor::run(Some("no-such-file.toml".into()), true);
        let payload: Value = serde_json::from_str(&output).expect("doctor emits valid json");

        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().expect("checks array");
        assert!(checks.iter().any(|check| check["name"] == "config_validation"));
        assert!(checks
            .iter()
            .any(|check| check["name"] == "estimate_smoke" && check["status"] == "pass"));
    });
}

#[test]
fn config_command_attributes_file_backed_fields() {
    with_env(&[], || {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        file.write_all(b"[logging]\nlevel = \"debug\"\n").expect("write config");

        let output = config_cmd::run(Some(file.path().to_path_buf()));

        assert!(output.contains("logging.level = debug"), "output: {output}");
        assert!(output.contains("[file:"), "output: {output}");
        assert!(output.contains("meta.site_name = Chase Cleaners & Tailor  [default]"), "output: {output}");
    });
}

#[test]
fn config_command_attributes_env_overrides() {
    with_env(&[("DOORSTEP_LOG_LEVEL", "warn")], || {
        let output = config_cmd::run(None);

        assert!(output.contains("logging.level = warn"), "output: {output}");
        assert!(output.contains("[env:DOORSTEP_LOG_LEVEL]"), "output: {output}");
    });
}
