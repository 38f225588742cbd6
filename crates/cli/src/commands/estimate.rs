use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use doorstep_core::config::{LoadOptions, SiteConfig};
use doorstep_core::{
    ContactDraft, EstimatorSession, Question, Service, ServiceId, SubmissionError,
    SubmissionRecord, SubmissionSink, SubmitError, WizardPhase, WizardTransitionError,
};

use crate::commands::CommandResult;

pub struct EstimateArgs {
    pub service: Option<String>,
    pub config: Option<PathBuf>,
}

/// Stands in for the site's notification hook. A deployment would forward
/// the record to email or a CRM; here it lands in the structured log.
pub struct LoggedSubmissionSink;

impl SubmissionSink for LoggedSubmissionSink {
    fn deliver(&self, record: &SubmissionRecord) -> Result<(), SubmissionError> {
        let payload = serde_json::to_string(record)
            .map_err(|error| SubmissionError::Delivery(error.to_string()))?;
        tracing::info!(
            event_name = "estimator.submission_received",
            service_id = %record.service_id.0,
            payload = %payload,
            "estimate request captured"
        );
        Ok(())
    }
}

pub fn run(args: EstimateArgs) -> CommandResult {
    let config = match SiteConfig::load(LoadOptions {
        config_path: args.config.clone(),
        require_file: args.config.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("estimate", "config_validation", error.to_string(), 2);
        }
    };
    crate::init_logging(&config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = drive_wizard(
        &config,
        args.service.as_deref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
        &LoggedSubmissionSink,
    );

    match outcome {
        Ok(Some(record)) => {
            CommandResult::success("estimate", format!("estimate request {} submitted", record.id.0))
        }
        Ok(None) => CommandResult::success("estimate", "wizard closed without submitting"),
        Err(error) => CommandResult::failure("estimate", "wizard_io", error.to_string(), 1),
    }
}

enum ContactStep {
    Draft(ContactDraft),
    Back,
    Closed,
}

/// Terminal rendition of the estimator widget: collect answers, show the
/// band, capture contact details, deliver to the sink. Returns `None` when
/// the user walks away before submitting.
pub fn drive_wizard<R: BufRead, W: Write>(
    config: &SiteConfig,
    service_id: Option<&str>,
    input: &mut R,
    output: &mut W,
    sink: &dyn SubmissionSink,
) -> Result<Option<SubmissionRecord>> {
    let Some(service) = select_service(config, service_id, input, output)? else {
        return Ok(None);
    };

    let mut session =
        EstimatorSession::for_service(&service, &config.catalog, config.estimator.settings());
    writeln!(output, "\n{}: answer a few quick questions for an estimated price range.", service.name)?;

    loop {
        match session.phase() {
            WizardPhase::Collecting => {
                if !collect_answers(&mut session, input, output)? {
                    return Ok(None);
                }
                if let Err(error) = session.advance() {
                    writeln!(output, "{error}")?;
                    continue;
                }
                render_estimate(&session, output)?;
            }
            WizardPhase::ContactCapture => match read_contact(session.contact(), input, output)? {
                ContactStep::Closed => return Ok(None),
                ContactStep::Back => {
                    session.retreat()?;
                }
                ContactStep::Draft(draft) => match session.submit(draft, sink) {
                    Ok(record) => {
                        let id = record.id.0;
                        writeln!(output, "\nThank you! We received your request for {}.", service.name)?;
                        writeln!(output, "We'll contact you shortly with a detailed quote. (ref {id})")?;
                    }
                    Err(SubmitError::Transition(WizardTransitionError::MissingContactFields {
                        missing,
                    })) => {
                        writeln!(output, "Still needed: {}.", missing.join(", "))?;
                    }
                    Err(SubmitError::Sink(error)) => {
                        writeln!(output, "{error}")?;
                        writeln!(output, "Your answers are saved; submit again when ready.")?;
                    }
                    Err(error) => return Err(error.into()),
                },
            },
            WizardPhase::Submitted => return Ok(session.submission().cloned()),
        }
    }
}

fn select_service<R: BufRead, W: Write>(
    config: &SiteConfig,
    requested: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Service>> {
    if let Some(requested) = requested {
        if let Some(service) = config.service(requested) {
            return Ok(Some(service.clone()));
        }
        // Unrecognized ids still work: the catalog serves its default
        // question set and no price basis is assumed.
        return Ok(Some(Service {
            id: ServiceId(requested.to_owned()),
            name: requested.to_owned(),
            slug: requested.to_owned(),
            description: String::new(),
            featured: false,
            pricing: None,
        }));
    }

    writeln!(output, "What do you need?")?;
    for (index, service) in config.services.iter().enumerate() {
        writeln!(output, "  {}. {}", index + 1, service.name)?;
    }
    loop {
        write!(output, "Choose a service [1-{}]: ", config.services.len())?;
        output.flush()?;
        let Some(line) = read_line(input)? else { return Ok(None) };
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<usize>() {
            Ok(choice) if (1..=config.services.len()).contains(&choice) => {
                return Ok(Some(config.services[choice - 1].clone()));
            }
            _ => writeln!(output, "Enter a number between 1 and {}.", config.services.len())?,
        }
    }
}

fn collect_answers<R: BufRead, W: Write>(
    session: &mut EstimatorSession,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let questions = session.questions().to_vec();
    for (index, question) in questions.iter().enumerate() {
        let marker = if question.required { " *" } else { "" };
        writeln!(output, "\n{}. {}{marker}", index + 1, question.prompt)?;
        if question.kind.has_options() {
            for (option_index, option) in question.options.iter().enumerate() {
                writeln!(output, "   {}) {}", option_index + 1, option.label)?;
            }
        } else if let Some(placeholder) = &question.placeholder {
            writeln!(output, "   ({placeholder})")?;
        }

        loop {
            let current = session.answer(&question.id.0).map(str::to_owned);
            match &current {
                Some(value) => write!(output, "> [{value}] ")?,
                None => write!(output, "> ")?,
            }
            output.flush()?;
            let Some(line) = read_line(input)? else { return Ok(false) };

            if line.is_empty() {
                // Enter keeps the current answer, or skips an optional one.
                if current.is_some() || !question.required {
                    break;
                }
                writeln!(output, "This one is required.")?;
                continue;
            }

            let value = if question.kind.has_options() {
                match resolve_option(question, &line) {
                    Some(value) => value,
                    None => {
                        writeln!(output, "Pick one of the numbered options.")?;
                        continue;
                    }
                }
            } else {
                line
            };

            session.set_answer(&question.id.0, value)?;
            break;
        }
    }
    Ok(true)
}

fn resolve_option(question: &Question, line: &str) -> Option<String> {
    if let Ok(choice) = line.parse::<usize>() {
        if (1..=question.options.len()).contains(&choice) {
            return Some(question.options[choice - 1].value.clone());
        }
        return None;
    }
    question.option(line).map(|option| option.value.clone())
}

fn render_estimate<W: Write>(session: &EstimatorSession, output: &mut W) -> Result<()> {
    match session.estimate() {
        Ok(Some(estimate)) => {
            writeln!(output, "\nEstimated range: ${} - ${}", estimate.min, estimate.max)?;
            writeln!(output, "Final price depends on an in-person look at your item.")?;
        }
        Ok(None) => {
            writeln!(output, "\nWe'll confirm pricing once we see your item.")?;
        }
        Err(error) => {
            tracing::warn!(
                event_name = "estimator.estimate_unavailable",
                error = %error,
                "estimate suppressed for this session"
            );
            writeln!(output, "\nNo estimate available right now; we'll quote in person.")?;
        }
    }
    Ok(())
}

fn read_contact<R: BufRead, W: Write>(
    current: &ContactDraft,
    input: &mut R,
    output: &mut W,
) -> Result<ContactStep> {
    writeln!(output, "\nAlmost there! Enter your details (type `back` to revise answers).")?;

    let Some(name) = prompt_field(input, output, "Name *", &current.name)? else {
        return Ok(ContactStep::Closed);
    };
    if name.eq_ignore_ascii_case("back") {
        return Ok(ContactStep::Back);
    }

    let Some(phone) = prompt_field(input, output, "Phone *", &current.phone)? else {
        return Ok(ContactStep::Closed);
    };
    if phone.eq_ignore_ascii_case("back") {
        return Ok(ContactStep::Back);
    }

    let email_default = current.email.clone().unwrap_or_default();
    let Some(email) = prompt_field(input, output, "Email (optional)", &email_default)? else {
        return Ok(ContactStep::Closed);
    };
    if email.eq_ignore_ascii_case("back") {
        return Ok(ContactStep::Back);
    }

    Ok(ContactStep::Draft(ContactDraft {
        name,
        phone,
        email: (!email.is_empty()).then_some(email),
    }))
}

fn prompt_field<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    if current.is_empty() {
        write!(output, "{label}: ")?;
    } else {
        write!(output, "{label} [{current}]: ")?;
    }
    output.flush()?;
    let Some(line) = read_line(input)? else { return Ok(None) };
    Ok(Some(if line.is_empty() { current.to_owned() } else { line }))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}
