use std::path::PathBuf;

use doorstep_core::config::{LoadOptions, SiteConfig};

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match SiteConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let mut lines = vec![format!("services configured for {}:", config.meta.site_name)];
    for service in &config.services {
        let band = match service.base_range() {
            Some(range) => format!("${}-${} base", range.min, range.max),
            None => "no estimate band".to_string(),
        };
        let questions = config.catalog.resolve(&service.id.0).len();
        let source = if config.catalog.has_entry(&service.id.0) {
            ""
        } else {
            " (default question set)"
        };
        lines.push(format!(
            "  {:<16} {:<24} {:<16} {} questions{}",
            service.id.0, service.name, band, questions, source
        ));
    }
    lines.join("\n")
}
