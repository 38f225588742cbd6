use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, Question, QuestionCatalog};
use crate::domain::service::{Service, ServiceId, ServicePricing};
use crate::pricing::{Composition, EstimateSettings};

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub meta: MetaConfig,
    pub contact: ContactConfig,
    pub services: Vec<Service>,
    pub estimator: EstimatorConfig,
    pub logging: LoggingConfig,
    pub catalog: QuestionCatalog,
}

#[derive(Clone, Debug)]
pub struct MetaConfig {
    pub site_name: String,
    pub tagline: String,
}

#[derive(Clone, Debug)]
pub struct ContactConfig {
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct EstimatorConfig {
    pub composition: Composition,
    pub multiplier_floor: Decimal,
}

impl EstimatorConfig {
    pub fn settings(&self) -> EstimateSettings {
        EstimateSettings {
            composition: self.composition,
            multiplier_floor: self.multiplier_floor,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub composition: Option<Composition>,
    pub multiplier_floor: Option<Decimal>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                site_name: "Chase Cleaners & Tailor".to_string(),
                tagline: "Expert Care for Your Garments".to_string(),
            },
            contact: ContactConfig {
                phone: "(914) 966-9678".to_string(),
                email: "info@chasecleaners.com".to_string(),
            },
            services: demo_services(),
            estimator: EstimatorConfig {
                composition: Composition::Additive,
                multiplier_floor: Decimal::new(1, 1),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            catalog: QuestionCatalog::builtin(),
        }
    }
}

fn demo_services() -> Vec<Service> {
    let service = |id: &str, name: &str, description: &str, featured, pricing| Service {
        id: ServiceId(id.to_string()),
        name: name.to_string(),
        slug: id.to_string(),
        description: description.to_string(),
        featured,
        pricing,
    };

    vec![
        service(
            "alterations",
            "Tailoring & Alterations",
            "Expert alterations from simple hems to complex tailoring.",
            true,
            Some(ServicePricing::Starting { amount: Decimal::from(25) }),
        ),
        service(
            "dry-cleaning",
            "Dry Cleaning",
            "Professional cleaning for everyday garments and delicates.",
            true,
            Some(ServicePricing::Starting { amount: Decimal::from(8) }),
        ),
        service(
            "wedding-gowns",
            "Wedding Gown Care",
            "Cleaning, alterations, and preservation for wedding gowns.",
            true,
            Some(ServicePricing::Quote),
        ),
        service(
            "suits-tuxedos",
            "Suits & Tuxedos",
            "Cleaning, pressing, and tailoring for suits and formalwear.",
            false,
            Some(ServicePricing::Starting { amount: Decimal::from(40) }),
        ),
        service(
            "leather-suede",
            "Leather & Suede",
            "Specialty cleaning and conditioning for leather goods.",
            false,
            Some(ServicePricing::Quote),
        ),
        service(
            "household",
            "Household Items",
            "Comforters, drapes, linens, and other household textiles.",
            false,
            Some(ServicePricing::Starting { amount: Decimal::from(30) }),
        ),
    ]
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    meta: Option<MetaPatch>,
    contact: Option<ContactPatch>,
    services: Option<Vec<Service>>,
    estimator: Option<EstimatorPatch>,
    logging: Option<LoggingPatch>,
    catalog: Option<BTreeMap<String, Vec<Question>>>,
}

#[derive(Debug, Deserialize)]
struct MetaPatch {
    site_name: Option<String>,
    tagline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactPatch {
    phone: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EstimatorPatch {
    composition: Option<Composition>,
    multiplier_floor: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl std::str::FromStr for Composition {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "multiplicative" => Ok(Self::Multiplicative),
            other => Err(ConfigError::Validation(format!(
                "unsupported composition `{other}` (expected additive|multiplicative)"
            ))),
        }
    }
}

impl SiteConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("doorstep.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id.0 == service_id)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(meta) = patch.meta {
            if let Some(site_name) = meta.site_name {
                self.meta.site_name = site_name;
            }
            if let Some(tagline) = meta.tagline {
                self.meta.tagline = tagline;
            }
        }

        if let Some(contact) = patch.contact {
            if let Some(phone) = contact.phone {
                self.contact.phone = phone;
            }
            if let Some(email) = contact.email {
                self.contact.email = email;
            }
        }

        if let Some(services) = patch.services {
            self.services = services;
        }

        if let Some(estimator) = patch.estimator {
            if let Some(composition) = estimator.composition {
                self.estimator.composition = composition;
            }
            if let Some(multiplier_floor) = estimator.multiplier_floor {
                self.estimator.multiplier_floor = multiplier_floor;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(entries) = patch.catalog {
            self.catalog = self.catalog.clone().with_overrides(entries)?;
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DOORSTEP_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("DOORSTEP_LOG_FORMAT") {
            self.logging.format = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "DOORSTEP_LOG_FORMAT".to_string(),
                value,
            })?;
        }
        if let Some(value) = read_env("DOORSTEP_COMPOSITION") {
            self.estimator.composition =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "DOORSTEP_COMPOSITION".to_string(),
                    value,
                })?;
        }
        if let Some(value) = read_env("DOORSTEP_MULTIPLIER_FLOOR") {
            self.estimator.multiplier_floor =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "DOORSTEP_MULTIPLIER_FLOOR".to_string(),
                    value,
                })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(composition) = overrides.composition {
            self.estimator.composition = composition;
        }
        if let Some(multiplier_floor) = overrides.multiplier_floor {
            self.estimator.multiplier_floor = multiplier_floor;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.estimator.multiplier_floor <= Decimal::ZERO {
            return Err(ConfigError::Validation(
                "estimator.multiplier_floor must be positive".to_string(),
            ));
        }

        let mut seen_ids = std::collections::BTreeSet::new();
        for service in &self.services {
            if service.id.0.trim().is_empty() {
                return Err(ConfigError::Validation("service id must not be empty".to_string()));
            }
            if !seen_ids.insert(service.id.0.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate service id `{}`",
                    service.id.0
                )));
            }
            if service.name.trim().is_empty() || service.slug.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "service `{}` needs a name and a slug",
                    service.id.0
                )));
            }

            match service.pricing {
                Some(ServicePricing::Fixed { amount }) | Some(ServicePricing::Starting { amount })
                    if amount < Decimal::ZERO =>
                {
                    return Err(ConfigError::Validation(format!(
                        "service `{}` has a negative price amount",
                        service.id.0
                    )));
                }
                _ => {}
            }

            if let Some(range) = service.base_range() {
                if !range.is_well_formed() {
                    return Err(ConfigError::Validation(format!(
                        "service `{}` derives an inverted price band",
                        service.id.0
                    )));
                }
            }
        }

        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Some(value) = read_env("DOORSTEP_CONFIG") {
        let path = PathBuf::from(value);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from("doorstep.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;

    use crate::pricing::Composition;

    use super::{ConfigError, ConfigOverrides, LoadOptions, LogFormat, SiteConfig};

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

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn default_config_passes_validation() {
        with_env(&[], || {
            let config = SiteConfig::load(LoadOptions::default()).expect("defaults are valid");

            assert_eq!(config.meta.site_name, "Chase Cleaners & Tailor");
            assert_eq!(config.estimator.composition, Composition::Additive);
            assert_eq!(config.estimator.multiplier_floor, Decimal::new(1, 1));
            assert!(config.service("alterations").is_some());
            assert!(config.catalog.has_entry("default"));
        });
    }

    #[test]
    fn file_patch_overrides_logging_estimator_and_catalog() {
        let file = write_config(
            r#"
[logging]
level = "debug"
format = "json"

[estimator]
composition = "multiplicative"
multiplier_floor = 0.25

[catalog]
alterations = [
  { id = "notes", prompt = "Anything else?", kind = "long-text", required = false },
]
"#,
        );

        with_env(&[], || {
            let config = SiteConfig::load(LoadOptions {
                config_path: Some(file.path().to_path_buf()),
                require_file: true,
                overrides: ConfigOverrides::default(),
            })
            .expect("patched config is valid");

            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.estimator.composition, Composition::Multiplicative);
            assert_eq!(config.estimator.multiplier_floor, Decimal::new(25, 2));
            assert_eq!(config.catalog.resolve("alterations").len(), 1);
            // Untouched entries survive the override.
            assert_eq!(config.catalog.resolve("dry-cleaning").len(), 3);
        });
    }

    #[test]
    fn invalid_catalog_entry_in_file_is_rejected() {
        let file = write_config(
            r#"
[catalog]
alterations = []
"#,
        );

        with_env(&[], || {
            let error = SiteConfig::load(LoadOptions {
                config_path: Some(file.path().to_path_buf()),
                require_file: true,
                overrides: ConfigOverrides::default(),
            })
            .expect_err("empty catalog entry must fail");

            assert!(matches!(error, ConfigError::Catalog(_)));
        });
    }

    #[test]
    fn missing_required_file_is_reported_with_its_path() {
        with_env(&[], || {
            let error = SiteConfig::load(LoadOptions {
                config_path: Some("does-not-exist.toml".into()),
                require_file: true,
                overrides: ConfigOverrides::default(),
            })
            .expect_err("required file is absent");

            assert!(matches!(error, ConfigError::MissingConfigFile(path) if path.ends_with("does-not-exist.toml")));
        });
    }

    #[test]
    fn env_overrides_apply_and_reject_bad_values() {
        with_env(&[("DOORSTEP_COMPOSITION", "multiplicative")], || {
            let config = SiteConfig::load(LoadOptions::default()).expect("env override applies");
            assert_eq!(config.estimator.composition, Composition::Multiplicative);
        });

        with_env(&[("DOORSTEP_LOG_FORMAT", "yaml")], || {
            let error = SiteConfig::load(LoadOptions::default()).expect_err("bad format");
            assert!(matches!(
                error,
                ConfigError::InvalidEnvOverride { ref key, .. } if key == "DOORSTEP_LOG_FORMAT"
            ));
        });
    }

    #[test]
    fn programmatic_overrides_win_over_env_and_file() {
        with_env(&[("DOORSTEP_LOG_LEVEL", "warn")], || {
            let config = SiteConfig::load(LoadOptions {
                config_path: None,
                require_file: false,
                overrides: ConfigOverrides {
                    log_level: Some("trace".to_string()),
                    ..ConfigOverrides::default()
                },
            })
            .expect("overrides apply last");

            assert_eq!(config.logging.level, "trace");
        });
    }

    #[test]
    fn non_positive_multiplier_floor_fails_validation() {
        with_env(&[], || {
            let error = SiteConfig::load(LoadOptions {
                config_path: None,
                require_file: false,
                overrides: ConfigOverrides {
                    multiplier_floor: Some(Decimal::ZERO),
                    ..ConfigOverrides::default()
                },
            })
            .expect_err("zero floor is invalid");

            assert!(matches!(error, ConfigError::Validation(_)));
        });
    }

    #[test]
    fn duplicate_service_ids_fail_validation() {
        let file = write_config(
            r#"
[[services]]
id = "alterations"
name = "Alterations"
slug = "alterations"
description = "one"

[[services]]
id = "alterations"
name = "Alterations Again"
slug = "alterations-2"
description = "two"
"#,
        );

        with_env(&[], || {
            let error = SiteConfig::load(LoadOptions {
                config_path: Some(file.path().to_path_buf()),
                require_file: true,
                overrides: ConfigOverrides::default(),
            })
            .expect_err("duplicate ids");

            assert!(matches!(error, ConfigError::Validation(message) if message.contains("duplicate service id")));
        });
    }
}
