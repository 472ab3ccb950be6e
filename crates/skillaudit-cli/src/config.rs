use crate::cli::Cli;
use serde::Deserialize;
use skillaudit_analysis::default_contexts;
use skillaudit_logging::LogFormat;
use skillaudit_report::AuditPaths;
use skillaudit_types::ExecutionContext;
use std::env;
use std::path::{Path, PathBuf};

/// Built-in defaults, the lowest configuration layer
pub const DEFAULT_CONFIG: &str = r#"
[paths]
skills_dir = "skills"
output_dir = "reports"
templates_dir = "templates"

[analysis]
workers = 1  # >1 scores duplicity pairs on that many threads

[logging]
level = "info"  # trace, debug, info, warn, error
format = "text"  # text or json
"#;

/// Environment variable prefix; `SKILLAUDIT__PATHS__SKILLS_DIR` sets `paths.skills_dir`
const ENV_PREFIX: &str = "SKILLAUDIT";

/// Convenience variables and the keys they override
const CONVENIENCE_VARS: [(&str, &str); 3] = [
    ("SKILLS_DIR", "paths.skills_dir"),
    ("REPORTS_DIR", "paths.output_dir"),
    ("TEMPLATES_DIR", "paths.templates_dir"),
];

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    pub skills_dir: PathBuf,
    pub output_dir: PathBuf,
    pub templates_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub paths: PathsConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
    /// Replaces the default execution-context table when non-empty
    #[serde(default)]
    pub contexts: Vec<ExecutionContext>,
}

impl Config {
    /// Get the global config path: ~/.skillaudit/skillaudit.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillaudit").join("skillaudit.toml"))
    }

    /// Load configuration with layered approach:
    /// 1. Built-in defaults
    /// 2. Global config: ~/.skillaudit/skillaudit.toml (optional)
    /// 3. `explicit` file if given (required), otherwise ./skillaudit.toml (optional)
    /// 4. Environment variables (SKILLAUDIT__ prefix, then the convenience variables)
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let overrides = CONVENIENCE_VARS
            .iter()
            .filter_map(|(var, key)| env::var(var).ok().map(|value| (*key, value)))
            .collect::<Vec<_>>();

        Self::build(
            Self::global_config_path().as_deref(),
            explicit,
            config::Environment::with_prefix(ENV_PREFIX).separator("__"),
            &overrides,
        )
    }

    fn build(
        global: Option<&Path>,
        explicit: Option<&Path>,
        environment: config::Environment,
        overrides: &[(&str, String)],
    ) -> anyhow::Result<Self> {
        // Later sources override earlier ones
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if let Some(global) = global {
            builder = builder.add_source(config::File::from(global).required(false));
        }

        builder = match explicit {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("skillaudit").required(false)),
        };

        builder = builder.add_source(environment);

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Command-line flags win over every file and environment layer
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.skills_dir {
            self.paths.skills_dir.clone_from(dir);
        }
        if let Some(dir) = &cli.output_dir {
            self.paths.output_dir.clone_from(dir);
        }
        if let Some(dir) = &cli.templates_dir {
            self.paths.templates_dir.clone_from(dir);
        }
        if let Some(workers) = cli.workers {
            self.analysis.workers = workers;
        }
    }

    /// Configured contexts, or the default table when none are configured
    pub fn execution_contexts(&self) -> Vec<ExecutionContext> {
        if self.contexts.is_empty() {
            default_contexts()
        } else {
            self.contexts.clone()
        }
    }

    pub fn audit_paths(&self) -> AuditPaths {
        AuditPaths {
            skills_dir: self.paths.skills_dir.clone(),
            templates_dir: self.paths.templates_dir.clone(),
            output_dir: self.paths.output_dir.clone(),
        }
    }
}
