//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{GaExportConfig, JobStoreKind};
use crate::domain::{ExportError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "GA_EXPORT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GaExportConfig
/// 4. Applies environment variable overrides (GA_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ga_export::config::loader::load_config;
///
/// let config = load_config("ga-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GaExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, applying substitution, overrides
/// and validation exactly like [`load_config`]
pub fn parse_config(contents: &str) -> Result<GaExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GaExportConfig = toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ExportError::Configuration(format!(
            "Invalid value '{value}' for environment override {ENV_PREFIX}{key}"
        ))
    })
}

/// Applies environment variable overrides using the GA_EXPORT_* prefix
///
/// Environment variables follow the pattern: GA_EXPORT_<SECTION>_<KEY>
/// For example: GA_EXPORT_EXPORT_WORKERS, GA_EXPORT_DATA_SNAPSHOT_PATH
fn apply_env_overrides(config: &mut GaExportConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT_WORKERS") {
        config.export.workers = parse_override("EXPORT_WORKERS", &val)?;
    }
    if let Some(val) = env_override("EXPORT_QUEUE_CAPACITY") {
        config.export.queue_capacity = parse_override("EXPORT_QUEUE_CAPACITY", &val)?;
    }
    if let Some(val) = env_override("EXPORT_PAGE_SIZE") {
        config.export.page_size = parse_override("EXPORT_PAGE_SIZE", &val)?;
    }
    if let Some(val) = env_override("EXPORT_SINGLE_FILE_DEVICE_LIMIT") {
        config.export.single_file_device_limit =
            parse_override("EXPORT_SINGLE_FILE_DEVICE_LIMIT", &val)?;
    }
    if let Some(val) = env_override("EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // Data overrides
    if let Some(val) = env_override("DATA_SNAPSHOT_PATH") {
        config.data.snapshot_path = val;
    }

    // Job store overrides
    if let Some(val) = env_override("JOBS_STORE") {
        config.jobs.store = match val.trim().to_lowercase().as_str() {
            "memory" => JobStoreKind::Memory,
            "file" => JobStoreKind::File,
            other => {
                return Err(ExportError::Configuration(format!(
                    "Invalid value '{other}' for {ENV_PREFIX}JOBS_STORE. Must be one of: memory, file"
                )))
            }
        };
    }
    if let Some(val) = env_override("JOBS_PATH") {
        config.jobs.path = val;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Environment variables are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL: &str = r#"
[data]
snapshot_path = "assets.json"
"#;

    #[test]
    fn test_substitute_env_vars() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("GA_TEST_SNAPSHOT", "/data/assets.json");
        let result = substitute_env_vars("snapshot_path = \"${GA_TEST_SNAPSHOT}\"").unwrap();
        assert_eq!(result, "snapshot_path = \"/data/assets.json\"");
        std::env::remove_var("GA_TEST_SNAPSHOT");
    }

    #[test]
    fn test_substitute_env_vars_reports_all_missing() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("GA_TEST_MISSING_A");
        std::env::remove_var("GA_TEST_MISSING_B");
        let err = substitute_env_vars("a = \"${GA_TEST_MISSING_A}\"\nb = \"${GA_TEST_MISSING_B}\"")
            .unwrap_err()
            .to_string();
        assert!(err.contains("GA_TEST_MISSING_A"));
        assert!(err.contains("GA_TEST_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# path = \"${GA_TEST_NEVER_SET}\"\nkey = 1";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(ExportError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"
[application]
log_level = "debug"

[export]
workers = 4
single_file_device_limit = 250

[data]
snapshot_path = "assets.json"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.workers, 4);
        assert_eq!(config.export.single_file_device_limit, 250);
        assert_eq!(config.export.queue_capacity, 100);
    }

    #[test]
    fn test_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("GA_EXPORT_EXPORT_WORKERS", "3");
        std::env::set_var("GA_EXPORT_JOBS_STORE", "file");

        let config = parse_config(MINIMAL);

        std::env::remove_var("GA_EXPORT_EXPORT_WORKERS");
        std::env::remove_var("GA_EXPORT_JOBS_STORE");

        let config = config.unwrap();
        assert_eq!(config.export.workers, 3);
        assert_eq!(config.jobs.store, JobStoreKind::File);
    }

    #[test]
    fn test_invalid_env_override() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("GA_EXPORT_EXPORT_PAGE_SIZE", "lots");
        let result = parse_config(MINIMAL);
        std::env::remove_var("GA_EXPORT_EXPORT_PAGE_SIZE");

        assert!(result.unwrap_err().to_string().contains("GA_EXPORT_EXPORT_PAGE_SIZE"));
    }

    #[test]
    fn test_validation_failure_is_configuration_error() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let result = parse_config(
            r#"
[export]
workers = 0

[data]
snapshot_path = "assets.json"
"#,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("export.workers"));
    }
}
