//! Deployment configuration: resolution and validation.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The caller
//! hands in the environment as `(key, value)` pairs; nothing here reads the
//! process environment.

use std::ffi::OsString;

use serde::Deserialize;

use crate::domain::error::DeployError;
use crate::domain::unit::normalize_service_name;

// ── Fields ───────────────────────────────────────────────────────────────────

/// One of the four deployment values. Each maps to exactly one environment
/// variable and one template placeholder of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    ServiceUser,
    AppRoot,
    RuntimeExecPath,
    ServiceName,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::ServiceUser,
        ConfigField::AppRoot,
        ConfigField::RuntimeExecPath,
        ConfigField::ServiceName,
    ];

    /// Environment variable and placeholder name.
    #[must_use]
    pub fn var_name(self) -> &'static str {
        match self {
            Self::ServiceUser => "SERVICE_USER",
            Self::AppRoot => "APP_ROOT",
            Self::RuntimeExecPath => "RUNTIME_EXEC_PATH",
            Self::ServiceName => "SERVICE_NAME",
        }
    }

    /// Looks up a field by its variable name.
    #[must_use]
    pub fn from_var_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.var_name() == name)
    }
}

// ── Config record ────────────────────────────────────────────────────────────

/// Validated, immutable deployment values.
///
/// Only [`resolve`] builds one, so every instance has all four fields
/// populated and a normalized `service_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    service_user: String,
    app_root: String,
    runtime_exec_path: String,
    service_name: String,
}

impl DeploymentConfig {
    #[must_use]
    pub fn service_user(&self) -> &str {
        &self.service_user
    }

    #[must_use]
    pub fn app_root(&self) -> &str {
        &self.app_root
    }

    #[must_use]
    pub fn runtime_exec_path(&self) -> &str {
        &self.runtime_exec_path
    }

    /// Unit identifier, always ending in `.service`.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    #[must_use]
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::ServiceUser => &self.service_user,
            ConfigField::AppRoot => &self.app_root,
            ConfigField::RuntimeExecPath => &self.runtime_exec_path,
            ConfigField::ServiceName => &self.service_name,
        }
    }
}

/// The environment as read, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawDeploymentEnv {
    service_user: Option<String>,
    app_root: Option<String>,
    runtime_exec_path: Option<String>,
    service_name: Option<String>,
}

impl RawDeploymentEnv {
    fn take(&mut self, field: ConfigField) -> Option<String> {
        match field {
            ConfigField::ServiceUser => self.service_user.take(),
            ConfigField::AppRoot => self.app_root.take(),
            ConfigField::RuntimeExecPath => self.runtime_exec_path.take(),
            ConfigField::ServiceName => self.service_name.take(),
        }
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

/// Builds a [`DeploymentConfig`] from environment pairs.
///
/// Every problem is collected before failing, so a single run tells the
/// operator about all missing or malformed variables.
///
/// Variables other than the four deployment values are ignored, whatever
/// their encoding.
///
/// # Errors
///
/// Returns [`DeployError::Configuration`] if any of the four variables is
/// unset, not valid UTF-8, empty, whitespace-only, contains a line break or
/// `${`, or if `SERVICE_NAME` is not a valid service unit identifier.
pub fn resolve<I, K, V>(environment: I) -> Result<DeploymentConfig, DeployError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut vars = Vec::new();
    let mut non_utf8 = Vec::new();
    for (key, value) in environment {
        let key = key.into();
        let Some(field) = key.to_str().and_then(ConfigField::from_var_name) else {
            continue;
        };
        match value.into().into_string() {
            Ok(value) => vars.push((field.var_name().to_string(), value)),
            Err(_) => non_utf8.push(field),
        }
    }

    let mut raw: RawDeploymentEnv = envy::from_iter(vars)
        .map_err(|e| DeployError::Configuration(format!("cannot read environment: {e}")))?;

    let mut problems = Vec::new();
    let mut check = |field| checked(&mut raw, &non_utf8, &mut problems, field);
    let service_user = check(ConfigField::ServiceUser);
    let app_root = check(ConfigField::AppRoot);
    let runtime_exec_path = check(ConfigField::RuntimeExecPath);
    let service_name = check(ConfigField::ServiceName).and_then(
        |name| match normalize_service_name(&name) {
            Ok(normalized) => Some(normalized),
            Err(problem) => {
                problems.push(format!("SERVICE_NAME: {problem}"));
                None
            }
        },
    );

    match (service_user, app_root, runtime_exec_path, service_name) {
        (Some(service_user), Some(app_root), Some(runtime_exec_path), Some(service_name))
            if problems.is_empty() =>
        {
            Ok(DeploymentConfig {
                service_user,
                app_root,
                runtime_exec_path,
                service_name,
            })
        }
        _ => Err(DeployError::Configuration(format!(
            "Deployment configuration is incomplete:\n  {}",
            problems.join("\n  ")
        ))),
    }
}

fn checked(
    raw: &mut RawDeploymentEnv,
    non_utf8: &[ConfigField],
    problems: &mut Vec<String>,
    field: ConfigField,
) -> Option<String> {
    if non_utf8.contains(&field) {
        problems.push(format!("{} is not valid UTF-8", field.var_name()));
        return None;
    }
    check_value(field, raw.take(field))
        .map_err(|problem| problems.push(problem))
        .ok()
}

fn check_value(field: ConfigField, value: Option<String>) -> Result<String, String> {
    let name = field.var_name();
    let Some(value) = value else {
        return Err(format!("{name} is not set"));
    };
    if value.trim().is_empty() {
        return Err(format!("{name} is empty"));
    }
    if value.contains(['\n', '\r']) {
        return Err(format!("{name} must be a single line"));
    }
    if value.contains("${") {
        return Err(format!("{name} must not contain placeholder syntax '${{'"));
    }
    Ok(value)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
