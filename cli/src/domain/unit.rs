//! Unit identifiers and install locations.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

/// Default systemd configuration directory for system units.
pub const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

/// Suffix appended to a bare service name.
pub const SERVICE_SUFFIX: &str = ".service";

/// Unit-type suffixes systemd knows about. Only `.service` is installable here.
const UNIT_SUFFIXES: &[&str] = &[
    ".service", ".socket", ".device", ".mount", ".automount", ".swap", ".target", ".path",
    ".timer", ".slice", ".scope",
];

/// Longest unit name systemd accepts, suffix included.
const UNIT_NAME_MAX: usize = 255;

/// Normalizes and validates a service unit identifier.
///
/// A bare name (`example-api`) gets `.service` appended; a name already
/// ending in `.service` is kept as is.
///
/// # Errors
///
/// Returns a description of the problem when the name carries a non-service
/// unit suffix, contains characters systemd rejects, starts with `.` or `-`,
/// or is longer than 255 bytes once suffixed.
pub fn normalize_service_name(raw: &str) -> Result<String, String> {
    let name = if raw.ends_with(SERVICE_SUFFIX) {
        raw.to_string()
    } else if let Some(suffix) = UNIT_SUFFIXES.iter().find(|s| raw.ends_with(*s)) {
        return Err(format!(
            "'{raw}' is a {} unit; only service units can be deployed",
            &suffix[1..]
        ));
    } else {
        format!("{raw}{SERVICE_SUFFIX}")
    };

    let stem = &name[..name.len() - SERVICE_SUFFIX.len()];
    if stem.is_empty() {
        return Err(format!("'{raw}' has no name before the unit suffix"));
    }
    if stem.starts_with('.') || stem.starts_with('-') {
        return Err(format!("'{raw}' must not start with '.' or '-'"));
    }
    if let Some(bad) = stem.chars().find(|c| !is_unit_name_char(*c)) {
        return Err(format!(
            "'{raw}' contains '{bad}'; allowed are ASCII letters, digits and ':_.@-\\'"
        ));
    }
    if name.len() > UNIT_NAME_MAX {
        return Err(format!(
            "'{raw}' is {} bytes long; unit names are limited to {UNIT_NAME_MAX}",
            name.len()
        ));
    }
    Ok(name)
}

fn is_unit_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '@' | '-' | '\\')
}

/// Where a unit file lives once installed: `<unit_dir>/<service_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledUnitPath {
    dir: PathBuf,
    file_name: String,
}

impl InstalledUnitPath {
    /// `service_name` must already be normalized.
    #[must_use]
    pub fn new(unit_dir: &Path, service_name: &str) -> Self {
        Self {
            dir: unit_dir.to_path_buf(),
            file_name: service_name.to_string(),
        }
    }

    /// The configuration directory the unit is installed into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full destination path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}
