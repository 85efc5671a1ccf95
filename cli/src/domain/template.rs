//! Unit template rendering: pure functions, no I/O, no async.
//!
//! Placeholders are `${NAME}` where `NAME` is one of the deployment
//! variables. `$$` is an escaped `$`. A bare `$` is plain text, so systemd's
//! own `$MAINPID` passes through untouched. Every other `${...}` is an error:
//! nothing is ever substituted with an empty string.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::domain::config::{ConfigField, DeploymentConfig};
use crate::domain::error::DeployError;

/// Template compiled into the binary, used when no `--template` is given.
pub const EMBEDDED_TEMPLATE: &str = include_str!("../../assets/unit.service.tmpl");

#[allow(clippy::expect_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$|\$\{([^}\n]*)(\})?").expect("valid regex"));

/// Unit-file text containing `${NAME}` placeholders.
#[derive(Debug, Clone)]
pub struct UnitTemplate {
    text: String,
    origin: String,
}

impl UnitTemplate {
    /// `origin` names where the text came from, for error messages.
    #[must_use]
    pub fn new(text: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
        }
    }

    #[must_use]
    pub fn embedded() -> Self {
        Self::new(EMBEDDED_TEMPLATE, "embedded template")
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Unit text with every placeholder substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    text: String,
    unused: Vec<ConfigField>,
}

impl RenderedUnit {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Config fields the template never referenced.
    #[must_use]
    pub fn unused_fields(&self) -> &[ConfigField] {
        &self.unused
    }

    /// Hex-encoded SHA-256 of the unit text.
    #[must_use]
    pub fn sha256(&self) -> String {
        sha256_hex(self.as_bytes())
    }
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Substitutes `config` into `template`.
///
/// # Errors
///
/// Returns [`DeployError::Render`] listing every placeholder that does not
/// name a deployment variable (including unterminated `${`), or if a
/// placeholder marker survives into the output.
pub fn render(
    template: &UnitTemplate,
    config: &DeploymentConfig,
) -> Result<RenderedUnit, DeployError> {
    let text = template.text();
    let mut out = String::with_capacity(text.len());
    let mut used = BTreeSet::new();
    let mut unresolved: Vec<(String, usize)> = Vec::new();
    let mut last = 0;

    for caps in TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        if whole.as_str() == "$$" {
            out.push('$');
            continue;
        }

        let name = caps.get(1).map_or("", |m| m.as_str());
        let terminated = caps.get(2).is_some();
        match ConfigField::from_var_name(name) {
            Some(field) if terminated => {
                out.push_str(config.get(field));
                used.insert(field.var_name());
            }
            _ => {
                let marker = if terminated {
                    format!("${{{name}}}")
                } else {
                    format!("${{{name}")
                };
                if !unresolved.iter().any(|(m, _)| *m == marker) {
                    unresolved.push((marker, line_of(text, whole.start())));
                }
            }
        }
    }
    out.push_str(&text[last..]);

    if !unresolved.is_empty() {
        let listed: Vec<String> = unresolved
            .iter()
            .map(|(marker, line)| format!("{marker} (line {line})"))
            .collect();
        return Err(DeployError::Render(format!(
            "{} has placeholders with no deployment value: {}\n\nKnown placeholders: {}",
            template.origin(),
            listed.join(", "),
            known_placeholders()
        )));
    }

    if let Some(residual) = residual_marker(&out) {
        return Err(DeployError::Render(format!(
            "rendered {} still contains the placeholder marker {residual}",
            template.origin()
        )));
    }

    let unused = ConfigField::ALL
        .into_iter()
        .filter(|f| !used.contains(f.var_name()))
        .collect();

    Ok(RenderedUnit { text: out, unused })
}

/// Returns the first `${NAME}` marker for a deployment variable found in `text`.
#[must_use]
pub fn residual_marker(text: &str) -> Option<String> {
    ConfigField::ALL
        .into_iter()
        .map(|f| format!("${{{}}}", f.var_name()))
        .find(|marker| text.contains(marker.as_str()))
}

fn known_placeholders() -> String {
    ConfigField::ALL
        .into_iter()
        .map(|f| format!("${{{}}}", f.var_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

// ── Unit tests ───────────────────────────────────────────────────────────────
