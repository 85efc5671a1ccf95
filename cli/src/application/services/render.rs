//! Application service: resolve and render, no side effects.
//!
//! Backs `unitdeploy render` and the first two steps of a deployment.

use std::ffi::OsString;

use crate::application::ports::{ProgressReporter, TemplateStore};
use crate::domain::config::{self, DeploymentConfig};
use crate::domain::error::DeployFailure;
use crate::domain::stage::DeployStage;
use crate::domain::template::{self, RenderedUnit};

/// Resolve the deployment configuration from `environment`.
///
/// # Errors
///
/// Returns a failure at [`DeployStage::Resolving`] if any value is missing or
/// invalid.
pub fn resolve_config<I, K, V>(environment: I) -> Result<DeploymentConfig, DeployFailure>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    config::resolve(environment).map_err(|error| DeployFailure::new(DeployStage::Resolving, error))
}

/// Load the template and substitute `config` into it.
///
/// Fields the template never references are reported as warnings.
///
/// # Errors
///
/// Returns a failure at [`DeployStage::Rendering`] if the template cannot be
/// read or has unresolved placeholders.
pub fn render_unit(
    templates: &impl TemplateStore,
    config: &DeploymentConfig,
    reporter: &impl ProgressReporter,
) -> Result<RenderedUnit, DeployFailure> {
    let fail = |error| DeployFailure::new(DeployStage::Rendering, error);
    let unit_template = templates.load().map_err(fail)?;
    let unit = template::render(&unit_template, config).map_err(fail)?;

    for field in unit.unused_fields() {
        tracing::warn!(
            placeholder = field.var_name(),
            template = unit_template.origin(),
            "template does not reference deployment value"
        );
        reporter.warn(&format!(
            "{} never uses ${{{}}}",
            unit_template.origin(),
            field.var_name()
        ));
    }
    Ok(unit)
}

/// Resolve then render, stopping at the first failure.
///
/// # Errors
///
/// See [`resolve_config`] and [`render_unit`].
pub fn run<I, K, V>(
    environment: I,
    templates: &impl TemplateStore,
    reporter: &impl ProgressReporter,
) -> Result<(DeploymentConfig, RenderedUnit), DeployFailure>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let config = resolve_config(environment)?;
    let unit = render_unit(templates, &config, reporter)?;
    Ok((config, unit))
}
