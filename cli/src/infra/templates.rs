//! Template sources: implementations of the `TemplateStore` port.

use std::path::PathBuf;

use crate::application::ports::TemplateStore;
use crate::domain::error::DeployError;
use crate::domain::template::UnitTemplate;

/// The template compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTemplate;

impl TemplateStore for EmbeddedTemplate {
    fn load(&self) -> Result<UnitTemplate, DeployError> {
        Ok(UnitTemplate::embedded())
    }
}

/// A template file on disk, read once per load.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TemplateStore for FileTemplate {
    fn load(&self) -> Result<UnitTemplate, DeployError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            DeployError::io(format!("cannot read template {}", self.path.display()), e)
        })?;
        Ok(UnitTemplate::new(text, self.path.display().to_string()))
    }
}

/// Picks the file template when a path is given, the embedded one otherwise.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded(EmbeddedTemplate),
    File(FileTemplate),
}

impl TemplateSource {
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(FileTemplate::new(path)),
            None => Self::Embedded(EmbeddedTemplate),
        }
    }
}

impl TemplateStore for TemplateSource {
    fn load(&self) -> Result<UnitTemplate, DeployError> {
        match self {
            Self::Embedded(t) => t.load(),
            Self::File(t) => t.load(),
        }
    }
}
