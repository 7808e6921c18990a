pub mod classify;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod parse;
pub mod transform;

use std::path::{Path, PathBuf};

use config::GenerationOptions;
use error::GenerateError;
use host::Host;
use model::{ElementId, Model};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// What a generation run touched before it finished or was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Directories created, in creation order.
    pub directories: Vec<PathBuf>,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
    /// Existing directory whose overwrite the user declined.
    pub declined: Option<PathBuf>,
}

/// Non-error result of a generation run.
///
/// Declining an overwrite is a deliberate user choice, so it lives here rather
/// than in [`GenerateError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(GenerationReport),
    Cancelled(GenerationReport),
}

impl Outcome {
    pub fn report(&self) -> &GenerationReport {
        match self {
            Outcome::Completed(report) | Outcome::Cancelled(report) => report,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled(_))
    }
}

/// Trait for code generators that walk a model and write files through a host.
pub trait CodeGenerator {
    /// File extension of the emitted sources, without the dot.
    fn extension(&self) -> &'static str;

    fn generate(
        &self,
        model: &Model,
        root: ElementId,
        base_path: &Path,
        options: &GenerationOptions,
        host: &mut dyn Host,
    ) -> Result<Outcome, GenerateError>;
}
