use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rbgen_core::config::GenerationOptions;
use rbgen_core::error::GenerateError;
use rbgen_core::host::{Confirmation, Host};
use rbgen_core::model::{ElementId, ElementKind, Model};
use rbgen_core::{CodeGenerator, GenerationReport, Outcome};

use crate::emitters::{self, FILE_EXTENSION};

/// Ruby class generator.
///
/// Packages become directories, classes and interfaces become one `.rb` file
/// each. The walk is depth-first and strictly sequential: every child of a
/// package, nested packages included, finishes before its next sibling starts.
pub struct RubyGenerator;

impl CodeGenerator for RubyGenerator {
    fn extension(&self) -> &'static str {
        FILE_EXTENSION
    }

    fn generate(
        &self,
        model: &Model,
        root: ElementId,
        base_path: &Path,
        options: &GenerationOptions,
        host: &mut dyn Host,
    ) -> Result<Outcome, GenerateError> {
        info!(
            "generating `{}` into {}",
            model.qualified_name(root),
            base_path.display()
        );
        let mut walk = Walk {
            model,
            root,
            options,
            host,
            report: GenerationReport::default(),
            written: HashSet::new(),
        };

        let step = walk.visit(root, base_path)?;
        let report = walk.report;
        Ok(match step {
            Step::Continue => {
                info!(
                    "generated {} file(s) in {} new director(ies)",
                    report.files.len(),
                    report.directories.len()
                );
                Outcome::Completed(report)
            }
            Step::Cancelled => Outcome::Cancelled(report),
        })
    }
}

/// Whether the walk goes on after a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Cancelled,
}

struct Walk<'a> {
    model: &'a Model,
    root: ElementId,
    options: &'a GenerationOptions,
    host: &'a mut dyn Host,
    report: GenerationReport,
    written: HashSet<PathBuf>,
}

impl Walk<'_> {
    fn visit(&mut self, id: ElementId, dir: &Path) -> Result<Step, GenerateError> {
        let model = self.model;
        let element = model.element(id);
        match &element.kind {
            ElementKind::Package(_) => self.visit_package(id, &dir.join(&element.name)),
            ElementKind::Class(_) | ElementKind::Interface(_) => {
                self.write_element(id, dir)?;
                Ok(Step::Continue)
            }
            ElementKind::Other(kind) => {
                debug!("skipping `{}` ({kind})", element.name);
                Ok(Step::Continue)
            }
        }
    }

    fn visit_package(&mut self, id: ElementId, dir: &Path) -> Result<Step, GenerateError> {
        if self.host.directory_exists(dir) {
            let message = format!(
                "A folder named {} already exists, do you want to overwrite?",
                dir.display()
            );
            match self.host.confirm_overwrite(&message) {
                Confirmation::Declined => {
                    warn!("overwrite of {} declined; generation cancelled", dir.display());
                    self.report.declined = Some(dir.to_path_buf());
                    return Ok(Step::Cancelled);
                }
                Confirmation::Accepted => {
                    debug!("clearing {}", dir.display());
                    self.host.delete_directory_recursively(dir).map_err(|source| {
                        GenerateError::ClearDirectory {
                            path: dir.to_path_buf(),
                            source,
                        }
                    })?;
                }
            }
        }

        self.host
            .create_directory(dir)
            .map_err(|source| GenerateError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
        self.report.directories.push(dir.to_path_buf());

        let model = self.model;
        for &child in model.children(id) {
            if self.visit(child, dir)? == Step::Cancelled {
                return Ok(Step::Cancelled);
            }
        }
        Ok(Step::Continue)
    }

    fn write_element(&mut self, id: ElementId, dir: &Path) -> Result<(), GenerateError> {
        let Some(file) = emitters::render_element(self.model, self.root, id, self.options) else {
            return Ok(());
        };

        let path = dir.join(&file.path);
        if !self.written.insert(path.clone()) {
            warn!(
                "{} was already generated in this run; `{}` overwrites it",
                path.display(),
                self.model.qualified_name(id)
            );
        }

        self.host
            .write_text_file(&path, &file.content, true)
            .map_err(|source| GenerateError::WriteFile {
                path: path.clone(),
                source,
            })?;
        debug!("wrote {}", path.display());
        self.report.files.push(path);
        Ok(())
    }
}
