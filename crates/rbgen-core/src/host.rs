//! File-system and confirmation capabilities the generator borrows from its host.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;

/// Answer to an overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

/// Capabilities the generator needs from whatever hosts it.
pub trait Host {
    fn directory_exists(&self, path: &Path) -> bool;

    fn create_directory(&mut self, path: &Path) -> io::Result<()>;

    fn delete_directory_recursively(&mut self, path: &Path) -> io::Result<()>;

    fn write_text_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()>;

    fn confirm_overwrite(&mut self, message: &str) -> Confirmation;
}

/// How [`LocalHost`] answers overwrite prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPolicy {
    /// Ask on stderr and read `y`/`n` from stdin.
    Prompt,
    AlwaysAccept,
    AlwaysDecline,
}

/// Host backed by the local file system.
#[derive(Debug, Clone)]
pub struct LocalHost {
    policy: ConfirmPolicy,
}

impl LocalHost {
    pub fn new(policy: ConfirmPolicy) -> Self {
        Self { policy }
    }
}

impl Host for LocalHost {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_directory(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn delete_directory_recursively(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn write_text_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()> {
        if !overwrite && path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        fs::write(path, content)
    }

    fn confirm_overwrite(&mut self, message: &str) -> Confirmation {
        match self.policy {
            ConfirmPolicy::AlwaysAccept => Confirmation::Accepted,
            ConfirmPolicy::AlwaysDecline => Confirmation::Declined,
            ConfirmPolicy::Prompt => prompt(message),
        }
    }
}

fn prompt(message: &str) -> Confirmation {
    eprint!("{message} [y/N] ");
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return Confirmation::Declined;
    }
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Accepted,
        _ => Confirmation::Declined,
    }
}

/// In-memory host for dry runs and tests.
///
/// Paths listed in [`MemoryHost::fail_on`] reject every mutation with
/// `PermissionDenied`.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    directories: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    writes: Vec<PathBuf>,
    prompts: Vec<String>,
    answer: Confirmation,
    failing: BTreeSet<PathBuf>,
}

impl MemoryHost {
    /// A host where `base` already exists and every prompt is answered with `answer`.
    pub fn new(base: impl Into<PathBuf>, answer: Confirmation) -> Self {
        let mut directories = BTreeSet::new();
        directories.insert(base.into());
        Self {
            directories,
            files: BTreeMap::new(),
            writes: Vec::new(),
            prompts: Vec::new(),
            answer,
            failing: BTreeSet::new(),
        }
    }

    /// Make every mutation of `path` fail.
    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Seed an existing file (its parent directories are created too).
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path, content.to_string());
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    /// Files written through [`Host::write_text_file`], in call order.
    pub fn writes(&self) -> &[PathBuf] {
        &self.writes
    }

    /// Messages passed to [`Host::confirm_overwrite`].
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.failing.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not writable", path.display()),
            ));
        }
        Ok(())
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} does not exist", parent.display()),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Host for MemoryHost {
    fn directory_exists(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn create_directory(&mut self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        self.check_parent(path)?;
        if !self.directories.insert(path.to_path_buf()) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        Ok(())
    }

    fn delete_directory_recursively(&mut self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        self.directories.retain(|d| !d.starts_with(path));
        self.files.retain(|f, _| !f.starts_with(path));
        debug!("cleared {}", path.display());
        Ok(())
    }

    fn write_text_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()> {
        self.check(path)?;
        self.check_parent(path)?;
        if !overwrite && self.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        self.writes.push(path.to_path_buf());
        Ok(())
    }

    fn confirm_overwrite(&mut self, message: &str) -> Confirmation {
        self.prompts.push(message.to_string());
        self.answer
    }
}
