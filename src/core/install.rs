//! Installation into the host's macro directory
//!
//! The host picks up scripted parts from its macro directory. Installing
//! writes the size table under `<macro>/hexscrew/` together with a
//! manifest recording what was written, so that later status checks and
//! uninstalls only touch files this tool created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::Config;
use crate::standards::{SizeTable, TableError};

/// Subdirectory of the macro directory owned by this package
pub const INSTALL_SUBDIR: &str = "hexscrew";

/// Manifest file name inside the install directory
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Installed copy of the size table
pub const TABLE_FILE: &str = "iso4014.yaml";

/// Errors that can occur while installing
#[derive(Debug, Error, miette::Diagnostic)]
pub enum InstallError {
    #[error("could not determine the host macro directory")]
    #[diagnostic(help("pass --dir or set macro_dir with `hexscrew config set macro_dir <path>`"))]
    NoMacroDir,

    #[error("already installed in {0:?}")]
    #[diagnostic(help("use --force to overwrite"))]
    AlreadyInstalled(PathBuf),

    #[error("not installed in {0:?}")]
    NotInstalled(PathBuf),

    #[error("corrupt manifest {path:?}: {message}")]
    BadManifest { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> InstallError + '_ {
    move |source| InstallError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One file written by an install
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledFile {
    /// Path relative to the install directory
    pub path: String,
    pub sha256: String,
}

/// Record of an installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub package: String,
    pub version: String,
    pub installed: DateTime<Utc>,
    pub files: Vec<InstalledFile>,
}

/// State of an install directory
#[derive(Debug, Clone, PartialEq)]
pub enum InstallStatus {
    NotInstalled,
    Installed {
        manifest: Manifest,
        /// Files whose content no longer matches the manifest
        modified: Vec<String>,
        /// Files listed in the manifest that are gone
        missing: Vec<String>,
    },
}

impl InstallStatus {
    pub fn is_clean(&self) -> bool {
        match self {
            InstallStatus::NotInstalled => true,
            InstallStatus::Installed {
                modified, missing, ..
            } => modified.is_empty() && missing.is_empty(),
        }
    }
}

/// Default macro directory of the host application
pub fn default_macro_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.data_dir().join("FreeCAD").join("Macro"))
}

/// Pick the macro directory: explicit path, then config, then platform default
pub fn resolve_macro_dir(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, InstallError> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.macro_dir.clone())
        .or_else(default_macro_dir)
        .ok_or(InstallError::NoMacroDir)
}

/// Compute SHA256 hash of content
fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Installs into one macro directory
#[derive(Debug, Clone)]
pub struct Installer {
    macro_dir: PathBuf,
}

impl Installer {
    pub fn new(macro_dir: impl Into<PathBuf>) -> Self {
        Self {
            macro_dir: macro_dir.into(),
        }
    }

    pub fn macro_dir(&self) -> &Path {
        &self.macro_dir
    }

    /// Directory holding this package's files
    pub fn install_dir(&self) -> PathBuf {
        self.macro_dir.join(INSTALL_SUBDIR)
    }

    fn manifest_path(&self) -> PathBuf {
        self.install_dir().join(MANIFEST_FILE)
    }

    /// Read the manifest, if one exists
    pub fn manifest(&self) -> Result<Option<Manifest>, InstallError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(io_error(&path))?;
        serde_yml::from_str(&contents)
            .map(Some)
            .map_err(|e| InstallError::BadManifest {
                path,
                message: e.to_string(),
            })
    }

    /// Write the size table and the manifest
    pub fn install(&self, table: &SizeTable, force: bool) -> Result<Manifest, InstallError> {
        let dir = self.install_dir();
        if !force && self.manifest_path().exists() {
            return Err(InstallError::AlreadyInstalled(dir));
        }

        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let mut files = Vec::new();
        let table_yaml = table.to_yaml()?;
        files.push(self.write_file(TABLE_FILE, table_yaml.as_bytes())?);

        let manifest = Manifest {
            package: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            installed: Utc::now(),
            files,
        };
        let manifest_yaml = serde_yml::to_string(&manifest).map_err(|e| InstallError::BadManifest {
            path: self.manifest_path(),
            message: e.to_string(),
        })?;
        let manifest_path = self.manifest_path();
        fs::write(&manifest_path, manifest_yaml).map_err(io_error(&manifest_path))?;

        info!(dir = %dir.display(), "installed {}", table.title());
        Ok(manifest)
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<InstalledFile, InstallError> {
        let path = self.install_dir().join(name);
        fs::write(&path, content).map_err(io_error(&path))?;
        debug!(path = %path.display(), bytes = content.len(), "wrote");
        Ok(InstalledFile {
            path: name.to_string(),
            sha256: compute_hash(content),
        })
    }

    /// Resolve a manifest entry; entries must be a plain file name
    fn entry_path(&self, file: &InstalledFile) -> Result<PathBuf, InstallError> {
        let mut components = Path::new(&file.path).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.install_dir().join(name)),
            _ => Err(InstallError::BadManifest {
                path: self.manifest_path(),
                message: format!("entry '{}' is not a file name", file.path),
            }),
        }
    }

    /// Compare the installed files against the manifest
    pub fn status(&self) -> Result<InstallStatus, InstallError> {
        let Some(manifest) = self.manifest()? else {
            return Ok(InstallStatus::NotInstalled);
        };

        let mut modified = Vec::new();
        let mut missing = Vec::new();
        for file in &manifest.files {
            let path = self.entry_path(file)?;
            if !path.exists() {
                missing.push(file.path.clone());
                continue;
            }
            let content = fs::read(&path).map_err(io_error(&path))?;
            if compute_hash(&content) != file.sha256 {
                modified.push(file.path.clone());
            }
        }

        Ok(InstallStatus::Installed {
            manifest,
            modified,
            missing,
        })
    }

    /// Load the installed size table
    pub fn installed_table(&self) -> Result<SizeTable, InstallError> {
        let path = self.install_dir().join(TABLE_FILE);
        let contents = fs::read_to_string(&path).map_err(io_error(&path))?;
        Ok(SizeTable::from_yaml(&contents, &path.display().to_string())?)
    }

    /// Remove the files listed in the manifest, then the directory if empty
    pub fn uninstall(&self) -> Result<Manifest, InstallError> {
        let dir = self.install_dir();
        let manifest = self
            .manifest()?
            .ok_or_else(|| InstallError::NotInstalled(dir.clone()))?;

        let paths = manifest
            .files
            .iter()
            .map(|file| self.entry_path(file))
            .collect::<Result<Vec<_>, _>>()?;
        for path in paths {
            if path.exists() {
                fs::remove_file(&path).map_err(io_error(&path))?;
            }
        }
        let manifest_path = self.manifest_path();
        fs::remove_file(&manifest_path).map_err(io_error(&manifest_path))?;

        // Leave the directory alone if the user put other files there
        if fs::read_dir(&dir).map_err(io_error(&dir))?.next().is_none() {
            fs::remove_dir(&dir).map_err(io_error(&dir))?;
        }

        info!(dir = %dir.display(), "uninstalled");
        Ok(manifest)
    }
}
