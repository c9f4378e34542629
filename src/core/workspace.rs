//! Workspace discovery and persistence
//!
//! A workspace is any directory containing a `.tpm/` folder:
//!
//! ```text
//! .tpm/
//!   config.yaml    workspace config layer
//!   records.yaml   installations, inspections and batches
//!   records.lock   present only while a save is in progress
//! ```
//!
//! Commands read the records, change them in memory and write them back.
//! A save only goes through if the file still holds what was read; a
//! concurrent writer in between makes it fail with [`WorkspaceError::Stale`].

use miette::Diagnostic;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::config::{Config, ConfigError};
use crate::core::service::{ServiceError, Snapshot, TrackService};

const WORKSPACE_DIR: &str = ".tpm";
const RECORDS_FILE: &str = "records.yaml";
const CONFIG_FILE: &str = "config.yaml";
const LOCK_FILE: &str = "records.lock";

const CONFIG_TEMPLATE: &str = "\
# Workspace configuration (overrides user config)
#
# tokens:
#   mode: digest        # digest | random
#   length: 16
# inspection:
#   ok_months: 3
#   defect_months: 1
# scan:
#   delay_ms: 2000
# log:
#   level: warn
#   json: false
";

#[derive(Debug, Error, Diagnostic)]
pub enum WorkspaceError {
    #[error("Not a tpm workspace (or any parent up to {searched})")]
    #[diagnostic(code(tpm::workspace::not_found), help("Run `tpm init` to create one"))]
    NotFound { searched: PathBuf },

    #[error("Workspace already exists at {0}")]
    #[diagnostic(
        code(tpm::workspace::exists),
        help("Use --force to reinitialize (existing records are replaced)")
    )]
    AlreadyExists(PathBuf),

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(tpm::workspace::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid records file {path}: {source}")]
    #[diagnostic(code(tpm::workspace::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Failed to serialize records: {0}")]
    #[diagnostic(code(tpm::workspace::serialize))]
    Serialize(#[source] serde_yml::Error),

    #[error("Records in {0} changed since this command read them")]
    #[diagnostic(
        code(tpm::workspace::stale),
        help("Another tpm command saved first; run this one again")
    )]
    Stale(PathBuf),

    #[error("Workspace records are locked by {0}")]
    #[diagnostic(
        code(tpm::workspace::locked),
        help("Another tpm command is saving; if none is running, delete the lock file")
    )]
    Locked(PathBuf),

    #[error(transparent)]
    #[diagnostic(code(tpm::config))]
    Config(#[from] ConfigError),

    #[error("Records file is inconsistent: {0}")]
    #[diagnostic(code(tpm::workspace::records))]
    Records(#[source] ServiceError),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Digest of the records file as it was read; `None` when there was no file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(Option<Vec<u8>>);

impl Fingerprint {
    fn of(content: &[u8]) -> Self {
        Fingerprint(Some(Sha256::digest(content).to_vec()))
    }

    fn read(path: &Path) -> Result<Self, WorkspaceError> {
        match fs::read(path) {
            Ok(content) => Ok(Self::of(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Fingerprint(None)),
            Err(e) => Err(io_err(path)(e)),
        }
    }
}

/// Exclusive right to write the records file, released on drop
#[derive(Debug)]
pub struct WorkspaceLock {
    path: PathBuf,
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// A tpm workspace rooted at a directory
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace containing the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let cwd = std::env::current_dir().map_err(io_err(Path::new(".")))?;
        Self::discover_from(&cwd)
    }

    /// Walk up from `start` until a directory with `.tpm/` is found
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(WORKSPACE_DIR).is_dir() {
                debug!(root = %dir.display(), "workspace found");
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            current = dir.parent();
        }
        Err(WorkspaceError::NotFound {
            searched: start.to_path_buf(),
        })
    }

    /// Create a workspace in `dir`, optionally holding the demo records
    pub fn init(dir: &Path, seeded: bool, force: bool) -> Result<Self, WorkspaceError> {
        let ws = Self {
            root: dir.to_path_buf(),
        };
        if ws.dir().exists() && !force {
            return Err(WorkspaceError::AlreadyExists(ws.dir()));
        }

        fs::create_dir_all(ws.dir()).map_err(io_err(&ws.dir()))?;
        let config_path = ws.config_path();
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE).map_err(io_err(&config_path))?;
        }

        let snapshot = if seeded {
            Snapshot::seeded()
        } else {
            Snapshot::default()
        };
        let _lock = ws.lock()?;
        ws.save_snapshot(&snapshot)?;
        Ok(ws)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.tpm/` directory
    pub fn dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir().join(RECORDS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir().join(CONFIG_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir().join(LOCK_FILE)
    }

    /// Take the workspace write lock, failing if another process holds it
    pub fn lock(&self) -> Result<WorkspaceLock, WorkspaceError> {
        let path = self.lock_path();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(WorkspaceLock { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(WorkspaceError::Locked(path)),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    /// Effective config for this workspace
    pub fn config(&self) -> Result<Config, WorkspaceError> {
        Ok(Config::load(Some(self.root.as_path()))?)
    }

    /// Read the saved records; a missing file reads as empty
    pub fn load_snapshot(&self) -> Result<Snapshot, WorkspaceError> {
        self.load_tracked().map(|(snapshot, _)| snapshot)
    }

    /// Read the saved records along with the fingerprint a later save checks
    pub fn load_tracked(&self) -> Result<(Snapshot, Fingerprint), WorkspaceError> {
        let path = self.records_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok((Snapshot::default(), Fingerprint(None)));
            }
            Err(e) => return Err(io_err(&path)(e)),
        };
        let fingerprint = Fingerprint::of(content.as_bytes());
        if content.trim().is_empty() {
            return Ok((Snapshot::default(), fingerprint));
        }
        let snapshot = serde_yml::from_str(&content)
            .map_err(|source| WorkspaceError::Parse { path, source })?;
        Ok((snapshot, fingerprint))
    }

    /// Write the records, replacing the file in one rename
    ///
    /// Unchecked; callers that read the records first use [`save`](Self::save).
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), WorkspaceError> {
        let path = self.records_path();
        let yaml = serde_yml::to_string(snapshot).map_err(WorkspaceError::Serialize)?;
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        debug!(
            path = %path.display(),
            installations = snapshot.installations.len(),
            inspections = snapshot.inspections.len(),
            batches = snapshot.batches.len(),
            "records saved"
        );
        Ok(())
    }

    /// Build a service over the saved records
    pub fn open_service(
        &self,
        config: &Config,
    ) -> Result<(TrackService, Fingerprint), WorkspaceError> {
        let (snapshot, fingerprint) = self.load_tracked()?;
        let service = TrackService::from_snapshot(snapshot, config.engine())
            .map_err(WorkspaceError::Records)?;
        Ok((service.with_intervals(config.inspection), fingerprint))
    }

    /// Save a service opened with [`open_service`](Self::open_service)
    ///
    /// Fails with [`WorkspaceError::Stale`] if the records file no longer
    /// matches `read`. Returns the fingerprint of the file just written.
    pub fn save(
        &self,
        service: &TrackService,
        read: &Fingerprint,
    ) -> Result<Fingerprint, WorkspaceError> {
        let _lock = self.lock()?;
        let path = self.records_path();
        if Fingerprint::read(&path)? != *read {
            return Err(WorkspaceError::Stale(path));
        }
        self.save_snapshot(&service.snapshot())?;
        Fingerprint::read(&path)
    }
}
