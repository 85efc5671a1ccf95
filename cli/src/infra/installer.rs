//! Privileged, atomic installation of unit files.
//!
//! Writing into the service manager's configuration directory needs an
//! [`Elevation`] token, obtained by proving write access to that directory.
//! The [`AtomicWriter`] built from it writes to a temp file in the same
//! directory and renames it over the destination, so a reader sees either
//! the old file or the complete new one.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::application::ports::{InstallOutcome, UnitInstaller};
use crate::domain::error::DeployError;
use crate::domain::template::{RenderedUnit, sha256_hex};
use crate::domain::unit::InstalledUnitPath;

/// Mode for installed unit files.
pub const UNIT_FILE_MODE: u32 = 0o644;

const TEMP_PREFIX: &str = ".unitdeploy-";

/// Proof that this process may write into one configuration directory.
///
/// The only constructor is [`Elevation::acquire`]; there is no ambient
/// default.
#[derive(Debug)]
pub struct Elevation {
    dir: PathBuf,
}

impl Elevation {
    /// Checks that `dir` is writable by creating and removing a scratch file.
    ///
    /// # Errors
    ///
    /// [`DeployError::Privilege`] if the directory refuses the write,
    /// [`DeployError::Io`] if it is missing or the probe fails otherwise.
    pub fn acquire(dir: &Path) -> Result<Self, DeployError> {
        let probe = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".probe")
            .tempfile_in(dir)
            .map_err(|e| classify(e, &format!("cannot write to {}", dir.display())))?;
        probe
            .close()
            .map_err(|e| classify(e, &format!("cannot clean up probe in {}", dir.display())))?;
        tracing::debug!(dir = %dir.display(), "elevation acquired");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Writes files atomically inside an elevated directory.
#[derive(Debug)]
pub struct AtomicWriter {
    elevation: Elevation,
}

impl AtomicWriter {
    #[must_use]
    pub fn new(elevation: Elevation) -> Self {
        Self { elevation }
    }

    /// Replaces `destination` with `content`, skipping the write when the
    /// destination already holds the same bytes. Either way the file ends up
    /// with [`UNIT_FILE_MODE`].
    ///
    /// # Errors
    ///
    /// [`DeployError::Privilege`] if `destination` is outside the elevated
    /// directory or the filesystem denies access; [`DeployError::Io`] for
    /// any other failure. The temp file is removed on every error path.
    pub fn write(
        &self,
        destination: &InstalledUnitPath,
        content: &[u8],
    ) -> Result<InstallOutcome, DeployError> {
        if destination.dir() != self.elevation.dir() {
            return Err(DeployError::Privilege(format!(
                "elevation was granted for {}, not {}",
                self.elevation.dir().display(),
                destination.dir().display()
            )));
        }
        let target = destination.path();

        if current_digest(&target)?.as_deref() == Some(sha256_hex(content).as_str()) {
            set_mode(&target, UNIT_FILE_MODE).map_err(|e| {
                classify(e, &format!("cannot set mode of {}", target.display()))
            })?;
            tracing::debug!(path = %target.display(), "unit unchanged, skipping write");
            return Ok(InstallOutcome::Unchanged);
        }

        let context = format!("cannot write {}", target.display());
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(destination.dir())
            .map_err(|e| classify(e, &context))?;
        tmp.write_all(content).map_err(|e| classify(e, &context))?;
        tmp.as_file().sync_all().map_err(|e| classify(e, &context))?;
        set_mode(tmp.path(), UNIT_FILE_MODE).map_err(|e| classify(e, &context))?;

        tmp.persist(&target)
            .map_err(|e| classify(e.error, &format!("cannot rename into {}", target.display())))?;
        sync_dir(destination.dir());

        tracing::debug!(path = %target.display(), bytes = content.len(), "unit written");
        Ok(InstallOutcome::Written)
    }
}

/// Production `UnitInstaller`: acquires elevation for the destination's
/// directory on each install, then writes through an [`AtomicWriter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PrivilegedInstaller;

impl UnitInstaller for PrivilegedInstaller {
    fn install(
        &self,
        unit: &RenderedUnit,
        destination: &InstalledUnitPath,
    ) -> Result<InstallOutcome, DeployError> {
        let elevation = Elevation::acquire(destination.dir())?;
        AtomicWriter::new(elevation).write(destination, unit.as_bytes())
    }
}

fn current_digest(path: &Path) -> Result<Option<String>, DeployError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(sha256_hex(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(classify(e, &format!("cannot read {}", path.display()))),
    }
}

/// Maps an I/O failure to the deployment error taxonomy.
pub(crate) fn classify(err: io::Error, context: &str) -> DeployError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        DeployError::Privilege(format!("{context}: {err}"))
    } else {
        DeployError::io(context, err)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Flushes the rename to disk. Failure only weakens durability across a
/// crash, not atomicity, so it is logged and ignored.
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(dir = %dir.display(), error = %e, "directory fsync failed");
    }
}
