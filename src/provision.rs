//! Copying skeleton preferences into a new user's home directory
//!
//! The contract is byte-for-byte: the prefs.js that lands in the profile
//! directory is exactly the source sequence, never a re-rendering of it.

use crate::error::{Error, Result};
use crate::parser::parse_prefs_bytes;
use crate::profile::{get_prefs_path, prepare_registration, validate_profile_name};
use crate::writer::{write_atomic, write_atomic_new};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The bundled skeleton prefs.js, as shipped in `skel/`
pub const SKELETON_PREFS: &[u8] = include_bytes!("../skel/.mozilla/firefox/default/prefs.js");

/// Browser data directory relative to a home directory
pub const FIREFOX_DIR: &str = ".mozilla/firefox";

/// Options for [`install_prefs`]
///
/// # Example
///
/// ```rust
/// use skelprefs::ProvisionConfig;
///
/// let config = ProvisionConfig {
///     profile_name: "default".to_string(),
///     overwrite: false,
///     verify: true,
///     register_profile: true,
/// };
/// assert_eq!(config, ProvisionConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Profile directory name under `~/.mozilla/firefox`
    pub profile_name: String,
    /// Replace an existing prefs.js
    pub overwrite: bool,
    /// Parse the source before copying and refuse malformed input
    pub verify: bool,
    /// Add the profile to profiles.ini
    pub register_profile: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            profile_name: "default".to_string(),
            overwrite: false,
            verify: true,
            register_profile: true,
        }
    }
}

/// Outcome of a successful [`install_prefs`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub prefs_path: PathBuf,
    pub bytes_written: usize,
    /// Number of records, when the source was verified
    pub pref_count: Option<usize>,
    pub registered: bool,
}

/// Browser data directory inside `home`
pub fn firefox_dir(home: &Path) -> PathBuf {
    home.join(FIREFOX_DIR)
}

/// Profile directory for `profile_name` inside `home`
pub fn profile_dir(home: &Path, profile_name: &str) -> PathBuf {
    firefox_dir(home).join(profile_name)
}

/// Copy `source` verbatim into the profile's prefs.js under `home`
///
/// ```rust
/// use skelprefs::{install_prefs, ProvisionConfig, SKELETON_PREFS};
///
/// let home = tempfile::TempDir::new()?;
/// let report = install_prefs(SKELETON_PREFS, home.path(), &ProvisionConfig::default())?;
/// assert_eq!(std::fs::read(&report.prefs_path)?, SKELETON_PREFS);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn install_prefs(source: &[u8], home: &Path, config: &ProvisionConfig) -> Result<ProvisionReport> {
    validate_profile_name(&config.profile_name)?;

    let pref_count = if config.verify {
        let parsed = parse_prefs_bytes(source)?;
        log::debug!("verified source: {} preferences", parsed.len());
        Some(parsed.len())
    } else {
        None
    };

    // Resolve profiles.ini first so a bad one fails before prefs.js exists
    let pending = if config.register_profile {
        prepare_registration(&firefox_dir(home), &config.profile_name)?
    } else {
        None
    };

    let dir = profile_dir(home, &config.profile_name);
    std::fs::create_dir_all(&dir)?;

    let prefs_path = get_prefs_path(&dir);
    if config.overwrite {
        write_atomic(&prefs_path, source)?;
    } else {
        write_atomic_new(&prefs_path, source)?;
    }
    verify_copy(&prefs_path, source)?;
    log::info!("installed {} ({} bytes)", prefs_path.display(), source.len());

    let registered = match pending {
        Some(pending) => {
            if let Err(e) = pending.commit() {
                if !config.overwrite {
                    // Leave nothing behind that would block a retry
                    let _ = std::fs::remove_file(&prefs_path);
                }
                return Err(e);
            }
            true
        }
        None => false,
    };

    Ok(ProvisionReport {
        prefs_path,
        bytes_written: source.len(),
        pref_count,
        registered,
    })
}

/// Read `path` back and check it matches `expected` byte for byte
pub fn verify_copy(path: &Path, expected: &[u8]) -> Result<()> {
    let found = std::fs::read(path)?;
    if found != expected {
        return Err(Error::CopyMismatch {
            path: path.to_path_buf(),
            expected: expected.len(),
            found: found.len(),
        });
    }
    Ok(())
}

/// Copy every file of a skeleton directory to the same relative path under `home`
///
/// Returns the destination paths written, in walk order. Existing files are
/// left alone unless `overwrite` is set.
pub fn copy_skeleton_tree(skel_dir: &Path, home: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    if !skel_dir.is_dir() {
        return Err(Error::InvalidSkeletonDirectory(skel_dir.to_path_buf()));
    }

    let mut written = Vec::new();
    let mut created_dirs = Vec::new();
    for entry in WalkDir::new(skel_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(walk_error)?;
        let relative = entry
            .path()
            .strip_prefix(skel_dir)
            .map_err(|_| Error::InvalidSkeletonDirectory(entry.path().to_path_buf()))?;
        let target = home.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if overwrite || target.symlink_metadata().is_err() {
                let permissions = entry.metadata().map_err(walk_error)?.permissions();
                created_dirs.push((target.clone(), permissions));
            }
            std::fs::create_dir_all(&target)?;
            continue;
        }

        if overwrite && file_type.is_symlink() && target.symlink_metadata().is_ok() {
            std::fs::remove_file(&target)?;
        }

        let copied = if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)
        } else {
            copy_file(&entry, &target, overwrite)
        };
        match copied {
            Ok(()) => {}
            Err(Error::AlreadyExists(_)) => {
                log::warn!("skipping existing {}", target.display());
                continue;
            }
            Err(e) => return Err(e),
        }
        log::debug!("copied {}", relative.display());
        written.push(target);
    }

    // Deepest first, so a read-only directory is locked only after its contents are in place
    for (dir, permissions) in created_dirs.into_iter().rev() {
        std::fs::set_permissions(&dir, permissions)?;
    }

    log::info!(
        "copied {} files from {} to {}",
        written.len(),
        skel_dir.display(),
        home.display()
    );
    Ok(written)
}

fn walk_error(e: walkdir::Error) -> Error {
    Error::Io(
        e.into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop in skeleton")),
    )
}

fn copy_file(entry: &walkdir::DirEntry, target: &Path, overwrite: bool) -> Result<()> {
    let bytes = std::fs::read(entry.path())?;
    if overwrite {
        write_atomic(target, &bytes)?;
    } else {
        write_atomic_new(target, &bytes)?;
    }
    std::fs::set_permissions(target, entry.metadata().map_err(walk_error)?.permissions())?;
    verify_copy(target, &bytes)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = std::fs::read_link(source)?;
    std::os::unix::fs::symlink(link, target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            Error::AlreadyExists(target.to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, _target: &Path) -> Result<()> {
    log::warn!("skipping symlink {}", source.display());
    Ok(())
}
