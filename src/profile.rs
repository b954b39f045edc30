//! profiles.ini registration and lookup
//!
//! A browser only picks up a profile directory that is listed in
//! `profiles.ini`. Provisioning registers the skeleton profile there so the
//! copied prefs.js is found on first start.

use crate::error::{Error, Result};
use crate::writer::write_atomic;
use configparser::ini::Ini;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Profile information read from profiles.ini
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_relative: bool,
    pub is_default: bool,
}

impl ProfileInfo {
    /// Absolute profile directory, resolving relative paths against `firefox_dir`
    pub fn resolve(&self, firefox_dir: &Path) -> PathBuf {
        if self.is_relative {
            firefox_dir.join(&self.path)
        } else {
            self.path.clone()
        }
    }
}

/// Get the path to prefs.js for a given profile directory
pub fn get_prefs_path(profile_path: &Path) -> PathBuf {
    profile_path.join("prefs.js")
}

/// Path to profiles.ini inside a browser data directory
pub fn get_profiles_ini_path(firefox_dir: &Path) -> PathBuf {
    firefox_dir.join("profiles.ini")
}

fn load_ini(ini_path: &Path) -> Result<Ini> {
    // Section and key names are case-sensitive for the browser
    let mut ini = Ini::new_cs();
    if ini_path.exists() {
        let content = std::fs::read_to_string(ini_path)?;
        ini.read(content).map_err(|e| {
            Error::ProfilesIni(format!("failed to parse {}: {}", ini_path.display(), e))
        })?;
    }
    Ok(ini)
}

fn profile_sections(ini: &Ini) -> Vec<String> {
    ini.sections()
        .into_iter()
        .filter(|s| s.starts_with("Profile"))
        .collect()
}

/// List the profiles registered in `firefox_dir/profiles.ini`
pub fn list_profiles(firefox_dir: &Path) -> Result<Vec<ProfileInfo>> {
    let ini_path = get_profiles_ini_path(firefox_dir);
    if !ini_path.exists() {
        return Err(Error::ProfilesIni(format!(
            "{} not found",
            ini_path.display()
        )));
    }
    let ini = load_ini(&ini_path)?;

    let mut sections = profile_sections(&ini);
    sections.sort_by_key(|s| s["Profile".len()..].parse::<u32>().unwrap_or(u32::MAX));

    let profiles = sections
        .iter()
        .filter_map(|sec| {
            let name = ini.get(sec, "Name")?;
            let path = ini.get(sec, "Path")?;
            if name.is_empty() || path.is_empty() {
                return None;
            }
            let is_relative = ini.getuint(sec, "IsRelative").ok().flatten().unwrap_or(1) == 1;
            let is_default = ini.getuint(sec, "Default").ok().flatten().unwrap_or(0) == 1;
            Some(ProfileInfo {
                name,
                path: PathBuf::from(path),
                is_relative,
                is_default,
            })
        })
        .collect();

    Ok(profiles)
}

/// Find the directory of a registered profile by name
pub fn find_profile_path(firefox_dir: &Path, profile_name: &str) -> Result<PathBuf> {
    list_profiles(firefox_dir)?
        .into_iter()
        .find(|p| p.name == profile_name)
        .map(|p| p.resolve(firefox_dir))
        .ok_or_else(|| {
            Error::ProfilesIni(format!(
                "profile '{}' is not registered in {}",
                profile_name,
                firefox_dir.display()
            ))
        })
}

/// Check that `name` can be used both as a directory name and as a
/// profiles.ini value
///
/// Names must be a single path component, and must not contain INI comment
/// or syntax characters, control characters or surrounding whitespace, since
/// none of those read back unchanged.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidPreference(format!(
            "invalid profile name '{}': {}",
            name, reason
        )))
    };

    let mut components = Path::new(name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return invalid("must be a single directory name");
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '#' | ';' | '=' | '[' | ']') || c.is_control())
    {
        return invalid(&format!("contains {:?}", c));
    }
    if name.trim() != name {
        return invalid("has leading or trailing whitespace");
    }
    Ok(())
}

/// A profiles.ini update that has been validated but not yet written
#[derive(Debug)]
pub struct PendingRegistration {
    ini_path: PathBuf,
    section: String,
    profile_name: String,
    contents: String,
}

impl PendingRegistration {
    /// Atomically write the updated profiles.ini
    pub fn commit(self) -> Result<()> {
        if let Some(parent) = self.ini_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.ini_path, self.contents.as_bytes())?;
        log::info!(
            "registered profile '{}' as [{}] in {}",
            self.profile_name,
            self.section,
            self.ini_path.display()
        );
        Ok(())
    }
}

/// Load profiles.ini and compute the registration of `profile_name`
/// without touching the disk
///
/// Returns `None` when a profile with that name is already listed.
pub fn prepare_registration(
    firefox_dir: &Path,
    profile_name: &str,
) -> Result<Option<PendingRegistration>> {
    validate_profile_name(profile_name)?;

    let ini_path = get_profiles_ini_path(firefox_dir);
    let mut ini = load_ini(&ini_path)?;
    let sections = profile_sections(&ini);

    if sections
        .iter()
        .any(|sec| ini.get(sec, "Name").as_deref() == Some(profile_name))
    {
        log::debug!(
            "profile '{}' already registered in {}",
            profile_name,
            ini_path.display()
        );
        return Ok(None);
    }

    let index = (0usize..)
        .find(|i| !sections.contains(&format!("Profile{}", i)))
        .unwrap_or(sections.len());
    let section = format!("Profile{}", index);
    let has_default = sections
        .iter()
        .any(|sec| ini.get(sec, "Default").as_deref() == Some("1"));

    if ini.get("General", "StartWithLastProfile").is_none() {
        ini.set("General", "StartWithLastProfile", Some("1".to_string()));
    }
    ini.set(&section, "Name", Some(profile_name.to_string()));
    ini.set(&section, "IsRelative", Some("1".to_string()));
    ini.set(&section, "Path", Some(profile_name.to_string()));
    if !has_default {
        ini.set(&section, "Default", Some("1".to_string()));
    }

    Ok(Some(PendingRegistration {
        contents: ini.writes(),
        ini_path,
        section,
        profile_name: profile_name.to_string(),
    }))
}

/// Register a relative profile directory named `profile_name` in profiles.ini
///
/// Creates profiles.ini if needed. The first profile registered becomes the
/// default. Returns `false` when a profile with that name is already listed.
pub fn register_profile(firefox_dir: &Path, profile_name: &str) -> Result<bool> {
    match prepare_registration(firefox_dir, profile_name)? {
        Some(pending) => {
            pending.commit()?;
            Ok(true)
        }
        None => Ok(false),
    }
}
