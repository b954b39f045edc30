//! Serialization of preference records back to prefs.js form
//!
//! The output is the canonical form: the fixed Mozilla comment header, a
//! blank line, then one statement per record in insertion order.

use crate::error::{Error, Result};
use crate::types::{PrefEntry, PrefFile, PrefValue};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

/// Comment header written at the top of every prefs.js file
pub const PREFS_HEADER: &str = "# Mozilla User Preferences

/* Do not edit this file.
 *
 * If you make changes to this file while the application is running,
 * the changes will be overwritten when the application exits.
 *
 * To make a manual change to preferences, you can visit the URL about:config
 * For more information, see http://www.mozilla.org/unix/customizing.html#prefs
 */

";

/// Render a file to its canonical prefs.js text
///
/// ```rust
/// use skelprefs::{parse_prefs_js, render, PrefEntry, PrefFile};
///
/// let file = PrefFile::from_entries(vec![
///     PrefEntry::new("network.proxy.type", 2),
///     PrefEntry::new("browser.startup.homepage", "http://www.math.kyoto-u.ac.jp/"),
/// ])?;
/// let text = render(&file);
/// assert!(text.ends_with("user_pref(\"network.proxy.type\", 2);\nuser_pref(\"browser.startup.homepage\", \"http://www.math.kyoto-u.ac.jp/\");\n"));
/// assert_eq!(parse_prefs_js(&text)?, file);
/// # Ok::<(), skelprefs::Error>(())
/// ```
pub fn render(file: &PrefFile) -> String {
    let mut out = String::from(PREFS_HEADER);
    for entry in file.entries() {
        render_entry(&mut out, entry);
    }
    out
}

/// Render a single statement, including the trailing newline
pub fn render_entry(out: &mut String, entry: &PrefEntry) {
    out.push_str(entry.pref_type.function_name());
    out.push('(');
    push_quoted(out, &entry.key);
    out.push_str(", ");
    match &entry.value {
        PrefValue::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        PrefValue::Integer(n) => {
            let _ = write!(out, "{}", n);
        }
        PrefValue::String(s) => push_quoted(out, s),
    }
    out.push_str(");\n");
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn staged_temp_file(path: &Path, bytes: &[u8]) -> Result<tempfile::NamedTempFile> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Write bytes to `path` atomically: temp file in the same directory, then rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = staged_temp_file(path, bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Like [`write_atomic`], but fails with [`Error::AlreadyExists`] if anything
/// (including a dangling symlink) is at `path` when the rename happens
pub fn write_atomic_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = staged_temp_file(path, bytes)?;
    tmp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            Error::AlreadyExists(path.to_path_buf())
        } else {
            Error::Io(e.error)
        }
    })?;
    log::debug!("created {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Render and atomically write a prefs.js file
pub fn write_prefs_file(path: &Path, file: &PrefFile) -> Result<()> {
    write_atomic(path, render(file).as_bytes())
}
