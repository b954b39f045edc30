//! # skelprefs - skeleton browser preferences
//!
//! This library ships the default `prefs.js` that an account-provisioning
//! skeleton (`/etc/skel`) places in every new user's browser profile, and the
//! small amount of code needed around it: a reader and writer for the prefs.js
//! format, and a byte-for-byte copy into a new home directory.
//!
//! ## Features
//!
//! - Bundled skeleton prefs.js ([`SKELETON_PREFS`])
//! - Parse prefs.js content into typed records (bool, integer, string)
//! - Render records back to the canonical prefs.js form
//! - Install prefs.js verbatim into `~/.mozilla/firefox/<profile>/` with
//!   read-back verification and profiles.ini registration
//! - Copy a whole skeleton directory into a home directory
//! - Query records using glob patterns (e.g., `"network.proxy.*"`)
//!
//! ## Quick Start
//!
//! ### Reading the skeleton
//!
//! ```rust
//! use skelprefs::{parse_prefs_bytes, PrefValue, SKELETON_PREFS};
//!
//! let prefs = parse_prefs_bytes(SKELETON_PREFS)?;
//! let homepage = prefs.get("browser.startup.homepage").unwrap();
//! assert_eq!(homepage.value.as_str(), Some("http://www.math.kyoto-u.ac.jp/"));
//! assert_eq!(prefs.get("network.proxy.type").unwrap().value, PrefValue::Integer(2));
//! # Ok::<(), skelprefs::Error>(())
//! ```
//!
//! ### Round trip
//!
//! ```rust
//! use skelprefs::{parse_prefs_js, render, PrefEntry, PrefFile};
//!
//! let file = PrefFile::from_entries(vec![
//!     PrefEntry::new("browser.tabs.forceHide", false),
//!     PrefEntry::new("intl.charsetmenu.browser.cache", "ISO-2022-JP, UTF-8, Shift_JIS"),
//! ])?;
//! let reparsed = parse_prefs_js(&render(&file))?;
//! assert!(reparsed.same_prefs(&file));
//! # Ok::<(), skelprefs::Error>(())
//! ```
//!
//! ### Provisioning a new user
//!
//! ```rust,no_run
//! use skelprefs::{install_prefs, ProvisionConfig, SKELETON_PREFS};
//! use std::path::Path;
//!
//! let report = install_prefs(SKELETON_PREFS, Path::new("/home/newuser"), &ProvisionConfig::default())?;
//! println!("wrote {}", report.prefs_path.display());
//! # Ok::<(), skelprefs::Error>(())
//! ```
//!
//! ### Querying Preferences
//!
//! ```rust
//! use skelprefs::{parse_prefs_bytes, query_preferences, SKELETON_PREFS};
//!
//! let prefs = parse_prefs_bytes(SKELETON_PREFS)?;
//! let proxy = query_preferences(prefs.entries(), &["network.proxy.*"])?;
//! assert_eq!(proxy.len(), 2);
//! # Ok::<(), skelprefs::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All functions return [`Result<T, Error>`]:
//!
//! ```rust
//! use skelprefs::{parse_prefs_js, Error};
//!
//! match parse_prefs_js("user_pref(invalid syntax") {
//!     Ok(_) => println!("Parsed successfully"),
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

// Re-export all public types at crate root
pub use types::{PrefEntry, PrefFile, PrefType, PrefValue};

// Re-export error types
pub use error::{Error, Result};

pub use parser::{parse_prefs_bytes, parse_prefs_js, parse_prefs_js_file};
pub use writer::{
    render, render_entry, write_atomic, write_atomic_new, write_prefs_file, PREFS_HEADER,
};
pub use query::query_preferences;

pub use profile::{
    find_profile_path, get_prefs_path, get_profiles_ini_path, list_profiles, prepare_registration,
    register_profile, validate_profile_name, PendingRegistration, ProfileInfo,
};
pub use provision::{
    copy_skeleton_tree, firefox_dir, install_prefs, profile_dir, verify_copy, ProvisionConfig,
    ProvisionReport, FIREFOX_DIR, SKELETON_PREFS,
};

// All modules are private - use re-exports above for public API
mod error;
mod lexer;
mod parser;
mod profile;
mod provision;
mod query;
mod types;
mod writer;
