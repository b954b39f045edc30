use crate::cli::OutputType;
use anyhow::{anyhow, Context};
use skelprefs::{
    copy_skeleton_tree, firefox_dir, install_prefs, list_profiles, parse_prefs_bytes,
    query_preferences, render, PrefFile, PrefValue, ProvisionConfig, SKELETON_PREFS,
};
use std::path::{Path, PathBuf};

/// Read source bytes from a file, or fall back to the bundled skeleton
fn load_source(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).with_context(|| {
            format!(
                "Failed to read {}. Make sure the file exists and is readable.",
                path.display()
            )
        }),
        None => Ok(SKELETON_PREFS.to_vec()),
    }
}

fn load_prefs(file: Option<&Path>) -> anyhow::Result<PrefFile> {
    let bytes = load_source(file)?;
    let name = file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled skeleton".to_string());
    parse_prefs_bytes(&bytes).with_context(|| {
        format!(
            "Failed to parse {}. The file may be corrupted or in an unexpected format.",
            name
        )
    })
}

/// Print preferences as JSON, optionally filtered
pub fn show(
    file: Option<&Path>,
    queries: &[String],
    get: Option<&str>,
    output: OutputType,
) -> anyhow::Result<()> {
    let prefs = load_prefs(file)?;

    // --get mode: single preference retrieval with raw output
    if let Some(key) = get {
        let entry = prefs
            .get(key)
            .ok_or_else(|| anyhow!("Preference '{}' not found", key))?;
        print_raw_value(&entry.value);
        return Ok(());
    }

    let entries = if queries.is_empty() {
        prefs.into_entries()
    } else {
        let patterns: Vec<&str> = queries.iter().map(String::as_str).collect();
        query_preferences(prefs.entries(), &patterns).context("Failed to apply query")?
    };

    let json = match output {
        OutputType::JsonObject => {
            let object: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|e| serde_json::to_value(&e.value).map(|v| (e.key.clone(), v)))
                .collect::<serde_json::Result<_>>()?;
            serde_json::to_string_pretty(&object)?
        }
        OutputType::JsonArray => serde_json::to_string_pretty(&entries)?,
    };
    println!("{}", json);
    Ok(())
}

fn print_raw_value(value: &PrefValue) {
    match value {
        PrefValue::String(s) => println!("{}", s),
        PrefValue::Bool(b) => println!("{}", b),
        PrefValue::Integer(n) => println!("{}", n),
    }
}

/// Validate a file and print a one-line summary per value type
pub fn check(file: &Path) -> anyhow::Result<()> {
    let bytes = load_source(Some(file))?;
    let prefs = parse_prefs_bytes(&bytes)
        .with_context(|| format!("{} is not a valid prefs.js file", file.display()))?;
    let mut counts: Vec<(&str, usize)> = prefs.type_counts().into_iter().collect();
    counts.sort();

    println!("{}: {} preferences", file.display(), prefs.len());
    for (type_name, count) in counts {
        println!("  {}: {}", type_name, count);
    }

    if render(&prefs).as_bytes() == bytes.as_slice() {
        println!("  canonical form: yes");
    } else {
        println!("  canonical form: no");
    }
    Ok(())
}

/// Print the canonical serialization
pub fn render_file(file: Option<&Path>) -> anyhow::Result<()> {
    let prefs = load_prefs(file)?;
    print!("{}", render(&prefs));
    Ok(())
}

pub struct InstallArgs {
    pub home: PathBuf,
    pub source: Option<PathBuf>,
    pub config: ProvisionConfig,
}

/// Copy prefs.js verbatim into the user's profile
pub fn install(args: &InstallArgs) -> anyhow::Result<()> {
    let bytes = load_source(args.source.as_deref())?;
    let report = install_prefs(&bytes, &args.home, &args.config).with_context(|| {
        format!(
            "Failed to install preferences into {}. \
             Use --overwrite to replace an existing prefs.js.",
            args.home.display()
        )
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Copy a skeleton directory into a home directory
pub fn copy_skel(skel: &Path, home: &Path, overwrite: bool) -> anyhow::Result<()> {
    let written = copy_skeleton_tree(skel, home, overwrite).with_context(|| {
        format!(
            "Failed to copy skeleton {} into {}",
            skel.display(),
            home.display()
        )
    })?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// List registered profiles as JSON
pub fn profiles(home: &Path) -> anyhow::Result<()> {
    let profiles = list_profiles(&firefox_dir(home)).with_context(|| {
        format!(
            "Failed to list profiles under {}. Has the account been provisioned?",
            home.display()
        )
    })?;
    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}
