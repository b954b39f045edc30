use crate::error::{Error, Result};
use crate::types::PrefEntry;
use glob::Pattern;

/// Select records whose key matches any of the glob patterns (OR logic)
///
/// Record order is preserved.
pub fn query_preferences(preferences: &[PrefEntry], patterns: &[&str]) -> Result<Vec<PrefEntry>> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(preferences
        .iter()
        .filter(|entry| compiled_patterns.iter().any(|pattern| pattern.matches(&entry.key)))
        .cloned()
        .collect())
}
