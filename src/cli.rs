use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for skelprefs
#[derive(Parser, Debug)]
#[command(name = "skelprefs", version)]
#[command(about = "Inspect and install skeleton browser preferences for new user accounts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print preferences as JSON (the bundled skeleton if no file is given)
    Show {
        /// prefs.js file to read
        file: Option<PathBuf>,

        /// Only show keys matching this glob pattern (repeatable)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Print a single preference value without JSON wrapping
        #[arg(long, conflicts_with = "queries")]
        get: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputType::JsonObject)]
        output: OutputType,
    },

    /// Validate a prefs.js file and print a summary
    Check {
        /// prefs.js file to validate
        file: PathBuf,
    },

    /// Print the canonical form of a prefs.js file
    Render {
        /// prefs.js file to read (the bundled skeleton if omitted)
        file: Option<PathBuf>,
    },

    /// Copy prefs.js verbatim into a user's browser profile
    Install {
        /// Home directory of the new user
        #[arg(long)]
        home: PathBuf,

        /// Source prefs.js (the bundled skeleton if omitted)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Profile directory name under ~/.mozilla/firefox
        #[arg(short, long, default_value = "default")]
        profile: String,

        /// Replace an existing prefs.js
        #[arg(long)]
        overwrite: bool,

        /// Copy without parsing the source first
        #[arg(long)]
        no_verify: bool,

        /// Do not add the profile to profiles.ini
        #[arg(long)]
        no_register: bool,
    },

    /// Copy a whole skeleton directory into a home directory
    CopySkel {
        /// Skeleton directory (e.g. /etc/skel)
        #[arg(long)]
        skel: PathBuf,

        /// Home directory of the new user
        #[arg(long)]
        home: PathBuf,

        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// List profiles registered under a home directory
    Profiles {
        /// Home directory to inspect
        #[arg(long)]
        home: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    /// {"key": value, ...}
    JsonObject,
    /// [{"key": ..., "value": ..., "pref_type": ...}, ...]
    JsonArray,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install_flags() {
        let cli = Cli::try_parse_from([
            "skelprefs",
            "install",
            "--home",
            "/home/newuser",
            "--overwrite",
            "--no-register",
        ])
        .unwrap();
        match cli.command {
            Commands::Install {
                home,
                source,
                profile,
                overwrite,
                no_verify,
                no_register,
            } => {
                assert_eq!(home, PathBuf::from("/home/newuser"));
                assert!(source.is_none());
                assert_eq!(profile, "default");
                assert!(overwrite);
                assert!(!no_verify);
                assert!(no_register);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_queries() {
        let cli = Cli::try_parse_from([
            "skelprefs", "show", "-q", "network.*", "-q", "browser.*", "-o", "json-array",
        ])
        .unwrap();
        match cli.command {
            Commands::Show {
                file,
                queries,
                output,
                ..
            } => {
                assert!(file.is_none());
                assert_eq!(queries, vec!["network.*", "browser.*"]);
                assert_eq!(output, OutputType::JsonArray);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
