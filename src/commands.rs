//! CLI command definitions
//!
//! All CLI structs and subcommand enums are defined here.

use armm::config::OutputFormat;
use armm::manifest::ElementKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// armm - Android repo manifest management
#[derive(Parser, Debug)]
#[command(name = "armm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Manifest file to edit (default: default.xml, or the config file setting)
    #[arg(short, long, global = true, env = "ARMM_MANIFEST")]
    pub file: Option<PathBuf>,

    /// Path to config file (default: ~/.config/armm/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for listings
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new empty manifest
    Init {
        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },

    /// Add an element or update its attributes
    Set {
        /// Element name (remote, project, annotation, ...)
        element: ElementKind,

        /// Apply inside this project instead of the manifest root
        #[arg(short, long)]
        project: Option<String>,

        /// Attribute as key=value (notice takes text=...)
        #[arg(short = 'a', long = "attr", value_parser = parse_key_value)]
        attrs: Vec<(String, String)>,
    },

    /// Remove an element or some of its attributes
    Remove {
        /// Element name
        element: ElementKind,

        /// Identity value of the element (ignored for unique elements)
        name: Option<String>,

        /// Remove from inside this project instead of the manifest root
        #[arg(short, long)]
        project: Option<String>,

        /// Remove only this attribute (repeatable)
        #[arg(short = 'a', long = "attr")]
        attrs: Vec<String>,
    },

    /// List elements, optionally filtered
    List {
        /// Element name
        element: ElementKind,

        /// List inside this project instead of the manifest root
        #[arg(short, long)]
        project: Option<String>,

        /// Filter attribute name, paired with --value
        #[arg(short, long = "key")]
        keys: Vec<String>,

        /// Filter value: exact, ~regex or ~!regex
        #[arg(short, long = "value", allow_hyphen_values = true)]
        values: Vec<String>,

        /// Print only this attribute
        #[arg(short = 'a', long = "attr")]
        attr: Option<String>,
    },

    /// Show the element registry
    Elements,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set() {
        let cli = Cli::parse_from([
            "armm", "-f", "m.xml", "set", "remote", "-a", "name=origin", "-a", "fetch=https://x?a=b",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("m.xml")));
        match cli.command {
            Commands::Set { element, project, attrs } => {
                assert_eq!(element, ElementKind::Remote);
                assert_eq!(project, None);
                assert_eq!(attrs[1], ("fetch".to_string(), "https://x?a=b".to_string()));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::parse_from([
            "armm", "list", "project", "-k", "name", "-v", "~!^test", "-a", "path", "--format", "json",
        ]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::List { keys, values, attr, .. } => {
                assert_eq!(keys, vec!["name"]);
                assert_eq!(values, vec!["~!^test"]);
                assert_eq!(attr.as_deref(), Some("path"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_element_rejected() {
        assert!(Cli::try_parse_from(["armm", "set", "bogus"]).is_err());
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
