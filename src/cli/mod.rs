//! CLI module for lsif-inspect.
//!
//! Commands:
//! - validate: ordering, usage and shape checks
//! - visualize: DOT neighborhood of the selected elements
//! - search: list the selected elements

pub mod commands;

pub use commands::{execute, CommandOutput};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::filter::FilterSpec;
use crate::graph::InputFormat;

#[derive(Parser, Debug)]
#[command(name = "lsif-inspect", version)]
#[command(about = "Inspect, filter, validate and visualize LSIF dumps")]
pub struct Cli {
    /// LSIF dump to read
    #[arg(short = 'p', long = "input", global = true, default_value = "./lsif.json")]
    pub input: PathBuf,

    /// Read the dump from stdin instead of --input
    #[arg(long, global = true)]
    pub stdin: bool,

    /// Input layout (default: from config, else auto-detect)
    #[arg(long, value_enum, global = true)]
    pub input_format: Option<InputFormat>,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "lsif.toml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Element selection. Repeat a flag to allow several values; different
/// flags must all match.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep elements with this id
    #[arg(long = "id", global = true, value_name = "ID")]
    pub id: Vec<String>,

    /// Keep edges pointing to this vertex
    #[arg(long = "in-v", visible_alias = "inV", global = true, value_name = "ID")]
    pub in_v: Vec<String>,

    /// Keep edges leaving this vertex
    #[arg(long = "out-v", visible_alias = "outV", global = true, value_name = "ID")]
    pub out_v: Vec<String>,

    /// Keep elements of this type (vertex, edge)
    #[arg(long = "type", global = true, value_name = "TYPE")]
    pub element_type: Vec<String>,

    /// Keep elements with this label
    #[arg(long, global = true)]
    pub label: Vec<String>,

    /// Keep elements with this `property` value
    #[arg(long, global = true)]
    pub property: Vec<String>,

    /// Keep elements whose JSON text matches this pattern
    #[arg(long, global = true)]
    pub regex: Option<String>,
}

impl From<FilterArgs> for FilterSpec {
    fn from(args: FilterArgs) -> Self {
        FilterSpec {
            id: args.id,
            in_v: args.in_v,
            out_v: args.out_v,
            element_type: args.element_type,
            label: args.label,
            property: args.property,
            regex: args.regex,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check element order, vertex usage and (with a schema) element shapes
    Validate {
        /// JSON schema with one definition per element label
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the neighborhood of the selected elements as a DOT digraph
    Visualize {
        /// Seed ids (added to --id)
        seeds: Vec<String>,

        /// How many hops to take from the seeds
        #[arg(short, long)]
        distance: Option<usize>,

        /// Include vertex payload fields
        #[arg(short, long)]
        verbose: bool,

        /// Name of the digraph
        #[arg(long)]
        graph_name: Option<String>,
    },

    /// Print the selected elements, one JSON object per line
    Search {
        /// Print ids only
        #[arg(long)]
        ids_only: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["lsif-inspect", "validate", "-p", "dump.lsif", "--label", "range"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("dump.lsif"));
        assert_eq!(cli.filter.label, vec!["range"]);
        assert!(matches!(cli.command, Commands::Validate { schema: None, json: false }));
    }

    #[test]
    fn test_parse_visualize_with_seeds() {
        let cli = Cli::try_parse_from([
            "lsif-inspect", "visualize", "1", "7", "-d", "2", "-v", "--inV", "3",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("./lsif.json"));
        assert_eq!(cli.filter.in_v, vec!["3"]);
        match cli.command {
            Commands::Visualize { seeds, distance, verbose, graph_name } => {
                assert_eq!(seeds, vec!["1", "7"]);
                assert_eq!(distance, Some(2));
                assert!(verbose);
                assert!(graph_name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_input_format() {
        let cli = Cli::try_parse_from(["lsif-inspect", "--input-format", "json", "--stdin", "search"]).unwrap();
        assert_eq!(cli.input_format, Some(InputFormat::Json));
        assert!(cli.stdin);
    }

    #[test]
    fn test_filter_args_to_spec() {
        let cli = Cli::try_parse_from([
            "lsif-inspect", "search", "--id", "1", "--id", "2", "--type", "edge", "--regex", "uri",
        ])
        .unwrap();
        let spec = FilterSpec::from(cli.filter);
        assert_eq!(spec.id, vec!["1", "2"]);
        assert_eq!(spec.element_type, vec!["edge"]);
        assert_eq!(spec.regex.as_deref(), Some("uri"));
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["lsif-inspect"]).is_err());
    }
}
