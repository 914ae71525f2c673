//! Command handlers. Each returns the text destined for stdout; the binary
//! does the printing and picks the exit code.

use std::io;
use std::path::Path;
use tracing::info;

use super::{Cli, Commands};
use crate::config::LsifConfig;
use crate::error::{LsifError, Result};
use crate::filter::{Filter, FilterSpec};
use crate::graph::{load_elements, read_elements, Element, ElementGraph};
use crate::render::{render_dot, RenderOptions};
use crate::validate::{JsonSchemaChecker, ShapeChecker, Validator};

/// Text for stdout and whether the command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Load the input named by `cli` and run its command.
pub fn execute(cli: &Cli) -> Result<CommandOutput> {
    let config = LsifConfig::load(&cli.config);
    let format = cli.input_format.unwrap_or(config.input_format);

    let elements = if cli.stdin {
        read_elements(io::stdin().lock(), format)?
    } else {
        load_elements(&cli.input, format)?
    };

    let spec = FilterSpec::from(cli.filter.clone());
    match &cli.command {
        Commands::Validate { schema, json } => {
            let schema = schema.as_deref().or(config.schema.as_deref());
            validate(elements, spec, schema, &config.exempt_labels, *json)
        }
        Commands::Visualize {
            seeds,
            distance,
            verbose,
            graph_name,
        } => {
            let mut options = config.render_options();
            options.verbose |= *verbose;
            if let Some(name) = graph_name {
                options.graph_name = name.clone();
            }
            let mut spec = spec;
            spec.id.extend(seeds.iter().cloned());
            let dot = visualize(elements, spec, distance.unwrap_or(config.distance), &options)?;
            Ok(CommandOutput::ok(dot))
        }
        Commands::Search { ids_only } => Ok(CommandOutput::ok(search(&elements, spec, *ids_only)?)),
    }
}

/// Validate the dump, reporting only on filtered elements when a filter is set.
pub fn validate(
    elements: Vec<Element>,
    spec: FilterSpec,
    schema: Option<&Path>,
    exempt_labels: &[String],
    json: bool,
) -> Result<CommandOutput> {
    let checker = schema.map(JsonSchemaChecker::load).transpose()?;

    let mut validator = Validator::new().with_exempt_labels(exempt_labels.to_vec());
    if let Some(checker) = &checker {
        validator = validator.with_shape_checker(checker as &dyn ShapeChecker);
    }
    if !spec.is_empty() {
        let scope = Filter::new(spec)?.filtered_ids(&elements);
        info!(elements = scope.len(), "validating filtered elements");
        validator = validator.with_scope(scope);
    }

    let report = validator.validate(&elements);
    let text = if json {
        serde_json::to_string_pretty(&report).map_err(LsifError::EncodeReport)?
    } else {
        report.to_string()
    };

    Ok(CommandOutput {
        text: format!("{}\n", text),
        success: report.is_valid(),
    })
}

/// Expand around the filtered elements and render the result as DOT.
pub fn visualize(
    elements: Vec<Element>,
    spec: FilterSpec,
    distance: usize,
    options: &RenderOptions,
) -> Result<String> {
    let seeds = Filter::new(spec)?.filtered_ids(&elements);
    let graph = ElementGraph::new(elements);
    let stats = graph.stats();
    info!(
        vertices = stats.vertex_count,
        edges = stats.edge_count,
        unknown = stats.unknown_count,
        "indexed dump"
    );
    let subgraph = graph.expand(&seeds, distance)?;
    info!(
        seeds = seeds.len(),
        distance,
        vertices = subgraph.vertices.len(),
        edges = subgraph.edges.len(),
        "rendering neighborhood"
    );
    Ok(render_dot(&subgraph, options))
}

/// One line per filtered element: its compact JSON, or just its id.
pub fn search(elements: &[Element], spec: FilterSpec, ids_only: bool) -> Result<String> {
    let filter = Filter::new(spec)?;
    let mut out = String::new();
    for element in filter.select(elements) {
        if ids_only {
            out.push_str(element.id().as_str());
        } else {
            out.push_str(&element.to_json_string());
        }
        out.push('\n');
    }
    Ok(out)
}
