use anyhow::{anyhow, Context, Result};
use clap::Parser;
use follow::diagram::{self, DiagramConfig};
use follow::model::Resolved;
use follow::output::{self, OutputFormat};
use follow::parser::parse_description;
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

const FEASIBILITY_DEMO: &str = include_str!("../demos/feasibility.follow");

#[derive(Parser, Debug)]
#[command(name = "follow")]
#[command(about = "Resolve follow references between music sequences", long_about = None)]
struct Args {
    #[arg(help = "Description file, or - for stdin (defaults to the built-in feasibility demo)")]
    description: Option<PathBuf>,

    #[arg(short = 's', long = "sequence", help = "Entity to resolve (defaults to the first declared sequence)")]
    sequence: Option<String>,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::List, help = "Output format")]
    format: OutputFormat,

    #[arg(long = "dot", help = "Write the reference diagram as Graphviz DOT")]
    dot: Option<PathBuf>,

    #[arg(long = "png", help = "Write the reference diagram as PNG")]
    png: Option<PathBuf>,

    #[arg(long = "width", default_value = "1200", help = "Minimum diagram width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "800", help = "Minimum diagram height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Diagram title")]
    title: Option<String>,

    #[arg(long = "validate", help = "Check every stored binding before resolving")]
    validate: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = match &args.description {
        Some(path) if path.as_os_str() == "-" => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read description from stdin")?;
            source
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read description {}", path.display()))?,
        None => FEASIBILITY_DEMO.to_string(),
    };

    let graph = parse_description(&source).context("Failed to load description")?;
    info!("loaded {} entities", graph.len());

    if args.validate {
        let issues = graph.validate();
        for issue in &issues {
            eprintln!("{}[{}]: {}", issue.entity, issue.position, issue.problem);
        }
        if !issues.is_empty() {
            anyhow::bail!("Found {} invalid binding(s)", issues.len());
        }
    }

    let (target_id, target) = match &args.sequence {
        Some(name) => graph
            .find(name)
            .ok_or_else(|| anyhow!("Entity '{}' not found", name))?,
        None => graph
            .first_sequence()
            .ok_or_else(|| anyhow!("Description declares no sequence"))?,
    };

    let resolved = graph.resolve_all(target_id);

    if args.dot.is_some() || args.png.is_some() {
        let config = DiagramConfig {
            title: args.title.clone(),
            notes: resolved
                .as_ref()
                .map(|results| vec![compiles_to(&target.label, results)])
                .unwrap_or_default(),
            width: args.width,
            height: args.height,
        };

        if let Some(path) = &args.dot {
            fs::write(path, diagram::render_dot(&graph, &config))
                .with_context(|| format!("Failed to write DOT to {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        if let Some(path) = &args.png {
            let png_bytes = diagram::render_png(&graph, &config)?;
            fs::write(path, png_bytes)
                .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
            info!("wrote {}", path.display());
        }
    }

    let results = resolved.with_context(|| format!("Failed to resolve '{}'", target.name))?;

    let stdout = io::stdout();
    output::write_resolved(stdout.lock(), &results, args.format)
        .context("Failed to write results to stdout")?;

    Ok(())
}

/// "Main compiles to\n1/2 E, 1/8 D, 1/8 E"
fn compiles_to(label: &str, results: &[Resolved]) -> String {
    let positions: Vec<String> = results.iter().map(|r| r.leaves().join(" ")).collect();
    format!("{} compiles to\n{}", label, positions.join(", "))
}
