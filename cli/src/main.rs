//! pagetree CLI - document tree validation, editing and pagination tool

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pagetree::editor::{editable_paths, read_content};
use pagetree::render::{pages_to_json, pages_to_text, to_json};
use pagetree::variables::{extract_variables, fill_document, validate_all};
use pagetree::{
    parse_file, update_content, DocumentStats, Error, ExtractOptions, JsonFormat, NodePath,
    PageSize, PaginateOptions,
};

#[derive(Parser)]
#[command(name = "pagetree")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Validate, edit and paginate structured document trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a document against the schema
    Validate {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show document statistics
    Info {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Lay the document out onto pages
    Paginate {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page size
        #[arg(long, value_enum, default_value = "letter")]
        page_size: PageSizeArg,

        /// Uniform page margin in points
        #[arg(long, env = "PAGETREE_MARGIN")]
        margin: Option<f32>,

        /// Content height budget in points (overrides page size and margins)
        #[arg(long)]
        content_height: Option<f32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Replace the content of one node
    Edit {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Node path, e.g. "0.2" or "1,-1,0"
        #[arg(value_name = "PATH", allow_hyphen_values = true)]
        path: String,

        /// New content
        #[arg(value_name = "CONTENT")]
        content: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List editable paths and their content
    Paths {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List template variables
    Vars {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Do not infer types from variable names
        #[arg(long)]
        no_infer: bool,

        /// Print definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate variable values against the document's variables
    Check {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Variable value as KEY=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
    },

    /// Substitute variable values into the document
    Fill {
        /// Input JSON document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Variable value as KEY=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    /// US Letter (612 x 792 pt)
    Letter,
    /// ISO A4 (595 x 842 pt)
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::Letter => PageSize::LETTER,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON array of pages
    Json,
    /// Plain text with page markers
    Text,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Validate { input }) => cmd_validate(&input),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Paginate {
            input,
            output,
            page_size,
            margin,
            content_height,
            format,
            compact,
        }) => {
            let mut options = PaginateOptions::new().with_page_size(page_size.into());
            if let Some(margin) = margin {
                options = options.with_margin(margin);
            }
            if let Some(height) = content_height {
                options = options.with_content_height(height);
            }
            cmd_paginate(&input, output.as_deref(), &options, format, compact)
        }
        Some(Commands::Edit {
            input,
            path,
            content,
            output,
        }) => cmd_edit(&input, &path, &content, output.as_deref()),
        Some(Commands::Paths { input }) => cmd_paths(&input),
        Some(Commands::Vars {
            input,
            no_infer,
            json,
        }) => cmd_vars(&input, !no_infer, json),
        Some(Commands::Check { input, values }) => cmd_check(&input, &values),
        Some(Commands::Fill {
            input,
            values,
            output,
        }) => cmd_fill(&input, &values, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pagetree <COMMAND> <FILE>".yellow());
            println!("       pagetree --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn parse_values(pairs: &[String]) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut values = HashMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| {
                Error::Other(format!("Invalid value \"{}\", expected KEY=VALUE", pair))
            })?;
        values.insert(key.trim().to_string(), value.to_string());
    }
    Ok(values)
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    println!(
        "{} {} ({} nodes)",
        "Valid".green().bold(),
        input.display(),
        doc.node_count()
    );
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let stats = DocumentStats::collect(&doc);
    let pages = pagetree::paginate(&doc, &PaginateOptions::default());

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Top-level nodes".bold(), doc.len());
    println!("{}: {}", "Total nodes".bold(), stats.node_count);
    println!("{}: {} (estimated, Letter)", "Pages".bold(), pages.len());
    if let Some(declared) = doc.declared_variables() {
        println!("{}: {}", "Declared variables".bold(), declared.len());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Text blocks".bold(), stats.text_count);
    println!("{}: {}", "Lists".bold(), stats.list_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Grids".bold(), stats.grid_count);
    println!("{}: {}", "Page breaks".bold(), stats.page_break_count);
    println!("{}: {}", "Placeholders".bold(), stats.placeholder_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_paginate(
    input: &Path,
    output: Option<&Path>,
    options: &PaginateOptions,
    format: OutputFormat,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let pages = pagetree::paginate(&doc, options);
    log::info!(
        "Paginated {} into {} pages (budget {:.1}pt)",
        input.display(),
        pages.len(),
        options.content_budget()
    );

    let rendered = match format {
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            pages_to_json(&pages, json_format)?
        }
        OutputFormat::Text => pages_to_text(&pages),
    };

    write_output(output, &rendered)
}

fn cmd_edit(
    input: &Path,
    path: &str,
    content: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let parsed = NodePath::parse(path)
        .ok_or_else(|| Error::Other(format!("Invalid path \"{}\"", path)))?;

    let edited = update_content(&doc, &parsed.to_raw(), content)?;
    let json = to_json(&edited, JsonFormat::Pretty)?;

    write_output(output, &json)
}

fn cmd_paths(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;

    for path in editable_paths(&doc) {
        let content = read_content(&doc, &path).unwrap_or_default();
        println!("{}  {}", format!("[{}]", path).cyan(), content);
    }

    Ok(())
}

fn cmd_vars(input: &Path, infer: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let options = ExtractOptions::new().with_infer_types(infer);
    let vars = extract_variables(&doc, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&vars)?);
        return Ok(());
    }

    if vars.is_empty() {
        println!("{}", "No variables found".yellow());
        return Ok(());
    }

    for var in &vars {
        let required = if var.required {
            "required".red()
        } else {
            "optional".dimmed()
        };
        println!(
            "{} {} {} ({})",
            var.name.bold(),
            var.var_type.to_string().cyan(),
            var.display_label(),
            required
        );
        if let Some(ref default) = var.default_value {
            println!("  {}: {}", "default".dimmed(), default);
        }
    }

    Ok(())
}

fn cmd_check(input: &Path, pairs: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let values = parse_values(pairs)?;
    let vars = extract_variables(&doc, &ExtractOptions::default());
    let errors = validate_all(&vars, &values);

    if errors.is_empty() {
        println!("{} {} variables", "Valid".green().bold(), vars.len());
        return Ok(());
    }

    for error in &errors {
        println!("{} {} {}", "✗".red(), error.code.as_str().dimmed(), error);
    }
    Err(format!("{} invalid values", errors.len()).into())
}

fn cmd_fill(
    input: &Path,
    pairs: &[String],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;
    let values = parse_values(pairs)?;
    let filled = fill_document(&doc, &values);
    let json = to_json(&filled, JsonFormat::Pretty)?;

    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "pagetree".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structured document tree tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pagetree".dimmed());
    println!("License: MIT");
}
