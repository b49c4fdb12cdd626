use chatloom::parse::{Lang, Parser};
use chatloom::prelude::{build_flow, FlowBuilder, StorageClient};
use chatloom::storage::normalize_filename;
use clap::{Parser as ClapParser, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// CLI-specific language selector for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LangCli {
    Auto,
    En,
    Zh,
}

impl From<LangCli> for Lang {
    fn from(lang: LangCli) -> Self {
        match lang {
            LangCli::Auto => Lang::Auto,
            LangCli::En => Lang::En,
            LangCli::Zh => Lang::Zh,
        }
    }
}

/// One-shot chatflow generation from a free-text description
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Free-text description of the conversation flow
    description: String,

    /// Workflow name, also used as the output filename
    #[arg(short, long)]
    name: String,

    /// Description language
    #[arg(short, long, value_enum, default_value = "auto")]
    lang: LangCli,

    /// Output directory for the generated document
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// Also upload the document to object storage
    #[arg(long)]
    upload: bool,

    /// Storage namespace for uploads
    #[arg(long, default_value = "public")]
    user: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let lang: Lang = cli.lang.into();

    // --- 1. Parse the description ---
    println!("Parsing description...");
    let parsed = Parser::new(lang).parse(&cli.description);
    if parsed.steps.is_empty() {
        exit_with_error("no recognizable steps in the description");
    }
    println!(
        "  -> {} steps detected ({})",
        parsed.summary.total_steps,
        parsed.summary.node_types.join(", ")
    );
    for variable in &parsed.variables {
        println!("  -> variable '{}' ({})", variable.name, variable.description);
    }

    // --- 2. Build the flow ---
    let lang_code = lang.code_for(&cli.description);
    let (builder, warnings) =
        build_flow(&cli.name, &cli.description, lang_code, &parsed.steps)
            .unwrap_or_else(|e| exit_with_error(&format!("flow assembly failed: {e}")));
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }
    print_stats(&builder);

    // --- 3. Export and write ---
    let document = builder.export();
    let report = document.validate();
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    if !report.is_valid() {
        exit_with_error(&format!("invalid document: {}", report.errors.join("; ")));
    }

    if let Err(e) = fs::create_dir_all(&cli.out) {
        exit_with_error(&format!(
            "failed to create output directory '{}': {e}",
            cli.out.display()
        ));
    }
    let path = cli.out.join(normalize_filename(&cli.name));
    if let Err(e) = document.save(&path) {
        exit_with_error(&format!("failed to write '{}': {e}", path.display()));
    }
    println!("Wrote {}", path.display());

    // --- 4. Optional upload ---
    if cli.upload {
        let client = StorageClient::from_env()
            .unwrap_or_else(|e| exit_with_error(&format!("storage configuration error: {e}")));
        let stored = client
            .upload(&document, &cli.name, &cli.user)
            .unwrap_or_else(|e| exit_with_error(&format!("upload failed: {e}")));
        println!("Uploaded {} ({} bytes)", stored.filename, stored.size);
        println!("  -> {}", stored.url);
    }
}

fn print_stats(builder: &FlowBuilder) {
    let stats = builder.stats();
    println!(
        "Built '{}': {} nodes, {} edges, {} variables",
        stats.flow_name, stats.node_count, stats.edge_count, stats.variable_count
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
