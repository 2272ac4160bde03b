use ahash::AHashSet;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::fs;
use yoshiki::prelude::*;

/// Inspect case-management layout documents offline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a JSON form configuration
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the render tree of a view or page
    Render {
        /// Path to the view JSON file
        view_path: String,
        /// Emit the tree as JSON instead of an ASCII tree
        #[arg(long)]
        json: bool,
    },
    /// Print the initial edit state extracted from a view or page
    Values {
        /// Path to the view JSON file
        view_path: String,
    },
    /// Print the nested submission document for a flat `{reference: value}` map
    Nest {
        /// Path to the edits JSON file
        edits_path: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FormConfig::from_json(&read_file(path)).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to parse config '{}': {}", path, e))
        }),
        None => FormConfig::default(),
    };

    match cli.command {
        Command::Render { view_path, json } => run_render(&view_path, json, config),
        Command::Values { view_path } => run_values(&view_path),
        Command::Nest { edits_path } => run_nest(&edits_path, config),
    }
}

fn run_render(view_path: &str, json: bool, config: FormConfig) {
    let view = load_view(view_path);
    let interpreter = LayoutInterpreter::builder().with_config(config).build();

    let values = interpreter.initial_values(&view);
    let errors = ValidationErrors::new();
    let loading = AHashSet::new();
    let ctx = RenderContext::new(&values, &errors, &loading);

    let Some(tree) = interpreter.render(&view, &ctx) else {
        println!("View '{}' is not visible.", view.name);
        return;
    };

    if json {
        let rendered = serde_json::to_string_pretty(&tree)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize tree: {}", e)));
        println!("{}", rendered);
    } else {
        print!("{}", DisplayNode::new(&tree));
    }
}

fn run_values(view_path: &str) {
    let view = load_view(view_path);
    let values = extract_initial_values(&view);

    println!("{} value(s) in '{}':", values.len(), view.name);
    for (reference, value) in values.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        println!("  {} = {}", reference, value);
    }
}

fn run_nest(edits_path: &str, config: FormConfig) {
    let edits: EditState = serde_json::from_str(&read_file(edits_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse edits JSON: {}", e)));

    let translator = ReferenceTranslator::from_config(&config);
    let document = translator
        .to_nested_document(&edits)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let rendered = serde_json::to_string_pretty(&serde_json::json!({ "content": document }))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize document: {}", e)));
    println!("{}", rendered);
}

fn load_view(path: &str) -> View {
    View::from_json(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load view '{}': {}", path, e)))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
