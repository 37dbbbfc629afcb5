use clap::{Parser, Subcommand};
use notes_editor::config::{config_file_path, load_config};
use notes_editor::{EditorConfiguration, Intent, NotesDocument, NotesEditor, sample_document};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notes")]
#[command(about = "Inspect and edit block-structured notes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the demo note as JSON
    Demo,
    /// Show the block outline of a note
    Show {
        /// Note file (JSON)
        file: PathBuf,
    },
    /// Replay a list of edit intents against a note
    Apply {
        /// Note file (JSON)
        file: PathBuf,
        /// Intent list (JSON array)
        intents: PathBuf,
        /// Where to write the result (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Editor configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn read_document(path: &Path) -> Result<NotesDocument, String> {
    let data =
        fs::read(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    NotesDocument::from_json(&data).map_err(|e| format!("Failed to load '{}': {}", path.display(), e))
}

fn cmd_demo() -> Result<(), String> {
    let json = sample_document()
        .to_json_pretty()
        .map_err(|e| format!("Failed to encode document: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn cmd_show(file: &Path) -> Result<(), String> {
    let document = read_document(file)?;
    print!("{}", document);
    Ok(())
}

fn cmd_apply(
    file: &Path,
    intents: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), String> {
    let config = match config.map(Path::to_path_buf).or_else(config_file_path) {
        Some(path) => load_config(&path).map_err(|e| e.to_string())?,
        None => EditorConfiguration::default(),
    };

    let mut document = read_document(file)?;
    let script = fs::read_to_string(intents)
        .map_err(|e| format!("Failed to read '{}': {}", intents.display(), e))?;
    let intents: Vec<Intent> = serde_json::from_str(&script)
        .map_err(|e| format!("Failed to parse '{}': {}", intents.display(), e))?;

    let mut editor = NotesEditor::new();
    for intent in &intents {
        if !config.permits(intent) {
            warn!(?intent, "intent disabled by configuration, skipping");
            continue;
        }
        document = editor.apply(&document, intent);
        if let Some(request) = editor.take_focus_request() {
            info!(block = %request.block_id, position = ?request.position, "focus");
        }
    }

    let json = document
        .to_json_pretty()
        .map_err(|e| format!("Failed to encode document: {}", e))?;
    match output {
        Some(path) => fs::write(path, json)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e)),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match &args.command {
        Commands::Demo => cmd_demo(),
        Commands::Show { file } => cmd_show(file),
        Commands::Apply {
            file,
            intents,
            output,
            config,
        } => cmd_apply(file, intents, output.as_deref(), config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
