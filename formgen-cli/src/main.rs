//! # formgen CLI - Template Editor
//!
//! Edits template definitions outside the browser: the same Format, Save and
//! Generate actions, over files instead of an editor pane.
//!
//! ## Usage
//! ```bash
//! # Pretty-print and check a template in place
//! formgen format posts.json --write
//!
//! # Store it in the template collection
//! formgen save posts.json
//!
//! # Ask the templating endpoint to scaffold it
//! formgen generate posts.json
//!
//! # Run system diagnostics
//! formgen doctor
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled, settings::Style};

use formgen::prelude::*;

mod config_loader;
mod wizard;

use config_loader::CliConfig;

/// Template editor CLI
#[derive(Parser, Debug)]
#[command(name = "formgen")]
#[command(author = "formgen contributors")]
#[command(version)]
#[command(about = "Validate, store and scaffold JSON-described CRUD templates", long_about = None)]
struct Args {
    /// Enable file logging to logs/ directory
    #[arg(long, default_value = "false")]
    log: bool,

    /// Template collection file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a fresh template, or build one interactively
    New {
        /// Ask for names and fields instead of printing the skeleton
        #[arg(long)]
        interactive: bool,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate and pretty-print a template file
    Format {
        file: PathBuf,
        /// Rewrite the file with the formatted text
        #[arg(long)]
        write: bool,
    },
    /// Fully validate a template file without storing it
    Validate { file: PathBuf },
    /// Validate a template file and save it to the collection
    Save {
        file: PathBuf,
        /// Rewrite the file with the stored template (carrying its uid)
        #[arg(long)]
        write: bool,
    },
    /// List stored templates
    List,
    /// Print a stored template
    Show { uid: String },
    /// Remove a stored template
    Remove { uid: String },
    /// Show the fields of a template file and their scaffolded types
    Inspect { file: PathBuf },
    /// List the recognized field types
    Types,
    /// Format a template file and send it to the templating endpoint
    Generate {
        file: PathBuf,
        /// Validate and show the payload without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Run diagnostics to check configuration and storage
    Doctor,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = CliConfig::load();

    let _file_guard = init_tracing(args.log || config.enable_logging.unwrap_or(false));

    if let Err(e) = run(args, config).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Console logging always; file logging under `logs/` when enabled.
fn init_tracing(file_logging: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let directive = if file_logging { "formgen=debug" } else { "formgen=info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
    );
    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if file_logging && std::fs::create_dir_all("logs").is_ok() {
        let file_appender = tracing_appender::rolling::daily("logs", "formgen.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();

        tracing::info!("--- formgen session started [{}] ---", chrono::Utc::now());
        Some(guard)
    } else {
        tracing_subscriber::registry().with(env_filter).with(console).init();
        None
    }
}

async fn run(args: Args, config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());

    match args.command {
        Commands::New { interactive, output } => {
            let template = if interactive {
                wizard::run_wizard_mode()?
            } else {
                Template::skeleton()
            };
            let text = template.to_pretty_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &text)?;
                    println!("{} {}", "Wrote".green(), path.display());
                }
                None => println!("{}", text),
            }
        }
        Commands::Format { file, write } => {
            let formatted = format_text(&read(&file)?)?;
            if write {
                std::fs::write(&file, &formatted)?;
                println!("{} {}", "Formatted".green(), file.display());
            } else {
                println!("{}", formatted);
            }
        }
        Commands::Validate { file } => {
            let template = Template::parse(&read(&file)?)?;
            println!(
                "{} {} ({} fields)",
                "Valid".green().bold(),
                file.display(),
                template.schema.fields().len()
            );
        }
        Commands::Save { file, write } => {
            let store = TemplateStore::load(&store_path)?;
            let mut editor = TemplateEditor::with_store(config.generator_config()?, store);
            editor.set_text(read(&file)?);

            let report = editor.save()?;
            if write && report.outcome == SaveOutcome::Created {
                std::fs::write(&file, editor.text())?;
            }
            editor.into_store().persist(&store_path)?;

            let verb = match report.outcome {
                SaveOutcome::Created => "Created",
                SaveOutcome::Updated => "Updated",
            };
            println!("{} template {}", verb.green().bold(), report.uid.bright_cyan());
        }
        Commands::List => {
            let store = TemplateStore::load(&store_path)?;
            if store.is_empty() {
                println!("{}", format!("No templates in {}", store_path.display()).dimmed());
                return Ok(());
            }
            let rows: Vec<TemplateRow> = store.iter().map(TemplateRow::from).collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Commands::Show { uid } => {
            let store = TemplateStore::load(&store_path)?;
            let template = store.get(&uid).ok_or(FormgenError::UnknownUid(uid))?;
            println!("{}", template.to_pretty_json()?);
        }
        Commands::Remove { uid } => {
            let store = TemplateStore::load(&store_path)?;
            store.without(&uid)?.persist(&store_path)?;
            println!("{} template {}", "Removed".yellow().bold(), uid);
        }
        Commands::Inspect { file } => {
            let template = Template::parse(&read(&file)?)?;
            let rows: Vec<FieldRow> = template
                .schema
                .fields()
                .into_iter()
                .map(|f| FieldRow {
                    path: f.path,
                    tag: f.field_type.base.to_string(),
                    ts_type: f.field_type.base.ts_type().to_string(),
                    options: f.field_type.options.join(", "),
                    readonly: f.field_type.readonly,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Commands::Types => {
            let rows: Vec<TypeRow> = TypeTag::all()
                .into_iter()
                .map(|t| TypeRow {
                    tag: t.to_string(),
                    kind: format!("{:?}", t.value_kind()),
                    ts_type: t.ts_type().to_string(),
                    options: t.accepts_options(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Commands::Generate { file, dry_run } => {
            let generator = config.generator_config()?;
            let mut editor = TemplateEditor::new(generator.clone());
            editor.set_text(read(&file)?);

            let report = if dry_run {
                let assembler = StaticTemplateAssembler::new();
                let report = editor.generate(&assembler).await?;
                for payload in assembler.received() {
                    println!("{}", payload);
                }
                report
            } else {
                send(&mut editor, &generator).await?
            };
            println!("{} {}", "Scaffolded at".green().bold(), report.base_path.bright_cyan());
        }
        Commands::Doctor => run_doctor(&config, &store_path)?,
    }
    Ok(())
}

#[cfg(feature = "http")]
async fn send(editor: &mut TemplateEditor, generator: &GeneratorConfig) -> Result<GenerationReport, FormgenError> {
    let assembler = HttpTemplateAssembler::new(generator);
    println!("{}", format!("Sending to {}...", assembler.endpoint()).dimmed());
    editor.generate(&assembler).await
}

#[cfg(not(feature = "http"))]
async fn send(_editor: &mut TemplateEditor, _generator: &GeneratorConfig) -> Result<GenerationReport, FormgenError> {
    Err(FormgenError::Configuration(
        "Compiled without 'http'; use --dry-run".to_string(),
    ))
}

fn read(path: &Path) -> Result<String, FormgenError> {
    std::fs::read_to_string(path)
        .map_err(|e| FormgenError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

#[derive(Tabled)]
struct TemplateRow {
    uid: String,
    name: String,
    route: String,
    fields: usize,
}

impl From<&Template> for TemplateRow {
    fn from(t: &Template) -> Self {
        Self {
            uid: t.uid.clone().unwrap_or_default(),
            name: t.template_name.clone(),
            route: t.naming_convention.route_name().unwrap_or("-").to_string(),
            fields: t.schema.fields().len(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    path: String,
    tag: String,
    #[tabled(rename = "ts type")]
    ts_type: String,
    options: String,
    readonly: bool,
}

#[derive(Tabled)]
struct TypeRow {
    tag: String,
    kind: String,
    #[tabled(rename = "ts type")]
    ts_type: String,
    options: bool,
}

/// Run doctor diagnostics
fn run_doctor(config: &CliConfig, store_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "formgen doctor".bright_cyan().bold());
    println!("═══════════════════════════════════════════════\n");

    println!("1. System Information:");
    println!("   OS: {}", std::env::consts::OS);
    println!("   Arch: {}", std::env::consts::ARCH);
    println!("   CLI Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\n2. Configuration:");
    match CliConfig::config_path() {
        Some(path) if path.exists() => println!("   Config File: {:?}", path),
        Some(path) => println!("   Config File: {:?} (not present, using defaults)", path),
        None => println!("   Config File: unavailable on this platform"),
    }
    match config.generator_config() {
        Ok(generator) => {
            println!("   Endpoint: {} {}", generator.endpoint, "✓ OK".green());
            println!("   Timeout: {}s", generator.timeout_seconds);
        }
        Err(e) => println!("   Endpoint: {} {}", "✗ INVALID".red(), e),
    }
    #[cfg(not(feature = "http"))]
    println!("   HTTP Generation: Disabled (Compiled without 'http')");

    println!("\n3. Storage:");
    println!("   Template Store: {:?}", store_path);
    match TemplateStore::load(store_path) {
        Ok(store) => println!("   Templates: {} {}", store.len(), "✓ OK".green()),
        Err(e) => println!("   Templates: {} {}", "✗ FAILED".red(), e),
    }

    println!("\nDiagnostics Complete.\n");
    Ok(())
}
