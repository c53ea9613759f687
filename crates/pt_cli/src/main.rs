use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pt_catalog::PorterConfig;
use pt_rewrite::{rewrite, RewriteContext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod driver;

use driver::Driver;

#[derive(Parser)]
#[command(name = "porter", about = "porter: rewrite legacy 4D methods into JavaScript")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a project tree into a mirrored output tree.
    Transpile {
        /// Project root containing legacy sources and assets.
        input: PathBuf,
        /// Output root (created if missing).
        output: PathBuf,
        /// Command Library directory, copied to the output's library dir.
        #[arg(short, long)]
        library: Option<PathBuf>,
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Source file extension, overriding the configuration.
        #[arg(long)]
        ext: Option<String>,
        /// Fail when any diagnostic is raised.
        #[arg(long)]
        strict: bool,
    },
    /// Rewrite a single file.
    File {
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Prefix for import paths.
        #[arg(long, default_value = "./lib/")]
        import_prefix: String,
        /// Verify the import preamble parses as an ES module.
        #[arg(long)]
        check: bool,
    },
    /// List the effective command catalog.
    Catalog {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Transpile {
            input,
            output,
            library,
            config,
            ext,
            strict,
        } => {
            let config = load_config(config.as_deref())?;
            let tables = config.tables().context("invalid configuration")?;
            let driver = Driver {
                tables: &tables,
                passes: &config.passes,
                source_extension: ext
                    .as_deref()
                    .map(|e| e.trim_start_matches('.'))
                    .unwrap_or(config.source_extension())
                    .to_string(),
                library_dir: config.library_dir().to_string(),
            };

            std::fs::create_dir_all(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            let summary = driver.run(&input, &output, library.as_deref())?;

            for (path, reason) in &summary.failed {
                warn!(path = %path.display(), "not rewritten: {reason}");
            }
            if !summary.failed.is_empty() {
                bail!("{} file(s) failed to rewrite", summary.failed.len());
            }
            if strict && !summary.diagnostics.is_empty() {
                bail!(
                    "{} diagnostic(s) raised in strict mode",
                    summary.diagnostics.len()
                );
            }
        }
        Commands::File {
            input,
            output,
            config,
            import_prefix,
            check,
        } => {
            let config = load_config(config.as_deref())?;
            let tables = config.tables().context("invalid configuration")?;
            let source = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;

            let ctx = RewriteContext {
                tables: &tables,
                passes: &config.passes,
                import_prefix,
            };
            let result = rewrite(&source, &input, &ctx)?;

            if check {
                pt_emit::validate_module(&result.preamble, &input.display().to_string())?;
            }

            match &output {
                Some(path) => std::fs::write(path, &result.text)?,
                None => print!("{}", result.text),
            }
            info!(
                imports = result.manifest.len(),
                diagnostics = result.diagnostics.len(),
                "rewrote {}",
                input.display()
            );
        }
        Commands::Catalog { config, json } => {
            let config = load_config(config.as_deref())?;
            let tables = config.tables().context("invalid configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(tables.catalog.entries())?);
            } else {
                for entry in tables.catalog.entries() {
                    println!("{}\t{}\t{}", entry.id, entry.ident(), entry.path);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("porter=info,pt_rewrite=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PorterConfig> {
    let Some(path) = path else {
        return Ok(PorterConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    PorterConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}
