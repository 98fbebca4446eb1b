use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

use plistquill::config::Config;
use plistquill::document::node::Node;
use plistquill::file::format::Format;
use plistquill::file::loader::{load_document_as, load_document_from_stdin};
use plistquill::file::saver::{save_document, write_document_to};
use plistquill::helpers::FileHelpers;
use plistquill::keypath::Evaluator;
use plistquill::script::{Environment, Script, Variables};

/// plistquill - apply an instruction file to a base property list
#[derive(Parser)]
#[command(name = "plistquill")]
#[command(version)]
#[command(about = "Apply path-addressed edits to a property list", long_about = None)]
struct Cli {
    /// Base document (use - to read from stdin)
    base: String,

    /// Instruction file, one expression per line
    instructions: PathBuf,

    /// Value for SystemProductName
    #[arg(long)]
    product: String,

    /// Logic board serial number (MLB)
    #[arg(long)]
    mlb: String,

    /// Base64-encoded 6-byte ROM value
    #[arg(long)]
    rom: String,

    /// System serial number
    #[arg(long)]
    serial: String,

    /// SMBIOS unique system identifier
    #[arg(long)]
    uuid: String,

    /// Include debug configuration (exposed to scripts as vars.Debug)
    #[arg(long)]
    debug: bool,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the input and output (plist, binary-plist, json, yaml)
    #[arg(short, long)]
    format: Option<Format>,

    /// Directory that helper file names are resolved against
    #[arg(short = 'C', long)]
    assets: Option<PathBuf>,

    /// Log every operation
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn variables(&self) -> Result<Variables> {
        Ok(Variables {
            debug: self.debug,
            product: self.product.clone(),
            mlb: self.mlb.clone(),
            rom: Variables::decode_rom(&self.rom).context("rom: invalid base64")?,
            serial_number: self.serial.clone(),
            uuid: self.uuid.clone(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let vars = cli.variables()?;

    let (document, input_format) = if cli.base == "-" {
        let format = cli.format.unwrap_or(Format::Plist);
        (load_document_from_stdin(format)?, format)
    } else {
        let path = Path::new(&cli.base);
        let format = cli.format.unwrap_or_else(|| Format::from_path(path));
        (load_document_as(path, format)?, format)
    };

    let source = fs::read_to_string(&cli.instructions)
        .with_context(|| format!("Failed to read {}", cli.instructions.display()))?;
    let script = Script::parse(&source).context("compile error")?;

    let helpers = match &cli.assets {
        Some(dir) => FileHelpers::rooted(dir),
        None => FileHelpers::new(),
    };
    let env = Environment::new(&helpers)
        .with_global("vars", Node::from(&vars))
        .with_echo(config.echo_instructions);

    let mut evaluator = Evaluator::new(document);
    let count = script
        .run(&mut evaluator, &env)
        .context("runtime error")?;
    debug!(count, "instructions applied");

    let document = evaluator.into_document();
    match &cli.output {
        Some(path) => {
            let format = match cli.format {
                Some(format) => format,
                None => Format::from_path(path),
            };
            save_document(path, &document, format, &config)?;
            info!(path = %path.display(), %format, "wrote document");
        }
        None => {
            let format = match cli.format {
                Some(format) => format,
                None => config.output_format()?.unwrap_or(input_format),
            };
            write_document_to(&mut io::stdout().lock(), &document, format, &config)?;
        }
    }

    Ok(())
}
