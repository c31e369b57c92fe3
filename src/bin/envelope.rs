//! Schema Envelope CLI
//!
//! Fingerprints schemas and builds or inspects envelopes from the shell.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use schema_envelope::{
    decode, decode_record, encode, encode_record, load_schema_dir, parse_schema, register_entry,
    EnvelopeConfig, Fingerprinter, GenericRecord, InMemorySchemaRegistry, OutputFormat, Record,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-envelope")]
#[command(about = "Fingerprint schemas and build schema-tagged envelopes")]
struct Cli {
    /// Config file (defaults to envelope.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the schema directory
    #[arg(short, long)]
    schemas: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schema id of a schema file
    Fingerprint {
        /// Avro schema file
        schema: PathBuf,
    },

    /// List every schema in the schema directory with its id
    Register,

    /// Encode a JSON record with a schema
    Encode {
        /// Avro schema file
        #[arg(long)]
        schema: PathBuf,
        /// JSON record
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (stdout as hex when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Wrap an already-serialized payload
    Wrap {
        /// Schema id (32 hex characters)
        #[arg(long)]
        schema_id: String,
        /// Payload file
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (stdout as hex when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the parts of an envelope
    Inspect {
        /// Envelope file (raw bytes or hex text)
        envelope: PathBuf,
        /// Decode the payload using the schema directory
        #[arg(long)]
        decode: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EnvelopeConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(dir) = cli.schemas {
        config.schemas.dir = dir;
    }

    // a broken digest is fatal before any command runs
    let fingerprinter = Fingerprinter::initialize()?;

    match cli.command {
        Commands::Fingerprint { schema } => {
            let text = read_text(&schema)?;
            let schema = parse_schema(&text)?;
            println!("{}", fingerprinter.fingerprint(&schema));
            Ok(())
        }

        Commands::Register => {
            let dir = config.schema_dir();
            let entries = load_schema_dir(
                &fingerprinter,
                &dir,
                &config.schemas.extension,
                config.schemas.recursive,
            )?;
            if entries.is_empty() {
                println!("No schemas found in {}", dir.display());
                return Ok(());
            }

            let registry = InMemorySchemaRegistry::new();
            for entry in &entries {
                register_entry(&registry, entry)?;
                let source = entry
                    .source_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{}  {}  ({})", entry.schema_id(), entry.name, source);
            }
            println!();
            println!("{} schema(s), {} distinct id(s)", entries.len(), registry.len());
            Ok(())
        }

        Commands::Encode { schema, input, output } => {
            let schema = parse_schema(&read_text(&schema)?)?;
            let schema_id = fingerprinter.fingerprint(&schema);
            let json: serde_json::Value = serde_json::from_str(&read_text(&input)?)
                .with_context(|| format!("invalid JSON in {}", input.display()))?;

            let record = GenericRecord::from_json(schema, json)?;
            let envelope = encode_record(&schema_id, Some(&Record::generic(&record)))?;
            write_envelope(&envelope, output.as_deref(), config.output.format)
        }

        Commands::Wrap { schema_id, input, output } => {
            let payload = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let envelope = encode(&schema_id, Some(payload.as_slice()))?;
            write_envelope(&envelope, output.as_deref(), config.output.format)
        }

        Commands::Inspect { envelope, decode: decode_payload } => {
            let bytes = read_envelope(&envelope)?;
            let parts = decode(&bytes)?;

            println!("marker:     {:#04x}", parts.marker);
            println!("schema id:  {}", parts.schema_id());
            println!("payload:    {} bytes", parts.payload.len());

            if decode_payload {
                let registry = InMemorySchemaRegistry::new();
                let entries = load_schema_dir(
                    &fingerprinter,
                    config.schema_dir(),
                    &config.schemas.extension,
                    config.schemas.recursive,
                )?;
                for entry in &entries {
                    register_entry(&registry, entry)?;
                }

                let record = decode_record(&bytes, &registry)?;
                let json = serde_json::Value::try_from(record.value)
                    .context("record has no JSON representation")?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            Ok(())
        }
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Envelope files may hold raw bytes or the hex text this tool prints.
fn read_envelope(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Ok(text) = std::str::from_utf8(&bytes) {
        let text = text.trim();
        if !text.is_empty() && text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(hex::decode(text)?);
        }
    }
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(bytes)
}

fn write_envelope(envelope: &[u8], output: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            match format {
                OutputFormat::Hex => std::fs::write(path, hex::encode(envelope))?,
                OutputFormat::Raw => std::fs::write(path, envelope)?,
            }
            println!("✅ {} bytes written to {}", envelope.len(), path.display());
        }
        None => println!("{}", hex::encode(envelope)),
    }
    Ok(())
}
