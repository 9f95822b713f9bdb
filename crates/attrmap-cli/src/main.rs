//! `attrmap` CLI — convert JSON documents to and from store attribute maps.
//!
//! ## Usage
//!
//! ```sh
//! # Encode a JSON document into a wire item (stdin → stdout)
//! echo '{"id":"42","tags":["a","b"]}' | attrmap encode
//!
//! # Encode from file to file
//! attrmap encode -i order.json -o order.item.json
//!
//! # Decode a wire item back to a JSON document, sets as plain arrays
//! attrmap decode --sets plain -i order.item.json
//!
//! # Check that a document survives encode → decode → encode
//! attrmap check -i order.json
//!
//! # Show transcoder debug logs (or set RUST_LOG)
//! attrmap -v encode -i order.json
//! ```

use anyhow::{Context, Result};
use attrmap_core::{
    item_from_wire, item_to_wire, AttributeKind, AttributeMap, AttributeValue, NullPolicy,
    SetRepresentation, Transcoder, TranscoderConfig, DEFAULT_MAX_DEPTH,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "attrmap",
    version,
    about = "Convert JSON documents to and from store attribute maps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document into a wire item
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        options: TranscodeOptions,
    },
    /// Decode a wire item back into a JSON document
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        options: TranscodeOptions,
    },
    /// Encode, decode and re-encode a JSON document, and report whether the item survived
    Check {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        options: TranscodeOptions,
    },
}

#[derive(Args)]
struct TranscodeOptions {
    /// How decoded sets appear in the document
    #[arg(long, value_enum, default_value_t = SetsArg::Tagged)]
    sets: SetsArg,
    /// Where null properties are dropped when encoding
    #[arg(long, value_enum, default_value_t = NullsArg::Recursive)]
    nulls: NullsArg,
    /// Maximum container nesting accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum SetsArg {
    /// Wrap sets in sentinel objects
    Tagged,
    /// Emit sets as plain arrays
    Plain,
}

#[derive(Clone, Copy, ValueEnum)]
enum NullsArg {
    /// Drop null properties at every depth
    Recursive,
    /// Drop null properties from the root object only
    TopLevel,
}

impl TranscodeOptions {
    fn transcoder(&self) -> Transcoder {
        let set_representation = match self.sets {
            SetsArg::Tagged => SetRepresentation::Tagged,
            SetsArg::Plain => SetRepresentation::Plain,
        };
        let null_policy = match self.nulls {
            NullsArg::Recursive => NullPolicy::Recursive,
            NullsArg::TopLevel => NullPolicy::TopLevel,
        };
        Transcoder::new(
            TranscoderConfig::default()
                .with_set_representation(set_representation)
                .with_null_policy(null_policy)
                .with_max_depth(self.max_depth),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Encode {
            input,
            output,
            options,
        } => {
            let document = read_json(input.as_deref())?;
            let item = options
                .transcoder()
                .encode(&document)
                .context("Failed to encode JSON document")?;
            let pretty = serde_json::to_string_pretty(&item_to_wire(&item))?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Decode {
            input,
            output,
            options,
        } => {
            let wire = read_json(input.as_deref())?;
            let item = item_from_wire(&wire).context("Failed to parse wire item")?;
            let document = options
                .transcoder()
                .decode(&item)
                .context("Failed to decode item")?;
            let pretty = serde_json::to_string_pretty(&document)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Check { input, options } => {
            let document = read_json(input.as_deref())?;
            let transcoder = options.transcoder();
            let config = transcoder.config();
            debug!(
                sets = ?config.set_representation,
                nulls = ?config.null_policy,
                max_depth = config.max_depth,
                "checking roundtrip"
            );
            let item = transcoder
                .encode(&document)
                .context("Failed to encode JSON document")?;
            let decoded = transcoder.decode(&item).context("Failed to decode item")?;
            let again = transcoder
                .encode(&decoded)
                .context("Failed to re-encode decoded document")?;

            for (kind, count) in count_kinds(&item) {
                println!("{:<5} {}", kind.descriptor(), count);
            }
            if again != item {
                println!("Roundtrip: MISMATCH");
                process::exit(1);
            }
            info!(attributes = item.len(), "roundtrip check passed");
            println!("Roundtrip: OK ({} attributes)", item.len());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Count attribute kinds at every depth of an item.
fn count_kinds(item: &AttributeMap) -> BTreeMap<AttributeKind, usize> {
    fn visit(value: &AttributeValue, counts: &mut BTreeMap<AttributeKind, usize>) {
        *counts.entry(value.kind()).or_default() += 1;
        match value {
            AttributeValue::Map(map) => map.values().for_each(|v| visit(v, counts)),
            AttributeValue::List(items) => items.iter().for_each(|v| visit(v, counts)),
            _ => {}
        }
    }

    let mut counts = BTreeMap::new();
    item.values().for_each(|value| visit(value, &mut counts));
    counts
}

fn read_json(path: Option<&str>) -> Result<serde_json::Value> {
    let text = read_input(path)?;
    serde_json::from_str(&text).context("Input is not valid JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
