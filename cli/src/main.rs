//! MoveCodec CLI: decode Move script-function arguments from the command line.
//!
//! # Commands
//! ```
//! movecodec decode-arg     --type <tag> --hex <0x..>
//! movecodec decode-call    --function <id> --args <hex>... --signature <file>
//! movecodec decode-payload --payload <hex> --rpc <url>
//! movecodec parse-type     <tag>
//! movecodec info
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use movecodec_bcs::{decode_script_function_payload, DecoderConfig, ScriptFunctionDecoder};
use movecodec_core::{
    call::{DecodedCall, FunctionId, ScriptFunctionCall},
    resolver::FunctionResolver,
    types::{PrimitiveKind, TypeTag},
};
use movecodec_observability::{try_init_tracing, LogConfig, MoveCodecMetrics};
use movecodec_resolver::{JsonRpcResolver, MemoryResolver};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "movecodec",
    about = "Move script-function argument decoder (MoveCodec CLI)",
    long_about = "
MoveCodec CLI: decode BCS-encoded Move script-function arguments using the
called function's resolved signature.

ENVIRONMENT VARIABLES:
  MOVECODEC_RPC_URL    Starcoin JSON-RPC endpoint used for contract.resolve_function
  RUST_LOG             Overrides the log filter
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file with `decoder:` and `log:` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one hex argument against a type tag
    #[command(name = "decode-arg")]
    DecodeArg {
        /// Type tag in Move syntax, e.g. `vector<u8>` or `0x1::Token::Token<0x1::STC::STC>`
        #[arg(long = "type")]
        type_tag: String,
        /// BCS-encoded argument (0x-prefixed hex)
        #[arg(long)]
        hex: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode the arguments of a script-function call
    #[command(name = "decode-call")]
    DecodeCall {
        /// Function id, e.g. 0x1::TransferScripts::peer_to_peer_v2
        #[arg(long)]
        function: String,
        /// BCS-encoded arguments (0x-prefixed hex), in call order
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
        /// Type arguments in Move syntax
        #[arg(long = "ty-arg")]
        ty_args: Vec<String>,
        #[command(flatten)]
        source: SignatureSource,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a raw BCS `TransactionPayload` and its arguments
    #[command(name = "decode-payload")]
    DecodePayload {
        /// BCS-encoded payload (0x-prefixed hex)
        #[arg(long)]
        payload: String,
        #[command(flatten)]
        source: SignatureSource,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a type tag and print its canonical and JSON forms
    #[command(name = "parse-type")]
    ParseType {
        /// Type tag in Move syntax
        tag: String,
    },

    /// Show MoveCodec build and capability info
    Info,
}

/// Where function signatures come from.
#[derive(clap::Args)]
struct SignatureSource {
    /// JSON file of signatures keyed by function id (takes precedence over --rpc)
    #[arg(long)]
    signature: Option<PathBuf>,
    /// Starcoin JSON-RPC endpoint
    #[arg(long, env = "MOVECODEC_RPC_URL")]
    rpc: Option<String>,
    /// Public seed node of a named network (main, barnard, halley, ...)
    #[arg(long)]
    network: Option<String>,
}

/// Contents of the `--config` file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    decoder: DecoderConfig,
    #[serde(default)]
    log: LogConfig,
}

fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config file '{}'", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parse config file '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.verbose {
        config.log.level = "debug".into();
    }
    try_init_tracing(&config.log)?;

    let decoder = ScriptFunctionDecoder::with_config(config.decoder);
    let metrics = MoveCodecMetrics::global();

    match cli.command {
        Commands::DecodeArg { type_tag, hex, json } => cmd_decode_arg(&decoder, &type_tag, &hex, json),

        Commands::DecodeCall { function, args, ty_args, source, json } => {
            let call = ScriptFunctionCall {
                func: function.parse::<FunctionId>()?,
                ty_args: ty_args
                    .iter()
                    .map(|t| t.parse::<TypeTag>())
                    .collect::<Result<_, _>>()?,
                args,
            };
            let resolver = build_resolver(&source)?;
            let decoded = decode_timed(&decoder, resolver.as_ref(), &call, &metrics).await;
            print_call(&decoded, json)
        }

        Commands::DecodePayload { payload, source, json } => {
            let bytes = movecodec_bcs::hex_to_bytes(&payload).context("invalid payload hex")?;
            let call = decode_script_function_payload(&bytes, decoder.config())?;
            let resolver = build_resolver(&source)?;
            let decoded = decode_timed(&decoder, resolver.as_ref(), &call, &metrics).await;
            print_call(&decoded, json)
        }

        Commands::ParseType { tag } => cmd_parse_type(&tag),

        Commands::Info => cmd_info(decoder.config()),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn build_resolver(source: &SignatureSource) -> Result<Box<dyn FunctionResolver>> {
    if let Some(path) = &source.signature {
        let resolver = MemoryResolver::new();
        let count = resolver
            .load_file(path)
            .with_context(|| format!("load signature file '{}'", path.display()))?;
        if count == 0 {
            bail!("no signatures found in '{}'", path.display());
        }
        debug!(path = %path.display(), count, "using signature file");
        return Ok(Box::new(resolver));
    }
    if let Some(url) = &source.rpc {
        debug!(url = %url, "using JSON-RPC resolver");
        return Ok(Box::new(JsonRpcResolver::new(url.as_str())?));
    }
    if let Some(network) = &source.network {
        let resolver = JsonRpcResolver::with_network(network)?;
        debug!(url = resolver.url(), "using seed node resolver");
        return Ok(Box::new(resolver));
    }
    bail!("no signature source: pass --signature <file>, --rpc <url> or --network <name>")
}

async fn decode_timed(
    decoder: &ScriptFunctionDecoder,
    resolver: &dyn FunctionResolver,
    call: &ScriptFunctionCall,
    metrics: &MoveCodecMetrics,
) -> DecodedCall {
    let start = Instant::now();
    let decoded = decoder.decode_call_with(resolver, call).await;
    metrics.record_call(&decoded, start.elapsed().as_secs_f64() * 1000.0);
    decoded
}

fn cmd_decode_arg(decoder: &ScriptFunctionDecoder, tag: &str, hex_arg: &str, as_json: bool) -> Result<()> {
    let tag: TypeTag = tag.parse()?;
    let value = decoder
        .value_decoder()
        .decode_hex(hex_arg, &tag)
        .with_context(|| format!("decode {hex_arg} as {tag}"))?;

    if as_json {
        let out = serde_json::json!({
            "type": tag.to_string(),
            "raw": hex_arg,
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match value {
            Some(v) => println!("{tag}: {v}"),
            None => println!("{tag}: {hex_arg} (type not decodable)"),
        }
    }
    Ok(())
}

fn print_call(decoded: &DecodedCall, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(decoded)?);
        return Ok(());
    }

    println!("Function:  {}", decoded.func);
    if !decoded.ty_args.is_empty() {
        let ty_args: Vec<String> = decoded.ty_args.iter().map(|t| t.to_string()).collect();
        println!("Type args: <{}>", ty_args.join(", "));
    }
    println!("Arguments:");
    for arg in &decoded.arguments {
        match &arg.param {
            Some(p) => println!("  [{}] {} = {}", arg.index, p.name, arg),
            None => println!("  [{}] {}", arg.index, arg),
        }
    }
    if !decoded.is_clean() {
        println!("Errors:");
        for (index, err) in &decoded.decode_errors {
            println!("  [{}] {}", index, err);
        }
    }
    Ok(())
}

fn cmd_parse_type(input: &str) -> Result<()> {
    let tag: TypeTag = input.parse()?;
    println!("Canonical: {tag}");
    println!("JSON:      {}", serde_json::to_string(&tag)?);
    println!("Depth:     {}", tag.depth());
    if let Some(name) = tag.unsupported_name() {
        println!("Note:      contains unsupported type '{name}', values will be shown raw");
    }
    Ok(())
}

fn cmd_info(config: &DecoderConfig) -> Result<()> {
    let primitives: Vec<&str> = PrimitiveKind::ALL.iter().map(|k| k.move_name()).collect();
    println!("MoveCodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Primitive types: {}", primitives.join(", "));
    println!("Compound types:  vector<T>, address::module::Name<T...> (type params only)");
    println!("Payloads:        ScriptFunction");
    println!("Resolvers:       signature file, JSON-RPC (contract.resolve_function)");
    println!();
    println!("Decoder config:");
    println!("  address_length: {}", config.address_length);
    println!("  max_depth:      {}", config.max_depth);
    println!("  signer_policy:  {:?}", config.signer_policy);
    Ok(())
}
