use block_patch::{
    Patch, apply_patch, detect_language,
    json::{PatchRequest, PatchResponse, ReplacedBlockJson, generate_execution_id},
    read_file, verify_checksum, write_file,
};
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Marker-anchored block replacement for brace-delimited source files
#[derive(Parser, Debug)]
#[command(name = "block-patch")]
#[command(version = "0.1.0")]
#[command(about = "Replace a brace-delimited block anchored by a literal marker", long_about = None)]
struct Args {
    /// File to patch in place
    #[arg(short, long)]
    file: String,

    /// JSON file containing the patch request (omit to read from stdin)
    #[arg(short, long)]
    patch: Option<String>,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write the response to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Compute and report the patch without writing the target file
    #[arg(long)]
    dry_run: bool,
}

/// Read a PatchRequest from a file path or stdin
///
/// If `path` is Some, reads from the file at that path.
/// If `path` is None, reads from stdin.
fn read_patch_request(path: Option<&String>) -> Result<PatchRequest, Box<dyn std::error::Error>> {
    let json_str = if let Some(p) = path {
        fs::read_to_string(p)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let request: PatchRequest = serde_json::from_str(&json_str)?;
    Ok(request)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    // Read patch request from file or stdin
    let request = match read_patch_request(args.patch.as_ref()) {
        Ok(req) => req,
        Err(e) => {
            eprintln!("Error reading patch request: {}", e);
            std::process::exit(1);
        }
    };

    // Handle "auto" execution_id
    let execution_id = if request.execution_id == "auto" {
        generate_execution_id()
    } else {
        request.execution_id.clone()
    };

    // Read the file to patch
    let file_content = match read_file(&args.file) {
        Ok(content) => content,
        Err(e) => {
            let response = PatchResponse::failure(
                execution_id.clone(),
                format!("Failed to read file '{}': {}", args.file, e),
            );
            output_response(&response, args.json, args.output.as_ref());
            std::process::exit(1);
        }
    };

    // Optional checksum guard against a target that has drifted from the
    // state the patch was authored against
    if let Some(expected) = &request.expected_checksum {
        if let Err(e) = verify_checksum(&file_content.content, expected) {
            let response = PatchResponse::failure(execution_id.clone(), e.to_string());
            output_response(&response, args.json, args.output.as_ref());
            std::process::exit(1);
        }
    }

    let language = detect_language(&args.file);
    if !language.uses_braces() {
        warn!(
            "{} target '{}': blocks are not brace-delimited, the scan counts literal braces only",
            language, args.file
        );
    }

    // Apply the patch to the in-memory content
    let patch = Patch {
        marker: request.marker,
        replacement: request.replacement,
    };
    let outcome = match apply_patch(&file_content.content, &patch) {
        Ok(outcome) => outcome,
        Err(e) => {
            let response = PatchResponse::failure(execution_id.clone(), e.to_string());
            output_response(&response, args.json, args.output.as_ref());
            std::process::exit(1);
        }
    };

    let replaced = ReplacedBlockJson::from_span(&file_content.content, outcome.span);
    info!(
        "replaced {} bytes at {}:{} (shift {:+})",
        outcome.span.len(),
        args.file,
        replaced.start.line,
        outcome.byte_shift
    );

    // The full new text exists in memory before any write happens
    let written = if args.dry_run {
        false
    } else {
        if let Err(e) = write_file(&args.file, &outcome.content) {
            let response = PatchResponse::failure(
                execution_id.clone(),
                format!("Failed to write file '{}': {}", args.file, e),
            );
            output_response(&response, args.json, args.output.as_ref());
            std::process::exit(1);
        }
        true
    };

    let response = PatchResponse::applied(
        execution_id,
        args.file,
        language,
        replaced,
        file_content.checksum,
        outcome.new_checksum,
        outcome.byte_shift,
        written,
    );

    output_response(&response, args.json, args.output.as_ref());
}

/// Format and output the response
fn output_response(response: &PatchResponse, json_mode: bool, output_path: Option<&String>) {
    let output = if json_mode {
        // JSON output
        serde_json::to_string_pretty(response).unwrap_or_else(|_| {
            r#"{"error": "Failed to serialize response"}"#.to_string()
        })
    } else if response.success {
        // Human-readable output
        let location = response
            .replaced
            .as_ref()
            .map(|block| {
                format!(
                    "{}:{} .. {}:{}",
                    block.start.line, block.start.column, block.end.line, block.end.column
                )
            })
            .unwrap_or_else(|| "?".to_string());
        let mut text = format!(
            "Patched {}\nReplaced block at {} (byte shift {:+})\nNew checksum: {}",
            response.file.as_deref().unwrap_or("?"),
            location,
            response.byte_shift.unwrap_or(0),
            response.new_checksum.as_deref().unwrap_or("?"),
        );
        if !response.written {
            text.push_str("\nDry run: target file not modified");
        }
        text
    } else {
        format!(
            "Error: {}",
            response.error.as_deref().unwrap_or("Unknown error")
        )
    };

    // Write to file or stdout
    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("Failed to write output to '{}': {}", path, e);
            std::process::exit(1);
        }
    } else {
        println!("{}", output);
    }
}
