//! kacl CLI - Parse, validate, and inspect Keep a Changelog documents
//!
//! Usage:
//!   kacl [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse     Parse and display document structure
//!   validate  Check document for errors
//!   tokens    Dump the token stream
//!   stats     Show document statistics
//!   show      Show a single release
//!
//! `FILE` may be `-` to read from stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser as ClapParser, Subcommand};
use kacl_core::lexer::tokenize;
use kacl_core::{Document, ParseError, ParseErrorKind, Release, Token};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, ClapParser)]
#[command(name = "kacl", version, about = "Keep a Changelog parser and validator")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and display document structure
    Parse { file: PathBuf },
    /// Check document for errors without output
    Validate { file: PathBuf },
    /// Dump the token stream the grammar sees
    Tokens { file: PathBuf },
    /// Show document statistics
    Stats { file: PathBuf },
    /// Show one release; VERSION may be `unreleased`
    Show { version: String, file: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    match &cli.command {
        Command::Parse { file } => cmd_parse(&read_input(file)?, cli.json),
        Command::Validate { file } => cmd_validate(&read_input(file)?, cli.json),
        Command::Tokens { file } => cmd_tokens(&read_input(file)?, cli.json),
        Command::Stats { file } => cmd_stats(&read_input(file)?, cli.json),
        Command::Show { version, file } => cmd_show(&read_input(file)?, version, cli.json),
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(input);
    }

    tracing::debug!(path = %path.display(), "reading changelog");
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}

fn parse_document(input: &str) -> Result<Document, String> {
    kacl_core::parse(input).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| format!("JSON error: {}", e))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(input: &str, json: bool) -> Result<(), String> {
    let doc = parse_document(input)?;

    if json {
        return print_json(&JsonDocument::from(&doc));
    }

    println!("Title: {}", doc.title());
    if let Some(flag) = doc.flag() {
        println!("Flag: {}", flag);
    }
    if let Some(url) = doc.url() {
        println!("URL: {}", url);
    }
    if let Some(description) = doc.description() {
        println!("Description: {}", first_line(description));
    }

    println!("Releases: {}", doc.releases().len());
    for release in doc.releases() {
        println!(
            "  {:<20} {:<12} {}",
            release_label(release),
            release.date().unwrap_or("-"),
            plural(release.change_count(), "change")
        );
    }

    if let Some(footer) = doc.footer() {
        println!("Footer: {}", first_line(footer));
    }

    Ok(())
}

// =============================================================================
// Validate Command
// =============================================================================

fn cmd_validate(input: &str, json: bool) -> Result<(), String> {
    match kacl_core::parse(input) {
        Ok(doc) => {
            if json {
                print_json(&serde_json::json!({ "valid": true, "error": null }))?;
            } else {
                println!(
                    "Valid: {} with {}",
                    plural(doc.releases().len(), "release"),
                    plural(doc.change_count(), "change")
                );
            }
            Ok(())
        }
        Err(e) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "error": JsonError::from(&e),
                }))?;
            }
            Err(e.to_string())
        }
    }
}

// =============================================================================
// Tokens Command
// =============================================================================

fn cmd_tokens(input: &str, json: bool) -> Result<(), String> {
    let tokens = tokenize(input);

    if json {
        let tokens: Vec<_> = tokens.iter().map(JsonToken::from).collect();
        return print_json(&tokens);
    }

    for token in &tokens {
        let mut lines = token.lines();
        println!(
            "{:>5} {:<16} {}",
            token.span.to_string(),
            token.kind.as_str(),
            lines.next().unwrap_or("")
        );
        for line in lines {
            println!("{:>5} {:<16} {}", "", "", line);
        }
    }

    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Debug, Default, Serialize)]
struct Stats {
    lines: usize,
    tokens: usize,
    releases: usize,
    unreleased: usize,
    changes: usize,
    change_types: Vec<ChangeTypeCount>,
}

#[derive(Debug, Serialize)]
struct ChangeTypeCount {
    #[serde(rename = "type")]
    change_type: String,
    count: usize,
}

impl Stats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Stats {
            lines: input.lines().count(),
            tokens: tokenize(input).len(),
            releases: doc.releases().len(),
            unreleased: doc.releases().iter().filter(|r| r.is_unreleased()).count(),
            changes: doc.change_count(),
            change_types: Vec::new(),
        };

        for group in doc.releases().iter().flat_map(Release::change_groups) {
            match stats
                .change_types
                .iter_mut()
                .find(|c| c.change_type == group.change_type)
            {
                Some(count) => count.count += group.entries.len(),
                None => stats.change_types.push(ChangeTypeCount {
                    change_type: group.change_type.clone(),
                    count: group.entries.len(),
                }),
            }
        }

        stats
    }
}

fn cmd_stats(input: &str, json: bool) -> Result<(), String> {
    let doc = parse_document(input)?;
    let stats = Stats::from_document(&doc, input);

    if json {
        return print_json(&stats);
    }

    println!("Lines:      {}", stats.lines);
    println!("Tokens:     {}", stats.tokens);
    println!("Releases:   {}", stats.releases);
    println!("Unreleased: {}", stats.unreleased);
    println!("Changes:    {}", stats.changes);
    for count in &stats.change_types {
        println!("  {:<16} {}", count.change_type, count.count);
    }

    Ok(())
}

// =============================================================================
// Show Command
// =============================================================================

fn cmd_show(input: &str, version: &str, json: bool) -> Result<(), String> {
    let doc = parse_document(input)?;

    let release = if version.eq_ignore_ascii_case("unreleased") {
        doc.unreleased()
    } else {
        doc.release(version)
    }
    .ok_or_else(|| format!("no release '{}' in changelog", version))?;

    if json {
        return print_json(&JsonRelease::from(release));
    }

    match release.date() {
        Some(date) => println!("{} ({})", release_label(release), date),
        None => println!("{}", release_label(release)),
    }
    if let Some(description) = release.description() {
        for line in description.lines() {
            println!("  {}", line);
        }
    }
    for group in release.change_groups() {
        println!("  {}:", group.change_type);
        for entry in &group.entries {
            let mut lines = entry.lines();
            println!("    - {}", lines.next().unwrap_or(""));
            for line in lines {
                println!("      {}", line);
            }
        }
    }

    Ok(())
}

// =============================================================================
// Formatting helpers
// =============================================================================

fn release_label(release: &Release) -> &str {
    match release.version() {
        Some(version) => version,
        None => "Unreleased",
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    flag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    releases: Vec<JsonRelease<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonRelease<'a> {
    version: Option<&'a str>,
    date: Option<&'a str>,
    unreleased: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    changes: Vec<JsonChangeGroup<'a>>,
}

#[derive(Serialize)]
struct JsonChangeGroup<'a> {
    #[serde(rename = "type")]
    change_type: &'a str,
    entries: &'a [String],
}

#[derive(Serialize)]
struct JsonToken<'a> {
    kind: &'static str,
    line: usize,
    end_line: usize,
    content: &'a [String],
}

#[derive(Serialize)]
struct JsonError<'a> {
    kind: &'static str,
    message: &'a str,
    line: Option<usize>,
    end_of_input: bool,
}

impl<'a> From<&'a Document> for JsonDocument<'a> {
    fn from(doc: &'a Document) -> Self {
        JsonDocument {
            title: doc.title(),
            flag: doc.flag(),
            description: doc.description(),
            url: doc.url(),
            releases: doc.releases().iter().map(JsonRelease::from).collect(),
            footer: doc.footer(),
        }
    }
}

impl<'a> From<&'a Release> for JsonRelease<'a> {
    fn from(release: &'a Release) -> Self {
        JsonRelease {
            version: release.version(),
            date: release.date(),
            unreleased: release.is_unreleased(),
            description: release.description(),
            changes: release
                .change_groups()
                .iter()
                .map(|group| JsonChangeGroup {
                    change_type: &group.change_type,
                    entries: &group.entries,
                })
                .collect(),
        }
    }
}

impl<'a> From<&'a Token> for JsonToken<'a> {
    fn from(token: &'a Token) -> Self {
        JsonToken {
            kind: token.kind.as_str(),
            line: token.span.start,
            end_line: token.span.end,
            content: &token.content,
        }
    }
}

impl<'a> From<&'a ParseError> for JsonError<'a> {
    fn from(err: &'a ParseError) -> Self {
        JsonError {
            kind: match err.kind {
                ParseErrorKind::MissingRequiredToken => "missing-required-token",
                ParseErrorKind::InvalidReleaseHeader => "invalid-release-header",
                ParseErrorKind::UnexpectedTrailingContent => "unexpected-trailing-content",
            },
            message: &err.message,
            line: err.line(),
            end_of_input: matches!(err.location, kacl_core::Location::EndOfInput { .. }),
        }
    }
}
