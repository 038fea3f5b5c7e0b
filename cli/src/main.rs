//! fsc - filesystem client
//!
//! Directory replication, skeleton cloning, zip archives, searches and text
//! helpers powered by fsclient.

use chrono::{DateTime, Local};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use fsclient::archive::{create_archive, extract_archive, unzip_files};
use fsclient::search::report::{render_modified_report, render_phrase_report};
use fsclient::search::{self, ModifiedFile, PhraseMatches, PhraseSearch, SearchEvent, Since};
use fsclient::text::{read_all_text, write_text, write_text_async};
use fsclient::{
    ArchiveStats, CopyOptions, CopyPolicy, CopyReport, Error as FsError, ErrorCode, FileOutcome,
    FileRecord, SkeletonStats, clone_skeleton, copy_dir, copy_dir_async, create_spinner,
};
use indicatif::ProgressBar;
use serde_json::{Value, json};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use thiserror::Error;

/// fsc - filesystem client
///
/// Copy directory trees, clone their structure, build and unpack zip
/// archives, search for modified files or phrases, and read or write text.
#[derive(Parser, Debug)]
#[command(name = "fsc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    output: OutputMode,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the files of a directory into another
    Copy(CopyArgs),
    /// Recreate a directory structure without any files
    Skeleton {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        dest: PathBuf,
    },
    /// Create a zip archive from a directory
    Zip {
        /// Directory to archive
        source: PathBuf,
        /// Archive to create (must not exist)
        archive: PathBuf,
        /// Prefix entries with the source directory's name
        #[arg(long)]
        include_base_dir: bool,
    },
    /// Extract a zip archive into a directory
    Unzip {
        /// Archive to extract
        archive: PathBuf,
        /// Target directory
        dest: PathBuf,
        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,
    },
    /// List files modified recently
    Modified(ModifiedArgs),
    /// Find files containing phrases
    Find(FindArgs),
    /// Print a text file (nothing if it does not exist)
    Read {
        /// File to read
        path: PathBuf,
    },
    /// Write a line of text to a file
    Write {
        /// File to write
        path: PathBuf,
        /// Text to write; blank text writes nothing
        text: String,
        /// Append instead of replacing the file
        #[arg(short = 'a', long)]
        append: bool,
        /// Use the non-blocking writer
        #[arg(long = "async")]
        use_async: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct CopyArgs {
    /// Source directory
    source: PathBuf,

    /// Destination directory (created if missing)
    dest: PathBuf,

    /// Copy subdirectories too
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Leave files that already exist at the destination alone
    #[arg(short = 'n', long)]
    skip_existing: bool,

    /// Record failed files and keep going
    #[arg(short = 'k', long)]
    continue_on_error: bool,

    /// Use the non-blocking replicator
    #[arg(long = "async")]
    use_async: bool,

    /// Disable progress spinner
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Do not preserve file timestamps
    #[arg(long)]
    no_times: bool,

    /// Do not preserve file permissions
    #[arg(long)]
    no_perms: bool,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,
}

#[derive(ClapArgs, Debug)]
struct ModifiedArgs {
    /// Directory to search
    root: PathBuf,

    /// Files modified since local midnight this many days ago (default: today)
    #[arg(short = 'd', long, allow_negative_numbers = true, conflicts_with = "since")]
    days: Option<i64>,

    /// Files modified after this RFC 3339 timestamp
    #[arg(long, value_name = "TIMESTAMP")]
    since: Option<String>,

    /// Print an HTML report instead of a plain list
    #[arg(long)]
    html: bool,
}

#[derive(ClapArgs, Debug)]
struct FindArgs {
    /// Directory to search
    root: PathBuf,

    /// Comma-separated phrases
    phrases: String,

    /// Match phrases regardless of case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Only search files whose name matches this wildcard (repeatable)
    #[arg(short = 'p', long = "pattern", value_name = "WILDCARD")]
    patterns: Vec<String>,

    /// Print an HTML report instead of a plain list
    #[arg(long)]
    html: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to copy directory: {path}: {source}")]
    CopyDirectory { path: PathBuf, source: FsError },

    #[error("Failed to clone directory structure: {path}: {source}")]
    Skeleton { path: PathBuf, source: FsError },

    #[error("Archive operation failed: {path}: {source}")]
    Archive { path: PathBuf, source: FsError },

    #[error("Search failed: {path}: {source}")]
    Search { path: PathBuf, source: FsError },

    #[error("Text operation failed: {path}: {source}")]
    Text { path: PathBuf, source: FsError },

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Failed to start async runtime: {source}")]
    Runtime { source: io::Error },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::CopyDirectory { source, .. }
            | Self::Skeleton { source, .. }
            | Self::Archive { source, .. }
            | Self::Search { source, .. }
            | Self::Text { source, .. } => source.code(),
            Self::InvalidTimestamp { .. } => ErrorCode::InvalidInput,
            Self::Runtime { .. } | Self::JsonSerialize { .. } => ErrorCode::Internal,
        }
    }
}

fn cancellation_stats(error: &CliError) -> Option<(u64, u64)> {
    match error {
        CliError::CopyDirectory {
            source:
                FsError::Cancelled {
                    files_copied,
                    bytes_copied,
                    ..
                },
            ..
        } => Some((*files_copied, *bytes_copied)),
        _ => None,
    }
}

fn exit_code_for(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::InvalidInput => 2,
        _ => 1,
    }
}

fn main() {
    if let Err(error) = run() {
        if let Some((files_copied, bytes_copied)) = cancellation_stats(&error) {
            eprintln!(
                "Cancelled after copying {} files ({}).",
                files_copied,
                format_bytes(bytes_copied)
            );
            eprintln!("Re-run with --skip-existing to resume.");
            std::process::exit(130);
        }
        eprintln!("error[{}]: {}", error.code(), error);
        std::process::exit(exit_code_for(error.code()));
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Copy(args) => run_copy(&args, cli.output, cli.verbose),
        Command::Skeleton { source, dest } => run_skeleton(&source, &dest, cli.output),
        Command::Zip {
            source,
            archive,
            include_base_dir,
        } => {
            let stats = create_archive(&source, &archive, include_base_dir).map_err(|e| {
                CliError::Archive {
                    path: archive.clone(),
                    source: e,
                }
            })?;
            print_archive_stats("zip", &archive, stats, cli.output)
        }
        Command::Unzip {
            archive,
            dest,
            overwrite,
        } => {
            let result = if overwrite {
                unzip_files(&archive, &dest)
            } else {
                extract_archive(&archive, &dest)
            };
            let stats = result.map_err(|source| CliError::Archive {
                path: archive.clone(),
                source,
            })?;
            print_archive_stats("unzip", &dest, stats, cli.output)
        }
        Command::Modified(args) => run_modified(&args, cli.output, cli.verbose),
        Command::Find(args) => run_find(&args, cli.output, cli.verbose),
        Command::Read { path } => {
            let text = read_all_text(&path).map_err(|source| CliError::Text {
                path: path.clone(),
                source,
            })?;
            print!("{text}");
            Ok(())
        }
        Command::Write {
            path,
            text,
            append,
            use_async,
        } => {
            let written = if use_async {
                block_on(write_text_async(&path, &text, append))?
            } else {
                write_text(&path, &text, append)
            }
            .map_err(|source| CliError::Text {
                path: path.clone(),
                source,
            })?;
            if written {
                println!("Wrote {}", path.display());
            } else {
                println!("Nothing to write (text is blank)");
            }
            Ok(())
        }
    }
}

fn block_on<F: std::future::Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| CliError::Runtime { source })?;
    Ok(runtime.block_on(future))
}

fn print_warning(msg: &str) {
    eprintln!("warning: {msg}");
}

fn print_verbose(msg: &str) {
    eprintln!("{msg}");
}

fn build_copy_options(args: &CopyArgs, verbose: bool) -> CopyOptions {
    let mut options = CopyOptions::default()
        .with_policy(
            CopyPolicy::new()
                .recurse(args.recursive)
                .overwrite(!args.skip_existing),
        )
        .with_warn_handler(print_warning);
    if args.continue_on_error {
        options = options.continue_on_error();
    }
    if args.no_times {
        options = options.without_timestamps();
    }
    if args.no_perms {
        options = options.without_permissions();
    }
    if args.no_sync {
        options = options.without_fsync();
    }
    if verbose {
        options = options.with_verbose_handler(print_verbose);
    }
    options
}

fn run_copy(args: &CopyArgs, output: OutputMode, verbose: bool) -> CliResult<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel_clone = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel_clone.load(Ordering::Relaxed) {
                eprintln!("\nForce quit.");
                std::process::exit(130);
            }
            cancel_clone.store(true, Ordering::Relaxed);
            eprintln!(
                "\nCancelling... finishing the current file. Press Ctrl+C again to abort immediately."
            );
        })
        .ok();
    }
    let options = build_copy_options(args, verbose).with_cancel_token(cancel);

    // Per-file lines and the spinner would interleave on stderr.
    let pb: Option<ProgressBar> = (output == OutputMode::Human && !args.quiet && !verbose)
        .then(|| create_spinner(format!("Copying {}...", args.source.display())));

    let result = if args.use_async {
        block_on(copy_dir_async(&args.source, &args.dest, &options))?
    } else {
        copy_dir(&args.source, &args.dest, &options)
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = result.map_err(|source| CliError::CopyDirectory {
        path: args.source.clone(),
        source,
    })?;

    match output {
        OutputMode::Human => print_report(&report, verbose),
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": "copy",
            "summary": {
                "files_copied": report.files_copied,
                "files_skipped": report.files_skipped,
                "files_failed": report.files_failed,
                "dirs_created": report.dirs_created,
                "bytes_copied": report.bytes_copied,
            },
            "items": report.records.iter().map(record_to_json).collect::<Vec<Value>>(),
        }))?,
    }

    report
        .into_result()
        .map(drop)
        .map_err(|source| CliError::CopyDirectory {
            path: args.source.clone(),
            source,
        })
}

fn record_to_json(record: &FileRecord) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("source".to_owned(), Value::String(display_path(&record.src)));
    obj.insert(
        "destination".to_owned(),
        Value::String(display_path(&record.dst)),
    );
    match &record.outcome {
        FileOutcome::Copied { bytes } => {
            obj.insert("outcome".to_owned(), Value::String("copied".to_owned()));
            obj.insert("bytes_copied".to_owned(), Value::Number((*bytes).into()));
        }
        FileOutcome::Skipped => {
            obj.insert("outcome".to_owned(), Value::String("skipped".to_owned()));
        }
        FileOutcome::Failed { kind, message } => {
            let code = ErrorCode::from_io(&io::Error::from(*kind));
            obj.insert("outcome".to_owned(), Value::String("failed".to_owned()));
            obj.insert(
                "error_code".to_owned(),
                Value::String(code.as_str().to_owned()),
            );
            obj.insert("error_message".to_owned(), Value::String(message.clone()));
        }
    }
    Value::Object(obj)
}

fn print_report(report: &CopyReport, verbose: bool) {
    if verbose {
        println!("Copy completed in {:?}", report.duration);
        println!("  Files copied:   {}", report.files_copied);
        println!("  Files skipped:  {}", report.files_skipped);
        println!("  Files failed:   {}", report.files_failed);
        println!("  Directories:    {}", report.dirs_created);
        println!("  Total size:     {}", format_bytes(report.bytes_copied));
        return;
    }

    if report.files_copied == 0 && report.dirs_created == 0 && report.files_failed == 0 {
        if report.files_skipped > 0 {
            println!(
                "Nothing to copy ({} files already exist)",
                report.files_skipped
            );
        } else {
            println!("Nothing to copy");
        }
        return;
    }

    let mut parts = vec![format!("{} files", report.files_copied)];
    if report.dirs_created > 0 {
        parts.push(format!("{} dirs", report.dirs_created));
    }
    if report.files_skipped > 0 {
        parts.push(format!("{} skipped", report.files_skipped));
    }
    println!(
        "Copied {} ({})",
        parts.join(", "),
        format_bytes(report.bytes_copied)
    );
    for failure in report.failures() {
        if let FileOutcome::Failed { message, .. } = &failure.outcome {
            eprintln!("failed: {}: {}", failure.src.display(), message);
        }
    }
}

fn run_skeleton(source: &Path, dest: &Path, output: OutputMode) -> CliResult<()> {
    let stats: SkeletonStats =
        clone_skeleton(source, dest).map_err(|e| CliError::Skeleton {
            path: source.to_path_buf(),
            source: e,
        })?;
    match output {
        OutputMode::Human => {
            println!("Created {} directories under {}", stats.dirs_created, dest.display());
            Ok(())
        }
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": "skeleton",
            "destination": display_path(dest),
            "dirs_created": stats.dirs_created,
        })),
    }
}

fn print_archive_stats(
    mode: &str,
    path: &Path,
    stats: ArchiveStats,
    output: OutputMode,
) -> CliResult<()> {
    match output {
        OutputMode::Human => {
            println!(
                "{}: {} files, {} directories ({})",
                mode,
                stats.files,
                stats.dirs,
                path.display()
            );
            Ok(())
        }
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": mode,
            "path": display_path(path),
            "files": stats.files,
            "dirs": stats.dirs,
        })),
    }
}

/// Observer printing directories as they are scanned, and unreadable entries.
fn search_observer(verbose: bool) -> impl Fn(&SearchEvent<'_>) + Sync {
    move |event: &SearchEvent<'_>| match event {
        SearchEvent::Directory(dir) if verbose => eprintln!("  Checking {}", dir.display()),
        SearchEvent::Phrase(phrase) if verbose => eprintln!("  Checking {phrase}"),
        SearchEvent::Unreadable { path, error } => match path {
            Some(path) => print_warning(&format!("Cannot read {}: {}", path.display(), error)),
            None => print_warning(&format!("Cannot read entry: {error}")),
        },
        _ => {}
    }
}

fn run_modified(args: &ModifiedArgs, output: OutputMode, verbose: bool) -> CliResult<()> {
    let since = match &args.since {
        Some(value) => {
            let parsed = DateTime::parse_from_rfc3339(value).map_err(|source| {
                CliError::InvalidTimestamp {
                    value: value.clone(),
                    source,
                }
            })?;
            Since::Time(SystemTime::from(parsed))
        }
        None => Since::DaysAgo(args.days.unwrap_or(0).unsigned_abs()),
    };
    let search_err = |source| CliError::Search {
        path: args.root.clone(),
        source,
    };

    let cutoff = since.cutoff().map_err(search_err)?;
    let observer = search_observer(verbose);
    let files = search::find_modified_files(&args.root, cutoff, &observer).map_err(search_err)?;

    match output {
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": "modified",
            "root": display_path(&args.root),
            "since": DateTime::<Local>::from(cutoff).to_rfc3339(),
            "files": files.iter().map(modified_to_json).collect::<Vec<Value>>(),
        })),
        OutputMode::Human if args.html => {
            print!(
                "{}",
                render_modified_report(&args.root, since, &files, Local::now())
            );
            Ok(())
        }
        OutputMode::Human => {
            if files.is_empty() {
                println!("No files found");
            }
            for file in &files {
                println!(
                    "{}  {}",
                    DateTime::<Local>::from(file.modified).format("%d/%m/%Y %H:%M:%S"),
                    file.path.display()
                );
            }
            Ok(())
        }
    }
}

fn modified_to_json(file: &ModifiedFile) -> Value {
    json!({
        "path": display_path(&file.path),
        "modified": DateTime::<Local>::from(file.modified).to_rfc3339(),
    })
}

fn run_find(args: &FindArgs, output: OutputMode, verbose: bool) -> CliResult<()> {
    let observer = search_observer(verbose);
    let results = PhraseSearch::new(&args.phrases)
        .ignore_case(args.ignore_case)
        .with_patterns(args.patterns.iter().cloned())
        .run(&args.root, &observer)
        .map_err(|source| CliError::Search {
            path: args.root.clone(),
            source,
        })?;

    match output {
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": "find",
            "root": display_path(&args.root),
            "ignore_case": args.ignore_case,
            "results": results.iter().map(phrase_to_json).collect::<Vec<Value>>(),
        })),
        OutputMode::Human if args.html => {
            print!(
                "{}",
                render_phrase_report(&args.root, &args.phrases, &results, Local::now())
            );
            Ok(())
        }
        OutputMode::Human => {
            if results.is_empty() {
                println!("No phrases found to search for");
            }
            for result in &results {
                println!("Phrase = {}", result.phrase);
                if result.files.is_empty() {
                    println!("  No matches found");
                }
                for file in &result.files {
                    println!("  {}", file.display());
                }
            }
            Ok(())
        }
    }
}

fn phrase_to_json(result: &PhraseMatches) -> Value {
    json!({
        "phrase": result.phrase,
        "files": result.files.iter().map(|f| display_path(f)).collect::<Vec<String>>(),
    })
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
