//! apilist: deterministic listings of the web-exposed API surface.
//!
//! Reads the API snapshot a Chromium build emits, canonicalizes its
//! ordering, and publishes the snapshot plus a flat CSV listing into a
//! target checkout, optionally committing the refresh there. The
//! `canonicalize`, `export`, and `verify` subcommands work from the same
//! snapshot without touching the build.

#![allow(clippy::collapsible_if)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, info};

use apilist_core::{canonicalize, flatten, render_csv};
use apilist_types::{
    API_LIST_TARGET_FILE, COMMIT_POSITION_TRAILER, SNAPSHOT_BUILD_FILE, SNAPSHOT_BUILD_TARGET,
    SNAPSHOT_BUILD_TOOL, SNAPSHOT_TARGET_FILE, Snapshot,
};

mod config_loader;

use config_loader::load_config;

#[derive(Parser)]
#[command(name = "apilist")]
#[command(about = "Deterministic listings of the web-exposed API surface", long_about = None)]
struct Cli {
    /// Increase log verbosity (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the committed artifacts from a build snapshot
    Update(UpdateArgs),
    /// Canonicalize a snapshot JSON file
    Canonicalize(CanonicalizeArgs),
    /// Render the flat CSV listing from a snapshot
    Export(ExportArgs),
    /// Check the committed artifacts against the build snapshot
    Verify(VerifyArgs),
    /// Print the snapshot JSON schema
    Schema(SchemaArgs),
}

#[derive(Parser, Debug)]
struct UpdateArgs {
    /// Chromium build directory containing the extracted snapshot
    #[arg(long, short = 'C')]
    build_path: Option<PathBuf>,

    /// Build the snapshot target before reading the snapshot
    #[arg(long, short = 'B')]
    build: bool,

    /// Directory the artifacts are written to (default: current directory)
    #[arg(long, short = 't')]
    target_path: Option<PathBuf>,

    /// Commit refreshed artifacts after a successful update
    #[arg(long)]
    commit: bool,

    /// Path to config file (default: apilist.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CanonicalizeArgs {
    /// Snapshot JSON file to read ('-' for stdin)
    #[arg(long)]
    snapshot: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Snapshot JSON file to read ('-' for stdin)
    #[arg(long)]
    snapshot: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct VerifyArgs {
    /// Chromium build directory containing the extracted snapshot
    #[arg(long, short = 'C')]
    build_path: Option<PathBuf>,

    /// Directory holding the committed artifacts (default: current directory)
    #[arg(long, short = 't')]
    target_path: Option<PathBuf>,

    /// Path to config file (default: apilist.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Write output to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Update(args) => cmd_update(args),
        Commands::Canonicalize(args) => {
            cmd_canonicalize(args)?;
            Ok(0)
        }
        Commands::Export(args) => {
            cmd_export(args)?;
            Ok(0)
        }
        Commands::Verify(args) => cmd_verify(args),
        Commands::Schema(args) => {
            cmd_schema(args)?;
            Ok(0)
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

/// Environment preconditions for `update`, each with the exit code its
/// failure maps to. These codes are part of the command's contract with
/// automation that drives it.
#[derive(Debug, Error)]
enum PreflightError {
    #[error("build directory does not exist, checked {}", .0.display())]
    MissingBuildDir(PathBuf),
    #[error("target directory does not exist, checked {}", .0.display())]
    MissingTargetDir(PathBuf),
    #[error("snapshot file not found, checked {}", .0.display())]
    MissingSnapshot(PathBuf),
    #[error("unexpected file type for {}", .0.display())]
    SnapshotNotAFile(PathBuf),
}

impl PreflightError {
    fn exit_code(&self) -> i32 {
        match self {
            PreflightError::MissingBuildDir(_) => 1,
            PreflightError::MissingTargetDir(_) => 2,
            PreflightError::MissingSnapshot(_) => 3,
            PreflightError::SnapshotNotAFile(_) => 4,
        }
    }
}

fn cmd_update(args: UpdateArgs) -> Result<i32> {
    let config = load_config(args.config)?;
    let defaults = config.defaults;

    let Some(build_path) = args.build_path.or(defaults.build_path) else {
        bail!("no build path given on the command line or in the config file");
    };
    let target_path = args
        .target_path
        .or(defaults.target_path)
        .unwrap_or_else(|| PathBuf::from("."));
    let build = args.build || defaults.build.unwrap_or(false);
    let commit = args.commit || defaults.commit.unwrap_or(false);

    if let Err(err) = check_directories(&build_path, &target_path) {
        error!("{err}");
        return Ok(err.exit_code());
    }

    if build {
        build_snapshot(&build_path)?;
    }

    let snapshot_path = build_path.join(SNAPSHOT_BUILD_FILE);
    if let Err(err) = check_snapshot_file(&snapshot_path) {
        error!("{err}");
        return Ok(err.exit_code());
    }

    let snapshot = read_snapshot(&snapshot_path)?;
    let (snapshot_text, csv_text) = render_artifacts(snapshot)?;

    let snapshot_target = target_path.join(SNAPSHOT_TARGET_FILE);
    let csv_target = target_path.join(API_LIST_TARGET_FILE);
    write_text(&snapshot_target, &snapshot_text)?;
    write_text(&csv_target, &csv_text)?;
    info!(
        "Wrote {} and {}",
        snapshot_target.display(),
        csv_target.display()
    );

    if commit {
        commit_artifacts(&build_path, &target_path)?;
    }

    Ok(0)
}

fn cmd_canonicalize(args: CanonicalizeArgs) -> Result<()> {
    let mut snapshot = read_snapshot(&args.snapshot)?;
    canonicalize(&mut snapshot);
    let text = encode_snapshot(&snapshot)?;
    match args.output {
        Some(path) => write_text(&path, &text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let mut snapshot = read_snapshot(&args.snapshot)?;
    canonicalize(&mut snapshot);
    let rows = flatten(&snapshot);
    debug!("Flattened {} rows", rows.len());
    let csv = render_csv(&rows);
    match args.output {
        Some(path) => write_text(&path, &csv)?,
        None => print!("{csv}"),
    }
    Ok(())
}

/// Compare the committed artifacts against what the build snapshot
/// renders to. Exit code 2 means at least one artifact is stale.
fn cmd_verify(args: VerifyArgs) -> Result<i32> {
    let config = load_config(args.config)?;
    let defaults = config.defaults;

    let Some(build_path) = args.build_path.or(defaults.build_path) else {
        bail!("no build path given on the command line or in the config file");
    };
    let target_path = args
        .target_path
        .or(defaults.target_path)
        .unwrap_or_else(|| PathBuf::from("."));

    let snapshot = read_snapshot(&build_path.join(SNAPSHOT_BUILD_FILE))?;
    let (snapshot_text, csv_text) = render_artifacts(snapshot)?;

    let snapshot_fresh = artifact_is_fresh(&target_path.join(SNAPSHOT_TARGET_FILE), &snapshot_text)?;
    let csv_fresh = artifact_is_fresh(&target_path.join(API_LIST_TARGET_FILE), &csv_text)?;

    if !snapshot_fresh || !csv_fresh {
        info!("Artifacts are stale; run `apilist update` to refresh them");
        return Ok(2);
    }
    info!("Artifacts are up to date");
    Ok(0)
}

fn cmd_schema(args: SchemaArgs) -> Result<()> {
    let schema = schemars::schema_for!(Snapshot);
    let text = serde_json::to_string_pretty(&schema).context("render schema")?;
    match args.output {
        Some(path) => write_text(&path, &text)?,
        None => println!("{text}"),
    }
    Ok(())
}

fn check_directories(build_path: &Path, target_path: &Path) -> Result<(), PreflightError> {
    if !build_path.exists() {
        return Err(PreflightError::MissingBuildDir(build_path.to_path_buf()));
    }
    if !target_path.exists() {
        return Err(PreflightError::MissingTargetDir(target_path.to_path_buf()));
    }
    Ok(())
}

fn check_snapshot_file(snapshot_path: &Path) -> Result<(), PreflightError> {
    if !snapshot_path.exists() {
        return Err(PreflightError::MissingSnapshot(snapshot_path.to_path_buf()));
    }
    if !snapshot_path.is_file() {
        return Err(PreflightError::SnapshotNotAFile(snapshot_path.to_path_buf()));
    }
    Ok(())
}

/// Run the build target that regenerates the snapshot in the build
/// directory. Build output streams through to the user.
fn build_snapshot(build_path: &Path) -> Result<()> {
    info!("Building {}", SNAPSHOT_BUILD_TARGET);
    let status = Command::new(SNAPSHOT_BUILD_TOOL)
        .arg(SNAPSHOT_BUILD_TARGET)
        .current_dir(build_path)
        .status()
        .with_context(|| format!("run {} {}", SNAPSHOT_BUILD_TOOL, SNAPSHOT_BUILD_TARGET))?;
    if !status.success() {
        bail!(
            "{} {} failed (exit={})",
            SNAPSHOT_BUILD_TOOL,
            SNAPSHOT_BUILD_TARGET,
            status
        );
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot {}", path.display()))?
    };
    let snapshot: Snapshot = serde_json::from_str(&text)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    Ok(snapshot)
}

/// Canonicalize the snapshot and render both artifacts. The same bytes
/// come out for any input ordering of the same records.
fn render_artifacts(mut snapshot: Snapshot) -> Result<(String, String)> {
    canonicalize(&mut snapshot);
    let rows = flatten(&snapshot);
    debug!("Flattened {} rows", rows.len());
    let csv = render_csv(&rows);
    let json = encode_snapshot(&snapshot)?;
    Ok((json, csv))
}

/// Pretty JSON with a trailing newline, the committed form.
fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    let mut text = serde_json::to_string_pretty(snapshot).context("encode snapshot")?;
    text.push('\n');
    Ok(text)
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

/// Byte-compare one committed artifact against its freshly rendered
/// form, logging the digests either way.
fn artifact_is_fresh(path: &Path, expected: &str) -> Result<bool> {
    let expected_digest = sha256_hex(expected.as_bytes());
    if !path.exists() {
        info!(
            "{}: missing (expected sha256 {})",
            path.display(),
            expected_digest
        );
        return Ok(false);
    }
    let actual = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let actual_digest = sha256_hex(&actual);
    let fresh = actual == expected.as_bytes();
    if fresh {
        debug!("{}: sha256 {}", path.display(), actual_digest);
    } else {
        info!(
            "{}: stale (committed sha256 {}, expected {})",
            path.display(),
            actual_digest,
            expected_digest
        );
    }
    Ok(fresh)
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Commit the refreshed artifacts in the target checkout, recording the
/// revision information taken from the build checkout.
fn commit_artifacts(build_path: &Path, target_path: &Path) -> Result<()> {
    let commit_hash = git_output(build_path, &["rev-parse", "HEAD"])?;
    let head_message = git_output(build_path, &["log", "-1", "--pretty=%B"])?;
    let commit_position = parse_commit_position(&head_message);
    if commit_position.is_none() {
        debug!(
            "HEAD commit in {} carries no commit position trailer",
            build_path.display()
        );
    }

    let status = git_output(target_path, &["status", "--porcelain=v1"])?;
    let entries: Vec<&str> = status
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if entries.is_empty() {
        info!("No change to API list");
        return Ok(());
    }
    if let Some(unexpected) = entries.iter().find(|entry| !is_artifact_modification(entry)) {
        error!(
            "Unexpected changes found in the repository: \"{}\"",
            unexpected
        );
        return Ok(());
    }

    let message = commit_message(&commit_hash, commit_position.as_deref());
    git_output(
        target_path,
        &[
            "commit",
            "-m",
            &message,
            "--",
            SNAPSHOT_TARGET_FILE,
            API_LIST_TARGET_FILE,
        ],
    )?;
    info!("Committed API list update");
    Ok(())
}

/// A porcelain v1 entry for a tracked modification of one of the two
/// artifacts, e.g. ` M chromium_api_list.csv`.
fn is_artifact_modification(entry: &str) -> bool {
    let mut parts = entry.split_whitespace();
    let status = parts.next();
    let path = parts.next();
    let trailing = parts.next();
    status == Some("M")
        && trailing.is_none()
        && matches!(path, Some(p) if p == SNAPSHOT_TARGET_FILE || p == API_LIST_TARGET_FILE)
}

fn commit_message(commit_hash: &str, commit_position: Option<&str>) -> String {
    let title = match commit_position {
        Some(position) => format!("Web API list update from {position}"),
        None => "Web API list update".to_string(),
    };
    format!("{title}\n\nSource Chromium revision is https://crrev.com/{commit_hash}\n")
}

/// Extract the Chromium commit position from a commit message. Trailers
/// sit at the end, so the last match wins.
fn parse_commit_position(message: &str) -> Option<String> {
    message
        .lines()
        .rev()
        .find_map(|line| line.trim_end().strip_prefix(COMMIT_POSITION_TRAILER))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn git_output(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed (exit={}): {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
