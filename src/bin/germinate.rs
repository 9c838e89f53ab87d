// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

//! The `germinate` driver: wires the library's collaborators together
//! around a filesystem -- ingest tag files into an [Archive], parse a
//! structure file and a directory of per-seed files, grow the closure,
//! and write [output]'s files. Everything here is ambient plumbing; the
//! algorithm lives in the library.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use germinate::archive::{Archive, IndexType};
use germinate::architecture::Architecture;
use germinate::germinate::{Germinator, ReverseDepends};
use germinate::seed::plant::{plant_seed, Hints};
use germinate::seed::Structure;

/// Compute the dependency closure of a set of seed lists against a
/// Debian-style binary archive.
#[derive(Parser, Debug)]
#[clap(name = "germinate", version)]
struct Cli {
    /// Packages-style tag file to ingest (repeatable); `.gz` is
    /// transparently decompressed.
    #[clap(long = "packages")]
    packages: Vec<PathBuf>,

    /// Sources-style tag file to ingest (repeatable); `.gz` is
    /// transparently decompressed.
    #[clap(long = "sources")]
    sources: Vec<PathBuf>,

    /// Installer-Packages-style (udeb) tag file to ingest (repeatable);
    /// `.gz` is transparently decompressed.
    #[clap(long = "installer-packages")]
    installer_packages: Vec<PathBuf>,

    /// Structure file describing seed inheritance.
    #[clap(long)]
    structure: Option<PathBuf>,

    /// Directory containing one text file per seed named in the
    /// structure, plus an optional `hints` file.
    #[clap(long = "seed-dir")]
    seed_dir: Option<PathBuf>,

    /// Target architecture (e.g. `amd64`).
    #[clap(long)]
    arch: Option<String>,

    /// Directory the output files land in.
    #[clap(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// TOML config file providing defaults for the flags above.
    #[cfg(feature = "config")]
    #[clap(long)]
    config: Option<PathBuf>,

    /// Raise logging verbosity; may be repeated (`-v`, `-vv`).
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::new();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    builder.filter_level(level).init();

    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(Failure::Argument(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::from(2)
        }
        Err(Failure::Fetch(err)) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Top-level driver failure. `Fetch` carries an [anyhow::Error] so I/O and
/// collaborator errors keep their full cause chain through to `main`'s
/// `{err:#}` print; `Argument` is kept distinct because it maps to a
/// different exit code (§6) than every other failure.
enum Failure {
    Argument(String),
    Fetch(anyhow::Error),
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Failure::Fetch(e.into())
    }
}

impl From<germinate::archive::Error> for Failure {
    fn from(e: germinate::archive::Error) -> Self {
        Failure::Fetch(e.into())
    }
}

impl From<germinate::seed::Error> for Failure {
    fn from(e: germinate::seed::Error) -> Self {
        Failure::Fetch(e.into())
    }
}

impl From<germinate::germinate::Error> for Failure {
    fn from(e: germinate::germinate::Error) -> Self {
        Failure::Fetch(e.into())
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    #[cfg(feature = "config")]
    let cli = apply_config(cli)?;

    let structure_path = cli
        .structure
        .ok_or_else(|| Failure::Argument("--structure is required".to_string()))?;
    let seed_dir = cli
        .seed_dir
        .ok_or_else(|| Failure::Argument("--seed-dir is required".to_string()))?;
    let arch_name = cli
        .arch
        .ok_or_else(|| Failure::Argument("--arch is required".to_string()))?;
    let output_dir = cli
        .output_dir
        .ok_or_else(|| Failure::Argument("--output-dir is required".to_string()))?;

    let arch: Architecture = arch_name
        .parse()
        .map_err(|_| Failure::Argument(format!("unknown architecture {arch_name:?}")))?;

    let mut archive = Archive::new();
    for path in &cli.packages {
        archive.ingest(IndexType::Packages, open_index(path)?, &arch)?;
    }
    for path in &cli.sources {
        archive.ingest(IndexType::Sources, open_index(path)?, &arch)?;
    }
    for path in &cli.installer_packages {
        archive.ingest(IndexType::InstallerPackages, open_index(path)?, &arch)?;
    }

    let (branch, sources) = load_structure_sources(&structure_path)?;
    let structure = Structure::parse(&branch, &sources)?;

    let hints_path = seed_dir.join("hints");
    let hints = if hints_path.is_file() {
        Hints::parse(&fs::read_to_string(hints_path)?)
    } else {
        Hints::default()
    };

    let known_seeds: HashSet<String> = structure
        .names()
        .iter()
        .cloned()
        .chain(std::iter::once("extra".to_string()))
        .collect();

    let mut planted: HashMap<String, germinate::seed::Seed> = HashMap::new();
    for name in structure.names() {
        let text = fs::read_to_string(seed_dir.join(name)).unwrap_or_default();
        let ancestors = structure.inherited(name).to_vec();
        let mut diagnostics = Vec::new();
        let seed = plant_seed(
            &archive,
            &arch,
            &known_seeds,
            &planted,
            &ancestors,
            &hints,
            name,
            &text,
            &mut diagnostics,
        );
        for d in diagnostics {
            d.emit();
        }
        planted.insert(name.clone(), seed);
    }

    let germinator = Germinator::new(&archive, structure, planted)?.with_hints(hints);
    let output = germinator.grow();

    let follow_recommends = output.structure().features().contains("follow-recommends");
    let reverse = ReverseDepends::build(&archive, output.all(), follow_recommends);

    germinate::output::write_all(&output_dir, &archive, &output, &reverse)?;

    log::info!(
        "germinated {} binaries, {} sources, {} diagnostics",
        output.all().len(),
        output.all_srcs().len(),
        output.diagnostics().len()
    );

    Ok(())
}

fn open_index(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(BufReader::new(flate2::read::GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read `path` and register it (by file name) as one structure branch,
/// alongside every sibling file in the same directory, so `include`
/// directives naming a sibling by file name resolve.
fn load_structure_sources(path: &Path) -> std::io::Result<(String, HashMap<String, String>)> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let branch = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut sources = HashMap::new();
    sources.insert(branch.clone(), fs::read_to_string(path)?);

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                let name = entry.file_name().to_string_lossy().to_string();
                if let std::collections::hash_map::Entry::Vacant(slot) = sources.entry(name) {
                    if let Ok(text) = fs::read_to_string(entry.path()) {
                        slot.insert(text);
                    }
                }
            }
        }
    }

    Ok((branch, sources))
}

#[cfg(feature = "config")]
fn apply_config(cli: Cli) -> Result<Cli, Failure> {
    let Some(config_path) = &cli.config else {
        return Ok(cli);
    };
    let file_config = germinate::config::Config::load(config_path)
        .map_err(|e| Failure::Argument(format!("invalid config file: {e}")))?;
    let cli_config = germinate::config::Config {
        packages: cli.packages.clone(),
        sources: cli.sources.clone(),
        installer_packages: cli.installer_packages.clone(),
        structure: cli.structure.clone(),
        seed_dir: cli.seed_dir.clone(),
        arch: cli.arch.clone(),
        output_dir: cli.output_dir.clone(),
    };
    let merged = file_config.merged_with(cli_config);
    Ok(Cli {
        packages: merged.packages,
        sources: merged.sources,
        installer_packages: merged.installer_packages,
        structure: merged.structure,
        seed_dir: merged.seed_dir,
        arch: merged.arch,
        output_dir: merged.output_dir,
        config: cli.config,
        verbose: cli.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_index_decompresses_gz_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let plain_path = dir.path().join("Packages");
        fs::write(&plain_path, "Package: hello\nVersion: 1.0-1\n").unwrap();
        let mut plain = String::new();
        open_index(&plain_path).unwrap().read_to_string(&mut plain).unwrap();
        assert_eq!(plain, "Package: hello\nVersion: 1.0-1\n");

        let gz_path = dir.path().join("Packages.gz");
        let mut encoder =
            flate2::write::GzEncoder::new(File::create(&gz_path).unwrap(), flate2::Compression::default());
        encoder.write_all(b"Package: hello\nVersion: 1.0-1\n").unwrap();
        encoder.finish().unwrap();

        let mut decompressed = String::new();
        open_index(&gz_path).unwrap().read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "Package: hello\nVersion: 1.0-1\n");
    }

    #[test]
    fn load_structure_sources_registers_siblings_by_file_name() {
        let dir = tempfile::tempdir().unwrap();

        let top_path = dir.path().join("top");
        fs::write(&top_path, "base:\ndesktop: base\n").unwrap();
        fs::write(dir.path().join("extra-branch"), "ship: desktop\n").unwrap();

        let (branch, sources) = load_structure_sources(&top_path).unwrap();

        assert_eq!(branch, "top");
        assert_eq!(sources.get("top").unwrap(), "base:\ndesktop: base\n");
        assert_eq!(sources.get("extra-branch").unwrap(), "ship: desktop\n");
    }

    #[test]
    fn load_structure_sources_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_structure_sources(&dir.path().join("missing")).is_err());
    }
}

// vim: foldmethod=marker
