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

//! Optional TOML configuration for the `germinate` driver binary
//! (behind the `config` feature), the way `jelmer-debcargo` loads
//! `debcargo.toml`: a config file supplies defaults, and CLI flags
//! override whatever it sets. Nothing in this module is consumed by
//! the library's core modules -- it exists purely for the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors reading or parsing a config file.
#[derive(Debug)]
pub enum Error {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file's contents were not valid TOML, or didn't match
    /// [Config]'s shape.
    Toml(toml::de::Error),
}
crate::errors::error_enum!(Error);

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Toml(e)
    }
}

/// Driver configuration: every field mirrors a CLI flag and is
/// optional, since CLI flags always take precedence over a value set
/// here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Paths to `Packages`-style tag files to ingest.
    #[serde(default)]
    pub packages: Vec<PathBuf>,

    /// Paths to `Sources`-style tag files to ingest.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Paths to `Installer-Packages`-style tag files to ingest.
    #[serde(default)]
    pub installer_packages: Vec<PathBuf>,

    /// Path to the structure file.
    pub structure: Option<PathBuf>,

    /// Path to the directory holding one text file per seed.
    pub seed_dir: Option<PathBuf>,

    /// Target architecture, as a string (e.g. `"amd64"`).
    pub arch: Option<String>,

    /// Directory the output adapters should write into.
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Layer `override_with` on top of `self`: any field set in
    /// `override_with` wins, otherwise `self`'s value (if any) is kept.
    /// Used to apply CLI-flag overrides on top of a loaded config file.
    pub fn merged_with(self, override_with: Config) -> Config {
        Config {
            packages: if override_with.packages.is_empty() {
                self.packages
            } else {
                override_with.packages
            },
            sources: if override_with.sources.is_empty() {
                self.sources
            } else {
                override_with.sources
            },
            installer_packages: if override_with.installer_packages.is_empty() {
                self.installer_packages
            } else {
                override_with.installer_packages
            },
            structure: override_with.structure.or(self.structure),
            seed_dir: override_with.seed_dir.or(self.seed_dir),
            arch: override_with.arch.or(self.arch),
            output_dir: override_with.output_dir.or(self.output_dir),
        }
    }
}


// vim: foldmethod=marker
