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

//! Non-fatal conditions encountered while planting or growing seeds.
//!
//! None of these stop germination: each is logged at an appropriate
//! [log::Level] at the point of detection and also pushed onto the
//! collecting seed or [crate::germinate::GerminationOutput] so a caller
//! can inspect what went wrong without scraping log output.

use log::{log, Level};

/// A single non-fatal condition, per §4.9/§7's taxonomy of conditions
/// the engine logs and continues past.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A seed-file literal entry did not match any known package,
    /// virtual package, glob or regex.
    UnknownPackage {
        /// Seed the entry was planted in.
        seed: String,
        /// The literal, glob, or regex text as written.
        entry: String,
    },

    /// A hints-table entry named a package not found anywhere in the
    /// archive.
    UnknownHint {
        /// Package named by the hint.
        package: String,
        /// Seed the hint assigned it to.
        seed: String,
    },

    /// A dependency atom named a package absent from both the binary
    /// table and the provides index.
    UnknownDependency {
        /// Package whose dependency could not be resolved.
        pkg: String,
        /// The unresolved dependency name.
        depend: String,
    },

    /// A duplicate literal entry was planted in the same seed.
    DuplicatedSeed {
        /// Seed the duplicate was found in.
        seed: String,
        /// The duplicated package name.
        pkg: String,
    },

    /// A seed referenced an unknown seed name in an `X-include` or
    /// `X-exclude` header.
    UnknownIncludeExcludeSeed {
        /// Seed the header was found in.
        seed: String,
        /// The unknown seed name referenced.
        referenced: String,
    },

    /// A `${var}` substitution referenced an undefined substvar.
    UndefinedSubstvar {
        /// Seed the substitution was found in.
        seed: String,
        /// The undefined variable name.
        var: String,
    },

    /// A binary's recorded source package does not exist in the source
    /// table.
    MissingSource {
        /// Binary whose source is missing.
        pkg: String,
        /// The missing source package name.
        src: String,
    },

    /// A structure file line or seed entry line could not be parsed.
    UnparseableLine {
        /// File the line was read from.
        file: String,
        /// The offending line's text.
        line: String,
    },

    /// An alternative-group had no atom that could be satisfied or
    /// chosen among.
    NoAlternative {
        /// Seed the dependency was being resolved in.
        seed: String,
        /// Package whose dependency had no satisfiable alternative.
        pkg: String,
    },

    /// A literal entry was planted in a seed but is also blacklisted in
    /// an outer seed; the entry is dropped.
    BlacklistedButSeeded {
        /// Seed the literal was planted in.
        seed: String,
        /// The blacklisted package name.
        pkg: String,
    },

    /// A package was pruned from a seed because its `Kernel-Version`
    /// was not in the seed's allowed set.
    PrunedByKernelVersion {
        /// Seed the package was pruned from.
        seed: String,
        /// The pruned package name.
        pkg: String,
    },
}

impl Diagnostic {
    /// Severity this condition is logged at: [Level::Error] for
    /// conditions that drop a requested package outright,
    /// [Level::Warn] for everything else.
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::UnknownPackage { .. }
            | Diagnostic::MissingSource { .. }
            | Diagnostic::BlacklistedButSeeded { .. }
            | Diagnostic::NoAlternative { .. } => Level::Error,
            _ => Level::Warn,
        }
    }

    /// Log this condition via the [log] crate at its [Diagnostic::level],
    /// matching the germinator's convention of a `?`/`!` prefix in the
    /// Python original's printed diagnostics.
    pub fn emit(&self) {
        log!(self.level(), "{}", self);
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownPackage { seed, entry } => {
                write!(f, "unknown package in seed {seed}: {entry}")
            }
            Diagnostic::UnknownHint { package, seed } => {
                write!(f, "unknown hinted package {package} for seed {seed}")
            }
            Diagnostic::UnknownDependency { pkg, depend } => {
                write!(f, "unknown dependency {depend} of {pkg}")
            }
            Diagnostic::DuplicatedSeed { seed, pkg } => {
                write!(f, "duplicated seed entry {pkg} in {seed}")
            }
            Diagnostic::UnknownIncludeExcludeSeed { seed, referenced } => {
                write!(
                    f,
                    "unknown seed {referenced} referenced by include/exclude in {seed}"
                )
            }
            Diagnostic::UndefinedSubstvar { seed, var } => {
                write!(f, "undefined substitution variable {var} in seed {seed}")
            }
            Diagnostic::MissingSource { pkg, src } => {
                write!(f, "missing source package {src} for {pkg}")
            }
            Diagnostic::UnparseableLine { file, line } => {
                write!(f, "unparseable line in {file}: {line}")
            }
            Diagnostic::NoAlternative { seed, pkg } => {
                write!(f, "nothing to choose to satisfy {pkg} in seed {seed}")
            }
            Diagnostic::BlacklistedButSeeded { seed, pkg } => {
                write!(f, "{pkg} is blacklisted but was seeded in {seed}")
            }
            Diagnostic::PrunedByKernelVersion { seed, pkg } => {
                write!(f, "{pkg} pruned from {seed} by kernel-version filter")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_package_is_error_level() {
        let d = Diagnostic::UnknownPackage {
            seed: "base".to_string(),
            entry: "nonexistent".to_string(),
        };
        assert_eq!(Level::Error, d.level());
        assert_eq!("unknown package in seed base: nonexistent", d.to_string());
    }

    #[test]
    fn undefined_substvar_is_warn_level() {
        let d = Diagnostic::UndefinedSubstvar {
            seed: "base".to_string(),
            var: "Kernel-Version".to_string(),
        };
        assert_eq!(Level::Warn, d.level());
    }
}

// vim: foldmethod=marker
