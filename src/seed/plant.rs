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

//! Turns a seed's raw text into a planted [Seed] (§4.6): entries,
//! recommends, blacklist, substvars, include/exclude patterns,
//! kernel-version filters and close-seeds, plus whatever the literal
//! entries resolve to against an [Archive].
//!
//! Planting does not touch dependencies -- that is the germination
//! engine's job once every seed has been planted in structure order.

use crate::archive::Archive;
use crate::architecture::Architecture;
use crate::diagnostics::Diagnostic;
use std::collections::{HashMap, HashSet};

use super::Seed;

/// The global hints table: an owner seed assigned to a package name,
/// taking precedence over whatever seed(s) would otherwise have claimed
/// it by pattern match (§4.6).
#[derive(Clone, Debug, Default)]
pub struct Hints {
    owners: HashMap<String, String>,
}

impl Hints {
    /// Parse a two-column `seed package` hints file, one hint per line.
    /// Blank lines and `#`-comments are ignored; malformed lines (not
    /// exactly two columns) are skipped.
    pub fn parse(text: &str) -> Self {
        let mut owners = HashMap::new();
        for line in text.lines() {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let mut words = line.split_whitespace();
            let (Some(owner), Some(pkg), None) = (words.next(), words.next(), words.next())
            else {
                continue;
            };
            owners.insert(pkg.to_string(), owner.to_string());
        }
        Hints { owners }
    }

    /// The seed a hint assigns `pkg` to, if any.
    pub fn seed_for(&self, pkg: &str) -> Option<&str> {
        self.owners.get(pkg).map(String::as_str)
    }

    /// Iterate over every `(package, owner seed)` hint.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Match `pattern` against `candidates`, in sorted order: a leading and
/// trailing `/` makes it a regular expression, any of `* ? [` makes it
/// a glob, otherwise it is a literal name. An invalid regex or glob
/// matches nothing.
pub(crate) fn filter_packages(candidates: &[String], pattern: &str) -> Vec<String> {
    let mut out: Vec<String> = if pattern.len() >= 2
        && pattern.starts_with('/')
        && pattern.ends_with('/')
    {
        match regex::Regex::new(&pattern[1..pattern.len() - 1]) {
            Ok(re) => candidates
                .iter()
                .filter(|n| re.is_match(n))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    } else if pattern.contains(['*', '?', '[']) {
        match glob::Pattern::new(pattern) {
            Ok(p) => candidates
                .iter()
                .filter(|n| p.matches(n))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    } else {
        candidates
            .iter()
            .find(|n| n.as_str() == pattern)
            .cloned()
            .into_iter()
            .collect()
    };
    out.sort();
    out
}

/// Expand every `${var}` (case-insensitive) in `text` against
/// `substvars`, one substitution per match, cartesian-producing one
/// output string per combination of values. A reference to an
/// undefined variable pushes an [Diagnostic::UndefinedSubstvar] and is
/// dropped from the expansion (its value list is treated as empty, so
/// no string survives built from it).
fn substitute_seed_vars(
    substvars: &HashMap<String, Vec<String>>,
    text: &str,
    seed_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<String> {
    let mut sequences: Vec<String> = vec![String::new()];
    let mut rest = text;
    loop {
        let Some(start) = rest.find("${") else {
            for seq in sequences.iter_mut() {
                seq.push_str(rest);
            }
            break;
        };
        let Some(end_rel) = rest[start..].find('}') else {
            for seq in sequences.iter_mut() {
                seq.push_str(rest);
            }
            break;
        };
        let end = start + end_rel;
        let literal = &rest[..start];
        let var = rest[start + 2..end].to_lowercase();
        for seq in sequences.iter_mut() {
            seq.push_str(literal);
        }
        match substvars.get(&var) {
            Some(values) => {
                let mut expanded = Vec::with_capacity(sequences.len() * values.len());
                for value in values {
                    for seq in &sequences {
                        let mut s = seq.clone();
                        s.push_str(value);
                        expanded.push(s);
                    }
                }
                sequences = expanded;
            }
            None => {
                diagnostics.push(Diagnostic::UndefinedSubstvar {
                    seed: seed_name.to_string(),
                    var,
                });
                sequences.clear();
            }
        }
        rest = &rest[end + 1..];
    }
    sequences
}

fn is_pruned(seed: &Seed, pkg: &str, archive: &Archive) -> bool {
    if seed.kernel_versions.is_empty() {
        return false;
    }
    match archive.lookup_binary(pkg) {
        Some(binary) if !binary.kernel_version.is_empty() => {
            !seed.kernel_versions.contains(&binary.kernel_version)
        }
        _ => false,
    }
}

fn already_seeded(pkg: &str, inner_seed_names: &[String], planted: &HashMap<String, Seed>) -> bool {
    inner_seed_names.iter().any(|name| {
        planted
            .get(name)
            .map(|s| s.entries.iter().any(|e| e == pkg) || s.recommends_entries.iter().any(|e| e == pkg))
            .unwrap_or(false)
    })
}

/// Plant `name` from its raw seed `text`.
///
/// `known_seeds` is every seed name (plus the synthetic `extra`)
/// recognized for `X-include`/`X-exclude` validation. `planted` holds
/// every seed already planted in structure order (this seed's
/// ancestors); `inner_seed_names` is the transitive closure of `name`'s
/// ancestors including `name` itself, used both for the structure
/// lookup above and, via the entry just planted into `seed` as the loop
/// runs, for catching a duplicate literal within the same seed.
#[allow(clippy::too_many_arguments)]
pub fn plant_seed(
    archive: &Archive,
    arch: &Architecture,
    known_seeds: &HashSet<String>,
    planted: &HashMap<String, Seed>,
    ancestor_names: &[String],
    hints: &Hints,
    name: &str,
    text: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Seed {
    let mut seed = Seed::new(name);
    let mut substvars: HashMap<String, Vec<String>> = HashMap::new();
    let mut candidates: Vec<(String, bool)> = Vec::new();

    let binary_names: Vec<String> = archive.binaries().map(|b| b.name.clone()).collect();

    for raw_line in text.lines() {
        if raw_line.to_lowercase().starts_with("task-seeds:") {
            let colon = raw_line.find(':').unwrap();
            seed.close_seeds
                .extend(raw_line[colon + 1..].split_whitespace().map(str::to_string));
            continue;
        }

        if !raw_line.starts_with(" * ") {
            continue;
        }
        let mut pkg = raw_line[3..].trim().to_string();
        if let Some(idx) = pkg.find('#') {
            pkg.truncate(idx);
        }
        let pkg = pkg.trim().to_string();
        if pkg.is_empty() {
            continue;
        }

        if let Some(colon) = pkg.find(':') {
            let header_name = pkg[..colon].trim().to_lowercase();
            let values: Vec<String> = pkg[colon + 1..].split_whitespace().map(str::to_string).collect();
            match header_name.as_str() {
                "kernel-version" => seed.kernel_versions.extend(values.iter().cloned()),
                "feature" => seed.features.extend(values.iter().cloned()),
                _ if header_name.ends_with("-include") => {
                    let other = header_name[..header_name.len() - "-include".len()].to_string();
                    if other != "extra" && !known_seeds.contains(&other) {
                        diagnostics.push(Diagnostic::UnknownIncludeExcludeSeed {
                            seed: name.to_string(),
                            referenced: other,
                        });
                    } else {
                        seed.include_patterns.entry(other).or_default().extend(values.iter().cloned());
                    }
                }
                _ if header_name.ends_with("-exclude") => {
                    let other = header_name[..header_name.len() - "-exclude".len()].to_string();
                    if other != "extra" && !known_seeds.contains(&other) {
                        diagnostics.push(Diagnostic::UnknownIncludeExcludeSeed {
                            seed: name.to_string(),
                            referenced: other,
                        });
                    } else {
                        seed.exclude_patterns.entry(other).or_default().extend(values.iter().cloned());
                    }
                }
                _ => {}
            }
            substvars.insert(header_name, values);
            continue;
        }

        let mut pkg = pkg;

        // archspec suffix: "foo [amd64 !i386]"
        if pkg.ends_with(']') {
            if let Some(open) = pkg.rfind('[') {
                let tokens: Vec<&str> = pkg[open + 1..pkg.len() - 1].split_whitespace().collect();
                let pos_arch: Vec<&str> = tokens.iter().filter(|t| !t.starts_with('!')).cloned().collect();
                let neg_arch: Vec<&str> = tokens.iter().filter_map(|t| t.strip_prefix('!')).collect();
                let arch_name = arch.to_string();
                if neg_arch.contains(&arch_name.as_str()) {
                    continue;
                }
                if !pos_arch.is_empty() && !pos_arch.contains(&arch_name.as_str()) {
                    continue;
                }
                pkg = pkg[..open].trim_end().to_string();
            }
        }

        let pkg = pkg.split_whitespace().next().unwrap_or("").to_string();
        if pkg.is_empty() {
            continue;
        }

        let mut pkg = pkg;
        let mut is_blacklist = false;
        if let Some(rest) = pkg.strip_prefix('!') {
            is_blacklist = true;
            pkg = rest.to_string();
        }

        let mut is_recommend = false;
        let names: Vec<String> = if pkg.starts_with('(') && pkg.ends_with(')') && pkg.len() >= 2 {
            is_recommend = true;
            let inner = pkg[1..pkg.len() - 1].to_string();
            let matches = filter_packages(&binary_names, &inner);
            if matches.is_empty() {
                vec![inner]
            } else {
                matches
            }
        } else if let Some(src_name) = pkg.strip_prefix('%') {
            match archive.lookup_source(src_name) {
                Some(src) => src
                    .binaries
                    .iter()
                    .filter(|b| archive.lookup_binary(b).is_some())
                    .cloned()
                    .collect(),
                None => {
                    diagnostics.push(Diagnostic::UnknownPackage {
                        seed: name.to_string(),
                        entry: pkg.clone(),
                    });
                    Vec::new()
                }
            }
        } else {
            let matches = filter_packages(&binary_names, &pkg);
            if matches.is_empty() {
                vec![pkg.clone()]
            } else {
                matches
            }
        };

        for candidate in names {
            for expanded in substitute_seed_vars(&substvars, &candidate, name, diagnostics) {
                if is_blacklist {
                    seed.blacklist.insert(expanded);
                } else {
                    candidates.push((expanded, is_recommend));
                }
            }
        }
    }

    let recommend_set: HashSet<String> = candidates
        .iter()
        .filter(|(_, recommend)| *recommend)
        .map(|(pkg, _)| pkg.clone())
        .collect();

    for (pkg, is_recommend) in &candidates {
        if let Some(owner) = hints.seed_for(pkg) {
            if owner != name {
                log::warn!("taking the hint: {pkg} belongs to {owner}, not {name}");
                continue;
            }
        }

        if archive.lookup_binary(pkg).is_some() {
            if already_seeded(pkg, ancestor_names, planted)
                || seed.entries.iter().any(|e| e == pkg)
                || seed.recommends_entries.iter().any(|e| e == pkg)
            {
                diagnostics.push(Diagnostic::DuplicatedSeed {
                    seed: name.to_string(),
                    pkg: pkg.clone(),
                });
            } else if is_pruned(&seed, pkg, archive) {
                diagnostics.push(Diagnostic::PrunedByKernelVersion {
                    seed: name.to_string(),
                    pkg: pkg.clone(),
                });
            } else if *is_recommend {
                seed.recommends_entries.push(pkg.clone());
            } else {
                seed.entries.push(pkg.clone());
            }
        } else if !archive.providers(pkg).is_empty() {
            for vpkg in archive.providers(pkg).to_vec() {
                if already_seeded(&vpkg, ancestor_names, planted)
                    || seed.entries.iter().any(|e| e == &vpkg)
                    || seed.recommends_entries.iter().any(|e| e == &vpkg)
                {
                    continue;
                }
                if is_pruned(&seed, &vpkg, archive) {
                    continue;
                }
                if *is_recommend {
                    seed.recommends_entries.push(vpkg);
                } else {
                    seed.entries.push(vpkg);
                }
            }
        } else {
            diagnostics.push(Diagnostic::UnknownPackage {
                seed: name.to_string(),
                entry: pkg.clone(),
            });
        }
    }

    for (pkg, owner) in hints.iter() {
        if owner != name {
            continue;
        }
        if already_seeded(pkg, ancestor_names, planted)
            || seed.entries.iter().any(|e| e == pkg)
            || seed.recommends_entries.iter().any(|e| e == pkg)
        {
            continue;
        }
        if archive.lookup_binary(pkg).is_some() {
            if recommend_set.contains(pkg) {
                seed.recommends_entries.push(pkg.to_string());
            } else {
                seed.entries.push(pkg.to_string());
            }
        } else {
            diagnostics.push(Diagnostic::UnknownHint {
                package: pkg.to_string(),
                seed: name.to_string(),
            });
        }
    }

    seed.substvars = substvars;
    seed.state = super::SeedState::Planted;
    seed
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::archive::IndexType;

    fn archive() -> Archive {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                "Package: vim\nVersion: 1.0\n\n\
                 Package: vim-tiny\nVersion: 1.0\n\n\
                 Package: emacs\nVersion: 1.0\n\n\
                 Package: linux-image-5.4\nVersion: 1.0\nKernel-Version: 5.4\n\n\
                 Package: linux-image-5.15\nVersion: 1.0\nKernel-Version: 5.15\n\n\
                 Package: mail-agent\nVersion: 1.0\nProvides: mail-transport-agent\n"
                    .as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        archive
    }

    fn plant(text: &str) -> (Seed, Vec<Diagnostic>) {
        let archive = archive();
        let hints = Hints::default();
        let known: HashSet<String> = HashSet::new();
        let planted: HashMap<String, Seed> = HashMap::new();
        let mut diagnostics = Vec::new();
        let seed = plant_seed(
            &archive,
            &Architecture::Amd64,
            &known,
            &planted,
            &[],
            &hints,
            "base",
            text,
            &mut diagnostics,
        );
        (seed, diagnostics)
    }

    #[test]
    fn literal_entry() {
        let (seed, diags) = plant(" * vim\n");
        assert_eq!(vec!["vim".to_string()], seed.entries);
        assert!(diags.is_empty());
    }

    #[test]
    fn glob_entry_expands() {
        let (seed, _) = plant(" * vim*\n");
        let mut entries = seed.entries.clone();
        entries.sort();
        assert_eq!(vec!["vim".to_string(), "vim-tiny".to_string()], entries);
    }

    #[test]
    fn regex_entry_expands() {
        let (seed, _) = plant(" * /^vim/\n");
        let mut entries = seed.entries.clone();
        entries.sort();
        assert_eq!(vec!["vim".to_string(), "vim-tiny".to_string()], entries);
    }

    #[test]
    fn recommend_entry() {
        let (seed, _) = plant(" * (emacs)\n");
        assert!(seed.entries.is_empty());
        assert_eq!(vec!["emacs".to_string()], seed.recommends_entries);
    }

    #[test]
    fn blacklist_entry() {
        let (seed, _) = plant(" * !emacs\n");
        assert!(seed.entries.is_empty());
        assert!(seed.blacklist.contains("emacs"));
    }

    #[test]
    fn unknown_entry_is_diagnosed() {
        let (_, diags) = plant(" * nonexistent\n");
        assert_eq!(1, diags.len());
        assert!(matches!(diags[0], Diagnostic::UnknownPackage { .. }));
    }

    #[test]
    fn kernel_version_substitution_plants_both() {
        let (seed, diags) = plant(
            " * kernel-version: 5.4 5.15\n * linux-image-${Kernel-Version}\n",
        );
        let mut entries = seed.entries.clone();
        entries.sort();
        assert_eq!(
            vec!["linux-image-5.15".to_string(), "linux-image-5.4".to_string()],
            entries
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn undefined_substvar_is_diagnosed() {
        let (_, diags) = plant(" * vim-${Unknown}\n");
        assert_eq!(1, diags.len());
        assert!(matches!(diags[0], Diagnostic::UndefinedSubstvar { .. }));
    }

    #[test]
    fn duplicate_within_seed_is_diagnosed() {
        let (seed, diags) = plant(" * vim\n * vim\n");
        assert_eq!(vec!["vim".to_string()], seed.entries);
        assert_eq!(1, diags.len());
        assert!(matches!(diags[0], Diagnostic::DuplicatedSeed { .. }));
    }

    #[test]
    fn virtual_entry_expands_to_providers() {
        let (seed, _) = plant(" * mail-transport-agent\n");
        assert_eq!(vec!["mail-agent".to_string()], seed.entries);
    }

    #[test]
    fn hint_redirects_entry_away_from_other_seed() {
        let archive = archive();
        let hints = Hints::parse("desktop vim\n");
        let known: HashSet<String> = HashSet::new();
        let planted: HashMap<String, Seed> = HashMap::new();
        let mut diagnostics = Vec::new();
        let seed = plant_seed(
            &archive,
            &Architecture::Amd64,
            &known,
            &planted,
            &[],
            &hints,
            "base",
            " * vim\n",
            &mut diagnostics,
        );
        assert!(seed.entries.is_empty());
    }

    #[test]
    fn archspec_drops_entry_on_wrong_arch() {
        let (seed, _) = plant(" * vim [i386]\n");
        assert!(seed.entries.is_empty());
    }

    #[test]
    fn archspec_keeps_entry_on_matching_arch() {
        let (seed, _) = plant(" * vim [amd64]\n");
        assert_eq!(vec!["vim".to_string()], seed.entries);
    }
}

// vim: foldmethod=marker
