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

//! Output adapters (§6 "Outputs"): render a [GerminationOutput] into the
//! six file formats germinate has always produced -- per-seed and
//! per-source list files, the `provides` index, the merged `structure`
//! and `structure.dot`, `rdepends/<src>/<pkg>` trees, and `blacklisted`.
//!
//! Every renderer writes to anything [Write], so they're testable
//! against an in-memory buffer; [write_all] is the only function that
//! touches the filesystem, fanning out into an output directory.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::archive::Archive;
use crate::germinate::{GerminationOutput, ReverseDepends};

/// Write every output file germinate produces into `dir`, creating it
/// (and an `rdepends/` subdirectory) if necessary.
pub fn write_all(
    dir: &Path,
    archive: &Archive,
    output: &GerminationOutput,
    reverse: &ReverseDepends,
) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    let mut seed_names: Vec<&str> = output.seed_names().collect();
    seed_names.sort();

    for seed in &seed_names {
        let mut f = File::create(dir.join(seed))?;
        write_seed_list(&mut f, archive, output, seed)?;

        let mut f = File::create(dir.join(format!("{seed}.sources")))?;
        write_source_list(&mut f, archive, output, seed)?;
    }

    let mut f = File::create(dir.join("provides"))?;
    write_provides(&mut f, output)?;

    let mut f = File::create(dir.join("structure"))?;
    write_structure(&mut f, output)?;

    let mut f = File::create(dir.join("structure.dot"))?;
    write_structure_dot(&mut f, output)?;

    let mut f = File::create(dir.join("blacklisted"))?;
    write_blacklisted(&mut f, output)?;

    let rdepends_dir = dir.join("rdepends");
    let mut pkgs: Vec<&String> = output.all().iter().collect();
    pkgs.sort();
    for pkg in pkgs {
        let Some(bin) = archive.lookup_binary(pkg) else {
            continue;
        };
        let sub = rdepends_dir.join(&bin.source);
        fs::create_dir_all(&sub)?;
        let mut f = File::create(sub.join(pkg))?;
        write_rdepends_tree(&mut f, output, reverse, pkg)?;
    }

    Ok(())
}

/// Per-seed list file: fixed-width columns `Package | Source | Why |
/// Maintainer | Deb Size (B) | Inst Size (KB)`, a dashed separator, and
/// a trailing totals row.
pub fn write_seed_list(
    w: &mut impl Write,
    archive: &Archive,
    output: &GerminationOutput,
    seed_name: &str,
) -> io::Result<()> {
    let header = ["Package", "Source", "Why", "Maintainer", "Deb Size (B)", "Inst Size (KB)"];

    let mut rows: Vec<[String; 6]> = Vec::new();
    let mut total_size: u64 = 0;
    let mut total_installed: u64 = 0;

    if let Some(seed) = output.seed(seed_name) {
        let mut names: Vec<&String> = seed.build.iter().collect();
        names.sort();
        for name in names {
            let Some(bin) = archive.lookup_binary(name) else {
                continue;
            };
            let why = seed
                .reasons
                .get(name)
                .map(|r| r.why.clone())
                .unwrap_or_default();
            total_size += bin.size;
            total_installed += bin.installed_size;
            rows.push([
                bin.name.clone(),
                bin.source.clone(),
                why,
                bin.maintainer.clone(),
                bin.size.to_string(),
                bin.installed_size.to_string(),
            ]);
        }
    }

    write_table(w, &header, &rows, &["Total", "", "", "", &total_size.to_string(), &total_installed.to_string()])
}

/// Per-seed source list file: columns `Source | Maintainer`.
pub fn write_source_list(
    w: &mut impl Write,
    archive: &Archive,
    output: &GerminationOutput,
    seed_name: &str,
) -> io::Result<()> {
    let header = ["Source", "Maintainer"];
    let mut rows: Vec<[String; 2]> = Vec::new();

    if let Some(seed) = output.seed(seed_name) {
        let mut names: Vec<&String> = seed.sourcepkgs.iter().collect();
        names.sort();
        for name in names {
            let maintainer = archive
                .lookup_source(name)
                .map(|s| s.maintainer.clone())
                .unwrap_or_default();
            rows.push([name.clone(), maintainer]);
        }
    }

    write_table(w, &header, &rows, &["", ""])
}

fn write_table<const N: usize>(
    w: &mut impl Write,
    header: &[&str; N],
    rows: &[[String; N]],
    totals: &[&str; N],
) -> io::Result<()> {
    let mut widths: [usize; N] = std::array::from_fn(|i| header[i].len());
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }
    for (i, cell) in totals.iter().enumerate() {
        widths[i] = widths[i].max(cell.len());
    }

    write_row(w, header, &widths)?;
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let dash_refs: [&str; N] = std::array::from_fn(|i| dashes[i].as_str());
    write_row(w, &dash_refs, &widths)?;
    for row in rows {
        let cells: [&str; N] = std::array::from_fn(|i| row[i].as_str());
        write_row(w, &cells, &widths)?;
    }
    write_row(w, totals, &widths)?;
    Ok(())
}

fn write_row<const N: usize>(w: &mut impl Write, cells: &[&str; N], widths: &[usize; N]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(w, "{}", line.join(" | ").trim_end())
}

/// The `provides` file: one virtual-package-name block per line,
/// followed by its tab-indented providers, separated by blank lines.
pub fn write_provides(w: &mut impl Write, output: &GerminationOutput) -> io::Result<()> {
    let mut names: Vec<&String> = output.pkgprovides().keys().collect();
    names.sort();
    for name in names {
        writeln!(w, "{name}")?;
        let mut providers = output.pkgprovides()[name].clone();
        providers.sort();
        for provider in providers {
            writeln!(w, "\t{provider}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// The `structure` file: the merged structure, one `* seed [parents]`
/// line per seed in inheritance order.
pub fn write_structure(w: &mut impl Write, output: &GerminationOutput) -> io::Result<()> {
    for name in output.structure().names() {
        let parents = output.structure().direct_parents(name);
        if parents.is_empty() {
            writeln!(w, " * {name}")?;
        } else {
            writeln!(w, " * {name} [{}]", parents.join(" "))?;
        }
    }
    Ok(())
}

/// The `structure.dot` file: a Graphviz digraph with a `lightblue2`
/// filled node per seed and an `inherit -> seed` edge per direct
/// inheritance.
pub fn write_structure_dot(w: &mut impl Write, output: &GerminationOutput) -> io::Result<()> {
    writeln!(w, "digraph structure {{")?;
    for name in output.structure().names() {
        writeln!(w, "\t\"{name}\" [color=lightblue2, style=filled];")?;
    }
    for name in output.structure().names() {
        for parent in output.structure().direct_parents(name) {
            writeln!(w, "\t\"{parent}\" -> \"{name}\";")?;
        }
    }
    writeln!(w, "}}")?;
    Ok(())
}

/// A `rdepends/<src>/<pkg>` tree: one root per seed that touched `pkg`,
/// then a depth-first reverse-dependency tree below it. Cycle-safe: a
/// depender already on the current path prints `! loop`; one already
/// rendered elsewhere in the tree prints `! skipped` rather than being
/// expanded again.
pub fn write_rdepends_tree(
    w: &mut impl Write,
    output: &GerminationOutput,
    reverse: &ReverseDepends,
    pkg: &str,
) -> io::Result<()> {
    let mut seeds: Vec<&str> = output
        .seed_names()
        .filter(|name| output.seed(name).map(|s| s.build.contains(pkg)).unwrap_or(false))
        .collect();
    seeds.sort();

    for seed in seeds {
        writeln!(w, "{seed}")?;
        let mut visited = HashSet::new();
        let mut path = vec![pkg.to_string()];
        visited.insert(pkg.to_string());
        write_rdepends_node(w, reverse, pkg, 1, &mut path, &mut visited)?;
    }
    Ok(())
}

fn write_rdepends_node(
    w: &mut impl Write,
    reverse: &ReverseDepends,
    pkg: &str,
    depth: usize,
    path: &mut Vec<String>,
    visited: &mut HashSet<String>,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for depender in reverse.for_package(pkg) {
        if path.contains(depender) {
            writeln!(w, "{indent}{depender} ! loop")?;
            continue;
        }
        if visited.contains(depender) {
            writeln!(w, "{indent}{depender} ! skipped")?;
            continue;
        }
        writeln!(w, "{indent}{depender}")?;
        visited.insert(depender.clone());
        path.push(depender.clone());
        write_rdepends_node(w, reverse, depender, depth + 1, path, visited)?;
        path.pop();
    }
    Ok(())
}

/// The `blacklisted` file: tab-separated `pkg\tcategory` lines, sorted.
/// `category` is always `source` -- [GerminationOutput::blacklisted_srcs]
/// tracks only source packages (§3 "Germination output").
pub fn write_blacklisted(w: &mut impl Write, output: &GerminationOutput) -> io::Result<()> {
    let mut names: Vec<&String> = output.blacklisted_srcs().iter().collect();
    names.sort();
    for name in names {
        writeln!(w, "{name}\tsource")?;
    }
    Ok(())
}


// vim: foldmethod=marker
