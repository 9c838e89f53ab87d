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

use crate::diagnostics::Diagnostic;
use crate::topo;
use std::collections::{HashMap, HashSet};

/// Errors which abort structure parsing outright (the Fatal category of
/// §4.9/§7).
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A seed name contained a `/`.
    InvalidName(String),

    /// An `include` directive named a branch not supplied to
    /// [Structure::parse].
    UnknownBranch(String),

    /// Seed inheritance formed a cycle.
    Cycle(Vec<String>),
}
crate::errors::error_enum!(Error);

impl From<topo::Error> for Error {
    fn from(e: topo::Error) -> Self {
        match e {
            topo::Error::Cycle(nodes) => Error::Cycle(nodes),
        }
    }
}

enum Directive {
    Seed(String, Vec<String>),
    Include(String),
    Feature(Vec<String>),
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_directive(line: &str) -> Option<Directive> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return None;
    }
    if let Some(rest) = line.strip_prefix("include ") {
        return Some(Directive::Include(rest.trim().to_string()));
    }
    if let Some(rest) = line.strip_prefix("feature ") {
        return Some(Directive::Feature(
            rest.split_whitespace().map(str::to_string).collect(),
        ));
    }
    if let Some(colon) = line.find(':') {
        let name = line[..colon].trim().to_string();
        let inherited = line[colon + 1..]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        return Some(Directive::Seed(name, inherited));
    }
    None
}

/// An ordered collection of seed names linked by inheritance, parsed
/// from a structure file (§4.5/§6).
#[derive(Clone, Debug, Default)]
pub struct Structure {
    order: Vec<String>,
    direct: HashMap<String, Vec<String>>,
    inherited: HashMap<String, Vec<String>>,
    features: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Structure {
    /// Parse a structure file named `branch` out of `sources`, a map of
    /// branch name to raw structure-file text standing in for the
    /// caller's own retrieval of sibling structure files via `include`
    /// (the actual fetch is an external collaborator, per §1).
    pub fn parse(branch: &str, sources: &HashMap<String, String>) -> Result<Self, Error> {
        let mut order = Vec::new();
        let mut direct: HashMap<String, Vec<String>> = HashMap::new();
        let mut features = HashSet::new();
        let mut diagnostics = Vec::new();
        let mut visited_branches = HashSet::new();

        merge_branch(
            branch,
            sources,
            &mut visited_branches,
            &mut order,
            &mut direct,
            &mut features,
            &mut diagnostics,
        )?;

        // Validates acyclicity before computing ancestor closures, which
        // recurse unchecked otherwise.
        topo::topo_sort(&order, &direct)?;

        let mut inherited = HashMap::new();
        for name in &order {
            let mut visited = HashSet::new();
            let mut out = Vec::new();
            inherited_of(name, &direct, &mut visited, &mut out);
            inherited.insert(name.clone(), out);
        }

        Ok(Structure {
            order,
            direct,
            inherited,
            features,
            diagnostics,
        })
    }

    /// Seed names in merged structure order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Direct (unexpanded) parents of `name`, in the order they were
    /// declared.
    pub fn direct_parents(&self, name: &str) -> &[String] {
        self.direct.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every ancestor of `name`, in topological order (furthest
    /// ancestor first), not including `name` itself.
    pub fn inherited(&self, name: &str) -> &[String] {
        self.inherited.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `name` plus every seed it inherits from -- the set whose state is
    /// visible while growing `name`.
    pub fn inner_seeds(&self, name: &str) -> Vec<String> {
        let mut seeds = self.inherited(name).to_vec();
        seeds.push(name.to_string());
        seeds
    }

    /// True if `candidate` is a strictly outer seed of `name` -- that
    /// is, `candidate` transitively inherits from `name`.
    pub fn is_outer(&self, name: &str, candidate: &str) -> bool {
        self.inherited(candidate).iter().any(|n| n == name)
    }

    /// Top-level structure feature flags (`feature NAME` directives at
    /// any merged branch, not seed-specific features).
    pub fn features(&self) -> &HashSet<String> {
        &self.features
    }

    /// Diagnostics collected while parsing (unparseable lines).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The distinguished supported seed: the last seed in merged order.
    pub fn supported(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// Trim the structure's working set to `seeds` plus their
    /// transitive ancestors, preserving relative order.
    pub fn limit(&mut self, seeds: &[String]) {
        let mut keep: HashSet<String> = HashSet::new();
        for seed in seeds {
            keep.insert(seed.clone());
            for ancestor in self.inherited(seed) {
                keep.insert(ancestor.clone());
            }
        }
        self.order.retain(|n| keep.contains(n));
        self.direct.retain(|n, _| keep.contains(n));
        self.inherited.retain(|n, _| keep.contains(n));
    }

    /// Append a synthetic seed named `extra` that inherits from every
    /// other seed currently in the structure.
    pub fn add_extra(&mut self) {
        let parents = self.order.clone();
        let mut ancestors = parents.clone();
        for parent in &parents {
            for ancestor in self.inherited(parent) {
                if !ancestors.contains(ancestor) {
                    ancestors.push(ancestor.clone());
                }
            }
        }
        self.direct.insert("extra".to_string(), parents);
        self.inherited.insert("extra".to_string(), ancestors);
        self.order.push("extra".to_string());
    }
}

#[allow(clippy::too_many_arguments)]
fn merge_branch(
    branch: &str,
    sources: &HashMap<String, String>,
    visited_branches: &mut HashSet<String>,
    order: &mut Vec<String>,
    direct: &mut HashMap<String, Vec<String>>,
    features: &mut HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), Error> {
    if visited_branches.contains(branch) {
        return Ok(());
    }
    visited_branches.insert(branch.to_string());

    let text = sources
        .get(branch)
        .ok_or_else(|| Error::UnknownBranch(branch.to_string()))?;

    for line in text.lines() {
        match parse_directive(line) {
            Some(Directive::Include(other)) => {
                merge_branch(
                    &other,
                    sources,
                    visited_branches,
                    order,
                    direct,
                    features,
                    diagnostics,
                )?;
            }
            Some(Directive::Feature(names)) => {
                features.extend(names);
            }
            Some(Directive::Seed(name, parents)) => {
                if name.contains('/') {
                    return Err(Error::InvalidName(name));
                }
                if let Some(pos) = order.iter().position(|n| n == &name) {
                    order.remove(pos);
                }
                order.push(name.clone());
                direct.insert(name, parents);
            }
            None => {
                if !strip_comment(line).trim().is_empty() {
                    diagnostics.push(Diagnostic::UnparseableLine {
                        file: branch.to_string(),
                        line: line.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn inherited_of(
    name: &str,
    direct: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    let empty = Vec::new();
    for parent in direct.get(name).unwrap_or(&empty) {
        if !visited.contains(parent) {
            visited.insert(parent.clone());
            inherited_of(parent, direct, visited, out);
            out.push(parent.clone());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sources(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn simple_inheritance_chain() {
        let src = sources(&[("main", "base:\ndesktop: base\nsupported: desktop\n")]);
        let structure = Structure::parse("main", &src).unwrap();
        assert_eq!(
            vec!["base".to_string(), "desktop".to_string(), "supported".to_string()],
            structure.names().to_vec()
        );
        assert_eq!(
            vec!["base".to_string()],
            structure.inherited("desktop").to_vec()
        );
        assert_eq!(
            vec!["base".to_string(), "desktop".to_string()],
            structure.inherited("supported").to_vec()
        );
        assert_eq!(Some("supported"), structure.supported());
    }

    #[test]
    fn transitive_chain_order() {
        let src = sources(&[("main", "c:\nb: c\na: b\n")]);
        let structure = Structure::parse("main", &src).unwrap();
        assert_eq!(
            vec!["c".to_string(), "b".to_string()],
            structure.inherited("a").to_vec()
        );
    }

    #[test]
    fn include_merges_another_branch() {
        let src = sources(&[
            ("main", "include common\ndesktop: base\n"),
            ("common", "base:\n"),
        ]);
        let structure = Structure::parse("main", &src).unwrap();
        assert_eq!(
            vec!["base".to_string(), "desktop".to_string()],
            structure.names().to_vec()
        );
    }

    #[test]
    fn later_branch_overrides_inheritance_and_moves_to_end() {
        let src = sources(&[("main", "base:\ndesktop: base\nbase: desktop\n")]);
        let structure = Structure::parse("main", &src).unwrap();
        assert_eq!(
            vec!["desktop".to_string(), "base".to_string()],
            structure.names().to_vec()
        );
        assert_eq!(
            vec!["desktop".to_string()],
            structure.direct_parents("base").to_vec()
        );
    }

    #[test]
    fn feature_directive_is_collected() {
        let src = sources(&[("main", "feature follow-recommends\nbase:\n")]);
        let structure = Structure::parse("main", &src).unwrap();
        assert!(structure.features().contains("follow-recommends"));
    }

    #[test]
    fn cyclic_inheritance_is_fatal() {
        let src = sources(&[("main", "a: b\nb: a\n")]);
        assert!(Structure::parse("main", &src).is_err());
    }

    #[test]
    fn unknown_include_branch_is_fatal() {
        let src = sources(&[("main", "include missing\n")]);
        assert!(Structure::parse("main", &src).is_err());
    }

    #[test]
    fn unparseable_line_is_a_diagnostic_not_an_error() {
        let src = sources(&[("main", "base:\nthis is nonsense\n")]);
        let structure = Structure::parse("main", &src).unwrap();
        assert_eq!(1, structure.diagnostics().len());
    }

    #[test]
    fn add_extra_inherits_from_everything() {
        let src = sources(&[("main", "base:\ndesktop: base\n")]);
        let mut structure = Structure::parse("main", &src).unwrap();
        structure.add_extra();
        assert!(structure.names().contains(&"extra".to_string()));
        assert!(structure.inherited("extra").contains(&"base".to_string()));
        assert!(structure.inherited("extra").contains(&"desktop".to_string()));
    }

    #[test]
    fn limit_keeps_named_seeds_and_ancestors() {
        let src = sources(&[("main", "base:\ndesktop: base\nserver: base\n")]);
        let mut structure = Structure::parse("main", &src).unwrap();
        structure.limit(&["desktop".to_string()]);
        assert_eq!(
            vec!["base".to_string(), "desktop".to_string()],
            structure.names().to_vec()
        );
    }
}

// vim: foldmethod=marker
