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

use std::collections::{HashMap, HashSet};

use crate::archive::{Archive, BinaryPackage, PackageKind};
use crate::dependency::{AlternativeGroup, Atom, Operator};
use crate::diagnostics::Diagnostic;
use crate::seed::plant::{filter_packages, Hints};
use crate::seed::{Reason, Seed, SeedState, Structure};

/// Errors that can stop a [Germinator] before it ever starts growing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A [Structure] named a seed for which no [Seed] was planted.
    MissingSeed(String),
}
crate::errors::error_enum!(Error);

/// Which set of already-selected sources a rescue pass should draw its
/// candidate binaries from (§4.7 "Rescue-includes").
enum RescueSource<'a> {
    /// Sources touched while growing the named, already-grown seed.
    Seed(&'a str),
    /// The synthetic `extra` bucket: the subject seed's own inner
    /// closure, rather than a concrete seed's sources.
    Extra,
}

/// Walks a [Structure] in inheritance order, growing each [Seed]'s
/// dependency closure against an [Archive] (§4.7).
///
/// Construct with [Germinator::new], optionally attach a [Hints] table
/// with [Germinator::with_hints], then consume with [Germinator::grow]
/// to produce a [GerminationOutput].
pub struct Germinator<'a> {
    archive: &'a Archive,
    structure: Structure,
    seeds: HashMap<String, Seed>,
    hints: Hints,

    diagnostics: Vec<Diagnostic>,
    all: HashSet<String>,
    all_srcs: HashSet<String>,
    all_reasons: HashMap<String, Reason>,
    pkgprovides: HashMap<String, Vec<String>>,
    blacklisted_srcs: HashSet<String>,
}

impl<'a> Germinator<'a> {
    /// Build a germinator from an ingested archive, a parsed structure,
    /// and every seed the structure names, already planted.
    ///
    /// Fails if `structure` names a seed with no corresponding entry in
    /// `seeds`.
    pub fn new(
        archive: &'a Archive,
        structure: Structure,
        seeds: HashMap<String, Seed>,
    ) -> Result<Self, Error> {
        for name in structure.names() {
            if !seeds.contains_key(name) {
                return Err(Error::MissingSeed(name.clone()));
            }
        }
        Ok(Germinator {
            archive,
            structure,
            seeds,
            hints: Hints::default(),
            diagnostics: Vec::new(),
            all: HashSet::new(),
            all_srcs: HashSet::new(),
            all_reasons: HashMap::new(),
            pkgprovides: HashMap::new(),
            blacklisted_srcs: HashSet::new(),
        })
    }

    /// Attach a hints table: packages named here are claimed for their
    /// assigned seed rather than falling into `extra` (§4.7
    /// `add_extras`).
    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    /// Grow every seed named by the structure, in inheritance order,
    /// then run [Germinator::add_extras] to sweep up orphaned binaries
    /// into the synthetic `extra` seed.
    pub fn grow(mut self) -> GerminationOutput {
        let names = self.structure.names().to_vec();
        let mut grown: Vec<String> = Vec::new();

        for seed_name in &names {
            let why = capitalize(seed_name);

            if let Some(s) = self.seeds.get_mut(seed_name) {
                s.state = SeedState::Growing;
            }

            self.weed_seed(seed_name);

            let literals: Vec<(String, bool)> = self
                .seeds
                .get(seed_name)
                .map(|s| {
                    s.entries
                        .iter()
                        .cloned()
                        .map(|e| (e, false))
                        .chain(s.recommends_entries.iter().cloned().map(|e| (e, true)))
                        .collect()
                })
                .unwrap_or_default();
            for (pkg, is_recommend) in literals {
                self.add_package(seed_name, &pkg, &why, false, false, is_recommend);
            }

            for r in grown.iter().cloned().chain(std::iter::once(seed_name.clone())) {
                self.rescue(seed_name, RescueSource::Seed(&r), false);
            }
            self.rescue(seed_name, RescueSource::Extra, false);

            if let Some(s) = self.seeds.get_mut(seed_name) {
                s.state = SeedState::Grown;
            }
            grown.push(seed_name.clone());
        }

        if let Some(supported) = self.structure.supported().map(str::to_string) {
            self.rescue(&supported, RescueSource::Extra, true);
        }

        self.add_extras();

        self.finish()
    }

    /// Sweep every source package's binaries: any binary not already in
    /// `all` and not claimed by a hint for some other seed is added to
    /// the synthetic `extra` seed. Iterates to a fixed point, since
    /// claiming a binary can expose its dependencies as newly-reachable
    /// (§4.7 `add_extras`).
    pub fn add_extras(&mut self) {
        self.structure.add_extra();
        self.seeds
            .entry("extra".to_string())
            .or_insert_with(|| Seed::new("extra"));

        loop {
            let mut added_any = false;
            let mut source_names: Vec<String> = self.all_srcs.iter().cloned().collect();
            source_names.sort();

            for src_name in source_names {
                let Some(source) = self.archive.lookup_source(&src_name) else {
                    continue;
                };
                for bin in source.binaries.clone() {
                    if self.all.contains(&bin) {
                        continue;
                    }
                    if self.archive.lookup_binary(&bin).is_none() {
                        continue;
                    }
                    if let Some(owner) = self.hints.seed_for(&bin) {
                        if owner != "extra" {
                            continue;
                        }
                    }
                    self.add_package("extra", &bin, "extra", true, true, false);
                    added_any = true;
                }
            }

            if !added_any {
                break;
            }
        }
    }

    fn finish(self) -> GerminationOutput {
        GerminationOutput {
            structure: self.structure,
            seeds: self.seeds,
            all: self.all,
            all_srcs: self.all_srcs,
            reasons: self.all_reasons,
            pkgprovides: self.pkgprovides,
            blacklisted_srcs: self.blacklisted_srcs,
            diagnostics: self.diagnostics,
        }
    }

    fn diag(&mut self, d: Diagnostic) {
        d.emit();
        self.diagnostics.push(d);
    }

    fn is_pruned(&self, seed: &str, pkg: &str) -> bool {
        let Some(s) = self.seeds.get(seed) else {
            return false;
        };
        if s.kernel_versions.is_empty() {
            return false;
        }
        match self.archive.lookup_binary(pkg) {
            Some(b) if !b.kernel_version.is_empty() => {
                !s.kernel_versions.contains(&b.kernel_version)
            }
            _ => false,
        }
    }

    fn is_blacklisted_in_ancestors(&self, seed: &str, pkg: &str) -> bool {
        self.structure
            .inherited(seed)
            .iter()
            .any(|a| self.seeds.get(a).map(|s| s.blacklist.contains(pkg)).unwrap_or(false))
    }

    fn allowed_dependency(
        &self,
        depender_kind: PackageKind,
        candidate: &BinaryPackage,
        seed: &str,
        build_dep: bool,
    ) -> bool {
        if self.is_pruned(seed, &candidate.name) {
            return false;
        }
        if build_dep {
            candidate.kind == PackageKind::Deb
        } else {
            candidate.kind == depender_kind
        }
    }

    fn allowed_virtual_dependency(&self, depender_kind: PackageKind, op: Operator) -> bool {
        depender_kind == PackageKind::Udeb || op == Operator::Any
    }

    /// §4.7: the candidate set a dependency atom could be satisfied by.
    fn trylist_for(
        &self,
        seed: &str,
        depender_pkg: &str,
        atom: &Atom,
        build_dep: bool,
    ) -> Vec<String> {
        let depender_kind = self
            .archive
            .lookup_binary(depender_pkg)
            .map(|b| b.kind)
            .unwrap_or_default();

        match &atom.version {
            None => self
                .archive
                .providers(&atom.name)
                .iter()
                .filter_map(|p| {
                    let b = self.archive.lookup_binary(p)?;
                    self.allowed_dependency(depender_kind, b, seed, build_dep)
                        .then(|| p.clone())
                })
                .collect(),
            Some((op, ver)) => {
                if let Some(b) = self.archive.lookup_binary(&atom.name) {
                    if self.archive.check_versioned(&atom.name, *op, ver)
                        && self.allowed_dependency(depender_kind, b, seed, build_dep)
                    {
                        return vec![atom.name.clone()];
                    }
                    return Vec::new();
                }
                self.archive
                    .providers(&atom.name)
                    .iter()
                    .filter_map(|p| {
                        let b = self.archive.lookup_binary(p)?;
                        if self.allowed_virtual_dependency(depender_kind, *op)
                            && atom.satisfied_by(&b.version)
                            && self.allowed_dependency(depender_kind, b, seed, build_dep)
                        {
                            Some(p.clone())
                        } else {
                            None
                        }
                    })
                    .collect()
            }
        }
    }

    fn already_satisfied(
        &self,
        seed: &str,
        depender_pkg: &str,
        atom: &Atom,
        build_dep: bool,
        with_build: bool,
    ) -> bool {
        let trylist = self.trylist_for(seed, depender_pkg, atom, build_dep);
        if trylist.is_empty() {
            return false;
        }
        let inner = self.structure.inner_seeds(seed);
        for candidate in &trylist {
            for name in &inner {
                if let Some(s) = self.seeds.get(name) {
                    let hit = if with_build {
                        s.build.contains(candidate)
                    } else {
                        s.not_build.contains(candidate)
                    };
                    if hit {
                        return true;
                    }
                }
            }
        }
        if let Some(s) = self.seeds.get(seed) {
            for candidate in &trylist {
                if s.entries.iter().any(|e| e == candidate)
                    || s.recommends_entries.iter().any(|e| e == candidate)
                {
                    return true;
                }
            }
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn add_dependency_tree(
        &mut self,
        seed: &str,
        depender_pkg: &str,
        groups: &[AlternativeGroup],
        build_dep: bool,
        mut build_tree: bool,
        recommends: bool,
        why: &str,
    ) {
        if build_dep {
            build_tree = true;
        }
        let second_class = build_tree;

        for group in groups {
            let atoms = group.atoms();
            if atoms
                .iter()
                .any(|a| self.already_satisfied(seed, depender_pkg, a, build_dep, build_tree))
            {
                continue;
            }

            let mut chosen = false;
            for (i, atom) in atoms.iter().enumerate() {
                let close = i > 0;
                if self.promote_dependency(
                    seed,
                    depender_pkg,
                    atom,
                    close,
                    build_dep,
                    second_class,
                    build_tree,
                    recommends,
                    why,
                ) {
                    chosen = true;
                    break;
                }
            }
            if !chosen {
                for atom in atoms {
                    if self.new_dependency(
                        seed,
                        depender_pkg,
                        atom,
                        build_dep,
                        second_class,
                        build_tree,
                        recommends,
                        why,
                    ) {
                        chosen = true;
                        break;
                    }
                }
            }
            if !chosen && atoms.len() >= 2 {
                self.diag(Diagnostic::NoAlternative {
                    seed: seed.to_string(),
                    pkg: depender_pkg.to_string(),
                });
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn promote_dependency(
        &mut self,
        seed: &str,
        depender_pkg: &str,
        atom: &Atom,
        close: bool,
        build_dep: bool,
        second_class: bool,
        build_tree: bool,
        recommends: bool,
        why: &str,
    ) -> bool {
        let trylist = self.trylist_for(seed, depender_pkg, atom, build_dep);
        if trylist.is_empty() {
            return false;
        }
        let outer: Vec<String> = self
            .structure
            .names()
            .iter()
            .filter(|n| n.as_str() != seed && self.structure.is_outer(seed, n))
            .cloned()
            .collect();

        for candidate in &trylist {
            for l in &outer {
                if close {
                    let eligible = self
                        .seeds
                        .get(l)
                        .map(|s| s.close_seeds.contains(seed))
                        .unwrap_or(false);
                    if !eligible {
                        continue;
                    }
                }
                let is_literal = self
                    .seeds
                    .get(l)
                    .map(|s| {
                        s.entries.iter().any(|e| e == candidate)
                            || s.recommends_entries.iter().any(|e| e == candidate)
                    })
                    .unwrap_or(false);
                if !is_literal {
                    continue;
                }

                if !second_class {
                    if let Some(ls) = self.seeds.get_mut(l) {
                        ls.entries.retain(|e| e != candidate);
                        ls.recommends_entries.retain(|e| e != candidate);
                    }
                }

                let why = if build_tree {
                    format!("{why} (B)")
                } else {
                    why.to_string()
                };
                return self.add_dependency(
                    seed,
                    std::slice::from_ref(candidate),
                    build_tree,
                    second_class,
                    recommends,
                    &why,
                );
            }
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn new_dependency(
        &mut self,
        seed: &str,
        depender_pkg: &str,
        atom: &Atom,
        build_dep: bool,
        second_class: bool,
        build_tree: bool,
        recommends: bool,
        why: &str,
    ) -> bool {
        let trylist = self.trylist_for(seed, depender_pkg, atom, build_dep);
        if trylist.is_empty() {
            return false;
        }

        let has_kernel_variant = trylist.iter().any(|c| {
            self.archive
                .lookup_binary(c)
                .map(|b| !b.kernel_version.is_empty())
                .unwrap_or(false)
        });

        let chosen: Vec<String> = if has_kernel_variant {
            trylist
                .iter()
                .filter(|c| match self.archive.lookup_binary(c) {
                    Some(b) if !b.kernel_version.is_empty() => self
                        .seeds
                        .get(seed)
                        .map(|s| {
                            s.kernel_versions.is_empty()
                                || s.kernel_versions.contains(&b.kernel_version)
                        })
                        .unwrap_or(true),
                    _ => true,
                })
                .cloned()
                .collect()
        } else {
            trylist.first().cloned().into_iter().collect()
        };

        if chosen.is_empty() {
            return false;
        }

        let why = if build_tree {
            format!("{why} (B)")
        } else {
            why.to_string()
        };
        self.add_dependency(seed, &chosen, build_tree, second_class, recommends, &why)
    }

    fn add_dependency(
        &mut self,
        seed: &str,
        chosen: &[String],
        build_tree: bool,
        second_class: bool,
        recommends: bool,
        why: &str,
    ) -> bool {
        let mut added_any = false;
        for d in chosen {
            if self.is_blacklisted_in_ancestors(seed, d) {
                self.diag(Diagnostic::BlacklistedButSeeded {
                    seed: seed.to_string(),
                    pkg: d.clone(),
                });
                continue;
            }
            if let Some(s) = self.seeds.get_mut(seed) {
                if build_tree {
                    s.build_depends.insert(d.clone());
                } else {
                    s.depends.insert(d.clone());
                }
            }
            self.add_package(seed, d, why, second_class, build_tree, recommends);
            added_any = true;
        }
        added_any
    }

    /// §4.7 `add_package`: pull a single binary into `seed`'s closure,
    /// recording provenance and recursing into its dependencies and its
    /// source's build-dependencies.
    fn add_package(
        &mut self,
        seed: &str,
        pkg: &str,
        why: &str,
        second_class: bool,
        build_tree: bool,
        recommends: bool,
    ) {
        if self.is_pruned(seed, pkg) {
            self.diag(Diagnostic::PrunedByKernelVersion {
                seed: seed.to_string(),
                pkg: pkg.to_string(),
            });
            return;
        }

        let blacklisted = if build_tree {
            self.structure
                .supported()
                .map(|s| self.seeds.get(s).map(|sd| sd.blacklist.contains(pkg)).unwrap_or(false))
                .unwrap_or(false)
        } else {
            self.is_blacklisted_in_ancestors(seed, pkg)
        };
        if blacklisted {
            self.diag(Diagnostic::BlacklistedButSeeded {
                seed: seed.to_string(),
                pkg: pkg.to_string(),
            });
            return;
        }

        let second_class = second_class || build_tree;

        let binary = match self.archive.lookup_binary(pkg) {
            Some(b) => b,
            None => return,
        };

        self.all.insert(pkg.to_string());

        let ancestors = self.structure.inherited(seed).to_vec();

        let already_in_build = ancestors
            .iter()
            .any(|a| self.seeds.get(a).map(|s| s.build.contains(pkg)).unwrap_or(false));
        if !already_in_build {
            if let Some(s) = self.seeds.get_mut(seed) {
                s.build.insert(pkg.to_string());
            }
        }
        if !build_tree {
            let already_in_not_build = ancestors
                .iter()
                .any(|a| self.seeds.get(a).map(|s| s.not_build.contains(pkg)).unwrap_or(false));
            if !already_in_not_build {
                if let Some(s) = self.seeds.get_mut(seed) {
                    s.not_build.insert(pkg.to_string());
                }
            }
        }

        let reason = Reason::new(why.to_string(), build_tree, recommends);
        if let Some(s) = self.seeds.get_mut(seed) {
            s.record_reason(pkg, reason.clone());
        }
        match self.all_reasons.get(pkg) {
            Some(existing) if !reason.wins_over(existing) => {}
            _ => {
                self.all_reasons.insert(pkg.to_string(), reason);
            }
        }

        for provide in &binary.provides {
            let list = self.pkgprovides.entry(provide.clone()).or_default();
            if !list.iter().any(|p| p == pkg) {
                list.push(pkg.to_string());
            }
        }

        let depend_groups: Vec<AlternativeGroup> = binary
            .pre_depends
            .groups
            .iter()
            .chain(binary.depends.groups.iter())
            .cloned()
            .collect();
        self.add_dependency_tree(seed, pkg, &depend_groups, false, build_tree, false, why);

        let follows_recommends = self
            .seeds
            .get(seed)
            .map(|s| s.features.contains("follow-recommends"))
            .unwrap_or(false)
            || self.structure.features().contains("follow-recommends")
            || binary.section == "metapackages";
        let suppresses_recommends = self
            .seeds
            .get(seed)
            .map(|s| s.features.contains("no-follow-recommends"))
            .unwrap_or(false);
        if follows_recommends && !suppresses_recommends {
            let recommend_groups = binary.recommends.groups.clone();
            self.add_dependency_tree(seed, pkg, &recommend_groups, false, build_tree, true, why);
        }

        let src_name = binary.source.clone();
        let source = match self.archive.lookup_source(&src_name) {
            Some(s) => s,
            None => {
                self.diag(Diagnostic::MissingSource {
                    pkg: pkg.to_string(),
                    src: src_name,
                });
                return;
            }
        };

        if second_class {
            if ancestors
                .iter()
                .any(|a| self.seeds.get(a).map(|s| s.build_srcs.contains(&src_name)).unwrap_or(false))
            {
                return;
            }
        } else if ancestors.iter().any(|a| {
            self.seeds
                .get(a)
                .map(|s| s.not_build_srcs.contains(&src_name))
                .unwrap_or(false)
        }) {
            return;
        }

        self.all_srcs.insert(src_name.clone());
        if let Some(s) = self.seeds.get_mut(seed) {
            s.build_srcs.insert(src_name.clone());
        }

        if build_tree {
            if let Some(s) = self.seeds.get_mut(seed) {
                s.build_sourcepkgs.insert(src_name.clone());
            }
            let src_blacklisted = self.is_blacklisted_in_ancestors(seed, &src_name)
                || self
                    .seeds
                    .get(seed)
                    .map(|s| s.blacklist.contains(&src_name))
                    .unwrap_or(false);
            if src_blacklisted {
                self.blacklisted_srcs.insert(src_name.clone());
            }
        } else {
            if let Some(s) = self.seeds.get_mut(seed) {
                s.not_build_srcs.insert(src_name.clone());
                s.sourcepkgs.insert(src_name.clone());
            }
            for (name, s) in self.seeds.iter_mut() {
                if name != seed {
                    s.build_sourcepkgs.remove(&src_name);
                }
            }
        }

        let build_depend_groups: Vec<AlternativeGroup> = source
            .build_depends
            .groups
            .iter()
            .chain(source.build_depends_indep.groups.iter())
            .cloned()
            .collect();
        self.add_dependency_tree(seed, pkg, &build_depend_groups, true, true, false, why);
    }

    fn weed_seed(&mut self, seed: &str) {
        let ancestors = self.structure.inherited(seed).to_vec();
        let (mut drop_entries, mut drop_recommends) = (Vec::new(), Vec::new());
        if let Some(s) = self.seeds.get(seed) {
            for e in &s.entries {
                if ancestors
                    .iter()
                    .any(|a| self.seeds.get(a).map(|s| s.blacklist.contains(e)).unwrap_or(false))
                {
                    drop_entries.push(e.clone());
                }
            }
            for e in &s.recommends_entries {
                if ancestors
                    .iter()
                    .any(|a| self.seeds.get(a).map(|s| s.blacklist.contains(e)).unwrap_or(false))
                {
                    drop_recommends.push(e.clone());
                }
            }
        }
        for pkg in drop_entries.iter().chain(drop_recommends.iter()) {
            self.diag(Diagnostic::BlacklistedButSeeded {
                seed: seed.to_string(),
                pkg: pkg.clone(),
            });
        }
        if let Some(s) = self.seeds.get_mut(seed) {
            s.entries.retain(|e| !drop_entries.contains(e));
            s.recommends_entries.retain(|e| !drop_recommends.contains(e));
        }
    }

    /// §4.7 "Rescue-includes": pull binaries from already-selected
    /// sources into `subject` when its `R-include`/`R-exclude` headers
    /// (keyed by `source`'s name, or `extra`) say to.
    fn rescue(&mut self, subject: &str, source: RescueSource<'_>, build_tree: bool) {
        let key = match &source {
            RescueSource::Seed(r) => r.to_string(),
            RescueSource::Extra => "extra".to_string(),
        };

        let include_patterns = self
            .seeds
            .get(subject)
            .and_then(|s| s.include_patterns.get(&key).cloned())
            .unwrap_or_default();
        if include_patterns.is_empty() {
            return;
        }
        let exclude_patterns = self
            .seeds
            .get(subject)
            .and_then(|s| s.exclude_patterns.get(&key).cloned())
            .unwrap_or_default();

        let src_names: Vec<String> = match source {
            RescueSource::Seed(r) => self
                .seeds
                .get(r)
                .map(|s| s.build_srcs.iter().cloned().collect())
                .unwrap_or_default(),
            RescueSource::Extra => {
                let mut set = HashSet::new();
                for name in self.structure.inner_seeds(subject) {
                    if let Some(s) = self.seeds.get(&name) {
                        if build_tree {
                            set.extend(s.build_srcs.iter().cloned());
                        } else {
                            set.extend(s.not_build_srcs.iter().cloned());
                        }
                    }
                }
                set.into_iter().collect()
            }
        };

        let mut candidates: HashSet<String> = HashSet::new();
        for src in &src_names {
            if let Some(s) = self.archive.lookup_source(src) {
                for bin in &s.binaries {
                    if self.archive.lookup_binary(bin).is_some() {
                        candidates.insert(bin.clone());
                    }
                }
            }
        }
        let mut candidate_list: Vec<String> = candidates.into_iter().collect();
        candidate_list.sort();

        let mut survivors: HashSet<String> = HashSet::new();
        for pattern in &include_patterns {
            survivors.extend(filter_packages(&candidate_list, pattern));
        }
        for pattern in &exclude_patterns {
            for excluded in filter_packages(&candidate_list, pattern) {
                survivors.remove(&excluded);
            }
        }
        let mut survivor_list: Vec<String> = survivors.into_iter().collect();
        survivor_list.sort();

        let why_base = capitalize(subject);
        let why = if build_tree {
            format!("{why_base} (B)")
        } else {
            why_base
        };

        let outer: Vec<String> = self
            .structure
            .names()
            .iter()
            .filter(|n| n.as_str() != subject && self.structure.is_outer(subject, n))
            .cloned()
            .collect();

        for pkg in survivor_list {
            if self.all.contains(&pkg) {
                continue;
            }
            for l in &outer {
                if let Some(ls) = self.seeds.get_mut(l) {
                    ls.entries.retain(|e| e != &pkg);
                    ls.recommends_entries.retain(|e| e != &pkg);
                }
            }
            self.add_package(subject, &pkg, &why, build_tree, build_tree, false);
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The resolved result of growing every seed a [Structure] names: each
/// [Seed]'s closure, the global binary/source sets, provenance, the
/// provides index restricted to what was actually selected, and every
/// non-fatal [Diagnostic] raised along the way (§3 "Germination
/// output").
#[derive(Debug)]
pub struct GerminationOutput {
    structure: Structure,
    seeds: HashMap<String, Seed>,
    all: HashSet<String>,
    all_srcs: HashSet<String>,
    reasons: HashMap<String, Reason>,
    pkgprovides: HashMap<String, Vec<String>>,
    blacklisted_srcs: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl GerminationOutput {
    /// The structure that was grown.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Look up a grown seed by name.
    pub fn seed(&self, name: &str) -> Option<&Seed> {
        self.seeds.get(name)
    }

    /// Every seed name that was grown, including the synthetic `extra`.
    pub fn seed_names(&self) -> impl Iterator<Item = &str> {
        self.seeds.keys().map(String::as_str)
    }

    /// The last (most specific) seed in the structure's inheritance
    /// order, if any.
    pub fn supported(&self) -> Option<&Seed> {
        self.structure.supported().and_then(|n| self.seeds.get(n))
    }

    /// Every binary package touched, across every seed.
    pub fn all(&self) -> &HashSet<String> {
        &self.all
    }

    /// Every source package touched, across every seed.
    pub fn all_srcs(&self) -> &HashSet<String> {
        &self.all_srcs
    }

    /// Provenance for every touched binary, taking the highest-priority
    /// reason across all seeds (§4.7 step 5).
    pub fn reasons(&self) -> &HashMap<String, Reason> {
        &self.reasons
    }

    /// Virtual-package name to concrete providers actually selected
    /// into the closure.
    pub fn pkgprovides(&self) -> &HashMap<String, Vec<String>> {
        &self.pkgprovides
    }

    /// Source packages that were touched while also being blacklisted.
    pub fn blacklisted_srcs(&self) -> &HashSet<String> {
        &self.blacklisted_srcs
    }

    /// Every non-fatal condition raised while growing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::archive::{Archive, IndexType};
    use crate::architecture::Architecture;
    use crate::seed::plant::plant_seed;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn ingest(archive: &mut Archive, packages: &str, sources: &str) {
        archive
            .ingest(IndexType::Packages, Cursor::new(packages), &Architecture::Amd64)
            .unwrap();
        if !sources.is_empty() {
            archive
                .ingest(IndexType::Sources, Cursor::new(sources), &Architecture::Amd64)
                .unwrap();
        }
    }

    fn plant(
        archive: &Archive,
        known: &HashSet<String>,
        planted: &HashMap<String, Seed>,
        ancestors: &[String],
        name: &str,
        text: &str,
    ) -> Seed {
        let mut diagnostics = Vec::new();
        plant_seed(
            archive,
            &Architecture::Amd64,
            known,
            planted,
            ancestors,
            &Hints::default(),
            name,
            text,
            &mut diagnostics,
        )
    }

    fn structure(seeds: &[(&str, &str)]) -> Structure {
        let mut sources = HashMap::new();
        sources.insert(
            "top".to_string(),
            seeds
                .iter()
                .map(|(name, parents)| format!("{name}: {parents}\n"))
                .collect::<String>(),
        );
        Structure::parse("top", &sources).unwrap()
    }

    #[test]
    fn simple_dependency_pulls_in_closure() {
        let mut archive = Archive::new();
        ingest(
            &mut archive,
            "Package: hello\nVersion: 1.0\nDepends: libc6\n\n\
             Package: libc6\nVersion: 1.0\n\n",
            "Package: hello\nVersion: 1.0\nBinary: hello\n\n\
             Package: libc6\nVersion: 1.0\nBinary: libc6\n\n",
        );

        let known: HashSet<String> = ["base".to_string()].into_iter().collect();
        let mut planted = HashMap::new();
        let base = plant(&archive, &known, &planted, &[], "base", " * hello\n");
        planted.insert("base".to_string(), base);

        let structure = structure(&[("base", "")]);
        let germ = Germinator::new(&archive, structure, planted).unwrap();
        let output = germ.grow();

        assert!(output.all().contains("hello"));
        assert!(output.all().contains("libc6"));
        assert_eq!("Base", output.reasons()["hello"].why);
        assert!(output.seed("base").unwrap().depends.contains("libc6"));
    }

    #[test]
    fn alternative_promotion_prefers_inherited_literal() {
        let mut archive = Archive::new();
        ingest(
            &mut archive,
            "Package: app\nVersion: 1.0\nDepends: x | y\n\n\
             Package: x\nVersion: 1.0\n\n\
             Package: y\nVersion: 1.0\n\n",
            "Package: app\nVersion: 1.0\nBinary: app\n\n\
             Package: x\nVersion: 1.0\nBinary: x\n\n\
             Package: y\nVersion: 1.0\nBinary: y\n\n",
        );

        let known: HashSet<String> = ["base".to_string(), "desktop".to_string()].into_iter().collect();
        let mut planted = HashMap::new();
        let base = plant(&archive, &known, &planted, &[], "base", " * y\n");
        planted.insert("base".to_string(), base);
        let desktop = plant(
            &archive,
            &known,
            &planted,
            &["base".to_string()],
            "desktop",
            " * app\n",
        );
        planted.insert("desktop".to_string(), desktop);

        let structure = structure(&[("base", ""), ("desktop", "base")]);
        let germ = Germinator::new(&archive, structure, planted).unwrap();
        let output = germ.grow();

        assert!(output.seed("base").unwrap().entries.contains(&"y".to_string()));
        assert!(!output.seed("desktop").unwrap().depends.contains("y"));
        assert!(!output.seed("desktop").unwrap().depends.contains("x"));
        assert!(output.all().contains("y"));
    }

    #[test]
    fn blacklist_drops_a_descendants_literal() {
        let mut archive = Archive::new();
        ingest(
            &mut archive,
            "Package: bad\nVersion: 1.0\n\n",
            "Package: bad\nVersion: 1.0\nBinary: bad\n\n",
        );

        let known: HashSet<String> = ["base".to_string(), "desktop".to_string()].into_iter().collect();
        let mut planted = HashMap::new();
        let base = plant(&archive, &known, &planted, &[], "base", " * !bad\n");
        planted.insert("base".to_string(), base);
        let desktop = plant(
            &archive,
            &known,
            &planted,
            &["base".to_string()],
            "desktop",
            " * bad\n",
        );
        planted.insert("desktop".to_string(), desktop);

        let structure = structure(&[("base", ""), ("desktop", "base")]);
        let germ = Germinator::new(&archive, structure, planted).unwrap();
        let output = germ.grow();

        assert!(!output.all().contains("bad"));
        assert!(output
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::BlacklistedButSeeded { pkg, .. } if pkg == "bad")));
    }

    #[test]
    fn build_depends_pull_in_build_tree() {
        let mut archive = Archive::new();
        ingest(
            &mut archive,
            "Package: app\nVersion: 1.0\n\n\
             Package: builder\nVersion: 1.0\n\n",
            "Package: app\nVersion: 1.0\nBinary: app\nBuild-Depends: builder\n\n",
        );

        let known: HashSet<String> = ["base".to_string()].into_iter().collect();
        let mut planted = HashMap::new();
        let base = plant(&archive, &known, &planted, &[], "base", " * app\n");
        planted.insert("base".to_string(), base);

        let structure = structure(&[("base", "")]);
        let germ = Germinator::new(&archive, structure, planted).unwrap();
        let output = germ.grow();

        assert!(output.all().contains("builder"));
        assert!(output.seed("base").unwrap().build_depends.contains("builder"));
        assert_eq!("Base (B)", output.reasons()["builder"].why);
    }

    #[test]
    fn missing_seed_is_rejected_up_front() {
        let archive = Archive::new();
        let structure = structure(&[("base", "")]);
        let err = Germinator::new(&archive, structure, HashMap::new()).unwrap_err();
        assert_eq!(Error::MissingSeed("base".to_string()), err);
    }

    #[test]
    fn add_extras_claims_sibling_binaries_of_a_touched_source() {
        // "foo" builds both libfoo and libfoo-dev, but only libfoo is ever
        // depended on; add_extras should sweep up libfoo-dev since its
        // source is already part of the output. A binary from a source
        // nothing ever touches ("unrelated") must NOT be pulled in.
        let mut archive = Archive::new();
        ingest(
            &mut archive,
            "Package: hello\nVersion: 1.0\nDepends: libfoo\n\n\
             Package: libfoo\nVersion: 1.0\n\n\
             Package: libfoo-dev\nVersion: 1.0\n\n\
             Package: unrelated\nVersion: 1.0\n\n",
            "Package: foo\nVersion: 1.0\nBinary: libfoo, libfoo-dev\n\n\
             Package: hello\nVersion: 1.0\nBinary: hello\n\n\
             Package: unrelated\nVersion: 1.0\nBinary: unrelated\n\n",
        );

        let known: HashSet<String> = ["base".to_string()].into_iter().collect();
        let mut planted = HashMap::new();
        let base = plant(&archive, &known, &planted, &[], "base", " * hello\n");
        planted.insert("base".to_string(), base);

        let structure = structure(&[("base", "")]);
        let germ = Germinator::new(&archive, structure, planted).unwrap();
        let output = germ.grow();

        assert!(output.all().contains("libfoo-dev"));
        assert!(output.seed("extra").unwrap().build.contains("libfoo-dev"));
        assert!(!output.all().contains("unrelated"));
    }
}

// vim: foldmethod=marker
