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

/// A seed's place in its `Empty -> Planted -> Growing -> Grown`
/// lifecycle (§4.8). Only the `Growing -> Grown` transition freezes the
/// literal entries list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SeedState {
    /// Constructed, not yet planted.
    #[default]
    Empty,

    /// Literal entries/recommends/blacklist/substvars have been planted.
    Planted,

    /// Currently being grown by the germination engine.
    Growing,

    /// Growth complete; `entries` is frozen.
    Grown,
}

/// Why a package was selected: a human-readable string plus the two
/// flags the reason-priority rule (§4.7 step 5) compares on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reason {
    /// Human-readable provenance, e.g. `"Desktop"` or `"foo (B)"`.
    pub why: String,

    /// True if this package was pulled in to satisfy a build-dependency
    /// rather than a runtime one.
    pub build_tree: bool,

    /// True if this package was pulled in via a `Recommends` rather than
    /// a hard dependency.
    pub recommends: bool,
}

impl Reason {
    /// Construct a reason.
    pub fn new(why: impl Into<String>, build_tree: bool, recommends: bool) -> Self {
        Reason {
            why: why.into(),
            build_tree,
            recommends,
        }
    }

    /// True if `self`, as a newly discovered reason, should replace
    /// `existing` in a reasons map, per §4.7 step 5's reason-priority
    /// rule: a dependency-tree reason beats a build-tree reason; within
    /// the same tree kind, a dependency beats a recommendation; ties
    /// (same tree kind, same recommends-ness) keep the existing,
    /// earlier-recorded reason.
    pub fn wins_over(&self, existing: &Reason) -> bool {
        match (self.build_tree, existing.build_tree) {
            (false, true) => true,
            (true, false) => false,
            _ => !self.recommends && existing.recommends,
        }
    }
}

/// One seed's planted requirements and, once grown, its resolved
/// dependency-closure state (§3 "Seed").
#[derive(Clone, Debug, Default)]
pub struct Seed {
    /// Seed name.
    pub name: String,

    /// Current lifecycle state.
    pub state: SeedState,

    /// Literal entries, in planting order; duplicates are detected, not
    /// silently merged, so [super::plant] can flag them.
    pub entries: Vec<String>,

    /// Literal `Recommends` entries. May shrink during growth as
    /// [super::structure::Structure]'s promotion mechanism moves
    /// entries between seeds.
    pub recommends_entries: Vec<String>,

    /// Packages blacklisted in this seed (and inherited by seeds that
    /// inherit from it).
    pub blacklist: HashSet<String>,

    /// Seed-local feature flags (from a `feature` header).
    pub features: HashSet<String>,

    /// Substitution variables, keyed by lowercased name, from this
    /// seed's `name: value` headers.
    pub substvars: HashMap<String, Vec<String>>,

    /// `X-include` patterns, keyed by the other seed name `X` (or the
    /// literal `extra`).
    pub include_patterns: HashMap<String, Vec<String>>,

    /// `X-exclude` patterns, keyed the same way as `include_patterns`.
    pub exclude_patterns: HashMap<String, Vec<String>>,

    /// Accepted kernel versions, from a `kernel-version` header. Empty
    /// means "no kernel-version filtering".
    pub kernel_versions: HashSet<String>,

    /// `Task-Seeds:` close-seeds set, restricting which outer seeds'
    /// literals may be promoted into this seed for non-first
    /// alternatives (§9 open question on close-seeds).
    pub close_seeds: HashSet<String>,

    /// Resolved runtime dependencies.
    pub depends: HashSet<String>,

    /// Resolved build dependencies.
    pub build_depends: HashSet<String>,

    /// Source packages backing this seed's runtime-side binaries.
    pub sourcepkgs: HashSet<String>,

    /// Source packages backing this seed's build-side binaries.
    pub build_sourcepkgs: HashSet<String>,

    /// Every binary touched while growing this seed, runtime or build.
    pub build: HashSet<String>,

    /// Binaries touched on the runtime side only.
    pub not_build: HashSet<String>,

    /// Sources touched on the build side.
    pub build_srcs: HashSet<String>,

    /// Sources touched on the runtime side.
    pub not_build_srcs: HashSet<String>,

    /// Provenance: why each touched package was selected.
    pub reasons: HashMap<String, Reason>,
}

impl Seed {
    /// A freshly constructed, empty seed.
    pub fn new(name: impl Into<String>) -> Self {
        Seed {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record `reason` for `pkg`, applying the reason-priority rule
    /// (§4.7 step 5): only overwrite an existing entry when `reason`
    /// strictly wins over it.
    pub fn record_reason(&mut self, pkg: &str, reason: Reason) {
        match self.reasons.get(pkg) {
            Some(existing) if !reason.wins_over(existing) => {}
            _ => {
                self.reasons.insert(pkg.to_string(), reason);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dependency_beats_build_tree() {
        let dep = Reason::new("Desktop", false, false);
        let build = Reason::new("Desktop (B)", true, false);
        assert!(dep.wins_over(&build));
        assert!(!build.wins_over(&dep));
    }

    #[test]
    fn dependency_beats_recommendation_within_same_tree() {
        let dep = Reason::new("Desktop", false, false);
        let rec = Reason::new("Desktop", false, true);
        assert!(dep.wins_over(&rec));
        assert!(!rec.wins_over(&dep));
    }

    #[test]
    fn ties_keep_existing_reason() {
        let first = Reason::new("Base", false, false);
        let second = Reason::new("Desktop", false, false);
        assert!(!second.wins_over(&first));
    }

    #[test]
    fn record_reason_respects_priority() {
        let mut seed = Seed::new("desktop");
        seed.record_reason("hello", Reason::new("Desktop (B)", true, false));
        seed.record_reason("hello", Reason::new("Desktop", false, false));
        assert_eq!("Desktop", seed.reasons["hello"].why);

        seed.record_reason("hello", Reason::new("Other (B)", true, false));
        assert_eq!("Desktop", seed.reasons["hello"].why);
    }
}

// vim: foldmethod=marker
