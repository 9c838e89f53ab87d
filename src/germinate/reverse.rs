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

use crate::archive::Archive;

/// Reverse-dependency index: for each binary in a germination's `all`
/// set, every other touched binary whose `Pre-Depends`/`Depends` (and,
/// where applicable, `Recommends`) named it (§4.7 `reverse_depends`).
///
/// Built as a standalone post-pass rather than as fields on
/// [crate::archive::BinaryPackage] records, since the archive is shared,
/// immutable input and a reverse index is a property of one particular
/// germination result.
#[derive(Debug, Default)]
pub struct ReverseDepends {
    map: HashMap<String, Vec<String>>,
}

impl ReverseDepends {
    /// Compute reverse-dependencies across every package in `all`.
    /// `global_follow_recommends` mirrors the seed/structure
    /// `follow-recommends` feature; a depender whose `Section` is
    /// `metapackages` always has its `Recommends` followed regardless.
    pub fn build(archive: &Archive, all: &HashSet<String>, global_follow_recommends: bool) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        for name in all {
            let Some(bin) = archive.lookup_binary(name) else {
                continue;
            };
            let follow_recommends = global_follow_recommends || bin.section == "metapackages";

            let atoms = bin
                .pre_depends
                .atoms()
                .chain(bin.depends.atoms())
                .chain(if follow_recommends {
                    Some(bin.recommends.atoms())
                } else {
                    None
                }.into_iter().flatten());

            for atom in atoms {
                if !all.contains(&atom.name) {
                    continue;
                }
                let Some(target) = archive.lookup_binary(&atom.name) else {
                    continue;
                };
                if target.kind != bin.kind {
                    continue;
                }
                map.entry(atom.name.clone()).or_default().push(name.clone());
            }
        }

        for dependers in map.values_mut() {
            dependers.sort();
            dependers.dedup();
        }

        ReverseDepends { map }
    }

    /// Every touched package that depends on `name`, sorted and
    /// deduplicated. Empty if nothing in the closure depends on it.
    pub fn for_package(&self, name: &str) -> &[String] {
        self.map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over every `(package, dependers)` pair with a non-empty
    /// reverse-dependency list.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}


// vim: foldmethod=marker
