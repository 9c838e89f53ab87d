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

use super::Atom;
use crate::architecture::Architecture;

/// A disjunction of [Atom]s -- one comma-separated element of a `Depends`
/// style field, such as `foo | bar (>= 1.0)`. Any one [Atom] being
/// satisfied is enough to satisfy the whole group.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AlternativeGroup(pub Vec<Atom>);

impl AlternativeGroup {
    /// Atoms making up this alternative group, in the order they were
    /// written.
    pub fn atoms(&self) -> &[Atom] {
        &self.0
    }

    /// True if this group has no surviving atoms -- which happens when
    /// every alternative was dropped for failing its architecture
    /// restriction at parse time. A [super::Dependency] never retains an
    /// empty group.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn restrict_to(&self, arch: &Architecture) -> AlternativeGroup {
        AlternativeGroup(
            self.0
                .iter()
                .filter(|atom| atom.matches_arch(arch))
                .cloned()
                .collect(),
        )
    }
}

impl std::fmt::Display for AlternativeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" | ")
        )
    }
}

// vim: foldmethod=marker
