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

//! The `dependency` module parses Debian-style dependency field values
//! (`Depends`, `Pre-Depends`, `Recommends`, `Build-Depends`, ...) into a
//! disjunctive normal form: a [Dependency] is a conjunction of
//! [AlternativeGroup]s, and each [AlternativeGroup] is a disjunction of
//! [Atom]s.
//!
//! ```
//! use germinate::dependency::Dependency;
//! use germinate::architecture::Architecture;
//!
//! let dep = Dependency::parse("libc6 (>= 2.34), foo | bar [!amd64]", &Architecture::Amd64).unwrap();
//! assert_eq!(2, dep.groups.len());
//! ```
//!
//! Unlike a full `apt`-style solver, this module does not attempt to solve
//! a SAT instance over the archive -- it only provides first-match,
//! single-comparator semantics. Resolving an [Atom] against concrete
//! archive records (including virtual package / `Provides` lookups) is the
//! job of [crate::archive].
//!
//! Architecture restrictions (the `[arch...]` suffix seen on
//! `Build-Depends` fields) are evaluated immediately at parse time: any
//! [Atom] whose restriction excludes the target architecture is silently
//! dropped from its [AlternativeGroup], and a group that loses every atom
//! disappears from the [Dependency] entirely.

mod arch;
#[allow(clippy::module_inception)]
mod dependency;
mod group;
mod operator;
mod tests;

pub use arch::{ArchConstraint, ArchConstraints};
pub use dependency::{Atom, Dependency, Error};
pub use group::AlternativeGroup;
pub use operator::Operator;

// vim: foldmethod=marker
