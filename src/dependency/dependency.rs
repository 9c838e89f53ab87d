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

use super::{AlternativeGroup, ArchConstraints, Operator};
use crate::architecture::{self, Architecture};
use crate::version::{self, Version};

/// Errors which may occur while parsing a dependency field.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An atom was malformed -- trailing garbage, unbalanced
    /// parens/brackets, or similar.
    InvalidAtom(String),

    /// A `(op version)` suffix was missing its version.
    MissingVersion(String),

    /// A package name was empty or contained disallowed characters.
    InvalidPackageName(String),

    /// An `[arch ...]` restriction was malformed.
    InvalidArchConstraint,

    /// Failure parsing a comparator.
    Operator(super::operator::InvalidOperator),

    /// Failure parsing a version.
    Version(version::Error),

    /// Failure parsing an architecture name.
    Architecture(architecture::Error),
}
crate::errors::error_enum!(Error);

impl From<super::operator::InvalidOperator> for Error {
    fn from(e: super::operator::InvalidOperator) -> Self {
        Error::Operator(e)
    }
}

impl From<version::Error> for Error {
    fn from(e: version::Error) -> Self {
        Error::Version(e)
    }
}

impl From<architecture::Error> for Error {
    fn from(e: architecture::Error) -> Self {
        Error::Architecture(e)
    }
}

/// A single alternative inside a [Dependency] -- a package name, an
/// optional version comparator, and an optional architecture
/// restriction.
///
/// ```
/// use germinate::dependency::Atom;
///
/// let atom: Atom = "libc6 (>= 2.34)".parse().unwrap();
/// assert_eq!("libc6", atom.name);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    /// Name of the package (or virtual package) being depended on.
    pub name: String,

    /// Version comparator, if one was given. `None` means any version
    /// of `name` will do.
    pub version: Option<(Operator, Version)>,

    /// Architecture restriction, if a `[...]` suffix was present.
    pub arch: Option<ArchConstraints>,
}

impl Atom {
    fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidAtom(input.to_string()));
        }

        let (head, arch) = match (input.find('['), input.rfind(']')) {
            (Some(open), Some(close)) if close > open => {
                let body = &input[open + 1..close];
                let trailing = input[close + 1..].trim();
                if !trailing.is_empty() {
                    return Err(Error::InvalidAtom(input.to_string()));
                }
                (input[..open].trim(), Some(ArchConstraints::parse(body)?))
            }
            (None, None) => (input, None),
            _ => return Err(Error::InvalidAtom(input.to_string())),
        };

        let (name, version) = match (head.find('('), head.rfind(')')) {
            (Some(open), Some(close)) if close > open => {
                let name = head[..open].trim();
                let trailing = head[close + 1..].trim();
                if !trailing.is_empty() {
                    return Err(Error::InvalidAtom(input.to_string()));
                }
                let body = head[open + 1..close].trim();
                (name, Some(Self::parse_version_constraint(body)?))
            }
            (None, None) => (head.trim(), None),
            _ => return Err(Error::InvalidAtom(input.to_string())),
        };

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidPackageName(name.to_string()));
        }

        Ok(Atom {
            name: name.to_string(),
            version,
            arch,
        })
    }

    fn parse_version_constraint(body: &str) -> Result<(Operator, Version), Error> {
        let split = body
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '!'))
            .unwrap_or(body.len());
        let (op, version) = body.split_at(split);
        let version = version.trim();
        if version.is_empty() {
            return Err(Error::MissingVersion(body.to_string()));
        }
        Ok((Operator::parse(op.trim())?, version.parse()?))
    }

    /// True if `arch` is permitted by this atom's restriction (or if the
    /// atom carries no restriction at all).
    pub fn matches_arch(&self, arch: &Architecture) -> bool {
        match &self.arch {
            Some(constraints) => constraints.matches(arch),
            None => true,
        }
    }

    /// True if a candidate package at `candidate_version` satisfies this
    /// atom's version constraint (or if the atom carries no constraint).
    pub fn satisfied_by(&self, candidate_version: &Version) -> bool {
        match &self.version {
            Some((op, want)) => op.satisfied_by(candidate_version, want),
            None => true,
        }
    }
}

impl std::str::FromStr for Atom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Atom::parse(s)
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some((op, version)) = &self.version {
            write!(f, " ({} {})", op, version)?;
        }
        if let Some(arch) = &self.arch {
            write!(f, " [{}]", arch)?;
        }
        Ok(())
    }
}

/// A fully parsed dependency field -- the conjunction (logical AND) of
/// its [AlternativeGroup]s.
///
/// ```
/// use germinate::dependency::Dependency;
/// use germinate::architecture::Architecture;
///
/// let dep = Dependency::parse("libc6 (>= 2.34), foo | bar", &Architecture::Amd64).unwrap();
/// assert_eq!(2, dep.groups.len());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dependency {
    /// Alternative groups, in field order. Every group is non-empty --
    /// groups which lose all of their atoms to an architecture
    /// restriction are dropped entirely rather than kept empty.
    pub groups: Vec<AlternativeGroup>,
}

impl Dependency {
    /// Parse a dependency field's value (the comma-separated list found
    /// on the right hand side of `Depends:`, `Build-Depends:`, etc.),
    /// restricting every [AlternativeGroup] to atoms valid for
    /// `target_arch`.
    ///
    /// An empty input string yields a [Dependency] with no groups, which
    /// is vacuously satisfied by anything -- this mirrors an absent
    /// field in the archive.
    pub fn parse(input: &str, target_arch: &Architecture) -> Result<Self, Error> {
        let mut groups = Vec::new();
        for clause in input.split(',') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let atoms = clause
                .split('|')
                .map(Atom::parse)
                .collect::<Result<Vec<_>, _>>()?;
            let group = AlternativeGroup(atoms).restrict_to(target_arch);
            if !group.is_empty() {
                groups.push(group);
            }
        }
        Ok(Dependency { groups })
    }

    /// Iterate over every [Atom] across every [AlternativeGroup], in
    /// field order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.groups.iter().flat_map(|group| group.atoms().iter())
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.groups
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

// vim: foldmethod=marker
