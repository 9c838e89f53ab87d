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

use super::Error;
use crate::architecture::Architecture;

/// An [ArchConstraint] limits an [crate::dependency::Atom] to only be
/// considered on a subset of all [Architecture] values. This can be
/// expressed via negation (for instance `!amd64` for "Everything except
/// [crate::architecture::AMD64]"), or by naming the [Architecture]
/// directly (such as `arm64`).
#[derive(Clone, Debug, PartialEq)]
pub struct ArchConstraint {
    /// True if the [ArchConstraint] is inverted -- meaning, this matches
    /// any [Architecture] that does *not* match the named [Architecture].
    pub negated: bool,

    /// [Architecture] being constrained.
    pub arch: Architecture,
}

impl std::fmt::Display for ArchConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.negated { "!" } else { "" }, self.arch)
    }
}

impl ArchConstraint {
    fn parse(token: &str) -> Result<Self, Error> {
        let (negated, arch) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        if arch.is_empty() {
            return Err(Error::InvalidArchConstraint);
        }
        Ok(ArchConstraint {
            negated,
            arch: arch.parse()?,
        })
    }

    /// Return true if the provided [Architecture] meets the requirements
    /// in the [ArchConstraint].
    pub fn matches(&self, arch: &Architecture) -> bool {
        let matched = arch.is(&self.arch);
        if self.negated {
            !matched
        } else {
            matched
        }
    }
}

/// List of [ArchConstraint] values which limit an
/// [crate::dependency::Atom] to specific [Architecture] values, as seen
/// in the `[arch1 !arch2 ...]` suffix of a dependency field.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchConstraints {
    /// All [ArchConstraint] values found in the `[...]` suffix.
    pub arches: Vec<ArchConstraint>,
}

impl std::fmt::Display for ArchConstraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.arches
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

impl ArchConstraints {
    /// Parse the space-separated contents of a `[...]` arch restriction
    /// (without the brackets).
    pub(crate) fn parse(body: &str) -> Result<Self, Error> {
        let arches = body
            .split_whitespace()
            .map(ArchConstraint::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if arches.is_empty() {
            return Err(Error::InvalidArchConstraint);
        }
        Ok(ArchConstraints { arches })
    }

    /// `true` if every [ArchConstraint] is negated. `false` if none are.
    /// Mixed negation (`[foo !bar]`) can't be evaluated unambiguously, per
    /// Debian bug #816473; we treat it as "matches everything" rather than
    /// guess at an interpretation.
    fn all_negated(&self) -> Option<bool> {
        let mut saw_true = false;
        let mut saw_false = false;
        for constraint in &self.arches {
            if constraint.negated {
                saw_true = true;
            } else {
                saw_false = true;
            }
        }
        match (saw_true, saw_false) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    /// Return true if the provided [Architecture] meets the requirements
    /// in the [ArchConstraints].
    pub fn matches(&self, arch: &Architecture) -> bool {
        let Some(negated) = self.all_negated() else {
            return true;
        };
        let mut matches = self.arches.iter().map(|c| c.matches(arch));
        if negated {
            matches.all(|v| v)
        } else {
            matches.any(|v| v)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simple_match() {
        let c = ArchConstraints::parse("amd64 arm64").unwrap();
        assert!(c.matches(&Architecture::Amd64));
        assert!(!c.matches(&Architecture::I386));
    }

    #[test]
    fn negated_match() {
        let c = ArchConstraints::parse("!amd64 !arm64").unwrap();
        assert!(!c.matches(&Architecture::Amd64));
        assert!(c.matches(&Architecture::I386));
    }

    #[test]
    fn mixed_negation_passes_through() {
        let c = ArchConstraints::parse("amd64 !arm64").unwrap();
        assert!(c.matches(&Architecture::Amd64));
        assert!(c.matches(&Architecture::I386));
    }
}

// vim: foldmethod=marker
