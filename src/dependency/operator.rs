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

use crate::version::Version;
use std::cmp::Ordering;

/// A comparator used to limit an [crate::dependency::Atom] to only a
/// subset of a package's possible [Version]s.
///
/// This is the archive's comparator set (`""`, `<=`, `>=`, `<<`/`<`,
/// `>>`/`>`, `=`, `!=`), not a general SAT-style constraint language --
/// a single [Operator] plus a single [Version] is all an [Operator] ever
/// carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Operator {
    /// No version constraint at all. An unversioned [crate::dependency::Atom]
    /// is satisfied by the mere presence of the named package (or, for a
    /// virtual name, by any provider).
    #[default]
    Any,

    /// Strictly less than (`<<`, or the legacy single-char `<`).
    LessThan,

    /// Less than or equal to (`<=`).
    LessThanOrEqual,

    /// Strictly greater than (`>>`, or the legacy single-char `>`).
    GreaterThan,

    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,

    /// Exactly equal to (`=`).
    Equal,

    /// Not equal to (`!=`). Rarely seen outside of `Breaks`/`Conflicts`
    /// style fields, but the archive's grammar allows it anywhere.
    NotEqual,
}

/// Error conditions which may be encountered when parsing a comparator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidOperator;
crate::errors::error_enum!(InvalidOperator);

impl Operator {
    /// Parse the comparator token found inside a `(op version)` suffix.
    pub fn parse(s: &str) -> Result<Self, InvalidOperator> {
        Ok(match s {
            "" => Operator::Any,
            "<<" | "<" => Operator::LessThan,
            "<=" => Operator::LessThanOrEqual,
            ">>" | ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanOrEqual,
            "=" | "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            _ => return Err(InvalidOperator),
        })
    }

    /// Return true if `candidate` satisfies this comparator against `want`.
    pub fn satisfied_by(&self, candidate: &Version, want: &Version) -> bool {
        match candidate.cmp(want) {
            Ordering::Less => matches!(
                self,
                Operator::Any | Operator::LessThan | Operator::LessThanOrEqual | Operator::NotEqual
            ),
            Ordering::Equal => matches!(
                self,
                Operator::Any
                    | Operator::LessThanOrEqual
                    | Operator::GreaterThanOrEqual
                    | Operator::Equal
            ),
            Ordering::Greater => matches!(
                self,
                Operator::Any
                    | Operator::GreaterThan
                    | Operator::GreaterThanOrEqual
                    | Operator::NotEqual
            ),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operator::Any => "",
                Operator::LessThan => "<<",
                Operator::LessThanOrEqual => "<=",
                Operator::GreaterThan => ">>",
                Operator::GreaterThanOrEqual => ">=",
                Operator::Equal => "=",
                Operator::NotEqual => "!=",
            }
        )
    }
}


// vim: foldmethod=marker
