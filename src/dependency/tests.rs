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

#[cfg(test)]
mod test {
    use crate::architecture::Architecture;
    use crate::dependency::{Atom, Dependency, Operator};
    use crate::version::Version;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn parse_simple_name() {
        let atom: Atom = "libc6".parse().unwrap();
        assert_eq!("libc6", atom.name);
        assert_eq!(None, atom.version);
        assert_eq!(None, atom.arch);
    }

    #[test]
    fn parse_versioned_atom() {
        let atom: Atom = "libc6 (>= 2.34)".parse().unwrap();
        assert_eq!("libc6", atom.name);
        assert_eq!(Some((Operator::GreaterThanOrEqual, v("2.34"))), atom.version);
    }

    #[test]
    fn parse_legacy_single_char_operator() {
        let atom: Atom = "libc6 (< 2.34)".parse().unwrap();
        assert_eq!(Some((Operator::LessThan, v("2.34"))), atom.version);
    }

    #[test]
    fn parse_rejects_missing_version() {
        assert!("libc6 (>=)".parse::<Atom>().is_err());
    }

    #[test]
    fn parse_rejects_empty_name() {
        assert!(" (>= 1.0)".parse::<Atom>().is_err());
    }

    #[test]
    fn alternative_groups_split_on_conjunction_and_disjunction() {
        let dep = Dependency::parse("libc6 (>= 2.34), foo | bar", &Architecture::Amd64).unwrap();
        assert_eq!(2, dep.groups.len());
        assert_eq!(1, dep.groups[0].atoms().len());
        assert_eq!(2, dep.groups[1].atoms().len());
    }

    #[test]
    fn arch_restricted_atom_is_dropped_on_mismatch() {
        let dep = Dependency::parse("foo [!amd64]", &Architecture::Amd64).unwrap();
        assert_eq!(0, dep.groups.len());
    }

    #[test]
    fn arch_restricted_atom_survives_on_match() {
        let dep = Dependency::parse("foo [!amd64]", &Architecture::Arm64).unwrap();
        assert_eq!(1, dep.groups.len());
        assert_eq!("foo", dep.groups[0].atoms()[0].name);
    }

    #[test]
    fn group_loses_one_alternative_but_not_the_whole_group() {
        let dep = Dependency::parse("foo [!amd64] | bar", &Architecture::Amd64).unwrap();
        assert_eq!(1, dep.groups.len());
        assert_eq!(1, dep.groups[0].atoms().len());
        assert_eq!("bar", dep.groups[0].atoms()[0].name);
    }

    #[test]
    fn group_disappears_when_every_alternative_is_restricted_out() {
        let dep = Dependency::parse("foo [!amd64] | bar [!amd64]", &Architecture::Amd64).unwrap();
        assert_eq!(0, dep.groups.len());
    }

    #[test]
    fn empty_field_parses_to_no_groups() {
        let dep = Dependency::parse("", &Architecture::Amd64).unwrap();
        assert_eq!(0, dep.groups.len());
    }

    #[test]
    fn satisfied_by_checks_the_comparator() {
        let atom: Atom = "libc6 (>= 2.34)".parse().unwrap();
        assert!(atom.satisfied_by(&v("2.35")));
        assert!(atom.satisfied_by(&v("2.34")));
        assert!(!atom.satisfied_by(&v("2.33")));
    }

    #[test]
    fn display_round_trips_through_groups() {
        let dep = Dependency::parse("libc6 (>= 2.34), foo | bar", &Architecture::Amd64).unwrap();
        assert_eq!("libc6 (>= 2.34), foo | bar", dep.to_string());
    }
}
