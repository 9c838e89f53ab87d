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

use super::package::{BinaryPackage, PackageKind, SourcePackage};
use crate::architecture::Architecture;
use crate::dependency::Operator;
use crate::tagfile;
use crate::version::{self, Version};
use log::debug;
use std::collections::HashMap;
use std::io::Read;

/// Which kind of index a paragraph stream came from, per §4.4: this
/// decides both which table the paragraphs land in and, for binaries,
/// their [PackageKind].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexType {
    /// A `Packages` file; binaries land as [PackageKind::Deb].
    Packages,

    /// A `Sources` file.
    Sources,

    /// An installer `Packages` file (`debian-installer/binary-*`);
    /// binaries land as [PackageKind::Udeb].
    InstallerPackages,
}

/// Errors encountered while ingesting archive index data.
#[derive(Debug)]
pub enum Error {
    /// A required field (`Package`, `Version`) was missing from a
    /// paragraph.
    MissingField(&'static str),

    /// A `Version` field could not be parsed.
    Version(version::Error),

    /// A dependency-shaped field could not be parsed.
    Dependency(crate::dependency::Error),

    /// Underlying I/O failure reading the tag file stream.
    Io(std::io::Error),
}
crate::errors::error_enum!(Error);

impl From<version::Error> for Error {
    fn from(e: version::Error) -> Self {
        Error::Version(e)
    }
}

impl From<crate::dependency::Error> for Error {
    fn from(e: crate::dependency::Error) -> Self {
        Error::Dependency(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// In-memory archive: binary packages, source packages, and the
/// provides (virtual package) index built from them.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    binaries: HashMap<String, BinaryPackage>,
    sources: HashMap<String, SourcePackage>,
    provides: HashMap<String, Vec<String>>,
}

impl Archive {
    /// An archive with no packages in it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a stream of `index_type`-flavored tag file paragraphs,
    /// restricting dependency fields to `arch`. Each paragraph replaces
    /// any existing record of the same name only if its version is
    /// strictly newer (newer-wins, §4.4/§8 Invariant 5); the provides
    /// index is rebuilt from the resulting tables once ingestion of this
    /// stream completes.
    pub fn ingest(
        &mut self,
        index_type: IndexType,
        reader: impl Read,
        arch: &Architecture,
    ) -> Result<(), Error> {
        let mut tf = tagfile::Reader::new(reader);
        while let Some(paragraph) = tf.next_paragraph()? {
            match index_type {
                IndexType::Sources => {
                    let source = SourcePackage::parse(&paragraph, arch)?;
                    self.ingest_source(source);
                }
                IndexType::Packages | IndexType::InstallerPackages => {
                    let kind = if index_type == IndexType::InstallerPackages {
                        PackageKind::Udeb
                    } else {
                        PackageKind::Deb
                    };
                    let binary = BinaryPackage::parse(&paragraph, kind, arch)?;
                    self.ingest_binary(binary);
                }
            }
        }
        self.rebuild_provides();
        Ok(())
    }

    fn ingest_binary(&mut self, binary: BinaryPackage) {
        match self.binaries.get(&binary.name) {
            Some(existing) if existing.version >= binary.version => {
                debug!(
                    "ignoring {} {} (have newer or equal {})",
                    binary.name, binary.version, existing.version
                );
            }
            _ => {
                self.binaries.insert(binary.name.clone(), binary);
            }
        }
    }

    fn ingest_source(&mut self, source: SourcePackage) {
        match self.sources.get(&source.name) {
            Some(existing) if existing.version >= source.version => {
                debug!(
                    "ignoring {} {} (have newer or equal {})",
                    source.name, source.version, existing.version
                );
            }
            _ => {
                self.sources.insert(source.name.clone(), source);
            }
        }
    }

    fn rebuild_provides(&mut self) {
        self.provides.clear();
        for name in self.binaries.keys() {
            self.provides.entry(name.clone()).or_default();
        }
        for (name, binary) in self.binaries.iter() {
            for virt in &binary.provides {
                let list = self.provides.entry(virt.clone()).or_default();
                if !list.contains(name) {
                    list.push(name.clone());
                }
            }
        }
        for (name, list) in self.provides.iter_mut() {
            if self.binaries.contains_key(name) {
                list.retain(|n| n != name);
                list.insert(0, name.clone());
            }
        }
    }

    /// Look up a binary package by name.
    pub fn lookup_binary(&self, name: &str) -> Option<&BinaryPackage> {
        self.binaries.get(name)
    }

    /// Look up a source package by name.
    pub fn lookup_source(&self, name: &str) -> Option<&SourcePackage> {
        self.sources.get(name)
    }

    /// Iterate over every known binary package.
    pub fn binaries(&self) -> impl Iterator<Item = &BinaryPackage> {
        self.binaries.values()
    }

    /// Iterate over every known source package.
    pub fn sources(&self) -> impl Iterator<Item = &SourcePackage> {
        self.sources.values()
    }

    /// Concrete binary names providing the virtual (or real) name
    /// `name`, in the order they were discovered; a real package that
    /// also provides itself appears first.
    pub fn providers(&self, name: &str) -> &[String] {
        self.provides.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` if the archive's current record for `name` satisfies
    /// comparator `op` against `ver`. An empty comparator
    /// ([Operator::Any]) is satisfied by the package's mere presence.
    pub fn check_versioned(&self, name: &str, op: Operator, ver: &Version) -> bool {
        match self.binaries.get(name) {
            Some(binary) => op.satisfied_by(&binary.version, ver),
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pkg(name: &str, version: &str, extra: &str) -> String {
        format!("Package: {name}\nVersion: {version}\n{extra}\n")
    }

    #[test]
    fn ingest_then_lookup() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "1.0-1", "Depends: hello-dependency\n").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        let binary = archive.lookup_binary("hello").unwrap();
        assert_eq!("1.0-1", binary.version.to_string());
        assert_eq!(1, binary.depends.groups.len());
    }

    #[test]
    fn newer_wins_on_reingest() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "2.0-1", "").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "1.0-1", "").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        assert_eq!(
            "2.0-1",
            archive.lookup_binary("hello").unwrap().version.to_string()
        );
    }

    #[test]
    fn equal_version_does_not_replace() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "1.0-1", "Maintainer: first\n").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "1.0-1", "Maintainer: second\n").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        assert_eq!("first", archive.lookup_binary("hello").unwrap().maintainer);
    }

    #[test]
    fn installer_packages_are_udebs() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::InstallerPackages,
                pkg("di-utils", "1.0", "").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        assert_eq!(
            PackageKind::Udeb,
            archive.lookup_binary("di-utils").unwrap().kind
        );
    }

    #[test]
    fn provides_index_lists_real_package_first() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                "Package: postfix\nVersion: 1.0\nProvides: mail-transport-agent\n\n\
                 Package: exim4\nVersion: 1.0\nProvides: mail-transport-agent\n"
                    .as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        let providers = archive.providers("mail-transport-agent");
        assert_eq!(2, providers.len());
        assert!(providers.contains(&"postfix".to_string()));
        assert!(providers.contains(&"exim4".to_string()));

        let self_providers = archive.providers("postfix");
        assert_eq!("postfix", self_providers[0]);
    }

    #[test]
    fn check_versioned_respects_operator() {
        let mut archive = Archive::new();
        archive
            .ingest(
                IndexType::Packages,
                pkg("hello", "2.0-1", "").as_bytes(),
                &Architecture::Amd64,
            )
            .unwrap();
        let ver: Version = "1.0-1".parse().unwrap();
        assert!(archive.check_versioned("hello", Operator::GreaterThan, &ver));
        assert!(!archive.check_versioned("nonexistent", Operator::Any, &ver));
    }
}

// vim: foldmethod=marker
