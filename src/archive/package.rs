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

use crate::architecture::Architecture;
use crate::dependency::Dependency;
use crate::version::Version;

/// Whether a [BinaryPackage] is installed by the ordinary installer
/// (`deb`) or is one of the small packages used by the installer itself
/// (`udeb`). Build-dependencies may only ever be satisfied by `Deb`
/// candidates (§4.7 `allowed_dependency`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PackageKind {
    /// An ordinary installable binary package.
    #[default]
    Deb,

    /// A micro-package used only by the installer.
    Udeb,
}

/// A single binary package record, as ingested from a `Packages`-style
/// tag file paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryPackage {
    /// Package name; the archive's key.
    pub name: String,

    /// Package version.
    pub version: Version,

    /// `Section` field, if present.
    pub section: String,

    /// `Maintainer` field, if present.
    pub maintainer: String,

    /// True if the `Essential` field was `yes`.
    pub essential: bool,

    /// Name of the source package this binary was built from. Defaults
    /// to the binary's own name when the `Source` field is absent, per
    /// the archive's convention that a binary with no `Source:` field
    /// shares its source package's name.
    pub source: String,

    /// `Size` field (the `.deb`'s own size, in bytes).
    pub size: u64,

    /// `Installed-Size` field (unpacked size, in KB).
    pub installed_size: u64,

    /// Parsed `Pre-Depends` field.
    pub pre_depends: Dependency,

    /// Parsed `Depends` field.
    pub depends: Dependency,

    /// Parsed `Recommends` field.
    pub recommends: Dependency,

    /// Parsed `Suggests` field.
    pub suggests: Dependency,

    /// Virtual package names provided by this binary, from the
    /// `Provides` field.
    pub provides: Vec<String>,

    /// `Kernel-Version` field, if present -- non-empty for
    /// kernel-module-like binaries that are only valid against a
    /// specific kernel ABI.
    pub kernel_version: String,

    /// Whether this came from a `Packages` or `Installer-Packages`
    /// index.
    pub kind: PackageKind,
}

impl BinaryPackage {
    pub(super) fn parse(
        paragraph: &crate::tagfile::Paragraph,
        kind: PackageKind,
        arch: &Architecture,
    ) -> Result<Self, super::Error> {
        let name = paragraph
            .get("Package")
            .ok_or(super::Error::MissingField("Package"))?
            .to_string();
        let version = paragraph
            .get("Version")
            .ok_or(super::Error::MissingField("Version"))?
            .parse()?;

        let source = match paragraph.get("Source") {
            Some(src) => match src.find('(') {
                Some(idx) => src[..idx].trim().to_string(),
                None => src.trim().to_string(),
            },
            None => name.clone(),
        };

        let provides = paragraph
            .get("Provides")
            .map(|s| parse_name_list(s, arch))
            .transpose()?
            .unwrap_or_default();

        Ok(BinaryPackage {
            section: paragraph.get_or("Section", "").to_string(),
            maintainer: paragraph.get_or("Maintainer", "").to_string(),
            essential: matches!(paragraph.get("Essential"), Some("yes")),
            size: paragraph.get_or("Size", "0").parse().unwrap_or(0),
            installed_size: paragraph.get_or("Installed-Size", "0").parse().unwrap_or(0),
            pre_depends: Dependency::parse(paragraph.get_or("Pre-Depends", ""), arch)?,
            depends: Dependency::parse(paragraph.get_or("Depends", ""), arch)?,
            recommends: Dependency::parse(paragraph.get_or("Recommends", ""), arch)?,
            suggests: Dependency::parse(paragraph.get_or("Suggests", ""), arch)?,
            kernel_version: paragraph.get_or("Kernel-Version", "").to_string(),
            name,
            version,
            source,
            provides,
            kind,
        })
    }
}

/// A single source package record, as ingested from a `Sources`-style
/// tag file paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct SourcePackage {
    /// Source package name; the archive's key.
    pub name: String,

    /// Source package version.
    pub version: Version,

    /// `Maintainer` field, if present.
    pub maintainer: String,

    /// Parsed `Build-Depends` field.
    pub build_depends: Dependency,

    /// Parsed `Build-Depends-Indep` field.
    pub build_depends_indep: Dependency,

    /// Binary package names produced by this source, from the `Binary`
    /// field.
    pub binaries: Vec<String>,
}

impl SourcePackage {
    pub(super) fn parse(
        paragraph: &crate::tagfile::Paragraph,
        arch: &Architecture,
    ) -> Result<Self, super::Error> {
        let name = paragraph
            .get("Package")
            .ok_or(super::Error::MissingField("Package"))?
            .to_string();
        let version = paragraph
            .get("Version")
            .ok_or(super::Error::MissingField("Version"))?
            .parse()?;

        let binaries = match paragraph.get("Binary") {
            Some(s) => parse_name_list(s, arch)?,
            None => vec![name.clone()],
        };

        Ok(SourcePackage {
            maintainer: paragraph.get_or("Maintainer", "").to_string(),
            build_depends: Dependency::parse(paragraph.get_or("Build-Depends", ""), arch)?,
            build_depends_indep: Dependency::parse(
                paragraph.get_or("Build-Depends-Indep", ""),
                arch,
            )?,
            name,
            version,
            binaries,
        })
    }
}

/// Parse a simple comma-separated name list (`Provides`, `Binary`) by
/// reusing the dependency grammar and keeping only each alternative
/// group's atom names -- these fields never carry real alternation,
/// just a flat list, but the grammar for a single name with an optional
/// version/arch suffix is identical.
fn parse_name_list(s: &str, arch: &Architecture) -> Result<Vec<String>, super::Error> {
    let dep = Dependency::parse(s, arch)?;
    Ok(dep.atoms().map(|atom| atom.name.clone()).collect())
}

// vim: foldmethod=marker
