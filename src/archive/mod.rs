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

//! In-memory model of a binary/source package archive: the tables the
//! germination engine resolves dependencies against.
//!
//! An [Archive] is built by repeated [Archive::ingest] calls against
//! already-decompressed `Packages`/`Sources`-style tag file data (see
//! [crate::tagfile]); fetching and decompressing that data is the
//! caller's job. Ingesting a name that already exists replaces the
//! stored record only when the incoming version is strictly newer
//! (newer-wins); equal or older versions are ignored.

#[allow(clippy::module_inception)]
mod archive;
mod package;

pub use archive::{Archive, Error, IndexType};
pub use package::{BinaryPackage, PackageKind, SourcePackage};

// vim: foldmethod=marker
