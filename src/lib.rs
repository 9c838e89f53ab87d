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

#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

//! `germinate` computes the transitive dependency closure of a set of
//! seed lists against a Debian-style binary/source archive.
//!
//! Given an [archive::Archive] built from `Packages`/`Sources`-style
//! index data, a [seed::Structure] describing how seeds inherit from one
//! another, and each seed's planted literal entries, [germinate::Germinator]
//! walks the seeds in inheritance order and grows each one's `depends`,
//! `build_depends`, `sourcepkgs` and related sets, recording for every
//! selected package which seed claimed it and why.
//!
//! Supporting modules handle the pieces the engine is built from:
//! [version] package version comparison, [dependency] dependency field
//! parsing, [architecture] architecture name handling, [topo] seed
//! inheritance ordering, and [tagfile] archive index parsing. [output]
//! renders a finished [germinate::GerminationOutput] into the list files,
//! `provides` file, `structure.dot` graph and rdepends trees consumers
//! expect.
//!
//! ```
//! use germinate::archive::{Archive, IndexType};
//! use germinate::architecture::Architecture;
//!
//! let mut archive = Archive::new();
//! archive.ingest(
//!     IndexType::Packages,
//!     "Package: hello\nVersion: 1.0-1\n".as_bytes(),
//!     &Architecture::Amd64,
//! ).unwrap();
//! assert!(archive.lookup_binary("hello").is_some());
//! ```
//!
//! # Feature Flags
//!
//! | Flag      | Description                                                    |
//! | --------- | ---------------------------------------------------------------|
//! | `full`    | Enable all optional features.                                  |
//! | `serde`   | Derive [serde::Serialize]/[serde::Deserialize] for core types.  |
//! | `config`  | Load driver configuration from TOML via [serde] and [toml].     |
//!
//! # Feature `serde`
//!
//! Enables `Serialize`/`Deserialize` derives on [version::Version],
//! [architecture::Architecture] and related types, for embedding in a
//! caller's own serialized state.
//!
//! # Feature `config`
//!
//! Enables loading the `germinate` binary's configuration from a TOML
//! file (archive paths, seed directory, target architecture, output
//! directory) instead of requiring every option on the command line.

pub mod architecture;
pub mod archive;
#[cfg(feature = "config")]
pub mod config;
pub mod dependency;
pub mod diagnostics;
pub(crate) mod errors;
pub mod germinate;
pub mod output;
pub mod seed;
pub mod tagfile;
pub mod topo;
pub mod version;

// vim: foldmethod=marker
