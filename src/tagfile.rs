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

//! Minimal reader for the RFC2822-like "deb822" tag file format used by
//! archive index files (`Packages`, `Sources`). A file is a sequence of
//! paragraphs separated by one or more blank lines; a paragraph is a
//! sequence of `Key: Value` fields, where a field's value may continue
//! onto following lines that start with whitespace.
//!
//! This is a reader, not a validator: [Paragraph] keeps fields in
//! document order and allows duplicate keys, leaving interpretation to
//! [crate::archive].

use std::io::{BufRead, BufReader, Read};

/// A single `Key: Value` pair, with continuation lines joined and
/// leading/trailing whitespace trimmed.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Field name, exactly as written (case is significant to the
    /// caller; archive fields are conventionally `Title-Case`).
    pub key: String,

    /// Field value, with continuation-line newlines preserved and
    /// leading indentation stripped.
    pub value: String,
}

/// One paragraph's worth of [Field]s, in the order they appeared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    fields: Vec<Field>,
}

impl Paragraph {
    /// The first field matching `key`, if any. Archive index files do
    /// not repeat fields within a paragraph, so this is the common case;
    /// use [Paragraph::all] to see every occurrence.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// `get`, falling back to `default` when the field is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Every field matching `key`, in document order.
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.fields
            .iter()
            .filter(move |f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// True if the paragraph has no fields at all (an artifact of
    /// trailing blank lines; never yielded by [Reader]).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Streaming reader over a sequence of [Paragraph]s.
pub struct Reader<R> {
    lines: std::io::Lines<BufReader<R>>,
    pending: Option<String>,
}

impl<R: Read> Reader<R> {
    /// Wrap a [Read] of deb822-formatted text.
    pub fn new(reader: R) -> Self {
        Reader {
            lines: BufReader::new(reader).lines(),
            pending: None,
        }
    }

    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        self.lines.next().transpose()
    }

    /// Read the next [Paragraph], or `None` at end of input.
    pub fn next_paragraph(&mut self) -> std::io::Result<Option<Paragraph>> {
        let mut fields: Vec<Field> = Vec::new();

        loop {
            let Some(line) = self.next_line()? else {
                break;
            };

            if line.trim().is_empty() {
                if fields.is_empty() {
                    continue;
                }
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some(last) = fields.last_mut() {
                    last.value.push('\n');
                    last.value.push_str(line.trim());
                }
                continue;
            }

            if line.starts_with('#') {
                continue;
            }

            let Some(colon) = line.find(':') else {
                continue;
            };
            let key = line[..colon].trim().to_string();
            let value = line[colon + 1..].trim().to_string();
            fields.push(Field { key, value });
        }

        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Paragraph { fields }))
        }
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = std::io::Result<Paragraph>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_paragraph().transpose()
    }
}


// vim: foldmethod=marker
