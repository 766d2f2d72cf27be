// Detached XML subtrees
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of ABIR.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Owned element trees detached from the streaming cursor.
//!
//! The builders consume these rather than the cursor itself:
//!   expanding an element up front lets a builder iterate its children in
//!   document order,
//!     try several interpretations of a child
//!       (the polymorphic type and template-parameter builders),
//!     and recurse without coordinating with the stream.
//! Only elements are retained;
//!   text and comments carry no information in an ABI dump.
//!
//! Each element records the absolute document depth it was read at,
//!   since the reader's scope bookkeeping is driven by depth deltas.

/// A single attribute,
///   with its value already XML-unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// An element node,
///   possibly with its expanded subtree.
///
/// A cursor snapshot of a just-encountered element has no children even
///   if the document element does;
///     only [`expand`](super::Cursor::expand) populates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Element>,
    pub depth: usize,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }
}
