// XML pull-cursor abstraction
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

//! Pull-style XML cursor atop [`quick_xml`].
//!
//! The reader needs two views of the document and this module provides
//!   both:
//!
//!   - a streaming [`Cursor`] that advances one node at a time,
//!       reporting the node's kind,
//!       name,
//!       attributes,
//!       and depth; and
//!   - [`Cursor::expand`],
//!       which detaches the current element and its entire subtree into
//!       an owned [`Element`] tree for recursive descent.
//!
//! The depth of an element is its number of ancestor elements,
//!   with the document root at depth 0,
//!     the numbering a DOM-backed pull reader would report.
//! Expanding an element consumes its subtree,
//!   so a subsequent [`Cursor::advance`] lands on the node following it.

mod cursor;
mod error;
mod tree;

pub use cursor::{Cursor, Node};
pub use error::{Error, InnerXmlError, ParseError};
pub use tree::{Attr, Element};

/// Result of an XML-layer operation.
pub type XmlResult<T> = std::result::Result<T, Error>;
