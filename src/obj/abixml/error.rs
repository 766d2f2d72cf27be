// abixml reader errors
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

//! Errors while processing abixml documents.
//!
//! Errors contain only owned values rather than references to original
//!   data since they represent conditions requiring termination from
//!   malformed input,
//!     and so should rarely occur.
//! This drastically simplifies the reader and [`Result`] chaining.
//!
//! The first failure aborts the current parse;
//!   no partial IR is surfaced to the caller.

use crate::xml;
use std::fmt::Display;
use std::io;

/// Result of a reader operation.
pub type AbixmlResult<T> = Result<T, AbixmlError>;

/// Thin wrapper around [`io::Error`] to implement [`PartialEq`].
///
/// This will always yield `false`,
///   but allows us to derive the trait on [`AbixmlError`].
#[derive(Debug)]
pub struct IoError(pub io::Error);

impl PartialEq for IoError {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

impl Display for IoError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(fmt)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Thin wrapper around [`zip::result::ZipError`],
///   for the same reason as [`IoError`].
#[derive(Debug)]
pub struct ZipError(pub zip::result::ZipError);

impl PartialEq for ZipError {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

impl Display for ZipError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(fmt)
    }
}

impl std::error::Error for ZipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Error during abixml processing.
#[derive(Debug, PartialEq)]
pub enum AbixmlError {
    /// XML cursor failure.
    XmlError(xml::Error),
    /// Filesystem failure opening or reading an input.
    IoError(IoError),
    /// Corpus archive failure.
    ZipError(ZipError),
    /// The root element was neither `abi-instr` nor `abi-corpus`,
    ///   whichever was expected.
    UnexpectedRoot,
    /// An element not permitted in its context.
    UnexpectedElement(String),
    /// A required attribute was missing or empty.
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// A `type-id` did not resolve in the symbol table.
    UnresolvedTypeId(String),
    /// A `type-id` resolved to a node of the wrong kind.
    WrongTypeKind {
        id: String,
        expected: &'static str,
    },
    /// An `id` was already keyed and replacement was not requested.
    DuplicateId(String),
    /// A `namespace-decl` outside the global scope or another namespace.
    MisplacedNamespace,
    /// A `class-decl` marked declaration-only while also claiming to
    ///   define a prior declaration.
    DeclarationConflict(String),
}

impl From<xml::Error> for AbixmlError {
    fn from(e: xml::Error) -> Self {
        Self::XmlError(e)
    }
}

impl From<io::Error> for AbixmlError {
    fn from(e: io::Error) -> Self {
        Self::IoError(IoError(e))
    }
}

impl From<zip::result::ZipError> for AbixmlError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ZipError(ZipError(e))
    }
}

impl Display for AbixmlError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::XmlError(e) => e.fmt(fmt),
            Self::IoError(e) => e.fmt(fmt),
            Self::ZipError(e) => e.fmt(fmt),
            Self::UnexpectedRoot => {
                write!(fmt, "unexpected root element (is this an ABI dump?)")
            }
            Self::UnexpectedElement(name) => {
                write!(fmt, "unexpected element `{}`", name)
            }
            Self::MissingAttribute { element, attribute } => {
                write!(fmt, "missing {}/@{}", element, attribute)
            }
            Self::UnresolvedTypeId(id) => {
                write!(fmt, "reference to unknown type-id `{}`", id)
            }
            Self::WrongTypeKind { id, expected } => {
                write!(fmt, "type-id `{}` does not reference a {}", id, expected)
            }
            Self::DuplicateId(id) => {
                write!(fmt, "id `{}` is already defined", id)
            }
            Self::MisplacedNamespace => write!(
                fmt,
                "namespace-decl permitted only at global or namespace scope"
            ),
            Self::DeclarationConflict(id) => write!(
                fmt,
                "class `{}` cannot be both declaration-only and a definition",
                id
            ),
        }
    }
}

impl std::error::Error for AbixmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::XmlError(e) => Some(e),
            Self::IoError(e) => Some(e),
            Self::ZipError(e) => Some(e),
            _ => None,
        }
    }
}
