// XML layer errors
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

//! Errors while traversing the XML document.

use std::fmt::Display;

/// Wrapped error type.
pub type InnerXmlError = quick_xml::Error;

/// Thin wrapper around [`quick_xml::Error`] to implement [`PartialEq`].
///
/// This will always yield `false`,
///   but allows us to derive the trait on types using [`Error`];
///     otherwise, this madness propagates indefinitely.
#[derive(Debug)]
pub struct ParseError(pub InnerXmlError);

impl PartialEq for ParseError {
    /// [`quick_xml::Error`] does not implement [`PartialEq`] and so this
    ///   will always yield `false`.
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

impl From<InnerXmlError> for ParseError {
    fn from(e: InnerXmlError) -> Self {
        Self(e)
    }
}

impl Display for ParseError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(fmt)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Error during XML cursor traversal.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Underlying parser failure.
    Parse(ParseError),
    /// The document ended inside an element being expanded.
    UnexpectedEof,
    /// [`expand`](super::Cursor::expand) was requested while the cursor
    ///   was not positioned on an element.
    NotAnElement,
}

impl From<InnerXmlError> for Error {
    fn from(e: InnerXmlError) -> Self {
        Self::Parse(e.into())
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(fmt),
            Self::UnexpectedEof => write!(fmt, "unexpected end of XML document"),
            Self::NotAnElement => {
                write!(fmt, "cannot expand: cursor is not at an element")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}
