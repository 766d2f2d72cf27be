// ABI declaration IR and abixml reader
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

//! De-serialization of ABI instrumentation dumps into an in-memory IR.
//!
//! An _ABI instrumentation dump_ describes the compiled shape of a
//!   program's types and symbols---its
//!     translation units, namespaces, types, variables, functions,
//!     classes, and templates---serialized
//!       as an XML document.
//! This crate reconstructs that cyclic, typed declaration graph from the
//!   flat XML in a single forward pass:
//!
//!   - [`ir`] holds the declaration graph itself
//!       (see [`ir::DeclGraph`] and [`ir::Object`]);
//!   - [`xml`] provides the pull-cursor abstraction over the underlying
//!       XML parser; and
//!   - [`obj::abixml`] contains the reader proper,
//!       with entry points for single translation units,
//!       corpora,
//!       and ZIP archives of translation units.
//!
//! The writer,
//!   the compiler front-end that produces these documents,
//!   and all comparison tooling live elsewhere.

pub mod ir;
pub mod obj;
pub mod xml;
