// abixml documents
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

//! Native XML ABI instrumentation dumps.
//!
//! An abixml document serializes the declarations of one translation
//!   unit
//!     (root `abi-instr`)
//!   or of an ordered set of them
//!     (root `abi-corpus`);
//! a corpus may equivalently be stored as a ZIP archive with one
//!   `abi-instr` document per entry
//!     (see [`read_corpus_from_archive`]).
//!
//! The general structure of an `abi-instr` document:
//!
//! ```xml
//! <abi-instr path="examples/test.cc" address-size="8">
//!   <type-decl name="int" size-in-bits="32" alignment-in-bits="32"
//!              id="type-id-1"/>
//!   <namespace-decl name="outer">
//!     <var-decl name="count" type-id="type-id-1" mangled-name="..."
//!               visibility="default" binding="global"/>
//!   </namespace-decl>
//!   <class-decl name="C" size-in-bits="32" id="type-id-2">
//!     <data-member access="public" layout-offset-in-bits="0">
//!       <var-decl name="n" type-id="type-id-1"/>
//!     </data-member>
//!     <member-function access="public">
//!       <function-decl name="value">
//!         <return type-id="type-id-1"/>
//!       </function-decl>
//!     </member-function>
//!   </class-decl>
//! </abi-instr>
//! ```
//!
//! Types and templates carry unique `id` attributes,
//!   and every later reference to them is a `type-id` resolved through
//!   the symbol tables of the read context;
//!     declarations must therefore appear before first use,
//!       with declaration-only classes standing in for types whose
//!       definitions come later
//!         (or never).

mod archive;
mod ctx;
mod error;
mod reader;

pub use archive::{
    corpus_from_archive_file, read_corpus_from_archive, read_corpus_from_archive_file,
};
pub use error::{AbixmlError, AbixmlResult, IoError, ZipError};
pub use reader::{
    corpus_from_file, corpus_from_reader, read_corpus_from_file, read_corpus_from_reader,
    read_translation_unit_from_buffer, read_translation_unit_from_file,
    read_translation_unit_from_reader, translation_unit_from_buffer, translation_unit_from_file,
    translation_unit_from_reader,
};
