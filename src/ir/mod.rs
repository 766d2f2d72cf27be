// ABI declaration intermediate representation
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

//! Intermediate representation of C/C++ ABI declarations.
//!
//! The IR is a graph of [`Object`]s---declarations
//!     and types---stored
//!       in a per-translation-unit arena,
//!       the [`DeclGraph`].
//! Nodes reference one another through [`ObjectRef`] indices rather than
//!   owning pointers:
//!     a type may be referenced by many declarations and by other types,
//!       and methods refer back to their containing class,
//!       so an ownership graph would be cyclic.
//! The arena owns every node;
//!   parent→child edges
//!     (scope membership)
//!     and child→parent back-edges
//!     (the scope of a declaration, the class of a method type)
//!     are both plain indices,
//!       which keeps navigation constant-time in both directions.
//!
//! After the reader returns,
//!   the graph is treated as logically immutable by callers.

mod corpus;
mod graph;
mod object;

pub use corpus::{Corpus, Location, LocationManager, SourceLocation, TranslationUnit};
pub use graph::{DeclGraph, ObjectRef};
pub use object::{
    Access, BaseSpec, Binding, ClassDecl, ClassTdecl, CvQual, DataMember, DeclInfo, EnumTypeDecl,
    Enumerator, FunctionDecl, FunctionTdecl, FunctionType, MemberClassTemplate, MemberFunction,
    MemberFunctionTemplate, NamespaceDecl, NonTypeTparameter, Object, Parameter, PointerTypeDef,
    QualifiedTypeDef, ReferenceKind, ReferenceTypeDef, Scope, TemplateTparameter, TypeComposition,
    TypeDecl, TypeInfo, TypeTparameter, TypedefDecl, VarDecl, Visibility,
};
