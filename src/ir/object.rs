// IR node definitions
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

//! IR node variants and their cross-cutting data.
//!
//! [`Object`] is a tagged union over every declaration and type kind that
//!   can appear in an ABI dump.
//! Rather than a deep virtual hierarchy,
//!   cross-cutting attributes are factored into two payloads---[`DeclInfo`]
//!     for named declarations and [`TypeInfo`] for sized types---and
//!       exposed through accessors on [`Object`] itself
//!         ([`Object::decl`], [`Object::type_info`], [`Object::members`]).
//! A class is both:
//!   it is a scope whose members are other IR nodes,
//!   and a type with size and alignment.

use super::corpus::Location;
use super::graph::ObjectRef;
use std::ops::BitOr;

/// ELF-style symbol visibility of a declaration.
///
/// [`Visibility::None`] means the attribute was absent from the input,
///   as opposed to an explicit `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    None,
    Default,
    Hidden,
    Internal,
    Protected,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::None
    }
}

/// ELF-style symbol binding of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    None,
    Global,
    Local,
    Weak,
}

impl Default for Binding {
    fn default() -> Self {
        Self::None
    }
}

/// C++ member access specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Private,
    Protected,
    Public,
}

impl Default for Access {
    fn default() -> Self {
        Self::Private
    }
}

/// Lvalue/rvalue-ness of a reference type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Lvalue,
    Rvalue,
}

impl Default for ReferenceKind {
    fn default() -> Self {
        Self::Lvalue
    }
}

/// CV qualifier bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CvQual(u8);

impl CvQual {
    pub const NONE: CvQual = CvQual(0);
    pub const CONST: CvQual = CvQual(1 << 0);
    pub const VOLATILE: CvQual = CvQual(1 << 1);

    pub fn contains(self, qual: CvQual) -> bool {
        self.0 & qual.0 == qual.0
    }
}

impl BitOr for CvQual {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Attributes common to every named declaration.
///
/// `scope` is a back-edge to the enclosing scope node,
///   set when the declaration is attached to that scope;
///     it is non-owning
///       (the arena owns both ends).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeclInfo {
    pub name: String,
    pub mangled_name: Option<String>,
    pub location: Option<Location>,
    pub visibility: Visibility,
    pub binding: Binding,
    pub scope: Option<ObjectRef>,
}

impl DeclInfo {
    /// A declaration with only a name,
    ///   everything else unset.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Attributes common to every type.
///
/// A value of 0 means the quantity is unknown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub size_in_bits: u64,
    pub alignment_in_bits: u64,
}

impl TypeInfo {
    pub fn new(size_in_bits: u64, alignment_in_bits: u64) -> Self {
        Self {
            size_in_bits,
            alignment_in_bits,
        }
    }
}

/// The global scope of a translation unit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Scope {
    pub decl: DeclInfo,
    pub members: Vec<ObjectRef>,
}

/// A namespace and its members.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub decl: DeclInfo,
    pub members: Vec<ObjectRef>,
}

/// A fundamental (basic) type such as `int`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TypeDecl {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
}

/// A CV-qualified view of an underlying type.
#[derive(Debug, PartialEq, Eq)]
pub struct QualifiedTypeDef {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub underlying: ObjectRef,
    pub cv: CvQual,
}

/// A pointer type.
#[derive(Debug, PartialEq, Eq)]
pub struct PointerTypeDef {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub pointed_to: ObjectRef,
}

/// An lvalue or rvalue reference type.
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceTypeDef {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub referred_to: ObjectRef,
    pub kind: ReferenceKind,
}

/// A single `(name, value)` enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

/// An enum type with its underlying integer type and enumerators,
///   in declaration order.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumTypeDecl {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub underlying: ObjectRef,
    pub enumerators: Vec<Enumerator>,
}

/// A typedef.
#[derive(Debug, PartialEq, Eq)]
pub struct TypedefDecl {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub underlying: ObjectRef,
}

/// A class base specifier.
///
/// `offset_in_bits` is −1 when the base is not laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseSpec {
    pub base: ObjectRef,
    pub access: Access,
    pub offset_in_bits: i64,
    pub is_virtual: bool,
}

/// A non-static or static data member of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataMember {
    pub var: ObjectRef,
    pub access: Access,
    pub is_laid_out: bool,
    pub is_static: bool,
    pub offset_in_bits: u64,
}

/// A member function of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFunction {
    pub function: ObjectRef,
    pub access: Access,
    pub vtable_offset: u64,
    pub is_static: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_const: bool,
}

/// A member function template of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFunctionTemplate {
    pub template: ObjectRef,
    pub access: Access,
    pub is_static: bool,
    pub is_constructor: bool,
    pub is_const: bool,
}

/// A member class template of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberClassTemplate {
    pub template: ObjectRef,
    pub access: Access,
    pub is_static: bool,
}

/// A class declaration or definition.
///
/// A declaration-only class has a name and nothing else;
///   it is a placeholder allowing references to a class whose definition
///   is absent or appears later.
/// A definition carrying `definition_of` points back at the
///   declaration-only node it defines;
///     that node stays alive so references to it remain valid.
///
/// `members` holds the member types,
///   which are attached through the ordinary scope mechanism;
/// the other member kinds carry per-member attributes and so are stored
///   in their own lists.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassDecl {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub is_declaration_only: bool,
    pub definition_of: Option<ObjectRef>,
    pub bases: Vec<BaseSpec>,
    pub members: Vec<ObjectRef>,
    pub data_members: Vec<DataMember>,
    pub member_functions: Vec<MemberFunction>,
    pub member_function_templates: Vec<MemberFunctionTemplate>,
    pub member_class_templates: Vec<MemberClassTemplate>,
}

/// A function parameter.
///
/// `ty` is [`None`] only for the variadic pseudo-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: Option<ObjectRef>,
    pub name: String,
    pub location: Option<Location>,
    pub is_variadic: bool,
    pub is_artificial: bool,
}

/// A function or method type.
///
/// A method type is a function type whose `class` back-edge is set;
///   the implicit `this` parameter is not synthesized here.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FunctionType {
    pub ty: TypeInfo,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<ObjectRef>,
    pub class: Option<ObjectRef>,
}

impl FunctionType {
    pub fn is_method(&self) -> bool {
        self.class.is_some()
    }
}

/// A variable declaration.
#[derive(Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub decl: DeclInfo,
    pub ty: ObjectRef,
}

/// A function declaration.
///
/// The declaration owns its function type node;
///   a method declaration is simply a function declaration whose type is
///   a method type.
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub decl: DeclInfo,
    pub fn_type: ObjectRef,
    pub declared_inline: bool,
}

/// A function template and its parameter list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FunctionTdecl {
    pub decl: DeclInfo,
    pub parameters: Vec<ObjectRef>,
    pub pattern: Option<ObjectRef>,
}

/// A class template and its parameter list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassTdecl {
    pub decl: DeclInfo,
    pub parameters: Vec<ObjectRef>,
    pub pattern: Option<ObjectRef>,
}

/// A type template parameter
///   (`template<typename T>`).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TypeTparameter {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub index: usize,
}

/// A non-type template parameter
///   (`template<int N>`).
#[derive(Debug, PartialEq, Eq)]
pub struct NonTypeTparameter {
    pub decl: DeclInfo,
    pub index: usize,
    pub ty: ObjectRef,
}

/// A template template parameter,
///   with its own nested parameter list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TemplateTparameter {
    pub decl: DeclInfo,
    pub ty: TypeInfo,
    pub index: usize,
    pub parameters: Vec<ObjectRef>,
}

/// A pointer, reference, or qualified type composed over an earlier
///   template parameter.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TypeComposition {
    pub decl: DeclInfo,
    pub index: usize,
    pub composed: Option<ObjectRef>,
}

/// An IR node.
///
/// See the individual payload types for the semantics of each variant.
#[derive(Debug, PartialEq, Eq)]
pub enum Object {
    GlobalScope(Scope),
    Namespace(NamespaceDecl),
    Basic(TypeDecl),
    Qualified(QualifiedTypeDef),
    Pointer(PointerTypeDef),
    Reference(ReferenceTypeDef),
    Enum(EnumTypeDecl),
    Typedef(TypedefDecl),
    Class(ClassDecl),
    FnType(FunctionType),
    Var(VarDecl),
    Function(FunctionDecl),
    FnTemplate(FunctionTdecl),
    ClassTemplate(ClassTdecl),
    TypeTparam(TypeTparameter),
    NonTypeTparam(NonTypeTparameter),
    TemplateTparam(TemplateTparameter),
    TypeComposition(TypeComposition),
}

impl Object {
    /// Declaration attributes,
    ///   if this node is a declaration.
    ///
    /// Function types are the only nodes that are not declarations.
    pub fn decl(&self) -> Option<&DeclInfo> {
        match self {
            Self::GlobalScope(scope) => Some(&scope.decl),
            Self::Namespace(ns) => Some(&ns.decl),
            Self::Basic(ty) => Some(&ty.decl),
            Self::Qualified(ty) => Some(&ty.decl),
            Self::Pointer(ty) => Some(&ty.decl),
            Self::Reference(ty) => Some(&ty.decl),
            Self::Enum(ty) => Some(&ty.decl),
            Self::Typedef(ty) => Some(&ty.decl),
            Self::Class(class) => Some(&class.decl),
            Self::FnType(_) => None,
            Self::Var(var) => Some(&var.decl),
            Self::Function(f) => Some(&f.decl),
            Self::FnTemplate(t) => Some(&t.decl),
            Self::ClassTemplate(t) => Some(&t.decl),
            Self::TypeTparam(p) => Some(&p.decl),
            Self::NonTypeTparam(p) => Some(&p.decl),
            Self::TemplateTparam(p) => Some(&p.decl),
            Self::TypeComposition(p) => Some(&p.decl),
        }
    }

    pub fn decl_mut(&mut self) -> Option<&mut DeclInfo> {
        match self {
            Self::GlobalScope(scope) => Some(&mut scope.decl),
            Self::Namespace(ns) => Some(&mut ns.decl),
            Self::Basic(ty) => Some(&mut ty.decl),
            Self::Qualified(ty) => Some(&mut ty.decl),
            Self::Pointer(ty) => Some(&mut ty.decl),
            Self::Reference(ty) => Some(&mut ty.decl),
            Self::Enum(ty) => Some(&mut ty.decl),
            Self::Typedef(ty) => Some(&mut ty.decl),
            Self::Class(class) => Some(&mut class.decl),
            Self::FnType(_) => None,
            Self::Var(var) => Some(&mut var.decl),
            Self::Function(f) => Some(&mut f.decl),
            Self::FnTemplate(t) => Some(&mut t.decl),
            Self::ClassTemplate(t) => Some(&mut t.decl),
            Self::TypeTparam(p) => Some(&mut p.decl),
            Self::NonTypeTparam(p) => Some(&mut p.decl),
            Self::TemplateTparam(p) => Some(&mut p.decl),
            Self::TypeComposition(p) => Some(&mut p.decl),
        }
    }

    /// Size/alignment attributes,
    ///   if this node is a type.
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match self {
            Self::Basic(ty) => Some(&ty.ty),
            Self::Qualified(ty) => Some(&ty.ty),
            Self::Pointer(ty) => Some(&ty.ty),
            Self::Reference(ty) => Some(&ty.ty),
            Self::Enum(ty) => Some(&ty.ty),
            Self::Typedef(ty) => Some(&ty.ty),
            Self::Class(class) => Some(&class.ty),
            Self::FnType(ty) => Some(&ty.ty),
            Self::TypeTparam(p) => Some(&p.ty),
            Self::TemplateTparam(p) => Some(&p.ty),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        self.type_info().is_some()
    }

    /// Whether this node can lexically contain other declarations.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            Self::GlobalScope(_) | Self::Namespace(_) | Self::Class(_)
        )
    }

    /// Ordered member declarations,
    ///   if this node is a scope.
    pub fn members(&self) -> Option<&[ObjectRef]> {
        match self {
            Self::GlobalScope(scope) => Some(&scope.members),
            Self::Namespace(ns) => Some(&ns.members),
            Self::Class(class) => Some(&class.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<ObjectRef>> {
        match self {
            Self::GlobalScope(scope) => Some(&mut scope.members),
            Self::Namespace(ns) => Some(&mut ns.members),
            Self::Class(class) => Some(&mut class.members),
            _ => None,
        }
    }

    /// Declaration name,
    ///   if any.
    pub fn name(&self) -> Option<&str> {
        self.decl().map(|decl| decl.name.as_str())
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_fn_type(&self) -> Option<&FunctionType> {
        match self {
            Self::FnType(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_fn_type_mut(&mut self) -> Option<&mut FunctionType> {
        match self {
            Self::FnType(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_fn_template_mut(&mut self) -> Option<&mut FunctionTdecl> {
        match self {
            Self::FnTemplate(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_class_template_mut(&mut self) -> Option<&mut ClassTdecl> {
        match self {
            Self::ClassTemplate(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_template_tparam_mut(&mut self) -> Option<&mut TemplateTparameter> {
        match self {
            Self::TemplateTparam(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_type_composition_mut(&mut self) -> Option<&mut TypeComposition> {
        match self {
            Self::TypeComposition(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cv_qual_mask() {
        let cv = CvQual::CONST | CvQual::VOLATILE;

        assert!(cv.contains(CvQual::CONST));
        assert!(cv.contains(CvQual::VOLATILE));
        assert!(!CvQual::CONST.contains(CvQual::VOLATILE));
        assert_eq!(CvQual::NONE, CvQual::default());
    }

    #[test]
    fn fn_type_method_distinction() {
        let plain = FunctionType::default();
        assert!(!plain.is_method());

        let method = FunctionType {
            class: Some(ObjectRef::new(0)),
            ..Default::default()
        };
        assert!(method.is_method());
    }

    #[test]
    fn decl_accessor_covers_non_types() {
        let ns = Object::Namespace(NamespaceDecl {
            decl: DeclInfo::named("std"),
            members: vec![],
        });

        assert_eq!(Some("std"), ns.name());
        assert!(ns.is_scope());
        assert!(!ns.is_type());
        assert_eq!(Some(&[][..]), ns.members());
    }

    #[test]
    fn fn_type_is_not_a_decl() {
        let ty = Object::FnType(FunctionType::default());

        assert!(ty.decl().is_none());
        assert!(ty.is_type());
        assert!(!ty.is_scope());
    }
}
