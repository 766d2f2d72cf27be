// abixml document reader
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

//! De-serialization of `abi-instr` and `abi-corpus` documents.
//!
//! The reader makes a single forward pass over the document,
//!   dispatching on each element it encounters.
//! Two handler styles coexist:
//!
//!   - _streaming_ handlers
//!       (`namespace-decl` and the type definitions whose children carry
//!         no nested IR)
//!       consume the current element directly from the cursor; and
//!   - _expanding_ handlers detach the element's subtree
//!       ([`ReadContext::expand`])
//!       and descend through the `build_*` family,
//!         which can try several interpretations of a child node
//!           (see [`build_type`] and [`build_template_parameter`]).
//!
//! Both styles share the context's symbol tables and scope stack,
//!   and both must keep its depth bookkeeping honest:
//!     an expanding builder updates against the depth recorded in the
//!     subtree snapshot,
//!       except when the element was reached directly by
//!       [`ReadContext::advance`],
//!         which has already done so.
//!
//! Forward references are not permitted:
//!   every `type-id` must resolve at the moment it is used,
//!     the one exception being a class referring to its own
//!     declaration-only entry while its definition is being built
//!       (the definition is keyed only after its members are read).

use super::ctx::ReadContext;
use super::error::{AbixmlError, AbixmlResult};
use crate::ir::{
    Access, BaseSpec, Binding, ClassDecl, ClassTdecl, Corpus, CvQual, DataMember, DeclGraph,
    DeclInfo, EnumTypeDecl, Enumerator, FunctionDecl, FunctionTdecl, FunctionType, Location,
    MemberClassTemplate, MemberFunction, MemberFunctionTemplate, NamespaceDecl, NonTypeTparameter,
    Object, ObjectRef, Parameter, PointerTypeDef, QualifiedTypeDef, ReferenceKind,
    ReferenceTypeDef, TemplateTparameter, TranslationUnit, TypeComposition, TypeDecl, TypeInfo,
    TypeTparameter, TypedefDecl, VarDecl, Visibility,
};
use crate::xml::{Cursor, Element};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// <attribute readers>

/// Parse the `visibility` attribute.
///
/// An absent attribute yields [`Visibility::None`];
///   an unrecognized value falls back to [`Visibility::Default`].
fn read_visibility(node: &Element) -> Visibility {
    match node.attr("visibility") {
        None => Visibility::None,
        Some("default") => Visibility::Default,
        Some("hidden") => Visibility::Hidden,
        Some("internal") => Visibility::Internal,
        Some("protected") => Visibility::Protected,
        Some(_) => Visibility::Default,
    }
}

/// Parse the `binding` attribute.
///
/// An absent attribute yields [`Binding::None`];
///   an unrecognized value falls back to [`Binding::Global`].
fn read_binding(node: &Element) -> Binding {
    match node.attr("binding") {
        None => Binding::None,
        Some("global") => Binding::Global,
        Some("local") => Binding::Local,
        Some("weak") => Binding::Weak,
        Some(_) => Binding::Global,
    }
}

/// Parse the `access` attribute,
///   defaulting to private whether absent or unrecognized.
fn read_access(node: &Element) -> Access {
    match node.attr("access") {
        Some("protected") => Access::Protected,
        Some("public") => Access::Public,
        _ => Access::Private,
    }
}

/// Parse `size-in-bits` and `alignment-in-bits`,
///   each 0 when absent or malformed.
fn read_size_and_alignment(node: &Element) -> (u64, u64) {
    (
        read_num(node, "size-in-bits"),
        read_num(node, "alignment-in-bits"),
    )
}

/// Parse a decimal attribute,
///   0 when absent or malformed.
fn read_num(node: &Element, attr: &str) -> u64 {
    node.attr(attr)
        .map(|value| value.parse().unwrap_or(0))
        .unwrap_or(0)
}

fn read_static(node: &Element) -> bool {
    node.attr("static") == Some("yes")
}

/// Parse `layout-offset-in-bits`;
///   presence of the attribute is itself significant
///     (it marks a member as laid out).
fn read_offset_in_bits(node: &Element) -> Option<u64> {
    node.attr("layout-offset-in-bits")
        .map(|value| value.parse().unwrap_or(0))
}

/// Parse the `constructor`, `destructor`, and `const` attributes.
///
/// These share one parse:
///   whichever of the three appears first on the element wins,
///   and the others are left `false`.
fn read_cdtor_const(node: &Element) -> (bool, bool, bool) {
    if let Some(value) = node.attr("constructor") {
        return (value == "yes", false, false);
    }

    if let Some(value) = node.attr("destructor") {
        return (false, value == "yes", false);
    }

    if let Some(value) = node.attr("const") {
        return (false, false, value == "yes");
    }

    (false, false, false)
}

fn read_is_declaration_only(node: &Element) -> bool {
    node.attr("is-declaration-only") == Some("yes")
}

fn read_is_virtual(node: &Element) -> bool {
    node.attr("is-virtual") == Some("yes")
}

/// Parse location attributes from an expanded subtree node.
///
/// A missing or empty `filepath` yields no location;
///   `line` and `column` individually default to 0.
fn read_location(tu: &mut TranslationUnit, node: &Element) -> Option<Location> {
    let file = node.attr("filepath")?.to_owned();
    if file.is_empty() {
        return None;
    }

    let line = read_num(node, "line") as u32;
    let column = read_num(node, "column") as u32;

    Some(tu.locations_mut().create_new_location(file, line, column))
}

/// Parse location attributes from an element consumed as a streaming
///   event.
///
/// Stricter than [`read_location`]:
///   a location whose `line` or `column` is missing is rejected.
fn read_cursor_location(tu: &mut TranslationUnit, node: &Element) -> Option<Location> {
    let file = node.attr("filepath")?.to_owned();
    let line = node.attr("line")?.parse().unwrap_or(0);
    let column = node.attr("column")?.parse().unwrap_or(0);

    Some(tu.locations_mut().create_new_location(file, line, column))
}

// </attribute readers>

// <build an IR node from an expanded subtree node>
//
// Each builder returns Ok(None) iff the node's tag is not the kind it
// builds; the polymorphic build_type and build_template_parameter rely
// on this to try alternatives in a fixed order.  Everything else that
// goes wrong is a hard error.

/// Build a [`Parameter`] from a `parameter` node.
///
/// Errors
/// ======
/// - [`AbixmlError::UnresolvedTypeId`] if the parameter is not variadic
///   and its `type-id` does not resolve.
fn build_function_parameter<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<Option<Parameter>> {
    if node.name() != "parameter" {
        return Ok(None);
    }

    let is_variadic = node.attr("is-variadic") == Some("yes");
    let is_artificial = node.attr("is-artificial") == Some("yes");

    let type_id = node.attr("type-id").unwrap_or("");
    let ty = ctxt.get_type(type_id);
    if ty.is_none() && !is_variadic {
        return Err(AbixmlError::UnresolvedTypeId(type_id.into()));
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_location(tu, node);

    Ok(Some(Parameter {
        ty,
        name,
        location,
        is_variadic,
        is_artificial,
    }))
}

/// Build a function declaration from a `function-decl` node.
///
/// When `as_method_of` names a class,
///   the node is read as a method declaration:
///     the resulting function type is a method type carrying that class.
/// `size-in-bits`/`alignment-in-bits` describe the function _type_.
fn build_function_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    as_method_of: Option<ObjectRef>,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "function-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let mangled_name = node.attr("mangled-name").map(str::to_owned);
    let declared_inline = node.attr("declared-inline") == Some("yes");
    let visibility = read_visibility(node);
    let binding = read_binding(node);
    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);
    let location = read_location(tu, node);

    let fn_type = tu.graph_mut().add(Object::FnType(FunctionType {
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
        parameters: Vec::new(),
        return_type: None,
        class: as_method_of,
    }));

    let fn_decl = tu.graph_mut().add(Object::Function(FunctionDecl {
        decl: DeclInfo {
            name,
            mangled_name,
            location,
            visibility,
            binding,
            scope: None,
        },
        fn_type,
        declared_inline,
    }));

    ctxt.push_decl_to_scope_at(
        tu.graph_mut(),
        fn_decl,
        node,
        update_depth_info,
        add_to_current_scope,
    );

    let mut parameters = Vec::new();
    let mut return_type = None;

    for child in node.children() {
        match child.name() {
            "parameter" => {
                if let Some(param) = build_function_parameter(ctxt, tu, child)? {
                    parameters.push(param);
                }
            }

            "return" => {
                if let Some(type_id) = child.attr("type-id") {
                    if !type_id.is_empty() {
                        return_type = Some(ctxt.get_type(type_id).ok_or_else(|| {
                            AbixmlError::UnresolvedTypeId(type_id.into())
                        })?);
                    }
                }
            }

            _ => (),
        }
    }

    if let Some(ty) = tu.graph_mut()[fn_type].as_fn_type_mut() {
        ty.parameters = parameters;
        ty.return_type = return_type;
    }

    Ok(Some(fn_decl))
}

/// Build a variable declaration from a `var-decl` node.
fn build_var_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "var-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();

    let type_id = node.attr("type-id").unwrap_or("");
    let ty = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let mangled_name = node.attr("mangled-name").map(str::to_owned);
    let visibility = read_visibility(node);
    let binding = read_binding(node);
    let location = read_location(tu, node);

    let var = tu.graph_mut().add(Object::Var(VarDecl {
        decl: DeclInfo {
            name,
            mangled_name,
            location,
            visibility,
            binding,
            scope: None,
        },
        ty,
    }));

    ctxt.push_decl_to_scope_at(
        tu.graph_mut(),
        var,
        node,
        update_depth_info,
        add_to_current_scope,
    );

    Ok(Some(var))
}

/// Build a fundamental type from a `type-decl` node.
fn build_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "type-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();

    let id = node.attr("id").unwrap_or("");
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);
    let location = read_location(tu, node);

    let decl = tu.graph_mut().add(Object::Basic(TypeDecl {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build a qualified type from a `qualified-type-def` node.
fn build_qualified_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "qualified-type-def" {
        return Ok(None);
    }

    let type_id = node.attr("type-id").unwrap_or("");
    let underlying = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let id = require_id(node, "qualified-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let cv = read_cv(node);
    let location = read_location(tu, node);

    let decl = tu.graph_mut().add(Object::Qualified(QualifiedTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        underlying,
        cv,
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build a pointer type from a `pointer-type-def` node.
fn build_pointer_type_def<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "pointer-type-def" {
        return Ok(None);
    }

    let type_id = node.attr("type-id").unwrap_or("");
    let pointed_to = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);

    let id = require_id(node, "pointer-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_location(tu, node);

    let decl = tu.graph_mut().add(Object::Pointer(PointerTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
        pointed_to,
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build a reference type from a `reference-type-def` node.
fn build_reference_type_def<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "reference-type-def" {
        return Ok(None);
    }

    let kind = read_reference_kind(node);

    let type_id = node.attr("type-id").unwrap_or("");
    let referred_to = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);

    let id = require_id(node, "reference-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_location(tu, node);

    let decl = tu.graph_mut().add(Object::Reference(ReferenceTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
        referred_to,
        kind,
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build an enum type from an `enum-decl` node.
///
/// Children are a single `underlying-type` carrying the integer type and
///   any number of `enumerator` elements.
fn build_enum_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "enum-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_location(tu, node);

    let id = require_id(node, "enum-decl")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let mut base_type_id = "";
    let mut enumerators = Vec::new();

    for child in node.children() {
        match child.name() {
            "underlying-type" => {
                if let Some(type_id) = child.attr("type-id") {
                    base_type_id = type_id;
                }
            }

            "enumerator" => {
                enumerators.push(Enumerator {
                    name: child.attr("name").unwrap_or("").to_owned(),
                    value: child
                        .attr("value")
                        .map(|value| value.parse().unwrap_or(0))
                        .unwrap_or(0),
                });
            }

            _ => (),
        }
    }

    let underlying = ctxt
        .get_type(base_type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(base_type_id.into()))?;

    let decl = tu.graph_mut().add(Object::Enum(EnumTypeDecl {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        underlying,
        enumerators,
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build a typedef from a `typedef-decl` node.
fn build_typedef_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "typedef-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();

    let type_id = node.attr("type-id").unwrap_or("");
    let underlying = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let id = require_id(node, "typedef-decl")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_location(tu, node);

    let decl = tu.graph_mut().add(Object::Typedef(TypedefDecl {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        underlying,
    }));

    ctxt.push_and_key_type_at(
        tu.graph_mut(),
        decl,
        id,
        node,
        update_depth_info,
        add_to_current_scope,
    )?;

    Ok(Some(decl))
}

/// Build a class from a `class-decl` node.
///
/// A declaration-only class is created with its name alone and no
///   children are read.
/// Otherwise the children are read in document order,
///   with member types attaching themselves through the scope
///   mechanism and every other member kind appended explicitly with its
///   wrapper's attributes.
///
/// The class is keyed only after its members have been built,
///   so self-referential members resolve against a pre-existing
///   declaration-only entry for the same id.
/// A definition then _replaces_ that entry;
///   the declaration-only node stays alive behind
///   [`ClassDecl::definition_of`] so prior references remain valid.
fn build_class_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "class-decl" {
        return Ok(None);
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);
    let visibility = read_visibility(node);
    let id = node.attr("id").unwrap_or("").to_owned();

    // Seeing an already-keyed id is only permitted when the prior entry
    // is a declaration-only class awaiting this definition.
    if !id.is_empty() {
        if let Some(prior) = ctxt.get_type(&id) {
            let decl_only = tu.graph()[prior]
                .as_class()
                .map(|class| class.is_declaration_only)
                .unwrap_or(false);

            if !decl_only {
                return Err(AbixmlError::DuplicateId(id));
            }
        }
    }

    let location = read_location(tu, node);
    let is_decl_only = read_is_declaration_only(node);

    let mut definition_of = None;
    if let Some(def_id) = node.attr("def-of-decl-id") {
        if !def_id.is_empty() {
            if let Some(d) = ctxt.get_type(def_id) {
                let decl_only = tu.graph()[d]
                    .as_class()
                    .map(|class| class.is_declaration_only)
                    .unwrap_or(false);

                if decl_only {
                    definition_of = Some(d);
                }
            }
        }
    }

    if is_decl_only && definition_of.is_some() {
        return Err(AbixmlError::DeclarationConflict(id));
    }

    let class = if is_decl_only {
        tu.graph_mut().add(Object::Class(ClassDecl {
            decl: DeclInfo::named(name),
            is_declaration_only: true,
            ..Default::default()
        }))
    } else {
        tu.graph_mut().add(Object::Class(ClassDecl {
            decl: DeclInfo {
                name,
                location,
                visibility,
                ..Default::default()
            },
            ty: TypeInfo::new(size_in_bits, alignment_in_bits),
            definition_of,
            ..Default::default()
        }))
    };

    ctxt.push_decl_to_scope_at(
        tu.graph_mut(),
        class,
        node,
        update_depth_info,
        add_to_current_scope,
    );

    if !is_decl_only {
        for child in node.children() {
            match child.name() {
                "base-class" => {
                    let access = read_access(child);

                    let type_id = child.attr("type-id").unwrap_or("");
                    let base = ctxt
                        .get_type(type_id)
                        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

                    if tu.graph()[base].as_class().is_none() {
                        return Err(AbixmlError::WrongTypeKind {
                            id: type_id.into(),
                            expected: "class",
                        });
                    }

                    let offset_in_bits = read_offset_in_bits(child)
                        .map(|offset| offset as i64)
                        .unwrap_or(-1);
                    let is_virtual = read_is_virtual(child);

                    if let Some(c) = tu.graph_mut()[class].as_class_mut() {
                        c.bases.push(BaseSpec {
                            base,
                            access,
                            offset_in_bits,
                            is_virtual,
                        });
                    }
                }

                "member-type" => {
                    for grandchild in child.children() {
                        // The built type attaches itself to the class
                        // through the scope mechanism; no explicit add.
                        build_type(ctxt, tu, grandchild, true, true)?;
                    }
                }

                "data-member" => {
                    let access = read_access(child);
                    let offset = read_offset_in_bits(child);
                    let is_laid_out = offset.is_some();
                    let offset_in_bits = offset.unwrap_or(0);
                    let is_static = read_static(child);

                    for grandchild in child.children() {
                        if let Some(var) = build_var_decl(ctxt, tu, grandchild, true, false)? {
                            member_of(tu.graph_mut(), var, class);

                            if let Some(c) = tu.graph_mut()[class].as_class_mut() {
                                c.data_members.push(DataMember {
                                    var,
                                    access,
                                    is_laid_out,
                                    is_static,
                                    offset_in_bits,
                                });
                            }
                        }
                    }
                }

                "member-function" => {
                    let access = read_access(child);
                    let vtable_offset = read_num(child, "vtable-offset");
                    let is_static = read_static(child);
                    let (is_constructor, is_destructor, is_const) = read_cdtor_const(child);

                    for grandchild in child.children() {
                        if let Some(function) =
                            build_function_decl(ctxt, tu, grandchild, Some(class), true, false)?
                        {
                            member_of(tu.graph_mut(), function, class);

                            if let Some(c) = tu.graph_mut()[class].as_class_mut() {
                                c.member_functions.push(MemberFunction {
                                    function,
                                    access,
                                    vtable_offset,
                                    is_static,
                                    is_constructor,
                                    is_destructor,
                                    is_const,
                                });
                            }
                        }
                    }
                }

                "member-template" => {
                    let access = read_access(child);
                    let is_static = read_static(child);
                    let (is_constructor, _, is_const) = read_cdtor_const(child);

                    for grandchild in child.children() {
                        if let Some(template) =
                            build_function_tdecl(ctxt, tu, grandchild, true, false)?
                        {
                            member_of(tu.graph_mut(), template, class);

                            if let Some(c) = tu.graph_mut()[class].as_class_mut() {
                                c.member_function_templates.push(MemberFunctionTemplate {
                                    template,
                                    access,
                                    is_static,
                                    is_constructor,
                                    is_const,
                                });
                            }
                        } else if let Some(template) =
                            build_class_tdecl(ctxt, tu, grandchild, true, false)?
                        {
                            member_of(tu.graph_mut(), template, class);

                            if let Some(c) = tu.graph_mut()[class].as_class_mut() {
                                c.member_class_templates.push(MemberClassTemplate {
                                    template,
                                    access,
                                    is_static,
                                });
                            }
                        }
                    }
                }

                _ => (),
            }
        }
    }

    if !id.is_empty() {
        if ctxt.get_type(&id).is_none() {
            ctxt.key_type(&id, class)?;
        } else if !is_decl_only {
            // The prior entry is the declaration-only class verified
            // above; the definition takes over its id.  (A repeated
            // declaration-only class keeps the original entry.)
            ctxt.key_replacement_of_type(&id, class);
        }
    }

    Ok(Some(class))
}

/// Record `class` as the scope of an explicitly appended member.
///
/// Members appended through the wrapper elements are built without
///   scope attachment
///     (their per-member attributes live on the wrapper),
///   but their scope back-reference must still point at the class for
///   the depth bookkeeping to recognize them as class members.
fn member_of(graph: &mut DeclGraph, member: ObjectRef, class: ObjectRef) {
    if let Some(info) = graph[member].decl_mut() {
        info.scope = Some(class);
    }
}

/// Build a function template from a `function-template-decl` node.
///
/// Children are template parameters
///   (indexed in order of appearance)
///   and the single `function-decl` pattern.
fn build_function_tdecl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "function-template-decl" {
        return Ok(None);
    }

    let id = require_id(node, "function-template-decl")?;
    if ctxt.get_fn_template(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_location(tu, node);
    let visibility = read_visibility(node);
    let binding = read_binding(node);

    let tdecl = tu.graph_mut().add(Object::FnTemplate(FunctionTdecl {
        decl: DeclInfo {
            location,
            visibility,
            binding,
            ..Default::default()
        },
        parameters: Vec::new(),
        pattern: None,
    }));

    ctxt.push_decl_to_scope_at(
        tu.graph_mut(),
        tdecl,
        node,
        update_depth_info,
        add_to_current_scope,
    );

    let mut parm_index = 0;
    for child in node.children() {
        if let Some(parm) = build_template_parameter(ctxt, tu, child, parm_index, true)? {
            if let Some(t) = tu.graph_mut()[tdecl].as_fn_template_mut() {
                t.parameters.push(parm);
            }

            parm_index += 1;
        } else if let Some(pattern) = build_function_decl(ctxt, tu, child, None, true, true)? {
            if let Some(t) = tu.graph_mut()[tdecl].as_fn_template_mut() {
                t.pattern = Some(pattern);
            }
        }
    }

    ctxt.key_fn_template(id, tdecl)?;

    Ok(Some(tdecl))
}

/// Build a class template from a `class-template-decl` node.
fn build_class_tdecl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "class-template-decl" {
        return Ok(None);
    }

    let id = require_id(node, "class-template-decl")?;
    if ctxt.get_class_template(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_location(tu, node);
    let visibility = read_visibility(node);

    let tdecl = tu.graph_mut().add(Object::ClassTemplate(ClassTdecl {
        decl: DeclInfo {
            location,
            visibility,
            ..Default::default()
        },
        parameters: Vec::new(),
        pattern: None,
    }));

    ctxt.push_decl_to_scope_at(
        tu.graph_mut(),
        tdecl,
        node,
        update_depth_info,
        add_to_current_scope,
    );

    let mut parm_index = 0;
    for child in node.children() {
        if let Some(parm) = build_template_parameter(ctxt, tu, child, parm_index, true)? {
            if let Some(t) = tu.graph_mut()[tdecl].as_class_template_mut() {
                t.parameters.push(parm);
            }

            parm_index += 1;
        } else if let Some(pattern) =
            build_class_decl(ctxt, tu, child, true, add_to_current_scope)?
        {
            if let Some(t) = tu.graph_mut()[tdecl].as_class_template_mut() {
                t.pattern = Some(pattern);
            }
        }
    }

    ctxt.key_class_template(id, tdecl)?;

    Ok(Some(tdecl))
}

/// Build a type template parameter from a `template-type-parameter`
///   node.
///
/// A parameter with an `id` is keyed in the type table so later
///   parameters and the pattern can reference it;
///     one without is pushed but not keyed.
fn build_type_tparameter<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    index: usize,
    update_depth_info: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "template-type-parameter" {
        return Ok(None);
    }

    let id = node.attr("id").unwrap_or("");
    if !id.is_empty() && ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    if let Some(type_id) = node.attr("type-id") {
        if !type_id.is_empty() {
            let prior = ctxt
                .get_type(type_id)
                .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

            if !matches!(tu.graph()[prior], Object::TypeTparam(_)) {
                return Err(AbixmlError::WrongTypeKind {
                    id: type_id.into(),
                    expected: "template type parameter",
                });
            }
        }
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_location(tu, node);

    let parm = tu.graph_mut().add(Object::TypeTparam(TypeTparameter {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        index,
    }));

    if id.is_empty() {
        ctxt.push_decl_to_scope_at(tu.graph_mut(), parm, node, update_depth_info, true);
    } else {
        ctxt.push_and_key_type_at(tu.graph_mut(), parm, id, node, update_depth_info, true)?;
    }

    Ok(Some(parm))
}

/// Build a type composition from a
///   `template-parameter-type-composition` node.
///
/// The composed type is the first pointer, reference, or qualified
///   child to build,
///     tried in that order.
fn build_type_composition<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    index: usize,
    update_depth_info: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "template-parameter-type-composition" {
        return Ok(None);
    }

    let comp = tu.graph_mut().add(Object::TypeComposition(TypeComposition {
        decl: DeclInfo::default(),
        index,
        composed: None,
    }));

    ctxt.push_decl_to_scope_at(tu.graph_mut(), comp, node, update_depth_info, true);

    for child in node.children() {
        let composed = match build_pointer_type_def(ctxt, tu, child, true, true)? {
            Some(ty) => Some(ty),
            None => match build_reference_type_def(ctxt, tu, child, true, true)? {
                Some(ty) => Some(ty),
                None => build_qualified_type_decl(ctxt, tu, child, true, true)?,
            },
        };

        if let Some(ty) = composed {
            if let Some(c) = tu.graph_mut()[comp].as_type_composition_mut() {
                c.composed = Some(ty);
            }

            break;
        }
    }

    Ok(Some(comp))
}

/// Build a non-type template parameter from a
///   `template-non-type-parameter` node.
fn build_non_type_tparameter<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    index: usize,
    update_depth_info: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "template-non-type-parameter" {
        return Ok(None);
    }

    let type_id = node.attr("type-id").unwrap_or("");
    let ty = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_location(tu, node);

    let parm = tu
        .graph_mut()
        .add(Object::NonTypeTparam(NonTypeTparameter {
            decl: DeclInfo {
                name,
                location,
                ..Default::default()
            },
            index,
            ty,
        }));

    ctxt.push_decl_to_scope_at(tu.graph_mut(), parm, node, update_depth_info, true);

    Ok(Some(parm))
}

/// Build a template template parameter from a
///   `template-template-parameter` node,
///     recursing over its own nested parameter list.
fn build_template_tparameter<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    index: usize,
    update_depth_info: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if node.name() != "template-template-parameter" {
        return Ok(None);
    }

    let id = require_id(node, "template-template-parameter")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    if let Some(type_id) = node.attr("type-id") {
        if !type_id.is_empty() {
            let prior = ctxt
                .get_type(type_id)
                .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

            if !matches!(tu.graph()[prior], Object::TemplateTparam(_)) {
                return Err(AbixmlError::WrongTypeKind {
                    id: type_id.into(),
                    expected: "template template parameter",
                });
            }
        }
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_location(tu, node);

    let parm = tu
        .graph_mut()
        .add(Object::TemplateTparam(TemplateTparameter {
            decl: DeclInfo {
                name,
                location,
                ..Default::default()
            },
            ty: TypeInfo::default(),
            index,
            parameters: Vec::new(),
        }));

    ctxt.push_decl_to_scope_at(tu.graph_mut(), parm, node, update_depth_info, true);

    let mut parm_index = 0;
    for child in node.children() {
        if let Some(nested) = build_template_parameter(ctxt, tu, child, parm_index, true)? {
            if let Some(t) = tu.graph_mut()[parm].as_template_tparam_mut() {
                t.parameters.push(nested);
            }

            parm_index += 1;
        }
    }

    ctxt.key_type(id, parm)?;

    Ok(Some(parm))
}

/// Build a template parameter of whichever kind matches `node`.
///
/// Tries,
///   in order:
///     type parameter,
///     non-type parameter,
///     template template parameter,
///     type composition.
fn build_template_parameter<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    index: usize,
    update_depth_info: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if let Some(parm) = build_type_tparameter(ctxt, tu, node, index, update_depth_info)? {
        return Ok(Some(parm));
    }

    if let Some(parm) = build_non_type_tparameter(ctxt, tu, node, index, update_depth_info)? {
        return Ok(Some(parm));
    }

    if let Some(parm) = build_template_tparameter(ctxt, tu, node, index, update_depth_info)? {
        return Ok(Some(parm));
    }

    build_type_composition(ctxt, tu, node, index, update_depth_info)
}

/// Build a type of whichever kind matches `node`.
///
/// Tries,
///   in order:
///     basic,
///     qualified,
///     pointer,
///     reference,
///     enum,
///     typedef,
///     class.
/// First non-[`None`] wins.
fn build_type<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
    update_depth_info: bool,
    add_to_current_scope: bool,
) -> AbixmlResult<Option<ObjectRef>> {
    if let Some(ty) = build_type_decl(ctxt, tu, node, update_depth_info, add_to_current_scope)? {
        return Ok(Some(ty));
    }

    if let Some(ty) =
        build_qualified_type_decl(ctxt, tu, node, update_depth_info, add_to_current_scope)?
    {
        return Ok(Some(ty));
    }

    if let Some(ty) =
        build_pointer_type_def(ctxt, tu, node, update_depth_info, add_to_current_scope)?
    {
        return Ok(Some(ty));
    }

    if let Some(ty) =
        build_reference_type_def(ctxt, tu, node, update_depth_info, add_to_current_scope)?
    {
        return Ok(Some(ty));
    }

    if let Some(ty) =
        build_enum_type_decl(ctxt, tu, node, update_depth_info, add_to_current_scope)?
    {
        return Ok(Some(ty));
    }

    if let Some(ty) = build_typedef_decl(ctxt, tu, node, update_depth_info, add_to_current_scope)?
    {
        return Ok(Some(ty));
    }

    build_class_decl(ctxt, tu, node, update_depth_info, add_to_current_scope)
}

// </build an IR node from an expanded subtree node>

/// Require a non-empty `id` attribute.
fn require_id<'a>(node: &'a Element, element: &'static str) -> AbixmlResult<&'a str> {
    match node.attr("id") {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(AbixmlError::MissingAttribute {
            element,
            attribute: "id",
        }),
    }
}

/// Parse the `const`/`volatile` attribute pair into a CV mask.
fn read_cv(node: &Element) -> CvQual {
    let mut cv = CvQual::NONE;

    if node.attr("const") == Some("yes") {
        cv = cv | CvQual::CONST;
    }

    if node.attr("volatile") == Some("yes") {
        cv = cv | CvQual::VOLATILE;
    }

    cv
}

/// Parse the `kind` attribute of a reference type,
///   defaulting to lvalue.
fn read_reference_kind(node: &Element) -> ReferenceKind {
    match node.attr("kind") {
        Some("rvalue") => ReferenceKind::Rvalue,
        _ => ReferenceKind::Lvalue,
    }
}

// <element handlers>

/// Dispatch on the element the cursor is positioned on.
///
/// Errors
/// ======
/// - [`AbixmlError::UnexpectedElement`] for a tag not permitted at this
///   level.
/// - Whatever the dispatched handler produces.
fn handle_element<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = match ctxt.current_element() {
        Some(element) => element.clone(),
        None => return Ok(()),
    };

    match node.name() {
        "namespace-decl" => handle_namespace_decl(ctxt, tu, &node),
        "type-decl" => handle_type_decl(ctxt, tu),
        "qualified-type-def" => handle_qualified_type_decl(ctxt, tu, &node),
        "pointer-type-def" => handle_pointer_type_def(ctxt, tu, &node),
        "reference-type-def" => handle_reference_type_def(ctxt, tu, &node),
        "enum-decl" => handle_enum_type_decl(ctxt, tu),
        "typedef-decl" => handle_typedef_decl(ctxt, tu, &node),
        "var-decl" => handle_var_decl(ctxt, tu),
        "function-decl" => handle_function_decl(ctxt, tu),
        "class-decl" => handle_class_decl(ctxt, tu),
        "function-template-decl" => handle_function_tdecl(ctxt, tu),
        "class-template-decl" => handle_class_tdecl(ctxt, tu),
        name => Err(AbixmlError::UnexpectedElement(name.into())),
    }
}

/// Parse a `namespace-decl` element as a streaming event.
///
/// The namespace is pushed as the current scope;
///   its children are handled by subsequent dispatches and the depth
///   protocol pops it when its subtree ends.
fn handle_namespace_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<()> {
    // A namespace can only appear at global scope or within another
    // namespace.
    let scope_ok = match ctxt.current_scope(tu.graph()) {
        Some(scope) => matches!(
            tu.graph()[scope],
            Object::GlobalScope(_) | Object::Namespace(_)
        ),
        None => false,
    };

    if !scope_ok {
        return Err(AbixmlError::MisplacedNamespace);
    }

    let name = node.attr("name").unwrap_or("").to_owned();
    let location = read_cursor_location(tu, node);

    let ns = tu.graph_mut().add(Object::Namespace(NamespaceDecl {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        members: Vec::new(),
    }));

    ctxt.push_decl_to_scope(tu.graph_mut(), ns, true);

    Ok(())
}

/// Parse a `qualified-type-def` element as a streaming event.
fn handle_qualified_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<()> {
    let type_id = node.attr("type-id").unwrap_or("");
    let underlying = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let id = require_id(node, "qualified-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let cv = read_cv(node);
    let location = read_cursor_location(tu, node);

    let decl = tu.graph_mut().add(Object::Qualified(QualifiedTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        underlying,
        cv,
    }));

    ctxt.push_and_key_type(tu.graph_mut(), decl, id, true)
}

/// Parse a `pointer-type-def` element as a streaming event.
fn handle_pointer_type_def<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<()> {
    let type_id = node.attr("type-id").unwrap_or("");
    let pointed_to = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);

    let id = require_id(node, "pointer-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_cursor_location(tu, node);

    let decl = tu.graph_mut().add(Object::Pointer(PointerTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
        pointed_to,
    }));

    ctxt.push_and_key_type(tu.graph_mut(), decl, id, true)
}

/// Parse a `reference-type-def` element as a streaming event.
fn handle_reference_type_def<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<()> {
    let kind = read_reference_kind(node);

    let type_id = node.attr("type-id").unwrap_or("");
    let referred_to = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let (size_in_bits, alignment_in_bits) = read_size_and_alignment(node);

    let id = require_id(node, "reference-type-def")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_cursor_location(tu, node);

    let decl = tu.graph_mut().add(Object::Reference(ReferenceTypeDef {
        decl: DeclInfo {
            location,
            ..Default::default()
        },
        ty: TypeInfo::new(size_in_bits, alignment_in_bits),
        referred_to,
        kind,
    }));

    ctxt.push_and_key_type(tu.graph_mut(), decl, id, true)
}

/// Parse a `typedef-decl` element as a streaming event.
fn handle_typedef_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
    node: &Element,
) -> AbixmlResult<()> {
    let name = node.attr("name").unwrap_or("").to_owned();

    let type_id = node.attr("type-id").unwrap_or("");
    let underlying = ctxt
        .get_type(type_id)
        .ok_or_else(|| AbixmlError::UnresolvedTypeId(type_id.into()))?;

    let id = require_id(node, "typedef-decl")?;
    if ctxt.get_type(id).is_some() {
        return Err(AbixmlError::DuplicateId(id.into()));
    }

    let location = read_cursor_location(tu, node);

    let decl = tu.graph_mut().add(Object::Typedef(TypedefDecl {
        decl: DeclInfo {
            name,
            location,
            ..Default::default()
        },
        ty: TypeInfo::default(),
        underlying,
    }));

    ctxt.push_and_key_type(tu.graph_mut(), decl, id, true)
}

/// Expand a `type-decl` element and build from its subtree.
fn handle_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_type_decl(ctxt, tu, &node, false, true)?,
        &node,
    )
}

/// Expand an `enum-decl` element and build from its subtree.
fn handle_enum_type_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_enum_type_decl(ctxt, tu, &node, false, true)?,
        &node,
    )
}

/// Expand a `var-decl` element and build from its subtree.
fn handle_var_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(build_var_decl(ctxt, tu, &node, false, true)?, &node)
}

/// Expand a `function-decl` element and build from its subtree.
fn handle_function_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_function_decl(ctxt, tu, &node, None, false, true)?,
        &node,
    )
}

/// Expand a `class-decl` element and build from its subtree.
fn handle_class_decl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_class_decl(ctxt, tu, &node, false, true)?,
        &node,
    )
}

/// Expand a `function-template-decl` element and build from its
///   subtree.
fn handle_function_tdecl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_function_tdecl(ctxt, tu, &node, false, true)?,
        &node,
    )
}

/// Expand a `class-template-decl` element and build from its subtree.
fn handle_class_tdecl<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let node = ctxt.expand()?;

    built(
        build_class_tdecl(ctxt, tu, &node, false, true)?,
        &node,
    )
}

/// Convert a builder's verdict into a handler result.
fn built(result: Option<ObjectRef>, node: &Element) -> AbixmlResult<()> {
    match result {
        Some(_) => Ok(()),
        None => Err(AbixmlError::UnexpectedElement(node.name().into())),
    }
}

// </element handlers>

/// Parse an `abi-instr` document from the context's cursor into `tu`.
///
/// Returns `Ok(false)` when the document is exhausted before any
///   element is found,
///     which the corpus reader uses as its termination signal.
///
/// Errors
/// ======
/// - [`AbixmlError::UnexpectedRoot`] if the first element is not
///   `abi-instr`.
/// - Any error from the dispatched handlers.
pub(super) fn read_translation_unit_from_input<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    tu: &mut TranslationUnit,
) -> AbixmlResult<bool> {
    // The document must start with the abi-instr element.
    let root = loop {
        if let Some(element) = ctxt.current_element() {
            break element.clone();
        }

        if !ctxt.advance(tu.graph())? {
            return Ok(false);
        }
    };

    if root.name() != "abi-instr" {
        return Err(AbixmlError::UnexpectedRoot);
    }

    // Ids are unique per translation unit.
    ctxt.clear_type_map();

    if let Some(size) = root.attr("address-size") {
        tu.set_address_size(size.parse().unwrap_or(0));
    }

    if let Some(path) = root.attr("path") {
        tu.set_path(path);
    }

    // We are at global scope, having just seen the top-most abi-instr
    // element.
    ctxt.push_decl(tu.global_scope());

    loop {
        if !ctxt.advance(tu.graph())? {
            break;
        }

        // The scope stack emptying means we have moved past this
        // translation unit (to a sibling abi-instr within a corpus).
        if ctxt.current_decl().is_none() {
            break;
        }

        if ctxt.current_element().is_some() {
            handle_element(ctxt, tu)?;
        }
    }

    Ok(true)
}

/// Parse an `abi-corpus` document from the context's cursor into
///   `corp`.
///
/// Translation units are appended in document order;
///   the read ends at end-of-document.
pub(super) fn read_corpus_from_input<B: BufRead>(
    ctxt: &mut ReadContext<B>,
    corp: &mut Corpus,
) -> AbixmlResult<()> {
    // No translation unit is being read yet, so there is no scope
    // stack for depth pops to consult.
    let scratch = DeclGraph::new();

    // The document must start with the abi-corpus element.
    let root = loop {
        if let Some(element) = ctxt.current_element() {
            break element.clone();
        }

        if !ctxt.advance(&scratch)? {
            return Err(AbixmlError::UnexpectedRoot);
        }
    };

    if root.name() != "abi-corpus" {
        return Err(AbixmlError::UnexpectedRoot);
    }

    if let Some(path) = root.attr("path") {
        corp.set_path(path);
    }

    // Move off the abi-corpus element to the first abi-instr, if any.
    loop {
        if !ctxt.advance(&scratch)? {
            return Ok(());
        }

        if ctxt.current_element().is_some() {
            break;
        }
    }

    loop {
        let mut tu = TranslationUnit::new("");

        if !read_translation_unit_from_input(ctxt, &mut tu)? {
            break;
        }

        corp.add(tu);
    }

    Ok(())
}

// <public entry points>

/// De-serialize a translation unit into `tu` from a reader carrying an
///   `abi-instr` document.
pub fn read_translation_unit_from_reader<R: BufRead>(
    reader: R,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let mut ctxt = ReadContext::new(Cursor::new(reader));

    if !read_translation_unit_from_input(&mut ctxt, tu)? {
        return Err(AbixmlError::UnexpectedRoot);
    }

    Ok(())
}

/// De-serialize a translation unit from a reader,
///   constructing the unit.
pub fn translation_unit_from_reader<R: BufRead>(reader: R) -> AbixmlResult<TranslationUnit> {
    let mut tu = TranslationUnit::new("");
    read_translation_unit_from_reader(reader, &mut tu)?;
    Ok(tu)
}

/// De-serialize a translation unit into `tu` from an in-memory buffer.
pub fn read_translation_unit_from_buffer(
    buffer: &str,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    read_translation_unit_from_reader(buffer.as_bytes(), tu)
}

/// De-serialize a translation unit from an in-memory buffer,
///   constructing the unit.
pub fn translation_unit_from_buffer(buffer: &str) -> AbixmlResult<TranslationUnit> {
    translation_unit_from_reader(buffer.as_bytes())
}

/// De-serialize a translation unit into `tu` from the file at `path`.
pub fn read_translation_unit_from_file<P: AsRef<Path>>(
    path: P,
    tu: &mut TranslationUnit,
) -> AbixmlResult<()> {
    let file = BufReader::new(File::open(path)?);
    read_translation_unit_from_reader(file, tu)
}

/// De-serialize a translation unit from the file at `path`,
///   constructing the unit.
///
/// The unit's path is the file's path unless the document declares its
///   own.
pub fn translation_unit_from_file<P: AsRef<Path>>(path: P) -> AbixmlResult<TranslationUnit> {
    let path = path.as_ref();

    let mut tu = TranslationUnit::new(path.to_string_lossy());
    read_translation_unit_from_file(path, &mut tu)?;
    Ok(tu)
}

/// De-serialize a corpus into `corp` from a reader carrying an
///   `abi-corpus` document.
pub fn read_corpus_from_reader<R: BufRead>(reader: R, corp: &mut Corpus) -> AbixmlResult<()> {
    let mut ctxt = ReadContext::new(Cursor::new(reader));
    read_corpus_from_input(&mut ctxt, corp)
}

/// De-serialize a corpus from a reader,
///   constructing the corpus.
pub fn corpus_from_reader<R: BufRead>(reader: R) -> AbixmlResult<Corpus> {
    let mut corp = Corpus::new("");
    read_corpus_from_reader(reader, &mut corp)?;
    Ok(corp)
}

/// De-serialize a corpus into `corp` from the file at `path`.
pub fn read_corpus_from_file<P: AsRef<Path>>(path: P, corp: &mut Corpus) -> AbixmlResult<()> {
    let file = BufReader::new(File::open(path)?);
    read_corpus_from_reader(file, corp)
}

/// De-serialize a corpus from the file at `path`,
///   constructing the corpus.
///
/// The corpus path is the file's path unless the document declares its
///   own.
pub fn corpus_from_file<P: AsRef<Path>>(path: P) -> AbixmlResult<Corpus> {
    let path = path.as_ref();

    let mut corp = Corpus::new("");
    read_corpus_from_file(path, &mut corp)?;

    if corp.path().is_empty() {
        corp.set_path(path.to_string_lossy());
    }

    Ok(corp)
}

// </public entry points>

#[cfg(test)]
mod test;
