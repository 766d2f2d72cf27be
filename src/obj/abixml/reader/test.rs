// Tests for the abixml document reader
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

use super::*;
use crate::ir::{ClassDecl, ReferenceKind, SourceLocation};

fn parse(doc: &str) -> TranslationUnit {
    translation_unit_from_buffer(doc).expect("document failed to parse")
}

fn parse_err(doc: &str) -> AbixmlError {
    translation_unit_from_buffer(doc).expect_err("document unexpectedly parsed")
}

fn global_members(tu: &TranslationUnit) -> &[ObjectRef] {
    tu.graph()[tu.global_scope()]
        .members()
        .expect("global scope is not a scope")
}

fn class_of(tu: &TranslationUnit, oref: ObjectRef) -> &ClassDecl {
    tu.graph()[oref].as_class().expect("expected a class")
}

#[test]
fn minimal_translation_unit() {
    let tu = parse(r#"<abi-instr path="/tmp/a.cc" address-size="8"/>"#);

    assert_eq!("/tmp/a.cc", tu.path());
    assert_eq!(Some(8), tu.address_size());
    assert!(tu.is_empty());
}

#[test]
fn attributes_are_optional_on_the_root() {
    let tu = parse(r#"<abi-instr/>"#);

    assert_eq!("", tu.path());
    assert_eq!(None, tu.address_size());
    assert!(tu.is_empty());
}

#[test]
fn rejects_unexpected_root() {
    assert_eq!(AbixmlError::UnexpectedRoot, parse_err(r#"<package/>"#));
}

#[test]
fn rejects_empty_document() {
    assert_eq!(AbixmlError::UnexpectedRoot, parse_err(""));
}

#[test]
fn rejects_unknown_top_level_element() {
    assert_eq!(
        AbixmlError::UnexpectedElement("mystery-decl".into()),
        parse_err(r#"<abi-instr><mystery-decl/></abi-instr>"#)
    );
}

#[test]
fn basic_type_and_typedef() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1" size-in-bits="32" alignment-in-bits="32"/>
             <typedef-decl name="I" type-id="t1" id="t2"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    assert_eq!(2, members.len());

    let int = members[0];
    match &tu.graph()[int] {
        Object::Basic(ty) => {
            assert_eq!("int", ty.decl.name);
            assert_eq!(32, ty.ty.size_in_bits);
            assert_eq!(32, ty.ty.alignment_in_bits);
            assert_eq!(Some(tu.global_scope()), ty.decl.scope);
        }
        other => panic!("expected basic type: {:?}", other),
    }

    match &tu.graph()[members[1]] {
        Object::Typedef(td) => {
            assert_eq!("I", td.decl.name);
            assert_eq!(int, td.underlying);
        }
        other => panic!("expected typedef: {:?}", other),
    }
}

#[test]
fn pointer_resolves_earlier_type() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="X" id="x" size-in-bits="8"/>
             <pointer-type-def type-id="x" id="px" size-in-bits="64" alignment-in-bits="64"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[1]] {
        Object::Pointer(ptr) => {
            assert_eq!(members[0], ptr.pointed_to);
            assert_eq!(64, ptr.ty.size_in_bits);
            assert_eq!(64, ptr.ty.alignment_in_bits);
        }
        other => panic!("expected pointer: {:?}", other),
    }
}

#[test]
fn reference_kind_defaults_to_lvalue() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="X" id="x"/>
             <reference-type-def type-id="x" id="r1" size-in-bits="64"/>
             <reference-type-def kind="rvalue" type-id="x" id="r2" size-in-bits="64"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match (&tu.graph()[members[1]], &tu.graph()[members[2]]) {
        (Object::Reference(lref), Object::Reference(rref)) => {
            assert_eq!(ReferenceKind::Lvalue, lref.kind);
            assert_eq!(ReferenceKind::Rvalue, rref.kind);
            assert_eq!(members[0], lref.referred_to);
        }
        other => panic!("expected references: {:?}", other),
    }
}

#[test]
fn qualified_type_collects_cv_mask() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <qualified-type-def type-id="t1" const="yes" volatile="yes" id="q1"/>
             <qualified-type-def type-id="t1" const="yes" id="q2"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[1]] {
        Object::Qualified(qual) => {
            assert_eq!(members[0], qual.underlying);
            assert!(qual.cv.contains(CvQual::CONST));
            assert!(qual.cv.contains(CvQual::VOLATILE));
        }
        other => panic!("expected qualified type: {:?}", other),
    }

    match &tu.graph()[members[2]] {
        Object::Qualified(qual) => {
            assert!(qual.cv.contains(CvQual::CONST));
            assert!(!qual.cv.contains(CvQual::VOLATILE));
        }
        other => panic!("expected qualified type: {:?}", other),
    }
}

#[test]
fn enum_reads_underlying_type_and_enumerators() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="unsigned int" id="t1" size-in-bits="32"/>
             <enum-decl name="E" id="e1">
               <underlying-type type-id="t1"/>
               <enumerator name="A" value="0"/>
               <enumerator name="B" value="-1"/>
             </enum-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[1]] {
        Object::Enum(en) => {
            assert_eq!("E", en.decl.name);
            assert_eq!(members[0], en.underlying);
            assert_eq!(
                vec![
                    Enumerator {
                        name: "A".into(),
                        value: 0
                    },
                    Enumerator {
                        name: "B".into(),
                        value: -1
                    },
                ],
                en.enumerators
            );
        }
        other => panic!("expected enum: {:?}", other),
    }
}

#[test]
fn unresolved_type_id_is_fatal() {
    assert_eq!(
        AbixmlError::UnresolvedTypeId("nope".into()),
        parse_err(r#"<abi-instr><typedef-decl name="I" type-id="nope" id="t2"/></abi-instr>"#)
    );
}

#[test]
fn duplicate_id_is_fatal() {
    assert_eq!(
        AbixmlError::DuplicateId("t1".into()),
        parse_err(
            r#"<abi-instr>
                 <type-decl name="int" id="t1"/>
                 <type-decl name="char" id="t1"/>
               </abi-instr>"#
        )
    );
}

#[test]
fn namespaces_nest_and_scopes_pop() {
    let tu = parse(
        r#"<abi-instr>
             <namespace-decl name="outer">
               <namespace-decl name="inner">
                 <type-decl name="int" id="t1"/>
               </namespace-decl>
             </namespace-decl>
             <type-decl name="char" id="t2"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    assert_eq!(2, members.len());

    let outer = members[0];
    let inner = match &tu.graph()[outer] {
        Object::Namespace(ns) => {
            assert_eq!("outer", ns.decl.name);
            assert_eq!(1, ns.members.len());
            ns.members[0]
        }
        other => panic!("expected namespace: {:?}", other),
    };

    match &tu.graph()[inner] {
        Object::Namespace(ns) => {
            assert_eq!("inner", ns.decl.name);
            assert_eq!(Some(outer), ns.decl.scope);
            assert_eq!(1, ns.members.len());
            assert_eq!(Some("int"), tu.graph()[ns.members[0]].name());
        }
        other => panic!("expected namespace: {:?}", other),
    }

    // The char lands back at global scope.
    assert_eq!(Some("char"), tu.graph()[members[1]].name());
    assert_eq!(
        Some(tu.global_scope()),
        tu.graph()[members[1]].decl().unwrap().scope
    );
}

#[test]
fn class_with_data_member_and_method() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1" size-in-bits="32" alignment-in-bits="32"/>
             <class-decl name="C" id="c" size-in-bits="32">
               <data-member access="public">
                 <var-decl name="a" type-id="t1"/>
               </data-member>
               <member-function access="public">
                 <function-decl name="f">
                   <return type-id="t1"/>
                 </function-decl>
               </member-function>
             </class-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    let int = members[0];
    let class = members[1];

    let c = class_of(&tu, class);
    assert_eq!("C", c.decl.name);
    assert_eq!(32, c.ty.size_in_bits);
    assert!(!c.is_declaration_only);

    // One public data member a:int, not laid out.
    assert_eq!(1, c.data_members.len());
    let dm = &c.data_members[0];
    assert_eq!(Access::Public, dm.access);
    assert!(!dm.is_laid_out);
    assert!(!dm.is_static);
    assert_eq!(0, dm.offset_in_bits);

    match &tu.graph()[dm.var] {
        Object::Var(var) => {
            assert_eq!("a", var.decl.name);
            assert_eq!(int, var.ty);
            assert_eq!(Some(class), var.decl.scope);
        }
        other => panic!("expected var: {:?}", other),
    }

    // One public non-virtual non-const method f() -> int whose type is
    // a method type of C.
    assert_eq!(1, c.member_functions.len());
    let mf = &c.member_functions[0];
    assert_eq!(Access::Public, mf.access);
    assert_eq!(0, mf.vtable_offset);
    assert!(!mf.is_static && !mf.is_constructor && !mf.is_destructor && !mf.is_const);

    match &tu.graph()[mf.function] {
        Object::Function(f) => {
            assert_eq!("f", f.decl.name);
            assert_eq!(Some(class), f.decl.scope);

            match &tu.graph()[f.fn_type] {
                Object::FnType(ty) => {
                    assert!(ty.is_method());
                    assert_eq!(Some(class), ty.class);
                    assert_eq!(Some(int), ty.return_type);
                    assert!(ty.parameters.is_empty());
                }
                other => panic!("expected function type: {:?}", other),
            }
        }
        other => panic!("expected function: {:?}", other),
    }
}

#[test]
fn declaration_only_class_is_bare() {
    let tu = parse(
        r#"<abi-instr>
             <class-decl name="Opaque" id="c" is-declaration-only="yes"/>
           </abi-instr>"#,
    );

    let c = class_of(&tu, global_members(&tu)[0]);

    assert!(c.is_declaration_only);
    assert_eq!("Opaque", c.decl.name);
    assert_eq!(0, c.ty.size_in_bits);
    assert_eq!(0, c.ty.alignment_in_bits);
    assert!(c.bases.is_empty());
    assert!(c.members.is_empty());
    assert!(c.data_members.is_empty());
    assert!(c.member_functions.is_empty());
}

#[test]
fn class_definition_replaces_declaration_only_entry() {
    let tu = parse(
        r#"<abi-instr>
             <class-decl name="S" id="c" is-declaration-only="yes"/>
             <class-decl name="S" id="c" def-of-decl-id="c" size-in-bits="64"/>
             <pointer-type-def type-id="c" id="pc" size-in-bits="64"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    assert_eq!(3, members.len());

    let decl_only = members[0];
    let definition = members[1];

    assert!(class_of(&tu, decl_only).is_declaration_only);

    let def = class_of(&tu, definition);
    assert!(!def.is_declaration_only);
    assert_eq!(64, def.ty.size_in_bits);

    // The definition carries a back-reference to the earlier
    // declaration-only node.
    assert_eq!(Some(decl_only), def.definition_of);

    // And it is the definition, not the declaration, that the id now
    // resolves to.
    match &tu.graph()[members[2]] {
        Object::Pointer(ptr) => assert_eq!(definition, ptr.pointed_to),
        other => panic!("expected pointer: {:?}", other),
    }
}

#[test]
fn class_with_base_specifier() {
    let tu = parse(
        r#"<abi-instr>
             <class-decl name="Base" id="b" size-in-bits="32"/>
             <class-decl name="Derived" id="d" size-in-bits="64">
               <base-class type-id="b" access="public" is-virtual="yes"/>
             </class-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    let derived = class_of(&tu, members[1]);

    assert_eq!(1, derived.bases.len());
    let base = &derived.bases[0];

    assert_eq!(members[0], base.base);
    assert_eq!(Access::Public, base.access);
    assert!(base.is_virtual);

    // Absent layout-offset-in-bits means not laid out.
    assert_eq!(-1, base.offset_in_bits);
}

#[test]
fn base_specifier_must_reference_a_class() {
    assert_eq!(
        AbixmlError::WrongTypeKind {
            id: "t1".into(),
            expected: "class",
        },
        parse_err(
            r#"<abi-instr>
                 <type-decl name="int" id="t1"/>
                 <class-decl name="D" id="d">
                   <base-class type-id="t1"/>
                 </class-decl>
               </abi-instr>"#
        )
    );
}

#[test]
fn laid_out_data_member_records_offset() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1" size-in-bits="32"/>
             <class-decl name="C" id="c" size-in-bits="64">
               <data-member access="private" layout-offset-in-bits="32" static="yes">
                 <var-decl name="n" type-id="t1"/>
               </data-member>
             </class-decl>
           </abi-instr>"#,
    );

    let c = class_of(&tu, global_members(&tu)[1]);
    let dm = &c.data_members[0];

    assert_eq!(Access::Private, dm.access);
    assert!(dm.is_laid_out);
    assert!(dm.is_static);
    assert_eq!(32, dm.offset_in_bits);
}

#[test]
fn member_type_attaches_through_scope() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="unsigned long" id="t1" size-in-bits="64"/>
             <class-decl name="C" id="c" size-in-bits="32">
               <member-type access="public">
                 <typedef-decl name="size_type" type-id="t1" id="st"/>
               </member-type>
             </class-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    let class = members[1];
    let c = class_of(&tu, class);

    assert_eq!(1, c.members.len());

    match &tu.graph()[c.members[0]] {
        Object::Typedef(td) => {
            assert_eq!("size_type", td.decl.name);
            assert_eq!(Some(class), td.decl.scope);
            assert_eq!(members[0], td.underlying);
        }
        other => panic!("expected typedef: {:?}", other),
    }
}

#[test]
fn self_referential_member_resolves_through_declaration_only_entry() {
    let tu = parse(
        r#"<abi-instr>
             <class-decl name="Node" id="n" is-declaration-only="yes"/>
             <class-decl name="Node" id="n" def-of-decl-id="n" size-in-bits="64">
               <member-type access="public">
                 <pointer-type-def type-id="n" id="pn" size-in-bits="64"/>
               </member-type>
             </class-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    let decl_only = members[0];
    let definition = members[1];

    // While the definition's members are being built, the id still
    // resolves to the declaration-only entry.
    let def = class_of(&tu, definition);
    assert_eq!(1, def.members.len());

    match &tu.graph()[def.members[0]] {
        Object::Pointer(ptr) => assert_eq!(decl_only, ptr.pointed_to),
        other => panic!("expected pointer: {:?}", other),
    }
}

#[test]
fn variadic_parameter_has_no_type() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <function-decl name="printf" declared-inline="yes">
               <parameter type-id="t1" name="fmt"/>
               <parameter is-variadic="yes"/>
               <return type-id="t1"/>
             </function-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[1]] {
        Object::Function(f) => {
            assert!(f.declared_inline);

            match &tu.graph()[f.fn_type] {
                Object::FnType(ty) => {
                    assert_eq!(2, ty.parameters.len());
                    assert_eq!(Some(members[0]), ty.parameters[0].ty);
                    assert_eq!("fmt", ty.parameters[0].name);
                    assert!(ty.parameters[1].is_variadic);
                    assert_eq!(None, ty.parameters[1].ty);
                    assert!(!ty.is_method());
                }
                other => panic!("expected function type: {:?}", other),
            }
        }
        other => panic!("expected function: {:?}", other),
    }
}

#[test]
fn non_variadic_parameter_requires_resolved_type() {
    assert_eq!(
        AbixmlError::UnresolvedTypeId("nope".into()),
        parse_err(
            r#"<abi-instr>
                 <function-decl name="f">
                   <parameter type-id="nope"/>
                 </function-decl>
               </abi-instr>"#
        )
    );
}

#[test]
fn var_decl_reads_symbol_attributes() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <var-decl name="count" type-id="t1" mangled-name="_Z5count"
                       visibility="hidden" binding="weak"
                       filepath="a.cc" line="12" column="3"/>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[1]] {
        Object::Var(var) => {
            assert_eq!("count", var.decl.name);
            assert_eq!(Some("_Z5count".to_owned()), var.decl.mangled_name);
            assert_eq!(Visibility::Hidden, var.decl.visibility);
            assert_eq!(Binding::Weak, var.decl.binding);

            let loc = var.decl.location.expect("missing location");
            assert_eq!(
                &SourceLocation {
                    file: "a.cc".into(),
                    line: 12,
                    column: 3,
                },
                tu.locations().get(loc)
            );
        }
        other => panic!("expected var: {:?}", other),
    }
}

#[test]
fn location_requires_filepath() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <var-decl name="v" type-id="t1" line="12" column="3"/>
           </abi-instr>"#,
    );

    match &tu.graph()[global_members(&tu)[1]] {
        Object::Var(var) => assert_eq!(None, var.decl.location),
        other => panic!("expected var: {:?}", other),
    }

    assert!(tu.locations().is_empty());
}

#[test]
fn unknown_enumerated_attributes_fall_back() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <var-decl name="v" type-id="t1" visibility="fancy" binding="sticky"/>
             <class-decl name="C" id="c">
               <data-member access="friendly">
                 <var-decl name="n" type-id="t1"/>
               </data-member>
             </class-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    let var = tu.graph()[members[1]].decl().unwrap();
    assert_eq!(Visibility::Default, var.visibility);
    assert_eq!(Binding::Global, var.binding);

    let c = class_of(&tu, members[2]);
    assert_eq!(Access::Private, c.data_members[0].access);
}

#[test]
fn absent_visibility_and_binding_stay_unset() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <var-decl name="v" type-id="t1"/>
           </abi-instr>"#,
    );

    let var = tu.graph()[global_members(&tu)[1]].decl().unwrap();
    assert_eq!(Visibility::None, var.visibility);
    assert_eq!(Binding::None, var.binding);
}

#[test]
fn cdtor_const_attributes_share_one_parse() {
    let tu = parse(
        r#"<abi-instr>
             <class-decl name="C" id="c" size-in-bits="32">
               <member-function access="public" constructor="yes" const="yes">
                 <function-decl name="C"/>
               </member-function>
               <member-function access="public" const="yes">
                 <function-decl name="get"/>
               </member-function>
             </class-decl>
           </abi-instr>"#,
    );

    let c = class_of(&tu, global_members(&tu)[0]);

    // constructor wins the shared parse; const is not read.
    assert!(c.member_functions[0].is_constructor);
    assert!(!c.member_functions[0].is_const);

    assert!(!c.member_functions[1].is_constructor);
    assert!(c.member_functions[1].is_const);
}

#[test]
fn function_template_collects_parameters_and_pattern() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <function-template-decl id="ft1" visibility="default" binding="global">
               <template-type-parameter id="tp1" name="T"/>
               <function-decl name="max">
                 <parameter type-id="tp1" name="a"/>
                 <return type-id="tp1"/>
               </function-decl>
             </function-template-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    // The template, its type parameter, and its pattern all land in the
    // enclosing scope (a template is not itself a scope).
    let tdecl = members[1];

    match &tu.graph()[tdecl] {
        Object::FnTemplate(t) => {
            assert_eq!(Visibility::Default, t.decl.visibility);
            assert_eq!(Binding::Global, t.decl.binding);

            assert_eq!(1, t.parameters.len());
            match &tu.graph()[t.parameters[0]] {
                Object::TypeTparam(parm) => {
                    assert_eq!("T", parm.decl.name);
                    assert_eq!(0, parm.index);
                }
                other => panic!("expected type parameter: {:?}", other),
            }

            let pattern = t.pattern.expect("missing pattern");
            match &tu.graph()[pattern] {
                Object::Function(f) => {
                    assert_eq!("max", f.decl.name);

                    match &tu.graph()[f.fn_type] {
                        Object::FnType(ty) => {
                            // The pattern's parameter and return resolve
                            // to the keyed template type parameter.
                            assert_eq!(Some(t.parameters[0]), ty.parameters[0].ty);
                            assert_eq!(Some(t.parameters[0]), ty.return_type);
                        }
                        other => panic!("expected function type: {:?}", other),
                    }
                }
                other => panic!("expected function: {:?}", other),
            }
        }
        other => panic!("expected function template: {:?}", other),
    }
}

#[test]
fn function_template_requires_an_id() {
    assert_eq!(
        AbixmlError::MissingAttribute {
            element: "function-template-decl",
            attribute: "id",
        },
        parse_err(r#"<abi-instr><function-template-decl/></abi-instr>"#)
    );
}

#[test]
fn class_template_collects_parameters_and_pattern() {
    let tu = parse(
        r#"<abi-instr>
             <class-template-decl id="ct1" visibility="default">
               <template-type-parameter id="tp1" name="T"/>
               <class-decl name="Vec" id="v1" size-in-bits="64"/>
             </class-template-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);

    match &tu.graph()[members[0]] {
        Object::ClassTemplate(t) => {
            assert_eq!(1, t.parameters.len());

            let pattern = t.pattern.expect("missing pattern");
            assert_eq!("Vec", class_of(&tu, pattern).decl.name);
        }
        other => panic!("expected class template: {:?}", other),
    }
}

#[test]
fn template_parameter_kinds_share_the_index_sequence() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1" size-in-bits="32"/>
             <function-template-decl id="ft1">
               <template-type-parameter id="tp1" name="T"/>
               <template-non-type-parameter type-id="t1" name="N"/>
               <template-template-parameter id="tp2" name="U">
                 <template-type-parameter name="V"/>
               </template-template-parameter>
               <template-parameter-type-composition>
                 <pointer-type-def type-id="tp1" id="pt1" size-in-bits="64"/>
               </template-parameter-type-composition>
               <function-decl name="f">
                 <return type-id="t1"/>
               </function-decl>
             </function-template-decl>
           </abi-instr>"#,
    );

    let members = global_members(&tu);
    let int = members[0];

    let parms = match &tu.graph()[members[1]] {
        Object::FnTemplate(t) => {
            assert!(t.pattern.is_some());
            t.parameters.clone()
        }
        other => panic!("expected function template: {:?}", other),
    };

    assert_eq!(4, parms.len());

    let type_parm = parms[0];
    match &tu.graph()[parms[0]] {
        Object::TypeTparam(parm) => assert_eq!(0, parm.index),
        other => panic!("expected type parameter: {:?}", other),
    }

    match &tu.graph()[parms[1]] {
        Object::NonTypeTparam(parm) => {
            assert_eq!(1, parm.index);
            assert_eq!("N", parm.decl.name);
            assert_eq!(int, parm.ty);
        }
        other => panic!("expected non-type parameter: {:?}", other),
    }

    match &tu.graph()[parms[2]] {
        Object::TemplateTparam(parm) => {
            assert_eq!(2, parm.index);

            // Its own nested parameter list, indexed from zero.
            assert_eq!(1, parm.parameters.len());
            match &tu.graph()[parm.parameters[0]] {
                Object::TypeTparam(nested) => {
                    assert_eq!("V", nested.decl.name);
                    assert_eq!(0, nested.index);
                }
                other => panic!("expected nested type parameter: {:?}", other),
            }
        }
        other => panic!("expected template template parameter: {:?}", other),
    }

    match &tu.graph()[parms[3]] {
        Object::TypeComposition(comp) => {
            assert_eq!(3, comp.index);

            let composed = comp.composed.expect("missing composed type");
            match &tu.graph()[composed] {
                Object::Pointer(ptr) => assert_eq!(type_parm, ptr.pointed_to),
                other => panic!("expected pointer: {:?}", other),
            }
        }
        other => panic!("expected type composition: {:?}", other),
    }
}

#[test]
fn member_function_template() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="int" id="t1"/>
             <class-decl name="C" id="c" size-in-bits="32">
               <member-template access="public" static="yes">
                 <function-template-decl id="ft1">
                   <template-type-parameter id="tp1" name="T"/>
                   <function-decl name="apply">
                     <return type-id="t1"/>
                   </function-decl>
                 </function-template-decl>
               </member-template>
             </class-decl>
           </abi-instr>"#,
    );

    let class = global_members(&tu)[1];
    let c = class_of(&tu, class);

    assert_eq!(1, c.member_function_templates.len());
    let mt = &c.member_function_templates[0];

    assert_eq!(Access::Public, mt.access);
    assert!(mt.is_static);

    match &tu.graph()[mt.template] {
        Object::FnTemplate(t) => {
            assert_eq!(Some(class), t.decl.scope);
            assert_eq!(1, t.parameters.len());
            assert!(t.pattern.is_some());
        }
        other => panic!("expected function template: {:?}", other),
    }
}

#[test]
fn names_are_xml_unescaped() {
    let tu = parse(
        r#"<abi-instr>
             <type-decl name="Pair&lt;int, int&gt;" id="t1"/>
           </abi-instr>"#,
    );

    assert_eq!(
        Some("Pair<int, int>"),
        tu.graph()[global_members(&tu)[0]].name()
    );
}

#[test]
fn corpus_reads_units_in_order() {
    let corp = corpus_from_reader(
        &br#"<abi-corpus path="lib.so">
               <abi-instr path="/a.cc">
                 <type-decl name="int" id="t1" size-in-bits="32"/>
               </abi-instr>
               <abi-instr path="/b.cc">
                 <type-decl name="char" id="t1" size-in-bits="8"/>
               </abi-instr>
             </abi-corpus>"#[..],
    )
    .expect("corpus failed to parse");

    assert_eq!("lib.so", corp.path());
    assert_eq!(2, corp.len());

    let a = &corp.units()[0];
    assert_eq!("/a.cc", a.path());
    assert_eq!(1, global_members(a).len());
    assert_eq!(Some("int"), a.graph()[global_members(a)[0]].name());

    // Ids are per-unit: the second unit reuses t1 freely.
    let b = &corp.units()[1];
    assert_eq!("/b.cc", b.path());
    assert_eq!(Some("char"), b.graph()[global_members(b)[0]].name());
}

#[test]
fn empty_corpus_parses_to_no_units() {
    let corp = corpus_from_reader(&br#"<abi-corpus path="lib.so"/>"#[..])
        .expect("corpus failed to parse");

    assert_eq!("lib.so", corp.path());
    assert!(corp.is_empty());
}

#[test]
fn corpus_rejects_wrong_root() {
    assert_eq!(
        Err(AbixmlError::UnexpectedRoot),
        corpus_from_reader(&br#"<abi-instr/>"#[..]).map(|_| ())
    );
}
