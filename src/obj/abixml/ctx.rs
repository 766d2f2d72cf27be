// abixml read context
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

//! Mutable state threaded through a single parse.
//!
//! [`ReadContext`] owns the XML cursor,
//!   the three id→node symbol tables
//!     (types, function templates, class templates),
//!   and the stack of declarations describing the lexical path from the
//!   global scope down to the node currently being built.
//!
//! Scope/Depth Protocol
//! ====================
//! The scope stack is kept in sync with the cursor by depth deltas
//!   rather than end-of-element events:
//!     whenever an element is encountered at a depth less than or equal
//!     to the previous one,
//!       we have left `old − new + 1` elements,
//!       and that many declarations are popped.
//! One wrinkle:
//!   class members are doubly wrapped in the XML
//!     (e.g. `data-member` around `var-decl`)
//!     while corresponding to a single IR node,
//!       so when a popped declaration sits at class scope and more than
//!       two pops remain,
//!         one pop is skipped to compensate.
//! Both the streaming handlers
//!   (whose depths come from [`ReadContext::advance`])
//!   and the subtree builders
//!   (whose depths come from the expanded nodes via
//!     [`ReadContext::update_depth_from_node`])
//!   feed the same update;
//!     builders reached directly by an advance are told to suppress
//!     their update to avoid applying it twice.

use super::error::{AbixmlError, AbixmlResult};
use crate::ir::{DeclGraph, ObjectRef};
use crate::xml::{Cursor, Element, Node};
use fxhash::FxHashMap;
use std::io::BufRead;

/// Per-parse state for the abixml reader.
pub struct ReadContext<B: BufRead> {
    cursor: Cursor<B>,

    /// Depth of the last element the context was updated against.
    depth: usize,

    /// Types keyed by `id`,
    ///   cleared at the start of each `abi-instr`.
    types: FxHashMap<String, ObjectRef>,

    /// Function templates keyed by `id`.
    fn_templates: FxHashMap<String, ObjectRef>,

    /// Class templates keyed by `id`.
    class_templates: FxHashMap<String, ObjectRef>,

    /// Lexical path from the global scope to the current declaration.
    decls: Vec<ObjectRef>,
}

impl<B: BufRead> ReadContext<B> {
    pub fn new(cursor: Cursor<B>) -> Self {
        Self {
            cursor,
            depth: 0,
            types: FxHashMap::default(),
            fn_templates: FxHashMap::default(),
            class_templates: FxHashMap::default(),
            decls: Vec::new(),
        }
    }

    /// Move the cursor to the next node,
    ///   updating the scope stack if the node is an element.
    ///
    /// Returns `false` once the document is exhausted.
    pub fn advance(&mut self, graph: &DeclGraph) -> AbixmlResult<bool> {
        let depth = match self.cursor.advance()? {
            None => return Ok(false),
            Some(node) => node.element().map(Element::depth),
        };

        // Only elements participate in the depth protocol.
        if let Some(depth) = depth {
            self.update_depth_info(graph, depth);
        }

        Ok(true)
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.cursor.node()
    }

    pub fn current_element(&self) -> Option<&Element> {
        self.cursor.element()
    }

    /// Detach the current element's subtree for recursive building.
    pub fn expand(&mut self) -> AbixmlResult<Element> {
        Ok(self.cursor.expand()?)
    }

    /// Update the scope stack against a node encountered by a builder
    ///   rather than by [`advance`](ReadContext::advance).
    pub fn update_depth_from_node(&mut self, graph: &DeclGraph, node: &Element) {
        self.update_depth_info(graph, node.depth);
    }

    /// Apply the depth-delta protocol described in the module docs.
    fn update_depth_info(&mut self, graph: &DeclGraph, new_depth: usize) {
        let ctxt_depth = self.depth;

        if new_depth <= ctxt_depth {
            // We went up the tree or moved to a sibling.
            let mut nb = ctxt_depth - new_depth + 1;

            while nb > 0 {
                if let Some(d) = self.pop_decl() {
                    // The stream gives us no reliable end-of-element
                    // signal, and class members are wrapped in an extra
                    // XML element (e.g. data-member -> var-decl) that
                    // maps to a single IR node; leaving one therefore
                    // crosses two XML elements but must pop only once.
                    if graph.is_at_class_scope(d) && nb > 2 {
                        nb -= 1;
                    }
                }

                nb -= 1;
            }
        }

        self.depth = new_depth;
    }

    /// Declaration currently being built,
    ///   if any.
    pub fn current_decl(&self) -> Option<ObjectRef> {
        self.decls.last().copied()
    }

    /// Nearest enclosing scope.
    ///
    /// If the current declaration is itself a scope it is returned
    ///   directly;
    ///     otherwise its own enclosing scope is.
    pub fn current_scope(&self, graph: &DeclGraph) -> Option<ObjectRef> {
        let cur = self.current_decl()?;

        if graph[cur].is_scope() {
            Some(cur)
        } else {
            graph[cur].decl().and_then(|decl| decl.scope)
        }
    }

    pub fn push_decl(&mut self, decl: ObjectRef) {
        self.decls.push(decl);
    }

    pub fn pop_decl(&mut self) -> Option<ObjectRef> {
        self.decls.pop()
    }

    /// Attach `decl` to the current scope,
    ///   appending it to the scope's members and setting its scope
    ///   back-reference.
    pub fn add_decl_to_scope(&self, graph: &mut DeclGraph, decl: ObjectRef) {
        if let Some(scope) = self.current_scope(graph) {
            if let Some(members) = graph[scope].members_mut() {
                members.push(decl);
            }

            if let Some(info) = graph[decl].decl_mut() {
                info.scope = Some(scope);
            }
        }
    }

    /// Attach `decl` to the current scope if requested,
    ///   then make it the current declaration.
    ///
    /// This must be called for each declaration created during the
    ///   parse so that nested builders see it as their context.
    pub fn push_decl_to_scope(
        &mut self,
        graph: &mut DeclGraph,
        decl: ObjectRef,
        add_to_scope: bool,
    ) {
        if add_to_scope {
            self.add_decl_to_scope(graph, decl);
        }

        self.push_decl(decl);
    }

    /// [`push_decl_to_scope`](ReadContext::push_decl_to_scope),
    ///   optionally updating the depth information first.
    ///
    /// `update_depth_info` must be `false` when `node` was reached by
    ///   [`advance`](ReadContext::advance),
    ///     which has already performed the update.
    pub fn push_decl_to_scope_at(
        &mut self,
        graph: &mut DeclGraph,
        decl: ObjectRef,
        node: &Element,
        update_depth_info: bool,
        add_to_scope: bool,
    ) {
        if update_depth_info {
            self.update_depth_from_node(graph, node);
        }

        self.push_decl_to_scope(graph, decl, add_to_scope);
    }

    pub fn clear_type_map(&mut self) {
        self.types.clear();
    }

    pub fn get_type(&self, id: &str) -> Option<ObjectRef> {
        self.types.get(id).copied()
    }

    /// Associate `id` with a type.
    ///
    /// Errors
    /// ======
    /// - [`AbixmlError::DuplicateId`] if `id` is already keyed.
    pub fn key_type(&mut self, id: &str, ty: ObjectRef) -> AbixmlResult<()> {
        if self.types.contains_key(id) {
            return Err(AbixmlError::DuplicateId(id.into()));
        }

        self.types.insert(id.into(), ty);
        Ok(())
    }

    /// Associate `id` with a type,
    ///   replacing any previous association.
    ///
    /// The previous node is left alive in the graph;
    ///   only the table entry is replaced,
    ///     so references already made to the old node remain valid.
    pub fn key_replacement_of_type(&mut self, id: &str, definition: ObjectRef) {
        self.types.insert(id.into(), definition);
    }

    /// Attach, push, and key a type in one step.
    pub fn push_and_key_type(
        &mut self,
        graph: &mut DeclGraph,
        ty: ObjectRef,
        id: &str,
        add_to_scope: bool,
    ) -> AbixmlResult<()> {
        self.push_decl_to_scope(graph, ty, add_to_scope);
        self.key_type(id, ty)
    }

    /// [`push_and_key_type`](ReadContext::push_and_key_type) with the
    ///   builder-side depth update.
    pub fn push_and_key_type_at(
        &mut self,
        graph: &mut DeclGraph,
        ty: ObjectRef,
        id: &str,
        node: &Element,
        update_depth_info: bool,
        add_to_scope: bool,
    ) -> AbixmlResult<()> {
        if update_depth_info {
            self.update_depth_from_node(graph, node);
        }

        self.push_and_key_type(graph, ty, id, add_to_scope)
    }

    pub fn get_fn_template(&self, id: &str) -> Option<ObjectRef> {
        self.fn_templates.get(id).copied()
    }

    pub fn key_fn_template(&mut self, id: &str, tdecl: ObjectRef) -> AbixmlResult<()> {
        if self.fn_templates.contains_key(id) {
            return Err(AbixmlError::DuplicateId(id.into()));
        }

        self.fn_templates.insert(id.into(), tdecl);
        Ok(())
    }

    pub fn get_class_template(&self, id: &str) -> Option<ObjectRef> {
        self.class_templates.get(id).copied()
    }

    pub fn key_class_template(&mut self, id: &str, tdecl: ObjectRef) -> AbixmlResult<()> {
        if self.class_templates.contains_key(id) {
            return Err(AbixmlError::DuplicateId(id.into()));
        }

        self.class_templates.insert(id.into(), tdecl);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::{ClassDecl, DeclInfo, Object, Scope, TypeDecl, TypeInfo};

    type Sut<'a> = ReadContext<&'a [u8]>;

    fn empty_sut() -> Sut<'static> {
        ReadContext::new(Cursor::new(&b""[..]))
    }

    fn add_named(graph: &mut DeclGraph, name: &str, scope: Option<ObjectRef>) -> ObjectRef {
        let mut decl = DeclInfo::named(name);
        decl.scope = scope;

        graph.add(Object::Basic(TypeDecl {
            decl,
            ty: TypeInfo::default(),
        }))
    }

    #[test]
    fn current_scope_walks_to_nearest_scope() {
        let mut graph = DeclGraph::new();
        let global = graph.add(Object::GlobalScope(Scope::default()));
        let ty = add_named(&mut graph, "int", Some(global));

        let mut sut = empty_sut();
        assert_eq!(None, sut.current_scope(&graph));

        sut.push_decl(global);
        assert_eq!(Some(global), sut.current_scope(&graph));

        // A non-scope declaration defers to its own scope.
        sut.push_decl(ty);
        assert_eq!(Some(global), sut.current_scope(&graph));
    }

    #[test]
    fn add_decl_to_scope_links_both_directions() {
        let mut graph = DeclGraph::new();
        let global = graph.add(Object::GlobalScope(Scope::default()));
        let ty = add_named(&mut graph, "int", None);

        let mut sut = empty_sut();
        sut.push_decl(global);
        sut.push_decl_to_scope(&mut graph, ty, true);

        assert_eq!(Some(&[ty][..]), graph[global].members());
        assert_eq!(Some(global), graph[ty].decl().unwrap().scope);
        assert_eq!(Some(ty), sut.current_decl());
    }

    #[test]
    fn depth_decrease_pops_one_per_level() {
        let mut graph = DeclGraph::new();
        let global = graph.add(Object::GlobalScope(Scope::default()));
        let a = add_named(&mut graph, "a", Some(global));
        let b = add_named(&mut graph, "b", Some(global));

        let mut sut = empty_sut();
        sut.push_decl(global);

        sut.update_depth_info(&graph, 1);
        sut.push_decl(a);
        sut.update_depth_info(&graph, 2);
        sut.push_decl(b);

        // Sibling at depth 1: leaves depths 2 and 1, popping twice.
        sut.update_depth_info(&graph, 1);
        assert_eq!(Some(global), sut.current_decl());
    }

    #[test]
    fn class_member_pop_is_adjusted() {
        let mut graph = DeclGraph::new();
        let global = graph.add(Object::GlobalScope(Scope::default()));

        let mut class_decl = DeclInfo::named("C");
        class_decl.scope = Some(global);
        let class = graph.add(Object::Class(ClassDecl {
            decl: class_decl,
            ..Default::default()
        }));

        let member = add_named(&mut graph, "m", Some(class));

        let mut sut = empty_sut();
        sut.push_decl(global);
        sut.update_depth_info(&graph, 1); // <class-decl>
        sut.push_decl(class);
        sut.update_depth_info(&graph, 3); // member wrapper + inner decl
        sut.push_decl(member);

        // Moving to a sibling of the class at depth 1 crosses three XML
        // levels but only two IR nodes; the member's extra wrapper is
        // compensated for.
        sut.update_depth_info(&graph, 1);
        assert_eq!(Some(global), sut.current_decl());
    }

    #[test]
    fn type_table_rejects_duplicates_but_replacement_overrides() {
        let mut graph = DeclGraph::new();
        let a = add_named(&mut graph, "a", None);
        let b = add_named(&mut graph, "b", None);

        let mut sut = empty_sut();
        sut.key_type("t1", a).unwrap();

        assert_eq!(
            Err(AbixmlError::DuplicateId("t1".into())),
            sut.key_type("t1", b)
        );
        assert_eq!(Some(a), sut.get_type("t1"));

        sut.key_replacement_of_type("t1", b);
        assert_eq!(Some(b), sut.get_type("t1"));
    }

    #[test]
    fn type_table_clears_but_template_tables_persist() {
        let mut graph = DeclGraph::new();
        let a = add_named(&mut graph, "a", None);

        let mut sut = empty_sut();
        sut.key_type("t1", a).unwrap();
        sut.key_fn_template("ft1", a).unwrap();
        sut.key_class_template("ct1", a).unwrap();

        sut.clear_type_map();

        assert_eq!(None, sut.get_type("t1"));
        assert_eq!(Some(a), sut.get_fn_template("ft1"));
        assert_eq!(Some(a), sut.get_class_template("ct1"));
    }
}
