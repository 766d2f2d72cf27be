// Declaration graph arena
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

//! Arena storage for IR nodes.
//!
//! [`DeclGraph`] is a dense arena:
//!   every node of a translation unit lives in a single [`Vec`] and is
//!   addressed by an [`ObjectRef`] index.
//! References never dangle---nodes
//!     are only ever added,
//!     never removed---so
//!       an [`ObjectRef`] held across mutations remains valid.
//! This is what permits a class definition to replace a prior
//!   declaration-only entry in the reader's symbol table while every
//!   back-edge to the old node stays intact.

use super::object::Object;
use std::ops::{Index, IndexMut};

/// Handle to an [`Object`] stored in a [`DeclGraph`].
///
/// The handle is meaningful only within the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(u32);

impl ObjectRef {
    pub(super) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Index into the owning graph's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of IR nodes for a single translation unit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeclGraph {
    objects: Vec<Object>,
}

impl DeclGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `object` to the graph and return its handle.
    pub fn add(&mut self, object: Object) -> ObjectRef {
        let oref = ObjectRef::new(self.objects.len());
        self.objects.push(object);
        oref
    }

    pub fn get(&self, oref: ObjectRef) -> &Object {
        &self.objects[oref.index()]
    }

    pub fn get_mut(&mut self, oref: ObjectRef) -> &mut Object {
        &mut self.objects[oref.index()]
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether the scope of `oref` is a class.
    ///
    /// This answers the question "did we just pop a class member?",
    ///   which the reader's depth bookkeeping needs
    ///     (class members are doubly wrapped in the XML).
    pub fn is_at_class_scope(&self, oref: ObjectRef) -> bool {
        self[oref]
            .decl()
            .and_then(|decl| decl.scope)
            .map(|scope| matches!(self[scope], Object::Class(_)))
            .unwrap_or(false)
    }
}

impl Index<ObjectRef> for DeclGraph {
    type Output = Object;

    fn index(&self, oref: ObjectRef) -> &Object {
        self.get(oref)
    }
}

impl IndexMut<ObjectRef> for DeclGraph {
    fn index_mut(&mut self, oref: ObjectRef) -> &mut Object {
        self.get_mut(oref)
    }
}

#[cfg(test)]
mod test {
    use super::super::object::{ClassDecl, DeclInfo, Scope, TypeInfo};
    use super::*;

    type Sut = DeclGraph;

    #[test]
    fn add_returns_distinct_refs() {
        let mut sut = Sut::new();

        let a = sut.add(Object::GlobalScope(Scope::default()));
        let b = sut.add(Object::Basic(super::super::object::TypeDecl {
            decl: DeclInfo::named("int"),
            ty: TypeInfo::new(32, 32),
        }));

        assert_ne!(a, b);
        assert_eq!(2, sut.len());
        assert_eq!(Some("int"), sut[b].name());
    }

    #[test]
    fn class_scope_check() {
        let mut sut = Sut::new();

        let class = sut.add(Object::Class(ClassDecl {
            decl: DeclInfo::named("C"),
            ..Default::default()
        }));

        let mut member = DeclInfo::named("x");
        member.scope = Some(class);
        let member = sut.add(Object::Basic(super::super::object::TypeDecl {
            decl: member,
            ty: TypeInfo::default(),
        }));

        assert!(sut.is_at_class_scope(member));
        assert!(!sut.is_at_class_scope(class));
    }
}
