// Translation units and corpora
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

//! Containers for parsed ABI dumps.
//!
//! A [`TranslationUnit`] owns the [`DeclGraph`] holding its declarations,
//!   rooted at a global scope node,
//!   together with a [`LocationManager`] interning the source locations
//!   referenced by those declarations.
//! A [`Corpus`] is an ordered sequence of translation units describing a
//!   whole library or binary.

use super::graph::{DeclGraph, ObjectRef};
use super::object::{Object, Scope};

/// Opaque handle to a source location interned by a [`LocationManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(u32);

/// A `(filepath, line, column)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// Interns source locations on behalf of a translation unit.
///
/// Locations are only ever created,
///   so handles remain valid for the life of the manager.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LocationManager {
    locations: Vec<SourceLocation>,
}

impl LocationManager {
    /// Intern a new location and return its handle.
    pub fn create_new_location(
        &mut self,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Location {
        let loc = Location(self.locations.len() as u32);

        self.locations.push(SourceLocation {
            file: file.into(),
            line,
            column,
        });

        loc
    }

    /// Expand a handle back into its triple.
    pub fn get(&self, loc: Location) -> &SourceLocation {
        &self.locations[loc.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// The declarations produced from one compilation input.
#[derive(Debug, PartialEq, Eq)]
pub struct TranslationUnit {
    path: String,
    address_size: Option<u32>,
    graph: DeclGraph,
    locations: LocationManager,
    global_scope: ObjectRef,
}

impl TranslationUnit {
    /// Create an empty translation unit for the document at `path`.
    ///
    /// The unit starts with a fresh graph containing only its global
    ///   scope.
    pub fn new(path: impl Into<String>) -> Self {
        let mut graph = DeclGraph::new();
        let global_scope = graph.add(Object::GlobalScope(Scope::default()));

        Self {
            path: path.into(),
            address_size: None,
            graph,
            locations: LocationManager::default(),
            global_scope,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Address size of the target architecture in bytes,
    ///   if the dump declared one.
    pub fn address_size(&self) -> Option<u32> {
        self.address_size
    }

    pub fn set_address_size(&mut self, size: u32) {
        self.address_size = Some(size);
    }

    pub fn global_scope(&self) -> ObjectRef {
        self.global_scope
    }

    pub fn graph(&self) -> &DeclGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DeclGraph {
        &mut self.graph
    }

    pub fn locations(&self) -> &LocationManager {
        &self.locations
    }

    pub fn locations_mut(&mut self) -> &mut LocationManager {
        &mut self.locations
    }

    /// Whether the unit contains no declarations beyond its global scope.
    pub fn is_empty(&self) -> bool {
        self.graph[self.global_scope]
            .members()
            .map(<[ObjectRef]>::is_empty)
            .unwrap_or(true)
    }
}

/// An ordered set of translation units describing a library or binary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    path: String,
    units: Vec<TranslationUnit>,
}

impl Corpus {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            units: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Append a translation unit,
    ///   preserving insertion order.
    pub fn add(&mut self, tu: TranslationUnit) {
        self.units.push(tu);
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_tu_has_empty_global_scope() {
        let tu = TranslationUnit::new("/tmp/a.cc");

        assert_eq!("/tmp/a.cc", tu.path());
        assert_eq!(None, tu.address_size());
        assert!(tu.is_empty());
        assert!(tu.graph()[tu.global_scope()].is_scope());
    }

    #[test]
    fn location_manager_interns_in_order() {
        let mut mgr = LocationManager::default();

        let a = mgr.create_new_location("foo.cc", 1, 2);
        let b = mgr.create_new_location("bar.cc", 3, 4);

        assert_ne!(a, b);
        assert_eq!(
            &SourceLocation {
                file: "foo.cc".into(),
                line: 1,
                column: 2
            },
            mgr.get(a)
        );
        assert_eq!("bar.cc", mgr.get(b).file);
    }

    #[test]
    fn corpus_preserves_unit_order() {
        let mut corp = Corpus::new("lib.zip");

        corp.add(TranslationUnit::new("a.cc"));
        corp.add(TranslationUnit::new("b.cc"));

        assert_eq!(2, corp.len());
        assert_eq!("a.cc", corp.units()[0].path());
        assert_eq!("b.cc", corp.units()[1].path());
    }
}
