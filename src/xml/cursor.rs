// Streaming XML cursor
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

//! Forward-only cursor over an XML document.
//!
//! [`Cursor`] wraps [`quick_xml::Reader`] and re-frames its event stream
//!   as a sequence of [`Node`]s,
//!     each carrying the depth at which it occurred.
//! quick-xml reports no depth of its own,
//!   so the cursor synthesizes it from start/end events:
//!     a start or empty tag is at the current nesting level,
//!     a start additionally descends,
//!     and an end ascends back to the depth of its opening tag.
//! This reproduces the depth numbering of a DOM-backed pull reader,
//!   which the scope bookkeeping downstream depends on.
//!
//! Attribute values are unescaped when an element is snapshotted,
//!   so consumers only ever see the logical value.

use super::error::{Error, InnerXmlError};
use super::tree::{Attr, Element};
use super::XmlResult;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader as XmlReader;
use std::io::BufRead;
use std::str;

/// A node encountered by the cursor.
///
/// Only elements carry data;
///   the remaining kinds exist so that callers can observe document
///   structure
///     (and, for the most part, skip it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A start or self-closing tag.
    Element {
        element: Element,
        self_closing: bool,
    },
    /// An end tag,
    ///   at the depth of its opening tag.
    End { depth: usize },
    /// Character data,
    ///   whitespace included.
    Text { depth: usize },
    /// Anything else
    ///   (declaration, comment, processing instruction, CDATA, doctype).
    Misc { depth: usize },
}

impl Node {
    pub fn depth(&self) -> usize {
        match self {
            Self::Element { element, .. } => element.depth,
            Self::End { depth } | Self::Text { depth } | Self::Misc { depth } => *depth,
        }
    }

    /// The element at this node,
    ///   if it is one.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Element { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// Streaming cursor over an XML document read from `B`.
pub struct Cursor<B: BufRead> {
    /// Source document reader.
    reader: XmlReader<B>,

    /// Internal buffer for [`XmlReader`],
    ///   reused across events.
    buffer: Vec<u8>,

    /// Number of currently open elements.
    nesting: usize,

    /// Node the cursor is positioned on,
    ///   if any.
    current: Option<Node>,
}

impl<B: BufRead> Cursor<B> {
    /// Construct a cursor over `reader`.
    pub fn new(reader: B) -> Self {
        let mut reader = XmlReader::from_reader(reader);

        // ABI dumps are tool output and should be trusted
        reader.check_end_names(false);

        Self {
            reader,
            buffer: Vec::new(),
            nesting: 0,
            current: None,
        }
    }

    /// Move to the next node in document order.
    ///
    /// Returns [`None`] once the document is exhausted,
    ///   after which the cursor stays at end-of-document.
    pub fn advance(&mut self) -> XmlResult<Option<&Node>> {
        self.current = self.next_node()?;
        Ok(self.current.as_ref())
    }

    /// Node the cursor is currently positioned on.
    pub fn node(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    /// Element the cursor is currently positioned on,
    ///   if the current node is an element.
    pub fn element(&self) -> Option<&Element> {
        self.current.as_ref().and_then(Node::element)
    }

    /// Detach the current element and its subtree into an owned
    ///   [`Element`].
    ///
    /// The subtree is consumed from the stream:
    ///   the next [`advance`](Cursor::advance) yields the node following
    ///   the element's end tag.
    ///
    /// Errors
    /// ======
    /// - [`Error::NotAnElement`] if the cursor is not at an element.
    /// - [`Error::UnexpectedEof`] if the document ends before the
    ///   element is closed.
    pub fn expand(&mut self) -> XmlResult<Element> {
        let (mut root, self_closing) = match self.current.take() {
            Some(Node::Element {
                element,
                self_closing,
            }) => (element, self_closing),
            other => {
                self.current = other;
                return Err(Error::NotAnElement);
            }
        };

        if !self_closing {
            self.read_children(&mut root)?;
        }

        Ok(root)
    }

    /// Read nodes into `parent.children` until `parent`'s end tag.
    fn read_children(&mut self, parent: &mut Element) -> XmlResult<()> {
        loop {
            match self.next_node()? {
                None => return Err(Error::UnexpectedEof),

                Some(Node::End { .. }) => return Ok(()),

                Some(Node::Element {
                    mut element,
                    self_closing,
                }) => {
                    if !self_closing {
                        self.read_children(&mut element)?;
                    }

                    parent.children.push(element);
                }

                // Note that whitespace counts as text
                Some(Node::Text { .. }) | Some(Node::Misc { .. }) => (),
            }
        }
    }

    /// Produce the next node and maintain the nesting count.
    fn next_node(&mut self) -> XmlResult<Option<Node>> {
        self.buffer.clear();

        let node = match self.reader.read_event(&mut self.buffer)? {
            XmlEvent::Start(ele) => {
                let element = snapshot(&ele, self.nesting)?;
                self.nesting += 1;

                Node::Element {
                    element,
                    self_closing: false,
                }
            }

            XmlEvent::Empty(ele) => Node::Element {
                element: snapshot(&ele, self.nesting)?,
                self_closing: true,
            },

            XmlEvent::End(_) => {
                self.nesting = self.nesting.saturating_sub(1);

                Node::End {
                    depth: self.nesting,
                }
            }

            XmlEvent::Text(_) => Node::Text {
                depth: self.nesting,
            },

            XmlEvent::Eof => return Ok(None),

            _ => Node::Misc {
                depth: self.nesting,
            },
        };

        Ok(Some(node))
    }
}

/// Snapshot a start tag into an owned [`Element`] with no children.
fn snapshot(ele: &BytesStart, depth: usize) -> XmlResult<Element> {
    let name = utf8(ele.name())?.to_owned();

    let mut attrs = Vec::new();
    for attr in ele.attributes().with_checks(false) {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescaped_value()?;

        attrs.push(Attr {
            name: utf8(attr.key)?.to_owned(),
            value: utf8(&value)?.to_owned(),
        });
    }

    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        depth,
    })
}

fn utf8(bytes: &[u8]) -> XmlResult<&str> {
    str::from_utf8(bytes).map_err(|e| Error::from(InnerXmlError::Utf8(e)))
}

#[cfg(test)]
mod test {
    use super::*;

    type Sut<'a> = Cursor<&'a [u8]>;

    fn depths_of(doc: &[u8]) -> Vec<(String, usize)> {
        let mut sut = Sut::new(doc);
        let mut seen = vec![];

        while let Some(node) = sut.advance().unwrap() {
            let label = match node {
                Node::Element { element, .. } => element.name.clone(),
                Node::End { .. } => "/".into(),
                Node::Text { .. } => "#text".into(),
                Node::Misc { .. } => "#misc".into(),
            };

            seen.push((label, node.depth()));
        }

        seen
    }

    #[test]
    fn reports_textreader_style_depths() {
        let seen = depths_of(b"<a><b><c/></b><d/></a>");

        assert_eq!(
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("/".to_string(), 1),
                ("d".to_string(), 1),
                ("/".to_string(), 0),
            ],
            seen
        );
    }

    #[test]
    fn expand_consumes_subtree() {
        let mut sut = Sut::new(&b"<a><b x=\"1\"><c/></b><d/></a>"[..]);

        sut.advance().unwrap(); // <a>
        sut.advance().unwrap(); // <b>

        let tree = sut.expand().unwrap();
        assert_eq!("b", tree.name());
        assert_eq!(1, tree.depth());
        assert_eq!(Some("1"), tree.attr("x"));
        assert_eq!(1, tree.children.len());
        assert_eq!("c", tree.children[0].name());
        assert_eq!(2, tree.children[0].depth());

        // Cursor must now resume after </b>.
        let next = sut.advance().unwrap().unwrap();
        assert_eq!(Some("d"), next.element().map(Element::name));
        assert_eq!(1, next.depth());
    }

    #[test]
    fn expand_of_self_closing_element_has_no_children() {
        let mut sut = Sut::new(&b"<a/>"[..]);

        sut.advance().unwrap();
        let tree = sut.expand().unwrap();

        assert_eq!("a", tree.name());
        assert!(tree.children.is_empty());
        assert_eq!(None, sut.advance().unwrap());
    }

    #[test]
    fn expand_requires_element() {
        let mut sut = Sut::new(&b"<a/>"[..]);

        // Not yet advanced onto anything.
        assert_eq!(Err(Error::NotAnElement), sut.expand());
    }

    #[test]
    fn expand_fails_on_truncated_document() {
        let mut sut = Sut::new(&b"<a><b>"[..]);

        sut.advance().unwrap();
        assert_eq!(Err(Error::UnexpectedEof), sut.expand());
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let mut sut = Sut::new(&b"<a name=\"x&amp;y\"/>"[..]);

        sut.advance().unwrap();
        assert_eq!(Some("x&y"), sut.element().unwrap().attr("name"));
    }
}
