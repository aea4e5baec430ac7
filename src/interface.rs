// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The interface the tree builder uses to mutate the consumer's document.
//!
//! A consumer of this crate provides its own document/DOM implementation by
//! implementing [`TreeSink`]. The tree builder never touches the consumer's
//! node representation directly; it only holds `TreeSink::Handle` values as
//! back references, mirroring the "stack of open elements is a set of
//! back-pointers, not ownership" rule the tree-construction algorithm
//! depends on.
//!
//! Every method takes `&self`: the tree builder itself is driven through
//! `&self` (its own mutable state lives behind `Cell`/`RefCell`), so a sink
//! is expected to do the same — wrap whatever it needs to mutate (e.g. a
//! reference-counted node graph) behind interior mutability, the way
//! [`crate::rcdom::RcDom`] does.

use std::borrow::Cow;

use crate::tendril::StrTendril;
use crate::{ExpandedName, LocalName, Namespace, QualName};

use markup5ever::ns;
pub use markup5ever::Attribute;

/// A document's quirks mode, as decided from its `DOCTYPE` (or lack of one).
///
/// <https://html.spec.whatwg.org/multipage/#concept-document-quirks>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuirksMode {
    Quirks,
    LimitedQuirks,
    NoQuirks,
}

pub use self::QuirksMode::{LimitedQuirks, NoQuirks, Quirks};

/// Something which can be inserted into the DOM.
///
/// Adjacent sibling text nodes are merged by the sink where the standard
/// requires it; this type distinguishes "new text, append or merge with the
/// previous sibling" from "a fully-formed node, insert as given".
pub enum NodeOrText<Handle> {
    AppendNode(Handle),
    AppendText(StrTendril),
}

pub use self::NodeOrText::{AppendNode, AppendText};

/// Flags accompanying a call to [`TreeSink::create_element`], carrying
/// context the tree builder has already computed so the sink does not need
/// to re-derive it from the tag name.
#[derive(Clone, Copy, Default, Debug)]
pub struct ElementFlags {
    /// This element is a `template` element; the sink is expected to create
    /// an associated template contents document fragment, retrievable later
    /// through [`TreeSink::get_template_contents`].
    pub template: bool,

    /// This is a MathML `annotation-xml` element whose `encoding` attribute
    /// is an ASCII case-insensitive match for `"text/html"` or
    /// `"application/xhtml+xml"` — an HTML integration point.
    pub mathml_annotation_xml_integration_point: bool,
}

/// The name of an element, as reported back by a [`TreeSink`].
///
/// Kept distinct from `ExpandedName` so a sink backed by an owned DOM (where
/// borrowing a name out of a `RefCell`-guarded node and handing out a
/// reference tied to `&self` is awkward) can hand back an owned `QualName`
/// instead.
pub enum ElemName<'a> {
    Ref(ExpandedName<'a>),
    Owned(QualName),
}

impl<'a> ElemName<'a> {
    pub fn ns(&self) -> &Namespace {
        match *self {
            ElemName::Ref(ref expanded) => expanded.ns,
            ElemName::Owned(ref qual) => &qual.ns,
        }
    }

    pub fn local_name(&self) -> &LocalName {
        match *self {
            ElemName::Ref(ref expanded) => expanded.local,
            ElemName::Owned(ref qual) => &qual.local,
        }
    }

    pub fn expanded(&self) -> ExpandedName<'_> {
        match *self {
            ElemName::Ref(expanded) => expanded,
            ElemName::Owned(ref qual) => qual.expanded(),
        }
    }
}

impl<'a> From<ExpandedName<'a>> for ElemName<'a> {
    fn from(expanded: ExpandedName<'a>) -> Self {
        ElemName::Ref(expanded)
    }
}

impl From<QualName> for ElemName<'static> {
    fn from(qual: QualName) -> Self {
        ElemName::Owned(qual)
    }
}

/// Something which can visit all the back-references a [`TreeSink`] holds,
/// for consumers doing cycle-collected or arena garbage collection.
pub trait Tracer {
    type Handle;
    fn trace_handle(&self, node: &Self::Handle);
}

/// The interface given to the tree builder by a consumer-provided document.
///
/// Methods taking a `&Self::Handle` never take ownership: handles are back
/// references into the consumer's own tree, and the tree's parent/child
/// edges are the single source of truth for node lifetime. The tree builder
/// keeps its own copies of handles only in the open-element stack and the
/// active-formatting list, and drops them from both the moment a node stops
/// being reachable through the DOM.
pub trait TreeSink {
    /// The overall result of parsing.
    type Output;

    /// Consume this sink and return the overall result of parsing.
    fn finish(self) -> Self::Output;

    /// Handle to a DOM node.
    type Handle: Clone;

    /// Signal a parse error.
    fn parse_error(&self, msg: Cow<'static, str>);

    /// Get a handle to the `Document` node.
    fn get_document(&self) -> Self::Handle;

    /// Do two handles refer to the same node?
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool;

    /// What is the name of this element?
    ///
    /// Should never be called on a non-element node.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ElemName<'a>;

    /// Set the document's quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode);

    /// Create an element.
    ///
    /// When a `template` element is created, the implementation must ensure
    /// a new `DocumentFragment` is created, and that
    /// [`TreeSink::get_template_contents`] called on the new element returns
    /// it.
    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags)
        -> Self::Handle;

    /// Create a comment node.
    fn create_comment(&self, text: StrTendril) -> Self::Handle;

    /// Create a Processing Instruction node.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle;

    /// Append a node as the last child of the given node. If this would
    /// produce adjacent sibling text nodes, it should concatenate the text
    /// instead.
    ///
    /// The child node will not already have a parent.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>);

    /// Append a node as the sibling immediately before the given node. The
    /// tree builder promises that `sibling` is not a text node; its old
    /// previous sibling, if any, may be, and the implementation must merge
    /// adjacent text nodes there too.
    ///
    /// `new_node` may have an old parent, from which it should be removed.
    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>);

    /// Called instead of `append` when the tree builder has decided a node
    /// must be foster-parented. `element` is the foster-parent candidate (a
    /// table); `prev_element` is the element immediately preceding it on the
    /// stack of open elements at the time foster parenting was decided.
    ///
    /// If `element` has a parent, insert `child` immediately before
    /// `element` in that parent; otherwise append `child` to `prev_element`.
    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    );

    /// Append a `DOCTYPE` element to the `Document` node.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    );

    /// Add each attribute to the given element, if no attribute with that
    /// name already exists. The tree builder promises this will never be
    /// called with something other than an element.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>);

    /// Detach the given node from its parent.
    fn remove_from_parent(&self, target: &Self::Handle);

    /// Remove all the children from a node and append them to a new parent.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle);

    /// Mark a HTML `<script>` element as "already started".
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Indicate that a node was popped off the stack of open elements.
    fn pop(&self, _node: &Self::Handle) {}

    /// Get the template element's template contents, so the tree builder
    /// can continue to parse "into" it after the closing `</template>` tag.
    ///
    /// Should only be called on template elements.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle;

    /// Whether the sink allows a declarative shadow root to be attached at
    /// this element (a `<template shadowrootmode>` child of a shadow host).
    ///
    /// Implementations that don't model shadow roots may always return
    /// `false`, the default.
    fn allow_declarative_shadow_roots(&self, _intended_parent: &Self::Handle) -> bool {
        false
    }

    /// Is this node a MathML `annotation-xml` element with an HTML encoding?
    ///
    /// Consulted when deciding whether an `<svg>` start tag inside
    /// `annotation-xml` should be treated as HTML or foreign content.
    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    /// Called whenever the current source line changes, so implementations
    /// that track source positions can record it against subsequently
    /// created nodes. Most consumers can ignore this.
    fn set_current_line(&self, _line_number: u64) {}
}

/// Create an element, deriving `ElementFlags` from the element's name the
/// way the HTML standard's own node-creation algorithm does: the `template`
/// special case (§3.2.4 "Node creation" in the HTML Living Standard). The
/// `annotation-xml` integration-point flag cannot be derived from the name
/// alone, so callers that need it (the tree builder itself, when inserting
/// foreign start tags) set `ElementFlags` and call
/// [`TreeSink::create_element`] directly instead.
pub fn create_element<Sink: TreeSink>(
    sink: &Sink,
    name: QualName,
    attrs: Vec<Attribute>,
) -> Sink::Handle {
    let mut flags = ElementFlags::default();
    if name.ns == ns!(html) && &*name.local == "template" {
        flags.template = true;
    }
    sink.create_element(name, attrs, flags)
}
