// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializing a (possibly partial) DOM tree back to HTML text.
//!
//! This is a collaborator, not part of the tree constructor proper: it only
//! needs to agree with the tree builder on what a node is (a [`QualName`],
//! an [`AttrRef`] iterator, text/comment/doctype/PI strings), not on how the
//! tree got built.

use std::io;

use markup5ever::local_name;

use crate::QualName;

/// How much of a node's subtree to serialize.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TraversalScope {
    /// Serialize the node itself, then its children.
    IncludeNode,
    /// Serialize only the node's children (used for "innerHTML"-style output).
    ChildrenOnly,
}

/// A node (or a handle standing in for one) that knows how to walk itself
/// and report each step to a [`Serializer`].
pub trait Serialize {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer;
}

/// Receives a depth-first walk of a tree being serialized. Implementations
/// decide the wire format; [`HtmlSerializer`] is the HTML one.
pub trait Serializer {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>;

    fn end_elem(&mut self, name: QualName) -> io::Result<()>;

    fn write_text(&mut self, text: &str) -> io::Result<()>;

    fn write_comment(&mut self, text: &str) -> io::Result<()>;

    fn write_doctype(&mut self, name: &str) -> io::Result<()>;

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()>;
}

pub type AttrRef<'a> = (&'a QualName, &'a str);

/// Options controlling [`serialize`].
#[derive(Clone, Copy, Debug)]
pub struct SerializeOpts {
    /// Is scripting enabled? Affects whether `<noscript>` contents are
    /// escaped as plain text (scripting enabled) or serialized as markup.
    pub scripting_enabled: bool,

    /// Serialize only the node's children, not the node itself.
    pub traversal_scope: TraversalScope,
}

impl Default for SerializeOpts {
    fn default() -> SerializeOpts {
        SerializeOpts {
            scripting_enabled: true,
            traversal_scope: TraversalScope::IncludeNode,
        }
    }
}

/// Serialize `node` to `writer` as HTML text.
pub fn serialize<Wr, T>(writer: Wr, node: &T, opts: SerializeOpts) -> io::Result<()>
where
    Wr: io::Write,
    T: Serialize,
{
    let mut ser = HtmlSerializer::new(writer, opts);
    node.serialize(&mut ser, opts.traversal_scope)
}

struct ElemInfo {
    html_name: Option<markup5ever::LocalName>,
    ignore_children: bool,
    processed_first_child: bool,
}

/// Elements whose end tag is never written and which may never have
/// children, per the HTML "void elements" list.
fn is_void_html_element(name: &markup5ever::LocalName) -> bool {
    matches!(
        *name,
        local_name!("area")
            | local_name!("base")
            | local_name!("basefont")
            | local_name!("bgsound")
            | local_name!("br")
            | local_name!("col")
            | local_name!("embed")
            | local_name!("frame")
            | local_name!("hr")
            | local_name!("img")
            | local_name!("input")
            | local_name!("keygen")
            | local_name!("link")
            | local_name!("meta")
            | local_name!("param")
            | local_name!("source")
            | local_name!("track")
            | local_name!("wbr")
    )
}

/// Elements whose text content is never escaped.
fn is_raw_text_container(name: &markup5ever::LocalName) -> bool {
    matches!(
        *name,
        local_name!("style")
            | local_name!("script")
            | local_name!("xmp")
            | local_name!("iframe")
            | local_name!("noembed")
            | local_name!("noframes")
            | local_name!("plaintext")
    )
}

/// HTML-flavored [`Serializer`]: writes start/end tags, escapes text and
/// attribute values per the HTML fragment serialization algorithm
/// (<https://html.spec.whatwg.org/multipage/#serialising-html-fragments>),
/// and never emits an end tag for a void element.
pub struct HtmlSerializer<Wr> {
    writer: Wr,
    opts: SerializeOpts,
    stack: Vec<ElemInfo>,
}

impl<Wr: io::Write> HtmlSerializer<Wr> {
    pub fn new(writer: Wr, opts: SerializeOpts) -> Self {
        HtmlSerializer {
            writer,
            opts,
            stack: vec![ElemInfo {
                html_name: None,
                ignore_children: false,
                processed_first_child: false,
            }],
        }
    }

    fn parent(&mut self) -> &mut ElemInfo {
        self.stack.last_mut().expect("no parent ElemInfo")
    }

    fn write_escaped(&mut self, text: &str, attr_mode: bool) -> io::Result<()> {
        for c in text.chars() {
            match c {
                '&' => self.writer.write_all(b"&amp;")?,
                '\u{00A0}' => self.writer.write_all(b"&nbsp;")?,
                '"' if attr_mode => self.writer.write_all(b"&quot;")?,
                '<' if !attr_mode => self.writer.write_all(b"&lt;")?,
                '>' if !attr_mode => self.writer.write_all(b"&gt;")?,
                c => write!(self.writer, "{c}")?,
            }
        }
        Ok(())
    }
}

impl<Wr: io::Write> Serializer for HtmlSerializer<Wr> {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        let html_name = if name.ns == markup5ever::ns!(html) {
            Some(name.local.clone())
        } else {
            None
        };

        if self.parent().ignore_children {
            self.stack.push(ElemInfo {
                html_name,
                ignore_children: true,
                processed_first_child: false,
            });
            return Ok(());
        }

        self.writer.write_all(b"<")?;
        self.writer.write_all(name.local.as_bytes())?;
        for (attr_name, value) in attrs {
            self.writer.write_all(b" ")?;
            self.writer.write_all(attr_name.local.as_bytes())?;
            self.writer.write_all(b"=\"")?;
            self.write_escaped(value, true)?;
            self.writer.write_all(b"\"")?;
        }
        self.writer.write_all(b">")?;

        let ignore_children = html_name.as_ref().is_some_and(is_void_html_element);

        self.parent().processed_first_child = true;

        self.stack.push(ElemInfo {
            html_name,
            ignore_children,
            processed_first_child: false,
        });

        Ok(())
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        let info = self.stack.pop().expect("no ElemInfo");
        if info.ignore_children {
            return Ok(());
        }

        self.writer.write_all(b"</")?;
        self.writer.write_all(name.local.as_bytes())?;
        self.writer.write_all(b">")
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let prepend_lf = text.starts_with('\n') && {
            let parent = self.parent();
            !parent.processed_first_child
                && matches!(
                    parent.html_name,
                    Some(ref n) if *n == local_name!("pre")
                        || *n == local_name!("textarea")
                        || *n == local_name!("listing")
                )
        };

        if prepend_lf {
            self.writer.write_all(b"\n")?;
        }

        let escape = match self.parent().html_name {
            Some(ref n) if is_raw_text_container(n) => false,
            Some(ref n) if *n == local_name!("noscript") => !self.opts.scripting_enabled,
            _ => true,
        };

        if escape {
            self.write_escaped(text, false)
        } else {
            self.writer.write_all(text.as_bytes())
        }
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(b"<!--")?;
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"-->")
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_all(b"<!DOCTYPE ")?;
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b">")
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        self.writer.write_all(b"<?")?;
        self.writer.write_all(target.as_bytes())?;
        self.writer.write_all(b" ")?;
        self.writer.write_all(data.as_bytes())?;
        self.writer.write_all(b">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcdom::{Handle, NodeData, RcDom, SerializableHandle};
    use crate::tendril::TendrilSink;
    use crate::{driver, ParseOpts};

    fn parse(html: &str) -> RcDom {
        driver::parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes())
    }

    fn to_html(handle: Handle, opts: SerializeOpts) -> String {
        let mut buf = Vec::new();
        serialize(&mut buf, &SerializableHandle(handle), opts).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn find_body(dom: &RcDom) -> Handle {
        fn walk(node: &Handle) -> Option<Handle> {
            if let NodeData::Element { ref name, .. } = node.data {
                if name.local == local_name!("body") {
                    return Some(node.clone());
                }
            }
            for child in node.children.borrow().iter() {
                if let Some(found) = walk(child) {
                    return Some(found);
                }
            }
            None
        }
        walk(&dom.document).expect("no body element")
    }

    #[test]
    fn round_trips_simple_element() {
        let dom = parse("<!DOCTYPE html><html><body><p>hi</p></body></html>");
        let body = find_body(&dom);
        let html = to_html(body, SerializeOpts::default());
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let dom = parse(r#"<!DOCTYPE html><html><body><p title="a &amp; b">x &lt; y</p></body></html>"#);
        let body = find_body(&dom);
        let html = to_html(body, SerializeOpts::default());
        assert!(html.contains("title=\"a &amp; b\""));
        assert!(html.contains("x &lt; y"));
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let dom = parse("<!DOCTYPE html><html><body><br><img src=\"x\"></body></html>");
        let body = find_body(&dom);
        let html = to_html(body, SerializeOpts::default());
        assert!(html.contains("<br>"));
        assert!(!html.contains("</br>"));
        assert!(!html.contains("</img>"));
    }

    #[test]
    fn children_only_scope_omits_outer_tag() {
        let dom = parse("<!DOCTYPE html><html><body><div>x</div></body></html>");
        let body = find_body(&dom);
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly,
            ..Default::default()
        };
        let html = to_html(body, opts);
        assert!(!html.starts_with("<body"));
        assert!(html.contains("<div>x</div>"));
    }
}
