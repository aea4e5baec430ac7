// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use html5ever::interface::QuirksMode;
use html5ever::rcdom::{Handle, NodeData, RcDom};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_prefix, ns, parse_document, parse_fragment, ParseOpts};
use html5ever::{LocalName, QualName};

fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

fn children(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().clone()
}

fn element_name(handle: &Handle) -> LocalName {
    match handle.data {
        NodeData::Element { ref name, .. } => name.local.clone(),
        _ => panic!("not an element"),
    }
}

fn text_contents(handle: &Handle) -> String {
    match handle.data {
        NodeData::Text { ref contents } => contents.borrow().to_string(),
        _ => panic!("not a text node"),
    }
}

fn find_child(handle: &Handle, local: &LocalName) -> Option<Handle> {
    children(handle).into_iter().find(|c| match c.data {
        NodeData::Element { ref name, .. } => &name.local == local,
        _ => false,
    })
}

fn html_root(dom: &RcDom) -> Handle {
    find_child(&dom.document, &local_name!("html")).expect("no root html element")
}

#[test]
fn doctype_and_empty_body() {
    let dom = parse("<!DOCTYPE html><html><body></body></html>");
    assert_eq!(dom.quirks_mode.get(), QuirksMode::NoQuirks);
    assert!(dom.errors.borrow().is_empty());

    let doctype = children(&dom.document)
        .into_iter()
        .find(|c| matches!(c.data, NodeData::Doctype { .. }))
        .expect("no doctype node");
    match doctype.data {
        NodeData::Doctype { ref name, .. } => assert_eq!(&**name, "html"),
        _ => unreachable!(),
    }

    let root = html_root(&dom);
    assert!(find_child(&root, &local_name!("head")).is_some());
    let body = find_child(&root, &local_name!("body")).expect("no body element");
    assert!(children(&body).is_empty());
}

#[test]
fn missing_doctype_triggers_quirks_mode() {
    let dom = parse("<html><body>Hi</body></html>");
    assert_eq!(dom.quirks_mode.get(), QuirksMode::Quirks);
    assert_eq!(dom.errors.borrow().len(), 1);

    let root = html_root(&dom);
    let body = find_child(&root, &local_name!("body")).unwrap();
    let body_children = children(&body);
    assert_eq!(body_children.len(), 1);
    assert_eq!(text_contents(&body_children[0]), "Hi");
}

#[test]
fn foster_parents_stray_table_text() {
    let dom = parse("<table>X<tr><td>Y</td></tr></table>");
    assert_eq!(dom.errors.borrow().len(), 1);

    let root = html_root(&dom);
    let body = find_child(&root, &local_name!("body")).unwrap();
    let body_children = children(&body);

    let table_pos = body_children
        .iter()
        .position(|c| matches!(&c.data, NodeData::Element { name, .. } if name.local == local_name!("table")))
        .expect("no table element");
    assert!(table_pos > 0, "foster-parented text must precede <table>");
    assert_eq!(text_contents(&body_children[table_pos - 1]), "X");

    let table = &body_children[table_pos];
    assert!(
        children(table).iter().all(|c| !matches!(&c.data, NodeData::Text { .. })),
        "stray text must not end up inside <table>"
    );
}

#[test]
fn adoption_agency_reparents_formatting_elements() {
    let dom = parse("<p>1<b>2<i>3</b>4</i>5</p>");
    let root = html_root(&dom);
    let body = find_child(&root, &local_name!("body")).unwrap();
    let p = find_child(&body, &local_name!("p")).expect("no <p> element");
    let p_children = children(&p);

    assert_eq!(p_children.len(), 4);
    assert_eq!(text_contents(&p_children[0]), "1");

    assert_eq!(element_name(&p_children[1]), local_name!("b"));
    let b_children = children(&p_children[1]);
    assert_eq!(text_contents(&b_children[0]), "2");
    assert_eq!(element_name(&b_children[1]), local_name!("i"));
    assert_eq!(text_contents(&children(&b_children[1])[0]), "3");

    assert_eq!(element_name(&p_children[2]), local_name!("i"));
    assert_eq!(text_contents(&children(&p_children[2])[0]), "4");

    assert_eq!(text_contents(&p_children[3]), "5");
}

#[test]
fn fragment_parse_of_td_context() {
    let context = QualName::new(None, ns!(html), local_name!("tr"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![]).one("<td>hi</td>");

    // The fragment case parses "into" a synthetic root; its children are the
    // parsed fragment, not wrapped in an <html>/<body> pair.
    let root_children = children(&dom.document);
    assert_eq!(root_children.len(), 1);
    let root = &root_children[0];
    let root_children = children(root);
    assert_eq!(root_children.len(), 1);

    let td = &root_children[0];
    assert_eq!(element_name(td), local_name!("td"));
    let td_children = children(td);
    assert_eq!(td_children.len(), 1);
    assert_eq!(text_contents(&td_children[0]), "hi");

    assert!(dom.errors.borrow().is_empty());
}

#[test]
fn svg_elements_keep_foreign_namespace() {
    let dom = parse("<!DOCTYPE html><html><body><svg><circle/></svg></body></html>");
    let root = html_root(&dom);
    let body = find_child(&root, &local_name!("body")).unwrap();
    let svg = find_child(&body, &local_name!("svg")).expect("no <svg> element");
    match svg.data {
        NodeData::Element { ref name, .. } => assert_eq!(name.ns, ns!(svg)),
        _ => unreachable!(),
    }
}

#[test]
fn xlink_attribute_gets_namespaced() {
    let dom = parse(
        r#"<!DOCTYPE html><html><body><svg><a xlink:href="#x"></a></svg></body></html>"#,
    );
    let root = html_root(&dom);
    let body = find_child(&root, &local_name!("body")).unwrap();
    let svg = find_child(&body, &local_name!("svg")).unwrap();
    let a = find_child(&svg, &local_name!("a")).expect("no <a> inside <svg>");
    match a.data {
        NodeData::Element { ref attrs, .. } => {
            let attr = attrs
                .borrow()
                .iter()
                .find(|a| a.name.local == local_name!("href"))
                .cloned()
                .expect("no href attribute");
            assert_eq!(attr.name.ns, ns!(xlink));
            assert_eq!(attr.name.prefix, Some(namespace_prefix!("xlink")));
        },
        _ => unreachable!(),
    }
}
