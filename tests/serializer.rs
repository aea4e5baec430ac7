// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use html5ever::rcdom::{RcDom, SerializableHandle};
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, ns, parse_document, parse_fragment, serialize, QualName};
use html5ever::driver::ParseOpts;

fn parse_and_serialize(input: &str) -> String {
    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(input);
    // The fragment parses "into" a synthetic root matching the context
    // element; serialize its children, not the synthetic root itself.
    let root = dom.document.children.borrow()[0].clone();

    let mut result = vec![];
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly,
        ..Default::default()
    };
    serialize(&mut result, &SerializableHandle(root), opts).unwrap();
    String::from_utf8(result).unwrap()
}

macro_rules! test_fn {
    ($name:ident, $input:expr, $output:expr) => {
        #[test]
        fn $name() {
            assert_eq!($output, parse_and_serialize($input));
        }
    };

    ($name:ident, $input:expr) => {
        test_fn!($name, $input, $input);
    };
}

test_fn!(empty, "");
test_fn!(smoke_test, r#"<p><i>Hello</i>, World!</p>"#);

test_fn!(
    misnest,
    r#"<p><i>Hello!</p>, World!</i>"#,
    r#"<p><i>Hello!</i></p><i>, World!</i>"#
);

test_fn!(attr_literal, r#"<base foo="<'>">"#);
test_fn!(attr_escape_amp, r#"<base foo="&amp;">"#);
test_fn!(attr_escape_amp_2, r#"<base foo=&amp>"#, r#"<base foo="&amp;">"#);
test_fn!(attr_escape_nbsp, "<base foo=x\u{a0}y>", r#"<base foo="x&nbsp;y">"#);
test_fn!(attr_escape_quot, r#"<base foo='"'>"#, r#"<base foo="&quot;">"#);
test_fn!(
    attr_escape_several,
    r#"<span foo=3 title='test "with" &amp;quot;'>"#,
    r#"<span foo="3" title="test &quot;with&quot; &amp;quot;"></span>"#
);

test_fn!(text_literal, r#"<p>"'"</p>"#);
test_fn!(text_escape_amp, r#"<p>&amp;</p>"#);
test_fn!(text_escape_amp_2, r#"<p>&amp</p>"#, r#"<p>&amp;</p>"#);
test_fn!(text_escape_nbsp, "<p>x\u{a0}y</p>", r#"<p>x&nbsp;y</p>"#);
test_fn!(text_escape_lt, r#"<p>&lt;</p>"#);
test_fn!(text_escape_gt, r#"<p>&gt;</p>"#);
test_fn!(text_escape_gt2, r#"<p>></p>"#, r#"<p>&gt;</p>"#);

test_fn!(script_literal, r#"<script>(x & 1) < 2; y > "foo" + 'bar'</script>"#);
test_fn!(style_literal, r#"<style>(x & 1) < 2; y > "foo" + 'bar'</style>"#);
test_fn!(xmp_literal, r#"<xmp>(x & 1) < 2; y > "foo" + 'bar'</xmp>"#);
test_fn!(iframe_literal, r#"<iframe>(x & 1) < 2; y > "foo" + 'bar'</iframe>"#);
test_fn!(noembed_literal, r#"<noembed>(x & 1) < 2; y > "foo" + 'bar'</noembed>"#);
test_fn!(noframes_literal, r#"<noframes>(x & 1) < 2; y > "foo" + 'bar'</noframes>"#);

test_fn!(pre_lf_0, "<pre>foo bar</pre>");
test_fn!(pre_lf_1, "<pre>\nfoo bar</pre>", "<pre>foo bar</pre>");
test_fn!(pre_lf_2, "<pre>\n\nfoo bar</pre>", "<pre>\nfoo bar</pre>");

test_fn!(textarea_lf_0, "<textarea>foo bar</textarea>");
test_fn!(textarea_lf_1, "<textarea>\nfoo bar</textarea>", "<textarea>foo bar</textarea>");
test_fn!(textarea_lf_2, "<textarea>\n\nfoo bar</textarea>", "<textarea>\nfoo bar</textarea>");

test_fn!(listing_lf_0, "<listing>foo bar</listing>");
test_fn!(listing_lf_1, "<listing>\nfoo bar</listing>", "<listing>foo bar</listing>");
test_fn!(listing_lf_2, "<listing>\n\nfoo bar</listing>", "<listing>\nfoo bar</listing>");

test_fn!(comment_1, r#"<p>hi <!--world--></p>"#);
test_fn!(comment_2, r#"<p>hi <!-- world--></p>"#);
test_fn!(comment_3, r#"<p>hi <!--world --></p>"#);
test_fn!(comment_4, r#"<p>hi <!-- world --></p>"#);

// Namespaced attribute names (`xmlns:foo`, `xlink:href`) aren't round-tripped
// by this serializer: it writes only the local part of an attribute's
// qualified name, matching the HTML serialization algorithm's "unprefixed"
// output for non-`xml`/`xlink`/`xmlns`-namespace attributes. A foreign
// element's own tag name round-trips fine, since elements never carry a
// namespace prefix in the HTML serialization.
test_fn!(foreign_element_tag_roundtrips, r#"<svg xmlns="bleh"></svg>"#);

#[test]
fn doctype_serializes_uppercased() {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one("<!doctype html>");
    // Only the DOCTYPE node, not the synthesized <html> tree.
    let doctype = dom.document.children.borrow()[0].clone();
    let mut result = vec![];
    serialize(&mut result, &SerializableHandle(doctype), SerializeOpts::default()).unwrap();
    assert_eq!(String::from_utf8(result).unwrap(), "<!DOCTYPE html>");
}

#[test]
fn children_only_scope_skips_the_root_tag() {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one("<!DOCTYPE html><html><body><p>x</p></body></html>");
    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|c| matches!(&c.data, html5ever::rcdom::NodeData::Element { .. }))
        .unwrap()
        .clone();

    let mut result = vec![];
    let opts = SerializeOpts {
        traversal_scope: html5ever::serialize::TraversalScope::ChildrenOnly,
        ..Default::default()
    };
    serialize(&mut result, &SerializableHandle(root), opts).unwrap();
    let text = String::from_utf8(result).unwrap();
    assert!(!text.starts_with("<html"));
    assert!(text.contains("<p>x</p>"));
}
