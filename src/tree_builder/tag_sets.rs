// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Predicates over an element's expanded name, used as the "tag set"
//! parameter of scope queries, `generate_implied_end_tags`, and the various
//! `pop_until*` helpers.
//!
//! Every set here is a plain `fn(ExpandedName) -> bool`; `declare_tag_set!`
//! exists only to cut down on the boilerplate of writing one out by hand,
//! either from a literal list of HTML-namespace tag names, or as an existing
//! set with some tags removed.

/// Define a tag-set predicate function.
///
/// ```ignore
/// declare_tag_set!(foster_target = "table" "tbody" "tfoot" "thead" "tr");
/// declare_tag_set!(listed = [form_associatable] - "img");
/// ```
macro_rules! declare_tag_set {
    ($name:ident = $($tag:tt)+) => {
        fn $name(name: crate::ExpandedName) -> bool {
            declare_tag_set!(@match name = $($tag)+)
        }
    };

    (@match $name:ident = [$base:ident] - $($excl:tt)+) => {
        $base($name) && !declare_tag_set!(@match $name = $($excl)+)
    };

    (@match $name:ident = $($tag:tt)+) => {
        match *$name.ns {
            ns!(html) => matches!(&*$name.local, $($tag)|+),
            _ => false,
        }
    };
}

use crate::ExpandedName;
use markup5ever::{namespace_url, ns};

/// <https://html.spec.whatwg.org/multipage/#has-an-element-in-the-specific-scope>
///
/// The default scope: applet, caption, html, table, td, th, marquee, object,
/// template, and the foreign-content integration-point boundaries that cap
/// every scope regardless of which HTML barrier set is in play.
pub(super) fn default_scope(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(
            &*name.local,
            "applet"
                | "caption"
                | "html"
                | "table"
                | "td"
                | "th"
                | "marquee"
                | "object"
                | "template"
        ),
        ns!(mathml) => matches!(&*name.local, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        ns!(svg) => matches!(&*name.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// As `default_scope`, plus `ol`/`ul` — used for "list item scope".
pub(super) fn list_item_scope(name: ExpandedName) -> bool {
    default_scope(name)
        || match *name.ns {
            ns!(html) => matches!(&*name.local, "ol" | "ul"),
            _ => false,
        }
}

/// As `default_scope`, plus `button` — used for "button scope".
pub(super) fn button_scope(name: ExpandedName) -> bool {
    default_scope(name)
        || match *name.ns {
            ns!(html) => &*name.local == "button",
            _ => false,
        }
}

/// "Table scope": only `html`, `table`, `template` cap the search.
pub(super) fn table_scope(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(&*name.local, "html" | "table" | "template"),
        _ => false,
    }
}

/// "Select scope": everything *except* `optgroup`/`option` is a barrier —
/// i.e. the search only continues through those two tags.
pub(super) fn select_scope(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => !matches!(&*name.local, "optgroup" | "option"),
        _ => true,
    }
}

/// The fixed "special" category from
/// <https://html.spec.whatwg.org/multipage/#special>.
pub(super) fn special_tag(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(
            &*name.local,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "isindex"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "optgroup"
                | "option"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        ),
        ns!(mathml) => matches!(&*name.local, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        ns!(svg) => matches!(&*name.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// h1 through h6.
pub(super) fn heading_tag(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(&*name.local, "h1" | "h2" | "h3" | "h4" | "h5" | "h6"),
        _ => false,
    }
}

/// <https://html.spec.whatwg.org/multipage/#generate-implied-end-tags>,
/// the form without an excluded tag name.
pub(super) fn cursory_implied_end(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(
            &*name.local,
            "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
        ),
        _ => false,
    }
}

/// <https://html.spec.whatwg.org/multipage/#closing-elements-that-have-implied-end-tags>,
/// the "thoroughly" variant that also closes table-structure tags.
pub(super) fn thorough_implied_end(name: ExpandedName) -> bool {
    cursory_implied_end(name)
        || match *name.ns {
            ns!(html) => matches!(
                &*name.local,
                "caption" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
            ),
            _ => false,
        }
}

/// `td` or `th`, HTML namespace only.
pub(super) fn td_th(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(&*name.local, "td" | "th"),
        _ => false,
    }
}

pub(super) fn table_body_context(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => matches!(&*name.local, "tbody" | "tfoot" | "thead"),
        _ => false,
    }
}

pub(super) fn table_row_context(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(html) => &*name.local == "tr",
        _ => false,
    }
}

/// MathML text integration points:
/// <https://html.spec.whatwg.org/multipage/#mathml-text-integration-point>
pub(super) fn mathml_text_integration_point(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(mathml) => matches!(&*name.local, "mi" | "mo" | "mn" | "ms" | "mtext"),
        _ => false,
    }
}

/// SVG elements that are HTML integration points:
/// <https://html.spec.whatwg.org/multipage/#html-integration-point>
pub(super) fn svg_html_integration_point(name: ExpandedName) -> bool {
    match *name.ns {
        ns!(svg) => matches!(&*name.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}
