// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data tables used by the tree builder, kept separate from the algorithm
//! itself because they're large and purely declarative.

use crate::tendril::StrTendril;
use crate::tokenizer::Doctype;
use crate::tree_builder::{LimitedQuirks, NoQuirks, Quirks, QuirksMode};

/// Public ID prefixes that always force quirks mode, per
/// <https://html.spec.whatwg.org/multipage/#the-initial-insertion-mode>.
static QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

static QUIRKY_PUBLIC_EXACT: &[&str] = &["-//w3o//dtd w3 html strict 3.0//en//", "-/w3c/dtd html 4.0 transitional/en", "html"];

static QUIRKY_SYSTEM_EXACT: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// Public ID prefixes that force limited-quirks mode regardless of whether a
/// system id is present.
static LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] =
    &["-//w3c//dtd xhtml 1.0 frameset//", "-//w3c//dtd xhtml 1.0 transitional//"];

/// Public ID prefixes that force limited-quirks mode only when a system id
/// is also present.
static LIMITED_QUIRKY_PUBLIC_PREFIXES_WITH_SYSTEM_ID: &[&str] =
    &["-//w3c//dtd html 4.01 frameset//", "-//w3c//dtd html 4.01 transitional//"];

fn starts_with_any(haystack: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| haystack.starts_with(p))
}

/// Decide the document's quirks mode from its `DOCTYPE`, and whether the
/// doctype should be reported as a parse error. `iframe_srcdoc` documents
/// are never put into quirks mode, per
/// <https://html.spec.whatwg.org/multipage/#parsing-html-fragments>.
pub(super) fn doctype_error_and_quirks(doctype: &Doctype, iframe_srcdoc: bool) -> (bool, QuirksMode) {
    let name = doctype.name.as_ref().map(|t| t.to_ascii_lowercase());
    let public = doctype
        .public_id
        .as_ref()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();
    let system = doctype
        .system_id
        .as_ref()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();

    let err = !matches!(
        (name.as_deref(), doctype.public_id.is_some(), doctype.system_id.as_deref()),
        (Some("html"), false, None) | (Some("html"), false, Some("about:legacy-compat"))
    );

    if iframe_srcdoc {
        return (err, NoQuirks);
    }

    if doctype.force_quirks || name.as_deref() != Some("html") {
        return (err, Quirks);
    }

    if QUIRKY_PUBLIC_EXACT.contains(&&*public) || public == QUIRKY_SYSTEM_EXACT {
        return (err, Quirks);
    }

    if starts_with_any(&public, QUIRKY_PUBLIC_PREFIXES) {
        return (err, Quirks);
    }

    if doctype.system_id.is_none() && starts_with_any(&public, &["-//w3c//dtd html 4.01 frameset//", "-//w3c//dtd html 4.01 transitional//"]) {
        return (err, Quirks);
    }

    if system == QUIRKY_SYSTEM_EXACT {
        return (err, Quirks);
    }

    if starts_with_any(&public, LIMITED_QUIRKY_PUBLIC_PREFIXES) {
        return (err, LimitedQuirks);
    }

    if doctype.system_id.is_some() && starts_with_any(&public, LIMITED_QUIRKY_PUBLIC_PREFIXES_WITH_SYSTEM_ID) {
        return (err, LimitedQuirks);
    }

    (err, NoQuirks)
}
