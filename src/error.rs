// Copyright 2014-2025 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structured classification of the parse errors the tree builder and
//! tokenizer report.
//!
//! [`TreeSink::parse_error`] takes a freeform message, which is what the
//! tree builder and tokenizer actually call at each of their ~80-odd error
//! sites — that keeps those sites terse and matched to the exact wording in
//! the HTML standard's parse-error list. [`ErrorCode`] is an additive layer
//! on top: a consumer that wants to match on error *kind* rather than
//! scrape message text can classify a reported message with
//! [`ErrorCode::classify`], or a sink that tracks source positions can pair
//! a code with a line/column into a [`ParseErrorEventArgs`].
//!
//! [`TreeSink::parse_error`]: crate::interface::TreeSink::parse_error

use std::fmt;

/// One of the kinds of parse error defined by the HTML tree construction
/// algorithm (<https://html.spec.whatwg.org/multipage/parsing.html#parse-errors>),
/// plus a handful that cover tokenizer-level and programmer-contract
/// failures this crate also reports through the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    // Doctype errors.
    DoctypeMissing,
    DoctypeInvalid,
    DoctypeTagInappropriate,
    DoctypeOnlyCommentsAndWhitespaceExpected,
    MissingDoctypePublicId,
    MissingDoctypeSystemId,
    ExtraContentAfterDoctype,

    // Misplaced/duplicate structural tags.
    HtmlTagMisplaced,
    BodyTagMisplaced,
    FramesetMisplaced,
    HeadTagMisplaced,
    DuplicateHtmlStartTag,
    DuplicateBodyStartTag,
    DuplicateFramesetStartTag,

    // "Can't start/end here" generic handlers.
    TagCannotStartHere,
    TagCannotEndHere,
    UnexpectedStartTagInHead,
    UnexpectedEndTagInHead,
    UnexpectedTokenInTableText,
    UnexpectedCharacterInTable,
    UnexpectedTokenInForeignContent,

    // Formatting-element / scope errors.
    HeadingNested,
    AnchorNested,
    NobrInScope,
    ButtonInScope,
    NestedButtonTag,
    NestedFormTag,
    NestedHeadingTags,
    FormAlreadyOpen,
    FormElementNotInScope,
    FormElementPointerIsNull,

    // Table structural errors.
    TableNesting,
    NonSpaceCharacterInTable,
    UnexpectedCellEndTag,
    UnexpectedTableCellStart,
    StrayTableContent,

    // Adoption agency ("Heisenberg") algorithm errors.
    FormattingElementNotFound,
    FormattingElementNotInScope,
    FormattingElementNotCurrentNode,
    NoMatchingTagToClose,

    // Stack of open elements / scope errors.
    ElementNotInScope,
    TagClosedWrong,
    TagDoesNotMatchCurrentNode,
    TagClosingMismatch,
    CurrentNodeIsRoot,
    CurrentNodeIsNotRoot,
    UnexpectedNodeOnStack,
    BadOpenElementOnClose,

    // End-tag/body-frameset closing.
    BodyEndTagWithoutBodyInScope,
    HtmlEndTagWithoutBodyInScope,
    NoHeadingTagToClose,
    NoOpenPTagToClose,

    // Fragment / select / template.
    SelectInSelectScope,
    OptionOrOptgroupMismatch,
    TemplateEndTagMismatch,
    UnexpectedTemplateInsertionMode,

    // Tokenizer-level conditions surfaced the same way.
    TokenNotPossible,
    Eof,
    UnexpectedNullCharacter,
    InvalidCharacterReference,
    UnexpectedCharacterAfterDoctypeSystemId,
    SurrogateCharacterReference,
    ControlCharacterReference,
    NoncharacterCharacterReference,

    /// Anything this crate reports that doesn't correspond to one of the
    /// standard's named cases above. Carries no data: inspect the message
    /// text passed to `parse_error` for detail.
    Other,
}

impl ErrorCode {
    /// Best-effort classification of a message passed to
    /// [`TreeSink::parse_error`][crate::interface::TreeSink::parse_error] by
    /// this crate's tree builder or tokenizer.
    ///
    /// The tree builder's error sites are worded to match the HTML
    /// standard's own text rather than to carry a stable machine-readable
    /// tag, so this is a substring match over known phrasings, not a
    /// reverse mapping: treat the result as a convenience default for
    /// simple consumers, not as a closed, versioned contract.
    pub fn classify(message: &str) -> ErrorCode {
        let m = message.to_ascii_lowercase();
        if m.contains("doctype") {
            if m.contains("public") {
                ErrorCode::MissingDoctypePublicId
            } else if m.contains("system") {
                ErrorCode::MissingDoctypeSystemId
            } else {
                ErrorCode::DoctypeInvalid
            }
        } else if m.contains("heading") {
            if m.contains("clos") {
                ErrorCode::NoHeadingTagToClose
            } else {
                ErrorCode::HeadingNested
            }
        } else if m.contains("nobr") {
            ErrorCode::NobrInScope
        } else if m.contains("form") {
            if m.contains("not in scope") {
                ErrorCode::FormElementNotInScope
            } else if m.contains("null") {
                ErrorCode::FormElementPointerIsNull
            } else if m.contains("nested") {
                ErrorCode::NestedFormTag
            } else {
                ErrorCode::FormAlreadyOpen
            }
        } else if m.contains("button") {
            ErrorCode::NestedButtonTag
        } else if m.contains("</body>") {
            ErrorCode::BodyEndTagWithoutBodyInScope
        } else if m.contains("</html>") {
            ErrorCode::HtmlEndTagWithoutBodyInScope
        } else if m.contains("</p>") || m.contains("no <p>") {
            ErrorCode::NoOpenPTagToClose
        } else if m.contains("table") {
            ErrorCode::TableNesting
        } else if m.contains("no matching tag") {
            ErrorCode::NoMatchingTagToClose
        } else {
            ErrorCode::Other
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A parse error paired with the source position it occurred at, the shape
/// an event-based host surfaces to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorEventArgs {
    pub code: ErrorCode,
    pub message: std::borrow::Cow<'static, str>,
    pub line: u64,
    pub column: u64,
}

impl ParseErrorEventArgs {
    pub fn new(message: std::borrow::Cow<'static, str>, line: u64, column: u64) -> Self {
        ParseErrorEventArgs {
            code: ErrorCode::classify(&message),
            message,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_messages() {
        assert_eq!(ErrorCode::classify("No <p> tag to close"), ErrorCode::NoOpenPTagToClose);
        assert_eq!(
            ErrorCode::classify("</body> with no <body> in scope"),
            ErrorCode::BodyEndTagWithoutBodyInScope
        );
        assert_eq!(ErrorCode::classify("Nested <nobr>"), ErrorCode::NobrInScope);
    }

    #[test]
    fn falls_back_to_other() {
        assert_eq!(ErrorCode::classify("some unrelated message"), ErrorCode::Other);
    }

    #[test]
    fn event_args_carries_position() {
        let args = ParseErrorEventArgs::new(std::borrow::Cow::Borrowed("No <p> tag to close"), 3, 7);
        assert_eq!(args.code, ErrorCode::NoOpenPTagToClose);
        assert_eq!(args.line, 3);
        assert_eq!(args.column, 7);
    }
}
