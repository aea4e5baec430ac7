// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! High-level interface to the parser, tying the tokenizer and tree builder
//! together behind a single [`tendril::TendrilSink`].
//!
//! This is the entry point described as the "external interface" of the
//! tree constructor: construct with a [`TreeSink`] and [`ParseOpts`], then
//! feed it Unicode (or, via [`Parser::from_utf8`], raw UTF-8 bytes) a chunk
//! at a time, or all at once with `tendril::TendrilSink::one`. Fragment
//! parsing is entered through [`parse_fragment`], which runs the reset
//! algorithm against the supplied context element before any token is fed.

use std::borrow::Cow;

use crate::buffer_queue::BufferQueue;
use crate::interface::TreeSink;
use crate::tendril;
use crate::tendril::stream::{TendrilSink, Utf8LossyDecoder};
use crate::tendril::StrTendril;
use crate::tokenizer::{Tokenizer, TokenizerOpts, TokenizerResult};
use crate::tree_builder::{create_element, TreeBuilder, TreeBuilderOpts};
use crate::{Attribute, QualName};

/// All-encompassing options struct for the parser.
#[derive(Clone, Default)]
pub struct ParseOpts {
    /// Tokenizer options.
    pub tokenizer: TokenizerOpts,

    /// Tree builder options.
    pub tree_builder: TreeBuilderOpts,
}

/// Parse an HTML document.
///
/// The returned value implements [`tendril::TendrilSink`] so that Unicode
/// input may be provided incrementally, or all at once with `.one(...)`.
/// If your input is bytes rather than `&str`/`StrTendril`, use
/// [`Parser::from_utf8`].
pub fn parse_document<Sink>(sink: Sink, opts: ParseOpts) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let tb = TreeBuilder::new(sink, opts.tree_builder);
    let tok = Tokenizer::new(tb, opts.tokenizer);
    Parser {
        tokenizer: tok,
        input_buffer: BufferQueue::new(),
    }
}

/// Parse an HTML fragment.
///
/// `context_name`/`context_attrs` describe the element that would contain
/// the fragment (e.g. `tr` when parsing the innerHTML of a table row); a
/// context element is created via `TreeSink::create_element` and the
/// reset algorithm (§4.1) is run against it before any input is consumed.
///
/// The returned value implements [`tendril::TendrilSink`], as in
/// [`parse_document`].
pub fn parse_fragment<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_name: QualName,
    context_attrs: Vec<Attribute>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let context_elem = create_element(&sink, context_name, context_attrs);
    parse_fragment_for_element(sink, opts, context_elem, None)
}

/// Like [`parse_fragment`], but with an already-created context element
/// (and, optionally, the most recent open `form` ancestor in the original
/// document, needed so `form_elem` is seeded correctly).
pub fn parse_fragment_for_element<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_element: Sink::Handle,
    form_element: Option<Sink::Handle>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let scripting_enabled = opts.tree_builder.scripting_enabled;
    let tb = TreeBuilder::new_for_fragment(sink, context_element, form_element, opts.tree_builder);
    let tok_opts = TokenizerOpts {
        initial_state: Some(tb.tokenizer_state_for_context_elem(scripting_enabled)),
        ..opts.tokenizer
    };
    let tok = Tokenizer::new(tb, tok_opts);
    Parser {
        tokenizer: tok,
        input_buffer: BufferQueue::new(),
    }
}

/// An HTML parser, ready to receive Unicode input through the
/// [`tendril::TendrilSink`] trait's methods.
pub struct Parser<Sink>
where
    Sink: TreeSink,
{
    pub tokenizer: Tokenizer<TreeBuilder<Sink::Handle, Sink>>,
    pub input_buffer: BufferQueue,
}

impl<Sink: TreeSink> TendrilSink<tendril::fmt::UTF8> for Parser<Sink> {
    fn process(&mut self, t: StrTendril) {
        self.input_buffer.push_back(t);
        // The tree builder only yields `Script` when it wants the host to
        // run a script before more input is tokenized; without a host we
        // just keep feeding, which is the `parser-pause`-free happy path.
        while let TokenizerResult::Script(_) = self.tokenizer.feed(&self.input_buffer) {}
    }

    fn error(&mut self, desc: Cow<'static, str>) {
        self.tokenizer.sink.sink.parse_error(desc);
    }

    type Output = Sink::Output;

    fn finish(self) -> Self::Output {
        while let TokenizerResult::Script(_) = self.tokenizer.feed(&self.input_buffer) {}
        assert!(self.input_buffer.is_empty());
        self.tokenizer.end();
        self.tokenizer.sink.sink.finish()
    }
}

impl<Sink: TreeSink> Parser<Sink> {
    /// Wrap this parser into a `TendrilSink` that accepts UTF-8 bytes,
    /// decoding lossily (like `String::from_utf8_lossy`).
    ///
    /// Use this when the input is a byte stream rather than already-decoded
    /// Unicode text.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_utf8(self) -> Utf8LossyDecoder<Self> {
        Utf8LossyDecoder::new(self)
    }
}
