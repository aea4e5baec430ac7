// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cell::RefCell;
use std::mem;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, CharacterTokens, CommentToken, DoctypeToken, EndTag, NullCharacterToken,
    ParseError, StartTag, Tag, TagKind, TagToken, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use html5ever::LocalName;

/// Splits a string at every character boundary, to exercise the tokenizer's
/// incremental-feed path the way a streaming reader would.
fn splits(s: &str) -> Vec<StrTendril> {
    s.char_indices()
        .map(|(i, c)| StrTendril::from_slice(&s[i..i + c.len_utf8()]))
        .collect()
}

struct TokenLogger {
    tokens: RefCell<Vec<Token>>,
    current_str: RefCell<StrTendril>,
    errors: RefCell<usize>,
}

impl TokenLogger {
    fn new() -> TokenLogger {
        TokenLogger {
            tokens: RefCell::new(vec![]),
            current_str: RefCell::new(StrTendril::new()),
            errors: RefCell::new(0),
        }
    }

    fn push(&self, token: Token) {
        self.finish_str();
        self.tokens.borrow_mut().push(token);
    }

    fn finish_str(&self) {
        if !self.current_str.borrow().is_empty() {
            let s = mem::replace(&mut *self.current_str.borrow_mut(), StrTendril::new());
            self.tokens.borrow_mut().push(CharacterTokens(s));
        }
    }

    fn into_tokens(self) -> Vec<Token> {
        self.finish_str();
        self.tokens.into_inner()
    }
}

impl TokenSink for TokenLogger {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            CharacterTokens(b) => self.current_str.borrow_mut().push_tendril(&b),
            NullCharacterToken => self.current_str.borrow_mut().push_char('\0'),
            ParseError(_) => *self.errors.borrow_mut() += 1,
            token => self.push(token),
        }
        TokenSinkResult::Continue
    }
}

fn tokenize(chunks: Vec<StrTendril>, opts: TokenizerOpts) -> (Vec<Token>, usize) {
    let sink = TokenLogger::new();
    let tok = Tokenizer::new(sink, opts);
    let buffer = BufferQueue::default();
    for chunk in chunks {
        buffer.push_back(chunk);
        let _ = tok.feed(&buffer);
    }
    let _ = tok.feed(&buffer);
    tok.end();
    let errors = *tok.sink.errors.borrow();
    (tok.sink.into_tokens(), errors)
}

fn tag(kind: TagKind, name: &str) -> Token {
    TagToken(Tag {
        kind,
        name: LocalName::from(name),
        self_closing: false,
        attrs: vec![],
    })
}

#[test]
fn tokenizes_simple_start_and_end_tags() {
    let (tokens, errors) = tokenize(splits("<a><b></b></a>"), TokenizerOpts::default());
    assert_eq!(errors, 0);
    assert_eq!(
        tokens,
        vec![
            tag(StartTag, "a"),
            tag(StartTag, "b"),
            tag(EndTag, "b"),
            tag(EndTag, "a"),
        ]
    );
}

#[test]
fn tokenizes_attributes() {
    let (tokens, _) = tokenize(splits(r#"<a href="x" target='y'>"#), TokenizerOpts::default());
    match &tokens[..] {
        [TagToken(t)] => {
            assert_eq!(t.kind, StartTag);
            assert_eq!(&*t.name, "a");
            assert_eq!(t.attrs.len(), 2);
            assert!(t.attrs.iter().any(|a| &*a.name.local == "href" && &*a.value == "x"));
            assert!(t.attrs.iter().any(|a| &*a.name.local == "target" && &*a.value == "y"));
        },
        other => panic!("unexpected tokens: {other:?}"),
    }
}

#[test]
fn merges_character_tokens_split_across_feeds() {
    let (tokens, _) = tokenize(splits("hello world"), TokenizerOpts::default());
    assert_eq!(tokens, vec![CharacterTokens(StrTendril::from_slice("hello world"))]);
}

#[test]
fn null_character_becomes_replacement_and_reports_error() {
    let (tokens, errors) = tokenize(vec![StrTendril::from_slice("a\0b")], TokenizerOpts::default());
    assert_eq!(tokens, vec![CharacterTokens(StrTendril::from_slice("a\u{fffd}b"))]);
    assert_eq!(errors, 1);
}

#[test]
fn tokenizes_comments() {
    let (tokens, errors) = tokenize(splits("<!--hi-->"), TokenizerOpts::default());
    assert_eq!(errors, 0);
    assert_eq!(tokens, vec![CommentToken(StrTendril::from_slice("hi"))]);
}

#[test]
fn tokenizes_doctype() {
    let (tokens, _) = tokenize(splits("<!DOCTYPE html>"), TokenizerOpts::default());
    match &tokens[..] {
        [DoctypeToken(d)] => {
            assert_eq!(d.name.as_deref(), Some("html"));
            assert!(!d.force_quirks);
        },
        other => panic!("unexpected tokens: {other:?}"),
    }
}

#[test]
fn self_closing_flag_is_set() {
    let (tokens, _) = tokenize(splits("<br/>"), TokenizerOpts::default());
    match &tokens[..] {
        [TagToken(t)] => assert!(t.self_closing),
        other => panic!("unexpected tokens: {other:?}"),
    }
}
