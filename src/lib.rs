// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(unused_parens)]

//! An implementation of the HTML tree construction algorithm
//! (<https://html.spec.whatwg.org/multipage/parsing.html#tree-construction>),
//! built on top of the tokenizer defined in this crate and the shared atom
//! and DOM-interface types from `markup5ever`.
//!
//! The entry points are [`driver::parse_document`] and
//! [`driver::parse_fragment`]; bring your own [`interface::TreeSink`], or use
//! the bundled [`rcdom::RcDom`] for quick experiments and the test suite.

pub use markup5ever::*;
pub use driver::{parse_document, parse_fragment, ParseOpts, Parser};

pub use error::ErrorCode;
pub use serialize::serialize;

#[macro_use]
mod macros;

mod util {
    pub mod str;
}

pub mod buffer_queue;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod interface;
pub mod rcdom;
pub mod serialize;
pub mod tokenizer;
pub mod tree_builder;

/// Re-export the tendril crate.
pub mod tendril {
    pub use ::tendril::*;
}

/// Re-export the encoding_rs-backed decoding support tendril builds on.
pub use tendril::encoding as str_encoding;
