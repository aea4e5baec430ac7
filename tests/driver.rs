use html5ever::interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::tendril::TendrilSink;
use html5ever::{driver, local_name, ns, Attribute, ParseOpts, QualName};
use markup5ever::tendril::StrTendril;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Default)]
struct Sink {
    next_id: Cell<usize>,
    names: RefCell<HashMap<usize, QualName>>,
}

impl Sink {
    fn get_id(&self) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 2);
        id
    }
}

impl TreeSink for Sink {
    type Handle = usize;
    type Output = Self;

    fn finish(self) -> Self {
        self
    }

    fn get_document(&self) -> usize {
        0
    }

    fn get_template_contents(&self, target: &usize) -> usize {
        let is_template = self
            .names
            .borrow()
            .get(target)
            .is_some_and(|n| n.ns == ns!(html) && &*n.local == "template");
        if is_template {
            target + 1
        } else {
            panic!("not a template element")
        }
    }

    fn same_node(&self, x: &usize, y: &usize) -> bool {
        x == y
    }

    fn elem_name<'a>(&'a self, target: &'a usize) -> ElemName<'a> {
        ElemName::from(self.names.borrow().get(target).expect("not an element").clone())
    }

    fn create_element(&self, name: QualName, _: Vec<Attribute>, _: ElementFlags) -> usize {
        let id = self.get_id();
        self.names.borrow_mut().insert(id, name);
        id
    }

    fn create_comment(&self, _text: StrTendril) -> usize {
        self.get_id()
    }

    #[allow(unused_variables)]
    fn create_pi(&self, target: StrTendril, value: StrTendril) -> usize {
        unimplemented!()
    }

    fn append_before_sibling(&self, _sibling: &usize, _new_node: NodeOrText<usize>) {}

    fn append_based_on_parent_node(
        &self,
        _element: &usize,
        _prev_element: &usize,
        _new_node: NodeOrText<usize>,
    ) {
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}
    fn set_quirks_mode(&self, _mode: QuirksMode) {}
    fn append(&self, _parent: &usize, _child: NodeOrText<usize>) {}

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {}
    fn add_attrs_if_missing(&self, target: &usize, _attrs: Vec<Attribute>) {
        assert!(self.names.borrow().contains_key(target), "not an element");
    }
    fn remove_from_parent(&self, _target: &usize) {}
    fn reparent_children(&self, _node: &usize, _new_parent: &usize) {}
    fn mark_script_already_started(&self, _node: &usize) {}
}

#[test]
fn driver_not_interrupted_by_non_script_tokenizer_result() {
    // A run of <meta charset> tags that never triggers a Script pause must
    // still fully drain and reach finish() without panicking.
    let test_case = "<meta charset=\"UTF-8\" /><meta charset=\"UTF-8\" /> other stuff";
    let mut parser = driver::parse_document(Sink::default(), ParseOpts::default());
    parser.process(test_case.into());
    parser.finish();
}

#[test]
fn driver_accepts_chunked_input() {
    let mut parser = driver::parse_document(Sink::default(), ParseOpts::default());
    parser.process("<html><he".into());
    parser.process("ad></head><bo".into());
    parser.process("dy></body></html>".into());
    let sink = parser.finish();
    assert!(sink
        .names
        .borrow()
        .values()
        .any(|n| n.local == local_name!("body")));
}

#[test]
fn driver_from_utf8_decodes_bytes() {
    let parser = driver::parse_document(Sink::default(), ParseOpts::default());
    let sink = parser.from_utf8().one(&b"<title>\xe2\x98\x83</title>"[..]);
    assert!(sink
        .names
        .borrow()
        .values()
        .any(|n| n.local == local_name!("title")));
}
