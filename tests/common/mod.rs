#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use koi::{Koi, RunError};

/// In-memory `print` sink that tests can read back after a run.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("print output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session wired to a fresh buffer.
pub fn session() -> (Koi, SharedBuffer) {
    let buffer = SharedBuffer::default();
    (Koi::with_output(buffer.clone()), buffer)
}

/// Run `source` in a fresh session, returning what it printed and how it ended.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let (mut koi, buffer) = session();
    let result = koi.run(source);
    (buffer.contents(), result)
}

/// Run `source`, asserting success, and return its output.
pub fn output_of(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {}\noutput so far:\n{}", e, output);
    }
    output
}

/// Run `source`, asserting it ends in a runtime error, and return the message.
pub fn runtime_error_of(source: &str) -> (String, String) {
    match run(source) {
        (output, Err(RunError::Runtime(e))) => (output, e.to_string()),
        (_, other) => panic!("expected a runtime error, got {:?}", other),
    }
}
