use base64::{prelude::BASE64_STANDARD, Engine};

use super::{BASE64_ENCODING, DOCUMENT_HEADER, ROOT};
use crate::{
    codec::CodecOptions,
    value::{format_date, format_real, Kind, Value},
};

enum Step<'v> {
    Value(&'v Value, usize),
    Key(&'v str, usize),
    Close(Kind, usize),
}

pub fn encode(value: &Value, options: &CodecOptions) -> String {
    let mut w = Writer {
        out: String::new(),
        pretty: options.pretty_text,
    };

    w.out.push_str(DOCUMENT_HEADER);
    w.newline();
    w.open(ROOT, 0);

    // Containers are expanded onto an explicit stack so that encoding
    // depth is not bounded by the call stack.
    let mut stack = vec![Step::Value(value, 1)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Key(key, depth) => w.element("key", "", key, depth),
            Step::Close(kind, depth) => w.close(kind.name(), depth),

            Step::Value(Value::Map(map), depth) if !map.is_empty() => {
                w.open(Kind::Map.name(), depth);
                stack.push(Step::Close(Kind::Map, depth));
                for (key, value) in map.iter().rev() {
                    stack.push(Step::Value(value, depth + 1));
                    stack.push(Step::Key(key, depth + 1));
                }
            }
            Step::Value(Value::Array(array), depth) if !array.is_empty() => {
                w.open(Kind::Array.name(), depth);
                stack.push(Step::Close(Kind::Array, depth));
                stack.extend(array.iter().rev().map(|v| Step::Value(v, depth + 1)));
            }
            Step::Value(value, depth) => w.scalar(value, depth),
        }
    }

    w.close(ROOT, 0);
    w.out
}

struct Writer {
    out: String,
    pretty: bool,
}

impl Writer {
    fn indent(&mut self, depth: usize) {
        if self.pretty {
            (0..depth).for_each(|_| self.out.push_str("  "));
        }
    }

    fn newline(&mut self) {
        if self.pretty {
            self.out.push('\n');
        }
    }

    fn open(&mut self, name: &str, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self.newline();
    }

    fn close(&mut self, name: &str, depth: usize) {
        self.indent(depth);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self.newline();
    }

    fn empty(&mut self, name: &str, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(" />");
        self.newline();
    }

    fn element(&mut self, name: &str, attrs: &str, content: &str, depth: usize) {
        self.indent(depth);
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(attrs);
        self.out.push('>');
        escape_into(&mut self.out, content);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self.newline();
    }

    fn scalar(&mut self, value: &Value, depth: usize) {
        let name = value.kind().name();
        match value {
            Value::Unknown | Value::Map(..) | Value::Array(..) => self.empty(name, depth),
            Value::Boolean(v) => {
                self.element(name, "", if *v { "true" } else { "false" }, depth);
            }
            Value::Integer(v) => self.element(name, "", &v.to_string(), depth),
            Value::Real(v) => self.element(name, "", &format_real(*v), depth),
            Value::String(v) => self.element(name, "", v, depth),
            Value::Uuid(v) => self.element(name, "", &v.to_string(), depth),
            Value::Date(v) => self.element(name, "", &format_date(v), depth),
            Value::Uri(v) => self.element(name, "", v.as_str(), depth),
            Value::Binary(v) => {
                let attrs = format!(r#" encoding="{BASE64_ENCODING}""#);
                self.element(name, &attrs, &BASE64_STANDARD.encode(v), depth);
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' => out.push(c),
            c if c.is_ascii_control() => out.push_str(&format!("&#x{:X};", u32::from(c))),
            c => out.push(c),
        }
    }
}
