//! Render a value tree back to JSON text.
//!
//! The printer mirrors the parser: compact output is a strict-JSON subset of
//! what the parser accepts, so a print/parse cycle is lossless structurally.
//! Pretty mode reproduces the historical layout of this format exactly:
//! arrays stay on one line with `", "` separators, objects break onto
//! tab-indented lines, and an empty object still gets its line break before
//! the closing brace while an empty array does not. Downstream consumers
//! compare these bytes, so the asymmetry is load-bearing.

use crate::error::{Error, Result};
use crate::node::{Member, Node, NodeId, Number};
use crate::tree::Tree;

impl Tree {
    /// Render the subtree at `id` to text.
    ///
    /// `pretty` selects the indented layout. Rendering fails only when the
    /// subtree contains a dangling id (a reference whose target was
    /// removed); nothing is returned in that case, never partial text.
    pub fn print(&self, id: NodeId, pretty: bool) -> Result<String> {
        let mut printer = Printer {
            tree: self,
            pretty,
            out: String::new(),
        };
        printer.value(id, 0)?;
        Ok(printer.out)
    }
}

struct Printer<'t> {
    tree: &'t Tree,
    pretty: bool,
    out: String,
}

impl Printer<'_> {
    fn value(&mut self, id: NodeId, depth: usize) -> Result<()> {
        let node = self.tree.get(id).ok_or(Error::Dangling)?;
        match node {
            Node::Null => self.out.push_str("null"),
            Node::Bool(false) => self.out.push_str("false"),
            Node::Bool(true) => self.out.push_str("true"),
            Node::Number(n) => self.number(*n),
            Node::String(s) => self.string(s),
            Node::Array(items) => self.array(items, depth)?,
            Node::Object(members) => self.object(members, depth)?,
            Node::Ref(target) => self.value(*target, depth)?,
        }
        Ok(())
    }

    /// Number policy: plain integer when the snapshot agrees with the float
    /// and fits 32 bits; zero-decimal form for other whole numbers below
    /// 1e60; scientific for very small or very large magnitudes; six-decimal
    /// fixed-point otherwise.
    fn number(&mut self, n: Number) {
        let d = n.value();
        let int = n.int();
        if (int as f64 - d).abs() <= f64::EPSILON
            && d <= f64::from(i32::MAX)
            && d >= f64::from(i32::MIN)
        {
            self.out.push_str(&format!("{int}"));
        } else if (d.floor() - d).abs() <= f64::EPSILON && d.abs() < 1.0e60 {
            self.out.push_str(&format!("{d:.0}"));
        } else if d.abs() < 1.0e-6 || d.abs() > 1.0e9 {
            self.out.push_str(&format!("{d:e}"));
        } else {
            self.out.push_str(&format!("{d:.6}"));
        }
    }

    /// Escape and quote a string. Named escapes for the usual control
    /// characters, `\u00XX` for the rest below 0x20; everything else passes
    /// through unchanged, so valid UTF-8 is preserved byte for byte.
    fn string(&mut self, s: &str) {
        self.out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c < ' ' => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn array(&mut self, items: &[NodeId], depth: usize) -> Result<()> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
                if self.pretty {
                    self.out.push(' ');
                }
            }
            self.value(item, depth + 1)?;
        }
        self.out.push(']');
        Ok(())
    }

    fn object(&mut self, members: &[Member], depth: usize) -> Result<()> {
        if members.is_empty() {
            self.out.push('{');
            if self.pretty {
                self.out.push('\n');
                self.indent(depth.saturating_sub(1));
            }
            self.out.push('}');
            return Ok(());
        }
        self.out.push('{');
        if self.pretty {
            self.out.push('\n');
        }
        let depth = depth + 1;
        let last = members.len() - 1;
        for (i, member) in members.iter().enumerate() {
            if self.pretty {
                self.indent(depth);
            }
            self.string(member.key());
            self.out.push(':');
            if self.pretty {
                self.out.push('\t');
            }
            self.value(member.value(), depth)?;
            if i != last {
                self.out.push(',');
            }
            if self.pretty {
                self.out.push('\n');
            }
        }
        if self.pretty {
            self.indent(depth - 1);
        }
        self.out.push('}');
        Ok(())
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print_parsed(text: &str, pretty: bool) -> String {
        let mut tree = Tree::new();
        let root = tree.parse(text).unwrap();
        tree.print(root, pretty).unwrap()
    }

    #[test]
    fn literals() {
        assert_eq!(print_parsed("null", false), "null");
        assert_eq!(print_parsed("true", false), "true");
        assert_eq!(print_parsed("false", false), "false");
    }

    #[test]
    fn integer_fast_path() {
        let mut tree = Tree::new();
        let n = tree.number(3.0);
        assert_eq!(tree.print(n, false).unwrap(), "3");
        let n = tree.number(-250.0);
        assert_eq!(tree.print(n, false).unwrap(), "-250");
        let n = tree.number(0.0);
        assert_eq!(tree.print(n, false).unwrap(), "0");
    }

    #[test]
    fn fixed_point_path() {
        let mut tree = Tree::new();
        let n = tree.number(3.5);
        assert_eq!(tree.print(n, false).unwrap(), "3.500000");
        let n = tree.number(-0.125);
        assert_eq!(tree.print(n, false).unwrap(), "-0.125000");
    }

    #[test]
    fn whole_numbers_beyond_i32_print_without_decimals() {
        let mut tree = Tree::new();
        let n = tree.number(1e12);
        assert_eq!(tree.print(n, false).unwrap(), "1000000000000");
        let n = tree.number(4e9);
        assert_eq!(tree.print(n, false).unwrap(), "4000000000");
    }

    #[test]
    fn scientific_path() {
        let mut tree = Tree::new();
        // Large and not whole.
        let n = tree.number(1234567890.5);
        assert_eq!(tree.print(n, false).unwrap(), "1.2345678905e9");
        // Tiny.
        let n = tree.number(1e-7);
        assert_eq!(tree.print(n, false).unwrap(), "1e-7");
        // Astronomically large whole numbers also go scientific.
        let n = tree.number(1e60);
        assert_eq!(tree.print(n, false).unwrap(), "1e60");
    }

    #[test]
    fn string_escapes() {
        let mut tree = Tree::new();
        let s = tree.string("a\nb");
        assert_eq!(tree.print(s, false).unwrap(), "\"a\\nb\"");
        let s = tree.string("say \"hi\"\\");
        assert_eq!(tree.print(s, false).unwrap(), "\"say \\\"hi\\\"\\\\\"");
        let s = tree.string("tab\there");
        assert_eq!(tree.print(s, false).unwrap(), "\"tab\\there\"");
    }

    #[test]
    fn control_chars_use_hex_escapes() {
        let mut tree = Tree::new();
        let s = tree.string("\u{1}\u{1f}");
        assert_eq!(tree.print(s, false).unwrap(), "\"\\u0001\\u001f\"");
    }

    #[test]
    fn multibyte_utf8_passes_through() {
        let mut tree = Tree::new();
        let s = tree.string("héllo");
        assert_eq!(tree.print(s, false).unwrap(), "\"héllo\"");
    }

    #[test]
    fn compact_containers() {
        assert_eq!(print_parsed("[1, 2, 3]", false), "[1,2,3]");
        assert_eq!(
            print_parsed(r#"{ "a": 1, "b": [true, null] }"#, false),
            r#"{"a":1,"b":[true,null]}"#
        );
    }

    #[test]
    fn pretty_arrays_stay_on_one_line() {
        assert_eq!(print_parsed("[1,2,3]", true), "[1, 2, 3]");
    }

    #[test]
    fn pretty_objects_break_lines() {
        assert_eq!(
            print_parsed(r#"{"a":1,"b":2}"#, true),
            "{\n\t\"a\":\t1,\n\t\"b\":\t2\n}"
        );
    }

    #[test]
    fn pretty_nested_object_indents() {
        assert_eq!(
            print_parsed(r#"{"o":{"x":1}}"#, true),
            "{\n\t\"o\":\t{\n\t\t\"x\":\t1\n\t}\n}"
        );
    }

    #[test]
    fn empty_container_asymmetry() {
        let mut tree = Tree::new();
        let a = tree.array();
        assert_eq!(tree.print(a, false).unwrap(), "[]");
        assert_eq!(tree.print(a, true).unwrap(), "[]");
        let o = tree.object();
        assert_eq!(tree.print(o, false).unwrap(), "{}");
        // The empty object keeps its line break even with no entries.
        assert_eq!(tree.print(o, true).unwrap(), "{\n}");
    }

    #[test]
    fn nested_empty_object_indent_is_one_short() {
        // The closing brace of a nested empty object sits at depth-1.
        assert_eq!(print_parsed(r#"{"o":{}}"#, true), "{\n\t\"o\":\t{\n}\n}");
        assert_eq!(print_parsed("[{}]", true), "[{\n}]");
        assert_eq!(
            print_parsed(r#"{"a":{"b":{}}}"#, true),
            "{\n\t\"a\":\t{\n\t\t\"b\":\t{\n\t}\n\t}\n}"
        );
    }

    #[test]
    fn dangling_reference_aborts_render() {
        let mut tree = Tree::new();
        let target = tree.string("gone");
        let holder = tree.array();
        tree.add_reference_to_array(holder, target).unwrap();
        tree.remove(target);
        assert_eq!(tree.print(holder, false), Err(Error::Dangling));
    }

    #[test]
    fn reference_prints_as_its_target() {
        let mut tree = Tree::new();
        let target = tree.double_array(&[1.0, 2.0]);
        let holder = tree.object();
        tree.add_reference_to_object(holder, "alias", target).unwrap();
        assert_eq!(tree.print(holder, false).unwrap(), r#"{"alias":[1,2]}"#);
    }
}
