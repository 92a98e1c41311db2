//! Code emitter (C6): a stateful sink producing one VM instruction per
//! line, plus a fresh-label generator. Generation never fails, so a plain
//! growable `String` buffer is the whole story: no `io::Write`, no
//! buffering or re-ordering beyond straight-line appends.

use std::fmt::Write as _;

pub struct Emitter {
    output: String,
    label_counter: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            output: String::new(),
            label_counter: 0,
        }
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn instruction_count(&self) -> usize {
        self.output.lines().count()
    }

    /// A fresh, process-global-unique-within-this-compilation label.
    pub fn fresh_label(&mut self) -> String {
        let name = format!("lbl{}", self.label_counter);
        self.label_counter += 1;
        tracing::debug!("minted fresh label {name}");
        name
    }

    pub fn label(&mut self, name: &str) {
        writeln!(self.output, "{name}: NOP").unwrap();
    }

    pub fn comment(&mut self, text: &str) {
        writeln!(self.output, "-- {text}").unwrap();
    }

    pub fn nop(&mut self) {
        writeln!(self.output, "NOP").unwrap();
    }

    pub fn err(&mut self, message: &str) {
        writeln!(self.output, "ERR {}", escape_string(message)).unwrap();
    }

    pub fn start(&mut self) {
        writeln!(self.output, "START").unwrap();
    }

    pub fn stop(&mut self) {
        writeln!(self.output, "STOP").unwrap();
    }

    pub fn pushi(&mut self, n: i64) {
        writeln!(self.output, "PUSHI {n}").unwrap();
    }

    pub fn pushs(&mut self, s: &str) {
        writeln!(self.output, "PUSHS {}", escape_string(s)).unwrap();
    }

    pub fn pushg(&mut self, n: usize) {
        writeln!(self.output, "PUSHG {n}").unwrap();
    }

    pub fn pushl(&mut self, n: usize) {
        writeln!(self.output, "PUSHL {n}").unwrap();
    }

    pub fn pushsp(&mut self, n: i64) {
        writeln!(self.output, "PUSHSP {n}").unwrap();
    }

    pub fn pushfp(&mut self, n: i64) {
        writeln!(self.output, "PUSHFP {n}").unwrap();
    }

    pub fn storel(&mut self, n: usize) {
        writeln!(self.output, "STOREL {n}").unwrap();
    }

    pub fn storeg(&mut self, n: usize) {
        writeln!(self.output, "STOREG {n}").unwrap();
    }

    pub fn pushn(&mut self, n: usize) {
        writeln!(self.output, "PUSHN {n}").unwrap();
    }

    pub fn popn(&mut self, n: usize) {
        writeln!(self.output, "POPN {n}").unwrap();
    }

    pub fn dupn(&mut self, n: usize) {
        writeln!(self.output, "DUPN {n}").unwrap();
    }

    pub fn swap(&mut self) {
        writeln!(self.output, "SWAP").unwrap();
    }

    pub fn equal(&mut self) {
        writeln!(self.output, "EQUAL").unwrap();
    }

    pub fn not(&mut self) {
        writeln!(self.output, "NOT").unwrap();
    }

    pub fn inf(&mut self) {
        writeln!(self.output, "INF").unwrap();
    }

    pub fn infeq(&mut self) {
        writeln!(self.output, "INFEQ").unwrap();
    }

    pub fn sup(&mut self) {
        writeln!(self.output, "SUP").unwrap();
    }

    pub fn supeq(&mut self) {
        writeln!(self.output, "SUPEQ").unwrap();
    }

    pub fn add(&mut self) {
        writeln!(self.output, "ADD").unwrap();
    }

    pub fn sub(&mut self) {
        writeln!(self.output, "SUB").unwrap();
    }

    pub fn mul(&mut self) {
        writeln!(self.output, "MUL").unwrap();
    }

    pub fn div(&mut self) {
        writeln!(self.output, "DIV").unwrap();
    }

    pub fn concat(&mut self) {
        writeln!(self.output, "CONCAT").unwrap();
    }

    /// `STR`: convert the top-of-stack integer to a string.
    pub fn str_(&mut self) {
        writeln!(self.output, "STR").unwrap();
    }

    pub fn writei(&mut self) {
        writeln!(self.output, "WRITEI").unwrap();
    }

    pub fn writes(&mut self) {
        writeln!(self.output, "WRITES").unwrap();
    }

    pub fn jump(&mut self, label: &str) {
        writeln!(self.output, "JUMP {label}").unwrap();
    }

    pub fn jz(&mut self, label: &str) {
        writeln!(self.output, "JZ {label}").unwrap();
    }

    pub fn pusha(&mut self, label: &str) {
        writeln!(self.output, "PUSHA {label}").unwrap();
    }

    pub fn call(&mut self) {
        writeln!(self.output, "CALL").unwrap();
    }

    pub fn return_(&mut self) {
        writeln!(self.output, "RETURN").unwrap();
    }

    pub fn store(&mut self, n: usize) {
        writeln!(self.output, "STORE {n}").unwrap();
    }

    pub fn load(&mut self, n: usize) {
        writeln!(self.output, "LOAD {n}").unwrap();
    }

    pub fn alloc(&mut self, n: usize) {
        writeln!(self.output, "ALLOC {n}").unwrap();
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_labels_are_unique_and_increasing() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.fresh_label(), "lbl0");
        assert_eq!(emitter.fresh_label(), "lbl1");
    }

    #[test]
    fn pushs_escapes_quotes_and_backslashes() {
        let mut emitter = Emitter::new();
        emitter.pushs("a\"b\\c\n");
        assert_eq!(emitter.into_output(), "PUSHS \"a\\\"b\\\\c\\n\"\n");
    }

    #[test]
    fn label_emits_nop_line() {
        let mut emitter = Emitter::new();
        emitter.label("lbl0");
        assert_eq!(emitter.into_output(), "lbl0: NOP\n");
    }
}
