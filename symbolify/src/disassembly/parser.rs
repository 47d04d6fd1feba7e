use log::trace;
use rustc_demangle::demangle;

use crate::domain::SymbolEntry;
use crate::hex::HEX_DIGITS;
use crate::symbolization::SymbolTable;

/// Function name used for instructions that appear before any label.
pub const NO_SYMBOL: &str = "<none>";

// `00001000 <main>:`
static_regex!(LABEL_LINE, &format!(r"^\s*(?P<addr>{HEX_DIGITS})\s+<(?P<name>.+)>:"));
// `    1004:\tmov x0, x1`
static_regex!(INSTRUCTION_LINE, &format!(r"^\s*(?P<addr>{HEX_DIGITS}):(?:\s|$)"));

/// Knobs for turning disassembly into symbols
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Demangle Rust label names the disassembler left mangled.
    pub demangle: bool,
}

/// Where the parser is within the listing
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
    /// No label seen yet. Instructions are attributed to [`NO_SYMBOL`].
    Outside { ordinal: usize },
    /// Inside the function labelled `name` at `addr`; `ordinal` is the index
    /// the next instruction gets.
    Function { name: String, addr: String, ordinal: usize },
}

impl ParseState {
    /// Claim the next instruction slot: enclosing function name, its address
    /// (empty outside any function) and the instruction's ordinal.
    fn next_instruction(&mut self) -> (&str, &str, usize) {
        match self {
            Self::Outside { ordinal } => {
                let current = *ordinal;
                *ordinal += 1;
                (NO_SYMBOL, "", current)
            }
            Self::Function { name, addr, ordinal } => {
                let current = *ordinal;
                *ordinal += 1;
                (name.as_str(), addr.as_str(), current)
            }
        }
    }
}

/// Line-by-line state machine over one disassembly listing
#[derive(Debug)]
pub struct DisassemblyParser {
    state: ParseState,
    table: SymbolTable,
    options: ParseOptions,
}

impl DisassemblyParser {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { state: ParseState::Outside { ordinal: 0 }, table: SymbolTable::new(), options }
    }

    /// Feed one line. Lines that are neither labels nor instructions are
    /// ignored.
    pub fn process_line(&mut self, line: &str) {
        if let Some(captures) = LABEL_LINE.captures(line) {
            let addr = captures["addr"].to_string();
            let name = self.symbol_name(&captures["name"]);
            trace!("label {name} at {addr}");
            self.table.insert(addr.clone(), SymbolEntry::Label(name.clone()));
            self.state = ParseState::Function { name, addr, ordinal: 0 };
        } else if let Some(captures) = INSTRUCTION_LINE.captures(line) {
            let (function, function_addr, ordinal) = self.state.next_instruction();
            let addr = widen_address(&captures["addr"], function_addr);
            let entry = SymbolEntry::Instruction { function: function.to_string(), ordinal };
            self.table.insert(addr, entry);
        }
    }

    #[must_use]
    pub fn finish(self) -> SymbolTable {
        self.table
    }

    fn symbol_name(&self, raw: &str) -> String {
        if self.options.demangle {
            format!("{:#}", demangle(raw))
        } else {
            raw.to_string()
        }
    }
}

/// Give an abbreviated instruction address the leading digits of the label
/// that contains it.
///
/// Some disassemblers drop leading digits that repeat the function address:
/// inside `0000000040080000 <_start>:` an instruction may read `40080004:`.
/// This assumes the address width never changes within a function for any
/// other reason. Addresses at least as wide as the label are kept as is.
#[must_use]
pub fn widen_address(addr: &str, function_addr: &str) -> String {
    if addr.len() < function_addr.len() {
        let missing = function_addr.len() - addr.len();
        format!("{}{addr}", &function_addr[..missing])
    } else {
        addr.to_string()
    }
}

/// Parse a complete disassembly listing.
#[must_use]
pub fn parse_disassembly(text: &str, options: ParseOptions) -> SymbolTable {
    let mut parser = DisassemblyParser::new(options);
    for line in text.lines() {
        parser.process_line(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
build/kernel.elf:     file format elf64-littleaarch64


Disassembly of section .text:

00001000 <main>:
    1004:\td2800000 \tmov\tx0, #0x0
    1008:\td65f03c0 \tret

0000100c <helper(int)>:
    100c:\t8b010000 \tadd\tx0, x0, x1
    1010:\td65f03c0 \tret
";

    fn resolve(table: &SymbolTable, key: &str) -> String {
        table.get(key).map(ToString::to_string).unwrap_or_else(|| panic!("{key} missing"))
    }

    #[test]
    fn test_labels_and_instructions() {
        let table = parse_disassembly(SAMPLE, ParseOptions::default());
        assert_eq!(resolve(&table, "00001000"), "main");
        assert_eq!(resolve(&table, "00001004"), "main+0");
        assert_eq!(resolve(&table, "00001008"), "main+1");
    }

    #[test]
    fn test_ordinal_resets_per_label() {
        let table = parse_disassembly(SAMPLE, ParseOptions::default());
        assert_eq!(resolve(&table, "00001010"), "helper(int)+1");
    }

    #[test]
    fn test_first_instruction_replaces_label() {
        // objdump lists the first instruction at the label's own address, so
        // the label key ends up as `name+0`.
        let table = parse_disassembly(SAMPLE, ParseOptions::default());
        assert_eq!(resolve(&table, "0000100c"), "helper(int)+0");
    }

    #[test]
    fn test_noise_lines_ignored() {
        let table = parse_disassembly(SAMPLE, ParseOptions::default());
        // 2 labels + 4 instructions, one sharing its key with a label.
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_instructions_before_label() {
        let text = "  400:\tnop\n  404:\tnop\n00000408 <entry>:\n  40c:\tnop\n";
        let table = parse_disassembly(text, ParseOptions::default());
        assert_eq!(resolve(&table, "400"), "<none>+0");
        assert_eq!(resolve(&table, "404"), "<none>+1");
        assert_eq!(resolve(&table, "00000408"), "entry");
        assert_eq!(resolve(&table, "0000040c"), "entry+0");
    }

    #[test]
    fn test_abbreviated_addresses_widened() {
        let text = "ffff000040080000 <_start>:\n40080000:\tnop\n40080004:\tnop\n";
        let table = parse_disassembly(text, ParseOptions::default());
        assert_eq!(resolve(&table, "ffff000040080000"), "_start+0");
        assert_eq!(resolve(&table, "ffff000040080004"), "_start+1");
        assert!(table.get("40080004").is_none());
    }

    #[test]
    fn test_widen_address() {
        assert_eq!(widen_address("1004", "00001000"), "00001004");
        assert_eq!(widen_address("00001004", "00001000"), "00001004");
        assert_eq!(widen_address("100004", "1000"), "100004");
        assert_eq!(widen_address("1004", ""), "1004");
    }

    #[test]
    fn test_label_name_with_brackets() {
        let text = "00002000 <Vec<u8>::push>:\n";
        let table = parse_disassembly(text, ParseOptions::default());
        assert_eq!(resolve(&table, "00002000"), "Vec<u8>::push");
    }

    #[test]
    fn test_instruction_needs_separator() {
        // A hex word followed by a colon inside text is not an instruction.
        let table = parse_disassembly("  cafe:babe\n", ParseOptions::default());
        assert!(table.is_empty());
    }

    #[test]
    fn test_demangle_option() {
        let text = "00003000 <_ZN4core9panicking5panic17h0123456789abcdefE>:\n";
        let plain = parse_disassembly(text, ParseOptions::default());
        assert_eq!(resolve(&plain, "00003000"), "_ZN4core9panicking5panic17h0123456789abcdefE");

        let demangled = parse_disassembly(text, ParseOptions { demangle: true });
        assert_eq!(resolve(&demangled, "00003000"), "core::panicking::panic");
    }

    #[test]
    fn test_parser_state_transitions() {
        let mut parser = DisassemblyParser::new(ParseOptions::default());
        assert_eq!(parser.state, ParseState::Outside { ordinal: 0 });

        parser.process_line("  10:\tnop");
        assert_eq!(parser.state, ParseState::Outside { ordinal: 1 });

        parser.process_line("00000020 <f>:");
        assert_eq!(
            parser.state,
            ParseState::Function { name: "f".to_string(), addr: "00000020".to_string(), ordinal: 0 }
        );

        parser.process_line("  24:\tnop");
        assert_eq!(
            parser.state,
            ParseState::Function { name: "f".to_string(), addr: "00000020".to_string(), ordinal: 1 }
        );
        assert_eq!(parser.finish().len(), 3);
    }
}
