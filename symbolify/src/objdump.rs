//! Symbol sources and the disassembler subprocess
//!
//! A symbol source is either a binary, which gets disassembled by running
//! `objdump -C -d` on it, or a file that already holds such a listing. The
//! disassembler must exit successfully: a failed run leaves nothing to build a
//! table from, so it is reported as an error and never retried.

use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::SymbolifyError;

/// Disassembler used when none is configured.
pub const DEFAULT_OBJDUMP: &str = "objdump";

/// Flags that make objdump demangle names and disassemble executable sections.
pub const DEFAULT_OBJDUMP_ARGS: [&str; 2] = ["-C", "-d"];

/// How to invoke the disassembler: `<program> <args>... <binary>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembler {
    program: String,
    args: Vec<String>,
}

impl Disassembler {
    /// Use `program` with the default objdump flags.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: DEFAULT_OBJDUMP_ARGS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Replace the flags passed before the binary path.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the disassembler on `binary` and return its standard output.
    ///
    /// Non-UTF-8 bytes in the output are replaced; only addresses and
    /// symbol names matter downstream.
    ///
    /// # Errors
    /// Returns an error if the program cannot be started or exits with a
    /// non-zero status.
    pub fn disassemble(&self, binary: &Path) -> Result<String, SymbolifyError> {
        debug!("Running {} {} {}", self.program, self.args.join(" "), binary.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(binary)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| SymbolifyError::DisassemblerSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SymbolifyError::DisassemblerFailed {
                program: self.program.clone(),
                binary: binary.to_path_buf(),
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for Disassembler {
    fn default() -> Self {
        Self::new(DEFAULT_OBJDUMP)
    }
}

/// Where disassembly text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSource {
    /// A binary to run the disassembler on
    Binary(PathBuf),
    /// A file holding disassembler output produced earlier
    Disassembly(PathBuf),
}

impl SymbolSource {
    /// Produce the disassembly text of this source.
    ///
    /// # Errors
    /// Returns an error if the disassembler fails or the listing cannot be
    /// read.
    pub fn load(&self, disassembler: &Disassembler) -> Result<String, SymbolifyError> {
        let text = match self {
            Self::Binary(path) => disassembler.disassemble(path)?,
            Self::Disassembly(path) => {
                let bytes = fs::read(path).map_err(|source| SymbolifyError::DisassemblyRead {
                    path: path.clone(),
                    source,
                })?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
        };
        info!("Loaded {self} ({} KB of disassembly)", text.len() / 1024);
        Ok(text)
    }
}

impl fmt::Display for SymbolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(path) => write!(f, "binary {}", path.display()),
            Self::Disassembly(path) => write!(f, "disassembly {}", path.display()),
        }
    }
}
