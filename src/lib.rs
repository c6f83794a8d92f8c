/* mymake's main file
Copyright (C) 2018 Reed Koser
This file is NOT part of GNU Make.
GNU Make and mymake are free software; you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by the Free
Software Foundation; either version 3 of the License, or (at your option) any
later version.

mymake is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE.  See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
this program.  If not, see <http://www.gnu.org/licenses/>.  */

//! mymake reads a very small subset of Makefile syntax (rule lines and
//! tab-prefixed recipe lines, nothing else) into a dependency graph, and
//! prints the targets needed to bring a given target up to date in the order
//! they would have to be built.
//!
//! ```
//! use mymake::Engine;
//!
//! let mut engine = Engine::default();
//! engine.parse_lines(vec!["a: b", "\techo a", "b:"]).unwrap();
//!
//! let mut out = Vec::new();
//! engine.print_postorder("a", &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "b\na\n  echo a\n");
//! ```
#![warn(missing_docs)]

extern crate fxhash;
#[macro_use]
extern crate log;
#[macro_use]
extern crate nom;

/// Internal macros for use in test assertions
#[cfg(test)]
#[macro_use]
mod test_macros;

pub mod graph;
mod parsers;
pub mod traversal;
mod types;

pub use crate::graph::{DependencyGraph, Target};
pub use crate::parsers::parse_rules;
pub use crate::traversal::{print_steps, traverse, BuildStep, CyclePolicy, Postorder};

use failure::Fail;
use std::fmt;
use std::io;
use std::io::prelude::*;
use string_interner::Sym;

/// What sort of thing went wrong while parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// A recipe line showed up before any rule line, so there is no target
    /// to attach it to
    MalformedRule,

    /// A line that is neither blank nor a recipe line has no `:` separating
    /// the target from its dependencies
    MissingColon,
}

/// A parse failure, along with where it happened
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Name of the input the line came from
    pub file_name: String,
    /// 1-based line number
    pub line: usize,
    /// The offending line, without its line terminator
    pub content: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ParseErrorKind::MalformedRule => "Command without a target",
            ParseErrorKind::MissingColon => "Missing colon in target line",
        };
        write!(
            f,
            "{}:{}: {}: '{}'",
            self.file_name, self.line, what, self.content
        )
    }
}

/// Represents all the things that can go wrong while reading a makefile and
/// walking its dependency graph.
#[derive(Debug)]
pub enum MakefileError {
    /// An IO error occurred while reading the makefile or writing output
    IOError(io::Error),
    /// The parser wasn't able to handle some of the syntax
    ParseError(ParseError),
    /// The requested target has no node in the graph
    TargetNotFound(String),
    /// A dependency cycle was found while the cycle policy was
    /// [CyclePolicy::Reject]. Holds the names along the cycle, starting and
    /// ending with the same target.
    DependencyCycle(Vec<String>),
}

impl fmt::Display for MakefileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakefileError::IOError(e) => write!(f, "{}", e),
            MakefileError::ParseError(e) => write!(f, "{}", e),
            MakefileError::TargetNotFound(name) => write!(f, "Target '{}' not found.", name),
            MakefileError::DependencyCycle(path) => {
                write!(f, "Dependency cycle detected: {}", path.join(" -> "))
            }
        }
    }
}

impl Fail for MakefileError {}

impl From<io::Error> for MakefileError {
    fn from(other: io::Error) -> Self {
        MakefileError::IOError(other)
    }
}

impl From<ParseError> for MakefileError {
    fn from(other: ParseError) -> Self {
        MakefileError::ParseError(other)
    }
}

/// Type representing an opaque target name reference.
/// It is a logical bug to share these between graph instances.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TargetName(Sym);

/// Represents the state of the engine: the graph built so far and the knobs
/// that control how lines are read and how the graph is walked.
#[derive(Clone, Debug)]
pub struct Engine {
    /// The dependency graph built from everything read so far
    pub graph: DependencyGraph,

    /// The current command-prefix character.
    /// Defaults to `\t` (tab)
    pub command_char: char,

    /// Maximum length, in characters, of target and dependency names.
    /// `None` (the default) leaves names alone. With a limit, target names
    /// are truncated and a longer dependency name is cut into limit-sized
    /// pieces, each of which becomes its own dependency. `Some(255)` matches
    /// the fixed 255-character buffers of older implementations.
    pub name_limit: Option<usize>,

    /// What to do when the walk runs into a dependency cycle
    pub cycle_policy: CyclePolicy,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine {
            graph: Default::default(),
            command_char: '\t',
            name_limit: None,
            cycle_policy: CyclePolicy::Ignore,
        }
    }
}

impl Engine {
    /// Parses a makefile.
    /// `input_filename` is only used to label diagnostics.
    pub fn read_makefile<F: BufRead>(
        &mut self,
        input: &mut F,
        input_filename: &str,
    ) -> Result<(), MakefileError> {
        info!("Begin reading makefile {:?}", input_filename);

        let mut parser_state = parsers::ParserState::new(input_filename);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Makefiles are bytes, not text. Anything that isn't UTF-8 is
            // replaced rather than failing the whole read
            let line = String::from_utf8_lossy(&buf);
            if let std::borrow::Cow::Owned(_) = line {
                warn!(
                    "{}:{}: line is not valid UTF-8, replacing invalid bytes",
                    input_filename,
                    parser_state.line_number() + 1
                );
            }
            parser_state.parse_line(&line, self)?;
        }

        info!(
            "Complete read of makefile {:?}, {} targets known",
            input_filename,
            self.graph.len()
        );

        Ok(())
    }

    /// Parses makefile lines that are already in memory. Each item is one
    /// line; a single trailing `\n` on an item is ignored.
    pub fn parse_lines<I, S>(&mut self, lines: I) -> Result<(), MakefileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser_state = parsers::ParserState::new("<lines>");
        for line in lines {
            parser_state.parse_line(line.as_ref(), self)?;
        }

        Ok(())
    }

    /// Walk the graph from `root` and collect the build steps in the order
    /// they have to run.
    pub fn build_order(&self, root: &str) -> Result<Vec<BuildStep>, MakefileError> {
        Postorder::new(&self.graph)
            .cycle_policy(self.cycle_policy)
            .visit(root)
    }

    /// Walk the graph from `root` and write each target name, followed by its
    /// commands indented by two spaces, to `out`.
    pub fn print_postorder<W: Write>(&self, root: &str, out: &mut W) -> Result<(), MakefileError> {
        let steps = self.build_order(root)?;
        print_steps(&steps, out)?;
        Ok(())
    }
}
