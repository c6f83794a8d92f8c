use crate::{DependencyGraph, Engine, MakefileError, ParseError, ParseErrorKind, TargetName};
use nom::types::CompleteStr;

mod recipe_line;
mod rule_line;

use self::recipe_line::recipe_line;
use self::rule_line::rule_line;

/// Tracks what the parser needs to remember between lines
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ParserState<'a> {
    /// The current file name
    file_name: &'a str,

    /// Number of the line most recently handed to `parse_line`
    line_number: usize,

    /// The target named by the most recent rule line, if there was one.
    /// Recipe lines are attached to this target.
    current_target: Option<TargetName>,
}

/// Represents the result of parsing a makefile line
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MakefileLine {
    /// Nothing but whitespace
    Blank,
    /// A recipe line, attached to the given target
    NewCommand(TargetName),
    /// A rule line
    Rule {
        target: TargetName,
        deps: Vec<TargetName>,
    },
}

impl<'a> ParserState<'a> {
    pub(crate) fn new(file_name: &'a str) -> ParserState<'a> {
        ParserState {
            file_name,
            line_number: 0,
            current_target: None,
        }
    }

    /// Returns true if a rule line has been seen, i.e. if a recipe line would
    /// have somewhere to go
    fn currently_processing_rule(&self) -> bool {
        self.current_target.is_some()
    }

    /// Number of lines handed to `parse_line` so far
    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }

    fn error(&self, kind: ParseErrorKind, line: &str) -> ParseError {
        ParseError {
            kind,
            file_name: self.file_name.to_owned(),
            line: self.line_number,
            content: line.to_owned(),
        }
    }

    /// Parse one line of input, updating the graph in `engine`.
    /// A single trailing `\n` is ignored; every other character is significant.
    pub(crate) fn parse_line(
        &mut self,
        line: &str,
        engine: &mut Engine,
    ) -> Result<MakefileLine, ParseError> {
        self.line_number += 1;
        let line = line.strip_suffix('\n').unwrap_or(line);

        if let Ok((_, command)) = recipe_line(CompleteStr(line), engine.command_char) {
            let target = match self.current_target {
                Some(target) => target,
                None => {
                    debug!("Recipe line {} has no rule to attach to", self.line_number);
                    return Err(self.error(ParseErrorKind::MalformedRule, line));
                }
            };
            debug!("Command {:?} for {:?}", command.0, target);
            engine.graph.add_command(target, command.0.to_owned());
            return Ok(MakefileLine::NewCommand(target));
        }

        let trimmed = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
        if trimmed.is_empty() {
            return Ok(MakefileLine::Blank);
        }

        let (target_name, dep_names) = match rule_line(CompleteStr(trimmed)) {
            Ok((_, parsed)) => parsed,
            Err(e) => {
                debug!("Line {} is not a rule: {:?}", self.line_number, e);
                return Err(self.error(ParseErrorKind::MissingColon, line));
            }
        };

        if self.currently_processing_rule() {
            trace!("Closing out rule {:?}", self.current_target);
        }

        let target = engine
            .graph
            .find_or_create(truncate_name(target_name, engine.name_limit));
        self.current_target = Some(target);

        let mut deps = Vec::with_capacity(dep_names.len());
        for dep_name in dep_names {
            for piece in split_name(dep_name, engine.name_limit) {
                let dep = engine.graph.find_or_create(piece);
                engine.graph.add_dependency(target, dep);
                deps.push(dep);
            }
        }

        debug!("Rule {:?} depends on {:?}", target_name, deps);
        Ok(MakefileLine::Rule { target, deps })
    }
}

/// Clip `name` to at most `limit` characters.
/// Trailing spaces exposed by the clip are trimmed too.
fn truncate_name(name: &str, limit: Option<usize>) -> &str {
    let clipped = match limit.and_then(|limit| name.char_indices().nth(limit)) {
        Some((end, _)) => {
            warn!("Truncating name {:?} to {} bytes", name, end);
            &name[..end]
        }
        None => name,
    };

    clipped.trim_end_matches(' ')
}

/// Cut `name` into pieces of at most `limit` characters. Every piece but the
/// last is exactly `limit` characters long.
fn split_name(name: &str, limit: Option<usize>) -> Vec<&str> {
    let limit = match limit {
        Some(limit) if limit > 0 => limit,
        _ => return vec![name],
    };

    let mut pieces = Vec::new();
    let mut rest = name;
    while let Some((end, _)) = rest.char_indices().nth(limit) {
        pieces.push(&rest[..end]);
        rest = &rest[end..];
    }
    if !pieces.is_empty() {
        warn!("Splitting dependency {:?} into {:?}", name, pieces);
    }
    pieces.push(rest);

    pieces
}

/// Build a dependency graph from makefile lines using the default settings.
pub fn parse_rules<I, S>(lines: I) -> Result<DependencyGraph, MakefileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut engine = Engine::default();
    engine.parse_lines(lines)?;
    Ok(engine.graph)
}
