//! Parser for recipe lines

use nom::types::CompleteStr;
use nom::IResult;

/// Recognizes a recipe line, producing the command with exactly one
/// `command_char` removed from the front. Nothing else is trimmed.
pub(super) fn recipe_line(i: CompleteStr, command_char: char) -> IResult<CompleteStr, CompleteStr> {
    preceded!(i, char!(command_char), call!(nom::rest))
}
