//! Parser for rule lines (`target: dep dep ...`)

use nom::types::CompleteStr;
use nom::IResult;

// Runs of spaces. Only the space character separates dependency names; tabs
// are part of the name they appear in.
named!(spaces<CompleteStr, CompleteStr>, take_while!(|c: char| c == ' '));

named!(target_name<CompleteStr, CompleteStr>, take_till!(|c: char| c == ':'));

named!(dependency<CompleteStr, CompleteStr>, take_till1!(|c: char| c == ' '));

named!(
    rule_line_inner<CompleteStr, (CompleteStr, Vec<CompleteStr>)>,
    do_parse!(
        target: terminated!(target_name, char!(':')) >>
        spaces >>
        deps: many0!(terminated!(dependency, spaces)) >>
        (target, deps)
    )
);

/// Split a rule line into the (trailing-space trimmed) target name and the
/// list of dependency names. The line must already have had its leading
/// whitespace stripped.
pub(super) fn rule_line(i: CompleteStr) -> IResult<CompleteStr, (&str, Vec<&str>)> {
    let (i, (target, deps)) = rule_line_inner(i)?;
    let target = target.0.trim_end_matches(' ');
    Ok((i, (target, deps.into_iter().map(|d| d.0).collect())))
}
