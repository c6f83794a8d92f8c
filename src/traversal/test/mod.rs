//! Tests for the postorder walk

use super::*;
use crate::parse_rules;
use pretty_assertions::assert_eq;


fn order(steps: &[BuildStep]) -> Vec<&str> {
    steps.iter().map(|s| s.target.as_str()).collect()
}

#[test]
fn deps_in_listed_order() {
    crate::test::setup();
    assert_output!("a: b c\nb:\nc:\n", "a", vec!["b", "c", "a"]);
}

#[test]
fn commands_follow_their_target() {
    crate::test::setup();
    assert_output!(
        "a: b\n\tcmd1\nb:\n\tcmd2\n",
        "a",
        vec!["b", "  cmd2", "a", "  cmd1"]
    );
}

#[test]
fn diamond_emits_shared_dep_once() {
    assert_output!("a: b c\nb: d\nc: d\nd:\n", "a", vec!["d", "b", "c", "a"]);
}

#[test]
fn command_round_trip() {
    assert_output!("a.o: a.c\n\tgcc -c a.c\n", "a.o", vec!["a.c", "a.o", "  gcc -c a.c"]);
}

#[test]
fn leaf_without_rule() {
    assert_output!("prog: main.o\n\tcc -o prog main.o\n", "main.o", vec!["main.o"]);
}

#[test]
fn duplicate_deps_emitted_once() {
    assert_output!("a: b b\nb:\n\tmake b\n", "a", vec!["b", "  make b", "a"]);
}

#[test]
fn only_reachable_targets() {
    assert_output!("a: b\nb:\nc: a\n", "b", vec!["b"]);
}

#[test]
fn unknown_root() {
    let graph = assert_ok!(parse_rules(vec!["a:"]));

    match assert_err!(traverse(&graph, "z")) {
        MakefileError::TargetNotFound(name) => assert_eq!(name, "z"),
        other => panic!("Unexpected error {:?}", other),
    }
}

#[test]
fn unknown_root_message() {
    let graph = assert_ok!(parse_rules(vec!["a:"]));

    let err = assert_err!(traverse(&graph, "z"));
    assert_eq!(err.to_string(), "Target 'z' not found.");
}

#[test]
fn unresolved_dependency_is_skipped() {
    crate::test::setup();
    let mut graph = DependencyGraph::new();
    let a = graph.find_or_create("a");
    let b = graph.find_or_create("b");
    let ghost = graph.intern_name("ghost");
    graph.add_dependency(a, ghost);
    graph.add_dependency(a, b);

    let steps = assert_ok!(traverse(&graph, "a"));

    assert_eq!(order(&steps), vec!["b", "a"]);
}

#[test]
fn cycle_is_ignored_by_default() {
    crate::test::setup();
    let graph = assert_ok!(parse_rules(vec!["a: b", "b: a"]));

    let steps = assert_ok!(traverse(&graph, "a"));

    assert_eq!(order(&steps), vec!["b", "a"]);
}

#[test]
fn self_dependency_is_ignored_by_default() {
    let graph = assert_ok!(parse_rules(vec!["a: a", "\ttouch a"]));

    let steps = assert_ok!(traverse(&graph, "a"));

    assert_eq!(
        steps,
        vec![BuildStep {
            target: "a".into(),
            commands: vec!["touch a".into()],
        }]
    );
}

#[test]
fn cycle_rejected() {
    crate::test::setup();
    let graph = assert_ok!(parse_rules(vec!["all: a", "a: b", "b: c", "c: a"]));

    let err = assert_err!(Postorder::new(&graph)
        .cycle_policy(CyclePolicy::Reject)
        .visit("all"));

    match err {
        MakefileError::DependencyCycle(path) => assert_eq!(path, vec!["a", "b", "c", "a"]),
        other => panic!("Unexpected error {:?}", other),
    }
}

#[test]
fn diamond_is_not_a_cycle() {
    let graph = assert_ok!(parse_rules(vec!["a: b c", "b: d", "c: d", "d:"]));

    let steps = assert_ok!(Postorder::new(&graph)
        .cycle_policy(CyclePolicy::Reject)
        .visit("a"));

    assert_eq!(order(&steps), vec!["d", "b", "c", "a"]);
}

#[test]
fn visited_persists_until_reset() {
    let graph = assert_ok!(parse_rules(vec!["a: b", "b:", "c: b"]));
    let mut walk = Postorder::new(&graph);

    let first = assert_ok!(walk.visit("a"));
    assert_eq!(order(&first), vec!["b", "a"]);

    let second = assert_ok!(walk.visit("c"));
    assert_eq!(order(&second), vec!["c"]);

    walk.reset();
    let third = assert_ok!(walk.visit("c"));
    assert_eq!(order(&third), vec!["b", "c"]);
}

#[test]
fn graph_is_reusable() {
    let graph = assert_ok!(parse_rules(vec!["a: b", "b:"]));

    let first = assert_ok!(traverse(&graph, "a"));
    let second = assert_ok!(traverse(&graph, "a"));

    assert_eq!(first, second);
}

#[test]
fn engine_prints_with_its_policy() {
    let mut engine = crate::Engine::default();
    assert_ok!(engine.parse_lines(vec!["a: b", "b: a"]));

    let mut out = Vec::new();
    assert_ok!(engine.print_postorder("a", &mut out));
    assert_eq!(String::from_utf8(out).unwrap(), "b\na\n");

    engine.cycle_policy = CyclePolicy::Reject;
    match assert_err!(engine.build_order("a")) {
        MakefileError::DependencyCycle(path) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("Unexpected error {:?}", other),
    }
}

#[test]
fn cycle_keeps_walking_other_deps() {
    let graph = assert_ok!(parse_rules(vec!["a: b", "b: a c", "c: d", "d:"]));

    let steps = assert_ok!(traverse(&graph, "a"));

    assert_eq!(order(&steps), vec!["d", "c", "b", "a"]);
}
