/// Assert that the provided `Result<T, E>` is the Ok variant
#[macro_export]
macro_rules! assert_ok {
    ($r:expr) => {{
        let r = $r;
        match r {
            Ok(v) => v,
            Err(e) => panic!("Unexpected error {:?}", e),
        }
    }};
}

/// Assert that the provided `Result<T, E>` is the Error variant
#[macro_export]
macro_rules! assert_err {
    ($r:expr) => {{
        let r = $r;
        match r {
            Ok(v) => panic!("Unexpected success {:?}", v),
            Err(e) => e,
        }
    }};
}

/// Assert that walking the graph built from `$input` starting at `$root`
/// prints exactly `$lines`
#[macro_export]
macro_rules! assert_output {
    ($input:expr, $root:expr, $lines:expr) => {{
        let graph = assert_ok!(crate::parse_rules($input.lines()));
        let steps = assert_ok!(crate::traverse(&graph, $root));
        let mut out = Vec::new();
        assert_ok!(crate::print_steps(&steps, &mut out));
        let out = String::from_utf8(out).expect("Output should be UTF-8");
        let expected: Vec<&str> = $lines;

        assert_eq!(out.lines().collect::<Vec<_>>(), expected);
    }};
}
