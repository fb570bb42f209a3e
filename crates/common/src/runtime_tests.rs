// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn expand_replaces_both_tokens() {
    let template = vec!["gcc".to_string(), "<entry>".to_string(), "-o".to_string(), "<output>".to_string()];
    let expanded = expand_cmd(&template, "/ws/main.c", "/ws/main");
    assert_eq!(expanded, vec!["gcc", "/ws/main.c", "-o", "/ws/main"]);
}

#[test]
fn expand_is_a_fixed_point_under_reexpansion() {
    let template = vec!["<entry>".to_string()];
    let once = expand_cmd(&template, "a.py", "out");
    let twice = expand_cmd(
        &once.iter().cloned().collect::<Vec<_>>(),
        "a.py",
        "out",
    );
    assert_eq!(once, twice);
}

#[test]
fn interpreted_language_has_no_compile_cmds() {
    let d = RuntimeDescriptor {
        name: "python3".into(),
        extension: "py".into(),
        compile_cmds: vec![],
        run_cmds: vec![vec!["python3".into(), "<entry>".into()]],
    };
    assert!(d.is_interpreted());
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn path_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_/.-]{1,20}".prop_filter("must not itself contain a template token", |s| {
            !s.contains("<entry>") && !s.contains("<output>")
        })
    }

    proptest! {
        /// §8 invariant 6: expansion is a fixed point under re-expansion
        /// with the same `entry`/`output` pair, for any template made of
        /// arbitrary argv-shaped strings.
        #[test]
        fn expand_is_always_a_fixed_point(
            args in prop::collection::vec("[a-zA-Z0-9_/<>.-]{0,20}", 0..6),
            entry in path_strategy(),
            output in path_strategy(),
        ) {
            let once = expand_cmd(&args, &entry, &output);
            let twice = expand_cmd(&once, &entry, &output);
            prop_assert_eq!(once, twice);
        }

        /// Expansion never changes the number of argv elements — it's a
        /// per-element text substitution, never a split or a join.
        #[test]
        fn expand_preserves_argv_length(
            args in prop::collection::vec("[a-zA-Z0-9_/<>.-]{0,20}", 0..6),
            entry in path_strategy(),
            output in path_strategy(),
        ) {
            let expanded = expand_cmd(&args, &entry, &output);
            prop_assert_eq!(expanded.len(), args.len());
        }
    }
}
