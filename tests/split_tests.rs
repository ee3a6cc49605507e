mod common;

use common::{run_symbolic, the_stdout};

#[test]
fn unquoted_expansion_splits_on_whitespace() {
    let src = "xs := \"one two  three\"\nfor w in $xs { echo w=$w }";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "w=one\nw=two\nw=three");
}

#[test]
fn quoted_expansion_does_not_split() {
    let src = "xs := \"one two\"\nfor w in \"$xs\" { echo w=$w }";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "w=one two");
}

#[test]
fn single_word_splits_to_itself() {
    let src = "x := \"word\"\nfor w in $x { echo got $w }";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "got word");
}

#[test]
fn splitting_an_empty_expansion_yields_no_fields() {
    let report = run_symbolic("for w in $missing { echo never }\necho done");
    assert_eq!(the_stdout(&report.success), "done");
}

#[test]
fn quoted_empty_is_a_real_argument() {
    // `test -z` sees one empty argument, not zero arguments.
    let report = run_symbolic("if test -z \"\" { echo empty } else { echo nonempty }");
    assert_eq!(the_stdout(&report.success), "empty");
}

#[test]
fn substitution_output_splits_in_lists() {
    let report = run_symbolic("for w in $(echo a b) { echo [$w] }");
    assert_eq!(the_stdout(&report.success), "[a]\n[b]");
}

#[test]
fn foreach_keeps_the_last_iteration_result() {
    // The negation makes the false result a value instead of an exit.
    let src = "for w in a b { ! test $w != a }\necho $?";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "1");
}

#[test]
fn empty_foreach_succeeds() {
    let report = run_symbolic("! true\nfor w in { : }\necho $?");
    assert_eq!(the_stdout(&report.success), "0");
}

#[test]
fn foreach_aborts_on_exit() {
    let report = run_symbolic("for w in a b c { echo $w\nexit 1 }");
    assert_eq!(report.success.len(), 0);
    assert_eq!(the_stdout(&report.failure), "a");
}

#[test]
fn loop_variable_persists_after_the_loop() {
    let report = run_symbolic("for w in a b { : }\necho last=$w");
    assert_eq!(the_stdout(&report.success), "last=b");
}
