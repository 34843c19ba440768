//! List literals, indexing, and the builtin method table

mod common;

use common::*;
use kestrel_runtime::error_codes;

#[test]
fn test_list_literal_and_display() {
    assert_prints("print [1, 2, 3];", "[1, 2, 3]\n");
    assert_prints("print [];", "[]\n");
    assert_prints("print [1, [2, 3], \"x\", null];", "[1, [2, 3], x, null]\n");
}

#[test]
fn test_index_read_and_write() {
    assert_prints(
        r#"
        var xs = [10, 20, 30];
        print xs[0];
        print xs[2];
        xs[1] = 99;
        print xs;
        "#,
        "10\n30\n[10, 99, 30]\n",
    );
}

#[test]
fn test_index_write_yields_the_value() {
    assert_eval_number("var xs = [1]; xs[0] = 5", 5.0);
}

#[test]
fn test_index_errors() {
    assert_error_message(
        "var xs = [1, 2, 3]; xs[5];",
        error_codes::INDEX_OUT_OF_RANGE,
        "Index 5 out of range for list of length 3.",
    );
    assert_error_message(
        "var xs = [1, 2, 3]; xs[-1];",
        error_codes::INDEX_OUT_OF_RANGE,
        "Index -1 out of range for list of length 3.",
    );
    assert_error_message(
        "var xs = [1]; xs[0.5];",
        error_codes::INVALID_INDEX,
        "List index must be an integer, got 0.5.",
    );
    assert_error_message(
        "var xs = [1]; xs[\"0\"];",
        error_codes::INVALID_INDEX,
        "List index must be a number, got string.",
    );
    assert_error_message(
        "var n = 4; n[0];",
        error_codes::TYPE_MISMATCH,
        "Cannot index into a number.",
    );
}

#[test]
fn test_lists_are_shared_by_reference() {
    assert_prints(
        r#"
        var a = [1];
        var b = a;
        b.push(2);
        print a;
        print a == b;
        print [1, 2] == [1, 2];
        "#,
        "[1, 2]\ntrue\nfalse\n",
    );
}

#[test]
fn test_push_and_pop() {
    assert_prints(
        r#"
        var xs = [];
        print xs.push(1);
        xs.push(2);
        print xs;
        print xs.pop();
        print xs;
        "#,
        "null\n[1, 2]\n2\n[1]\n",
    );
}

#[test]
fn test_pop_from_empty_list() {
    assert_error_message(
        "[].pop();",
        error_codes::EMPTY_LIST,
        "Cannot pop from an empty list.",
    );
}

#[test]
fn test_length() {
    assert_eval_number("[].length()", 0.0);
    assert_eval_number("[1, 2, 3].length()", 3.0);
}

#[test]
fn test_insert_at() {
    assert_prints(
        r#"
        var xs = [2, 3];
        xs.insertAt(0, 1);
        print xs;
        xs.insertAt(3, 4);
        print xs;
        "#,
        "[1, 2, 3]\n[1, 2, 3, 4]\n",
    );
    assert_error_message(
        "var xs = [1]; xs.insertAt(3, 9);",
        error_codes::INDEX_OUT_OF_RANGE,
        "Index 3 out of range for list of length 1.",
    );
}

#[test]
fn test_remove_at_returns_the_removed_element() {
    assert_prints(
        r#"
        var xs = ["a", "b", "c"];
        print xs.removeAt(1);
        print xs;
        "#,
        "b\n[a, c]\n",
    );
    assert_error_message(
        "[].removeAt(0);",
        error_codes::INDEX_OUT_OF_RANGE,
        "Index 0 out of range for list of length 0.",
    );
}

#[test]
fn test_remove_takes_the_first_match() {
    assert_prints(
        r#"
        var xs = [1, 2, 1, 3];
        print xs.remove(1);
        print xs;
        print xs.remove(99);
        print xs;
        "#,
        "true\n[2, 1, 3]\nfalse\n[2, 1, 3]\n",
    );
}

#[test]
fn test_remove_all_counts_removals() {
    assert_prints(
        r#"
        var xs = [1, 2, 1, 3, 1];
        print xs.removeAll(1);
        print xs;
        print xs.removeAll(9);
        "#,
        "3\n[2, 3]\n0\n",
    );
}

#[test]
fn test_contains_and_index_of() {
    assert_prints(
        r#"
        var xs = ["a", "b", "a"];
        print xs.contains("b");
        print xs.contains("z");
        print xs.indexOf("a");
        print xs.lastIndexOf("a");
        print xs.indexOf("z");
        "#,
        "true\nfalse\n0\n2\n-1\n",
    );
}

#[test]
fn test_search_uses_identity_for_reference_values() {
    assert_prints(
        r#"
        var inner = [1];
        var xs = [inner, [1]];
        print xs.indexOf(inner);
        print xs.indexOf([1]);
        print xs.contains(inner);
        "#,
        "0\n-1\ntrue\n",
    );
}

#[test]
fn test_reverse_in_place() {
    assert_prints(
        r#"
        var xs = [1, 2, 3];
        print xs.reverse();
        print xs;
        "#,
        "null\n[3, 2, 1]\n",
    );
}

#[test]
fn test_sort_numbers_in_place() {
    assert_prints(
        r#"
        var xs = [3, 1, 2];
        xs.sort();
        print xs;
        "#,
        "[1, 2, 3]\n",
    );
}

#[test]
fn test_sort_strings_alphabetically() {
    assert_prints(
        r#"
        var xs = ["pear", "apple", "plum"];
        xs.sort();
        print xs;
        "#,
        "[apple, pear, plum]\n",
    );
}

#[test]
fn test_sorted_leaves_the_receiver_unchanged() {
    assert_prints(
        r#"
        var xs = [3, 1, 2];
        print xs.sorted();
        print xs;
        "#,
        "[1, 2, 3]\n[3, 1, 2]\n",
    );
}

#[test]
fn test_sort_rejects_unorderable_elements() {
    assert_error_message(
        "[true, false].sort();",
        error_codes::UNORDERABLE_LIST,
        "sort() cannot order a bool.",
    );
    assert_error_message(
        "[1, null].sorted();",
        error_codes::UNORDERABLE_LIST,
        "sorted() cannot order a null.",
    );
    assert_error_message(
        "[1, \"two\"].sort();",
        error_codes::UNORDERABLE_LIST,
        "sort() cannot order mixed numbers and strings.",
    );
}

#[test]
fn test_filter_mutates_the_receiver() {
    assert_prints(
        r#"
        fn even(n) { return n % 2 == 0; }
        var xs = [1, 2, 3, 4, 5];
        print xs.filter(even);
        print xs;
        "#,
        "null\n[2, 4]\n",
    );
}

#[test]
fn test_filtered_returns_a_new_list() {
    assert_prints(
        r#"
        fn even(n) { return n % 2 == 0; }
        var xs = [1, 2, 3, 4];
        print xs.filtered(even);
        print xs;
        "#,
        "[2, 4]\n[1, 2, 3, 4]\n",
    );
}

#[test]
fn test_filter_predicate_uses_truthiness() {
    assert_prints(
        r#"
        fn identity(x) { return x; }
        var xs = [0, 1, "", "x", null, true];
        xs.filter(identity);
        print xs;
        "#,
        "[1, x, true]\n",
    );
}

#[test]
fn test_filter_snapshots_against_reentrant_mutation() {
    // The predicate sees and may mutate the live list, but the filter
    // works from a snapshot and installs only its own survivors.
    assert_prints(
        r#"
        var xs = [1, 2, 3];
        fn keep_and_grow(x) {
            xs.push(100);
            return true;
        }
        xs.filter(keep_and_grow);
        print xs;
        "#,
        "[1, 2, 3]\n",
    );
}

#[test]
fn test_filter_requires_a_callable() {
    assert_error_message(
        "[1].filter(5);",
        error_codes::NOT_CALLABLE,
        "Can only call functions and classes.",
    );
}

#[test]
fn test_custom_sort_with_a_comparator() {
    assert_prints(
        r#"
        fn descending(a, b) { return b - a; }
        var xs = [2, 5, 1, 4];
        print xs.customSort(descending);
        print xs;
        "#,
        "null\n[5, 4, 2, 1]\n",
    );
}

#[test]
fn test_custom_sort_orders_arbitrary_values() {
    assert_prints(
        r#"
        fn by_length(a, b) { return a.length() - b.length(); }
        var xs = [[1, 2, 3], [], [1]];
        xs.customSort(by_length);
        print xs;
        "#,
        "[[], [1], [1, 2, 3]]\n",
    );
}

#[test]
fn test_custom_sort_comparator_must_return_a_number() {
    assert_error_message(
        r#"
        fn bad(a, b) { return "smaller"; }
        [2, 1].customSort(bad);
        "#,
        error_codes::TYPE_MISMATCH,
        "Comparator must return a number, got string.",
    );
}

#[test]
fn test_method_calls_chain_on_fresh_lists() {
    assert_prints(
        r#"
        fn positive(n) { return n > 0; }
        var xs = [3, -1, 2, -5, 1];
        print xs.filtered(positive).sorted();
        print xs;
        "#,
        "[1, 2, 3]\n[3, -1, 2, -5, 1]\n",
    );
}

#[test]
fn test_unknown_list_method() {
    assert_error_message(
        "[].shove(1);",
        error_codes::UNDEFINED_PROPERTY,
        "Undefined property 'shove'.",
    );
}

#[test]
fn test_list_methods_are_first_class_once_bound() {
    assert_prints(
        r#"
        var xs = [];
        var push = xs.push;
        push(7);
        print xs;
        print push;
        "#,
        "[7]\n<native fn push>\n",
    );
}

#[test]
fn test_arity_is_checked_for_list_methods() {
    assert_error_message(
        "[1, 2].push();",
        error_codes::ARITY_MISMATCH,
        "Expected 1 arguments but got 0.",
    );
}
