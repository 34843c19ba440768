//! Closure capture semantics
//!
//! Functions capture the environment frame they were declared in, not a
//! copy of its values. Two closures over the same frame observe each
//! other's writes; closures from separate calls are independent.

mod common;

use common::*;

#[test]
fn test_counter_factory() {
    assert_prints(
        r#"
        fn make_counter() {
            var count = 0;
            fn increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = make_counter();
        print counter();
        print counter();
        print counter();
        "#,
        "1\n2\n3\n",
    );
}

#[test]
fn test_counters_from_separate_calls_are_independent() {
    assert_prints(
        r#"
        fn make_counter() {
            var count = 0;
            fn increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var a = make_counter();
        var b = make_counter();
        a();
        a();
        print a();
        print b();
        "#,
        "3\n1\n",
    );
}

#[test]
fn test_closures_over_one_frame_share_state() {
    assert_prints(
        r#"
        fn make_pair() {
            var value = 0;
            fn set(v) { value = v; }
            fn get() { return value; }
            var pair = [set, get];
            return pair;
        }
        var pair = make_pair();
        var set = pair[0];
        var get = pair[1];
        set(42);
        print get();
        "#,
        "42\n",
    );
}

#[test]
fn test_closure_over_parameter() {
    assert_prints(
        r#"
        fn adder(a) {
            fn add(b) { return a + b; }
            return add;
        }
        var add5 = adder(5);
        print add5(3);
        print add5(10);
        "#,
        "8\n15\n",
    );
}

#[test]
fn test_nested_closures_capture_through_levels() {
    assert_prints(
        r#"
        fn outer() {
            var x = "x";
            fn middle() {
                var y = "y";
                fn inner() {
                    print x + y;
                }
                return inner;
            }
            return middle();
        }
        var f = outer();
        f();
        "#,
        "xy\n",
    );
}

#[test]
fn test_loop_closures_share_the_induction_variable() {
    // The desugared for-loop declares one induction variable for all
    // iterations, so every closure sees its final value.
    assert_prints(
        r#"
        var fns = [];
        for (var i = 0; i < 3; i = i + 1) {
            fn capture() { return i; }
            fns.push(capture);
        }
        var first = fns[0];
        var last = fns[2];
        print first();
        print last();
        "#,
        "3\n3\n",
    );
}

#[test]
fn test_per_iteration_copy_detaches_closures() {
    assert_prints(
        r#"
        var fns = [];
        for (var i = 0; i < 3; i = i + 1) {
            var snapshot = i;
            fn capture() { return snapshot; }
            fns.push(capture);
        }
        var first = fns[0];
        var last = fns[2];
        print first();
        print last();
        "#,
        "0\n2\n",
    );
}

#[test]
fn test_function_values_pass_as_arguments() {
    assert_prints(
        r#"
        fn twice(f, x) { return f(f(x)); }
        fn inc(n) { return n + 1; }
        print twice(inc, 5);
        "#,
        "7\n",
    );
}

#[test]
fn test_recursion_through_the_declaring_scope() {
    assert_eval_number(
        r#"
        fn fact(n) {
            if (n <= 1) { return 1; }
            return n * fact(n - 1);
        }
        fact(6)
        "#,
        720.0,
    );
}

#[test]
fn test_closure_outlives_the_declaring_call() {
    // The frame stays alive through the captured reference even though
    // the call that created it has returned.
    assert_prints(
        r#"
        fn stash() {
            var secret = "kept";
            fn reveal() { print secret; }
            return reveal;
        }
        var f = stash();
        f();
        "#,
        "kept\n",
    );
}

#[test]
fn test_function_display_forms() {
    assert_prints(
        r#"
        fn named() {}
        print named;
        print clock;
        "#,
        "<fn named>\n<native fn clock>\n",
    );
}
