mod common;

#[cfg(test)]
mod interpreter_tests {
    use std::io::Cursor;

    use super::common::{output_of, run, runtime_error_of, session, SharedBuffer};
    use koi::{Interpreter, Koi, RunError};

    #[test]
    fn test_arithmetic_and_printing() {
        assert_eq!(
            output_of("print 1 + 2 * 3; print 10 / 4; print -3; print 7 % 3; print 0.1 + 0.2 > 0.3;"),
            "7\n2.5\n-3\n1\ntrue\n"
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(output_of("print \"a\" + \"b\"; print 1 + 1;"), "ab\n2\n");

        let (_, message) = runtime_error_of("print \"a\" + 1;");
        assert_eq!(
            message,
            "Operands of '+' must be two numbers or two strings, got string and number.\n[line 1]"
        );
    }

    #[test]
    fn test_comparison_requires_numbers() {
        let (_, message) = runtime_error_of("print \"a\" < \"b\";");

        assert_eq!(
            message,
            "Operands of '<' must be numbers, got string and string.\n[line 1]"
        );
    }

    #[test]
    fn test_division_by_zero() {
        let (output, message) = runtime_error_of("print 1;\nprint 1 / 0;\nprint 2;");

        assert_eq!(output, "1\n");
        assert_eq!(message, "Division by zero: cannot divide 1 by 0.\n[line 2]");
    }

    #[test]
    fn test_equality_never_errors() {
        assert_eq!(
            output_of(
                "print nil == nil; print nil == false; print 1 == \"1\"; \
                 print \"a\" == \"a\"; print 2 != 3; print clock == clock;"
            ),
            "true\nfalse\nfalse\ntrue\ntrue\ntrue\n"
        );
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(
            output_of(
                "if (0) print \"zero\"; if (\"\") print \"empty\"; \
                 if (nil) print \"nil\"; else print \"falsy\"; print !nil; print !0;"
            ),
            "zero\nempty\nfalsy\ntrue\nfalse\n"
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output_of("print nil or \"x\"; print 1 and 2; print false and undefined; print \"a\" or undefined;"),
            "x\n2\nfalse\na\n"
        );
    }

    #[test]
    fn test_block_shadowing() {
        assert_eq!(
            output_of("var a = 1; { var a = 2; print a; } print a;"),
            "2\n1\n"
        );
    }

    #[test]
    fn test_assignment_reaches_enclosing_scope() {
        assert_eq!(
            output_of("var a = 1; { a = 2; { a = a + 1; } } print a;"),
            "3\n"
        );
    }

    #[test]
    fn test_loops() {
        assert_eq!(
            output_of(
                "var sum = 0; for (var i = 1; i <= 4; i = i + 1) sum = sum + i; print sum; \
                 var n = 3; while (n > 0) { print n; n = n - 1; }"
            ),
            "10\n3\n2\n1\n"
        );
    }

    #[test]
    fn test_recursion() {
        assert_eq!(
            output_of("fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);"),
            "55\n"
        );
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(output_of("fun f() {} print f(); print f;"), "nil\n<fn f>\n");
    }

    #[test]
    fn test_counter_closure() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    print i;
                }
                return count;
            }

            var counter = makeCounter();
            counter();
            counter();
            counter();

            var other = makeCounter();
            other();
        "#;

        assert_eq!(output_of(source), "1\n2\n3\n1\n");
    }

    #[test]
    fn test_closure_binds_lexically() {
        // The closure keeps seeing the global `a`, not the later local.
        let source = r#"
            var a = "global";
            {
                fun show() {
                    print a;
                }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(output_of(source), "global\nglobal\n");
    }

    #[test]
    fn test_return_unwinds_loops() {
        let source = r#"
            fun first(limit) {
                var i = 0;
                while (true) {
                    if (i == limit) return i;
                    i = i + 1;
                }
            }
            print first(5);
        "#;

        assert_eq!(output_of(source), "5\n");
    }

    #[test]
    fn test_classes_fields_and_methods() {
        let source = r#"
            class Point {
                init(x, y) {
                    this.x = x;
                    this.y = y;
                }

                sum() {
                    return this.x + this.y;
                }
            }

            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            print p.sum();
            print p;
            print Point;
        "#;

        assert_eq!(output_of(source), "3\n12\nPoint instance\nPoint\n");
    }

    #[test]
    fn test_bound_methods_keep_their_instance() {
        let source = r#"
            class Greeter {
                init(name) { this.name = name; }
                greet() { print "hi " + this.name; }
            }

            var greet = Greeter("koi").greet;
            greet();
        "#;

        assert_eq!(output_of(source), "hi koi\n");
    }

    #[test]
    fn test_fields_shadow_methods() {
        let source = r#"
            class C { m() { return "method"; } }
            var c = C();
            c.m = "field";
            print c.m;
        "#;

        assert_eq!(output_of(source), "field\n");
    }

    #[test]
    fn test_initializer_returns_instance() {
        let source = r#"
            class P {
                init() {
                    this.x = 1;
                    return;
                }
            }
            var p = P();
            print p.init();
            print p.init() == p;
        "#;

        assert_eq!(output_of(source), "P instance\ntrue\n");
    }

    #[test]
    fn test_inheritance_and_super() {
        let source = r#"
            class A {
                init(n) { this.n = n; }
                describe() { return "A with " + this.name(); }
                name() { return "a"; }
            }

            class B < A {
                init(n) {
                    super.init(n);
                    this.extra = n * 2;
                }
                name() { return "b"; }
                total() { return this.n + this.extra; }
            }

            var b = B(3);
            print b.describe();
            print b.total();
            print b;
        "#;

        assert_eq!(output_of(source), "A with b\n9\nB instance\n");
    }

    #[test]
    fn test_inherited_initializer() {
        let source = r#"
            class Base { init() { this.value = 42; } }
            class Derived < Base { show() { print this.value; } }
            Derived().show();
        "#;

        assert_eq!(output_of(source), "42\n");
    }

    #[test]
    fn test_super_skips_own_override() {
        let source = r#"
            class A { method() { print "A method"; } }
            class B < A {
                method() { print "B method"; }
                test() { super.method(); }
            }
            class C < B {}
            C().test();
        "#;

        assert_eq!(output_of(source), "A method\n");
    }

    #[test]
    fn test_superclass_must_be_a_class() {
        let (_, message) = runtime_error_of("var NotAClass = 1;\nclass B < NotAClass {}");

        assert_eq!(message, "Superclass must be a class.\n[line 2]");
    }

    #[test]
    fn test_property_errors() {
        let (_, message) = runtime_error_of("class A {}\nprint A().nope;");
        assert_eq!(message, "Undefined property 'nope'.\n[line 2]");

        let (_, message) = runtime_error_of("var x = 1; print x.y;");
        assert_eq!(message, "Only instances have properties.\n[line 1]");

        let (_, message) = runtime_error_of("var x = 1; x.y = 2;");
        assert_eq!(message, "Only instances have fields.\n[line 1]");
    }

    #[test]
    fn test_undefined_variables() {
        let (_, message) = runtime_error_of("print x;");
        assert_eq!(message, "Undefined variable 'x'.\n[line 1]");

        let (_, message) = runtime_error_of("y = 1;");
        assert_eq!(message, "Undefined variable 'y'.\n[line 1]");
    }

    #[test]
    fn test_call_errors() {
        let (output, message) =
            runtime_error_of("fun f() {}\nf(1);\nprint \"unreachable\";");

        assert_eq!(output, "");
        assert_eq!(message, "Expected 0 arguments but got 1.\n[line 2]");

        let (_, message) = runtime_error_of("\"str\"();");
        assert_eq!(message, "Can only call functions and classes, got string.\n[line 1]");

        let (_, message) = runtime_error_of("class A { init(a, b) {} }\nA(1);");
        assert_eq!(message, "Expected 2 arguments but got 1.\n[line 2]");
    }

    #[test]
    fn test_native_errors_carry_call_line() {
        let (_, message) = runtime_error_of("\n\nread_file(1);");

        assert_eq!(message, "read_file: path must be a string, got number\n[line 3]");
    }

    #[test]
    fn test_static_errors_prevent_execution() {
        let (output, result) = run("print 1;\nprint ;");

        assert_eq!(output, "");
        match result {
            Err(e @ RunError::Static(_)) => {
                assert_eq!(e.exit_code(), 65);
                assert_eq!(e.to_string(), "[line 2] Error at ';': Expect expression.");
            }
            other => panic!("expected a static error, got {:?}", other),
        }

        let (output, result) = run("print 1;\n{ var a = a; }");
        assert_eq!(output, "");
        assert!(matches!(result, Err(RunError::Static(_))));
    }

    #[test]
    fn test_runtime_error_exit_code() {
        let (_, result) = run("print nil + 1;");

        assert_eq!(result.map_err(|e| e.exit_code()), Err(70));
    }

    #[test]
    fn test_clock_native() {
        assert_eq!(output_of("print clock() > 0; print clock;"), "true\n<native fn clock>\n");
    }

    #[test]
    fn test_file_natives() {
        let path = std::env::temp_dir().join(format!("koi-natives-{}.txt", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        let source = format!(
            "write_file(\"{0}\", \"fish \" + 3); print read_file(\"{0}\");",
            path
        );

        // Mixing a string and a number is still an error.
        let (_, result) = run(&source);
        assert!(matches!(result, Err(RunError::Runtime(_))));

        let source = format!(
            "write_file(\"{0}\", \"fish\"); print read_file(\"{0}\");",
            path
        );
        assert_eq!(output_of(&source), "fish\n");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_session_keeps_globals_between_runs() {
        let (mut koi, buffer) = session();

        koi.run("var a = 1;").unwrap();
        koi.run("fun f() { return a + 1; }").unwrap();
        koi.run("print f();").unwrap();

        assert_eq!(buffer.contents(), "2\n");
    }

    #[test]
    fn test_session_closures_survive_later_runs() {
        let (mut koi, buffer) = session();

        koi.run("fun mk() { var n = 0; fun inc() { n = n + 1; return n; } return inc; } var c = mk();")
            .unwrap();
        koi.run("print c();").unwrap();
        koi.run("{ var z = 5; print z; }").unwrap();
        koi.run("print c();").unwrap();

        assert_eq!(buffer.contents(), "1\n5\n2\n");
    }

    #[test]
    fn test_session_recovers_after_errors() {
        let (mut koi, buffer) = session();

        assert!(koi.run("fun f() { var local = 1; return missing; } f();").is_err());
        assert!(koi.run("print ;").is_err());

        // The failed call must not leave its scope behind as the current one.
        koi.run("var after = 3;").unwrap();
        koi.run("fun g() { return after; } print g();").unwrap();

        assert_eq!(buffer.contents(), "3\n");
    }

    #[test]
    fn test_unbounded_recursion_is_runtime_error() {
        let (output, result) = run("print 1;\nfun f() { f(); }\nf();\nprint 2;");

        assert_eq!(output, "1\n");
        match result {
            Err(e @ RunError::Runtime(_)) => {
                assert_eq!(e.exit_code(), 70);
                assert_eq!(e.to_string(), "Stack overflow.\n[line 2]");
            }
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_runaway_initializer_is_runtime_error() {
        let (_, message) = runtime_error_of("class Loop { init() { Loop(); } }\nLoop();");

        assert_eq!(message, "Stack overflow.\n[line 1]");
    }

    #[test]
    fn test_session_survives_stack_overflow() {
        let (mut koi, buffer) = session();

        assert!(matches!(
            koi.run("fun f() { f(); } f();"),
            Err(RunError::Runtime(_))
        ));

        // The depth count unwinds with the error, so a deep but bounded
        // recursion still fits afterwards.
        koi.run("fun count(n) { if (n == 0) return 0; return count(n - 1) + 1; }")
            .unwrap();
        koi.run("print count(1000);").unwrap();

        assert_eq!(buffer.contents(), "1000\n");
    }

    #[test]
    fn test_deeply_nested_source() {
        let depth = 2000;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(output_of(&source), "1\n");

        let source = format!("print {}true;", "!".repeat(depth + 1));
        assert_eq!(output_of(&source), "false\n");
    }

    #[test]
    fn test_input_prompts_through_output_sink() {
        let buffer = SharedBuffer::default();
        let interpreter =
            Interpreter::with_output(buffer.clone()).with_input(Cursor::new("koi\nsecond\r\n"));
        let mut koi = Koi::with_interpreter(interpreter);

        koi.run("var name = input(\"name? \"); print \"hi \" + name;")
            .unwrap();
        koi.run("print input(\"\"); print input(\"> \") == \"\";").unwrap();

        assert_eq!(buffer.contents(), "name? hi koi\nsecond\n> true\n");
    }

    #[test]
    fn test_inherits_and_not_spellings() {
        let source = r#"
            class A { m() { return "a"; } }
            class B inherits A {}
            print B().m();
            print not nil;
            print not 1;
        "#;

        assert_eq!(output_of(source), "a\ntrue\nfalse\n");
    }
}
