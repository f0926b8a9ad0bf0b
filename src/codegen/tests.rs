use pretty_assertions::assert_eq;

use crate::{
    codegen::generate,
    lexer, parser,
    util::test_utils::tree_tests,
};

tree_tests!(
    use codegen;

    fn test_concatenation_converts_int_operand() {
        let program = r#"
            x = 5
            y = "val:"
            parayu(y + x)
        "#;
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                x := 5
                y := "val:"
                fmt.Println(y + strconv.Itoa(x))
            }
        "#;
    }

    fn test_for_range_is_inclusive() {
        let program = "oron_ayi i edukk (1..3) { parayu(i) }";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                for i := 1; i <= 3; i++ {
                    fmt.Println(strconv.Itoa(i))
                }
            }
        "#;
    }

    fn test_print_int_expression_converted_whole() {
        let program = "parayu(1 + 2)";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                fmt.Println(strconv.Itoa(1 + 2))
            }
        "#;
    }

    fn test_print_string_with_int_literal() {
        let program = r#"parayu("a" + 1)"#;
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                fmt.Println("a" + strconv.Itoa(1))
            }
        "#;
    }

    fn test_print_plain_string_needs_no_strconv() {
        let program = r#"parayu("hello")"#;
        let go_ok = r#"
            package main

            import (
                "fmt"
            )

            func main() {
                fmt.Println("hello")
            }
        "#;
    }

    fn test_print_comparison() {
        let program = "parayu(1 < 2)";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                fmt.Println(strconv.FormatBool(1 < 2))
            }
        "#;
    }

    fn test_no_imports_without_io() {
        let program = "x = 1 + 2";
        let go_ok = "
            package main

            func main() {
                x := 1 + 2
                _ = x
            }
        ";
    }

    fn test_empty_program() {
        let program = "";
        let go_ok = "
            package main

            func main() {
            }
        ";
    }

    fn test_parenthesization() {
        let program = "
            x = 10
            a = (x - 1) - 2
            b = x - (1 - 2)
            c = (x + 1) * 2
            d = x + 1 * 2
            e = x * 2 + 1
            f = (x) / (2)
        ";
        let go_ok = "
            package main

            func main() {
                x := 10
                a := (x - 1) - 2
                b := x - (1 - 2)
                c := (x + 1) * 2
                d := x + 1 * 2
                e := x * 2 + 1
                f := x / 2
                _ = a
                _ = b
                _ = c
                _ = d
                _ = e
                _ = f
            }
        ";
    }

    fn test_reassignment() {
        let program = r#"
            s = "a"
            s = s + "b"
            n = 1
            n = n * 2
        "#;
        let go_ok = r#"
            package main

            func main() {
                s := "a"
                s = s + "b"
                n := 1
                n = n * 2
            }
        "#;
    }

    fn test_read_then_if_else() {
        let program = r#"
            kelk(name)
            ith_sheriyano (name == "admin") enkil {
                parayu("welcome")
            } alle {
                parayu("go away " + name)
            }
        "#;
        let go_ok = r#"
            package main

            import (
                "fmt"
            )

            func main() {
                var name string
                fmt.Scanln(&name)
                if name == "admin" {
                    fmt.Println("welcome")
                } else {
                    fmt.Println("go away " + name)
                }
            }
        "#;
    }

    fn test_while() {
        let program = "
            i = 0
            ellam_sheriyano (i < 3) enkil {
                i = i + 1
            }
            parayu(i)
        ";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                i := 0
                for i < 3 {
                    i = i + 1
                }
                fmt.Println(strconv.Itoa(i))
            }
        "#;
    }

    fn test_nested_loops() {
        let program = "
            oron_ayi i edukk (1..2) {
                oron_ayi j edukk (i..2) {
                    parayu(i * j)
                }
            }
        ";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                for i := 1; i <= 2; i++ {
                    for j := i; j <= 2; j++ {
                        fmt.Println(strconv.Itoa(i * j))
                    }
                }
            }
        "#;
    }

    fn test_sibling_loops_reuse_binder() {
        let program = "
            oron_ayi i edukk (1..2) { }
            oron_ayi i edukk (3..4) { }
        ";
        let go_ok = "
            package main

            func main() {
                for i := 1; i <= 2; i++ {
                }
                for i := 3; i <= 4; i++ {
                }
            }
        ";
    }

    fn test_expression_statement_emits_nothing() {
        let program = "x = 1\nx + 1";
        let go_ok = "
            package main

            func main() {
                x := 1
                _ = x
            }
        ";
    }

    fn test_string_literal_is_reproduced() {
        let program = r#"parayu("say \"hi\"")"#;
        let go_ok = r#"
            package main

            import (
                "fmt"
            )

            func main() {
                fmt.Println("say \\\"hi\\\"")
            }
        "#;
    }

    fn test_go_keywords_are_renamed() {
        let program = "
            func = 1
            range = func + 1
            var = range
            var = var * 2
            parayu(var)
        ";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                func_ := 1
                range_ := func_ + 1
                var_ := range_
                var_ = var_ * 2
                fmt.Println(strconv.Itoa(var_))
            }
        "#;
    }

    fn test_imported_package_names_are_renamed() {
        let program = r#"
            fmt = 1
            parayu(fmt)
            strconv = 2
            parayu("n" + strconv)
        "#;
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                fmt_ := 1
                fmt.Println(strconv.Itoa(fmt_))
                strconv_ := 2
                fmt.Println("n" + strconv.Itoa(strconv_))
            }
        "#;
    }

    fn test_blank_identifier_is_renamed() {
        let program = "_ = 1\nparayu(_)";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                __ := 1
                fmt.Println(strconv.Itoa(__))
            }
        "#;
    }

    fn test_renaming_does_not_collide() {
        let program = "fmt = 1\nfmt_ = 2\nparayu(fmt + fmt_)";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                fmt_ := 1
                fmt__ := 2
                fmt.Println(strconv.Itoa(fmt_ + fmt__))
            }
        "#;
    }

    fn test_read_target_is_renamed() {
        let program = "kelk(type)\nkelk(string)\nparayu(type + string)";
        let go_ok = r#"
            package main

            import (
                "fmt"
            )

            func main() {
                var type_ string
                fmt.Scanln(&type_)
                var string_ string
                fmt.Scanln(&string_)
                fmt.Println(type_ + string_)
            }
        "#;
    }

    fn test_loop_binder_is_renamed() {
        let program = "oron_ayi range edukk (1..2) { parayu(range) }";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                for range_ := 1; range_ <= 2; range_++ {
                    fmt.Println(strconv.Itoa(range_))
                }
            }
        "#;
    }

    fn test_unread_block_local_is_discarded_in_its_block() {
        let program = "ith_sheriyano (1 == 1) enkil { t = 1 }";
        let go_ok = "
            package main

            func main() {
                if 1 == 1 {
                    t := 1
                    _ = t
                }
            }
        ";
    }

    fn test_read_in_nested_block_counts_as_use() {
        let program = "n = 3\nith_sheriyano (1 < 2) enkil { parayu(n) }";
        let go_ok = r#"
            package main

            import (
                "fmt"
                "strconv"
            )

            func main() {
                n := 3
                if 1 < 2 {
                    fmt.Println(strconv.Itoa(n))
                }
            }
        "#;
    }

    fn test_reassignment_alone_is_not_a_use() {
        let program = "x = 1\nx = 2";
        let go_ok = "
            package main

            func main() {
                x := 1
                x = 2
                _ = x
            }
        ";
    }

    fn test_read_twice() {
        let program = "kelk(x)\nkelk(x)";
        let expected_errors = &["2:6: 'x' is already declared"];
    }

    fn test_read_assigned_name() {
        let program = "x = 1\nkelk(x)";
        let expected_errors = &["2:6: 'x' is already declared"];
    }

    fn test_for_binder_not_visible_after_loop() {
        let program = "oron_ayi i edukk (1..3) { }\nparayu(i)";
        let expected_errors = &["2:8: 'i' is not declared"];
    }

    fn test_for_binder_shadows_outer() {
        let program = "i = 0\noron_ayi i edukk (1..2) { }";
        let expected_errors = &["2:10: 'i' is already declared"];
    }

    fn test_block_declaration_does_not_escape() {
        let program = "ith_sheriyano (1 == 1) enkil { t = 1 }\nparayu(t)";
        let expected_errors = &["2:8: 't' is not declared"];
    }

    fn test_undeclared_in_value() {
        let program = "y = x + 1";
        let expected_errors = &["1:5: 'x' is not declared"];
    }

    fn test_undeclared_in_condition() {
        let program = "ellam_sheriyano (k < 3) enkil { }";
        let expected_errors = &["1:18: 'k' is not declared"];
    }

    fn test_type_mismatch() {
        let program = "x = 1\nx = \"s\"";
        let expected_errors = &["2:1: cannot assign string to 'x' of type int"];
    }

    fn test_lex_error_surfaces() {
        let program = "x = 1 @ 2";
        let expected_errors = &["1:7: unexpected character '@'"];
    }

    fn test_parse_error_surfaces() {
        let program = "parayu(1";
        let expected_errors = &["1:9: expected `)`, but got end of input"];
    }
);

fn parse(src: &str) -> crate::ast::Program {
    let tokens = lexer::lex_in_new(src).unwrap();
    parser::parse_program(&tokens).unwrap()
}

#[test]
fn test_generate_is_deterministic() {
    let program = parse(
        r#"
        kelk(a)
        oron_ayi i edukk (1..10) {
            ith_sheriyano (i == 5) enkil { parayu(a + i) } alle { parayu(i) }
        }
        "#,
    );
    let first = generate(&program).unwrap();
    let second = generate(&program).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_imports_are_sorted_regardless_of_use_order() {
    // strconv is recorded before fmt, since the argument is rendered first.
    let code = generate(&parse("parayu(1)")).unwrap();
    let fmt = code.find("\"fmt\"").unwrap();
    let strconv = code.find("\"strconv\"").unwrap();
    assert!(fmt < strconv, "{code}");
}
