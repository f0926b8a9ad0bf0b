use std::fmt::Display;

use crate::{
    codegen, lexer, parser,
    util::fmt::tree,
};

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    Codegen(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    GoOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

fn format_error(e: impl Display) -> Vec<String> {
    vec![e.to_string()]
}

/// Runs the stages `test` asks for, returning the formatted output of the
/// last one (empty if an earlier stage failed) and the formatted errors.
#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let (input, stage) = match test {
        Test::ParserProgram(input) => (input, Stage::Program),
        Test::ParserExpr(input) => (input, Stage::Expr),
        Test::Codegen(input) => (input, Stage::Codegen),
    };

    let tokens = match lexer::lex_in_new(input) {
        Ok(tokens) => tokens,
        Err(e) => return (String::new(), format_error(e)),
    };

    match stage {
        Stage::Program => match parser::parse_program(&tokens) {
            Ok(prog) => (tree::print_program_string(&prog), vec![]),
            Err(e) => (String::new(), format_error(e)),
        },
        Stage::Expr => match parser::parse_expr(&tokens) {
            Ok(expr) => (tree::print_expr_string(&expr), vec![]),
            Err(e) => (String::new(), format_error(e)),
        },
        Stage::Codegen => {
            let prog = match parser::parse_program(&tokens) {
                Ok(prog) => prog,
                Err(e) => return (String::new(), format_error(e)),
            };
            match codegen::generate(&prog) {
                Ok(code) => (code, vec![]),
                Err(e) => (String::new(), format_error(e)),
            }
        }
    }
}

enum Stage {
    Program,
    Expr,
    Codegen,
}

#[track_caller]
pub fn run_assertion(
    assertion: Assertion,
    formatted_actual_output: &str,
    formatted_actual_errors: &[String],
) {
    let no_errors: &[&str] = &[];
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, no_errors);
            ::pretty_assertions::assert_eq!(formatted_actual_output.trim(), expected_tree.trim());
        }
        Assertion::GoOk(expected_code) => {
            // Tabs are expanded so expectations can be indented with spaces.
            let actual = formatted_actual_output.replace('\t', "    ");
            ::pretty_assertions::assert_eq!(formatted_actual_errors, no_errors);
            ::pretty_assertions::assert_eq!(actual.trim(), expected_code.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors)
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let (formatted_actual_output, formatted_actual_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual_output, &formatted_actual_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, go_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::GoOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(codegen, program), $source:expr) => {
        crate::util::test_utils::Test::Codegen($source)
    };
}
pub(crate) use tree_tests;
