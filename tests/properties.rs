//! Property-based tests for parser and validator invariants.

use cmdlisp::{
    ArgumentValue, CommandRegistry, Interpreter, ValidationError, parse_script,
};
use proptest::prelude::*;

/// Strings safe inside quotes: anything but `"` and `\`, biased towards
/// characters the grammar treats specially outside quotes.
fn quotable_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^\"\\\\]{0,24}".prop_map(String::from),
        "[a-z:()$/ \t\n\r_é漢-]{0,24}".prop_map(String::from),
    ]
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,8}".prop_map(String::from)
}

fn bare_value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9._]{1,8}".prop_map(String::from)
}

/// One argument as source text.
fn argument_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier_strategy(), bare_value_strategy()).prop_map(|(k, v)| format!("{}:{}", k, v)),
        bare_value_strategy(),
        identifier_strategy().prop_map(|name| format!("${}", name)),
        "[a-z :()$]{0,10}".prop_map(|s| format!("\"{}\"", s)),
    ]
}

/// One statement as source text, optionally assigned.
fn statement_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(identifier_strategy()),
        "[a-z][a-z0-9_:-]{0,8}",
        prop::collection::vec(argument_strategy(), 0..5),
    )
        .prop_map(|(var, name, args)| {
            let mut call = format!("({}", name);
            for arg in args {
                call.push(' ');
                call.push_str(&arg);
            }
            call.push(')');
            match var {
                Some(var) => format!("{}:{}", var, call),
                None => call,
            }
        })
}

fn program_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(statement_strategy(), 0..6)
}

proptest! {
    /// Invariant: `"<s>"` parses to the literal `s` for any `s` without `"` or `\`.
    #[test]
    fn quoted_string_is_literal(s in quotable_strategy()) {
        let program = parse_script(&format!("(echo \"{}\")", s)).unwrap();
        prop_assert_eq!(program.statements.len(), 1);
        prop_assert_eq!(
            &program.statements[0].command().positional,
            &vec![ArgumentValue::Literal(s)]
        );
    }

    /// Invariant: `\c` inside quotes decodes to `c`, whatever `c` is.
    #[test]
    fn escaped_char_decodes_to_itself(
        before in "[a-z ]{0,6}",
        c in any::<char>(),
        after in "[a-z ]{0,6}",
    ) {
        let input = format!("(echo \"{}\\{}{}\")", before, c, after);
        let program = parse_script(&input).unwrap();
        let expected = format!("{}{}{}", before, c, after);
        prop_assert_eq!(
            &program.statements[0].command().positional,
            &vec![ArgumentValue::Literal(expected)]
        );
    }

    /// Invariant: parsing is deterministic and yields one statement per call.
    #[test]
    fn parse_is_deterministic(statements in program_strategy(), sep in "[ \n]{0,2}") {
        let input = statements.join(if sep.is_empty() { " " } else { sep.as_str() });
        let first = parse_script(&input);
        prop_assert!(first.is_ok(), "Failed to parse: {:?}", input);
        let first = first.unwrap();
        prop_assert_eq!(first.statements.len(), statements.len());
        prop_assert_eq!(first, parse_script(&input).unwrap());
    }

    /// Invariant: `id:value` is always a named argument, never positional.
    #[test]
    fn identifier_colon_is_named(key in identifier_strategy(), value in bare_value_strategy()) {
        let program = parse_script(&format!("(cmd {}:{})", key, value)).unwrap();
        let cmd = program.statements[0].command();
        prop_assert!(cmd.positional.is_empty());
        prop_assert_eq!(cmd.named.len(), 1);
        prop_assert_eq!(cmd.named.get(&key), Some(&ArgumentValue::Literal(value)));
    }

    /// Invariant: N distinct unknown commands give exactly N validation errors.
    #[test]
    fn every_unknown_command_reported(
        names in prop::collection::hash_set("[a-z][a-z0-9-]{0,8}", 1..10)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let input = names.iter().map(|n| format!("({})", n)).collect::<Vec<_>>().join(" ");
        let program = parse_script(&input).unwrap();

        let errors = Interpreter::new(CommandRegistry::new()).validate(&program);
        prop_assert_eq!(errors.len(), names.len());
        for (index, name) in names.iter().enumerate() {
            prop_assert_eq!(
                &errors[index],
                &ValidationError::UnknownCommand { index, name: name.clone() }
            );
        }
    }
}
