//! 词法自动机测试
//!
//! 成对符号文法与平衡括号文法的端到端测试

mod common;

use std::io::Cursor;

use common::{lex, source, Chunked};
use runa_core::grammars::{pairs, parens};
use runa_core::lexer::LexError;
use runa_core::{Rune, RuneSource, StateRef};

// ===== A -> aAb | ε =====

const PAIR_CASES: &[(&str, bool)] = &[
    ("asd", false),
    ("ab", true),
    ("aabb", true),
    ("abab", false),
    ("baba", false),
    ("abba", false),
    ("baab", false),
];

#[test]
fn test_pair_cases() {
    let grammar = pairs('a', 'b').unwrap();
    for &(input, valid) in PAIR_CASES {
        let outcome = lex(&grammar, input);
        assert_eq!(outcome.accepted(), valid, "input {input:?}: {outcome:?}");
    }
}

#[test]
fn test_pair_cases_are_deterministic_across_resets() {
    let grammar = pairs('a', 'b').unwrap();
    let mut machine = grammar.lexer(source("")).unwrap();

    for _ in 0..3 {
        for &(input, valid) in PAIR_CASES {
            machine.attach(Cursor::new(input.as_bytes().to_vec()));
            let mut failed = false;
            for item in machine.tokens() {
                failed |= item.is_err();
            }
            assert_eq!(!failed && machine.is_matched(), valid, "input {input:?}");
        }
    }
}

#[test]
fn test_pair_tokens() {
    let outcome = lex(&pairs('a', 'b').unwrap(), "aabb");
    assert_eq!(outcome.lexemes, ["a", "a", "b", "b"]);
    assert!(outcome.finished);
}

#[test]
fn test_unbalanced_pairs_are_never_accepted() {
    let outcome = lex(&pairs('a', 'b').unwrap(), "aab");
    assert!(outcome.error.is_none());
    assert!(outcome.finished);
    assert!(!outcome.matched);
    assert!(!outcome.accepted());
}

#[test]
fn test_empty_input_is_accepted() {
    let outcome = lex(&pairs('a', 'b').unwrap(), "");
    assert!(outcome.lexemes.is_empty());
    assert!(outcome.accepted());
    assert!(outcome.finished);
}

#[test]
fn test_invalid_character_reports_state_and_rune() {
    let outcome = lex(&pairs('a', 'b').unwrap(), "asd");
    assert!(matches!(
        outcome.error,
        Some(LexError::InvalidTransition { state: 0, rune: Rune::Char('s') })
    ));
    assert_eq!(outcome.lexemes, ["a"]);
}

// ===== 平衡括号 =====

#[test]
fn test_parens_nested_and_sequential() {
    let grammar = parens().unwrap();
    for input in ["()", "(())", "(()())", "((()))()"] {
        let outcome = lex(&grammar, input);
        assert!(outcome.accepted(), "input {input:?}: {outcome:?}");
        assert!(outcome.finished);
        assert_eq!(outcome.lexemes.concat(), input);
    }
}

#[test]
fn test_parens_unclosed() {
    let outcome = lex(&parens().unwrap(), "(()");
    assert!(outcome.error.is_none());
    assert!(outcome.finished);
    assert!(!outcome.matched);
}

#[test]
fn test_parens_close_first_fails_immediately() {
    let outcome = lex(&parens().unwrap(), ")(");
    assert!(outcome.lexemes.is_empty());
    assert!(matches!(
        outcome.error,
        Some(LexError::InvalidTransition { state: 0, rune: Rune::Char(')') })
    ));
}

#[test]
fn test_parens_extra_close() {
    let outcome = lex(&parens().unwrap(), "())");
    assert!(matches!(
        outcome.error,
        Some(LexError::UnmatchedCharacter { rune: Rune::Char(')'), .. })
    ));
}

#[test]
fn test_whitespace_is_invisible() {
    let outcome = lex(&parens().unwrap(), "( ( )\t)");
    assert!(outcome.accepted());
    assert_eq!(outcome.lexemes, ["(", "(", ")", ")"]);
}

#[test]
fn test_token_spans() {
    let mut machine = parens().unwrap().lexer(source("(())")).unwrap();
    let columns: Vec<usize> = machine
        .tokens()
        .map(|t| t.unwrap())
        .filter(|t| !t.is_end_of_lexing())
        .map(|t| t.span.start.column)
        .collect();
    assert_eq!(columns, [1, 2, 3, 4]);
}

#[test]
fn test_halted_until_reset() {
    let grammar = parens().unwrap();
    let mut machine = grammar.lexer(source(")")).unwrap();
    assert!(machine.next_token().is_err());
    assert_eq!(machine.current(), StateRef::Error);
    assert!(matches!(machine.step(), Err(LexError::Halted)));
    assert!(machine.next_token().unwrap().is_end_of_lexing());

    machine.attach(Cursor::new(b"()".to_vec()));
    assert!(machine.can_step());
    let lexemes: Vec<String> = machine.tokens().map(|t| t.unwrap().lexeme).collect();
    assert_eq!(lexemes, ["(", ")", "eolex"]);
    assert!(machine.is_matched());
}

#[test]
fn test_deep_nesting_with_small_buffer() {
    let depth = 100;
    let input = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let src = RuneSource::new(Chunked::new(&input, 3), 4).unwrap();
    let mut machine = parens().unwrap().lexer(src).unwrap();

    let mut count = 0;
    for item in machine.tokens() {
        let token = item.unwrap();
        if !token.is_end_of_lexing() {
            count += 1;
        }
    }
    assert_eq!(count, depth * 2);
    assert!(machine.finished());
    assert!(machine.is_matched());
}

#[test]
fn test_custom_pair_symbols() {
    let grammar = pairs('[', ']').unwrap();
    assert!(lex(&grammar, "[[]]").accepted());
    assert!(!lex(&grammar, "[[]").accepted());
}
