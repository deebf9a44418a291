#[cfg(test)]
mod scanner_tests {
    use koi::scanner::*;
    use koi::token::*;
    use koi::{Diagnostics, KoiError};

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*%})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::PERCENT, "%"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class Foo < Bar { fun_ty this super_ var and orchid }",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IDENTIFIER, "fun_ty"),
                (TokenType::THIS, "this"),
                (TokenType::IDENTIFIER, "super_"),
                (TokenType::VAR, "var"),
                (TokenType::AND, "and"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_numbers() {
        let tokens: Vec<Token> = Scanner::new("123 45.67 7.")
            .filter_map(Result::ok)
            .collect();

        let literals: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(literals, vec![123.0, 45.67, 7.0]);

        // A trailing '.' is not a fractional part.
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_integer_lexemes_round_trip() {
        let source = "0 1 42 1000 987654321 31415926535";
        let lexemes: Vec<String> = Scanner::new(source)
            .filter_map(Result::ok)
            .filter(|t| t.token_type != TokenType::EOF)
            .map(|t| t.lexeme)
            .collect();

        assert_eq!(lexemes.join(" "), source);
    }

    #[test]
    fn test_multiline_string_tracks_lines() {
        let tokens: Vec<Token> = Scanner::new("\"a\nb\"\nname")
            .filter_map(Result::ok)
            .collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected a string, got {:?}", other),
        }
        assert_eq!(tokens[0].lexeme, "\"a\nb\"");
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].lexeme, "name");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_token_sequence(
            "// nothing here\nprint // trailing\n",
            &[(TokenType::PRINT, "print"), (TokenType::EOF, "")],
        );

        let tokens: Vec<Token> = Scanner::new("// one\n// two\nx").filter_map(Result::ok).collect();
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn test_unterminated_string_reports_last_line() {
        let results: Vec<_> = Scanner::new("\"abc\n\ndef").collect();

        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(KoiError::Lex { message, line }) => {
                assert_eq!(message, "Unterminated string.");
                assert_eq!(*line, 3);
            }
            other => panic!("expected a lex error, got {:?}", other),
        }
        assert!(matches!(&results[1], Ok(t) if t.token_type == TokenType::EOF));
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .inspect(|e| assert!(e.is_static()))
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );

        fn assert_token_matches(
            result: &koi::error::Result<Token>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_non_ascii_character_reported_once() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("a é b").scan_tokens(&mut diagnostics);

        assert_eq!(diagnostics.messages(), vec!["[line 1] Error: Unexpected character: é"]);
        assert_eq!(tokens.len(), 3); // a, b, EOF
    }

    #[test]
    fn test_scan_tokens_reports_through_closure() {
        let mut lines: Vec<usize> = Vec::new();
        let mut reporter = |e: KoiError| lines.push(e.line().unwrap_or(0));

        let tokens = Scanner::new("@\nvar x;\n^").scan_tokens(&mut reporter);

        assert_eq!(lines, vec![1, 3]);
        assert_eq!(tokens.len(), 4); // var x ; EOF
    }

    #[test]
    fn test_token_display() {
        let tokens: Vec<Token> = Scanner::new("3 2.5 \"hi\" foo")
            .filter_map(Result::ok)
            .collect();

        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "NUMBER 3 3.0",
                "NUMBER 2.5 2.5",
                "STRING \"hi\" hi",
                "IDENTIFIER foo null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_keyword_spellings() {
        assert_token_sequence(
            "not inherits inheritsx",
            &[
                (TokenType::BANG, "not"),
                (TokenType::INHERITS, "inherits"),
                (TokenType::IDENTIFIER, "inheritsx"),
                (TokenType::EOF, ""),
            ],
        );
    }
}
