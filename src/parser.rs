use crate::air::{AsmError, AsmStmt};
use crate::lexer::{Lexer, Token};

/// Groups the scanner's token stream into fixed-arity statements, one per
/// source line.
///
/// Re-entrant over multi-line input: each call to [`AsmParser::next_stmt`]
/// consumes one instruction's tokens (through the flushing line break) and
/// returns `Ok(None)` once the input is exhausted.
pub struct AsmParser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> AsmParser<'a> {
    pub fn new(src: &'a str) -> Self {
        AsmParser {
            lexer: Lexer::new(src),
        }
    }

    pub fn next_stmt(&mut self) -> Result<Option<AsmStmt>, AsmError> {
        if self.lexer.is_eof() {
            return Ok(None);
        }

        let mut tokens: Vec<Token> = Vec::with_capacity(4);
        while let Some(token) = self.lexer.next_token()? {
            tokens.push(token);
        }
        AsmStmt::from_tokens(&tokens).map(Some)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::symbol::Opcode;

    fn stmts(src: &str) -> Vec<AsmStmt> {
        let mut parser = AsmParser::new(src);
        let mut out = Vec::new();
        while let Some(stmt) = parser.next_stmt().unwrap() {
            out.push(stmt);
        }
        out
    }

    #[test]
    fn parses_single_line() {
        let parsed = stmts("load $0 #500");
        assert_eq!(parsed.len(), 1);
        match parsed[0] {
            AsmStmt::Binary(op, a, b) => {
                assert_eq!(op.kind, TokenKind::Op(Opcode::Load));
                assert_eq!(a.kind, TokenKind::Reg(0));
                assert_eq!(b.kind, TokenKind::Lit(500));
            }
            _ => panic!("expected binary statement"),
        }
    }

    #[test]
    fn parses_one_statement_per_line() {
        let parsed = stmts("load $0 #10\nload $1 #20\nadd $0 $1 $2\nhlt\n");
        assert_eq!(parsed.len(), 4);
        assert!(matches!(parsed[3], AsmStmt::Nullary(_)));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(stmts("").is_empty());
    }

    #[test]
    fn whitespace_only_line_is_malformed() {
        let mut parser = AsmParser::new("   ");
        assert!(matches!(
            parser.next_stmt(),
            Err(AsmError::WrongArity { found: 0 })
        ));
    }

    #[test]
    fn too_many_tokens_is_malformed() {
        let mut parser = AsmParser::new("add $0 $1 $2 $3");
        assert!(matches!(
            parser.next_stmt(),
            Err(AsmError::WrongArity { found: 5 })
        ));
    }

    #[test]
    fn lex_faults_surface_through_parser() {
        let mut parser = AsmParser::new("load ^0 #5");
        assert!(matches!(parser.next_stmt(), Err(AsmError::Lex(_))));
    }
}
