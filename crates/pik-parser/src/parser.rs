use pik_core::{Expression, ObjectRef, Script, SourceSpan, SyntaxError};

use crate::lexer::{tokenize, Token, TokenKind};

/// Deepest argument nesting accepted before the parser gives up.
pub const MAX_NESTING: usize = 128;

/// Parses a statement sequence separated by `;`.
///
/// Empty statements (`;;`, a trailing `;`, or an empty body) are accepted and
/// dropped, so a definition written as `{}` yields an empty script.
pub fn parse_script(source: &str) -> Result<Script, SyntaxError> {
    let mut parser = Parser::new(tokenize(source)?);
    let mut statements = Vec::new();
    loop {
        while parser.eat(&TokenKind::Semicolon) {}
        if parser.at(&TokenKind::Eof) {
            break;
        }
        statements.push(parser.expression()?);
        match parser.peek().kind {
            TokenKind::Semicolon | TokenKind::Eof => {}
            _ => return Err(parser.unexpected("';' between statements")),
        }
    }
    Ok(Script::new(statements))
}

/// Parses a bare argument list such as `1, "a", NAME` (no surrounding parens).
pub fn parse_arguments(source: &str) -> Result<Vec<Expression>, SyntaxError> {
    let mut parser = Parser::new(tokenize(source)?);
    if parser.at(&TokenKind::Eof) {
        return Ok(Vec::new());
    }
    let mut args = vec![parser.expression()?];
    while parser.eat(&TokenKind::Comma) {
        args.push(parser.expression()?);
    }
    if !parser.at(&TokenKind::Eof) {
        return Err(parser.unexpected("',' or end of argument list"));
    }
    Ok(args)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        // tokenize always ends the stream with Eof
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(expected))
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(
            format!("Expected {}, found {}", expected, token.kind.describe()),
            token.span,
        )
    }

    fn expression(&mut self) -> Result<Expression, SyntaxError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok(Expression::number(value)),
            TokenKind::String(value) => Ok(Expression::string(value)),
            TokenKind::True => Ok(Expression::bool(true)),
            TokenKind::False => Ok(Expression::bool(false)),
            TokenKind::This => {
                if !self.eat(&TokenKind::Dot) {
                    return Ok(Expression::identifier("THIS"));
                }
                let method = self.method_name()?;
                self.call(ObjectRef::This, method, token.span)
            }
            TokenKind::Identifier(name) => {
                if !self.at(&TokenKind::Dot) {
                    return Ok(Expression::identifier(name));
                }
                let mut segments = vec![name];
                while self.eat(&TokenKind::Dot) {
                    segments.push(self.method_name()?);
                }
                let method = segments.pop().unwrap_or_default();
                let target = if segments.len() == 1 {
                    ObjectRef::Name {
                        name: segments.remove(0),
                    }
                } else {
                    ObjectRef::Qualified { segments }
                };
                self.call(target, method, token.span)
            }
            other => Err(SyntaxError::new(
                format!("Expected expression, found {}", other.describe()),
                token.span,
            )),
        }
    }

    fn method_name(&mut self) -> Result<String, SyntaxError> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("method name")),
        }
    }

    fn call(
        &mut self,
        target: ObjectRef,
        method: String,
        start: SourceSpan,
    ) -> Result<Expression, SyntaxError> {
        self.expect(&TokenKind::LParen, "'(' after method name")?;
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SyntaxError::new(
                format!("Calls nested deeper than {} levels", MAX_NESTING),
                start,
            ));
        }

        let mut args = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if self.eat(&TokenKind::Comma) {
                    continue;
                }
                self.expect(&TokenKind::RParen, "',' or ')'")?;
                break;
            }
        }

        self.depth -= 1;
        Ok(Expression::call(target, method, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pik_core::SourceLocation;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_single_method_call_with_literals() {
        let script = parse_script("obj.METHOD(1, \"a\", TRUE)").expect("script should parse");
        assert_eq!(
            script,
            Script::new(vec![Expression::call(
                ObjectRef::name("obj"),
                "METHOD",
                vec![
                    Expression::number(1.0),
                    Expression::string("a"),
                    Expression::bool(true),
                ],
            )])
        );
    }

    #[test]
    fn parses_nested_calls_and_this_target() {
        let script = parse_script("THIS.SET(COUNTER.GET())").expect("script should parse");
        assert_eq!(
            script.statements,
            vec![Expression::call(
                ObjectRef::This,
                "SET",
                vec![Expression::call(ObjectRef::name("COUNTER"), "GET", vec![])],
            )]
        );
    }

    #[test]
    fn parses_statement_sequence_with_stray_semicolons() {
        let script =
            parse_script(";A.INC();; B.DEC() ;\n$1;").expect("script should parse");
        assert_eq!(script.statements.len(), 3);
        assert_eq!(script.statements[2], Expression::identifier("$1"));
    }

    #[test]
    fn empty_source_is_an_empty_script() {
        assert!(parse_script("").expect("empty should parse").is_empty());
        assert!(parse_script("  ;  ").expect("blank should parse").is_empty());
    }

    #[test]
    fn bare_this_is_an_identifier() {
        let script = parse_script("THIS").expect("script should parse");
        assert_eq!(script.statements, vec![Expression::identifier("THIS")]);
    }

    #[test]
    fn dotted_target_becomes_qualified_reference() {
        let script = parse_script("SCENE.COUNTER.INC()").expect("script should parse");
        assert_eq!(
            script.statements,
            vec![Expression::call(
                ObjectRef::Qualified {
                    segments: vec!["SCENE".to_string(), "COUNTER".to_string()],
                },
                "INC",
                vec![],
            )]
        );
    }

    #[test]
    fn missing_separator_reports_position() {
        let error = parse_script("A.INC() B.INC()").expect_err("separator is required");
        assert_eq!(error.span.start, SourceLocation { line: 1, column: 9 });
        assert!(error.message.starts_with("Expected ';' between statements"));
    }

    #[test]
    fn unclosed_call_reports_end_of_input() {
        let error = parse_script("A.SET(1,").expect_err("call is unclosed");
        assert_eq!(error.message, "Expected expression, found end of input");
    }

    #[test]
    fn method_without_parentheses_is_rejected() {
        let error = parse_script("A.VALUE").expect_err("method call needs parens");
        assert!(error.message.starts_with("Expected '(' after method name"));
    }

    #[test]
    fn excessive_nesting_is_rejected() {
        let mut source = String::new();
        for _ in 0..=MAX_NESTING {
            source.push_str("A.B(");
        }
        source.push_str(&")".repeat(MAX_NESTING + 1));
        let error = parse_script(&source).expect_err("nesting is bounded");
        assert!(error.message.contains("nested deeper"));
    }

    #[test]
    fn parse_arguments_reads_plain_list() {
        let args = parse_arguments("1, \"x\", NAME, FALSE").expect("arguments should parse");
        assert_eq!(
            args,
            vec![
                Expression::number(1.0),
                Expression::string("x"),
                Expression::identifier("NAME"),
                Expression::bool(false),
            ]
        );
        assert!(parse_arguments("   ").expect("empty list").is_empty());
        assert!(parse_arguments("1 2").is_err());
    }
}
