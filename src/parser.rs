use crate::ast::{Expr, ExprKind};
use crate::error::DataEvalError;
use crate::lexer::{Pos, Token, TokenKind};

/// Hard cap on bracket nesting, so pathological input cannot blow the stack.
pub const MAX_DEPTH: usize = 100;

/// Parse a token sequence into exactly one expression consuming all input.
pub fn parse(tokens: &[Token]) -> Result<Expr, DataEvalError> {
    if tokens.is_empty() {
        return Err(DataEvalError::syntax("empty token stream", Pos::new(1, 1)));
    }
    let mut parser = Parser {
        tokens,
        idx: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    match parser.peek().kind {
        TokenKind::Eof => Ok(expr),
        TokenKind::Op(c) => Err(parser.unsupported_op(c)),
        _ => Err(parser.err_here("unexpected token after expression")),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        // tokenize() always terminates the stream with Eof.
        &self.tokens[self.idx.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.idx < self.tokens.len() - 1 {
            self.idx += 1;
        }
        tok
    }

    fn here(&self) -> Pos {
        self.peek().pos
    }

    fn err_here(&self, msg: &str) -> DataEvalError {
        DataEvalError::syntax(msg, self.here())
    }

    fn unsupported_op(&self, op: char) -> DataEvalError {
        DataEvalError::unsafe_construct("unsupported construct", op.to_string(), self.here())
    }

    fn parse_expr(&mut self) -> Result<Expr, DataEvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.err_here("expression nesting too deep"));
        }
        let expr = self.parse_atom();
        self.depth -= 1;
        expr
    }

    fn parse_atom(&mut self) -> Result<Expr, DataEvalError> {
        let pos = self.here();
        match self.peek().kind.clone() {
            TokenKind::Number { text, is_float } => {
                self.bump();
                Ok(Expr::new(number_literal(&text, is_float, pos)?, pos))
            }
            TokenKind::Str(s) => {
                self.bump();
                Ok(Expr::new(ExprKind::Str(s), pos))
            }
            TokenKind::Punct('-') => {
                self.bump();
                match self.peek().kind.clone() {
                    TokenKind::Number { text, is_float } => {
                        let num_pos = self.here();
                        self.bump();
                        let child = Expr::new(number_literal(&text, is_float, num_pos)?, num_pos);
                        Ok(Expr::new(ExprKind::Neg(Box::new(child)), pos))
                    }
                    _ => Err(self.err_here("expected number after '-'")),
                }
            }
            TokenKind::Ident(name) => {
                self.bump();
                match name.as_str() {
                    "None" => Ok(Expr::new(ExprKind::NoneLit, pos)),
                    "True" => Ok(Expr::new(ExprKind::Bool(true), pos)),
                    "False" => Ok(Expr::new(ExprKind::Bool(false), pos)),
                    _ => {
                        if self.peek().kind == TokenKind::Punct('(') {
                            let args = self.parse_call_args()?;
                            Ok(Expr::new(ExprKind::Call { name, args }, pos))
                        } else {
                            Ok(Expr::new(ExprKind::Name(name), pos))
                        }
                    }
                }
            }
            TokenKind::Punct('[') => self.parse_list(pos),
            TokenKind::Punct('(') => self.parse_tuple(pos),
            TokenKind::Punct('{') => self.parse_dict(pos),
            TokenKind::Op(c) => Err(self.unsupported_op(c)),
            TokenKind::Eof => Err(self.err_here("unexpected end of input")),
            TokenKind::Punct(c) => Err(DataEvalError::syntax(
                format!("unexpected token '{}'", c),
                pos,
            )),
        }
    }

    /// `[ expr ("," expr)* [","] ]`
    fn parse_list(&mut self, pos: Pos) -> Result<Expr, DataEvalError> {
        self.bump(); // '['
        let mut items = Vec::new();
        if self.peek().kind == TokenKind::Punct(']') {
            self.bump();
            return Ok(Expr::new(ExprKind::List(items), pos));
        }
        loop {
            items.push(self.parse_expr()?);
            match self.peek().kind {
                TokenKind::Punct(',') => {
                    self.bump();
                    if self.peek().kind == TokenKind::Punct(']') {
                        self.bump();
                        return Ok(Expr::new(ExprKind::List(items), pos));
                    }
                }
                TokenKind::Punct(']') => {
                    self.bump();
                    return Ok(Expr::new(ExprKind::List(items), pos));
                }
                _ => return Err(self.err_here("expected ',' or ']' in list")),
            }
        }
    }

    /// `()` is the empty tuple; a non-empty tuple requires a comma after the
    /// first element, so `(1)` is rejected (grouping is not in the grammar).
    fn parse_tuple(&mut self, pos: Pos) -> Result<Expr, DataEvalError> {
        self.bump(); // '('
        let mut items = Vec::new();
        if self.peek().kind == TokenKind::Punct(')') {
            self.bump();
            return Ok(Expr::new(ExprKind::Tuple(items), pos));
        }
        items.push(self.parse_expr()?);
        match self.peek().kind {
            TokenKind::Punct(',') => {
                self.bump();
            }
            TokenKind::Punct(')') => return Err(self.err_here("expected ',' in tuple")),
            _ => return Err(self.err_here("expected ',' or ')' in tuple")),
        }
        loop {
            if self.peek().kind == TokenKind::Punct(')') {
                self.bump();
                return Ok(Expr::new(ExprKind::Tuple(items), pos));
            }
            items.push(self.parse_expr()?);
            match self.peek().kind {
                TokenKind::Punct(',') => {
                    self.bump();
                }
                TokenKind::Punct(')') => {
                    self.bump();
                    return Ok(Expr::new(ExprKind::Tuple(items), pos));
                }
                _ => return Err(self.err_here("expected ',' or ')' in tuple")),
            }
        }
    }

    /// `{ expr ":" expr ("," expr ":" expr)* [","] }`
    fn parse_dict(&mut self, pos: Pos) -> Result<Expr, DataEvalError> {
        self.bump(); // '{'
        let mut pairs = Vec::new();
        if self.peek().kind == TokenKind::Punct('}') {
            self.bump();
            return Ok(Expr::new(ExprKind::Dict(pairs), pos));
        }
        loop {
            let key = self.parse_expr()?;
            if self.peek().kind != TokenKind::Punct(':') {
                return Err(self.err_here("expected ':' in dict"));
            }
            self.bump();
            let value = self.parse_expr()?;
            pairs.push((key, value));
            match self.peek().kind {
                TokenKind::Punct(',') => {
                    self.bump();
                    if self.peek().kind == TokenKind::Punct('}') {
                        self.bump();
                        return Ok(Expr::new(ExprKind::Dict(pairs), pos));
                    }
                }
                TokenKind::Punct('}') => {
                    self.bump();
                    return Ok(Expr::new(ExprKind::Dict(pairs), pos));
                }
                _ => return Err(self.err_here("expected ',' or '}' in dict")),
            }
        }
    }

    /// `( [ expr ("," expr)* ] )` — no trailing comma in argument lists.
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, DataEvalError> {
        self.bump(); // '('
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::Punct(')') {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.peek().kind {
                TokenKind::Punct(',') => {
                    self.bump();
                }
                TokenKind::Punct(')') => {
                    self.bump();
                    return Ok(args);
                }
                _ => return Err(self.err_here("expected ',' or ')' in argument list")),
            }
        }
    }
}

fn number_literal(text: &str, is_float: bool, pos: Pos) -> Result<ExprKind, DataEvalError> {
    if is_float {
        let f: f64 = text
            .parse()
            .map_err(|_| DataEvalError::syntax("invalid float literal", pos))?;
        Ok(ExprKind::Float(f))
    } else {
        let i: i64 = text
            .parse()
            .map_err(|_| DataEvalError::syntax("integer literal out of range", pos))?;
        Ok(ExprKind::Int(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_src(src: &str) -> Result<Expr, DataEvalError> {
        parse(&tokenize(src).unwrap())
    }

    #[test]
    fn single_element_tuple_needs_comma() {
        assert!(matches!(
            parse_src("(1)"),
            Err(DataEvalError::Syntax { .. })
        ));
        assert!(matches!(
            parse_src("(1,)").unwrap().kind,
            ExprKind::Tuple(items) if items.len() == 1
        ));
    }

    #[test]
    fn empty_input_is_syntax_error() {
        assert!(matches!(parse_src(""), Err(DataEvalError::Syntax { .. })));
    }

    #[test]
    fn leftover_tokens_are_syntax_error() {
        assert!(matches!(
            parse_src("1 2"),
            Err(DataEvalError::Syntax { .. })
        ));
        assert!(matches!(
            parse_src("import os"),
            Err(DataEvalError::Syntax { .. })
        ));
    }

    #[test]
    fn operators_are_unsafe_not_syntax() {
        assert!(matches!(
            parse_src("a+2"),
            Err(DataEvalError::UnsafeConstruct { .. })
        ));
        assert!(matches!(
            parse_src("1*2"),
            Err(DataEvalError::UnsafeConstruct { .. })
        ));
    }

    #[test]
    fn minus_requires_number() {
        assert!(matches!(
            parse_src("-'a'"),
            Err(DataEvalError::Syntax { .. })
        ));
        assert!(matches!(
            parse_src("-[1]"),
            Err(DataEvalError::Syntax { .. })
        ));
    }

    #[test]
    fn trailing_commas() {
        assert!(parse_src("[1, 2,]").is_ok());
        assert!(parse_src("{1: 2,}").is_ok());
        assert!(parse_src("(1, 2,)").is_ok());
        assert!(matches!(
            parse_src("datetime(1,)"),
            Err(DataEvalError::Syntax { .. })
        ));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            parse_src(&deep),
            Err(DataEvalError::Syntax { .. })
        ));
        let ok = "[".repeat(MAX_DEPTH - 1) + &"]".repeat(MAX_DEPTH - 1);
        assert!(parse_src(&ok).is_ok());
    }
}
