//! Parser for the grid description language.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{GridError, Result};

/// Parser for grid descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire description.
    pub fn parse(&mut self) -> Result<GridAst> {
        let mut ast = GridAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let cable = self.parse_cable()?;
                    if ast.cables.iter().any(|c| c.name == cable.name) {
                        return Err(GridError::DuplicateCable {
                            name: cable.name,
                            line: cable.line,
                        });
                    }
                    ast.cables.push(cable);
                }
                _ => {
                    return Err(GridError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(GridError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// Require the line to end here.
    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(GridError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    fn value(&mut self) -> Result<f64> {
        if self.current.kind == TokenKind::Equals {
            self.advance()?;
        }
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| GridError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn integer<T: std::str::FromStr>(&mut self) -> Result<T> {
        let tok = self.expect(TokenKind::Number)?;
        tok.text.parse().map_err(|_| {
            GridError::parse(
                tok.line,
                format!("expected a non-negative integer, got {}", tok.text),
            )
        })
    }

    fn parse_directive(&mut self, ast: &mut GridAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".sources" => ast.num_source = Some(self.integer()?),
            ".loads" => ast.num_loads = Some(self.integer()?),
            ".seed" => ast.seed = Some(self.integer()?),
            ".param" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                let value = self.value()?;
                ast.params.insert(name, value);
            }
            ".prob" => {
                let kind = self.expect(TokenKind::Identifier)?.text;
                let value = self.value()?;
                match kind.to_uppercase().as_str() {
                    "S2S" | "S2S_P" => ast.s2s_p = Some(value),
                    "S2L" | "S2L_P" => ast.s2l_p = Some(value),
                    _ => {
                        return Err(GridError::parse(
                            line,
                            format!("unknown probability '{}' (use S2S or S2L)", kind),
                        ));
                    }
                }
            }
            _ => {
                return Err(GridError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_cable(&mut self) -> Result<CableDef> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        let from = self.node_ref()?;
        let to = self.node_ref()?;
        Ok(CableDef {
            name: name_tok.text,
            from,
            to,
            line: name_tok.line,
        })
    }

    fn node_ref(&mut self) -> Result<NodeRef> {
        let tok = self.current.clone();
        let node = match tok.kind {
            TokenKind::Number => tok.text.parse().ok().map(NodeRef::Global),
            TokenKind::Identifier => NodeRef::from_identifier(&tok.text),
            _ => {
                return Err(GridError::parse(
                    tok.line,
                    format!("expected a node, got {:?}", tok.kind),
                ));
            }
        };
        let node = node.ok_or(GridError::UnknownNode {
            node: tok.text,
            line: tok.line,
        })?;
        self.advance()?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::dsl::parse;

    #[test]
    fn test_parse_directives() {
        let input = ".sources 2\n.loads 3\n.prob S2S 0.2\n.prob s2l = 0.9\n.seed 42\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.num_source, Some(2));
        assert_eq!(ast.num_loads, Some(3));
        assert_eq!(ast.s2s_p, Some(0.2));
        assert_eq!(ast.s2l_p, Some(0.9));
        assert_eq!(ast.seed, Some(42));
        assert!(ast.cables.is_empty());
    }

    #[test]
    fn test_parse_params_with_units() {
        let ast = parse(".param L_source 2.3m\n.param C_source = 10u").unwrap();
        assert_relative_eq!(ast.params["L_source"], 2.3e-3);
        assert_relative_eq!(ast.params["C_source"], 10e-6);
    }

    #[test]
    fn test_parse_cables() {
        let input = "# feeders\nW1 S1 L1\nW2 S2 L1 ; second\nW3 1 2\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.cables.len(), 3);
        assert_eq!(ast.cables[0].from, NodeRef::Source(1));
        assert_eq!(ast.cables[0].to, NodeRef::Load(1));
        assert_eq!(ast.cables[1].line, 3);
        assert_eq!(ast.cables[2].from, NodeRef::Global(1));
        assert_eq!(ast.cables[2].to, NodeRef::Global(2));
    }

    #[test]
    fn test_duplicate_cable_name() {
        let err = parse("W1 S1 L1\nW1 S2 L1").unwrap_err();
        assert!(matches!(err, GridError::DuplicateCable { line: 2, .. }));
    }

    #[test]
    fn test_bad_node_reference() {
        let err = parse("W1 S1 X7").unwrap_err();
        assert!(matches!(err, GridError::UnknownNode { ref node, line: 1 } if node == "X7"));
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse(".model D1 D").unwrap_err();
        assert!(matches!(err, GridError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(parse(".sources 2 3").is_err());
        assert!(parse("W1 S1 L1 L2").is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(parse(".loads -1").is_err());
    }
}
