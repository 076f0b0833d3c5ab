//! # Declaration Parsing
//!
//! Parses declarations: modules, functions, assignments, include/use.
//!
//! ## Responsibilities
//!
//! - Module declarations: `module foo() { ... }`
//! - Function declarations: `function foo() = ...;`
//! - Variable assignments: `x = 10;`
//! - Include/use statements
//!
//! ## Example
//!
//! ```rust,ignore
//! let node = parser.parse_module_declaration()?;
//! ```

use super::Parser;
use crate::cst::{CstNode, NodeKind};
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Parse assignment statement.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// assignment = identifier "=" expression ";"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// x = 10;
    /// size = [10, 20, 30];
    /// $fn = 32;
    /// ```
    pub(super) fn parse_assignment(
        &mut self,
        start: crate::span::Position,
        name_token: crate::lexer::Token,
    ) -> Result<CstNode, ParseError> {
        let mut children = Vec::new();

        // Variable name (could be identifier or special variable)
        let name_kind = if name_token.kind == TokenKind::SpecialVariable {
            NodeKind::SpecialVariable
        } else {
            NodeKind::Identifier
        };
        
        children.push(CstNode::with_text(name_kind, name_token.span, name_token.text));

        // =
        self.expect(TokenKind::Eq)?;

        // Value expression
        let value = self.parse_expression()?;
        children.push(value);

        // ;
        self.expect(TokenKind::Semicolon)?;

        Ok(CstNode::with_children(NodeKind::Assignment, self.span_from(start), children))
    }

    /// Parse module declaration.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// module_declaration = "module" identifier "(" parameters? ")" block
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// module foo() { cube(10); }
    /// module bar(size=10) { cube(size); }
    /// ```
    pub(super) fn parse_module_declaration(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // module
        
        let name = self.expect(TokenKind::Identifier)?.clone();
        self.expect(TokenKind::LParen)?;

        let params = self.parse_parameters()?;

        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(CstNode::with_children(
            NodeKind::ModuleDeclaration,
            self.span_from(start),
            vec![
                CstNode::with_text(NodeKind::Identifier, name.span, name.text),
                params,
                body,
            ],
        ))
    }

    /// Parse function declaration.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// function_declaration = "function" identifier "(" parameters? ")" "=" expression ";"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// function foo() = 10;
    /// function bar(x) = x * 2;
    /// function add(a, b) = a + b;
    /// ```
    pub(super) fn parse_function_declaration(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // function
        
        let name = self.expect(TokenKind::Identifier)?.clone();
        self.expect(TokenKind::LParen)?;
        
        // Parse parameters
        let params = self.parse_parameters()?;
        
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Eq)?;
        let body = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        
        Ok(CstNode::with_children(
            NodeKind::FunctionDeclaration,
            self.span_from(start),
            vec![
                CstNode::with_text(NodeKind::Identifier, name.span, name.text),
                params,
                body,
            ],
        ))
    }

    /// Parse function/module parameters.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// parameters = (parameter ("," parameter)*)?
    /// parameter = identifier ("=" expression)?
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// (x)
    /// (x, y)
    /// (x = 10)
    /// (x, y = 20)
    /// ```
    fn parse_parameters(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        let mut children = Vec::new();

        // Empty parameters
        if self.check(TokenKind::RParen) {
            return Ok(CstNode::with_children(NodeKind::Parameters, self.span_from(start), children));
        }

        // First parameter
        children.push(self.parse_parameter()?);

        // Remaining parameters
        while self.match_token(TokenKind::Comma) {
            // Allow trailing comma
            if self.check(TokenKind::RParen) {
                break;
            }
            children.push(self.parse_parameter()?);
        }

        Ok(CstNode::with_children(NodeKind::Parameters, self.span_from(start), children))
    }

    /// Parse single parameter.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// parameter = identifier ("=" expression)?
    /// ```
    fn parse_parameter(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        let name = self.expect(TokenKind::Identifier)?.clone();
        let name_node = CstNode::with_text(NodeKind::Identifier, name.span, name.text);

        // Check for default value
        if self.match_token(TokenKind::Eq) {
            let default = self.parse_expression()?;
            Ok(CstNode::with_children(
                NodeKind::Parameter,
                self.span_from(start),
                vec![name_node, default],
            ))
        } else {
            Ok(CstNode::with_children(
                NodeKind::Parameter,
                self.span_from(start),
                vec![name_node],
            ))
        }
    }

    /// Parse include statement.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// include_statement = "include" "<" path ">"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// include <MCAD/boxes.scad>
    /// ```
    pub(super) fn parse_include_statement(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // include
        let path = self.parse_angle_path()?;

        if self.check(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(CstNode::with_text(NodeKind::IncludeStatement, self.span_from(start), path))
    }

    /// Parse use statement.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// use_statement = "use" "<" path ">"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// use <MCAD/boxes.scad>
    /// ```
    pub(super) fn parse_use_statement(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // use
        let path = self.parse_angle_path()?;

        if self.check(TokenKind::Semicolon) {
            self.advance();
        }

        Ok(CstNode::with_text(NodeKind::UseStatement, self.span_from(start), path))
    }

    /// Parse a `<path/to/file.scad>` literal as used by `include`/`use`.
    ///
    /// The path is not a single token — the lexer produces ordinary
    /// identifier/dot/slash tokens for it — so we slice the raw source text
    /// between the angle brackets instead of reconstructing it token by token.
    fn parse_angle_path(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::Lt)?;
        let path_start = self.current_position();
        while !self.check(TokenKind::Gt) && !self.is_at_end() {
            self.advance();
        }
        let path_end = self.current_position();
        let path = self.source[path_start.byte..path_end.byte].to_string();
        self.expect(TokenKind::Gt)?;
        Ok(path)
    }

    /// Parse echo statement.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// echo_statement = "echo" "(" arguments? ")" ";"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// echo("x =", x);
    /// echo(1, 2, 3);
    /// ```
    pub(super) fn parse_echo_statement(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // echo

        self.expect(TokenKind::LParen)?;
        let args = self.parse_arguments()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(CstNode::with_children(NodeKind::EchoStatement, self.span_from(start), vec![args]))
    }

    /// Parse assert statement.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// assert_statement = "assert" "(" arguments? ")" ";"
    /// ```
    ///
    /// ## Example
    ///
    /// ```text
    /// assert(x > 0);
    /// assert(x > 0, "x must be positive");
    /// ```
    pub(super) fn parse_assert_statement(&mut self) -> Result<CstNode, ParseError> {
        let start = self.current_position();
        self.advance(); // assert

        self.expect(TokenKind::LParen)?;
        let args = self.parse_arguments()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(CstNode::with_children(NodeKind::AssertStatement, self.span_from(start), vec![args]))
    }
}

// =============================================================================
// TESTS
// =============================================================================
