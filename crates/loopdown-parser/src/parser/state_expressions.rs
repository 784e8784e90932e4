//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::flags::NodeFlags;
use super::node::{
    AccessExprData, BinaryExprData, CallExprData, ConditionalExprData, FunctionData,
    IdentifierData, LiteralData, LiteralExprData, ParameterData, ParenthesizedData,
    PropertyAssignmentData, UnaryExprData,
};
use super::state::ParserState;
use super::syntax_kind_ext;
use loopdown_common::diagnostic_codes;
use loopdown_scanner::SyntaxKind;

/// Binding power of a binary operator token (0 = not a binary operator).
pub(crate) fn binary_operator_precedence(kind: SyntaxKind) -> u8 {
    use SyntaxKind::*;
    match kind {
        QuestionQuestionToken | BarBarToken => 1,
        AmpersandAmpersandToken => 2,
        BarToken => 3,
        CaretToken => 4,
        AmpersandToken => 5,
        EqualsEqualsToken
        | ExclamationEqualsToken
        | EqualsEqualsEqualsToken
        | ExclamationEqualsEqualsToken => 6,
        LessThanToken
        | GreaterThanToken
        | LessThanEqualsToken
        | GreaterThanEqualsToken
        | InstanceOfKeyword
        | InKeyword => 7,
        LessThanLessThanToken
        | GreaterThanGreaterThanToken
        | GreaterThanGreaterThanGreaterThanToken => 8,
        PlusToken | MinusToken => 9,
        AsteriskToken | SlashToken | PercentToken => 10,
        AsteriskAsteriskToken => 11,
        _ => 0,
    }
}

fn parse_numeric_value(text: &str) -> Option<f64> {
    match text.get(..2) {
        Some("0x" | "0X") => u64::from_str_radix(&text[2..], 16)
            .ok()
            .map(|v| v as f64),
        _ => text.parse::<f64>().ok(),
    }
}

impl ParserState {
    pub(crate) fn is_start_of_expression(&self) -> bool {
        use SyntaxKind::*;
        matches!(
            self.token(),
            Identifier
                | NumericLiteral
                | StringLiteral
                | ThisKeyword
                | TrueKeyword
                | FalseKeyword
                | NullKeyword
                | FunctionKeyword
                | NewKeyword
                | TypeOfKeyword
                | VoidKeyword
                | OpenParenToken
                | OpenBracketToken
                | OpenBraceToken
                | ExclamationToken
                | TildeToken
                | PlusToken
                | MinusToken
                | PlusPlusToken
                | MinusMinusToken
        )
    }

    /// Parse a comma expression.
    pub fn parse_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut expr = self.parse_assignment_expression();
        let mut chain_depth = 0;
        while self.is_token(SyntaxKind::CommaToken) && self.enter_recursion() {
            chain_depth += 1;
            self.next_token();
            let right = self.parse_assignment_expression();
            expr = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                pos,
                self.prev_token_end,
                BinaryExprData {
                    left: expr,
                    operator_token: SyntaxKind::CommaToken as u16,
                    right,
                },
            );
        }
        self.exit_recursion_by(chain_depth);
        expr
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_identifier();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if self.is_start_of_arrow_function() {
            return self.parse_arrow_function();
        }

        let pos = self.token_pos();
        let expr = self.parse_binary_expression(1);

        if self.token().is_assignment_operator() {
            if !self.is_left_hand_side_target(expr) {
                self.parse_error_at_current_token(
                    "The left-hand side of an assignment expression must be a variable or a property access.",
                    diagnostic_codes::INVALID_ASSIGNMENT_TARGET,
                );
            }
            let operator_token = self.token() as u16;
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                pos,
                self.prev_token_end,
                BinaryExprData {
                    left: expr,
                    operator_token,
                    right,
                },
            );
        }

        if self.parse_optional(SyntaxKind::QuestionToken) {
            let when_true = self.parse_assignment_expression();
            self.parse_expected(SyntaxKind::ColonToken);
            let when_false = self.parse_assignment_expression();
            return self.arena.add_conditional_expr(
                syntax_kind_ext::CONDITIONAL_EXPRESSION,
                pos,
                self.prev_token_end,
                ConditionalExprData {
                    condition: expr,
                    when_true,
                    when_false,
                },
            );
        }

        expr
    }

    fn is_left_hand_side_target(&self, expr: NodeIndex) -> bool {
        let Some(node) = self.arena.get(expr) else {
            return false;
        };
        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => true,
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            | syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => true,
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => self
                .arena
                .get_parenthesized(node)
                .is_some_and(|p| self.is_left_hand_side_target(p.expression)),
            _ => false,
        }
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// `x =>` or `( ... ) =>`, decided by scanning ahead.
    fn is_start_of_arrow_function(&mut self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => self.look_ahead(|p| {
                p.next_token();
                p.is_token(SyntaxKind::EqualsGreaterThanToken)
                    && !p.scanner.has_preceding_line_break()
            }),
            SyntaxKind::OpenParenToken => self.look_ahead(|p| {
                let mut depth = 0u32;
                loop {
                    match p.token() {
                        SyntaxKind::OpenParenToken => depth += 1,
                        SyntaxKind::CloseParenToken => {
                            depth -= 1;
                            if depth == 0 {
                                p.next_token();
                                return p.is_token(SyntaxKind::EqualsGreaterThanToken)
                                    && !p.scanner.has_preceding_line_break();
                            }
                        }
                        SyntaxKind::EndOfFileToken => return false,
                        _ => {}
                    }
                    p.next_token();
                }
            }),
            _ => false,
        }
    }

    fn parse_arrow_function(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let parameters = if self.is_token(SyntaxKind::Identifier) {
            let name = self.parse_identifier();
            let end = self.prev_token_end;
            let parameter = self.arena.add_parameter(
                syntax_kind_ext::PARAMETER,
                pos,
                end,
                ParameterData {
                    name,
                    initializer: NodeIndex::NONE,
                },
            );
            NodeList::with_nodes(vec![parameter])
        } else {
            self.parse_parameter_list()
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);

        let (body, flags) = if self.is_token(SyntaxKind::OpenBraceToken) {
            (self.parse_block(), NodeFlags::NONE)
        } else {
            (self.parse_assignment_expression(), NodeFlags::EXPRESSION_BODY)
        };

        let arrow = self.arena.add_function(
            syntax_kind_ext::ARROW_FUNCTION,
            pos,
            self.prev_token_end,
            FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
            },
        );
        self.arena.set_flags(arrow, flags);
        arrow
    }

    // =========================================================================
    // Binary and unary expressions
    // =========================================================================

    /// Precedence climbing over binary operators binding at least as tight
    /// as `min_precedence`. `**` is right-associative.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        let mut chain_depth = 0;
        loop {
            let operator = self.token();
            let precedence = binary_operator_precedence(operator);
            if precedence == 0 || precedence < min_precedence || !self.enter_recursion() {
                break;
            }
            chain_depth += 1;
            self.next_token();
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary_expression(next_min);
            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                pos,
                self.prev_token_end,
                BinaryExprData {
                    left,
                    operator_token: operator as u16,
                    right,
                },
            );
        }
        self.exit_recursion_by(chain_depth);
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        use SyntaxKind::*;
        match self.token() {
            ExclamationToken | MinusToken | PlusToken | TildeToken | TypeOfKeyword
            | VoidKeyword | PlusPlusToken | MinusMinusToken => {
                if !self.enter_recursion() {
                    return self.create_missing_identifier();
                }
                let pos = self.token_pos();
                let operator = self.token() as u16;
                self.next_token();
                let operand = self.parse_unary_expression();
                self.exit_recursion();
                self.arena.add_unary_expr(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    pos,
                    self.prev_token_end,
                    UnaryExprData { operator, operand },
                )
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expr = self.parse_left_hand_side_expression();
        if matches!(
            self.token(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.scanner.has_preceding_line_break()
        {
            let operator = self.token() as u16;
            self.next_token();
            return self.arena.add_unary_expr(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                pos,
                self.prev_token_end,
                UnaryExprData {
                    operator,
                    operand: expr,
                },
            );
        }
        expr
    }

    // =========================================================================
    // Member, call and new expressions
    // =========================================================================

    fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expr = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_and_call_rest(pos, expr, true)
    }

    fn parse_member_and_call_rest(
        &mut self,
        pos: u32,
        mut expr: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        let mut chain_depth = 0;
        loop {
            let extends = matches!(
                self.token(),
                SyntaxKind::DotToken | SyntaxKind::OpenBracketToken
            ) || (allow_calls && self.is_token(SyntaxKind::OpenParenToken));
            if !extends || !self.enter_recursion() {
                self.exit_recursion_by(chain_depth);
                return expr;
            }
            chain_depth += 1;
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expr = self.arena.add_access_expr(
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        pos,
                        self.prev_token_end,
                        AccessExprData {
                            expression: expr,
                            name_or_argument: name,
                        },
                    );
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.parse_expression();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expr = self.arena.add_access_expr(
                        syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                        pos,
                        self.prev_token_end,
                        AccessExprData {
                            expression: expr,
                            name_or_argument: argument,
                        },
                    );
                }
                _ => {
                    let arguments = self.parse_argument_list();
                    expr = self.arena.add_call_expr(
                        syntax_kind_ext::CALL_EXPRESSION,
                        pos,
                        self.prev_token_end,
                        CallExprData {
                            expression: expr,
                            arguments: Some(arguments),
                        },
                    );
                }
            }
        }
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::NewKeyword);
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = self.parse_member_and_call_rest(callee_pos, callee, false);
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        self.arena.add_call_expr(
            syntax_kind_ext::NEW_EXPRESSION,
            pos,
            self.prev_token_end,
            CallExprData {
                expression: callee,
                arguments,
            },
        )
    }

    fn parse_argument_list(&mut self) -> NodeList {
        let mut arguments = Vec::new();
        self.parse_expected(SyntaxKind::OpenParenToken);
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            arguments.push(self.parse_assignment_expression());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(arguments)
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::ThisKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => {
                let kind = self.token() as u16;
                let pos = self.token_pos();
                self.next_token();
                self.arena.add_token(kind, pos, self.prev_token_end)
            }
            SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral => self.parse_literal(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            _ => {
                self.parse_error_at_current_token(
                    "Expression expected.",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
                self.create_missing_identifier()
            }
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let escaped_text = self.scanner.token_value().to_string();
        self.next_token();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            self.prev_token_end,
            IdentifierData { escaped_text },
        )
    }

    /// Property name after `.`: identifiers and reserved words alike.
    fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::Identifier) {
            return self.parse_identifier();
        }
        if self.token().is_keyword() {
            let pos = self.token_pos();
            let escaped_text = self.scanner.token_text().to_string();
            self.next_token();
            return self.arena.add_identifier(
                SyntaxKind::Identifier as u16,
                pos,
                self.prev_token_end,
                IdentifierData { escaped_text },
            );
        }
        self.parse_error_at_current_token(
            "Identifier expected.",
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        self.create_missing_identifier()
    }

    fn parse_literal(&mut self) -> NodeIndex {
        let kind = self.token();
        let pos = self.token_pos();
        let text = self.scanner.token_value().to_string();
        let raw_text = self.scanner.token_text().to_string();
        let value = if kind == SyntaxKind::NumericLiteral {
            parse_numeric_value(&text)
        } else {
            None
        };
        self.next_token();
        self.arena.add_literal(
            kind as u16,
            pos,
            self.prev_token_end,
            LiteralData {
                text,
                raw_text,
                value,
            },
        )
    }

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.arena.add_parenthesized(
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            pos,
            self.prev_token_end,
            ParenthesizedData { expression },
        )
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                self.parse_error_at_current_token(
                    "Array holes are not supported.",
                    diagnostic_codes::UNSUPPORTED_SYNTAX,
                );
                self.next_token();
                continue;
            }
            elements.push(self.parse_assignment_expression());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            pos,
            self.prev_token_end,
            LiteralExprData {
                elements: NodeList::with_nodes(elements),
            },
        )
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            properties.push(self.parse_property_assignment());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            pos,
            self.prev_token_end,
            LiteralExprData {
                elements: NodeList::with_nodes(properties),
            },
        )
    }

    /// `name: value`, `"name": value`, `1: value` or shorthand `name`.
    fn parse_property_assignment(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let is_identifier_name = self.is_token(SyntaxKind::Identifier) || self.token().is_keyword();
        let name = match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal(),
            _ if is_identifier_name => self.parse_identifier_name(),
            _ => {
                self.parse_error_at_current_token(
                    "Property assignment expected.",
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
                self.create_missing_identifier()
            }
        };
        let initializer = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_assignment_expression()
        } else {
            if !is_identifier_name {
                self.parse_expected(SyntaxKind::ColonToken);
            }
            NodeIndex::NONE
        };
        self.arena.add_property_assignment(
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            pos,
            self.prev_token_end,
            PropertyAssignmentData { name, initializer },
        )
    }

    fn parse_function_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let parameters = self.parse_parameter_list();
        let body = self.parse_block();
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_EXPRESSION,
            pos,
            self.prev_token_end,
            FunctionData {
                name,
                parameters,
                body,
            },
        )
    }
}
