//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::flags::NodeFlags;
use super::node::{
    BlockData, ExprStatementData, FunctionData, IfStatementData, LoopData, ParameterData,
    ReturnData, SourceFileData, VariableData, VariableDeclarationData,
};
use super::state::{ParseDiagnostic, ParserState};
use super::syntax_kind_ext;
use loopdown_common::diagnostic_codes;
use loopdown_scanner::SyntaxKind;

impl ParserState {
    /// Parse a whole source file.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();
        let statements = self.parse_statement_list(SyntaxKind::EndOfFileToken);

        for diag in self.scanner.get_scanner_diagnostics() {
            self.parse_diagnostics.push(ParseDiagnostic {
                start: self.u32_from_usize(diag.pos),
                length: self.u32_from_usize(diag.length),
                message: diag.message.to_string(),
                code: diag.code,
            });
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);

        let end_pos = self.token_end();
        self.arena.add_source_file(
            0,
            end_pos,
            SourceFileData {
                file_name: self.file_name.clone(),
                text: self.scanner.source_text_arc(),
                statements,
            },
        )
    }

    /// Parse statements until `terminator` (or end of file).
    fn parse_statement_list(&mut self, terminator: SyntaxKind) -> NodeList {
        let mut statements = Vec::new();
        while !self.nesting_exceeded
            && !self.is_token(terminator)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start = self.scanner.token_start();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            // Guarantee progress on malformed input.
            if self.scanner.token_start() == start && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }
        NodeList::with_nodes(statements)
    }

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let statement = match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(syntax_kind_ext::RETURN_STATEMENT),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(syntax_kind_ext::THROW_STATEMENT),
            SyntaxKind::BreakKeyword => self.parse_jump(syntax_kind_ext::BREAK_STATEMENT),
            SyntaxKind::ContinueKeyword => self.parse_jump(syntax_kind_ext::CONTINUE_STATEMENT),
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::EMPTY_STATEMENT, pos, self.prev_token_end)
            }
            _ if self.is_start_of_expression() => self.parse_expression_statement(),
            _ => {
                self.parse_error_at_current_token(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                NodeIndex::NONE
            }
        };
        self.exit_recursion();
        statement
    }

    fn look_ahead_is_let_declaration(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.is_token(SyntaxKind::Identifier)
        })
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(SyntaxKind::CloseBraceToken);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_block(
            syntax_kind_ext::BLOCK,
            pos,
            self.prev_token_end,
            BlockData { statements },
        )
    }

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            pos,
            self.prev_token_end,
            VariableData {
                declarations: NodeList::with_nodes(vec![list]),
            },
        )
    }

    /// Parse `var|let|const a = 1, b` (also used by `for` initializers).
    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            _ => NodeFlags::NONE,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        let list = self.arena.add_variable(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            pos,
            self.prev_token_end,
            VariableData {
                declarations: NodeList::with_nodes(declarations),
            },
        );
        self.arena.set_flags(list, flags);
        list
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let name = self.parse_binding_identifier();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_variable_declaration(
            syntax_kind_ext::VARIABLE_DECLARATION,
            pos,
            self.prev_token_end,
            VariableDeclarationData { name, initializer },
        )
    }

    /// Parse an identifier in a binding position.
    pub(crate) fn parse_binding_identifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::Identifier) {
            return self.parse_identifier();
        }
        if matches!(
            self.token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) {
            self.parse_error_at_current_token(
                "Destructuring patterns are not supported.",
                diagnostic_codes::UNSUPPORTED_SYNTAX,
            );
        } else {
            self.parse_error_at_current_token(
                "Identifier expected.",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        }
        self.create_missing_identifier()
    }

    fn parse_function_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let name = self.parse_binding_identifier();
        let parameters = self.parse_parameter_list();
        let body = self.parse_block();
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_DECLARATION,
            pos,
            self.prev_token_end,
            FunctionData {
                name,
                parameters,
                body,
            },
        )
    }

    /// Parse `(a, b = 1)`.
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::new();
        }
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(parameters)
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let name = self.parse_binding_identifier();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_parameter(
            syntax_kind_ext::PARAMETER,
            pos,
            self.prev_token_end,
            ParameterData { name, initializer },
        )
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::IfKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_if_statement(
            syntax_kind_ext::IF_STATEMENT,
            pos,
            self.prev_token_end,
            IfStatementData {
                expression,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ForKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = match self.token() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_declaration_list()
            }
            _ => self.parse_expression(),
        };
        if self.is_token(SyntaxKind::InKeyword) || self.is_identifier_text("of") {
            self.parse_error_at_current_token(
                "'for-in' and 'for-of' loops are not supported.",
                diagnostic_codes::UNSUPPORTED_SYNTAX,
            );
        }
        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();

        self.arena.add_loop(
            syntax_kind_ext::FOR_STATEMENT,
            pos,
            self.prev_token_end,
            LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.add_loop(
            syntax_kind_ext::WHILE_STATEMENT,
            pos,
            self.prev_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::DoKeyword);
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        // `do ... while (x)` never needs a semicolon.
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add_loop(
            syntax_kind_ext::DO_STATEMENT,
            pos,
            self.prev_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_return_or_throw(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if kind == syntax_kind_ext::THROW_STATEMENT {
            if self.scanner.has_preceding_line_break() {
                self.parse_error_at_current_token(
                    "Line break not permitted here.",
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
            }
            self.parse_expression()
        } else if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena
            .add_return(kind, pos, self.prev_token_end, ReturnData { expression })
    }

    fn parse_jump(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        if self.is_token(SyntaxKind::Identifier) && !self.scanner.has_preceding_line_break() {
            self.parse_error_at_current_token(
                "Labels are not supported.",
                diagnostic_codes::UNSUPPORTED_SYNTAX,
            );
            self.next_token();
        }
        self.parse_semicolon();
        self.arena.add_token(kind, pos, self.prev_token_end)
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.arena.add_expr_statement(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            pos,
            self.prev_token_end,
            ExprStatementData { expression },
        )
    }

    fn is_identifier_text(&self, text: &str) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.scanner.token_value() == text
    }
}
