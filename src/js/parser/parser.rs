use std::rc::Rc;

use hashbrown::HashSet;
use tracing::{debug, trace};

use crate::common::options::ParseOptions;

use super::ast::*;
use super::context::{Context, StatementContext};
use super::diagnostic::{new_sink, Diagnostic, DiagnosticCode, DiagnosticSink, ErrorMode};
use super::expression::Delimiter;
use super::lexer::{Lexer, SavedLexerState};
use super::loc::{Loc, Pos, EMPTY_LOC};
use super::parse_error::ParseResult;
use super::scope::{BindingType, ScopeId, ScopeKind, ScopeTracker};
use super::source::Source;
use super::token::Token;

/// The result of a successful parse. In recovery mode the diagnostics contain every error found,
/// otherwise they only contain warnings.
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone)]
pub(super) struct Label {
    name: String,
    /// Start of the labeled statement, including the label itself
    start: Pos,
    /// Start of the statement the label applies to
    body_start: Pos,
    /// Whether this label (possibly through a chain of labels) applies to an iteration statement
    is_loop: bool,
}

pub struct Parser<'a> {
    pub(super) lexer: Lexer<'a>,
    pub(super) token: Token,
    pub(super) loc: Loc,
    pub(super) prev_loc: Loc,
    pub(super) scopes: ScopeTracker,
    pub(super) sink: Box<dyn DiagnosticSink>,
    pub(super) labels: Vec<Label>,
    exported_names: HashSet<String>,
    /// Local names exported without a `from` clause, checked once the module is complete
    export_references: Vec<(String, Loc)>,
    /// Errors that are only errors if the enclosing expression is not reparsed as a pattern
    pub(super) cover_errors: Vec<Diagnostic>,
    /// Lexer state at the start of the current token, used to relex the current token
    token_start_state: SavedLexerState,
    token_start_sink_len: usize,
}

/// Identifiers and the keywords which are only reserved in some contexts.
pub(super) fn is_identifier_like(token: &Token) -> bool {
    matches!(token, Token::Identifier(_)) || token.is_contextual_keyword()
}

/// Words that are only reserved in strict mode code.
pub(super) fn is_strict_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
    )
}

pub(super) fn is_eval_or_arguments(name: &str) -> bool {
    name == "eval" || name == "arguments"
}

impl<'a> Parser<'a> {
    fn new(source: &'a Rc<Source>, mode: ErrorMode) -> Parser<'a> {
        let lexer = Lexer::new(source);
        let token_start_state = lexer.save();

        Parser {
            lexer,
            token: Token::Eof,
            loc: EMPTY_LOC,
            prev_loc: EMPTY_LOC,
            scopes: ScopeTracker::new(),
            sink: new_sink(mode),
            labels: vec![],
            exported_names: HashSet::new(),
            export_references: vec![],
            cover_errors: vec![],
            token_start_state,
            token_start_sink_len: 0,
        }
    }

    pub(super) fn advance(&mut self, ctx: Context) -> ParseResult<()> {
        self.token_start_state = self.lexer.save();
        self.token_start_sink_len = self.sink.len();

        let (token, loc) = self.lexer.next(ctx);
        self.prev_loc = self.loc;
        self.token = token;
        self.loc = loc;

        self.report_lexer_diagnostics()
    }

    /// Lex the current token again under a different context, e.g. once a directive prologue
    /// has made the enclosing code strict.
    fn relex_current_token(&mut self, ctx: Context) -> ParseResult<()> {
        self.lexer.restore(&self.token_start_state);
        self.sink.truncate(self.token_start_sink_len);

        let (token, loc) = self.lexer.next(ctx);
        self.token = token;
        self.loc = loc;

        self.report_lexer_diagnostics()
    }

    /// Replace the current `/` or `/=` token with the regular expression literal starting there.
    pub(super) fn relex_as_regexp_literal(&mut self) -> ParseResult<()> {
        let (token, loc) = self.lexer.next_regexp_literal(self.loc.start);
        self.token = token;
        self.loc = loc;

        self.report_lexer_diagnostics()
    }

    /// Replace the current `}` token with the template part that continues after a substitution.
    pub(super) fn relex_as_template_part(&mut self) -> ParseResult<()> {
        let (token, loc) = self.lexer.next_template_part();
        self.token = token;
        self.loc = loc;

        self.report_lexer_diagnostics()
    }

    fn report_lexer_diagnostics(&mut self) -> ParseResult<()> {
        for diagnostic in self.lexer.take_diagnostics() {
            self.report(diagnostic)?;
        }

        Ok(())
    }

    pub(super) fn skip_token(&mut self, ctx: Context) -> ParseResult<()> {
        // The lexer is still on the line where the current token ends
        let (line, line_start) = (self.lexer.line(), self.lexer.line_start());
        let col = self.loc.start.saturating_sub(line_start);
        trace!(token = %self.token, line, col, "skipping token");
        self.advance(ctx)
    }

    pub(super) fn peek(&mut self, ctx: Context) -> Token {
        self.peek_with_new_line(ctx).0
    }

    /// The token after the current token, and whether a newline separates the two.
    pub(super) fn peek_with_new_line(&mut self, ctx: Context) -> (Token, bool) {
        let save_state = self.lexer.save();
        let (token, _) = self.lexer.next(ctx);
        let is_new_line_before = self.lexer.is_new_line_before_current();
        self.lexer.restore(&save_state);

        (token, is_new_line_before)
    }

    pub(super) fn report(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        self.sink.report(diagnostic)
    }

    pub(super) fn error(&mut self, loc: Loc, code: DiagnosticCode) -> ParseResult<()> {
        self.report(Diagnostic::new(code, loc))
    }

    pub(super) fn error_with_arg(
        &mut self,
        loc: Loc,
        code: DiagnosticCode,
        arg: &str,
    ) -> ParseResult<()> {
        self.report(Diagnostic::with_arg(code, loc, arg))
    }

    pub(super) fn error_unexpected_token(&mut self) -> ParseResult<()> {
        if self.token == Token::Eof {
            self.error(self.loc, DiagnosticCode::UnexpectedEOF)
        } else {
            let token = self.token.to_string();
            self.error_with_arg(self.loc, DiagnosticCode::UnexpectedToken, &token)
        }
    }

    pub(super) fn expect(&mut self, ctx: Context, token: Token) -> ParseResult<()> {
        if self.token == token {
            return self.advance(ctx);
        }

        if self.token == Token::Eof {
            self.error(self.loc, DiagnosticCode::UnexpectedEOF)
        } else {
            self.error_with_arg(self.loc, DiagnosticCode::Expected, &token.to_string())
        }
    }

    /// Consume the current token if it matches, returning whether it was consumed.
    pub(super) fn eat(&mut self, ctx: Context, token: Token) -> ParseResult<bool> {
        if self.token == token {
            self.advance(ctx)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// A semicolon is inserted before a `}`, at the end of the input, or before a token on a new
    /// line.
    pub(super) fn expect_semicolon(&mut self, ctx: Context) -> ParseResult<()> {
        match self.token {
            Token::Semicolon => self.advance(ctx),
            Token::RightBrace | Token::Eof => Ok(()),
            _ if self.lexer.is_new_line_before_current() => Ok(()),
            _ => self.error(self.loc, DiagnosticCode::ExpectedSemicolon),
        }
    }

    /// Whether a semicolon could be inserted before the current token.
    pub(super) fn can_insert_semicolon(&self) -> bool {
        matches!(self.token, Token::Semicolon | Token::RightBrace | Token::Eof)
            || self.lexer.is_new_line_before_current()
    }

    pub(super) fn mark_loc(&self, start_pos: Pos) -> Loc {
        Loc { start: start_pos, end: self.prev_loc.end }
    }

    pub(super) fn source_text(&self, loc: Loc) -> String {
        self.lexer
            .source
            .contents
            .get(loc.to_range())
            .unwrap_or("")
            .to_owned()
    }

    fn parse_program(&mut self, ctx: Context) -> ParseResult<Program> {
        let (directives, body, use_strict_loc) = self.parse_directives_and_statements(
            ctx,
            StatementContext::TopLevelStatementList,
            &Token::Eof,
        )?;

        if ctx.is_module() {
            self.check_export_references()?;
        }

        // Cover errors that were never resolved by a reparse
        for diagnostic in std::mem::take(&mut self.cover_errors) {
            self.report(diagnostic)?;
        }

        let source_type = if ctx.is_module() {
            SourceType::Module
        } else {
            SourceType::Script
        };

        Ok(Program {
            loc: Loc::new(0, self.lexer.source.contents.len()),
            source_type,
            directives,
            body,
            strict: ctx.is_strict() || use_strict_loc.is_some(),
        })
    }

    /// Count the directives at the start of a statement list and whether one of them is an
    /// unescaped "use strict". Only looks ahead, the directives are lexed again afterwards.
    fn scan_directive_prologue(&mut self, ctx: Context) -> (usize, bool) {
        let save_state = self.lexer.save();

        let mut token = self.token.clone();
        let mut loc = self.loc;
        let mut num_directives = 0;
        let mut has_use_strict = false;

        while let Token::StringLiteral(value) = &token {
            // Exactly the 12 bytes of `"use strict"` or `'use strict'`, so no escapes
            let is_use_strict = value == "use strict" && loc.end - loc.start == 12;

            let (next_token, next_loc) = self.lexer.next(ctx);
            let (after_token, after_loc) = match next_token {
                Token::Semicolon => self.lexer.next(ctx),
                Token::RightBrace | Token::Eof => (next_token, next_loc),
                // A string continued on the next line, as in `'a'\n.length`, is not a directive
                _ if self.lexer.is_new_line_before_current()
                    && !next_token.continues_expression() =>
                {
                    (next_token, next_loc)
                }
                _ => break,
            };

            num_directives += 1;
            has_use_strict |= is_use_strict;

            token = after_token;
            loc = after_loc;
        }

        self.lexer.restore(&save_state);

        (num_directives, has_use_strict)
    }

    /// Parse a directive prologue followed by a statement list. Returns the location of the first
    /// "use strict" directive if there is one.
    fn parse_directives_and_statements(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
        end: &Token,
    ) -> ParseResult<(Vec<Directive>, Vec<Statement>, Option<Loc>)> {
        let (num_directives, has_use_strict) = self.scan_directive_prologue(ctx);

        let ctx = if has_use_strict && !ctx.is_strict() {
            let strict_ctx = ctx.strict();
            self.relex_current_token(strict_ctx)?;
            strict_ctx
        } else {
            ctx
        };

        let mut directives = vec![];
        let mut body = vec![];
        let mut use_strict_loc = None;

        for _ in 0..num_directives {
            match self.parse_statement_list_item(ctx, stmt_ctx)? {
                Statement::Expr(ExpressionStatement { loc, expression }) => match *expression {
                    Expression::String(literal) => {
                        let raw = self.source_text(literal.loc);
                        if literal.value == "use strict"
                            && raw.len() == 12
                            && use_strict_loc.is_none()
                        {
                            use_strict_loc = Some(loc);
                        }

                        directives.push(Directive { loc, value: literal.value, raw });
                    }
                    expression => {
                        let expression = p(expression);
                        body.push(Statement::Expr(ExpressionStatement { loc, expression }));
                        break;
                    }
                },
                stmt => {
                    body.push(stmt);
                    break;
                }
            }
        }

        self.parse_statement_list(ctx, stmt_ctx, end, &mut body)?;

        Ok((directives, body, use_strict_loc))
    }

    fn parse_statement_list(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
        end: &Token,
        body: &mut Vec<Statement>,
    ) -> ParseResult<()> {
        while self.token != *end && self.token != Token::Eof {
            let start_pos = self.loc.start;
            body.push(self.parse_statement_list_item(ctx, stmt_ctx)?);

            // Guarantee progress when a statement could not consume anything
            if self.loc.start == start_pos {
                self.skip_token(ctx)?;
            }
        }

        Ok(())
    }

    fn parse_statement_list_item(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        match self.token {
            Token::Var | Token::Const => {
                Ok(Statement::VarDecl(self.parse_variable_declaration(ctx, false)?))
            }
            Token::Let => {
                if self.is_let_declaration_start(ctx) {
                    Ok(Statement::VarDecl(self.parse_variable_declaration(ctx, false)?))
                } else {
                    self.parse_statement(ctx, stmt_ctx)
                }
            }
            Token::Function => Ok(Statement::FuncDecl(self.parse_function(
                ctx,
                FunctionKind::FunctionDeclaration,
                false,
            )?)),
            Token::Async => {
                if self.is_async_function_start(ctx) {
                    let func = self.parse_function(ctx, FunctionKind::FunctionDeclaration, false)?;
                    Ok(Statement::FuncDecl(func))
                } else {
                    self.parse_statement(ctx, stmt_ctx)
                }
            }
            Token::Class => Ok(Statement::ClassDecl(self.parse_class(ctx, true, false)?)),
            Token::Import => {
                // Dynamic import and `import.meta` start expression statements
                if matches!(self.peek(ctx), Token::LeftParen | Token::Period) {
                    self.parse_statement(ctx, stmt_ctx)
                } else {
                    self.parse_import_declaration(ctx, stmt_ctx)
                }
            }
            Token::Export => self.parse_export_declaration(ctx, stmt_ctx),
            _ => self.parse_statement(ctx, stmt_ctx),
        }
    }

    /// Whether the current `let` token starts a lexical declaration rather than an identifier.
    fn is_let_declaration_start(&mut self, ctx: Context) -> bool {
        if ctx.is_strict() {
            return true;
        }

        let next_token = self.peek(ctx);
        matches!(next_token, Token::LeftBracket | Token::LeftBrace) || is_identifier_like(&next_token)
    }

    /// Whether the current `async` token starts an async function, which requires `function` on
    /// the same line.
    pub(super) fn is_async_function_start(&mut self, ctx: Context) -> bool {
        if self.token != Token::Async {
            return false;
        }

        let (next_token, is_new_line_before) = self.peek_with_new_line(ctx);
        next_token == Token::Function && !is_new_line_before
    }

    fn parse_statement(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        match self.token {
            Token::Var => Ok(Statement::VarDecl(self.parse_variable_declaration(ctx, false)?)),
            Token::LeftBrace => Ok(Statement::Block(self.parse_block(ctx)?)),
            Token::If => self.parse_if_statement(ctx),
            Token::Switch => self.parse_switch_statement(ctx),
            Token::For => self.parse_any_for_statement(ctx),
            Token::While => self.parse_while_statement(ctx),
            Token::Do => self.parse_do_while_statement(ctx),
            Token::With => self.parse_with_statement(ctx),
            Token::Try => self.parse_try_statement(ctx),
            Token::Throw => self.parse_throw_statement(ctx),
            Token::Return => self.parse_return_statement(ctx),
            Token::Break => self.parse_break_statement(ctx),
            Token::Continue => self.parse_continue_statement(ctx),
            Token::Semicolon => {
                let loc = self.loc;
                self.advance(ctx)?;
                Ok(Statement::Empty(EmptyStatement { loc }))
            }
            Token::Debugger => {
                let start_pos = self.loc.start;
                self.advance(ctx)?;
                self.expect_semicolon(ctx)?;
                Ok(Statement::Debugger(DebuggerStatement { loc: self.mark_loc(start_pos) }))
            }
            // Declarations in the position of a single statement
            Token::Function => self.parse_function_in_statement_position(ctx, stmt_ctx),
            Token::Async => {
                if self.is_async_function_start(ctx) {
                    self.parse_function_in_statement_position(ctx, stmt_ctx)
                } else {
                    self.parse_expression_or_labeled_statement(ctx, stmt_ctx)
                }
            }
            Token::Class => {
                self.error(self.loc, DiagnosticCode::ClassForbiddenAsStatement)?;
                Ok(Statement::ClassDecl(self.parse_class(ctx, true, false)?))
            }
            Token::Const => {
                self.error(self.loc, DiagnosticCode::LexicalInStatementPosition)?;
                Ok(Statement::VarDecl(self.parse_variable_declaration(ctx, false)?))
            }
            Token::Let => {
                if self.is_lexical_in_statement_position(ctx) {
                    self.error(self.loc, DiagnosticCode::LexicalInStatementPosition)?;
                    Ok(Statement::VarDecl(self.parse_variable_declaration(ctx, false)?))
                } else {
                    self.parse_expression_or_labeled_statement(ctx, stmt_ctx)
                }
            }
            // Tokens that can never start a statement. Closing braces and the end of input are left
            // for the enclosing list.
            Token::RightBrace | Token::Eof => {
                let loc = Loc::new(self.loc.start, self.loc.start);
                self.error(self.loc, DiagnosticCode::ExpectedStatement)?;
                Ok(Statement::Empty(EmptyStatement { loc }))
            }
            Token::RightParen
            | Token::RightBracket
            | Token::Arrow
            | Token::Else
            | Token::Case
            | Token::Default
            | Token::Catch
            | Token::Finally => {
                let loc = self.loc;
                self.error(loc, DiagnosticCode::ExpectedStatement)?;
                self.advance(ctx)?;
                Ok(Statement::Empty(EmptyStatement { loc }))
            }
            _ => self.parse_expression_or_labeled_statement(ctx, stmt_ctx),
        }
    }

    /// `let [` can never start an expression statement, and `let` followed by an identifier on
    /// the same line is a misplaced declaration.
    fn is_lexical_in_statement_position(&mut self, ctx: Context) -> bool {
        if ctx.is_strict() {
            return true;
        }

        let (next_token, is_new_line_before) = self.peek_with_new_line(ctx);
        match next_token {
            Token::LeftBracket => true,
            Token::LeftBrace => !is_new_line_before,
            _ => is_identifier_like(&next_token) && !is_new_line_before,
        }
    }

    /// Function declarations are only allowed as the body of an if statement in sloppy mode with
    /// web compatibility, where they act as if wrapped in a block.
    fn parse_function_in_statement_position(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        let is_annex_b_function = stmt_ctx == StatementContext::If
            && ctx.has_web_compat()
            && self.token == Token::Function
            && self.peek(ctx) != Token::Multiply;

        if !is_annex_b_function {
            self.error(self.loc, DiagnosticCode::FunctionInStatementPosition)?;
        }

        Ok(Statement::FuncDecl(self.parse_function_in_implicit_block(ctx)?))
    }

    fn parse_function_in_implicit_block(&mut self, ctx: Context) -> ParseResult<P<Function>> {
        self.scopes.enter_scope(ScopeKind::BLOCK);
        let func = self.parse_function(ctx.enter_block(), FunctionKind::FunctionDeclaration, false);
        self.scopes.exit_scope();

        func
    }

    fn parse_expression_or_labeled_statement(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        let expr = self.parse_expression(ctx.allow_in())?;

        let expr = match *expr {
            Expression::Id(label) if self.token == Token::Colon => {
                return self.parse_labeled_statement(ctx, stmt_ctx, start_pos, label)
            }
            expr => expr,
        };

        self.expect_semicolon(ctx)?;

        Ok(Statement::Expr(ExpressionStatement {
            loc: self.mark_loc(start_pos),
            expression: p(expr),
        }))
    }

    fn parse_labeled_statement(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
        start_pos: Pos,
        label: Identifier,
    ) -> ParseResult<Statement> {
        // Colon
        self.advance(ctx)?;

        if self.labels.iter().any(|l| l.name == label.name) {
            self.error_with_arg(label.loc, DiagnosticCode::DuplicateLabel, &label.name)?;
        }

        let body_start = self.loc.start;
        self.labels.push(Label {
            name: label.name.clone(),
            start: start_pos,
            body_start,
            is_loop: false,
        });

        // Mark every label in a chain of labels directly preceding a loop
        if matches!(self.token, Token::For | Token::While | Token::Do) {
            let mut body_start = body_start;
            for label in self.labels.iter_mut().rev() {
                if label.body_start != body_start {
                    break;
                }

                label.is_loop = true;
                body_start = label.start;
            }
        }

        // Nested labels inherit the single statement position of the outermost label
        let body_stmt_ctx = if stmt_ctx.is_single_statement() {
            stmt_ctx
        } else {
            StatementContext::Label
        };

        let body = if self.token == Token::Function || self.is_async_function_start(ctx) {
            let in_single_statement = body_stmt_ctx != StatementContext::Label;
            let func = if in_single_statement {
                self.parse_function_in_implicit_block(ctx)?
            } else {
                self.parse_function(ctx, FunctionKind::FunctionDeclaration, false)?
            };

            if !ctx.has_web_compat() || func.is_async || func.is_generator || in_single_statement
            {
                self.error(func.loc, DiagnosticCode::LabelledFunction)?;
            }

            Statement::FuncDecl(func)
        } else {
            self.parse_statement(ctx, body_stmt_ctx)?
        };

        self.labels.pop();

        Ok(Statement::Labeled(LabeledStatement {
            loc: self.mark_loc(start_pos),
            label,
            body: p(body),
        }))
    }

    pub(super) fn parse_variable_declaration(
        &mut self,
        ctx: Context,
        is_for_init: bool,
    ) -> ParseResult<VariableDeclaration> {
        self.parse_variable_declaration_with_type(ctx, is_for_init, BindingType::empty())
    }

    fn parse_variable_declaration_with_type(
        &mut self,
        ctx: Context,
        is_for_init: bool,
        extra_binding_type: BindingType,
    ) -> ParseResult<VariableDeclaration> {
        let start_pos = self.loc.start;
        let (kind, binding_type) = match self.token {
            Token::Let => (VarKind::Let, BindingType::LET),
            Token::Const => (VarKind::Const, BindingType::CONST),
            _ => (VarKind::Var, BindingType::VAR),
        };
        let binding_type = binding_type | extra_binding_type;

        self.advance(ctx)?;

        let mut declarations = vec![];
        loop {
            let declarator_start_pos = self.loc.start;
            let id = self.parse_binding_pattern(ctx, binding_type)?;

            let init = if self.eat(ctx, Token::Equals)? {
                Some(self.parse_assignment_expression(ctx)?)
            } else {
                None
            };

            declarations.push(VariableDeclarator {
                loc: self.mark_loc(declarator_start_pos),
                id: p(id),
                init,
            });

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        let declaration = VariableDeclaration { loc: self.mark_loc(start_pos), kind, declarations };

        // Initializers in for heads depend on the kind of for statement
        if !is_for_init {
            self.check_declaration_initializers(&declaration)?;
            self.expect_semicolon(ctx)?;
        }

        Ok(VariableDeclaration { loc: self.mark_loc(start_pos), ..declaration })
    }

    fn check_declaration_initializers(&mut self, decl: &VariableDeclaration) -> ParseResult<()> {
        for declarator in &decl.declarations {
            if declarator.init.is_some() {
                continue;
            }

            if decl.kind == VarKind::Const {
                self.error(declarator.loc, DiagnosticCode::MissingConstInit)?;
            } else if !declarator.id.is_id() {
                self.error(declarator.loc, DiagnosticCode::MissingDestructInit)?;
            }
        }

        Ok(())
    }

    fn parse_block(&mut self, ctx: Context) -> ParseResult<Block> {
        self.parse_block_with_scope(ctx, ScopeKind::BLOCK)
    }

    fn parse_block_with_scope(&mut self, ctx: Context, scope_kind: ScopeKind) -> ParseResult<Block> {
        let start_pos = self.loc.start;
        self.expect(ctx, Token::LeftBrace)?;

        self.scopes.enter_scope(scope_kind);
        let mut body = vec![];
        self.parse_statement_list(
            ctx.enter_block(),
            StatementContext::StatementList,
            &Token::RightBrace,
            &mut body,
        )?;
        self.scopes.exit_scope();

        self.expect(ctx, Token::RightBrace)?;

        Ok(Block { loc: self.mark_loc(start_pos), body })
    }

    fn parse_if_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        self.expect(ctx, Token::LeftParen)?;
        let test = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        let consequent = p(self.parse_statement(ctx, StatementContext::If)?);

        let alternate = if self.eat(ctx, Token::Else)? {
            Some(p(self.parse_statement(ctx, StatementContext::If)?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            loc: self.mark_loc(start_pos),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_switch_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        self.expect(ctx, Token::LeftParen)?;
        let discriminant = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        let body_ctx = ctx.enter_switch().enter_block();
        self.expect(body_ctx, Token::LeftBrace)?;
        self.scopes.enter_scope(ScopeKind::BLOCK | ScopeKind::SWITCH);

        let mut cases = vec![];
        let mut has_default = false;

        while self.token != Token::RightBrace && self.token != Token::Eof {
            let case_start_pos = self.loc.start;
            let test = match self.token {
                Token::Case => {
                    self.advance(body_ctx)?;
                    Some(self.parse_expression(body_ctx.allow_in())?)
                }
                Token::Default => {
                    if has_default {
                        self.error(self.loc, DiagnosticCode::MultipleDefaultsInSwitch)?;
                    }

                    has_default = true;
                    self.advance(body_ctx)?;
                    None
                }
                _ => {
                    self.error_unexpected_token()?;
                    self.skip_token(body_ctx)?;
                    continue;
                }
            };

            self.expect(body_ctx, Token::Colon)?;

            let mut consequent = vec![];
            while !matches!(
                self.token,
                Token::Case | Token::Default | Token::RightBrace | Token::Eof
            ) {
                let stmt_start_pos = self.loc.start;
                consequent.push(
                    self.parse_statement_list_item(body_ctx, StatementContext::StatementList)?,
                );

                if self.loc.start == stmt_start_pos {
                    self.skip_token(body_ctx)?;
                }
            }

            cases.push(SwitchCase { loc: self.mark_loc(case_start_pos), test, consequent });
        }

        self.scopes.exit_scope();
        self.expect(ctx, Token::RightBrace)?;

        Ok(Statement::Switch(SwitchStatement {
            loc: self.mark_loc(start_pos),
            discriminant,
            cases,
        }))
    }

    fn parse_any_for_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let await_loc = self.loc;
        let is_await = self.token == Token::Await;
        if is_await {
            if !ctx.in_async() {
                self.error_unexpected_token()?;
            }

            self.advance(ctx)?;
        }

        self.expect(ctx, Token::LeftParen)?;

        let head_ctx = ctx.disallow_in();
        let is_lexical_head = match self.token {
            Token::Const => true,
            Token::Let => self.is_let_declaration_start(ctx),
            _ => false,
        };

        if is_lexical_head {
            self.scopes.enter_scope(ScopeKind::FOR_HEAD);
        }

        let stmt = self.parse_for_statement_after_paren(
            ctx,
            head_ctx,
            is_lexical_head,
            start_pos,
            is_await,
            await_loc,
        );

        if is_lexical_head {
            self.scopes.exit_scope();
        }

        stmt
    }

    fn parse_for_statement_after_paren(
        &mut self,
        ctx: Context,
        head_ctx: Context,
        is_lexical_head: bool,
        start_pos: Pos,
        is_await: bool,
        await_loc: Loc,
    ) -> ParseResult<Statement> {
        let init = match self.token {
            Token::Semicolon => None,
            Token::Var => {
                // Var declarations in a for-of head may never redeclare a catch parameter
                let extra_binding_type = if self.is_for_of_var_head(ctx) {
                    BindingType::FOR_OF_VAR
                } else {
                    BindingType::empty()
                };

                let decl =
                    self.parse_variable_declaration_with_type(head_ctx, true, extra_binding_type)?;
                Some(ForInit::VarDecl(decl))
            }
            _ if is_lexical_head => {
                Some(ForInit::VarDecl(self.parse_variable_declaration(head_ctx, true)?))
            }
            _ => {
                let expr_start_pos = self.loc.start;
                let starts_with_let = self.token == Token::Let;
                let is_unescaped_async = self.token == Token::Async && !self.lexer.has_escape();
                let expr = self.parse_assignment_expression_cover(head_ctx)?;

                if matches!(self.token, Token::In | Token::Of) {
                    if starts_with_let && self.token == Token::Of {
                        self.error(expr.loc(), DiagnosticCode::ForOfLet)?;
                    }

                    // `for (async of` would be ambiguous with an async arrow function, but
                    // `for await (async of x)` is allowed
                    if is_unescaped_async
                        && !is_await
                        && self.token == Token::Of
                        && matches!(*expr, Expression::Id(_))
                    {
                        self.error(expr.loc(), DiagnosticCode::ForOfAsync)?;
                    }

                    let pattern = self.reparse_as_assignment_target(
                        head_ctx,
                        *expr,
                        DiagnosticCode::InvalidForLHS,
                    )?;

                    return self.parse_for_each_statement(
                        ctx,
                        start_pos,
                        ForEachInit::Pattern(pattern),
                        is_await,
                        await_loc,
                    );
                }

                self.report_cover_errors(expr_start_pos)?;
                let expr = self.parse_sequence_expression_rest(head_ctx, expr_start_pos, expr)?;

                Some(ForInit::Expression(*expr))
            }
        };

        match init {
            Some(ForInit::VarDecl(decl)) => {
                if matches!(self.token, Token::In | Token::Of) {
                    self.check_for_each_declaration(ctx, &decl)?;
                    return self.parse_for_each_statement(
                        ctx,
                        start_pos,
                        ForEachInit::VarDecl(decl),
                        is_await,
                        await_loc,
                    );
                }

                self.check_declaration_initializers(&decl)?;
                let init = Some(p(ForInit::VarDecl(decl)));
                self.parse_for_statement(ctx, start_pos, init, is_await, await_loc)
            }
            init => self.parse_for_statement(ctx, start_pos, init.map(p), is_await, await_loc),
        }
    }

    /// Whether the current `var` declares a single binding followed by `of`.
    fn is_for_of_var_head(&mut self, ctx: Context) -> bool {
        let save_state = self.lexer.save();

        let is_binding_end = match self.lexer.next(ctx).0 {
            Token::LeftBracket => self.skip_delimited(ctx, Delimiter::Bracket),
            Token::LeftBrace => self.skip_delimited(ctx, Delimiter::Brace),
            token => is_identifier_like(&token),
        };
        let is_for_of = is_binding_end && self.lexer.next(ctx).0 == Token::Of;

        self.lexer.restore(&save_state);

        is_for_of
    }

    fn check_for_each_declaration(
        &mut self,
        ctx: Context,
        decl: &VariableDeclaration,
    ) -> ParseResult<()> {
        if decl.declarations.len() != 1 {
            return self.error(decl.loc, DiagnosticCode::ForInOfMultipleDeclarations);
        }

        let declarator = &decl.declarations[0];
        if declarator.init.is_some() {
            // Initializers are allowed in sloppy `for (var x = 0 in y)` for web compatibility
            let is_legacy_initializer = self.token == Token::In
                && decl.kind == VarKind::Var
                && ctx.has_web_compat()
                && declarator.id.is_id();

            if !is_legacy_initializer {
                self.error(declarator.loc, DiagnosticCode::ForInOfInitializer)?;
            }
        }

        Ok(())
    }

    fn parse_for_statement(
        &mut self,
        ctx: Context,
        start_pos: Pos,
        init: Option<P<ForInit>>,
        is_await: bool,
        await_loc: Loc,
    ) -> ParseResult<Statement> {
        if is_await {
            self.error(await_loc, DiagnosticCode::ForAwaitNotOf)?;
        }

        self.expect(ctx, Token::Semicolon)?;

        let test = if self.token == Token::Semicolon {
            None
        } else {
            Some(self.parse_expression(ctx.allow_in())?)
        };
        self.expect(ctx, Token::Semicolon)?;

        let update = if self.token == Token::RightParen {
            None
        } else {
            Some(self.parse_expression(ctx.allow_in())?)
        };
        self.expect(ctx, Token::RightParen)?;

        let body = p(self.parse_statement(ctx.enter_iteration(), StatementContext::Iteration)?);

        Ok(Statement::For(ForStatement { loc: self.mark_loc(start_pos), init, test, update, body }))
    }

    fn parse_for_each_statement(
        &mut self,
        ctx: Context,
        start_pos: Pos,
        left: ForEachInit,
        is_await: bool,
        await_loc: Loc,
    ) -> ParseResult<Statement> {
        let kind = if self.token == Token::In {
            ForEachKind::ForInStatement
        } else {
            ForEachKind::ForOfStatement
        };

        if is_await && kind == ForEachKind::ForInStatement {
            self.error(await_loc, DiagnosticCode::ForAwaitNotOf)?;
        }

        self.advance(ctx)?;

        let right = match kind {
            ForEachKind::ForInStatement => self.parse_expression(ctx.allow_in())?,
            ForEachKind::ForOfStatement => self.parse_assignment_expression(ctx.allow_in())?,
        };
        self.expect(ctx, Token::RightParen)?;

        let body = p(self.parse_statement(ctx.enter_iteration(), StatementContext::Iteration)?);

        Ok(Statement::ForEach(ForEachStatement {
            kind,
            loc: self.mark_loc(start_pos),
            left: p(left),
            right,
            body,
            is_await,
        }))
    }

    fn parse_while_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        self.expect(ctx, Token::LeftParen)?;
        let test = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        let body = p(self.parse_statement(ctx.enter_iteration(), StatementContext::Iteration)?);

        Ok(Statement::While(WhileStatement { loc: self.mark_loc(start_pos), test, body }))
    }

    fn parse_do_while_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let body = p(self.parse_statement(ctx.enter_iteration(), StatementContext::Iteration)?);

        self.expect(ctx, Token::While)?;
        self.expect(ctx, Token::LeftParen)?;
        let test = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        // A semicolon can always be inserted after a do-while statement
        self.eat(ctx, Token::Semicolon)?;

        Ok(Statement::DoWhile(DoWhileStatement { loc: self.mark_loc(start_pos), body, test }))
    }

    fn parse_with_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;

        if ctx.is_strict() {
            self.error(self.loc, DiagnosticCode::StrictWith)?;
        }

        self.advance(ctx)?;

        self.expect(ctx, Token::LeftParen)?;
        let object = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        let body = p(self.parse_statement(ctx, StatementContext::With)?);

        Ok(Statement::With(WithStatement { loc: self.mark_loc(start_pos), object, body }))
    }

    fn parse_try_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let block = p(self.parse_block(ctx)?);

        let handler = if self.token == Token::Catch {
            let catch_start_pos = self.loc.start;
            self.advance(ctx)?;

            self.scopes.enter_scope(ScopeKind::CATCH_HEAD);

            let param = if self.eat(ctx, Token::LeftParen)? {
                let binding_type = if matches!(self.token, Token::LeftBracket | Token::LeftBrace) {
                    BindingType::CATCH_PATTERN
                } else {
                    BindingType::CATCH_IDENTIFIER
                };

                let param = self.parse_binding_pattern(ctx, binding_type)?;
                self.expect(ctx, Token::RightParen)?;

                Some(p(param))
            } else {
                None
            };

            let body =
                p(self.parse_block_with_scope(ctx, ScopeKind::BLOCK | ScopeKind::CATCH_BLOCK)?);

            self.scopes.exit_scope();

            Some(p(CatchClause { loc: self.mark_loc(catch_start_pos), param, body }))
        } else {
            None
        };

        let finalizer = if self.eat(ctx, Token::Finally)? {
            Some(p(self.parse_block(ctx)?))
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.error(self.loc, DiagnosticCode::NoCatchOrFinally)?;
        }

        Ok(Statement::Try(TryStatement { loc: self.mark_loc(start_pos), block, handler, finalizer }))
    }

    fn parse_throw_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        if self.lexer.is_new_line_before_current() {
            self.error(self.loc, DiagnosticCode::NewlineAfterThrow)?;
        }

        let argument = self.parse_expression(ctx.allow_in())?;
        self.expect_semicolon(ctx)?;

        Ok(Statement::Throw(ThrowStatement { loc: self.mark_loc(start_pos), argument }))
    }

    fn parse_return_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;

        if !ctx.contains(Context::IN_FUNCTION_BODY) {
            self.error(self.loc, DiagnosticCode::IllegalReturn)?;
        }

        self.advance(ctx)?;

        let argument = if self.can_insert_semicolon() {
            None
        } else {
            Some(self.parse_expression(ctx.allow_in())?)
        };

        self.expect_semicolon(ctx)?;

        Ok(Statement::Return(ReturnStatement { loc: self.mark_loc(start_pos), argument }))
    }

    /// The label of a break or continue statement, which must be on the same line.
    fn parse_jump_label(&mut self, ctx: Context) -> ParseResult<Option<Identifier>> {
        if is_identifier_like(&self.token) && !self.lexer.is_new_line_before_current() {
            Ok(Some(self.parse_identifier_reference(ctx)?))
        } else {
            Ok(None)
        }
    }

    fn parse_break_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        let break_loc = self.loc;
        self.advance(ctx)?;

        let label = self.parse_jump_label(ctx)?;
        match &label {
            Some(label) => {
                if !self.labels.iter().any(|l| l.name == label.name) {
                    self.error_with_arg(label.loc, DiagnosticCode::UnknownLabel, &label.name)?;
                }
            }
            None => {
                if !ctx.intersects(Context::BREAKABLE) {
                    self.error(break_loc, DiagnosticCode::InvalidBreak)?;
                }
            }
        }

        self.expect_semicolon(ctx)?;

        Ok(Statement::Break(BreakStatement { loc: self.mark_loc(start_pos), label }))
    }

    fn parse_continue_statement(&mut self, ctx: Context) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        let continue_loc = self.loc;
        self.advance(ctx)?;

        let label = self.parse_jump_label(ctx)?;
        match &label {
            Some(label) => {
                let target = self.labels.iter().rev().find(|l| l.name == label.name);
                match target.map(|l| l.is_loop) {
                    None => {
                        self.error_with_arg(label.loc, DiagnosticCode::UnknownLabel, &label.name)?
                    }
                    Some(false) => self.error(label.loc, DiagnosticCode::IllegalContinue)?,
                    Some(true) => {}
                }
            }
            None => {
                if !ctx.contains(Context::IN_ITERATION) {
                    self.error(continue_loc, DiagnosticCode::IllegalContinue)?;
                }
            }
        }

        self.expect_semicolon(ctx)?;

        Ok(Statement::Continue(ContinueStatement { loc: self.mark_loc(start_pos), label }))
    }

    /// An identifier with a zero width location at the current token, standing in for a name
    /// that could not be parsed.
    pub(super) fn missing_identifier(&self) -> Identifier {
        Identifier::new(Loc::new(self.loc.start, self.loc.start), String::new())
    }

    /// Report if an identifier cannot be used as an identifier reference or binding in this
    /// context. Contextual keywords are only checked here, as the token is otherwise an identifier.
    pub(super) fn check_identifier(
        &mut self,
        ctx: Context,
        id: &Identifier,
        has_escape: bool,
    ) -> ParseResult<()> {
        let name = id.name.as_str();

        if let Some(keyword) = Token::keyword_from_str(name) {
            if keyword.is_reserved_word() {
                let code = if has_escape {
                    DiagnosticCode::EscapedKeyword
                } else {
                    DiagnosticCode::UnexpectedToken
                };

                return self.error_with_arg(id.loc, code, name);
            }
        }

        match name {
            "yield" if ctx.in_generator() => self.error(id.loc, DiagnosticCode::YieldAsIdent),
            "await" if ctx.in_async() || ctx.is_module() => {
                self.error(id.loc, DiagnosticCode::AwaitAsIdent)
            }
            _ if ctx.is_strict() && is_strict_reserved_word(name) => {
                self.error_with_arg(id.loc, DiagnosticCode::StrictModeReserved, name)
            }
            _ => Ok(()),
        }
    }

    pub(super) fn parse_identifier_reference(&mut self, ctx: Context) -> ParseResult<Identifier> {
        let name = match &self.token {
            Token::Identifier(name) => name.clone(),
            token if token.is_contextual_keyword() => token.to_string(),
            _ => {
                self.error_unexpected_token()?;
                return Ok(self.missing_identifier());
            }
        };

        let id = Identifier::new(self.loc, name);
        let has_escape = self.lexer.has_escape();
        self.check_identifier(ctx, &id, has_escape)?;
        self.advance(ctx)?;

        Ok(id)
    }

    /// Any identifier or keyword, as allowed for property names. Returns `None` without consuming
    /// anything if the current token is not an identifier name.
    pub(super) fn parse_identifier_name(&mut self, ctx: Context) -> ParseResult<Option<Identifier>> {
        let name = match &self.token {
            Token::Identifier(name) => name.clone(),
            token if token.is_identifier_name() => token.to_string(),
            _ => return Ok(None),
        };

        let id = Identifier::new(self.loc, name);
        self.advance(ctx)?;

        Ok(Some(id))
    }

    /// Parse a binding identifier, declaring it with the given binding type.
    pub(super) fn parse_binding_identifier(
        &mut self,
        ctx: Context,
        binding_type: Option<BindingType>,
    ) -> ParseResult<Identifier> {
        let name = match &self.token {
            Token::Identifier(name) => name.clone(),
            token if token.is_contextual_keyword() => token.to_string(),
            token if token.is_reserved_word() => {
                // Consume the keyword so that the rest of the declaration can be parsed
                let id = Identifier::new(self.loc, token.to_string());
                self.error_with_arg(id.loc, DiagnosticCode::UnexpectedToken, &id.name)?;
                self.advance(ctx)?;
                return Ok(id);
            }
            Token::Eof => {
                self.error(self.loc, DiagnosticCode::UnexpectedEOF)?;
                return Ok(self.missing_identifier());
            }
            _ => {
                self.error(self.loc, DiagnosticCode::ExpectedBindingIdent)?;
                return Ok(self.missing_identifier());
            }
        };

        let id = Identifier::new(self.loc, name);
        let has_escape = self.lexer.has_escape();
        self.declare_binding_identifier(ctx, &id, has_escape, binding_type)?;
        self.advance(ctx)?;

        Ok(id)
    }

    /// Check a name that is being bound and add it to the current scope.
    fn declare_binding_identifier(
        &mut self,
        ctx: Context,
        id: &Identifier,
        has_escape: bool,
        binding_type: Option<BindingType>,
    ) -> ParseResult<()> {
        self.check_identifier(ctx, id, has_escape)?;

        if ctx.is_strict() && is_eval_or_arguments(&id.name) {
            self.error_with_arg(id.loc, DiagnosticCode::StrictEvalArguments, &id.name)?;
        }

        let binding_type = match binding_type {
            Some(binding_type) => binding_type,
            None => return Ok(()),
        };

        if binding_type.intersects(BindingType::LET | BindingType::CONST)
            && id.name == "let"
            && !ctx.is_strict()
        {
            self.error(id.loc, DiagnosticCode::InvalidLetConstBinding)?;
        }

        if let Some(diagnostic) =
            self.scopes
                .add_var_or_block(ctx, &id.name, binding_type, id.loc)
        {
            self.report(diagnostic)?;
        }

        Ok(())
    }

    pub(super) fn parse_binding_pattern(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
    ) -> ParseResult<Pattern> {
        match self.token {
            Token::LeftBracket => self.parse_array_binding_pattern(ctx, binding_type),
            Token::LeftBrace => self.parse_object_binding_pattern(ctx, binding_type),
            _ => Ok(Pattern::Id(self.parse_binding_identifier(ctx, Some(binding_type))?)),
        }
    }

    fn parse_binding_element(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
    ) -> ParseResult<Pattern> {
        let start_pos = self.loc.start;
        let pattern = self.parse_binding_pattern(ctx, binding_type)?;
        self.parse_pattern_initializer(ctx, pattern, start_pos)
    }

    fn parse_pattern_initializer(
        &mut self,
        ctx: Context,
        left: Pattern,
        start_pos: Pos,
    ) -> ParseResult<Pattern> {
        if !self.eat(ctx, Token::Equals)? {
            return Ok(left);
        }

        let right = self.parse_assignment_expression(ctx.allow_in())?;

        Ok(Pattern::Assign(AssignmentPattern {
            loc: self.mark_loc(start_pos),
            left: p(left),
            right,
        }))
    }

    /// A rest element must be the last element of its pattern, without a trailing comma.
    fn check_rest_is_last(&mut self, ctx: Context, close: &Token) -> ParseResult<()> {
        if self.token != Token::Comma {
            return Ok(());
        }

        let code = if self.peek(ctx) == *close {
            DiagnosticCode::RestTrailing
        } else {
            DiagnosticCode::RestNotLast
        };

        self.error(self.loc, code)
    }

    fn parse_binding_rest_element(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
        allow_patterns: bool,
    ) -> ParseResult<RestElement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let argument = if allow_patterns {
            self.parse_binding_pattern(ctx, binding_type)?
        } else {
            Pattern::Id(self.parse_binding_identifier(ctx, Some(binding_type))?)
        };

        let loc = self.mark_loc(start_pos);

        if self.token == Token::Equals {
            self.error(self.loc, DiagnosticCode::RestInit)?;

            // Skip the initializer
            self.advance(ctx)?;
            self.parse_assignment_expression(ctx.allow_in())?;
        }

        Ok(RestElement { loc, argument: p(argument) })
    }

    fn parse_array_binding_pattern(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
    ) -> ParseResult<Pattern> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let mut elements = vec![];
        while self.token != Token::RightBracket && self.token != Token::Eof {
            match self.token {
                Token::Comma => {
                    self.advance(ctx)?;
                    elements.push(ArrayPatternElement::Hole);
                    continue;
                }
                Token::Spread => {
                    let rest = self.parse_binding_rest_element(ctx, binding_type, true)?;
                    elements.push(ArrayPatternElement::Rest(rest));
                    self.check_rest_is_last(ctx, &Token::RightBracket)?;
                }
                _ => {
                    let element = self.parse_binding_element(ctx, binding_type)?;
                    elements.push(ArrayPatternElement::Pattern(element));
                }
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightBracket)?;

        Ok(Pattern::Array(ArrayPattern { loc: self.mark_loc(start_pos), elements }))
    }

    fn parse_object_binding_pattern(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
    ) -> ParseResult<Pattern> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let mut properties = vec![];
        while self.token != Token::RightBrace && self.token != Token::Eof {
            if self.token == Token::Spread {
                let rest = self.parse_binding_rest_element(ctx, binding_type, false)?;
                properties.push(ObjectPatternProperty::Rest(rest));
                self.check_rest_is_last(ctx, &Token::RightBrace)?;
            } else {
                let property = self.parse_binding_property(ctx, binding_type)?;
                properties.push(ObjectPatternProperty::Property(property));
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightBrace)?;

        Ok(Pattern::Object(ObjectPattern { loc: self.mark_loc(start_pos), properties }))
    }

    fn parse_binding_property(
        &mut self,
        ctx: Context,
        binding_type: BindingType,
    ) -> ParseResult<PatternProperty> {
        let start_pos = self.loc.start;

        // Shorthand properties like `{ a }` and `{ a = 1 }`
        if is_identifier_like(&self.token)
            && matches!(self.peek(ctx), Token::Comma | Token::RightBrace | Token::Equals)
        {
            let id = self.parse_binding_identifier(ctx, Some(binding_type))?;
            let key = p(Expression::Id(id.clone()));
            let value = self.parse_pattern_initializer(ctx, Pattern::Id(id), start_pos)?;

            return Ok(PatternProperty {
                loc: self.mark_loc(start_pos),
                key,
                value: p(value),
                computed: false,
                shorthand: true,
            });
        }

        let name = self.parse_property_name(ctx, false)?;
        self.expect(ctx, Token::Colon)?;
        let value = self.parse_binding_element(ctx, binding_type)?;

        Ok(PatternProperty {
            loc: self.mark_loc(start_pos),
            key: name.key,
            value: p(value),
            computed: name.computed,
            shorthand: false,
        })
    }

    /// Binding type of a function declaration's name, which depends on where it is declared.
    fn function_binding_type(ctx: Context) -> BindingType {
        let is_module_top_level = ctx.is_module()
            && !ctx.intersects(Context::IN_FUNCTION_BODY | Context::IN_CLASS_FIELD);

        if ctx.contains(Context::IN_BLOCK) || is_module_top_level {
            BindingType::FUNCTION_LEXICAL
        } else {
            BindingType::VAR
        }
    }

    /// Parse a function declaration or expression starting at `async` or `function`.
    pub(super) fn parse_function(
        &mut self,
        ctx: Context,
        kind: FunctionKind,
        is_name_optional: bool,
    ) -> ParseResult<P<Function>> {
        let start_pos = self.loc.start;

        let is_async = self.token == Token::Async;
        if is_async {
            self.advance(ctx)?;
        }

        self.expect(ctx, Token::Function)?;
        let is_generator = self.eat(ctx, Token::Multiply)?;

        let fn_ctx = ctx.enter_function(is_async, is_generator);

        // Declaration names are bound in the enclosing scope and follow the enclosing context,
        // expression names are only visible inside the function itself.
        let (id, root_scope) = if kind == FunctionKind::FunctionDeclaration {
            let id = if self.token == Token::LeftParen {
                if !is_name_optional {
                    self.error(self.loc, DiagnosticCode::MissingFuncName)?;
                }

                None
            } else {
                let binding_type = Self::function_binding_type(ctx);
                Some(self.parse_binding_identifier(ctx, Some(binding_type))?)
            };

            (id, self.scopes.enter_scope(ScopeKind::FUNCTION_ROOT))
        } else {
            let root_scope = self.scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
            let id = if self.token == Token::LeftParen {
                None
            } else {
                Some(self.parse_binding_identifier(fn_ctx, Some(BindingType::EMPTY))?)
            };

            (id, root_scope)
        };

        let params = self.parse_formal_parameters(fn_ctx.enter_parameters())?;
        let (body, use_strict_loc) = self.parse_function_block_body(ctx, fn_ctx, &params)?;
        self.scopes.exit_scope();

        let is_strict = fn_ctx.is_strict() || use_strict_loc.is_some();
        let must_have_unique_params = is_strict || !has_simple_parameter_list(&params);
        self.resolve_duplicate_parameters(root_scope, must_have_unique_params)?;

        if use_strict_loc.is_some() && !fn_ctx.is_strict() {
            self.check_names_made_strict(id.as_ref(), &params)?;
        }

        Ok(p(Function {
            kind,
            loc: self.mark_loc(start_pos),
            id: id.map(p),
            params,
            body: p(FunctionBody::Block(body)),
            is_async,
            is_generator,
            is_strict,
        }))
    }

    /// Duplicate parameters are only known to be an error once the whole function is parsed.
    pub(super) fn resolve_duplicate_parameters(
        &mut self,
        root_scope: ScopeId,
        must_have_unique_params: bool,
    ) -> ParseResult<()> {
        if let Some(error) = self.scopes.take_deferred_error(root_scope) {
            if must_have_unique_params {
                trace!(name = %error.name, "promoting duplicate parameter");
                self.report(error.to_diagnostic())?;
            }
        }

        Ok(())
    }

    /// Names bound before a "use strict" directive was seen must follow the strict mode rules.
    pub(super) fn check_names_made_strict(
        &mut self,
        id: Option<&Identifier>,
        params: &[FunctionParam],
    ) -> ParseResult<()> {
        let mut names = vec![];
        if let Some(id) = id {
            names.push(id.clone());
        }

        for param in params {
            param.iter_bound_names(&mut |id| names.push(id.clone()));
        }

        for id in names {
            if is_strict_reserved_word(&id.name) {
                self.error_with_arg(id.loc, DiagnosticCode::StrictModeReserved, &id.name)?;
            } else if is_eval_or_arguments(&id.name) {
                self.error_with_arg(id.loc, DiagnosticCode::StrictEvalArguments, &id.name)?;
            }
        }

        Ok(())
    }

    /// Parse a parenthesized parameter list. The parameters are bound in the current scope.
    pub(super) fn parse_formal_parameters(&mut self, ctx: Context) -> ParseResult<Vec<FunctionParam>> {
        self.expect(ctx, Token::LeftParen)?;

        let mut params = vec![];
        while self.token != Token::RightParen && self.token != Token::Eof {
            let start_pos = self.loc.start;

            if self.token == Token::Spread {
                let rest =
                    self.parse_binding_rest_element(ctx, BindingType::ARGUMENT_LIST, true)?;
                params.push(FunctionParam::Rest(rest));
                self.check_rest_is_last(ctx, &Token::RightParen)?;
            } else {
                let param = self.parse_binding_element(ctx, BindingType::ARGUMENT_LIST)?;
                params.push(FunctionParam::Pattern(param));
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }

            if self.loc.start == start_pos {
                self.skip_token(ctx)?;
            }
        }

        self.expect(ctx, Token::RightParen)?;

        Ok(params)
    }

    /// Parse the braced body of a function, method, or arrow. The closing brace is consumed with
    /// the enclosing context. Returns the location of a "use strict" directive if there is one.
    pub(super) fn parse_function_block_body(
        &mut self,
        outer_ctx: Context,
        fn_ctx: Context,
        params: &[FunctionParam],
    ) -> ParseResult<(FunctionBlockBody, Option<Loc>)> {
        let start_pos = self.loc.start;
        let body_ctx = fn_ctx.enter_function_body();

        self.expect(body_ctx, Token::LeftBrace)?;

        self.scopes.enter_scope(ScopeKind::FUNCTION_BODY);
        let labels = std::mem::take(&mut self.labels);

        let (directives, body, use_strict_loc) = self.parse_directives_and_statements(
            body_ctx,
            StatementContext::StatementList,
            &Token::RightBrace,
        )?;

        self.labels = labels;
        self.scopes.exit_scope();

        if let Some(use_strict_loc) = use_strict_loc {
            if !has_simple_parameter_list(params) {
                self.error(use_strict_loc, DiagnosticCode::UseStrictNonSimpleParams)?;
            }
        }

        self.expect(outer_ctx, Token::RightBrace)?;

        let body = FunctionBlockBody { loc: self.mark_loc(start_pos), directives, body };

        Ok((body, use_strict_loc))
    }

    /// Parse the parameters and body of a method, starting at the opening parenthesis.
    pub(super) fn parse_method(
        &mut self,
        ctx: Context,
        kind: PropertyKind,
        is_async: bool,
        is_generator: bool,
        allow_super_call: bool,
    ) -> ParseResult<P<Function>> {
        let start_pos = self.loc.start;
        let method_ctx = ctx.enter_method(is_async, is_generator, allow_super_call);

        let root_scope = self.scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
        let params = self.parse_formal_parameters(method_ctx.enter_parameters())?;
        let (body, use_strict_loc) = self.parse_function_block_body(ctx, method_ctx, &params)?;
        self.scopes.exit_scope();

        self.resolve_duplicate_parameters(root_scope, true)?;

        if use_strict_loc.is_some() && !method_ctx.is_strict() {
            self.check_names_made_strict(None, &params)?;
        }

        let loc = self.mark_loc(start_pos);

        match kind {
            PropertyKind::Get if !params.is_empty() => {
                self.error(loc, DiagnosticCode::GetterArity)?;
            }
            PropertyKind::Set
                if params.len() != 1 || matches!(params[0], FunctionParam::Rest(_)) =>
            {
                self.error(loc, DiagnosticCode::SetterArity)?;
            }
            _ => {}
        }

        Ok(p(Function {
            kind: FunctionKind::FunctionExpression,
            loc,
            id: None,
            params,
            body: p(FunctionBody::Block(body)),
            is_async,
            is_generator,
            is_strict: method_ctx.is_strict() || use_strict_loc.is_some(),
        }))
    }

    /// Parse a class declaration or expression starting at `class`. Class bodies are strict.
    pub(super) fn parse_class(
        &mut self,
        ctx: Context,
        is_decl: bool,
        is_name_optional: bool,
    ) -> ParseResult<P<Class>> {
        let start_pos = self.loc.start;
        let class_ctx = ctx.strict();
        self.advance(class_ctx)?;

        let id = if self.token != Token::Extends && self.token != Token::LeftBrace {
            let binding_type = if is_decl { Some(BindingType::LET) } else { None };
            Some(p(self.parse_binding_identifier(class_ctx, binding_type)?))
        } else {
            if is_decl && !is_name_optional {
                self.error(self.loc, DiagnosticCode::MissingClassName)?;
            }

            None
        };

        let super_class = if self.eat(class_ctx, Token::Extends)? {
            let super_class_start_pos = self.loc.start;
            let super_class = self.parse_left_hand_side_expression(class_ctx)?;
            self.report_cover_errors(super_class_start_pos)?;

            Some(super_class)
        } else {
            None
        };

        let body_ctx = class_ctx.enter_class_body();
        self.expect(body_ctx, Token::LeftBrace)?;

        let mut body = vec![];
        let mut has_constructor = false;
        while self.token != Token::RightBrace && self.token != Token::Eof {
            if self.eat(body_ctx, Token::Semicolon)? {
                continue;
            }

            let element_start_pos = self.loc.start;
            body.push(self.parse_class_element(
                body_ctx,
                super_class.is_some(),
                &mut has_constructor,
            )?);

            if self.loc.start == element_start_pos {
                self.skip_token(body_ctx)?;
            }
        }

        self.expect(ctx, Token::RightBrace)?;

        let kind = if is_decl {
            ClassKind::ClassDeclaration
        } else {
            ClassKind::ClassExpression
        };

        Ok(p(Class { kind, loc: self.mark_loc(start_pos), id, super_class, body }))
    }

    /// Whether a `static`, `async`, `get`, or `set` token in a class body is a modifier rather
    /// than the name of the element.
    fn is_class_element_modifier(&mut self, ctx: Context) -> bool {
        let (next_token, is_new_line_before) = self.peek_with_new_line(ctx);

        if matches!(
            next_token,
            Token::LeftParen | Token::Equals | Token::Semicolon | Token::RightBrace | Token::Eof
        ) {
            return false;
        }

        !(self.token == Token::Async && is_new_line_before)
    }

    fn parse_class_element(
        &mut self,
        ctx: Context,
        has_super_class: bool,
        has_constructor: &mut bool,
    ) -> ParseResult<ClassElement> {
        let start_pos = self.loc.start;

        let mut is_static = false;
        if self.token == Token::Static && self.is_class_element_modifier(ctx) {
            is_static = true;
            self.advance(ctx)?;

            if self.token == Token::LeftBrace {
                return self.parse_static_block(ctx, start_pos);
            }
        }

        let mut is_async = false;
        if self.token == Token::Async && self.is_class_element_modifier(ctx) {
            is_async = true;
            self.advance(ctx)?;
        }

        let is_generator = self.eat(ctx, Token::Multiply)?;

        let mut kind = PropertyKind::Init;
        if !is_async
            && !is_generator
            && matches!(self.token, Token::Get | Token::Set)
            && self.is_class_element_modifier(ctx)
        {
            kind = if self.token == Token::Get {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.advance(ctx)?;

            if self.token == Token::Multiply {
                self.error(self.loc, DiagnosticCode::GeneratorAccessor)?;
                self.advance(ctx)?;
            }
        }

        let name = self.parse_property_name(ctx, true)?;

        if let Expression::PrivateName(private_name) = name.key.as_ref() {
            if private_name.name == "constructor" {
                self.error(private_name.loc, DiagnosticCode::PrivateNameConstructor)?;
            }
        }

        let is_named = |name_to_match: &str| !name.computed && is_key_named(&name.key, name_to_match);
        let is_constructor = !is_static && is_named("constructor");
        let is_prototype = is_static && is_named("prototype");

        if is_prototype {
            self.error(name.key.loc(), DiagnosticCode::StaticPrototype)?;
        }

        let is_method =
            is_async || is_generator || kind != PropertyKind::Init || self.token == Token::LeftParen;

        if is_method {
            let method_kind = if is_constructor {
                if is_async || is_generator || kind != PropertyKind::Init {
                    self.error(name.key.loc(), DiagnosticCode::SpecialConstructor)?;
                } else if *has_constructor {
                    self.error(name.key.loc(), DiagnosticCode::DuplicateConstructor)?;
                }

                *has_constructor = true;
                ClassMethodKind::Constructor
            } else {
                match kind {
                    PropertyKind::Get => ClassMethodKind::Get,
                    PropertyKind::Set => ClassMethodKind::Set,
                    PropertyKind::Init => ClassMethodKind::Method,
                }
            };

            let allow_super_call = is_constructor && has_super_class;
            let value = self.parse_method(ctx, kind, is_async, is_generator, allow_super_call)?;

            return Ok(ClassElement::Method(ClassMethod {
                loc: self.mark_loc(start_pos),
                key: name.key,
                value,
                kind: method_kind,
                computed: name.computed,
                is_static,
            }));
        }

        // Fields may not be named constructor, whether static or not
        if is_named("constructor") {
            self.error(name.key.loc(), DiagnosticCode::SpecialConstructor)?;
        }

        let value = if self.eat(ctx, Token::Equals)? {
            self.scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
            let labels = std::mem::take(&mut self.labels);

            let value = self.parse_assignment_expression(ctx.enter_class_field());

            self.labels = labels;
            self.scopes.exit_scope();

            Some(value?)
        } else {
            None
        };

        self.expect_semicolon(ctx)?;

        Ok(ClassElement::Property(ClassProperty {
            loc: self.mark_loc(start_pos),
            key: name.key,
            value,
            computed: name.computed,
            is_static,
        }))
    }

    fn parse_static_block(&mut self, ctx: Context, start_pos: Pos) -> ParseResult<ClassElement> {
        let block_ctx = ctx.enter_class_field();
        self.expect(block_ctx, Token::LeftBrace)?;

        self.scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
        let labels = std::mem::take(&mut self.labels);

        let mut body = vec![];
        self.parse_statement_list(
            block_ctx,
            StatementContext::StatementList,
            &Token::RightBrace,
            &mut body,
        )?;

        self.labels = labels;
        self.scopes.exit_scope();

        self.expect(ctx, Token::RightBrace)?;

        Ok(ClassElement::StaticBlock(StaticBlock { loc: self.mark_loc(start_pos), body }))
    }

    /// Module declarations are only allowed at the top level of a module.
    fn check_module_item_position(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
        script_code: DiagnosticCode,
    ) -> ParseResult<()> {
        if !ctx.is_module() {
            self.error(self.loc, script_code)
        } else if stmt_ctx != StatementContext::TopLevelStatementList {
            self.error_unexpected_token()
        } else {
            Ok(())
        }
    }

    fn parse_module_specifier(&mut self, ctx: Context) -> ParseResult<StringLiteral> {
        if let Token::StringLiteral(value) = &self.token {
            let literal = StringLiteral { loc: self.loc, value: value.clone() };
            self.advance(ctx)?;
            return Ok(literal);
        }

        self.error(self.loc, DiagnosticCode::ExpectedString)?;

        Ok(StringLiteral { loc: Loc::new(self.loc.start, self.loc.start), value: String::new() })
    }

    /// An identifier name or a string literal, as used in import and export specifiers.
    fn parse_module_export_name(&mut self, ctx: Context) -> ParseResult<ModuleExportName> {
        if let Token::StringLiteral(value) = &self.token {
            let literal = StringLiteral { loc: self.loc, value: value.clone() };
            self.advance(ctx)?;
            return Ok(ModuleExportName::String(literal));
        }

        match self.parse_identifier_name(ctx)? {
            Some(id) => Ok(ModuleExportName::Id(id)),
            None => {
                self.error_unexpected_token()?;
                Ok(ModuleExportName::Id(self.missing_identifier()))
            }
        }
    }

    fn parse_import_declaration(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.check_module_item_position(ctx, stmt_ctx, DiagnosticCode::ImportInScript)?;
        self.advance(ctx)?;

        let mut specifiers = vec![];

        if !matches!(self.token, Token::StringLiteral(_)) {
            if is_identifier_like(&self.token) {
                let local = self.parse_binding_identifier(ctx, Some(BindingType::CONST))?;
                specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                    loc: local.loc,
                    local,
                }));

                if self.eat(ctx, Token::Comma)? {
                    self.parse_import_named_or_namespace_specifiers(ctx, &mut specifiers)?;
                }
            } else {
                self.parse_import_named_or_namespace_specifiers(ctx, &mut specifiers)?;
            }

            self.expect(ctx, Token::From)?;
        }

        let source = self.parse_module_specifier(ctx)?;
        self.expect_semicolon(ctx)?;

        Ok(Statement::Import(ImportDeclaration {
            loc: self.mark_loc(start_pos),
            specifiers,
            source,
        }))
    }

    fn parse_import_named_or_namespace_specifiers(
        &mut self,
        ctx: Context,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> ParseResult<()> {
        match self.token {
            Token::Multiply => {
                let start_pos = self.loc.start;
                self.advance(ctx)?;
                self.expect(ctx, Token::As)?;
                let local = self.parse_binding_identifier(ctx, Some(BindingType::CONST))?;

                specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                    loc: self.mark_loc(start_pos),
                    local,
                }));
            }
            Token::LeftBrace => {
                self.advance(ctx)?;

                while self.token != Token::RightBrace && self.token != Token::Eof {
                    let specifier = self.parse_import_named_specifier(ctx)?;
                    specifiers.push(ImportSpecifier::Named(specifier));

                    if !self.eat(ctx, Token::Comma)? {
                        break;
                    }
                }

                self.expect(ctx, Token::RightBrace)?;
            }
            _ => self.error_unexpected_token()?,
        }

        Ok(())
    }

    fn parse_import_named_specifier(&mut self, ctx: Context) -> ParseResult<ImportNamedSpecifier> {
        let start_pos = self.loc.start;
        let has_escape = self.lexer.has_escape();
        let imported = self.parse_module_export_name(ctx)?;

        let local = if self.eat(ctx, Token::As)? {
            self.parse_binding_identifier(ctx, Some(BindingType::CONST))?
        } else {
            match &imported {
                // Without `as` the imported name is also the local binding
                ModuleExportName::Id(id) => {
                    let id = id.clone();
                    self.declare_binding_identifier(
                        ctx,
                        &id,
                        has_escape,
                        Some(BindingType::CONST),
                    )?;
                    id
                }
                ModuleExportName::String(_) => {
                    self.expect(ctx, Token::As)?;
                    self.missing_identifier()
                }
            }
        };

        Ok(ImportNamedSpecifier { loc: self.mark_loc(start_pos), imported, local })
    }

    fn add_exported_name(&mut self, name: &str, loc: Loc) -> ParseResult<()> {
        if !self.exported_names.insert(name.to_owned()) {
            self.error_with_arg(loc, DiagnosticCode::DuplicateExport, name)?;
        }

        Ok(())
    }

    fn parse_export_declaration(
        &mut self,
        ctx: Context,
        stmt_ctx: StatementContext,
    ) -> ParseResult<Statement> {
        let start_pos = self.loc.start;
        self.check_module_item_position(ctx, stmt_ctx, DiagnosticCode::ExportInScript)?;
        self.advance(ctx)?;

        match self.token {
            Token::Multiply => {
                self.advance(ctx)?;

                let exported = if self.eat(ctx, Token::As)? {
                    let exported = self.parse_module_export_name(ctx)?;
                    self.add_exported_name(exported.name(), exported.loc())?;
                    Some(exported)
                } else {
                    None
                };

                self.expect(ctx, Token::From)?;
                let source = self.parse_module_specifier(ctx)?;
                self.expect_semicolon(ctx)?;

                Ok(Statement::ExportAll(ExportAllDeclaration {
                    loc: self.mark_loc(start_pos),
                    exported,
                    source,
                }))
            }
            Token::LeftBrace => self.parse_export_specifiers(ctx, start_pos),
            Token::Default => {
                let default_loc = self.loc;
                self.advance(ctx)?;

                let declaration = if self.token == Token::Function
                    || self.is_async_function_start(ctx)
                {
                    ExportDefaultKind::Function(self.parse_function(
                        ctx,
                        FunctionKind::FunctionDeclaration,
                        true,
                    )?)
                } else if self.token == Token::Class {
                    ExportDefaultKind::Class(self.parse_class(ctx, true, true)?)
                } else {
                    let expr = self.parse_assignment_expression(ctx.allow_in())?;
                    self.expect_semicolon(ctx)?;
                    ExportDefaultKind::Expression(expr)
                };

                self.add_exported_name("default", default_loc)?;

                Ok(Statement::ExportDefault(ExportDefaultDeclaration {
                    loc: self.mark_loc(start_pos),
                    declaration,
                }))
            }
            Token::Var | Token::Let | Token::Const | Token::Function | Token::Async | Token::Class => {
                let declaration = self.parse_statement_list_item(ctx, stmt_ctx)?;

                for id in declared_names(&declaration) {
                    self.add_exported_name(&id.name, id.loc)?;
                }

                Ok(Statement::ExportNamed(ExportNamedDeclaration {
                    loc: self.mark_loc(start_pos),
                    declaration: Some(p(declaration)),
                    specifiers: vec![],
                    source: None,
                }))
            }
            _ => {
                self.error_unexpected_token()?;
                self.parse_statement_list_item(ctx, stmt_ctx)
            }
        }
    }

    fn parse_export_specifiers(&mut self, ctx: Context, start_pos: Pos) -> ParseResult<Statement> {
        self.advance(ctx)?;

        let mut specifiers = vec![];
        while self.token != Token::RightBrace && self.token != Token::Eof {
            let specifier_start_pos = self.loc.start;
            let local = self.parse_module_export_name(ctx)?;
            let exported = if self.eat(ctx, Token::As)? {
                self.parse_module_export_name(ctx)?
            } else {
                local.clone()
            };

            specifiers.push(ExportSpecifier {
                loc: self.mark_loc(specifier_start_pos),
                local,
                exported,
            });

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightBrace)?;

        let source = if self.eat(ctx, Token::From)? {
            Some(self.parse_module_specifier(ctx)?)
        } else {
            None
        };

        self.expect_semicolon(ctx)?;

        for specifier in &specifiers {
            self.add_exported_name(specifier.exported.name(), specifier.exported.loc())?;

            // Local names must refer to bindings of this module unless reexported from another
            if source.is_none() {
                match &specifier.local {
                    ModuleExportName::Id(id) => {
                        let is_reserved = Token::keyword_from_str(&id.name)
                            .map_or(false, |keyword| keyword.is_reserved_word());

                        if is_reserved {
                            self.error_with_arg(id.loc, DiagnosticCode::UnexpectedToken, &id.name)?;
                        } else {
                            self.export_references.push((id.name.clone(), id.loc));
                        }
                    }
                    ModuleExportName::String(literal) => {
                        let token = Token::StringLiteral(literal.value.clone()).to_string();
                        self.error_with_arg(literal.loc, DiagnosticCode::UnexpectedToken, &token)?;
                    }
                }
            }
        }

        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            loc: self.mark_loc(start_pos),
            declaration: None,
            specifiers,
            source,
        }))
    }

    fn check_export_references(&mut self) -> ParseResult<()> {
        let top_level = self.scopes.top_level();

        for (name, loc) in std::mem::take(&mut self.export_references) {
            if !self.scopes.has_binding(top_level, &name) {
                self.error_with_arg(loc, DiagnosticCode::NoExpBinding, &name)?;
            }
        }

        Ok(())
    }
}

/// Whether a non-computed property key is the given name, as an identifier or string.
pub(super) fn is_key_named(key: &Expression, name: &str) -> bool {
    match key {
        Expression::Id(id) => id.name == name,
        Expression::String(literal) => literal.value == name,
        _ => false,
    }
}

/// Names bound by a declaration statement.
fn declared_names(stmt: &Statement) -> Vec<Identifier> {
    let mut names = vec![];

    match stmt {
        Statement::VarDecl(decl) => {
            for declarator in &decl.declarations {
                declarator.id.iter_bound_names(&mut |id| names.push(id.clone()));
            }
        }
        Statement::FuncDecl(func) => names.extend(func.id.as_deref().cloned()),
        Statement::ClassDecl(class) => names.extend(class.id.as_deref().cloned()),
        _ => {}
    }

    names
}

/// Parse a source file with the given options. In fail-fast mode the first error is returned as
/// an `Err`, in recovery mode every error is collected in the output's diagnostics.
pub fn parse(source: &Rc<Source>, options: &ParseOptions) -> ParseResult<ParseOutput> {
    debug!(file = %source.file_path, goal = ?options.goal, mode = ?options.mode, "parsing");

    let mut parser = Parser::new(source, options.mode);
    let ctx = Context::initial(options);

    parser.advance(ctx)?;
    let program = parser.parse_program(ctx)?;

    let diagnostics = parser.sink.finish();
    debug!(num_diagnostics = diagnostics.len(), "finished parsing");

    Ok(ParseOutput { program, diagnostics })
}

pub fn parse_script(source: &Rc<Source>) -> ParseResult<ParseOutput> {
    parse(source, &ParseOptions::default())
}

pub fn parse_module(source: &Rc<Source>) -> ParseResult<ParseOutput> {
    parse(source, &ParseOptions::module())
}

/// Parse in recovery mode, which always produces a complete tree.
pub fn recover(source: &Rc<Source>, options: &ParseOptions) -> ParseResult<ParseOutput> {
    let options = options.clone().with_mode(ErrorMode::Recover);
    parse(source, &options)
}
