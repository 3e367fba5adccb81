use super::ast::*;
use super::context::Context;
use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::loc::{Loc, Pos};
use super::parse_error::ParseResult;
use super::parser::{is_eval_or_arguments, is_identifier_like, Parser};
use super::scope::{BindingType, ScopeId, ScopeKind};
use super::token::Token;

use tracing::trace;

/// Binding power of operators, from strongest to weakest.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
    PostfixUpdate = 0,
    Unary = 1,
    Exponentiation = 2,
    Multiplication = 3,
    Addition = 4,
    Shift = 5,
    Relational = 6,
    Equality = 7,
    BitwiseAnd = 8,
    BitwiseXor = 9,
    BitwiseOr = 10,
    LogicalAnd = 11,
    LogicalOr = 12,
    NullishCoalesce = 13,
    Conditional = 14,
}

impl Precedence {
    fn is_weaker_than(self, other: Precedence) -> bool {
        self > other
    }
}

#[derive(Clone, Copy)]
enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
    PostfixUpdate(UpdateOperator),
}

/// A property key along with how it was written.
pub(super) struct PropertyName {
    pub key: P<Expression>,
    pub computed: bool,
    /// Whether an identifier key contained an escape sequence
    pub has_escape: bool,
}

fn is_unparenthesized_and_or(expr: &Expression) -> bool {
    match expr {
        Expression::Logical(logical) => {
            logical.operator != LogicalOperator::NullishCoalesce && !logical.is_parenthesized
        }
        _ => false,
    }
}

/// Delimiters that must be balanced when scanning ahead.
#[derive(Clone, Copy)]
pub(super) enum Delimiter {
    Paren,
    Bracket,
    Brace,
    /// A `${` in a template, closed by a `}` that resumes the template
    Substitution,
}

/// Whether a `/` after this token is a division rather than the start of a regular expression.
fn ends_operand(token: &Token) -> bool {
    match token {
        Token::Identifier(_)
        | Token::NumberLiteral(_)
        | Token::BigIntLiteral(_)
        | Token::StringLiteral(_)
        | Token::RegexpLiteral { .. }
        | Token::PrivateName(_)
        | Token::This
        | Token::Super
        | Token::Null
        | Token::True
        | Token::False
        | Token::RightParen
        | Token::RightBracket
        | Token::RightBrace
        | Token::Increment
        | Token::Decrement => true,
        Token::TemplatePart(part) => part.is_tail,
        Token::Await | Token::Yield => false,
        token => token.is_contextual_keyword(),
    }
}

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let expr = self.parse_assignment_expression(ctx)?;
        self.parse_sequence_expression_rest(ctx, start_pos, expr)
    }

    /// Continue a sequence expression if a comma follows its first expression.
    pub(super) fn parse_sequence_expression_rest(
        &mut self,
        ctx: Context,
        start_pos: Pos,
        first: P<Expression>,
    ) -> ParseResult<P<Expression>> {
        if self.token != Token::Comma {
            return Ok(first);
        }

        let mut expressions = vec![*first];
        while self.eat(ctx, Token::Comma)? {
            expressions.push(*self.parse_assignment_expression(ctx)?);
        }

        Ok(p(Expression::Sequence(SequenceExpression {
            loc: self.mark_loc(start_pos),
            expressions,
        })))
    }

    /// Parse an assignment expression that must be a valid expression, not only the cover of a
    /// pattern.
    pub(super) fn parse_assignment_expression(
        &mut self,
        ctx: Context,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let expr = self.parse_assignment_expression_cover(ctx)?;
        self.report_cover_errors(start_pos)?;

        Ok(expr)
    }

    /// Report the errors that were waiting on a possible reparse of the expressions starting at
    /// or after the given position.
    pub(super) fn report_cover_errors(&mut self, start_pos: Pos) -> ParseResult<()> {
        if self.cover_errors.is_empty() {
            return Ok(());
        }

        let (pending, waiting): (Vec<Diagnostic>, Vec<Diagnostic>) =
            std::mem::take(&mut self.cover_errors)
                .into_iter()
                .partition(|diagnostic| diagnostic.loc.start >= start_pos);
        self.cover_errors = waiting;

        for diagnostic in pending {
            self.report(diagnostic)?;
        }

        Ok(())
    }

    /// Parse an assignment expression which may later be reparsed as a pattern, e.g. an element
    /// of an array literal.
    pub(super) fn parse_assignment_expression_cover(
        &mut self,
        ctx: Context,
    ) -> ParseResult<P<Expression>> {
        if self.token == Token::Yield && ctx.in_generator() {
            return self.parse_yield_expression(ctx);
        }

        if self.token == Token::LeftParen {
            return self.parse_possible_arrow_function(ctx, false);
        }

        if self.token == Token::Async {
            let (next_token, is_new_line_before) = self.peek_with_new_line(ctx);
            if next_token == Token::LeftParen && !is_new_line_before {
                return self.parse_possible_arrow_function(ctx, true);
            }

            if self.is_async_arrow_with_identifier(ctx) {
                return self.parse_arrow_function_with_identifier(ctx, true);
            }
        }

        if is_identifier_like(&self.token) && self.peek(ctx) == Token::Arrow {
            return self.parse_arrow_function_with_identifier(ctx, false);
        }

        self.parse_non_arrow_assignment_expression(ctx)
    }

    /// Whether the current `async` token starts an arrow function with a single identifier
    /// parameter, as in `async x => x`.
    fn is_async_arrow_with_identifier(&mut self, ctx: Context) -> bool {
        let save_state = self.lexer.save();

        let (token, _) = self.lexer.next(ctx);
        let is_identifier = is_identifier_like(&token) && !self.lexer.is_new_line_before_current();
        let is_arrow = is_identifier && self.lexer.next(ctx).0 == Token::Arrow;

        self.lexer.restore(&save_state);

        is_arrow
    }

    /// A parenthesized expression or call of `async` may instead be the parameters of an arrow
    /// function. Which one is decided up front by scanning for a `=>` after the matching `)`, so
    /// the source is only parsed once.
    fn parse_possible_arrow_function(
        &mut self,
        ctx: Context,
        is_async: bool,
    ) -> ParseResult<P<Expression>> {
        let is_arrow = self.is_arrow_function_head(ctx, is_async);
        trace!(line = self.lexer.line(), start = self.loc.start, is_arrow, "scanned arrow head");

        if !is_arrow {
            let expr = self.parse_non_arrow_assignment_expression(ctx)?;

            if self.token == Token::Arrow {
                self.error(self.loc, DiagnosticCode::UnexpectedArrow)?;
            }

            return Ok(expr);
        }

        let start_pos = self.loc.start;
        let (root_scope, params) = self.parse_arrow_function_head(ctx, is_async)?;
        self.parse_arrow_function_body(ctx, start_pos, root_scope, params, is_async)
    }

    /// Whether the parenthesized list at the current `(`, or after the current `async`, is
    /// followed by `=>`. Only tokens are scanned, the lexer is rewound afterwards.
    fn is_arrow_function_head(&mut self, ctx: Context, is_async: bool) -> bool {
        let save_state = self.lexer.save();
        let is_arrow = self.scan_to_arrow(ctx, is_async);
        self.lexer.restore(&save_state);

        is_arrow
    }

    fn scan_to_arrow(&mut self, ctx: Context, is_async: bool) -> bool {
        if is_async && self.lexer.next(ctx).0 != Token::LeftParen {
            return false;
        }

        self.skip_delimited(ctx, Delimiter::Paren) && self.lexer.next(ctx).0 == Token::Arrow
    }

    /// Advance the lexer past the closer matching an opening delimiter that was just lexed.
    /// Returns false if the source ends or a closer does not match.
    pub(super) fn skip_delimited(&mut self, ctx: Context, opening: Delimiter) -> bool {
        let mut delimiters = vec![opening];
        let mut prev_token = Token::LeftParen;

        while !delimiters.is_empty() {
            let (token, loc) = self.lexer.next(ctx);

            // A `/` where an operand is expected starts a regular expression, which may contain
            // unbalanced delimiters
            let token = match token {
                Token::Divide | Token::DivideEq if !ends_operand(&prev_token) => {
                    self.lexer.next_regexp_literal(loc.start).0
                }
                token => token,
            };

            match &token {
                Token::Eof => return false,
                Token::LeftParen => delimiters.push(Delimiter::Paren),
                Token::LeftBracket => delimiters.push(Delimiter::Bracket),
                Token::LeftBrace => delimiters.push(Delimiter::Brace),
                Token::TemplatePart(part) if !part.is_tail => {
                    delimiters.push(Delimiter::Substitution)
                }
                Token::RightParen | Token::RightBracket | Token::RightBrace => {
                    match (delimiters.pop(), &token) {
                        (Some(Delimiter::Substitution), Token::RightBrace) => {
                            // The template continues after the substitution
                            let (part, _) = self.lexer.next_template_part();
                            if matches!(&part, Token::TemplatePart(part) if !part.is_tail) {
                                delimiters.push(Delimiter::Substitution);
                            }

                            prev_token = part;
                            continue;
                        }
                        (Some(Delimiter::Paren), Token::RightParen)
                        | (Some(Delimiter::Bracket), Token::RightBracket)
                        | (Some(Delimiter::Brace), Token::RightBrace) => {}
                        _ => return false,
                    }
                }
                _ => {}
            }

            prev_token = token;
        }

        true
    }

    fn enter_arrow_parameters(&mut self, ctx: Context, is_async: bool) -> (ScopeId, Context) {
        let root_scope = self
            .scopes
            .enter_scope(ScopeKind::FUNCTION_ROOT | ScopeKind::ARROW_PARAMS);
        let params_ctx = ctx.enter_parameters();
        let params_ctx = if is_async {
            params_ctx.with_async(true)
        } else {
            params_ctx
        };

        (root_scope, params_ctx)
    }

    fn expect_arrow(&mut self, ctx: Context) -> ParseResult<()> {
        if self.token == Token::Arrow && self.lexer.is_new_line_before_current() {
            self.error(self.loc, DiagnosticCode::ArrowOnNewLine)?;
        }

        self.expect(ctx, Token::Arrow)
    }

    /// Parse a parenthesized parameter list and the following `=>`. The parameter scope is left
    /// open for the body.
    fn parse_arrow_function_head(
        &mut self,
        ctx: Context,
        is_async: bool,
    ) -> ParseResult<(ScopeId, Vec<FunctionParam>)> {
        if is_async {
            self.advance(ctx)?;
        }

        let (root_scope, params_ctx) = self.enter_arrow_parameters(ctx, is_async);
        let params = self.parse_formal_parameters(params_ctx)?;
        self.expect_arrow(ctx)?;

        Ok((root_scope, params))
    }

    fn parse_arrow_function_with_identifier(
        &mut self,
        ctx: Context,
        is_async: bool,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        if is_async {
            self.advance(ctx)?;
        }

        let (root_scope, params_ctx) = self.enter_arrow_parameters(ctx, is_async);
        let id = self.parse_binding_identifier(params_ctx, Some(BindingType::ARGUMENT_LIST))?;
        let params = vec![FunctionParam::Pattern(Pattern::Id(id))];
        self.expect_arrow(ctx)?;

        self.parse_arrow_function_body(ctx, start_pos, root_scope, params, is_async)
    }

    fn parse_arrow_function_body(
        &mut self,
        ctx: Context,
        start_pos: Pos,
        root_scope: ScopeId,
        params: Vec<FunctionParam>,
        is_async: bool,
    ) -> ParseResult<P<Expression>> {
        let body_ctx = ctx.enter_arrow(is_async);
        let labels = std::mem::take(&mut self.labels);

        let (body, is_strict) = if self.token == Token::LeftBrace {
            let (body, use_strict_loc) = self.parse_function_block_body(ctx, body_ctx, &params)?;
            if use_strict_loc.is_some() && !body_ctx.is_strict() {
                self.check_names_made_strict(None, &params)?;
            }

            (FunctionBody::Block(body), body_ctx.is_strict() || use_strict_loc.is_some())
        } else {
            // Whether `in` is allowed carries over into a concise body
            let body = self.parse_assignment_expression(body_ctx.with_in(ctx.allows_in()))?;
            (FunctionBody::Expression(*body), body_ctx.is_strict())
        };

        self.labels = labels;
        self.scopes.exit_scope();

        // Arrow functions never allow duplicate parameters
        self.resolve_duplicate_parameters(root_scope, true)?;

        Ok(p(Expression::ArrowFunction(p(Function {
            kind: FunctionKind::ArrowFunctionExpression,
            loc: self.mark_loc(start_pos),
            id: None,
            params,
            body: p(body),
            is_async,
            is_generator: false,
            is_strict,
        }))))
    }

    fn parse_non_arrow_assignment_expression(
        &mut self,
        ctx: Context,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let expr = self.parse_conditional_expression(ctx)?;

        let operator = match self.token {
            Token::Equals => AssignmentOperator::Equals,
            Token::AddEq => AssignmentOperator::Add,
            Token::SubtractEq => AssignmentOperator::Subtract,
            Token::MultiplyEq => AssignmentOperator::Multiply,
            Token::DivideEq => AssignmentOperator::Divide,
            Token::RemainderEq => AssignmentOperator::Remainder,
            Token::ExponentEq => AssignmentOperator::Exponent,
            Token::AndEq => AssignmentOperator::And,
            Token::OrEq => AssignmentOperator::Or,
            Token::XorEq => AssignmentOperator::Xor,
            Token::ShiftLeftEq => AssignmentOperator::ShiftLeft,
            Token::ShiftRightArithmeticEq => AssignmentOperator::ShiftRightArithmetic,
            Token::ShiftRightLogicalEq => AssignmentOperator::ShiftRightLogical,
            Token::LogicalAndEq => AssignmentOperator::LogicalAnd,
            Token::LogicalOrEq => AssignmentOperator::LogicalOr,
            Token::NullishCoalesceEq => AssignmentOperator::NullishCoalesce,
            _ => return Ok(expr),
        };

        // Only plain assignment can destructure
        let left = if operator == AssignmentOperator::Equals {
            self.reparse_as_assignment_target(ctx, *expr, DiagnosticCode::InvalidLHS)?
        } else {
            self.reparse_as_simple_assignment_target(ctx, *expr, DiagnosticCode::InvalidLHS)?
        };

        self.advance(ctx)?;
        let right = self.parse_assignment_expression(ctx)?;

        Ok(p(Expression::Assign(AssignmentExpression {
            loc: self.mark_loc(start_pos),
            operator,
            left: p(left),
            right,
            is_parenthesized: false,
        })))
    }

    fn parse_yield_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;

        if ctx.in_parameters() {
            self.error(self.loc, DiagnosticCode::YieldInParameter)?;
        }

        self.advance(ctx)?;

        let has_argument = !self.lexer.is_new_line_before_current()
            && !matches!(
                self.token,
                Token::Semicolon
                    | Token::RightBrace
                    | Token::RightParen
                    | Token::RightBracket
                    | Token::Comma
                    | Token::Colon
                    | Token::In
                    | Token::Of
                    | Token::Eof
            );

        let mut delegate = false;
        let argument = if has_argument {
            delegate = self.eat(ctx, Token::Multiply)?;
            Some(self.parse_assignment_expression(ctx)?)
        } else {
            None
        };

        Ok(p(Expression::Yield(YieldExpression {
            loc: self.mark_loc(start_pos),
            argument,
            delegate,
        })))
    }

    fn parse_conditional_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let test = self.parse_expression_with_precedence(ctx, Precedence::Conditional)?;

        if self.token != Token::Question {
            return Ok(test);
        }

        self.advance(ctx)?;
        let consequent = self.parse_assignment_expression(ctx.allow_in())?;
        self.expect(ctx, Token::Colon)?;
        let alternate = self.parse_assignment_expression(ctx)?;

        Ok(p(Expression::Conditional(ConditionalExpression {
            loc: self.mark_loc(start_pos),
            test,
            consequent,
            alternate,
        })))
    }

    fn infix_operator(&self, ctx: Context) -> Option<(InfixOperator, Precedence)> {
        use InfixOperator::{Binary, Logical, PostfixUpdate};

        let operator = match self.token {
            Token::Plus => (Binary(BinaryOperator::Add), Precedence::Addition),
            Token::Minus => (Binary(BinaryOperator::Subtract), Precedence::Addition),
            Token::Multiply => (Binary(BinaryOperator::Multiply), Precedence::Multiplication),
            Token::Divide => (Binary(BinaryOperator::Divide), Precedence::Multiplication),
            Token::Remainder => (Binary(BinaryOperator::Remainder), Precedence::Multiplication),
            Token::Exponent => (Binary(BinaryOperator::Exponent), Precedence::Exponentiation),
            Token::EqEq => (Binary(BinaryOperator::EqEq), Precedence::Equality),
            Token::NotEq => (Binary(BinaryOperator::NotEq), Precedence::Equality),
            Token::EqEqEq => (Binary(BinaryOperator::EqEqEq), Precedence::Equality),
            Token::NotEqEq => (Binary(BinaryOperator::NotEqEq), Precedence::Equality),
            Token::LessThan => (Binary(BinaryOperator::LessThan), Precedence::Relational),
            Token::LessThanOrEqual => {
                (Binary(BinaryOperator::LessThanOrEqual), Precedence::Relational)
            }
            Token::GreaterThan => (Binary(BinaryOperator::GreaterThan), Precedence::Relational),
            Token::GreaterThanOrEqual => {
                (Binary(BinaryOperator::GreaterThanOrEqual), Precedence::Relational)
            }
            Token::InstanceOf => (Binary(BinaryOperator::InstanceOf), Precedence::Relational),
            Token::In if ctx.allows_in() => (Binary(BinaryOperator::In), Precedence::Relational),
            Token::BitwiseAnd => (Binary(BinaryOperator::And), Precedence::BitwiseAnd),
            Token::BitwiseOr => (Binary(BinaryOperator::Or), Precedence::BitwiseOr),
            Token::BitwiseXor => (Binary(BinaryOperator::Xor), Precedence::BitwiseXor),
            Token::ShiftLeft => (Binary(BinaryOperator::ShiftLeft), Precedence::Shift),
            Token::ShiftRightArithmetic => {
                (Binary(BinaryOperator::ShiftRightArithmetic), Precedence::Shift)
            }
            Token::ShiftRightLogical => {
                (Binary(BinaryOperator::ShiftRightLogical), Precedence::Shift)
            }
            Token::LogicalAnd => (Logical(LogicalOperator::And), Precedence::LogicalAnd),
            Token::LogicalOr => (Logical(LogicalOperator::Or), Precedence::LogicalOr),
            Token::NullishCoalesce => {
                (Logical(LogicalOperator::NullishCoalesce), Precedence::NullishCoalesce)
            }
            // Postfix operators must be on the same line as their operand
            Token::Increment if !self.lexer.is_new_line_before_current() => {
                (PostfixUpdate(UpdateOperator::Increment), Precedence::PostfixUpdate)
            }
            Token::Decrement if !self.lexer.is_new_line_before_current() => {
                (PostfixUpdate(UpdateOperator::Decrement), Precedence::PostfixUpdate)
            }
            _ => return None,
        };

        Some(operator)
    }

    /// Parse an expression containing only operators that bind tighter than the given precedence.
    fn parse_expression_with_precedence(
        &mut self,
        ctx: Context,
        precedence: Precedence,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let mut expr = self.parse_expression_prefix(ctx, precedence)?;

        loop {
            let (operator, operator_precedence) = match self.infix_operator(ctx) {
                Some(operator) if precedence.is_weaker_than(operator.1) => operator,
                _ => return Ok(expr),
            };

            expr = match operator {
                InfixOperator::Binary(operator) => {
                    self.advance(ctx)?;

                    // Exponentiation is right associative
                    let right_precedence = if operator == BinaryOperator::Exponent {
                        Precedence::Multiplication
                    } else {
                        operator_precedence
                    };

                    let right = self.parse_expression_with_precedence(ctx, right_precedence)?;

                    p(Expression::Binary(BinaryExpression {
                        loc: self.mark_loc(start_pos),
                        operator,
                        left: expr,
                        right,
                    }))
                }
                InfixOperator::Logical(operator) => {
                    self.parse_logical_expression(ctx, expr, start_pos, operator, operator_precedence)?
                }
                InfixOperator::PostfixUpdate(operator) => {
                    let argument =
                        self.check_update_target(ctx, expr, DiagnosticCode::LHSPostOp)?;
                    self.advance(ctx)?;

                    p(Expression::Update(UpdateExpression {
                        loc: self.mark_loc(start_pos),
                        operator,
                        argument,
                        prefix: false,
                    }))
                }
            };
        }
    }

    fn parse_logical_expression(
        &mut self,
        ctx: Context,
        left: P<Expression>,
        start_pos: Pos,
        operator: LogicalOperator,
        precedence: Precedence,
    ) -> ParseResult<P<Expression>> {
        self.advance(ctx)?;
        let right = self.parse_expression_with_precedence(ctx, precedence)?;
        let loc = self.mark_loc(start_pos);

        // `??` cannot be mixed with an unparenthesized `||` or `&&` on either side
        if operator == LogicalOperator::NullishCoalesce
            && (is_unparenthesized_and_or(&left) || is_unparenthesized_and_or(&right))
        {
            self.error(loc, DiagnosticCode::InvalidCoalescing)?;
        }

        Ok(p(Expression::Logical(LogicalExpression {
            loc,
            operator,
            left,
            right,
            is_parenthesized: false,
        })))
    }

    fn parse_expression_prefix(
        &mut self,
        ctx: Context,
        precedence: Precedence,
    ) -> ParseResult<P<Expression>> {
        // Nested expressions below this point are delimited, so they always allow `in`
        let prefix_ctx = ctx.allow_in();

        match self.token {
            Token::Plus => self.parse_unary_expression(prefix_ctx, UnaryOperator::Plus),
            Token::Minus => self.parse_unary_expression(prefix_ctx, UnaryOperator::Minus),
            Token::LogicalNot => self.parse_unary_expression(prefix_ctx, UnaryOperator::LogicalNot),
            Token::BitwiseNot => self.parse_unary_expression(prefix_ctx, UnaryOperator::BitwiseNot),
            Token::Typeof => self.parse_unary_expression(prefix_ctx, UnaryOperator::TypeOf),
            Token::Void => self.parse_unary_expression(prefix_ctx, UnaryOperator::Void),
            Token::Delete => self.parse_unary_expression(prefix_ctx, UnaryOperator::Delete),
            Token::Increment => {
                self.parse_update_expression_prefix(prefix_ctx, UpdateOperator::Increment)
            }
            Token::Decrement => {
                self.parse_update_expression_prefix(prefix_ctx, UpdateOperator::Decrement)
            }
            Token::Await if ctx.in_async() => self.parse_await_expression(prefix_ctx),
            Token::PrivateName(_) => self.parse_private_name_in_left(ctx, precedence),
            _ => self.parse_left_hand_side_expression(prefix_ctx),
        }
    }

    /// Private names can only appear on their own as the left side of an `in` expression.
    fn parse_private_name_in_left(
        &mut self,
        ctx: Context,
        precedence: Precedence,
    ) -> ParseResult<P<Expression>> {
        let private_name = match &self.token {
            Token::PrivateName(name) => PrivateName { loc: self.loc, name: name.clone() },
            _ => return self.parse_left_hand_side_expression(ctx.allow_in()),
        };

        self.advance(ctx)?;

        let is_in_left = self.token == Token::In
            && ctx.allows_in()
            && precedence.is_weaker_than(Precedence::Relational);

        if !is_in_left {
            let name = format!("#{}", private_name.name);
            self.error_with_arg(private_name.loc, DiagnosticCode::UnexpectedToken, &name)?;
        }

        Ok(p(Expression::PrivateName(private_name)))
    }

    /// The operand of `**` cannot be a unary expression, as in `-x ** 2`.
    fn check_exponent_operand(&mut self, loc: Loc) -> ParseResult<()> {
        if self.token == Token::Exponent {
            self.error(loc, DiagnosticCode::InvalidExponentation)?;
        }

        Ok(())
    }

    fn parse_unary_expression(
        &mut self,
        ctx: Context,
        operator: UnaryOperator,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let argument = self.parse_expression_with_precedence(ctx, Precedence::Unary)?;
        let loc = self.mark_loc(start_pos);

        if operator == UnaryOperator::Delete
            && ctx.is_strict()
            && matches!(*argument, Expression::Id(_))
        {
            self.error(loc, DiagnosticCode::StrictDelete)?;
        }

        self.check_exponent_operand(loc)?;

        Ok(p(Expression::Unary(UnaryExpression { loc, operator, argument })))
    }

    fn parse_update_expression_prefix(
        &mut self,
        ctx: Context,
        operator: UpdateOperator,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let argument = self.parse_expression_with_precedence(ctx, Precedence::Unary)?;
        let argument = self.check_update_target(ctx, argument, DiagnosticCode::LHSPreOp)?;

        Ok(p(Expression::Update(UpdateExpression {
            loc: self.mark_loc(start_pos),
            operator,
            argument,
            prefix: true,
        })))
    }

    fn check_update_target(
        &mut self,
        ctx: Context,
        argument: P<Expression>,
        code: DiagnosticCode,
    ) -> ParseResult<P<Expression>> {
        match argument.as_ref() {
            Expression::Id(id) => {
                if ctx.is_strict() && is_eval_or_arguments(&id.name) {
                    self.error_with_arg(id.loc, DiagnosticCode::StrictEvalArguments, &id.name)?;
                }
            }
            Expression::Member(_) | Expression::SuperMember(_) => {}
            _ => self.error(argument.loc(), code)?,
        }

        Ok(argument)
    }

    fn parse_await_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;

        if ctx.in_parameters() {
            self.error(self.loc, DiagnosticCode::AwaitInParameter)?;
        }

        self.advance(ctx)?;

        let argument = self.parse_expression_with_precedence(ctx, Precedence::Unary)?;
        let loc = self.mark_loc(start_pos);

        self.check_exponent_operand(loc)?;

        Ok(p(Expression::Await(AwaitExpression { loc, argument })))
    }

    pub(super) fn parse_left_hand_side_expression(
        &mut self,
        ctx: Context,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let expr = match self.token {
            Token::New => self.parse_new_expression(ctx)?,
            Token::Super => self.parse_super_expression(ctx, true)?,
            Token::Import => self.parse_import_expression(ctx)?,
            _ => self.parse_primary_expression(ctx)?,
        };

        self.parse_call_expression_rest(ctx, start_pos, expr, true)
    }

    /// Parse the member accesses, calls, and tagged templates following an expression. Calls are
    /// not allowed in the callee of a `new` expression.
    fn parse_call_expression_rest(
        &mut self,
        ctx: Context,
        start_pos: Pos,
        mut expr: P<Expression>,
        allow_call: bool,
    ) -> ParseResult<P<Expression>> {
        let mut in_optional_chain = false;

        loop {
            expr = match self.token {
                Token::Period => {
                    self.advance(ctx)?;
                    let property = self.parse_member_property(ctx)?;
                    self.member_expression(start_pos, expr, property, false, false)
                }
                Token::LeftBracket => {
                    self.advance(ctx)?;
                    let property = self.parse_expression(ctx.allow_in())?;
                    self.expect(ctx, Token::RightBracket)?;
                    self.member_expression(start_pos, expr, property, true, false)
                }
                Token::LeftParen if allow_call => {
                    let arguments = self.parse_call_arguments(ctx)?;
                    p(Expression::Call(CallExpression {
                        loc: self.mark_loc(start_pos),
                        callee: expr,
                        arguments,
                        optional: false,
                    }))
                }
                Token::TemplatePart(_) => {
                    if in_optional_chain {
                        self.error(self.loc, DiagnosticCode::ChainNoTemplate)?;
                    }

                    let quasi = self.parse_template_literal(ctx.tagged_template(true))?;
                    p(Expression::TaggedTemplate(TaggedTemplateExpression {
                        loc: self.mark_loc(start_pos),
                        tag: expr,
                        quasi: p(quasi),
                    }))
                }
                Token::QuestionDot => {
                    if !allow_call {
                        self.error(self.loc, DiagnosticCode::OptionalChainingNoNew)?;
                    }

                    in_optional_chain = true;
                    self.advance(ctx)?;

                    match self.token {
                        Token::LeftParen => {
                            let arguments = self.parse_call_arguments(ctx)?;
                            p(Expression::Call(CallExpression {
                                loc: self.mark_loc(start_pos),
                                callee: expr,
                                arguments,
                                optional: true,
                            }))
                        }
                        Token::LeftBracket => {
                            self.advance(ctx)?;
                            let property = self.parse_expression(ctx.allow_in())?;
                            self.expect(ctx, Token::RightBracket)?;
                            self.member_expression(start_pos, expr, property, true, true)
                        }
                        Token::TemplatePart(_) => {
                            self.error(self.loc, DiagnosticCode::ChainNoTemplate)?;
                            let quasi = self.parse_template_literal(ctx.tagged_template(true))?;
                            p(Expression::TaggedTemplate(TaggedTemplateExpression {
                                loc: self.mark_loc(start_pos),
                                tag: expr,
                                quasi: p(quasi),
                            }))
                        }
                        _ => {
                            let property = self.parse_member_property(ctx)?;
                            self.member_expression(start_pos, expr, property, false, true)
                        }
                    }
                }
                _ => break,
            };
        }

        if in_optional_chain {
            expr = p(Expression::Chain(ChainExpression {
                loc: self.mark_loc(start_pos),
                expression: expr,
            }));
        }

        Ok(expr)
    }

    fn member_expression(
        &self,
        start_pos: Pos,
        object: P<Expression>,
        property: P<Expression>,
        computed: bool,
        optional: bool,
    ) -> P<Expression> {
        p(Expression::Member(MemberExpression {
            loc: self.mark_loc(start_pos),
            object,
            property,
            computed,
            optional,
        }))
    }

    /// The property after a `.` is any identifier name or a private name.
    fn parse_member_property(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        if let Token::PrivateName(name) = &self.token {
            let private_name = PrivateName { loc: self.loc, name: name.clone() };
            self.advance(ctx)?;
            return Ok(p(Expression::PrivateName(private_name)));
        }

        match self.parse_identifier_name(ctx)? {
            Some(id) => Ok(p(Expression::Id(id))),
            None => {
                self.error_unexpected_token()?;
                Ok(p(self.invalid_expression_at_current()))
            }
        }
    }

    pub(super) fn parse_call_arguments(&mut self, ctx: Context) -> ParseResult<Vec<CallArgument>> {
        let ctx = ctx.allow_in();
        self.expect(ctx, Token::LeftParen)?;

        let mut arguments = vec![];
        while self.token != Token::RightParen && self.token != Token::Eof {
            if self.token == Token::Spread {
                let spread = self.parse_spread_element(ctx)?;
                self.report_cover_errors(spread.loc.start)?;
                arguments.push(CallArgument::Spread(spread));
            } else {
                arguments.push(CallArgument::Expression(*self.parse_assignment_expression(ctx)?));
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightParen)?;

        Ok(arguments)
    }

    fn parse_spread_element(&mut self, ctx: Context) -> ParseResult<SpreadElement> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        let argument = self.parse_assignment_expression_cover(ctx.allow_in())?;

        Ok(SpreadElement {
            loc: self.mark_loc(start_pos),
            argument,
            has_trailing_comma: self.token == Token::Comma,
        })
    }

    fn parse_new_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        if self.eat(ctx, Token::Period)? {
            return self.parse_new_target(ctx, start_pos);
        }

        let callee_start_pos = self.loc.start;
        let callee = match self.token {
            Token::New => self.parse_new_expression(ctx)?,
            Token::Super => self.parse_super_expression(ctx, false)?,
            Token::Import => {
                self.error_unexpected_token()?;
                self.parse_import_expression(ctx)?
            }
            _ => self.parse_primary_expression(ctx)?,
        };

        let callee = self.parse_call_expression_rest(ctx, callee_start_pos, callee, false)?;

        let arguments = if self.token == Token::LeftParen {
            self.parse_call_arguments(ctx)?
        } else {
            vec![]
        };

        Ok(p(Expression::New(NewExpression {
            loc: self.mark_loc(start_pos),
            callee,
            arguments,
        })))
    }

    fn parse_new_target(&mut self, ctx: Context, start_pos: Pos) -> ParseResult<P<Expression>> {
        let is_target = match &self.token {
            Token::Identifier(name) => name == "target" && !self.lexer.has_escape(),
            _ => false,
        };

        if !is_target {
            let name = self.token.to_string();
            self.error_with_arg(self.loc, DiagnosticCode::InvalidNewTarget, &name)?;
            return Ok(p(self.invalid_expression_at_current()));
        }

        self.advance(ctx)?;
        let loc = self.mark_loc(start_pos);

        if !ctx.contains(Context::ALLOW_NEW_TARGET) {
            self.error_with_arg(loc, DiagnosticCode::UnexpectedToken, "new.target")?;
        }

        Ok(p(Expression::MetaProperty(MetaProperty { loc, kind: MetaPropertyKind::NewTarget })))
    }

    fn parse_super_expression(
        &mut self,
        ctx: Context,
        allow_call: bool,
    ) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let super_loc = self.loc;
        self.advance(ctx)?;

        match self.token {
            Token::Period | Token::LeftBracket => {
                if !ctx.contains(Context::ALLOW_SUPER_PROPERTY) {
                    self.error(super_loc, DiagnosticCode::InvalidSuperProperty)?;
                }

                let computed = self.token == Token::LeftBracket;
                self.advance(ctx)?;

                let property = if computed {
                    let property = self.parse_expression(ctx.allow_in())?;
                    self.expect(ctx, Token::RightBracket)?;
                    property
                } else {
                    match self.parse_identifier_name(ctx)? {
                        Some(id) => p(Expression::Id(id)),
                        None => {
                            self.error_unexpected_token()?;
                            p(self.invalid_expression_at_current())
                        }
                    }
                };

                Ok(p(Expression::SuperMember(SuperMemberExpression {
                    loc: self.mark_loc(start_pos),
                    property,
                    computed,
                })))
            }
            Token::LeftParen if allow_call => {
                if !ctx.contains(Context::ALLOW_SUPER_CALL) {
                    self.error(super_loc, DiagnosticCode::InvalidSuperCall)?;
                }

                let arguments = self.parse_call_arguments(ctx)?;

                Ok(p(Expression::SuperCall(SuperCallExpression {
                    loc: self.mark_loc(start_pos),
                    arguments,
                })))
            }
            _ => {
                self.error(super_loc, DiagnosticCode::NoSuper)?;
                Ok(p(Expression::Invalid(InvalidExpression { loc: super_loc })))
            }
        }
    }

    /// Dynamic `import(...)` and `import.meta`.
    fn parse_import_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        self.advance(ctx)?;

        if self.eat(ctx, Token::Period)? {
            let is_meta = match &self.token {
                Token::Identifier(name) => name == "meta" && !self.lexer.has_escape(),
                _ => false,
            };

            if !is_meta {
                self.error_unexpected_token()?;
                return Ok(p(self.invalid_expression_at_current()));
            }

            self.advance(ctx)?;
            let loc = self.mark_loc(start_pos);

            if !ctx.is_module() {
                self.error(loc, DiagnosticCode::InvalidImportMeta)?;
            }

            return Ok(p(Expression::MetaProperty(MetaProperty {
                loc,
                kind: MetaPropertyKind::ImportMeta,
            })));
        }

        if self.token != Token::LeftParen {
            self.error_unexpected_token()?;
            return Ok(p(self.invalid_expression_at_current()));
        }

        self.advance(ctx)?;
        let source = self.parse_assignment_expression(ctx.allow_in())?;
        self.eat(ctx, Token::Comma)?;
        self.expect(ctx, Token::RightParen)?;

        Ok(p(Expression::Import(ImportExpression { loc: self.mark_loc(start_pos), source })))
    }

    fn invalid_expression_at_current(&self) -> Expression {
        Expression::Invalid(InvalidExpression { loc: Loc::new(self.loc.start, self.loc.start) })
    }

    fn parse_primary_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let loc = self.loc;

        let expr = match &self.token {
            Token::This => {
                self.advance(ctx)?;
                Expression::This(ThisExpression { loc })
            }
            Token::Null => {
                self.advance(ctx)?;
                Expression::Null(NullLiteral { loc })
            }
            Token::True | Token::False => {
                let value = self.token == Token::True;
                self.advance(ctx)?;
                Expression::Boolean(BooleanLiteral { loc, value })
            }
            Token::NumberLiteral(value) => {
                let value = *value;
                self.advance(ctx)?;
                Expression::Number(NumberLiteral { loc, value })
            }
            Token::StringLiteral(value) => {
                let value = value.clone();
                self.advance(ctx)?;
                Expression::String(StringLiteral { loc, value })
            }
            Token::BigIntLiteral(value) => {
                let value = value.clone();
                self.advance(ctx)?;
                Expression::BigInt(BigIntLiteral { loc, value })
            }
            Token::Divide | Token::DivideEq => return self.parse_regexp_literal(ctx),
            Token::TemplatePart(_) => {
                Expression::Template(self.parse_template_literal(ctx.tagged_template(false))?)
            }
            Token::LeftParen => return self.parse_parenthesized_expression(ctx),
            Token::LeftBracket => return self.parse_array_expression(ctx),
            Token::LeftBrace => return self.parse_object_expression(ctx),
            Token::Function => Expression::Function(self.parse_function(
                ctx,
                FunctionKind::FunctionExpression,
                true,
            )?),
            Token::Class => Expression::Class(self.parse_class(ctx, false, true)?),
            Token::Async => {
                if self.is_async_function_start(ctx) {
                    Expression::Function(self.parse_function(
                        ctx,
                        FunctionKind::FunctionExpression,
                        true,
                    )?)
                } else {
                    Expression::Id(self.parse_identifier_reference(ctx)?)
                }
            }
            token if is_identifier_like(token) => {
                Expression::Id(self.parse_identifier_reference(ctx)?)
            }
            _ => return self.parse_invalid_expression(ctx),
        };

        Ok(p(expr))
    }

    /// Report a token that cannot start an expression. Tokens that close an enclosing construct
    /// are left in place, anything else is skipped.
    fn parse_invalid_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let loc = self.loc;

        match self.token {
            Token::Eof => {
                self.error(loc, DiagnosticCode::UnexpectedEOF)?;
                Ok(p(self.invalid_expression_at_current()))
            }
            Token::RightParen
            | Token::RightBracket
            | Token::RightBrace
            | Token::Semicolon
            | Token::Comma
            | Token::Colon => {
                self.error(loc, DiagnosticCode::ExpectedExpression)?;
                Ok(p(self.invalid_expression_at_current()))
            }
            _ => {
                self.error_unexpected_token()?;
                self.skip_token(ctx)?;
                Ok(p(Expression::Invalid(InvalidExpression { loc })))
            }
        }
    }

    fn parse_regexp_literal(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        self.relex_as_regexp_literal()?;

        let loc = self.loc;
        let expr = match &self.token {
            Token::RegexpLiteral { raw, pattern, flags } => Expression::RegExp(RegExpLiteral {
                loc,
                raw: raw.clone(),
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            _ => Expression::Invalid(InvalidExpression { loc }),
        };

        self.advance(ctx)?;

        Ok(p(expr))
    }

    /// Parse a template literal starting at its head. Malformed escapes are only errors when the
    /// template is not tagged.
    fn parse_template_literal(&mut self, ctx: Context) -> ParseResult<TemplateLiteral> {
        let start_pos = self.loc.start;
        let is_tagged = ctx.is_tagged_template();
        let expression_ctx = ctx.tagged_template(false).allow_in();

        let mut quasis = vec![];
        let mut expressions = vec![];

        while let Token::TemplatePart(part) = &self.token {
            let part = part.clone();

            if !is_tagged {
                if let Some((loc, code)) = part.bad_escape {
                    self.error(loc, code)?;
                }
            }

            quasis.push(TemplateElement { loc: self.loc, raw: part.raw, cooked: part.cooked });
            self.advance(expression_ctx)?;

            if part.is_tail {
                break;
            }

            expressions.push(*self.parse_expression(expression_ctx)?);

            if self.token != Token::RightBrace {
                self.expect(expression_ctx, Token::RightBrace)?;
                break;
            }

            self.relex_as_template_part()?;
        }

        Ok(TemplateLiteral { loc: self.mark_loc(start_pos), quasis, expressions })
    }

    fn parse_parenthesized_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        self.advance(ctx)?;
        let mut expr = self.parse_expression(ctx.allow_in())?;
        self.expect(ctx, Token::RightParen)?;

        // Parenthesized literals and assignments can no longer be reparsed as patterns
        match expr.as_mut() {
            Expression::Assign(assign) => assign.is_parenthesized = true,
            Expression::Object(object) => object.is_parenthesized = true,
            Expression::Array(array) => array.is_parenthesized = true,
            Expression::Logical(logical) => logical.is_parenthesized = true,
            _ => {}
        }

        Ok(expr)
    }

    fn parse_array_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let ctx = ctx.allow_in();
        self.advance(ctx)?;

        let mut elements = vec![];
        while self.token != Token::RightBracket && self.token != Token::Eof {
            match self.token {
                Token::Comma => {
                    self.advance(ctx)?;
                    elements.push(ArrayElement::Hole);
                    continue;
                }
                Token::Spread => elements.push(ArrayElement::Spread(self.parse_spread_element(ctx)?)),
                _ => {
                    let element = self.parse_assignment_expression_cover(ctx)?;
                    elements.push(ArrayElement::Expression(*element));
                }
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightBracket)?;

        Ok(p(Expression::Array(ArrayExpression {
            loc: self.mark_loc(start_pos),
            elements,
            is_parenthesized: false,
        })))
    }

    fn parse_object_expression(&mut self, ctx: Context) -> ParseResult<P<Expression>> {
        let start_pos = self.loc.start;
        let ctx = ctx.allow_in();
        self.advance(ctx)?;

        let mut properties = vec![];
        let mut has_proto = false;

        while self.token != Token::RightBrace && self.token != Token::Eof {
            if self.token == Token::Spread {
                properties.push(ObjectProperty::Spread(self.parse_spread_element(ctx)?));
            } else {
                let property = self.parse_object_property(ctx)?;

                // Duplicate `__proto__` is only an error in expressions, not patterns
                let is_proto = property.kind == PropertyKind::Init
                    && !property.computed
                    && !property.shorthand
                    && !property.method
                    && super::parser::is_key_named(&property.key, "__proto__");

                if is_proto {
                    if has_proto {
                        let diagnostic =
                            Diagnostic::new(DiagnosticCode::DuplicateProto, property.key.loc());
                        self.cover_errors.push(diagnostic);
                    }

                    has_proto = true;
                }

                properties.push(ObjectProperty::Property(property));
            }

            if !self.eat(ctx, Token::Comma)? {
                break;
            }
        }

        self.expect(ctx, Token::RightBrace)?;

        Ok(p(Expression::Object(ObjectExpression {
            loc: self.mark_loc(start_pos),
            properties,
            is_parenthesized: false,
        })))
    }

    /// Whether an `async`, `get`, or `set` token in an object literal is a modifier rather than
    /// the property name.
    fn is_property_modifier(&mut self, ctx: Context) -> bool {
        let (next_token, is_new_line_before) = self.peek_with_new_line(ctx);

        if matches!(
            next_token,
            Token::LeftParen
                | Token::Comma
                | Token::RightBrace
                | Token::Colon
                | Token::Equals
                | Token::Eof
        ) {
            return false;
        }

        !(self.token == Token::Async && is_new_line_before)
    }

    fn parse_object_property(&mut self, ctx: Context) -> ParseResult<Property> {
        let start_pos = self.loc.start;

        let mut is_async = false;
        let mut kind = PropertyKind::Init;

        if matches!(self.token, Token::Async | Token::Get | Token::Set)
            && self.is_property_modifier(ctx)
        {
            match self.token {
                Token::Async => is_async = true,
                Token::Get => kind = PropertyKind::Get,
                _ => kind = PropertyKind::Set,
            }

            self.advance(ctx)?;
        }

        let mut is_generator = false;
        if self.token == Token::Multiply {
            if kind == PropertyKind::Init {
                is_generator = true;
            } else {
                self.error(self.loc, DiagnosticCode::GeneratorAccessor)?;
            }

            self.advance(ctx)?;
        }

        let name = self.parse_property_name(ctx, false)?;

        // Methods and accessors
        if is_async || is_generator || kind != PropertyKind::Init || self.token == Token::LeftParen
        {
            let value = self.parse_method(ctx, kind, is_async, is_generator, false)?;

            return Ok(Property {
                loc: self.mark_loc(start_pos),
                key: name.key,
                value: p(Expression::Function(value)),
                kind,
                computed: name.computed,
                method: kind == PropertyKind::Init,
                shorthand: false,
                shorthand_init: None,
            });
        }

        if self.eat(ctx, Token::Colon)? {
            let value = self.parse_assignment_expression_cover(ctx)?;

            return Ok(Property {
                loc: self.mark_loc(start_pos),
                key: name.key,
                value,
                kind,
                computed: name.computed,
                method: false,
                shorthand: false,
                shorthand_init: None,
            });
        }

        // Shorthand properties like `{ a }`, and `{ a = 1 }` which is only valid in a pattern
        if let (false, Expression::Id(id)) = (name.computed, name.key.as_ref()) {
            if matches!(self.token, Token::Comma | Token::RightBrace | Token::Equals) {
                let id = id.clone();
                self.check_identifier(ctx, &id, name.has_escape)?;

                let shorthand_init = if self.eat(ctx, Token::Equals)? {
                    let init = self.parse_assignment_expression(ctx)?;
                    let loc = self.mark_loc(start_pos);
                    self.cover_errors.push(Diagnostic::new(DiagnosticCode::ObjCoverInit, loc));

                    Some(init)
                } else {
                    None
                };

                return Ok(Property {
                    loc: self.mark_loc(start_pos),
                    key: name.key,
                    value: p(Expression::Id(id)),
                    kind,
                    computed: false,
                    method: false,
                    shorthand: true,
                    shorthand_init,
                });
            }
        }

        self.error_unexpected_token()?;

        Ok(Property {
            loc: self.mark_loc(start_pos),
            key: name.key,
            value: p(self.invalid_expression_at_current()),
            kind,
            computed: name.computed,
            method: false,
            shorthand: false,
            shorthand_init: None,
        })
    }

    /// Parse the key of a property in an object literal, object pattern, or class body.
    pub(super) fn parse_property_name(
        &mut self,
        ctx: Context,
        allow_private: bool,
    ) -> ParseResult<PropertyName> {
        let loc = self.loc;
        let has_escape = self.lexer.has_escape();

        let key = match &self.token {
            Token::LeftBracket => {
                self.advance(ctx)?;
                let key = self.parse_assignment_expression(ctx.allow_in())?;
                self.expect(ctx, Token::RightBracket)?;

                return Ok(PropertyName { key, computed: true, has_escape: false });
            }
            Token::StringLiteral(value) => {
                Expression::String(StringLiteral { loc, value: value.clone() })
            }
            Token::NumberLiteral(value) => Expression::Number(NumberLiteral { loc, value: *value }),
            Token::BigIntLiteral(value) => {
                Expression::BigInt(BigIntLiteral { loc, value: value.clone() })
            }
            Token::PrivateName(name) if allow_private => {
                Expression::PrivateName(PrivateName { loc, name: name.clone() })
            }
            Token::Identifier(name) => Expression::Id(Identifier::new(loc, name.clone())),
            token if token.is_identifier_name() => {
                Expression::Id(Identifier::new(loc, token.to_string()))
            }
            _ => {
                self.error_unexpected_token()?;
                let key = p(self.invalid_expression_at_current());
                return Ok(PropertyName { key, computed: false, has_escape: false });
            }
        };

        self.advance(ctx)?;

        Ok(PropertyName { key: p(key), computed: false, has_escape })
    }

    /// Reparse an expression as the target of an assignment or for-in/of head, converting object
    /// and array literals into patterns.
    pub(super) fn reparse_as_assignment_target(
        &mut self,
        ctx: Context,
        expr: Expression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        let loc = expr.loc();
        let pattern = self.expression_to_pattern(ctx, expr, code)?;

        // Errors that only apply to expressions are resolved now that this is a pattern
        self.cover_errors
            .retain(|diagnostic| diagnostic.loc.start < loc.start || diagnostic.loc.end > loc.end);

        Ok(pattern)
    }

    /// Identifiers and member expressions are the only targets of compound assignment.
    fn reparse_as_simple_assignment_target(
        &mut self,
        ctx: Context,
        expr: Expression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        match expr {
            Expression::Id(id) => {
                if ctx.is_strict() && is_eval_or_arguments(&id.name) {
                    self.error_with_arg(id.loc, DiagnosticCode::StrictEvalArguments, &id.name)?;
                }

                Ok(Pattern::Id(id))
            }
            Expression::Member(member) => Ok(Pattern::Member(member)),
            Expression::SuperMember(member) => Ok(Pattern::SuperMember(member)),
            expr => {
                let loc = expr.loc();
                self.error(loc, code)?;
                Ok(Pattern::Invalid(InvalidPattern { loc }))
            }
        }
    }

    fn expression_to_pattern(
        &mut self,
        ctx: Context,
        expr: Expression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        match expr {
            Expression::Object(object) if !object.is_parenthesized => {
                self.object_to_pattern(ctx, object, code)
            }
            Expression::Array(array) if !array.is_parenthesized => {
                self.array_to_pattern(ctx, array, code)
            }
            expr => self.reparse_as_simple_assignment_target(ctx, expr, code),
        }
    }

    /// Elements of patterns may have a default value, written as an assignment.
    fn element_to_pattern(
        &mut self,
        ctx: Context,
        expr: Expression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        match expr {
            Expression::Assign(assign)
                if assign.operator == AssignmentOperator::Equals && !assign.is_parenthesized =>
            {
                Ok(Pattern::Assign(AssignmentPattern {
                    loc: assign.loc,
                    left: assign.left,
                    right: assign.right,
                }))
            }
            expr => self.expression_to_pattern(ctx, expr, code),
        }
    }

    fn spread_to_rest_element(
        &mut self,
        ctx: Context,
        spread: SpreadElement,
        is_last: bool,
        allow_patterns: bool,
        code: DiagnosticCode,
    ) -> ParseResult<RestElement> {
        if !is_last {
            self.error(spread.loc, DiagnosticCode::RestNotLast)?;
        } else if spread.has_trailing_comma {
            self.error(spread.loc, DiagnosticCode::RestTrailing)?;
        }

        let argument = match *spread.argument {
            Expression::Assign(assign) if !assign.is_parenthesized => {
                self.error(assign.loc, DiagnosticCode::RestInit)?;
                Pattern::Invalid(InvalidPattern { loc: assign.loc })
            }
            argument if allow_patterns => self.expression_to_pattern(ctx, argument, code)?,
            argument => self.reparse_as_simple_assignment_target(ctx, argument, code)?,
        };

        Ok(RestElement { loc: spread.loc, argument: p(argument) })
    }

    fn array_to_pattern(
        &mut self,
        ctx: Context,
        array: ArrayExpression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        let num_elements = array.elements.len();
        let mut elements = vec![];

        for (i, element) in array.elements.into_iter().enumerate() {
            let element = match element {
                ArrayElement::Hole => ArrayPatternElement::Hole,
                ArrayElement::Expression(expr) => {
                    ArrayPatternElement::Pattern(self.element_to_pattern(ctx, expr, code)?)
                }
                ArrayElement::Spread(spread) => {
                    let is_last = i + 1 == num_elements;
                    let rest = self.spread_to_rest_element(ctx, spread, is_last, true, code)?;
                    ArrayPatternElement::Rest(rest)
                }
            };

            elements.push(element);
        }

        Ok(Pattern::Array(ArrayPattern { loc: array.loc, elements }))
    }

    fn object_to_pattern(
        &mut self,
        ctx: Context,
        object: ObjectExpression,
        code: DiagnosticCode,
    ) -> ParseResult<Pattern> {
        let num_properties = object.properties.len();
        let mut properties = vec![];

        for (i, property) in object.properties.into_iter().enumerate() {
            match property {
                ObjectProperty::Property(property) => {
                    let value = if property.method || property.kind != PropertyKind::Init {
                        self.error(property.loc, code)?;
                        Pattern::Invalid(InvalidPattern { loc: property.value.loc() })
                    } else if property.shorthand {
                        let left =
                            self.reparse_as_simple_assignment_target(ctx, *property.value, code)?;

                        match property.shorthand_init {
                            Some(init) => Pattern::Assign(AssignmentPattern {
                                loc: property.loc,
                                left: p(left),
                                right: init,
                            }),
                            None => left,
                        }
                    } else {
                        self.element_to_pattern(ctx, *property.value, code)?
                    };

                    properties.push(ObjectPatternProperty::Property(PatternProperty {
                        loc: property.loc,
                        key: property.key,
                        value: p(value),
                        computed: property.computed,
                        shorthand: property.shorthand,
                    }));
                }
                ObjectProperty::Spread(spread) => {
                    let is_last = i + 1 == num_properties;
                    let rest = self.spread_to_rest_element(ctx, spread, is_last, false, code)?;
                    properties.push(ObjectPatternProperty::Rest(rest));
                }
            }
        }

        Ok(Pattern::Object(ObjectPattern { loc: object.loc, properties }))
    }
}
