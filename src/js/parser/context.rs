//! Grammar context threaded through every production.
//!
//! A `Context` is a plain value. Productions derive a new value for the sub-grammar they enter and
//! pass it down, so a nested call can never change the context its caller observes afterwards.

use bitflags::bitflags;

use crate::common::options::{Goal, ParseOptions};

use super::diagnostic::ErrorMode;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Context: u32 {
        /// Strict mode code, from a module goal, a "use strict" directive, or a class body.
        const STRICT = 1 << 0;
        /// Parsing with the module goal.
        const MODULE = 1 << 1;
        /// Inside a formal parameter list, where yield and await expressions are forbidden.
        const IN_PARAMETERS = 1 << 2;
        /// [Await] parameter, await is an operator.
        const IN_ASYNC = 1 << 3;
        /// [Yield] parameter, yield is an operator.
        const IN_GENERATOR = 1 << 4;
        /// Inverse of the [In] parameter, used for the head of a for statement.
        const DISALLOW_IN = 1 << 5;
        /// Parsing the quasis of a tagged template, where malformed escapes are tolerated.
        const TAGGED_TEMPLATE = 1 << 6;
        /// The parse collects diagnostics instead of aborting.
        const RECOVERY = 1 << 7;
        /// Annex B web compatibility semantics are enabled.
        const WEB_COMPAT = 1 << 8;
        /// [Return] parameter, inside a function body.
        const IN_FUNCTION_BODY = 1 << 9;
        /// Inside a loop body, continue is allowed.
        const IN_ITERATION = 1 << 10;
        /// Inside a switch body, an unlabeled break is allowed.
        const IN_SWITCH = 1 << 11;
        /// Inside a block statement rather than directly in a function or script body.
        const IN_BLOCK = 1 << 12;
        const ALLOW_NEW_TARGET = 1 << 13;
        const ALLOW_SUPER_PROPERTY = 1 << 14;
        const ALLOW_SUPER_CALL = 1 << 15;
        /// Inside a class field initializer or static block, where arguments is forbidden.
        const IN_CLASS_FIELD = 1 << 16;

        /// Bits that do not survive entering a new function.
        const FUNCTION_BOUNDARY = Self::IN_PARAMETERS.bits()
            | Self::IN_ASYNC.bits()
            | Self::IN_GENERATOR.bits()
            | Self::DISALLOW_IN.bits()
            | Self::TAGGED_TEMPLATE.bits()
            | Self::IN_FUNCTION_BODY.bits()
            | Self::IN_ITERATION.bits()
            | Self::IN_SWITCH.bits()
            | Self::IN_BLOCK.bits()
            | Self::IN_CLASS_FIELD.bits();

        /// An unlabeled break is allowed when either bit is set.
        const BREAKABLE = Self::IN_ITERATION.bits() | Self::IN_SWITCH.bits();
    }
}

impl Context {
    /// The context a top-level Script or Module production starts with.
    pub fn initial(options: &ParseOptions) -> Context {
        let mut ctx = Context::empty();

        if options.goal == Goal::Module {
            // Module code is strict and allows top-level await
            ctx |= Context::MODULE | Context::STRICT | Context::IN_ASYNC;
        }

        if options.web_compat {
            ctx |= Context::WEB_COMPAT;
        }

        if options.mode == ErrorMode::Recover {
            ctx |= Context::RECOVERY;
        }

        ctx
    }

    #[inline]
    pub fn is_strict(self) -> bool {
        self.contains(Context::STRICT)
    }

    #[inline]
    pub fn is_module(self) -> bool {
        self.contains(Context::MODULE)
    }

    #[inline]
    pub fn in_async(self) -> bool {
        self.contains(Context::IN_ASYNC)
    }

    #[inline]
    pub fn in_generator(self) -> bool {
        self.contains(Context::IN_GENERATOR)
    }

    #[inline]
    pub fn in_parameters(self) -> bool {
        self.contains(Context::IN_PARAMETERS)
    }

    #[inline]
    pub fn allows_in(self) -> bool {
        !self.contains(Context::DISALLOW_IN)
    }

    #[inline]
    pub fn is_tagged_template(self) -> bool {
        self.contains(Context::TAGGED_TEMPLATE)
    }

    #[inline]
    pub fn is_recovery(self) -> bool {
        self.contains(Context::RECOVERY)
    }

    /// Annex B semantics apply only to sloppy mode code with web compatibility enabled.
    #[inline]
    pub fn has_web_compat(self) -> bool {
        self.contains(Context::WEB_COMPAT) && !self.is_strict()
    }

    #[inline]
    pub fn strict(self) -> Context {
        self | Context::STRICT
    }

    #[inline]
    pub fn allow_in(self) -> Context {
        self - Context::DISALLOW_IN
    }

    #[inline]
    pub fn disallow_in(self) -> Context {
        self | Context::DISALLOW_IN
    }

    #[inline]
    pub fn with_in(self, allow_in: bool) -> Context {
        if allow_in {
            self.allow_in()
        } else {
            self.disallow_in()
        }
    }

    #[inline]
    pub fn tagged_template(self, is_tagged: bool) -> Context {
        self.and(Context::TAGGED_TEMPLATE, is_tagged)
    }

    #[inline]
    pub fn with_async(self, is_async: bool) -> Context {
        self.and(Context::IN_ASYNC, is_async)
    }

    #[inline]
    pub fn with_generator(self, is_generator: bool) -> Context {
        self.and(Context::IN_GENERATOR, is_generator)
    }

    /// Context for the parameters and body of a non-arrow function.
    pub fn enter_function(self, is_async: bool, is_generator: bool) -> Context {
        let ctx = self
            - Context::FUNCTION_BOUNDARY
            - Context::ALLOW_SUPER_PROPERTY
            - Context::ALLOW_SUPER_CALL;

        ctx.with_async(is_async).with_generator(is_generator) | Context::ALLOW_NEW_TARGET
    }

    /// Context for a method. Methods may reference super properties, and class constructors of
    /// derived classes may call super.
    pub fn enter_method(
        self,
        is_async: bool,
        is_generator: bool,
        allow_super_call: bool,
    ) -> Context {
        self.enter_function(is_async, is_generator)
            .and(Context::ALLOW_SUPER_CALL, allow_super_call)
            | Context::ALLOW_SUPER_PROPERTY
    }

    /// Arrow functions inherit new.target, super, and the enclosing strictness, but not yield or
    /// the statement level bits.
    pub fn enter_arrow(self, is_async: bool) -> Context {
        let inherited = self
            & (Context::STRICT
                | Context::MODULE
                | Context::RECOVERY
                | Context::WEB_COMPAT
                | Context::ALLOW_NEW_TARGET
                | Context::ALLOW_SUPER_PROPERTY
                | Context::ALLOW_SUPER_CALL
                | Context::IN_CLASS_FIELD);

        inherited.with_async(is_async)
    }

    #[inline]
    pub fn enter_parameters(self) -> Context {
        (self | Context::IN_PARAMETERS).allow_in()
    }

    #[inline]
    pub fn enter_function_body(self) -> Context {
        (self - Context::IN_PARAMETERS - Context::DISALLOW_IN) | Context::IN_FUNCTION_BODY
    }

    #[inline]
    pub fn enter_iteration(self) -> Context {
        self | Context::IN_ITERATION
    }

    #[inline]
    pub fn enter_switch(self) -> Context {
        self | Context::IN_SWITCH
    }

    #[inline]
    pub fn enter_block(self) -> Context {
        self | Context::IN_BLOCK
    }

    /// Class bodies are always strict.
    #[inline]
    pub fn enter_class_body(self) -> Context {
        self.strict().allow_in() - Context::TAGGED_TEMPLATE
    }

    /// Field initializers and static blocks behave like the body of a method without parameters.
    pub fn enter_class_field(self) -> Context {
        (self.enter_method(false, false, false) | Context::IN_CLASS_FIELD).allow_in()
    }

    #[inline]
    fn and(self, flag: Context, set: bool) -> Context {
        if set {
            self | flag
        } else {
            self - flag
        }
    }
}

/// Where a statement appears, which determines whether declarations are allowed in its place.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StatementContext {
    /// A statement list of a block, function body, or case clause.
    StatementList,
    /// The statement list at the top level of a script or module.
    TopLevelStatementList,
    If,
    Label,
    Iteration,
    With,
}

impl StatementContext {
    pub fn is_single_statement(self) -> bool {
        !matches!(self, Self::StatementList | Self::TopLevelStatementList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::options::ParseOptions;

    #[test]
    fn initial_context_from_options() {
        let script = Context::initial(&ParseOptions::default());
        assert!(!script.is_strict());
        assert!(script.contains(Context::WEB_COMPAT));
        assert!(!script.is_recovery());

        let module = Context::initial(&ParseOptions::module());
        assert!(module.is_strict());
        assert!(module.is_module());
        assert!(module.in_async());
    }

    #[test]
    fn nested_context_does_not_leak_to_caller() {
        let outer = Context::empty().disallow_in().enter_iteration();
        let inner = outer.enter_function(true, false);

        assert!(inner.allows_in());
        assert!(inner.in_async());
        assert!(!inner.contains(Context::IN_ITERATION));
        assert!(inner.contains(Context::ALLOW_NEW_TARGET));

        // The caller's value is untouched
        assert!(!outer.allows_in());
        assert!(outer.contains(Context::IN_ITERATION));
        assert!(!outer.in_async());
    }

    #[test]
    fn arrows_keep_enclosing_function_bits() {
        let method = Context::empty().enter_method(false, true, false);
        let arrow = method.enter_arrow(false);

        assert!(arrow.contains(Context::ALLOW_SUPER_PROPERTY));
        assert!(arrow.contains(Context::ALLOW_NEW_TARGET));
        assert!(!arrow.in_generator());
    }

    #[test]
    fn web_compat_requires_sloppy_mode() {
        let ctx = Context::WEB_COMPAT;
        assert!(ctx.has_web_compat());
        assert!(!ctx.strict().has_web_compat());
    }

    #[test]
    fn parameters_and_body() {
        let params = Context::empty().disallow_in().enter_parameters();
        assert!(params.in_parameters());
        assert!(params.allows_in());

        let body = params.enter_function_body();
        assert!(!body.in_parameters());
        assert!(body.contains(Context::IN_FUNCTION_BODY));
    }
}
