//! Scope tracking for early errors.
//!
//! Scopes form a tree mirroring the syntactic nesting of the program. They are stored in an arena
//! and refer to their parent by index. Each scope maps the names declared in it to the kind of
//! declaration, which is enough to detect conflicting redeclarations as soon as the second
//! declaration is seen.

use bitflags::bitflags;
use hashbrown::HashMap;

use super::context::Context;
use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::loc::Loc;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScopeKind: u16 {
        const TOP_LEVEL = 1 << 0;
        /// The scope that holds a function's parameters, and is the target of var declarations.
        const FUNCTION_ROOT = 1 << 1;
        /// The top level statement list of a function body.
        const FUNCTION_BODY = 1 << 2;
        const ARROW_PARAMS = 1 << 3;
        const BLOCK = 1 << 4;
        /// The scope holding a catch clause parameter.
        const CATCH_HEAD = 1 << 5;
        /// The block of a catch clause.
        const CATCH_BLOCK = 1 << 6;
        const SWITCH = 1 << 7;
        /// The head of a for statement with lexical declarations.
        const FOR_HEAD = 1 << 8;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BindingType: u16 {
        const VAR = 1 << 0;
        const LET = 1 << 1;
        const CONST = 1 << 2;
        /// A function declared in a block or at the top level of a module.
        const FUNCTION_LEXICAL = 1 << 3;
        const CATCH_IDENTIFIER = 1 << 4;
        const CATCH_PATTERN = 1 << 5;
        const ARGUMENT_LIST = 1 << 6;
        /// A name that never conflicts, such as the name of a function expression.
        const EMPTY = 1 << 7;
        /// Marks a var declaration in the head of a for-of statement, which may never redeclare
        /// a catch parameter.
        const FOR_OF_VAR = 1 << 8;

        const LEXICAL = Self::LET.bits() | Self::CONST.bits() | Self::FUNCTION_LEXICAL.bits();
        const CATCH = Self::CATCH_IDENTIFIER.bits() | Self::CATCH_PATTERN.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeId(usize);

/// An error staged on a scope whose validity depends on syntax seen after the declaration, such
/// as duplicate parameters which are only an error for some functions.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredError {
    pub code: DiagnosticCode,
    pub loc: Loc,
    pub name: String,
}

impl DeferredError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::with_arg(self.code, self.loc, &self.name)
    }
}

pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    bindings: HashMap<String, BindingType>,
    deferred_error: Option<DeferredError>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Scope {
        Scope { kind, parent, bindings: HashMap::new(), deferred_error: None }
    }

    pub fn get_binding(&self, name: &str) -> Option<BindingType> {
        self.bindings.get(name).copied()
    }
}

pub struct ScopeTracker {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeTracker {
    /// Create a tracker whose current scope is the top level scope of a script or module.
    pub fn new() -> ScopeTracker {
        let top_level = Scope::new(ScopeKind::TOP_LEVEL | ScopeKind::FUNCTION_ROOT, None);

        ScopeTracker { scopes: vec![top_level], current: ScopeId(0) }
    }

    pub fn top_level(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(kind, Some(self.current)));
        self.current = id;

        id
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    /// Whether a name is declared in the given scope.
    pub fn has_binding(&self, scope: ScopeId, name: &str) -> bool {
        match self.scopes[scope.0].get_binding(name) {
            Some(binding_type) => !binding_type.contains(BindingType::EMPTY),
            None => false,
        }
    }

    /// Remove the deferred error staged on a scope, if any.
    pub fn take_deferred_error(&mut self, scope: ScopeId) -> Option<DeferredError> {
        self.scopes[scope.0].deferred_error.take()
    }

    /// Register a declared name in the current scope, returning the conflict it causes if any.
    pub fn add_var_or_block(
        &mut self,
        ctx: Context,
        name: &str,
        binding_type: BindingType,
        loc: Loc,
    ) -> Option<Diagnostic> {
        if binding_type.contains(BindingType::VAR) {
            self.add_var_name(ctx, name, binding_type, loc)
        } else {
            self.add_block_name(ctx, name, binding_type, loc)
        }
    }

    /// Var declarations are visible in every scope up to the enclosing function, so they conflict
    /// with lexical declarations in any of those scopes.
    pub fn add_var_name(
        &mut self,
        ctx: Context,
        name: &str,
        binding_type: BindingType,
        loc: Loc,
    ) -> Option<Diagnostic> {
        let mut conflict = None;
        let mut scope_id = Some(self.current);

        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0];

            if let Some(existing) = scope.get_binding(name) {
                if existing.intersects(BindingType::LEXICAL) {
                    conflict.get_or_insert(DiagnosticCode::DupLexBind);
                } else if existing.intersects(BindingType::CATCH)
                    && (ctx.is_strict()
                        || !ctx.contains(Context::WEB_COMPAT)
                        || existing.contains(BindingType::CATCH_PATTERN)
                        || binding_type.contains(BindingType::FOR_OF_VAR))
                {
                    conflict.get_or_insert(DiagnosticCode::BoundClause);
                }
            }

            let is_function_root = scope.kind.contains(ScopeKind::FUNCTION_ROOT);
            let parent = scope.parent;
            let is_catch_parameter = scope
                .get_binding(name)
                .map_or(false, |existing| existing.intersects(BindingType::CATCH));

            // A catch parameter stays a catch parameter for later redeclarations
            if !is_catch_parameter {
                self.scopes[id.0].bindings.insert(name.to_owned(), binding_type);
            }

            if is_function_root {
                break;
            }

            scope_id = parent;
        }

        conflict.map(|code| Diagnostic::with_arg(code, loc, name))
    }

    /// Lexical declarations, parameters, and catch parameters are only visible in the current
    /// scope.
    pub fn add_block_name(
        &mut self,
        ctx: Context,
        name: &str,
        binding_type: BindingType,
        loc: Loc,
    ) -> Option<Diagnostic> {
        let current = self.current;
        let scope = &self.scopes[current.0];
        let mut conflict = None;

        match scope.get_binding(name) {
            Some(existing) if !existing.contains(BindingType::EMPTY) => {
                if binding_type.contains(BindingType::ARGUMENT_LIST) {
                    // Duplicate parameters are only an error for some functions
                    if scope.deferred_error.is_none() {
                        let error = DeferredError {
                            code: DiagnosticCode::DuplicateIdentifier,
                            loc,
                            name: name.to_owned(),
                        };
                        self.scopes[current.0].deferred_error = Some(error);
                    }
                } else if existing.contains(BindingType::FUNCTION_LEXICAL)
                    && binding_type.contains(BindingType::FUNCTION_LEXICAL)
                    && ctx.has_web_compat()
                    && scope.kind.intersects(ScopeKind::BLOCK | ScopeKind::SWITCH)
                {
                    // Annex B allows sloppy mode functions in blocks to be redeclared
                } else if existing.intersects(BindingType::LEXICAL)
                    || binding_type.intersects(BindingType::LEXICAL)
                {
                    conflict = Some(DiagnosticCode::DupLexBind);
                } else {
                    conflict = Some(DiagnosticCode::DupBind);
                }
            }
            _ => {}
        }

        let scope = &self.scopes[current.0];
        if conflict.is_none() {
            if let Some(parent) = scope.parent {
                let parent_binding = self.scopes[parent.0].get_binding(name);

                if scope.kind.contains(ScopeKind::FUNCTION_BODY) {
                    // Lexical declarations in the body may not shadow a parameter
                    if matches!(parent_binding, Some(t) if t.contains(BindingType::ARGUMENT_LIST)) {
                        conflict = Some(DiagnosticCode::DupBind);
                    }
                } else if scope.kind.contains(ScopeKind::CATCH_BLOCK) {
                    if matches!(parent_binding, Some(t) if t.intersects(BindingType::CATCH)) {
                        conflict = Some(DiagnosticCode::ShadowClause);
                    }
                }
            }
        }

        self.scopes[current.0].bindings.insert(name.to_owned(), binding_type);

        conflict.map(|code| Diagnostic::with_arg(code, loc, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::options::ParseOptions;

    fn sloppy() -> Context {
        Context::initial(&ParseOptions::default())
    }

    fn code(diagnostic: Option<Diagnostic>) -> Option<DiagnosticCode> {
        diagnostic.map(|diagnostic| diagnostic.code)
    }

    const LOC: Loc = Loc { start: 0, end: 1 };

    #[test]
    fn duplicate_lexical_in_block() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::BLOCK);

        assert_eq!(scopes.add_var_or_block(sloppy(), "x", BindingType::LET, LOC), None);
        let conflict = scopes.add_var_or_block(sloppy(), "x", BindingType::LET, LOC);
        assert_eq!(conflict.as_ref().map(|d| d.code), Some(DiagnosticCode::DupLexBind));
        assert_eq!(conflict.and_then(|d| d.arg), Some("x".to_owned()));
    }

    #[test]
    fn var_conflicts_with_enclosing_lexical() {
        let mut scopes = ScopeTracker::new();
        scopes.add_var_or_block(sloppy(), "x", BindingType::LET, LOC);
        scopes.enter_scope(ScopeKind::BLOCK);

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "x", BindingType::VAR, LOC)),
            Some(DiagnosticCode::DupLexBind)
        );

        // Vars never conflict with each other
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "y", BindingType::VAR, LOC)), None);
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "y", BindingType::VAR, LOC)), None);
    }

    #[test]
    fn var_is_hoisted_into_enclosing_scopes() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::BLOCK);
        scopes.enter_scope(ScopeKind::BLOCK);
        scopes.add_var_or_block(sloppy(), "x", BindingType::VAR, LOC);
        scopes.exit_scope();

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "x", BindingType::LET, LOC)),
            Some(DiagnosticCode::DupLexBind)
        );
        assert!(scopes.has_binding(scopes.top_level(), "x"));
    }

    #[test]
    fn for_head_lexical_conflicts_with_body_var() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::FOR_HEAD);
        scopes.add_var_or_block(sloppy(), "x", BindingType::LET, LOC);
        scopes.enter_scope(ScopeKind::BLOCK);

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "x", BindingType::VAR, LOC)),
            Some(DiagnosticCode::DupLexBind)
        );
    }

    #[test]
    fn catch_parameter_conflicts() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::CATCH_HEAD);
        scopes.add_var_or_block(sloppy(), "e", BindingType::CATCH_IDENTIFIER, LOC);
        scopes.enter_scope(ScopeKind::BLOCK | ScopeKind::CATCH_BLOCK);

        // Allowed by Annex B in sloppy mode
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "e", BindingType::VAR, LOC)), None);
        assert_eq!(
            code(scopes.add_var_or_block(sloppy().strict(), "e", BindingType::VAR, LOC)),
            Some(DiagnosticCode::BoundClause)
        );
        let for_of_var = BindingType::VAR | BindingType::FOR_OF_VAR;
        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "e", for_of_var, LOC)),
            Some(DiagnosticCode::BoundClause)
        );

        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::CATCH_HEAD);
        scopes.add_var_or_block(sloppy(), "e", BindingType::CATCH_IDENTIFIER, LOC);
        scopes.enter_scope(ScopeKind::BLOCK | ScopeKind::CATCH_BLOCK);

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "e", BindingType::LET, LOC)),
            Some(DiagnosticCode::ShadowClause)
        );
    }

    #[test]
    fn catch_pattern_always_conflicts_with_var() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::CATCH_HEAD);
        scopes.add_var_or_block(sloppy(), "e", BindingType::CATCH_PATTERN, LOC);
        scopes.enter_scope(ScopeKind::BLOCK | ScopeKind::CATCH_BLOCK);

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "e", BindingType::VAR, LOC)),
            Some(DiagnosticCode::BoundClause)
        );
    }

    #[test]
    fn duplicate_parameters_are_deferred() {
        let mut scopes = ScopeTracker::new();
        let root = scopes.enter_scope(ScopeKind::FUNCTION_ROOT);

        assert_eq!(scopes.add_var_or_block(sloppy(), "a", BindingType::ARGUMENT_LIST, LOC), None);
        assert_eq!(scopes.add_var_or_block(sloppy(), "a", BindingType::ARGUMENT_LIST, LOC), None);

        let error = scopes.take_deferred_error(root);
        assert_eq!(error.map(|e| e.code), Some(DiagnosticCode::DuplicateIdentifier));
        assert_eq!(scopes.take_deferred_error(root), None);
    }

    #[test]
    fn body_lexical_shadows_parameter() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
        scopes.add_var_or_block(sloppy(), "a", BindingType::ARGUMENT_LIST, LOC);
        scopes.enter_scope(ScopeKind::FUNCTION_BODY);

        assert_eq!(
            code(scopes.add_var_or_block(sloppy(), "a", BindingType::LET, LOC)),
            Some(DiagnosticCode::DupBind)
        );
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "b", BindingType::VAR, LOC)), None);
    }

    #[test]
    fn function_expression_name_never_conflicts() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::FUNCTION_ROOT);
        scopes.add_var_or_block(sloppy(), "f", BindingType::EMPTY, LOC);
        scopes.enter_scope(ScopeKind::FUNCTION_BODY);

        assert_eq!(code(scopes.add_var_or_block(sloppy(), "f", BindingType::LET, LOC)), None);
    }

    #[test]
    fn sloppy_block_functions_may_be_redeclared() {
        let mut scopes = ScopeTracker::new();
        scopes.enter_scope(ScopeKind::BLOCK);

        let ty = BindingType::FUNCTION_LEXICAL;
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "f", ty, LOC)), None);
        assert_eq!(code(scopes.add_var_or_block(sloppy(), "f", ty, LOC)), None);
        assert_eq!(
            code(scopes.add_var_or_block(sloppy().strict(), "f", ty, LOC)),
            Some(DiagnosticCode::DupLexBind)
        );
    }
}
