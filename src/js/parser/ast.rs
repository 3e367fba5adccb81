use num_bigint::BigInt;
use serde::{Serialize, Serializer};

use super::loc::Loc;

/// Owned pointer to a child node.
pub type P<T> = Box<T>;

#[inline]
pub fn p<T>(node: T) -> P<T> {
    Box::new(node)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Program {
    pub loc: Loc,
    pub source_type: SourceType,
    pub directives: Vec<Directive>,
    pub body: Vec<Statement>,
    /// Whether the whole program is strict mode code
    pub strict: bool,
}

/// A string literal expression statement in a directive prologue.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Directive {
    pub loc: Loc,
    pub value: String,
    /// Source text of the string literal, including quotes
    pub raw: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Identifier {
    pub loc: Loc,
    pub name: String,
}

impl Identifier {
    pub fn new(loc: Loc, name: String) -> Identifier {
        Identifier { loc, name }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    VarDecl(VariableDeclaration),
    FuncDecl(P<Function>),
    ClassDecl(P<Class>),
    Expr(ExpressionStatement),
    Block(Block),
    If(IfStatement),
    Switch(SwitchStatement),
    For(ForStatement),
    ForEach(ForEachStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    With(WithStatement),
    Try(TryStatement),
    Throw(ThrowStatement),
    Return(ReturnStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Labeled(LabeledStatement),
    Empty(EmptyStatement),
    Debugger(DebuggerStatement),
    Import(ImportDeclaration),
    ExportNamed(ExportNamedDeclaration),
    ExportDefault(ExportDefaultDeclaration),
    ExportAll(ExportAllDeclaration),
}

impl Statement {
    pub fn loc(&self) -> Loc {
        match self {
            Statement::VarDecl(stmt) => stmt.loc,
            Statement::FuncDecl(func) => func.loc,
            Statement::ClassDecl(class) => class.loc,
            Statement::Expr(stmt) => stmt.loc,
            Statement::Block(stmt) => stmt.loc,
            Statement::If(stmt) => stmt.loc,
            Statement::Switch(stmt) => stmt.loc,
            Statement::For(stmt) => stmt.loc,
            Statement::ForEach(stmt) => stmt.loc,
            Statement::While(stmt) => stmt.loc,
            Statement::DoWhile(stmt) => stmt.loc,
            Statement::With(stmt) => stmt.loc,
            Statement::Try(stmt) => stmt.loc,
            Statement::Throw(stmt) => stmt.loc,
            Statement::Return(stmt) => stmt.loc,
            Statement::Break(stmt) => stmt.loc,
            Statement::Continue(stmt) => stmt.loc,
            Statement::Labeled(stmt) => stmt.loc,
            Statement::Empty(stmt) => stmt.loc,
            Statement::Debugger(stmt) => stmt.loc,
            Statement::Import(stmt) => stmt.loc,
            Statement::ExportNamed(stmt) => stmt.loc,
            Statement::ExportDefault(stmt) => stmt.loc,
            Statement::ExportAll(stmt) => stmt.loc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclaration {
    pub loc: Loc,
    pub kind: VarKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclarator {
    pub loc: Loc,
    pub id: P<Pattern>,
    pub init: Option<P<Expression>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FunctionKind {
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Function {
    #[serde(rename = "type")]
    pub kind: FunctionKind,
    pub loc: Loc,
    pub id: Option<P<Identifier>>,
    pub params: Vec<FunctionParam>,
    pub body: P<FunctionBody>,
    #[serde(rename = "async")]
    pub is_async: bool,
    #[serde(rename = "generator")]
    pub is_generator: bool,
    #[serde(skip)]
    pub is_strict: bool,
}

impl Function {
    pub fn is_arrow(&self) -> bool {
        self.kind == FunctionKind::ArrowFunctionExpression
    }

    /// Simple parameter lists contain only identifiers, with no defaults, patterns, or rest.
    pub fn has_simple_parameter_list(&self) -> bool {
        has_simple_parameter_list(&self.params)
    }
}

pub fn has_simple_parameter_list(params: &[FunctionParam]) -> bool {
    params
        .iter()
        .all(|param| matches!(param, FunctionParam::Pattern(Pattern::Id(_))))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionParam {
    Pattern(Pattern),
    Rest(RestElement),
}

impl FunctionParam {
    pub fn loc(&self) -> Loc {
        match self {
            FunctionParam::Pattern(pattern) => pattern.loc(),
            FunctionParam::Rest(rest) => rest.loc,
        }
    }

    pub fn iter_bound_names<F: FnMut(&Identifier)>(&self, f: &mut F) {
        match self {
            FunctionParam::Pattern(pattern) => pattern.iter_bound_names(f),
            FunctionParam::Rest(rest) => rest.argument.iter_bound_names(f),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionBody {
    Block(FunctionBlockBody),
    Expression(Expression),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FunctionBody")]
pub struct FunctionBlockBody {
    pub loc: Loc,
    pub directives: Vec<Directive>,
    pub body: Vec<Statement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    ClassDeclaration,
    ClassExpression,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "type")]
    pub kind: ClassKind,
    pub loc: Loc,
    pub id: Option<P<Identifier>>,
    pub super_class: Option<P<Expression>>,
    pub body: Vec<ClassElement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassElement {
    Method(ClassMethod),
    Property(ClassProperty),
    StaticBlock(StaticBlock),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassMethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "MethodDefinition")]
pub struct ClassMethod {
    pub loc: Loc,
    pub key: P<Expression>,
    pub value: P<Function>,
    pub kind: ClassMethodKind,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "PropertyDefinition")]
pub struct ClassProperty {
    pub loc: Loc,
    pub key: P<Expression>,
    pub value: Option<P<Expression>>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StaticBlock {
    pub loc: Loc,
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExpressionStatement {
    pub loc: Loc,
    pub expression: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "BlockStatement")]
pub struct Block {
    pub loc: Loc,
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IfStatement {
    pub loc: Loc,
    pub test: P<Expression>,
    pub consequent: P<Statement>,
    pub alternate: Option<P<Statement>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SwitchStatement {
    pub loc: Loc,
    pub discriminant: P<Expression>,
    pub cases: Vec<SwitchCase>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SwitchCase {
    pub loc: Loc,
    /// Absent for the default case
    pub test: Option<P<Expression>>,
    pub consequent: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForStatement {
    pub loc: Loc,
    pub init: Option<P<ForInit>>,
    pub test: Option<P<Expression>>,
    pub update: Option<P<Expression>>,
    pub body: P<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    Expression(Expression),
    VarDecl(VariableDeclaration),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ForEachKind {
    ForInStatement,
    ForOfStatement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForEachStatement {
    #[serde(rename = "type")]
    pub kind: ForEachKind,
    pub loc: Loc,
    pub left: P<ForEachInit>,
    pub right: P<Expression>,
    pub body: P<Statement>,
    #[serde(rename = "await")]
    pub is_await: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForEachInit {
    VarDecl(VariableDeclaration),
    Pattern(Pattern),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WhileStatement {
    pub loc: Loc,
    pub test: P<Expression>,
    pub body: P<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DoWhileStatement {
    pub loc: Loc,
    pub body: P<Statement>,
    pub test: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WithStatement {
    pub loc: Loc,
    pub object: P<Expression>,
    pub body: P<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TryStatement {
    pub loc: Loc,
    pub block: P<Block>,
    pub handler: Option<P<CatchClause>>,
    pub finalizer: Option<P<Block>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CatchClause {
    pub loc: Loc,
    pub param: Option<P<Pattern>>,
    pub body: P<Block>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ThrowStatement {
    pub loc: Loc,
    pub argument: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ReturnStatement {
    pub loc: Loc,
    pub argument: Option<P<Expression>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BreakStatement {
    pub loc: Loc,
    pub label: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ContinueStatement {
    pub loc: Loc,
    pub label: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LabeledStatement {
    pub loc: Loc,
    pub label: Identifier,
    pub body: P<Statement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct EmptyStatement {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct DebuggerStatement {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Id(Identifier),
    Null(NullLiteral),
    Boolean(BooleanLiteral),
    Number(NumberLiteral),
    String(StringLiteral),
    BigInt(BigIntLiteral),
    RegExp(RegExpLiteral),
    Template(TemplateLiteral),
    TaggedTemplate(TaggedTemplateExpression),
    This(ThisExpression),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(P<Function>),
    ArrowFunction(P<Function>),
    Class(P<Class>),
    Unary(UnaryExpression),
    Update(UpdateExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Assign(AssignmentExpression),
    Conditional(ConditionalExpression),
    Call(CallExpression),
    New(NewExpression),
    Member(MemberExpression),
    SuperMember(SuperMemberExpression),
    SuperCall(SuperCallExpression),
    Chain(ChainExpression),
    Sequence(SequenceExpression),
    Await(AwaitExpression),
    Yield(YieldExpression),
    MetaProperty(MetaProperty),
    Import(ImportExpression),
    PrivateName(PrivateName),
    /// Placeholder for an expression that could not be parsed
    Invalid(InvalidExpression),
}

impl Expression {
    pub fn loc(&self) -> Loc {
        match self {
            Expression::Id(expr) => expr.loc,
            Expression::Null(expr) => expr.loc,
            Expression::Boolean(expr) => expr.loc,
            Expression::Number(expr) => expr.loc,
            Expression::String(expr) => expr.loc,
            Expression::BigInt(expr) => expr.loc,
            Expression::RegExp(expr) => expr.loc,
            Expression::Template(expr) => expr.loc,
            Expression::TaggedTemplate(expr) => expr.loc,
            Expression::This(expr) => expr.loc,
            Expression::Array(expr) => expr.loc,
            Expression::Object(expr) => expr.loc,
            Expression::Function(func) => func.loc,
            Expression::ArrowFunction(func) => func.loc,
            Expression::Class(class) => class.loc,
            Expression::Unary(expr) => expr.loc,
            Expression::Update(expr) => expr.loc,
            Expression::Binary(expr) => expr.loc,
            Expression::Logical(expr) => expr.loc,
            Expression::Assign(expr) => expr.loc,
            Expression::Conditional(expr) => expr.loc,
            Expression::Call(expr) => expr.loc,
            Expression::New(expr) => expr.loc,
            Expression::Member(expr) => expr.loc,
            Expression::SuperMember(expr) => expr.loc,
            Expression::SuperCall(expr) => expr.loc,
            Expression::Chain(expr) => expr.loc,
            Expression::Sequence(expr) => expr.loc,
            Expression::Await(expr) => expr.loc,
            Expression::Yield(expr) => expr.loc,
            Expression::MetaProperty(expr) => expr.loc,
            Expression::Import(expr) => expr.loc,
            Expression::PrivateName(expr) => expr.loc,
            Expression::Invalid(expr) => expr.loc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NullLiteral {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BooleanLiteral {
    pub loc: Loc,
    pub value: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NumberLiteral {
    pub loc: Loc,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StringLiteral {
    pub loc: Loc,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BigIntLiteral {
    pub loc: Loc,
    #[serde(serialize_with = "serialize_bigint")]
    pub value: BigInt,
}

/// BigInts are printed as decimal strings since JSON numbers cannot hold them.
fn serialize_bigint<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct RegExpLiteral {
    pub loc: Loc,
    pub raw: String,
    pub pattern: String,
    pub flags: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TemplateLiteral {
    pub loc: Loc,
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TemplateElement {
    pub loc: Loc,
    pub raw: String,
    /// Absent in tagged templates when the quasi contains a malformed escape sequence
    pub cooked: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TaggedTemplateExpression {
    pub loc: Loc,
    pub tag: P<Expression>,
    pub quasi: P<TemplateLiteral>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ThisExpression {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrayExpression {
    pub loc: Loc,
    pub elements: Vec<ArrayElement>,
    /// Needed for reparsing into a pattern
    #[serde(skip)]
    pub is_parenthesized: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(SpreadElement),
    /// An elision, printed as null
    Hole,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SpreadElement {
    pub loc: Loc,
    pub argument: P<Expression>,
    /// Whether a comma directly follows the spread, which rules out reparsing as a rest element
    #[serde(skip)]
    pub has_trailing_comma: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ObjectExpression {
    pub loc: Loc,
    pub properties: Vec<ObjectProperty>,
    /// Needed for reparsing into a pattern
    #[serde(skip)]
    pub is_parenthesized: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectProperty {
    Property(Property),
    Spread(SpreadElement),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Property {
    pub loc: Loc,
    pub key: P<Expression>,
    pub value: P<Expression>,
    pub kind: PropertyKind,
    pub computed: bool,
    pub method: bool,
    pub shorthand: bool,
    /// Initializer of a shorthand `a = 1` property, only valid once reparsed into a pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shorthand_init: Option<P<Expression>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "!")]
    LogicalNot,
    #[serde(rename = "~")]
    BitwiseNot,
    #[serde(rename = "typeof")]
    TypeOf,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UnaryExpression {
    pub loc: Loc,
    pub operator: UnaryOperator,
    pub argument: P<Expression>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Remainder,
    #[serde(rename = "**")]
    Exponent,
    #[serde(rename = "==")]
    EqEq,
    #[serde(rename = "===")]
    EqEqEq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "!==")]
    NotEqEq,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
    #[serde(rename = "^")]
    Xor,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRightArithmetic,
    #[serde(rename = ">>>")]
    ShiftRightLogical,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    InstanceOf,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BinaryExpression {
    pub loc: Loc,
    pub operator: BinaryOperator,
    pub left: P<Expression>,
    pub right: P<Expression>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    NullishCoalesce,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct LogicalExpression {
    pub loc: Loc,
    pub operator: LogicalOperator,
    pub left: P<Expression>,
    pub right: P<Expression>,
    #[serde(skip)]
    pub is_parenthesized: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "+=")]
    Add,
    #[serde(rename = "-=")]
    Subtract,
    #[serde(rename = "*=")]
    Multiply,
    #[serde(rename = "/=")]
    Divide,
    #[serde(rename = "%=")]
    Remainder,
    #[serde(rename = "**=")]
    Exponent,
    #[serde(rename = "&=")]
    And,
    #[serde(rename = "|=")]
    Or,
    #[serde(rename = "^=")]
    Xor,
    #[serde(rename = "<<=")]
    ShiftLeft,
    #[serde(rename = ">>=")]
    ShiftRightArithmetic,
    #[serde(rename = ">>>=")]
    ShiftRightLogical,
    #[serde(rename = "&&=")]
    LogicalAnd,
    #[serde(rename = "||=")]
    LogicalOr,
    #[serde(rename = "??=")]
    NullishCoalesce,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentExpression {
    pub loc: Loc,
    pub operator: AssignmentOperator,
    pub left: P<Pattern>,
    pub right: P<Expression>,
    #[serde(skip)]
    pub is_parenthesized: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UpdateExpression {
    pub loc: Loc,
    pub operator: UpdateOperator,
    pub argument: P<Expression>,
    pub prefix: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ConditionalExpression {
    pub loc: Loc,
    pub test: P<Expression>,
    pub consequent: P<Expression>,
    pub alternate: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CallArgument {
    Expression(Expression),
    Spread(SpreadElement),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CallExpression {
    pub loc: Loc,
    pub callee: P<Expression>,
    pub arguments: Vec<CallArgument>,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NewExpression {
    pub loc: Loc,
    pub callee: P<Expression>,
    pub arguments: Vec<CallArgument>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MemberExpression {
    pub loc: Loc,
    pub object: P<Expression>,
    /// An identifier or private name when not computed
    pub property: P<Expression>,
    pub computed: bool,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SuperMemberExpression {
    pub loc: Loc,
    pub property: P<Expression>,
    pub computed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SuperCallExpression {
    pub loc: Loc,
    pub arguments: Vec<CallArgument>,
}

/// The outermost expression of an optional chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ChainExpression {
    pub loc: Loc,
    pub expression: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct SequenceExpression {
    pub loc: Loc,
    pub expressions: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AwaitExpression {
    pub loc: Loc,
    pub argument: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct YieldExpression {
    pub loc: Loc,
    pub argument: Option<P<Expression>>,
    pub delegate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MetaPropertyKind {
    #[serde(rename = "new.target")]
    NewTarget,
    #[serde(rename = "import.meta")]
    ImportMeta,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MetaProperty {
    pub loc: Loc,
    pub kind: MetaPropertyKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportExpression {
    pub loc: Loc,
    pub source: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PrivateName {
    pub loc: Loc,
    /// Name without the leading `#`
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InvalidExpression {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    Id(Identifier),
    Array(ArrayPattern),
    Object(ObjectPattern),
    Assign(AssignmentPattern),
    Member(MemberExpression),
    SuperMember(SuperMemberExpression),
    /// Placeholder for a pattern that could not be parsed
    Invalid(InvalidPattern),
}

impl Pattern {
    pub fn loc(&self) -> Loc {
        match self {
            Pattern::Id(patt) => patt.loc,
            Pattern::Array(patt) => patt.loc,
            Pattern::Object(patt) => patt.loc,
            Pattern::Assign(patt) => patt.loc,
            Pattern::Member(expr) => expr.loc,
            Pattern::SuperMember(expr) => expr.loc,
            Pattern::Invalid(patt) => patt.loc,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Pattern::Id(_))
    }

    /// Call `f` on every identifier bound by this pattern, in source order.
    pub fn iter_bound_names<F: FnMut(&Identifier)>(&self, f: &mut F) {
        match self {
            Pattern::Id(id) => f(id),
            Pattern::Array(patt) => {
                for element in &patt.elements {
                    match element {
                        ArrayPatternElement::Pattern(pattern) => pattern.iter_bound_names(f),
                        ArrayPatternElement::Rest(rest) => rest.argument.iter_bound_names(f),
                        ArrayPatternElement::Hole => {}
                    }
                }
            }
            Pattern::Object(patt) => {
                for property in &patt.properties {
                    match property {
                        ObjectPatternProperty::Property(property) => {
                            property.value.iter_bound_names(f)
                        }
                        ObjectPatternProperty::Rest(rest) => rest.argument.iter_bound_names(f),
                    }
                }
            }
            Pattern::Assign(patt) => patt.left.iter_bound_names(f),
            Pattern::Member(_) | Pattern::SuperMember(_) | Pattern::Invalid(_) => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrayPattern {
    pub loc: Loc,
    pub elements: Vec<ArrayPatternElement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayPatternElement {
    Pattern(Pattern),
    Rest(RestElement),
    Hole,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct RestElement {
    pub loc: Loc,
    pub argument: P<Pattern>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ObjectPattern {
    pub loc: Loc,
    pub properties: Vec<ObjectPatternProperty>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternProperty {
    Property(PatternProperty),
    Rest(RestElement),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Property")]
pub struct PatternProperty {
    pub loc: Loc,
    pub key: P<Expression>,
    pub value: P<Pattern>,
    pub computed: bool,
    pub shorthand: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentPattern {
    pub loc: Loc,
    pub left: P<Pattern>,
    pub right: P<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InvalidPattern {
    pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportDeclaration {
    pub loc: Loc,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLiteral,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportSpecifier {
    Default(ImportDefaultSpecifier),
    Named(ImportNamedSpecifier),
    Namespace(ImportNamespaceSpecifier),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportDefaultSpecifier {
    pub loc: Loc,
    pub local: Identifier,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImportSpecifier")]
pub struct ImportNamedSpecifier {
    pub loc: Loc,
    pub imported: ModuleExportName,
    pub local: Identifier,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ImportNamespaceSpecifier {
    pub loc: Loc,
    pub local: Identifier,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportNamedDeclaration {
    pub loc: Loc,
    /// A variable, function, or class declaration
    pub declaration: Option<P<Statement>>,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLiteral>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportSpecifier {
    pub loc: Loc,
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportDefaultDeclaration {
    pub loc: Loc,
    pub declaration: ExportDefaultKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind {
    Function(P<Function>),
    Class(P<Class>),
    Expression(P<Expression>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExportAllDeclaration {
    pub loc: Loc,
    pub exported: Option<ModuleExportName>,
    pub source: StringLiteral,
}

/// The name other modules use to import an export. Either an identifier or a string literal.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName {
    Id(Identifier),
    String(StringLiteral),
}

impl ModuleExportName {
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Id(id) => &id.name,
            ModuleExportName::String(string) => &string.value,
        }
    }

    pub fn loc(&self) -> Loc {
        match self {
            ModuleExportName::Id(id) => id.loc,
            ModuleExportName::String(string) => string.loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str, start: usize) -> Identifier {
        Identifier::new(Loc::new(start, start + name.len()), name.to_owned())
    }

    #[test]
    fn bound_names_in_source_order() {
        // [a, {b, c: [d]}, ...e] = []
        let pattern = Pattern::Array(ArrayPattern {
            loc: Loc::new(0, 20),
            elements: vec![
                ArrayPatternElement::Pattern(Pattern::Id(id("a", 1))),
                ArrayPatternElement::Hole,
                ArrayPatternElement::Pattern(Pattern::Object(ObjectPattern {
                    loc: Loc::new(4, 14),
                    properties: vec![ObjectPatternProperty::Property(PatternProperty {
                        loc: Loc::new(5, 6),
                        key: p(Expression::Id(id("b", 5))),
                        value: p(Pattern::Assign(AssignmentPattern {
                            loc: Loc::new(5, 9),
                            left: p(Pattern::Id(id("b", 5))),
                            right: p(Expression::Null(NullLiteral { loc: Loc::new(8, 9) })),
                        })),
                        computed: false,
                        shorthand: true,
                    })],
                })),
                ArrayPatternElement::Rest(RestElement {
                    loc: Loc::new(15, 19),
                    argument: p(Pattern::Id(id("e", 18))),
                }),
            ],
        });

        let mut names = vec![];
        pattern.iter_bound_names(&mut |id| names.push(id.name.clone()));
        assert_eq!(names, vec!["a", "b", "e"]);
    }

    #[test]
    fn holes_and_tags_serialize() {
        let array = Expression::Array(ArrayExpression {
            loc: Loc::new(0, 4),
            elements: vec![
                ArrayElement::Hole,
                ArrayElement::Expression(Expression::Id(id("x", 2))),
            ],
            is_parenthesized: false,
        });

        let json = serde_json::to_value(&array).unwrap();
        assert_eq!(json["type"], "ArrayExpression");
        assert!(json["elements"][0].is_null());
        assert_eq!(json["elements"][1]["type"], "Identifier");
        assert!(json.get("isParenthesized").is_none());
    }

    #[test]
    fn simple_parameter_lists() {
        let simple = vec![FunctionParam::Pattern(Pattern::Id(id("a", 0)))];
        assert!(has_simple_parameter_list(&simple));

        let with_rest = vec![FunctionParam::Rest(RestElement {
            loc: Loc::new(0, 4),
            argument: p(Pattern::Id(id("a", 3))),
        })];
        assert!(!has_simple_parameter_list(&with_rest));
    }
}
