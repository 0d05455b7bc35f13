use crate::ast::{Expr, Ident, Pat, TextSlot};
use crate::{common_enum, common_struct};

pub type BStmt = Box<Stmt>;

common_enum! {
    pub enum StmtKind {
        Expr(Expr),
        Block(BlockStmt),
        VarDecl(VarDecl),
        Func(FunctionDecl),
        Class(ClassDecl),
        Return(ReturnStmt),
        If(IfStmt),
        For(ForStmt),
    }
}

common_struct! {
    pub struct Stmt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        #[serde(flatten)]
        pub kind: StmtKind,
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { text: None, kind }
    }

    pub fn kind(&self) -> &StmtKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut StmtKind {
        &mut self.kind
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn expr(expr: Expr) -> Stmt {
        StmtKind::Expr(expr).into()
    }
}

impl From<StmtKind> for Stmt {
    fn from(kind: StmtKind) -> Self {
        Stmt::new(kind)
    }
}

common_struct! {
    pub struct BlockStmt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub body: Vec<Stmt>,
    }
}

impl BlockStmt {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { text: None, body }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

common_enum! {
    pub enum DeclKind {
        Var,
        Let,
        Const,
    }
}

common_struct! {
    pub struct VarDecl {
        pub kind: DeclKind,
        pub declarations: Vec<VarDeclarator>,
    }
}

common_struct! {
    pub struct VarDeclarator {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub id: Pat,
        pub init: Option<Expr>,
    }
}

impl VarDeclarator {
    pub fn new(id: Pat, init: Option<Expr>) -> Self {
        Self {
            text: None,
            id,
            init,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

common_struct! {
    pub struct FunctionDecl {
        pub id: Option<Ident>,
        pub params: Vec<Pat>,
        pub body: BlockStmt,
    }
}

common_struct! {
    pub struct ClassDecl {
        pub id: Ident,
        pub super_class: Option<Expr>,
        pub body: ClassBody,
    }
}

common_struct! {
    pub struct ClassBody {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub body: Vec<MethodDef>,
    }
}

impl ClassBody {
    pub fn new(body: Vec<MethodDef>) -> Self {
        Self { text: None, body }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

common_enum! {
    pub enum MethodKind {
        Constructor,
        Method,
    }
}

common_struct! {
    pub struct MethodDef {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub kind: MethodKind,
        pub key: Expr,
        pub params: Vec<Pat>,
        pub body: BlockStmt,
    }
}

impl MethodDef {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MethodKind::Constructor)
    }
}

common_struct! {
    pub struct ReturnStmt {
        pub argument: Option<Expr>,
    }
}

common_struct! {
    pub struct IfStmt {
        pub test: Expr,
        pub consequent: BStmt,
        pub alternate: Option<BStmt>,
    }
}

common_struct! {
    /// C-style loop head. `init` is either a declaration or an expression
    /// statement; all three slots are optional, as in the grammar.
    pub struct ForStmt {
        pub init: Option<BStmt>,
        pub test: Option<Expr>,
        pub update: Option<Expr>,
        pub body: BStmt,
    }
}
