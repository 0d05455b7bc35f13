use crate::ast::{Ident, TextSlot};
use crate::{common_enum, common_struct};

pub type BExpr = Box<Expr>;

common_enum! {
    /// Every expression kind of the source dialect, plus the typed
    /// `Wildcard` placeholder used only inside compiled rewrite patterns.
    pub enum ExprKind {
        Ident(Ident),
        Lit(Lit),
        This(ThisExpr),
        Super(SuperExpr),
        Array(ArrayLit),
        Object(ObjectLit),
        Template(TemplateLit),
        Unary(UnaryExpr),
        Update(UpdateExpr),
        Binary(BinExpr),
        Assign(AssignExpr),
        Member(MemberExpr),
        Call(CallExpr),
        New(NewExpr),
        Wildcard(u32),
    }
}

common_struct! {
    pub struct Expr {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        #[serde(flatten)]
        pub kind: ExprKind,
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { text: None, kind }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ExprKind {
        &mut self.kind
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn ident(name: impl Into<String>) -> Expr {
        ExprKind::Ident(Ident::new(name)).into()
    }

    pub fn lit(lit: Lit) -> Expr {
        ExprKind::Lit(lit).into()
    }

    pub fn wildcard(index: u32) -> Expr {
        ExprKind::Wildcard(index).into()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, ExprKind::Binary(_))
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Expr::new(kind)
    }
}

impl From<BExpr> for Expr {
    fn from(expr: BExpr) -> Self {
        *expr
    }
}

common_struct! {
    /// Literal with its original source spelling kept verbatim in `raw`,
    /// so numeric precision survives the round trip untouched.
    pub struct Lit {
        pub value: LitValue,
        pub raw: String,
    }
}

common_enum! {
    pub enum LitValue {
        Null,
        Bool(bool),
        Num(f64),
        Str(String),
    }
}

impl Lit {
    pub fn null() -> Lit {
        Lit {
            value: LitValue::Null,
            raw: "null".to_string(),
        }
    }

    pub fn bool(value: bool) -> Lit {
        Lit {
            value: LitValue::Bool(value),
            raw: if value { "true" } else { "false" }.to_string(),
        }
    }

    pub fn number(value: f64, raw: impl Into<String>) -> Lit {
        Lit {
            value: LitValue::Num(value),
            raw: raw.into(),
        }
    }

    pub fn string(value: impl Into<String>, raw: impl Into<String>) -> Lit {
        Lit {
            value: LitValue::Str(value.into()),
            raw: raw.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, LitValue::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.value, LitValue::Num(_))
    }
}

common_struct! {
    pub struct ThisExpr {}
}

common_struct! {
    pub struct SuperExpr {}
}

common_struct! {
    pub struct ArrayLit {
        pub elements: Vec<Expr>,
    }
}

common_struct! {
    pub struct ObjectLit {
        pub properties: Vec<Property>,
    }
}

common_struct! {
    /// One `key: value` entry of an object literal.
    pub struct Property {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        pub key: Expr,
        pub value: Expr,
    }
}

impl Property {
    pub fn new(key: Expr, value: Expr) -> Self {
        Self {
            text: None,
            key,
            value,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

common_struct! {
    /// Template literal: n+1 quasis interleaved with n substitution expressions.
    pub struct TemplateLit {
        pub quasis: Vec<String>,
        pub expressions: Vec<Expr>,
    }
}

common_struct! {
    pub struct UnaryExpr {
        pub op: String,
        pub argument: BExpr,
    }
}

common_struct! {
    pub struct UpdateExpr {
        pub op: String,
        pub prefix: bool,
        pub argument: BExpr,
    }
}

common_struct! {
    pub struct BinExpr {
        pub op: String,
        pub left: BExpr,
        pub right: BExpr,
    }
}

common_struct! {
    pub struct AssignExpr {
        pub op: String,
        pub left: BExpr,
        pub right: BExpr,
    }
}

common_struct! {
    pub struct MemberExpr {
        pub object: BExpr,
        pub property: BExpr,
    }
}

common_struct! {
    pub struct CallExpr {
        pub callee: BExpr,
        pub arguments: Vec<Expr>,
    }
}

common_struct! {
    pub struct NewExpr {
        pub callee: BExpr,
        pub arguments: Vec<Expr>,
    }
}
