use crate::ast::{Expr, Ident, TextSlot};
use crate::{common_enum, common_struct};

pub type BPat = Box<Pat>;

common_enum! {
    /// Binding patterns: function parameters and declarator targets.
    pub enum PatKind {
        Ident(Ident),
        Array(ArrayPat),
        Assign(AssignPat),
    }
}

common_struct! {
    pub struct Pat {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: TextSlot,
        #[serde(flatten)]
        pub kind: PatKind,
    }
}

impl Pat {
    pub fn new(kind: PatKind) -> Self {
        Self { text: None, kind }
    }

    pub fn ident(name: impl Into<String>) -> Pat {
        Pat::new(PatKind::Ident(Ident::new(name)))
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            PatKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

common_struct! {
    pub struct ArrayPat {
        pub elements: Vec<Pat>,
    }
}

common_struct! {
    /// `name = default` parameter form.
    pub struct AssignPat {
        pub left: BPat,
        pub right: Expr,
    }
}
