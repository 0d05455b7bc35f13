use std::sync::Arc;

use js2py_core::debug;
use js2py_core::error::Result;
use js2py_core::frontend::SourceFrontend;
use js2py_core::visit::{traverse, Visitor};
use js2py_javascript::JavaScriptFrontend;
use js2py_python::PythonGenerator;
use js2py_rewrite::bignumber;

/// Orchestrates parse → rewrite passes → code generation. Each traversal
/// pass runs to completion before the next begins; separate instances share
/// no state, so independent conversions may run concurrently.
pub struct Transpiler {
    frontend: Arc<dyn SourceFrontend>,
    rewrites: Vec<Box<dyn Visitor>>,
}

impl Transpiler {
    /// Stock configuration: JavaScript in, BigNumber unwrapping on.
    pub fn new() -> Result<Self> {
        Ok(Self::bare().with_pass(Box::new(bignumber()?)))
    }

    /// A transpiler with no rewrite passes configured.
    pub fn bare() -> Self {
        Self {
            frontend: Arc::new(JavaScriptFrontend::new()),
            rewrites: Vec::new(),
        }
    }

    /// Append a rewrite pass; passes run in the order they were added.
    pub fn with_pass(mut self, pass: Box<dyn Visitor>) -> Self {
        self.rewrites.push(pass);
        self
    }

    /// Translate JavaScript source text into Python source text. A parse
    /// failure aborts the conversion with nothing emitted.
    pub fn convert(&mut self, source: &str) -> Result<String> {
        let mut program = self.frontend.parse(source)?;
        debug!(
            language = self.frontend.language(),
            statements = program.body.len(),
            "parsed source"
        );
        for pass in &mut self.rewrites {
            traverse(&mut program, pass.as_mut())?;
        }
        let mut generator = PythonGenerator::new();
        traverse(&mut program, &mut generator)?;
        Ok(program.text().to_string())
    }
}
