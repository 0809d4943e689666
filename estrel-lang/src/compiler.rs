//! The form compiler: folds top-level abstract forms into one emitted
//! module program.
//!
//! Only function definitions and the `file`/`export` attributes affect the
//! output; every other top-level form leaves the accumulated translation
//! unchanged. Translation is total — it never fails on unexpected input —
//! and unrecognized expression or pattern shapes are surfaced through a
//! diagnostics side channel instead of a raised error.

use std::fmt::Display;

use kempt::Set;

pub mod forms;

pub(crate) mod expression;
pub(crate) mod pattern;

use self::expression::{ClauseListKind, ExpressionCompiler};
use self::forms::{Form, FunctionName, Ranged};
use crate::estree::Node;

/// A translator instance.
///
/// Queue forms with [`push`](Self::push)/[`with`](Self::with), then fold
/// them into a program with [`build`](Self::build). The one-shot
/// [`translate`](Self::translate) covers the common case.
#[derive(Debug, Default)]
pub struct Translator {
    forms: Vec<Ranged<Form>>,
    translation: Translation,
    diagnostics: Vec<Ranged<Diagnostic>>,
}

impl Translator {
    /// Queues `form` for the next [`build`](Self::build).
    pub fn push(&mut self, form: Ranged<Form>) {
        self.forms.push(form);
    }

    /// Queues `form` and returns self.
    #[must_use]
    pub fn with(mut self, form: Ranged<Form>) -> Self {
        self.push(form);
        self
    }

    /// Translates `forms` into a module program in one pass.
    pub fn translate(forms: impl IntoIterator<Item = Ranged<Form>>) -> Node {
        let mut translator = Self::default();
        translator.forms.extend(forms);
        translator.build()
    }

    /// Folds every queued form through the accumulated translation and
    /// returns the finished program node: all function bindings in source
    /// order, followed by one default export object covering the last-seen
    /// export attribute.
    pub fn build(&mut self) -> Node {
        for form in std::mem::take(&mut self.forms) {
            self.compile_form(form);
        }

        let mut body = std::mem::take(&mut self.translation.body);
        let properties = self
            .translation
            .exports
            .iter()
            .map(|export| {
                let name = export.compiled_name();
                Node::property(Node::identifier(name.clone()), Node::identifier(name))
            })
            .collect();
        body.push(Node::export_default(Node::object(properties)));
        Node::program(body)
    }

    /// Returns the state accumulated by [`build`](Self::build).
    #[must_use]
    pub fn translation(&self) -> &Translation {
        &self.translation
    }

    /// Returns the diagnostics recorded while building.
    #[must_use]
    pub fn diagnostics(&self) -> &[Ranged<Diagnostic>] {
        &self.diagnostics
    }

    fn compile_form(&mut self, form: Ranged<Form>) {
        match form.0 {
            Form::File(attribute) => {
                self.translation.file = Some(attribute.name);
            }
            Form::Export(attribute) => {
                let mut seen = Set::new();
                let functions: Vec<FunctionName> = attribute
                    .functions
                    .into_iter()
                    .filter(|function| seen.insert(function.clone()))
                    .collect();
                trace!(exports = functions.len(), "replaced export set");
                self.translation.exports = functions;
            }
            Form::Function(function) => {
                let mut expression = ExpressionCompiler::new(&mut self.diagnostics);
                let clauses =
                    expression.compile_clauses(&function.clauses, ClauseListKind::Function);
                let name = FunctionName::new(function.name.clone(), function.arity).compiled_name();
                debug!(name = %name, "compiled function binding");
                self.translation
                    .body
                    .push(Node::const_declaration(Node::identifier(name), clauses));
            }
            // Other top-level forms do not affect the emitted module.
            _ => {}
        }
    }
}

/// The state a translation pass accumulates: the source file name (last
/// `file` attribute wins), the export set (replaced wholesale by the most
/// recent `export` attribute), and the emitted bindings.
#[derive(Debug, Default)]
pub struct Translation {
    file: Option<String>,
    exports: Vec<FunctionName>,
    body: Vec<Node>,
}

impl Translation {
    /// Returns the translated source's file name, if one was recorded.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Returns the exported name/arity pairs, in source order.
    #[must_use]
    pub fn exports(&self) -> &[FunctionName] {
        &self.exports
    }
}

/// A non-fatal translation observation.
///
/// Translation never fails; these record the places where an unrecognized
/// shape degraded to its neutral placeholder.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Diagnostic {
    /// An expression-position form outside the recognized grammar was
    /// replaced by the canonical null identifier.
    UnrecognizedForm,
    /// A pattern outside the recognized grammar was replaced by a wildcard
    /// matcher.
    UnrecognizedPattern,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnrecognizedForm => f.write_str("unrecognized form"),
            Diagnostic::UnrecognizedPattern => f.write_str("unrecognized pattern"),
        }
    }
}

impl std::error::Error for Diagnostic {}
