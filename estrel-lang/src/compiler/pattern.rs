//! Stand-ins for the external pattern collaborators: the descriptor
//! compiler that turns structural patterns into runtime matcher values plus
//! bound-parameter identifiers, and the binding translator behind `match`
//! forms.
//!
//! Matcher descriptors are opaque to the emitted program; the runtime
//! unifies them structurally against argument values.

use kempt::Set;

use super::expression::{new_tuple, patterns_call, ExpressionCompiler};
use super::forms::{Cons, Form, MatchExpression, Ranged};
use super::Diagnostic;
use crate::estree::Node;
use crate::symbol::Symbol;

/// The descriptor compiler's result: one matcher per pattern position plus
/// the identifiers bound by those patterns, in discovery order.
pub(crate) struct CompiledPatterns {
    /// One matcher descriptor per pattern.
    pub matchers: Vec<Node>,
    /// The distinct variables the patterns bind, as identifier nodes. These
    /// become the compiled clause's formal parameters.
    pub parameters: Vec<Node>,
}

/// Compiles one pattern per argument position, extracting the bound
/// parameter identifiers shared by the clause's body and guard.
pub(crate) fn compile_patterns(
    expression: &mut ExpressionCompiler<'_>,
    patterns: &[Ranged<Form>],
) -> CompiledPatterns {
    let mut compiler = PatternCompiler {
        expression,
        bound: Set::new(),
        parameters: Vec::new(),
    };
    let matchers = patterns
        .iter()
        .map(|pattern| compiler.compile(pattern))
        .collect();
    CompiledPatterns {
        matchers,
        parameters: compiler.parameters,
    }
}

/// Compiles a `Pattern = Value` form into a runtime binding call with
/// destructuring-assignment semantics.
pub(crate) fn compile_match(
    expression: &mut ExpressionCompiler<'_>,
    pattern: &Ranged<Form>,
    value: &Ranged<Form>,
) -> Node {
    let mut compiled = compile_patterns(expression, std::slice::from_ref(pattern));
    let matcher = compiled
        .matchers
        .pop()
        .unwrap_or_else(Node::null_identifier);
    let value = expression.compile(value);
    patterns_call(Symbol::match_symbol(), vec![matcher, value])
}

struct PatternCompiler<'a, 'b> {
    expression: &'a mut ExpressionCompiler<'b>,
    bound: Set<Symbol>,
    parameters: Vec<Node>,
}

impl PatternCompiler<'_, '_> {
    fn compile(&mut self, pattern: &Ranged<Form>) -> Node {
        match &pattern.0 {
            Form::Var(name) if *name == Symbol::underscore_symbol() => {
                patterns_call(Symbol::wildcard_symbol(), Vec::new())
            }
            Form::Var(name) => {
                self.bind(name);
                patterns_call(Symbol::variable_symbol(), vec![Node::literal(name)])
            }
            // Literals unify by equality, so their matcher is their
            // expression translation.
            Form::Atom(_)
            | Form::Integer(_)
            | Form::Float(_)
            | Form::Char(_)
            | Form::String(_)
            | Form::Nil
            | Form::Unary(_)
            | Form::Binary(_) => self.expression.compile(pattern),
            Form::Tuple(items) => {
                let items = items.iter().map(|item| self.compile(item)).collect();
                new_tuple(items)
            }
            Form::Cons(cons) => self.compile_cons(cons),
            Form::Map(map) => {
                let properties = map
                    .fields
                    .iter()
                    .map(|field| {
                        let key = self.expression.compile(&field.0.key);
                        let value = self.compile(&field.0.value);
                        Node::property(key, value)
                    })
                    .collect();
                Node::object(properties)
            }
            Form::Bitstring(bitstring) => {
                let segments = bitstring
                    .segments
                    .iter()
                    .map(|segment| {
                        let value = self.compile(&segment.0.value);
                        self.expression.fold_segment(&segment.0, value)
                    })
                    .collect();
                Node::new_instance(Node::identifier(Symbol::bit_string_symbol()), segments)
            }
            Form::Match(alias) => self.compile_alias(alias),
            Form::File(_)
            | Form::Export(_)
            | Form::Function(_)
            | Form::Call(_)
            | Form::Remote(_)
            | Form::Fun(_)
            | Form::ListComprehension(_)
            | Form::BitstringComprehension(_) => {
                self.expression
                    .report(pattern.range(), Diagnostic::UnrecognizedPattern);
                patterns_call(Symbol::wildcard_symbol(), Vec::new())
            }
        }
    }

    fn compile_cons(&mut self, cons: &Cons) -> Node {
        if is_proper_chain(cons) {
            let mut elements = vec![self.compile(&cons.head)];
            let mut tail = &cons.tail;
            while let Form::Cons(next) = &tail.0 {
                elements.push(self.compile(&next.head));
                tail = &next.tail;
            }
            Node::array(elements)
        } else {
            let head = self.compile(&cons.head);
            let tail = self.compile(&cons.tail);
            patterns_call(Symbol::head_tail_symbol(), vec![head, tail])
        }
    }

    /// An alias pattern binds the variable side and matches the other side,
    /// wrapped in the runtime's capture combinator.
    fn compile_alias(&mut self, alias: &MatchExpression) -> Node {
        if let Form::Var(name) = &alias.pattern.0 {
            self.bind(name);
            let inner = self.compile(&alias.value);
            patterns_call(Symbol::capture_symbol(), vec![inner])
        } else if let Form::Var(name) = &alias.value.0 {
            self.bind(name);
            let inner = self.compile(&alias.pattern);
            patterns_call(Symbol::capture_symbol(), vec![inner])
        } else {
            self.compile(&alias.pattern)
        }
    }

    fn bind(&mut self, name: &Symbol) {
        if *name == Symbol::underscore_symbol() {
            return;
        }
        if self.bound.insert(name.clone()) {
            self.parameters.push(Node::identifier(name.clone()));
        }
    }
}

fn is_proper_chain(cons: &Cons) -> bool {
    let mut tail = &cons.tail;
    loop {
        match &tail.0 {
            Form::Cons(next) => tail = &next.tail,
            Form::Nil => return true,
            _ => return false,
        }
    }
}
