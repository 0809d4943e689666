//! The expression compiler: a total, recursive mapping from any abstract
//! form to exactly one target node.
//!
//! Clause lists, guards, and bodies do not translate into target control
//! flow; they translate into data handed to the runtime's `Patterns`
//! facade, which drives clause selection, guard evaluation, and rollback at
//! run time.

use super::forms::{
    BinaryExpression, BitstringExpression, Clause, Comprehension, Cons, Form, FunExpression,
    FunctionCall, FunctionName, Generator, Qualifier, Ranged, Segment, SegmentFlag, SegmentKind,
    SourceRange, UnaryExpression,
};
use super::pattern;
use super::Diagnostic;
use crate::estree::Node;
use crate::symbol::Symbol;

/// Which runtime entry point a clause list targets.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum ClauseListKind {
    /// An ordinary function: `Patterns.defmatch`.
    Function,
    /// A generator-context function such as a comprehension:
    /// `Patterns.defmatchgen`.
    Generator,
}

impl ClauseListKind {
    fn entry_point(self) -> Symbol {
        match self {
            Self::Function => Symbol::defmatch_symbol(),
            Self::Generator => Symbol::defmatchgen_symbol(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum ComprehensionKind {
    List,
    Bitstring,
}

impl ComprehensionKind {
    fn entry_point(self) -> Symbol {
        match self {
            Self::List => Symbol::list_comprehension_symbol(),
            Self::Bitstring => Symbol::bitstring_comprehension_symbol(),
        }
    }
}

/// Compiles expression-position forms, accumulating diagnostics for shapes
/// outside the recognized grammar.
pub(crate) struct ExpressionCompiler<'a> {
    diagnostics: &'a mut Vec<Ranged<Diagnostic>>,
}

impl<'a> ExpressionCompiler<'a> {
    pub fn new(diagnostics: &'a mut Vec<Ranged<Diagnostic>>) -> Self {
        Self { diagnostics }
    }

    /// Compiles one form into one target node.
    ///
    /// Never fails: unrecognized or out-of-place shapes produce the
    /// canonical null identifier and push one diagnostic.
    pub fn compile(&mut self, form: &Ranged<Form>) -> Node {
        match &form.0 {
            Form::Var(name) => Node::identifier(name.clone()),
            Form::Atom(name) => compile_atom(name),
            Form::Integer(value) => Node::literal(*value),
            Form::Float(value) => Node::literal(*value),
            Form::Char(value) => Node::literal(i64::from(u32::from(*value))),
            Form::String(value) => Node::literal(value.clone()),
            Form::Tuple(items) => {
                let items = items.iter().map(|item| self.compile(item)).collect();
                new_tuple(items)
            }
            Form::Nil => Node::array(Vec::new()),
            Form::Cons(cons) => self.compile_cons(cons),
            Form::Bitstring(bitstring) => self.compile_bitstring(bitstring),
            Form::Map(map) => {
                let properties = map
                    .fields
                    .iter()
                    .map(|field| {
                        let key = self.compile(&field.0.key);
                        let value = self.compile(&field.0.value);
                        Node::property(key, value)
                    })
                    .collect();
                Node::object(properties)
            }
            Form::Call(call) => self.compile_call(call),
            Form::Fun(fun) => self.compile_fun(fun),
            Form::Match(match_expr) => {
                pattern::compile_match(self, &match_expr.pattern, &match_expr.value)
            }
            Form::Unary(unary) => self.compile_unary(unary),
            Form::Binary(binary) => self.compile_binary(binary),
            Form::ListComprehension(comprehension) => {
                self.compile_comprehension(comprehension, ComprehensionKind::List)
            }
            Form::BitstringComprehension(comprehension) => {
                self.compile_comprehension(comprehension, ComprehensionKind::Bitstring)
            }
            Form::File(_) | Form::Export(_) | Form::Function(_) | Form::Remote(_) => {
                self.unrecognized(form.range())
            }
        }
    }

    /// Records a diagnostic and returns the canonical placeholder.
    pub fn unrecognized(&mut self, range: SourceRange) -> Node {
        self.report(range, Diagnostic::UnrecognizedForm);
        Node::null_identifier()
    }

    pub fn report(&mut self, range: SourceRange, diagnostic: Diagnostic) {
        self.diagnostics.push(Ranged::new(range, diagnostic));
    }

    /// Compiles an ordered clause list into one runtime dispatch value.
    ///
    /// Clause order is load-bearing: the runtime tries clauses in emitted
    /// order and commits to the first match.
    pub fn compile_clauses(&mut self, clauses: &[Ranged<Clause>], kind: ClauseListKind) -> Node {
        let compiled = clauses
            .iter()
            .map(|clause| self.compile_clause(clause))
            .collect();
        patterns_call(kind.entry_point(), compiled)
    }

    fn compile_clause(&mut self, clause: &Ranged<Clause>) -> Node {
        let compiled = pattern::compile_patterns(self, &clause.0.patterns);
        let body = self.compile_body(&clause.0.body, &compiled.parameters);
        let guard = self.compile_guard(&clause.0.guards, &compiled.parameters);
        patterns_call(
            Symbol::clause_symbol(),
            vec![Node::array(compiled.matchers), body, guard],
        )
    }

    /// Compiles a clause body into one generator function.
    ///
    /// Every statement is yielded individually, in source order, so the
    /// runtime can observe each intermediate value and abandon the clause
    /// attempt between statements.
    fn compile_body(&mut self, statements: &[Ranged<Form>], parameters: &[Node]) -> Node {
        let body = statements
            .iter()
            .map(|statement| {
                Node::expression_statement(Node::yield_expression(self.compile(statement)))
            })
            .collect();
        Node::function(parameters.to_vec(), body, true)
    }

    /// Compiles a guard (an OR of AND-sequences) into a plain function over
    /// the clause's bound parameters.
    fn compile_guard(&mut self, guards: &[Vec<Ranged<Form>>], parameters: &[Node]) -> Node {
        let sequences: Vec<_> = guards
            .iter()
            .filter_map(|sequence| fold_operator("andalso", sequence.clone()))
            .collect();
        let condition = match fold_operator("orelse", sequences) {
            Some(folded) => self.compile(&folded),
            None => Node::literal(true),
        };
        Node::function(
            parameters.to_vec(),
            vec![Node::return_statement(condition)],
            false,
        )
    }

    fn compile_cons(&mut self, cons: &Cons) -> Node {
        let mut elements = vec![self.compile(&cons.head)];
        let mut tail = &cons.tail;
        loop {
            match &tail.0 {
                Form::Cons(next) => {
                    elements.push(self.compile(&next.head));
                    tail = &next.tail;
                }
                Form::Nil => return Node::array(elements),
                // Improper list: keep the tail's runtime identity instead of
                // silently dropping it.
                _ => {
                    let rest = self.compile(tail);
                    return Node::call(
                        Node::member(
                            Node::array(elements),
                            Node::identifier(Symbol::concat_symbol()),
                        ),
                        vec![rest],
                    );
                }
            }
        }
    }

    fn compile_bitstring(&mut self, bitstring: &BitstringExpression) -> Node {
        if let Some(collapsed) = collapse_literal_segments(bitstring) {
            return collapsed;
        }
        let segments = bitstring
            .segments
            .iter()
            .map(|segment| {
                let value = self.compile(&segment.0.value);
                self.fold_segment(&segment.0, value)
            })
            .collect();
        Node::new_instance(Node::identifier(Symbol::bit_string_symbol()), segments)
    }

    /// Folds one segment's declared type, size, and qualifiers into a
    /// left-to-right chain of runtime combinator calls around `value`.
    pub(crate) fn fold_segment(&mut self, segment: &Segment, value: Node) -> Node {
        let kind = segment.kind.unwrap_or(SegmentKind::Integer);
        let mut node = bitstring_call(kind.name(), vec![value]);
        if let Some(size) = &segment.size {
            let size = self.compile(size);
            node = bitstring_call(Symbol::size_symbol(), vec![node, size]);
        }
        for flag in &segment.flags {
            node = match flag {
                SegmentFlag::Unit(unit) => {
                    bitstring_call(flag.name(), vec![node, Node::literal(i64::from(*unit))])
                }
                _ => bitstring_call(flag.name(), vec![node]),
            };
        }
        node
    }

    fn compile_call(&mut self, call: &FunctionCall) -> Node {
        let arguments: Vec<Node> = call
            .arguments
            .iter()
            .map(|argument| self.compile(argument))
            .collect();
        let arity = u32::try_from(arguments.len()).unwrap_or(u32::MAX);
        match &call.function.0 {
            Form::Atom(name) => Node::call(Node::identifier(arity_name(name, arity)), arguments),
            Form::Remote(remote) => match (&remote.module.0, &remote.function.0) {
                // A variable-qualified call denotes a dynamically bound
                // function value, not a member lookup.
                (Form::Var(_), Form::Atom(function)) => {
                    Node::call(Node::identifier(arity_name(function, arity)), arguments)
                }
                (Form::Atom(module), Form::Atom(function)) => Node::call(
                    qualified_chain(module, arity_name(function, arity)),
                    arguments,
                ),
                _ => self.unrecognized(call.function.range()),
            },
            _ => Node::call(self.compile(&call.function), arguments),
        }
    }

    fn compile_fun(&mut self, fun: &FunExpression) -> Node {
        match fun {
            FunExpression::Local { function, arity } => {
                Node::identifier(arity_name(function, *arity))
            }
            FunExpression::Remote {
                module,
                function,
                arity,
            } => qualified_chain(module, arity_name(function, *arity)),
            FunExpression::Clauses(clauses) => {
                self.compile_clauses(clauses, ClauseListKind::Function)
            }
        }
    }

    fn compile_unary(&mut self, unary: &UnaryExpression) -> Node {
        let operator = match &*unary.operator {
            "not" => Symbol::from("!"),
            "bnot" => Symbol::from("~"),
            _ => unary.operator.clone(),
        };
        Node::unary(operator, self.compile(&unary.operand))
    }

    fn compile_binary(&mut self, binary: &BinaryExpression) -> Node {
        let left = self.compile(&binary.left);
        let right = self.compile(&binary.right);
        if binary.operator == "xor" {
            // No native boolean xor in the target.
            return Node::binary(
                "||",
                Node::binary("&&", left.clone(), Node::unary("!", right.clone())),
                Node::binary("&&", Node::unary("!", left), right),
            );
        }
        Node::binary(rewrite_operator(&binary.operator), left, right)
    }

    fn compile_comprehension(
        &mut self,
        comprehension: &Comprehension,
        kind: ComprehensionKind,
    ) -> Node {
        let mut patterns = Vec::new();
        let mut filters = Vec::new();
        let mut generators = Vec::new();
        for qualifier in &comprehension.qualifiers {
            match &qualifier.0 {
                Qualifier::Generator(generator) => {
                    patterns.push(generator.pattern.clone());
                    generators
                        .push(self.compile_generator(generator, Symbol::list_generator_symbol()));
                }
                Qualifier::BitstringGenerator(generator) => {
                    patterns.push(generator.pattern.clone());
                    generators.push(
                        self.compile_generator(generator, Symbol::bitstring_generator_symbol()),
                    );
                }
                Qualifier::Filter(filter) => filters.push(filter.clone()),
            }
        }

        let guards = if filters.is_empty() {
            Vec::new()
        } else {
            vec![filters]
        };
        let clause = Ranged::new(
            comprehension.template.range(),
            Clause {
                patterns,
                guards,
                body: vec![comprehension.template.clone()],
            },
        );
        let clauses = self.compile_clauses(std::slice::from_ref(&clause), ClauseListKind::Generator);
        patterns_call(kind.entry_point(), vec![clauses, Node::array(generators)])
    }

    fn compile_generator(&mut self, generator: &Generator, entry_point: Symbol) -> Node {
        let mut compiled =
            pattern::compile_patterns(self, std::slice::from_ref(&generator.pattern));
        let matcher = compiled
            .matchers
            .pop()
            .unwrap_or_else(Node::null_identifier);
        let source = self.compile(&generator.source);
        patterns_call(entry_point, vec![matcher, source])
    }
}

fn compile_atom(name: &Symbol) -> Node {
    if *name == Symbol::nil_symbol() {
        Node::null_identifier()
    } else if *name == Symbol::true_symbol() {
        Node::literal(true)
    } else if *name == Symbol::false_symbol() {
        Node::literal(false)
    } else {
        // Atoms are interned so that identity-by-name equality survives in
        // the target.
        Node::call(
            Node::member(
                Node::identifier(Symbol::symbol_symbol()),
                Node::identifier(Symbol::for_symbol()),
            ),
            vec![Node::literal(name)],
        )
    }
}

/// Right-folds `forms` into an operator tree; a single form passes through
/// unchanged, and the synthetic forms translate like ordinary operators.
fn fold_operator(operator: &str, forms: Vec<Ranged<Form>>) -> Option<Ranged<Form>> {
    forms.into_iter().rev().reduce(|folded, head| {
        let range = head.range();
        Ranged::new(
            range,
            Form::Binary(Box::new(BinaryExpression {
                operator: Symbol::from(operator),
                left: head,
                right: folded,
            })),
        )
    })
}

fn rewrite_operator(operator: &Symbol) -> Symbol {
    let rewritten = match &**operator {
        "=<" => "<=",
        "/=" => "!=",
        "=:=" => "===",
        "=/=" => "!==",
        "div" => "/",
        "rem" => "%",
        "and" | "andalso" => "&&",
        "or" | "orelse" => "||",
        "band" => "&",
        "bor" => "|",
        "bxor" => "^",
        "bsl" => "<<",
        "bsr" => ">>",
        _ => return operator.clone(),
    };
    Symbol::from(rewritten)
}

/// Collapses an all-default, all-literal-string bitstring into one string
/// literal. Purely an emission simplification.
fn collapse_literal_segments(bitstring: &BitstringExpression) -> Option<Node> {
    if bitstring.segments.is_empty() {
        return None;
    }
    let mut collapsed = String::new();
    for segment in &bitstring.segments {
        let Segment {
            value,
            size: None,
            kind: None,
            flags,
        } = &segment.0
        else {
            return None;
        };
        if !flags.is_empty() {
            return None;
        }
        let Form::String(text) = &value.0 else {
            return None;
        };
        collapsed.push_str(text);
    }
    Some(Node::literal(collapsed))
}

fn arity_name(name: &Symbol, arity: u32) -> Symbol {
    FunctionName::new(name.clone(), arity).compiled_name()
}

/// Builds a qualified reference as a pure left fold over the module's
/// dot-separated segments, ending in the arity-qualified function name.
pub(crate) fn qualified_chain(module: &Symbol, function: Symbol) -> Node {
    let mut segments = module.split('.').map(Node::identifier);
    let first = segments.next().unwrap_or_else(Node::null_identifier);
    let chain = segments.fold(first, Node::member);
    Node::member(chain, Node::identifier(function))
}

/// Emits a call against the runtime pattern-matching facade.
pub(crate) fn patterns_call(function: Symbol, arguments: Vec<Node>) -> Node {
    Node::call(
        Node::member(
            Node::identifier(Symbol::patterns_symbol()),
            Node::identifier(function),
        ),
        arguments,
    )
}

/// Emits a call against the runtime bitstring segment-builder facade.
pub(crate) fn bitstring_call(function: Symbol, arguments: Vec<Node>) -> Node {
    Node::call(
        Node::member(
            Node::identifier(Symbol::bit_string_symbol()),
            Node::identifier(function),
        ),
        arguments,
    )
}

/// Emits a fixed-arity tuple construction.
pub(crate) fn new_tuple(items: Vec<Node>) -> Node {
    Node::new_instance(Node::identifier(Symbol::tuple_symbol()), items)
}
