use estrel::compiler::forms::{
    BinaryExpression, Clause, ExportAttribute, FileAttribute, Form, FunctionCall,
    FunctionDefinition, FunctionName, Ranged, RemoteFunction,
};
use estrel::estree::Node;
use estrel::symbol::Symbol;
use estrel::Translator;

fn form(form: Form) -> Ranged<Form> {
    Ranged::default_for(form)
}

fn var(name: &str) -> Ranged<Form> {
    form(Form::Var(Symbol::from(name)))
}

fn atom(name: &str) -> Ranged<Form> {
    form(Form::Atom(Symbol::from(name)))
}

fn int(value: i64) -> Ranged<Form> {
    form(Form::Integer(value))
}

fn binary_op(operator: &str, left: Ranged<Form>, right: Ranged<Form>) -> Ranged<Form> {
    form(Form::Binary(Box::new(BinaryExpression {
        operator: Symbol::from(operator),
        left,
        right,
    })))
}

fn clause(
    patterns: Vec<Ranged<Form>>,
    guards: Vec<Vec<Ranged<Form>>>,
    body: Vec<Ranged<Form>>,
) -> Ranged<Clause> {
    Ranged::default_for(Clause {
        patterns,
        guards,
        body,
    })
}

fn module_forms() -> Vec<Ranged<Form>> {
    // -module(counter).
    // -export([step/1]).
    // step(0) -> done;
    // step(N) when N > 0 -> lists:seq(1, N).
    vec![
        form(Form::File(Box::new(FileAttribute {
            name: "src/counter.erl".into(),
        }))),
        form(Form::Export(Box::new(ExportAttribute {
            functions: vec![FunctionName::new("step", 1)],
        }))),
        form(Form::Function(Box::new(FunctionDefinition {
            name: Symbol::from("step"),
            arity: 1,
            clauses: vec![
                clause(vec![int(0)], Vec::new(), vec![atom("done")]),
                clause(
                    vec![var("N")],
                    vec![vec![binary_op(">", var("N"), int(0))]],
                    vec![form(Form::Call(Box::new(FunctionCall {
                        function: form(Form::Remote(Box::new(RemoteFunction {
                            module: atom("lists"),
                            function: atom("seq"),
                        }))),
                        arguments: vec![int(1), var("N")],
                    })))],
                ),
            ],
        }))),
    ]
}

#[test]
fn translates_a_module() {
    let mut translator = Translator::default();
    for form in module_forms() {
        translator.push(form);
    }
    let program = translator.build();

    assert!(translator.diagnostics().is_empty());
    assert_eq!(translator.translation().file(), Some("src/counter.erl"));
    assert_eq!(
        translator.translation().exports(),
        [FunctionName::new("step", 1)],
    );

    let Node::Program { body, .. } = &program else {
        panic!("expected a program");
    };
    assert_eq!(body.len(), 2);

    let Node::VariableDeclaration { declarations, .. } = &body[0] else {
        panic!("expected the function binding first");
    };
    let Node::VariableDeclarator { id, init } = &declarations[0] else {
        panic!("expected a declarator");
    };
    assert_eq!(**id, Node::identifier("step_1"));

    // Two clauses, in source order, under one defmatch.
    let Node::CallExpression { arguments, .. } = &**init.as_ref().expect("an initializer") else {
        panic!("expected a defmatch call");
    };
    assert_eq!(arguments.len(), 2);

    let Node::ExportDefaultDeclaration { declaration } = &body[1] else {
        panic!("expected the default export last");
    };
    assert_eq!(
        **declaration,
        Node::object(vec![Node::property(
            Node::identifier("step_1"),
            Node::identifier("step_1"),
        )]),
    );
}

#[test]
fn serializes_to_estree_json() {
    let program = Translator::translate(module_forms());
    let serialized = serde_json::to_value(&program).expect("serializable");

    assert_eq!(serialized["type"], "Program");
    assert_eq!(serialized["sourceType"], "module");

    let binding = &serialized["body"][0];
    assert_eq!(binding["type"], "VariableDeclaration");
    assert_eq!(binding["kind"], "const");
    assert_eq!(binding["declarations"][0]["id"]["name"], "step_1");

    let dispatch = &binding["declarations"][0]["init"];
    assert_eq!(dispatch["callee"]["object"]["name"], "Patterns");
    assert_eq!(dispatch["callee"]["property"]["name"], "defmatch");

    // The guarded clause's remote call target.
    let second_clause = &dispatch["arguments"][1];
    let call = &second_clause["arguments"][1]["body"]["body"][0]["expression"]["argument"];
    assert_eq!(call["type"], "CallExpression");
    assert_eq!(call["callee"]["object"]["name"], "lists");
    assert_eq!(call["callee"]["property"]["name"], "seq_2");

    assert_eq!(serialized["body"][1]["type"], "ExportDefaultDeclaration");
}
