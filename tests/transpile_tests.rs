use mint::ast::TRANSPILE_HEADER;

fn compile(source: &str) -> String {
    mint::compile(source).unwrap_or_else(|e| panic!("failed to compile {:?}: {}", source, e))
}

#[test]
fn empty_program_is_just_the_header() {
    assert_eq!(compile(""), format!("{}\n", TRANSPILE_HEADER));
}

#[test]
fn declarations_become_consts() {
    assert_eq!(compile("let x be 10;"), "// Compiled from Mint\nconst x = 10;\n");
}

#[test]
fn functions_calls_and_prints() {
    assert_eq!(
        compile("let add be fn with a, b returning a + b;\nprint add of 2, 3;"),
        "// Compiled from Mint\nconst add = (a, b) => a + b;\nconsole.log(add(2, 3));\n"
    );
}

#[test]
fn curried_functions_nest_arrows() {
    assert_eq!(
        compile("let add be fn with a returning fn with b returning a + b;"),
        "// Compiled from Mint\nconst add = (a) => ((b) => a + b);\n"
    );
}

#[test]
fn operators_keep_their_grouping() {
    assert_eq!(compile("-x;"), "// Compiled from Mint\n-(x);\n");
    assert_eq!(compile("(1 + 2) * 3;"), "// Compiled from Mint\n(1 + 2) * 3;\n");
    assert_eq!(compile("1 + 2 * 3;"), "// Compiled from Mint\n1 + (2 * 3);\n");
    assert_eq!(compile("1.5 / 2;"), "// Compiled from Mint\n1.5 / 2;\n");
}

#[test]
fn compile_propagates_errors() {
    assert!(mint::compile("let x be;").is_err());
    assert!(mint::compile("let x = 1;").is_err());
}

#[test]
fn canonical_source_round_trips() {
    let programs = [
        "let x be 10; x;",
        "let add be fn with a, b returning a + b; print add of 2, 3;",
        "let add be fn with a returning fn with b returning a + b; let addFive be add of 5; print addFive of 3; addFive of 10;",
        "print -(2 * 3) + 1; +-4; (1 - 2) / 4;",
        "let f be fn with a, b returning a - b; let g be fn with x returning x * 2; print f of (g of 5), 1;",
        "let x be 1; let f be fn with y returning x + y; let g be fn with x returning f of x; g of 10;",
        "print 1.25 * 4; 10 / 4; 0.5;",
    ];
    // A literal too large for f64 lexes to infinity
    let overflowing = format!("1{};", "0".repeat(400));

    for source in programs.iter().copied().chain([overflowing.as_str()]) {
        let original = mint::parse(source).unwrap();
        let rendered = original.to_source();

        let reparsed = mint::parse(&rendered)
            .unwrap_or_else(|e| panic!("re-parsing {:?} failed: {}", rendered, e));
        assert_eq!(reparsed.to_source(), rendered, "rendering is not stable");

        let expected = mint::interpret(source).unwrap();
        let actual = mint::interpret(&rendered).unwrap();
        assert_eq!(actual, expected, "{:?} evaluates differently", rendered);
    }
}

#[test]
fn canonical_source_parenthesises_operations_and_calls() {
    let program = mint::parse("let y be f of 1 + 2, 3 * 4;").unwrap();
    assert_eq!(program.to_source(), "let y be (f of (1 + 2), (3 * 4));\n");
}

#[test]
fn canonical_source_spells_out_non_finite_numbers() {
    let span = mint::Span::single(0, 1, 1);
    let render = |value: f64| mint::Node::Num { value, span }.to_source();

    assert_eq!(render(f64::INFINITY), "(1 / 0)");
    assert_eq!(render(f64::NEG_INFINITY), "(-1 / 0)");
    assert_eq!(render(f64::NAN), "(0 / 0)");
    assert_eq!(render(1e21), "1000000000000000000000");

    let nan = mint::interpret(&format!("{};", render(f64::NAN))).unwrap().0;
    assert!(nan[0].as_number().unwrap().is_nan());
}

#[test]
fn numbers_switch_to_exponent_form_like_javascript() {
    assert_eq!(compile("1000000000000000000000;"), "// Compiled from Mint\n1e+21;\n");
    assert_eq!(compile("0.0000001;"), "// Compiled from Mint\n1e-7;\n");
    assert_eq!(compile("100000000000000000000;"), "// Compiled from Mint\n100000000000000000000;\n");
    assert_eq!(compile("0.000001;"), "// Compiled from Mint\n0.000001;\n");
    assert_eq!(mint::ast::format_number(1.5e300), "1.5e+300");
    assert_eq!(mint::ast::format_number(-2.5e-8), "-2.5e-8");
}
