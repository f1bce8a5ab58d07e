use fw_expr::{extract_names, parse, Expr, KindParam, Literal};
use pretty_assertions::assert_eq;

fn check(source: &str, names: &[&str], funcnames: &[&str]) {
    let found = extract_names(source).unwrap_or_else(|err| panic!("{source}: {err}"));
    assert_eq!(found.names, names, "names of {source}");
    assert_eq!(found.funcnames, funcnames, "funcnames of {source}");
}

#[test]
fn names_in_nested_calls() {
    check("foo(a, b-3+x(14), c=d+1)", &["a", "b", "d"], &["foo", "x"]);
}

#[test]
fn repeated_names_are_kept() {
    check("PI * PI / 10", &["PI", "PI"], &[]);
}

#[test]
fn char_literal_kind_prefixes() {
    check("(123456_'aosentuh' // aoeu_'aosnteh')", &["aoeu"], &[]);
}

#[test]
fn real_literal_kind_suffixes() {
    check(
        "1234.567E12_g_1 + .35009_f13_ / (-.9D3_D__3 + 1._a1)",
        &["g_1", "f13_", "D__3", "a1"],
        &[],
    );
}

#[test]
fn signed_literals() {
    check("-+12354.5678E-12_aoeu", &["aoeu"], &[]);
    check(".02808_a123_45", &["a123_45"], &[]);
    check("+1**2_a8", &["a8"], &[]);
    check("3.1415926_8", &[], &[]);
    check("6.02E23 * 8.048", &[], &[]);
}

#[test]
fn names_and_calls_mixed() {
    check("e / 3", &["e"], &[]);
    check("kind('a')", &[], &["kind"]);
    check("(0.0_r8, 1.0_d12)", &["r8", "d12"], &[]);
    check("(1.0D+0, 0.0D+0)", &[], &[]);
    check("2**3**2", &[], &[]);
    check("--9", &[], &[]);
    check("-E", &["E"], &[]);
    check("selected_int_kind(r=kind(0)*2)", &[], &["selected_int_kind", "kind"]);
}

#[test]
fn logical_literals() {
    check(".true._lk", &["lk"], &[]);
    check(".FALSE.", &[], &[]);
}

#[test]
fn char_literal_values() {
    let expr = parse("aoeu_'1202\"04''028'").unwrap();
    assert_eq!(
        expr,
        Expr::Literal(Literal::Char {
            value: "1202\"04'028".into(),
            delimiter: '\'',
            kind: Some(KindParam::Name("aoeu".into())),
        })
    );

    let expr = parse("1_\"as \"\"onthu'sanetu\"").unwrap();
    let Expr::Literal(Literal::Char { value, kind, .. }) = expr else {
        panic!("expected a char literal");
    };
    assert_eq!(value, "as \"onthu'sanetu");
    assert_eq!(kind, Some(KindParam::Digits("1".into())));
}

#[test]
fn invalid_inputs_fail() {
    for source in ["", "*", "a +", "(a", "f(a,", "a b", "1 $ 2"] {
        assert!(parse(source).is_err(), "{source:?} should not parse");
    }
}
