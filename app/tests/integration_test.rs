use assert_cmd::Command;

/// The name of the CLI binary
const BINARY: &str = "telos";

fn run(subcommand: &str, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin(BINARY).unwrap();
    cmd.arg(subcommand).write_stdin(input).assert()
}

#[test]
fn type_of_universe() {
    run("type", "U").success().stdout("U\n");
}

#[test]
fn nf_of_universe() {
    run("nf", "U").success().stdout("U\n");
}

#[test]
fn nf_of_polymorphic_identity_application() {
    run("nf", "let id : {A} → A → A = λ x. x in id U").success().stdout("U\n");
}

#[test]
fn type_of_polymorphic_identity_application() {
    run("type", "let id : {A} → A → A = λ x. x in id U").success().stdout("U\n");
}

#[test]
fn nf_of_const() {
    run("nf", "let const : {A B} → A → B → A = λ x y. x in const U (U → U)")
        .success()
        .stdout("U\n");
}

#[test]
fn elab_inserts_implicit_lambda() {
    // Checking λ x. x against {A : U} → A → A inserts the implicit binder.
    run("elab", "let i : {A : U} → A → A = λ x. x in U")
        .success()
        .stdout("let i : {A : U} → A → A = λ {A} x. x in U\n");
}

#[test]
fn top_level_lambdas_are_postulates() {
    run("type", "λ (A : U) (x : A). x").success().stdout("(A : U) → (x : A) → A\n");
}

#[test]
fn unannotated_postulates_get_metas() {
    run("type", "λ A x. x").success().stdout("(A : ?0) → (x : ?1 A) → ?1 A\n");
}

#[test]
fn hole_checked_against_function_type() {
    run("type", "let g : (A : U) → A → A = _ in g").success().stdout("(A : U) → A → A\n");
}

#[test]
fn unapplied_generalized_function_keeps_its_telescope() {
    // Inferring `let f = λ x. x in f` generalizes over a telescope that no
    // use site ever constrains.
    run("type", "let f = λ x. x in f")
        .success()
        .stdout("{{Γ1 : ?1}} → (x : ?2 {{Γ1}}) → ?2 {{Γ1}}\n");
}

#[test]
fn generalized_function_collapses_at_use_site() {
    run("nf", "let f = λ x. x in f U").success().stdout("U\n");
}

#[test]
fn scope_error_exits_nonzero() {
    run("type", "x").failure();
}

#[test]
fn parse_error_exits_nonzero() {
    run("type", "λ .").failure();
}

#[test]
fn unify_error_exits_nonzero() {
    run("type", "let a : U → U = λ x. x in a a").failure();
}
