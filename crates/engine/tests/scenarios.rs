use rand::Rng;
use rand::rngs::StdRng;
use test_case::test_case;

use canon_engine::CanonicalSystem;
use canon_engine::InputBindings;
use canon_engine::OutputMarker;
use canon_engine::RewriteOptions;
use canon_engine::RewritingStatistics;
use canon_engine::Rewriter;
use canon_engine::RunResult;
use canon_engine::Termination;
use canon_engine::apply_rules;
use canon_utilities::random_test;
use canon_utilities::test_logger;

/// Checks the invariants that every run must satisfy.
fn check_run(system: &CanonicalSystem, result: &RunResult) {
    assert_eq!(result.trace.len(), result.total_steps, "Every step must be recorded");

    let mut expected_before = result.initial.as_str();
    for (index, record) in result.trace.iter().enumerate() {
        assert_eq!(record.step, index + 1);
        assert_eq!(record.before, expected_before, "Snapshots must be continuous");
        expected_before = &record.after;

        // Re-deriving the step from the returned bindings gives the same string.
        let application = apply_rules(system, &record.before, &mut RewritingStatistics::default())
            .unwrap()
            .unwrap();
        let rule = &system.rules()[application.rule_index];
        let replacement = rule
            .template()
            .substitute(|variable| application.bindings.get(variable))
            .unwrap();

        let symbols: Vec<char> = record.before.chars().collect();
        let spliced: String = symbols[..application.offset]
            .iter()
            .copied()
            .chain(replacement.chars())
            .chain(symbols[application.end..].iter().copied())
            .collect();

        assert_eq!(replacement, application.replacement);
        assert_eq!(spliced, record.after);
        assert_eq!(application.rule_index, record.rule_index);
    }
    assert_eq!(result.final_string, expected_before);

    if result.termination == Termination::NoRuleApplies {
        assert_eq!(
            apply_rules(system, &result.final_string, &mut RewritingStatistics::default()),
            Ok(None),
            "Halting must be stable"
        );
    }
}

#[test]
fn test_scenario_no_rule_applies() {
    test_logger();

    let system = CanonicalSystem::new("01*=".chars(), "X".chars(), "X", &[("1*1", "1")]).unwrap();
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "10*=0")]), &RewriteOptions::default())
        .unwrap();

    assert_eq!(result.final_string, "10*=0");
    assert_eq!(result.total_steps, 0);
    assert_eq!(result.termination, Termination::NoRuleApplies);
    check_run(&system, &result);
}

#[test]
fn test_scenario_decrement() {
    test_logger();

    let system = CanonicalSystem::new("1".chars(), "X".chars(), "X", &[("1X", "X")]).unwrap();
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "111")]), &RewriteOptions::default())
        .unwrap();

    let strings: Vec<&str> = result.trace.iter().map(|record| record.after.as_str()).collect();
    assert_eq!(strings, vec!["11", "1", ""]);
    assert_eq!(result.total_steps, 3);
    assert_eq!(result.termination, Termination::NoRuleApplies);
    check_run(&system, &result);
}

#[test]
fn test_scenario_validation_failure() {
    test_logger();

    let system = CanonicalSystem::new("1".chars(), "X".chars(), "X", &[("1X", "Xb")]).unwrap();
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "11")]), &RewriteOptions::default())
        .unwrap();

    let Termination::ValidationFailure { step, error } = &result.termination else {
        panic!("Expected a validation failure, but the run ended with {}", result.termination);
    };
    assert_eq!(*step, 1);
    assert_eq!(error.symbol, 'b');
    assert_eq!(error.rule, "1X -> Xb");
    assert_eq!(result.final_string, "11", "The working string must be left unchanged");
    assert_eq!(result.total_steps, 0);
    check_run(&system, &result);
}

#[test]
fn test_scenario_step_limit() {
    test_logger();

    let system = CanonicalSystem::new("1a".chars(), "X".chars(), "X", &[("X", "Xa")]).unwrap();
    let options = RewriteOptions::default().with_max_steps(5);
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "1")]), &options)
        .unwrap();

    assert_eq!(result.total_steps, 5);
    assert_eq!(result.final_string, "1aaaaa");
    assert_eq!(result.termination, Termination::StepLimit);
    check_run(&system, &result);
}

#[test]
fn test_empty_axiom_binding_does_not_step() {
    let system = CanonicalSystem::new("1".chars(), "X".chars(), "X", &[("X", "1")]).unwrap();
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "")]), &RewriteOptions::default())
        .unwrap();

    assert_eq!(result.initial, "");
    assert_eq!(result.total_steps, 0);
    assert_eq!(result.termination, Termination::NoRuleApplies);
}

/// Unary addition: moves the ones of both operands behind the `=`.
fn addition() -> CanonicalSystem {
    CanonicalSystem::new(
        "1+=;".chars(),
        "XY".chars(),
        "X+Y=;",
        &[("1+X=Y;", "+X=1Y;"), ("+1X=Y;", "+X=1Y;")],
    )
    .unwrap()
}

#[test_case("11", "111", "11111" ; "two plus three")]
#[test_case("", "1", "1" ; "zero plus one")]
#[test_case("", "", "" ; "zero plus zero")]
#[test_case("1111", "", "1111" ; "four plus zero")]
fn test_unary_addition(x: &str, y: &str, sum: &str) {
    test_logger();

    let system = addition();
    let options = RewriteOptions::default().with_marker(OutputMarker::new('=', '1', ';'));
    let result = system
        .rewrite(&InputBindings::from_iter([('X', x), ('Y', y)]), &options)
        .unwrap();

    assert_eq!(result.termination, Termination::NoRuleApplies);
    assert_eq!(result.final_string, format!("+={sum};"));
    assert_eq!(result.output, sum);
    assert_eq!(result.total_steps, x.len() + y.len());
    check_run(&system, &result);
}

#[test]
fn test_output_is_most_recent_observation() {
    let system = addition();
    let options = RewriteOptions::default().with_marker(OutputMarker::new('=', '1', ';'));
    let initial = system
        .initial_string(&InputBindings::from_iter([('X', "1"), ('Y', "1")]))
        .unwrap();
    let mut rewriter = Rewriter::new(&system, initial, &options).unwrap();

    assert_eq!(rewriter.output(), "");
    rewriter.step();
    assert_eq!(rewriter.output(), "1");
    rewriter.step();
    assert_eq!(rewriter.output(), "11");
}

#[test]
fn test_output_of_initial_string() {
    let options = RewriteOptions::default().with_marker(OutputMarker::new('=', '1', ';'));

    // No rule applies, so the output can only come from the initial string.
    let halted = CanonicalSystem::new("1=;".chars(), "X".chars(), "X", &[("1;1", "")]).unwrap();
    let result = halted
        .rewrite(&InputBindings::from_iter([('X', "=11;")]), &options)
        .unwrap();

    assert_eq!(result.total_steps, 0);
    assert_eq!(result.output, "11");

    // Removing the closing delimiter keeps the value observed before.
    let strip = CanonicalSystem::new("1=;".chars(), "X".chars(), "X", &[(";", "")]).unwrap();
    let result = strip
        .rewrite(&InputBindings::from_iter([('X', "=11;")]), &options)
        .unwrap();

    assert_eq!(result.total_steps, 1);
    assert_eq!(result.final_string, "=11");
    assert_eq!(result.termination, Termination::NoRuleApplies);
    assert_eq!(result.output, "11");
}

#[test]
fn test_missing_marker_gives_empty_output() {
    let system = CanonicalSystem::new("1".chars(), "X".chars(), "X", &[("1X", "X")]).unwrap();
    let options = RewriteOptions::default().with_marker(OutputMarker::new('=', '1', ';'));
    let result = system
        .rewrite(&InputBindings::from_iter([('X', "11")]), &options)
        .unwrap();

    assert_eq!(result.output, "");
}

/// Generates a random pattern over `0`, `1` and the variables `X` and `Y`
/// without adjacent or repeated variables.
fn random_pattern(rng: &mut StdRng) -> String {
    let mut result = String::new();
    let mut variables = vec!['X', 'Y'];
    let mut previous_variable = false;

    for _ in 0..rng.random_range(0..5) {
        if !previous_variable && !variables.is_empty() && rng.random_bool(0.4) {
            result.push(variables.remove(rng.random_range(0..variables.len())));
            previous_variable = true;
        } else {
            result.push(if rng.random_bool(0.5) { '0' } else { '1' });
            previous_variable = false;
        }
    }

    result
}

/// Generates a random template over `0`, `1` and the variables of the pattern.
/// Every variable is used at most once, so a step grows the string by at most
/// the number of literals in the template.
fn random_template(rng: &mut StdRng, pattern: &str) -> String {
    let mut variables: Vec<char> = pattern.chars().filter(|symbol| symbol.is_ascii_uppercase()).collect();

    (0..rng.random_range(0..5))
        .map(|_| {
            if !variables.is_empty() && rng.random_bool(0.3) {
                variables.remove(rng.random_range(0..variables.len()))
            } else if rng.random_bool(0.5) {
                '0'
            } else {
                '1'
            }
        })
        .collect()
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_random_runs() {
    random_test(100, |rng| {
        let rules: Vec<(String, String)> = (0..rng.random_range(1..4))
            .map(|_| {
                let pattern = random_pattern(rng);
                let template = random_template(rng, &pattern);
                (pattern, template)
            })
            .collect();

        let system = CanonicalSystem::new("01".chars(), "XY".chars(), "X", &rules).unwrap();
        let input: String = (0..rng.random_range(0..8))
            .map(|_| if rng.random_bool(0.5) { '0' } else { '1' })
            .collect();

        let options = RewriteOptions::default().with_max_steps(40);
        let result = system
            .rewrite(&InputBindings::from_iter([('X', input)]), &options)
            .unwrap();

        assert!(result.total_steps <= 40);
        assert!(!matches!(result.termination, Termination::ValidationFailure { .. }));
        check_run(&system, &result);
    })
}
