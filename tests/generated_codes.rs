use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bicode::checker::{BijectiveChecker, Verdict};
use bicode::code::Alphabet;
use bicode::error::Result;
use bicode::generator::{
    generate_code, generate_grammar, generate_prefix_code, generate_unbijective, max_code_length,
    max_number_codewords, min_code_length, satisfies_mcmillan,
};
use bicode::grammar::{CodeStateMachine, Grammar};

/// Every bit string of length 1 to `max_length`.
fn all_strings_up_to(max_length: usize) -> Vec<String> {
    (1..=max_length)
        .flat_map(|length| (0..1usize << length).map(move |v| format!("{v:0length$b}")))
        .collect()
}

#[test]
fn complete_codes_are_not_bijective() -> Result<()> {
    for max_length in 2..=4 {
        let codewords = all_strings_up_to(max_length);
        assert_eq!(codewords.len(), max_number_codewords(max_length));

        let alphabet = Alphabet::new(&codewords)?;
        assert!(!satisfies_mcmillan(&alphabet));

        let grammar = CodeStateMachine::all_words(alphabet.len());
        let report = BijectiveChecker::default().check(&alphabet, &grammar)?;
        let pair = report.verdict.witnesses().expect("complete code must be ambiguous");
        assert_ne!(pair.witness_a, pair.witness_b);
        assert_eq!(alphabet.encode(&pair.witness_a), alphabet.encode(&pair.witness_b));
    }
    Ok(())
}

#[test]
fn mcmillan_violators_are_never_bijective() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut checker = BijectiveChecker::default();
    let mut violators = 0;

    for max_length in 1..=4 {
        for count in 1..=max_number_codewords(max_length) {
            let min = min_code_length(max_length, count)?;
            let max = max_code_length(max_length, count)?;
            for total in min..=max {
                let codewords = generate_code(total, max_length, count, &mut rng)?;
                let alphabet = Alphabet::new(&codewords)?;
                let grammar = CodeStateMachine::all_words(alphabet.len());
                let report = checker.check(&alphabet, &grammar)?;

                if report.is_bijective() {
                    assert!(satisfies_mcmillan(&alphabet), "{codewords:?}");
                } else if !satisfies_mcmillan(&alphabet) {
                    violators += 1;
                }
                if let Verdict::NotBijective(pair) = &report.verdict {
                    assert_ne!(pair.witness_a, pair.witness_b, "{codewords:?}");
                    assert_eq!(
                        alphabet.encode(&pair.witness_a),
                        alphabet.encode(&pair.witness_b),
                        "{codewords:?}"
                    );
                }
            }
        }
    }
    assert!(violators > 0);
    Ok(())
}

#[test]
fn prefix_codes_are_bijective_under_random_grammars() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let mut checker = BijectiveChecker::default();

    for _ in 0..60 {
        let max_length = rng.random_range(1..=6);
        let count = rng.random_range(1..=1usize << max_length);
        let codewords = generate_prefix_code(max_length, count, &mut rng)?;
        let alphabet = Alphabet::new(&codewords)?;
        assert!(alphabet.is_prefix_free());

        let states = rng.random_range(1..=6);
        let grammar = generate_grammar(alphabet.len(), states, &mut rng)?;
        let report = checker.check(&alphabet, &grammar)?;
        assert_eq!(report.verdict, Verdict::IsBijective, "{codewords:?}");
    }
    Ok(())
}

#[test]
fn planted_ambiguities_are_found() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(31337);
    let mut checker = BijectiveChecker::default();

    for _ in 0..100 {
        let generated = generate_unbijective(&mut rng)?;
        let alphabet = Alphabet::new(&generated.alphabet)?;
        let report = checker.check(&alphabet, &generated.grammar)?;

        // The grammar accepts the two decompositions and nothing else.
        let pair = report.verdict.witnesses().expect("planted ambiguity");
        assert!(generated.grammar.is_recognized(&pair.witness_a));
        assert!(generated.grammar.is_recognized(&pair.witness_b));
        let found = BTreeSet::from([pair.witness_a.clone(), pair.witness_b.clone()]);
        let planted = BTreeSet::from([
            generated.decomposition_a.clone(),
            generated.decomposition_b.clone(),
        ]);
        assert_eq!(found, planted, "seed {}", generated.seed);
    }
    Ok(())
}
