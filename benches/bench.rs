//! Criterion benchmarks for the bicode checker.
//!
//! Covers the stages of a check on generated codes:
//! - Suffix index and trie construction
//! - Deficit automaton construction
//! - Full checks under the all-words grammar and random grammars

use bicode::checker::{BijectiveChecker, CheckerConfig, DeficitAutomatonBuilder};
use bicode::code::{Alphabet, BitSuffixIndex, CodeTrie};
use bicode::generator::{generate_code, generate_grammar, generate_prefix_code, min_code_length};
use bicode::grammar::CodeStateMachine;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

/// Generate a batch of codes with `count` codewords of length at most `max_length`.
fn generate_test_codes(max_length: usize, count: usize, batch: usize) -> Vec<Alphabet> {
    let mut rng = StdRng::seed_from_u64(42);
    let total = min_code_length(max_length, count).unwrap() + max_length;
    (0..batch)
        .map(|_| {
            let code = generate_code(total, max_length, count, &mut rng).unwrap();
            Alphabet::new(&code).unwrap()
        })
        .collect()
}

/// Benchmark the read-only indexes.
fn bench_indexes(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexes");
    let codes = generate_test_codes(8, 32, 50);

    group.throughput(Throughput::Elements(codes.len() as u64));
    group.bench_function("suffix_index_build", |b| {
        b.iter(|| {
            for alphabet in &codes {
                black_box(BitSuffixIndex::build(black_box(alphabet)));
            }
        })
    });

    group.bench_function("code_trie_build", |b| {
        b.iter(|| {
            for alphabet in &codes {
                black_box(CodeTrie::build(black_box(alphabet)));
            }
        })
    });

    group.finish();
}

/// Benchmark deficit automaton construction.
fn bench_deficits(c: &mut Criterion) {
    let mut group = c.benchmark_group("deficits");
    group.sample_size(30);

    for (max_length, count) in [(4, 6), (6, 12), (8, 24)] {
        let codes = generate_test_codes(max_length, count, 20);
        let indexes: Vec<(BitSuffixIndex, CodeTrie)> = codes
            .iter()
            .map(|alphabet| (BitSuffixIndex::build(alphabet), CodeTrie::build(alphabet)))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("build", format!("m{max_length}_n{count}")),
            &(codes, indexes),
            |b, (codes, indexes)| {
                b.iter(|| {
                    for (alphabet, (index, trie)) in codes.iter().zip(indexes) {
                        let deficits = DeficitAutomatonBuilder::new(alphabet, index, trie)
                            .with_pruning(true)
                            .build();
                        black_box(deficits);
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark complete checks.
fn bench_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("checks");
    group.sample_size(20);

    let codes = generate_test_codes(5, 8, 20);
    group.throughput(Throughput::Elements(codes.len() as u64));
    group.bench_function("all_words_random_codes", |b| {
        let mut checker = BijectiveChecker::default();
        b.iter(|| {
            for alphabet in &codes {
                let grammar = CodeStateMachine::all_words(alphabet.len());
                black_box(checker.check(alphabet, &grammar).unwrap());
            }
        })
    });

    let mut rng = StdRng::seed_from_u64(7);
    let schemes: Vec<(Alphabet, CodeStateMachine)> = (0..20)
        .map(|_| {
            let code = generate_prefix_code(6, 10, &mut rng).unwrap();
            let grammar = generate_grammar(code.len(), 6, &mut rng).unwrap();
            (Alphabet::new(&code).unwrap(), grammar)
        })
        .collect();
    group.bench_function("prefix_codes_random_grammars", |b| {
        let mut checker = BijectiveChecker::default();
        b.iter(|| {
            for (alphabet, grammar) in &schemes {
                black_box(checker.check(alphabet, grammar).unwrap());
            }
        })
    });

    group.bench_function("unpruned_all_words", |b| {
        let mut checker = BijectiveChecker::new(CheckerConfig::default().with_pruning(false));
        b.iter(|| {
            for alphabet in codes.iter().take(5) {
                let grammar = CodeStateMachine::all_words(alphabet.len());
                black_box(checker.check(alphabet, &grammar).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_indexes, bench_deficits, bench_checks);

criterion_main!(benches);
