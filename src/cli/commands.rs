//! Command implementations for the bicode CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::checker::{BijectiveChecker, CheckerConfig, Verdict};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::code::Alphabet;
use crate::encoding::EncodingScheme;
use crate::error::{BicodeError, Result};
use crate::generator::{
    generate_code, generate_grammar, generate_prefix_code, generate_unbijective,
    max_code_length, max_number_codewords, min_code_length, satisfies_mcmillan,
};
use crate::grammar::CodeStateMachine;

/// Largest maximum codeword length a sweep accepts.
const MAX_SWEEP_LENGTH: usize = 8;

/// Execute a CLI command.
pub fn execute_command(args: BicodeArgs) -> Result<()> {
    match &args.command {
        Command::Check(check_args) => check_scheme(check_args.clone(), &args),
        Command::Generate(generate_args) => generate_scheme(generate_args.clone(), &args),
        Command::Sweep(sweep_args) => run_sweep(sweep_args.clone(), &args),
    }
}

/// Check a scheme file.
fn check_scheme(args: CheckArgs, cli_args: &BicodeArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Loading scheme from: {}", args.scheme.display());
    }

    let scheme = EncodingScheme::load(&args.scheme)
        .with_context(|| format!("cannot load scheme {}", args.scheme.display()))?;
    let alphabet = scheme.alphabet()?;
    let grammar = scheme.grammar()?;

    let mut config = match &args.config {
        Some(path) => CheckerConfig::from_json_file(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => CheckerConfig::default(),
    };
    if let Some(width_limit) = args.width_limit {
        config = config.with_width_limit(width_limit);
    }
    if args.no_prune {
        config = config.with_pruning(false);
    }

    let mut checker = BijectiveChecker::new(config);
    let report = checker.check(&alphabet, &grammar)?;

    if let Some(dir) = &args.dot_dir {
        write_dot_files(dir, &checker, &grammar)?;
        info!("Wrote automata to {}", dir.display());
    }

    output_result(
        "Check completed",
        &CheckResult::new(
            args.scheme.to_string_lossy().to_string(),
            &alphabet,
            report.verdict.name(),
            report.verdict.witnesses(),
            report.stats,
        ),
        cli_args,
    )?;

    Ok(())
}

/// Write the automata of the last check as Graphviz files.
fn write_dot_files(
    dir: &Path,
    checker: &BijectiveChecker,
    grammar: &CodeStateMachine,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    if let Some(dot) = checker.deficits_dot() {
        fs::write(dir.join("deficits.dot"), dot)?;
    }
    if let Some(dot) = checker.synonymy_dot() {
        fs::write(dir.join("synonymy.dot"), dot)?;
    }
    grammar.automaton().write_dot(
        dir.join("grammar.dot"),
        "grammar",
        |state| state.to_string(),
        |codeword| codeword.to_string(),
    )
}

/// Generate a random scheme and save it.
fn generate_scheme(args: GenerateArgs, cli_args: &BicodeArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    debug!("Generating {:?} scheme with seed {seed}", args.kind);

    let scheme = match args.kind {
        GenerateKind::Code | GenerateKind::Prefix => {
            let codewords = if args.kind == GenerateKind::Prefix {
                generate_prefix_code(args.max_length, args.count, &mut rng)?
            } else {
                let total = match args.total_length {
                    Some(total) => total,
                    None => min_code_length(args.max_length, args.count)?,
                };
                generate_code(total, args.max_length, args.count, &mut rng)?
            };
            let alphabet = Alphabet::new(&codewords)?;
            let grammar = if args.states == 1 {
                CodeStateMachine::all_words(alphabet.len())
            } else {
                generate_grammar(alphabet.len(), args.states, &mut rng)?
            };
            EncodingScheme::new(&alphabet, &grammar)
        }
        GenerateKind::Unbijective => {
            let generated = generate_unbijective(&mut rng)?;
            debug!(
                "Planted ambiguity on {}: {:?} vs {:?}",
                generated.seed, generated.decomposition_a, generated.decomposition_b
            );
            EncodingScheme::new(&Alphabet::new(&generated.alphabet)?, &generated.grammar)
        }
    };

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    scheme.save(&args.output)?;

    output_result(
        "Scheme generated",
        &GenerateResult {
            path: args.output.to_string_lossy().to_string(),
            kind: format!("{:?}", args.kind).to_lowercase(),
            seed,
            alphabet: scheme.alphabet.clone(),
            states: scheme.states,
            transitions: scheme.transitions.len(),
        },
        cli_args,
    )?;

    Ok(())
}

/// One generated code to check during a sweep.
struct SweepTask {
    max_length: usize,
    count: usize,
    total: usize,
    seed: u64,
}

/// Outcome of one sweep task.
struct SweepOutcome {
    max_length: usize,
    verdict: Verdict,
    mcmillan_violation: Option<Vec<String>>,
}

/// Check random codes of every feasible shape under the all-words grammar.
fn run_sweep(args: SweepArgs, cli_args: &BicodeArgs) -> Result<()> {
    if args.min_max_length == 0
        || args.min_max_length > args.max_max_length
        || args.max_max_length > MAX_SWEEP_LENGTH
    {
        return Err(BicodeError::invalid_argument(format!(
            "maximum lengths must satisfy 1 <= {} <= {} <= {MAX_SWEEP_LENGTH}",
            args.min_max_length, args.max_max_length
        )));
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut config = CheckerConfig::default();
    if let Some(width_limit) = args.width_limit {
        config = config.with_width_limit(width_limit);
    }

    let mut tasks = Vec::new();
    for max_length in args.min_max_length..=args.max_max_length {
        for count in 1..=max_number_codewords(max_length) {
            let min = min_code_length(max_length, count)?;
            let max = max_code_length(max_length, count)?;
            for total in min..=max {
                for _ in 0..args.generations {
                    tasks.push(SweepTask {
                        max_length,
                        count,
                        total,
                        seed: rng.random(),
                    });
                }
            }
        }
    }
    info!("Sweeping {} codes with seed {seed}", tasks.len());

    let start = Instant::now();
    let outcomes = tasks
        .par_iter()
        .map(|task| sweep_one(task, &config))
        .collect::<Result<Vec<_>>>()?;
    let duration = start.elapsed();

    let mut by_max_length: Vec<SweepShapeSummary> = (args.min_max_length..=args.max_max_length)
        .map(|max_length| SweepShapeSummary {
            max_length,
            ..Default::default()
        })
        .collect();
    let mut mcmillan_violations = Vec::new();
    for outcome in outcomes {
        let row = &mut by_max_length[outcome.max_length - args.min_max_length];
        row.codes += 1;
        match outcome.verdict {
            Verdict::IsBijective => row.is_bijective += 1,
            Verdict::NotBijective(_) => row.not_bijective += 1,
            Verdict::WidthOut => row.width_out += 1,
        }
        mcmillan_violations.extend(outcome.mcmillan_violation);
    }

    let total = |f: fn(&SweepShapeSummary) -> usize| by_max_length.iter().map(f).sum::<usize>();
    let result = SweepResult {
        seed,
        codes_checked: total(|row| row.codes),
        is_bijective: total(|row| row.is_bijective),
        not_bijective: total(|row| row.not_bijective),
        width_out: total(|row| row.width_out),
        by_max_length: by_max_length.clone(),
        mcmillan_violations,
        duration_ms: duration.as_millis() as u64,
    };

    output_result("Sweep completed", &result, cli_args)?;

    Ok(())
}

/// Generate and check a single sweep code with its own checker.
fn sweep_one(task: &SweepTask, config: &CheckerConfig) -> Result<SweepOutcome> {
    let mut rng = StdRng::seed_from_u64(task.seed);
    let codewords = generate_code(task.total, task.max_length, task.count, &mut rng)?;
    let alphabet = Alphabet::new(&codewords)?;
    let grammar = CodeStateMachine::all_words(alphabet.len());

    let mut checker = BijectiveChecker::new(config.clone());
    let report = checker.check(&alphabet, &grammar)?;

    // Under the all-words grammar a bijective code must satisfy McMillan.
    let mcmillan_violation =
        (report.is_bijective() && !satisfies_mcmillan(&alphabet)).then_some(codewords);

    Ok(SweepOutcome {
        max_length: task.max_length,
        verdict: report.verdict,
        mcmillan_violation,
    })
}
