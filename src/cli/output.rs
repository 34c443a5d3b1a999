//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::checker::{CheckStats, WitnessPair};
use crate::cli::args::{BicodeArgs, OutputFormat};
use crate::code::{Alphabet, CodewordId};
use crate::error::Result;

/// A witness message spelled out.
#[derive(Debug, Serialize, Deserialize)]
pub struct WitnessReport {
    pub ids: Vec<CodewordId>,
    pub codewords: Vec<String>,
}

impl WitnessReport {
    fn new(alphabet: &Alphabet, word: &[CodewordId]) -> Self {
        WitnessReport {
            ids: word.to_vec(),
            codewords: word
                .iter()
                .filter_map(|&id| alphabet.get(id).map(|c| c.bits.clone()))
                .collect(),
        }
    }
}

/// Result structure for a bijectivity check.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub scheme: String,
    pub verdict: String,
    pub witness_a: Option<WitnessReport>,
    pub witness_b: Option<WitnessReport>,
    /// Bit string both witnesses encode to.
    pub encoding: Option<String>,
    pub stats: CheckStats,
}

impl CheckResult {
    /// Spell out a verdict against the alphabet it was computed for.
    pub fn new(
        scheme: String,
        alphabet: &Alphabet,
        verdict_name: &str,
        witnesses: Option<&WitnessPair>,
        stats: CheckStats,
    ) -> Self {
        CheckResult {
            scheme,
            verdict: verdict_name.to_string(),
            witness_a: witnesses.map(|w| WitnessReport::new(alphabet, &w.witness_a)),
            witness_b: witnesses.map(|w| WitnessReport::new(alphabet, &w.witness_b)),
            encoding: witnesses.and_then(|w| alphabet.encode(&w.witness_a)),
            stats,
        }
    }
}

/// Result structure for scheme generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResult {
    pub path: String,
    pub kind: String,
    pub seed: u64,
    pub alphabet: Vec<String>,
    pub states: usize,
    pub transitions: usize,
}

/// Verdict counts for one maximum codeword length.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SweepShapeSummary {
    pub max_length: usize,
    pub codes: usize,
    pub is_bijective: usize,
    pub not_bijective: usize,
    pub width_out: usize,
}

/// Result structure for a sweep.
#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResult {
    pub seed: u64,
    pub codes_checked: usize,
    pub is_bijective: usize,
    pub not_bijective: usize,
    pub width_out: usize,
    pub by_max_length: Vec<SweepShapeSummary>,
    /// Codes reported bijective although they violate McMillan's inequality.
    pub mcmillan_violations: Vec<Vec<String>>,
    pub duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &BicodeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &BicodeArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("CheckResult") => {
            output_check_result_human(&value, args)
        }
        _ if std::any::type_name::<T>().contains("SweepResult") => {
            output_sweep_result_human(&value, args)
        }
        _ => output_generic_human(&value, args),
    }
}

/// Output a check result in human format.
fn output_check_result_human(value: &serde_json::Value, args: &BicodeArgs) -> Result<()> {
    if let Some(obj) = value.as_object() {
        let verdict = obj.get("verdict").and_then(|v| v.as_str()).unwrap_or("?");
        println!("Verdict: {verdict}");

        for (label, key) in [("Witness A", "witness_a"), ("Witness B", "witness_b")] {
            if let Some(witness) = obj.get(key).and_then(|w| w.as_object()) {
                let ids = witness.get("ids").map(format_value).unwrap_or_default();
                let codewords = witness
                    .get("codewords")
                    .and_then(|c| c.as_array())
                    .map(|c| {
                        c.iter()
                            .filter_map(|s| s.as_str())
                            .collect::<Vec<_>>()
                            .join(" | ")
                    })
                    .unwrap_or_default();
                println!("{label}: {ids}  ({codewords})");
            }
        }
        if let Some(encoding) = obj.get("encoding").and_then(|e| e.as_str()) {
            println!("Encoding:  {encoding}");
        }

        if args.verbosity() > 1
            && let Some(stats) = obj.get("stats").and_then(|s| s.as_object())
        {
            println!();
            println!("Statistics:");
            println!("───────────");
            for (key, val) in stats {
                if let Some(nested) = val.as_object() {
                    for (inner, val) in nested {
                        println!("  {key}.{inner}: {}", format_value(val));
                    }
                } else {
                    println!("  {key}: {}", format_value(val));
                }
            }
        }
    }
    Ok(())
}

/// Output sweep results in human format.
fn output_sweep_result_human(value: &serde_json::Value, _args: &BicodeArgs) -> Result<()> {
    if let Some(obj) = value.as_object() {
        println!("Sweep Results:");
        println!("══════════════");

        if let Some(rows) = obj.get("by_max_length").and_then(|r| r.as_array()) {
            println!(
                "{:>4} {:>8} {:>8} {:>8} {:>8}",
                "M", "codes", "bij", "not", "width"
            );
            for row in rows {
                let field = |name: &str| row.get(name).and_then(|v| v.as_u64()).unwrap_or(0);
                println!(
                    "{:>4} {:>8} {:>8} {:>8} {:>8}",
                    field("max_length"),
                    field("codes"),
                    field("is_bijective"),
                    field("not_bijective"),
                    field("width_out")
                );
            }
        }

        println!();
        if let Some(total) = obj.get("codes_checked").and_then(|t| t.as_u64()) {
            println!("Codes checked: {total}");
        }
        if let Some(violations) = obj.get("mcmillan_violations").and_then(|v| v.as_array()) {
            println!("McMillan violations: {}", violations.len());
            for code in violations {
                println!("  {}", format_value(code));
            }
        }
        if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
            println!("Sweep time: {duration}ms");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value, _args: &BicodeArgs) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BicodeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(&serde_json::Value::String("test".to_string())),
            "test"
        );
        assert_eq!(
            format_value(&serde_json::Value::Number(serde_json::Number::from(42))),
            "42"
        );
        assert_eq!(format_value(&serde_json::json!([0, 2])), "[0, 2]");
        assert_eq!(format_value(&serde_json::Value::Null), "null");
    }

    #[test]
    fn test_check_result_spells_out_witnesses() {
        let alphabet = Alphabet::new(["0", "01", "10"]).unwrap();
        let pair = WitnessPair {
            witness_a: vec![0, 2],
            witness_b: vec![1, 0],
        };
        let result = CheckResult::new(
            "scheme.txt".to_string(),
            &alphabet,
            "NOT_BIJECTIVE",
            Some(&pair),
            CheckStats::default(),
        );

        let a = result.witness_a.as_ref().unwrap();
        assert_eq!(a.ids, vec![0, 2]);
        assert_eq!(a.codewords, vec!["0", "10"]);
        assert_eq!(result.witness_b.as_ref().unwrap().codewords, vec!["01", "0"]);
        assert_eq!(result.encoding.as_deref(), Some("010"));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["verdict"], "NOT_BIJECTIVE");
        assert_eq!(value["witness_b"]["ids"], serde_json::json!([1, 0]));
    }

    #[test]
    fn test_check_result_without_witnesses() {
        let alphabet = Alphabet::new(["0", "1"]).unwrap();
        let result = CheckResult::new(
            "scheme.json".to_string(),
            &alphabet,
            "IS_BIJECTIVE",
            None,
            CheckStats::default(),
        );
        assert!(result.witness_a.is_none());
        assert!(result.encoding.is_none());
    }
}
