//! Codes with a planted ambiguity.
//!
//! A random seed bit string is cut into codewords in two different ways. The
//! pieces of both cuts form the alphabet, so the two decompositions are
//! distinct messages with the same encoding, and the grammar accepts both.

use rand::Rng;

use crate::code::CodewordId;
use crate::error::Result;
use crate::grammar::CodeStateMachine;

const SEED_MIN_LENGTH: usize = 2;
const SEED_MAX_LENGTH: usize = 10;

/// A non-bijective code together with the ambiguity it was built from.
#[derive(Debug, Clone)]
pub struct UnbijectiveCode {
    /// The seed both decompositions encode.
    pub seed: String,
    /// Distinct codewords, in order of first appearance.
    pub alphabet: Vec<String>,
    /// First decomposition of the seed, as codeword ids.
    pub decomposition_a: Vec<CodewordId>,
    /// Second decomposition of the seed, as codeword ids.
    pub decomposition_b: Vec<CodewordId>,
    /// Grammar accepting exactly the two decompositions.
    pub grammar: CodeStateMachine,
}

/// Random code with a known pair of synonymous messages.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use bicode::code::Alphabet;
/// use bicode::generator::generate_unbijective;
/// use bicode::grammar::Grammar;
///
/// let generated = generate_unbijective(&mut StdRng::seed_from_u64(5)).unwrap();
/// let alphabet = Alphabet::new(&generated.alphabet).unwrap();
/// assert_ne!(generated.decomposition_a, generated.decomposition_b);
/// assert_eq!(alphabet.encode(&generated.decomposition_a).unwrap(), generated.seed);
/// assert_eq!(alphabet.encode(&generated.decomposition_b).unwrap(), generated.seed);
/// assert!(generated.grammar.is_recognized(&generated.decomposition_a));
/// ```
pub fn generate_unbijective<R: Rng + ?Sized>(rng: &mut R) -> Result<UnbijectiveCode> {
    let length = rng.random_range(SEED_MIN_LENGTH..=SEED_MAX_LENGTH);
    let seed: String = (0..length)
        .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
        .collect();

    // cuts[i]: a codeword boundary sits between bit i and bit i + 1.
    let cuts_a: Vec<bool> = (0..length - 1).map(|_| rng.random_bool(0.5)).collect();
    let mut cuts_b: Vec<bool> = (0..length - 1).map(|_| rng.random_bool(0.5)).collect();
    if cuts_a == cuts_b {
        let flip = rng.random_range(0..length - 1);
        cuts_b[flip] = !cuts_b[flip];
    }

    let mut alphabet = Vec::new();
    let decomposition_a = split(&seed, &cuts_a, &mut alphabet);
    let decomposition_b = split(&seed, &cuts_b, &mut alphabet);
    let grammar = accepting_exactly(&[decomposition_a.as_slice(), decomposition_b.as_slice()])?;

    Ok(UnbijectiveCode {
        seed,
        alphabet,
        decomposition_a,
        decomposition_b,
        grammar,
    })
}

/// Cut `seed` at `cuts`, registering new pieces in `alphabet`.
fn split(seed: &str, cuts: &[bool], alphabet: &mut Vec<String>) -> Vec<CodewordId> {
    let mut word = Vec::new();
    let mut start = 0;
    for end in 1..=seed.len() {
        if end < seed.len() && !cuts[end - 1] {
            continue;
        }
        let piece = &seed[start..end];
        let id = match alphabet.iter().position(|c| c == piece) {
            Some(id) => id,
            None => {
                alphabet.push(piece.to_string());
                alphabet.len() - 1
            }
        };
        word.push(id);
        start = end;
    }
    word
}

/// Grammar whose messages are exactly `words`: a trie of the words whose
/// last transitions all lead to one accepting state. No word may be a
/// proper prefix of another.
fn accepting_exactly(words: &[&[CodewordId]]) -> Result<CodeStateMachine> {
    // Inner trie nodes; node 0 is the start state.
    let mut children: Vec<Vec<(CodewordId, Option<usize>)>> = vec![Vec::new()];
    for word in words {
        let mut node = 0;
        for (i, &codeword) in word.iter().enumerate() {
            let last = i + 1 == word.len();
            let existing = children[node]
                .iter()
                .find(|(c, _)| *c == codeword)
                .map(|(_, to)| *to);
            node = match existing {
                Some(Some(next)) if !last => next,
                Some(_) => break,
                None if last => {
                    children[node].push((codeword, None));
                    break;
                }
                None => {
                    children.push(Vec::new());
                    let next = children.len() - 1;
                    children[node].push((codeword, Some(next)));
                    next
                }
            };
        }
    }

    let end = children.len();
    let transitions = children.iter().enumerate().flat_map(|(from, edges)| {
        edges
            .iter()
            .map(move |&(codeword, to)| (from, to.unwrap_or(end), codeword))
    });
    CodeStateMachine::from_transitions(end + 1, transitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Alphabet;
    use crate::grammar::Grammar;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_split() {
        let mut alphabet = Vec::new();
        let word = split("0110", &[true, false, true], &mut alphabet);
        assert_eq!(alphabet, vec!["0", "11"]);
        assert_eq!(word, vec![0, 1, 0]);

        let word = split("0110", &[false, false, false], &mut alphabet);
        assert_eq!(word, vec![2]);
        assert_eq!(alphabet[2], "0110");
    }

    #[test]
    fn test_accepting_exactly() {
        let grammar = accepting_exactly(&[&[0, 1, 2], &[0, 2], &[3]]).unwrap();
        assert!(grammar.is_recognized(&[0, 1, 2]));
        assert!(grammar.is_recognized(&[0, 2]));
        assert!(grammar.is_recognized(&[3]));
        assert!(!grammar.is_recognized(&[0, 1]));
        assert!(!grammar.is_recognized(&[0]));
        assert!(!grammar.is_recognized(&[]));
    }

    #[test]
    fn test_generated_ambiguities() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let generated = generate_unbijective(&mut rng).unwrap();
            let alphabet = Alphabet::new(&generated.alphabet).unwrap();

            assert!((SEED_MIN_LENGTH..=SEED_MAX_LENGTH).contains(&generated.seed.len()));
            assert_ne!(generated.decomposition_a, generated.decomposition_b);
            for word in [&generated.decomposition_a, &generated.decomposition_b] {
                assert_eq!(alphabet.encode(word).unwrap(), generated.seed);
                assert!(generated.grammar.is_recognized(word));
            }

            let mut unique = generated.alphabet.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), generated.alphabet.len());
        }
    }
}
