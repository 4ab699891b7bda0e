//! Extractive summarization of entry bodies.
//!
//! The primary strategy is TextRank-style graph centrality: sentences become
//! graph nodes, normalized word overlap becomes edge weight, and a damped
//! power iteration scores each sentence. The top-scored sentences are then
//! re-ordered to their original position so the summary reads naturally.
//!
//! Any failure in the primary strategy degrades to a simple fallback (first
//! N sentences, or a character-budget truncation) and is never surfaced to
//! the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use tracing::debug;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Character budget for the last-resort truncation fallback.
const TRUNCATE_BUDGET: usize = 280;

/// Damping factor for the centrality power iteration.
const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 50;
const CONVERGENCE_EPS: f64 = 1e-6;

/// Failure of the primary ranking strategy. Consumed internally by
/// [`summarize`]; callers only ever see the degraded output.
#[derive(Debug, PartialEq, Eq)]
pub enum SummarizeError {
    /// No two sentences share any vocabulary, so the similarity graph has
    /// no edges and centrality is undefined.
    DegenerateGraph,
    /// The power iteration produced a non-finite score.
    UnstableScores,
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizeError::DegenerateGraph => write!(f, "sentence similarity graph has no edges"),
            SummarizeError::UnstableScores => write!(f, "centrality iteration diverged"),
        }
    }
}

impl Error for SummarizeError {}

/// Reduce `text` to at most `sentences` representative sentences, preserving
/// their original order.
///
/// Empty input yields the empty string without invoking either strategy.
/// A failure of the ranking strategy silently falls back to taking the first
/// `sentences` fragments, then to truncating the raw text; this function
/// never panics or errors past the fallback.
pub fn summarize(text: &str, sentences: usize) -> String {
    let text = text.trim();
    if text.is_empty() || sentences == 0 {
        return String::new();
    }
    match textrank(text, sentences) {
        Ok(summary) => summary,
        Err(e) => {
            debug!(error = %e, "extractive ranking unavailable; using fallback");
            fallback_summary(text, sentences)
        }
    }
}

/// TextRank over the sentence similarity graph.
fn textrank(text: &str, sentences: usize) -> Result<String, SummarizeError> {
    let sents = split_sentences(text);
    let n = sents.len();
    if n <= sentences {
        return Ok(sents.join(" "));
    }

    let vocab: Vec<HashSet<String>> = sents.iter().map(|s| tokenize(s)).collect();

    // Symmetric similarity matrix: word overlap normalized by sentence length.
    let mut weights = vec![vec![0.0f64; n]; n];
    let mut total = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let w = similarity(&vocab[i], &vocab[j]);
            weights[i][j] = w;
            weights[j][i] = w;
            total += w;
        }
    }
    if total == 0.0 {
        return Err(SummarizeError::DegenerateGraph);
    }

    let out_sums: Vec<f64> = (0..n).map(|i| weights[i].iter().sum()).collect();

    // Damped power iteration over the weighted graph.
    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![(1.0 - DAMPING) / n as f64; n];
        for i in 0..n {
            for j in 0..n {
                if weights[j][i] > 0.0 && out_sums[j] > 0.0 {
                    next[i] += DAMPING * weights[j][i] / out_sums[j] * scores[j];
                }
            }
        }
        let delta: f64 = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .sum();
        scores = next;
        if delta < CONVERGENCE_EPS {
            break;
        }
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(SummarizeError::UnstableScores);
    }

    // Top-scored sentences, re-ordered to their source position.
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    let mut selected: Vec<usize> = ranked.into_iter().take(sentences).collect();
    selected.sort_unstable();

    Ok(selected
        .into_iter()
        .map(|i| sents[i].as_str())
        .collect::<Vec<_>>()
        .join(" "))
}

/// Fallback: join the first `sentences` fragments; if the split yields
/// nothing, truncate the raw text to a fixed character budget.
fn fallback_summary(text: &str, sentences: usize) -> String {
    let parts = split_sentences(text);
    let joined = parts
        .iter()
        .take(sentences)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }
    truncate_chars(text, TRUNCATE_BUDGET)
}

fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut out: String = text.chars().take(budget).collect();
    out.push('…');
    out
}

/// Split text into sentence fragments on terminal punctuation (`.`, `!`,
/// `?`) followed by whitespace, keeping the punctuation with the fragment.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            let boundary = matches!(iter.peek(), Some(&(_, next)) if next.is_whitespace());
            if boundary {
                let frag = text[start..i + c.len_utf8()].trim();
                if !frag.is_empty() {
                    parts.push(frag.to_string());
                }
                start = text.len();
                while let Some(&(k, w)) = iter.peek() {
                    if w.is_whitespace() {
                        iter.next();
                    } else {
                        start = k;
                        break;
                    }
                }
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

fn tokenize(sentence: &str) -> HashSet<String> {
    WORD.find_iter(&sentence.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let overlap = a.intersection(b).count() as f64;
    if overlap == 0.0 {
        return 0.0;
    }
    let denom = (a.len() as f64).ln() + (b.len() as f64).ln();
    if denom <= 0.0 {
        return 0.0;
    }
    overlap / denom
}
