// Colored terminal output for corpus stats, metric tables and topics.
//
// This module handles all terminal-specific formatting. The main.rs
// subcommands delegate here.

use colored::Colorize;

use crate::corpus::stats::{format_bytes, CorpusStats};
use crate::pipeline::fit::FitReport;
use crate::selection::metrics::Direction;
use crate::selection::SelectionTable;

/// Display corpus statistics.
pub fn display_stats(stats: &CorpusStats, input: &str) {
    match stats.input_bytes {
        Some(bytes) => println!("Input: {} ({})", input, format_bytes(bytes)),
        None => println!("Input: {}", input),
    }
    println!("Documents: {}", stats.documents);
    println!(
        "Tokens: {} total, {:.1} per document",
        stats.total_tokens, stats.mean_tokens
    );
    println!("Vocabulary: {} terms", stats.vocabulary_size);
    if stats.empty_documents > 0 {
        println!(
            "  {} {} documents have no tokens after normalization",
            "~".yellow(),
            stats.empty_documents
        );
    }
}

/// Display the (metric, k) table from a topic-count sweep.
pub fn display_selection(table: &SelectionTable) {
    println!(
        "\n{}",
        format!(
            "=== Topic-count metrics ({} candidates) ===",
            table.candidates.len()
        )
        .bold()
    );
    println!();

    let mut header = format!("  {:>4}", "k".dimmed());
    for metric in &table.metrics {
        let arrow = match metric.direction() {
            Direction::Maximize => "↑",
            Direction::Minimize => "↓",
        };
        header.push_str(&format!(
            "  {:>16}",
            format!("{} {}", metric.name(), arrow).dimmed()
        ));
    }
    println!("{header}");
    println!("  {}", "-".repeat(6 + 18 * table.metrics.len()).dimmed());

    for candidate in &table.candidates {
        let mut line = format!("  {:>4}", candidate.k);
        if let Some(error) = &candidate.error {
            line.push_str(&format!("  {}", error.red()));
        } else {
            for metric in &table.metrics {
                match candidate.scores.get(metric) {
                    Some(score) => line.push_str(&format!("  {:>16.4}", score)),
                    None => line.push_str(&format!("  {:>16}", "-".dimmed())),
                }
            }
        }
        println!("{line}");
    }

    println!();
    println!(
        "  {}",
        "↑ higher is better, ↓ lower is better. Pick k where the curves agree.".dimmed()
    );
}

/// Display topics as bar charts of their top terms, plus topic sizes.
pub fn display_topics(report: &FitReport) {
    println!(
        "\n{}",
        format!(
            "=== {} topics (seed {}, {} documents) ===",
            report.k,
            report.seed,
            report.dominant_topics.len()
        )
        .bold()
    );

    let bar_width: usize = 20;

    for (topic, terms) in report.top_terms.iter().enumerate() {
        let size = report.topic_sizes.get(topic).copied().unwrap_or(0);
        println!();
        println!(
            "  {} {}",
            format!("Topic {}", topic + 1).bold(),
            format!("({size} documents)").dimmed()
        );

        let max_beta = terms.first().map_or(0.0, |t| t.beta);
        for term in terms {
            let filled = if max_beta > 0.0 {
                ((term.beta / max_beta) * bar_width as f64).round() as usize
            } else {
                0
            };
            let bar = format!(
                "[{}{}]",
                "=".repeat(filled),
                " ".repeat(bar_width.saturating_sub(filled))
            );
            println!("    {:<18} {} {:.4}", term.term, colorize_bar(&bar, topic), term.beta);
        }
    }
}

/// Display the heaviest word-cloud terms on one line.
pub fn display_word_cloud(report: &FitReport, limit: usize) {
    if report.word_cloud.is_empty() {
        return;
    }
    let words: Vec<String> = report
        .word_cloud
        .iter()
        .take(limit)
        .map(|(term, weight)| format!("{term} ({weight:.3})"))
        .collect();
    println!("\n  {} {}", "Key terms:".bold(), words.join(", ").dimmed());
}

/// Display a few documents per topic with their dominant weight.
pub fn display_documents(report: &FitReport, per_topic: usize) {
    for topic in 0..report.k {
        let mut docs: Vec<_> = report
            .dominant_topics
            .iter()
            .filter(|d| d.topic == topic)
            .collect();
        if docs.is_empty() {
            continue;
        }
        docs.sort_by(|a, b| b.gamma.total_cmp(&a.gamma));
        let names: Vec<String> = docs
            .iter()
            .take(per_topic)
            .map(|d| format!("{} ({:.2})", super::truncate_chars(&d.document, 40), d.gamma))
            .collect();
        println!("  Topic {}: {}", topic + 1, names.join("; ").dimmed());
    }
}

/// Cycle bar colors so adjacent topics are easy to tell apart.
fn colorize_bar(bar: &str, topic: usize) -> colored::ColoredString {
    match topic % 4 {
        0 => bar.bright_green(),
        1 => bar.bright_yellow(),
        2 => bar.bright_blue(),
        _ => bar.bright_magenta(),
    }
}
