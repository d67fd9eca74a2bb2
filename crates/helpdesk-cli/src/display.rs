//! Terminal output for classification results.

use helpdesk_ai::ClassificationResult;
use helpdesk_core::Category;

use crate::batch::BatchStats;

const MAX_LINE_CHARS: usize = 60;

pub fn print_result(result: &ClassificationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        println!("{} (via {})", result.category, result.source);
    }
    Ok(())
}

pub fn print_batch(stats: &BatchStats) {
    for (line, r) in &stats.results {
        println!("{:<15} {:<9} {}", r.category, r.source, truncate(line));
    }

    let total = stats.results.len();
    println!();
    println!("=== {total} tickets in {:.2}s ===", stats.elapsed_secs);
    for category in Category::ALL {
        let n = stats.by_category.get(&category).copied().unwrap_or(0);
        println!("  {:<18} {n:>6}  {}", category.label(), percent(n, total));
    }

    let mut sources: Vec<_> = stats.by_source.iter().collect();
    sources.sort_by_key(|(s, _)| s.as_str());
    let rendered: Vec<String> = sources.iter().map(|(s, n)| format!("{s}={n}")).collect();
    println!("  by stage: {}", rendered.join(" "));
}

fn percent(n: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", n as f64 / total as f64 * 100.0)
}

fn truncate(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_CHARS {
        return line.to_string();
    }
    let head: String = line.chars().take(MAX_LINE_CHARS - 1).collect();
    format!("{head}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(percent(1, 4), "25.0%");
        assert_eq!(percent(0, 0), "-");
    }

    #[test]
    fn long_lines_are_truncated() {
        let long = "x".repeat(100);
        let t = truncate(&long);
        assert_eq!(t.chars().count(), MAX_LINE_CHARS);
        assert!(t.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
