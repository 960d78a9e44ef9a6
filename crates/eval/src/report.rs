use anyhow::{Context, Result};

use crate::harness::ApproachResult;

/// Print the side-by-side comparison table for all approaches.
pub fn print_comparison(results: &[ApproachResult]) {
    println!("\n{}", "=".repeat(80));
    println!("COMPARISON");
    println!("{}", "=".repeat(80));
    println!(
        "{:<42} {:>8} {:>12} {:>10} {:>8}",
        "Approach", "Samples", "Valid JSON", "Accuracy", "Correct"
    );
    for result in results {
        println!(
            "{:<42} {:>8} {:>11.1}% {:>9.1}% {:>8}",
            result.approach,
            result.total_tested,
            result.json_validity_rate,
            result.accuracy,
            result.correct_predictions
        );
    }
}

/// Print per-approach detail with up to five sample predictions each.
pub fn print_details(results: &[ApproachResult]) {
    println!("\n{}", "=".repeat(80));
    println!("DETAILED ANALYSIS & SAMPLE PREDICTIONS");
    println!("{}", "=".repeat(80));

    for (i, result) in results.iter().enumerate() {
        println!("\n{}. {}", i + 1, result.approach);
        println!("{}", "-".repeat(70));

        for prediction in result.predictions.iter().take(5) {
            let status = if prediction.correct { "✓" } else { "✗" };
            println!(
                "\n  {} Actual: {} → Predicted: {}",
                status, prediction.actual, prediction.predicted
            );
            println!("     Review: {}", prediction.review_snippet);
            println!("     Reasoning: {}", prediction.explanation);
        }

        println!("\n  JSON Validity: {:.1}%", result.json_validity_rate);
        println!("  Accuracy: {:.1}%", result.accuracy);
    }
}

/// Write the full results JSON plus a markdown summary to disk.
pub fn save_report(results: &[ApproachResult], json_path: &str, markdown_path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("failed to serialize results")?;
    std::fs::write(json_path, json)
        .with_context(|| format!("failed to write {json_path}"))?;
    std::fs::write(markdown_path, render_markdown(results))
        .with_context(|| format!("failed to write {markdown_path}"))?;
    Ok(())
}

fn render_markdown(results: &[ApproachResult]) -> String {
    let mut out = String::from(
        "# Evaluation Results\n\n\
         | Approach | Samples | Valid JSON | Accuracy | Correct |\n\
         |----------|---------|------------|----------|---------|\n",
    );

    for result in results {
        out.push_str(&format!(
            "| {} | {} | {:.1}% | {:.1}% | {} |\n",
            result.approach,
            result.total_tested,
            result.json_validity_rate,
            result.accuracy,
            result.correct_predictions
        ));
    }

    out.push_str("\n## Sample Predictions\n");
    for result in results {
        out.push_str(&format!("\n### {}\n\n", result.approach));
        for prediction in result.predictions.iter().take(5) {
            let status = if prediction.correct { "✓" } else { "✗" };
            out.push_str(&format!(
                "- {} actual {} / predicted {} — {}\n",
                status, prediction.actual, prediction.predicted, prediction.explanation
            ));
        }
    }

    out
}
