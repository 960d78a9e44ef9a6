use std::path::Path;

use anyhow::Result;

use dataset::{load_reviews, sample_data, star_distribution};
use eval::{approaches, print_comparison, print_details, run_approach, save_report, HarnessOptions};
use llm::{LlmClient, LlmConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Review Rating Evaluation ===\n");

    // Dataset: path argument, or the built-in sample set
    let reviews = match std::env::args().nth(1) {
        Some(path) => load_reviews(Path::new(&path))?,
        None => {
            println!("No dataset path given, using built-in sample data");
            sample_data()
        }
    };

    println!("Dataset: {} reviews", reviews.len());
    let distribution = star_distribution(&reviews);
    for (stars, count) in distribution.iter().enumerate() {
        println!("  {} star: {}", stars + 1, count);
    }
    println!();

    let client = LlmClient::new(LlmConfig::from_env())?;
    let options = HarnessOptions::default();

    let mut results = Vec::new();
    for (name, template) in approaches() {
        println!("→ Testing {name}");
        let result = run_approach(&client, &reviews, template, name, &options).await;
        println!(
            "  Valid JSON: {:.1}%  Accuracy: {:.1}%\n",
            result.json_validity_rate, result.accuracy
        );
        results.push(result);
    }

    print_comparison(&results);
    print_details(&results);

    save_report(&results, "eval_results.json", "EVAL.md")?;
    println!("\n✅ Results saved to eval_results.json and EVAL.md");

    Ok(())
}
