use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sentiment_compare::engine::{rank_products, summary, BuildOptions};
use sentiment_compare::models::parse_product_list;
use sentiment_compare::service::ComparisonService;
use sentiment_compare::source::ReviewDataset;

/// Compare products offline against a review dataset.
#[derive(Parser)]
#[command(name = "compare")]
#[command(about = "Rank 2-5 products by aggregated review sentiment", long_about = None)]
struct Cli {
    /// Product names, 2 to 5
    #[arg(required = true)]
    products: Vec<String>,

    #[arg(long, default_value = "data/reviews_dataset.csv")]
    csv: PathBuf,

    /// Sample reviews per product in the JSON output
    #[arg(long, default_value_t = summary::DEFAULT_SAMPLE_REVIEWS)]
    samples: usize,

    /// Print the full comparison as JSON after the ranking
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dataset = ReviewDataset::load(&cli.csv)?;
    let products = parse_product_list(&cli.products)?;
    let service = ComparisonService::new(
        Arc::new(dataset),
        Duration::from_secs(10),
        BuildOptions {
            sample_reviews: cli.samples,
        },
    );

    let response = service.compare(products).await?;
    let comparison = &response.comparison;

    println!("{:<4} {:<32} {:>6}  {}", "#", "product", "score", "reviews");
    for (rank, product) in rank_products(&comparison.overall).into_iter().enumerate() {
        let score = if product.reviews_found {
            format!("{:.1}", product.score)
        } else {
            "-".to_string()
        };
        println!(
            "{:<4} {:<32} {:>6}  {}",
            rank + 1,
            product.name.as_str(),
            score,
            product.review_count
        );
    }
    println!();
    println!("Winner: {}", comparison.winner.as_str());

    for (name, strengths) in comparison.strengths.iter() {
        let weaknesses = comparison.weaknesses.get(name.as_str()).cloned().unwrap_or_default();
        if !strengths.is_empty() || !weaknesses.is_empty() {
            println!(
                "  {}: + [{}]  - [{}]",
                name,
                strengths.join(", "),
                weaknesses.join(", ")
            );
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&response).context("failed to render comparison")?;
        println!("{}", json);
    }

    Ok(())
}
