//! End-of-run statistics.

use console::style;

use crate::download::PipelineSummary;

/// Print the statistics block after the pipeline has finished.
pub fn print_run_stats(summary: &PipelineSummary) {
    let snapshot = &summary.progress;

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    println!(
        "  Products:   {} of {}",
        snapshot.products_processed, snapshot.products_total
    );
    println!(
        "  Categories: {} of {}",
        snapshot.categories_processed, snapshot.categories_total
    );
    println!("  Scheduled:  {} images", snapshot.images_added);
    println!("  Downloaded: {} images", style(snapshot.images_succeeded).green());
    if snapshot.images_failed > 0 {
        println!("  Failed:     {} images", style(snapshot.images_failed).red());
    }
    for failure in &summary.producer_failures {
        println!("  {} {}", style("Aborted:").red(), failure);
    }
    if summary.cancelled {
        println!("  {}", style("Interrupted before completion").yellow());
    }
    println!("  Elapsed:    {:.1}s", summary.elapsed.as_secs_f64());
    println!("{}", style("═".repeat(50)).dim());
}
