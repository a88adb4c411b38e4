use std::error::Error;
use std::num::NonZeroUsize;
use std::time::Instant;

use clap::Parser;
use log::info;

use movie_scraper::aggregator::{self, ReportRow};
use movie_scraper::fetcher::{Fetcher, ROOT_LINK};
use movie_scraper::scraper::MovieScraper;
use movie_scraper::{listing, logger, runner};

/// Scrape budget, MPAA rating and daily box-office figures for a year's
/// top-grossing movies and write them to a single sorted CSV report.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Year whose top-grossing listing is scraped
    #[arg(long, default_value_t = 2022)]
    year: u16,

    /// Maximum number of movies fetched concurrently
    #[arg(long, default_value = "100")]
    workers: NonZeroUsize,
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();
    let started = Instant::now();
    info!(
        "Starting scrape for year {} using up to {} workers",
        cli.year, cli.workers
    );

    let fetcher = Fetcher::new()?;
    let root_html = fetcher.get(&format!("/market/{}/top-grossing-movies", cli.year))?;
    let movies = listing::parse_listing(&root_html)?;
    info!(
        "Scraping movie data for {} movies from {}",
        movies.len(),
        ROOT_LINK
    );

    let scraper = MovieScraper::new(fetcher);
    let results = runner::scrape_all(&scraper, &root_html, &movies, cli.workers.get())?;

    let mut details = Vec::with_capacity(results.len());
    let mut box_office = Vec::new();
    for data in results {
        details.push(data.detail);
        box_office.extend(data.box_office);
    }

    let report = aggregator::aggregate(&movies, details, box_office)?;
    let out_path = format!("top_grossing_{}_movies.csv", cli.year);
    write_report(&report, &out_path)?;
    info!("Wrote {} rows to {}", report.len(), out_path);
    info!(
        "Script completed successfully in {:.1} seconds!",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn write_report(rows: &[ReportRow], path: &str) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
