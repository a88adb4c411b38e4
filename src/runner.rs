use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use crate::error::ScrapeError;
use crate::listing::MovieListingRow;
use crate::scraper::{MovieData, MovieScraper};

/// Drive the per-movie cascade over all listing rows with a bounded pool of
/// worker threads.
///
/// Workers pull movies from a shared queue and push finished results into a
/// shared vec; the root listing HTML is shared read-only. Completion order
/// is not the listing order — the aggregator re-sorts by rank. The first
/// fatal error drains the queue so idle workers stop picking up new movies,
/// and the run fails with that error.
pub fn scrape_all(
    scraper: &MovieScraper,
    root_html: &str,
    movies: &[MovieListingRow],
    max_workers: usize,
) -> Result<Vec<MovieData>, ScrapeError> {
    let workers = max_workers.min(movies.len()).max(1);
    let queue: Mutex<VecDeque<&MovieListingRow>> = Mutex::new(movies.iter().collect());
    let results: Mutex<Vec<MovieData>> = Mutex::new(Vec::with_capacity(movies.len()));
    let failure: Mutex<Option<ScrapeError>> = Mutex::new(None);

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| loop {
                let movie = match queue.lock().unwrap().pop_front() {
                    Some(movie) => movie,
                    None => break,
                };
                match scraper.scrape_movie(root_html, movie) {
                    Ok(data) => results.lock().unwrap().push(data),
                    Err(e) => {
                        let mut failure = failure.lock().unwrap();
                        if failure.is_none() {
                            *failure = Some(e);
                        }
                        queue.lock().unwrap().clear();
                        break;
                    }
                }
            });
        }
    });

    if let Some(e) = failure.into_inner().unwrap() {
        return Err(e);
    }
    Ok(results.into_inner().unwrap())
}
