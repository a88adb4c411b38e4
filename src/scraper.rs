use log::info;

use crate::error::ScrapeError;
use crate::extractor::{BoxOfficeRow, Extractor, MovieDetail};
use crate::fetcher::Fetcher;
use crate::listing::MovieListingRow;

const SUMMARY_TAB: &str = "#tab=summary";
const BOX_OFFICE_TAB: &str = "#tab=box-office";

/// Everything one worker gathers for a single movie.
#[derive(Debug)]
pub struct MovieData {
    pub detail: MovieDetail,
    pub box_office: Vec<BoxOfficeRow>,
}

/// Per-movie fetch-and-extract cascade: summary link → summary page
/// (budget, rating) → box-office page (daily table).
pub struct MovieScraper {
    fetcher: Fetcher,
    extractor: Extractor,
}

impl MovieScraper {
    pub fn new(fetcher: Fetcher) -> Self {
        MovieScraper {
            fetcher,
            extractor: Extractor::new(),
        }
    }

    /// Gather budget, rating and box-office rows for one listing entry.
    ///
    /// The summary link must be locatable in the root listing HTML and both
    /// subpage fetches must succeed; those failures abort the run. Missing
    /// fields on a fetched page degrade to "N/A".
    pub fn scrape_movie(
        &self,
        root_html: &str,
        movie: &MovieListingRow,
    ) -> Result<MovieData, ScrapeError> {
        info!("Gathering data for movie: {:?}", movie.title);

        let summary_endpoint = self.extractor.summary_endpoint(root_html, &movie.title)?;
        let summary_html = self.fetcher.get(&summary_endpoint)?;
        let budget = self.extractor.budget(&movie.title, &summary_html);
        let rating = self.extractor.rating(&movie.title, &summary_html);

        // The box-office page lives at the same endpoint under another tab.
        let box_office_endpoint = summary_endpoint.replace(SUMMARY_TAB, BOX_OFFICE_TAB);
        let box_office_html = self.fetcher.get(&box_office_endpoint)?;
        let box_office = self
            .extractor
            .box_office(&movie.title, movie.rank, &box_office_html);

        info!("Finished gathering data for movie: {:?}", movie.title);
        Ok(MovieData {
            detail: MovieDetail {
                rank: movie.rank,
                budget,
                rating,
            },
            box_office,
        })
    }
}
