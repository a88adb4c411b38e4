use thiserror::Error;

/// Failure modes of a scrape run.
///
/// `ListingShape`, `MovieNotFound` and `RankJoin` mean the upstream page
/// structure no longer matches the parser's assumptions or a data invariant
/// broke; all of them abort the run. Missing per-field data (budget, rating,
/// box-office table) is not an error and is handled with "N/A" sentinels.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("got status {status} fetching {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("listing page did not parse: {0}")]
    ListingShape(String),

    #[error("got no summary link for movie: {0:?}")]
    MovieNotFound(String),

    #[error("rank join violation: {0}")]
    RankJoin(String),
}
