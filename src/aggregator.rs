use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ScrapeError;
use crate::extractor::{BoxOfficeRow, MovieDetail, NO_DATA};
use crate::listing::MovieListingRow;

/// Final report row, serialized in CSV column order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Movie")]
    pub movie: String,
    #[serde(rename = "Production Budget")]
    pub production_budget: String,
    #[serde(rename = "MPAA Rating")]
    pub mpaa_rating: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Gross")]
    pub gross: String,
    #[serde(rename = "Theaters")]
    pub theaters: String,
    #[serde(rename = "Days")]
    pub days: String,
}

// Budget/rating joined onto a listing row, keyed by rank.
struct MovieRecord<'a> {
    title: &'a str,
    genre: &'a str,
    budget: String,
    rating: String,
}

// Date forms seen in the box-office tables, plus ISO.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];

/// Secondary sort key for the Date column. Parseable dates order
/// chronologically before any unparseable value; unparseable values
/// (including the "N/A" sentinel) compare by literal string among
/// themselves.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Date(NaiveDate),
    Literal(String),
}

fn date_key(date: &str) -> DateKey {
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, fmt) {
            return DateKey::Date(parsed);
        }
    }
    DateKey::Literal(date.to_string())
}

/// Merge per-movie details and box-office rows against the listing into the
/// final sorted report.
///
/// Both joins are strict many-to-one on rank: every listing row must pair
/// with exactly one detail record, and every box-office row's rank must
/// resolve to exactly one movie. A miss on either side is a data-consistency
/// bug and fails the run.
pub fn aggregate(
    listing: &[MovieListingRow],
    details: Vec<MovieDetail>,
    box_office: Vec<BoxOfficeRow>,
) -> Result<Vec<ReportRow>, ScrapeError> {
    let mut by_rank: HashMap<u32, MovieDetail> = HashMap::with_capacity(details.len());
    for detail in details {
        let rank = detail.rank;
        if by_rank.insert(rank, detail).is_some() {
            return Err(ScrapeError::RankJoin(format!(
                "more than one detail record for rank {rank}"
            )));
        }
    }

    let mut movies: HashMap<u32, MovieRecord> = HashMap::with_capacity(listing.len());
    for row in listing {
        let detail = by_rank.remove(&row.rank).ok_or_else(|| {
            ScrapeError::RankJoin(format!("no detail record for listed rank {}", row.rank))
        })?;
        let record = MovieRecord {
            title: &row.title,
            genre: &row.genre,
            budget: detail.budget,
            rating: detail.rating,
        };
        if movies.insert(row.rank, record).is_some() {
            return Err(ScrapeError::RankJoin(format!(
                "rank {} appears twice in the listing",
                row.rank
            )));
        }
    }
    if let Some(rank) = by_rank.keys().next() {
        return Err(ScrapeError::RankJoin(format!(
            "detail record for rank {rank} has no listing row"
        )));
    }

    let mut report = Vec::with_capacity(box_office.len());
    for row in box_office {
        let movie = movies.get(&row.rank).ok_or_else(|| {
            ScrapeError::RankJoin(format!("box-office row for unknown rank {}", row.rank))
        })?;
        report.push(ReportRow {
            rank: row.rank,
            movie: movie.title.to_string(),
            production_budget: movie.budget.clone(),
            mpaa_rating: movie.rating.clone(),
            genre: movie.genre.to_string(),
            date: row.date,
            gross: row.gross,
            theaters: row.theaters,
            days: coerce_days(&row.days),
        });
    }

    report.sort_by_cached_key(|row| (row.rank, date_key(&row.date)));
    Ok(report)
}

// Days cells come out of the table as floats once empty cells are filled;
// the report carries them as whole numbers. "N/A" passes through.
fn coerce_days(days: &str) -> String {
    if days == NO_DATA {
        return days.to_string();
    }
    match days.parse::<f64>() {
        Ok(value) => format!("{}", value as i64),
        Err(_) => days.to_string(),
    }
}
