use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::extractor::cell_text;

/// One row of the year's top-grossing table, in listing order.
#[derive(Debug, Clone)]
pub struct MovieListingRow {
    pub rank: u32,
    pub title: String,
    pub genre: String,
}

// The listing table always ends with two summary rows (totals, averages).
const FOOTER_ROWS: usize = 2;

/// Parse the first table on the listing page into ranked movie rows.
///
/// The header row is matched by column name, so extra columns are fine but a
/// renamed `Rank`/`Movie`/`Genre` column is fatal. Beyond that there is no
/// schema validation; if the table shape drifts upstream this produces wrong
/// data rather than an error.
pub fn parse_listing(html: &str) -> Result<Vec<MovieListingRow>, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let header_sel = Selector::parse("th, td").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::ListingShape("no table on listing page".into()))?;

    let mut rows = table.select(&row_sel);
    let header = rows
        .next()
        .ok_or_else(|| ScrapeError::ListingShape("listing table has no rows".into()))?;
    let headers: Vec<String> = header.select(&header_sel).map(cell_text).collect();

    let rank_idx = column(&headers, "Rank")?;
    let movie_idx = column(&headers, "Movie")?;
    let genre_idx = column(&headers, "Genre")?;

    let mut raw: Vec<Vec<String>> = Vec::new();
    for tr in rows {
        let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
        if !cells.is_empty() {
            raw.push(cells);
        }
    }
    raw.truncate(raw.len().saturating_sub(FOOTER_ROWS));

    let mut movies = Vec::with_capacity(raw.len());
    for cells in raw {
        let rank_text = cell(&cells, rank_idx)?;
        let rank = rank_text.parse::<u32>().map_err(|_| {
            ScrapeError::ListingShape(format!("rank {rank_text:?} is not an integer"))
        })?;
        movies.push(MovieListingRow {
            rank,
            title: cell(&cells, movie_idx)?.to_string(),
            genre: cell(&cells, genre_idx)?.to_string(),
        });
    }
    Ok(movies)
}

fn column(headers: &[String], name: &str) -> Result<usize, ScrapeError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ScrapeError::ListingShape(format!("listing table has no {name:?} column")))
}

fn cell(cells: &[String], idx: usize) -> Result<&str, ScrapeError> {
    cells
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| ScrapeError::ListingShape(format!("listing row has no column {idx}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
        <table>
            <tr><th>Rank</th><th>Movie</th><th>Release Date</th><th>Genre</th><th>2022 Gross</th></tr>
            <tr><td>1</td><td>Top Gun: Maverick</td><td>May 27, 2022</td><td>Action</td><td>$718,732,821</td></tr>
            <tr><td>2</td><td>Black Panther: Wakanda Forever</td><td>Nov 11, 2022</td><td>Action</td><td>$453,829,060</td></tr>
            <tr><td>3</td><td>Avatar: The Way of Water</td><td>Dec 16, 2022</td><td>Adventure</td><td>$411,331,607</td></tr>
            <tr><td></td><td>Totals</td><td></td><td></td><td>$1,583,893,488</td></tr>
            <tr><td></td><td>Averages</td><td></td><td></td><td>$527,964,496</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn parses_rows_and_drops_footer() {
        let movies = parse_listing(LISTING).unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].rank, 1);
        assert_eq!(movies[0].title, "Top Gun: Maverick");
        assert_eq!(movies[0].genre, "Action");
        assert_eq!(movies[2].rank, 3);
        assert_eq!(movies[2].title, "Avatar: The Way of Water");
    }

    #[test]
    fn missing_column_is_fatal() {
        let html = "<table><tr><th>Rank</th><th>Movie</th></tr>\
                    <tr><td>1</td><td>A</td></tr>\
                    <tr><td>2</td><td>B</td></tr>\
                    <tr><td>3</td><td>C</td></tr></table>";
        let err = parse_listing(html).unwrap_err();
        assert!(matches!(err, ScrapeError::ListingShape(_)));
    }

    #[test]
    fn no_table_is_fatal() {
        let err = parse_listing("<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::ListingShape(_)));
    }

    #[test]
    fn unparseable_rank_is_fatal() {
        // Four data rows: after the two footer rows are dropped, the bad
        // rank is still inside the kept range.
        let html = "<table><tr><th>Rank</th><th>Movie</th><th>Genre</th></tr>\
                    <tr><td>1</td><td>A</td><td>Action</td></tr>\
                    <tr><td>x</td><td>B</td><td>Drama</td></tr>\
                    <tr><td></td><td>Totals</td><td></td></tr>\
                    <tr><td></td><td>Averages</td><td></td></tr></table>";
        let err = parse_listing(html).unwrap_err();
        assert!(matches!(err, ScrapeError::ListingShape(_)));
    }
}
