use log::info;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Sentinel for a field that is intentionally absent upstream, as opposed
/// to a parsing failure.
pub const NO_DATA: &str = "N/A";

/// Budget and rating pulled from a movie's summary page.
#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub rank: u32,
    pub budget: String,
    pub rating: String,
}

/// One reporting date from a movie's box-office table, or the sentinel row
/// when the movie has no such table.
#[derive(Debug, Clone)]
pub struct BoxOfficeRow {
    pub rank: u32,
    pub date: String,
    pub gross: String,
    pub theaters: String,
    pub days: String,
}

impl BoxOfficeRow {
    fn sentinel(rank: u32) -> Self {
        BoxOfficeRow {
            rank,
            date: NO_DATA.into(),
            gross: NO_DATA.into(),
            theaters: NO_DATA.into(),
            days: NO_DATA.into(),
        }
    }
}

// Exact header sequence of the daily box-office table. The site writes the
// penultimate header with a non-breaking space.
const BOX_OFFICE_HEADERS: [&str; 9] = [
    "Date",
    "Rank",
    "Gross",
    "%YD",
    "%LW",
    "Theaters",
    "Per Theater",
    "Total\u{a0}Gross",
    "Days",
];

// Projected column positions within BOX_OFFICE_HEADERS.
const COL_DATE: usize = 0;
const COL_GROSS: usize = 2;
const COL_THEATERS: usize = 5;
const COL_DAYS: usize = 8;

/// Field extraction against the site's semi-structured markup.
///
/// One narrow method per field so that upstream drift means updating one
/// pattern, not the pipeline. Budget, rating and the box-office table are
/// tolerant of absence; the summary link is not, since without it nothing
/// else about the movie can be fetched.
pub struct Extractor {
    budget: Regex,
    rating: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            budget: Regex::new(r"Production&nbsp;Budget:.*(\$[0-9,]+)").unwrap(),
            rating: Regex::new(r"MPAA&nbsp;Rating:.*\n.+<a[^>]*>([^<]*)</a>").unwrap(),
        }
    }

    /// Locate the movie's summary-page link in the root listing markup.
    /// Listing titles may be truncated with a trailing ellipsis, in which
    /// case the anchor text is matched by prefix.
    pub fn summary_endpoint(&self, root_html: &str, title: &str) -> Result<String, ScrapeError> {
        let name = title.strip_suffix('…').unwrap_or(title);
        let pattern = format!(r#"<a href="([^"]*#tab=summary)">{}"#, regex::escape(name));
        let re = Regex::new(&pattern).unwrap();
        match re.captures(root_html) {
            Some(caps) => Ok(caps[1].to_string()),
            None => Err(ScrapeError::MovieNotFound(title.to_string())),
        }
    }

    pub fn budget(&self, title: &str, summary_html: &str) -> String {
        match self.budget.captures(summary_html) {
            Some(caps) => caps[1].to_string(),
            None => {
                info!("Got no budget for movie {:?}", title);
                NO_DATA.to_string()
            }
        }
    }

    pub fn rating(&self, title: &str, summary_html: &str) -> String {
        match self.rating.captures(summary_html) {
            Some(caps) => caps[1].to_string(),
            None => {
                info!("Got no rating for movie {:?}", title);
                NO_DATA.to_string()
            }
        }
    }

    /// Find the first table whose header sequence matches the daily
    /// box-office layout exactly and project it to date/gross/theaters/days,
    /// tagging every row with the movie's rank. Empty cells are filled with
    /// "0.0". No matching table yields a single sentinel row.
    pub fn box_office(&self, title: &str, rank: u32, html: &str) -> Vec<BoxOfficeRow> {
        let document = Html::parse_document(html);
        let table_sel = Selector::parse("table").unwrap();
        let row_sel = Selector::parse("tr").unwrap();
        let th_sel = Selector::parse("th").unwrap();
        let td_sel = Selector::parse("td").unwrap();

        for table in document.select(&table_sel) {
            let headers: Vec<String> = table.select(&th_sel).map(cell_text).collect();
            if headers != BOX_OFFICE_HEADERS {
                continue;
            }

            let mut rows = Vec::new();
            for tr in table.select(&row_sel) {
                let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
                if cells.len() != BOX_OFFICE_HEADERS.len() {
                    continue;
                }
                rows.push(BoxOfficeRow {
                    rank,
                    date: fill(&cells[COL_DATE]),
                    gross: fill(&cells[COL_GROSS]),
                    theaters: fill(&cells[COL_THEATERS]),
                    days: fill(&cells[COL_DAYS]),
                });
            }
            return rows;
        }

        info!("Got no Box Office data for movie: {:?}", title);
        vec![BoxOfficeRow::sentinel(rank)]
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn fill(cell: &str) -> String {
    if cell.is_empty() {
        "0.0".to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_from_summary_fragment() {
        let html = "<tr><td><b>Production&nbsp;Budget:</b></td>\
                    <td>$170,000,000 (worldwide box office is 4.2 times production budget)</td></tr>";
        let ex = Extractor::new();
        assert_eq!(ex.budget("Top Gun: Maverick", html), "$170,000,000");
    }

    #[test]
    fn missing_budget_is_sentinel() {
        let ex = Extractor::new();
        assert_eq!(ex.budget("Small Title", "<html><body>no label here</body></html>"), NO_DATA);
    }

    #[test]
    fn rating_from_summary_fragment() {
        let html = "<tr><td><b>MPAA&nbsp;Rating:</b></td>\n\
                    <td><a href=\"/market/mpaa-rating/PG-13-(US)\">PG-13</a> for some language</td></tr>";
        let ex = Extractor::new();
        assert_eq!(ex.rating("Top Gun: Maverick", html), "PG-13");
    }

    #[test]
    fn missing_rating_is_sentinel() {
        let ex = Extractor::new();
        assert_eq!(ex.rating("Small Title", "<html></html>"), NO_DATA);
    }

    #[test]
    fn summary_endpoint_by_exact_title() {
        let root = r#"<td><a href="/movie/Top-Gun-Maverick-(2022)#tab=summary">Top Gun: Maverick</a></td>"#;
        let ex = Extractor::new();
        let endpoint = ex.summary_endpoint(root, "Top Gun: Maverick").unwrap();
        assert_eq!(endpoint, "/movie/Top-Gun-Maverick-(2022)#tab=summary");
    }

    #[test]
    fn summary_endpoint_with_truncated_title() {
        let root = r#"<a href="/movie/Doctor-Strange#tab=summary">Doctor Strange in the Multiverse of Madness</a>"#;
        let ex = Extractor::new();
        let endpoint = ex
            .summary_endpoint(root, "Doctor Strange in the Multiv…")
            .unwrap();
        assert_eq!(endpoint, "/movie/Doctor-Strange#tab=summary");
    }

    #[test]
    fn unlocatable_movie_is_fatal() {
        let ex = Extractor::new();
        let err = ex.summary_endpoint("<html></html>", "Ghost Movie").unwrap_err();
        assert!(matches!(err, ScrapeError::MovieNotFound(_)));
    }

    const BOX_OFFICE_PAGE: &str = r#"<html><body>
        <table>
            <tr><th>Year</th><th>Gross</th></tr>
            <tr><td>2022</td><td>$718,732,821</td></tr>
        </table>
        <table>
            <tr><th>Date</th><th>Rank</th><th>Gross</th><th>%YD</th><th>%LW</th><th>Theaters</th><th>Per Theater</th><th>Total&nbsp;Gross</th><th>Days</th></tr>
            <tr><td>2022/05/27</td><td>1</td><td>$51,800,000</td><td>-</td><td>-</td><td>4,735</td><td>$10,940</td><td>$51,800,000</td><td>1</td></tr>
            <tr><td>2022/05/28</td><td>1</td><td>$38,500,000</td><td>-26%</td><td>-</td><td></td><td>$8,131</td><td>$90,300,000</td><td>2</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn box_office_table_by_exact_headers() {
        let ex = Extractor::new();
        let rows = ex.box_office("Top Gun: Maverick", 1, BOX_OFFICE_PAGE);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].date, "2022/05/27");
        assert_eq!(rows[0].gross, "$51,800,000");
        assert_eq!(rows[0].theaters, "4,735");
        assert_eq!(rows[0].days, "1");
        // Empty theater cell filled like the rest of the numeric columns.
        assert_eq!(rows[1].theaters, "0.0");
    }

    #[test]
    fn no_matching_table_yields_single_sentinel_row() {
        let html = "<table><tr><th>Date</th><th>Gross</th></tr>\
                    <tr><td>2022/05/27</td><td>$1</td></tr></table>";
        let ex = Extractor::new();
        let rows = ex.box_office("Small Title", 42, html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 42);
        assert_eq!(rows[0].date, NO_DATA);
        assert_eq!(rows[0].gross, NO_DATA);
        assert_eq!(rows[0].theaters, NO_DATA);
        assert_eq!(rows[0].days, NO_DATA);
    }
}
