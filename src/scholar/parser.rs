//! HTML parser for Scholar profile pages
//!
//! This module turns fetched markup into structured records:
//! - Publication rows from the `list_works` table
//! - The name, affiliation and citation metrics from the profile header
//!
//! Scholar's markup is an external, unstable contract. Everything that
//! depends on it lives in this file.

use crate::model::{ProfileHeader, Publication};
use crate::{Result, ScholarError};
use scraper::{ElementRef, Html, Selector};

const ROW_SELECTOR: &str = "#gsc_a_b .gsc_a_tr";
const TITLE_SELECTOR: &str = ".gsc_a_t a";
const DETAIL_SELECTOR: &str = ".gsc_a_t .gs_gray";
const YEAR_SELECTOR: &str = ".gsc_a_y";
const CITATIONS_SELECTOR: &str = ".gsc_a_c";

const NAME_SELECTOR: &str = "#gsc_prf_in";
const AFFILIATION_SELECTOR: &str = ".gsc_prf_il";
const STATS_SELECTOR: &str = "#gsc_rsb_st .gsc_rsb_std";

/// Metric cells are laid out row-major with an "All" and a "Since" column:
/// citations, h-index, i10-index.
const TOTAL_CITATIONS_CELL: usize = 0;
const H_INDEX_CELL: usize = 2;
/// All-time i10-index; earlier snapshots took cell 5 (the "Since" column)
const I10_INDEX_CELL: usize = 4;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScholarError::Selector(format!("{}: {:?}", css, e)))
}

/// Concatenated, trimmed text of every element matching `sel`
fn joined_text(scope: ElementRef<'_>, sel: &Selector) -> String {
    scope
        .select(sel)
        .map(|el| el.text().collect::<String>())
        .collect::<String>()
        .trim()
        .to_string()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Parses the publication rows of one `list_works` page
///
/// Rows without a title are skipped. Order follows the table.
///
/// # Example
///
/// ```
/// use scholar_snapshot::scholar::parse_publications;
///
/// let html = r#"<table><tbody id="gsc_a_b"><tr class="gsc_a_tr">
///   <td class="gsc_a_t"><a>Paper</a><div class="gs_gray">A Author</div><div class="gs_gray">Venue</div></td>
///   <td class="gsc_a_c">3</td><td class="gsc_a_y">2021</td>
/// </tr></tbody></table>"#;
/// let rows = parse_publications(html).unwrap();
/// assert_eq!(rows[0].title, "Paper");
/// ```
pub fn parse_publications(html: &str) -> Result<Vec<Publication>> {
    let document = Html::parse_document(html);

    let rows = selector(ROW_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;
    let detail_sel = selector(DETAIL_SELECTOR)?;
    let year_sel = selector(YEAR_SELECTOR)?;
    let citations_sel = selector(CITATIONS_SELECTOR)?;

    let mut publications = Vec::new();

    for row in document.select(&rows) {
        let title = joined_text(row, &title_sel);
        if title.is_empty() {
            continue;
        }

        let details: Vec<ElementRef<'_>> = row.select(&detail_sel).collect();
        let authors = details.first().map(|el| element_text(*el)).unwrap_or_default();
        let venue = details.last().map(|el| element_text(*el)).unwrap_or_default();

        publications.push(Publication {
            title,
            authors,
            publication: venue,
            year: joined_text(row, &year_sel),
            citation_count: joined_text(row, &citations_sel),
        });
    }

    Ok(publications)
}

/// Parses the header of a profile page
///
/// Missing elements produce empty strings rather than errors.
pub fn parse_profile(html: &str) -> Result<ProfileHeader> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let name = joined_text(root, &selector(NAME_SELECTOR)?);

    let affiliation = document
        .select(&selector(AFFILIATION_SELECTOR)?)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let stats: Vec<String> = document
        .select(&selector(STATS_SELECTOR)?)
        .map(element_text)
        .collect();
    let cell = |index: usize| stats.get(index).cloned().unwrap_or_default();

    Ok(ProfileHeader {
        name,
        affiliation,
        h_index: cell(H_INDEX_CELL),
        i10_index: cell(I10_INDEX_CELL),
        total_citations: cell(TOTAL_CITATIONS_CELL),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, authors: &str, venue: &str, cites: &str, year: &str) -> String {
        format!(
            r#"<tr class="gsc_a_tr">
                <td class="gsc_a_t">
                    <a href="/citations?view_op=view_citation" class="gsc_a_at">{}</a>
                    <div class="gs_gray">{}</div>
                    <div class="gs_gray">{}</div>
                </td>
                <td class="gsc_a_c"><a class="gsc_a_ac gs_ibl">{}</a></td>
                <td class="gsc_a_y"><span class="gsc_a_h gsc_a_hc gs_ibl">{}</span></td>
            </tr>"#,
            title, authors, venue, cites, year
        )
    }

    fn table(rows: &[String]) -> String {
        format!(
            r#"<html><body><table id="gsc_a_t"><tbody id="gsc_a_b">{}</tbody></table></body></html>"#,
            rows.join("\n")
        )
    }

    #[test]
    fn test_parse_single_row() {
        let html = table(&[row(
            "  Deep Learning for Cats ",
            "J Doe, R Roe",
            "Journal of Felines 4 (2)",
            "42",
            "2020",
        )]);

        let parsed = parse_publications(&html).unwrap();

        assert_eq!(
            parsed,
            vec![Publication {
                title: "Deep Learning for Cats".to_string(),
                authors: "J Doe, R Roe".to_string(),
                publication: "Journal of Felines 4 (2)".to_string(),
                year: "2020".to_string(),
                citation_count: "42".to_string(),
            }]
        );
    }

    #[test]
    fn test_preserves_table_order() {
        let html = table(&[
            row("First", "A", "V1", "1", "2023"),
            row("Second", "B", "V2", "2", "2022"),
            row("Third", "C", "V3", "", "2021"),
        ]);

        let titles: Vec<String> = parse_publications(&html)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_skips_rows_without_title() {
        let html = table(&[
            row("", "A", "V1", "1", "2023"),
            row("Kept", "B", "V2", "2", "2022"),
        ]);

        let parsed = parse_publications(&html).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Kept");
    }

    #[test]
    fn test_placeholder_row_is_skipped() {
        // Scholar renders this when the offset runs past the last article
        let html = table(&[r#"<tr class="gsc_a_tr"><td class="gsc_a_e" colspan="3">There are no articles in this profile.</td></tr>"#.to_string()]);
        assert!(parse_publications(&html).unwrap().is_empty());
    }

    #[test]
    fn test_single_detail_line_fills_both_fields() {
        let html = table(&[r#"<tr class="gsc_a_tr">
                <td class="gsc_a_t"><a>Solo</a><div class="gs_gray">Only line</div></td>
                <td class="gsc_a_c"></td><td class="gsc_a_y"></td>
            </tr>"#
            .to_string()]);

        let parsed = parse_publications(&html).unwrap();
        assert_eq!(parsed[0].authors, "Only line");
        assert_eq!(parsed[0].publication, "Only line");
        assert_eq!(parsed[0].year, "");
        assert_eq!(parsed[0].citation_count, "");
    }

    #[test]
    fn test_no_table() {
        let html = "<html><body><p>Please show you're not a robot</p></body></html>";
        assert!(parse_publications(html).unwrap().is_empty());
    }

    #[test]
    fn test_rows_outside_table_body_ignored() {
        let html = format!(
            "<html><body><table>{}</table>{}</body></html>",
            row("Elsewhere", "A", "V", "1", "2020"),
            table(&[row("Inside", "B", "W", "2", "2021")])
        );

        let parsed = parse_publications(&html).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Inside");
    }

    #[test]
    fn test_parse_profile() {
        let html = r#"
            <html><body>
                <div id="gsc_prf_in">Grace Hopper</div>
                <div class="gsc_prf_il">Yale University</div>
                <div class="gsc_prf_il" id="gsc_prf_ivh">Verified email at yale.edu</div>
                <table id="gsc_rsb_st"><tbody>
                    <tr><td class="gsc_rsb_sc1">Citations</td><td class="gsc_rsb_std">1520</td><td class="gsc_rsb_std">700</td></tr>
                    <tr><td class="gsc_rsb_sc1">h-index</td><td class="gsc_rsb_std">18</td><td class="gsc_rsb_std">12</td></tr>
                    <tr><td class="gsc_rsb_sc1">i10-index</td><td class="gsc_rsb_std">25</td><td class="gsc_rsb_std">14</td></tr>
                </tbody></table>
            </body></html>
        "#;

        let header = parse_profile(html).unwrap();

        assert_eq!(header.name, "Grace Hopper");
        assert_eq!(header.affiliation, "Yale University");
        assert_eq!(header.total_citations, "1520");
        assert_eq!(header.h_index, "18");
        assert_eq!(header.i10_index, "25");
    }

    #[test]
    fn test_parse_profile_missing_fields() {
        let header = parse_profile("<html><body></body></html>").unwrap();
        assert_eq!(header, ProfileHeader::default());
    }
}
