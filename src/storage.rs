use crate::errors::LoadError;
use crate::models::RawReview;
use csv::{ReaderBuilder, StringRecord};
use std::{env, io::Read, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{info, warn};

const DATE_COLUMNS: &[&str] = &["date", "Tanggal", "tanggal"];
const SNIPPET_COLUMNS: &[&str] = &["snippet", "Ulasan"];
const LINK_COLUMNS: &[&str] = &["link"];

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("REVIEWS_CSV_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data.csv")
}

pub async fn load_reviews(path: &Path) -> Result<Vec<RawReview>, LoadError> {
    let bytes = fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reviews = read_reviews(bytes.as_slice())?;
    info!(path = %path.display(), rows = reviews.len(), "loaded review export");
    Ok(reviews)
}

/// Reads a headered CSV export. Rows with a blank date or snippet are skipped.
pub fn read_reviews<R: Read>(reader: R) -> Result<Vec<RawReview>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = require_column(&headers, "date", DATE_COLUMNS)?;
    let snippet_idx = require_column(&headers, "snippet", SNIPPET_COLUMNS)?;
    let link_idx = find_column(&headers, LINK_COLUMNS);

    let mut reviews = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let date_text = cell(&record, Some(date_idx));
        let snippet = cell(&record, Some(snippet_idx));
        if date_text.is_empty() || snippet.is_empty() {
            skipped += 1;
            continue;
        }
        let link = Some(cell(&record, link_idx).to_string());
        reviews.push(RawReview::new(date_text, snippet, link));
    }

    if skipped > 0 {
        warn!(skipped, "skipped rows missing date or snippet");
    }
    Ok(reviews)
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|header| header == *alias))
}

fn require_column(
    headers: &StringRecord,
    expected: &'static str,
    aliases: &[&str],
) -> Result<usize, LoadError> {
    find_column(headers, aliases).ok_or_else(|| LoadError::MissingColumn {
        expected,
        aliases: aliases.join(", "),
    })
}

fn cell(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER_LINK;

    #[test]
    fn reads_rows_with_links() {
        let csv = "date,snippet,link\n\
                   2 hari lalu,Pelayanan ramah,https://maps.test/r/1\n\
                   sebulan lalu,Tempatnya bersih,\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].date_text, "2 hari lalu");
        assert_eq!(reviews[0].link, "https://maps.test/r/1");
        assert_eq!(reviews[1].link, PLACEHOLDER_LINK);
    }

    #[test]
    fn accepts_indonesian_headers_without_link_column() {
        let csv = "Tanggal,Ulasan\n3 bulan lalu,Mantap\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].snippet, "Mantap");
        assert_eq!(reviews[0].link, PLACEHOLDER_LINK);
    }

    #[test]
    fn skips_rows_missing_date_or_snippet() {
        let csv = "date,snippet\n,tanpa tanggal\n5 hari lalu,\n5 hari lalu,ok\n1 hari lalu\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].snippet, "ok");
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = read_reviews("date,link\n2 hari lalu,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { expected: "snippet", .. }));

        let err = read_reviews("snippet\nhalo\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { expected: "date", .. }));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("review_dashboard_missing_export.csv");
        let err = load_reviews(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
