//! Reading the `review` column out of an uploaded CSV.

use csv::ReaderBuilder;

pub const REVIEW_COLUMN: &str = "review";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV file must contain a 'review' column")]
    MissingReviewColumn,
    #[error("CSV file is empty")]
    Empty,
    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("{0}")]
    Malformed(#[from] csv::Error),
}

/// Extract the review texts from raw CSV bytes, in file order.
///
/// Other columns are ignored. A row without a review cell yields an empty string.
pub fn read_reviews(bytes: &[u8]) -> Result<Vec<String>, CsvError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Err(CsvError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let column = reader
        .headers()?
        .iter()
        .position(|name| name == REVIEW_COLUMN)
        .ok_or(CsvError::MissingReviewColumn)?;

    let mut reviews = Vec::new();
    for record in reader.records() {
        let record = record?;
        reviews.push(record.get(column).unwrap_or_default().to_string());
    }

    if reviews.is_empty() {
        return Err(CsvError::Empty);
    }

    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_review_column_only() {
        let csv = "id,review,stars\n1,Great product!,5\n2,\"Broke, after a day\",1\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Great product!", "Broke, after a day"]);
    }

    #[test]
    fn test_quoted_newlines_and_quotes() {
        let csv = "review\n\"Line one\nline two\"\n\"She said \"\"wow\"\"\"\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Line one\nline two", "She said \"wow\""]);
    }

    #[test]
    fn test_missing_cells_become_empty() {
        let csv = "id,review\n1,Fine\n2\n3,\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Fine", "", ""]);
    }

    #[test]
    fn test_missing_review_column() {
        let csv = "id,text\n1,Great product!\n";
        assert!(matches!(
            read_reviews(csv.as_bytes()),
            Err(CsvError::MissingReviewColumn)
        ));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(read_reviews(b""), Err(CsvError::Empty)));
        assert!(matches!(read_reviews(b"  \n"), Err(CsvError::Empty)));
        assert!(matches!(read_reviews(b"review\n"), Err(CsvError::Empty)));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"review\nSolid\n");
        assert_eq!(read_reviews(&bytes).unwrap(), vec!["Solid"]);
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            read_reviews(&[b'r', 0xff, b'\n']),
            Err(CsvError::Encoding(_))
        ));
    }
}
