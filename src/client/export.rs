use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::Review;

pub const EXPORT_FILE_NAME: &str = "sentiment_analysis_results.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";
pub const EXPORT_COLUMNS: [&str; 3] = ["review", "sentiment", "confidence"];

/// Write a `review,sentiment,confidence` header and one row per review.
///
/// Row fields are always quoted, so commas, quotes and newlines in the
/// review text survive a CSV parser. Returns the underlying writer.
pub fn write_csv<'a, W, I>(writer: W, reviews: I) -> csv::Result<W>
where
    W: io::Write,
    I: IntoIterator<Item = &'a Review>,
{
    let mut header = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    header.write_record(EXPORT_COLUMNS)?;
    let writer = header.into_inner().map_err(|err| err.into_error())?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for review in reviews {
        rows.write_record([
            review.review.as_str(),
            review.sentiment.as_str(),
            review.confidence.to_string().as_str(),
        ])?;
    }
    Ok(rows.into_inner().map_err(|err| err.into_error())?)
}

/// The export as text, as offered for download
pub fn to_csv<'a, I>(reviews: I) -> csv::Result<String>
where
    I: IntoIterator<Item = &'a Review>,
{
    let buf = write_csv(Vec::new(), reviews)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the export into `dir` under the fixed file name.
pub fn write_export<'a, I>(dir: &Path, reviews: I) -> io::Result<PathBuf>
where
    I: IntoIterator<Item = &'a Review>,
{
    let path = dir.join(EXPORT_FILE_NAME);
    write_csv(File::create(&path)?, reviews)?;
    tracing::info!("Exported results to {}", path.display());
    Ok(path)
}
