use std::io::Read;

use anyhow::{bail, Result};
use flate2::read::GzDecoder;

use backend_domain::TransactionBatch;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Turn an uploaded payload into a typed batch. Gzip payloads are detected
/// by magic bytes rather than headers since the file travels inside a
/// multipart part.
pub fn parse_transactions(body: &[u8]) -> Result<TransactionBatch> {
    let decoded = maybe_gunzip(body)?;
    if decoded.is_empty() {
        bail!("empty file");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(decoded.as_slice());
    let columns = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if columns.is_empty() {
        bail!("no columns in file");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    if rows.is_empty() {
        bail!("no data rows in file");
    }

    Ok(TransactionBatch::from_rows(columns, rows)?)
}

fn maybe_gunzip(body: &[u8]) -> Result<Vec<u8>> {
    if body.len() >= 2 && body[..2] == GZIP_MAGIC {
        let mut decoder = GzDecoder::new(body);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        return Ok(out);
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    const SAMPLE: &[u8] = b"Time,Amount,type\n0,10,TRANSFER\n1,12,PAYMENT\n";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn plain_csv_parses_into_a_batch() {
        let batch = parse_transactions(SAMPLE).unwrap();
        assert_eq!(batch.columns, vec!["Time", "Amount", "type"]);
        assert_eq!(batch.row_count(), 2);
    }

    #[test]
    fn gzip_payload_decodes_to_the_same_batch() {
        let plain = parse_transactions(SAMPLE).unwrap();
        let unpacked = parse_transactions(&gzip(SAMPLE)).unwrap();
        assert_eq!(unpacked.columns, plain.columns);
        assert_eq!(unpacked.rows.len(), plain.rows.len());
    }

    #[test]
    fn empty_payload_is_rejected() {
        let err = parse_transactions(b"").unwrap_err();
        assert!(err.to_string().contains("empty file"));

        let err = parse_transactions(&gzip(b"")).unwrap_err();
        assert!(err.to_string().contains("empty file"));
    }

    #[test]
    fn header_only_payload_is_rejected() {
        let err = parse_transactions(b"Time,Amount\n").unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn ragged_rows_are_rejected_with_the_row_number() {
        let err = parse_transactions(b"Time,Amount\n1,10\n2\n").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn truncated_gzip_is_an_error() {
        let mut packed = gzip(SAMPLE);
        packed.truncate(packed.len() / 2);
        assert!(parse_transactions(&packed).is_err());
    }
}
