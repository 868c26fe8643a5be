use tracing::{debug, error};

use crate::error::RecordError;
use crate::models::VariantRecord;

/// Convert already-split rows (one `Vec<String>` per variant) into records.
///
/// Fails on the first row that is not exactly 14 columns wide.
pub fn records_from_rows<I>(rows: I) -> Result<Vec<VariantRecord>, RecordError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            VariantRecord::try_from(row).map_err(|e| {
                error!("Variant row {} rejected: {}", idx, e);
                e
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Accepted {} variant records", records.len());
    Ok(records)
}

/// Records whose locus column equals `locus`, in input order.
pub fn records_at<'a>(
    records: &'a [VariantRecord],
    locus: &'a str,
) -> impl Iterator<Item = &'a VariantRecord> + 'a {
    records.iter().filter(move |r| r.locus() == locus)
}
