use crate::oracle::PredictionOracle;
use crate::record::{Batch, ResultMap};
use crate::{Error, Result};

/// Predict every record of `batch` in order.
///
/// The first oracle failure aborts the batch; no partial map is returned.
pub fn run_batch<O>(oracle: &O, batch: &Batch) -> Result<ResultMap>
where
    O: PredictionOracle + ?Sized,
{
    let mut results = ResultMap::new();
    for record in batch.records() {
        tracing::debug!("Processing sequence {}", record.id);
        let structure = oracle
            .predict(&record.payload)
            .map_err(|source| Error::Oracle {
                id: record.id.clone(),
                source,
            })?;
        results.insert(record.id.clone(), structure);
    }
    Ok(results)
}
