//! The prediction step: one payload in, one structure string out.

mod command;
mod function;

pub use command::{CommandOracle, OracleCommand};
pub use function::FnOracle;

/// Capability that maps a single sequence payload to its predicted structure.
///
/// Implementations are shared by every batch running on a platform, so they
/// are called through `&self` from several threads at once. Within a batch
/// calls are strictly sequential.
pub trait PredictionOracle
where
    Self: Send + Sync + 'static,
{
    fn predict(&self, payload: &str) -> anyhow::Result<String>;
}

impl<T: PredictionOracle + ?Sized> PredictionOracle for std::sync::Arc<T> {
    fn predict(&self, payload: &str) -> anyhow::Result<String> {
        (**self).predict(payload)
    }
}

impl<T: PredictionOracle + ?Sized> PredictionOracle for Box<T> {
    fn predict(&self, payload: &str) -> anyhow::Result<String> {
        (**self).predict(payload)
    }
}
