use std::marker::PhantomData;

use crate::oracle::PredictionOracle;

/// In-process oracle backed by a closure.
pub struct FnOracle<F, S>
where
    F: Fn(&str) -> anyhow::Result<S> + Send + Sync + 'static,
    S: Into<String>,
{
    op: F,
    _out: PhantomData<fn() -> S>,
}

impl<F, S> FnOracle<F, S>
where
    F: Fn(&str) -> anyhow::Result<S> + Send + Sync + 'static,
    S: Into<String>,
{
    pub fn new(op: F) -> Self {
        Self {
            op,
            _out: PhantomData,
        }
    }
}

impl<F, S> From<F> for FnOracle<F, S>
where
    F: Fn(&str) -> anyhow::Result<S> + Send + Sync + 'static,
    S: Into<String>,
{
    fn from(op: F) -> Self {
        Self::new(op)
    }
}

impl<F, S> PredictionOracle for FnOracle<F, S>
where
    F: Fn(&str) -> anyhow::Result<S> + Send + Sync + 'static,
    S: Into<String> + 'static,
{
    fn predict(&self, payload: &str) -> anyhow::Result<String> {
        (self.op)(payload).map(Into::into)
    }
}
