//! Pull-based row sources.

use super::value::RowValues;
use std::convert::Infallible;

/// An ordered, pull-based stream of result rows.
///
/// `Ok(None)` signals end of stream; an error aborts iteration.
pub trait RowSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn next_row(&mut self) -> Result<Option<RowValues>, Self::Error>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    type Error = S::Error;

    fn next_row(&mut self) -> Result<Option<RowValues>, Self::Error> {
        (**self).next_row()
    }
}

/// Adapts an iterator of row results into a [`RowSource`].
#[derive(Debug, Clone)]
pub struct IterRows<I> {
    inner: I,
}

impl<I> IterRows<I> {
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: rows.into_iter(),
        }
    }
}

impl IterRows<std::vec::IntoIter<Result<RowValues, Infallible>>> {
    /// Rows that can never fail to fetch.
    pub fn infallible(rows: Vec<RowValues>) -> Self {
        Self::new(rows.into_iter().map(Ok).collect::<Vec<_>>())
    }
}

impl<I, E> RowSource for IterRows<I>
where
    I: Iterator<Item = Result<RowValues, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn next_row(&mut self) -> Result<Option<RowValues>, E> {
        self.inner.next().transpose()
    }
}
