/// Type-state markers for the builder pattern
///
/// These types track which required fields have been set at compile-time,
/// preventing invalid configurations.

use std::marker::PhantomData;

/// Marker trait for URL state
pub trait UrlState {}

/// URL has not been set
pub struct NoUrl;
impl UrlState for NoUrl {}

/// URL has been set
pub struct HasUrl;
impl UrlState for HasUrl {}

/// Marker trait for sink state
pub trait SinkState {}

/// Sink has not been set
pub struct NoSink;
impl SinkState for NoSink {}

/// Sink has been set
pub struct HasSink;
impl SinkState for HasSink {}

/// Phantom marker to prevent direct construction
#[derive(Debug, Clone, Copy)]
pub struct TypeState<U, S> {
    _url: PhantomData<U>,
    _sink: PhantomData<S>,
}

impl<U, S> TypeState<U, S> {
    pub(crate) fn new() -> Self {
        Self {
            _url: PhantomData,
            _sink: PhantomData,
        }
    }
}

impl<U, S> Default for TypeState<U, S> {
    fn default() -> Self {
        Self::new()
    }
}
