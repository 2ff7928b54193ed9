//! # Function-backed handlers and filters
//!
//! [`HandlerFn`] wraps a closure `F: Fn(E) -> Fut`, producing a fresh future per event.
//! The closure receives an owned clone of the event, so the future can be `'static`
//! and move it freely.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fanout::{BoxError, Handler, HandlerFn};
//!
//! let h: Arc<dyn Handler<u32>> = HandlerFn::arc("doubler", |n: u32| async move {
//!     let _ = n * 2;
//!     Ok::<_, BoxError>(())
//! });
//! assert_eq!(h.name(), "doubler");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::subscribers::{Filter, Handler};

/// Function-backed handler.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, F, Fut> Handler<E> for HandlerFn<F>
where
    E: Clone + Send + Sync + 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn handle(&self, event: &E) -> Result<(), BoxError> {
        (self.f)(event.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Function-backed asynchronous filter.
#[derive(Debug)]
pub struct FilterFn<F> {
    f: F,
}

impl<F> FilterFn<F> {
    /// Creates a new function-backed filter.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the filter and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<E, F, Fut> Filter<E> for FilterFn<F>
where
    E: Clone + Send + Sync + 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn matches(&self, event: &E) -> bool {
        (self.f)(event.clone()).await
    }
}
