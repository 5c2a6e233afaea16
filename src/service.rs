//! A [`tower_service::Service`] guarded by a [`CircuitBreaker`].
use crate::{Call, CircuitBreaker, Error};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::time::{self, Duration, Sleep};
use tower_service::Service;

/// Wraps a service so that every request goes through a [`CircuitBreaker`].
///
/// Readiness is delegated to the inner service; the breaker is consulted when a
/// request is made. A rejected request fails with [`Error::Open`] without
/// reaching the inner service.
#[derive(Debug, Clone)]
pub struct BreakerService<S> {
    inner: S,
    breaker: CircuitBreaker,
}

pin_project_lite::pin_project! {
    /// The response future of a [`BreakerService`].
    #[derive(Debug)]
    pub struct ResponseFuture<F> {
        #[pin]
        future: Option<F>,
        #[pin]
        deadline: Sleep,
        timeout: Duration,
        call: Option<Call>,
    }
}

// === impl BreakerService ===

impl<S> BreakerService<S> {
    pub fn new(breaker: CircuitBreaker, inner: S) -> Self {
        BreakerService { inner, breaker }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Req> Service<Req> for BreakerService<S>
where
    S: Service<Req>,
{
    type Response = S::Response;
    type Error = Error<S::Error>;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Error::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let timeout = self.breaker.config().timeout;
        let call = self.breaker.admit();
        // the inner service is only called once the breaker has admitted the
        // request.
        let future = call.as_ref().map(|_| self.inner.call(req));
        ResponseFuture {
            future,
            deadline: time::sleep(timeout),
            timeout,
            call,
        }
    }
}

// === impl ResponseFuture ===

impl<F, T, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Result<T, Error<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let Some(future) = this.future.as_pin_mut() else {
            return Poll::Ready(Err(Error::Open));
        };

        match future.poll(cx) {
            Poll::Ready(Ok(res)) => {
                if let Some(call) = this.call.take() {
                    call.succeeded();
                }
                return Poll::Ready(Ok(res));
            }
            Poll::Ready(Err(err)) => {
                if let Some(call) = this.call.take() {
                    call.failed();
                }
                return Poll::Ready(Err(Error::Inner(err)));
            }
            Poll::Pending => {}
        }

        match this.deadline.poll(cx) {
            Poll::Ready(()) => {
                tracing::trace!(timeout = ?this.timeout, "Request timed out");
                if let Some(call) = this.call.take() {
                    call.failed();
                }
                Poll::Ready(Err(Error::Timeout(*this.timeout)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
