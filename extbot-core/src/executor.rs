use crate::error::{Error, Result};

use futures::future::BoxFuture;

use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// A type-erased async handler.
///
/// Every call runs on its own task. A handler that panics does not take the
/// caller down, the call returns [`Error::NoResponse`] instead.
pub struct Executor<T> {
    f: Arc<dyn Fn(T) -> BoxFuture<'static, Result> + Send + Sync>,
}

impl<T> Executor<T>
where
    T: Send + 'static,
{
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        Self {
            f: Arc::new(move |ctx| Box::pin(f(ctx))),
        }
    }

    pub async fn call(&self, ctx: T) -> Result {
        let fut = (self.f)(ctx);

        match tokio::task::spawn(fut).await {
            Ok(res) => res,
            Err(err) => {
                log::error!("[CORE] Handler task failed: {}", err);
                Err(Error::NoResponse)
            }
        }
    }
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<T> Debug for Executor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Executor")
    }
}

#[cfg(test)]
mod tests {
    use super::Executor;
    use crate::error::Error;

    #[tokio::test]
    async fn test_executor_call() {
        let executor = Executor::from_fn(|n: u32| async move {
            if n == 0 {
                return Err(Error::other("zero"));
            }

            Ok(())
        });

        assert!(executor.call(1).await.is_ok());
        assert!(matches!(executor.call(0).await, Err(Error::Other(_))));
    }

    #[tokio::test]
    async fn test_executor_panic() {
        let executor = Executor::from_fn(|fail: bool| async move {
            if fail {
                panic!("handler panicked");
            }

            Ok(())
        });

        assert!(matches!(executor.call(true).await, Err(Error::NoResponse)));
        assert!(executor.call(false).await.is_ok());
    }
}
