//! The application container and per-request dispatch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::chain::{Chain, compose};
use crate::config::Config;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;
use crate::server;

/// Ordered middleware plus named configuration.
///
/// Build it once at startup, then hand it to [`run`](Application::run).
/// Middleware runs in the order it was added; adding the same handler twice
/// runs it twice.
///
/// ```rust,no_run
/// use vox::{Application, Request, Response};
///
/// fn hello(_req: &mut Request, res: &mut Response) {
///     res.set_body("hello");
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut app = Application::new().with(vox::middleware::trace()).with(hello);
///     app.set_config("env", "production");
///     app.run(":3000").await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct Application {
    middlewares: Vec<BoxedHandler>,
    config: Config,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the middleware list. Returns `self` for chaining.
    pub fn with(mut self, handler: impl Handler) -> Self {
        self.push(handler);
        self
    }

    /// Appends `handler` to the middleware list.
    pub fn push(&mut self, handler: impl Handler) -> &mut Self {
        self.middlewares.push(Arc::new(handler));
        self
    }

    /// Sets an application-level value, replacing any earlier one.
    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.set(key, value);
        self
    }

    /// Application-level value for `key`, or `""` if it was never set.
    pub fn config(&self, key: &str) -> &str {
        self.config.get(key)
    }

    /// Number of registered middleware.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Ends the setup phase: composes the middleware into one chain and
    /// returns a hyper service that dispatches every request through it.
    pub fn into_service(self) -> AppService {
        AppService {
            chain: compose(self.middlewares),
            config: Arc::new(self.config),
        }
    }

    /// Binds `addr` and serves until SIGTERM or Ctrl-C.
    ///
    /// `addr` is `host:port`; a bare `:port` listens on all interfaces.
    /// Returns an error only if binding fails.
    pub async fn run(self, addr: &str) -> Result<(), Error> {
        let addr = if addr.starts_with(':') { format!("0.0.0.0{addr}") } else { addr.to_owned() };
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, server::shutdown_signal()).await
    }

    /// Serves connections from an already-bound `listener` until `shutdown`
    /// resolves, then waits for in-flight connections to finish.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<(), Error> {
        server::serve(listener, self.into_service(), shutdown).await
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("middlewares", &self.middlewares.len())
            .field("config", &self.config)
            .finish()
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// A frozen [`Application`]: the composed chain plus read-only config.
///
/// Cloning is cheap; every connection gets a clone. Implements hyper's
/// [`Service`] for any request body type, so it plugs into other hyper-based
/// serving code as well as [`Application::run`].
#[derive(Clone, Debug)]
pub struct AppService {
    chain: Chain,
    config: Arc<Config>,
}

impl AppService {
    /// Runs one request through the chain and finalizes the response.
    ///
    /// Finalization is skipped when a handler set
    /// [`dont_respond`](Response::set_dont_respond); whatever that handler
    /// wrote to the writer is sent as is. A body that fails to serialize
    /// aborts the dispatch with [`Error::Serialize`].
    pub fn dispatch(&self, req: http::Request<Bytes>) -> Result<http::Response<Full<Bytes>>, Error> {
        let mut req = Request::with_config(req, Arc::clone(&self.config));
        let mut res = Response::new();

        self.chain.call(&mut req, &mut res);

        if res.dont_respond() {
            debug!(method = %req.method(), path = req.path(), "response left to handler");
        } else if let Err(e) = res.finalize() {
            error!(method = %req.method(), path = req.path(), "aborting dispatch: {e}");
            return Err(e);
        }

        Ok(res.into_writer().into_http())
    }
}

impl<B> Service<http::Request<B>> for AppService
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let svc = self.clone();
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| Error::Body(e.into()))?
                .to_bytes();
            svc.dispatch(http::Request::from_parts(parts, body))
        })
    }
}
