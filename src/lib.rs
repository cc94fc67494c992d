//! # vox
//!
//! A minimal middleware pipeline for HTTP services.
//!
//! ## The model
//!
//! An [`Application`] is an ordered list of handlers plus a little
//! configuration. Every request runs through the handlers in the order they
//! were added. Each one may read the [`Request`], shape the [`Response`],
//! call [`Request::next`] to let the rest of the chain run, or return without
//! calling it to stop there. When the chain returns, the response is
//! finalized once: status line, then body.
//!
//! What vox deliberately leaves out:
//!
//! - **Routing**: match on [`Request::path`] in a handler if you need it
//! - **Error-recovery middleware**: handlers own their failures
//! - **Streaming bodies**: request and response bodies are buffered
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vox::{Application, Request, Response, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = Application::new()
//!         .with(vox::middleware::trace())
//!         .with(auth)
//!         .with(hello);
//!     app.set_config("greeting", "hello");
//!
//!     app.run(":3000").await.unwrap();
//! }
//!
//! fn auth(req: &mut Request, res: &mut Response) {
//!     if req.header("authorization").is_none() {
//!         res.set_status(StatusCode::UNAUTHORIZED);
//!         return; // later handlers never run
//!     }
//!     req.next(res);
//! }
//!
//! fn hello(req: &mut Request, res: &mut Response) {
//!     let greeting = req.config("greeting").to_owned();
//!     res.json(vec![greeting]);
//! }
//! ```
//!
//! ## Bodies
//!
//! | Set with | Sent as |
//! |---|---|
//! | `res.set_body(vec![0x48, 0x69])` | the bytes, verbatim |
//! | `res.set_body("ok")` | the text's UTF-8 bytes |
//! | `res.json(value)` | `serde_json` encoding of `value` |
//!
//! With no explicit status, a response with a body is `200 OK` and one
//! without is `404 Not Found`.

mod app;
mod chain;
mod config;
mod error;
mod handler;
mod request;
mod response;
mod server;
mod writer;

pub mod middleware;

pub use app::{AppService, Application};
pub use chain::{Chain, compose};
pub use config::Config;
pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use request::Request;
pub use response::{Body, Response, Structured, resolve_status};
pub use writer::ResponseWriter;

pub use http;
pub use http::{Method, StatusCode, header};
