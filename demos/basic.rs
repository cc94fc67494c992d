//! Minimal vox example: a middleware pipeline with an auth gate, JSON and a
//! handler that writes its own response.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i -H 'authorization: token' http://localhost:3000/users/42
//!   curl -i -H 'authorization: token' http://localhost:3000/raw

use serde::Serialize;
use vox::{Application, Request, Response, StatusCode};

#[derive(Serialize)]
struct User {
    id: String,
    name: &'static str,
    served_by: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut app = Application::new()
        .with(vox::middleware::trace())
        .with(auth)
        .with(raw)
        .with(get_user);
    app.set_config("instance", "demo-1");

    app.run(":3000").await.expect("server error");
}

// Stops the chain unless the request carries credentials.
fn auth(req: &mut Request, res: &mut Response) {
    if req.header("authorization").is_none() {
        res.set_status(StatusCode::UNAUTHORIZED);
        res.set_body("missing authorization header");
        return;
    }
    req.next(res);
}

// GET /raw: writes straight to the writer and opts out of finalization.
fn raw(req: &mut Request, res: &mut Response) {
    if req.path() != "/raw" {
        req.next(res);
        return;
    }
    res.set_dont_respond(true);
    let writer = res.writer_mut();
    writer.write_header(StatusCode::ACCEPTED);
    writer.write(b"written by hand");
}

// GET /users/:id
fn get_user(req: &mut Request, res: &mut Response) {
    let Some(id) = req.path().strip_prefix("/users/") else {
        return; // no body, no status: 404
    };
    res.json(User {
        id: id.to_owned(),
        name: "alice",
        served_by: req.config("instance").to_owned(),
    });
}
