use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::Service;
use serde::Serialize;
use serde::ser::{Error as _, Serializer};
use vox::header::CONTENT_TYPE;
use vox::{Application, Error, Request, Response, StatusCode};

fn get(path: &str) -> http::Request<Bytes> {
    http::Request::builder().uri(path).body(Bytes::new()).unwrap()
}

async fn body_of(res: http::Response<Full<Bytes>>) -> Bytes {
    res.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn test_empty_application_is_not_found() {
    let svc = Application::new().into_service();

    let res = svc.dispatch(get("/")).unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_of(res).await.is_empty());
}

#[tokio::test]
async fn test_text_body() {
    let svc = Application::new()
        .with(|_req: &mut Request, res: &mut Response| res.set_body("ok"))
        .into_service();

    let res = svc.dispatch(get("/")).unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(body_of(res).await, "ok");
}

#[tokio::test]
async fn test_json_body() {
    let svc = Application::new()
        .with(|_req: &mut Request, res: &mut Response| res.json(BTreeMap::from([("a", 1)])))
        .into_service();

    let res = svc.dispatch(get("/")).unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(body_of(res).await, r#"{"a":1}"#);
}

#[tokio::test]
async fn test_middleware_runs_before_and_after_next() {
    fn timing(req: &mut Request, res: &mut Response) {
        res.headers_mut().insert("x-before", "1".parse().unwrap());
        req.next(res);
        let status = res.resolved_status().as_u16().to_string();
        res.headers_mut().insert("x-seen-status", status.parse().unwrap());
    }

    fn hello(req: &mut Request, res: &mut Response) {
        res.set_body(format!("hello {}", req.path()));
    }

    let svc = Application::new().with(timing).with(hello).into_service();

    let res = svc.dispatch(get("/world")).unwrap();

    assert_eq!(res.headers()["x-before"], "1");
    assert_eq!(res.headers()["x-seen-status"], "200");
    assert_eq!(body_of(res).await, "hello /world");
}

#[tokio::test]
async fn test_stopping_middleware_short_circuits() {
    let reached = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reached);

    let svc = Application::new()
        .with(|req: &mut Request, res: &mut Response| {
            if req.header("authorization").is_none() {
                res.set_status(StatusCode::UNAUTHORIZED);
                return;
            }
            req.next(res);
        })
        .with(move |_req: &mut Request, res: &mut Response| {
            counter.fetch_add(1, Ordering::SeqCst);
            res.set_body("secret");
        })
        .into_service();

    let res = svc.dispatch(get("/")).unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(body_of(res).await.is_empty());
    assert_eq!(reached.load(Ordering::SeqCst), 0);

    let authorized = http::Request::builder()
        .header("authorization", "token")
        .body(Bytes::new())
        .unwrap();
    let res = svc.dispatch(authorized).unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_of(res).await, "secret");
    assert_eq!(reached.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dont_respond_suppresses_finalize() {
    let svc = Application::new()
        .with(|_req: &mut Request, res: &mut Response| {
            res.set_status(StatusCode::CREATED);
            res.set_body("never sent");
            res.set_dont_respond(true);
        })
        .into_service();

    let res = svc.dispatch(get("/")).unwrap();

    // Nothing was written: the untouched writer becomes an empty 200.
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(CONTENT_TYPE).is_none());
    assert!(body_of(res).await.is_empty());
}

#[tokio::test]
async fn test_dont_respond_sends_what_handler_wrote() {
    let svc = Application::new()
        .with(|_req: &mut Request, res: &mut Response| {
            res.set_dont_respond(true);
            let writer = res.writer_mut();
            writer.write_header(StatusCode::ACCEPTED);
            writer.write(b"by hand");
        })
        .into_service();

    let res = svc.dispatch(get("/")).unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body_of(res).await, "by hand");
}

#[tokio::test]
async fn test_serialization_failure_aborts_dispatch() {
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    let svc = Application::new()
        .with(|_req: &mut Request, res: &mut Response| res.json(Unserializable))
        .into_service();

    let err = svc.dispatch(get("/")).unwrap_err();

    assert!(matches!(err, Error::Serialize(_)));
}

#[tokio::test]
async fn test_handlers_read_config() {
    let mut app = Application::new()
        .with(|req: &mut Request, res: &mut Response| {
            let body = format!("[{}][{}]", req.config("name"), req.config("missing"));
            res.set_body(body);
        });
    app.set_config("name", "first").set_config("name", "vox");

    let res = app.into_service().dispatch(get("/")).unwrap();

    assert_eq!(body_of(res).await, "[vox][]");
}

#[tokio::test]
async fn test_same_handler_registered_twice_runs_twice() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let count = move |req: &mut Request, res: &mut Response| {
        counter.fetch_add(1, Ordering::SeqCst);
        req.next(res);
    };

    let mut app = Application::new();
    app.push(count.clone()).push(count);
    assert_eq!(app.len(), 2);

    app.into_service().dispatch(get("/")).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_service_reads_request_body() {
    let svc = Application::new()
        .with(|req: &mut Request, res: &mut Response| {
            let echoed = req.body().clone();
            res.set_body(echoed);
        })
        .into_service();

    let req = http::Request::builder()
        .method("POST")
        .body(Full::new(Bytes::from_static(b"ping")))
        .unwrap();
    let res = svc.call(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "application/octet-stream");
    assert_eq!(body_of(res).await, "ping");
}
