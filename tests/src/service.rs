use hyper::{body, header, Body, Method, Request, Response, StatusCode};
use serde_json::{json, Map, Value};

/// A small JSON service the fixture trees in this crate are written against.
pub async fn route(request: Request<Body>) -> Response<Body> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::GET, ["get"]) => json_response(
            StatusCode::OK,
            json!({"id": 1, "message": "hello world"}),
        ),
        (Method::POST, ["post", id]) => post(id, request).await,
        (Method::PUT, ["put", id]) | (Method::PATCH, ["patch", id]) => update(id, request).await,
        (Method::DELETE, ["delete", id]) => match parse_id(id) {
            Ok(_) => text_response(StatusCode::OK, "ok"),
            Err(response) => response,
        },
        _ => text_response(StatusCode::NOT_FOUND, "404 page not found\n"),
    }
}

async fn post(id: &str, request: Request<Body>) -> Response<Body> {
    let id = match parse_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if id == 100 {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({"error": "invalid argument"}),
        );
    }

    match read_json::<Value>(request).await {
        Ok(data) => json_response(
            StatusCode::OK,
            json!({"id": id, "message": "hello world", "data": data}),
        ),
        Err(response) => response,
    }
}

async fn update(id: &str, request: Request<Body>) -> Response<Body> {
    let id = match parse_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match read_json::<Map<String, Value>>(request).await {
        Ok(data) => json_response(
            StatusCode::OK,
            json!({"id": id, "message": data.get("key").cloned().unwrap_or(Value::Null)}),
        ),
        Err(response) => response,
    }
}

fn parse_id(id: &str) -> Result<i64, Response<Body>> {
    id.parse()
        .map_err(|_| text_response(StatusCode::BAD_REQUEST, &format!("invalid id {}\n", id)))
}

async fn read_json<T: serde::de::DeserializeOwned>(
    request: Request<Body>,
) -> Result<T, Response<Body>> {
    let bytes = body::to_bytes(request.into_body())
        .await
        .map_err(|e| text_response(StatusCode::BAD_REQUEST, &e.to_string()))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| text_response(StatusCode::BAD_REQUEST, &e.to_string()))
}

fn json_response(status: StatusCode, body: Value) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

fn text_response(status: StatusCode, body: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
}
