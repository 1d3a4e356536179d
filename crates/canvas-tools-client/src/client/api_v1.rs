//! Models the parts of the Canvas REST API (https://canvas.instructure.com/doc/api/) the tools use.

use crate::{
    error::{CanvasClientError, CanvasClientResult},
    request::FormFields,
    CanvasClient,
};
use canvas_tools_util::{deserialize, file_util};
use reqwest::{
    blocking::{Request, RequestBuilder, Response},
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use std::{fmt::Write, path::Path};
use url::Url;

// joins the URL "tail" with the API url root from the client
pub fn make_url(client: &CanvasClient, tail: impl AsRef<str>) -> CanvasClientResult<Url> {
    client
        .0
        .root_url
        .join(tail.as_ref())
        .map_err(|e| CanvasClientError::UrlParse(tail.as_ref().to_string(), e))
}

// encodes a string so it can be used as a single URL path segment
pub fn percent_encode(target: &str) -> String {
    percent_encoding::utf8_percent_encode(target, percent_encoding::NON_ALPHANUMERIC).to_string()
}

// creates a request with the bearer credential attached
fn prepare_canvas_request(client: &CanvasClient, method: Method, url: Url) -> RequestBuilder {
    log::info!("{} {}", method, url);
    client
        .0
        .client
        .request(method, url)
        .bearer_auth(&client.0.token)
}

// checks a response for failure, keeping the body as the error message
fn assert_success(response: Response, url: &Url) -> CanvasClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let error = response
            .text()
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| status.to_string());
        Err(CanvasClientError::HttpError {
            url: url.clone(),
            status,
            error,
        })
    }
}

fn assert_success_json<T: DeserializeOwned>(res: Response, url: &Url) -> CanvasClientResult<T> {
    let res = assert_success(res, url)?
        .bytes()
        .map_err(CanvasClientError::HttpReadResponse)?;
    let json = deserialize::json_from_slice(&res)
        .map_err(|e| CanvasClientError::HttpJsonResponse(url.clone(), e))?;
    Ok(json)
}

/// get {collection}?page={page}&per_page={per_page}
/// Fetches one page of a collection endpoint. The URL may already carry other query parameters.
pub fn get_page<T: DeserializeOwned>(
    client: &CanvasClient,
    url: &Url,
    page: u32,
    per_page: u32,
) -> CanvasClientResult<Vec<T>> {
    let res = prepare_canvas_request(client, Method::GET, url.clone())
        .header(CONTENT_TYPE, "application/json")
        .query(&[("page", page), ("per_page", per_page)])
        .send()
        .map_err(|e| CanvasClientError::ConnectionError(Method::GET, url.clone(), e))?;

    assert_success_json(res, url)
}

/// The outgoing request rendered for diagnostics, with the credential redacted.
pub fn dump_request(request: &Request) -> String {
    let mut dump = format!("{} {}\n", request.method(), request.url());
    for (name, value) in request.headers() {
        let value = if *name == AUTHORIZATION {
            "Bearer [redacted]".into()
        } else {
            String::from_utf8_lossy(value.as_bytes())
        };
        // writing to a String cannot fail
        let _ = writeln!(dump, "{name}: {value}");
    }
    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        dump.push('\n');
        dump.push_str(&String::from_utf8_lossy(body));
    }
    dump
}

/// The parts of a response to a form PUT that the mutator needs.
pub struct PutResponse {
    pub status: reqwest::StatusCode,
    pub request_dump: String,
    pub body: String,
}

/// put {resource}
/// Sends the fields as a form-encoded body. Any status is returned to the caller to classify.
pub fn put_form(
    client: &CanvasClient,
    path: &str,
    fields: &FormFields,
) -> CanvasClientResult<PutResponse> {
    let url = make_url(client, path)?;
    let request = prepare_canvas_request(client, Method::PUT, url.clone())
        .form(fields)
        .build()
        .map_err(|e| CanvasClientError::RequestBuild(Method::PUT, url.clone(), e))?;
    let request_dump = dump_request(&request);

    let res = client
        .0
        .client
        .execute(request)
        .map_err(|e| CanvasClientError::ConnectionError(Method::PUT, url.clone(), e))?;
    let status = res.status();
    let body = res.text().map_err(CanvasClientError::HttpReadResponse)?;
    Ok(PutResponse {
        status,
        request_dump,
        body,
    })
}

// path separators in attachment names would let a download escape its directory
fn sanitize_file_name(file_name: &str) -> String {
    file_name.replace(['/', '\\'], "_")
}

/// Fetches the file at `url` without credentials and streams it into `dir/file_name`.
pub fn download(
    client: &CanvasClient,
    url: &Url,
    dir: &Path,
    file_name: &str,
) -> CanvasClientResult<u64> {
    file_util::create_dir_all(dir)?;
    let target = dir.join(sanitize_file_name(file_name));
    let mut file = file_util::create_file(&target)?;

    log::info!("GET {}", url);
    let res = client
        .0
        .client
        .get(url.clone())
        .send()
        .map_err(|e| CanvasClientError::ConnectionError(Method::GET, url.clone(), e))?;
    let mut res = assert_success(res, url)?;
    let written = res
        .copy_to(&mut file)
        .map_err(CanvasClientError::HttpWriteResponse)?;
    log::debug!("wrote {} bytes to {}", written, target.display());
    Ok(written)
}
