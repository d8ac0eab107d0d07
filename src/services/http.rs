use reqwasm::http::{Request, RequestCredentials};
use tracing::debug;

use super::{FormRequest, HttpMethod, WidgetError, WidgetResult, CSRF_FIELD};

/// Sends a form request with the page's session cookies and returns the
/// response body. Non-2xx statuses are reported as network failures.
pub async fn send(request: &FormRequest) -> WidgetResult<String> {
    let mut req = match request.method {
        HttpMethod::Get if request.fields.is_empty() => Request::get(&request.url),
        HttpMethod::Get => Request::get(&format!("{}?{}", request.url, request.encoded_body())),
        HttpMethod::Post => Request::post(&request.url)
            .header(
                "Content-Type",
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .body(request.encoded_body()),
    };
    req = req
        .header("X-Requested-With", "XMLHttpRequest")
        .credentials(RequestCredentials::SameOrigin);
    if let Some(csrf) = request.value(CSRF_FIELD) {
        req = req.header("X-CSRFToken", csrf);
    }

    debug!(url = %request.url, method = ?request.method, "sending request");
    let resp = req
        .send()
        .await
        .map_err(|err| WidgetError::NetworkFailure(err.to_string()))?;
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|err| WidgetError::NetworkFailure(format!("reading response: {err}")))?;
    if !resp.ok() {
        return Err(WidgetError::NetworkFailure(format!("HTTP {status}: {text}")));
    }
    Ok(text)
}
