//! [`FormsetNet`] over `window.fetch`.
//!
//! The add-row fetch is awaited by the controller; the delete
//! notification runs as a detached task whose failures are only logged,
//! matching the fire-and-forget contract.

use sortable_formset::net::{cookie_value, FetchRowError, FormsetNet, NewRowRequest, RowDeleteNotice};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, HtmlDocument, Request, RequestInit, Response};
use zoon::Task;

use crate::dom::{document, window};

/// Name of the Django CSRF cookie.
const CSRF_COOKIE: &str = "csrftoken";

fn transport(value: JsValue) -> FetchRowError {
    FetchRowError::Transport(format!("{value:?}"))
}

/// CSRF token from `document.cookie`, if the server set one.
pub fn csrf_token() -> Option<String> {
    let cookies = document().dyn_into::<HtmlDocument>().ok()?.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

async fn response_for(request: &Request) -> Result<Response, FetchRowError> {
    let value = JsFuture::from(window().fetch_with_request(request))
        .await
        .map_err(transport)?;
    value
        .dyn_into()
        .map_err(|_| FetchRowError::Transport("fetch did not yield a Response".to_string()))
}

async fn post_form(url: &str, body: String) -> Result<(), FetchRowError> {
    let headers = Headers::new().map_err(transport)?;
    headers
        .set("Content-Type", "application/x-www-form-urlencoded")
        .map_err(transport)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(headers.as_ref());
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(url, &init).map_err(transport)?;
    let response = response_for(&request).await?;
    if !response.ok() {
        return Err(FetchRowError::Http(response.status()));
    }
    Ok(())
}

#[derive(Clone, Copy, Default)]
pub struct BrowserNet;

impl BrowserNet {
    pub fn new() -> Self {
        Self
    }
}

impl FormsetNet for BrowserNet {
    async fn fetch_row(&self, request: NewRowRequest) -> Result<String, FetchRowError> {
        let url = request.full_url();
        let value = JsFuture::from(window().fetch_with_str(&url))
            .await
            .map_err(transport)?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| FetchRowError::Transport("fetch did not yield a Response".to_string()))?;
        if !response.ok() {
            return Err(FetchRowError::Http(response.status()));
        }
        let json = JsFuture::from(response.json().map_err(transport)?)
            .await
            .map_err(transport)?;
        js_sys::Reflect::get(&json, &JsValue::from_str("html"))
            .ok()
            .and_then(|html| html.as_string())
            .ok_or_else(|| FetchRowError::Transport("response carried no html field".to_string()))
    }

    fn notify_row_deleted(&self, notice: RowDeleteNotice) {
        Task::start(async move {
            let body = notice.form_body(csrf_token().as_deref());
            if let Err(error) = post_form(&notice.endpoint, body).await {
                // Opportunistic cleanup only; the local delete already happened.
                zoon::eprintln!(
                    "[SortableFormset] delete notification to {} failed: {error}",
                    notice.endpoint
                );
            }
        });
    }
}
