//! `fetch`-backed [`HttpClient`] with an abort-based timeout.

use std::future::Future;

use js_sys::{Promise, Uint8Array};
use nightsky_core::http::{HttpClient, HttpRequest, HttpResponse, RequestBody, TransportError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, FormData, Headers, Request, RequestInit, Response, Window};

use crate::dom::describe;

pub struct FetchClient {
    window: Window,
}

impl FetchClient {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl HttpClient for FetchClient {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> {
        let window = self.window.clone();
        async move { fetch(&window, request).await }
    }
}

fn network(e: JsValue) -> TransportError {
    TransportError::Network(describe(&e))
}

async fn fetch(window: &Window, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let controller = AbortController::new().map_err(network)?;

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    init.set_signal(Some(&controller.signal()));

    let headers = Headers::new().map_err(network)?;
    for (name, value) in &request.headers {
        headers.set(name, value).map_err(network)?;
    }
    init.set_headers(&headers);

    if let RequestBody::Form(fields) = &request.body {
        let data = FormData::new().map_err(network)?;
        for (name, value) in fields {
            data.append_with_str(name, value).map_err(network)?;
        }
        init.set_body(&data);
    }

    let js_request = Request::new_with_str_and_init(&request.url, &init).map_err(network)?;
    let _timer = match request.timeout_ms {
        Some(ms) => Some(AbortTimer::arm(window, &controller, ms)?),
        None => None,
    };

    match read_response(window.fetch_with_request(&js_request)).await {
        Ok(response) => Ok(response),
        Err(e) => match request.timeout_ms {
            Some(ms) if controller.signal().aborted() => Err(TransportError::Timeout(ms)),
            _ => Err(network(e)),
        },
    }
}

async fn read_response(pending: Promise) -> Result<HttpResponse, JsValue> {
    let value = JsFuture::from(pending).await?;
    let response: Response = value.dyn_into()?;
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(HttpResponse::new(
        response.status(),
        Uint8Array::new(&buffer).to_vec(),
    ))
}

/// Aborts the request when the timeout fires; disarmed on drop.
struct AbortTimer {
    window: Window,
    handle: i32,
    _on_timeout: Closure<dyn FnMut()>,
}

impl AbortTimer {
    fn arm(window: &Window, controller: &AbortController, ms: u32) -> Result<Self, TransportError> {
        let controller = controller.clone();
        let on_timeout = Closure::<dyn FnMut()>::new(move || controller.abort());
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.as_ref().unchecked_ref(),
                i32::try_from(ms).unwrap_or(i32::MAX),
            )
            .map_err(network)?;
        Ok(Self {
            window: window.clone(),
            handle,
            _on_timeout: on_timeout,
        })
    }
}

impl Drop for AbortTimer {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}
