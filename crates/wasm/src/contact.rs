use std::rc::Rc;

use anyhow::anyhow;
use nightsky_core::config::ContactConfig;
use nightsky_core::contact::{ContactSubmitter, FormStatus, FormSurface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, FormData, HtmlFormElement, Window};

use crate::dom::{describe, js_err};
use crate::http::FetchClient;

const SUBMIT_CONTROLS: &str = "button[type=submit], input[type=submit]";

struct DomForm {
    form: HtmlFormElement,
    status: Element,
}

impl FormSurface for DomForm {
    fn show_status(&mut self, status: &FormStatus) {
        self.status.set_text_content(Some(&status.message));
        self.status.set_class_name(status.css_class());
    }

    fn reset_fields(&mut self) {
        self.form.reset();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        let controls = match self.form.query_selector_all(SUBMIT_CONTROLS) {
            Ok(controls) => controls,
            Err(e) => {
                log::warn!("cannot find submit controls: {}", describe(&e));
                return;
            }
        };
        for i in 0..controls.length() {
            let Some(control) = controls.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let result = if enabled {
                control.remove_attribute("disabled")
            } else {
                control.set_attribute("disabled", "")
            };
            if let Err(e) = result {
                log::warn!("cannot toggle submit control: {}", describe(&e));
            }
        }
    }
}

/// String fields of `form`, in document order. File inputs are skipped.
fn form_fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, JsValue> {
    let data = FormData::new_with_form(form)?;
    let mut fields = Vec::new();
    let Some(entries) = js_sys::try_iter(&data)? else {
        return Ok(fields);
    };
    for entry in entries {
        let entry: js_sys::Array = entry?.dyn_into()?;
        if let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
            fields.push((name, value));
        }
    }
    Ok(fields)
}

/// Intercept the contact form's submit. Returns `false` when the page has
/// no contact form.
pub fn start(window: &Window, document: &Document, config: &ContactConfig) -> anyhow::Result<bool> {
    let Some(form) = document.get_element_by_id(&config.form_id) else {
        log::debug!("no #{} on this page", config.form_id);
        return Ok(false);
    };
    let form: HtmlFormElement = form
        .dyn_into()
        .map_err(|_| anyhow!("#{} is not a form", config.form_id))?;
    let Some(status) = document.get_element_by_id(&config.status_id) else {
        log::debug!("no #{} on this page", config.status_id);
        return Ok(false);
    };

    let submitter = Rc::new(ContactSubmitter::new(config.request_timeout_ms));
    let client = Rc::new(FetchClient::new(window.clone()));

    let on_submit = {
        let form = form.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let fields = match form_fields(&form) {
                Ok(fields) => fields,
                Err(e) => {
                    log::error!("cannot read contact form: {}", describe(&e));
                    return;
                }
            };
            let action = form.action();
            let mut surface = DomForm {
                form: form.clone(),
                status: status.clone(),
            };
            let submitter = submitter.clone();
            let client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                submitter
                    .submit(client.as_ref(), &mut surface, &action, fields)
                    .await;
            });
        })
    };
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_submit.forget();
    Ok(true)
}
