use nightsky_core::config::NavigationConfig;
use nightsky_core::navigation::{ScrollSurface, handle_click};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::dom::{describe, js_err};

#[derive(Clone)]
struct DomPage {
    window: Window,
    document: Document,
}

impl ScrollSurface for DomPage {
    fn scroll_to_element(&mut self, id: &str) -> bool {
        let Some(target) = self.document.get_element_by_id(id) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }

    fn navigate(&mut self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            log::error!("cannot navigate to {url}: {}", describe(&e));
        }
    }
}

/// Attach smooth scrolling to every link matching the selector. Returns
/// how many links were wired.
pub fn start(
    window: &Window,
    document: &Document,
    config: &NavigationConfig,
) -> anyhow::Result<u32> {
    let links = document
        .query_selector_all(&config.selector)
        .map_err(js_err)?;
    let page = DomPage {
        window: window.clone(),
        document: document.clone(),
    };

    let mut wired = 0;
    for i in 0..links.length() {
        let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let mut page = page.clone();
        let source = link.clone();
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let href = source.get_attribute("href");
            handle_click(href.as_deref(), &mut page);
        });
        link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(js_err)?;
        on_click.forget();
        wired += 1;
    }
    Ok(wired)
}
