use nightsky_core::config::RepoListConfig;
use nightsky_core::repos::{ProjectListSurface, RepoCard, load_repositories};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

use crate::dom::describe;
use crate::http::FetchClient;

const LINK_TEXT: &str = "View on GitHub";

struct DomProjectList {
    document: Document,
    container: Element,
}

impl DomProjectList {
    fn build_card(&self, card: &RepoCard) -> Result<Element, JsValue> {
        let article = self.document.create_element("div")?;
        article.set_class_name("project-card");

        let title = self.document.create_element("h3")?;
        title.set_text_content(Some(&card.title));
        let description = self.document.create_element("p")?;
        description.set_text_content(Some(&card.description));
        let link = self.document.create_element("a")?;
        link.set_attribute("href", &card.href)?;
        link.set_attribute("target", "_blank")?;
        link.set_attribute("rel", "noopener noreferrer")?;
        link.set_text_content(Some(LINK_TEXT));

        article.append_child(&title)?;
        article.append_child(&description)?;
        article.append_child(&link)?;
        Ok(article)
    }
}

impl ProjectListSurface for DomProjectList {
    fn show_cards(&mut self, cards: &[RepoCard]) {
        self.container.set_inner_html("");
        for card in cards {
            let appended = self
                .build_card(card)
                .and_then(|element| self.container.append_child(&element));
            if let Err(e) = appended {
                log::error!("cannot render card for {}: {}", card.title, describe(&e));
            }
        }
    }

    fn show_failure(&mut self, message: &str) {
        self.container.set_inner_html("");
        match self.document.create_element("p") {
            Ok(p) => {
                p.set_class_name("error-message");
                p.set_text_content(Some(message));
                if let Err(e) = self.container.append_child(&p) {
                    log::error!("cannot show project failure: {}", describe(&e));
                }
            }
            Err(_) => self.container.set_text_content(Some(message)),
        }
    }
}

/// Fetch and render the repository list. Returns `false` when the page has
/// no project container or no account is configured.
pub fn start(
    window: &Window,
    document: &Document,
    config: &RepoListConfig,
) -> anyhow::Result<bool> {
    let Some(container) = document.get_element_by_id(&config.container_id) else {
        log::debug!("no #{} on this page", config.container_id);
        return Ok(false);
    };
    let user = config
        .user
        .clone()
        .or_else(|| container.get_attribute("data-github-user"))
        .filter(|user| !user.trim().is_empty());
    let Some(user) = user else {
        log::debug!("no account configured for #{}", config.container_id);
        return Ok(false);
    };

    let client = FetchClient::new(window.clone());
    let mut surface = DomProjectList {
        document: document.clone(),
        container,
    };
    let config = config.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Ok(shown) = load_repositories(&client, &mut surface, &config, &user).await {
            log::info!("showing {shown} projects");
        }
    });
    Ok(true)
}
