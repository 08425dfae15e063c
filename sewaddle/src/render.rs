use std::fmt::Write;

use coverwall::app::{REFRESH_CONTROL, SUBMIT_CONTROL};
use coverwall::page::{Element, LoadBehavior, MemoryPage, Notifier, LOADING_CLASS};
use coverwall::refresh::{card_index, card_text_id, card_title_id};
use coverwall::{TargetKind, VisualTarget};
use log::{debug, trace, warn};
use reqwest::Client;

/// Builds the page the targets live on: one image element per target, the
/// title/text pair under every card, and the two controls.
pub fn build_page(targets: &[VisualTarget]) -> MemoryPage {
    let mut page = MemoryPage::new();

    for target in targets {
        page.insert(&target.id, LoadBehavior::Manual);

        if target.kind == TargetKind::Card {
            let index = card_index(&target.id);
            page.insert(&card_title_id(index), LoadBehavior::Manual);
            page.insert(&card_text_id(index), LoadBehavior::Manual);
        }
    }

    page.insert(REFRESH_CONTROL, LoadBehavior::Manual);
    page.insert(SUBMIT_CONTROL, LoadBehavior::Manual);

    page
}

/// Loads every image that is waiting on its source and reports the
/// outcome back to the element.
pub async fn render(client: &Client, page: &MemoryPage, targets: &[VisualTarget]) {
    for target in targets {
        let Some(el) = page.get(&target.id) else {
            continue;
        };

        if !el.is_pending() {
            continue;
        }

        let Some(src) = el.src() else {
            continue;
        };

        trace!("Loading '{}' from {}", target.id, src);
        match client.get(&src).send().await {
            Ok(res) if res.status().is_success() => {
                debug!("'{}' loaded", target.id);
                el.fire_load();
            }
            Ok(res) => {
                warn!("'{}' failed to load [{}]", target.id, res.status());
                el.fire_error();
            }
            Err(e) => {
                warn!("'{}' failed to load: {}", target.id, e);
                el.fire_error();
            }
        }
    }
}

pub fn describe(page: &MemoryPage, targets: &[VisualTarget]) -> String {
    let mut out = String::new();

    for target in targets {
        let Some(el) = page.get(&target.id) else {
            continue;
        };

        let state = if el.has_class(LOADING_CLASS) {
            "loading"
        } else {
            "idle"
        };
        let src = el.src().unwrap_or_else(|| "-".to_string());

        let _ = writeln!(out, "{:<12} [{:<7}] {}", target.id, state, src);

        if target.kind == TargetKind::Card {
            let index = card_index(&target.id);
            let title = page
                .get(&card_title_id(index))
                .map(|el| el.text())
                .unwrap_or_default();
            let text = page
                .get(&card_text_id(index))
                .map(|el| el.text())
                .unwrap_or_default();

            let _ = writeln!(out, "{:<12}  {} - {}", "", title, text);
        }
    }

    out
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        println!("(!) {}", message);
    }
}

#[cfg(test)]
mod tests {
    use coverwall::config::default_targets;
    use coverwall::page::{bind_image, bind_text, set_loading};

    use super::*;

    #[test]
    fn page_has_companions_and_controls() {
        let page = build_page(&default_targets());

        let mut ids = page.ids().collect::<Vec<_>>();
        ids.sort();

        assert_eq!(
            ids,
            vec![
                "btn-enviar",
                "btn-refresh",
                "card-img-1",
                "card-img-2",
                "card-text-1",
                "card-text-2",
                "card-title-1",
                "card-title-2",
                "hero-bg",
            ]
        );
    }

    #[test]
    fn describe_lists_targets_and_cards() {
        let targets = default_targets();
        let page = build_page(&targets);

        set_loading(&page, "hero-bg", true);
        bind_image(&page, "card-img-1", "http://art/600x600bb.jpg");
        bind_text(&page, "card-title-1", "Kate Bush");
        bind_text(&page, "card-text-1", "Hounds of Love");

        let out = describe(&page, &targets);
        let lines = out.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "hero-bg      [loading] -");
        assert_eq!(
            lines[1],
            "card-img-1   [idle   ] http://art/600x600bb.jpg"
        );
        assert_eq!(lines[2], "              Kate Bush - Hounds of Love");
    }

    #[tokio::test]
    async fn render_skips_settled_images() {
        let targets = default_targets();
        let page = build_page(&targets);

        // Nothing assigned yet, so nothing is fetched.
        render(&Client::new(), &page, &targets).await;

        assert!(!page.get("hero-bg").unwrap().is_pending());
    }
}
