use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::ui::Model;

const STYLE: &str = r#"
:root {
  color-scheme: dark;
  --bg: #0b0f19;
  --panel: #161c2b;
  --accent: #52b4ff;
  --text: #e8edf5;
  --muted: #9aa3b7;
  font-family: "Inter", "Segoe UI", -apple-system, BlinkMacSystemFont, "Helvetica Neue", sans-serif;
}
body { margin: 0; background: var(--bg); color: var(--text); }
body.modal-open { overflow: hidden; }
.site-header { display: flex; align-items: center; justify-content: space-between; padding: 1.5rem 2rem; }
.site-header h1 { margin: 0; font-size: 1.5rem; }
.trigger { background: var(--accent); color: #07111f; border: 0; border-radius: 999px; padding: 0.6rem 1.4rem; font-weight: 600; cursor: pointer; }
.fact { margin: 0 2rem 1rem; padding: 0.75rem 1rem; background: var(--panel); border-radius: 12px; color: var(--muted); }
.fact-label { margin: 0; font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.08em; color: var(--accent); }
.fact-text { margin: 0.25rem 0 0; }
.gallery { padding: 0 2rem 2rem; }
.gallery-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1.25rem; }
.card-form { margin: 0; }
.card { display: block; width: 100%; padding: 0; border: 0; text-align: left; font: inherit; cursor: pointer; background: var(--panel); border-radius: 14px; overflow: hidden; color: inherit; outline-offset: 3px; }
.card:focus-visible, .card:hover { outline: 2px solid var(--accent); }
.card-media { display: block; position: relative; aspect-ratio: 16 / 9; background: #000; }
.card-media img { width: 100%; height: 100%; object-fit: cover; display: block; }
.badge { position: absolute; top: 0.5rem; right: 0.5rem; background: rgba(0,0,0,0.7); padding: 0.15rem 0.5rem; border-radius: 6px; font-size: 0.75rem; }
.card-info { display: block; padding: 0.75rem 1rem 1rem; }
.card-title { display: block; margin: 0 0 0.25rem; font-size: 1rem; font-weight: 600; }
.card-date, .modal-date { color: var(--muted); font-size: 0.85rem; }
.gallery-empty, .gallery-loading, .gallery-error { text-align: center; padding: 4rem 1rem; color: var(--muted); }
.gallery-error .error-title { color: #ff7b7b; font-weight: 600; }
.spinner { width: 36px; height: 36px; margin: 0 auto 1rem; border: 3px solid var(--panel); border-top-color: var(--accent); border-radius: 50%; animation: spin 0.9s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.modal[aria-hidden="true"] { display: none; }
.modal { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; }
.modal-overlay { position: absolute; inset: 0; width: 100%; border: 0; padding: 0; cursor: pointer; background: rgba(3, 6, 12, 0.8); }
.modal-panel { position: relative; max-width: min(960px, 92vw); max-height: 90vh; overflow-y: auto; background: var(--panel); border-radius: 16px; padding: 1.5rem; }
.modal-close { position: absolute; top: 0.5rem; right: 0.75rem; background: none; border: 0; cursor: pointer; color: var(--text); font-size: 1.75rem; }
.modal-media { margin: 0 0 1rem; }
.modal-media img { max-width: 100%; border-radius: 10px; display: block; margin: 0 auto; }
.aspect-video { position: relative; aspect-ratio: 16 / 9; width: min(880px, 85vw); }
.aspect-video iframe { position: absolute; inset: 0; width: 100%; height: 100%; border: 0; border-radius: 10px; }
.modal-explanation { line-height: 1.6; }
.outbound { color: var(--accent); }
"#;

const SCRIPT: &str = r#"
function post(url) {
  fetch(url, { method: 'POST' }).then(function () { window.location.assign('/'); });
}
document.addEventListener('keydown', function (event) {
  var modal = document.getElementById('modal');
  if (event.key === 'Escape' && modal && modal.getAttribute('aria-hidden') === 'false') {
    event.preventDefault();
    post('/keys?key=Escape');
    return;
  }
  var card = event.target.closest ? event.target.closest('.card') : null;
  if (card && (event.key === 'Enter' || event.key === ' ')) {
    event.preventDefault();
    post('/cards/' + card.dataset.index + '?via=key&key=' + encodeURIComponent(event.key));
  }
});
"#;

pub fn render(model: &Model) -> Markup {
    let bindings = model.bindings();
    let doc = model.document();
    let modal_hidden = doc.is_hidden(bindings.modal).unwrap_or(true);
    let focused = doc.focused();
    let body_class = doc.scroll_locked().then_some("modal-open");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if model.is_loading() {
                    meta http-equiv="refresh" content="1";
                }
                title { "Astronomy Picture of the Day" }
                style { (PreEscaped(STYLE)) }
            }
            body class=[body_class] {
                header.site-header {
                    h1 { "Astronomy Picture of the Day" }
                    form method="post" action="/fetch" {
                        button.trigger id=(bindings.trigger.as_str()) type="submit"
                            autofocus[focused == Some(bindings.trigger)] {
                            "Fetch pictures"
                        }
                    }
                }
                @if let Some(fact) = bindings.fact {
                    aside.fact id=(fact.as_str()) aria-live="polite" {
                        (PreEscaped(doc.content(fact)))
                    }
                }
                main.gallery id=(bindings.gallery.as_str()) aria-busy=(bool_attr(model.is_loading())) {
                    (PreEscaped(doc.content(bindings.gallery)))
                }
                div.modal id=(bindings.modal.as_str()) role="dialog" aria-modal="true"
                    aria-labelledby="modal-title" aria-hidden=(bool_attr(modal_hidden)) {
                    form method="post" action="/modal/close?via=overlay" {
                        button.modal-overlay id=(bindings.modal_overlay.as_str()) type="submit"
                            tabindex="-1" aria-label="Close details" {}
                    }
                    div.modal-panel {
                        form method="post" action="/modal/close?via=control" {
                            button.modal-close id=(bindings.modal_close.as_str()) type="submit"
                                aria-label="Close details"
                                autofocus[focused == Some(bindings.modal_close)] {
                                "×"
                            }
                        }
                        div.modal-body id=(bindings.modal_body.as_str()) {
                            (PreEscaped(doc.content(bindings.modal_body)))
                        }
                    }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::fetch::Orchestrator;
    use crate::gallery::Activation;
    use crate::record::MediaRecord;
    use crate::source::StaticDatasetSource;
    use crate::surface::Bindings;
    use crate::ui::Options;

    fn model() -> Model {
        let source = StaticDatasetSource::new(vec![MediaRecord {
            title: Some("Pillars".into()),
            url: Some("https://apod.test/pillars.jpg".into()),
            ..MediaRecord::default()
        }]);
        Model::new(Options {
            bindings: Bindings::default(),
            orchestrator: Arc::new(Orchestrator::new(Arc::new(source), Duration::ZERO)),
            max_cards: 8,
        })
    }

    #[test]
    fn closed_page_hides_modal() {
        let html = render(&model()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("aria-hidden=\"true\""));
        assert!(!html.contains("class=\"modal-open\""));
        assert!(html.contains("id=\"fetch-trigger\""));
        assert!(html.contains("action=\"/modal/close?via=overlay\""));
        assert!(html.contains("action=\"/modal/close?via=control\""));
    }

    #[test]
    fn open_modal_locks_body_and_focuses_close() {
        let mut model = model();
        model.trigger_fetch();
        assert!(model.wait_for_completion(Duration::from_secs(5)));
        assert!(model.activate_card(1, Activation::Click));
        let html = render(&model).into_string();
        assert!(html.contains("class=\"modal-open\""));
        assert!(html.contains("aria-hidden=\"false\""));
        assert!(html.contains("Pillars"));
        assert!(html.contains("autofocus"));
    }

    #[test]
    fn loading_page_refreshes() {
        let mut model = model();
        model.trigger_fetch();
        let html = render(&model).into_string();
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("gallery-loading"));
    }
}
