use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use url::Url;

use crate::gallery::Activation;
use crate::modal::CloseReason;
use crate::page;
use crate::surface::Key;
use crate::ui::Model;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Page(String),
    SeeOther,
    NotFound,
    MethodNotAllowed,
}

pub fn bind(listen_addr: &str) -> Result<Server> {
    Server::http(listen_addr).map_err(|err| anyhow!("server: listen on {}: {}", listen_addr, err))
}

/// Serves requests until the listener fails. Fetch completions are applied
/// between requests so page state is only ever touched from this loop.
pub fn serve(server: &Server, model: &mut Model) -> Result<()> {
    loop {
        model.poll_completions();
        let request = match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => return Err(anyhow!("server: receive request: {}", err)),
        };
        model.poll_completions();
        let reply = route(model, request.method(), request.url());
        tracing::debug!(method = %request.method(), url = request.url(), reply = reply_kind(&reply), "handled request");
        respond(request, reply);
    }
}

pub fn route(model: &mut Model, method: &Method, raw_url: &str) -> Reply {
    let url = match Url::parse(&format!("http://localhost{}", raw_url)) {
        Ok(url) => url,
        Err(_) => return Reply::NotFound,
    };
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    let key_param = || Key::from_name(params.get("key").map(String::as_str).unwrap_or(""));

    match (method, segments.as_slice()) {
        (Method::Get, []) => Reply::Page(page::render(model).into_string()),
        (Method::Post, ["fetch"]) => {
            model.trigger_fetch();
            Reply::SeeOther
        }
        (Method::Post, ["cards", index]) => {
            let Ok(index) = index.parse::<usize>() else {
                return Reply::NotFound;
            };
            let activation = match params.get("via").map(String::as_str) {
                Some("key") => Activation::Key(key_param()),
                _ => Activation::Click,
            };
            model.activate_card(index, activation);
            Reply::SeeOther
        }
        (Method::Post, ["modal", "close"]) => {
            let reason = match params.get("via").map(String::as_str) {
                Some("overlay") => CloseReason::Overlay,
                _ => CloseReason::Control,
            };
            model.close_modal(reason);
            Reply::SeeOther
        }
        (Method::Post, ["keys"]) => {
            model.key(key_param());
            Reply::SeeOther
        }
        (Method::Get, ["fetch"])
        | (Method::Get, ["cards", _])
        | (Method::Get, ["modal", "close"])
        | (Method::Get, ["keys"])
        | (Method::Post, []) => Reply::MethodNotAllowed,
        (Method::Get, _) | (Method::Post, _) => Reply::NotFound,
        _ => Reply::MethodNotAllowed,
    }
}

fn reply_kind(reply: &Reply) -> &'static str {
    match reply {
        Reply::Page(_) => "page",
        Reply::SeeOther => "see-other",
        Reply::NotFound => "not-found",
        Reply::MethodNotAllowed => "method-not-allowed",
    }
}

fn respond(request: tiny_http::Request, reply: Reply) {
    let result = match reply {
        Reply::Page(html) => request.respond(
            Response::from_string(html).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                    .expect("valid header"),
            ),
        ),
        Reply::SeeOther => request.respond(
            Response::empty(StatusCode(303))
                .with_header(Header::from_bytes(&b"Location"[..], &b"/"[..]).expect("valid header")),
        ),
        Reply::NotFound => {
            request.respond(Response::from_string("not found").with_status_code(404))
        }
        Reply::MethodNotAllowed => {
            request.respond(Response::from_string("method not allowed").with_status_code(405))
        }
    };
    if let Err(err) = result {
        tracing::warn!(error = %err, "failed to write response");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fetch::Orchestrator;
    use crate::record::MediaRecord;
    use crate::source::StaticDatasetSource;
    use crate::surface::Bindings;
    use crate::ui::Options;

    fn loaded_model() -> Model {
        let source = StaticDatasetSource::new(vec![MediaRecord {
            title: Some("Crab Nebula".into()),
            url: Some("https://apod.test/crab.jpg".into()),
            ..MediaRecord::default()
        }]);
        let mut model = Model::new(Options {
            bindings: Bindings::default(),
            orchestrator: Arc::new(Orchestrator::new(Arc::new(source), Duration::ZERO)),
            max_cards: 8,
        });
        assert_eq!(route(&mut model, &Method::Post, "/fetch"), Reply::SeeOther);
        assert!(model.wait_for_completion(Duration::from_secs(5)));
        model
    }

    #[test]
    fn index_serves_page() {
        let mut model = loaded_model();
        match route(&mut model, &Method::Get, "/") {
            Reply::Page(html) => assert!(html.contains("Crab Nebula")),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn click_and_key_routes_open_the_same_card() {
        let mut model = loaded_model();
        route(&mut model, &Method::Post, "/cards/1?via=click");
        assert!(model.modal_open());
        let by_click = model.document().content(model.bindings().modal_body).to_string();

        route(&mut model, &Method::Post, "/modal/close?via=overlay");
        assert!(!model.modal_open());

        route(&mut model, &Method::Post, "/cards/1?via=key&key=%20");
        assert!(model.modal_open());
        let by_key = model.document().content(model.bindings().modal_body).to_string();
        assert_eq!(by_click, by_key);
    }

    #[test]
    fn escape_route_closes_modal() {
        let mut model = loaded_model();
        route(&mut model, &Method::Post, "/cards/0?via=key&key=Enter");
        assert!(model.modal_open());
        assert_eq!(route(&mut model, &Method::Post, "/keys?key=Escape"), Reply::SeeOther);
        assert!(!model.modal_open());
    }

    #[test]
    fn other_keys_do_not_open_cards() {
        let mut model = loaded_model();
        route(&mut model, &Method::Post, "/cards/0?via=key&key=a");
        assert!(!model.modal_open());
    }

    #[test]
    fn state_changes_reject_get() {
        let mut model = loaded_model();
        assert_eq!(
            route(&mut model, &Method::Get, "/cards/0?via=click"),
            Reply::MethodNotAllowed
        );
        assert!(!model.modal_open());
        route(&mut model, &Method::Post, "/cards/0?via=click");
        assert_eq!(
            route(&mut model, &Method::Get, "/modal/close?via=control"),
            Reply::MethodNotAllowed
        );
        assert_eq!(route(&mut model, &Method::Get, "/keys?key=Escape"), Reply::MethodNotAllowed);
        assert!(model.modal_open());
    }

    #[test]
    fn unknown_routes() {
        let mut model = loaded_model();
        assert_eq!(route(&mut model, &Method::Get, "/nope"), Reply::NotFound);
        assert_eq!(route(&mut model, &Method::Post, "/cards/x"), Reply::NotFound);
        assert_eq!(route(&mut model, &Method::Delete, "/"), Reply::MethodNotAllowed);
    }
}
