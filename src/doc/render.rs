//! Static HTML rendering of the recorded spec.
//!
//! # Design Decisions
//! - The template sees a typed [`DocView`], nothing else
//! - `add` and `mult` drive numbering and anchor ids
//! - JSON bodies are pretty-printed for display only; the stored text is
//!   never modified

use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::doc::error::{DocError, DocResult};
use crate::doc::model::{Api, Call, FieldMap};

/// Stride between per-Api anchor blocks.
const ANCHOR_STRIDE: usize = 1000;

/// Everything the page template needs.
#[derive(Debug, Clone, Copy)]
pub struct DocView<'a> {
    pub title: &'a str,
    pub base_urls: &'a BTreeMap<String, String>,
    pub apis: &'a [Api],
}

pub fn add(x: usize, y: usize) -> usize {
    x + y
}

pub fn mult(x: usize, y: usize) -> usize {
    (x + 1) * y
}

/// Anchor id for the `call_index`th call of the `api_index`th Api.
fn call_anchor(api_index: usize, call_index: usize) -> String {
    format!("call-{}", add(mult(api_index, ANCHOR_STRIDE), call_index))
}

fn verb_class(verb: &str) -> &'static str {
    match verb {
        "GET" => "verb verb-get",
        "POST" => "verb verb-post",
        "PUT" | "PATCH" => "verb verb-put",
        "DELETE" => "verb verb-delete",
        _ => "verb",
    }
}

fn display_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

fn field_table(caption: &str, fields: &FieldMap) -> Markup {
    html! {
        @if !fields.is_empty() {
            table class="fields" {
                caption { (caption) }
                @for (name, value) in fields {
                    tr {
                        th { (name) }
                        td { code { (value.trim()) } }
                    }
                }
            }
        }
    }
}

fn body_block(caption: &str, body: &str) -> Markup {
    html! {
        @if !body.is_empty() {
            div class="body" {
                h5 { (caption) }
                pre { (display_body(body)) }
            }
        }
    }
}

fn call_section(api_index: usize, call_index: usize, call: &Call) -> Markup {
    html! {
        section class="call" id=(call_anchor(api_index, call_index)) {
            h4 {
                "Example " (add(call_index, 1))
                span class={ "status status-" (call.response_code / 100) "xx" } { (call.response_code) }
            }
            div class="columns" {
                div class="request" {
                    h5 { "Request" }
                    (field_table("Headers", &call.request_header))
                    (field_table("Query parameters", &call.request_url_params))
                    (field_table("Form fields", &call.post_form))
                    (body_block("Body", &call.request_body))
                }
                div class="response" {
                    h5 { "Response" }
                    (field_table("Headers", &call.response_header))
                    (body_block("Body", &call.response_body))
                }
            }
        }
    }
}

fn api_section(api_index: usize, api: &Api) -> Markup {
    html! {
        article class="api" id={ "api-" (add(api_index, 1)) } {
            h3 {
                span class=(verb_class(&api.http_verb)) { (api.http_verb) }
                " "
                code { (api.path) }
            }
            @for (call_index, call) in api.calls.iter().enumerate() {
                (call_section(api_index, call_index, call))
            }
        }
    }
}

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #1f2933; }
nav { position: fixed; top: 0; bottom: 0; width: 280px; overflow-y: auto; background: #f5f7fa; border-right: 1px solid #d9e2ec; padding: 1rem; }
nav ol { padding-left: 1.2rem; }
main { margin-left: 320px; padding: 1rem 2rem; }
.verb { display: inline-block; min-width: 4.5em; padding: 0 .4em; border-radius: 3px; color: #fff; background: #627d98; font-size: .8em; text-align: center; }
.verb-get { background: #2186eb; } .verb-post { background: #3ebd93; } .verb-put { background: #f0b429; } .verb-delete { background: #ef4e4e; }
.status { margin-left: .6em; font-size: .8em; padding: 0 .4em; border-radius: 3px; background: #e4e7eb; }
.status-2xx { background: #c6f7e2; }
.columns { display: flex; gap: 2rem; } .columns > div { flex: 1; min-width: 0; }
table.fields { border-collapse: collapse; margin-bottom: .8rem; } table.fields caption { text-align: left; font-weight: bold; }
table.fields th, table.fields td { border: 1px solid #d9e2ec; padding: .2rem .5rem; text-align: left; vertical-align: top; }
pre { background: #102a43; color: #f0f4f8; padding: .8rem; overflow-x: auto; }
"#;

/// Render the full documentation page.
pub fn render_page(view: &DocView<'_>) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (view.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    h2 { (view.title) }
                    ol {
                        @for (api_index, api) in view.apis.iter().enumerate() {
                            li {
                                a href={ "#api-" (add(api_index, 1)) } {
                                    span class=(verb_class(&api.http_verb)) { (api.http_verb) }
                                    " " (api.path)
                                }
                            }
                        }
                    }
                }
                main {
                    h1 { (view.title) }
                    @if !view.base_urls.is_empty() {
                        table class="fields base-urls" {
                            caption { "Base URLs" }
                            @for (label, url) in view.base_urls {
                                tr { th { (label) } td { code { (url) } } }
                            }
                        }
                    }
                    @if view.apis.is_empty() {
                        p { "No calls recorded yet." }
                    }
                    @for (api_index, api) in view.apis.iter().enumerate() {
                        (api_section(api_index, api))
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Render and overwrite the HTML file at `path`.
pub fn write_page(view: &DocView<'_>, path: &Path) -> DocResult<()> {
    fs::write(path, render_page(view)).map_err(|e| DocError::io(path, e))?;
    tracing::debug!(path = %path.display(), apis = view.apis.len(), "Documentation rendered");
    Ok(())
}
