#![allow(dead_code)]

use std::time::Duration;

use propertyfinder_lib::{Client, RetryPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEARCH_PATH: &str = "/en/search";

pub fn fast_client() -> Client {
    Client::with_policy(
        RetryPolicy::new(2, Duration::from_millis(1)),
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Wraps a JSON document the way the site embeds it.
pub fn next_data_html(doc: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>propertyfinder</title></head><body><div id="__next"></div><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        doc
    )
}

pub fn empty_html() -> String {
    "<!DOCTYPE html><html><body><h1>No results</h1></body></html>".to_string()
}

pub fn search_doc(page_count: u32, listings: &[(&str, String)]) -> Value {
    let listings: Vec<Value> = listings
        .iter()
        .map(|(id, url)| json!({"listing_type": "property", "property": {"id": id, "share_url": url}}))
        .collect();
    json!({
        "props": {"pageProps": {"searchResult": {
            "meta": {"page_count": page_count, "total_count": 99},
            "listings": listings
        }}}
    })
}

pub fn property(id: &str) -> Value {
    json!({
        "id": id,
        "property_type": "Villa",
        "price": {"value": 500000, "currency": "AED"},
        "title": format!("<b>Villa {}</b>", id),
        "location": {"full_name": "Dubai Hills", "coordinates": {"lat": 25.2, "lon": 55.3}},
        "images": {"property": [{"full": "a.jpg"}, {"full": "b.jpg"}]},
        "agent": {"name": "Sara", "email": "sara@example.com", "social": "", "languages": ["English"]},
        "broker": {"name": "Acme", "logo": "logo.png", "address": "Business Bay", "email": "info@acme.example", "phone": "+9714"},
        "is_verified": true,
        "is_direct_from_developer": false,
        "is_new_construction": false,
        "is_available": true,
        "is_new_insert": false,
        "live_viewing": null,
        "bedrooms": 3,
        "bathrooms": 4,
        "size": {"value": 3500, "unit": "sqft"},
        "share_url": format!("https://www.propertyfinder.ae/en/plp/{}.html", id),
        "reference": format!("REF-{}", id),
        "listed_date": "2025-01-20T10:00:00Z",
        "contact_options": [{"type": "phone", "value": "+971500000000"}],
        "images_count": 2,
        "amenities": [{"name": "Balcony"}],
        "completion_status": "completed",
        "furnished": false,
        "view_360": null,
        "offering_type": "sale",
        "video_id": null,
        "is_under_offer_by_competitor": false,
        "description": "Quiet street"
    })
}

pub fn detail_doc(property: Value) -> Value {
    json!({"props": {"pageProps": {"propertyResult": {"property": property}}}})
}

pub fn detail_url(server: &MockServer, id: &str) -> String {
    format!("{}/en/plp/{}.html", server.uri(), id)
}

pub fn search_url(server: &MockServer) -> String {
    format!("{}{}?c=1&t=1&ob=mr", server.uri(), SEARCH_PATH)
}

pub async fn mount_search_page(server: &MockServer, page: u32, body: String, expect: u64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expect)
        .mount(server)
        .await;
}

pub async fn mount_detail(server: &MockServer, id: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/en/plp/{}.html", id)))
        .respond_with(template)
        .mount(server)
        .await;
}

pub async fn mount_listing(server: &MockServer, id: &str) {
    mount_detail(
        server,
        id,
        ResponseTemplate::new(200).set_body_string(next_data_html(&detail_doc(property(id)))),
    )
    .await;
}
