//! Rendering of listings, paged or not.

use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use yatube_core::pagination::Listing;
use yatube_shared::PaginatedResponse;

fn is_page_param(pair: &str) -> bool {
    matches!(pair.split('=').next(), Some("limit") | Some("offset"))
}

/// Absolute URL of this request with `limit`/`offset` replaced. Other query
/// parameters are kept as sent.
fn page_url(req: &HttpRequest, limit: u64, offset: u64) -> String {
    let info = req.connection_info();

    let mut params: Vec<String> = req
        .query_string()
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_page_param(pair))
        .map(str::to_string)
        .collect();
    params.push(format!("limit={}", limit));
    if offset > 0 {
        params.push(format!("offset={}", offset));
    }

    format!(
        "{}://{}{}?{}",
        info.scheme(),
        info.host(),
        req.path(),
        params.join("&")
    )
}

/// 200 with either a bare array or a `{count, next, previous, results}` page.
pub fn listing_response<T: Serialize>(req: &HttpRequest, listing: Listing<T>) -> HttpResponse {
    match listing {
        Listing::All(items) => HttpResponse::Ok().json(items),
        Listing::Page {
            count,
            request,
            results,
        } => HttpResponse::Ok().json(PaginatedResponse {
            count,
            next: request
                .next_offset(count)
                .map(|offset| page_url(req, request.limit, offset)),
            previous: request
                .previous_offset()
                .map(|offset| page_url(req, request.limit, offset)),
            results,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_page_url_replaces_paging_params() {
        let req = TestRequest::get()
            .uri("/api/v1/posts?search=rust%20lang&limit=2&offset=2")
            .insert_header(("host", "example.com"))
            .to_http_request();

        assert_eq!(
            page_url(&req, 2, 4),
            "http://example.com/api/v1/posts?search=rust%20lang&limit=2&offset=4"
        );
        assert_eq!(
            page_url(&req, 2, 0),
            "http://example.com/api/v1/posts?search=rust%20lang&limit=2"
        );
    }
}
