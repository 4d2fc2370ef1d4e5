//! Request decoding that waits for the access gate.
//!
//! Write endpoints take the raw path segment and body so the caller's rights
//! are settled before either is parsed. An anonymous caller sending garbage
//! learns only that they may not write.

use actix_web::{HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, Operation, Principal, ResourceKind, authorize};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the caller and apply the access gate for `operation` on `kind`.
pub async fn admit(
    state: &HttpState,
    session: &SessionContext,
    kind: ResourceKind,
    operation: Operation,
) -> Result<Principal, Error> {
    let principal = session.principal(state.login.as_ref()).await?;
    authorize(&principal, kind, operation)?;
    Ok(principal)
}

/// Parse a record identifier from the path. Anything but an integer names no record.
pub fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.parse().map_err(|_| {
        debug!(segment = raw, "rejected path parameter");
        Error::not_found("resource not found")
    })
}

fn is_json(content_type: &str) -> bool {
    content_type == "application/json" || content_type.ends_with("+json")
}

/// Decode a JSON body, reporting failures the way the `web::Json` extractor does.
pub fn decode_body<T: DeserializeOwned>(req: &HttpRequest, body: &[u8]) -> Result<T, Error> {
    if !is_json(req.content_type()) {
        return Err(Error::invalid_request("expected an application/json body"));
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request("request body is not valid")
            .with_details(json!({ "code": "malformed_body", "reason": err.to_string() }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case("-3", Some(-3))]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("", None)]
    fn ids_must_be_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        match (parse_id(raw), expected) {
            (Ok(id), Some(want)) => assert_eq!(id, want),
            (Err(err), None) => assert_eq!(err.code(), ErrorCode::NotFound),
            (other, want) => panic!("unexpected {other:?} for {want:?}"),
        }
    }

    #[rstest]
    #[case("application/json")]
    #[case("application/json; charset=utf-8")]
    #[case("application/merge-patch+json")]
    fn json_bodies_decode(#[case] content_type: &str) {
        let req = TestRequest::default()
            .insert_header(("content-type", content_type))
            .to_http_request();
        let named: Named = decode_body(&req, br#"{"name":"Stop 1"}"#).expect("decodes");
        assert_eq!(named.name, "Stop 1");
    }

    #[test]
    fn malformed_json_carries_the_reason() {
        let req = TestRequest::default()
            .insert_header(("content-type", "application/json"))
            .to_http_request();
        let err = decode_body::<Named>(&req, br#"{"name": 5}"#).expect_err("wrong type");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details.get("code").and_then(|v| v.as_str()), Some("malformed_body"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("application/x-www-form-urlencoded"))]
    #[case(Some("text/plain"))]
    fn other_media_types_are_rejected(#[case] content_type: Option<&str>) {
        let mut req = TestRequest::default();
        if let Some(value) = content_type {
            req = req.insert_header(("content-type", value));
        }
        let err = decode_body::<Named>(&req.to_http_request(), b"name=x").expect_err("not json");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "expected an application/json body");
    }
}
