//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report which field failed; these helpers turn that
//! into an `invalid_request` error whose details name the field and a stable
//! machine-readable code.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use actix_web::web;
use serde_json::json;

use crate::domain::{
    CommunityId, CommunityValidationError, ContentValidationError, Error, LoginValidationError,
    RegistrationValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    EmptyPatch,
    MalformedBody,
    UnsupportedContentType,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::EmptyPatch => "empty_patch",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::UnsupportedContentType => "unsupported_content_type",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap a required request field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a community id taken from the request path.
pub(crate) fn parse_community_id(value: &str, field: FieldName) -> Result<CommunityId, Error> {
    value
        .parse::<CommunityId>()
        .map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn community_validation_error(err: &CommunityValidationError) -> Error {
    match err.field() {
        Some(field) => field_error(FieldName::new(field), ErrorCode::InvalidValue, err.to_string()),
        None => Error::invalid_request(err.to_string())
            .with_details(json!({ "code": ErrorCode::EmptyPatch.as_str() })),
    }
}

pub(crate) fn content_validation_error(err: &ContentValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        ErrorCode::InvalidValue,
        err.to_string(),
    )
}

pub(crate) fn registration_validation_error(err: &RegistrationValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        ErrorCode::InvalidValue,
        err.to_string(),
    )
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(FieldName::new(field), ErrorCode::InvalidValue, err.to_string())
}

/// Map a JSON extraction failure onto an `invalid_request` envelope.
pub(crate) fn json_payload_error(err: &JsonPayloadError) -> Error {
    let code = match err {
        JsonPayloadError::ContentType => ErrorCode::UnsupportedContentType,
        _ => ErrorCode::MalformedBody,
    };
    let message = match err {
        JsonPayloadError::Deserialize(inner) => format!("malformed JSON body: {inner}"),
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "request body too large".to_owned()
        }
        _ => "malformed JSON body".to_owned(),
    };
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

/// JSON extractor configuration shared by every API scope.
///
/// Body errors render through the domain error envelope instead of actix's
/// plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| json_payload_error(&err).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommunityPatch, ContentDraft, ErrorCode as DomainErrorCode};
    use rstest::rstest;

    #[rstest]
    fn body_type_errors_use_the_malformed_body_code() {
        let inner = serde_json::from_str::<String>("5").expect_err("type mismatch");
        let err = json_payload_error(&JsonPayloadError::Deserialize(inner));
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert!(err.message().starts_with("malformed JSON body"));
        assert_eq!(err.details(), Some(&json!({"code": "malformed_body"})));
    }

    #[rstest]
    fn missing_content_type_is_reported() {
        let err = json_payload_error(&JsonPayloadError::ContentType);
        assert_eq!(
            err.details(),
            Some(&json!({"code": "unsupported_content_type"}))
        );
    }

    #[rstest]
    fn malformed_ids_report_the_value() {
        let err = parse_community_id("nope", FieldName::new("id")).expect_err("invalid uuid");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "id", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn missing_fields_are_named() {
        let err = required::<String>(None, FieldName::new("title")).expect_err("missing");
        assert_eq!(err.message(), "missing required field: title");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "title", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn well_formed_ids_parse() {
        let id = parse_community_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", FieldName::new("id"))
            .expect("valid uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn empty_patches_have_no_field() {
        let err = CommunityPatch::try_new(None, None, None, None).expect_err("empty patch");
        let mapped = community_validation_error(&err);
        assert_eq!(mapped.details(), Some(&json!({"code": "empty_patch"})));
    }

    #[rstest]
    fn content_errors_name_the_field() {
        let err = ContentDraft::try_new("title", "gossip", "body").expect_err("bad category");
        let mapped = content_validation_error(&err);
        assert_eq!(
            mapped.details().and_then(|d| d.get("field")),
            Some(&json!("category"))
        );
    }
}
