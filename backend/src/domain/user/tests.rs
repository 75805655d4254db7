//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn fields() -> ProfileFields<'static> {
    ProfileFields {
        email: "ada@example.com",
        first_name: "Ada",
        last_name: "Lovelace",
        location: Some("London"),
        avatar: None,
    }
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_serialises_as_plain_string() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let value = serde_json::to_value(&id).expect("serialise id");
    assert_eq!(value, serde_json::Value::String(VALID_ID.to_owned()));
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("ada@localhost", UserValidationError::InvalidEmail)]
#[case("ada@.com", UserValidationError::InvalidEmail)]
#[case("a da@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_values(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_is_lower_cased_and_trimmed() {
    let email = EmailAddress::new("  Ada@Example.com ").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
fn builds_user_from_valid_fields(fields: ProfileFields<'static>) {
    let user = User::try_new(UserId::random(), fields).expect("valid user");
    assert_eq!(user.first_name.as_ref(), "Ada");
    assert_eq!(user.location.as_deref(), Some("London"));
    assert!(user.avatar.is_none());
}

#[rstest]
fn blank_last_name_reports_field(mut fields: ProfileFields<'static>) {
    fields.last_name = "   ";
    let err = User::try_new(UserId::random(), fields).expect_err("blank name");
    assert_eq!(err, UserValidationError::EmptyName { field: "lastName" });
    assert_eq!(err.field(), "lastName");
}

#[rstest]
fn overlong_first_name_is_rejected(mut fields: ProfileFields<'static>) {
    let long = "x".repeat(NAME_MAX + 1);
    fields.first_name = Box::leak(long.into_boxed_str());
    let err = User::try_new(UserId::random(), fields).expect_err("long name");
    assert_eq!(
        err,
        UserValidationError::NameTooLong {
            field: "firstName",
            max: NAME_MAX
        }
    );
}

#[rstest]
fn non_http_avatar_is_rejected(mut fields: ProfileFields<'static>) {
    fields.avatar = Some("javascript:alert(1)");
    let err = User::try_new(UserId::random(), fields).expect_err("bad avatar");
    assert_eq!(err, UserValidationError::InvalidAvatar);
}
