use regform_core::{Registration, RegistrationValidationError};

#[test]
fn new_registration_is_unsaved() {
    let registration = Registration::new("A", "a@x.com", "555", 30);

    assert_eq!(registration.id, 0);
    assert!(!registration.is_persisted());
    assert!(registration.clone().with_id(7).is_persisted());
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let registration = Registration::new("A", "a@x.com", "555", 30).with_id(1);

    let json = serde_json::to_value(&registration).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 1,
            "name": "A",
            "email": "a@x.com",
            "phone": "555",
            "age": 30
        })
    );
}

#[test]
fn deserialize_defaults_id_and_age() {
    let value = serde_json::json!({
        "name": "B",
        "email": "b@x.com",
        "phone": "777"
    });

    let decoded: Registration = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.id, 0);
    assert_eq!(decoded.age, 0);
}

#[test]
fn deserialize_rejects_missing_required_field() {
    let value = serde_json::json!({
        "name": "B",
        "phone": "777",
        "age": 20
    });

    let err = serde_json::from_value::<Registration>(value).unwrap_err();
    assert!(
        err.to_string().contains("missing field `email`"),
        "unexpected error: {err}"
    );
}

#[test]
fn validate_rejects_whitespace_only_name() {
    let registration = Registration::new(" \t", "a@x.com", "555", 30);

    assert_eq!(
        registration.validate().unwrap_err(),
        RegistrationValidationError::BlankField("name")
    );
}
