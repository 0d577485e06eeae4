use serde_json::Value;

use crate::{EyewitnessError, IdentityFields, JsonMap};

/// Shallow-merges caller data with identity fields. Identity keys win.
pub(crate) fn build_ping_payload(
    data: JsonMap,
    identity: &IdentityFields,
) -> Result<JsonMap, EyewitnessError> {
    let fields = match serde_json::to_value(identity) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(EyewitnessError::Decode(format!(
                "identity fields must encode as an object, got {other}"
            )))
        }
        Err(err) => {
            return Err(EyewitnessError::Decode(format!(
                "identity fields failed to encode: {err}"
            )))
        }
    };

    let mut payload = data;
    payload.extend(fields);
    Ok(payload)
}

pub(crate) fn decode_json_map(body: &str) -> Result<JsonMap, EyewitnessError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EyewitnessError::Decode(format!(
            "expected JSON object, got {other}"
        ))),
        Err(err) => Err(EyewitnessError::Decode(format!(
            "invalid response JSON: {err}; body: {body}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_ping_payload, decode_json_map};
    use crate::{IdentityFields, JsonMap};

    fn identity() -> IdentityFields {
        IdentityFields {
            app_token: "real-token".to_owned(),
            secret_key: "real-secret".to_owned(),
            environment: "staging".to_owned(),
            client_version: "1.2.3".to_owned(),
        }
    }

    fn map(value: serde_json::Value) -> JsonMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn identity_fields_overwrite_colliding_keys() {
        let data = map(json!({
            "app_token": "spoofed",
            "secret_key": "spoofed",
            "application_environment": "spoofed",
            "eyewitness_version": "spoofed",
            "tube": "default",
        }));

        let payload = build_ping_payload(data, &identity()).expect("payload must build");

        assert_eq!(payload["app_token"], "real-token");
        assert_eq!(payload["secret_key"], "real-secret");
        assert_eq!(payload["application_environment"], "staging");
        assert_eq!(payload["eyewitness_version"], "1.2.3");
        assert_eq!(payload["tube"], "default");
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn empty_data_yields_identity_only() {
        let payload = build_ping_payload(JsonMap::new(), &identity()).expect("payload must build");
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn identity_uses_wire_field_names() {
        let payload = build_ping_payload(JsonMap::new(), &identity()).expect("payload must build");
        let mut keys: Vec<_> = payload.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "app_token",
                "application_environment",
                "eyewitness_version",
                "secret_key"
            ]
        );
    }

    #[test]
    fn decode_rejects_non_object_body() {
        assert!(decode_json_map("[1, 2]").is_err());
        assert!(decode_json_map("not json").is_err());
        assert_eq!(
            decode_json_map(r#"{"app_token":"abc"}"#).expect("object must decode")["app_token"],
            "abc"
        );
    }
}
