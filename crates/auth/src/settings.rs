//! Gate configuration: the stored (host) form, the sanitized runtime form and
//! the sanitization that maps a submitted settings form onto the stored form.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use gatehouse_core::{GateError, GateResult, ResourceId};

/// Key under which the settings object lives in the configuration store.
pub const SETTINGS_KEY: &str = "gatehouse_settings";

pub const LOGIN_PAGE_FIELD: &str = "login_page_id";
pub const CHECKOUT_FIELD: &str = "force_checkout_login";
pub const SHOP_FIELD: &str = "force_shop_login";
pub const PRODUCT_FIELD: &str = "force_product_login";

/// Checkbox-like fields accepted from the settings form.
pub const CHECKBOX_FIELDS: [&str; 3] = [CHECKOUT_FIELD, SHOP_FIELD, PRODUCT_FIELD];

/// Two-valued checkbox as persisted by the host (`"yes"` / `"no"`).
///
/// Decoding is strict: only the exact string `"yes"` is `Yes`; anything else
/// (missing, `"on"`, `true`, `"YES"`) is `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn from_submitted(value: Option<&str>) -> Self {
        match value {
            Some("yes") => YesNo::Yes,
            _ => YesNo::No,
        }
    }

    pub fn as_bool(self) -> bool {
        self == YesNo::Yes
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl<'de> Deserialize<'de> for YesNo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(YesNo::from_submitted(value.as_str()))
    }
}

/// Settings exactly as persisted in the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default, deserialize_with = "deserialize_absint")]
    pub login_page_id: u64,
    #[serde(default)]
    pub force_checkout_login: YesNo,
    #[serde(default)]
    pub force_shop_login: YesNo,
    #[serde(default)]
    pub force_product_login: YesNo,
}

impl StoredSettings {
    /// Values written on activation: commerce account page, nothing forced.
    pub fn activation_defaults() -> Self {
        Self {
            login_page_id: 0,
            force_checkout_login: YesNo::No,
            force_shop_login: YesNo::No,
            force_product_login: YesNo::No,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            LOGIN_PAGE_FIELD: self.login_page_id,
            CHECKOUT_FIELD: self.force_checkout_login.as_str(),
            SHOP_FIELD: self.force_shop_login.as_str(),
            PRODUCT_FIELD: self.force_product_login.as_str(),
        })
    }

    /// Decode a stored option value.
    ///
    /// Missing keys fall back to their defaults; a value that is not an object
    /// at all is rejected.
    pub fn from_json(value: &serde_json::Value) -> GateResult<Self> {
        if !value.is_object() {
            return Err(GateError::invalid_settings(format!(
                "expected an object under '{SETTINGS_KEY}', found {value}"
            )));
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self::activation_defaults()
    }
}

/// Sanitized configuration, read once per request and passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    /// Explicit login/registration page. `None` means "commerce account page".
    pub login_page_id: Option<ResourceId>,
    pub force_checkout_login: bool,
    pub force_shop_login: bool,
    pub force_product_login: bool,
}

impl From<&StoredSettings> for Settings {
    fn from(stored: &StoredSettings) -> Self {
        Self {
            login_page_id: ResourceId::new(stored.login_page_id),
            force_checkout_login: stored.force_checkout_login.as_bool(),
            force_shop_login: stored.force_shop_login.as_bool(),
            force_product_login: stored.force_product_login.as_bool(),
        }
    }
}

impl From<&Settings> for StoredSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            login_page_id: ResourceId::raw_or_zero(settings.login_page_id),
            force_checkout_login: settings.force_checkout_login.into(),
            force_shop_login: settings.force_shop_login.into(),
            force_product_login: settings.force_product_login.into(),
        }
    }
}

/// Sanitize a submitted settings form.
///
/// - every checkbox persists `"yes"` only when submitted as exactly `"yes"`
/// - `login_page_id` persists as a non-negative integer (`0` when absent)
/// - unknown fields are dropped
pub fn sanitize_settings(form: &HashMap<String, String>) -> StoredSettings {
    let checkbox = |field: &str| YesNo::from_submitted(form.get(field).map(String::as_str));

    StoredSettings {
        login_page_id: form.get(LOGIN_PAGE_FIELD).map(|v| absint(v)).unwrap_or(0),
        force_checkout_login: checkbox(CHECKOUT_FIELD),
        force_shop_login: checkbox(SHOP_FIELD),
        force_product_login: checkbox(PRODUCT_FIELD),
    }
}

/// Absolute value of the leading integer in `raw`.
///
/// Mirrors how the host coerces form input: surrounding whitespace and a sign
/// are accepted, parsing stops at the first non-digit, and anything without
/// leading digits is `0`. Overflow saturates.
pub fn absint(raw: &str) -> u64 {
    let s = raw.trim_start();
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);

    s.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')))
}

fn deserialize_absint<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => u,
            (None, Some(i), _) => i.unsigned_abs(),
            (None, None, Some(f)) if f.is_finite() => f.abs().trunc() as u64,
            _ => 0,
        },
        serde_json::Value::String(s) => absint(&s),
        serde_json::Value::Bool(b) => u64::from(b),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn checked_boxes_persist_yes() {
        let stored = sanitize_settings(&form(&[
            (CHECKOUT_FIELD, "yes"),
            (SHOP_FIELD, "yes"),
            (PRODUCT_FIELD, "yes"),
        ]));
        assert_eq!(stored.force_checkout_login, YesNo::Yes);
        assert_eq!(stored.force_shop_login, YesNo::Yes);
        assert_eq!(stored.force_product_login, YesNo::Yes);
    }

    #[test]
    fn omitted_boxes_persist_no() {
        let stored = sanitize_settings(&form(&[(LOGIN_PAGE_FIELD, "12")]));
        assert_eq!(stored, StoredSettings {
            login_page_id: 12,
            ..StoredSettings::activation_defaults()
        });
        assert_eq!(stored.to_json()[CHECKOUT_FIELD], "no");
    }

    #[test]
    fn non_yes_checkbox_values_persist_no() {
        let stored = sanitize_settings(&form(&[(CHECKOUT_FIELD, "on"), (SHOP_FIELD, "YES")]));
        assert_eq!(stored.force_checkout_login, YesNo::No);
        assert_eq!(stored.force_shop_login, YesNo::No);
    }

    #[test]
    fn absint_follows_host_coercion() {
        assert_eq!(absint("42"), 42);
        assert_eq!(absint("-7"), 7);
        assert_eq!(absint("  13abc"), 13);
        assert_eq!(absint("abc"), 0);
        assert_eq!(absint(""), 0);
        assert_eq!(absint("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn stored_json_with_missing_keys_uses_defaults() {
        let stored = StoredSettings::from_json(&serde_json::json!({})).unwrap();
        assert_eq!(stored, StoredSettings::activation_defaults());
    }

    #[test]
    fn stored_json_coerces_loose_values() {
        let stored = StoredSettings::from_json(&serde_json::json!({
            "login_page_id": "-15",
            "force_checkout_login": "yes",
            "force_shop_login": true,
        }))
        .unwrap();
        assert_eq!(stored.login_page_id, 15);
        assert!(stored.force_checkout_login.as_bool());
        assert!(!stored.force_shop_login.as_bool());
    }

    #[test]
    fn non_object_stored_value_is_rejected() {
        let err = StoredSettings::from_json(&serde_json::json!("yes")).unwrap_err();
        assert!(matches!(err, GateError::InvalidSettings(_)));
    }

    #[test]
    fn zero_page_id_means_commerce_default() {
        let settings = Settings::from(&StoredSettings::activation_defaults());
        assert_eq!(settings.login_page_id, None);
        assert_eq!(StoredSettings::from(&settings).login_page_id, 0);
    }

    proptest! {
        /// Whatever the form contains, the stored page id is a non-negative
        /// integer and every checkbox is exactly "yes" or "no".
        #[test]
        fn sanitized_output_stays_in_domain(
            page in ".{0,12}",
            checkout in proptest::option::of(".{0,5}"),
            shop in proptest::option::of(prop_oneof![Just("yes".to_string()), ".{0,5}"]),
        ) {
            let mut input = form(&[(LOGIN_PAGE_FIELD, page.as_str())]);
            if let Some(v) = &checkout {
                input.insert(CHECKOUT_FIELD.to_string(), v.clone());
            }
            if let Some(v) = &shop {
                input.insert(SHOP_FIELD.to_string(), v.clone());
            }

            let stored = sanitize_settings(&input);
            let json = stored.to_json();

            prop_assert!(json[LOGIN_PAGE_FIELD].is_u64());
            for field in CHECKBOX_FIELDS {
                let v = json[field].as_str().unwrap();
                prop_assert!(v == "yes" || v == "no");
            }
            prop_assert_eq!(stored.force_checkout_login.as_bool(), checkout.as_deref() == Some("yes"));
            prop_assert_eq!(stored.force_shop_login.as_bool(), shop.as_deref() == Some("yes"));
            prop_assert!(!stored.force_product_login.as_bool());

            // Persisting and re-reading is stable.
            let reread = StoredSettings::from_json(&json).unwrap();
            prop_assert_eq!(reread, stored);
        }
    }
}
