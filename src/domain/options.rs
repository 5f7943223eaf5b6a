//! Per-call options, restricted by role at the type level.
//!
//! Each operation accepts a slice of trait objects for its role only:
//! `send_sms` takes `&dyn SmsOption`, `send_email` takes `&dyn EmailOption`
//! and `template_preview` takes `&dyn PreviewOption`. Passing an option that
//! does not implement the role is a compile error:
//!
//! ```compile_fail
//! use notify_client::{EmailReplyToId, SmsOption};
//!
//! let reply_to = EmailReplyToId::new("ef661d9d-17bc-4fc2-ae12-1d3e00ae202e");
//! let _options: &[&dyn SmsOption] = &[&reply_to];
//! ```
//!
//! ```compile_fail
//! use notify_client::{EmailOption, SmsSenderId};
//!
//! let sender = SmsSenderId::new("8e222534-7f05-4972-86e3-17c5d9f894e2");
//! let _options: &[&dyn EmailOption] = &[&sender];
//! ```
//!
//! ```compile_fail
//! use notify_client::{PreviewOption, Reference};
//!
//! let reference = Reference::new("order-1");
//! let _options: &[&dyn PreviewOption] = &[&reference];
//! ```
//!
//! Options shared between roles coerce to each of them:
//!
//! ```
//! use notify_client::{
//!     EmailOption, EmailReplyToId, Personalisation, PreviewOption, Reference, SmsOption,
//!     SmsSenderId,
//! };
//!
//! let reference = Reference::new("order-1");
//! let personalisation = Personalisation::new().with("name", "Sam");
//! let _sms: &[&dyn SmsOption] = &[&SmsSenderId::new("sender"), &reference, &personalisation];
//! let _email: &[&dyn EmailOption] = &[&EmailReplyToId::new("reply"), &reference];
//! let _preview: &[&dyn PreviewOption] = &[&personalisation];
//! ```

use serde_json::{Map, Value, json};

use crate::domain::request::{EMAIL_ADDRESS_FIELD, PHONE_NUMBER_FIELD, Payload, TEMPLATE_ID_FIELD};

/// Option accepted by `send_sms`.
pub trait SmsOption: Send + Sync {
    fn update_sms_payload(&self, payload: Payload) -> Payload;
}

/// Option accepted by `send_email`.
pub trait EmailOption: Send + Sync {
    fn update_email_payload(&self, payload: Payload) -> Payload;
}

/// Option accepted by `template_preview`.
pub trait PreviewOption: Send + Sync {
    fn update_preview_payload(&self, payload: Payload) -> Payload;
}

/// Option accepted by every operation.
pub trait CommonOption: SmsOption + EmailOption + PreviewOption {}

impl<T: SmsOption + EmailOption + PreviewOption> CommonOption for T {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Caller-chosen identifier for one notification or a batch of them.
pub struct Reference(String);

impl Reference {
    pub const FIELD: &'static str = "reference";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    fn update_payload(&self, payload: Payload) -> Payload {
        payload.push(Self::FIELD, self.0.as_str())
    }
}

impl SmsOption for Reference {
    fn update_sms_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

impl EmailOption for Reference {
    fn update_email_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Delivery-status callback: the URL receiving receipts and the bearer token
/// the API presents when calling it.
pub struct StatusCallback {
    url: String,
    bearer_token: String,
}

impl StatusCallback {
    pub const URL_FIELD: &'static str = "status_callback_url";
    pub const BEARER_TOKEN_FIELD: &'static str = "status_callback_bearer_token";

    pub fn new(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    fn update_payload(&self, payload: Payload) -> Payload {
        payload
            .push(Self::URL_FIELD, self.url.as_str())
            .push(Self::BEARER_TOKEN_FIELD, self.bearer_token.as_str())
    }
}

impl SmsOption for StatusCallback {
    fn update_sms_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

impl EmailOption for StatusCallback {
    fn update_email_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Id of the reply-to address that receives replies to an email.
pub struct EmailReplyToId(String);

impl EmailReplyToId {
    pub const FIELD: &'static str = "email_reply_to_id";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl EmailOption for EmailReplyToId {
    fn update_email_payload(&self, payload: Payload) -> Payload {
        payload.push(Self::FIELD, self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Id of the sender shown on a text message.
pub struct SmsSenderId(String);

impl SmsSenderId {
    pub const FIELD: &'static str = "sms_sender_id";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl SmsOption for SmsSenderId {
    fn update_sms_payload(&self, payload: Payload) -> Payload {
        payload.push(Self::FIELD, self.0.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Placeholder values substituted into a template, such as a name or an
/// amount owing.
///
/// Pairs are kept in insertion order; a key given twice resolves to its last
/// value when the payload is built.
pub struct Personalisation(Vec<(String, String)>);

impl Personalisation {
    pub const FIELD: &'static str = "personalisation";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key -> value` pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.0 {
            map.insert(key.clone(), json!(value));
        }
        Value::Object(map)
    }

    fn update_payload(&self, payload: Payload) -> Payload {
        payload.push(Self::FIELD, self.to_value())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Personalisation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl SmsOption for Personalisation {
    fn update_sms_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

impl EmailOption for Personalisation {
    fn update_email_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

impl PreviewOption for Personalisation {
    fn update_preview_payload(&self, payload: Payload) -> Payload {
        self.update_payload(payload)
    }
}

pub(crate) fn sms_payload(
    template_id: &str,
    phone_number: &str,
    options: &[&dyn SmsOption],
) -> Payload {
    let payload = Payload::with_required([
        (TEMPLATE_ID_FIELD, json!(template_id)),
        (PHONE_NUMBER_FIELD, json!(phone_number)),
    ]);
    options
        .iter()
        .fold(payload, |payload, option| option.update_sms_payload(payload))
}

pub(crate) fn email_payload(
    template_id: &str,
    email_address: &str,
    options: &[&dyn EmailOption],
) -> Payload {
    let payload = Payload::with_required([
        (TEMPLATE_ID_FIELD, json!(template_id)),
        (EMAIL_ADDRESS_FIELD, json!(email_address)),
    ]);
    options
        .iter()
        .fold(payload, |payload, option| option.update_email_payload(payload))
}

pub(crate) fn preview_payload(options: &[&dyn PreviewOption]) -> Payload {
    options.iter().fold(Payload::new(), |payload, option| {
        option.update_preview_payload(payload)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_json(payload: &Payload) -> Value {
        serde_json::to_value(payload).unwrap()
    }

    #[test]
    fn sms_payload_contains_required_fields_only_without_options() {
        let payload = sms_payload("tpl", "+61400000000", &[]);
        assert_eq!(
            to_json(&payload),
            json!({ "template_id": "tpl", "phone_number": "+61400000000" })
        );
    }

    #[test]
    fn email_payload_folds_options_in_order() {
        let reference = Reference::new("ref1");
        let reply_to = EmailReplyToId::new("id1");
        let personalisation = Personalisation::new().with("name", "Sam");

        let payload = email_payload(
            "tpl",
            "someone@example.com",
            &[&reference, &reply_to, &personalisation],
        );

        let fields = payload
            .items()
            .iter()
            .map(|item| item.field())
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec!["reference", "email_reply_to_id", "personalisation"]
        );

        assert_eq!(
            to_json(&payload),
            json!({
                "template_id": "tpl",
                "email_address": "someone@example.com",
                "reference": "ref1",
                "email_reply_to_id": "id1",
                "personalisation": { "name": "Sam" }
            })
        );
    }

    #[test]
    fn options_accumulate_additively() {
        let reference = Reference::new("r");
        let sender = SmsSenderId::new("s");

        let only_a = to_json(&sms_payload("tpl", "0400", &[&reference]));
        let both = to_json(&sms_payload("tpl", "0400", &[&reference, &sender]));

        let only_a = only_a.as_object().unwrap();
        let both = both.as_object().unwrap();
        for (key, value) in only_a {
            assert_eq!(both.get(key), Some(value));
        }
        assert_eq!(both.get(SmsSenderId::FIELD), Some(&json!("s")));
        assert_eq!(both.len(), only_a.len() + 1);
    }

    #[test]
    fn personalisation_duplicate_keys_keep_last_value() {
        let personalisation: Personalisation =
            [("name", "A"), ("name", "B")].into_iter().collect();
        let payload = preview_payload(&[&personalisation]);
        assert_eq!(
            to_json(&payload),
            json!({ "personalisation": { "name": "B" } })
        );
    }

    #[test]
    fn repeated_option_resolves_to_last_value() {
        let first = Reference::new("first");
        let second = Reference::new("second");
        let payload = sms_payload("tpl", "0400", &[&first, &second]);
        assert_eq!(payload.items().len(), 2);
        assert_eq!(to_json(&payload)["reference"], "second");
    }

    #[test]
    fn status_callback_contributes_two_fields() {
        let callback = StatusCallback::new("https://example.com/cb", "secret-token");
        let payload = email_payload("tpl", "a@example.com", &[&callback]);
        let json = to_json(&payload);
        assert_eq!(json["status_callback_url"], "https://example.com/cb");
        assert_eq!(json["status_callback_bearer_token"], "secret-token");
    }

    #[test]
    fn options_cannot_override_required_fields() {
        struct Hijack;
        impl SmsOption for Hijack {
            fn update_sms_payload(&self, payload: Payload) -> Payload {
                payload.push("phone_number", "attacker")
            }
        }

        let payload = sms_payload("tpl", "0400", &[&Hijack]);
        assert_eq!(to_json(&payload)["phone_number"], "0400");
    }

    #[test]
    fn personalisation_is_a_common_option() {
        fn assert_common<T: CommonOption>(_: &T) {}
        assert_common(&Personalisation::new());
    }

    #[test]
    fn empty_preview_payload_is_empty_object() {
        assert_eq!(to_json(&preview_payload(&[])), json!({}));
    }
}
