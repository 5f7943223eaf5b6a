use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub const TEMPLATE_ID_FIELD: &str = "template_id";
pub const EMAIL_ADDRESS_FIELD: &str = "email_address";
pub const PHONE_NUMBER_FIELD: &str = "phone_number";

#[derive(Debug, Clone, PartialEq)]
/// One `field -> value` entry contributed to a [`Payload`].
pub struct PayloadItem {
    field: String,
    value: Value,
}

impl PayloadItem {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Request body under construction.
///
/// Entries are kept in the order they were contributed. When serialized, the
/// payload becomes one flat JSON object in which a field contributed twice
/// resolves to its last value. Fields fixed by the operation (template id,
/// recipient) are written after option fields and cannot be overridden.
pub struct Payload {
    required: Vec<PayloadItem>,
    items: Vec<PayloadItem>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_required<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self {
            required: fields
                .into_iter()
                .map(|(field, value)| PayloadItem {
                    field: field.to_owned(),
                    value,
                })
                .collect(),
            items: Vec::new(),
        }
    }

    /// Return a payload with one more entry appended.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.items.push(PayloadItem {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Entries contributed by options, in the order they were appended.
    pub fn items(&self) -> &[PayloadItem] {
        &self.items
    }

    /// Resolve the payload into a JSON object (last write per field wins).
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for item in self.items.iter().chain(self.required.iter()) {
            map.insert(item.field.clone(), item.value.clone());
        }
        map
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}
