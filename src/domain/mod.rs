//! Domain layer: strong types with validation and invariants (no I/O).

mod options;
mod request;
mod response;
mod validation;
mod value;

pub(crate) use options::{email_payload, preview_payload, sms_payload};
pub use options::{
    CommonOption, EmailOption, EmailReplyToId, Personalisation, PreviewOption, Reference,
    SmsOption, SmsSenderId, StatusCallback,
};
pub use request::{Payload, PayloadItem};
pub use response::{
    ApiError, ApiErrorItem, EmailContent, SentEmail, SentSms, SmsContent, Template,
    TemplatePreview, TemplateRef,
};
pub use validation::ValidationError;
pub use value::{API_KEY_MIN_LEN, Credential, SecretKey, ServiceId, TemplateType};
