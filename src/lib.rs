//! Typed Rust client for the Notify REST API.
//!
//! The crate is split into a domain layer of strong types (credential, option
//! roles, response records), a transport layer for wire-format details (token
//! signing, URL building, JSON decoding) and a small client layer running the
//! request pipeline.
//!
//! ```rust,no_run
//! use notify_client::{Credential, NotifyClient, Personalisation, Reference};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), notify_client::NotifyError> {
//!     let client = NotifyClient::new(Credential::parse("name-<service id>-<secret>")?)?;
//!     let personalisation = Personalisation::new().with("name", "Sam");
//!     let _sent = client
//!         .send_sms(
//!             "83f8a64f-74ec-4d90-ae48-394a8af3fe7c",
//!             "+61400000000",
//!             &[&Reference::new("order-1"), &personalisation],
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{NotifyClient, NotifyClientBuilder, NotifyError};
pub use transport::SigningError;
pub use domain::{
    API_KEY_MIN_LEN, ApiError, ApiErrorItem, CommonOption, Credential, EmailContent, EmailOption,
    EmailReplyToId, Payload, PayloadItem, Personalisation, PreviewOption, Reference, SentEmail,
    SentSms, ServiceId, SmsContent, SmsOption, SmsSenderId, StatusCallback, Template,
    TemplatePreview, TemplateRef, TemplateType, ValidationError,
};
