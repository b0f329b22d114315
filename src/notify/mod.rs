//! Digest formatting and delivery

pub mod embed;
pub mod sink;
pub mod summary;

pub use embed::{
    build_digest, format_count, format_entry, truncate_with_ellipsis, Embed, EmbedField,
    WebhookPayload, FIELD_VALUE_LIMIT, SUMMARY_LIMIT,
};
pub use sink::{NotificationSink, WebhookNotifier};
pub use summary::summarize;
