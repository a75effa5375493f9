//! Structured log macros.
//!
//! Every workflow log line carries the same field names so that log
//! pipelines can group by document or account:
//! - `subsystem`: registry, signing, query, content
//! - `document_id`: document the line refers to
//! - additional context fields

/// Log an event with a `subsystem` field.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a document-related event with standard fields.
#[macro_export]
macro_rules! log_document_event {
    ($level:ident, $subsystem:expr, $msg:expr, $document_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            document_id = %$document_id,
            $($($field)*,)?
            $msg
        )
    };
}
