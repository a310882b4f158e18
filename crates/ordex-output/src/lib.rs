//! Export files, invoice drop files and their delivery.

pub mod encoding;
pub mod error;
pub mod invoice;
pub mod payload;
pub mod sink;

pub use encoding::{LATIN1_PLACEHOLDER, Unmappable, encode_latin1};
pub use error::{DeliveryError, EmitError, SinkError};
pub use invoice::{InvoiceFiles, InvoiceRequest, build_invoice_files};
pub use payload::{
    EXPORT_DELIMITER, emit_batch, export_filename, order_file, order_reference, render_payload,
    sanitize_component,
};
pub use sink::{DeliveryReport, FileSink, LocalDirSink, MemorySink, deliver_batch};
