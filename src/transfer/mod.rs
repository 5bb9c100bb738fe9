//! Transfer engine
//!
//! Byte-level mechanics of one upload or one download over a borrowed
//! connection, plus the local naming and destination rules they rely on.

pub mod destination;
pub mod download;
pub mod naming;
pub mod results;
pub mod upload;

pub use destination::{operator_identity, resolve_download_dir};
pub use download::download;
pub use naming::{create_unique_file, unique_file_name};
pub use results::{TransferDirection, TransferReport};
pub use upload::upload;
