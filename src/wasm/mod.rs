//! Contract payload handling

pub mod compression;

pub use compression::{
    classify, gzip_it, is_gzip, is_wasm, normalize, uncompress, PayloadError, PayloadKind,
    GZIP_IDENT, WASM_IDENT,
};
