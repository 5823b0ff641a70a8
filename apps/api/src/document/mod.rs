// Source document loading: fetch, YAML decoding and key normalization.

pub mod case;
pub mod raw;
pub mod source;
