/// Plain-text scan formats
pub mod xyz;

pub use xyz::{load_scan, load_scan_from_file, parse_record};
