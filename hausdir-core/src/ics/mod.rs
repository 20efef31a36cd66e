//! Line-level reading and rewriting of task (.ics) files.
//!
//! Only the first VTODO component of a file is interpreted; everything
//! outside of it is carried through a rewrite untouched.

mod generate;
mod parse;

pub use generate::{escape_text, fold_line, format_utc_stamp, rewrite_todo, upsert_property};
pub use parse::{
    LineEnding, Properties, TodoRegion, property_key, read_properties, unescape_text,
    unfold_lines,
};

pub const BEGIN_TODO: &str = "BEGIN:VTODO";
pub const END_TODO: &str = "END:VTODO";
