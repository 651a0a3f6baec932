//! # segcodec
//!
//! A codec for segmented bit-string sections: compact, URL-safe tokens such as
//! privacy-consent signals carried in headers, cookies and query strings.
//!
//! A section is one or more segments. Each segment is an ordered list of
//! fixed-width fields packed MSB-first into a bitstring, written out six bits
//! per character in a URL-safe alphabet, and joined to the other segments with
//! `.`. On decode every piece is routed to its segment by the tag in its
//! leading bits, so pieces may arrive in any order and optional segments may be
//! absent.
//!
//! Field layouts are data: build a [schema::Schema] from [segment::Segment]s
//! and [field::Field]s (or, with the `serde` feature, from JSON).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use segcodec::field::Field;
//! use segcodec::schema::{Schema, DEFAULT_TAG_WIDTH};
//! use segcodec::section::Section;
//! use segcodec::segment::Segment;
//!
//! let schema = Schema::compile(
//!     DEFAULT_TAG_WIDTH,
//!     &[
//!         Segment::core("core", vec![
//!             Field::fixed_integer("version", 6, 1),
//!             Field::fixed_integer("sale_opt_out", 2, 0),
//!         ]),
//!         Segment::extension("gpc", 1, vec![
//!             Field::fixed_integer("gpc_segment_type", 3, 1),
//!             Field::boolean("gpc", false),
//!         ]),
//!     ],
//! )
//! .unwrap();
//! let schema = Arc::new(schema);
//!
//! let mut section = Section::new(schema.clone());
//! section.set_int("sale_opt_out", 1).unwrap();
//! section.set_bool("gpc", true).unwrap();
//! let token = section.encode().unwrap();
//! assert_eq!(token, "BQ.M");
//!
//! let decoded = Section::from_token(schema, "M.BQ").unwrap();
//! assert_eq!(decoded.get_int("sale_opt_out"), Ok(1));
//! assert_eq!(decoded.get_bool("gpc"), Ok(true));
//! ```

pub mod bit_reader;
pub mod bits;
pub mod bitstring;
pub mod errors;
pub mod field;
pub mod framer;
pub mod schema;
pub mod section;
pub mod segment;
#[cfg(feature = "serde")]
pub mod serde;
pub mod sextet;
pub mod store;
pub mod value;

pub use errors::SectionError;
pub use section::{Section, decode, decode_into, encode};
