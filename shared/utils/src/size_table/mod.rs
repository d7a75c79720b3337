//! Size reference workbook parsing.
//!
//! Weight ranges are kept in catties exactly as the sheet states them.

pub mod parser;
pub mod range;

pub use parser::{
    ParsedSizeTable, SectionLayout, SizeTableParser, SkippedBracket, ADULT_COAT, ADULT_UNDERWEAR,
    CHILDREN_COAT, CHILDREN_UNDERWEAR, SOCKS,
};
pub use range::{parse_range, RangeParseError, AGE_UNITS, HEIGHT_UNITS, WEIGHT_UNITS};
