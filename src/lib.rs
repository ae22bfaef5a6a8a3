//! A CharString interpreter for Type 1 and Type 2 (CFF) font programs.
//!
//! The interpreter is the core of a PDF font subsystem: a small stack
//! machine that consumes the opaque byte sequence describing one glyph
//! outline and emits a 2D vector path. The surrounding loader registers
//! glyph programs and subroutine tables on a [`FontProgram`]; the
//! rasterizer side pulls device-space paths back out with
//! [`FontProgram::build_char`].

pub use crate::{
    charstring::Dialect,
    error::{CharStringError, CharStringResult},
    font_program::{AccentedCharacter, EncodingResolver, FontProgram, Glyph},
    geometry::{BoundingBox, Matrix, Path, PathCommand, Point},
};

mod charstring;
mod encoding;
mod error;
mod font_program;
mod geometry;
mod parse_binary;
