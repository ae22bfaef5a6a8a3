use std::collections::HashMap;

use crate::{
    charstring::{CharStringInterpreter, Dialect},
    encoding::standard_encoding,
    error::CharStringResult,
    geometry::{Matrix, Path, Point},
};

/// Reference to a base/accent glyph pair recorded by the seac operator.
///
/// The codes index the Adobe StandardEncoding vector; (adx, ady) is the
/// offset of the accent's origin from the base's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccentedCharacter {
    pub base_code: u8,
    pub accent_code: u8,
    pub adx: f32,
    pub ady: f32,
}

/// One glyph outline in character space, plus its advance width.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub(crate) path: Path,
    pub(crate) width: f32,
    pub(crate) accented_character: Option<AccentedCharacter>,
}

impl Glyph {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advance width in em units. Zero unless the program carried one.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn accented_character(&self) -> Option<AccentedCharacter> {
        self.accented_character
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub(crate) fn set_accented_character(&mut self, accented_character: AccentedCharacter) {
        self.accented_character = Some(accented_character);
    }
}

/// Translates the character codes recorded by seac into glyph names.
pub type EncodingResolver = Box<dyn Fn(u8) -> Option<String>>;

/// An in-memory Type 1 / Type 2 font program: the glyph map, the subroutine
/// tables and the font matrix.
///
/// The surrounding font-file loader installs the subroutine tables and the
/// font matrix, then registers each glyph's CharString with [`add_glyph`],
/// which interprets it eagerly. Once every glyph is in, a single call to
/// [`consolidate_glyphs`] resolves accented-character references. The
/// rasterizer side then pulls device-space paths out through [`build_char`].
///
/// [`add_glyph`]: FontProgram::add_glyph
/// [`consolidate_glyphs`]: FontProgram::consolidate_glyphs
/// [`build_char`]: FontProgram::build_char
pub struct FontProgram {
    dialect: Dialect,
    glyph_map: HashMap<String, Glyph>,
    local_subroutines: Vec<Vec<u8>>,
    global_subroutines: Vec<Vec<u8>>,
    font_matrix: Matrix,
    encoding_resolver: Option<EncodingResolver>,
}

impl FontProgram {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            glyph_map: HashMap::new(),
            local_subroutines: Vec::new(),
            global_subroutines: Vec::new(),
            font_matrix: Matrix::identity(),
            encoding_resolver: None,
        }
    }

    /// Install the subroutine tables. Must happen before the glyphs that
    /// call into them are registered.
    pub fn set_subroutines(&mut self, local: Vec<Vec<u8>>, global: Vec<Vec<u8>>) {
        self.local_subroutines = local;
        self.global_subroutines = global;
    }

    /// The font's character-space to text-space transform.
    pub fn set_font_matrix(&mut self, font_matrix: Matrix) {
        self.font_matrix = font_matrix;
    }

    /// Override the StandardEncoding fallback used to resolve seac
    /// character codes.
    pub fn set_encoding_resolver(&mut self, encoding_resolver: EncodingResolver) {
        self.encoding_resolver = Some(encoding_resolver);
    }

    /// Interpret one glyph's CharString and register it under `name`.
    pub fn add_glyph(&mut self, name: impl Into<String>, program: &[u8]) -> CharStringResult<()> {
        let interpreter = CharStringInterpreter::new(
            &self.local_subroutines,
            &self.global_subroutines,
            self.dialect,
        );

        let glyph = interpreter.parse_glyph(program)?;
        self.glyph_map.insert(name.into(), glyph);

        Ok(())
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyph_map.get(name)
    }

    pub fn glyph_names(&self) -> impl Iterator<Item = &str> {
        self.glyph_map.keys().map(String::as_str)
    }

    /// Resolve every accented-character reference recorded during parsing.
    ///
    /// For each glyph with a seac record whose base glyph exists, the
    /// glyph's path becomes a copy of the base path with the accent path
    /// (translated by the recorded offset) appended. Missing bases leave
    /// the glyph untouched; running this twice is equivalent to running it
    /// once.
    pub fn consolidate_glyphs(&mut self) {
        let mut consolidated = Vec::new();

        for (name, glyph) in &self.glyph_map {
            let Some(accented) = glyph.accented_character else {
                continue;
            };

            let Some(base_glyph) = self.glyph_by_code(accented.base_code) else {
                continue;
            };

            // a base that is itself accented would make the result depend
            // on consolidation order; leave such chains unresolved
            if base_glyph.accented_character.is_some() {
                continue;
            }

            let mut path = base_glyph.path.clone();

            if let Some(accent_glyph) = self.glyph_by_code(accented.accent_code) {
                let accent_path = accent_glyph
                    .path
                    .transformed(Matrix::translation(accented.adx, accented.ady));
                path.append_path(&accent_path);
            }

            consolidated.push((name.clone(), path));
        }

        for (name, path) in consolidated {
            if let Some(glyph) = self.glyph_map.get_mut(&name) {
                glyph.path = path;
            }
        }
    }

    fn glyph_by_code(&self, code: u8) -> Option<&Glyph> {
        let name = match &self.encoding_resolver {
            Some(resolver) => resolver(code)?,
            None => standard_encoding(code)?.to_owned(),
        };

        self.glyph_map.get(&name)
    }

    /// Build the device-space path for `name`, or an empty path when the
    /// glyph does not exist (a valid rendering fallback, not an error).
    pub fn build_char(&self, name: &str, width: f32, subpixel_offset: Point) -> Path {
        let Some(glyph) = self.glyph_map.get(name) else {
            return Path::new();
        };

        // translate such that the top-left point lands at (0, 0)
        let bounding_box = glyph.path.bounding_box();
        let translation = Matrix::translation(
            -bounding_box.x(),
            -(bounding_box.y() + bounding_box.height()),
        );

        let transform = translation
            * self.glyph_transform_to_device_space(glyph, width)
            * Matrix::translation(subpixel_offset.x, subpixel_offset.y);

        glyph.path.transformed(transform)
    }

    /// The device-space offset undoing the bounding-box translation that
    /// [`build_char`](FontProgram::build_char) applies, used by text layout
    /// to position the glyph relative to its origin.
    pub fn glyph_translation(&self, name: &str, width: f32) -> Point {
        let Some(glyph) = self.glyph_map.get(name) else {
            return Point::origin();
        };

        let transform = self.glyph_transform_to_device_space(glyph, width);

        let bounding_box = glyph.path.bounding_box();
        let translation = Point::new(
            bounding_box.x(),
            bounding_box.y() + bounding_box.height(),
        );

        transform.map(translation)
    }

    /// Character space to device space: a uniform scale chosen so the glyph
    /// advances `width` device units, with the Y axis flipped.
    fn glyph_transform_to_device_space(&self, glyph: &Glyph, width: f32) -> Matrix {
        let scale = width / (self.font_matrix.a() * glyph.width + self.font_matrix.e());

        Matrix::scale(scale, -scale) * self.font_matrix
    }
}
