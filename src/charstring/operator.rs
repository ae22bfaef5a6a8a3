/// Single-byte CharString operators.
///
/// Byte values 0 through 31 are operator space in both dialects; everything
/// else is number encoding. The assignments are shared between Type 1 and
/// Type 2 except where noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    /// Declares a horizontal stem hint zone. Hint data is not retained.
    HorizontalStem,
    /// Declares a vertical stem hint zone. Hint data is not retained.
    VerticalStem,
    /// Equivalent to `0 dy rmoveto`
    VerticalMoveTo,
    /// Appends straight line segments for each (dx, dy) pair on the stack.
    RelativeLineTo,
    /// Appends alternating horizontal/vertical lines, starting horizontal.
    HorizontalLineTo,
    /// Appends alternating vertical/horizontal lines, starting vertical.
    VerticalLineTo,
    /// Appends cubic Bézier curves for each six deltas on the stack.
    RelativeRelativeCurveTo,
    ClosePath,
    /// Invokes an entry of the local subroutine table.
    CallSubroutine,
    /// Returns from a subroutine; a no-op here because subroutine exit is
    /// the unwind of the recursive call.
    Return,
    /// Escape byte introducing a two-byte extended operator.
    Extended,
    /// Sets the left side bearing point and the advance width (Type 1).
    HorizontalSideBearingWidth,
    EndChar,
    /// Like hstem, but for charstrings that also carry hint masks.
    HorizontalStemHintMask,
    /// Selects the active hint set; the mask bytes that follow are skipped.
    HintMask,
    /// Selects counter-controlled hint zones; mask bytes are skipped.
    CounterMask,
    RelativeMoveTo,
    /// Equivalent to `dx 0 rmoveto`
    HorizontalMoveTo,
    /// Like vstem, but for charstrings that also carry hint masks.
    VerticalStemHintMask,
    /// One or more curves followed by a terminating line.
    RelativeCurveLine,
    /// One or more lines followed by a terminating curve.
    RelativeLineCurve,
    /// Curves whose tangents start and end vertical.
    VerticalVerticalCurveTo,
    /// Curves whose tangents start and end horizontal.
    HorizontalHorizontalCurveTo,
    /// Invokes an entry of the global subroutine table (Type 2 only).
    CallGlobalSubroutine,
    /// Alternating-tangent curves, first tangent vertical.
    VerticalHorizontalCurveTo,
    /// Alternating-tangent curves, first tangent horizontal.
    HorizontalVerticalCurveTo,
}

impl Operator {
    pub fn from_byte(v: u8) -> Option<Self> {
        Some(match v {
            1 => Self::HorizontalStem,
            3 => Self::VerticalStem,
            4 => Self::VerticalMoveTo,
            5 => Self::RelativeLineTo,
            6 => Self::HorizontalLineTo,
            7 => Self::VerticalLineTo,
            8 => Self::RelativeRelativeCurveTo,
            9 => Self::ClosePath,
            10 => Self::CallSubroutine,
            11 => Self::Return,
            12 => Self::Extended,
            13 => Self::HorizontalSideBearingWidth,
            14 => Self::EndChar,
            18 => Self::HorizontalStemHintMask,
            19 => Self::HintMask,
            20 => Self::CounterMask,
            21 => Self::RelativeMoveTo,
            22 => Self::HorizontalMoveTo,
            23 => Self::VerticalStemHintMask,
            24 => Self::RelativeCurveLine,
            25 => Self::RelativeLineCurve,
            26 => Self::VerticalVerticalCurveTo,
            27 => Self::HorizontalHorizontalCurveTo,
            29 => Self::CallGlobalSubroutine,
            30 => Self::VerticalHorizontalCurveTo,
            31 => Self::HorizontalVerticalCurveTo,
            _ => return None,
        })
    }
}

/// Operators reached through the `12 x` escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtendedOperator {
    /// Brackets the outline section for the dots in letters such as "i".
    DotSection,
    /// Declares three vertical stem zones at once.
    VerticalStem3,
    /// Declares three horizontal stem zones at once.
    HorizontalStem3,
    /// Builds an accented character from a base and an accent glyph, both
    /// referenced by their Adobe StandardEncoding codes.
    StandardEncodingAccentedCharacter,
    /// Divides num1 by num2, producing a real result.
    Div,
    /// Calls a PostScript procedure through the othersubr side channel.
    CallOtherSubroutine,
    /// Moves the top of the othersubr scratch stack back onto the operand
    /// stack.
    Pop,
    /// Sets the current point in absolute character space coordinates.
    SetCurrentPoint,
    /// Flex with horizontal tangents (reserved; emits no geometry).
    HorizontalFlex,
    /// General flex (reserved; emits no geometry).
    Flex,
    /// Flex, horizontal variant with mixed deltas (reserved).
    HorizontalFlex1,
    /// General flex with a single final delta (reserved).
    Flex1,
}

impl ExtendedOperator {
    pub fn from_byte(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::DotSection,
            1 => Self::VerticalStem3,
            2 => Self::HorizontalStem3,
            6 => Self::StandardEncodingAccentedCharacter,
            12 => Self::Div,
            16 => Self::CallOtherSubroutine,
            17 => Self::Pop,
            33 => Self::SetCurrentPoint,
            34 => Self::HorizontalFlex,
            35 => Self::Flex,
            36 => Self::HorizontalFlex1,
            37 => Self::Flex1,
            _ => return None,
        })
    }
}
