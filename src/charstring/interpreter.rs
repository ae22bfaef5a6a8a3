use crate::{
    charstring::{
        operator::{ExtendedOperator, Operator},
        stack::{OperandStack, PostScriptStack},
        Dialect,
    },
    error::{CharStringError, CharStringResult},
    font_program::{AccentedCharacter, Glyph},
    geometry::Point,
    parse_binary::BinaryParser,
};

// Type 1 Font Format: https://adobe-type-tools.github.io/font-tech-notes/pdfs/T1_SPEC.pdf (Chapter 6: CharStrings dictionary)
// Type 2 Charstring Format: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf

/// Subroutine calls may be nested 10 deep.
const MAX_SUBROUTINE_DEPTH: u8 = 10;

/// A captured flex holds seven points as (x, y) pairs: a reference point
/// followed by the six points of the two replacement curves.
const FLEX_SEQUENCE_LEN: usize = 14;

/// Magic Type 1 local subroutine numbers bracketing a flex feature.
const FLEX_END: usize = 0;
const FLEX_START: usize = 1;
const FLEX_CONTINUE: usize = 2;

struct ProgramReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ProgramReader<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }
}

impl BinaryParser for ProgramReader<'_> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }
    fn cursor(&self) -> usize {
        self.cursor
    }
    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}

/// Mutable state threaded through one top-level glyph parse, shared across
/// the full depth of subroutine recursion.
#[derive(Debug)]
pub(crate) struct GlyphParserState {
    pub glyph: Glyph,
    pub point: Point,
    pub stack: OperandStack,
    pub postscript_stack: PostScriptStack,
    pub n_hints: usize,
    pub flex_feature: bool,
    pub flex_index: usize,
    pub flex_sequence: [f32; FLEX_SEQUENCE_LEN],
    pub is_first_command: bool,
}

impl GlyphParserState {
    pub fn new() -> Self {
        Self {
            glyph: Glyph::default(),
            point: Point::origin(),
            stack: OperandStack::new(),
            postscript_stack: PostScriptStack::new(),
            n_hints: 0,
            flex_feature: false,
            flex_index: 0,
            flex_sequence: [0.0; FLEX_SEQUENCE_LEN],
            is_first_command: true,
        }
    }
}

/// Argument-count parity that signals a leading advance width on the first
/// operator of a Type 2 program.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EvenOrOdd {
    Even,
    Odd,
}

/// Executes CharString programs against a shared [`GlyphParserState`].
///
/// The interpreter itself is immutable: it borrows the subroutine tables and
/// carries the dialect, so one instance can parse any number of glyphs.
pub(crate) struct CharStringInterpreter<'a> {
    local_subroutines: &'a [Vec<u8>],
    global_subroutines: &'a [Vec<u8>],
    dialect: Dialect,
}

impl<'a> CharStringInterpreter<'a> {
    pub fn new(
        local_subroutines: &'a [Vec<u8>],
        global_subroutines: &'a [Vec<u8>],
        dialect: Dialect,
    ) -> Self {
        Self {
            local_subroutines,
            global_subroutines,
            dialect,
        }
    }

    /// Interpret one glyph's program and produce the finished glyph.
    pub fn parse_glyph(&self, program: &[u8]) -> CharStringResult<Glyph> {
        let mut state = GlyphParserState::new();

        self.execute(program, &mut state, 0)?;

        Ok(state.glyph)
    }

    fn execute(
        &self,
        program: &[u8],
        state: &mut GlyphParserState,
        depth: u8,
    ) -> CharStringResult<()> {
        let mut reader = ProgramReader::new(program);

        while reader.peek().is_some() {
            let byte = reader.next()?;

            if byte == 28 || byte >= 32 {
                self.read_number(byte, &mut reader, state)?;
                continue;
            }

            let Some(operator) = Operator::from_byte(byte) else {
                anyhow::bail!(CharStringError::UnhandledOperator {
                    byte,
                    extended: false
                });
            };

            self.execute_operator(operator, &mut reader, state, depth)?;

            state.is_first_command = false;
        }

        Ok(())
    }

    /// Decode one inline numeric literal introduced by `b0` and push it.
    fn read_number(
        &self,
        b0: u8,
        reader: &mut ProgramReader,
        state: &mut GlyphParserState,
    ) -> CharStringResult<()> {
        match b0 {
            32..=246 => state.stack.push(b0 as f32 - 139.0),
            247..=250 => {
                let w = reader.next()? as i32;
                state.stack.push(((b0 as i32 - 247) * 256 + w + 108) as f32)
            }
            251..=254 => {
                let w = reader.next()? as i32;
                state
                    .stack
                    .push((-(b0 as i32 - 251) * 256 - w - 108) as f32)
            }
            28 => {
                if !self.dialect.is_type2() {
                    anyhow::bail!(CharStringError::InvalidDialect {
                        operation: "short-integer encoding (28)"
                    });
                }

                let n = reader.parse_i16()?;
                state.stack.push(n as f32)
            }
            255 => {
                let n = reader.parse_i32()?;

                if self.dialect.is_type2() {
                    // a signed number with 16 bits of fraction
                    state.stack.push(n as f32 / 65536.0)
                } else {
                    state.stack.push(n as f32)
                }
            }
            _ => anyhow::bail!(CharStringError::UnhandledOperator {
                byte: b0,
                extended: false
            }),
        }
    }

    fn execute_operator(
        &self,
        operator: Operator,
        reader: &mut ProgramReader,
        state: &mut GlyphParserState,
        depth: u8,
    ) -> CharStringResult<()> {
        match operator {
            Operator::HorizontalStem | Operator::VerticalStem => {
                self.maybe_read_width(state, EvenOrOdd::Odd)?;
                state.stack.clear();
            }

            Operator::HorizontalStemHintMask | Operator::VerticalStemHintMask => {
                state.n_hints += state.stack.len() / 2;
                self.maybe_read_width(state, EvenOrOdd::Odd)?;
                state.stack.clear();
            }

            Operator::HintMask | Operator::CounterMask => {
                self.maybe_read_width(state, EvenOrOdd::Odd)?;
                state.n_hints += state.stack.len() / 2;

                let mask_bytes = (state.n_hints + 7) / 8;
                for _ in 0..mask_bytes {
                    reader.next()?;
                }

                state.stack.clear();
            }

            Operator::RelativeMoveTo => {
                self.maybe_read_width(state, EvenOrOdd::Odd)?;

                let dy = state.stack.pop()?;
                let dx = state.stack.pop()?;

                self.move_to(state, dx, dy)?;
                state.stack.clear();
            }

            Operator::HorizontalMoveTo => {
                self.maybe_read_width(state, EvenOrOdd::Even)?;

                let dx = state.stack.pop()?;

                self.move_to(state, dx, 0.0)?;
                state.stack.clear();
            }

            Operator::VerticalMoveTo => {
                self.maybe_read_width(state, EvenOrOdd::Even)?;

                let dy = state.stack.pop()?;

                self.move_to(state, 0.0, dy)?;
                state.stack.clear();
            }

            Operator::RelativeLineTo => {
                while state.stack.len() >= 2 {
                    self.relative_line(state)?;
                }
                state.stack.clear();
            }

            Operator::HorizontalLineTo => {
                self.axis_aligned_lines(state, true)?;
                state.stack.clear();
            }

            Operator::VerticalLineTo => {
                self.axis_aligned_lines(state, false)?;
                state.stack.clear();
            }

            Operator::RelativeRelativeCurveTo => {
                while state.stack.len() >= 6 {
                    self.relative_curve(state)?;
                }

                if !state.stack.is_empty() {
                    anyhow::bail!(CharStringError::MalformedProgram);
                }
            }

            Operator::ClosePath => {
                state.glyph.path.close();
                state.stack.clear();
            }

            Operator::CallSubroutine | Operator::CallGlobalSubroutine => {
                self.call_subroutine(operator, state, depth)?;
            }

            Operator::Return => {}

            Operator::Extended => {
                self.execute_extended_operator(reader, state)?;
            }

            Operator::HorizontalSideBearingWidth => {
                let width = state.stack.pop()?;
                let side_bearing_x = state.stack.pop()?;

                state.glyph.set_width(width);
                state.point = Point::new(side_bearing_x, 0.0);
                state.stack.clear();
            }

            Operator::EndChar => {
                self.maybe_read_width(state, EvenOrOdd::Odd)?;

                if self.dialect.is_type2() {
                    state.glyph.path.close();
                }
            }

            Operator::VerticalHorizontalCurveTo => {
                self.alternating_curves(state, false)?;
                state.stack.clear();
            }

            Operator::HorizontalVerticalCurveTo => {
                self.alternating_curves(state, true)?;
                state.stack.clear();
            }

            Operator::VerticalVerticalCurveTo => {
                let mut dx1 = 0.0;
                if state.stack.len() % 2 == 1 {
                    dx1 = state.stack.pop_front()?;
                }

                loop {
                    let dy1 = state.stack.pop_front()?;
                    let dx2 = state.stack.pop_front()?;
                    let dy2 = state.stack.pop_front()?;
                    let dy3 = state.stack.pop_front()?;

                    self.cubic_bezier_curve_to(state, dx1, dy1, dx2, dy2, 0.0, dy3);
                    dx1 = 0.0;

                    if state.stack.len() < 4 {
                        break;
                    }
                }

                state.stack.clear();
            }

            Operator::HorizontalHorizontalCurveTo => {
                let mut dy1 = 0.0;
                if state.stack.len() % 2 == 1 {
                    dy1 = state.stack.pop_front()?;
                }

                loop {
                    let dx1 = state.stack.pop_front()?;
                    let dx2 = state.stack.pop_front()?;
                    let dy2 = state.stack.pop_front()?;
                    let dx3 = state.stack.pop_front()?;

                    self.cubic_bezier_curve_to(state, dx1, dy1, dx2, dy2, dx3, 0.0);
                    dy1 = 0.0;

                    if state.stack.len() < 4 {
                        break;
                    }
                }

                state.stack.clear();
            }

            Operator::RelativeCurveLine => {
                while state.stack.len() >= 8 {
                    self.relative_curve(state)?;
                }

                self.relative_line(state)?;
                state.stack.clear();
            }

            Operator::RelativeLineCurve => {
                while state.stack.len() >= 8 {
                    self.relative_line(state)?;
                }

                self.relative_curve(state)?;
            }
        }

        Ok(())
    }

    fn execute_extended_operator(
        &self,
        reader: &mut ProgramReader,
        state: &mut GlyphParserState,
    ) -> CharStringResult<()> {
        let byte = reader.next()?;

        let Some(operator) = ExtendedOperator::from_byte(byte) else {
            anyhow::bail!(CharStringError::UnhandledOperator {
                byte,
                extended: true
            });
        };

        match operator {
            ExtendedOperator::DotSection
            | ExtendedOperator::VerticalStem3
            | ExtendedOperator::HorizontalStem3 => {
                state.stack.clear();
            }

            ExtendedOperator::StandardEncodingAccentedCharacter => {
                let accent_code = state.stack.pop()?;
                let base_code = state.stack.pop()?;
                let ady = state.stack.pop()?;
                let adx = state.stack.pop()?;
                // the Type 1 five-argument form leaves asb beneath; it is
                // discarded with the rest of the stack

                state.glyph.set_accented_character(AccentedCharacter {
                    base_code: base_code as u8,
                    accent_code: accent_code as u8,
                    adx,
                    ady,
                });
                state.stack.clear();
            }

            ExtendedOperator::Div => {
                let num2 = state.stack.pop()?;
                let num1 = state.stack.pop()?;

                state
                    .stack
                    .push(if num2 == 0.0 { 0.0 } else { num1 / num2 })?;
            }

            ExtendedOperator::CallOtherSubroutine => {
                let _othersubr_number = state.stack.pop()?;
                let n = state.stack.pop()? as i32;

                for _ in 0..n {
                    let value = state.stack.pop()?;
                    state.postscript_stack.push(value)?;
                }
            }

            ExtendedOperator::Pop => {
                let value = state.postscript_stack.pop()?;
                state.stack.push(value)?;
            }

            ExtendedOperator::SetCurrentPoint => {
                let y = state.stack.pop()?;
                let x = state.stack.pop()?;

                state.point = Point::new(x, y);
                state.glyph.path.move_to(state.point);
                state.stack.clear();
            }

            ExtendedOperator::HorizontalFlex
            | ExtendedOperator::Flex
            | ExtendedOperator::HorizontalFlex1
            | ExtendedOperator::Flex1 => {
                log::warn!("unimplemented flex operator: 12 {}", byte);
                state.stack.clear();
            }
        }

        Ok(())
    }

    /// Consume a leading advance width if this is the first operator of a
    /// Type 2 program and the argument count has the telltale parity.
    fn maybe_read_width(
        &self,
        state: &mut GlyphParserState,
        required_argument_count: EvenOrOdd,
    ) -> CharStringResult<()> {
        if !self.dialect.is_type2() || !state.is_first_command {
            return Ok(());
        }

        let has_width = match required_argument_count {
            EvenOrOdd::Even => state.stack.len() % 2 == 0,
            EvenOrOdd::Odd => state.stack.len() % 2 == 1,
        };

        if has_width {
            let width = state.stack.pop_front()?;
            state.glyph.set_width(width);
        }

        Ok(())
    }

    fn move_to(&self, state: &mut GlyphParserState, dx: f32, dy: f32) -> CharStringResult<()> {
        state.point += Point::new(dx, dy);

        if self.dialect.is_type2() {
            state.glyph.path.close();
        }

        if state.flex_feature {
            if state.flex_index + 2 > FLEX_SEQUENCE_LEN {
                anyhow::bail!(CharStringError::MalformedProgram);
            }

            state.flex_sequence[state.flex_index] = state.point.x;
            state.flex_sequence[state.flex_index + 1] = state.point.y;
            state.flex_index += 2;
        } else {
            state.glyph.path.move_to(state.point);
        }

        Ok(())
    }

    fn line_to(&self, state: &mut GlyphParserState, dx: f32, dy: f32) {
        state.point += Point::new(dx, dy);
        state.glyph.path.line_to(state.point);
    }

    fn cubic_bezier_curve_to(
        &self,
        state: &mut GlyphParserState,
        dx1: f32,
        dy1: f32,
        dx2: f32,
        dy2: f32,
        dx3: f32,
        dy3: f32,
    ) {
        let first_control_point = state.point + Point::new(dx1, dy1);
        let second_control_point = state.point + Point::new(dx1 + dx2, dy1 + dy2);
        let end = state.point + Point::new(dx1 + dx2 + dx3, dy1 + dy2 + dy3);

        state
            .glyph
            .path
            .cubic_bezier_curve_to(first_control_point, second_control_point, end);
        state.point = end;
    }

    fn relative_line(&self, state: &mut GlyphParserState) -> CharStringResult<()> {
        let dx = state.stack.pop_front()?;
        let dy = state.stack.pop_front()?;

        self.line_to(state, dx, dy);

        Ok(())
    }

    /// Alternating horizontal/vertical line segments, one coordinate each.
    fn axis_aligned_lines(
        &self,
        state: &mut GlyphParserState,
        mut horizontal: bool,
    ) -> CharStringResult<()> {
        while !state.stack.is_empty() {
            let d = state.stack.pop_front()?;

            if horizontal {
                self.line_to(state, d, 0.0);
            } else {
                self.line_to(state, 0.0, d);
            }

            horizontal = !horizontal;
        }

        Ok(())
    }

    fn relative_curve(&self, state: &mut GlyphParserState) -> CharStringResult<()> {
        let dx1 = state.stack.pop_front()?;
        let dy1 = state.stack.pop_front()?;
        let dx2 = state.stack.pop_front()?;
        let dy2 = state.stack.pop_front()?;
        let dx3 = state.stack.pop_front()?;
        let dy3 = state.stack.pop_front()?;

        self.cubic_bezier_curve_to(state, dx1, dy1, dx2, dy2, dx3, dy3);

        Ok(())
    }

    /// The vhcurveto/hvcurveto loop: each iteration consumes a tangent
    /// component, two free control deltas and a trailing component, plus one
    /// extra ending component when exactly one operand remains.
    fn alternating_curves(
        &self,
        state: &mut GlyphParserState,
        mut first_tangent_horizontal: bool,
    ) -> CharStringResult<()> {
        while !state.stack.is_empty() {
            let d1 = state.stack.pop_front()?;
            let dx2 = state.stack.pop_front()?;
            let dy2 = state.stack.pop_front()?;
            let d3 = state.stack.pop_front()?;
            let d4 = if state.stack.len() == 1 {
                state.stack.pop_front()?
            } else {
                0.0
            };

            let (dx1, dy1) = if first_tangent_horizontal {
                (d1, 0.0)
            } else {
                (0.0, d1)
            };
            let (dx3, dy3) = if first_tangent_horizontal {
                (d4, d3)
            } else {
                (d3, d4)
            };

            self.cubic_bezier_curve_to(state, dx1, dy1, dx2, dy2, dx3, dy3);
            first_tangent_horizontal = !first_tangent_horizontal;
        }

        Ok(())
    }

    fn call_subroutine(
        &self,
        operator: Operator,
        state: &mut GlyphParserState,
        depth: u8,
    ) -> CharStringResult<()> {
        let subroutines = match operator {
            Operator::CallSubroutine => self.local_subroutines,
            _ => {
                if !self.dialect.is_type2() {
                    anyhow::bail!(CharStringError::InvalidDialect {
                        operation: "callgsubr"
                    });
                }

                self.global_subroutines
            }
        };

        let mut subroutine_number = state.stack.pop()? as i32;

        if self.dialect.is_type2() {
            // The numbering of subroutines is encoded more compactly by
            // using the negative half of the number space; the bias depends
            // on the table size.
            subroutine_number += subroutine_bias(subroutines.len());
        }

        if subroutine_number < 0 || subroutine_number as usize >= subroutines.len() {
            anyhow::bail!(CharStringError::SubroutineOutOfRange {
                index: subroutine_number,
                table_size: subroutines.len(),
            });
        }

        let subroutine_number = subroutine_number as usize;

        if !self.dialect.is_type2() && operator == Operator::CallSubroutine {
            // Type 1 local subroutines 0-2 have fixed contents bracketing
            // the flex feature and are intercepted instead of executed.
            // Fonts that repurpose these indices are miscompiled; deciding
            // through the othersubr machinery would be correct.
            match subroutine_number {
                FLEX_END => {
                    self.end_flex(state);
                    return Ok(());
                }
                FLEX_START => {
                    log::debug!("flex feature started");
                    state.flex_feature = true;
                    state.flex_index = 0;
                    state.stack.clear();
                    return Ok(());
                }
                FLEX_CONTINUE => {
                    state.stack.clear();
                    return Ok(());
                }
                _ => {}
            }
        }

        let subroutine = &subroutines[subroutine_number];

        if subroutine.is_empty() {
            anyhow::bail!(CharStringError::EmptySubroutine {
                index: subroutine_number
            });
        }

        if depth >= MAX_SUBROUTINE_DEPTH {
            anyhow::bail!(CharStringError::RecursionTooDeep);
        }

        self.execute(subroutine, state, depth + 1)
    }

    /// Emit the two curves of a completed flex; a short sequence is
    /// abandoned without touching the path.
    fn end_flex(&self, state: &mut GlyphParserState) {
        if state.flex_index != FLEX_SEQUENCE_LEN {
            log::warn!(
                "flex sequence discarded after {} coordinates",
                state.flex_index
            );
            return;
        }

        let flex = state.flex_sequence;

        state.glyph.path.cubic_bezier_curve_to(
            Point::new(flex[2], flex[3]),
            Point::new(flex[4], flex[5]),
            Point::new(flex[6], flex[7]),
        );
        state.glyph.path.cubic_bezier_curve_to(
            Point::new(flex[8], flex[9]),
            Point::new(flex[10], flex[11]),
            Point::new(flex[12], flex[13]),
        );

        state.flex_feature = false;
        state.stack.clear();
    }
}

/// The bias added to encoded Type 2 subroutine numbers, a pure function of
/// the table size with thresholds at 1240 and 33900.
fn subroutine_bias(table_size: usize) -> i32 {
    if table_size < 1240 {
        107
    } else if table_size < 33900 {
        1131
    } else {
        32768
    }
}
