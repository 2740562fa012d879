/// Background clear colors and a small textual color syntax
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{alpha1, char, space0},
    combinator::{all_consuming, map, map_opt, map_res, verify},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Result, ViewerError};

/// RGBA clear color. Alpha is always 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const BLACK: ClearColor = ClearColor::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert an 8-bit color as reported by a color picker
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert back to 8 bits per channel, e.g. to seed a color picker
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// `#rrggbb` form accepted by `parse_color`
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Fixed background choices offered next to the free color picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetColor {
    Black,
    White,
    Gray,
    Blue,
    Green,
    Red,
}

impl PresetColor {
    pub const ALL: [PresetColor; 6] = [
        PresetColor::Black,
        PresetColor::White,
        PresetColor::Gray,
        PresetColor::Blue,
        PresetColor::Green,
        PresetColor::Red,
    ];

    pub fn color(self) -> ClearColor {
        match self {
            PresetColor::Black => ClearColor::rgb(0.0, 0.0, 0.0),
            PresetColor::White => ClearColor::rgb(1.0, 1.0, 1.0),
            PresetColor::Gray => ClearColor::rgb(0.5, 0.5, 0.5),
            PresetColor::Blue => ClearColor::rgb(0.0, 0.0, 1.0),
            PresetColor::Green => ClearColor::rgb(0.0, 1.0, 0.0),
            PresetColor::Red => ClearColor::rgb(1.0, 0.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PresetColor::Black => "black",
            PresetColor::White => "white",
            PresetColor::Gray => "gray",
            PresetColor::Blue => "blue",
            PresetColor::Green => "green",
            PresetColor::Red => "red",
        }
    }

    /// Case-insensitive lookup; "grey" is accepted as well
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("grey") {
            return Some(PresetColor::Gray);
        }
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }
}

/// Parse `#rrggbb`, `#rgb`, a preset name, or `r, g, b` floats in `[0, 1]`
pub fn parse_color(input: &str) -> Result<ClearColor> {
    match all_consuming(color)(input.trim()) {
        Ok((_, color)) => Ok(color),
        Err(_) => Err(ViewerError::InvalidColor(input.trim().to_string())),
    }
}

fn color(input: &str) -> IResult<&str, ClearColor> {
    alt((hex_color, float_triple, named_color))(input)
}

fn hex_color(input: &str) -> IResult<&str, ClearColor> {
    preceded(tag("#"), alt((long_hex, short_hex)))(input)
}

fn long_hex(input: &str) -> IResult<&str, ClearColor> {
    map(tuple((hex_byte, hex_byte, hex_byte)), |(r, g, b)| {
        ClearColor::from_rgb8(r, g, b)
    })(input)
}

fn short_hex(input: &str) -> IResult<&str, ClearColor> {
    map(tuple((hex_nibble, hex_nibble, hex_nibble)), |(r, g, b)| {
        ClearColor::from_rgb8(r * 17, g * 17, b * 17)
    })(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |digits| {
        u8::from_str_radix(digits, 16)
    })(input)
}

fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()), |digit| {
        u8::from_str_radix(digit, 16)
    })(input)
}

fn float_triple(input: &str) -> IResult<&str, ClearColor> {
    map(
        tuple((unit_float, preceded(comma, unit_float), preceded(comma, unit_float))),
        |(r, g, b)| ClearColor::rgb(r, g, b),
    )(input)
}

fn unit_float(input: &str) -> IResult<&str, f32> {
    verify(float, |value: &f32| (0.0..=1.0).contains(value))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn named_color(input: &str) -> IResult<&str, ClearColor> {
    map_opt(alpha1, |name: &str| PresetColor::from_name(name).map(PresetColor::color))(input)
}
