//! Materials and the Session Catalog
//!
//! Token identity is the (shape, color, copy) triple. The catalog is the
//! full cross product, enumerated shape-major.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::CATALOG_SIZE;

// =============================================================================
// SHAPE
// =============================================================================

/// Material shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Shape {
    Triangle = 0,
    Ellipse = 1,
    Rectangle = 2,
}

impl Shape {
    /// All shapes in enumeration order.
    pub const ALL: [Shape; 3] = [Shape::Triangle, Shape::Ellipse, Shape::Rectangle];

    /// Index in enumeration order.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Display label.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Triangle => "Triangle",
            Shape::Ellipse => "Ellipse",
            Shape::Rectangle => "Rectangle",
        }
    }
}

// =============================================================================
// COLOR
// =============================================================================

/// Material color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Orange = 1,
    Yellow = 2,
    Green = 3,
    Cyan = 4,
    Blue = 5,
    Purple = 6,
}

impl Color {
    /// All colors in enumeration order.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
    ];

    /// Index in enumeration order.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Display label.
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Orange => "Orange",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Cyan => "Cyan",
            Color::Blue => "Blue",
            Color::Purple => "Purple",
        }
    }

    /// Reference swatch as 8-bit RGB. Presentation metadata only.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Red => [255, 0, 0],
            Color::Orange => [255, 128, 0],
            Color::Yellow => [255, 235, 4],
            Color::Green => [0, 255, 0],
            Color::Cyan => [0, 255, 255],
            Color::Blue => [0, 0, 255],
            Color::Purple => [128, 0, 128],
        }
    }
}

// =============================================================================
// MASK POSITION
// =============================================================================

/// One of the nine fixed slots on the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaskPosition {
    LeftEye = 0,
    RightEye = 1,
    LeftEar = 2,
    RightEar = 3,
    Nose = 4,
    Mouth = 5,
    LeftFace = 6,
    RightFace = 7,
    Forehead = 8,
}

impl MaskPosition {
    /// All positions in slot order.
    pub const ALL: [MaskPosition; 9] = [
        MaskPosition::LeftEye,
        MaskPosition::RightEye,
        MaskPosition::LeftEar,
        MaskPosition::RightEar,
        MaskPosition::Nose,
        MaskPosition::Mouth,
        MaskPosition::LeftFace,
        MaskPosition::RightFace,
        MaskPosition::Forehead,
    ];

    /// Slot index (0-8).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get position from slot index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display label.
    pub fn name(self) -> &'static str {
        match self {
            MaskPosition::LeftEye => "Left Eye",
            MaskPosition::RightEye => "Right Eye",
            MaskPosition::LeftEar => "Left Ear",
            MaskPosition::RightEar => "Right Ear",
            MaskPosition::Nose => "Nose",
            MaskPosition::Mouth => "Mouth",
            MaskPosition::LeftFace => "Left Face",
            MaskPosition::RightFace => "Right Face",
            MaskPosition::Forehead => "Forehead",
        }
    }
}

impl fmt::Display for MaskPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TOKEN
// =============================================================================

/// A single material token.
///
/// Immutable value; two tokens are equal iff shape, color and copy match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    shape: Shape,
    color: Color,
    copy: u8,
}

/// Deserialized token fields before the copy index is checked.
#[derive(Deserialize)]
struct RawToken {
    shape: Shape,
    color: Color,
    copy: u8,
}

/// A token whose copy index lies outside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Copy index {copy} out of range (max {max})")]
pub struct InvalidCopyIndex {
    /// Rejected copy index
    pub copy: u8,
    /// Largest valid copy index
    pub max: u8,
}

impl TryFrom<RawToken> for Token {
    type Error = InvalidCopyIndex;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        Token::new(raw.shape, raw.color, raw.copy).ok_or(InvalidCopyIndex {
            copy: raw.copy,
            max: Token::COPIES - 1,
        })
    }
}

impl Token {
    /// Copies of each (shape, color) pair in the catalog.
    pub const COPIES: u8 = 2;

    /// Create a token. Returns `None` if `copy` is out of range.
    pub fn new(shape: Shape, color: Color, copy: u8) -> Option<Self> {
        if copy < Self::COPIES {
            Some(Self { shape, color, copy })
        } else {
            None
        }
    }

    /// Token shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Token color.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Copy index (0 or 1).
    #[inline]
    pub fn copy_index(&self) -> u8 {
        self.copy
    }

    /// Position of this token in catalog order (0-41).
    pub fn catalog_index(&self) -> usize {
        let per_shape = Color::ALL.len() * Self::COPIES as usize;
        self.shape.index() as usize * per_shape
            + self.color.index() as usize * Self::COPIES as usize
            + self.copy as usize
    }

    /// Hash this token's identity for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.shape.index());
        hasher.update_u8(self.color.index());
        hasher.update_u8(self.copy);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{}", self.color.name(), self.shape.name(), self.copy)
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Generate the full token catalog for one session.
///
/// Order is shape-major, then color, then copy index. Pure: every call
/// yields the same 42 identities.
pub fn generate() -> Vec<Token> {
    let mut tokens = Vec::with_capacity(CATALOG_SIZE);
    for shape in Shape::ALL {
        for color in Color::ALL {
            for copy in 0..Token::COPIES {
                tokens.push(Token { shape, color, copy });
            }
        }
    }
    tokens
}
