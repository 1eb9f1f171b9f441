// Format-agnostic repository of square RGB textures.
// The renderer and world logic interact through `TextureId` only.

/// Runtime handle for a texture inside one [`TextureSet`].
///
/// Wall textures share the id space of [`TileId`](super::TileId): tile `n`
/// is drawn with wall texture `n`.
pub type TextureId = u16;

/// `TextureId` that every set is guaranteed to hold; unknown ids resolve here.
pub const NO_TEXTURE: TextureId = 0;

/// One 24-bit colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into the frame-buffer format (0x00RRGGBB).
    #[inline]
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn from_u32(px: u32) -> Self {
        Self::new((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }
}

/// Things that can go wrong when building textures or sets.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture under an existing id.
    #[error("texture id {0} already present in set")]
    Duplicate(TextureId),

    /// Side length must be a power of two so sampling can wrap with a mask.
    #[error("texture side {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Pixel (or alpha) buffer does not hold `side²` entries.
    #[error("texture buffer holds {found} texels, expected {expected}")]
    BadLength { expected: usize, found: usize },

    /// Image file could not be read or decoded.
    #[error("failed to decode `{path}`: {reason}")]
    Decode { path: String, reason: String },
}

/// Square power-of-two RGB buffer in row-major order.
///
/// Sprite textures additionally carry an alpha plane; a texel with alpha 0
/// is skipped when blitting.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    size: usize,
    mask: usize,
    pixels: Vec<Rgb>,
    alpha: Option<Vec<u8>>,
}

impl Texture {
    pub fn new(size: usize, pixels: Vec<Rgb>) -> Result<Self, TextureError> {
        if size == 0 || !size.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo(size));
        }
        if pixels.len() != size * size {
            return Err(TextureError::BadLength {
                expected: size * size,
                found: pixels.len(),
            });
        }
        Ok(Self {
            size,
            mask: size - 1,
            pixels,
            alpha: None,
        })
    }

    /// Attach an alpha plane (one byte per texel).
    pub fn with_alpha(mut self, alpha: Vec<u8>) -> Result<Self, TextureError> {
        if alpha.len() != self.pixels.len() {
            return Err(TextureError::BadLength {
                expected: self.pixels.len(),
                found: alpha.len(),
            });
        }
        self.alpha = Some(alpha);
        Ok(self)
    }

    /// Two-tone checkerboard: `primary` everywhere, `secondary` in the
    /// top-left and bottom-right quadrants. `size` is rounded up to a power
    /// of two (minimum 2).
    pub fn checker(size: usize, primary: Rgb, secondary: Rgb) -> Self {
        let size = size.max(2).next_power_of_two();
        let half = size / 2;
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x < half) == (y < half) {
                    secondary
                } else {
                    primary
                }
            })
            .collect();
        Self {
            size,
            mask: size - 1,
            pixels,
            alpha: None,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Texel at `(x, y)`; both coordinates must be `< size`.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.size + x]
    }

    /// Texel at any integer coordinate, tiled with the power-of-two mask.
    #[inline(always)]
    pub fn wrapped(&self, u: i32, v: i32) -> Rgb {
        let m = self.mask as i32;
        self.texel((u & m) as usize, (v & m) as usize)
    }

    /// False for fully transparent sprite texels; surfaces are always opaque.
    #[inline]
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        self.alpha
            .as_ref()
            .is_none_or(|a| a[y * self.size + x] != 0)
    }
}

/// Dense `id → texture` table for one surface kind.
///
/// * Slot **0** always holds a texture; every unknown id resolves to it.
/// * Lookups are one bounds-checked index into `slot_of`, no hashing.
#[derive(Clone, Debug)]
pub struct TextureSet {
    slot_of: Vec<u16>,
    textures: Vec<Texture>,
}

impl TextureSet {
    /// Create a set whose id 0 (and fallback) is `fallback`.
    pub fn new(fallback: Texture) -> Self {
        Self {
            slot_of: vec![0],
            textures: vec![fallback],
        }
    }

    /// Insert `tex` under `id`.
    ///
    /// * Id 0 replaces the fallback.
    /// * Any other id may be inserted once (`Duplicate` otherwise).
    pub fn insert(&mut self, id: TextureId, tex: Texture) -> Result<(), TextureError> {
        if id == NO_TEXTURE {
            self.textures[0] = tex;
            return Ok(());
        }
        if self.contains(id) {
            return Err(TextureError::Duplicate(id));
        }
        let idx = id as usize;
        if idx >= self.slot_of.len() {
            self.slot_of.resize(idx + 1, 0);
        }
        self.slot_of[idx] = self.textures.len() as u16;
        self.textures.push(tex);
        Ok(())
    }

    /// True if `id` has its own texture (id 0 always does).
    pub fn contains(&self, id: TextureId) -> bool {
        id == NO_TEXTURE || self.slot_of.get(id as usize).is_some_and(|&s| s != 0)
    }

    /// Fallback-safe lookup.
    #[inline(always)]
    pub fn get(&self, id: TextureId) -> &Texture {
        let slot = self.slot_of.get(id as usize).copied().unwrap_or(0);
        &self.textures[slot as usize]
    }

    /// Number of distinct textures (including the fallback).
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// All textures the renderer samples, one [`TextureSet`] per surface kind.
///
/// Owned by the caller and passed by reference into every frame; the
/// renderer never mutates it.
#[derive(Clone, Debug)]
pub struct TextureAtlas {
    pub walls: TextureSet,
    pub floors: TextureSet,
    pub ceilings: TextureSet,
    pub sprites: TextureSet,
}

impl TextureAtlas {
    #[inline]
    pub fn wall(&self, id: TextureId) -> &Texture {
        self.walls.get(id)
    }

    #[inline]
    pub fn floor(&self, id: TextureId) -> &Texture {
        self.floors.get(id)
    }

    #[inline]
    pub fn ceiling(&self, id: TextureId) -> &Texture {
        self.ceilings.get(id)
    }

    #[inline]
    pub fn sprite(&self, id: TextureId) -> &Texture {
        self.sprites.get(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
