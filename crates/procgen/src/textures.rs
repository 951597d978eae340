//! Procedural texture generation.
//! Produces the black/white checkerboard wrapped over the solid.

/// RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0, 255);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Generated texture data, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl TextureData {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::BLACK; (width * height) as usize],
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = pixel;
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            Pixel::BLACK
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }
}

/// Square checkerboard, `size` texels on a side, alternating every `square`
/// texels. The texel at (0, 0) is black.
pub fn checkerboard(size: u32, square: u32) -> TextureData {
    let square = square.max(1);
    let mut texture = TextureData::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let white = ((x / square) + (y / square)) % 2 == 1;
            texture.set_pixel(x, y, if white { Pixel::WHITE } else { Pixel::BLACK });
        }
    }
    texture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_every_square() {
        let tex = checkerboard(64, 8);
        assert_eq!(tex.pixels.len(), 64 * 64);
        assert_eq!(tex.get_pixel(0, 0), Pixel::BLACK);
        assert_eq!(tex.get_pixel(7, 7), Pixel::BLACK);
        assert_eq!(tex.get_pixel(8, 0), Pixel::WHITE);
        assert_eq!(tex.get_pixel(0, 8), Pixel::WHITE);
        assert_eq!(tex.get_pixel(8, 8), Pixel::BLACK);
        assert_eq!(tex.get_pixel(63, 0), Pixel::WHITE);
    }

    #[test]
    fn checkerboard_is_half_white() {
        let tex = checkerboard(64, 8);
        let white = tex.pixels.iter().filter(|p| **p == Pixel::WHITE).count();
        assert_eq!(white, 64 * 64 / 2);
    }

    #[test]
    fn empty_texture_has_no_pixels() {
        let tex = checkerboard(0, 8);
        assert!(tex.pixels.is_empty());
        assert!(tex.to_bytes().is_empty());
        assert_eq!(tex.get_pixel(0, 0), Pixel::BLACK);
    }

    #[test]
    fn bytes_are_rgba() {
        let tex = checkerboard(16, 8);
        let bytes = tex.to_bytes();
        assert_eq!(bytes.len(), 16 * 16 * 4);
        assert_eq!(&bytes[..4], &[0, 0, 0, 255]);
        assert_eq!(&bytes[8 * 4..8 * 4 + 4], &[255, 255, 255, 255]);
    }
}
