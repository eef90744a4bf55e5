pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Monochrome framebuffer, row-major, one byte (0 or 1) per pixel.
pub struct Display {
    mem: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Display {
    pub fn new() -> Display {
        Display {
            mem: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.mem.iter_mut() {
            *pixel = 0;
        }
    }

    /// XORs `sprite` onto the screen with its top-left corner at (`x`, `y`).
    ///
    /// Each byte is one row of eight pixels, most significant bit first.
    /// Both axes wrap around independently. Returns `true` if any lit pixel
    /// was switched off.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let x = x % DISPLAY_WIDTH;
        let y = y % DISPLAY_HEIGHT;
        let mut collision_bit = false;

        for (sy, byte) in sprite.iter().enumerate() {
            let dy = (y + sy) % DISPLAY_HEIGHT;
            for sx in 0..8 {
                let bit_mask = 0b1000_0000 >> sx;
                if (byte & bit_mask) != 0 {
                    let dx = (x + sx) % DISPLAY_WIDTH;
                    let index = dy * DISPLAY_WIDTH + dx;

                    if self.mem[index] == 1 {
                        collision_bit = true;
                    }
                    self.mem[index] ^= 1;
                }
            }
        }

        collision_bit
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.mem[y * DISPLAY_WIDTH + x]
    }

    /// The whole framebuffer; pixel (x, y) lives at `x + y * 64`.
    pub fn pixels(&self) -> &[u8; DISPLAY_WIDTH * DISPLAY_HEIGHT] {
        &self.mem
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.mem.chunks(DISPLAY_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(display: &Display) -> usize {
        display.pixels().iter().filter(|&&p| p == 1).count()
    }

    #[test]
    fn draws_msb_first() {
        let mut display = Display::new();
        let collision = display.draw(2, 3, &[0b1010_0000]);
        assert!(!collision);
        assert_eq!(display.get(2, 3), 1);
        assert_eq!(display.get(3, 3), 0);
        assert_eq!(display.get(4, 3), 1);
        assert_eq!(lit(&display), 2);
    }

    #[test]
    fn second_draw_erases_and_collides() {
        let mut display = Display::new();
        assert!(!display.draw(10, 5, &[0xFF]));
        assert_eq!(lit(&display), 8);
        assert!(display.draw(10, 5, &[0xFF]));
        assert_eq!(lit(&display), 0);
    }

    #[test]
    fn wraps_both_axes() {
        let mut display = Display::new();
        display.draw(62, 31, &[0xF0, 0xF0]);
        assert_eq!(display.get(62, 31), 1);
        assert_eq!(display.get(63, 31), 1);
        assert_eq!(display.get(0, 31), 1);
        assert_eq!(display.get(1, 31), 1);
        assert_eq!(display.get(62, 0), 1);
        assert_eq!(display.get(1, 0), 1);
        assert_eq!(lit(&display), 8);
    }

    #[test]
    fn start_position_wraps() {
        let mut display = Display::new();
        display.draw(64 + 3, 32 + 1, &[0x80]);
        assert_eq!(display.get(3, 1), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut display = Display::new();
        display.draw(0, 0, &[0xFF; 15]);
        display.clear();
        assert_eq!(lit(&display), 0);
    }

    #[test]
    fn rows_are_row_major() {
        let mut display = Display::new();
        display.draw(5, 7, &[0x80]);
        let row = display.iter_rows().nth(7).unwrap();
        assert_eq!(row.len(), DISPLAY_WIDTH);
        assert_eq!(row[5], 1);
        assert_eq!(display.pixels()[5 + 7 * DISPLAY_WIDTH], 1);
    }
}
