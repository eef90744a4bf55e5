/// Press state of the 16 hex keys, owned by the host.
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad { keys: [false; 16] }
    }

    pub fn set(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest-numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_key_wins() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);
        keypad.press(0xC);
        keypad.press(0x5);
        assert_eq!(keypad.first_pressed(), Some(0x5));
        keypad.release(0x5);
        assert_eq!(keypad.first_pressed(), Some(0xC));
    }

    #[test]
    fn key_index_uses_low_nibble() {
        let mut keypad = Keypad::new();
        keypad.press(0x13);
        assert!(keypad.is_pressed(0x3));
        assert!(keypad.is_pressed(0xF3));
    }

    #[test]
    fn set_overwrites_all_keys() {
        let mut keypad = Keypad::new();
        keypad.press(0x1);
        let mut keys = [false; 16];
        keys[0xE] = true;
        keypad.set(keys);
        assert!(!keypad.is_pressed(0x1));
        assert!(keypad.is_pressed(0xE));
    }
}
