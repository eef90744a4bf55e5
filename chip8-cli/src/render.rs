use chip8::display::{Display, DISPLAY_WIDTH};

const LIT: char = '█';
const UNLIT: char = ' ';

/// Renders the framebuffer as text, one line per pixel row, framed so that
/// trailing blank columns stay visible.
pub fn render(display: &Display) -> String {
    let border: String = std::iter::repeat('-').take(DISPLAY_WIDTH).collect();

    let mut out = String::new();
    out.push('+');
    out.push_str(&border);
    out.push_str("+\n");
    for row in display.iter_rows() {
        out.push('|');
        out.extend(row.iter().map(|&p| if p == 1 { LIT } else { UNLIT }));
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&border);
    out.push_str("+\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8::Chip8;

    #[test]
    fn renders_every_row_inside_a_frame() {
        // LD V0, 0; LD F, V0; DRW V0, V0, 5
        let mut vm = Chip8::with_rom(&[0x60, 0x00, 0xF0, 0x29, 0xD0, 0x05]).unwrap();
        for _ in 0..3 {
            vm.step().unwrap();
        }

        let text = render(vm.display());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 32 + 2);
        assert!(lines[0].starts_with("+--"));
        assert!(lines[1].starts_with("|████ "));
        assert!(lines[2].starts_with("|█  █ "));
        assert_eq!(lines[10].chars().count(), DISPLAY_WIDTH + 2);
    }
}
