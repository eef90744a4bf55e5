use chip8::{Chip8, ErrorKind, Reg};
use rand::rngs::mock::StepRng;

fn assemble(program: &[u16]) -> Vec<u8> {
    program
        .iter()
        .flat_map(|word| vec![(word >> 8) as u8, *word as u8])
        .collect()
}

fn boot(program: &[u16]) -> Chip8<StepRng> {
    let mut vm = Chip8::with_rng(StepRng::new(0, 0));
    vm.load_rom(&assemble(program)).unwrap();
    vm
}

/// Steps until PC reaches `halt_pc`, giving up after `max_steps`.
fn run_until(vm: &mut Chip8<StepRng>, halt_pc: u16, max_steps: usize) {
    for _ in 0..max_steps {
        if vm.pc() == halt_pc {
            return;
        }
        vm.step().unwrap();
    }
    panic!("never reached {:03x}: {:?}", halt_pc, vm);
}

fn snapshot(vm: &Chip8<StepRng>, width: usize, height: usize) -> Vec<String> {
    vm.display()
        .iter_rows()
        .take(height)
        .map(|row| {
            row[..width]
                .iter()
                .map(|&p| if p == 1 { '#' } else { '.' })
                .collect()
        })
        .collect()
}

#[test]
fn draws_hex_digits_from_font() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        0x6000, // LD V0, 0
        0x6100, // LD V1, 0
        0x6200, // LD V2, 0
        0xF029, // LD F, V0
        0xD125, // DRW V1, V2, 5
        0x7001, // ADD V0, 1
        0x7105, // ADD V1, 5
        0x3003, // SE V0, 3
        0x1206, // JP 0x206
        0x1212, // JP 0x212
    ]);

    run_until(&mut vm, 0x212, 100);

    assert_eq!(
        snapshot(&vm, 14, 6),
        vec![
            "####...#..####",
            "#..#..##.....#",
            "#..#...#..####",
            "#..#...#..#...",
            "####..###.####",
            "..............",
        ]
    );
    assert_eq!(vm.register(Reg::Vf), 0);
}

#[test]
fn subroutine_stores_and_reloads_bcd() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        0x6089, // LD V0, 137
        0xA300, // LD I, 0x300
        0x2208, // CALL 0x208
        0x1206, // JP 0x206
        0xF033, // LD B, V0
        0xF265, // LD V2, [I]
        0x00EE, // RET
    ]);

    run_until(&mut vm, 0x206, 10);

    assert_eq!(vm.stack_depth(), 0);
    assert_eq!(vm.register(Reg::V0), 1);
    assert_eq!(vm.register(Reg::V1), 3);
    assert_eq!(vm.register(Reg::V2), 7);
    assert_eq!(vm.i(), 0x303);
}

#[test]
fn waits_for_key_then_draws_its_glyph() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        0xF10A, // LD V1, K
        0xF129, // LD F, V1
        0xD005, // DRW V0, V0, 5
        0x1206, // JP 0x206
    ]);

    for _ in 0..10 {
        vm.step().unwrap();
        assert_eq!(vm.pc(), 0x200);
    }
    assert!(vm.display().pixels().iter().all(|&p| p == 0));

    vm.press(0xE);
    run_until(&mut vm, 0x206, 10);

    assert_eq!(
        snapshot(&vm, 4, 5),
        vec!["####", "#...", "####", "#...", "####"]
    );
}

#[test]
fn collision_flag_across_whole_sprite() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        0x6000, // LD V0, 0
        0xF029, // LD F, V0
        0xD005, // DRW V0, V0, 5
        0x6008, // LD V0, 8
        0xF029, // LD F, V0
        0x6000, // LD V0, 0
        0xD005, // DRW V0, V0, 5
        0x120E, // JP 0x20E
    ]);

    run_until(&mut vm, 0x20E, 20);

    // "8" over "0" only clears the middle row's outer pixels.
    assert_eq!(vm.register(Reg::Vf), 1);
    assert_eq!(
        snapshot(&vm, 4, 5),
        vec!["....", "....", ".##.", "....", "...."]
    );
}

#[test]
fn unknown_opcode_stops_the_program() {
    let mut vm = boot(&[0x6001, 0xF0FF]);
    vm.step().unwrap();

    let err = vm.step().unwrap_err();
    match *err.kind() {
        ErrorKind::Instruction(chip8::instruction::ErrorKind::UnknownOpcode(word)) => {
            assert_eq!(word, 0xF0FF)
        }
        ref other => panic!("unexpected error: {}", other),
    }
    assert_eq!(vm.pc(), 0x202);
    assert_eq!(err.to_string(), "unknown opcode: 0xf0ff");
}

#[test]
fn rom_that_does_not_fit_is_rejected() {
    let mut vm = Chip8::with_rng(StepRng::new(0, 0));
    let err = vm.load_rom(&vec![0u8; 4096]).unwrap_err();
    match *err.kind() {
        ErrorKind::RomTooLarge(4096) => {}
        ref other => panic!("unexpected error: {}", other),
    }
}
