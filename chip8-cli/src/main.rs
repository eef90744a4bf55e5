// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

mod looper;
mod render;

use std::fs::File;
use std::io::{self, Read};

use chip8::Chip8;
use clap::{App as ClapApp, Arg, ArgMatches};

use looper::Step;

error_chain! {
    foreign_links {
        Chip8(chip8::Error);
        Io(io::Error);
    }
}

const DEFAULT_CYCLES_PER_FRAME: u32 = 12;
const DEFAULT_FRAMES: u64 = 600;

struct CommandArgs {
    rom_file_name: String,
    cycles_per_frame: u32, // default: 12
    frames: u64,           // 0 runs until halted
    halt_pc: Option<u16>,
    keys: [bool; 16],
}

impl CommandArgs {
    fn parse() -> CommandArgs {
        CommandArgs::from_matches(&Self::clap_app().get_matches())
    }

    fn clap_app() -> ClapApp<'static, 'static> {
        ClapApp::new("chip8 headless runner")
            .arg(
                Arg::with_name("ROM_FILE")
                    .help("rom file to load")
                    .required(true),
            )
            .arg(
                Arg::with_name("cycles per frame")
                    .short("c")
                    .long("cycles-per-frame")
                    .value_name("cycles_per_frame")
                    .help("How many instructions are executed per frame.")
                    .validator(|s| s.parse::<u32>().map(|_| ()).map_err(|e| e.to_string()))
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("frames")
                    .short("f")
                    .long("frames")
                    .value_name("frames")
                    .help("How many frames to run before printing the screen. 0 runs until halted.")
                    .validator(|s| s.parse::<u64>().map(|_| ()).map_err(|e| e.to_string()))
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("halt pc")
                    .long("halt-pc")
                    .value_name("address")
                    .help("Stop as soon as the program counter reaches this hex address.")
                    .validator(|s| parse_addr(&s).map(|_| ()))
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("keys")
                    .short("k")
                    .long("keys")
                    .value_name("hex_digits")
                    .help("Keys held down for the whole run, e.g. `5a`.")
                    .validator(|s| parse_keys(&s).map(|_| ()))
                    .takes_value(true),
            )
    }

    fn from_matches(matches: &ArgMatches) -> CommandArgs {
        let cycles_per_frame = matches
            .value_of("cycles per frame")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_CYCLES_PER_FRAME);

        let frames = matches
            .value_of("frames")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let halt_pc = matches.value_of("halt pc").and_then(|s| parse_addr(s).ok());

        let keys = matches
            .value_of("keys")
            .and_then(|s| parse_keys(s).ok())
            .unwrap_or([false; 16]);

        CommandArgs {
            rom_file_name: matches.value_of("ROM_FILE").unwrap_or_default().to_string(),
            cycles_per_frame,
            frames,
            halt_pc,
            keys,
        }
    }
}

fn parse_addr(s: &str) -> std::result::Result<u16, String> {
    let digits = s.trim_start_matches("0x");
    match u16::from_str_radix(digits, 16) {
        Ok(addr) if addr <= 0xFFF => Ok(addr),
        Ok(addr) => Err(format!("{:#x} is outside of the address space", addr)),
        Err(e) => Err(format!("invalid address {:?}: {}", s, e)),
    }
}

fn parse_keys(s: &str) -> std::result::Result<[bool; 16], String> {
    let mut keys = [false; 16];
    for c in s.chars() {
        let key = c
            .to_digit(16)
            .ok_or_else(|| format!("{:?} is not a hex key", c))?;
        keys[key as usize] = true;
    }
    Ok(keys)
}

fn main() {
    use std::process::exit;

    env_logger::init();

    match do_run() {
        Ok(_) => exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.iter().skip(1) {
                eprintln!("caused by: {}", cause);
            }
            exit(1);
        }
    }
}

fn do_run() -> Result<()> {
    let args = CommandArgs::parse();

    let app = App::new(&args)?;
    app.run()?;

    Ok(())
}

struct App<'a> {
    command_args: &'a CommandArgs,
    vm: Chip8,
    frame: u64,
}

impl<'a> App<'a> {
    fn new(command_args: &'a CommandArgs) -> Result<App<'a>> {
        let mut rom_file = File::open(&command_args.rom_file_name)
            .chain_err(|| format!("can't open rom {}", command_args.rom_file_name))?;
        App::from_reader(command_args, &mut rom_file)
    }

    fn from_reader<R: Read>(command_args: &'a CommandArgs, rom: &mut R) -> Result<App<'a>> {
        let mut vm = Chip8::new();
        let rom_len = vm.load_rom_from(rom)?;
        vm.set_keys(command_args.keys);

        info!(
            "loaded {} byte rom, {} cycles per frame",
            rom_len, command_args.cycles_per_frame
        );

        Ok(App {
            command_args,
            vm,
            frame: 0,
        })
    }

    fn run(mut self) -> Result<()> {
        let frames = looper::start_loop(|| self.update())?;
        info!("stopped after {} frames at pc {:03x}", frames, self.vm.pc());

        print!("{}", render::render(self.vm.display()));

        Ok(())
    }

    fn update(&mut self) -> Result<Step> {
        for _cycle_number in 0..self.command_args.cycles_per_frame {
            if Some(self.vm.pc()) == self.command_args.halt_pc {
                info!("reached halt address {:03x}", self.vm.pc());
                return Ok(Step::Done);
            }

            self.vm.step()?;
        }

        if self.vm.is_waiting_for_key() && !self.command_args.keys.iter().any(|&down| down) {
            warn!("program waits for a key, but no keys are held");
            return Ok(Step::Done);
        }

        if self.vm.is_beeping() {
            debug!("beep, sound timer at {}", self.vm.sound_timer());
        }

        self.frame += 1;
        if self.command_args.frames != 0 && self.frame >= self.command_args.frames {
            return Ok(Step::Done);
        }

        Ok(Step::Cont)
    }
}
