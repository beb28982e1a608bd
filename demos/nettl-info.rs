use nettl_parser::traits::FrameReader;
use nettl_parser::*;
use std::collections::BTreeMap;
use std::env;
use std::error::Error;
use std::fs::File;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=nettl_parser=trace shows each record
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    for arg in env::args().skip(1) {
        if let Err(e) = print_nettl_info(&arg) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn print_nettl_info(arg: &str) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let file = File::open(arg)?;
    let file_size = file.metadata()?.len();
    println!("\tfile size: {}", file_size);

    let mut reader = NettlReader::new(10 * 1024, file)?;
    let header = reader.header();
    println!("\tmagic: {:?}", header.magic);
    println!(
        "\tOS version: {}",
        String::from_utf8_lossy(&header.os_version)
    );
    println!("\trecord headers: {:?}", header.generation);

    let mut num_frames = 0;
    let mut num_truncated = 0;
    let mut subsystems = BTreeMap::new();
    let mut first_offset = None;
    loop {
        let offset = reader.position();
        match reader.next() {
            Ok(frame) => {
                first_offset.get_or_insert(offset);
                num_frames += 1;
                if frame.header.truncated() {
                    num_truncated += 1;
                }
                *subsystems.entry(frame.header.subsystem.0).or_insert(0) += 1;
            }
            Err(NettlError::Eof) => break,
            Err(e) => {
                println!("\terror at offset {}: {}", offset, e);
                break;
            }
        }
    }

    println!("\tnum_frames: {} ({} truncated)", num_frames, num_truncated);
    println!("\tencapsulation: {}", reader.encapsulation());
    for (code, count) in &subsystems {
        println!("\t\t{}: {} frames", Subsystem(*code), count);
    }

    // check that the first frame can be read again
    if let Some(offset) = first_offset {
        let mut random = reader.random_access(File::open(arg)?);
        let frame = random.read_at(offset)?;
        let (sec, frac, _) = frame.ts();
        println!("\tfirst frame: {}.{:06}, {} bytes", sec, frac, frame.caplen());
    }

    Ok(())
}
