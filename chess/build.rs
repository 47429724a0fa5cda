use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::{env, iter};

use chessrules_base::types::{CastlingRights, Cell, Square};
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fixed seed, so that hashes are the same across builds
const SEED: u64 = 0x00C4_E55B_0A2D_F00D;

fn write_row<W: Write>(w: &mut W, indent: &str, vals: &[u64]) -> io::Result<()> {
    for chunk in vals.chunks(4) {
        write!(w, "{}", indent)?;
        for v in chunk {
            write!(w, "{:#018x}, ", v)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_zobrist<W: Write>(w: &mut W) -> io::Result<()> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(SEED);
    let mut keys = |n: usize| iter::repeat_with(|| rng.next_u64()).take(n).collect::<Vec<_>>();

    // The empty cell hashes to zero, so only occupied squares contribute
    writeln!(w, "const PIECES: [[u64; Square::COUNT]; Cell::COUNT] = [")?;
    for cell in Cell::iter() {
        let row = match cell.is_occupied() {
            true => keys(Square::COUNT),
            false => vec![0; Square::COUNT],
        };
        writeln!(w, "    [")?;
        write_row(w, "        ", &row)?;
        writeln!(w, "    ],")?;
    }
    writeln!(w, "];")?;

    writeln!(w, "pub const MOVE_SIDE: u64 = {:#018x};", keys(1)[0])?;

    // One key per castling flag, any combination is the XOR of its flags
    let flags = keys(4);
    let castling: Vec<u64> = (0..CastlingRights::COUNT)
        .map(|i| {
            flags
                .iter()
                .enumerate()
                .filter(|(bit, _)| (i >> bit) & 1 == 1)
                .fold(0, |acc, (_, k)| acc ^ k)
        })
        .collect();
    writeln!(w, "const CASTLING: [u64; CastlingRights::COUNT] = [")?;
    write_row(w, "    ", &castling)?;
    writeln!(w, "];")?;

    writeln!(w, "const ENPASSANT: [u64; Square::COUNT] = [")?;
    write_row(w, "    ", &keys(Square::COUNT))?;
    writeln!(w, "];")
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "OUT_DIR is not set"))?;
    let mut w = BufWriter::new(fs::File::create(out_dir.join("zobrist.rs"))?);
    write_zobrist(&mut w)?;
    w.flush()
}
