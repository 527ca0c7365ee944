use std::error::Error;

use clap::Args;
use qqq_core::{canonical_key, CanonicalKey};

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Spin of quark 1 (1..=4).
    pub s1: i32,
    /// Spin of quark 2 (1..=4).
    pub s2: i32,
    /// Spin of quark 3 (1..=4).
    pub s3: i32,
    /// Displacement of quark 1 (-3..=3).
    #[arg(allow_negative_numbers = true)]
    pub d1: i32,
    /// Displacement of quark 2 (-3..=3).
    #[arg(allow_negative_numbers = true)]
    pub d2: i32,
    /// Displacement of quark 3 (-3..=3).
    #[arg(allow_negative_numbers = true)]
    pub d3: i32,
    /// Displacement-length class (0..=15).
    pub length: i32,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Canonical key.
    pub key: u32,
    /// Also print the per-quark view of the tuple.
    #[arg(long)]
    pub quarks: bool,
}

pub fn run_hash(args: &HashArgs) -> Result<(), Box<dyn Error>> {
    let key = canonical_key(
        args.s1, args.s2, args.s3, args.d1, args.d2, args.d3, args.length,
    )?;
    println!("{key}");
    Ok(())
}

pub fn run_decode(args: &DecodeArgs) -> Result<(), Box<dyn Error>> {
    let tuple = CanonicalKey::from_raw(args.key).decode()?;
    println!("{tuple}");
    if args.quarks {
        for (leg, quark) in tuple.quark_terms().iter().enumerate() {
            println!(
                "q{} spin={} disp={} dir={} len={} slot={}",
                leg + 1,
                quark.spin,
                quark.displacement,
                quark.disp_dir,
                quark.disp_len,
                quark.disp_ind
            );
        }
    }
    Ok(())
}
