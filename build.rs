use schema::RosterData;
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::{env, path::Path};

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let roster_path = manifest_dir.join("data").join("roster.ron");

    println!("cargo:rerun-if-changed={}", roster_path.display());

    let roster = load_roster(&roster_path);

    // Compact binary form of the roster, decoded once at runtime.
    let bytes = postcard::to_allocvec(&roster).expect("failed to serialize roster");
    fs::write(out_dir.join("roster.bin"), bytes).expect("failed to write roster.bin");

    // Case-insensitive name -> roster index lookup.
    let keys: Vec<String> = roster
        .species
        .iter()
        .map(|s| s.name.to_ascii_lowercase())
        .collect();
    let mut index_map = phf_codegen::Map::new();
    for (index, key) in keys.iter().enumerate() {
        index_map.entry(key.as_str(), &index.to_string());
    }

    let generated = out_dir.join("roster_data.rs");
    let mut file =
        BufWriter::new(fs::File::create(&generated).expect("failed to create roster_data.rs"));
    writeln!(
        file,
        "static ROSTER_BYTES: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/roster.bin\"));"
    )
    .expect("failed to write roster_data.rs");
    writeln!(
        file,
        "static ROSTER_INDEX: phf::Map<&'static str, usize> = {};",
        index_map.build()
    )
    .expect("failed to write roster_data.rs");
}

fn load_roster(path: &Path) -> RosterData {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    let roster: RosterData = ron::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e));

    if let Err(problem) = roster.validate() {
        panic!("invalid roster in {}: {}", path.display(), problem);
    }

    let mut seen = HashSet::new();
    for species in &roster.species {
        if !seen.insert(species.name.to_ascii_lowercase()) {
            panic!("duplicate species '{}' in {}", species.name, path.display());
        }
    }

    roster
}
