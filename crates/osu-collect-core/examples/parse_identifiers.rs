//! Test identifier parsing

use osu_collect_core::identifier::RawIdentifier;

fn main() {
    println!("=== Identifier Parsing Test ===\n");

    let inputs = [
        "1234",
        "https://osu.ppy.sh/b/1234",
        "https://osu.ppy.sh/beatmaps/4521054",
        "https://osu.ppy.sh/s/55",
        "https://osu.ppy.sh/beatmapsets/1971946",
        "https://osu.ppy.sh/beatmapsets/55#osu/1234",
        "notanid",
    ];

    for input in inputs {
        match RawIdentifier::parse(input) {
            Some(identifier) => println!("  {} -> {}", input, identifier),
            None => println!("  {} -> UNRECOGNIZED", input),
        }
    }

    println!("\n=== Done ===");
}
