//! Test collection filtering and output components

use osu_collect_core::collection::{Collection, CollectionReader, CollectionWriter, OutputFormat};
use osu_collect_core::filter::{FilterSortEngine, FilterSpec, Metric, SortKey};
use osu_collect_core::ResolvedBeatmap;

fn beatmap(id: u64, hash: &str, stars: f32, bpm: f64, title: &str) -> ResolvedBeatmap {
    ResolvedBeatmap {
        content_hash: hash.to_string(),
        beatmap_id: id,
        set_id: id,
        star_rating: stars,
        bpm,
        title: title.to_string(),
    }
}

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Collection Output Test ===\n");

    let beatmaps = vec![
        beatmap(1, "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 3.8, 132.0, "Morning Glow"),
        beatmap(2, "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", 5.2, 185.0, "Skyline Rush"),
        beatmap(3, "cccccccccccccccccccccccccccccccc", 4.6, 174.0, "Glass Orchard"),
        beatmap(4, "dddddddddddddddddddddddddddddddd", 6.4, 210.0, "Redline"),
    ];

    // Test 1: Star Filter
    println!("--- 1. Star Filter ---");
    let filter = FilterSpec::new(Metric::StarRating, 4.0, 6.0);
    println!("Filter: {}", filter.summary());
    for map in &beatmaps {
        let verdict = if FilterSortEngine::matches(map, std::slice::from_ref(&filter)) {
            "kept"
        } else {
            "dropped"
        };
        println!("  {} ({:.1} stars): {}", map.title, map.star_rating, verdict);
    }

    // Test 2: Sorting
    println!("\n--- 2. Sort by BPM ---");
    let mut sorted = beatmaps.clone();
    FilterSortEngine::sort(&mut sorted, SortKey::Bpm);
    for map in &sorted {
        println!("  {:.0} BPM: {}", map.bpm, map.title);
    }

    // Test 3: collection.db Round Trip
    println!("\n--- 3. collection.db Round Trip ---");
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("Error creating temp dir: {}", e);
            return;
        }
    };
    let path = dir.path().join("collection.db");

    let kept = FilterSortEngine::apply(
        beatmaps,
        std::slice::from_ref(&filter),
        Some(SortKey::StarRating),
    );
    let collection = Collection::new("example", kept);
    match CollectionWriter::write(
        std::slice::from_ref(&collection),
        &path,
        OutputFormat::CollectionDb,
    ) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => {
            println!("Error writing: {}", e);
            return;
        }
    }

    match CollectionReader::read(&path) {
        Ok(stored) => {
            for entry in &stored {
                println!("Read back \"{}\": {} beatmaps", entry.name, entry.len());
                for hash in &entry.beatmap_hashes {
                    println!("  {}", hash);
                }
            }
        }
        Err(e) => println!("Error reading back: {}", e),
    }

    println!("\n=== All Tests Complete ===");
}
