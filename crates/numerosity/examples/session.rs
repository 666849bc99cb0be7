//! Print a short seeded session for quick sanity on counts and area modes.
//!
//! Usage:
//!   cargo run -p numerosity --example session -- [seed]

use numerosity::prelude::*;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2015);
    let mut builder = match PairBuilder::new(GeneratorCfg::reference(3), seed) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return;
        }
    };
    for round in 0..12 {
        match builder.next_pair() {
            Ok(p) => println!(
                "round {round}: {:>6} {:>2} vs {:>2} correct={} area={} ({:.0} / {:.0}){}",
                p.level().map(|l| l.to_string()).unwrap_or_default(),
                p.one().len(),
                p.two().len(),
                p.correct(),
                p.area_mode(),
                p.one().total_area(),
                p.two().total_area(),
                if p.swapped() { " [swapped]" } else { "" },
            ),
            Err(err) => eprintln!("round {round}: {err}"),
        }
    }
}
