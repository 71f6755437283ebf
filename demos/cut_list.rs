//! Bento cut-list demo: builds a small divider-box layout and prints its
//! tree, wall panels and connector bill of materials.
//!
//! Usage:
//! ```text
//! cargo run --example cut_list                   # 3.2 mm connectors
//! cargo run --example cut_list -- 6.0            # custom connector thickness
//! RUST_LOG=bento=debug cargo run --example cut_list
//! ```

use bento::{AnalyzerConfig, Axis, PartitionTree, WallAnalyzer};

fn main() -> bento::Result<()> {
    // Default: WARN for everything, INFO for bento.
    // Override with RUST_LOG env var (e.g. RUST_LOG=bento=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("bento=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<f64>() {
            Ok(thickness) => AnalyzerConfig::with_connector_thickness(thickness)?,
            Err(_) => {
                eprintln!("ignoring non-numeric thickness {arg:?}");
                AnalyzerConfig::default()
            }
        },
        None => AnalyzerConfig::default(),
    };

    // 300 x 200 tray: a wide left bay, and a right side cut into three.
    let mut tree = PartitionTree::new(300, 200);
    let (left, right) = tree.split(tree.root(), Axis::Vertical, 180)?;
    tree.split_at_offset(left, Axis::Horizontal, 120)?;
    let (_, lower) = tree.split(right, Axis::Horizontal, 80)?;
    tree.split(lower, Axis::Horizontal, 140)?;

    // A rejected split leaves the tree untouched.
    if let Err(err) = tree.split(tree.root(), Axis::Vertical, 10) {
        println!("rejected: {err}");
    }

    // Undo the last split and redo it elsewhere.
    tree.undo()?;
    tree.split(lower, Axis::Horizontal, 120)?;

    println!("{tree}");

    let analyzer = WallAnalyzer::new(&tree, config);
    println!("Walls:");
    for wall in analyzer.generate_walls() {
        println!(
            "  {:<10} {} -> {}  raw {:>4}  cut {:>7.2}  [{}-{}]",
            wall.axis,
            wall.start,
            wall.end,
            wall.raw_length,
            wall.compensated_length,
            wall.start_connector,
            wall.end_connector,
        );
    }
    println!();
    print!("{}", analyzer.summary());
    Ok(())
}
