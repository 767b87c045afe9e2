use clap::Parser;
use gridhop::game_logic::collision::{CollisionRegistry, Occupant};
use gridhop::game_logic::errors::GridhopResult;
use gridhop::game_logic::grid::GridCoord;
use gridhop::level::LevelDefinition;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone)]
#[command(name = "levelcheck")]
#[command(about = "Validate a gridhop level and print its collision layout")]
struct Args {
    /// Level file (TOML). Relative paths are resolved against levels/ first.
    level: PathBuf,

    /// Treat conflicting static/interactable registrations as an error
    #[arg(long)]
    strict: bool,

    /// Print an ASCII map of the registered cells
    #[arg(long)]
    show_cells: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("levelcheck: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> GridhopResult<()> {
    let level = load(&args.level)?;
    let mut registry = CollisionRegistry::new(level.cell_size);
    let stats = level.populate_registry(&mut registry);

    println!("Level: {}", level.name);
    println!("  cell size:          {}", registry.cell_size());
    println!("  spawn / respawn:    {} / {}", level.spawn_cell(), level.respawn_cell());
    println!("  objects:            {}", level.objects.len());
    println!("  static cells:       {}", stats.static_cells);
    println!("  interactable cells: {}", stats.interactable_cells);
    println!("  boundary cells:     {}", stats.boundary_cells);
    println!("  traffic lanes:      {}", level.traffic.len());

    if level.bounds.is_none() {
        println!("  note: no bounds set, the player can walk off the level");
    }
    if !registry.is_passable(level.spawn_cell()) {
        println!("  WARNING: spawn cell is blocked");
    }

    for conflict in registry.conflicts() {
        let kept = registry
            .occupant_at(conflict.cell)
            .map(Occupant::to_string)
            .unwrap_or_default();
        println!(
            "  conflict at {}: {} vs {}, kept {}",
            conflict.cell, conflict.existing, conflict.incoming, kept
        );
    }

    if args.show_cells {
        print_cells(&level, &registry);
    }

    if args.strict {
        registry.ensure_no_conflicts()?;
    }
    Ok(())
}

fn load(path: &Path) -> GridhopResult<LevelDefinition> {
    if path.is_relative() {
        let in_levels = LevelDefinition::get_levels_dir()?.join(path);
        if in_levels.exists() {
            return LevelDefinition::load_from_path(&in_levels);
        }
    }
    LevelDefinition::load_from_path(path)
}

/// `#` static, letter = first character of an interactable payload, `@` spawn, `.` open floor
fn print_cells(level: &LevelDefinition, registry: &CollisionRegistry) {
    let (min, max) = match level.bounds {
        Some(bounds) => (
            GridCoord::new(bounds.min[0] - 1, bounds.min[1] - 1),
            GridCoord::new(bounds.max[0] + 1, bounds.max[1] + 1),
        ),
        None => {
            let spawn = level.spawn_cell();
            (
                GridCoord::new(spawn.x - 8, spawn.z - 8),
                GridCoord::new(spawn.x + 8, spawn.z + 8),
            )
        }
    };

    println!();
    for z in min.z..=max.z {
        let row: String = (min.x..=max.x)
            .map(|x| {
                let cell = GridCoord::new(x, z);
                if cell == level.spawn_cell() {
                    return '@';
                }
                match registry.occupant_at(cell) {
                    Some(Occupant::Static) => '#',
                    Some(Occupant::Interactable { payload }) => {
                        payload.chars().next().unwrap_or('?')
                    }
                    None => '.',
                }
            })
            .collect();
        println!("  {row}");
    }
}
