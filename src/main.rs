use docopt::Docopt;
use itertools::Itertools;
use log::{info, warn};
use serde_derive::Deserialize;
use tracing_subscriber::EnvFilter;
use maze_carver::{
    generators::{self, Progress},
    grid::Grid,
    grid_dimensions::MazeSize,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay},
    grid_iterators::{chunk_size, ChunkOptions},
    maze::Maze,
    pathing::Distances,
    renderers,
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    path::Path,
};

const USAGE: &str = "Maze Carver

Usage:
    maze_driver -h | --help
    maze_driver [text] [image] [options]

Options:
    -h --help                Show this screen.
    --grid-size=<n>          The grid size is n * n.
    --grid-width=<w>         The grid width in a w*h grid [default: 20].
    --grid-height=<h>        The grid height in a w*h grid [default: 20].
    --seed=<s>               Seed for the random number generator. Random if not given, and always logged.
    --text-out=<path>        Output file path for a textual rendering of a maze. Printed to stdout if not given.
    --image-out=<path>       Output file path for an image rendering of a maze. Always PNG format [default: maze.png].
    --cell-pixels=<n>        Pixel count to render one cell wall in a maze [default: 10] max 255.
    --show-distances         Show the distance from the start to every other cell.
    --colour-distances       Indicate the distance from the start to any cell by the cell's background colour.
    --show-path              Show the solution path from the start to the end.
    --mark-start-end         Mark the start and end cells.
    --save-edges=<path>      Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --list-chunks            Print the cells of each rendering chunk.
    --chunk-size=<n>         Chunk side length, replacing the one derived from the grid size.
    --max-chunk-size=<n>     Upper bound on the chunk side length [default: 32].
    --progress               Log generation progress.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<i64>,
    flag_grid_width: i64,
    flag_grid_height: i64,
    flag_seed: Option<u64>,
    cmd_text: bool,
    flag_text_out: String,
    cmd_image: bool,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_show_distances: bool,
    flag_colour_distances: bool,
    flag_show_path: bool,
    flag_mark_start_end: bool,
    flag_save_edges: String,
    flag_list_chunks: bool,
    flag_chunk_size: Option<usize>,
    flag_max_chunk_size: usize,
    flag_progress: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            ImageFailure(::image::ImageError);
            Io(::std::io::Error);
            InvalidSize(::maze_carver::grid_dimensions::SizeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if !e.fatal() => e.exit(),
        Err(e) => return Err(e.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let large_grid_cell_count = 25 * 25;
    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let size = MazeSize::new(width, height)?;
    let grid_size = size.cells_count().0;

    // Text for small grids and an image for large ones unless told otherwise.
    let any_render_option = args.cmd_text || args.cmd_image;
    let do_text_render = args.cmd_text || (!any_render_option && grid_size < large_grid_cell_count);
    let do_image_render = args.cmd_image || (!any_render_option && grid_size >= large_grid_cell_count);

    let maze = generate_maze(size, &args);

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(maze.grid(), &args.flag_save_edges)?;
    }

    if args.flag_list_chunks {
        list_chunks(&maze, &args);
    }

    let distances = match maze.start() {
        Some(start) if args.flag_show_distances || args.flag_colour_distances => {
            Distances::new(maze.grid(), start)
        }
        _ => None,
    };

    if do_text_render {
        let text = render_text(&maze, &args, distances.as_ref());
        if args.flag_text_out.is_empty() {
            print!("{}", text);
        } else {
            write_text_to_file(&text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    if do_image_render {
        let render_options = renderers::RenderOptionsBuilder::new()
            .colour_distances(args.flag_colour_distances)
            .distances(distances.as_ref())
            .mark_start_end(args.flag_mark_start_end)
            .start(maze.start())
            .end(maze.end())
            .show_path(args.flag_show_path)
            .path(Some(maze.solution()))
            .output_file(Some(Path::new(&args.flag_image_out)))
            .cell_side_pixels_length(args.flag_cell_pixels)
            .build();
        renderers::render_to_file(maze.grid(), &render_options)
            .chain_err(|| format!("Failed to write maze image {}", args.flag_image_out))?;
        info!("Maze image written to {}", args.flag_image_out);
    }

    Ok(())
}

fn generate_maze(size: MazeSize, maze_args: &MazeArgs) -> Maze {

    let (seed, mut rng) = match maze_args.flag_seed {
        Some(seed) => (seed, generators::seeded_rng(seed)),
        None => generators::entropy_rng(),
    };
    info!("Generating a {} maze with seed {}", size, seed);

    let log_progress = maze_args.flag_progress;
    let mut last_reported_decile = 0;
    let maze = generators::recursive_backtracker(size, &mut rng, |progress: Progress| {
        if !log_progress {
            return;
        }
        let decile = progress.carved * 10 / progress.total;
        if decile > last_reported_decile {
            last_reported_decile = decile;
            info!("Carved {}/{} ({:.0}%)", progress.carved, progress.total, progress.fraction() * 100.0);
        }
    });

    info!("Maze solution is {} cells long", maze.solution().len());
    maze
}

/// Text rendering with cell bodies showing distances, else the solution path, else start and end markers.
fn render_text(maze: &Maze, maze_args: &MazeArgs, distances: Option<&Distances>) -> String {

    let path_display;
    let start_end_display;
    let displayer: Option<&dyn GridDisplay> = if maze_args.flag_show_distances && distances.is_some() {
        distances.map(|d| d as &dyn GridDisplay)
    } else if maze_args.flag_show_path {
        path_display = PathDisplay::new(maze.solution());
        Some(&path_display as &dyn GridDisplay)
    } else if maze_args.flag_mark_start_end {
        start_end_display = StartEndPointsDisplay::new(maze.start().into_iter().collect(),
                                                       maze.end().into_iter().collect());
        Some(&start_end_display as &dyn GridDisplay)
    } else {
        None
    };

    match displayer {
        Some(displayer) => maze.grid().display_with(displayer).to_string(),
        None => maze.grid().to_string(),
    }
}

fn list_chunks(maze: &Maze, maze_args: &MazeArgs) {
    let options = ChunkOptions {
        custom_size: maze_args.flag_chunk_size,
        max_size: maze_args.flag_max_chunk_size,
    };
    let side = chunk_size(maze.size(), &options);
    if maze_args.flag_chunk_size.map_or(false, |custom| custom != side.0) {
        warn!("Chunk size clamped to {}", side.0);
    }

    let chunks = maze.grid().iter_chunks(side);
    let (x_chunks, y_chunks) = chunks.chunk_counts();
    info!("{} x {} chunks of side {}", x_chunks, y_chunks, side.0);

    for chunk in chunks {
        let cells = chunk.cells.iter().map(|c| format!("({}, {})", c.x, c.y)).join(" ");
        println!("chunk ({}, {}): {}", chunk.index.0, chunk.index.1, cells);
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze_grid.size(), maze_grid.links_count()));

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .ok_or("Passage from a cell outside the grid")?;
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .ok_or("Passage to a cell outside the grid")?;
        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    info!("Maze graph written to {}", file_path);

    Ok(())
}
