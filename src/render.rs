//! Text and image rendering of solved boards.
//!
//! The text form is the board grid re-emitted comma-joined, with queen
//! cells prefixed `Q` (so `Q3` is a queen on region 3). The image form is a
//! fixed-size PNG: region-colored cells, thin inner grid lines, a thick
//! outer border, and a dark disc on each queen cell.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::puzzle::{split_tokens, Puzzle, RegionId, Solution};

/// Region palette, indexed by region id.
const PALETTE: [[u8; 3]; 21] = [
    [0xE8, 0x4C, 0x49], // red
    [0xF5, 0xA2, 0x3D], // orange
    [0xF8, 0xE6, 0x4C], // yellow
    [0x7C, 0xCB, 0x5F], // green
    [0x4D, 0xA3, 0xFF], // blue
    [0xA3, 0x64, 0xE5], // purple
    [0xD9, 0x5B, 0xA5], // pink
    [0xCF, 0xCF, 0xCF], // light gray
    [0xB1, 0x8A, 0x5F], // brown
    [0x32, 0xD3, 0xC8], // teal
    [0x7B, 0xD0, 0xC4], // soft aqua
    [0xFF, 0x6E, 0x3A], // bright coral
    [0xFC, 0xE9, 0x6A], // bright lemon
    [0x54, 0xE3, 0x46], // lime green
    [0x1F, 0xA7, 0x74], // deep mint
    [0x3F, 0x57, 0xFF], // bold indigo
    [0xB9, 0x5F, 0xFF], // vivid lavender
    [0xFF, 0x7B, 0xDD], // hot magenta
    [0x8C, 0x8C, 0x8C], // medium gray
    [0xD6, 0xC1, 0x8F], // sand
    [0x00, 0xF0, 0xFF], // electric cyan
];

const CANVAS: u32 = 500;
const OUTER_W: u32 = 8;
const GRID_W: u32 = 4;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const QUEEN_RGB: Rgb<u8> = Rgb([0x1A, 0x1A, 0x1A]);

fn region_color(region: RegionId) -> Result<Rgb<u8>> {
    PALETTE
        .get(region as usize)
        .map(|&rgb| Rgb(rgb))
        .ok_or_else(|| Error::Render(format!("no palette color for region {region}")))
}

/// Pixel edges of the `n` cells along one axis. `edges[i]` is where cell
/// `i` starts; the span up to `edges[i + 1]` includes the trailing grid
/// line except for the last cell. Remainder pixels go to the first cells.
fn cell_edges(n: usize) -> Result<Vec<u32>> {
    let n_u32 = n as u32;
    let total_grid = (n_u32 - 1) * GRID_W;
    let usable = CANVAS
        .checked_sub(2 * OUTER_W + total_grid)
        .filter(|&u| u >= n_u32)
        .ok_or_else(|| Error::Render(format!("board of {n} cells does not fit the canvas")))?;
    let base = usable / n_u32;
    let rem = usable % n_u32;

    let mut edges = Vec::with_capacity(n + 1);
    edges.push(OUTER_W);
    for i in 0..n_u32 {
        let mut next = edges[i as usize] + base + u32::from(i < rem);
        if i < n_u32 - 1 {
            next += GRID_W;
        }
        edges.push(next);
    }
    Ok(edges)
}

/// Pixel span of cell `i`, excluding its trailing grid line.
fn cell_span(edges: &[u32], i: usize, n: usize) -> (u32, u32) {
    let hi = if i < n - 1 {
        edges[i + 1] - GRID_W
    } else {
        edges[i + 1]
    };
    (edges[i], hi)
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_disc(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    let cx = (x0 + x1) as f32 / 2.0;
    let cy = (y0 + y1) as f32 / 2.0;
    let radius = 0.35 * (x1 - x0).min(y1 - y0) as f32;
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x, y, QUEEN_RGB);
            }
        }
    }
}

/// Rasterizes a solved board onto a fixed 500x500 canvas.
pub fn render_image(puzzle: &Puzzle, solution: &Solution) -> Result<RgbImage> {
    let n = puzzle.n();
    let edges = cell_edges(n)?;
    let mut img = RgbImage::from_pixel(CANVAS, CANVAS, WHITE);

    for row in 0..n {
        for col in 0..n {
            let color = region_color(puzzle.region_at(row, col))?;
            let (x0, x1) = cell_span(&edges, col, n);
            let (y0, y1) = cell_span(&edges, row, n);
            fill_rect(&mut img, x0, y0, x1, y1, color);
        }
    }

    // Inner grid lines between cells.
    for i in 1..n {
        let p = edges[i] - GRID_W;
        fill_rect(&mut img, p, OUTER_W, p + GRID_W, CANVAS - OUTER_W, BLACK);
        fill_rect(&mut img, OUTER_W, p, CANVAS - OUTER_W, p + GRID_W, BLACK);
    }

    for (row, col) in solution.queens() {
        let (x0, x1) = cell_span(&edges, col, n);
        let (y0, y1) = cell_span(&edges, row, n);
        draw_disc(&mut img, x0, y0, x1, y1);
    }

    // Thick outer border.
    fill_rect(&mut img, 0, 0, CANVAS, OUTER_W, BLACK);
    fill_rect(&mut img, 0, CANVAS - OUTER_W, CANVAS, CANVAS, BLACK);
    fill_rect(&mut img, 0, 0, OUTER_W, CANVAS, BLACK);
    fill_rect(&mut img, CANVAS - OUTER_W, 0, CANVAS, CANVAS, BLACK);

    Ok(img)
}

/// Renders and writes the solution PNG, creating parent directories.
pub fn save_image(path: &Path, puzzle: &Puzzle, solution: &Solution) -> Result<()> {
    let img = render_image(puzzle, solution)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    img.save(path)?;
    Ok(())
}

/// The board grid as text with queen cells marked `Q<region>`.
pub fn solution_grid(puzzle: &Puzzle, solution: &Solution) -> String {
    let mut out = String::new();
    for (row, regions) in puzzle.rows().enumerate() {
        let queen_col = solution.columns()[row] as usize;
        let line = regions
            .iter()
            .enumerate()
            .map(|(col, region)| {
                if col == queen_col {
                    format!("Q{region}")
                } else {
                    region.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Writes the marked-up grid as text, creating parent directories.
pub fn write_solution_text(path: &Path, puzzle: &Puzzle, solution: &Solution) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, solution_grid(puzzle, solution)).map_err(|e| Error::io(path, e))
}

/// Recovers the per-row queen columns from a marked-up solution grid.
pub fn parse_queen_columns(text: &str) -> Result<Vec<u16>> {
    let mut columns = Vec::new();
    for line in text.lines() {
        let tokens = split_tokens(line);
        if tokens.is_empty() {
            continue;
        }
        let row = columns.len();
        let mut queen = None;
        for (col, token) in tokens.iter().enumerate() {
            if token.starts_with('Q') || token.starts_with('q') {
                if queen.replace(col).is_some() {
                    return Err(Error::Render(format!("row {row}: multiple queen markers")));
                }
            }
        }
        match queen {
            Some(col) => columns.push(col as u16),
            None => return Err(Error::Render(format!("row {row}: no queen marker"))),
        }
    }
    if columns.is_empty() {
        return Err(Error::Render("empty solution grid".into()));
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{solve, SolverConfig};

    const BOARD_4X4: &str = "2,0,1,1\n1,2,2,1\n2,2,3,3\n2,2,3,3\n";

    fn solved_board() -> (Puzzle, Solution) {
        let puzzle = Puzzle::from_text("t", BOARD_4X4).unwrap();
        let report = solve(&puzzle, &SolverConfig::default()).unwrap();
        (puzzle, report.solution)
    }

    #[test]
    fn test_solution_grid_marks_queens() {
        let (puzzle, solution) = solved_board();
        let grid = solution_grid(&puzzle, &solution);
        assert_eq!(grid, "2,Q0,1,1\n1,2,2,Q1\nQ2,2,3,3\n2,2,Q3,3\n");
    }

    #[test]
    fn test_text_round_trip() {
        let (puzzle, solution) = solved_board();
        let grid = solution_grid(&puzzle, &solution);
        let columns = parse_queen_columns(&grid).unwrap();
        assert_eq!(columns, solution.columns());
    }

    #[test]
    fn test_parse_rejects_missing_queen() {
        assert!(parse_queen_columns("Q0,1\n0,1\n").is_err());
    }

    #[test]
    fn test_parse_rejects_double_queen() {
        assert!(parse_queen_columns("Q0,Q1\n").is_err());
    }

    #[test]
    fn test_cell_edges_layout() {
        // 4 cells: usable = 500 - 16 - 12 = 472, so 118 pixels per cell
        // plus a 4-pixel grid line after all but the last.
        assert_eq!(cell_edges(4).unwrap(), vec![8, 130, 252, 374, 492]);
    }

    #[test]
    fn test_render_image_pixels() {
        let (puzzle, solution) = solved_board();
        let img = render_image(&puzzle, &solution).unwrap();
        assert_eq!(img.dimensions(), (CANVAS, CANVAS));

        // Outer border.
        assert_eq!(*img.get_pixel(3, 3), BLACK);
        // Grid line between the first two columns.
        assert_eq!(*img.get_pixel(127, 200), BLACK);
        // Cell (0, 0) is region 2 (yellow) and holds no queen.
        assert_eq!(*img.get_pixel(67, 67), Rgb(PALETTE[2]));
        // Queen disc at the center of cell (0, 1).
        assert_eq!(*img.get_pixel(189, 67), QUEEN_RGB);
    }

    #[test]
    fn test_unknown_region_color_rejected() {
        let puzzle = Puzzle::from_text("t", "99\n").unwrap();
        let solution = crate::puzzle::Solution::new(vec![0]);
        assert!(matches!(
            render_image(&puzzle, &solution),
            Err(Error::Render(_))
        ));
    }
}
